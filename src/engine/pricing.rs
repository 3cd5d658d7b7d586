use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::limits::{DAILY_RATE_MIN_MINUTES, OVERTIME_MULTIPLIER_TENTHS};
use crate::model::*;

use super::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateType {
    Hourly,
    Daily,
}

impl RateType {
    /// Daily once a booking reaches a full working day and the space has a day rate.
    pub fn for_duration(minutes: Minutes, resource: &Resource) -> RateType {
        if minutes >= DAILY_RATE_MIN_MINUTES && resource.daily_rate > Decimal::ZERO {
            RateType::Daily
        } else {
            RateType::Hourly
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub rate: RateType,
    pub hours: Decimal,
    pub subtotal: Decimal,
}

fn hours(minutes: Minutes) -> Decimal {
    Decimal::from(minutes) / Decimal::from(60)
}

/// Price `span` at the space's rates.
///
/// A requested daily rate always wins; otherwise the rate follows
/// [`RateType::for_duration`]. The space's minimum charge is a floor.
pub fn price(span: &Span, resource: &Resource, requested: Option<RateType>) -> Quote {
    let booked = hours(span.duration());
    let rate = match requested {
        Some(RateType::Daily) => RateType::Daily,
        _ => RateType::for_duration(span.duration(), resource),
    };
    let subtotal = match rate {
        RateType::Hourly => booked * resource.hourly_rate,
        RateType::Daily => resource.daily_rate,
    };
    Quote {
        rate,
        hours: booked,
        subtotal: subtotal.max(resource.minimum_charge).round_dp(2),
    }
}

/// [`price`] for a stored booking. Invalid stored ranges are rejected.
pub fn quote(booking: &Booking, resource: &Resource, requested: Option<RateType>) -> Result<Quote, EngineError> {
    Ok(price(&booking.span()?, resource, requested))
}

/// Extra time beyond the booked span, billed at 1.5× the hourly rate.
pub fn overtime_charge(booked: &Span, actual_minutes: Minutes, hourly_rate: Decimal) -> Decimal {
    let Some(extra) = actual_minutes.checked_sub(booked.duration()).filter(|m| *m > 0) else {
        return Decimal::ZERO;
    };
    let multiplier = Decimal::new(OVERTIME_MULTIPLIER_TENTHS, 1);
    (hours(extra) * hourly_rate * multiplier).round_dp(2)
}
