use std::fmt;
use std::str::FromStr;

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::model::*;

use super::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubscriptionType {
    Hourly,
    Daily,
    Monthly,
    Annual,
}

impl FromStr for SubscriptionType {
    type Err = EngineError;

    /// Fails closed: anything but the four known types (e.g. `Entry-based`) is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Hourly" => Ok(SubscriptionType::Hourly),
            "Daily" => Ok(SubscriptionType::Daily),
            "Monthly" => Ok(SubscriptionType::Monthly),
            "Annual" => Ok(SubscriptionType::Annual),
            other => Err(EngineError::UnsupportedSubscriptionType(other.to_string())),
        }
    }
}

impl fmt::Display for SubscriptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SubscriptionType::Hourly => "Hourly",
            SubscriptionType::Daily => "Daily",
            SubscriptionType::Monthly => "Monthly",
            SubscriptionType::Annual => "Annual",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentFrequency {
    #[serde(rename = "One-time")]
    OneTime,
    Monthly,
    Annual,
}

impl SubscriptionType {
    pub fn payment_frequency(&self) -> PaymentFrequency {
        match self {
            SubscriptionType::Hourly | SubscriptionType::Daily => PaymentFrequency::OneTime,
            SubscriptionType::Monthly => PaymentFrequency::Monthly,
            SubscriptionType::Annual => PaymentFrequency::Annual,
        }
    }

    fn months(&self) -> u32 {
        match self {
            SubscriptionType::Hourly | SubscriptionType::Daily => 0,
            SubscriptionType::Monthly => 1,
            SubscriptionType::Annual => 12,
        }
    }
}

/// End date for a subscription of `kind` starting on `start`.
///
/// Calendar months clamp to the last valid day: Jan 31 + 1 month is Feb 28
/// (Feb 29 in leap years).
pub fn derive_end_date(kind: SubscriptionType, start: NaiveDate) -> Result<NaiveDate, EngineError> {
    start
        .checked_add_months(Months::new(kind.months()))
        .ok_or(EngineError::DateOutOfRange)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionPeriod {
    #[serde(rename = "type")]
    kind: SubscriptionType,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl SubscriptionPeriod {
    pub fn derive(kind: SubscriptionType, start_date: NaiveDate) -> Result<Self, EngineError> {
        Ok(Self {
            kind,
            start_date,
            end_date: derive_end_date(kind, start_date)?,
        })
    }

    pub fn kind(&self) -> SubscriptionType {
        self.kind
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn payment_frequency(&self) -> PaymentFrequency {
        self.kind.payment_frequency()
    }

    /// Length in 30-day months, rounded to one decimal.
    pub fn duration_months(&self) -> f64 {
        let days = (self.end_date - self.start_date).num_days() as f64;
        (days / 30.0 * 10.0).round() / 10.0
    }

    /// When the next invoice falls due after invoicing on `from`. One-time
    /// subscriptions are invoiced once.
    pub fn next_invoice_date(&self, from: NaiveDate) -> Result<Option<NaiveDate>, EngineError> {
        let months = match self.payment_frequency() {
            PaymentFrequency::OneTime => return Ok(None),
            PaymentFrequency::Monthly => 1,
            PaymentFrequency::Annual => 12,
        };
        from.checked_add_months(Months::new(months))
            .map(Some)
            .ok_or(EngineError::DateOutOfRange)
    }
}

/// What the store needs to turn a booking into a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionPlan {
    pub booking_id: Ulid,
    pub tenant_id: Ulid,
    pub resource_id: Ulid,
    pub period: SubscriptionPeriod,
}

/// Cancelled and checked-out bookings can't be converted.
pub fn plan_conversion(
    booking: &Booking,
    kind: SubscriptionType,
    start_date: NaiveDate,
) -> Result<ConversionPlan, EngineError> {
    if matches!(booking.status, BookingStatus::Cancelled | BookingStatus::CheckedOut) {
        return Err(EngineError::NotConvertible {
            id: booking.id,
            status: booking.status,
        });
    }
    Ok(ConversionPlan {
        booking_id: booking.id,
        tenant_id: booking.tenant_id,
        resource_id: booking.resource_id,
        period: SubscriptionPeriod::derive(kind, start_date)?,
    })
}
