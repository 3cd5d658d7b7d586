use std::fmt;

use chrono::{Days, NaiveDateTime};
use serde::Serialize;

use crate::model::*;

use super::EngineError;

/// Status shown to users. Derived on every read, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DisplayStatus {
    Draft,
    Confirmed,
    #[serde(rename = "Checked-in")]
    CheckedIn,
    #[serde(rename = "Checked-out")]
    CheckedOut,
    Cancelled,
    #[serde(rename = "No-show")]
    NoShow,
    /// A draft left unconverted past its deadline.
    Expired,
}

impl From<BookingStatus> for DisplayStatus {
    fn from(status: BookingStatus) -> Self {
        match status {
            BookingStatus::Draft => DisplayStatus::Draft,
            BookingStatus::Confirmed => DisplayStatus::Confirmed,
            BookingStatus::CheckedIn => DisplayStatus::CheckedIn,
            BookingStatus::CheckedOut => DisplayStatus::CheckedOut,
            BookingStatus::Cancelled => DisplayStatus::Cancelled,
            BookingStatus::NoShow => DisplayStatus::NoShow,
        }
    }
}

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayStatus::Expired => f.write_str("Expired"),
            DisplayStatus::Draft => f.write_str(BookingStatus::Draft.as_str()),
            DisplayStatus::Confirmed => f.write_str(BookingStatus::Confirmed.as_str()),
            DisplayStatus::CheckedIn => f.write_str(BookingStatus::CheckedIn.as_str()),
            DisplayStatus::CheckedOut => f.write_str(BookingStatus::CheckedOut.as_str()),
            DisplayStatus::Cancelled => f.write_str(BookingStatus::Cancelled.as_str()),
            DisplayStatus::NoShow => f.write_str(BookingStatus::NoShow.as_str()),
        }
    }
}

/// Expiry only applies to drafts; every other status is shown as stored.
pub fn effective_status(booking: &Booking, now: NaiveDateTime) -> DisplayStatus {
    match (booking.status, booking.expires_at) {
        (BookingStatus::Draft, Some(deadline)) if now > deadline => DisplayStatus::Expired,
        (status, _) => status.into(),
    }
}

/// Deadline for converting a new booking, `days` after creation.
pub fn expiry_deadline(created_at: NaiveDateTime, days: u64) -> Result<NaiveDateTime, EngineError> {
    created_at
        .checked_add_days(Days::new(days))
        .ok_or(EngineError::DateOutOfRange)
}

impl BookingStatus {
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Draft, Confirmed | CheckedIn | Cancelled | NoShow)
                | (Confirmed, CheckedIn | Cancelled | NoShow)
                | (CheckedIn, CheckedOut)
        )
    }

    pub fn transition(self, next: BookingStatus) -> Result<BookingStatus, EngineError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(EngineError::InvalidTransition { from: self, to: next })
        }
    }
}

/// What the calendar offers when a booking block is clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingAction {
    View,
    Update,
    ConvertToSubscription,
    Cancel,
}

pub fn available_actions(status: BookingStatus) -> Vec<BookingAction> {
    let mut actions = vec![BookingAction::View];
    if !matches!(status, BookingStatus::Cancelled | BookingStatus::CheckedOut) {
        actions.push(BookingAction::Update);
        actions.push(BookingAction::ConvertToSubscription);
    }
    if matches!(status, BookingStatus::Draft | BookingStatus::Confirmed) {
        actions.push(BookingAction::Cancel);
    }
    actions
}
