use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::engine::EngineError;

/// Minutes since midnight. The only time-of-day type.
pub type Minutes = u32;

/// `24:00`, valid only as an end bound.
pub const MINUTES_PER_DAY: Minutes = 24 * 60;

/// Half-open time-of-day interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSpan")]
pub struct Span {
    #[serde(serialize_with = "crate::clock::hhmm::serialize")]
    start: Minutes,
    #[serde(serialize_with = "crate::clock::hhmm::serialize")]
    end: Minutes,
}

#[derive(Deserialize)]
struct RawSpan {
    #[serde(with = "crate::clock::hhmm")]
    start: Minutes,
    #[serde(with = "crate::clock::hhmm")]
    end: Minutes,
}

impl TryFrom<RawSpan> for Span {
    type Error = EngineError;

    fn try_from(raw: RawSpan) -> Result<Self, Self::Error> {
        Span::new(raw.start, raw.end)
    }
}

impl Span {
    pub fn new(start: Minutes, end: Minutes) -> Result<Self, EngineError> {
        if end <= start || end > MINUTES_PER_DAY {
            return Err(EngineError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Minutes {
        self.start
    }

    pub fn end(&self) -> Minutes {
        self.end
    }

    pub fn duration(&self) -> Minutes {
        self.end - self.start
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, t: Minutes) -> bool {
        self.start <= t && t < self.end
    }

    /// Returns true if `self` fully contains `other`.
    pub fn contains_span(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            crate::clock::format_hhmm(self.start),
            crate::clock::format_hhmm(self.end)
        )
    }
}

/// Stored booking status. Serialized with the labels the booking store uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingStatus {
    Draft,
    Confirmed,
    #[serde(rename = "Checked-in")]
    CheckedIn,
    #[serde(rename = "Checked-out")]
    CheckedOut,
    Cancelled,
    #[serde(rename = "No-show")]
    NoShow,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Draft => "Draft",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::CheckedIn => "Checked-in",
            BookingStatus::CheckedOut => "Checked-out",
            BookingStatus::Cancelled => "Cancelled",
            BookingStatus::NoShow => "No-show",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::CheckedOut | BookingStatus::Cancelled | BookingStatus::NoShow
        )
    }

    /// Cancelled and no-show bookings never block a slot.
    pub fn blocks_availability(&self) -> bool {
        !matches!(self, BookingStatus::Cancelled | BookingStatus::NoShow)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A booking as read from the booking store.
///
/// `start`/`end` are kept raw: the store may hold rows that violate the span
/// invariant, and callers decide what to do with them via [`Booking::span`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Ulid,
    pub resource_id: Ulid,
    pub date: NaiveDate,
    #[serde(with = "crate::clock::hhmm")]
    pub start: Minutes,
    #[serde(with = "crate::clock::hhmm")]
    pub end: Minutes,
    pub status: BookingStatus,
    #[serde(default)]
    pub expires_at: Option<NaiveDateTime>,
    pub tenant_id: Ulid,
    #[serde(default)]
    pub tenant_name: Option<String>,
}

impl Booking {
    pub fn span(&self) -> Result<Span, EngineError> {
        Span::new(self.start, self.end)
    }

    pub fn is_on(&self, resource_id: Ulid, date: NaiveDate) -> bool {
        self.resource_id == resource_id && self.date == date
    }
}

/// Occupancy state of a space, as kept by the space registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SpaceStatus {
    #[default]
    Available,
    Reserved,
    Occupied,
    Rented,
    Maintenance,
}

/// A bookable space. Read-only from the calendar's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: Ulid,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default = "default_capacity")]
    pub capacity: u32,
    #[serde(default)]
    pub status: SpaceStatus,
    #[serde(default = "default_allow_booking")]
    pub allow_booking: bool,
    #[serde(default)]
    pub hourly_rate: Decimal,
    #[serde(default)]
    pub daily_rate: Decimal,
    /// Zero means no minimum.
    #[serde(default)]
    pub min_booking_hours: Decimal,
    /// Floor applied to every quote. Zero means none.
    #[serde(default)]
    pub minimum_charge: Decimal,
}

impl Resource {
    /// New bookings are only taken for available spaces that accept them.
    pub fn is_bookable(&self) -> bool {
        self.allow_booking && self.status == SpaceStatus::Available
    }

    /// Listed in the per-date availability summary. Rented spaces still show
    /// up there so their hourly bookings are visible.
    pub fn is_listed(&self) -> bool {
        self.allow_booking && matches!(self.status, SpaceStatus::Available | SpaceStatus::Rented)
    }
}

fn default_capacity() -> u32 {
    1
}

fn default_allow_booking() -> bool {
    true
}
