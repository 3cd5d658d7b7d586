use chrono::NaiveDate;
use serde::Serialize;
use ulid::Ulid;

use crate::model::*;

use super::EngineError;
use super::conflict::{busy_spans, conflicting};

// ── Conflict check ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityResult {
    pub available: bool,
    /// Colliding bookings, in input order.
    pub conflicting_booking_ids: Vec<Ulid>,
}

/// Advisory check: would `candidate` collide with an existing booking?
///
/// Nothing is reserved. Two callers can both see `available` for the same slot;
/// only an atomic insert in the booking store can rule that out.
pub fn check_availability(
    resource_id: Ulid,
    date: NaiveDate,
    candidate: &Span,
    bookings: &[Booking],
) -> AvailabilityResult {
    check(resource_id, date, candidate, bookings, None)
}

/// Same as [`check_availability`], ignoring the booking being edited.
pub fn check_availability_excluding(
    resource_id: Ulid,
    date: NaiveDate,
    candidate: &Span,
    bookings: &[Booking],
    exclude: Ulid,
) -> AvailabilityResult {
    check(resource_id, date, candidate, bookings, Some(exclude))
}

fn check(
    resource_id: Ulid,
    date: NaiveDate,
    candidate: &Span,
    bookings: &[Booking],
    exclude: Option<Ulid>,
) -> AvailabilityResult {
    let conflicting_booking_ids: Vec<Ulid> = conflicting(resource_id, date, candidate, bookings, exclude)
        .map(|b| b.id)
        .collect();
    metrics::counter!(crate::observability::AVAILABILITY_CHECKS_TOTAL).increment(1);
    if !conflicting_booking_ids.is_empty() {
        metrics::counter!(crate::observability::CONFLICTS_TOTAL).increment(1);
    }
    AvailabilityResult {
        available: conflicting_booking_ids.is_empty(),
        conflicting_booking_ids,
    }
}

// ── Free slots ────────────────────────────────────────────────────

/// Lazy walk over a day in fixed-length steps, yielding the free candidates.
///
/// Clone it to restart from the beginning.
#[derive(Debug, Clone)]
pub struct FreeSlots {
    busy: Vec<Span>,
    cursor: usize,
    next_start: Minutes,
    duration: Minutes,
    day_end: Minutes,
}

impl Iterator for FreeSlots {
    type Item = Span;

    fn next(&mut self) -> Option<Span> {
        loop {
            let end = self.next_start.checked_add(self.duration)?;
            if end > self.day_end {
                return None;
            }
            let candidate = Span::new(self.next_start, end).ok()?;
            self.next_start = end;

            // Busy spans ending at or before this candidate can't touch later ones either.
            while self
                .busy
                .get(self.cursor)
                .is_some_and(|b| b.end() <= candidate.start())
            {
                self.cursor += 1;
            }
            let blocked = self.busy[self.cursor..]
                .iter()
                .take_while(|b| b.start() < candidate.end())
                .any(|b| b.overlaps(&candidate));
            if !blocked {
                return Some(candidate);
            }
        }
    }
}

/// Every `duration`-long candidate from `day.start` whose end fits in `day`, minus
/// the ones [`check_availability`] would reject. Sorted ascending.
///
/// `duration` must be non-zero and no longer than `day`.
pub fn enumerate_free_slots(
    resource_id: Ulid,
    date: NaiveDate,
    bookings: &[Booking],
    duration: Minutes,
    day: Span,
) -> Result<FreeSlots, EngineError> {
    if duration == 0 || duration > day.duration() {
        return Err(EngineError::InvalidDuration);
    }
    Ok(FreeSlots {
        busy: busy_spans(resource_id, date, bookings),
        cursor: 0,
        next_start: day.start(),
        duration,
        day_end: day.end(),
    })
}

// ── Per-date summary ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusySlot {
    pub booking_id: Ulid,
    #[serde(flatten)]
    pub span: Span,
    pub status: BookingStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpaceAvailability {
    pub resource_id: Ulid,
    pub name: String,
    pub kind: String,
    pub capacity: u32,
    pub bookings: Vec<BusySlot>,
    pub is_available: bool,
}

/// Each listed resource with the bookings holding it on `date`. A space with no
/// such booking is available. Spaces closed to booking, or not in service, are left out.
pub fn space_availability(date: NaiveDate, resources: &[Resource], bookings: &[Booking]) -> Vec<SpaceAvailability> {
    resources
        .iter()
        .filter(|r| r.is_listed())
        .map(|r| {
            let mut held: Vec<BusySlot> = bookings
                .iter()
                .filter(|b| b.is_on(r.id, date) && b.status.blocks_availability())
                .filter_map(|b| {
                    b.span().ok().map(|span| BusySlot {
                        booking_id: b.id,
                        span,
                        status: b.status,
                    })
                })
                .collect();
            held.sort_by_key(|s| s.span.start());
            SpaceAvailability {
                resource_id: r.id,
                name: r.name.clone(),
                kind: r.kind.clone(),
                capacity: r.capacity,
                is_available: held.is_empty(),
                bookings: held,
            }
        })
        .collect()
}
