use chrono::NaiveDate;
use tracing::debug;
use ulid::Ulid;

use crate::model::*;

/// Existing bookings that would collide with `candidate`.
///
/// Same resource, same date, overlapping span, and a status that still holds the
/// slot. Rows with an invalid stored range cannot overlap anything and are skipped.
pub(crate) fn conflicting<'a>(
    resource_id: Ulid,
    date: NaiveDate,
    candidate: &'a Span,
    bookings: &'a [Booking],
    exclude: Option<Ulid>,
) -> impl Iterator<Item = &'a Booking> + 'a {
    bookings.iter().filter(move |b| {
        if !b.is_on(resource_id, date) || Some(b.id) == exclude || !b.status.blocks_availability() {
            return false;
        }
        match b.span() {
            Ok(span) => span.overlaps(candidate),
            Err(e) => {
                debug!("ignoring booking {} in conflict check: {e}", b.id);
                false
            }
        }
    })
}

/// Spans of the bookings holding `resource_id` on `date`, sorted by start.
pub(crate) fn busy_spans(resource_id: Ulid, date: NaiveDate, bookings: &[Booking]) -> Vec<Span> {
    let mut busy: Vec<Span> = bookings
        .iter()
        .filter(|b| b.is_on(resource_id, date) && b.status.blocks_availability())
        .filter_map(|b| b.span().ok())
        .collect();
    busy.sort_by_key(|s| s.start());
    busy
}
