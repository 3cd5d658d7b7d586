use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;
use ulid::Ulid;

use crate::model::*;

use super::grid::SlotGrid;
use super::window::DateWindow;

// ── Cell model ───────────────────────────────────────────────────

/// One calendar cell: a slot of a resource on a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CellKey {
    pub date: NaiveDate,
    pub resource_id: Ulid,
    #[serde(serialize_with = "crate::clock::hhmm::serialize")]
    pub time: Minutes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cell {
    Empty,
    /// The booking starts here and spans `rowspan` cells downwards.
    Start { booking_id: Ulid, rowspan: u32 },
    /// Merged into the start cell above; not rendered on its own.
    Continuation { booking_id: Ulid },
    /// Mid-span of a booking that has no start cell on this grid.
    Covered { booking_id: Ulid },
}

impl Cell {
    pub fn is_occupied(&self) -> bool {
        !matches!(self, Cell::Empty)
    }

    pub fn booking_id(&self) -> Option<Ulid> {
        match self {
            Cell::Empty => None,
            Cell::Start { booking_id, .. }
            | Cell::Continuation { booking_id }
            | Cell::Covered { booking_id } => Some(*booking_id),
        }
    }
}

// ── Diagnostics ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// Stored range is empty, inverted, or runs past midnight.
    InvalidRange { start: Minutes, end: Minutes },
    /// Another booking already starts at the same cell; the first in input order wins.
    DuplicateStart { kept: Ulid },
    /// The start cell is already merged into an earlier booking's rowspan.
    Shadowed { by: Ulid },
}

impl SkipReason {
    /// Metric label, same text as the serialized tag.
    pub fn label(&self) -> &'static str {
        match self {
            SkipReason::InvalidRange { .. } => "invalid_range",
            SkipReason::DuplicateStart { .. } => "duplicate_start",
            SkipReason::Shadowed { .. } => "shadowed",
        }
    }
}

/// A booking left out of the grid, reported instead of failing the whole calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedBooking {
    pub booking_id: Ulid,
    #[serde(flatten)]
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default)]
pub struct OccupancyMap {
    cells: BTreeMap<CellKey, Cell>,
    skipped: Vec<SkippedBooking>,
}

impl OccupancyMap {
    pub fn get(&self, date: NaiveDate, resource_id: Ulid, time: Minutes) -> Option<Cell> {
        self.cells
            .get(&CellKey {
                date,
                resource_id,
                time,
            })
            .copied()
    }

    pub fn cells(&self) -> impl Iterator<Item = (&CellKey, &Cell)> {
        self.cells.iter()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Start cells only: `(cell, booking_id, rowspan)`.
    pub fn starts(&self) -> impl Iterator<Item = (&CellKey, Ulid, u32)> {
        self.cells.iter().filter_map(|(key, cell)| match cell {
            Cell::Start {
                booking_id,
                rowspan,
            } => Some((key, *booking_id, *rowspan)),
            _ => None,
        })
    }

    pub fn skipped(&self) -> &[SkippedBooking] {
        &self.skipped
    }
}

// ── Resolver ─────────────────────────────────────────────────────

/// Compute the state of every `(date, resource, slot)` cell in `window`.
///
/// Bookings outside the window or for resources not listed are ignored.
/// Malformed or colliding bookings are reported in [`OccupancyMap::skipped`];
/// the resolver itself never fails. Input order decides ties, nothing is re-sorted.
pub fn resolve_occupancy(
    bookings: &[Booking],
    resources: &[Resource],
    window: &DateWindow,
    grid: &SlotGrid,
) -> OccupancyMap {
    let known: HashSet<Ulid> = resources.iter().map(|r| r.id).collect();
    let mut skipped = Vec::new();
    let mut columns: HashMap<(NaiveDate, Ulid), Vec<(&Booking, Span)>> = HashMap::new();

    for booking in bookings {
        if !window.contains(booking.date) || !known.contains(&booking.resource_id) {
            continue;
        }
        match booking.span() {
            Ok(span) => columns
                .entry((booking.date, booking.resource_id))
                .or_default()
                .push((booking, span)),
            Err(_) => {
                warn!(
                    "skipping booking {} with invalid range {}..{}",
                    booking.id, booking.start, booking.end
                );
                skipped.push(SkippedBooking {
                    booking_id: booking.id,
                    reason: SkipReason::InvalidRange {
                        start: booking.start,
                        end: booking.end,
                    },
                });
            }
        }
    }

    let mut cells = BTreeMap::new();
    let mut seen = HashSet::new();
    for date in window.days() {
        for resource in resources {
            if !seen.insert((date, resource.id)) {
                continue;
            }
            let column = columns
                .get(&(date, resource.id))
                .map(Vec::as_slice)
                .unwrap_or_default();
            resolve_column(date, resource.id, column, grid, &mut cells, &mut skipped);
        }
    }

    for s in &skipped {
        metrics::counter!(crate::observability::SKIPPED_BOOKINGS_TOTAL, "reason" => s.reason.label()).increment(1);
    }

    OccupancyMap { cells, skipped }
}

fn resolve_column(
    date: NaiveDate,
    resource_id: Ulid,
    column: &[(&Booking, Span)],
    grid: &SlotGrid,
    cells: &mut BTreeMap<CellKey, Cell>,
    skipped: &mut Vec<SkippedBooking>,
) {
    // Slot time → booking whose rowspan swallowed it.
    let mut merged: HashMap<Minutes, Ulid> = HashMap::new();

    for &time in grid.times() {
        let key = CellKey {
            date,
            resource_id,
            time,
        };
        let mut starting = column.iter().filter(|(_, span)| span.start() == time);

        if let Some(&by) = merged.get(&time) {
            for (booking, _) in starting {
                warn!("booking {} starts inside booking {by} on {date} and is hidden", booking.id);
                skipped.push(SkippedBooking {
                    booking_id: booking.id,
                    reason: SkipReason::Shadowed { by },
                });
            }
            cells.insert(key, Cell::Continuation { booking_id: by });
            continue;
        }

        if let Some((first, span)) = starting.next() {
            let rowspan = grid.rowspan(span.duration());
            for i in 1..rowspan {
                merged.insert(time + i * grid.step(), first.id);
            }
            for (dup, _) in starting {
                warn!(
                    "bookings {} and {} both start at {} on {date}; keeping the first",
                    first.id,
                    dup.id,
                    crate::clock::format_hhmm(time)
                );
                skipped.push(SkippedBooking {
                    booking_id: dup.id,
                    reason: SkipReason::DuplicateStart { kept: first.id },
                });
            }
            cells.insert(
                key,
                Cell::Start {
                    booking_id: first.id,
                    rowspan,
                },
            );
            continue;
        }

        let cell = column
            .iter()
            .find(|(_, span)| span.start() < time && time < span.end())
            .map_or(Cell::Empty, |(booking, _)| Cell::Covered {
                booking_id: booking.id,
            });
        cells.insert(key, cell);
    }
}
