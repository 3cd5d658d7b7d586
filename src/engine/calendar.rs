use std::collections::HashMap;
use std::time::Instant;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use ulid::Ulid;

use crate::clock::label_12h;
use crate::model::*;

use super::grid::SlotGrid;
use super::occupancy::{Cell, SkippedBooking, resolve_occupancy};
use super::status::{DisplayStatus, effective_status};
use super::window::{CalendarView, DateWindow};

/// Render-ready calendar: one column per `(date, resource)`, one row per slot.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarSnapshot {
    pub view: CalendarView,
    pub window: DateWindow,
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
    pub skipped: Vec<SkippedBooking>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub date: NaiveDate,
    pub resource_id: Ulid,
    pub resource_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Row {
    #[serde(serialize_with = "crate::clock::hhmm::serialize")]
    pub time: Minutes,
    pub label: String,
    /// Parallel to [`CalendarSnapshot::columns`].
    pub cells: Vec<CellView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CellView {
    Empty,
    Booking {
        booking_id: Ulid,
        rowspan: u32,
        #[serde(serialize_with = "crate::clock::hhmm::serialize")]
        start: Minutes,
        #[serde(serialize_with = "crate::clock::hhmm::serialize")]
        end: Minutes,
        status: DisplayStatus,
        tenant_name: Option<String>,
    },
    /// Part of the booking block above; renderers skip it.
    Merged { booking_id: Ulid },
    /// Mid-span of a booking without a start cell on this grid. `status` is
    /// absent only if the booking is missing from the input.
    Covered {
        booking_id: Ulid,
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<DisplayStatus>,
    },
}

pub fn build_calendar(
    view: CalendarView,
    window: DateWindow,
    resources: &[Resource],
    bookings: &[Booking],
    grid: &SlotGrid,
    now: NaiveDateTime,
) -> CalendarSnapshot {
    let started = Instant::now();
    let occupancy = resolve_occupancy(bookings, resources, &window, grid);
    metrics::histogram!(crate::observability::OCCUPANCY_RESOLVE_SECONDS).record(started.elapsed().as_secs_f64());
    metrics::counter!(crate::observability::CALENDAR_BUILDS_TOTAL).increment(1);

    let by_id: HashMap<Ulid, &Booking> = bookings.iter().map(|b| (b.id, b)).collect();
    let status_of = |id: Ulid| by_id.get(&id).map(|b| effective_status(b, now));

    let mut columns = Vec::with_capacity(window.len_days() * resources.len());
    for date in window.days() {
        for resource in resources {
            let column = Column {
                date,
                resource_id: resource.id,
                resource_name: resource.name.clone(),
            };
            if !columns.contains(&column) {
                columns.push(column);
            }
        }
    }

    let rows = grid
        .times()
        .iter()
        .map(|&time| Row {
            time,
            label: label_12h(time),
            cells: columns
                .iter()
                .map(|col| match occupancy.get(col.date, col.resource_id, time) {
                    None | Some(Cell::Empty) => CellView::Empty,
                    Some(Cell::Continuation { booking_id }) => CellView::Merged { booking_id },
                    Some(Cell::Covered { booking_id }) => CellView::Covered {
                        booking_id,
                        status: status_of(booking_id),
                    },
                    Some(Cell::Start { booking_id, rowspan }) => {
                        let block = by_id.get(&booking_id).and_then(|b| Some((*b, b.span().ok()?)));
                        match block {
                            Some((booking, span)) => CellView::Booking {
                                booking_id,
                                rowspan,
                                start: span.start(),
                                end: span.end(),
                                status: effective_status(booking, now),
                                tenant_name: booking.tenant_name.clone(),
                            },
                            None => CellView::Covered {
                                booking_id,
                                status: status_of(booking_id),
                            },
                        }
                    }
                })
                .collect(),
        })
        .collect();

    CalendarSnapshot {
        view,
        window,
        columns,
        rows,
        skipped: occupancy.skipped().to_vec(),
    }
}
