use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info};
use ulid::Ulid;

use crate::engine::{self, *};
use crate::model::*;
use crate::store::BookingSource;

/// Fetches from a [`BookingSource`] and runs the calendar core over the result.
/// Holds no state of its own between calls.
pub struct CalendarService<S> {
    source: S,
    grid: SlotGrid,
}

impl<S: BookingSource> CalendarService<S> {
    pub fn new(source: S, grid: SlotGrid) -> Self {
        Self { source, grid }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn grid(&self) -> &SlotGrid {
        &self.grid
    }

    pub async fn calendar(
        &self,
        view: CalendarView,
        anchor: NaiveDate,
        filter: &CalendarFilter,
        now: NaiveDateTime,
    ) -> Result<CalendarSnapshot, EngineError> {
        let window = window_for(view, anchor)?;
        let (resources, bookings) = futures::try_join!(self.source.resources(), self.source.bookings_between(&window))?;
        let resources = filter.resources(resources);
        let bookings = filter.bookings(bookings, &resources);
        let snapshot = build_calendar(view, window, &resources, &bookings, &self.grid, now);
        info!(
            "built {view:?} calendar {}..={}: {} columns, {} bookings, {} skipped",
            window.start(),
            window.end(),
            snapshot.columns.len(),
            bookings.len(),
            snapshot.skipped.len()
        );
        Ok(snapshot)
    }

    /// Advisory conflict check for a proposed booking. Pass `exclude` when
    /// editing an existing booking so it doesn't collide with itself.
    pub async fn check_conflict(
        &self,
        resource_id: Ulid,
        date: NaiveDate,
        candidate: Span,
        exclude: Option<Ulid>,
    ) -> Result<AvailabilityResult, EngineError> {
        let bookings = self.source.bookings_between(&DateWindow::single(date)).await?;
        let result = match exclude {
            Some(id) => check_availability_excluding(resource_id, date, &candidate, &bookings, id),
            None => check_availability(resource_id, date, &candidate, &bookings),
        };
        debug!(
            "conflict check {resource_id} {date} {candidate}: {} conflicts",
            result.conflicting_booking_ids.len()
        );
        Ok(result)
    }

    /// Free `duration`-long candidates within the grid's opening hours.
    pub async fn free_slots(
        &self,
        resource_id: Ulid,
        date: NaiveDate,
        duration: Minutes,
    ) -> Result<Vec<Span>, EngineError> {
        let bookings = self.source.bookings_between(&DateWindow::single(date)).await?;
        let day = self.grid.hours()?;
        Ok(enumerate_free_slots(resource_id, date, &bookings, duration, day)?.collect())
    }

    /// Listed spaces matching `filter`, each with the bookings holding it on `date`.
    pub async fn space_availability(
        &self,
        date: NaiveDate,
        filter: &CalendarFilter,
    ) -> Result<Vec<SpaceAvailability>, EngineError> {
        let window = DateWindow::single(date);
        let (resources, bookings) = futures::try_join!(self.source.resources(), self.source.bookings_between(&window))?;
        let resources = filter.resources(resources);
        let bookings = filter.bookings(bookings, &resources);
        Ok(engine::space_availability(date, &resources, &bookings))
    }

    /// Full pre-booking check for one space: bookable gate, past date,
    /// conflicts, minimum length, then a price.
    pub async fn check_booking(
        &self,
        resource_id: Ulid,
        date: NaiveDate,
        candidate: Span,
        exclude: Option<Ulid>,
        today: NaiveDate,
    ) -> Result<BookingCheck, EngineError> {
        let window = DateWindow::single(date);
        let (resources, bookings) = futures::try_join!(self.source.resources(), self.source.bookings_between(&window))?;
        let resource = resources
            .iter()
            .find(|r| r.id == resource_id)
            .ok_or(EngineError::NotFound(resource_id))?;
        let outcome = engine::check_booking(resource, date, today, &candidate, &bookings, exclude);
        debug!("booking check {resource_id} {date} {candidate}: {}", outcome.label());
        Ok(outcome)
    }
}
