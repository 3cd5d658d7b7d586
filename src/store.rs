use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::engine::{DateWindow, EngineError};
use crate::model::*;

/// Where the calendar gets its spaces and bookings from.
#[async_trait]
pub trait BookingSource: Send + Sync {
    /// All bookable spaces, ordered by name.
    async fn resources(&self) -> Result<Vec<Resource>, EngineError>;

    /// Bookings dated inside `window`, ordered by `(date, start, id)`.
    async fn bookings_between(&self, window: &DateWindow) -> Result<Vec<Booking>, EngineError>;
}

#[async_trait]
impl<T: BookingSource + ?Sized> BookingSource for Arc<T> {
    async fn resources(&self) -> Result<Vec<Resource>, EngineError> {
        (**self).resources().await
    }

    async fn bookings_between(&self, window: &DateWindow) -> Result<Vec<Booking>, EngineError> {
        (**self).bookings_between(window).await
    }
}

/// On-disk dataset: `{"resources": [...], "bookings": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub bookings: Vec<Booking>,
}

pub struct InMemoryStore {
    resources: DashMap<Ulid, Resource>,
    bookings: DashMap<Ulid, Booking>,
    by_date: DashMap<NaiveDate, Vec<Ulid>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            resources: DashMap::new(),
            bookings: DashMap::new(),
            by_date: DashMap::new(),
        }
    }

    pub fn from_dataset(dataset: Dataset) -> Self {
        let store = Self::new();
        for r in dataset.resources {
            store.insert_resource(r);
        }
        for b in dataset.bookings {
            store.upsert_booking(b);
        }
        store
    }

    // ── Resources ────────────────────────────────────────────

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    pub fn insert_resource(&self, resource: Resource) {
        self.resources.insert(resource.id, resource);
    }

    pub fn resource(&self, id: &Ulid) -> Option<Resource> {
        self.resources.get(id).map(|e| e.value().clone())
    }

    // ── Bookings ─────────────────────────────────────────────

    pub fn booking_count(&self) -> usize {
        self.bookings.len()
    }

    pub fn booking(&self, id: &Ulid) -> Option<Booking> {
        self.bookings.get(id).map(|e| e.value().clone())
    }

    /// Insert or replace a booking. Returns the previous version, if any.
    pub fn upsert_booking(&self, booking: Booking) -> Option<Booking> {
        let (id, date) = (booking.id, booking.date);
        let previous = self.bookings.insert(id, booking);
        let old_date = previous.as_ref().map(|b| b.date);
        if old_date != Some(date) {
            if let Some(old) = old_date {
                self.unindex(old, &id);
            }
            self.by_date.entry(date).or_default().push(id);
        }
        previous
    }

    pub fn remove_booking(&self, id: &Ulid) -> Option<Booking> {
        let (_, removed) = self.bookings.remove(id)?;
        self.unindex(removed.date, id);
        Some(removed)
    }

    /// Move a booking along its lifecycle. The stored status only changes if
    /// the transition is allowed.
    pub fn set_status(&self, id: &Ulid, next: BookingStatus) -> Result<BookingStatus, EngineError> {
        let mut entry = self.bookings.get_mut(id).ok_or(EngineError::NotFound(*id))?;
        entry.status = entry.status.transition(next)?;
        Ok(entry.status)
    }

    fn unindex(&self, date: NaiveDate, id: &Ulid) {
        if let Some(mut ids) = self.by_date.get_mut(&date) {
            ids.retain(|b| b != id);
        }
    }

    fn resources_sorted(&self) -> Vec<Resource> {
        let mut out: Vec<Resource> = self.resources.iter().map(|e| e.value().clone()).collect();
        out.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        out
    }

    fn bookings_in(&self, window: &DateWindow) -> Vec<Booking> {
        let mut out = Vec::new();
        for date in window.days() {
            let Some(ids) = self.by_date.get(&date).map(|e| e.value().clone()) else {
                continue;
            };
            out.extend(ids.iter().filter_map(|id| self.booking(id)));
        }
        out.sort_by(|a, b| (a.date, a.start, a.id).cmp(&(b.date, b.start, b.id)));
        out
    }

    pub fn to_dataset(&self) -> Dataset {
        let mut bookings: Vec<Booking> = self.bookings.iter().map(|e| e.value().clone()).collect();
        bookings.sort_by(|a, b| (a.date, a.start, a.id).cmp(&(b.date, b.start, b.id)));
        Dataset {
            resources: self.resources_sorted(),
            bookings,
        }
    }
}

#[async_trait]
impl BookingSource for InMemoryStore {
    async fn resources(&self) -> Result<Vec<Resource>, EngineError> {
        Ok(self.resources_sorted())
    }

    async fn bookings_between(&self, window: &DateWindow) -> Result<Vec<Booking>, EngineError> {
        Ok(self.bookings_in(window))
    }
}
