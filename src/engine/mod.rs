mod admission;
mod availability;
mod calendar;
mod conflict;
mod error;
mod filter;
mod grid;
mod occupancy;
mod pricing;
mod status;
mod subscription;
mod window;

pub use admission::{BookingCheck, check_booking};
pub use availability::{
    AvailabilityResult, BusySlot, FreeSlots, SpaceAvailability, check_availability, check_availability_excluding,
    enumerate_free_slots, space_availability,
};
pub use calendar::{CalendarSnapshot, CellView, Column, Row, build_calendar};
pub use error::EngineError;
pub use filter::CalendarFilter;
pub use grid::{SlotGrid, generate_slots};
pub use occupancy::{Cell, CellKey, OccupancyMap, SkipReason, SkippedBooking, resolve_occupancy};
pub use pricing::{Quote, RateType, overtime_charge, price, quote};
pub use status::{BookingAction, DisplayStatus, available_actions, effective_status, expiry_deadline};
pub use subscription::{
    ConversionPlan, PaymentFrequency, SubscriptionPeriod, SubscriptionType, derive_end_date, plan_conversion,
};
pub use window::{CalendarView, DateWindow, navigate, window_for};
