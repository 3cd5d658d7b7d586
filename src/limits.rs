use crate::model::Minutes;

/// Longest calendar window a single request may render (a month view plus slack).
pub const MAX_WINDOW_DAYS: i64 = 62;

/// Coarsest slot granularity accepted for a grid.
pub const MAX_SLOT_MINUTES: Minutes = 240;

/// Days before an unconverted draft booking is flagged as expired.
pub const DEFAULT_EXPIRY_DAYS: u64 = 7;

/// Overtime is billed at this multiple of the hourly rate (tenths).
pub const OVERTIME_MULTIPLIER_TENTHS: i64 = 15;

/// Bookings at least this long are priced at the space's daily rate, when it has one.
pub const DAILY_RATE_MIN_MINUTES: Minutes = 8 * 60;
