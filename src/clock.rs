//! Time-of-day parsing and formatting.
//!
//! The booking store hands out times as `HH:MM` or `HH:MM:SS` strings; the
//! core works in [`Minutes`]. Seconds are truncated.

use crate::engine::EngineError;
use crate::model::{MINUTES_PER_DAY, Minutes};

/// Parse `HH:MM` or `HH:MM:SS`. `24:00` is accepted as end-of-day.
pub fn parse_hhmm(s: &str) -> Result<Minutes, EngineError> {
    let invalid = || EngineError::InvalidTime(s.to_string());
    let mut parts = s.trim().split(':');
    let hour: Minutes = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
    let minute: Minutes = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
    if let Some(sec) = parts.next() {
        let sec: f64 = sec.parse().map_err(|_| invalid())?;
        if !(0.0..60.0).contains(&sec) {
            return Err(invalid());
        }
    }
    if parts.next().is_some() || hour > 24 || minute >= 60 {
        return Err(invalid());
    }
    let total = hour * 60 + minute;
    if total > MINUTES_PER_DAY {
        return Err(invalid());
    }
    Ok(total)
}

pub fn format_hhmm(t: Minutes) -> String {
    format!("{:02}:{:02}", t / 60, t % 60)
}

/// Row label for the calendar grid, e.g. `8:00 AM`, `12:30 PM`, `9:30 PM`.
pub fn label_12h(t: Minutes) -> String {
    let hour = (t / 60) % 24;
    let minute = t % 60;
    let (display_hour, suffix) = match hour {
        0 => (12, "AM"),
        1..=11 => (hour, "AM"),
        12 => (12, "PM"),
        _ => (hour - 12, "PM"),
    };
    format!("{display_hour}:{minute:02} {suffix}")
}

/// Serde adapter for [`Minutes`] fields stored as clock strings.
pub mod hhmm {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::model::Minutes;

    pub fn serialize<S: Serializer>(t: &Minutes, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_hhmm(*t))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Minutes, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_hhmm(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_store_formats() {
        assert_eq!(parse_hhmm("08:00").unwrap(), 480);
        assert_eq!(parse_hhmm("21:30:00").unwrap(), 1290);
        assert_eq!(parse_hhmm("9:05").unwrap(), 545);
        assert_eq!(parse_hhmm("10:15:59.5").unwrap(), 615);
        assert_eq!(parse_hhmm("24:00").unwrap(), MINUTES_PER_DAY);
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "10", "10:60", "24:01", "ab:cd", "10:00:61", "10:00:00:00"] {
            assert!(
                matches!(parse_hhmm(bad), Err(EngineError::InvalidTime(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn formats_zero_padded() {
        assert_eq!(format_hhmm(0), "00:00");
        assert_eq!(format_hhmm(545), "09:05");
        assert_eq!(format_hhmm(MINUTES_PER_DAY), "24:00");
    }

    #[test]
    fn twelve_hour_labels() {
        assert_eq!(label_12h(480), "8:00 AM");
        assert_eq!(label_12h(720), "12:00 PM");
        assert_eq!(label_12h(750), "12:30 PM");
        assert_eq!(label_12h(1290), "9:30 PM");
        assert_eq!(label_12h(30), "12:30 AM");
    }
}
