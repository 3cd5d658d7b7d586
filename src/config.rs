use std::path::PathBuf;

use chrono::NaiveDate;

use crate::engine::{CalendarFilter, CalendarView};
use crate::model::Minutes;

/// Shape of the calendar grid. Both hours are inclusive rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridConfig {
    pub start_hour: u32,
    pub end_hour: u32,
    pub slot_minutes: Minutes,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            start_hour: 8,
            end_hour: 21,
            slot_minutes: 30,
        }
    }
}

impl GridConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            start_hour: env_parse("SPACECAL_DAY_START_HOUR").unwrap_or(defaults.start_hour),
            end_hour: env_parse("SPACECAL_DAY_END_HOUR").unwrap_or(defaults.end_hour),
            slot_minutes: env_parse("SPACECAL_SLOT_MINUTES").unwrap_or(defaults.slot_minutes),
        }
    }
}

/// Settings for the `spacecal` binary.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_path: PathBuf,
    pub view: CalendarView,
    /// Anchor date; `None` means today.
    pub date: Option<NaiveDate>,
    pub metrics_port: Option<u16>,
    pub grid: GridConfig,
    pub filter: CalendarFilter,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            data_path: std::env::var("SPACECAL_DATA")
                .unwrap_or_else(|_| "./data/calendar.json".into())
                .into(),
            view: env_parse("SPACECAL_VIEW").unwrap_or(CalendarView::Week),
            date: env_parse("SPACECAL_DATE"),
            metrics_port: env_parse("SPACECAL_METRICS_PORT"),
            grid: GridConfig::from_env(),
            filter: CalendarFilter {
                location: env_nonempty("SPACECAL_LOCATION"),
                space_type: env_nonempty("SPACECAL_SPACE_TYPE"),
                space: env_parse("SPACECAL_SPACE"),
            },
        }
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Unset or unparsable values fall back to the default, with a warning for the latter.
fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    let parsed = raw.parse().ok();
    if parsed.is_none() {
        tracing::warn!("ignoring unparsable {key}={raw:?}");
    }
    parsed
}
