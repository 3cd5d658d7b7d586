use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::limits::MAX_WINDOW_DAYS;

use super::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarView {
    Day,
    Week,
    Month,
}

impl FromStr for CalendarView {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(CalendarView::Day),
            "week" => Ok(CalendarView::Week),
            "month" => Ok(CalendarView::Month),
            _ => Err(EngineError::InvalidWindow("unknown calendar view")),
        }
    }
}

/// Inclusive date range `[start, end]` rendered by one calendar request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, EngineError> {
        if end < start {
            return Err(EngineError::InvalidWindow("end date before start date"));
        }
        if (end - start).num_days() + 1 > MAX_WINDOW_DAYS {
            return Err(EngineError::LimitExceeded("date window too wide"));
        }
        Ok(Self { start, end })
    }

    pub fn single(date: NaiveDate) -> Self {
        Self { start: date, end: date }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn len_days(&self) -> usize {
        ((self.end - self.start).num_days() + 1) as usize
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take(self.len_days())
    }
}

/// Window shown for `anchor`: the day itself, its Sunday-started week, or its month.
pub fn window_for(view: CalendarView, anchor: NaiveDate) -> Result<DateWindow, EngineError> {
    match view {
        CalendarView::Day => Ok(DateWindow::single(anchor)),
        CalendarView::Week => {
            let back = u64::from(anchor.weekday().num_days_from_sunday());
            let start = anchor
                .checked_sub_days(Days::new(back))
                .ok_or(EngineError::DateOutOfRange)?;
            let end = start
                .checked_add_days(Days::new(6))
                .ok_or(EngineError::DateOutOfRange)?;
            DateWindow::new(start, end)
        }
        CalendarView::Month => {
            let first = anchor.with_day(1).ok_or(EngineError::DateOutOfRange)?;
            let last = first
                .checked_add_months(Months::new(1))
                .and_then(|next| next.pred_opt())
                .ok_or(EngineError::DateOutOfRange)?;
            DateWindow::new(first, last)
        }
    }
}

/// Move the anchor one view-length forward (`direction > 0`) or back.
pub fn navigate(view: CalendarView, anchor: NaiveDate, direction: i32) -> Result<NaiveDate, EngineError> {
    let steps = direction.unsigned_abs();
    let moved = match (view, direction >= 0) {
        (CalendarView::Day, true) => anchor.checked_add_days(Days::new(u64::from(steps))),
        (CalendarView::Day, false) => anchor.checked_sub_days(Days::new(u64::from(steps))),
        (CalendarView::Week, true) => anchor.checked_add_days(Days::new(u64::from(steps) * 7)),
        (CalendarView::Week, false) => anchor.checked_sub_days(Days::new(u64::from(steps) * 7)),
        (CalendarView::Month, true) => anchor.checked_add_months(Months::new(steps)),
        (CalendarView::Month, false) => anchor.checked_sub_months(Months::new(steps)),
    };
    moved.ok_or(EngineError::DateOutOfRange)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn view_parsing() {
        assert_eq!("Week".parse::<CalendarView>().unwrap(), CalendarView::Week);
        assert_eq!(" day ".parse::<CalendarView>().unwrap(), CalendarView::Day);
        assert!("year".parse::<CalendarView>().is_err());
    }

    #[test]
    fn week_starts_on_sunday() {
        // 2025-01-15 is a Wednesday
        let w = window_for(CalendarView::Week, d(2025, 1, 15)).unwrap();
        assert_eq!(w.start(), d(2025, 1, 12));
        assert_eq!(w.end(), d(2025, 1, 18));
        assert_eq!(w.days().count(), 7);
    }

    #[test]
    fn week_of_a_sunday_starts_that_day() {
        let w = window_for(CalendarView::Week, d(2025, 1, 12)).unwrap();
        assert_eq!(w.start(), d(2025, 1, 12));
    }

    #[test]
    fn month_window_handles_leap_february() {
        let w = window_for(CalendarView::Month, d(2024, 2, 10)).unwrap();
        assert_eq!(w.start(), d(2024, 2, 1));
        assert_eq!(w.end(), d(2024, 2, 29));
        assert_eq!(w.len_days(), 29);
    }

    #[test]
    fn day_window_is_single_date() {
        let w = window_for(CalendarView::Day, d(2025, 3, 1)).unwrap();
        assert_eq!(w.days().collect::<Vec<_>>(), vec![d(2025, 3, 1)]);
    }

    #[test]
    fn window_bounds() {
        assert!(matches!(
            DateWindow::new(d(2025, 1, 2), d(2025, 1, 1)),
            Err(EngineError::InvalidWindow(_))
        ));
        assert!(matches!(
            DateWindow::new(d(2025, 1, 1), d(2025, 6, 1)),
            Err(EngineError::LimitExceeded(_))
        ));
        let w = DateWindow::new(d(2025, 1, 1), d(2025, 1, 3)).unwrap();
        assert!(w.contains(d(2025, 1, 3)));
        assert!(!w.contains(d(2025, 1, 4)));
    }

    #[test]
    fn navigation_steps() {
        let anchor = d(2025, 1, 31);
        assert_eq!(navigate(CalendarView::Day, anchor, 1).unwrap(), d(2025, 2, 1));
        assert_eq!(navigate(CalendarView::Week, anchor, -1).unwrap(), d(2025, 1, 24));
        assert_eq!(navigate(CalendarView::Month, anchor, 1).unwrap(), d(2025, 2, 28));
        assert_eq!(navigate(CalendarView::Month, anchor, -2).unwrap(), d(2024, 11, 30));
    }
}
