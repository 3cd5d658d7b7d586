use crate::config::GridConfig;
use crate::limits::MAX_SLOT_MINUTES;
use crate::model::{MINUTES_PER_DAY, Minutes, Span};

use super::EngineError;

/// Fixed-granularity slot starts for one calendar column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotGrid {
    step: Minutes,
    times: Vec<Minutes>,
}

/// Every `step`-aligned instant from `start_hour:00` up to, but excluding,
/// `(end_hour + 1):00`. Both hours are inclusive rows of the calendar, so
/// `(8, 21, 30)` gives 08:00 through 21:30.
pub fn generate_slots(start_hour: u32, end_hour: u32, step: Minutes) -> Result<SlotGrid, EngineError> {
    if step == 0 {
        return Err(EngineError::InvalidGrid("slot step must be positive"));
    }
    if step > MAX_SLOT_MINUTES {
        return Err(EngineError::InvalidGrid("slot step too coarse"));
    }
    if end_hour > 23 {
        return Err(EngineError::InvalidGrid("end hour must be at most 23"));
    }
    if start_hour > end_hour {
        return Err(EngineError::InvalidGrid("start hour after end hour"));
    }

    let first = start_hour * 60;
    let limit = (end_hour + 1) * 60;
    let times = (first..limit).step_by(step as usize).collect();
    Ok(SlotGrid { step, times })
}

impl SlotGrid {
    pub fn from_config(config: &GridConfig) -> Result<Self, EngineError> {
        generate_slots(config.start_hour, config.end_hour, config.slot_minutes)
    }

    pub fn step(&self) -> Minutes {
        self.step
    }

    pub fn times(&self) -> &[Minutes] {
        &self.times
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Opening hours covered by the grid: first slot start to last slot end.
    pub fn hours(&self) -> Result<Span, EngineError> {
        let (Some(&first), Some(&last)) = (self.times.first(), self.times.last()) else {
            return Err(EngineError::InvalidGrid("empty grid"));
        };
        Span::new(first, (last + self.step).min(MINUTES_PER_DAY))
    }

    /// Index of the slot starting exactly at `t`.
    pub fn position(&self, t: Minutes) -> Option<usize> {
        self.times.binary_search(&t).ok()
    }

    /// Grid cells a span of `duration` minutes occupies, rounded up.
    pub fn rowspan(&self, duration: Minutes) -> u32 {
        duration.div_ceil(self.step)
    }
}
