use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{errors::SlotError, models::time::TimeOfDay, validator};

/// A slot exactly as a caller or a cached blob supplied it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTimeSlot {
    pub start: String,
    pub end: String,
}

impl RawTimeSlot {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

impl From<TimeSlot> for RawTimeSlot {
    fn from(slot: TimeSlot) -> Self {
        Self {
            start: slot.start.to_string(),
            end: slot.end.to_string(),
        }
    }
}

/// A contiguous range within one day. `start < end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTimeSlot")]
pub struct TimeSlot {
    start: TimeOfDay,
    end: TimeOfDay,
}

impl TimeSlot {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Result<Self, SlotError> {
        if end == start {
            return Err(SlotError::ZeroLength(start));
        }
        if end < start {
            return Err(SlotError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn parse(start: &str, end: &str) -> Result<Self, SlotError> {
        validator::validate(&RawTimeSlot::new(start, end))
    }

    pub fn start(&self) -> TimeOfDay {
        self.start
    }

    pub fn end(&self) -> TimeOfDay {
        self.end
    }

    pub fn duration_minutes(&self) -> u32 {
        u32::from(self.end.minutes() - self.start.minutes())
    }

    /// Touching slots (`a.end == b.start`) do not overlap.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl TryFrom<RawTimeSlot> for TimeSlot {
    type Error = SlotError;

    fn try_from(raw: RawTimeSlot) -> Result<Self, Self::Error> {
        validator::validate(&raw)
    }
}
