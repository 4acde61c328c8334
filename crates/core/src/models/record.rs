use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    errors::SlotError,
    models::{time::TimeOfDay, time_slot::TimeSlot},
};

/// Identifier of the single user who owns a schedule.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OwnerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for OwnerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One slot as persisted by the authoritative store, without its weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatScheduleRecord {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub duration_minutes: u32,
    pub owner_id: OwnerId,
}

impl FlatScheduleRecord {
    /// Builds a record whose duration is derived from the slot.
    pub fn from_slot(slot: &TimeSlot, owner_id: &OwnerId) -> Self {
        Self {
            start: slot.start(),
            end: slot.end(),
            duration_minutes: slot.duration_minutes(),
            owner_id: owner_id.clone(),
        }
    }

    /// The stored `duration_minutes` is ignored.
    pub fn slot(&self) -> Result<TimeSlot, SlotError> {
        TimeSlot::new(self.start, self.end)
    }
}
