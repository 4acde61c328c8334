use chrono::{DateTime, Utc};
use eyre::{eyre, Result};
use priosync_core::models::{
    record::{FlatScheduleRecord, OwnerId},
    time::TimeOfDay,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAvailabilityRecord {
    pub id: Uuid,
    pub owner_id: String,
    pub start_minute: i32,
    pub end_minute: i32,
    pub duration_minutes: i32,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

impl DbAvailabilityRecord {
    pub fn new(record: &FlatScheduleRecord, position: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id: record.owner_id.to_string(),
            start_minute: i32::from(record.start.minutes()),
            end_minute: i32::from(record.end.minutes()),
            duration_minutes: record.duration_minutes as i32,
            position: position as i32,
            created_at: Utc::now(),
        }
    }
}

fn minute_of_day(value: i32) -> Option<TimeOfDay> {
    u16::try_from(value).ok().and_then(TimeOfDay::from_minutes)
}

impl TryFrom<&DbAvailabilityRecord> for FlatScheduleRecord {
    type Error = eyre::Report;

    fn try_from(row: &DbAvailabilityRecord) -> Result<Self> {
        let start = minute_of_day(row.start_minute)
            .ok_or_else(|| eyre!("Record {} has out-of-range start {}", row.id, row.start_minute))?;
        let end = minute_of_day(row.end_minute)
            .ok_or_else(|| eyre!("Record {} has out-of-range end {}", row.id, row.end_minute))?;

        Ok(FlatScheduleRecord {
            start,
            end,
            duration_minutes: u32::try_from(row.duration_minutes).unwrap_or(0),
            owner_id: OwnerId::new(row.owner_id.clone()),
        })
    }
}
