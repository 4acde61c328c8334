use std::collections::HashMap;

use async_trait::async_trait;
use eyre::Result;
use priosync_core::models::{
    record::{FlatScheduleRecord, OwnerId},
    schedule::WeeklySchedule,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    models::DbAvailabilityRecord,
    store::{FallbackCache, RecordStore},
};

/// Process-local [`RecordStore`]. Deleting an unknown id is not an error.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: RwLock<Vec<DbAvailabilityRecord>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a raw row as-is, bypassing any checks.
    pub async fn insert_raw(&self, row: DbAvailabilityRecord) {
        self.records.write().await.push(row);
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn list_records(&self, owner_id: &OwnerId) -> Result<Vec<DbAvailabilityRecord>> {
        let mut records: Vec<DbAvailabilityRecord> = self
            .records
            .read()
            .await
            .iter()
            .filter(|row| row.owner_id == owner_id.as_str())
            .cloned()
            .collect();
        records.sort_by_key(|row| (row.position, row.start_minute));
        Ok(records)
    }

    async fn delete_record(&self, id: Uuid) -> Result<()> {
        self.records.write().await.retain(|row| row.id != id);
        Ok(())
    }

    async fn create_record(
        &self,
        record: &FlatScheduleRecord,
        position: u32,
    ) -> Result<DbAvailabilityRecord> {
        let row = DbAvailabilityRecord::new(record, position);
        self.records.write().await.push(row.clone());
        Ok(row)
    }
}

/// Process-local [`FallbackCache`].
#[derive(Debug)]
pub struct InMemoryFallbackCache {
    name: &'static str,
    schedules: RwLock<HashMap<OwnerId, WeeklySchedule>>,
}

impl InMemoryFallbackCache {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            schedules: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_schedule(mut self, owner_id: OwnerId, schedule: WeeklySchedule) -> Self {
        self.schedules.get_mut().insert(owner_id, schedule);
        self
    }

    pub async fn get(&self, owner_id: &OwnerId) -> Option<WeeklySchedule> {
        self.schedules.read().await.get(owner_id).cloned()
    }
}

#[async_trait]
impl FallbackCache for InMemoryFallbackCache {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn read(&self, owner_id: &OwnerId) -> Result<Option<WeeklySchedule>> {
        Ok(self.get(owner_id).await)
    }

    async fn write(&self, owner_id: &OwnerId, schedule: &WeeklySchedule) -> Result<()> {
        self.schedules
            .write()
            .await
            .insert(owner_id.clone(), schedule.clone());
        Ok(())
    }
}
