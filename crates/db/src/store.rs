//! # Storage collaborators
//!
//! The two external collaborators of the availability core:
//!
//! - [`RecordStore`]: the authoritative store of flat, weekday-less records.
//!   It offers independent list/delete/create calls and no transactions.
//! - [`FallbackCache`]: a legacy store of whole day-keyed schedules, read
//!   only when it can add fidelity the authoritative store lacks.
//!
//! Every failure is an `eyre::Report`; callers decide how to classify it.

use async_trait::async_trait;
use eyre::Result;
use priosync_core::models::{
    record::{FlatScheduleRecord, OwnerId},
    schedule::WeeklySchedule,
};
use tracing::debug;
use uuid::Uuid;

use crate::{models::DbAvailabilityRecord, repositories::availability_record, DbPool};

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every record of the owner, in stored position order.
    async fn list_records(&self, owner_id: &OwnerId) -> Result<Vec<DbAvailabilityRecord>>;

    async fn delete_record(&self, id: Uuid) -> Result<()>;

    async fn create_record(
        &self,
        record: &FlatScheduleRecord,
        position: u32,
    ) -> Result<DbAvailabilityRecord>;
}

#[async_trait]
pub trait FallbackCache: Send + Sync {
    /// Short name used in logs (e.g. `"attributes"`, `"local"`).
    fn name(&self) -> &'static str;

    /// `Ok(None)` when nothing is cached for the owner.
    async fn read(&self, owner_id: &OwnerId) -> Result<Option<WeeklySchedule>>;

    async fn write(&self, owner_id: &OwnerId, schedule: &WeeklySchedule) -> Result<()>;
}

/// PostgreSQL-backed [`RecordStore`].
#[derive(Debug, Clone)]
pub struct PgRecordStore {
    pool: DbPool,
}

impl PgRecordStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn list_records(&self, owner_id: &OwnerId) -> Result<Vec<DbAvailabilityRecord>> {
        debug!("Listing availability records: owner={}", owner_id);
        availability_record::get_availability_records_by_owner(&self.pool, owner_id.as_str()).await
    }

    async fn delete_record(&self, id: Uuid) -> Result<()> {
        debug!("Deleting availability record: id={}", id);
        availability_record::delete_availability_record(&self.pool, id).await
    }

    async fn create_record(
        &self,
        record: &FlatScheduleRecord,
        position: u32,
    ) -> Result<DbAvailabilityRecord> {
        let row = DbAvailabilityRecord::new(record, position);
        debug!(
            "Creating availability record: id={}, owner={}, start={}, end={}",
            row.id, record.owner_id, record.start, record.end
        );
        availability_record::create_availability_record(&self.pool, &row).await
    }
}
