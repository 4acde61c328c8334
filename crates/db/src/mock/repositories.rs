use async_trait::async_trait;
use mockall::mock;
use priosync_core::models::{
    record::{FlatScheduleRecord, OwnerId},
    schedule::WeeklySchedule,
};
use uuid::Uuid;

use crate::{
    models::DbAvailabilityRecord,
    store::{FallbackCache, RecordStore},
};

// Mock collaborators for testing
mock! {
    pub AvailabilityStore {}

    #[async_trait]
    impl RecordStore for AvailabilityStore {
        async fn list_records(
            &self,
            owner_id: &OwnerId,
        ) -> eyre::Result<Vec<DbAvailabilityRecord>>;

        async fn delete_record(&self, id: Uuid) -> eyre::Result<()>;

        async fn create_record(
            &self,
            record: &FlatScheduleRecord,
            position: u32,
        ) -> eyre::Result<DbAvailabilityRecord>;
    }
}

mock! {
    pub LegacyCache {}

    #[async_trait]
    impl FallbackCache for LegacyCache {
        fn name(&self) -> &'static str;

        async fn read(&self, owner_id: &OwnerId) -> eyre::Result<Option<WeeklySchedule>>;

        async fn write(
            &self,
            owner_id: &OwnerId,
            schedule: &WeeklySchedule,
        ) -> eyre::Result<()>;
    }
}
