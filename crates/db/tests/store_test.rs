use chrono::Utc;
use fake::{Fake, Faker};
use pretty_assertions::assert_eq;
use priosync_core::models::{
    record::{FlatScheduleRecord, OwnerId},
    schedule::WeeklySchedule,
    time::DayOfWeek,
    time_slot::TimeSlot,
};
use priosync_db::{
    memory::{InMemoryFallbackCache, InMemoryRecordStore},
    models::DbAvailabilityRecord,
    store::{FallbackCache, RecordStore},
};
use rstest::rstest;
use uuid::Uuid;

fn row(start_minute: i32, end_minute: i32) -> DbAvailabilityRecord {
    DbAvailabilityRecord {
        id: Uuid::new_v4(),
        owner_id: "student-1".to_string(),
        start_minute,
        end_minute,
        duration_minutes: end_minute - start_minute,
        position: 0,
        created_at: Utc::now(),
    }
}

#[rstest]
#[case(540, 720, true)]
#[case(0, 1439, true)]
#[case(-1, 60, false)]
#[case(600, 1440, false)]
fn test_row_conversion(#[case] start: i32, #[case] end: i32, #[case] ok: bool) {
    let result = FlatScheduleRecord::try_from(&row(start, end));
    assert_eq!(result.is_ok(), ok);
}

#[test]
fn test_row_conversion_keeps_owner_and_bounds() {
    let record = FlatScheduleRecord::try_from(&row(540, 720)).unwrap();

    assert_eq!(record.owner_id, OwnerId::new("student-1"));
    assert_eq!(record.start.to_string(), "09:00");
    assert_eq!(record.end.to_string(), "12:00");
    assert_eq!(record.duration_minutes, 180);
}

#[test]
fn test_new_row_from_record() {
    let owner = OwnerId::new(Faker.fake::<String>());
    let slot = TimeSlot::parse("14:00", "17:30").unwrap();
    let record = FlatScheduleRecord::from_slot(&slot, &owner);

    let row = DbAvailabilityRecord::new(&record, 4);

    assert_eq!(row.owner_id, owner.to_string());
    assert_eq!(row.start_minute, 840);
    assert_eq!(row.end_minute, 1050);
    assert_eq!(row.duration_minutes, 210);
    assert_eq!(row.position, 4);
}

#[tokio::test]
async fn test_in_memory_store_lists_in_position_order() {
    let store = InMemoryRecordStore::new();
    let owner = OwnerId::new("student-1");
    let late = FlatScheduleRecord::from_slot(&TimeSlot::parse("18:00", "19:00").unwrap(), &owner);
    let early = FlatScheduleRecord::from_slot(&TimeSlot::parse("07:00", "08:00").unwrap(), &owner);

    store.create_record(&late, 0).await.unwrap();
    store.create_record(&early, 1).await.unwrap();

    let listed = store.list_records(&owner).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].start_minute, 18 * 60);
    assert_eq!(listed[1].start_minute, 7 * 60);

    store.delete_record(listed[0].id).await.unwrap();
    store.delete_record(Uuid::new_v4()).await.unwrap();
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_in_memory_cache_read_write() {
    let owner = OwnerId::new("student-1");
    let mut schedule = WeeklySchedule::new();
    schedule
        .add_slot(DayOfWeek::Tuesday, TimeSlot::parse("10:00", "13:00").unwrap())
        .unwrap();

    let cache = InMemoryFallbackCache::new("attributes");
    assert_eq!(cache.name(), "attributes");
    assert_eq!(cache.read(&owner).await.unwrap(), None);

    cache.write(&owner, &schedule).await.unwrap();
    assert_eq!(cache.read(&owner).await.unwrap(), Some(schedule.clone()));

    let seeded = InMemoryFallbackCache::new("local").with_schedule(owner.clone(), schedule.clone());
    assert_eq!(seeded.get(&owner).await, Some(schedule));
}
