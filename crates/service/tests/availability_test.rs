use std::sync::{Arc, Mutex};

use eyre::eyre;
use mockall::Sequence;
use pretty_assertions::assert_eq;
use priosync_core::{
    aggregator::aggregate,
    errors::{PersistPhase, ScheduleError},
    models::{
        record::OwnerId,
        schedule::WeeklySchedule,
        time::DayOfWeek,
        time_slot::{RawTimeSlot, TimeSlot},
    },
    reconciler::{self, ScheduleSource},
};
use priosync_db::{
    memory::{InMemoryFallbackCache, InMemoryRecordStore},
    mock::repositories::{MockAvailabilityStore, MockLegacyCache},
    replace,
    store::RecordStore,
};
use priosync_service::{AvailabilityService, MigrationOutcome};

fn owner() -> OwnerId {
    OwnerId::new("student-1")
}

fn tuesday_morning() -> WeeklySchedule {
    aggregate(vec![(
        DayOfWeek::Tuesday,
        vec![RawTimeSlot::new("10:00", "13:00")],
    )])
    .unwrap()
    .0
}

fn monday_and_wednesday() -> WeeklySchedule {
    aggregate(vec![
        (DayOfWeek::Monday, vec![RawTimeSlot::new("09:00", "12:00")]),
        (DayOfWeek::Wednesday, vec![RawTimeSlot::new("14:00", "17:00")]),
    ])
    .unwrap()
    .0
}

fn slot(start: &str, end: &str) -> TimeSlot {
    TimeSlot::parse(start, end).unwrap()
}

#[test_log::test(tokio::test)]
async fn test_load_empty_owner() {
    let service = AvailabilityService::new(Arc::new(InMemoryRecordStore::new()))
        .with_fallback(Arc::new(InMemoryFallbackCache::new("local")));

    let loaded = service.load(&owner()).await.unwrap();

    assert_eq!(loaded.source, ScheduleSource::Empty);
    assert_eq!(loaded.tier, None);
    assert!(loaded.schedule.is_empty());
}

#[test_log::test(tokio::test)]
async fn test_load_prefers_fallback_over_store() {
    let store = Arc::new(InMemoryRecordStore::new());
    replace(&*store, &owner(), &monday_and_wednesday())
        .await
        .unwrap();
    let cache = InMemoryFallbackCache::new("local").with_schedule(owner(), tuesday_morning());

    let service = AvailabilityService::new(store).with_fallback(Arc::new(cache));
    let loaded = service.load(&owner()).await.unwrap();

    assert_eq!(loaded.schedule, tuesday_morning());
    assert_eq!(loaded.source, ScheduleSource::Fallback);
    assert_eq!(loaded.tier, Some("local"));
    assert_eq!(loaded.stored_records, 2);
}

#[test_log::test(tokio::test)]
async fn test_load_uses_first_non_empty_tier() {
    let attributes =
        InMemoryFallbackCache::new("attributes").with_schedule(owner(), WeeklySchedule::new());
    let local = InMemoryFallbackCache::new("local").with_schedule(owner(), tuesday_morning());

    let service = AvailabilityService::new(Arc::new(InMemoryRecordStore::new()))
        .with_fallback(Arc::new(attributes))
        .with_fallback(Arc::new(local));

    let loaded = service.load(&owner()).await.unwrap();

    assert_eq!(service.fallback_names(), vec!["attributes", "local"]);
    assert_eq!(loaded.tier, Some("local"));
    assert_eq!(loaded.schedule, tuesday_morning());
}

#[test_log::test(tokio::test)]
async fn test_load_degrades_without_fallback() {
    let store = Arc::new(InMemoryRecordStore::new());
    replace(&*store, &owner(), &monday_and_wednesday())
        .await
        .unwrap();

    let service = AvailabilityService::new(store);
    let loaded = service.load(&owner()).await.unwrap();

    assert_eq!(loaded.source, ScheduleSource::Authoritative);
    assert!(loaded.schedule.is_degraded());
    assert_eq!(loaded.schedule.total_minutes(), 360);
    assert_eq!(
        loaded.schedule,
        reconciler::reconstruct(&reconciler::flatten(&monday_and_wednesday(), &owner()))
    );
}

#[test_log::test(tokio::test)]
async fn test_load_skips_failing_tier() {
    let mut broken = MockLegacyCache::new();
    broken.expect_name().return_const("attributes");
    broken
        .expect_read()
        .times(1)
        .returning(|_| Err(eyre!("attribute too large")));
    let local = InMemoryFallbackCache::new("local").with_schedule(owner(), tuesday_morning());

    let service = AvailabilityService::new(Arc::new(InMemoryRecordStore::new()))
        .with_fallback(Arc::new(broken))
        .with_fallback(Arc::new(local));

    let loaded = service.load(&owner()).await.unwrap();

    assert_eq!(loaded.tier, Some("local"));
}

#[test_log::test(tokio::test)]
async fn test_load_propagates_store_failure() {
    let mut store = MockAvailabilityStore::new();
    store
        .expect_list_records()
        .returning(|_| Err(eyre!("store unreachable")));

    let service = AvailabilityService::new(Arc::new(store));
    let err = service.load(&owner()).await.unwrap_err();

    assert!(matches!(err, ScheduleError::Storage(_)));
}

#[test_log::test(tokio::test)]
async fn test_save_replaces_and_refreshes_tiers() {
    let store = Arc::new(InMemoryRecordStore::new());
    let local = Arc::new(InMemoryFallbackCache::new("local"));
    let service = AvailabilityService::new(store.clone()).with_fallback(local.clone());

    let report = service.save(&owner(), &monday_and_wednesday()).await.unwrap();
    assert_eq!(report.written, 2);

    let report = service.save(&owner(), &tuesday_morning()).await.unwrap();
    assert_eq!(report.deleted, 2);
    assert_eq!(report.written, 1);

    assert_eq!(store.list_records(&owner()).await.unwrap().len(), 1);
    assert_eq!(local.get(&owner()).await, Some(tuesday_morning()));
    assert_eq!(service.load(&owner()).await.unwrap().schedule, tuesday_morning());
}

fn friday_afternoon() -> WeeklySchedule {
    aggregate(vec![(
        DayOfWeek::Friday,
        vec![RawTimeSlot::new("15:00", "18:00")],
    )])
    .unwrap()
    .0
}

#[test_log::test(tokio::test)]
async fn test_save_fails_when_tier_cannot_be_refreshed() {
    let cached = Arc::new(Mutex::new(Some(tuesday_morning())));
    let mut seq = Sequence::new();
    let mut cache = MockLegacyCache::new();
    cache.expect_name().return_const("attributes");
    let reader = cached.clone();
    cache
        .expect_read()
        .returning(move |_| Ok(reader.lock().unwrap().clone()));
    cache
        .expect_write()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Err(eyre!("read-only attribute")));
    let writer = cached.clone();
    cache
        .expect_write()
        .times(1)
        .in_sequence(&mut seq)
        .returning(move |_, schedule| {
            *writer.lock().unwrap() = Some(schedule.clone());
            Ok(())
        });

    let store = Arc::new(InMemoryRecordStore::new());
    let service = AvailabilityService::new(store.clone()).with_fallback(Arc::new(cache));

    let err = service.save(&owner(), &friday_afternoon()).await.unwrap_err();
    assert!(matches!(
        err,
        ScheduleError::Persistence(ref failure) if failure.phase == PersistPhase::Write
    ));
    assert_eq!(store.list_records(&owner()).await.unwrap().len(), 1);

    let report = service.save(&owner(), &friday_afternoon()).await.unwrap();
    assert_eq!(report.deleted, 1);
    assert_eq!(report.written, 1);

    let loaded = service.load(&owner()).await.unwrap();
    assert_eq!(loaded.schedule, friday_afternoon());
    assert_eq!(loaded.tier, Some("attributes"));
}

#[test_log::test(tokio::test)]
async fn test_save_reports_persistence_failure() {
    let mut store = MockAvailabilityStore::new();
    store.expect_list_records().returning(|_| Ok(Vec::new()));
    store
        .expect_create_record()
        .returning(|_, _| Err(eyre!("write capacity exceeded")));
    let mut cache = MockLegacyCache::new();
    cache.expect_write().never();

    let service = AvailabilityService::new(Arc::new(store)).with_fallback(Arc::new(cache));
    let err = service.save(&owner(), &tuesday_morning()).await.unwrap_err();

    assert!(matches!(
        err,
        ScheduleError::Persistence(ref failure) if failure.phase == PersistPhase::Write
    ));
}

#[test_log::test(tokio::test)]
async fn test_save_days_validates_before_writing() {
    let store = Arc::new(InMemoryRecordStore::new());
    let service = AvailabilityService::new(store.clone());

    let err = service
        .save_days(
            &owner(),
            vec![(
                DayOfWeek::Monday,
                vec![
                    RawTimeSlot::new("09:00", "12:00"),
                    RawTimeSlot::new("11:00", "13:00"),
                ],
            )],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ScheduleError::Aggregate(_)));
    assert!(store.is_empty().await);

    let (report, total) = service
        .save_days(
            &owner(),
            vec![
                (DayOfWeek::Monday, vec![RawTimeSlot::new("09:00", "12:00")]),
                (DayOfWeek::Wednesday, vec![RawTimeSlot::new("14:00", "17:00")]),
            ],
        )
        .await
        .unwrap();
    assert_eq!(total, 360);
    assert_eq!(report.written, 2);
}

#[test_log::test(tokio::test)]
async fn test_add_and_remove_slot() {
    let local = Arc::new(InMemoryFallbackCache::new("local"));
    let service = AvailabilityService::new(Arc::new(InMemoryRecordStore::new()))
        .with_fallback(local.clone());
    service.save(&owner(), &tuesday_morning()).await.unwrap();

    let updated = service
        .add_slot(&owner(), DayOfWeek::Tuesday, slot("13:00", "14:00"))
        .await
        .unwrap();
    assert_eq!(
        updated.slots_for(DayOfWeek::Tuesday),
        &[slot("10:00", "13:00"), slot("13:00", "14:00")]
    );

    let err = service
        .add_slot(&owner(), DayOfWeek::Tuesday, slot("12:00", "15:00"))
        .await
        .unwrap_err();
    assert!(matches!(err, ScheduleError::Normalize(_)));

    assert!(
        service
            .remove_slot(&owner(), DayOfWeek::Tuesday, &slot("10:00", "13:00"))
            .await
            .unwrap()
    );
    assert!(
        !service
            .remove_slot(&owner(), DayOfWeek::Friday, &slot("10:00", "13:00"))
            .await
            .unwrap()
    );

    let current = local.get(&owner()).await.unwrap();
    assert_eq!(current.slots_for(DayOfWeek::Tuesday), &[slot("13:00", "14:00")]);
}

#[test_log::test(tokio::test)]
async fn test_remove_slot_from_degraded_schedule() {
    let store = Arc::new(InMemoryRecordStore::new());
    replace(&*store, &owner(), &monday_and_wednesday())
        .await
        .unwrap();
    let service = AvailabilityService::new(store.clone());

    assert!(
        service
            .remove_slot(&owner(), DayOfWeek::Monday, &slot("09:00", "12:00"))
            .await
            .unwrap()
    );

    let loaded = service.load(&owner()).await.unwrap();
    assert_eq!(loaded.schedule.unassigned(), &[slot("14:00", "17:00")]);
    assert_eq!(loaded.stored_records, 1);
}

#[test_log::test(tokio::test)]
async fn test_migrate_legacy_once() {
    let store = Arc::new(InMemoryRecordStore::new());
    let legacy = InMemoryFallbackCache::new("attributes").with_schedule(owner(), monday_and_wednesday());
    let service = AvailabilityService::new(store.clone()).with_fallback(Arc::new(legacy));

    let first = service.migrate_legacy(&owner()).await.unwrap();
    let MigrationOutcome::Migrated { tier, report } = first else {
        panic!("expected a migration, got {first:?}");
    };
    assert_eq!(tier, "attributes");
    assert_eq!(report.written, 2);

    let second = service.migrate_legacy(&owner()).await.unwrap();
    assert_eq!(second, MigrationOutcome::AlreadyMigrated { records: 2 });
    assert_eq!(store.list_records(&owner()).await.unwrap().len(), 2);
}

#[test_log::test(tokio::test)]
async fn test_migrate_legacy_nothing_cached() {
    let service = AvailabilityService::new(Arc::new(InMemoryRecordStore::new()))
        .with_fallback(Arc::new(InMemoryFallbackCache::new("local")));

    let outcome = service.migrate_legacy(&owner()).await.unwrap();

    assert_eq!(outcome, MigrationOutcome::NothingToMigrate);
}
