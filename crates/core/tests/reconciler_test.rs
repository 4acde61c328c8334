use fake::{Fake, Faker};
use pretty_assertions::{assert_eq, assert_ne};
use priosync_core::{
    aggregator::aggregate,
    models::{
        record::{FlatScheduleRecord, OwnerId},
        schedule::WeeklySchedule,
        time::{DayOfWeek, TimeOfDay},
        time_slot::{RawTimeSlot, TimeSlot},
    },
    reconciler::{choose_source, flatten, reconcile, reconstruct, ScheduleSource},
};

fn owner() -> OwnerId {
    OwnerId::new(Faker.fake::<String>())
}

fn schedule(days: Vec<(DayOfWeek, Vec<(&str, &str)>)>) -> WeeklySchedule {
    let input = days
        .into_iter()
        .map(|(day, slots)| {
            let raw = slots
                .into_iter()
                .map(|(start, end)| RawTimeSlot::new(start, end))
                .collect();
            (day, raw)
        })
        .collect::<Vec<_>>();
    aggregate(input).expect("valid schedule").0
}

#[test]
fn test_flatten_orders_by_day_then_start() {
    let owner = owner();
    let week = schedule(vec![
        (DayOfWeek::Wednesday, vec![("14:00", "17:00")]),
        (DayOfWeek::Monday, vec![("13:00", "14:00"), ("09:00", "12:00")]),
    ]);

    let records = flatten(&week, &owner);

    let bounds: Vec<(String, String)> = records
        .iter()
        .map(|r| (r.start.to_string(), r.end.to_string()))
        .collect();
    assert_eq!(
        bounds,
        vec![
            ("09:00".to_string(), "12:00".to_string()),
            ("13:00".to_string(), "14:00".to_string()),
            ("14:00".to_string(), "17:00".to_string()),
        ]
    );
    assert!(records.iter().all(|r| r.owner_id == owner));
    assert_eq!(
        records.iter().map(|r| r.duration_minutes).collect::<Vec<_>>(),
        vec![180, 60, 180]
    );
}

#[test]
fn test_reconstruct_groups_everything_as_unassigned() {
    let owner = owner();
    let week = schedule(vec![
        (DayOfWeek::Monday, vec![("09:00", "12:00")]),
        (DayOfWeek::Tuesday, vec![("09:00", "12:00")]),
        (DayOfWeek::Friday, vec![("07:00", "08:00")]),
    ]);

    let rebuilt = reconstruct(&flatten(&week, &owner));

    assert_ne!(rebuilt, week);
    assert!(rebuilt.is_degraded());
    assert_eq!(rebuilt.days().count(), 0);
    assert_eq!(rebuilt.unassigned().len(), 3);
    assert_eq!(rebuilt.unassigned()[0], TimeSlot::parse("07:00", "08:00").unwrap());
    assert_eq!(rebuilt.total_minutes(), week.total_minutes());
}

#[test]
fn test_reconstruct_ignores_stored_duration_and_skips_bad_records() {
    let owner = owner();
    let good = FlatScheduleRecord {
        start: TimeOfDay::parse("10:00").unwrap(),
        end: TimeOfDay::parse("11:00").unwrap(),
        duration_minutes: 999,
        owner_id: owner.clone(),
    };
    let inverted = FlatScheduleRecord {
        start: TimeOfDay::parse("12:00").unwrap(),
        end: TimeOfDay::parse("11:00").unwrap(),
        duration_minutes: 60,
        owner_id: owner,
    };

    let rebuilt = reconstruct(&[good, inverted]);

    assert_eq!(rebuilt.slot_count(), 1);
    assert_eq!(rebuilt.total_minutes(), 60);
}

#[test]
fn test_reconcile_prefers_fallback() {
    let owner = owner();
    let fallback = schedule(vec![(DayOfWeek::Tuesday, vec![("10:00", "13:00")])]);
    let unrelated = schedule(vec![(DayOfWeek::Monday, vec![("08:00", "09:00")])]);
    let authoritative = flatten(&unrelated, &owner);

    let result = reconcile(Some(authoritative.as_slice()), Some(&fallback));

    assert_eq!(result, fallback);
    assert_eq!(
        choose_source(Some(authoritative.as_slice()), Some(&fallback)),
        ScheduleSource::Fallback
    );
}

#[test]
fn test_reconcile_degrades_without_fallback() {
    let owner = owner();
    let week = schedule(vec![(DayOfWeek::Monday, vec![("08:00", "09:00")])]);
    let authoritative = flatten(&week, &owner);

    let result = reconcile(Some(authoritative.as_slice()), None);

    assert!(result.is_degraded());
    assert_eq!(result, reconstruct(&authoritative));
}

#[test]
fn test_reconcile_treats_empty_fallback_as_absent() {
    let owner = owner();
    let week = schedule(vec![(DayOfWeek::Monday, vec![("08:00", "09:00")])]);
    let authoritative = flatten(&week, &owner);
    let empty = WeeklySchedule::new();

    assert_eq!(
        choose_source(Some(authoritative.as_slice()), Some(&empty)),
        ScheduleSource::Authoritative
    );
    assert!(reconcile(Some(authoritative.as_slice()), Some(&empty)).is_degraded());
}

#[test]
fn test_reconcile_both_absent() {
    assert_eq!(reconcile(None, None), WeeklySchedule::new());
    assert_eq!(reconcile(Some(&[][..]), None), WeeklySchedule::new());
    assert_eq!(choose_source(Some(&[][..]), None), ScheduleSource::Empty);
}
