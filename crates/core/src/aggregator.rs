//! # Weekly Schedule Aggregator
//!
//! Builds a [`WeeklySchedule`] from per-day raw input and computes the
//! derived views shown to the user (totals per day and per week).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    errors::AggregateError,
    models::{schedule::WeeklySchedule, time::DayOfWeek, time_slot::RawTimeSlot, time_slot::TimeSlot},
    normalizer,
};

/// Normalizes every day and sums the duration of all slots.
///
/// Days are processed in order of first appearance and the first failing
/// day aborts the whole call; nothing is partially applied. A day listed
/// more than once has its slot lists concatenated (in input order) before
/// normalization, so overlaps between the entries are still detected.
///
/// The result is deterministic: the same input always produces the same
/// schedule and the same total.
pub fn aggregate<I>(days: I) -> Result<(WeeklySchedule, u32), AggregateError>
where
    I: IntoIterator<Item = (DayOfWeek, Vec<RawTimeSlot>)>,
{
    let mut grouped: Vec<(DayOfWeek, Vec<RawTimeSlot>)> = Vec::new();
    for (day, slots) in days {
        match grouped.iter_mut().find(|(existing, _)| *existing == day) {
            Some((_, existing)) => existing.extend(slots),
            None => grouped.push((day, slots)),
        }
    }

    let mut schedule = WeeklySchedule::new();
    for (day, raw_slots) in grouped {
        let normalized = normalizer::normalize(day, &raw_slots)
            .map_err(|source| AggregateError { day, source })?;
        schedule.set_day(normalized);
    }

    let total = schedule.total_minutes();
    Ok((schedule, total))
}

/// Read-only figures derived from a weekly schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySummary {
    pub total_minutes: u32,
    pub minutes_per_day: BTreeMap<DayOfWeek, u32>,
    /// Minutes in the sentinel bucket of a degraded schedule.
    pub unassigned_minutes: u32,
    pub active_days: usize,
    pub longest_slot_minutes: u32,
}

pub fn summarize(schedule: &WeeklySchedule) -> WeeklySummary {
    let minutes_per_day: BTreeMap<DayOfWeek, u32> = schedule
        .days()
        .map(|day| (day.day(), day.total_minutes()))
        .collect();

    let longest_slot_minutes = schedule
        .days()
        .flat_map(|day| day.slots().iter())
        .chain(schedule.unassigned().iter())
        .map(TimeSlot::duration_minutes)
        .max()
        .unwrap_or(0);

    WeeklySummary {
        total_minutes: schedule.total_minutes(),
        active_days: minutes_per_day.len(),
        unassigned_minutes: schedule.unassigned().iter().map(TimeSlot::duration_minutes).sum(),
        minutes_per_day,
        longest_slot_minutes,
    }
}

/// Renders a duration as `6h`, `45m` or `1h 30m`.
pub fn format_minutes(minutes: u32) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}
