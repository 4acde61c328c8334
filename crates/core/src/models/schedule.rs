use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    aggregator::{self, WeeklySummary},
    errors::{NormalizeError, ScheduleError},
    models::{
        time::DayOfWeek,
        time_slot::{RawTimeSlot, TimeSlot},
    },
    normalizer, validator,
};

/// Blob key holding the slots of a degraded schedule.
pub const UNASSIGNED_KEY: &str = "unassigned";

/// The normalized slots of one weekday: sorted, non-overlapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySchedule {
    day: DayOfWeek,
    slots: Vec<TimeSlot>,
}

impl DaySchedule {
    pub fn empty(day: DayOfWeek) -> Self {
        Self {
            day,
            slots: Vec::new(),
        }
    }

    /// Callers must hand in slots that already passed the normalizer.
    pub(crate) fn from_sorted(day: DayOfWeek, slots: Vec<TimeSlot>) -> Self {
        Self { day, slots }
    }

    pub fn day(&self) -> DayOfWeek {
        self.day
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn total_minutes(&self) -> u32 {
        self.slots.iter().map(TimeSlot::duration_minutes).sum()
    }
}

/// A user's recurring weekly availability.
///
/// Days without slots are not stored, so two schedules with the same slots
/// compare equal regardless of how they were built. `unassigned` is the
/// sentinel bucket of a schedule rebuilt from flat records that carry no
/// weekday; it is sorted but not overlap-checked, since slots from different
/// days may collide once their days are lost.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ScheduleBlob", into = "ScheduleBlob")]
pub struct WeeklySchedule {
    days: BTreeMap<DayOfWeek, DaySchedule>,
    unassigned: Vec<TimeSlot>,
}

impl WeeklySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_unassigned(mut slots: Vec<TimeSlot>) -> Self {
        normalizer::sort_slots(&mut slots);
        Self {
            days: BTreeMap::new(),
            unassigned: slots,
        }
    }

    pub(crate) fn set_day(&mut self, schedule: DaySchedule) {
        if schedule.is_empty() {
            self.days.remove(&schedule.day);
        } else {
            self.days.insert(schedule.day, schedule);
        }
    }

    /// Non-empty days, Monday first.
    pub fn days(&self) -> impl Iterator<Item = &DaySchedule> {
        self.days.values()
    }

    pub fn day(&self, day: DayOfWeek) -> Option<&DaySchedule> {
        self.days.get(&day)
    }

    pub fn slots_for(&self, day: DayOfWeek) -> &[TimeSlot] {
        self.days.get(&day).map(DaySchedule::slots).unwrap_or(&[])
    }

    pub fn unassigned(&self) -> &[TimeSlot] {
        &self.unassigned
    }

    /// True when some slots have lost their weekday.
    pub fn is_degraded(&self) -> bool {
        !self.unassigned.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty() && self.unassigned.is_empty()
    }

    pub fn slot_count(&self) -> usize {
        self.days.values().map(|d| d.slots.len()).sum::<usize>() + self.unassigned.len()
    }

    pub fn total_minutes(&self) -> u32 {
        self.days.values().map(DaySchedule::total_minutes).sum::<u32>()
            + self
                .unassigned
                .iter()
                .map(TimeSlot::duration_minutes)
                .sum::<u32>()
    }

    /// Adds one slot to `day`, re-normalizing the whole day.
    ///
    /// On error the schedule is left untouched.
    pub fn add_slot(&mut self, day: DayOfWeek, slot: TimeSlot) -> Result<(), NormalizeError> {
        let mut slots = self.slots_for(day).to_vec();
        slots.push(slot);
        let normalized = normalizer::normalize_slots(day, slots)?;
        self.set_day(normalized);
        Ok(())
    }

    /// Removes an exact slot from `day`, or from the unassigned bucket when
    /// `day` does not hold it. Returns whether it was present.
    pub fn remove_slot(&mut self, day: DayOfWeek, slot: &TimeSlot) -> bool {
        if let Some(schedule) = self.days.get_mut(&day) {
            if let Some(index) = schedule.slots.iter().position(|s| s == slot) {
                schedule.slots.remove(index);
                if schedule.slots.is_empty() {
                    self.days.remove(&day);
                }
                return true;
            }
        }
        self.remove_unassigned(slot)
    }

    /// Removes an exact slot from the unassigned bucket.
    pub fn remove_unassigned(&mut self, slot: &TimeSlot) -> bool {
        match self.unassigned.iter().position(|s| s == slot) {
            Some(index) => {
                self.unassigned.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear_day(&mut self, day: DayOfWeek) -> Option<DaySchedule> {
        self.days.remove(&day)
    }

    pub fn summary(&self) -> WeeklySummary {
        aggregator::summarize(self)
    }
}

/// Shape of a schedule in the fallback caches: day label to raw slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleBlob(pub BTreeMap<String, Vec<RawTimeSlot>>);

impl From<&WeeklySchedule> for ScheduleBlob {
    fn from(schedule: &WeeklySchedule) -> Self {
        let mut blob: BTreeMap<String, Vec<RawTimeSlot>> = schedule
            .days
            .values()
            .map(|day| {
                let slots = day.slots.iter().copied().map(RawTimeSlot::from).collect();
                (day.day.as_str().to_string(), slots)
            })
            .collect();
        if schedule.is_degraded() {
            let slots = schedule.unassigned.iter().copied().map(RawTimeSlot::from).collect();
            blob.insert(UNASSIGNED_KEY.to_string(), slots);
        }
        ScheduleBlob(blob)
    }
}

impl From<WeeklySchedule> for ScheduleBlob {
    fn from(schedule: WeeklySchedule) -> Self {
        ScheduleBlob::from(&schedule)
    }
}

impl TryFrom<ScheduleBlob> for WeeklySchedule {
    type Error = ScheduleError;

    fn try_from(blob: ScheduleBlob) -> Result<Self, Self::Error> {
        let mut days = Vec::with_capacity(blob.0.len());
        let mut unassigned = Vec::new();

        for (key, raw_slots) in blob.0 {
            if key.trim().eq_ignore_ascii_case(UNASSIGNED_KEY) {
                unassigned = validator::validate_all(&raw_slots).map_err(|(_, err)| err)?;
            } else {
                days.push((DayOfWeek::parse(&key)?, raw_slots));
            }
        }

        let (mut schedule, _) = aggregator::aggregate(days)?;
        normalizer::sort_slots(&mut unassigned);
        schedule.unassigned = unassigned;
        Ok(schedule)
    }
}
