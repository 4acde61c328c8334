//! # Day Schedule Normalizer
//!
//! Turns the raw slots of one day into a [`DaySchedule`]: every slot is
//! validated, the list is sorted by start (ties by end) and adjacent pairs
//! are checked for overlap.
//!
//! Overlaps are reported, never merged, so the caller can point the user at
//! the conflicting entry. Touching slots (`09:00-10:00`, `10:00-11:00`) are
//! kept as two distinct slots.

use crate::{
    errors::NormalizeError,
    models::{
        schedule::DaySchedule,
        time::DayOfWeek,
        time_slot::{RawTimeSlot, TimeSlot},
    },
    validator,
};

/// Validates, sorts and overlap-checks the raw slots of `day`.
///
/// An empty input is valid and yields an empty schedule.
///
/// # Errors
///
/// * `NormalizeError::InvalidSlot` - the first slot (in input order) that fails validation
/// * `NormalizeError::OverlapDetected` - the first overlapping pair in sorted order
pub fn normalize(day: DayOfWeek, raw_slots: &[RawTimeSlot]) -> Result<DaySchedule, NormalizeError> {
    let slots = validator::validate_all(raw_slots)
        .map_err(|(index, source)| NormalizeError::InvalidSlot { index, source })?;
    normalize_slots(day, slots)
}

/// Same as [`normalize`] for slots that are already individually valid.
pub fn normalize_slots(
    day: DayOfWeek,
    mut slots: Vec<TimeSlot>,
) -> Result<DaySchedule, NormalizeError> {
    sort_slots(&mut slots);
    if let Some((first, second)) = find_overlap(&slots) {
        return Err(NormalizeError::OverlapDetected { first, second });
    }
    Ok(DaySchedule::from_sorted(day, slots))
}

/// Sorts by start ascending, ties broken by end ascending.
pub fn sort_slots(slots: &mut [TimeSlot]) {
    slots.sort_by_key(|slot| (slot.start(), slot.end()));
}

/// First adjacent pair of a sorted list where `a.end > b.start`.
pub fn find_overlap(sorted: &[TimeSlot]) -> Option<(TimeSlot, TimeSlot)> {
    sorted
        .windows(2)
        .find(|pair| pair[0].end() > pair[1].start())
        .map(|pair| (pair[0], pair[1]))
}
