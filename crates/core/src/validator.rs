//! Validation of a single caller-supplied `{start, end}` pair.

use crate::{
    errors::SlotError,
    models::{
        time::TimeOfDay,
        time_slot::{RawTimeSlot, TimeSlot},
    },
};

/// Parses and checks one slot. Never panics on malformed input.
///
/// # Errors
///
/// * `SlotError::InvalidFormat` - either bound is not a valid `HH:MM` in `00:00..=23:59`
/// * `SlotError::ZeroLength` - `end == start`
/// * `SlotError::InvertedRange` - `end < start` (slots never wrap past midnight)
pub fn validate(slot: &RawTimeSlot) -> Result<TimeSlot, SlotError> {
    let start = TimeOfDay::parse(&slot.start)?;
    let end = TimeOfDay::parse(&slot.end)?;
    TimeSlot::new(start, end)
}

/// Validates every slot, reporting the position of the first invalid one.
pub fn validate_all(slots: &[RawTimeSlot]) -> Result<Vec<TimeSlot>, (usize, SlotError)> {
    slots
        .iter()
        .enumerate()
        .map(|(index, raw)| validate(raw).map_err(|err| (index, err)))
        .collect()
}
