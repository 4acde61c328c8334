//! # Schedule Reconciler
//!
//! Bridges the day-keyed [`WeeklySchedule`] and the flat record shape kept
//! by the authoritative store, and decides which candidate source is the
//! user's current schedule.
//!
//! Flat records have no weekday column, so [`reconstruct`] can only rebuild
//! a degraded schedule with every slot in the unassigned bucket. Until the
//! store gains day fidelity, a fallback cache that still knows the days
//! always wins in [`reconcile`]. The two sources are never blended.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{
    record::{FlatScheduleRecord, OwnerId},
    schedule::WeeklySchedule,
};

/// Which candidate [`reconcile`] picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleSource {
    /// A fallback schedule with weekday fidelity.
    Fallback,
    /// Degraded reconstruction from authoritative flat records.
    Authoritative,
    /// Neither source had anything.
    Empty,
}

/// One record per slot, days Monday first and slots by start within a day,
/// followed by any unassigned slots. Durations are always recomputed.
pub fn flatten(schedule: &WeeklySchedule, owner_id: &OwnerId) -> Vec<FlatScheduleRecord> {
    schedule
        .days()
        .flat_map(|day| day.slots().iter())
        .chain(schedule.unassigned().iter())
        .map(|slot| FlatScheduleRecord::from_slot(slot, owner_id))
        .collect()
}

/// Rebuilds a schedule from flat records alone.
///
/// All slots land in the unassigned bucket: the weekday of each record is
/// unrecoverable. Records whose bounds do not form a valid slot are skipped.
pub fn reconstruct(records: &[FlatScheduleRecord]) -> WeeklySchedule {
    let slots = records
        .iter()
        .filter_map(|record| match record.slot() {
            Ok(slot) => Some(slot),
            Err(err) => {
                warn!(owner = %record.owner_id, "Skipping unusable flat record: {}", err);
                None
            }
        })
        .collect();
    WeeklySchedule::from_unassigned(slots)
}

/// Strict precedence between the sources; an empty source counts as absent.
pub fn choose_source(
    authoritative: Option<&[FlatScheduleRecord]>,
    fallback: Option<&WeeklySchedule>,
) -> ScheduleSource {
    if fallback.is_some_and(|schedule| !schedule.is_empty()) {
        ScheduleSource::Fallback
    } else if authoritative.is_some_and(|records| !records.is_empty()) {
        ScheduleSource::Authoritative
    } else {
        ScheduleSource::Empty
    }
}

pub fn reconcile(
    authoritative: Option<&[FlatScheduleRecord]>,
    fallback: Option<&WeeklySchedule>,
) -> WeeklySchedule {
    match (choose_source(authoritative, fallback), authoritative, fallback) {
        (ScheduleSource::Fallback, _, Some(schedule)) => schedule.clone(),
        (ScheduleSource::Authoritative, Some(records), _) => reconstruct(records),
        _ => WeeklySchedule::new(),
    }
}
