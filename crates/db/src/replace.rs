//! # Schedule replacement
//!
//! Saving a schedule supersedes everything stored for the owner. The store
//! has no multi-record transactions, so replacement runs as two phases:
//!
//! 1. **Delete**: list the owner's records and delete each one. A failure
//!    here aborts before anything is written.
//! 2. **Write**: create one record per slot of the flattened schedule. A
//!    failure here leaves a partial set behind and is reported as such.
//!
//! The whole call is idempotent: re-running it with the same schedule
//! converges to the same stored set however many records a previous partial
//! attempt left, because every run starts by deleting all of them. Callers
//! must not run two replacements for the same owner concurrently.

use priosync_core::{
    errors::PersistenceFailure,
    models::{record::OwnerId, schedule::WeeklySchedule},
    reconciler,
};
use tracing::{debug, info};

use crate::store::RecordStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaceReport {
    pub deleted: usize,
    pub written: usize,
}

pub async fn replace(
    store: &dyn RecordStore,
    owner_id: &OwnerId,
    schedule: &WeeklySchedule,
) -> Result<ReplaceReport, PersistenceFailure> {
    let existing = store
        .list_records(owner_id)
        .await
        .map_err(PersistenceFailure::delete)?;

    for row in &existing {
        store
            .delete_record(row.id)
            .await
            .map_err(PersistenceFailure::delete)?;
    }
    debug!("Deleted {} records for {}", existing.len(), owner_id);

    let records = reconciler::flatten(schedule, owner_id);
    for (position, record) in records.iter().enumerate() {
        store
            .create_record(record, position as u32)
            .await
            .map_err(|cause| {
                PersistenceFailure::write(cause.wrap_err(format!(
                    "Wrote {} of {} records before failing",
                    position,
                    records.len()
                )))
            })?;
    }

    info!(
        "Replaced schedule for {}: {} deleted, {} written",
        owner_id,
        existing.len(),
        records.len()
    );

    Ok(ReplaceReport {
        deleted: existing.len(),
        written: records.len(),
    })
}
