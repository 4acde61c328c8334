//! # Availability Service
//!
//! Orchestrates one user's weekly availability across the authoritative
//! record store and the ordered fallback tiers.
//!
//! ## Read path
//!
//! 1. List the owner's flat records from the store (a failure is an error)
//! 2. Ask each fallback tier in order for a schedule, keeping the first
//!    non-empty one (a failing tier is logged and skipped)
//! 3. Hand both candidates to the reconciler, which prefers the fallback
//!    because it still knows the weekdays
//!
//! ## Write path
//!
//! `save` replaces the owner's stored records, then refreshes every tier so
//! the next read keeps weekday fidelity. A tier write failure fails the save,
//! since a stale tier would win the next read.
//!
//! The service holds no global state and does not serialize calls: callers
//! must not run two saves for the same owner at once.

use std::sync::Arc;

use priosync_core::{
    aggregator,
    errors::{PersistenceFailure, ScheduleError, ScheduleResult},
    models::{
        record::{FlatScheduleRecord, OwnerId},
        schedule::WeeklySchedule,
        time::DayOfWeek,
        time_slot::{RawTimeSlot, TimeSlot},
    },
    reconciler::{self, ScheduleSource},
};
use priosync_db::{
    replace::{replace, ReplaceReport},
    store::{FallbackCache, RecordStore},
};
use tracing::{debug, info, warn};

/// The reconciled schedule of one owner and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSchedule {
    pub schedule: WeeklySchedule,
    pub source: ScheduleSource,
    /// Name of the tier that supplied the schedule, when a fallback won.
    pub tier: Option<&'static str>,
    /// Usable records found in the authoritative store.
    pub stored_records: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// The store already holds records for the owner; nothing was written.
    AlreadyMigrated { records: usize },
    Migrated {
        tier: &'static str,
        report: ReplaceReport,
    },
    /// No tier had a schedule for the owner.
    NothingToMigrate,
}

/// Caller-owned handle over the storage collaborators of the subsystem.
#[derive(Clone)]
pub struct AvailabilityService {
    store: Arc<dyn RecordStore>,
    fallbacks: Vec<Arc<dyn FallbackCache>>,
}

impl AvailabilityService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            fallbacks: Vec::new(),
        }
    }

    /// Appends a tier. Tiers added earlier take precedence.
    pub fn with_fallback(mut self, cache: Arc<dyn FallbackCache>) -> Self {
        self.fallbacks.push(cache);
        self
    }

    pub fn fallback_names(&self) -> Vec<&'static str> {
        self.fallbacks.iter().map(|cache| cache.name()).collect()
    }

    pub async fn load(&self, owner_id: &OwnerId) -> ScheduleResult<LoadedSchedule> {
        let records = self.read_records(owner_id).await?;
        let fallback = self.read_fallback(owner_id).await;

        let fallback_schedule = fallback.as_ref().map(|(_, schedule)| schedule);
        let source = reconciler::choose_source(Some(records.as_slice()), fallback_schedule);
        let schedule = reconciler::reconcile(Some(records.as_slice()), fallback_schedule);
        let tier = match source {
            ScheduleSource::Fallback => fallback.map(|(name, _)| name),
            _ => None,
        };

        debug!(
            "Loaded schedule for {}: source={:?}, tier={:?}, records={}",
            owner_id,
            source,
            tier,
            records.len()
        );

        Ok(LoadedSchedule {
            schedule,
            source,
            tier,
            stored_records: records.len(),
        })
    }

    /// Replaces the stored schedule and refreshes every fallback tier.
    ///
    /// A tier that cannot be refreshed would shadow the new records on the
    /// next `load`, so its failure fails the save with a write-phase
    /// [`PersistenceFailure`]. Retrying the save is safe.
    pub async fn save(
        &self,
        owner_id: &OwnerId,
        schedule: &WeeklySchedule,
    ) -> ScheduleResult<ReplaceReport> {
        let report = replace(&*self.store, owner_id, schedule).await?;

        for cache in &self.fallbacks {
            if let Err(err) = cache.write(owner_id, schedule).await {
                warn!(
                    "Failed to refresh {} cache for {}: {:#}",
                    cache.name(),
                    owner_id,
                    err
                );
                let cause = err.wrap_err(format!("Failed to refresh {} cache", cache.name()));
                return Err(PersistenceFailure::write(cause).into());
            }
        }

        info!(
            "Saved schedule for {}: {} slots, {} minutes",
            owner_id,
            schedule.slot_count(),
            schedule.total_minutes()
        );
        Ok(report)
    }

    /// Validates raw per-day input and saves it. Returns the weekly total.
    pub async fn save_days(
        &self,
        owner_id: &OwnerId,
        days: Vec<(DayOfWeek, Vec<RawTimeSlot>)>,
    ) -> ScheduleResult<(ReplaceReport, u32)> {
        let (schedule, total_minutes) = aggregator::aggregate(days)?;
        let report = self.save(owner_id, &schedule).await?;
        Ok((report, total_minutes))
    }

    pub async fn add_slot(
        &self,
        owner_id: &OwnerId,
        day: DayOfWeek,
        slot: TimeSlot,
    ) -> ScheduleResult<WeeklySchedule> {
        let mut schedule = self.load(owner_id).await?.schedule;
        schedule.add_slot(day, slot)?;
        self.save(owner_id, &schedule).await?;
        Ok(schedule)
    }

    /// Returns `false` (and writes nothing) when the slot was not present.
    pub async fn remove_slot(
        &self,
        owner_id: &OwnerId,
        day: DayOfWeek,
        slot: &TimeSlot,
    ) -> ScheduleResult<bool> {
        let mut schedule = self.load(owner_id).await?.schedule;
        if !schedule.remove_slot(day, slot) {
            return Ok(false);
        }
        self.save(owner_id, &schedule).await?;
        Ok(true)
    }

    /// Copies a legacy schedule into the store, at most once per owner.
    pub async fn migrate_legacy(&self, owner_id: &OwnerId) -> ScheduleResult<MigrationOutcome> {
        let existing = self.read_records(owner_id).await?;
        if !existing.is_empty() {
            debug!(
                "Skipping migration for {}: {} records already stored",
                owner_id,
                existing.len()
            );
            return Ok(MigrationOutcome::AlreadyMigrated {
                records: existing.len(),
            });
        }

        let Some((tier, schedule)) = self.read_fallback(owner_id).await else {
            return Ok(MigrationOutcome::NothingToMigrate);
        };

        let report = replace(&*self.store, owner_id, &schedule).await?;
        info!(
            "Migrated {} slots for {} from the {} cache",
            report.written, owner_id, tier
        );
        Ok(MigrationOutcome::Migrated { tier, report })
    }

    async fn read_records(&self, owner_id: &OwnerId) -> ScheduleResult<Vec<FlatScheduleRecord>> {
        let rows = self
            .store
            .list_records(owner_id)
            .await
            .map_err(ScheduleError::Storage)?;

        Ok(rows
            .iter()
            .filter_map(|row| match FlatScheduleRecord::try_from(row) {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!("Skipping stored record for {}: {}", owner_id, err);
                    None
                }
            })
            .collect())
    }

    async fn read_fallback(&self, owner_id: &OwnerId) -> Option<(&'static str, WeeklySchedule)> {
        for cache in &self.fallbacks {
            match cache.read(owner_id).await {
                Ok(Some(schedule)) if !schedule.is_empty() => {
                    return Some((cache.name(), schedule));
                }
                Ok(_) => debug!("No {} cache entry for {}", cache.name(), owner_id),
                Err(err) => warn!(
                    "Ignoring unreadable {} cache for {}: {:#}",
                    cache.name(),
                    owner_id,
                    err
                ),
            }
        }
        None
    }
}
