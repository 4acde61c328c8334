//! # PrioSync Core
//!
//! Pure domain logic for a user's weekly study availability: slot
//! validation, per-day normalization, weekly aggregation and the conversion
//! between the day-keyed schedule and the flat records kept in storage.
//!
//! Nothing in this crate performs I/O.

pub mod aggregator;
pub mod errors;
pub mod models;
pub mod normalizer;
pub mod reconciler;
pub mod validator;

pub use aggregator::{aggregate, format_minutes, WeeklySummary};
pub use errors::{
    AggregateError, NormalizeError, PersistPhase, PersistenceFailure, ScheduleError,
    ScheduleResult, SlotError,
};
pub use models::{
    record::{FlatScheduleRecord, OwnerId},
    schedule::{DaySchedule, ScheduleBlob, WeeklySchedule},
    time::{DayOfWeek, TimeOfDay},
    time_slot::{RawTimeSlot, TimeSlot},
};
pub use normalizer::normalize;
pub use reconciler::{flatten, reconcile, reconstruct, ScheduleSource};
pub use validator::validate;
