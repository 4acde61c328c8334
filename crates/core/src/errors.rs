use std::fmt;

use thiserror::Error;

use crate::models::{time::DayOfWeek, time::TimeOfDay, time_slot::TimeSlot};

/// A single `{start, end}` pair that cannot become a [`TimeSlot`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    #[error("Invalid time format: {0:?} (expected HH:MM)")]
    InvalidFormat(String),

    #[error("Inverted range: end {end} is before start {start}")]
    InvertedRange { start: TimeOfDay, end: TimeOfDay },

    #[error("Zero-length slot at {0}")]
    ZeroLength(TimeOfDay),
}

/// Failure to normalize the slots of one day.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("Invalid slot at position {index}: {source}")]
    InvalidSlot {
        index: usize,
        #[source]
        source: SlotError,
    },

    /// `first` always sorts before `second`.
    #[error("Overlapping slots: {first} and {second}")]
    OverlapDetected { first: TimeSlot, second: TimeSlot },
}

/// The first day of a weekly input that failed to normalize.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid schedule for {day}: {source}")]
pub struct AggregateError {
    pub day: DayOfWeek,
    #[source]
    pub source: NormalizeError,
}

/// Which half of a delete-all-then-write-all replacement failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistPhase {
    Delete,
    Write,
}

impl fmt::Display for PersistPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistPhase::Delete => f.write_str("delete"),
            PersistPhase::Write => f.write_str("write"),
        }
    }
}

#[derive(Error, Debug)]
#[error("Persistence failure during {phase} phase: {cause}")]
pub struct PersistenceFailure {
    pub phase: PersistPhase,
    #[source]
    pub cause: eyre::Report,
}

impl PersistenceFailure {
    pub fn delete(cause: eyre::Report) -> Self {
        Self {
            phase: PersistPhase::Delete,
            cause,
        }
    }

    pub fn write(cause: eyre::Report) -> Self {
        Self {
            phase: PersistPhase::Write,
            cause,
        }
    }
}

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error(transparent)]
    Slot(#[from] SlotError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    #[error("Unknown day: {0:?}")]
    UnknownDay(String),

    #[error(transparent)]
    Persistence(#[from] PersistenceFailure),

    #[error("Storage error: {0}")]
    Storage(eyre::Report),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
