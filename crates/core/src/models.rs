pub mod record;
pub mod schedule;
pub mod time;
pub mod time_slot;
