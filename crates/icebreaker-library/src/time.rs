//! Durations in seconds, the unit of `Timestamp::seconds()` and of every interval in config.

pub const SECOND: u64 = 1;
pub const MINUTES: u64 = 60 * SECOND;
pub const HOURS: u64 = 60 * MINUTES;
pub const DAYS: u64 = 24 * HOURS;
pub const WEEKS: u64 = 7 * DAYS;
