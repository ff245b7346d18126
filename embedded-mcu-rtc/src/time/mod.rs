//! Calendar types and the clock trait built on them.

/// Calendar record kept by the RTC and its conversions.
pub mod datetime;
pub use datetime::{rtc_to_timestamp, DatetimeError, RtcDateTime, MAX_YEAR, MIN_YEAR};

/// Traits for a datetime-based clock (e.g. real-time clock).
mod clock;
pub use clock::{DatetimeClock, DatetimeClockError};
