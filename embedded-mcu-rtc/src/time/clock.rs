//! Traits for datetime-based clocks (e.g. real-time clocks).

use crate::time::datetime::RtcDateTime;

#[cfg_attr(all(feature = "defmt", not(test)), derive(defmt::Format))]
#[derive(PartialEq, Debug, Copy, Clone)]
pub enum DatetimeClockError {
    /// The clock has not been initialized yet.
    NotEnabled,
    /// The date and time cannot be represented by the clock.
    InvalidDatetime,
    /// The hardware did not respond as expected.
    Hardware,
}

/// Calendar clock backed by the RTC.
///
/// The RTC keeps seconds, minutes, hours, day, month and a two digit year in hardware. Fractions
/// of a second come from the subsecond counter, so the resolution follows the synchronous
/// prescaler the clock was configured with.
pub trait DatetimeClock {
    /// Returns the current structured date and time.
    fn get_current_datetime(&self) -> Result<RtcDateTime, DatetimeClockError>;

    /// Sets the current structured date and time.
    fn set_current_datetime(&mut self, datetime: &RtcDateTime) -> Result<(), DatetimeClockError>;

    /// The resolution of the clock in Hz. Typical values are 1hz and 256hz.
    fn resolution_hz(&self) -> u32;
}
