#![cfg_attr(not(test), no_std)]

// This must go first so the logging macros are visible to the other modules.
#[macro_use]
mod fmt;

pub mod time;
pub use time::{rtc_to_timestamp, DatetimeClock, DatetimeClockError, DatetimeError, RtcDateTime};

/// Driver for the RTC peripheral.
pub mod rtc;
pub use rtc::{Rtc, RtcConfig, RtcError, RtcRegisterBlock, RtcRegisters, Stm32l0Registers, WriteGuard};
