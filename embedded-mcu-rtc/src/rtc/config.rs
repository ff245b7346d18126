//! RTC driver configuration.

use super::registers::PRER;
use super::RtcError;

/// Prescaler and timing configuration applied by [`Rtc::init`](super::Rtc::init).
///
/// The calendar clock is `RTCCLK / ((async_prediv + 1) * (sync_prediv + 1))`. The defaults give
/// 1 Hz from a 32.768 kHz LSE crystal with a 256 Hz subsecond counter.
#[cfg_attr(all(feature = "defmt", not(test)), derive(defmt::Format))]
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct RtcConfig {
    /// Asynchronous prescaler, 7 bits.
    pub async_prediv: u8,
    /// Synchronous prescaler, 15 bits. The subsecond counter reloads from this value.
    pub sync_prediv: u16,
    /// Number of `ISR` polls before giving up on init mode or shadow register synchronization.
    pub init_poll_limit: u32,
}

impl Default for RtcConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RtcConfig {
    /// Configuration for a 32.768 kHz LSE.
    pub const fn new() -> Self {
        RtcConfig {
            async_prediv: 127,
            sync_prediv: 255,
            init_poll_limit: 10_000,
        }
    }

    /// Sets both prescalers.
    pub const fn with_prescalers(mut self, async_prediv: u8, sync_prediv: u16) -> Self {
        self.async_prediv = async_prediv;
        self.sync_prediv = sync_prediv;
        self
    }

    /// Sets the number of polls before a hardware handshake times out.
    pub const fn with_init_poll_limit(mut self, init_poll_limit: u32) -> Self {
        self.init_poll_limit = init_poll_limit;
        self
    }

    /// Checks that the prescalers fit their register fields and that polling is enabled.
    pub const fn validate(&self) -> Result<(), RtcError> {
        if (self.async_prediv as u32) > PRER::PREDIV_A.mask {
            return Err(RtcError::InvalidConfig);
        }

        if (self.sync_prediv as u32) > PRER::PREDIV_S.mask {
            return Err(RtcError::InvalidConfig);
        }

        if self.init_poll_limit == 0 {
            return Err(RtcError::InvalidConfig);
        }

        Ok(())
    }

    /// `PRER` value for this configuration.
    pub fn prer(&self) -> u32 {
        let async_prediv = PRER::PREDIV_A.val(self.async_prediv as u32);
        let sync_prediv = PRER::PREDIV_S.val(self.sync_prediv as u32);
        (async_prediv + sync_prediv).value
    }

    /// Calendar clock produced from an RTCCLK of `rtcclk_hz`.
    pub const fn calendar_hz(&self, rtcclk_hz: u32) -> u32 {
        rtcclk_hz / ((self.async_prediv as u32 + 1) * (self.sync_prediv as u32 + 1))
    }

    /// Ticks per second of the subsecond counter.
    pub const fn subsecond_hz(&self) -> u32 {
        self.sync_prediv as u32 + 1
    }
}
