//! Nested RTC write protection.
//!
//! The RTC registers are locked after reset. Writing `0xCA` then `0x53` to `WPR` unlocks them,
//! any other value locks them again. Unlocks nest: the lock is only re-engaged once every
//! unlock has been matched by a release.

use core::ops::{Deref, DerefMut};

use super::registers::{Register, RtcRegisters, WPR};
use super::Rtc;

/// Write-enable depth counter.
#[cfg_attr(all(feature = "defmt", not(test)), derive(defmt::Format))]
#[derive(PartialEq, Eq, Debug, Default)]
pub struct WriteProtect {
    depth: i32,
}

impl WriteProtect {
    /// Locked, depth 0.
    pub const fn new() -> Self {
        WriteProtect { depth: 0 }
    }

    /// Current nesting depth, 0 when locked.
    pub const fn depth(&self) -> i32 {
        self.depth
    }

    /// Whether the registers are currently unlocked.
    pub const fn is_unlocked(&self) -> bool {
        self.depth > 0
    }

    /// Increments the depth and writes the unlock sequence.
    ///
    /// The sequence is written on every call, not only when leaving the locked state.
    pub fn enable_write<R: RtcRegisters>(&mut self, regs: &mut R) {
        self.depth = self.depth.saturating_add(1);
        regs.write(Register::Wpr, WPR::KEY::Key1.value);
        regs.write(Register::Wpr, WPR::KEY::Key2.value);
        trace!("RTC write enabled, depth {=i32}", self.depth);
    }

    /// Decrements the depth and re-engages the lock once it drops to zero.
    ///
    /// Calling this while already locked keeps the depth at zero and rewrites the lock key.
    pub fn disable_write<R: RtcRegisters>(&mut self, regs: &mut R) {
        self.depth -= 1;
        if self.depth <= 0 {
            self.depth = 0;
            regs.write(Register::Wpr, WPR::KEY::Lock.value);
            trace!("RTC write protection engaged");
        }
    }
}

/// Scoped write access to the RTC.
///
/// Created by [`Rtc::write_guard`]. Unlocks on creation and releases on drop, so the lock is
/// restored on every exit path. Dereferences to the driver; nested guards are taken from an
/// outer guard.
pub struct WriteGuard<'a, R: RtcRegisters> {
    rtc: &'a mut Rtc<R>,
}

impl<'a, R: RtcRegisters> WriteGuard<'a, R> {
    pub(super) fn new(rtc: &'a mut Rtc<R>) -> Self {
        rtc.enable_write();
        WriteGuard { rtc }
    }
}

impl<R: RtcRegisters> Deref for WriteGuard<'_, R> {
    type Target = Rtc<R>;

    fn deref(&self) -> &Rtc<R> {
        self.rtc
    }
}

impl<R: RtcRegisters> DerefMut for WriteGuard<'_, R> {
    fn deref_mut(&mut self) -> &mut Rtc<R> {
        self.rtc
    }
}

impl<R: RtcRegisters> Drop for WriteGuard<'_, R> {
    fn drop(&mut self) {
        self.rtc.disable_write();
    }
}
