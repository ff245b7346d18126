//! Driver for the STM32L0 real-time clock.

mod config;
pub use config::RtcConfig;

mod mmio;
pub use mmio::{RtcRegisterBlock, Stm32l0Registers};

/// Register map, field layouts and the register access trait.
pub mod registers;
pub use registers::{Register, RtcRegisters};

mod write_protect;
pub use write_protect::{WriteGuard, WriteProtect};

#[cfg(test)]
pub(crate) mod mock;

use crate::time::{DatetimeClock, DatetimeClockError, DatetimeError, RtcDateTime};
use registers::{CR, ISR, PRER, SSR};
use tock_registers::fields::Field;

#[cfg_attr(all(feature = "defmt", not(test)), derive(defmt::Format))]
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
/// Errors reported by the RTC driver.
pub enum RtcError {
    /// The record to write has a field out of range.
    InvalidDatetime(DatetimeError),
    /// A prescaler does not fit its register field, or polling is disabled.
    InvalidConfig,
    /// The RTC did not acknowledge the init mode request.
    InitTimeout,
    /// The calendar shadow registers did not resynchronize.
    SyncTimeout,
}

impl From<DatetimeError> for RtcError {
    fn from(value: DatetimeError) -> Self {
        Self::InvalidDatetime(value)
    }
}

impl core::fmt::Display for RtcError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidDatetime(e) => write!(f, "Invalid date and time: {}", e),
            Self::InvalidConfig => write!(f, "Invalid RTC configuration"),
            Self::InitTimeout => write!(f, "RTC did not enter initialization mode"),
            Self::SyncTimeout => write!(f, "RTC calendar registers did not resynchronize"),
        }
    }
}

impl From<RtcError> for DatetimeClockError {
    fn from(value: RtcError) -> Self {
        match value {
            RtcError::InvalidDatetime(_) => DatetimeClockError::InvalidDatetime,
            RtcError::InvalidConfig | RtcError::InitTimeout | RtcError::SyncTimeout => DatetimeClockError::Hardware,
        }
    }
}

/// RTC driver.
///
/// Owns the register backend and the write-enable depth of this peripheral instance. All access
/// is through `&self`/`&mut self`; sharing between interrupt and thread context needs external
/// locking.
pub struct Rtc<R: RtcRegisters> {
    regs: R,
    config: RtcConfig,
    write_protect: WriteProtect,
    initialized: bool,
}

impl<R: RtcRegisters> Rtc<R> {
    /// Wraps a register backend. The hardware is not touched until [`Rtc::init`].
    pub const fn new(regs: R, config: RtcConfig) -> Self {
        Rtc {
            regs,
            config,
            write_protect: WriteProtect::new(),
            initialized: false,
        }
    }

    /// Selects 24-hour format and programs the prescalers.
    ///
    /// Can be called again at any time; the calendar stops counting while in init mode. If the
    /// RTC is already in init mode it is left there for the caller to exit.
    pub fn init(&mut self) -> Result<(), RtcError> {
        self.config.validate()?;

        let config = self.config;
        {
            let mut rtc = self.write_guard();
            let entered = !rtc.in_init_mode();
            if entered {
                rtc.set_init(true)?;
            }

            rtc.regs.modify(Register::Cr, |value| CR::FMT::Hours24.modify(value));
            // The prescaler register takes two separate writes, synchronous part first.
            rtc.regs.write(Register::Prer, PRER::PREDIV_S.val(config.sync_prediv as u32).value);
            rtc.regs.write(Register::Prer, config.prer());

            if entered {
                rtc.set_init(false)?;
            }
        }

        self.initialized = true;
        debug!(
            "RTC initialized, prescalers {=u8}/{=u16}",
            config.async_prediv,
            config.sync_prediv
        );
        Ok(())
    }

    /// Whether [`Rtc::init`] has completed.
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Reads the calendar into `rtc`, including the subsecond counter and the timestamp.
    pub fn get_date_time(&self, rtc: &mut RtcDateTime) {
        // Reading SSR freezes TR and DR until DR has been read.
        rtc.subseconds = SSR::SS.read(self.regs.read(Register::Ssr)) as u16;
        let time = self.regs.read(Register::Tr);
        let date = self.regs.read(Register::Dr);

        registers::decode_time(time, rtc);
        registers::decode_date(date, rtc);
        rtc.update_timestamp();
    }

    /// Reads the calendar into a new record.
    pub fn date_time(&self) -> RtcDateTime {
        let mut rtc = RtcDateTime::default();
        self.get_date_time(&mut rtc);
        rtc
    }

    /// Current Unix timestamp.
    pub fn timestamp(&self) -> u32 {
        self.date_time().timestamp
    }

    /// Writes the calendar fields of `rtc` to the hardware.
    ///
    /// The record is validated before any register is touched. Unlocks the registers and enters
    /// init mode itself, so no prior [`Rtc::set_init`] is needed. When the caller already put
    /// the RTC in init mode, it stays there and the calendar starts once the caller leaves it.
    /// `subseconds` and `timestamp` are not written; the subsecond counter restarts when init
    /// mode is left.
    pub fn set_date_time(&mut self, rtc: &RtcDateTime) -> Result<(), RtcError> {
        rtc.validate()?;

        let time = registers::encode_time(rtc);
        let date = registers::encode_date(rtc);

        let mut guard = self.write_guard();
        let entered = !guard.in_init_mode();
        if entered {
            guard.set_init(true)?;
        }
        guard.regs.write(Register::Tr, time);
        guard.regs.write(Register::Dr, date);
        if entered {
            guard.set_init(false)?;
            guard.wait_for_sync()?;
        }

        debug!("RTC set to {=u32}", rtc.rtc_to_timestamp());
        Ok(())
    }

    /// Sets the calendar from a Unix timestamp within 2000-2099.
    pub fn set_timestamp(&mut self, timestamp: u32) -> Result<(), RtcError> {
        let rtc = RtcDateTime::from_timestamp(timestamp)?;
        self.set_date_time(&rtc)
    }

    /// Enters (`true`) or leaves (`false`) init mode.
    ///
    /// The registers must be unlocked, otherwise the request is ignored by the hardware and
    /// entering times out. On timeout the request is withdrawn.
    pub fn set_init(&mut self, state: bool) -> Result<(), RtcError> {
        if !state {
            self.regs.modify(Register::Isr, |value| ISR::INIT::CLEAR.modify(value));
            trace!("RTC init mode left");
            return Ok(());
        }

        if self.in_init_mode() {
            return Ok(());
        }

        self.regs.modify(Register::Isr, |value| ISR::INIT::SET.modify(value));
        if self.poll_isr(ISR::INITF) {
            trace!("RTC init mode entered");
            return Ok(());
        }

        self.regs.modify(Register::Isr, |value| ISR::INIT::CLEAR.modify(value));
        warn!("RTC init mode not acknowledged");
        Err(RtcError::InitTimeout)
    }

    /// Whether the RTC has acknowledged init mode.
    pub fn in_init_mode(&self) -> bool {
        ISR::INITF.is_set(self.regs.read(Register::Isr))
    }

    /// Increments the write-enable depth and unlocks the registers.
    pub fn enable_write(&mut self) {
        self.write_protect.enable_write(&mut self.regs);
    }

    /// Decrements the write-enable depth, locking the registers when it reaches zero.
    pub fn disable_write(&mut self) {
        self.write_protect.disable_write(&mut self.regs);
    }

    /// Unlocks the registers until the returned guard is dropped.
    pub fn write_guard(&mut self) -> WriteGuard<'_, R> {
        WriteGuard::new(self)
    }

    /// Current write-enable depth.
    pub const fn write_depth(&self) -> i32 {
        self.write_protect.depth()
    }

    pub const fn config(&self) -> &RtcConfig {
        &self.config
    }

    pub const fn registers(&self) -> &R {
        &self.regs
    }

    /// Releases the register backend.
    pub fn free(self) -> R {
        self.regs
    }

    fn wait_for_sync(&mut self) -> Result<(), RtcError> {
        self.regs.modify(Register::Isr, |value| ISR::RSF::CLEAR.modify(value));
        if self.poll_isr(ISR::RSF) {
            return Ok(());
        }

        warn!("RTC shadow registers not resynchronized");
        Err(RtcError::SyncTimeout)
    }

    fn poll_isr(&self, flag: Field<u32, ISR::Register>) -> bool {
        (0..self.config.init_poll_limit).any(|_| flag.is_set(self.regs.read(Register::Isr)))
    }
}

impl<R: RtcRegisters> DatetimeClock for Rtc<R> {
    fn get_current_datetime(&self) -> Result<RtcDateTime, DatetimeClockError> {
        if !self.initialized {
            return Err(DatetimeClockError::NotEnabled);
        }

        Ok(self.date_time())
    }

    fn set_current_datetime(&mut self, datetime: &RtcDateTime) -> Result<(), DatetimeClockError> {
        if !self.initialized {
            return Err(DatetimeClockError::NotEnabled);
        }

        Ok(self.set_date_time(datetime)?)
    }

    fn resolution_hz(&self) -> u32 {
        self.config.subsecond_hz()
    }
}
