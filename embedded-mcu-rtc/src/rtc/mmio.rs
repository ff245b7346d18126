//! Memory-mapped register backend.

use tock_registers::interfaces::{Readable, Writeable};
use tock_registers::register_structs;
use tock_registers::registers::{ReadOnly, ReadWrite, WriteOnly};

use super::registers::{Register, RtcRegisters, CR, DR, ISR, PRER, SSR, TR, WPR};

register_structs! {
    /// RTC register block of an STM32L0, up to the sub second register.
    pub RtcRegisterBlock {
        (0x00 => tr: ReadWrite<u32, TR::Register>),
        (0x04 => dr: ReadWrite<u32, DR::Register>),
        (0x08 => cr: ReadWrite<u32, CR::Register>),
        (0x0C => isr: ReadWrite<u32, ISR::Register>),
        (0x10 => prer: ReadWrite<u32, PRER::Register>),
        (0x14 => _reserved0),
        (0x24 => wpr: WriteOnly<u32, WPR::Register>),
        (0x28 => ssr: ReadOnly<u32, SSR::Register>),
        (0x2C => @END),
    }
}

/// Volatile access to the RTC of an STM32L0.
pub struct Stm32l0Registers<'a> {
    block: &'a RtcRegisterBlock,
}

// The block is owned by this value; see `steal`.
unsafe impl Send for Stm32l0Registers<'_> {}

impl<'a> Stm32l0Registers<'a> {
    /// Base address of the RTC on STM32L0 devices.
    pub const RTC_BASE: usize = 0x4000_2800;

    /// Creates a backend over a register block.
    pub const fn new(block: &'a RtcRegisterBlock) -> Self {
        Stm32l0Registers { block }
    }
}

impl Stm32l0Registers<'static> {
    /// Creates a backend for the RTC at its fixed address.
    ///
    /// # Safety
    ///
    /// Only one instance may exist at a time, and the code must run on an STM32L0.
    pub unsafe fn steal() -> Self {
        // SAFETY: the caller guarantees the RTC block is mapped at `RTC_BASE`.
        Self::new(unsafe { &*(Self::RTC_BASE as *const RtcRegisterBlock) })
    }
}

impl RtcRegisters for Stm32l0Registers<'_> {
    fn read(&self, reg: Register) -> u32 {
        match reg {
            Register::Tr => self.block.tr.get(),
            Register::Dr => self.block.dr.get(),
            Register::Cr => self.block.cr.get(),
            Register::Isr => self.block.isr.get(),
            Register::Prer => self.block.prer.get(),
            // Write-only, reads as zero.
            Register::Wpr => 0,
            Register::Ssr => self.block.ssr.get(),
        }
    }

    fn write(&mut self, reg: Register, value: u32) {
        match reg {
            Register::Tr => self.block.tr.set(value),
            Register::Dr => self.block.dr.set(value),
            Register::Cr => self.block.cr.set(value),
            Register::Isr => self.block.isr.set(value),
            Register::Prer => self.block.prer.set(value),
            Register::Wpr => self.block.wpr.set(value),
            // Read-only.
            Register::Ssr => {}
        }
    }
}
