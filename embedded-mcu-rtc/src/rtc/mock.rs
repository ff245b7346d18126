//! Behavioural model of the RTC register block for host tests.

use core::cell::RefCell;

use super::registers::{Register, RtcRegisters, ISR, WPR};

const INIT: u32 = ISR::INIT::SET.value;
const INITF: u32 = ISR::INITF::SET.value;
const RSF: u32 = ISR::RSF::SET.value;
const KEY1: u32 = WPR::KEY::Key1.value;
const KEY2: u32 = WPR::KEY::Key2.value;

#[derive(PartialEq, Debug, Copy, Clone)]
enum Protection {
    Locked,
    AwaitingKey2,
    Unlocked,
}

/// Models write protection, the init mode handshake and shadow register resynchronization.
///
/// Writes the hardware would ignore (protected registers while locked, calendar registers
/// outside init mode) are dropped and counted in `rejected_writes`.
pub struct MockRegisters {
    pub tr: u32,
    pub dr: u32,
    pub cr: u32,
    pub isr: u32,
    pub prer: u32,
    pub ssr: u32,
    /// Acknowledge init mode requests with `INITF`.
    pub grant_init: bool,
    /// Set `RSF` again as soon as it is cleared outside init mode.
    pub resync: bool,
    pub rejected_writes: usize,
    protection: Protection,
    writes: Vec<(Register, u32)>,
    reads: RefCell<Vec<Register>>,
}

impl MockRegisters {
    pub fn new() -> Self {
        MockRegisters {
            tr: 0,
            dr: 0x0000_2101,
            cr: 0,
            isr: RSF,
            prer: 0x007F_00FF,
            ssr: 0,
            grant_init: true,
            resync: true,
            rejected_writes: 0,
            protection: Protection::Locked,
            writes: Vec::new(),
            reads: RefCell::new(Vec::new()),
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.protection == Protection::Unlocked
    }

    pub fn in_init_mode(&self) -> bool {
        self.isr & INITF != 0
    }

    /// Every write issued, in order, including the rejected ones.
    pub fn writes(&self) -> &[(Register, u32)] {
        &self.writes
    }

    pub fn writes_to(&self, reg: Register) -> Vec<u32> {
        self.writes.iter().filter(|(r, _)| *r == reg).map(|(_, v)| *v).collect()
    }

    pub fn reads(&self) -> Vec<Register> {
        self.reads.borrow().clone()
    }

    pub fn clear_log(&mut self) {
        self.writes.clear();
        self.reads.borrow_mut().clear();
    }

    fn write_isr(&mut self, value: u32) {
        let mut next = self.isr;

        // RSF is cleared by writing 0, writing 1 has no effect.
        if value & RSF == 0 {
            next &= !RSF;
        }

        if value & INIT != 0 {
            next |= INIT;
            if self.grant_init {
                next |= INITF;
            }
        } else {
            next &= !(INIT | INITF);
            if self.resync {
                next |= RSF;
            }
        }

        self.isr = next;
    }
}

impl RtcRegisters for MockRegisters {
    fn read(&self, reg: Register) -> u32 {
        self.reads.borrow_mut().push(reg);
        match reg {
            Register::Tr => self.tr,
            Register::Dr => self.dr,
            Register::Cr => self.cr,
            Register::Isr => self.isr,
            Register::Prer => self.prer,
            Register::Wpr => 0,
            Register::Ssr => self.ssr,
        }
    }

    fn write(&mut self, reg: Register, value: u32) {
        self.writes.push((reg, value));

        if reg == Register::Wpr {
            self.protection = match (self.protection, value) {
                (_, KEY1) => Protection::AwaitingKey2,
                (Protection::AwaitingKey2, KEY2) => Protection::Unlocked,
                _ => Protection::Locked,
            };
            return;
        }

        if !self.is_unlocked() {
            self.rejected_writes += 1;
            return;
        }

        match reg {
            Register::Tr | Register::Dr | Register::Prer if !self.in_init_mode() => {
                self.rejected_writes += 1;
            }
            Register::Tr => self.tr = value,
            Register::Dr => self.dr = value,
            Register::Prer => self.prer = value,
            Register::Cr => self.cr = value,
            Register::Isr => self.write_isr(value),
            Register::Ssr | Register::Wpr => self.rejected_writes += 1,
        }
    }
}
