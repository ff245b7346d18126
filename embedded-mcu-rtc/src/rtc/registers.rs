//! RTC register fields (RM0367, STM32L0x3) and the word-level access trait.

use tock_registers::register_bitfields;

use crate::time::RtcDateTime;

/// RTC registers used by the driver.
#[cfg_attr(all(feature = "defmt", not(test)), derive(defmt::Format))]
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum Register {
    /// Time register.
    Tr,
    /// Date register.
    Dr,
    /// Control register.
    Cr,
    /// Initialization and status register.
    Isr,
    /// Prescaler register.
    Prer,
    /// Write protection register.
    Wpr,
    /// Sub second register.
    Ssr,
}

/// Word-level access to the RTC register block.
///
/// Implementations perform exactly one bus access per call; the driver relies on the access
/// order it issues (e.g. `SSR` before `TR` before `DR`).
pub trait RtcRegisters {
    /// Reads a register.
    fn read(&self, reg: Register) -> u32;

    /// Writes a register.
    fn write(&mut self, reg: Register, value: u32);

    /// Read-modify-write of a register.
    fn modify<F>(&mut self, reg: Register, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        let value = self.read(reg);
        self.write(reg, f(value));
    }
}

register_bitfields![u32,
    // Packed BCD.
    pub TR [
        PM OFFSET(22) NUMBITS(1) [],
        HT OFFSET(20) NUMBITS(2) [],
        HU OFFSET(16) NUMBITS(4) [],
        MNT OFFSET(12) NUMBITS(3) [],
        MNU OFFSET(8) NUMBITS(4) [],
        ST OFFSET(4) NUMBITS(3) [],
        SU OFFSET(0) NUMBITS(4) []
    ],
    // Packed BCD except the week day.
    pub DR [
        YT OFFSET(20) NUMBITS(4) [],
        YU OFFSET(16) NUMBITS(4) [],
        WDU OFFSET(13) NUMBITS(3) [],
        MT OFFSET(12) NUMBITS(1) [],
        MU OFFSET(8) NUMBITS(4) [],
        DT OFFSET(4) NUMBITS(2) [],
        DU OFFSET(0) NUMBITS(4) []
    ],
    pub CR [
        /// Hour format.
        FMT OFFSET(6) NUMBITS(1) [
            Hours24 = 0,
            AmPm = 1
        ]
    ],
    pub ISR [
        /// Initialization mode request.
        INIT OFFSET(7) NUMBITS(1) [],
        /// Initialization mode entered.
        INITF OFFSET(6) NUMBITS(1) [],
        /// Calendar shadow registers synchronized. Cleared by writing 0.
        RSF OFFSET(5) NUMBITS(1) []
    ],
    pub PRER [
        PREDIV_A OFFSET(16) NUMBITS(7) [],
        PREDIV_S OFFSET(0) NUMBITS(15) []
    ],
    pub WPR [
        /// Any value other than the two-key sequence re-engages the protection.
        KEY OFFSET(0) NUMBITS(8) [
            Key1 = 0xCA,
            Key2 = 0x53,
            Lock = 0xFF
        ]
    ],
    pub SSR [
        SS OFFSET(0) NUMBITS(16) []
    ]
];

/// Encodes the time fields of a record into a `TR` value (24-hour format).
pub fn encode_time(rtc: &RtcDateTime) -> u32 {
    (TR::HT.val((rtc.hours / 10) as u32)
        + TR::HU.val((rtc.hours % 10) as u32)
        + TR::MNT.val((rtc.minutes / 10) as u32)
        + TR::MNU.val((rtc.minutes % 10) as u32)
        + TR::ST.val((rtc.seconds / 10) as u32)
        + TR::SU.val((rtc.seconds % 10) as u32))
    .value
}

/// Encodes the date fields of a record into a `DR` value.
///
/// The year must be within 2000-2099; only its last two digits are stored.
pub fn encode_date(rtc: &RtcDateTime) -> u32 {
    let year = (rtc.year % 100) as u32;

    (DR::YT.val(year / 10)
        + DR::YU.val(year % 10)
        + DR::WDU.val(rtc.week_day as u32)
        + DR::MT.val((rtc.month / 10) as u32)
        + DR::MU.val((rtc.month % 10) as u32)
        + DR::DT.val((rtc.date / 10) as u32)
        + DR::DU.val((rtc.date % 10) as u32))
    .value
}

/// Decodes a `TR` value into the time fields of a record.
pub fn decode_time(value: u32, rtc: &mut RtcDateTime) {
    rtc.hours = (TR::HT.read(value) * 10 + TR::HU.read(value)) as u8;
    rtc.minutes = (TR::MNT.read(value) * 10 + TR::MNU.read(value)) as u8;
    rtc.seconds = (TR::ST.read(value) * 10 + TR::SU.read(value)) as u8;
}

/// Decodes a `DR` value into the date fields of a record.
pub fn decode_date(value: u32, rtc: &mut RtcDateTime) {
    rtc.year = 2000 + (DR::YT.read(value) * 10 + DR::YU.read(value)) as u16;
    rtc.week_day = DR::WDU.read(value) as u8;
    rtc.month = (DR::MT.read(value) * 10 + DR::MU.read(value)) as u8;
    rtc.date = (DR::DT.read(value) * 10 + DR::DU.read(value)) as u8;
}
