//! Calendar record as kept by the RTC.

#[cfg(feature = "chrono")]
use chrono::{Datelike, Timelike};

/// First year the two-digit BCD year register can represent.
pub const MIN_YEAR: u16 = 2000;
/// Last year the two-digit BCD year register can represent.
pub const MAX_YEAR: u16 = 2099;

/// Date and time as read from or written to the RTC calendar registers.
///
/// The caller owns the record. `timestamp` is a derived value that is only refreshed when the
/// record is populated by the driver or by [`RtcDateTime::from_timestamp`]; changing the other
/// fields by hand does not update it.
#[cfg_attr(all(feature = "defmt", not(test)), derive(defmt::Format))]
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct RtcDateTime {
    /// Seconds, 0-59.
    pub seconds: u8,
    /// Subsecond down-counter. Reloads from the synchronous prescaler when it reaches zero.
    pub subseconds: u16,
    /// Minutes, 0-59.
    pub minutes: u8,
    /// Hours in 24-hour format, 0-23.
    pub hours: u8,
    /// Day of the week, 1-7 with Monday as 1.
    pub week_day: u8,
    /// Day of the month, 1-31.
    pub date: u8,
    /// Month, 1-12.
    pub month: u8,
    /// Year, 2000-2099.
    pub year: u16,
    /// Seconds since 1970-01-01 00:00:00 UTC.
    pub timestamp: u32,
}

#[cfg_attr(all(feature = "defmt", not(test)), derive(defmt::Format))]
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
/// Represents the field of an [`RtcDateTime`] that is out of range.
pub enum DatetimeError {
    /// The year is outside 2000-2099.
    Year,
    /// The month is invalid.
    Month,
    /// The day of the month is invalid for the given month and year.
    Day,
    /// The day of the week is not 1-7.
    WeekDay,
    /// The hour is invalid.
    Hour,
    /// The minute is invalid.
    Minute,
    /// The second is invalid.
    Second,
}

impl core::fmt::Display for DatetimeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Year => write!(f, "year outside {}-{}", MIN_YEAR, MAX_YEAR),
            Self::Month => write!(f, "month outside 1-12"),
            Self::Day => write!(f, "day outside the month"),
            Self::WeekDay => write!(f, "week day outside 1-7"),
            Self::Hour => write!(f, "hour outside 0-23"),
            Self::Minute => write!(f, "minute outside 0-59"),
            Self::Second => write!(f, "second outside 0-59"),
        }
    }
}

/// 2000-01-01 00:00:00, a Saturday.
impl Default for RtcDateTime {
    fn default() -> Self {
        RtcDateTime {
            seconds: 0,
            subseconds: 0,
            minutes: 0,
            hours: 0,
            week_day: 6,
            date: 1,
            month: 1,
            year: MIN_YEAR,
            timestamp: 946_684_800,
        }
    }
}

impl RtcDateTime {
    // 1-based indexing number of days in each month.
    // Note that the last month here is November, not December.
    const DAYS_IN_MONTH: [u32; 12] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30];

    const SECONDS_PER_DAY: u32 = 86_400;

    /// Convert the calendar fields to seconds since 1970-01-01 00:00:00, ignoring leap seconds.
    ///
    /// `timestamp` and `subseconds` are not read. The fields are expected to be in range (see
    /// [`RtcDateTime::validate`]); a day of zero is treated as the first of the month and years
    /// past 2106 wrap.
    pub const fn rtc_to_timestamp(&self) -> u32 {
        let days = Self::days_since_epoch(self.year, self.month, self.date);

        let secs = self.seconds as u32 + self.minutes as u32 * 60 + self.hours as u32 * 3600;

        days.wrapping_mul(Self::SECONDS_PER_DAY).wrapping_add(secs)
    }

    /// Convert seconds since 1970-01-01 00:00:00 (ignoring leap seconds) to a calendar record.
    ///
    /// The week day and `timestamp` are filled in, `subseconds` is zero.
    pub const fn from_timestamp(timestamp: u32) -> Result<RtcDateTime, DatetimeError> {
        let mut days = timestamp / Self::SECONDS_PER_DAY;
        let mut secs = timestamp % Self::SECONDS_PER_DAY;
        let week_day = Self::week_day_from_days(days);

        let mut year: u16 = 1970;
        let mut month: u8 = 1;

        while days >= 365 {
            if Self::is_leap_year(year) {
                if days >= 366 {
                    days -= 366;
                } else {
                    break;
                }
            } else {
                days -= 365;
            }
            year += 1;
        }

        if year < MIN_YEAR || year > MAX_YEAR {
            return Err(DatetimeError::Year);
        }

        while month < 12 && days >= Self::DAYS_IN_MONTH[month as usize] {
            if month == 2 && Self::is_leap_year(year) {
                if days >= 29 {
                    days -= 29;
                } else {
                    break;
                }
            } else {
                days -= Self::DAYS_IN_MONTH[month as usize];
            }
            month += 1;
        }

        let hours = secs / 3600;
        secs %= 3600;
        let minutes = secs / 60;
        let seconds = secs % 60;

        Ok(RtcDateTime {
            seconds: seconds as u8,
            subseconds: 0,
            minutes: minutes as u8,
            hours: hours as u8,
            week_day,
            date: days as u8 + 1,
            month,
            year,
            timestamp,
        })
    }

    /// Checks every calendar field against the range the RTC accepts.
    pub const fn validate(&self) -> Result<(), DatetimeError> {
        if self.year < MIN_YEAR || self.year > MAX_YEAR {
            return Err(DatetimeError::Year);
        }

        if self.month < 1 || self.month > 12 {
            return Err(DatetimeError::Month);
        }

        if self.date < 1 || self.date > Self::days_in_month(self.year, self.month) {
            return Err(DatetimeError::Day);
        }

        if self.week_day < 1 || self.week_day > 7 {
            return Err(DatetimeError::WeekDay);
        }

        if self.hours > 23 {
            return Err(DatetimeError::Hour);
        }

        if self.minutes > 59 {
            return Err(DatetimeError::Minute);
        }

        if self.seconds > 59 {
            return Err(DatetimeError::Second);
        }

        Ok(())
    }

    /// Recomputes `timestamp` from the calendar fields.
    pub fn update_timestamp(&mut self) {
        self.timestamp = self.rtc_to_timestamp();
    }

    /// Day of the week of a calendar date, 1-7 with Monday as 1.
    pub const fn weekday_of(year: u16, month: u8, date: u8) -> u8 {
        Self::week_day_from_days(Self::days_since_epoch(year, month, date))
    }

    /// Portion of the current second that has elapsed, in nanoseconds.
    ///
    /// `sync_prediv` is the synchronous prescaler the subsecond counter reloads from. Counter
    /// values above the prescaler (possible right after a shift operation) saturate to zero.
    pub const fn subsecond_nanos(&self, sync_prediv: u16) -> u32 {
        let elapsed = sync_prediv.saturating_sub(self.subseconds) as u64;
        (elapsed * 1_000_000_000 / (sync_prediv as u64 + 1)) as u32
    }

    /// Number of days in a month, 0 for an invalid month.
    pub const fn days_in_month(year: u16, month: u8) -> u8 {
        match month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 => {
                if Self::is_leap_year(year) {
                    29
                } else {
                    28
                }
            }
            _ => 0,
        }
    }

    /// Check if a year is a leap year.
    pub const fn is_leap_year(year: u16) -> bool {
        (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
    }

    const fn days_since_epoch(year: u16, month: u8, date: u8) -> u32 {
        let mut days: u32 = 0;

        // Calculate days from full years from 1970 to the current year
        {
            let mut y = 1970;
            while y < year {
                days += 365;
                if Self::is_leap_year(y) {
                    days += 1;
                }

                y += 1;
            }
        }

        // Calculate days from January to the current month
        {
            let mut m = 1;
            while m < month && m < 12 {
                days += Self::DAYS_IN_MONTH[m as usize];
                if m == 2 && Self::is_leap_year(year) {
                    days += 1;
                }

                m += 1;
            }
        }

        days + date.saturating_sub(1) as u32
    }

    // 1970-01-01 was a Thursday.
    const fn week_day_from_days(days: u32) -> u8 {
        ((days + 3) % 7) as u8 + 1
    }
}

/// Unix timestamp of the calendar fields of `rtc`; the stored `timestamp` is ignored.
pub const fn rtc_to_timestamp(rtc: &RtcDateTime) -> u32 {
    rtc.rtc_to_timestamp()
}

#[cfg(feature = "chrono")]
impl TryFrom<chrono::NaiveDateTime> for RtcDateTime {
    type Error = DatetimeError;

    fn try_from(date_time: chrono::NaiveDateTime) -> Result<RtcDateTime, DatetimeError> {
        if date_time.year() < MIN_YEAR as i32 || date_time.year() > MAX_YEAR as i32 {
            return Err(DatetimeError::Year);
        }

        // A leap second shows up as second 59 with an extra second of nanoseconds, so reading
        // `second()` already drops it. Subseconds depend on the prescaler and are not carried.
        let mut rtc = RtcDateTime {
            seconds: date_time.second() as u8,
            subseconds: 0,
            minutes: date_time.minute() as u8,
            hours: date_time.hour() as u8,
            week_day: date_time.weekday().number_from_monday() as u8,
            date: date_time.day() as u8,
            month: date_time.month() as u8,
            year: date_time.year() as u16,
            timestamp: 0,
        };
        rtc.update_timestamp();

        Ok(rtc)
    }
}

#[cfg(feature = "chrono")]
impl TryFrom<RtcDateTime> for chrono::NaiveDateTime {
    type Error = DatetimeError;

    fn try_from(rtc: RtcDateTime) -> Result<chrono::NaiveDateTime, DatetimeError> {
        rtc.validate()?;

        let date = chrono::NaiveDate::from_ymd_opt(rtc.year as i32, rtc.month as u32, rtc.date as u32)
            .ok_or(DatetimeError::Day)?;
        date.and_hms_opt(rtc.hours as u32, rtc.minutes as u32, rtc.seconds as u32)
            .ok_or(DatetimeError::Second)
    }
}
