//! Time and date registers

use crate::{
    BitFlags, DateTimeAccess, Datelike, Error, NaiveDate, NaiveDateTime, Register, TimeSnapshot,
    Timelike, WireRtc,
};

/// Encode a value 0-99 as packed BCD.
pub fn decimal_to_bcd(dec: u8) -> u8 {
    debug_assert!(dec < 100, "{} does not fit in two BCD digits", dec);
    (dec / 10).wrapping_mul(16).wrapping_add(dec % 10)
}

/// Decode a packed BCD byte.
pub fn bcd_to_decimal(bcd: u8) -> u8 {
    (bcd / 16) * 10 + (bcd % 16)
}

pub(crate) fn decode_hours(raw: u8) -> u8 {
    if raw & BitFlags::H24_H12 == 0 {
        return bcd_to_decimal(raw & 0b0011_1111);
    }
    let hour = bcd_to_decimal(raw & 0b0001_1111) % 12;
    if raw & BitFlags::AM_PM != 0 {
        hour + 12
    } else {
        hour
    }
}

/// 12-hour dial value and AM flag for a 24-hour `hour`.
pub(crate) fn twelve_hour(hour: u8) -> (u8, bool) {
    if hour < 12 {
        (hour, true)
    } else {
        (hour - 12, false)
    }
}

fn check_hms(hour: u8, minute: u8, second: u8) -> Result<(), Error> {
    if hour > 23 || minute > 59 || second > 59 {
        return Err(Error::InvalidInputData);
    }
    Ok(())
}

impl<I2C> WireRtc<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Read the full date and time in one transfer.
    ///
    /// The result also replaces the snapshot returned by
    /// [`last_time()`](#method.last_time).
    pub fn read_time(&mut self) -> Result<TimeSnapshot, Error> {
        let mut data = [0; 7];
        self.read_data(Register::SECONDS, &mut data)?;

        let hour = decode_hours(data[2]);
        let (twelve_hour, am) = twelve_hour(hour);
        self.time = TimeSnapshot {
            second: bcd_to_decimal(data[0] & !BitFlags::CH),
            minute: bcd_to_decimal(data[1]),
            hour,
            weekday: bcd_to_decimal(data[3]),
            day: bcd_to_decimal(data[4]),
            month: bcd_to_decimal(data[5]),
            year: bcd_to_decimal(data[6]),
            twelve_hour,
            am,
        };
        Ok(self.time)
    }

    /// Read hour, minute and second only.
    pub fn read_time_short(&mut self) -> Result<(u8, u8, u8), Error> {
        let mut data = [0; 3];
        self.read_data(Register::SECONDS, &mut data)?;
        Ok((
            decode_hours(data[2]),
            bcd_to_decimal(data[1]),
            bcd_to_decimal(data[0] & !BitFlags::CH),
        ))
    }

    /// Write the full date and time in 24-hour mode.
    ///
    /// `twelve_hour` and `am` are ignored. This always starts the clock.
    pub fn write_time(&mut self, time: &TimeSnapshot) -> Result<(), Error> {
        check_hms(time.hour, time.minute, time.second)?;
        if !(1..=31).contains(&time.day)
            || !(1..=12).contains(&time.month)
            || time.year > 99
            || !(1..=7).contains(&time.weekday)
        {
            return Err(Error::InvalidInputData);
        }
        let payload = [
            Register::SECONDS,
            decimal_to_bcd(time.second),
            decimal_to_bcd(time.minute),
            decimal_to_bcd(time.hour),
            decimal_to_bcd(time.weekday),
            decimal_to_bcd(time.day),
            decimal_to_bcd(time.month),
            decimal_to_bcd(time.year),
        ];
        self.write_data(&payload)
    }

    /// Write hour, minute and second only. This always starts the clock.
    pub fn write_time_short(&mut self, hour: u8, minute: u8, second: u8) -> Result<(), Error> {
        check_hms(hour, minute, second)?;
        let payload = [
            Register::SECONDS,
            decimal_to_bcd(second),
            decimal_to_bcd(minute),
            decimal_to_bcd(hour),
        ];
        self.write_data(&payload)
    }
}

impl<I2C> DateTimeAccess for WireRtc<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    type Error = Error;

    fn datetime(&mut self) -> Result<NaiveDateTime, Self::Error> {
        let time = self.read_time()?;
        NaiveDate::from_ymd_opt(
            2000 + i32::from(time.year),
            u32::from(time.month),
            u32::from(time.day),
        )
        .and_then(|date| {
            date.and_hms_opt(
                u32::from(time.hour),
                u32::from(time.minute),
                u32::from(time.second),
            )
        })
        .ok_or(Error::InvalidDeviceState)
    }

    /// Weekday is stored as 1 = Sunday.
    fn set_datetime(&mut self, datetime: &NaiveDateTime) -> Result<(), Self::Error> {
        if !(2000..=2099).contains(&datetime.year()) {
            return Err(Error::InvalidInputData);
        }
        let time = TimeSnapshot {
            second: datetime.second() as u8,
            minute: datetime.minute() as u8,
            hour: datetime.hour() as u8,
            day: datetime.day() as u8,
            month: datetime.month() as u8,
            year: (datetime.year() - 2000) as u8,
            weekday: datetime.weekday().number_from_sunday() as u8,
            ..TimeSnapshot::default()
        };
        self.write_time(&time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bcd_round_trip() {
        for v in 0..=99 {
            assert_eq!(bcd_to_decimal(decimal_to_bcd(v)), v);
        }
        assert_eq!(decimal_to_bcd(59), 0x59);
        assert_eq!(bcd_to_decimal(0x23), 23);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn bcd_rejects_three_digits() {
        decimal_to_bcd(160);
    }

    #[test]
    fn twelve_hour_derivation() {
        assert_eq!(twelve_hour(0), (0, true));
        assert_eq!(twelve_hour(11), (11, true));
        assert_eq!(twelve_hour(12), (0, false));
        assert_eq!(twelve_hour(23), (11, false));
    }

    #[test]
    fn hours_in_12h_mode_are_converted() {
        // 12 AM
        assert_eq!(decode_hours(BitFlags::H24_H12 | 0x12), 0);
        // 12 PM
        assert_eq!(decode_hours(BitFlags::H24_H12 | BitFlags::AM_PM | 0x12), 12);
        // 7 PM
        assert_eq!(decode_hours(BitFlags::H24_H12 | BitFlags::AM_PM | 0x07), 19);
        assert_eq!(decode_hours(0x21), 21);
    }
}
