//! Daily alarm
//!
//! The DS1307 has no alarm hardware: the alarm time is kept in the first three
//! SRAM bytes and [`check_alarm()`](WireRtc::check_alarm) compares it against
//! the current time. It only reports a match during the matching second, so it
//! must be polled more than once per second.
//!
//! The DS3231 uses alarm 1 set to match hours, minutes and seconds. The chip
//! latches the A1F flag, which stays set until `check_alarm()` consumes it.

use crate::datetime::{bcd_to_decimal, decimal_to_bcd, decode_hours};
use crate::{AlarmSetting, AlarmStore, BitFlags, Error, Register, TimeSnapshot, WireRtc};

const SRAM_HOUR: usize = 0;
const SRAM_MINUTE: usize = 1;
const SRAM_SECOND: usize = 2;

impl<I2C> WireRtc<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Set the alarm to `hour:minute:second`.
    pub fn set_alarm(&mut self, alarm: AlarmSetting) -> Result<(), Error> {
        if alarm.hour > 23 || alarm.minute > 59 || alarm.second > 59 {
            return Err(Error::InvalidInputData);
        }
        match self.layout()?.alarm {
            AlarmStore::Sram => {
                self.set_sram_byte(SRAM_HOUR, alarm.hour)?;
                self.set_sram_byte(SRAM_MINUTE, alarm.minute)?;
                self.set_sram_byte(SRAM_SECOND, alarm.second)
            }
            AlarmStore::Alarm1 => {
                // A1M1-A1M3 clear, A1M4 set: once a day on h:m:s
                let payload = [
                    Register::ALARM1_SECONDS,
                    decimal_to_bcd(alarm.second),
                    decimal_to_bcd(alarm.minute),
                    decimal_to_bcd(alarm.hour),
                    BitFlags::ALARM_MATCH,
                ];
                self.write_data(&payload)?;
                self.clear_alarm1_flag()
            }
        }
    }

    /// Set the alarm to the time of day in `time`, ignoring its date.
    pub fn set_alarm_from_time(&mut self, time: &TimeSnapshot) -> Result<(), Error> {
        self.set_alarm(AlarmSetting {
            hour: time.hour,
            minute: time.minute,
            second: time.second,
        })
    }

    /// Read back the alarm time.
    pub fn alarm(&mut self) -> Result<AlarmSetting, Error> {
        match self.layout()?.alarm {
            AlarmStore::Sram => Ok(AlarmSetting {
                hour: self.sram_byte(SRAM_HOUR)?,
                minute: self.sram_byte(SRAM_MINUTE)?,
                second: self.sram_byte(SRAM_SECOND)?,
            }),
            AlarmStore::Alarm1 => {
                let mut data = [0; 3];
                self.read_data(Register::ALARM1_SECONDS, &mut data)?;
                Ok(AlarmSetting {
                    hour: decode_hours(data[2] & !BitFlags::ALARM_MATCH),
                    minute: bcd_to_decimal(data[1] & !BitFlags::ALARM_MATCH),
                    second: bcd_to_decimal(data[0] & !BitFlags::ALARM_MATCH),
                })
            }
        }
    }

    /// Reset the alarm to 00:00:00.
    pub fn reset_alarm(&mut self) -> Result<(), Error> {
        self.set_alarm(AlarmSetting::default())
    }

    /// Whether the alarm is going off.
    pub fn check_alarm(&mut self) -> Result<bool, Error> {
        match self.layout()?.alarm {
            AlarmStore::Sram => {
                let alarm = self.alarm()?;
                let (hour, minute, second) = self.read_time_short()?;
                Ok(alarm.hour == hour && alarm.minute == minute && alarm.second == second)
            }
            AlarmStore::Alarm1 => {
                let status = self.read_register(Register::STATUS)?;
                if status & BitFlags::ALARM1F == 0 {
                    return Ok(false);
                }
                self.clear_alarm1_flag()?;
                Ok(true)
            }
        }
    }

    fn clear_alarm1_flag(&mut self) -> Result<(), Error> {
        // flags are cleared by writing 0, writing 1 keeps A2F as it is
        self.update_register(Register::STATUS, |status| {
            (status & !BitFlags::ALARM1F) | BitFlags::ALARM2F
        })?;
        Ok(())
    }
}
