pub mod clock {
    use chrono::prelude::*;
    use chrono::MappedLocalTime;
    use embedded_hal::delay::DelayNs;
    use log::{debug, info};
    use wire_rtc::{AlarmSetting, ChipVariant, DateTimeAccess, Error, WireRtc};

    pub struct Clock<I2C> {
        rtc: WireRtc<I2C>,
        offset: FixedOffset,
    }

    impl<I2C> Clock<I2C>
    where
        I2C: embedded_hal::i2c::I2c,
    {
        /// Constructor for Clock, detects the attached chip.
        ///
        /// The RTC keeps local time, `timezone_offset_hours` east of UTC.
        pub fn new(i2c: I2C, timezone_offset_hours: i32) -> Result<Clock<I2C>, Error> {
            let mut clock = Self::with_variant(i2c, ChipVariant::Unknown, timezone_offset_hours)?;
            clock.rtc.begin()?;
            Ok(clock)
        }

        /// Constructor for Clock with a known chip.
        pub fn with_variant(
            i2c: I2C,
            variant: ChipVariant,
            timezone_offset_hours: i32,
        ) -> Result<Clock<I2C>, Error> {
            let offset = timezone_offset_hours
                .checked_mul(3600)
                .and_then(FixedOffset::east_opt)
                .ok_or(Error::InvalidInputData)?;
            Ok(Clock {
                rtc: WireRtc::new_with_variant(i2c, variant),
                offset,
            })
        }

        /// Access to the driver for chip-specific features.
        pub fn rtc(&mut self) -> &mut WireRtc<I2C> {
            &mut self.rtc
        }

        pub fn variant(&self) -> ChipVariant {
            self.rtc.variant()
        }

        /// Method to get the hours
        pub fn get_hour(&mut self) -> Result<u8, Error> {
            Ok(self.rtc.read_time_short()?.0)
        }

        /// Method to get the minutes
        pub fn get_minutes(&mut self) -> Result<u8, Error> {
            Ok(self.rtc.read_time_short()?.1)
        }

        /// Method to get the seconds
        pub fn get_seconds(&mut self) -> Result<u8, Error> {
            Ok(self.rtc.read_time_short()?.2)
        }

        /// Hour on a 12-hour dial and whether it is AM
        pub fn get_twelve_hour(&mut self) -> Result<(u8, bool), Error> {
            let time = self.rtc.read_time()?;
            Ok((time.twelve_hour, time.am))
        }

        /// Method for setting the local date and time
        pub fn set_date_time(&mut self, date_time: &NaiveDateTime) -> Result<(), Error> {
            self.rtc.set_datetime(date_time)
        }

        /// Set the clock from a UTC instant, e.g. after an NTP sync
        pub fn set_from_utc(&mut self, now: &DateTime<Utc>) -> Result<(), Error> {
            let local = now.with_timezone(&self.offset).naive_local();
            info!("Setting RTC to {}", local.format("%d/%m/%Y %H:%M:%S"));
            self.set_date_time(&local)
        }

        /// Method for returning the local date and time
        pub fn get_date_time(&mut self) -> Result<NaiveDateTime, Error> {
            self.rtc.datetime()
        }

        /// Local date and time with the configured offset attached
        pub fn local_date_time(&mut self) -> Result<DateTime<FixedOffset>, Error> {
            let current_time: MappedLocalTime<DateTime<FixedOffset>> =
                self.get_date_time()?.and_local_timezone(self.offset);
            current_time.single().ok_or(Error::InvalidDeviceState)
        }

        ///Returns a unix timestamp based on the current date time provided
        pub fn datetime_to_unix_timestamp(&mut self) -> Result<i64, Error> {
            Ok(self.local_date_time()?.timestamp())
        }

        pub fn set_alarm(&mut self, hour: u8, minute: u8, second: u8) -> Result<(), Error> {
            self.rtc.set_alarm(AlarmSetting {
                hour,
                minute,
                second,
            })
        }

        /// Poll the alarm every `poll_interval_ms` until it fires or
        /// `max_polls` runs out.
        ///
        /// On a DS1307 the alarm is only visible during its second, so the
        /// interval has to stay below 1000 ms.
        pub fn wait_for_alarm<D: DelayNs>(
            &mut self,
            delay: &mut D,
            poll_interval_ms: u32,
            max_polls: u32,
        ) -> Result<bool, Error> {
            if self.rtc.variant() == ChipVariant::Ds1307 && poll_interval_ms >= 1000 {
                return Err(Error::InvalidInputData);
            }
            for poll in 0..max_polls {
                if self.rtc.check_alarm()? {
                    info!("Alarm fired after {} polls", poll);
                    return Ok(true);
                }
                delay.delay_ms(poll_interval_ms);
            }
            debug!("No alarm within {} polls", max_polls);
            Ok(false)
        }
    }
}

pub use clock::Clock;
