//! Driver for the DS1307 and DS3231 real-time clocks.
//!
//! Both chips answer on the same I²C address and share the time register
//! block, but differ in everything around it: the DS1307 has a clock-halt bit
//! and 56 bytes of battery-backed SRAM, the DS3231 has a temperature sensor,
//! a 32kHz output and hardware alarms. [`WireRtc`] detects which one is
//! attached (or is told) and dispatches each operation through the matching
//! register [`Layout`].
//!
//! ```no_run
//! # fn demo<I2C: embedded_hal::i2c::I2c>(i2c: I2C) -> Result<(), wire_rtc::Error> {
//! use wire_rtc::WireRtc;
//!
//! let mut rtc = WireRtc::new(i2c);
//! rtc.begin()?;
//! let now = rtc.read_time()?;
//! let _ = (now.hour, now.minute, now.second);
//! # Ok(())
//! # }
//! ```
#![deny(unsafe_code)]
#![no_std]

use core::fmt;

use embedded_hal::i2c::ErrorKind;
pub use rtcc::{DateTimeAccess, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// All possible errors in this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// I²C bus error
    Comm(ErrorKind),
    /// The device did not acknowledge its address.
    NoDevice,
    /// The bus could not deliver every requested byte.
    ShortRead,
    /// The attached chip has no such feature.
    Unsupported,
    /// The operation depends on the chip variant, which has not been
    /// detected or set yet.
    UnknownVariant,
    /// The chip did not finish a temperature conversion within the poll budget.
    Timeout,
    /// Invalid input data provided
    InvalidInputData,
    /// Internal device state is invalid.
    ///
    /// It was not possible to read a valid date and/or time.
    /// The device is probably missing initialization.
    InvalidDeviceState,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Comm(kind) => write!(f, "bus error: {kind}"),
            Error::NoDevice => f.write_str("no device acknowledged the RTC address"),
            Error::ShortRead => f.write_str("bus returned fewer bytes than requested"),
            Error::Unsupported => f.write_str("operation not supported by this chip"),
            Error::UnknownVariant => f.write_str("chip variant not detected"),
            Error::Timeout => f.write_str("temperature conversion did not complete"),
            Error::InvalidInputData => f.write_str("invalid input data"),
            Error::InvalidDeviceState => f.write_str("device registers hold no valid date"),
        }
    }
}

impl core::error::Error for Error {}

/// Chip attached to the bus.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ChipVariant {
    /// Not detected yet.
    #[default]
    Unknown,
    /// DS1307: clock-halt bit, 56 bytes of SRAM, no alarm, no sensor.
    Ds1307,
    /// DS3231: always running, temperature sensor, hardware alarms, no SRAM.
    Ds3231,
}

impl ChipVariant {
    /// Register layout of the variant.
    pub fn layout(self) -> Result<&'static Layout, Error> {
        match self {
            ChipVariant::Unknown => Err(Error::UnknownVariant),
            ChipVariant::Ds1307 => Ok(&DS1307_LAYOUT),
            ChipVariant::Ds3231 => Ok(&DS3231_LAYOUT),
        }
    }
}

/// Square-wave output frequency select.
///
/// The chips decode the same 2-bit selector into different rates, see
/// [`SqWFreq::hz`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqWFreq {
    /// 1 Hz on both chips (default)
    _1Hz,
    /// 4.096 kHz on the DS1307, 1.024 kHz on the DS3231
    Low,
    /// 8.192 kHz on the DS1307, 4.096 kHz on the DS3231
    Mid,
    /// 32.768 kHz on the DS1307, 8.192 kHz on the DS3231
    High,
}

impl SqWFreq {
    pub(crate) fn code(self) -> u8 {
        match self {
            SqWFreq::_1Hz => 0,
            SqWFreq::Low => 1,
            SqWFreq::Mid => 2,
            SqWFreq::High => 3,
        }
    }

    /// Output frequency in Hz on the given chip.
    pub fn hz(self, variant: ChipVariant) -> Result<u32, Error> {
        let table: [u32; 4] = match variant {
            ChipVariant::Unknown => return Err(Error::UnknownVariant),
            ChipVariant::Ds1307 => [1, 4_096, 8_192, 32_768],
            ChipVariant::Ds3231 => [1, 1_024, 4_096, 8_192],
        };
        Ok(table[usize::from(self.code())])
    }
}

/// Date and time as last read from the chip.
///
/// `twelve_hour` and `am` are derived when reading and ignored when writing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TimeSnapshot {
    /// 0-59
    pub second: u8,
    /// 0-59
    pub minute: u8,
    /// 0-23
    pub hour: u8,
    /// Day of month, 1-31
    pub day: u8,
    /// 1-12
    pub month: u8,
    /// Year within the century, 0-99
    pub year: u8,
    /// Day of week, 1-7
    pub weekday: u8,
    /// Hour on a 12-hour dial: 0-11
    pub twelve_hour: u8,
    pub am: bool,
}

/// Time of day at which the alarm fires.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AlarmSetting {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

/// Temperature reading of the DS3231 sensor.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Temperature {
    /// Whole degrees Celsius.
    pub integer: i8,
    /// Hundredths of a degree, in steps of 25.
    pub fraction: u8,
}

impl Temperature {
    pub fn celsius(&self) -> f32 {
        // the fraction bits extend the two's-complement value downwards
        let quarters = (i16::from(self.integer) << 2) | i16::from(self.fraction / 25);
        f32::from(quarters) / 4.0
    }
}

/// How long to wait for a forced temperature conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Pause between two reads of the conversion bit.
    pub interval_us: u32,
    /// Pauses before giving up with [`Error::Timeout`]. The bit is read
    /// once more after the last pause, so 0 still checks it once.
    pub max_polls: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        PollConfig {
            interval_us: 1_000,
            max_polls: 500,
        }
    }
}

struct Register;

impl Register {
    const SECONDS: u8 = 0x00;
    const DS1307_CONTROL: u8 = 0x07;
    const DS1307_SRAM: u8 = 0x08;
    const ALARM1_SECONDS: u8 = 0x07;
    const DS3231_CONTROL: u8 = 0x0E;
    const STATUS: u8 = 0x0F;
    const TEMP_MSB: u8 = 0x11;
}

struct BitFlags;

impl BitFlags {
    const CH: u8 = 0b1000_0000;
    const H24_H12: u8 = 0b0100_0000;
    const AM_PM: u8 = 0b0010_0000;
    const SQWE: u8 = 0b0001_0000;
    const BBSQW: u8 = 0b0100_0000;
    const TEMP_CONV: u8 = 0b0010_0000;
    const INTCN: u8 = 0b0000_0100;
    const EN32KHZ: u8 = 0b0000_1000;
    const ALARM2F: u8 = 0b0000_0010;
    const ALARM1F: u8 = 0b0000_0001;
    const ALARM_MATCH: u8 = 0b1000_0000;
}

const DEVICE_ADDRESS: u8 = 0b110_1000;

/// Size of the DS1307 SRAM in bytes.
pub const SRAM_SIZE: usize = 56;

/// Where the alarm time lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmStore {
    /// Plain hour, minute and second bytes at the start of SRAM.
    Sram,
    /// Native alarm 1 registers, reported through the A1F status flag.
    Alarm1,
}

/// Register addresses and bit masks of one chip variant.
#[derive(Debug, PartialEq, Eq)]
pub struct Layout {
    pub(crate) control: u8,
    pub(crate) sqw_enable: u8,
    /// Bits cleared together with setting `sqw_enable`.
    pub(crate) sqw_enable_clears: u8,
    pub(crate) rate_shift: u8,
    /// Clock-halt bit in the seconds register.
    pub(crate) halt: Option<u8>,
    /// Register and bit of the 32kHz output enable.
    pub(crate) osc_32khz: Option<(u8, u8)>,
    pub(crate) temperature: Option<u8>,
    pub(crate) conversion: Option<u8>,
    pub(crate) sram: Option<u8>,
    pub(crate) alarm: AlarmStore,
}

impl Layout {
    const RATE_MASK: u8 = 0b11;

    pub(crate) fn rate_mask(&self) -> u8 {
        Self::RATE_MASK << self.rate_shift
    }

    /// Whether the variant stores user data in SRAM.
    pub fn has_sram(&self) -> bool {
        self.sram.is_some()
    }

    /// Whether the variant carries a temperature sensor.
    pub fn has_temperature(&self) -> bool {
        self.temperature.is_some()
    }

    pub fn alarm_store(&self) -> AlarmStore {
        self.alarm
    }
}

static DS1307_LAYOUT: Layout = Layout {
    control: Register::DS1307_CONTROL,
    sqw_enable: BitFlags::SQWE,
    sqw_enable_clears: 0,
    rate_shift: 0,
    halt: Some(BitFlags::CH),
    osc_32khz: None,
    temperature: None,
    conversion: None,
    sram: Some(Register::DS1307_SRAM),
    alarm: AlarmStore::Sram,
};

static DS3231_LAYOUT: Layout = Layout {
    control: Register::DS3231_CONTROL,
    sqw_enable: BitFlags::BBSQW,
    sqw_enable_clears: BitFlags::INTCN,
    rate_shift: 3,
    halt: None,
    osc_32khz: Some((Register::STATUS, BitFlags::EN32KHZ)),
    temperature: Some(Register::TEMP_MSB),
    conversion: Some(BitFlags::TEMP_CONV),
    sram: None,
    alarm: AlarmStore::Alarm1,
};

/// DS1307 and DS3231 RTC driver
#[derive(Debug)]
pub struct WireRtc<I2C> {
    i2c: I2C,
    variant: ChipVariant,
    time: TimeSnapshot,
}

impl<I2C> WireRtc<I2C> {
    /// Create a driver for a chip that has not been identified yet.
    ///
    /// Call [`begin()`](#method.begin) or [`set_variant()`](#method.set_variant)
    /// before using chip-specific features.
    pub fn new(i2c: I2C) -> Self {
        Self::new_with_variant(i2c, ChipVariant::Unknown)
    }

    /// Create a driver for a known chip, skipping detection.
    pub fn new_with_variant(i2c: I2C, variant: ChipVariant) -> Self {
        WireRtc {
            i2c,
            variant,
            time: TimeSnapshot::default(),
        }
    }

    /// Destroy driver instance, return I²C bus instance.
    pub fn destroy(self) -> I2C {
        self.i2c
    }

    pub fn variant(&self) -> ChipVariant {
        self.variant
    }

    /// Force the chip variant, overriding detection.
    pub fn set_variant(&mut self, variant: ChipVariant) {
        self.variant = variant;
    }

    /// Snapshot filled by the most recent full time read.
    pub fn last_time(&self) -> &TimeSnapshot {
        &self.time
    }

    fn layout(&self) -> Result<&'static Layout, Error> {
        self.variant.layout()
    }
}

mod alarm;
mod bus;
mod configuration;
mod datetime;
mod detect;
mod sram;
mod temperature;

pub use crate::datetime::{bcd_to_decimal, decimal_to_bcd};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_variant_has_no_layout() {
        assert_eq!(ChipVariant::Unknown.layout(), Err(Error::UnknownVariant));
    }

    #[test]
    fn rate_field_positions() {
        assert_eq!(DS1307_LAYOUT.rate_mask(), 0b0000_0011);
        assert_eq!(DS3231_LAYOUT.rate_mask(), 0b0001_1000);
        // must not overlap the conversion bit
        assert_eq!(DS3231_LAYOUT.rate_mask() & BitFlags::TEMP_CONV, 0);
    }

    #[test]
    fn capabilities_per_variant() {
        let ds1307 = ChipVariant::Ds1307.layout().unwrap();
        assert!(ds1307.has_sram());
        assert!(!ds1307.has_temperature());
        assert_eq!(ds1307.alarm_store(), AlarmStore::Sram);

        let ds3231 = ChipVariant::Ds3231.layout().unwrap();
        assert!(!ds3231.has_sram());
        assert!(ds3231.has_temperature());
        assert_eq!(ds3231.alarm_store(), AlarmStore::Alarm1);
    }

    #[test]
    fn square_wave_rates() {
        assert_eq!(SqWFreq::_1Hz.hz(ChipVariant::Ds1307), Ok(1));
        assert_eq!(SqWFreq::High.hz(ChipVariant::Ds1307), Ok(32_768));
        assert_eq!(SqWFreq::Low.hz(ChipVariant::Ds3231), Ok(1_024));
        assert_eq!(SqWFreq::Mid.hz(ChipVariant::Unknown), Err(Error::UnknownVariant));
    }

    #[test]
    fn temperature_celsius() {
        let t = Temperature { integer: 25, fraction: 75 };
        assert_eq!(t.celsius(), 25.75);
        let t = Temperature { integer: -1, fraction: 75 };
        assert_eq!(t.celsius(), -0.25);
    }
}
