//! Chip autodetection

use log::{debug, warn};

use crate::{ChipVariant, Error, Register, WireRtc};

const PROBE: [u8; 2] = [0xEE, 0xDD];

impl<I2C> WireRtc<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Detect the attached chip and remember the result.
    pub fn begin(&mut self) -> Result<ChipVariant, Error> {
        let variant = self.detect()?;
        debug!("RTC detected as {:?}", variant);
        Ok(variant)
    }

    /// Identify the chip by writing a probe to the DS3231 temperature
    /// registers.
    ///
    /// On a DS1307 those addresses are SRAM and the probe reads back intact;
    /// the previous contents are then restored. On a DS3231 they are
    /// read-only sensor output and the probe is lost.
    ///
    /// This writes to the device. Do not run it while another master uses
    /// the bus.
    pub fn detect(&mut self) -> Result<ChipVariant, Error> {
        let mut saved = [0; 2];
        self.read_data(Register::TEMP_MSB, &mut saved)?;

        self.write_data(&[Register::TEMP_MSB, PROBE[0], PROBE[1]])?;

        let mut probe = [0; 2];
        if let Err(err) = self.read_data(Register::TEMP_MSB, &mut probe) {
            // the probe may sit in DS1307 SRAM, put the old bytes back
            if self
                .write_data(&[Register::TEMP_MSB, saved[0], saved[1]])
                .is_err()
            {
                warn!("could not restore RTC registers after failed probe");
            }
            return Err(err);
        }

        self.variant = if probe == PROBE {
            self.write_data(&[Register::TEMP_MSB, saved[0], saved[1]])?;
            ChipVariant::Ds1307
        } else {
            ChipVariant::Ds3231
        };
        Ok(self.variant)
    }

    pub fn is_ds1307(&self) -> bool {
        self.variant == ChipVariant::Ds1307
    }

    pub fn is_ds3231(&self) -> bool {
        self.variant == ChipVariant::Ds3231
    }
}
