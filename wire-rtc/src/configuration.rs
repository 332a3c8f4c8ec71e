//! Device configuration

use crate::{Error, Register, SqWFreq, WireRtc};

impl<I2C> WireRtc<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Start the oscillator. DS1307 only, the DS3231 always runs.
    pub fn start_clock(&mut self) -> Result<(), Error> {
        let halt = self.layout()?.halt.ok_or(Error::Unsupported)?;
        self.update_register(Register::SECONDS, |seconds| seconds & !halt)?;
        Ok(())
    }

    /// Stop the oscillator. DS1307 only.
    pub fn halt_clock(&mut self) -> Result<(), Error> {
        let halt = self.layout()?.halt.ok_or(Error::Unsupported)?;
        self.update_register(Register::SECONDS, |seconds| seconds | halt)?;
        Ok(())
    }

    /// Whether the clock is counting. Always true on the DS3231.
    pub fn is_running(&mut self) -> Result<bool, Error> {
        match self.layout()?.halt {
            Some(halt) => Ok(self.read_register(Register::SECONDS)? & halt == 0),
            None => Ok(true),
        }
    }

    /// Enable the square-wave output.
    ///
    /// On the DS3231 this also switches the INT/SQW pin from interrupt to
    /// square-wave mode.
    pub fn enable_square_wave(&mut self) -> Result<(), Error> {
        let layout = self.layout()?;
        self.update_register(layout.control, |control| {
            (control | layout.sqw_enable) & !layout.sqw_enable_clears
        })?;
        Ok(())
    }

    /// Disable the square-wave output.
    pub fn disable_square_wave(&mut self) -> Result<(), Error> {
        let layout = self.layout()?;
        self.update_register(layout.control, |control| control & !layout.sqw_enable)?;
        Ok(())
    }

    /// Set the square-wave output frequency.
    pub fn set_square_wave_frequency(&mut self, freq: SqWFreq) -> Result<(), Error> {
        let layout = self.layout()?;
        let mask = layout.rate_mask();
        let bits = freq.code() << layout.rate_shift;
        self.update_register(layout.control, |control| (control & !mask) | bits)?;
        Ok(())
    }

    /// Enable the 32kHz output. DS3231 only.
    pub fn enable_32khz_output(&mut self) -> Result<(), Error> {
        let (register, bit) = self.layout()?.osc_32khz.ok_or(Error::Unsupported)?;
        self.update_register(register, |status| status | bit)?;
        Ok(())
    }

    /// Disable the 32kHz output. DS3231 only.
    pub fn disable_32khz_output(&mut self) -> Result<(), Error> {
        let (register, bit) = self.layout()?.osc_32khz.ok_or(Error::Unsupported)?;
        self.update_register(register, |status| status & !bit)?;
        Ok(())
    }
}
