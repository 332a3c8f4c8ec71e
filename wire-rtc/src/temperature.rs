//! Temperature sensor (DS3231)

use embedded_hal::delay::DelayNs;
use log::warn;

use crate::{Error, Layout, PollConfig, Temperature, WireRtc};

impl<I2C> WireRtc<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Read the last temperature conversion result.
    pub fn temperature(&mut self) -> Result<Temperature, Error> {
        let register = self.layout()?.temperature.ok_or(Error::Unsupported)?;
        let mut data = [0; 2];
        self.read_data(register, &mut data)?;
        Ok(Temperature {
            integer: data[0] as i8,
            fraction: (data[1] >> 6) * 25,
        })
    }

    /// Start a temperature conversion and TCXO update without waiting for it.
    ///
    /// Does nothing if a conversion is already running.
    pub fn force_temperature_conversion(&mut self) -> Result<(), Error> {
        let (layout, conv) = self.conversion_bit()?;
        let control = self.read_register(layout.control)?;
        if control & conv == 0 {
            self.write_register(layout.control, control | conv)?;
        }
        Ok(())
    }

    /// Whether a conversion started earlier is still running.
    pub fn temperature_conversion_pending(&mut self) -> Result<bool, Error> {
        let (layout, conv) = self.conversion_bit()?;
        Ok(self.read_register(layout.control)? & conv != 0)
    }

    /// Poll until the chip clears the conversion bit.
    pub fn wait_temperature_conversion<D: DelayNs>(
        &mut self,
        delay: &mut D,
        poll: PollConfig,
    ) -> Result<(), Error> {
        let mut waited = 0;
        loop {
            if !self.temperature_conversion_pending()? {
                return Ok(());
            }
            if waited == poll.max_polls {
                break;
            }
            delay.delay_us(poll.interval_us);
            waited += 1;
        }
        warn!(
            "temperature conversion still pending after {} polls",
            poll.max_polls
        );
        Err(Error::Timeout)
    }

    /// Start a conversion and block until it completes or `poll` runs out.
    pub fn convert_temperature_blocking<D: DelayNs>(
        &mut self,
        delay: &mut D,
        poll: PollConfig,
    ) -> Result<Temperature, Error> {
        self.force_temperature_conversion()?;
        self.wait_temperature_conversion(delay, poll)?;
        self.temperature()
    }

    fn conversion_bit(&self) -> Result<(&'static Layout, u8), Error> {
        let layout = self.layout()?;
        let conv = layout.conversion.ok_or(Error::Unsupported)?;
        Ok((layout, conv))
    }
}
