//! Battery-backed SRAM (DS1307)
//!
//! Transfers go one byte per transaction, so a bulk read is not atomic.
//! Bytes 0-2 hold the alarm time on this chip.

use crate::{Error, WireRtc, SRAM_SIZE};

impl<I2C> WireRtc<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn sram_address(&self, offset: usize) -> Result<u8, Error> {
        let base = self.layout()?.sram.ok_or(Error::Unsupported)?;
        if offset >= SRAM_SIZE {
            return Err(Error::InvalidInputData);
        }
        Ok(base + offset as u8)
    }

    pub fn sram_byte(&mut self, offset: usize) -> Result<u8, Error> {
        let address = self.sram_address(offset)?;
        self.read_register(address)
    }

    pub fn set_sram_byte(&mut self, offset: usize, data: u8) -> Result<(), Error> {
        let address = self.sram_address(offset)?;
        self.write_register(address, data)
    }

    /// Read the whole SRAM.
    pub fn sram(&mut self, data: &mut [u8; SRAM_SIZE]) -> Result<(), Error> {
        for (offset, byte) in data.iter_mut().enumerate() {
            *byte = self.sram_byte(offset)?;
        }
        Ok(())
    }

    /// Overwrite the whole SRAM.
    pub fn set_sram(&mut self, data: &[u8; SRAM_SIZE]) -> Result<(), Error> {
        for (offset, byte) in data.iter().enumerate() {
            self.set_sram_byte(offset, *byte)?;
        }
        Ok(())
    }
}
