//! Register access over I²C

use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};

use crate::{Error, WireRtc, DEVICE_ADDRESS};

fn write_error<E: embedded_hal::i2c::Error>(err: E) -> Error {
    match err.kind() {
        ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address) => Error::NoDevice,
        kind => Error::Comm(kind),
    }
}

fn read_error<E: embedded_hal::i2c::Error>(err: E) -> Error {
    match err.kind() {
        ErrorKind::Overrun => Error::ShortRead,
        _ => write_error(err),
    }
}

impl<I2C> WireRtc<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    pub(crate) fn write_register(&mut self, register: u8, data: u8) -> Result<(), Error> {
        let payload: [u8; 2] = [register, data];
        self.i2c.write(DEVICE_ADDRESS, &payload).map_err(write_error)
    }

    /// Write `payload[1..]` to consecutive registers starting at `payload[0]`.
    pub(crate) fn write_data(&mut self, payload: &[u8]) -> Result<(), Error> {
        self.i2c.write(DEVICE_ADDRESS, payload).map_err(write_error)
    }

    pub(crate) fn read_register(&mut self, register: u8) -> Result<u8, Error> {
        let mut data = [0];
        self.i2c
            .write_read(DEVICE_ADDRESS, &[register], &mut data)
            .map_err(read_error)?;
        Ok(data[0])
    }

    /// Fill `data` from consecutive registers starting at `register`.
    pub(crate) fn read_data(&mut self, register: u8, data: &mut [u8]) -> Result<(), Error> {
        self.i2c
            .write_read(DEVICE_ADDRESS, &[register], data)
            .map_err(read_error)
    }

    /// Read one register, apply `f` and write the result back.
    ///
    /// Not atomic: another bus master writing the register in between is lost.
    pub(crate) fn update_register<F>(&mut self, register: u8, f: F) -> Result<u8, Error>
    where
        F: FnOnce(u8) -> u8,
    {
        let value = f(self.read_register(register)?);
        self.write_register(register, value)?;
        Ok(value)
    }
}
