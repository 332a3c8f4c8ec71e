pub mod sim {
    //! Software model of the DS1307 and DS3231 register maps.
    //!
    //! Implements [`embedded_hal::i2c::I2c`] so the real driver can run
    //! against it on a host. The time registers are assumed to be in
    //! 24-hour mode.

    use embedded_hal::delay::DelayNs;
    use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
    use log::trace;
    use std::time::{Duration, Instant};

    /// I²C address both chips answer on.
    pub const ADDRESS: u8 = 0x68;

    const SECONDS: usize = 0x00;
    const MINUTES: usize = 0x01;
    const HOURS: usize = 0x02;
    const DOW: usize = 0x03;
    const DOM: usize = 0x04;
    const MONTH: usize = 0x05;
    const YEAR: usize = 0x06;
    const ALARM1_SECONDS: usize = 0x07;
    const ALARM1_DAY: usize = 0x0A;
    const CONTROL: usize = 0x0E;
    const STATUS: usize = 0x0F;
    const TEMP_MSB: usize = 0x11;
    const TEMP_LSB: usize = 0x12;

    const CH: u8 = 0b1000_0000;
    const CONV: u8 = 0b0010_0000;
    const ALARM1F: u8 = 0b0000_0001;
    const ALARM_MATCH: u8 = 0b1000_0000;
    // OSF, A2F, A1F can only be cleared
    const STATUS_CLEAR_ONLY: u8 = 0b1000_0011;
    const STATUS_WRITABLE: u8 = 0b0000_1000;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Model {
        Ds1307,
        Ds3231,
    }

    impl Model {
        /// Number of addressable registers.
        pub fn size(self) -> usize {
            match self {
                Model::Ds1307 => 0x40,
                Model::Ds3231 => 0x13,
            }
        }
    }

    #[derive(Debug)]
    pub struct SimRtc {
        model: Model,
        regs: [u8; 0x40],
        pointer: usize,
        present: bool,
        conversion_polls: Option<u32>,
        conversion_left: u32,
        epoch: Option<Instant>,
        seconds_applied: u64,
        fail_next: Option<ErrorKind>,
        transactions: usize,
    }

    impl SimRtc {
        /// Chip in its power-on state with the clock frozen.
        pub fn new(model: Model) -> Self {
            let mut regs = [0; 0x40];
            regs[DOW] = 0x01;
            regs[DOM] = 0x01;
            regs[MONTH] = 0x01;
            match model {
                Model::Ds1307 => {
                    regs[SECONDS] = CH;
                    regs[0x07] = 0b0000_0011;
                }
                Model::Ds3231 => {
                    regs[CONTROL] = 0b0001_1100;
                    regs[STATUS] = 0b1000_1000;
                    // 25.25 °C
                    regs[TEMP_MSB] = 0x19;
                    regs[TEMP_LSB] = 0x40;
                }
            }
            SimRtc {
                model,
                regs,
                pointer: 0,
                present: true,
                conversion_polls: Some(2),
                conversion_left: 0,
                epoch: None,
                seconds_applied: 0,
                fail_next: None,
                transactions: 0,
            }
        }

        pub fn ds1307() -> Self {
            Self::new(Model::Ds1307)
        }

        pub fn ds3231() -> Self {
            Self::new(Model::Ds3231)
        }

        /// Reads of the control register after which a forced conversion
        /// completes. `None` never completes.
        pub fn with_conversion_polls(mut self, polls: Option<u32>) -> Self {
            self.conversion_polls = polls;
            self
        }

        /// Let the time registers follow the host clock.
        pub fn with_real_time(mut self) -> Self {
            self.epoch = Some(Instant::now());
            self
        }

        /// A bus with nothing answering on the RTC address.
        pub fn absent(model: Model) -> Self {
            let mut sim = Self::new(model);
            sim.present = false;
            sim
        }

        pub fn model(&self) -> Model {
            self.model
        }

        /// Register value as the chip holds it.
        pub fn register(&self, address: u8) -> u8 {
            self.regs[usize::from(address)]
        }

        /// Overwrite a register, bypassing read-only and clear-only rules.
        pub fn set_register(&mut self, address: u8, value: u8) {
            self.regs[usize::from(address)] = value;
        }

        /// Completed bus transactions.
        pub fn transactions(&self) -> usize {
            self.transactions
        }

        /// Make the next transaction fail with `kind`.
        pub fn fail_next(&mut self, kind: ErrorKind) {
            self.fail_next = Some(kind);
        }

        /// Let `seconds` pass on the chip.
        pub fn advance(&mut self, seconds: u64) {
            if self.is_halted() {
                return;
            }
            for _ in 0..seconds {
                self.tick();
            }
        }

        fn is_halted(&self) -> bool {
            self.model == Model::Ds1307 && self.regs[SECONDS] & CH != 0
        }

        fn sync_real_time(&mut self) {
            let Some(epoch) = self.epoch else {
                return;
            };
            let elapsed = epoch.elapsed().as_secs();
            let pending = elapsed - self.seconds_applied;
            self.seconds_applied = elapsed;
            self.advance(pending);
        }

        fn tick(&mut self) {
            let mut second = bcd_to_decimal(self.regs[SECONDS] & !CH) + 1;
            let mut minute = bcd_to_decimal(self.regs[MINUTES]);
            let mut hour = bcd_to_decimal(self.regs[HOURS] & 0b0011_1111);
            let mut weekday = bcd_to_decimal(self.regs[DOW]);
            let mut day = bcd_to_decimal(self.regs[DOM]);
            let mut month = bcd_to_decimal(self.regs[MONTH]);
            let mut year = bcd_to_decimal(self.regs[YEAR]);

            if second == 60 {
                second = 0;
                minute += 1;
            }
            if minute == 60 {
                minute = 0;
                hour += 1;
            }
            if hour == 24 {
                hour = 0;
                day += 1;
                weekday = weekday % 7 + 1;
            }
            if day > days_in_month(month, year) {
                day = 1;
                month += 1;
            }
            if month == 13 {
                month = 1;
                year = (year + 1) % 100;
            }

            self.regs[SECONDS] = decimal_to_bcd(second);
            self.regs[MINUTES] = decimal_to_bcd(minute);
            self.regs[HOURS] = decimal_to_bcd(hour);
            self.regs[DOW] = decimal_to_bcd(weekday);
            self.regs[DOM] = decimal_to_bcd(day);
            self.regs[MONTH] = decimal_to_bcd(month);
            self.regs[YEAR] = decimal_to_bcd(year);

            if self.model == Model::Ds3231 && self.alarm1_matches() {
                self.regs[STATUS] |= ALARM1F;
            }
        }

        /// Alarm 1 in "hours, minutes and seconds match" mode.
        fn alarm1_matches(&self) -> bool {
            let alarm = &self.regs[ALARM1_SECONDS..=ALARM1_DAY];
            let once_a_day = alarm[3] & ALARM_MATCH != 0
                && alarm[..3].iter().all(|reg| reg & ALARM_MATCH == 0);
            once_a_day
                && alarm[0] == self.regs[SECONDS]
                && alarm[1] == self.regs[MINUTES]
                && alarm[2] & 0b0011_1111 == self.regs[HOURS] & 0b0011_1111
        }

        fn load(&mut self, address: usize) -> u8 {
            if self.model == Model::Ds3231
                && address == CONTROL
                && self.regs[CONTROL] & CONV != 0
                && self.conversion_polls.is_some()
            {
                if self.conversion_left == 0 {
                    self.regs[CONTROL] &= !CONV;
                } else {
                    self.conversion_left -= 1;
                }
            }
            self.regs[address]
        }

        fn store(&mut self, address: usize, value: u8) {
            match (self.model, address) {
                (Model::Ds3231, TEMP_MSB | TEMP_LSB) => {}
                (Model::Ds3231, STATUS) => {
                    let old = self.regs[STATUS];
                    self.regs[STATUS] = (value & STATUS_WRITABLE)
                        | (old & value & STATUS_CLEAR_ONLY)
                        | (old & !(STATUS_WRITABLE | STATUS_CLEAR_ONLY));
                }
                (Model::Ds3231, CONTROL) => {
                    if value & CONV != 0 && self.regs[CONTROL] & CONV == 0 {
                        self.conversion_left = self.conversion_polls.unwrap_or(0);
                    }
                    self.regs[CONTROL] = value;
                }
                _ => self.regs[address] = value,
            }
        }

        fn next_pointer(&mut self) -> usize {
            let address = self.pointer;
            self.pointer = (self.pointer + 1) % self.model.size();
            address
        }
    }

    impl ErrorType for SimRtc {
        type Error = ErrorKind;
    }

    impl I2c for SimRtc {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if let Some(kind) = self.fail_next.take() {
                return Err(kind);
            }
            if address != ADDRESS || !self.present {
                return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
            }
            self.sync_real_time();

            for operation in operations.iter_mut() {
                match operation {
                    Operation::Write(bytes) => {
                        let Some((first, data)) = bytes.split_first() else {
                            continue;
                        };
                        self.pointer = usize::from(*first) % self.model.size();
                        for byte in data {
                            let address = self.next_pointer();
                            self.store(address, *byte);
                        }
                        trace!("sim write {:02x?}", bytes);
                    }
                    Operation::Read(buffer) => {
                        for byte in buffer.iter_mut() {
                            let address = self.next_pointer();
                            *byte = self.load(address);
                        }
                        trace!("sim read {:02x?}", buffer);
                    }
                }
            }
            self.transactions += 1;
            Ok(())
        }
    }

    /// Blocking delay on the host thread.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct StdDelay;

    impl DelayNs for StdDelay {
        fn delay_ns(&mut self, ns: u32) {
            std::thread::sleep(Duration::from_nanos(u64::from(ns)));
        }
    }

    fn decimal_to_bcd(dec: u8) -> u8 {
        ((dec / 10) << 4) | (dec % 10)
    }

    fn bcd_to_decimal(bcd: u8) -> u8 {
        ((bcd >> 4) * 10) + (bcd & 0x0F)
    }

    fn days_in_month(month: u8, year: u8) -> u8 {
        match month {
            2 if year % 4 == 0 => 29,
            2 => 28,
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }

}

pub use sim::{Model, SimRtc, StdDelay, ADDRESS};
