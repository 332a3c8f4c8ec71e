use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};
use rtc_sim::{Model, SimRtc};
use wire_rtc::{ChipVariant, Error, WireRtc};

/// Passes transfers to the simulated chip but fails one of them.
struct FlakyBus<'a> {
    sim: &'a mut SimRtc,
    transactions: usize,
    fail_at: usize,
}

impl ErrorType for FlakyBus<'_> {
    type Error = ErrorKind;
}

impl I2c for FlakyBus<'_> {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let index = self.transactions;
        self.transactions += 1;
        if index == self.fail_at {
            return Err(ErrorKind::Bus);
        }
        self.sim.transaction(address, operations)
    }
}

#[test]
fn detects_ds1307_and_restores_scratch_bytes() {
    let mut sim = SimRtc::ds1307();
    sim.set_register(0x11, 0x12);
    sim.set_register(0x12, 0x34);
    {
        let mut rtc = WireRtc::new(&mut sim);
        assert_eq!(rtc.begin(), Ok(ChipVariant::Ds1307));
        assert_eq!(rtc.detect(), Ok(ChipVariant::Ds1307));
        assert!(rtc.is_ds1307());
        assert!(!rtc.is_ds3231());
    }
    assert_eq!(sim.register(0x11), 0x12);
    assert_eq!(sim.register(0x12), 0x34);
}

#[test]
fn detects_ds3231() {
    let mut rtc = WireRtc::new(SimRtc::ds3231());
    assert_eq!(rtc.begin(), Ok(ChipVariant::Ds3231));
    assert_eq!(rtc.detect(), Ok(ChipVariant::Ds3231));
    assert_eq!(rtc.variant(), ChipVariant::Ds3231);

    // sensor output is untouched by the probe
    let sim = rtc.destroy();
    assert_eq!(sim.register(0x11), 0x19);
    assert_eq!(sim.register(0x12), 0x40);
}

#[test]
fn override_skips_detection() {
    let mut rtc = WireRtc::new(SimRtc::ds1307());
    assert_eq!(rtc.variant(), ChipVariant::Unknown);
    rtc.set_variant(ChipVariant::Ds3231);
    assert!(rtc.is_ds3231());

    let rtc = WireRtc::new_with_variant(SimRtc::ds3231(), ChipVariant::Ds1307);
    assert!(rtc.is_ds1307());
}

#[test]
fn undetected_chip_rejects_variant_specific_calls() {
    let mut rtc = WireRtc::new(SimRtc::ds3231());
    assert_eq!(rtc.temperature(), Err(Error::UnknownVariant));
    assert_eq!(rtc.sram_byte(0), Err(Error::UnknownVariant));
    assert_eq!(rtc.check_alarm(), Err(Error::UnknownVariant));
    assert_eq!(rtc.enable_square_wave(), Err(Error::UnknownVariant));
    // time access needs no variant
    assert!(rtc.read_time().is_ok());
}

#[test]
fn missing_device_is_reported() {
    let mut rtc = WireRtc::new(SimRtc::absent(Model::Ds1307));
    assert_eq!(rtc.begin(), Err(Error::NoDevice));
    assert_eq!(rtc.variant(), ChipVariant::Unknown);
}

#[test]
fn failed_readback_restores_scratch_bytes() {
    let mut sim = SimRtc::ds1307();
    sim.set_register(0x11, 0x12);
    sim.set_register(0x12, 0x34);
    {
        // save, write probe, then the readback fails
        let bus = FlakyBus {
            sim: &mut sim,
            transactions: 0,
            fail_at: 2,
        };
        let mut rtc = WireRtc::new(bus);
        assert_eq!(rtc.detect(), Err(Error::Comm(ErrorKind::Bus)));
        assert_eq!(rtc.variant(), ChipVariant::Unknown);
    }
    assert_eq!(sim.register(0x11), 0x12);
    assert_eq!(sim.register(0x12), 0x34);
}
