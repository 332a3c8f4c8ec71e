use rtc_sim::SimRtc;
use wire_rtc::{AlarmSetting, ChipVariant, Error, TimeSnapshot, WireRtc};

const NOON_ONE: AlarmSetting = AlarmSetting {
    hour: 12,
    minute: 1,
    second: 0,
};

#[test]
fn emulated_alarm_matches_exact_second_only() {
    let mut rtc = WireRtc::new_with_variant(SimRtc::ds1307(), ChipVariant::Ds1307);
    rtc.set_alarm(NOON_ONE).unwrap();
    assert_eq!(rtc.alarm(), Ok(NOON_ONE));

    rtc.write_time_short(12, 1, 0).unwrap();
    assert_eq!(rtc.check_alarm(), Ok(true));
    // not latched: still true only while the second matches
    assert_eq!(rtc.check_alarm(), Ok(true));

    for (hour, minute, second) in [(13, 1, 0), (12, 2, 0), (12, 1, 1)] {
        rtc.write_time_short(hour, minute, second).unwrap();
        assert_eq!(rtc.check_alarm(), Ok(false));
    }
}

#[test]
fn emulated_alarm_lives_in_sram() {
    let mut sim = SimRtc::ds1307();
    {
        let mut rtc = WireRtc::new_with_variant(&mut sim, ChipVariant::Ds1307);
        rtc.set_alarm(NOON_ONE).unwrap();
        assert_eq!(rtc.sram_byte(0), Ok(12));
        assert_eq!(rtc.sram_byte(1), Ok(1));
        assert_eq!(rtc.sram_byte(2), Ok(0));
    }
    assert_eq!(sim.register(0x08), 12);

    let mut rtc = WireRtc::new_with_variant(&mut sim, ChipVariant::Ds1307);
    rtc.reset_alarm().unwrap();
    assert_eq!(rtc.alarm(), Ok(AlarmSetting::default()));
    assert_eq!(rtc.sram_byte(0), Ok(0));
}

#[test]
fn alarm_from_snapshot_ignores_date() {
    let mut rtc = WireRtc::new_with_variant(SimRtc::ds1307(), ChipVariant::Ds1307);
    let time = TimeSnapshot {
        hour: 6,
        minute: 45,
        second: 30,
        day: 17,
        month: 5,
        ..TimeSnapshot::default()
    };
    rtc.set_alarm_from_time(&time).unwrap();
    assert_eq!(
        rtc.alarm(),
        Ok(AlarmSetting {
            hour: 6,
            minute: 45,
            second: 30
        })
    );
}

#[test]
fn invalid_alarm_is_rejected() {
    let mut rtc = WireRtc::new_with_variant(SimRtc::ds1307(), ChipVariant::Ds1307);
    let alarm = AlarmSetting {
        hour: 24,
        minute: 0,
        second: 0,
    };
    assert_eq!(rtc.set_alarm(alarm), Err(Error::InvalidInputData));
}

#[test]
fn native_alarm_registers() {
    let mut sim = SimRtc::ds3231();
    {
        let mut rtc = WireRtc::new_with_variant(&mut sim, ChipVariant::Ds3231);
        rtc.set_alarm(NOON_ONE).unwrap();
        assert_eq!(rtc.alarm(), Ok(NOON_ONE));
    }
    assert_eq!(sim.register(0x07), 0x00);
    assert_eq!(sim.register(0x08), 0x01);
    assert_eq!(sim.register(0x09), 0x12);
    assert_eq!(sim.register(0x0A), 0x80);
}

#[test]
fn native_alarm_latches_until_checked() {
    let mut sim = SimRtc::ds3231();
    // A2F belongs to alarm 2 and must survive
    sim.set_register(0x0F, 0b0000_0010);
    {
        let mut rtc = WireRtc::new_with_variant(&mut sim, ChipVariant::Ds3231);
        rtc.set_alarm(NOON_ONE).unwrap();
        rtc.write_time_short(12, 0, 59).unwrap();
        assert_eq!(rtc.check_alarm(), Ok(false));
    }
    sim.advance(5);
    {
        let mut rtc = WireRtc::new_with_variant(&mut sim, ChipVariant::Ds3231);
        assert_eq!(rtc.check_alarm(), Ok(true));
        assert_eq!(rtc.check_alarm(), Ok(false));
    }
    assert_eq!(sim.register(0x0F) & 0b0000_0011, 0b0000_0010);
}

#[test]
fn native_alarm_reset() {
    let mut rtc = WireRtc::new_with_variant(SimRtc::ds3231(), ChipVariant::Ds3231);
    rtc.set_alarm(NOON_ONE).unwrap();
    rtc.reset_alarm().unwrap();
    assert_eq!(rtc.alarm(), Ok(AlarmSetting::default()));
}
