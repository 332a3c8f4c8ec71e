use chrono::{TimeDelta, Timelike, Utc};
use clock::Clock;
use log::*;
use rtc_sim::{SimRtc, StdDelay};
use wire_rtc::{Error, SqWFreq, WireRtc, SRAM_SIZE};

mod config;

use config::Config;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load()?;

    // No I2C controller on the host: a simulated chip sits on the bus
    let mut bus = SimRtc::new(config.rtc.model.model());
    if config.rtc.real_time {
        bus = bus.with_real_time();
    }
    info!("Simulating a {:?} on the bus", config.rtc.model);

    // ======== RTC: Initialization ========
    let mut clock = match config.rtc.variant {
        Some(chip) => {
            info!("Chip variant forced to {:?}", chip);
            Clock::with_variant(bus, chip.variant(), config.get_timezone_offset())?
        }
        None => Clock::new(bus, config.get_timezone_offset())?,
    };
    info!("RTC variant: {:?}", clock.variant());

    clock.set_from_utc(&Utc::now())?;
    let local = clock.local_date_time()?;
    let (hour, am) = clock.get_twelve_hour()?;
    info!(
        "{} ({} {})",
        local.format("%d/%m/%Y %H:%M:%S"),
        hour,
        if am { "AM" } else { "PM" }
    );

    // ======== RTC: Chip features ========
    report_features(clock.rtc(), &config)?;

    // ======== Alarm ========
    let alarm_at = local + TimeDelta::seconds(config.alarm.offset_seconds);
    clock.set_alarm(
        alarm_at.hour() as u8,
        alarm_at.minute() as u8,
        alarm_at.second() as u8,
    )?;
    info!("Alarm set for {}", alarm_at.format("%H:%M:%S"));

    let fired = clock.wait_for_alarm(
        &mut StdDelay,
        config.alarm.poll_interval_ms,
        config.alarm.max_polls,
    )?;
    if fired {
        info!("Alarm!");
    } else {
        warn!("Alarm did not fire while polling");
    }
    clock.rtc().reset_alarm()?;

    info!("Unix timestamp: {}", clock.datetime_to_unix_timestamp()?);
    Ok(())
}

fn report_features<I2C>(rtc: &mut WireRtc<I2C>, config: &Config) -> anyhow::Result<()>
where
    I2C: embedded_hal::i2c::I2c,
{
    info!("Clock running: {}", rtc.is_running()?);

    match rtc.convert_temperature_blocking(&mut StdDelay, config.get_conversion_poll()) {
        Ok(temperature) => info!("Temperature: {:.2} °C", temperature.celsius()),
        Err(Error::Unsupported) => info!("No temperature sensor"),
        Err(Error::Timeout) => warn!("Temperature conversion timed out"),
        Err(err) => return Err(err.into()),
    }

    rtc.set_square_wave_frequency(SqWFreq::_1Hz)?;
    rtc.enable_square_wave()?;
    info!("Square wave at {} Hz", SqWFreq::_1Hz.hz(rtc.variant())?);

    match rtc.disable_32khz_output() {
        Ok(()) => info!("32kHz output disabled"),
        Err(Error::Unsupported) => info!("No 32kHz output"),
        Err(err) => return Err(err.into()),
    }

    let mut sram = [0; SRAM_SIZE];
    match rtc.sram(&mut sram) {
        Ok(()) => {
            // the first bytes hold the alarm
            let used = sram[3..].iter().filter(|byte| **byte != 0).count();
            info!("SRAM: {} of {} user bytes in use", used, SRAM_SIZE - 3);
        }
        Err(Error::Unsupported) => info!("No SRAM"),
        Err(err) => return Err(err.into()),
    }
    Ok(())
}
