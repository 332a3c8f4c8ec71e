use anyhow::Context;
use rtc_sim::Model;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use wire_rtc::{ChipVariant, PollConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub rtc: RtcConfig,
    pub clock: ClockConfig,
    pub alarm: AlarmConfig,
    pub conversion: ConversionConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chip {
    Ds1307,
    Ds3231,
}

impl Chip {
    pub fn model(self) -> Model {
        match self {
            Chip::Ds1307 => Model::Ds1307,
            Chip::Ds3231 => Model::Ds3231,
        }
    }

    pub fn variant(self) -> ChipVariant {
        match self {
            Chip::Ds1307 => ChipVariant::Ds1307,
            Chip::Ds3231 => ChipVariant::Ds3231,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RtcConfig {
    pub model: Chip,
    #[serde(default)]
    pub variant: Option<Chip>,
    #[serde(default)]
    pub real_time: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockConfig {
    pub timezone_offset_hours: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlarmConfig {
    pub offset_seconds: i64,
    pub poll_interval_ms: u32,
    pub max_polls: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    pub interval_us: u32,
    pub max_polls: u32,
}

const CONFIG_PATH: &str = "config.toml";

impl Config {
    /// `config.toml` from the working directory, or the built-in example.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Path::new(CONFIG_PATH))
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            log::warn!(
                "{} not found, using built-in rtc-console defaults",
                path.display()
            );
            return Self::parse(include_str!("../config.toml.example"));
        }
        let config = Self::parse(&fs::read_to_string(path)?)
            .with_context(|| format!("invalid rtc-console config in {}", path.display()))?;
        log::info!("rtc-console config loaded from {}", path.display());
        Ok(config)
    }

    fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

// Helper functions for easy access
impl Config {
    pub fn get_timezone_offset(&self) -> i32 {
        self.clock.timezone_offset_hours
    }

    pub fn get_conversion_poll(&self) -> PollConfig {
        PollConfig {
            interval_us: self.conversion.interval_us,
            max_polls: self.conversion.max_polls,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_defaults_parse() {
        let config: Config = toml::from_str(include_str!("../config.toml.example")).unwrap();
        assert_eq!(config.rtc.model, Chip::Ds3231);
        assert_eq!(config.rtc.variant, None);
        assert_eq!(config.get_timezone_offset(), -5);
        assert_eq!(config.get_conversion_poll(), PollConfig::default());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("rtc-console-no-such-config.toml");
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.rtc.model, Chip::Ds3231);
    }

    #[test]
    fn broken_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("rtc-console-{}.toml", std::process::id()));
        fs::write(&path, "[rtc]\nmodel = \"ds9999\"\n").unwrap();
        let result = Config::load_from(&path);
        fs::remove_file(&path).unwrap();
        assert!(result.is_err());
    }

    #[test]
    fn variant_override() {
        let config: Config = toml::from_str(
            r#"
            [rtc]
            model = "ds1307"
            variant = "ds3231"

            [clock]
            timezone_offset_hours = 0

            [alarm]
            offset_seconds = 1
            poll_interval_ms = 100
            max_polls = 20

            [conversion]
            interval_us = 10
            max_polls = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.rtc.model.model(), Model::Ds1307);
        assert_eq!(config.rtc.variant.map(Chip::variant), Some(ChipVariant::Ds3231));
        assert!(!config.rtc.real_time);
    }
}
