use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::devices::manager::{DeviceConfigType, DmxOutputConfigType};
use crate::devices::opendmx::OpenDmxSenderConfig;
use crate::rig::{RigLayout, RigLayoutError};

#[derive(Deserialize, Serialize)]
pub struct LightwashConfig {
    frame_rate: u32,
    frame_buffer_size: u32,
    preset_file: String,
    rig: RigLayout,
    devices: Vec<StartupDevice>,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct StartupDevice {
    pub id: String,
    pub config: DeviceConfigType,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("frame_rate must be between 1 and 1000, got {0}")]
    InvalidFrameRate(u32),
    #[error("frame_buffer_size must be at least 1")]
    InvalidFrameBufferSize,
    #[error(transparent)]
    Rig(#[from] RigLayoutError),
}

impl LightwashConfig {
    pub fn frame_rate(&self) -> u32 {
        self.frame_rate
    }

    pub fn frame_buffer_size(&self) -> u32 {
        self.frame_buffer_size
    }

    pub fn preset_file(&self) -> &str {
        &self.preset_file
    }

    pub fn rig(&self) -> RigLayout {
        self.rig
    }

    pub fn devices(&self) -> &[StartupDevice] {
        &self.devices
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_rate == 0 || self.frame_rate > 1000 {
            return Err(ConfigError::InvalidFrameRate(self.frame_rate));
        }
        if self.frame_buffer_size == 0 {
            return Err(ConfigError::InvalidFrameBufferSize);
        }
        self.rig.validate()?;

        Ok(())
    }
}

/// The house rig: two chained 24-channel bars in 8-segment mode, 16 RGB
/// segments from address 1, refreshed every 10ms.
impl Default for LightwashConfig {
    fn default() -> LightwashConfig {
        LightwashConfig {
            frame_rate: 100,
            frame_buffer_size: 3,
            preset_file: "presets.json".to_string(),
            rig: RigLayout {
                first_address: 1,
                fixtures: 16,
            },
            devices: vec![StartupDevice {
                id: "open-dmx".to_string(),
                config: DeviceConfigType::DmxOutput(DmxOutputConfigType::OpenDmx(
                    OpenDmxSenderConfig::new("Enttec Open DMX".to_string()),
                )),
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = LightwashConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.frame_rate(), 100);
        assert_eq!(config.rig().fixtures, 16);
        assert_eq!(config.rig().footprint(), 48);
        assert_eq!(config.devices().len(), 1);
    }

    #[test]
    fn default_config_round_trips_through_json() {
        let config = LightwashConfig::default();

        let raw = serde_json::to_string(&config).unwrap();
        let reloaded: LightwashConfig = serde_json::from_str(&raw).unwrap();

        assert!(reloaded.validate().is_ok());
        assert_eq!(reloaded.frame_rate(), config.frame_rate());
        assert_eq!(reloaded.preset_file(), config.preset_file());
    }

    #[test]
    fn rejects_unusable_frame_rates() {
        let mut config = LightwashConfig::default();

        config.frame_rate = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidFrameRate(0)));

        config.frame_rate = 2000;
        assert_eq!(config.validate(), Err(ConfigError::InvalidFrameRate(2000)));
    }

    #[test]
    fn rejects_rigs_that_overflow_the_universe() {
        let mut config = LightwashConfig::default();
        config.rig = RigLayout {
            first_address: 500,
            fixtures: 16,
        };

        assert!(matches!(config.validate(), Err(ConfigError::Rig(_))));
    }
}
