use crate::error::PinFinderError;
use crate::pins::{DEFAULT_BAUD_RATE, ENABLE_PIN, PIN_CONFIGS};
use crate::utils;

use std::collections::BTreeMap;
use tracing::{debug, warn};

pub const IDLE_POLL_US_DEFAULT: u64 = 1000;

/// TX/RX of the primary UART on a Raspberry Pi header.
pub const UART_PINS_DEFAULT: [u8; 2] = [14, 15];

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone)]
#[serde(default)]
pub struct BoardConfig {
    pub board_type: String,
    /// Shield pin number -> host GPIO line. Shield pins missing from the
    /// map are used as host line numbers unchanged.
    pub pin_map: BTreeMap<u8, u8>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            board_type: "BoardRppal".to_string(),
            pin_map: BTreeMap::new(),
        }
    }
}

impl BoardConfig {
    pub fn host_line(&self, shield_pin: u8) -> u8 {
        self.pin_map.get(&shield_pin).copied().unwrap_or(shield_pin)
    }
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone)]
#[serde(default)]
pub struct SerialConfig {
    pub port_type: String,
    pub device: String,
    pub baud_rate: u32,
    /// Host GPIO lines the UART's TX/RX live on.
    pub uart_pins: Vec<u8>,
}

impl Default for SerialConfig {
    fn default() -> Self {
        SerialConfig {
            port_type: "SerialUart".to_string(),
            device: "/dev/serial0".to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            uart_pins: UART_PINS_DEFAULT.to_vec(),
        }
    }
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub board: BoardConfig,
    pub serial: SerialConfig,
    pub idle_poll_us: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            board: BoardConfig::default(),
            serial: SerialConfig::default(),
            idle_poll_us: IDLE_POLL_US_DEFAULT,
        }
    }
}

impl AppConfig {
    /// Applies the `BOARD_TYPE` / `SERIAL_TYPE` environment overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var("BOARD_TYPE").ok(),
            std::env::var("SERIAL_TYPE").ok(),
        )
    }

    pub fn with_overrides(mut self, board_type: Option<String>, port_type: Option<String>) -> Self {
        if let Some(board_type) = board_type {
            self.board.board_type = board_type;
        }
        if let Some(port_type) = port_type {
            self.serial.port_type = port_type;
        }
        self
    }

    /// Checks that the shield pins land on distinct host lines and, when the
    /// command port is a host UART on the same GPIO block, that none of them
    /// lands on the UART's TX/RX.
    pub fn validate(&self) -> Result<(), PinFinderError> {
        if self.board.board_type != "BoardRppal" {
            return Ok(());
        }

        let mut shield_pins = vec![ENABLE_PIN];
        for config in PIN_CONFIGS.iter() {
            shield_pins.push(config.step_pin);
            shield_pins.push(config.dir_pin);
        }
        shield_pins.sort_unstable();
        shield_pins.dedup();

        let mut claimed: BTreeMap<u8, u8> = BTreeMap::new();
        for &pin in &shield_pins {
            let line = self.board.host_line(pin);
            if let Some(other) = claimed.insert(line, pin) {
                return Err(PinFinderError::Config(format!(
                    "Shield pins {} and {} both map to GPIO {}",
                    other, pin, line
                )));
            }
        }

        if self.serial.port_type == "SerialUart" {
            for (&line, &pin) in &claimed {
                if self.serial.uart_pins.contains(&line) {
                    return Err(PinFinderError::Config(format!(
                        "Shield pin {} maps to GPIO {}, which {} uses for TX/RX; add a pin_map entry or use SerialConsole",
                        pin, line, self.serial.device
                    )));
                }
            }
        }
        Ok(())
    }
}

pub fn load_app_config_from_str(config_str: &str) -> Result<AppConfig, PinFinderError> {
    serde_yaml::from_str(config_str)
        .map_err(|e| PinFinderError::Config(format!("Failed to parse config: {}", e)))
}

/// Reads the config file, falling back to defaults when it doesn't exist.
pub fn load_app_config() -> Result<AppConfig, PinFinderError> {
    let app_config_path = utils::filesystem::get_config_path();

    let app_config = match std::fs::read_to_string(&app_config_path) {
        Ok(config_str) => load_app_config_from_str(&config_str)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(
                "Config file not found (path: {}), using defaults",
                app_config_path
            );
            AppConfig::default()
        }
        Err(e) => {
            return Err(PinFinderError::Config(format!(
                "Failed to read config file at {}: {}",
                app_config_path, e
            )));
        }
    };

    // Log the config struct as json
    debug!(
        "Parsed app config: {}",
        serde_json::to_string(&app_config).unwrap_or_default()
    );
    Ok(app_config)
}
