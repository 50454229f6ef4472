//! Configuration loading
//!
//! The configuration is compiled into the firmware from clock.toml and
//! parsed with the core's no_std parser at boot.

use defmt::*;

use horologe_core::config::{parse_config, ClockConfig};

/// Embedded configuration (compiled into firmware)
/// Edit clock.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../clock.toml");

/// Parse the embedded configuration, falling back to built-in defaults
pub fn load() -> ClockConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            error!("Using built-in defaults");
            ClockConfig::default()
        }
    }
}
