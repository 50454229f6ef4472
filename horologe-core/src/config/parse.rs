//! Simple TOML parser for clock configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! the clock configuration. It does NOT support the full TOML grammar.
//!
//! Supported features:
//! - Key = value pairs (string, integer, boolean)
//! - Decimal and `0x` hexadecimal integers
//! - [section] headers
//! - Comments (# ...), including after a value
//!
//! NOT supported:
//! - Multi-line strings
//! - Arrays and inline tables
//! - Dotted keys

use heapless::String;

use super::types::{ClockConfig, ConfigError};
use crate::render::Color;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// Key not known in its section
    UnknownKey,
    /// String longer than its field allows
    ValueTooLong,
    /// Parsed but failed validation
    Invalid(ConfigError),
}

impl From<ConfigError> for ParseError {
    fn from(err: ConfigError) -> Self {
        ParseError::Invalid(err)
    }
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Network,
    Time,
    Link,
    Ui,
    Palette,
}

/// Parse TOML configuration into a validated ClockConfig
///
/// Keys that are absent keep their default value.
pub fn parse_config(input: &str) -> Result<ClockConfig, ParseError> {
    let mut config = ClockConfig::new();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            section = parse_section_header(line)?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidValue)?;
        apply_value(section, key, value, &mut config)?;
    }

    config.validate()?;
    Ok(config)
}

/// Parse a header line like "[time]"
fn parse_section_header(line: &str) -> Result<Section, ParseError> {
    let line = strip_comment(line);
    let name = line
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or(ParseError::InvalidSection)?;

    match name.trim() {
        "network" => Ok(Section::Network),
        "time" => Ok(Section::Time),
        "link" => Ok(Section::Link),
        "ui" => Ok(Section::Ui),
        "palette" => Ok(Section::Palette),
        _ => Err(ParseError::InvalidSection),
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut ClockConfig,
) -> Result<(), ParseError> {
    match section {
        Section::Root => return Err(ParseError::UnknownKey),
        Section::Network => {
            let net = &mut config.network;
            match key {
                "ssid" => net.ssid = parse_string(value)?,
                "password" => net.password = parse_string(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
        }
        Section::Time => {
            let time = &mut config.time;
            match key {
                "server" => time.server = parse_string(value)?,
                "gmt_offset_hours" => time.gmt_offset_hours = parse_int(value)?,
                "dst_enabled" => time.dst_enabled = parse_bool(value)?,
                "dst_offset_s" => time.dst_offset_s = parse_int(value)?,
                "timezone" => time.timezone_label = parse_string(value)?,
                "sync_interval_s" => time.sync_interval_ms = parse_seconds(value)?,
                "sync_retry_ms" => time.sync_retry_ms = parse_int(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
        }
        Section::Link => {
            let link = &mut config.link;
            match key {
                "poll_interval_ms" => link.poll_interval_ms = parse_int(value)?,
                "connect_timeout_ms" => link.connect_timeout_ms = parse_int(value)?,
                "max_reconnect_attempts" => link.max_reconnect_attempts = parse_int(value)?,
                "failure_cooldown_ms" => link.failure_cooldown_ms = parse_int(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
        }
        Section::Ui => {
            let ui = &mut config.ui;
            match key {
                "title" => ui.title = parse_string(value)?,
                "brightness" => ui.brightness = parse_int(value)?,
                "brightness_min" => ui.brightness_min = parse_int(value)?,
                "brightness_max" => ui.brightness_max = parse_int(value)?,
                "brightness_step" => ui.brightness_step = parse_int(value)?,
                "frame_delay_ms" => ui.frame_delay_ms = parse_int(value)?,
                "animation_frames" => ui.animation_frames = parse_int(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
        }
        Section::Palette => {
            let color = Color(parse_int(value)?);
            let palette = &mut config.palette;
            match key {
                "connected" => palette.connected = color,
                "connecting" => palette.connecting = color,
                "failed" => palette.failed = color,
                "offline" => palette.offline = color,
                _ => return Err(ParseError::UnknownKey),
            }
        }
    }
    Ok(())
}

/// Remove a trailing comment that is not inside a string
fn strip_comment(text: &str) -> &str {
    let mut in_string = false;
    for (i, c) in text.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return text[..i].trim_end(),
            _ => {}
        }
    }
    text
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = strip_comment(line[eq_pos + 1..].trim());

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a quoted string value into a bounded string
fn parse_string<const N: usize>(value: &str) -> Result<String<N>, ParseError> {
    let inner = value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or(ParseError::InvalidValue)?;
    String::try_from(inner).map_err(|_| ParseError::ValueTooLong)
}

/// Parse an integer value, decimal or `0x` hex
fn parse_int<T: TryFrom<i64>>(value: &str) -> Result<T, ParseError> {
    let (negative, digits) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    let mut digits_only: String<24> = String::new();
    for c in digits.chars().filter(|c| *c != '_') {
        digits_only.push(c).map_err(|_| ParseError::InvalidValue)?;
    }

    let magnitude = match digits_only
        .strip_prefix("0x")
        .or_else(|| digits_only.strip_prefix("0X"))
    {
        Some(hex) => i64::from_str_radix(hex, 16),
        None => digits_only.parse::<i64>(),
    }
    .map_err(|_| ParseError::InvalidValue)?;

    let signed = if negative { -magnitude } else { magnitude };
    T::try_from(signed).map_err(|_| ParseError::InvalidValue)
}

/// Parse whole seconds into milliseconds
fn parse_seconds(value: &str) -> Result<u32, ParseError> {
    let seconds: u32 = parse_int(value)?;
    seconds.checked_mul(1_000).ok_or(ParseError::InvalidValue)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
# Clock configuration

[network]
ssid = "home-net"
password = "p#ss"   # hash inside quotes is kept

[time]
server = "time.google.com"
gmt_offset_hours = -5
dst_enabled = true
dst_offset_s = 3600
timezone = "EST"
sync_interval_s = 3600

[link]
poll_interval_ms = 2_000
max_reconnect_attempts = 5

[ui]
title = "Desk Clock"
brightness = 150

[palette]
connected = 0x001F
"#;

    #[test]
    fn test_parse_sample() {
        let config = parse_config(SAMPLE).unwrap();
        assert_eq!(config.network.ssid.as_str(), "home-net");
        assert_eq!(config.network.password.as_str(), "p#ss");
        assert_eq!(config.time.server.as_str(), "time.google.com");
        assert_eq!(config.time.gmt_offset_hours, -5);
        assert!(config.time.dst_enabled);
        assert_eq!(config.time.timezone_label.as_str(), "EST");
        assert_eq!(config.time.sync_interval_ms, 3_600_000);
        assert_eq!(config.link.poll_interval_ms, 2_000);
        assert_eq!(config.link.max_reconnect_attempts, 5);
        assert_eq!(config.ui.title.as_str(), "Desk Clock");
        assert_eq!(config.ui.brightness, 150);
        assert_eq!(config.palette.connected, Color(0x001F));
        assert_eq!(config.banner().as_str(), "Desk Clock (EST DST)");
    }

    #[test]
    fn test_absent_keys_keep_defaults() {
        let config = parse_config("[network]\nssid = \"x\"\n").unwrap();
        assert_eq!(config.time, ClockConfig::new().time);
        assert_eq!(config.link, ClockConfig::new().link);
    }

    #[test]
    fn test_comment_inside_quotes() {
        assert_eq!(strip_comment(r#""a#b" # c"#), r#""a#b""#);
        assert_eq!(strip_comment("5 # five"), "5");
    }

    #[test]
    fn test_parse_int_forms() {
        assert_eq!(parse_int::<u16>("0xF800"), Ok(0xF800));
        assert_eq!(parse_int::<i8>("-12"), Ok(-12));
        assert_eq!(parse_int::<u32>("120_000"), Ok(120_000));
        assert_eq!(parse_int::<u8>("256"), Err(ParseError::InvalidValue));
        assert_eq!(parse_int::<u8>("ten"), Err(ParseError::InvalidValue));
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_config("[wifi]\n"), Err(ParseError::InvalidSection));
        assert_eq!(parse_config("[time]\nzone = 1\n"), Err(ParseError::UnknownKey));
        assert_eq!(parse_config("ssid = \"x\"\n"), Err(ParseError::UnknownKey));
        assert_eq!(
            parse_config("[time]\ndst_enabled = yes\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[time]\ntimezone = \"ABCDEFGHIJ\"\n"),
            Err(ParseError::ValueTooLong)
        );
        assert_eq!(
            parse_config("[network]\nssid = unquoted\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(parse_config("[link]\nbroken line\n"), Err(ParseError::InvalidValue));
    }

    #[test]
    fn test_validation_runs() {
        assert_eq!(
            parse_config("[link]\nmax_reconnect_attempts = 0\n"),
            Err(ParseError::Invalid(ConfigError::NoReconnectAttempts))
        );
    }
}
