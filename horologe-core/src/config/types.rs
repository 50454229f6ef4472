//! Configuration type definitions
//!
//! Loaded once at start-up and never changed afterwards.

use core::fmt::Write;
use heapless::String;

use crate::render::Palette;

/// Maximum SSID length (802.11)
pub const MAX_SSID_LEN: usize = 32;

/// Maximum WPA passphrase length
pub const MAX_PASSWORD_LEN: usize = 64;

/// Maximum time server host name length
pub const MAX_SERVER_LEN: usize = 64;

/// Maximum timezone label length
pub const MAX_TZ_LABEL_LEN: usize = 8;

/// Maximum device title length
pub const MAX_TITLE_LEN: usize = 24;

/// Banner capacity: title, label and " ( DST)"
pub const MAX_BANNER_LEN: usize = MAX_TITLE_LEN + MAX_TZ_LABEL_LEN + 8;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// SSID is empty
    MissingSsid,
    /// Time server host is empty
    MissingServer,
    /// GMT offset outside -12..=14 hours
    GmtOffsetOutOfRange,
    /// A zero interval or timeout
    ZeroInterval,
    /// `max_reconnect_attempts` is zero
    NoReconnectAttempts,
    /// Brightness range, step or start value is unusable
    InvalidBrightness,
    /// No animation frames
    NoAnimationFrames,
}

/// Wireless credentials
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NetworkConfig {
    pub ssid: String<MAX_SSID_LEN>,
    pub password: String<MAX_PASSWORD_LEN>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            ssid: String::try_from("your-ssid").unwrap_or_default(),
            password: String::try_from("your-password").unwrap_or_default(),
        }
    }
}

/// Time sync and timezone settings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeConfig {
    /// SNTP server host
    pub server: String<MAX_SERVER_LEN>,
    /// Whole hours east of UTC
    pub gmt_offset_hours: i8,
    pub dst_enabled: bool,
    /// Added on top of the GMT offset while DST is enabled
    pub dst_offset_s: i32,
    /// Shown in the banner ("SAST")
    pub timezone_label: String<MAX_TZ_LABEL_LEN>,
    /// Resync once this long has passed since the last success
    pub sync_interval_ms: u32,
    /// Spacing between attempts while syncs fail
    pub sync_retry_ms: u32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            server: String::try_from("pool.ntp.org").unwrap_or_default(),
            gmt_offset_hours: 2,
            dst_enabled: false,
            dst_offset_s: 3_600,
            timezone_label: String::try_from("SAST").unwrap_or_default(),
            sync_interval_ms: 600_000,
            sync_retry_ms: 1_000,
        }
    }
}

impl TimeConfig {
    /// Standard time offset from UTC in seconds
    pub fn tz_offset_s(&self) -> i32 {
        i32::from(self.gmt_offset_hours) * 3_600
    }

    /// DST offset in seconds, 0 while DST is disabled
    pub fn effective_dst_offset_s(&self) -> i32 {
        if self.dst_enabled {
            self.dst_offset_s
        } else {
            0
        }
    }
}

/// Link supervision policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkConfig {
    /// Minimum spacing between supervisor evaluations
    pub poll_interval_ms: u32,
    /// An attempt older than this has timed out
    pub connect_timeout_ms: u32,
    /// Timeouts tolerated before giving up
    pub max_reconnect_attempts: u8,
    /// Wait in `Failed` before starting over
    pub failure_cooldown_ms: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 5_000,
            connect_timeout_ms: 10_000,
            max_reconnect_attempts: 3,
            failure_cooldown_ms: 120_000,
        }
    }
}

/// Slack left inside an attempt for the radio's final reply
const JOIN_REPLY_MARGIN_MS: u32 = 500;

impl LinkConfig {
    /// How long the radio may spend on one join request
    ///
    /// Never longer than an attempt, so a timed-out attempt's join has ended
    /// before the supervisor asks for the next one.
    pub fn join_timeout_ms(&self) -> u32 {
        self.connect_timeout_ms
            .saturating_sub(JOIN_REPLY_MARGIN_MS)
            .max(self.connect_timeout_ms / 2)
    }
}

/// Display and button settings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UiConfig {
    /// Device name shown in the banner
    pub title: String<MAX_TITLE_LEN>,
    /// Backlight level at start-up
    pub brightness: u8,
    pub brightness_min: u8,
    pub brightness_max: u8,
    /// Change per button press
    pub brightness_step: u8,
    /// Yield between frames
    pub frame_delay_ms: u32,
    /// Frames in the animation loop
    pub animation_frames: u16,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            title: String::try_from("T-Display-S3 Clock").unwrap_or_default(),
            brightness: 100,
            brightness_min: 100,
            brightness_max: 250,
            brightness_step: 25,
            frame_delay_ms: 1,
            animation_frames: 12,
        }
    }
}

/// Complete clock configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockConfig {
    pub network: NetworkConfig,
    pub time: TimeConfig,
    pub link: LinkConfig,
    pub ui: UiConfig,
    /// Connection indicator colours (panel-specific)
    pub palette: Palette,
}

impl ClockConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Check for values the clock cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.network.ssid.is_empty() {
            return Err(ConfigError::MissingSsid);
        }
        if self.time.server.is_empty() {
            return Err(ConfigError::MissingServer);
        }
        if !(-12..=14).contains(&self.time.gmt_offset_hours) {
            return Err(ConfigError::GmtOffsetOutOfRange);
        }
        if self.time.sync_interval_ms == 0
            || self.time.sync_retry_ms == 0
            || self.link.poll_interval_ms == 0
            || self.link.connect_timeout_ms == 0
        {
            return Err(ConfigError::ZeroInterval);
        }
        if self.link.max_reconnect_attempts == 0 {
            return Err(ConfigError::NoReconnectAttempts);
        }
        let ui = &self.ui;
        if ui.brightness_min > ui.brightness_max
            || ui.brightness_step == 0
            || !(ui.brightness_min..=ui.brightness_max).contains(&ui.brightness)
        {
            return Err(ConfigError::InvalidBrightness);
        }
        if ui.animation_frames == 0 {
            return Err(ConfigError::NoAnimationFrames);
        }
        Ok(())
    }

    /// Header line: "{title} ({timezone}[ DST])"
    pub fn banner(&self) -> String<MAX_BANNER_LEN> {
        let mut text = String::new();
        let dst = if self.time.dst_enabled { " DST" } else { "" };
        // Capacity covers the longest title and label
        let _ = write!(
            text,
            "{} ({}{})",
            self.ui.title, self.time.timezone_label, dst
        );
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ClockConfig::new();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.time.tz_offset_s(), 7_200);
        assert_eq!(config.time.effective_dst_offset_s(), 0);
        assert_eq!(config.link.max_reconnect_attempts, 3);
        assert_eq!(config.link.failure_cooldown_ms, 120_000);
    }

    #[test]
    fn test_banner() {
        let mut config = ClockConfig::new();
        assert_eq!(config.banner().as_str(), "T-Display-S3 Clock (SAST)");
        config.time.dst_enabled = true;
        assert_eq!(config.banner().as_str(), "T-Display-S3 Clock (SAST DST)");
    }

    #[test]
    fn test_banner_fits_longest_fields() {
        let mut config = ClockConfig::new();
        config.ui.title = String::try_from("ABCDEFGHIJKLMNOPQRSTUVWX").unwrap();
        config.time.timezone_label = String::try_from("ABCDEFGH").unwrap();
        config.time.dst_enabled = true;
        assert_eq!(config.banner().len(), MAX_TITLE_LEN + MAX_TZ_LABEL_LEN + 7);
    }

    #[test]
    fn test_validate_rejects() {
        let mut config = ClockConfig::new();
        config.link.max_reconnect_attempts = 0;
        assert_eq!(config.validate(), Err(ConfigError::NoReconnectAttempts));

        let mut config = ClockConfig::new();
        config.link.connect_timeout_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroInterval));

        let mut config = ClockConfig::new();
        config.ui.brightness = 99;
        assert_eq!(config.validate(), Err(ConfigError::InvalidBrightness));

        let mut config = ClockConfig::new();
        config.ui.brightness_step = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidBrightness));

        let mut config = ClockConfig::new();
        config.time.gmt_offset_hours = 15;
        assert_eq!(config.validate(), Err(ConfigError::GmtOffsetOutOfRange));

        let mut config = ClockConfig::new();
        config.network.ssid.clear();
        assert_eq!(config.validate(), Err(ConfigError::MissingSsid));

        let mut config = ClockConfig::new();
        config.ui.animation_frames = 0;
        assert_eq!(config.validate(), Err(ConfigError::NoAnimationFrames));
    }

    #[test]
    fn test_join_timeout_within_attempt() {
        let mut link = LinkConfig::default();
        assert_eq!(link.join_timeout_ms(), 9_500);
        assert!(link.join_timeout_ms() <= link.connect_timeout_ms);

        link.connect_timeout_ms = 600;
        assert_eq!(link.join_timeout_ms(), 300);

        link.connect_timeout_ms = 1;
        assert_eq!(link.join_timeout_ms(), 0);
    }
}
