// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration, read once at startup
//! from a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! The configuration is organized into logical sections:
//! - `[general]` - Language
//! - `[feed]` - Feed source, splash delay and paging tunables
//! - `[playback]` - Long press, activation offset and player options
//!
//! Every field is optional. Missing values fall back to [`defaults`] and
//! out-of-range values are clamped when converted to runtime settings.
//!
//! # Path Resolution
//!
//! The config file location can be customized for testing or portable deployments:
//! 1. Use `load_from_path()` with an explicit path
//! 2. Pass `--config-dir` or set `ICED_REELS_CONFIG_DIR`
//! 3. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use iced_reels::app::config::{self, Config};
//!
//! // Load existing configuration (returns tuple with optional warning)
//! let (config, _warning) = config::load();
//!
//! let settings = config.to_feed_settings();
//! println!("mount radius: {}", settings.mount_radius.value());
//! ```

pub mod defaults;

pub use defaults::*;

use crate::app::paths;
use crate::application::port::PlayerOptions;
use crate::domain::playback::{
    ActivationOffset, LongPressDelay, MountRadius, SnapSettle, SplashDelay, VisibilityThreshold,
};
use crate::error::Result;
use crate::feed::FeedSettings;
use crate::playback::ActivationSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";

/// Warning key returned when an existing settings file cannot be read.
pub const LOAD_WARNING_KEY: &str = "config-load-warning";

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// Language identifier such as `en-US` or `fr`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FeedConfig {
    /// Path to a TOML feed file. The embedded sample feed is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub splash_delay_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility_threshold_percent: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mount_radius: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snap_settle_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlaybackConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_press_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation_offset_secs: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muted: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pause_on_background: Option<bool>,
}

/// Application configuration with sectioned organization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub feed: FeedConfig,

    #[serde(default)]
    pub playback: PlaybackConfig,
}

impl Config {
    /// Splash duration, clamped to the accepted range.
    #[must_use]
    pub fn splash_delay(&self) -> SplashDelay {
        SplashDelay::from_millis(self.feed.splash_delay_ms.unwrap_or(DEFAULT_SPLASH_DELAY_MS))
    }

    /// Resolves the runtime feed tuning from this configuration.
    #[must_use]
    pub fn to_feed_settings(&self) -> FeedSettings {
        let feed = &self.feed;
        let playback = &self.playback;

        FeedSettings {
            visibility_threshold: VisibilityThreshold::from_percent(
                feed.visibility_threshold_percent
                    .unwrap_or(DEFAULT_VISIBILITY_THRESHOLD_PERCENT),
            ),
            mount_radius: MountRadius::new(feed.mount_radius.unwrap_or(DEFAULT_MOUNT_RADIUS)),
            snap_settle: SnapSettle::from_millis(
                feed.snap_settle_ms.unwrap_or(DEFAULT_SNAP_SETTLE_MS),
            ),
            activation: ActivationSettings {
                seek_offset: ActivationOffset::new(
                    playback
                        .activation_offset_secs
                        .unwrap_or(DEFAULT_ACTIVATION_OFFSET_SECS),
                ),
                long_press: LongPressDelay::from_millis(
                    playback.long_press_ms.unwrap_or(DEFAULT_LONG_PRESS_MS),
                ),
                pause_on_background: playback
                    .pause_on_background
                    .unwrap_or(DEFAULT_PAUSE_ON_BACKGROUND),
            },
            player: PlayerOptions {
                loop_enabled: playback.loop_enabled.unwrap_or(DEFAULT_LOOP_ENABLED),
                muted: playback.muted.unwrap_or(DEFAULT_MUTED),
            },
        }
    }
}

// =============================================================================
// Loading and saving
// =============================================================================

fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

/// Loads the configuration from the default location.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with an i18n key describing the problem.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from `base_dir` (or the resolved config dir).
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    let Some(path) = get_config_path_with_override(base_dir) else {
        return (Config::default(), None);
    };
    if !path.exists() {
        return (Config::default(), None);
    }
    match load_from_path(&path) {
        Ok(config) => (config, None),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "failed to load settings, using defaults");
            (Config::default(), Some(LOAD_WARNING_KEY.to_string()))
        }
    }
}

/// Reads and parses a settings file.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read and [`Error::Config`] if
/// it is not a valid settings document.
///
/// [`Error::Io`]: crate::error::Error::Io
/// [`Error::Config`]: crate::error::Error::Config
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}
