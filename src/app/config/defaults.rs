// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! Bounds are owned by the domain newtypes; this module re-exports them so
//! the settings file, the CLI and the tests agree on a single source.
//!
//! # Categories
//!
//! - **Feed**: Splash delay, visibility threshold, mount radius, snap settle
//! - **Playback**: Long press, activation offset, player options

use crate::domain::playback::newtypes::{
    activation_offset_bounds, long_press_bounds, mount_radius_bounds, snap_settle_bounds,
    splash_bounds, visibility_bounds,
};

// ==========================================================================
// Feed Defaults
// ==========================================================================

/// Default time the splash screen stays up (milliseconds).
pub const DEFAULT_SPLASH_DELAY_MS: u64 = splash_bounds::DEFAULT_MS;

/// Maximum accepted splash delay (milliseconds).
pub const MAX_SPLASH_DELAY_MS: u64 = splash_bounds::MAX_MS;

/// Default share of the viewport an item must exceed to become current.
pub const DEFAULT_VISIBILITY_THRESHOLD_PERCENT: f32 = visibility_bounds::DEFAULT_PERCENT;

/// Minimum visibility threshold. Below a strict majority two items could qualify.
pub const MIN_VISIBILITY_THRESHOLD_PERCENT: f32 = visibility_bounds::MIN_PERCENT;

/// Maximum visibility threshold.
pub const MAX_VISIBILITY_THRESHOLD_PERCENT: f32 = visibility_bounds::MAX_PERCENT;

/// Default number of neighbours kept mounted on each side of the current item.
pub const DEFAULT_MOUNT_RADIUS: usize = mount_radius_bounds::DEFAULT;

/// Maximum mount radius.
pub const MAX_MOUNT_RADIUS: usize = mount_radius_bounds::MAX;

/// Default quiet period before the feed snaps to a page (milliseconds).
pub const DEFAULT_SNAP_SETTLE_MS: u64 = snap_settle_bounds::DEFAULT_MS;

// ==========================================================================
// Playback Defaults
// ==========================================================================

/// Default hold time before a press pauses playback (milliseconds).
pub const DEFAULT_LONG_PRESS_MS: u64 = long_press_bounds::DEFAULT_MS;

/// Minimum hold time (milliseconds).
pub const MIN_LONG_PRESS_MS: u64 = long_press_bounds::MIN_MS;

/// Maximum hold time (milliseconds).
pub const MAX_LONG_PRESS_MS: u64 = long_press_bounds::MAX_MS;

/// Default position sought to on activation (seconds).
pub const DEFAULT_ACTIVATION_OFFSET_SECS: f64 = activation_offset_bounds::DEFAULT;

/// Maximum activation offset (seconds).
pub const MAX_ACTIVATION_OFFSET_SECS: f64 = activation_offset_bounds::MAX;

/// Players restart at end of stream by default.
pub const DEFAULT_LOOP_ENABLED: bool = true;

/// Players start with audio by default.
pub const DEFAULT_MUTED: bool = false;

/// Backgrounding pauses the active player by default.
pub const DEFAULT_PAUSE_ON_BACKGROUND: bool = true;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_defaults_are_within_bounds() {
        assert!(DEFAULT_SPLASH_DELAY_MS <= MAX_SPLASH_DELAY_MS);
        assert!(DEFAULT_VISIBILITY_THRESHOLD_PERCENT >= MIN_VISIBILITY_THRESHOLD_PERCENT);
        assert!(DEFAULT_VISIBILITY_THRESHOLD_PERCENT <= MAX_VISIBILITY_THRESHOLD_PERCENT);
        assert!(DEFAULT_MOUNT_RADIUS <= MAX_MOUNT_RADIUS);
    }

    #[test]
    fn playback_defaults_are_within_bounds() {
        assert!(DEFAULT_LONG_PRESS_MS >= MIN_LONG_PRESS_MS);
        assert!(DEFAULT_LONG_PRESS_MS <= MAX_LONG_PRESS_MS);
        assert!(DEFAULT_ACTIVATION_OFFSET_SECS <= MAX_ACTIVATION_OFFSET_SECS);
        assert_eq!(DEFAULT_SPLASH_DELAY_MS, 2_000);
        assert_eq!(DEFAULT_LONG_PRESS_MS, 200);
    }
}
