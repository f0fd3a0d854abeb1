// SPDX-License-Identifier: MPL-2.0
//! Playback and feed timing newtypes.
//!
//! This module provides type-safe wrappers for the tunable timings and
//! thresholds of the feed, ensuring they are always within valid ranges.

use std::time::Duration;

// =============================================================================
// LongPressDelay
// =============================================================================

/// Long-press delay bounds in milliseconds.
pub mod long_press_bounds {
    /// Shortest hold still told apart from a tap.
    pub const MIN_MS: u64 = 50;
    /// Longest accepted hold delay.
    pub const MAX_MS: u64 = 2_000;
    /// Default hold delay before a press pauses playback.
    pub const DEFAULT_MS: u64 = 200;
}

/// How long a press must be held before it counts as a long press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongPressDelay(u64);

impl LongPressDelay {
    /// Creates a new delay, clamping to valid range.
    #[must_use]
    pub fn from_millis(ms: u64) -> Self {
        Self(ms.clamp(long_press_bounds::MIN_MS, long_press_bounds::MAX_MS))
    }

    #[must_use]
    pub fn as_millis(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl Default for LongPressDelay {
    fn default() -> Self {
        Self(long_press_bounds::DEFAULT_MS)
    }
}

// =============================================================================
// ActivationOffset
// =============================================================================

/// Activation seek offset bounds in seconds.
pub mod activation_offset_bounds {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 5.0;
    /// Slightly past zero so the first rendered frame is never a black one.
    pub const DEFAULT: f64 = 0.5;
}

/// Position a video seeks to when its item becomes active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivationOffset(f64);

impl ActivationOffset {
    /// Creates a new offset, clamping to valid range. NaN maps to the default.
    #[must_use]
    pub fn new(secs: f64) -> Self {
        if secs.is_nan() {
            return Self::default();
        }
        Self(secs.clamp(
            activation_offset_bounds::MIN,
            activation_offset_bounds::MAX,
        ))
    }

    #[must_use]
    pub fn as_secs(self) -> f64 {
        self.0
    }
}

impl Default for ActivationOffset {
    fn default() -> Self {
        Self(activation_offset_bounds::DEFAULT)
    }
}

// =============================================================================
// SplashDelay
// =============================================================================

/// Splash delay bounds in milliseconds.
pub mod splash_bounds {
    pub const MIN_MS: u64 = 0;
    pub const MAX_MS: u64 = 10_000;
    pub const DEFAULT_MS: u64 = 2_000;
}

/// Time the splash screen stays up before the feed replaces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplashDelay(u64);

impl SplashDelay {
    #[must_use]
    pub fn from_millis(ms: u64) -> Self {
        Self(ms.clamp(splash_bounds::MIN_MS, splash_bounds::MAX_MS))
    }

    #[must_use]
    pub fn as_millis(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl Default for SplashDelay {
    fn default() -> Self {
        Self(splash_bounds::DEFAULT_MS)
    }
}

// =============================================================================
// VisibilityThreshold
// =============================================================================

/// Visibility threshold bounds in percent.
///
/// The lower bound is 50%: with items exactly one viewport tall, a strict
/// majority guarantees that at most one item qualifies.
pub mod visibility_bounds {
    pub const MIN_PERCENT: f32 = 50.0;
    pub const MAX_PERCENT: f32 = 99.0;
    pub const DEFAULT_PERCENT: f32 = 50.0;
}

/// Fraction of the viewport an item must exceed to become the current one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityThreshold(f32);

impl VisibilityThreshold {
    #[must_use]
    pub fn from_percent(percent: f32) -> Self {
        if percent.is_nan() {
            return Self::default();
        }
        Self(percent.clamp(
            visibility_bounds::MIN_PERCENT,
            visibility_bounds::MAX_PERCENT,
        ))
    }

    #[must_use]
    pub fn percent(self) -> f32 {
        self.0
    }

    /// Threshold as a fraction in `0.5..=0.99`.
    #[must_use]
    pub fn fraction(self) -> f32 {
        self.0 / 100.0
    }
}

impl Default for VisibilityThreshold {
    fn default() -> Self {
        Self(visibility_bounds::DEFAULT_PERCENT)
    }
}

// =============================================================================
// MountRadius
// =============================================================================

/// Mount radius bounds (items kept alive on each side of the current one).
pub mod mount_radius_bounds {
    pub const MIN: usize = 0;
    pub const MAX: usize = 3;
    pub const DEFAULT: usize = 1;
}

/// Number of neighbours on each side of the current item that keep a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MountRadius(usize);

impl MountRadius {
    #[must_use]
    pub fn new(radius: usize) -> Self {
        Self(radius.clamp(mount_radius_bounds::MIN, mount_radius_bounds::MAX))
    }

    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }

    /// Returns true when `index` lies within the radius around `center`.
    #[must_use]
    pub fn contains(self, center: usize, index: usize) -> bool {
        center.abs_diff(index) <= self.0
    }
}

impl Default for MountRadius {
    fn default() -> Self {
        Self(mount_radius_bounds::DEFAULT)
    }
}

// =============================================================================
// SnapSettle
// =============================================================================

/// Snap settle bounds in milliseconds.
pub mod snap_settle_bounds {
    pub const MIN_MS: u64 = 30;
    pub const MAX_MS: u64 = 1_000;
    pub const DEFAULT_MS: u64 = 120;
}

/// Quiet period after the last scroll event before the feed snaps to a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapSettle(u64);

impl SnapSettle {
    #[must_use]
    pub fn from_millis(ms: u64) -> Self {
        Self(ms.clamp(snap_settle_bounds::MIN_MS, snap_settle_bounds::MAX_MS))
    }

    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl Default for SnapSettle {
    fn default() -> Self {
        Self(snap_settle_bounds::DEFAULT_MS)
    }
}
