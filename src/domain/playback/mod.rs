// SPDX-License-Identifier: MPL-2.0
//! Playback activation domain types.
//!
//! This module contains the states, commands and tunables of the per-item
//! playback lifecycle, independent of any presentation or infrastructure
//! concerns.

pub mod newtypes;
pub mod state;

// Re-export commonly used types
pub use newtypes::{
    ActivationOffset, LongPressDelay, MountRadius, SnapSettle, SplashDelay, VisibilityThreshold,
};
pub use state::{ActivationState, AppLifecycle, PlayerCommand};
