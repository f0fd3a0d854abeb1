// SPDX-License-Identifier: MPL-2.0
//! `iced_reels` is a vertical short-form video feed built with the Iced GUI
//! framework.
//!
//! A splash screen hands over to a paged, full-window feed in which exactly
//! one video plays at a time. Each mounted item owns an
//! [`ActivationController`](playback::ActivationController) that turns
//! visibility, long presses and window focus into play, pause and seek
//! commands for an `FFmpeg` backed player.

pub mod app;
pub mod application;
pub mod domain;
pub mod error;
pub mod feed;
pub mod i18n;
pub mod infrastructure;
pub mod logging;
pub mod playback;
pub mod ui;

/// Recording doubles for the player ports, shared with integration tests.
#[doc(hidden)]
pub mod test_utils;
