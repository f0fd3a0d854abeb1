// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! This module contains concrete implementations of the port traits defined in
//! `application::port`.
//!
//! # Available Adapters
//!
//! - [`ffmpeg`]: Video playback via `FFmpeg` (implements [`PlayerFactory`]
//!   and [`PlayerBinding`])
//!
//! [`PlayerFactory`]: crate::application::port::PlayerFactory
//! [`PlayerBinding`]: crate::application::port::PlayerBinding

pub mod ffmpeg;

// Re-export main types for convenience
pub use ffmpeg::{FfmpegPlayer, FfmpegPlayerFactory};
