// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! This module defines abstract interfaces that infrastructure adapters implement.
//! These traits use only domain types, ensuring the feed and the playback
//! controller remain independent of concrete implementations.
//!
//! # Available Ports
//!
//! - [`player`]: Video player binding (play, pause, seek, frame polling)
//! - [`lifecycle`]: Application foreground/background notifications
//!
//! # Design Notes
//!
//! - All traits use domain types only (no Iced handles, no `FFmpeg` types)
//! - Player commands are fire-and-forget; failures surface through polling
//! - No `async fn` - use Iced's `Task` return type pattern in callers

pub mod lifecycle;
pub mod player;

// Re-export main types for convenience
pub use lifecycle::{LifecycleListener, LifecycleSource};
pub use player::{PlayerBinding, PlayerEvent, PlayerFactory, PlayerOptions, VideoFrame};
