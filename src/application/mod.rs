// SPDX-License-Identifier: MPL-2.0
//! Application layer - Ports for dependency inversion.
//!
//! - [`port`]: Trait definitions (interfaces) that infrastructure implements
//!
//! # Dependency Rule
//!
//! - Application layer depends on domain layer (uses domain types)
//! - Infrastructure layer implements application layer ports
//! - Presentation layer (the feed, the controller) consumes ports only
//!
//! # Example
//!
//! ```ignore
//! use iced_reels::application::port::{PlayerBinding, PlayerFactory};
//!
//! // Infrastructure implements the port trait
//! struct FfmpegPlayerFactory;
//! impl PlayerFactory for FfmpegPlayerFactory { /* ... */ }
//! ```

pub mod port;
