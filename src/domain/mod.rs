// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core business logic with ZERO external dependencies.
//!
//! This module contains pure domain types, value objects, and business rules.
//! It has no dependencies on external crates (except `std`) to ensure
//! testability and architectural purity.
//!
//! # Modules
//!
//! - [`error`]: Domain error types ([`VideoError`](error::VideoError),
//!   [`FeedError`](error::FeedError))
//! - [`feed`]: Feed content types ([`VideoRecord`](feed::VideoRecord),
//!   [`VideoId`](feed::VideoId), [`Engagement`](feed::Engagement))
//! - [`playback`]: Playback value objects ([`LongPressDelay`](playback::LongPressDelay),
//!   [`ActivationOffset`](playback::ActivationOffset), [`SplashDelay`](playback::SplashDelay))

pub mod error;
pub mod feed;
pub mod playback;
