// SPDX-License-Identifier: MPL-2.0
//! Video player binding port.
//!
//! This module defines the [`PlayerBinding`] trait the playback controller
//! drives, and the [`PlayerFactory`] that creates one binding per mounted
//! feed item.
//!
//! # Design Notes
//!
//! - Commands return nothing: the controller never waits on the player
//! - Decoded frames and failures are pulled with [`PlayerBinding::poll`]
//! - Looping and mute are fixed at creation through [`PlayerOptions`]

use crate::domain::error::VideoError;
use crate::domain::feed::MediaLocator;

/// Creation-time configuration of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerOptions {
    /// Restart from the beginning at end of stream.
    pub loop_enabled: bool,
    /// Start with audio muted.
    pub muted: bool,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            loop_enabled: true,
            muted: false,
        }
    }
}

/// A decoded RGBA frame ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFrame {
    /// RGBA pixel data (width × height × 4 bytes).
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Presentation timestamp in seconds.
    pub pts_secs: f64,
}

/// Events a player reports back when polled.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// A new frame is ready for display.
    Frame(VideoFrame),
    /// Playback failed. The player stays usable but may not produce frames.
    Error(VideoError),
}

/// Port for a single video player instance.
///
/// Implementations own whatever decoding resources they need and release
/// them on drop.
pub trait PlayerBinding: Send {
    /// Starts or resumes playback.
    fn play(&mut self);

    /// Pauses playback at the current position.
    fn pause(&mut self);

    /// Moves the playback position to `secs`.
    fn set_current_time(&mut self, secs: f64);

    /// Returns the next pending event without blocking.
    fn poll(&mut self) -> Option<PlayerEvent>;

    /// Options the player was created with.
    fn options(&self) -> PlayerOptions;
}

impl<P: PlayerBinding + ?Sized> PlayerBinding for Box<P> {
    fn play(&mut self) {
        (**self).play();
    }

    fn pause(&mut self) {
        (**self).pause();
    }

    fn set_current_time(&mut self, secs: f64) {
        (**self).set_current_time(secs);
    }

    fn poll(&mut self) -> Option<PlayerEvent> {
        (**self).poll()
    }

    fn options(&self) -> PlayerOptions {
        (**self).options()
    }
}

/// Port for creating players.
pub trait PlayerFactory {
    /// Creates a player for `locator`.
    ///
    /// # Errors
    ///
    /// Returns a [`VideoError`] when the player cannot be set up at all.
    /// Failures discovered later (unreachable source, bad codec) are reported
    /// through [`PlayerBinding::poll`] instead.
    fn create(
        &self,
        locator: &MediaLocator,
        options: PlayerOptions,
    ) -> Result<Box<dyn PlayerBinding>, VideoError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test that the traits are object-safe
    fn _assert_object_safe(_: &dyn PlayerBinding, _: &dyn PlayerFactory) {}

    struct Silent(PlayerOptions);

    impl PlayerBinding for Silent {
        fn play(&mut self) {}
        fn pause(&mut self) {}
        fn set_current_time(&mut self, _secs: f64) {}
        fn poll(&mut self) -> Option<PlayerEvent> {
            None
        }
        fn options(&self) -> PlayerOptions {
            self.0
        }
    }

    #[test]
    fn default_options_loop_with_sound() {
        let options = PlayerOptions::default();
        assert!(options.loop_enabled);
        assert!(!options.muted);
    }

    #[test]
    fn boxed_player_forwards_to_inner() {
        let mut boxed: Box<dyn PlayerBinding> = Box::new(Silent(PlayerOptions {
            loop_enabled: false,
            muted: true,
        }));
        boxed.play();
        assert!(boxed.poll().is_none());
        assert!(boxed.options().muted);
    }
}
