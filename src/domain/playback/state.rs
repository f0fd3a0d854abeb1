// SPDX-License-Identifier: MPL-2.0
//! Activation state machine vocabulary.

/// Playback activation state of a single feed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivationState {
    /// Item is not the current one. Its player must not be playing.
    #[default]
    Inactive,
    /// Item is current and its video is playing.
    ActivePlaying,
    /// Item is current, paused while the user holds a press.
    ActivePausedByGesture,
    /// Item is current, paused because the application left the foreground.
    ActivePausedByBackground,
}

impl ActivationState {
    /// Returns true for every state where the item is the current one.
    #[must_use]
    pub fn is_active(self) -> bool {
        !matches!(self, Self::Inactive)
    }

    #[must_use]
    pub fn is_playing(self) -> bool {
        matches!(self, Self::ActivePlaying)
    }

    #[must_use]
    pub fn is_paused_by_gesture(self) -> bool {
        matches!(self, Self::ActivePausedByGesture)
    }

    #[must_use]
    pub fn is_paused_by_background(self) -> bool {
        matches!(self, Self::ActivePausedByBackground)
    }
}

/// Foreground state reported by the host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppLifecycle {
    /// In the foreground and receiving input.
    Active,
    /// Visible but not receiving input (transitional).
    Inactive,
    /// Not visible to the user.
    Background,
}

impl AppLifecycle {
    /// Returns true for the states that count as leaving the foreground.
    #[must_use]
    pub fn is_away(self) -> bool {
        matches!(self, Self::Inactive | Self::Background)
    }
}

/// Command issued to a player binding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerCommand {
    Play,
    Pause,
    Seek { secs: f64 },
}
