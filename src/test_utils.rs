// SPDX-License-Identifier: MPL-2.0
//! Test doubles shared by unit and integration tests.
//!
//! [`RecordingPlayer`] stores every command it receives in a shared log so a
//! test can keep inspecting it after the player has been handed to a
//! controller. [`RecordingFactory`] hands out such players and remembers the
//! log of each one it created.
//!
//! Unit tests also get the `approx` assertion macros from here for float
//! comparisons.

use crate::application::port::{PlayerBinding, PlayerEvent, PlayerFactory, PlayerOptions};
use crate::domain::error::VideoError;
use crate::domain::feed::MediaLocator;
use crate::domain::playback::PlayerCommand;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

#[cfg(test)]
pub use approx::{assert_abs_diff_eq, assert_relative_eq};

/// Default epsilon for f32 comparisons.
#[cfg(test)]
pub const F32_EPSILON: f32 = 1e-6;

/// Default epsilon for f64 comparisons.
#[cfg(test)]
pub const F64_EPSILON: f64 = 1e-10;

/// Shared, cloneable command log.
#[derive(Debug, Clone, Default)]
pub struct CommandLog(Arc<Mutex<Vec<PlayerCommand>>>);

impl CommandLog {
    fn push(&self, command: PlayerCommand) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(command);
    }

    /// Snapshot of every command received so far.
    #[must_use]
    pub fn commands(&self) -> Vec<PlayerCommand> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn last(&self) -> Option<PlayerCommand> {
        self.commands().last().copied()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

/// Player that records commands instead of decoding anything.
#[derive(Debug)]
pub struct RecordingPlayer {
    log: CommandLog,
    options: PlayerOptions,
    pending: VecDeque<PlayerEvent>,
}

impl RecordingPlayer {
    #[must_use]
    pub fn new(options: PlayerOptions) -> Self {
        Self {
            log: CommandLog::default(),
            options,
            pending: VecDeque::new(),
        }
    }

    /// Handle on this player's command log.
    #[must_use]
    pub fn log(&self) -> CommandLog {
        self.log.clone()
    }

    /// Queues an event returned by the next `poll`.
    pub fn push_event(&mut self, event: PlayerEvent) {
        self.pending.push_back(event);
    }
}

impl PlayerBinding for RecordingPlayer {
    fn play(&mut self) {
        self.log.push(PlayerCommand::Play);
    }

    fn pause(&mut self) {
        self.log.push(PlayerCommand::Pause);
    }

    fn set_current_time(&mut self, secs: f64) {
        self.log.push(PlayerCommand::Seek { secs });
    }

    fn poll(&mut self) -> Option<PlayerEvent> {
        self.pending.pop_front()
    }

    fn options(&self) -> PlayerOptions {
        self.options
    }
}

/// Factory producing [`RecordingPlayer`]s.
///
/// Locators listed in `failing` make `create` fail, which lets tests cover
/// the item error path.
#[derive(Debug, Clone, Default)]
pub struct RecordingFactory {
    created: Arc<Mutex<Vec<(MediaLocator, PlayerOptions, CommandLog)>>>,
    failing: Vec<String>,
}

impl RecordingFactory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes player creation fail for `locator`.
    #[must_use]
    pub fn failing_on(mut self, locator: &str) -> Self {
        self.failing.push(locator.to_string());
        self
    }

    /// Number of players created so far.
    #[must_use]
    pub fn created_count(&self) -> usize {
        self.created
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Command log of the most recent player created for `locator`.
    #[must_use]
    pub fn log_for(&self, locator: &str) -> Option<CommandLog> {
        self.created
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .rev()
            .find(|(created, _, _)| created.as_str() == locator)
            .map(|(_, _, log)| log.clone())
    }

    /// Options the most recent player for `locator` was created with.
    #[must_use]
    pub fn options_for(&self, locator: &str) -> Option<PlayerOptions> {
        self.created
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .rev()
            .find(|(created, _, _)| created.as_str() == locator)
            .map(|(_, options, _)| *options)
    }
}

impl PlayerFactory for RecordingFactory {
    fn create(
        &self,
        locator: &MediaLocator,
        options: PlayerOptions,
    ) -> Result<Box<dyn PlayerBinding>, VideoError> {
        if self.failing.iter().any(|l| l == locator.as_str()) {
            return Err(VideoError::IoError(format!(
                "cannot open {}",
                locator.as_str()
            )));
        }
        let player = RecordingPlayer::new(options);
        self.created
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((locator.clone(), options, player.log()));
        Ok(Box::new(player))
    }
}
