// SPDX-License-Identifier: MPL-2.0
//! Screen enumeration and the one-shot splash navigation.

use crate::domain::playback::SplashDelay;
use iced::{task, Task};

/// Screens the application moves through. `Feed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Splash,
    Feed,
}

/// Identifies one arming of the splash timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplashToken(u64);

/// Drives the single `Splash -> Feed` transition.
///
/// The timer task is abortable and its handle is owned here, so leaving the
/// splash screen (or dropping the navigator) cancels it. Elapsed
/// notifications carrying an old token are ignored.
#[derive(Debug, Default)]
pub struct SplashNavigator {
    next_token: u64,
    armed: Option<SplashToken>,
    timer: Option<task::Handle>,
    navigated: bool,
}

impl SplashNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the timer. Returns `Task::none()` once navigation already happened.
    pub fn start(&mut self, delay: SplashDelay) -> Task<SplashToken> {
        if self.navigated {
            return Task::none();
        }
        self.next_token += 1;
        let token = SplashToken(self.next_token);
        self.armed = Some(token);

        let (task, handle) = Task::perform(wait(delay), move |()| token).abortable();
        self.timer = Some(handle.abort_on_drop());
        task
    }

    /// Reports a timer expiry. Returns true exactly once, for the armed token.
    pub fn elapsed(&mut self, token: SplashToken) -> bool {
        if self.navigated || self.armed != Some(token) {
            tracing::debug!(?token, "ignoring stale splash timer");
            return false;
        }
        self.navigated = true;
        self.armed = None;
        self.timer = None;
        true
    }

    /// Token of the pending timer, if one is armed.
    #[must_use]
    pub fn armed_token(&self) -> Option<SplashToken> {
        self.armed
    }
}

/// Completes after `delay`.
pub async fn wait(delay: SplashDelay) {
    tokio::time::sleep(delay.as_duration()).await;
}
