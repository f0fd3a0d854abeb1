// SPDX-License-Identifier: MPL-2.0
//! Broadcast hub for application lifecycle changes.
//!
//! The hub is the single publisher: the application forwards window focus
//! changes into it, and each mounted feed item holds a listener for as long
//! as it lives. Dropping a listener unsubscribes it.

use crate::application::port::{LifecycleListener, LifecycleSource};
use crate::domain::playback::AppLifecycle;
use tokio::sync::broadcast;

/// Number of changes buffered per listener before the oldest are dropped.
/// Only the most recent transition matters, so lagging is harmless.
const CHANNEL_CAPACITY: usize = 16;

/// In-process lifecycle source backed by a tokio broadcast channel.
#[derive(Debug)]
pub struct LifecycleHub {
    sender: broadcast::Sender<AppLifecycle>,
    current: AppLifecycle,
}

impl LifecycleHub {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            sender,
            current: AppLifecycle::Active,
        }
    }

    /// Publishes a change to every live listener.
    ///
    /// Repeating the current state is ignored. Returns true when the state
    /// actually changed.
    pub fn publish(&mut self, state: AppLifecycle) -> bool {
        if state == self.current {
            return false;
        }
        self.current = state;
        // An error only means nobody is listening right now.
        let _ = self.sender.send(state);
        tracing::debug!(?state, listeners = self.listener_count(), "lifecycle changed");
        true
    }

    /// Number of listeners currently subscribed.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for LifecycleHub {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleSource for LifecycleHub {
    fn current(&self) -> AppLifecycle {
        self.current
    }

    fn subscribe(&self) -> Box<dyn LifecycleListener> {
        Box::new(HubListener {
            receiver: self.sender.subscribe(),
        })
    }
}

struct HubListener {
    receiver: broadcast::Receiver<AppLifecycle>,
}

impl LifecycleListener for HubListener {
    fn try_next(&mut self) -> Option<AppLifecycle> {
        loop {
            match self.receiver.try_recv() {
                Ok(state) => return Some(state),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::trace!(skipped, "lifecycle listener lagged");
                }
                Err(broadcast::error::TryRecvError::Empty)
                | Err(broadcast::error::TryRecvError::Closed) => return None,
            }
        }
    }
}
