// SPDX-License-Identifier: MPL-2.0
//! Application lifecycle port.
//!
//! Consumers subscribe explicitly and receive a boxed [`LifecycleListener`].
//! Dropping the listener is the disposer: acquisition and release are tied
//! to the owner's scope.

use crate::domain::playback::AppLifecycle;

/// A live subscription to lifecycle changes.
pub trait LifecycleListener: Send {
    /// Returns the next change not yet observed, without blocking.
    fn try_next(&mut self) -> Option<AppLifecycle>;
}

/// Source of application foreground/background changes.
pub trait LifecycleSource {
    /// Lifecycle state at the time of the call.
    fn current(&self) -> AppLifecycle;

    /// Registers a new listener. Changes published afterwards are delivered
    /// to it until it is dropped.
    fn subscribe(&self) -> Box<dyn LifecycleListener>;
}
