// SPDX-License-Identifier: MPL-2.0
//! Per-item playback activation and the application lifecycle hub.

pub mod controller;
pub mod lifecycle;

pub use controller::{ActivationController, ActivationSettings, PressToken};
pub use lifecycle::LifecycleHub;
