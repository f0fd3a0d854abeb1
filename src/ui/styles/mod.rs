// SPDX-License-Identifier: MPL-2.0
//! Centralized styles for the feed and splash widgets.

pub mod button;
pub mod container;
pub mod overlay;
