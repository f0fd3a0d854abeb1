// SPDX-License-Identifier: MPL-2.0
//! User interface building blocks shared by the splash screen and the feed.

pub mod design_tokens;
pub mod splash;
pub mod styles;
