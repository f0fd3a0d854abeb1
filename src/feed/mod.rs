// SPDX-License-Identifier: MPL-2.0
//! The vertical video feed: content source, visibility tracking and the
//! paged list component.

pub mod component;
pub mod item;
pub mod source;
pub mod visibility;

pub use component::{Action, FeedSettings, Message, PageMove, State, ViewEnv, SCROLLABLE_ID};
pub use item::MountedItem;
pub use source::FeedLoad;
pub use visibility::VisibilityTracker;
