// SPDX-License-Identifier: MPL-2.0
//! Feed content types.
//!
//! A feed is an ordered, fully resident list of [`VideoRecord`]s. Records are
//! immutable once ingested: the loose shape read from disk is validated into
//! a [`RecordDraft`] and either accepted or rejected with a
//! [`FeedError`](crate::domain::error::FeedError).

mod record;

pub use record::{Engagement, MediaLocator, RecordDraft, VideoId, VideoRecord};
