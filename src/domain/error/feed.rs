// SPDX-License-Identifier: MPL-2.0
//! Feed ingestion errors.

use std::fmt;

/// Reasons a feed entry (or a whole feed) is rejected at ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    /// Entry at `position` has no usable identifier.
    MissingId { position: usize },

    /// Entry has neither a `uri` nor a `url`.
    MissingLocator { id: String },

    /// Another entry already uses this identifier.
    DuplicateId { id: String },

    /// Entry at `position` has a field of the wrong type.
    Malformed { position: usize, reason: String },

    /// No entry survived validation.
    Empty,
}

impl FeedError {
    /// Returns the i18n message key for this error type.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            FeedError::MissingId { .. } => "error-feed-missing-id",
            FeedError::MissingLocator { .. } => "error-feed-missing-locator",
            FeedError::DuplicateId { .. } => "error-feed-duplicate-id",
            FeedError::Malformed { .. } => "error-feed-malformed",
            FeedError::Empty => "error-feed-empty",
        }
    }
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::MissingId { position } => {
                write!(f, "entry #{} has no id", position)
            }
            FeedError::MissingLocator { id } => {
                write!(f, "entry '{}' has neither uri nor url", id)
            }
            FeedError::DuplicateId { id } => write!(f, "duplicate id '{}'", id),
            FeedError::Malformed { position, reason } => {
                write!(f, "entry #{} is malformed: {}", position, reason)
            }
            FeedError::Empty => write!(f, "feed contains no playable entries"),
        }
    }
}

impl std::error::Error for FeedError {}
