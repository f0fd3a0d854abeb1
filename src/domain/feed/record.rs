// SPDX-License-Identifier: MPL-2.0
//! Video record value objects and their ingestion rules.

use crate::domain::error::FeedError;
use std::fmt;

// =============================================================================
// VideoId
// =============================================================================

/// Unique, non-empty identifier of a feed entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VideoId(String);

impl VideoId {
    /// Creates an identifier, returning `None` for blank input.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// MediaLocator
// =============================================================================

/// Location of the media stream: a local path or a URL understood by the player.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaLocator(String);

impl MediaLocator {
    /// Creates a locator, returning `None` for blank input.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when the locator points at a network resource.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        let lower = self.0.to_ascii_lowercase();
        ["http://", "https://", "rtsp://", "rtmp://"]
            .iter()
            .any(|scheme| lower.starts_with(scheme))
    }
}

impl fmt::Display for MediaLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Engagement
// =============================================================================

/// Like or comment counter, given either as a number or a preformatted label
/// such as `"1.2K"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Engagement {
    Count(u64),
    Label(String),
}

impl Engagement {
    /// Normalizes a display label. Blank labels become a zero count.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            Self::Count(0)
        } else {
            Self::Label(trimmed.to_string())
        }
    }

    /// Text shown under the action button. Zero and missing values read "0".
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Count(count) => count.to_string(),
            Self::Label(label) => label.clone(),
        }
    }
}

impl Default for Engagement {
    fn default() -> Self {
        Self::Count(0)
    }
}

// =============================================================================
// VideoRecord
// =============================================================================

/// A validated, immutable feed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRecord {
    id: VideoId,
    locator: MediaLocator,
    title: String,
    description: String,
    likes: Engagement,
    comments: Engagement,
}

impl VideoRecord {
    #[must_use]
    pub fn id(&self) -> &VideoId {
        &self.id
    }

    #[must_use]
    pub fn locator(&self) -> &MediaLocator {
        &self.locator
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn likes(&self) -> &Engagement {
        &self.likes
    }

    #[must_use]
    pub fn comments(&self) -> &Engagement {
        &self.comments
    }
}

/// Unvalidated fields of a feed entry, as read from the content source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordDraft {
    pub id: Option<String>,
    pub uri: Option<String>,
    pub url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub likes: Option<Engagement>,
    pub comments: Option<Engagement>,
}

impl RecordDraft {
    /// Validates the draft found at `position` (zero-based) in the source.
    ///
    /// `uri` wins over `url` when both are usable. Title and description
    /// default to empty text, counters default to zero.
    pub fn validate(self, position: usize) -> Result<VideoRecord, FeedError> {
        let id = self
            .id
            .and_then(VideoId::new)
            .ok_or(FeedError::MissingId { position })?;

        let locator = self
            .uri
            .and_then(MediaLocator::new)
            .or_else(|| self.url.and_then(MediaLocator::new))
            .ok_or_else(|| FeedError::MissingLocator {
                id: id.to_string(),
            })?;

        Ok(VideoRecord {
            id,
            locator,
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            likes: self.likes.unwrap_or_default(),
            comments: self.comments.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(id: &str, uri: &str) -> RecordDraft {
        RecordDraft {
            id: Some(id.to_string()),
            uri: Some(uri.to_string()),
            ..RecordDraft::default()
        }
    }

    #[test]
    fn validate_accepts_minimal_entry_with_defaults() {
        let record = draft("1", "clip.mp4").validate(0).unwrap();
        assert_eq!(record.id().as_str(), "1");
        assert_eq!(record.locator().as_str(), "clip.mp4");
        assert_eq!(record.title(), "");
        assert_eq!(record.likes().display(), "0");
        assert_eq!(record.comments().display(), "0");
    }

    #[test]
    fn validate_falls_back_to_url() {
        let record = RecordDraft {
            id: Some("a".into()),
            uri: Some("   ".into()),
            url: Some("https://example.com/v.mp4".into()),
            ..RecordDraft::default()
        }
        .validate(3)
        .unwrap();
        assert_eq!(record.locator().as_str(), "https://example.com/v.mp4");
        assert!(record.locator().is_remote());
    }

    #[test]
    fn validate_rejects_missing_id() {
        let err = RecordDraft {
            id: Some(" ".into()),
            uri: Some("clip.mp4".into()),
            ..RecordDraft::default()
        }
        .validate(4)
        .unwrap_err();
        assert_eq!(err, FeedError::MissingId { position: 4 });
    }

    #[test]
    fn validate_rejects_missing_locator() {
        let err = RecordDraft {
            id: Some("7".into()),
            ..RecordDraft::default()
        }
        .validate(0)
        .unwrap_err();
        assert_eq!(
            err,
            FeedError::MissingLocator {
                id: "7".to_string()
            }
        );
    }

    #[test]
    fn blank_label_reads_as_zero() {
        assert_eq!(Engagement::from_label("  ").display(), "0");
        assert_eq!(Engagement::from_label("1.2K").display(), "1.2K");
        assert_eq!(Engagement::Count(42).display(), "42");
    }

    #[test]
    fn local_paths_are_not_remote() {
        let locator = MediaLocator::new("/videos/a.mp4").unwrap();
        assert!(!locator.is_remote());
    }
}
