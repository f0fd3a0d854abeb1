// SPDX-License-Identifier: MPL-2.0
//! Static content source for the feed.
//!
//! The feed is a TOML list of `[[videos]]` tables, either the one embedded in
//! the binary or a file chosen by the user:
//!
//! ```toml
//! [[videos]]
//! id = 1
//! uri = "https://example.com/clip.mp4"
//! title = "Sunset"
//! description = "Golden hour at the pier"
//! likes = "1.2K"
//! comments = 48
//! ```
//!
//! Entries are deserialized loosely, then validated into [`VideoRecord`]s.
//! Invalid entries are skipped and reported, the rest of the feed still
//! loads.

use crate::domain::error::FeedError;
use crate::domain::feed::{Engagement, RecordDraft, VideoRecord};
use crate::error::{Error, Result};
use rust_embed::RustEmbed;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Name of the embedded default feed.
const DEFAULT_FEED: &str = "videos.toml";

#[derive(RustEmbed)]
#[folder = "assets/feed/"]
struct FeedAsset;

// =============================================================================
// Raw (unvalidated) shape
// =============================================================================

/// Entries stay untyped until each one is checked on its own, so a field of
/// the wrong type only rejects its entry.
#[derive(Debug, Default, Deserialize)]
struct RawFeed {
    #[serde(default)]
    videos: Vec<toml::Value>,
}

/// Identifier as written in the file: a number or a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

/// Counter as written in the file: a number or a display label.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawEngagement {
    Count(u64),
    Label(String),
}

#[derive(Debug, Default, Deserialize)]
struct RawVideoRecord {
    id: Option<RawId>,
    uri: Option<String>,
    url: Option<String>,
    title: Option<String>,
    description: Option<String>,
    likes: Option<RawEngagement>,
    comments: Option<RawEngagement>,
}

impl From<RawEngagement> for Engagement {
    fn from(raw: RawEngagement) -> Self {
        match raw {
            RawEngagement::Count(count) => Engagement::Count(count),
            RawEngagement::Label(label) => Engagement::from_label(&label),
        }
    }
}

impl From<RawVideoRecord> for RecordDraft {
    fn from(raw: RawVideoRecord) -> Self {
        RecordDraft {
            id: raw.id.map(|id| match id {
                RawId::Number(n) => n.to_string(),
                RawId::Text(text) => text,
            }),
            uri: raw.uri,
            url: raw.url,
            title: raw.title,
            description: raw.description,
            likes: raw.likes.map(Engagement::from),
            comments: raw.comments.map(Engagement::from),
        }
    }
}

// =============================================================================
// Loading
// =============================================================================

/// Result of loading a feed: the playable records, in file order, plus
/// every entry that was skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedLoad {
    pub records: Vec<VideoRecord>,
    pub rejected: Vec<FeedError>,
}

/// Parses and validates a feed document.
///
/// # Errors
///
/// Returns [`Error::Config`] for malformed TOML and [`FeedError::Empty`]
/// when no entry survives validation.
pub fn parse(content: &str) -> Result<FeedLoad> {
    let raw: RawFeed = toml::from_str(content)?;

    let mut seen = HashSet::new();
    let mut load = FeedLoad::default();

    for (position, entry) in raw.videos.into_iter().enumerate() {
        let validated = entry
            .try_into::<RawVideoRecord>()
            .map_err(|e| FeedError::Malformed {
                position,
                reason: e.message().to_string(),
            })
            .and_then(|raw| RecordDraft::from(raw).validate(position))
            .and_then(|record| {
                if seen.insert(record.id().clone()) {
                    Ok(record)
                } else {
                    Err(FeedError::DuplicateId {
                        id: record.id().to_string(),
                    })
                }
            });

        match validated {
            Ok(record) => load.records.push(record),
            Err(err) => {
                tracing::warn!(position, error = %err, "skipping feed entry");
                load.rejected.push(err);
            }
        }
    }

    if load.records.is_empty() {
        return Err(Error::Feed(FeedError::Empty));
    }

    tracing::debug!(
        records = load.records.len(),
        rejected = load.rejected.len(),
        "feed loaded"
    );
    Ok(load)
}

/// Loads a feed from a TOML file on disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read, plus everything [`parse`]
/// reports.
pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<FeedLoad> {
    let content = fs::read_to_string(path.as_ref())?;
    parse(&content)
}

/// Loads the feed embedded in the binary.
///
/// # Errors
///
/// Only fails if the embedded asset is missing or invalid, which is a
/// packaging defect.
pub fn load_default() -> Result<FeedLoad> {
    let file = FeedAsset::get(DEFAULT_FEED)
        .ok_or_else(|| Error::Io(format!("embedded feed '{DEFAULT_FEED}' is missing")))?;
    let content = std::str::from_utf8(file.data.as_ref())
        .map_err(|e| Error::Config(format!("embedded feed is not UTF-8: {e}")))?;
    parse(content)
}

/// Loads `source` when given, the embedded feed otherwise.
///
/// # Errors
///
/// See [`load_from_path`] and [`load_default`].
pub fn load(source: Option<&Path>) -> Result<FeedLoad> {
    match source {
        Some(path) => load_from_path(path),
        None => load_default(),
    }
}
