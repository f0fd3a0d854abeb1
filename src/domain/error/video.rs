// SPDX-License-Identifier: MPL-2.0
//! Video playback errors.

use std::fmt;

/// Specific error types for video playback issues.
/// Used to provide user-friendly, localized error messages on feed items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoError {
    /// Video codec is not supported by the system's FFmpeg
    UnsupportedCodec(String),

    /// Stream appears corrupted or has invalid data
    CorruptedFile,

    /// Source exists but contains no video stream
    NoVideoStream,

    /// Decoding failed during playback
    DecodingFailed(String),

    /// Source could not be reached (missing file, network failure, etc.)
    IoError(String),

    /// The decoder thread is gone and no longer accepts commands
    PlayerClosed,

    /// Generic error with raw message
    Other(String),
}

impl VideoError {
    /// Returns the i18n message key for this error type.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            VideoError::UnsupportedCodec(_) => "error-video-unsupported-codec",
            VideoError::CorruptedFile => "error-video-corrupted",
            VideoError::NoVideoStream => "error-video-no-video-stream",
            VideoError::DecodingFailed(_) => "error-video-decoding-failed",
            VideoError::IoError(_) => "error-video-io",
            VideoError::PlayerClosed => "error-video-player-closed",
            VideoError::Other(_) => "error-video-general",
        }
    }

    /// Attempts to parse a raw error message into a specific `VideoError` type.
    /// This is used to categorize errors coming out of FFmpeg.
    pub fn from_message(msg: &str) -> Self {
        let msg_lower = msg.to_lowercase();

        // Codec/decoder errors first (they might contain "not found")
        if msg_lower.contains("codec") || msg_lower.contains("decoder") {
            if let Some(codec) = Self::extract_codec_name(&msg_lower) {
                return VideoError::UnsupportedCodec(codec);
            } else if msg_lower.contains("not found") || msg_lower.contains("unsupported") {
                return VideoError::DecodingFailed(msg.to_string());
            }
        }

        if msg_lower.contains("no such file")
            || (msg_lower.contains("not found") && !msg_lower.contains("decoder"))
            || msg_lower.contains("permission denied")
            || msg_lower.contains("i/o error")
            || msg_lower.contains("connection")
            || msg_lower.contains("network")
        {
            return VideoError::IoError(msg.to_string());
        }

        if msg_lower.contains("no video stream")
            || msg_lower.contains("no video track")
            || msg_lower.contains("invalid data found")
        {
            return VideoError::NoVideoStream;
        }

        if msg_lower.contains("corrupt")
            || msg_lower.contains("invalid")
            || msg_lower.contains("malformed")
        {
            return VideoError::CorruptedFile;
        }

        if msg_lower.contains("packet")
            || msg_lower.contains("scaling")
            || msg_lower.contains("seek")
            || msg_lower.contains("decode")
            || msg_lower.contains("unsupported")
        {
            return VideoError::DecodingFailed(msg.to_string());
        }

        VideoError::Other(msg.to_string())
    }

    /// Tries to extract a codec name from an error message.
    fn extract_codec_name(msg: &str) -> Option<String> {
        let codecs = [
            "h264", "hevc", "h265", "vp8", "vp9", "av1", "mpeg4", "mpeg2",
        ];
        codecs
            .iter()
            .find(|codec| msg.contains(*codec))
            .map(|codec| codec.to_uppercase())
    }
}

impl fmt::Display for VideoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoError::UnsupportedCodec(codec) => {
                write!(f, "Unsupported video codec: {}", codec)
            }
            VideoError::CorruptedFile => write!(f, "Video stream is corrupted"),
            VideoError::NoVideoStream => write!(f, "No video stream found"),
            VideoError::DecodingFailed(msg) => write!(f, "Decoding failed: {}", msg),
            VideoError::IoError(msg) => write!(f, "I/O error: {}", msg),
            VideoError::PlayerClosed => write!(f, "Player is no longer running"),
            VideoError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for VideoError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_message_detects_io_errors() {
        let err = VideoError::from_message("No such file or directory");
        assert!(matches!(err, VideoError::IoError(_)));

        let err = VideoError::from_message("Connection refused");
        assert!(matches!(err, VideoError::IoError(_)));
    }

    #[test]
    fn from_message_detects_missing_stream() {
        let err = VideoError::from_message("No video stream found in file");
        assert!(matches!(err, VideoError::NoVideoStream));
    }

    #[test]
    fn from_message_extracts_codec() {
        let err = VideoError::from_message("Decoder hevc not found");
        assert_eq!(err, VideoError::UnsupportedCodec("HEVC".to_string()));
    }

    #[test]
    fn from_message_detects_corruption() {
        let err = VideoError::from_message("File is corrupt or invalid");
        assert_eq!(err, VideoError::CorruptedFile);
    }

    #[test]
    fn from_message_falls_back_to_other() {
        let err = VideoError::from_message("something odd");
        assert_eq!(err, VideoError::Other("something odd".to_string()));
    }

    #[test]
    fn i18n_keys_are_stable() {
        assert_eq!(VideoError::CorruptedFile.i18n_key(), "error-video-corrupted");
        assert_eq!(
            VideoError::PlayerClosed.i18n_key(),
            "error-video-player-closed"
        );
    }
}
