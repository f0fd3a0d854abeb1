// SPDX-License-Identifier: MPL-2.0
//! `FFmpeg` adapter implementing the [`PlayerBinding`] and [`PlayerFactory`]
//! port traits.
//!
//! Each [`FfmpegPlayer`] owns one worker thread running the video decoder
//! loop and, unless it was created muted, a second one decoding audio into
//! a cpal output stream. Commands travel over unbounded channels so the UI
//! never blocks; the newest decoded frame is published through a `watch`
//! channel, so a slow consumer only ever sees the latest picture.
//!
//! # Design Notes
//!
//! - A muted player never opens an audio device
//! - Looping is handled inside each decoder loop at end of stream
//! - Dropping the player stops its threads
//!
//! [`PlayerBinding`]: crate::application::port::PlayerBinding
//! [`PlayerFactory`]: crate::application::port::PlayerFactory

mod audio;
mod audio_output;
mod decoder;

use crate::application::port::{
    PlayerBinding, PlayerEvent, PlayerFactory, PlayerOptions, VideoFrame,
};
use crate::domain::error::VideoError;
use crate::domain::feed::MediaLocator;
use audio::AudioSetup;
use audio_output::OutputState;
use decoder::{DecoderChannels, DecoderCommand, DecoderSetup};
use std::path::Path;
use std::sync::{Arc, OnceLock};
use tokio::sync::{mpsc, watch};

/// Widest frame the decoder hands to the UI. Larger sources are scaled down.
pub const DEFAULT_MAX_WIDTH: u32 = 1080;

static FFMPEG_INIT: OnceLock<Result<(), String>> = OnceLock::new();

/// Initializes `FFmpeg` once per process and silences its warning output.
///
/// # Errors
///
/// Returns the initialization failure, on this and every later call.
pub fn init_ffmpeg() -> Result<(), VideoError> {
    FFMPEG_INIT
        .get_or_init(|| {
            ffmpeg_next::init().map_err(|e| format!("FFmpeg initialization failed: {e}"))?;
            // SAFETY: av_log_set_level is thread-safe and only affects logging
            unsafe {
                ffmpeg_next::ffi::av_log_set_level(ffmpeg_next::ffi::AV_LOG_ERROR);
            }
            Ok(())
        })
        .clone()
        .map_err(VideoError::Other)
}

/// Creates [`FfmpegPlayer`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FfmpegPlayerFactory {
    max_width: u32,
}

impl FfmpegPlayerFactory {
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
        }
    }

    /// Sets the widest frame produced by players of this factory.
    #[must_use]
    pub fn with_max_width(mut self, max_width: u32) -> Self {
        self.max_width = max_width.max(2);
        self
    }
}

impl Default for FfmpegPlayerFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerFactory for FfmpegPlayerFactory {
    fn create(
        &self,
        locator: &MediaLocator,
        options: PlayerOptions,
    ) -> Result<Box<dyn PlayerBinding>, VideoError> {
        if !locator.is_remote() && !Path::new(locator.as_str()).exists() {
            return Err(VideoError::IoError(format!(
                "Video file not found: {}",
                locator.as_str()
            )));
        }
        let player = FfmpegPlayer::spawn(locator, options, self.max_width)?;
        Ok(Box::new(player))
    }
}

/// Handle on the audio thread of an unmuted player.
struct AudioHandle {
    commands: mpsc::UnboundedSender<DecoderCommand>,
    output: Arc<OutputState>,
}

impl AudioHandle {
    fn spawn(locator: &MediaLocator, loop_enabled: bool) -> Option<Self> {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let output = Arc::new(OutputState::new());
        let setup = AudioSetup {
            source: locator.as_str().to_string(),
            loop_enabled,
        };
        let thread_output = Arc::clone(&output);

        // The cpal stream is not Send everywhere, so it is opened on this thread.
        match std::thread::Builder::new()
            .name("audio-decoder".into())
            .spawn(move || audio::run(setup, command_rx, thread_output))
        {
            Ok(_) => Some(Self {
                commands: command_tx,
                output,
            }),
            Err(e) => {
                tracing::warn!(locator = %locator, error = %e, "failed to start audio thread");
                None
            }
        }
    }

    fn send(&self, command: DecoderCommand) {
        // The device reacts at once; the thread catches up on its own.
        match command {
            DecoderCommand::Play => self.output.set_paused(false),
            DecoderCommand::Pause | DecoderCommand::Stop => self.output.set_paused(true),
            DecoderCommand::Seek { .. } => self.output.clear(),
        }
        let _ = self.commands.send(command);
    }
}

/// Handle on a player's decoder threads.
pub struct FfmpegPlayer {
    commands: mpsc::UnboundedSender<DecoderCommand>,
    frames: watch::Receiver<Option<VideoFrame>>,
    errors: mpsc::UnboundedReceiver<VideoError>,
    audio: Option<AudioHandle>,
    options: PlayerOptions,
    /// Set once an error has been surfaced for this player.
    error_reported: bool,
}

impl FfmpegPlayer {
    fn spawn(
        locator: &MediaLocator,
        options: PlayerOptions,
        max_width: u32,
    ) -> Result<Self, VideoError> {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (frame_tx, frame_rx) = watch::channel(None);
        let (error_tx, error_rx) = mpsc::unbounded_channel();

        let setup = DecoderSetup {
            source: locator.as_str().to_string(),
            loop_enabled: options.loop_enabled,
            max_width,
        };
        let channels = DecoderChannels {
            commands: command_rx,
            frames: frame_tx,
            errors: error_tx,
        };

        // FFmpeg contexts are not Send, so they live and die on this thread.
        std::thread::Builder::new()
            .name("video-decoder".into())
            .spawn(move || decoder::run(setup, channels))
            .map_err(|e| VideoError::Other(format!("Failed to start decoder thread: {e}")))?;

        let audio = if options.muted {
            None
        } else {
            AudioHandle::spawn(locator, options.loop_enabled)
        };

        tracing::debug!(locator = %locator, ?options, audio = audio.is_some(), "player created");

        Ok(Self {
            commands: command_tx,
            frames: frame_rx,
            errors: error_rx,
            audio,
            options,
            error_reported: false,
        })
    }

    /// Whether this player feeds an audio output.
    #[must_use]
    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }

    fn send(&mut self, command: DecoderCommand) {
        if let Some(audio) = &self.audio {
            audio.send(command);
        }
        if self.commands.send(command).is_err() {
            tracing::trace!(?command, "decoder thread already stopped");
        }
    }
}

impl PlayerBinding for FfmpegPlayer {
    fn play(&mut self) {
        self.send(DecoderCommand::Play);
    }

    fn pause(&mut self) {
        self.send(DecoderCommand::Pause);
    }

    fn set_current_time(&mut self, secs: f64) {
        self.send(DecoderCommand::Seek { target_secs: secs });
    }

    fn poll(&mut self) -> Option<PlayerEvent> {
        match self.errors.try_recv() {
            Ok(err) => {
                // The error already explains any later shutdown.
                self.error_reported = true;
                return Some(PlayerEvent::Error(err));
            }
            Err(mpsc::error::TryRecvError::Disconnected) if !self.error_reported => {
                // Thread ended without reporting why; say so once.
                self.error_reported = true;
                return Some(PlayerEvent::Error(VideoError::PlayerClosed));
            }
            Err(_) => {}
        }

        match self.frames.has_changed() {
            Ok(true) => self
                .frames
                .borrow_and_update()
                .clone()
                .map(PlayerEvent::Frame),
            _ => None,
        }
    }

    fn options(&self) -> PlayerOptions {
        self.options
    }
}

impl Drop for FfmpegPlayer {
    fn drop(&mut self) {
        self.send(DecoderCommand::Stop);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Verify Send is implemented
    fn assert_send<T: Send>() {}

    #[test]
    fn player_is_send() {
        assert_send::<FfmpegPlayer>();
    }

    #[test]
    fn missing_local_file_is_rejected_up_front() {
        let factory = FfmpegPlayerFactory::new();
        let locator = MediaLocator::new("/nonexistent/clip.mp4").unwrap();
        let result = factory.create(&locator, PlayerOptions::default());
        assert!(matches!(result, Err(VideoError::IoError(_))));
    }

    #[test]
    fn unreadable_file_reports_error_through_poll() {
        let temp_dir = tempfile::tempdir().unwrap();
        let video_path = temp_dir.path().join("broken.mp4");
        std::fs::write(&video_path, b"not a video").unwrap();

        let locator = MediaLocator::new(video_path.to_string_lossy()).unwrap();
        let mut player = FfmpegPlayerFactory::new()
            .create(&locator, PlayerOptions::default())
            .unwrap();
        assert_eq!(player.options(), PlayerOptions::default());

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        let event = loop {
            if let Some(event) = player.poll() {
                break Some(event);
            }
            if std::time::Instant::now() > deadline {
                break None;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        };
        assert!(matches!(event, Some(PlayerEvent::Error(_))));
    }

    fn spawn_on_text_file(options: PlayerOptions) -> (tempfile::TempDir, FfmpegPlayer) {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("clip.mp4");
        std::fs::write(&path, b"not a video").unwrap();
        let locator = MediaLocator::new(path.to_string_lossy()).unwrap();
        let player = FfmpegPlayer::spawn(&locator, options, DEFAULT_MAX_WIDTH).unwrap();
        (temp_dir, player)
    }

    #[test]
    fn muted_player_opens_no_audio_output() {
        let options = PlayerOptions {
            muted: true,
            ..PlayerOptions::default()
        };
        let (_dir, player) = spawn_on_text_file(options);
        assert!(!player.has_audio());
    }

    #[test]
    fn unmuted_player_feeds_audio() {
        let (_dir, mut player) = spawn_on_text_file(PlayerOptions::default());
        assert!(player.has_audio());

        player.play();
        assert!(player.audio.as_ref().is_some_and(|a| !a.output.is_paused()));
        player.pause();
        assert!(player.audio.as_ref().is_some_and(|a| a.output.is_paused()));
    }

    #[test]
    fn max_width_has_a_floor() {
        let factory = FfmpegPlayerFactory::new().with_max_width(0);
        assert_eq!(factory.max_width, 2);
    }
}
