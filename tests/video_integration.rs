// SPDX-License-Identifier: MPL-2.0
//! Integration tests for the `FFmpeg` player backend.
//!
//! Tests that need real media use `tests/data/sample.mp4` and are skipped
//! when the file is absent.

use iced_reels::application::port::{PlayerBinding, PlayerEvent, PlayerFactory, PlayerOptions};
use iced_reels::domain::error::VideoError;
use iced_reels::domain::feed::MediaLocator;
use iced_reels::infrastructure::ffmpeg::{init_ffmpeg, FfmpegPlayerFactory};
use iced_reels::playback::{ActivationController, ActivationSettings, LifecycleHub};
use std::time::{Duration, Instant};

const SAMPLE: &str = "tests/data/sample.mp4";

fn sample_locator() -> Option<MediaLocator> {
    if !std::path::Path::new(SAMPLE).exists() {
        return None; // Skip if test file doesn't exist
    }
    MediaLocator::new(SAMPLE)
}

/// Polls until `accept` matches an event or the timeout expires.
fn poll_until<P: PlayerBinding>(
    player: &mut P,
    timeout: Duration,
    accept: impl Fn(&PlayerEvent) -> bool,
) -> Option<PlayerEvent> {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if let Some(event) = player.poll() {
            if accept(&event) {
                return Some(event);
            }
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    None
}

#[test]
fn test_init_ffmpeg_is_idempotent() {
    assert!(init_ffmpeg().is_ok());
    assert!(init_ffmpeg().is_ok());
}

#[test]
fn test_text_file_is_reported_as_playback_error() {
    let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = temp_dir.path().join("notes.mp4");
    std::fs::write(&path, "definitely not a video").expect("failed to write file");

    let locator = MediaLocator::new(path.to_string_lossy()).expect("valid locator");
    let mut player = FfmpegPlayerFactory::new()
        .create(&locator, PlayerOptions::default())
        .expect("player should spawn for an existing file");
    player.play();

    let event = poll_until(&mut player, Duration::from_secs(5), |_| true);
    match event {
        Some(PlayerEvent::Error(err)) => assert_ne!(err, VideoError::PlayerClosed),
        other => panic!("expected a playback error, got {other:?}"),
    }
}

#[test]
fn test_sample_produces_bounded_frames() {
    let Some(locator) = sample_locator() else {
        return;
    };

    let mut player = FfmpegPlayerFactory::new()
        .with_max_width(320)
        .create(&locator, PlayerOptions::default())
        .expect("sample should open");
    player.set_current_time(0.5);
    player.play();

    let event = poll_until(&mut player, Duration::from_secs(10), |event| {
        matches!(event, PlayerEvent::Frame(_))
    });
    let Some(PlayerEvent::Frame(frame)) = event else {
        panic!("expected a decoded frame");
    };
    assert!(frame.width <= 320);
    assert_eq!(frame.width % 2, 0);
    assert_eq!(frame.height % 2, 0);
    assert_eq!(frame.rgba.len(), (frame.width * frame.height * 4) as usize);
    assert!(frame.pts_secs >= 0.4, "frame before seek target: {}", frame.pts_secs);
}

#[test]
fn test_activated_controller_drives_sample_playback() {
    let Some(locator) = sample_locator() else {
        return;
    };

    let hub = LifecycleHub::new();
    let player = FfmpegPlayerFactory::new()
        .create(&locator, PlayerOptions::default())
        .expect("sample should open");
    let mut controller = ActivationController::new(player, ActivationSettings::default(), &hub);
    controller.set_active(true);
    assert!(controller.is_playing());

    let deadline = Instant::now() + Duration::from_secs(10);
    let mut saw_frame = false;
    while Instant::now() < deadline && !saw_frame {
        match controller.poll_player() {
            Some(PlayerEvent::Frame(_)) => saw_frame = true,
            Some(PlayerEvent::Error(err)) => panic!("sample failed to play: {err}"),
            None => std::thread::sleep(Duration::from_millis(10)),
        }
    }
    assert!(saw_frame, "controller should surface decoded frames");

    controller.set_active(false);
    assert!(!controller.is_playing());
}
