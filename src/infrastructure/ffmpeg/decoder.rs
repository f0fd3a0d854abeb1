// SPDX-License-Identifier: MPL-2.0
//! Blocking decoder loop run on each player's worker thread.
//!
//! The loop owns every `FFmpeg` context of one player. It reacts to
//! [`DecoderCommand`]s, paces decoded frames against their timestamps and
//! publishes the newest one through a `watch` channel.

use crate::application::port::VideoFrame;
use crate::domain::error::VideoError;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch};

/// Frames this far before a seek target are decoded but not shown.
const SEEK_TOLERANCE_SECS: f64 = 0.04;

/// Commands sent from a player handle to its decoder loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum DecoderCommand {
    Play,
    Pause,
    Seek { target_secs: f64 },
    Stop,
}

/// Everything the loop needs besides its channels.
#[derive(Debug, Clone)]
pub(crate) struct DecoderSetup {
    pub source: String,
    pub loop_enabled: bool,
    pub max_width: u32,
}

/// Channels connecting the loop to its player handle.
pub(crate) struct DecoderChannels {
    pub commands: mpsc::UnboundedReceiver<DecoderCommand>,
    pub frames: watch::Sender<Option<VideoFrame>>,
    pub errors: mpsc::UnboundedSender<VideoError>,
}

/// Runs until `Stop` is received or the player handle is dropped.
///
/// Only failures that stop playback reach the error channel: opening the
/// source, or rewinding it for a loop. A bad packet, a failed scale or a
/// failed seek is logged and decoding carries on.
pub(crate) fn run(setup: DecoderSetup, mut channels: DecoderChannels) {
    if let Err(err) = decode(&setup, &mut channels) {
        tracing::error!(source = %setup.source, error = %err, "video decoder stopped");
        let _ = channels.errors.send(err);
    }
}

fn decode(setup: &DecoderSetup, channels: &mut DecoderChannels) -> Result<(), VideoError> {
    super::init_ffmpeg()?;

    let mut ictx = ffmpeg_next::format::input(&setup.source)
        .map_err(|e| VideoError::from_message(&format!("Failed to open video: {e}")))?;

    let input = ictx
        .streams()
        .best(ffmpeg_next::media::Type::Video)
        .ok_or(VideoError::NoVideoStream)?;
    let video_stream_index = input.index();

    let context_decoder =
        ffmpeg_next::codec::context::Context::from_parameters(input.parameters())
            .map_err(|e| VideoError::from_message(&format!("Failed to create codec context: {e}")))?;
    let mut decoder = context_decoder
        .decoder()
        .video()
        .map_err(|e| VideoError::from_message(&format!("Failed to create video decoder: {e}")))?;

    let time_base = input.time_base();
    let time_base_f64 = f64::from(time_base.numerator()) / f64::from(time_base.denominator());

    let (src_width, src_height) = (decoder.width(), decoder.height());
    let (width, height) = output_size(src_width, src_height, setup.max_width);

    let mut scaler = ffmpeg_next::software::scaling::Context::get(
        decoder.format(),
        src_width,
        src_height,
        ffmpeg_next::format::Pixel::RGBA,
        width,
        height,
        ffmpeg_next::software::scaling::Flags::BILINEAR,
    )
    .map_err(|e| VideoError::Other(format!("Failed to create scaler: {e}")))?;

    tracing::debug!(source = %setup.source, width, height, "video decoder ready");

    let mut clock = PlaybackClock::default();
    let mut is_playing = false;
    let mut decode_single_frame = false;
    let mut seek_target: Option<f64> = None;

    loop {
        // Block while idle, drain without blocking while decoding.
        let next = if is_playing || decode_single_frame {
            match channels.commands.try_recv() {
                Ok(command) => Some(command),
                Err(mpsc::error::TryRecvError::Empty) => None,
                Err(mpsc::error::TryRecvError::Disconnected) => break,
            }
        } else {
            match channels.commands.blocking_recv() {
                Some(command) => Some(command),
                None => break,
            }
        };

        match next {
            Some(DecoderCommand::Play) => {
                is_playing = true;
                clock.reset();
            }
            Some(DecoderCommand::Pause) => {
                is_playing = false;
                clock.reset();
            }
            Some(DecoderCommand::Seek { target_secs }) => {
                match seek(&mut ictx, target_secs) {
                    Ok(()) => {
                        decoder.flush();
                        clock.reset();
                        seek_target = Some(target_secs);
                        if !is_playing {
                            decode_single_frame = true;
                        }
                    }
                    Err(err) => {
                        tracing::warn!(source = %setup.source, error = %err, "seek ignored");
                    }
                }
            }
            Some(DecoderCommand::Stop) => break,
            None => {}
        }

        if !is_playing && !decode_single_frame {
            continue;
        }

        let mut frame_decoded = false;
        for (stream, packet) in ictx.packets() {
            if stream.index() != video_stream_index {
                continue;
            }

            if let Err(e) = decoder.send_packet(&packet) {
                tracing::warn!(source = %setup.source, error = %e, "dropping undecodable packet");
                continue;
            }

            let mut decoded_frame = ffmpeg_next::frame::Video::empty();
            if decoder.receive_frame(&mut decoded_frame).is_err() {
                continue;
            }

            #[allow(clippy::cast_precision_loss)]
            let pts_secs = decoded_frame
                .timestamp()
                .map_or(0.0, |pts| pts as f64 * time_base_f64);

            if let Some(target) = seek_target {
                if pts_secs + SEEK_TOLERANCE_SECS < target {
                    continue;
                }
                seek_target = None;
            }

            let mut rgb_frame = ffmpeg_next::frame::Video::empty();
            if let Err(e) = scaler.run(&decoded_frame, &mut rgb_frame) {
                tracing::warn!(source = %setup.source, error = %e, "dropping unscalable frame");
                continue;
            }

            if is_playing {
                clock.wait_for(pts_secs);
            }

            let frame = VideoFrame {
                rgba: extract_rgba_data(&rgb_frame),
                width,
                height,
                pts_secs,
            };
            if channels.frames.send(Some(frame)).is_err() {
                // Player handle is gone.
                return Ok(());
            }

            frame_decoded = true;
            decode_single_frame = false;
            break;
        }

        if !frame_decoded {
            decode_single_frame = false;
            if setup.loop_enabled && is_playing {
                if let Err(err) = seek(&mut ictx, 0.0) {
                    let _ = channels.errors.send(err);
                    is_playing = false;
                } else {
                    decoder.flush();
                }
                clock.reset();
                seek_target = None;
            } else {
                is_playing = false;
                clock.reset();
            }
        }
    }

    Ok(())
}

fn seek(ictx: &mut ffmpeg_next::format::context::Input, target_secs: f64) -> Result<(), VideoError> {
    // FFmpeg seeks in AV_TIME_BASE units (microseconds).
    #[allow(clippy::cast_possible_truncation)]
    let timestamp = (target_secs.max(0.0) * 1_000_000.0) as i64;
    ictx.seek(timestamp, ..timestamp)
        .map_err(|e| VideoError::DecodingFailed(format!("Seek failed: {e}")))
}

/// Wall-clock pacing anchored on the first frame shown after a reset.
#[derive(Debug, Default)]
pub(crate) struct PlaybackClock {
    anchor: Option<(Instant, f64)>,
}

impl PlaybackClock {
    pub fn reset(&mut self) {
        self.anchor = None;
    }

    pub fn wait_for(&mut self, pts_secs: f64) {
        self.wait_ahead(pts_secs, 0.0);
    }

    /// Sleeps until `lead_secs` before `pts_secs` is due.
    pub fn wait_ahead(&mut self, pts_secs: f64, lead_secs: f64) {
        let delay = self.delay_until(pts_secs, lead_secs);
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }

    fn delay_until(&mut self, pts_secs: f64, lead_secs: f64) -> Duration {
        let (start, first_pts) = *self.anchor.get_or_insert((Instant::now(), pts_secs));
        let offset = (pts_secs - first_pts - lead_secs).max(0.0);
        let target = start + Duration::from_secs_f64(offset);
        target.saturating_duration_since(Instant::now())
    }
}

/// Output size: never wider than `max_width`, aspect ratio kept, even sides.
pub(crate) fn output_size(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width == 0 || height == 0 || max_width == 0 || width <= max_width {
        return (width, height);
    }
    let scaled_height = u64::from(height) * u64::from(max_width) / u64::from(width);
    #[allow(clippy::cast_possible_truncation)]
    let scaled_height = (scaled_height as u32).max(2) & !1;
    (max_width & !1, scaled_height)
}

/// Extracts RGBA data from a decoded frame, handling stride correctly.
#[allow(clippy::cast_possible_truncation)] // stride is always < u32::MAX for video frames
fn extract_rgba_data(frame: &ffmpeg_next::frame::Video) -> Vec<u8> {
    let width = frame.width();
    let height = frame.height();
    let data = frame.data(0);
    let stride = frame.stride(0);

    let mut rgba_bytes = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        let row_start = (y * stride as u32) as usize;
        let row_end = row_start + (width * 4) as usize;
        rgba_bytes.extend_from_slice(&data[row_start..row_end]);
    }

    rgba_bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_size_keeps_small_frames() {
        assert_eq!(output_size(720, 1280, 1080), (720, 1280));
    }

    #[test]
    fn output_size_scales_down_keeping_aspect() {
        assert_eq!(output_size(1920, 1080, 960), (960, 540));
        assert_eq!(output_size(1080, 1920, 540), (540, 960));
    }

    #[test]
    fn output_size_produces_even_dimensions() {
        let (w, h) = output_size(1001, 999, 501);
        assert_eq!(w % 2, 0);
        assert_eq!(h % 2, 0);
    }

    #[test]
    fn output_size_handles_degenerate_input() {
        assert_eq!(output_size(0, 0, 720), (0, 0));
    }

    #[test]
    fn clock_lead_shortens_the_wait() {
        let mut clock = PlaybackClock::default();
        assert!(clock.delay_until(1.0, 0.0).is_zero());

        let plain = clock.delay_until(3.0, 0.0);
        let early = clock.delay_until(3.0, 0.5);
        assert!(plain > Duration::from_millis(1_900));
        assert!(plain - early >= Duration::from_millis(450));
        assert!(clock.delay_until(1.2, 0.5).is_zero());
    }

    #[test]
    fn clock_does_not_wait_for_first_frame() {
        let mut clock = PlaybackClock::default();
        let started = Instant::now();
        clock.wait_for(12.0);
        assert!(started.elapsed() < Duration::from_millis(50));
    }
}
