// SPDX-License-Identifier: MPL-2.0
//! Blocking audio decoder loop run next to a player's video thread.
//!
//! The loop opens the source a second time, decodes its best audio stream,
//! resamples it to the output device format and queues the samples a short
//! while before they are due. It follows the same [`DecoderCommand`]s as the
//! video loop, so both sides start, pause, seek and loop together.
//!
//! Audio is best effort: a source without sound or a machine without an
//! output device is logged and the video keeps playing silently.

use super::audio_output::{AudioOutput, OutputState};
use super::decoder::{DecoderCommand, PlaybackClock};
use crate::domain::error::VideoError;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Samples are queued this far ahead of their presentation time.
const AUDIO_LOOKAHEAD_SECS: f64 = 0.2;

/// Gives up skipping towards a seek target after this many frames.
const MAX_SEEK_FRAMES: u32 = 1_000;

/// Everything the loop needs besides its channels.
#[derive(Debug, Clone)]
pub(crate) struct AudioSetup {
    pub source: String,
    pub loop_enabled: bool,
}

/// Runs until `Stop` is received or the player handle is dropped.
pub(crate) fn run(
    setup: AudioSetup,
    commands: mpsc::UnboundedReceiver<DecoderCommand>,
    output: Arc<OutputState>,
) {
    if let Err(err) = decode(&setup, commands, output) {
        tracing::warn!(source = %setup.source, error = %err, "audio disabled for this video");
    }
}

#[allow(clippy::too_many_lines)]
fn decode(
    setup: &AudioSetup,
    mut commands: mpsc::UnboundedReceiver<DecoderCommand>,
    output: Arc<OutputState>,
) -> Result<(), VideoError> {
    super::init_ffmpeg()?;

    let mut ictx = ffmpeg_next::format::input(&setup.source)
        .map_err(|e| VideoError::from_message(&format!("Failed to open audio: {e}")))?;

    let Some(input) = ictx.streams().best(ffmpeg_next::media::Type::Audio) else {
        tracing::debug!(source = %setup.source, "no audio stream");
        return Ok(());
    };
    let audio_stream_index = input.index();
    let time_base = input.time_base();
    let time_base_f64 = f64::from(time_base.numerator()) / f64::from(time_base.denominator());

    let context_decoder =
        ffmpeg_next::codec::context::Context::from_parameters(input.parameters())
            .map_err(|e| VideoError::from_message(&format!("Failed to create codec context: {e}")))?;
    let mut decoder = context_decoder
        .decoder()
        .audio()
        .map_err(|e| VideoError::from_message(&format!("Failed to create audio decoder: {e}")))?;

    // Kept alive for the whole loop; dropping it stops the device.
    let device = AudioOutput::open(Arc::clone(&output))?;
    let out_channels = device.channels().clamp(1, 2);
    let out_layout = if out_channels == 1 {
        ffmpeg_next::ChannelLayout::MONO
    } else {
        ffmpeg_next::ChannelLayout::STEREO
    };

    let mut resampler = ffmpeg_next::software::resampling::Context::get(
        decoder.format(),
        decoder.channel_layout(),
        decoder.rate(),
        ffmpeg_next::format::Sample::F32(ffmpeg_next::format::sample::Type::Packed),
        out_layout,
        device.sample_rate(),
    )
    .map_err(|e| VideoError::Other(format!("Failed to create resampler: {e}")))?;

    let device_channels = usize::from(device.channels());
    let mut clock = PlaybackClock::default();
    let mut is_playing = false;
    let mut seek_target: Option<f64> = None;
    let mut seek_frames_skipped = 0u32;

    loop {
        let next = if is_playing {
            match commands.try_recv() {
                Ok(command) => Some(command),
                Err(mpsc::error::TryRecvError::Empty) => None,
                Err(mpsc::error::TryRecvError::Disconnected) => break,
            }
        } else {
            match commands.blocking_recv() {
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
            Some(DecoderCommand::Seek { target_secs }) => match seek(&mut ictx, target_secs) {
                Ok(()) => {
                    decoder.flush();
                    output.clear();
                    clock.reset();
                    seek_target = Some(target_secs);
                    seek_frames_skipped = 0;
                }
                Err(err) => tracing::warn!(source = %setup.source, error = %err, "audio seek ignored"),
            },
            Some(DecoderCommand::Stop) => break,
            None => {}
        }

        if !is_playing {
            continue;
        }

        let mut frame_decoded = false;
        for (stream, packet) in ictx.packets() {
            if stream.index() != audio_stream_index {
                continue;
            }
            if let Err(e) = decoder.send_packet(&packet) {
                tracing::warn!(source = %setup.source, error = %e, "dropping undecodable audio packet");
                continue;
            }

            let mut decoded_frame = ffmpeg_next::frame::Audio::empty();
            if decoder.receive_frame(&mut decoded_frame).is_err() {
                continue;
            }

            #[allow(clippy::cast_precision_loss)]
            let pts_secs = decoded_frame
                .timestamp()
                .map_or(0.0, |pts| pts as f64 * time_base_f64);

            let mut resampled = ffmpeg_next::frame::Audio::empty();
            if let Err(e) = resampler.run(&decoded_frame, &mut resampled) {
                tracing::warn!(source = %setup.source, error = %e, "dropping unresamplable audio");
                continue;
            }
            let samples = interleaved_samples(&resampled, out_channels);

            #[allow(clippy::cast_precision_loss)]
            let duration_secs = resampled.samples() as f64 / f64::from(device.sample_rate());

            if let Some(target) = seek_target {
                if pts_secs + duration_secs < target {
                    seek_frames_skipped += 1;
                    if seek_frames_skipped < MAX_SEEK_FRAMES {
                        continue;
                    }
                    tracing::warn!(source = %setup.source, target, "audio seek target not reached");
                }
                seek_target = None;
            }

            clock.wait_ahead(pts_secs, AUDIO_LOOKAHEAD_SECS);
            output.push(&widen_channels(samples, out_channels, device_channels));

            frame_decoded = true;
            break;
        }

        if !frame_decoded {
            if setup.loop_enabled {
                if let Err(err) = seek(&mut ictx, 0.0) {
                    tracing::warn!(source = %setup.source, error = %err, "audio cannot loop");
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

    drop(device);
    Ok(())
}

fn seek(ictx: &mut ffmpeg_next::format::context::Input, target_secs: f64) -> Result<(), VideoError> {
    #[allow(clippy::cast_possible_truncation)]
    let timestamp = (target_secs.max(0.0) * 1_000_000.0) as i64;
    ictx.seek(timestamp, ..timestamp)
        .map_err(|e| VideoError::DecodingFailed(format!("Audio seek failed: {e}")))
}

/// Reads packed `f32` samples out of a resampled frame.
fn interleaved_samples(frame: &ffmpeg_next::frame::Audio, channels: u16) -> Vec<f32> {
    let count = frame.samples() * usize::from(channels);
    frame
        .data(0)
        .chunks_exact(4)
        .take(count)
        .map(|bytes| f32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
        .collect()
}

/// Spreads mono or stereo frames over a device with more channels.
///
/// Extra device channels get silence.
fn widen_channels(samples: Vec<f32>, channels: u16, device_channels: usize) -> Vec<f32> {
    let channels = usize::from(channels);
    if device_channels <= channels || channels == 0 {
        return samples;
    }
    let mut widened = Vec::with_capacity(samples.len() / channels * device_channels);
    for frame in samples.chunks_exact(channels) {
        widened.extend_from_slice(frame);
        widened.resize(widened.len() + device_channels - channels, 0.0);
    }
    widened
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widen_keeps_matching_layouts() {
        let samples = vec![0.1, 0.2, 0.3, 0.4];
        assert_eq!(widen_channels(samples.clone(), 2, 2), samples);
    }

    #[test]
    fn widen_pads_surround_devices_with_silence() {
        let widened = widen_channels(vec![0.1, 0.2, 0.3, 0.4], 2, 4);
        assert_eq!(widened, vec![0.1, 0.2, 0.0, 0.0, 0.3, 0.4, 0.0, 0.0]);
    }

    #[test]
    fn widen_ignores_empty_layout() {
        assert_eq!(widen_channels(vec![0.5], 0, 2), vec![0.5]);
    }

    #[test]
    fn unreadable_source_ends_quietly() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("silent.mp4");
        std::fs::write(&path, b"not a video").unwrap();

        let (_tx, rx) = mpsc::unbounded_channel();
        let output = Arc::new(OutputState::new());
        run(
            AudioSetup {
                source: path.to_string_lossy().into_owned(),
                loop_enabled: true,
            },
            rx,
            Arc::clone(&output),
        );

        assert_eq!(output.queued(), 0);
    }
}
