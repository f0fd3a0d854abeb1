// SPDX-License-Identifier: MPL-2.0
//! Audio output through the default cpal device.
//!
//! Decoded samples are queued in an [`OutputState`] shared between the
//! player handle, the audio decoder thread and the cpal callback. The handle
//! flips the pause flag directly so pausing silences the device at once,
//! without waiting for the decoder thread to notice.

use crate::domain::error::VideoError;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Seconds of audio the queue may hold ahead of the device.
const MAX_QUEUED_SECS: usize = 1;

/// Sample queue and pause flag shared with the cpal callback.
///
/// Samples are interleaved `f32` normalized to `[-1.0, 1.0]`.
#[derive(Debug)]
pub(crate) struct OutputState {
    paused: AtomicBool,
    capacity: AtomicUsize,
    buffer: Mutex<Vec<f32>>,
}

impl OutputState {
    /// New state, paused, with an empty queue that accepts nothing until a
    /// device sets its capacity.
    pub fn new() -> Self {
        Self {
            paused: AtomicBool::new(true),
            capacity: AtomicUsize::new(0),
            buffer: Mutex::new(Vec::new()),
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::Relaxed);
    }

    pub fn set_capacity(&self, samples: usize) {
        self.capacity.store(samples, Ordering::Relaxed);
    }

    /// Number of samples waiting for the device.
    pub fn queued(&self) -> usize {
        self.lock().len()
    }

    /// Queues as many of `samples` as fit and returns how many were taken.
    ///
    /// A full queue drops the overflow rather than growing.
    pub fn push(&self, samples: &[f32]) -> usize {
        let capacity = self.capacity.load(Ordering::Relaxed);
        let mut buffer = self.lock();
        let room = capacity.saturating_sub(buffer.len());
        let taken = room.min(samples.len());
        buffer.extend_from_slice(&samples[..taken]);
        taken
    }

    /// Drops every queued sample, used when seeking.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Fills a device buffer from the queue, padding with silence.
    ///
    /// Writes silence and consumes nothing while paused.
    pub fn fill<T>(&self, data: &mut [T])
    where
        T: cpal::SizedSample + cpal::FromSample<f32>,
    {
        if self.is_paused() {
            data.fill(T::from_sample(0.0f32));
            return;
        }

        let mut buffer = self.lock();
        let consumed = data.len().min(buffer.len());
        for (slot, sample) in data.iter_mut().zip(buffer.drain(..consumed)) {
            // Just below 1.0: i16 conversion overflows at exactly 1.0.
            *slot = T::from_sample(sample.clamp(-1.0, 0.999_999_9));
        }
        data[consumed..].fill(T::from_sample(0.0f32));
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<f32>> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// An open output stream on the default device.
///
/// The stream stops when this is dropped. It is created and dropped on the
/// audio decoder thread.
pub(crate) struct AudioOutput {
    sample_rate: u32,
    channels: u16,
    _stream: cpal::Stream,
}

impl AudioOutput {
    /// Opens the default output device and starts streaming from `state`.
    ///
    /// # Errors
    ///
    /// Returns [`VideoError::Other`] if there is no output device, its
    /// configuration cannot be read, or the stream fails to start.
    pub fn open(state: Arc<OutputState>) -> Result<Self, VideoError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| VideoError::Other("No audio output device found".to_string()))?;

        let supported_config = device
            .default_output_config()
            .map_err(|e| VideoError::Other(format!("Failed to get audio config: {e}")))?;

        let sample_rate = supported_config.sample_rate().0;
        let channels = supported_config.channels();
        state.set_capacity(sample_rate as usize * usize::from(channels) * MAX_QUEUED_SECS);

        let config: cpal::StreamConfig = supported_config.config();
        let stream = match supported_config.sample_format() {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config, state)?,
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config, state)?,
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config, state)?,
            other => {
                return Err(VideoError::Other(format!(
                    "Unsupported audio sample format: {other:?}"
                )))
            }
        };

        stream
            .play()
            .map_err(|e| VideoError::Other(format!("Failed to start audio stream: {e}")))?;

        tracing::debug!(sample_rate, channels, "audio output opened");

        Ok(Self {
            sample_rate,
            channels,
            _stream: stream,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    state: Arc<OutputState>,
) -> Result<cpal::Stream, VideoError>
where
    T: cpal::SizedSample + cpal::FromSample<f32>,
{
    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| state.fill(data),
            |err| tracing::warn!(error = %err, "audio output error"),
            None,
        )
        .map_err(|e| VideoError::Other(format!("Failed to build audio stream: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;

    fn playing_state(capacity: usize) -> OutputState {
        let state = OutputState::new();
        state.set_capacity(capacity);
        state.set_paused(false);
        state
    }

    #[test]
    fn new_state_starts_paused_and_refuses_samples() {
        let state = OutputState::new();
        assert!(state.is_paused());
        assert_eq!(state.push(&[0.1, 0.2]), 0);
        assert_eq!(state.queued(), 0);
    }

    #[test]
    fn push_stops_at_capacity() {
        let state = playing_state(3);
        assert_eq!(state.push(&[0.1, 0.2]), 2);
        assert_eq!(state.push(&[0.3, 0.4]), 1);
        assert_eq!(state.queued(), 3);
    }

    #[test]
    fn fill_drains_queue_then_pads_with_silence() {
        let state = playing_state(8);
        state.push(&[0.25, -0.5]);

        let mut out = [1.0f32; 4];
        state.fill(&mut out);

        assert_abs_diff_eq!(out[0], 0.25);
        assert_abs_diff_eq!(out[1], -0.5);
        assert_abs_diff_eq!(out[2], 0.0);
        assert_abs_diff_eq!(out[3], 0.0);
        assert_eq!(state.queued(), 0);
    }

    #[test]
    fn paused_fill_is_silent_and_keeps_samples() {
        let state = playing_state(8);
        state.push(&[0.5, 0.5]);
        state.set_paused(true);

        let mut out = [1.0f32; 2];
        state.fill(&mut out);

        assert_abs_diff_eq!(out[0], 0.0);
        assert_eq!(state.queued(), 2);
    }

    #[test]
    fn fill_clips_out_of_range_samples() {
        let state = playing_state(2);
        state.push(&[3.0, -3.0]);

        let mut out = [0i16; 2];
        state.fill(&mut out);

        assert!(out[0] > 32_000);
        assert!(out[1] < -32_000);
    }

    #[test]
    fn clear_discards_queue() {
        let state = playing_state(4);
        state.push(&[0.1, 0.2, 0.3]);
        state.clear();
        assert_eq!(state.queued(), 0);
    }
}
