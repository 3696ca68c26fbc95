#![forbid(unsafe_code)]
//! Phase vocoder time-scale modification.
//!
//! `pvstretch` changes the duration of an audio signal by a given ratio
//! without changing its pitch. The whole signal is processed as one buffer:
//! short-time Fourier analysis at a fixed hop, per-bin true-frequency
//! estimation and phase integration, and overlap-add resynthesis at a hop
//! chosen so the output is exactly `round(len * ratio)` samples long.
//!
//! # Quick Start
//!
//! ```
//! // 1 second of 440 Hz sine at 44.1 kHz
//! let input: Vec<f32> = (0..44100)
//!     .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 44100.0).sin())
//!     .collect();
//!
//! let output = pvstretch::stretch_signal(&input, 44100, 2.0).unwrap();
//! assert_eq!(output.len(), 88200);
//! ```
//!
//! # Configuration
//!
//! ```
//! use pvstretch::{OverlapGain, StretchParams};
//!
//! let input = vec![0.0f32; 8192];
//! let params = StretchParams::new(0.75)
//!     .with_sample_rate(48000)
//!     .with_frame_size(1024)
//!     .with_hop_size(256)
//!     .with_gain(OverlapGain::Sqrt2);
//! let output = pvstretch::stretch(&input, &params).unwrap();
//! assert_eq!(output.len(), 6144);
//! ```

pub mod bench;
pub mod core;
pub mod error;
pub mod io;
pub mod stretch;

pub use bench::{measure_latency, LatencyStats};
pub use crate::core::types::{
    AudioBuffer, OverlapGain, Sample, StretchParams, DEFAULT_FRAME_SIZE, DEFAULT_HOP_SIZE,
};
pub use error::{Parameter, StretchError};
pub use stretch::{PhaseProcessor, PhaseVocoder, SpectralMatrix, StretchPlan};

/// Deinterleaves multi-channel audio into separate per-channel vectors.
#[inline]
fn deinterleave(input: &[f32], num_channels: usize) -> Vec<Vec<f32>> {
    (0..num_channels)
        .map(|ch| {
            input
                .iter()
                .skip(ch)
                .step_by(num_channels)
                .copied()
                .collect()
        })
        .collect()
}

/// Interleaves per-channel vectors into a single buffer, truncating to the shortest channel.
#[inline]
fn interleave(channels: &[Vec<f32>]) -> Vec<f32> {
    let min_len = channels.iter().map(|c| c.len()).min().unwrap_or(0);
    (0..min_len)
        .flat_map(|i| channels.iter().map(move |ch| ch[i]))
        .collect()
}

/// Stretches a mono signal with the default frame size (2048) and hop (512).
///
/// # Errors
/// See [`stretch`].
pub fn stretch_signal(
    samples: &[f32],
    sample_rate: u32,
    stretch_ratio: f64,
) -> Result<Vec<f32>, StretchError> {
    let params = StretchParams::new(stretch_ratio).with_sample_rate(sample_rate);
    stretch(samples, &params)
}

/// Stretches audio samples by the given parameters.
///
/// For multi-channel input, provide interleaved samples and set
/// `params.channels`; every channel is stretched independently with the same
/// settings and the result is interleaved again. Each output channel is
/// `round(frames * ratio)` samples long.
///
/// # Errors
///
/// - [`StretchError::InvalidParameter`] for a non-positive ratio, frame size,
///   hop, sample rate or channel count.
/// - [`StretchError::OutOfRange`] if the hop exceeds the frame size, or the
///   frame size exceeds the per-channel input length.
/// - [`StretchError::DegenerateParameter`] if the frame size equals the
///   per-channel input length.
/// - [`StretchError::InvalidFormat`] if the input length is not a multiple of
///   the channel count.
/// - [`StretchError::NonFiniteInput`] if any sample is NaN or infinite.
///
/// # Example
///
/// ```
/// use pvstretch::StretchParams;
///
/// let input: Vec<f32> = (0..44100)
///     .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 44100.0).sin())
///     .collect();
/// let params = StretchParams::new(1.5).with_sample_rate(44100);
/// let output = pvstretch::stretch(&input, &params).unwrap();
/// assert_eq!(output.len(), 66150);
/// ```
pub fn stretch(input: &[f32], params: &StretchParams) -> Result<Vec<f32>, StretchError> {
    params.validate()?;
    let num_channels = params.channels as usize;
    if input.len() % num_channels != 0 {
        return Err(StretchError::InvalidFormat(format!(
            "{} samples do not divide into {} channels",
            input.len(),
            num_channels
        )));
    }

    // Geometry is checked before the window and FFT plans are built
    StretchPlan::new(
        input.len() / num_channels,
        params.frame_size,
        params.hop_size,
        params.stretch_ratio,
    )?;
    if input.iter().any(|s| !s.is_finite()) {
        return Err(StretchError::NonFiniteInput);
    }
    let vocoder = PhaseVocoder::new(params)?;

    if num_channels == 1 {
        return vocoder.process(input);
    }

    let channel_outputs = deinterleave(input, num_channels)
        .iter()
        .map(|channel| vocoder.process(channel))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(interleave(&channel_outputs))
}

/// Stretches an [`AudioBuffer`] and returns a new `AudioBuffer`.
///
/// The sample rate and channel count are taken from the buffer, overriding
/// whatever is set in `params`.
///
/// # Example
///
/// ```
/// use pvstretch::{AudioBuffer, StretchParams};
///
/// let buffer = AudioBuffer::from_mono(
///     (0..44100)
///         .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 44100.0).sin())
///         .collect(),
///     44100,
/// );
/// let output = pvstretch::stretch_buffer(&buffer, &StretchParams::new(0.5)).unwrap();
/// assert_eq!(output.sample_rate, 44100);
/// assert_eq!(output.num_frames(), 22050);
/// ```
pub fn stretch_buffer(
    buffer: &AudioBuffer,
    params: &StretchParams,
) -> Result<AudioBuffer, StretchError> {
    let effective_params = params
        .clone()
        .with_sample_rate(buffer.sample_rate)
        .with_channels(buffer.channels);
    let data = stretch(&buffer.data, &effective_params)?;
    Ok(AudioBuffer::new(data, buffer.sample_rate, buffer.channels))
}
