use std::fmt;

use crate::error::{Parameter, StretchError};

/// A single audio sample (32-bit float, nominal range -1.0 to 1.0).
pub type Sample = f32;

/// Default frame (window / FFT) size.
pub const DEFAULT_FRAME_SIZE: usize = 2048;
/// Default analysis hop size.
pub const DEFAULT_HOP_SIZE: usize = 512;
/// Default sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Gain applied to each synthesized frame during overlap-add.
///
/// Neither mode divides by the summed squared-window envelope, so output
/// level depends on the overlap factor. With the default 4x overlap a
/// full-scale sine comes out at roughly 1.5x its input amplitude under
/// [`OverlapGain::Unity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapGain {
    /// Plain accumulation.
    #[default]
    Unity,
    /// Every frame scaled by sqrt(2) for the doubled window application.
    Sqrt2,
}

impl OverlapGain {
    /// Linear factor applied to each windowed frame.
    #[inline]
    pub fn factor(self) -> f64 {
        match self {
            OverlapGain::Unity => 1.0,
            OverlapGain::Sqrt2 => std::f64::consts::SQRT_2,
        }
    }
}

/// Buffer holding audio samples in interleaved format.
///
/// For mono audio, samples are stored sequentially: `[s0, s1, s2, ...]`.
/// For `c` channels, frame `i` occupies `data[i*c .. (i+1)*c]`.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// Raw interleaved sample data.
    pub data: Vec<Sample>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of interleaved channels.
    pub channels: u16,
}

impl AudioBuffer {
    /// Creates a buffer from interleaved samples.
    pub fn new(data: Vec<Sample>, sample_rate: u32, channels: u16) -> Self {
        Self {
            data,
            sample_rate,
            channels,
        }
    }

    /// Creates a mono buffer.
    pub fn from_mono(data: Vec<Sample>, sample_rate: u32) -> Self {
        Self::new(data, sample_rate, 1)
    }

    /// Interleaves separate channel vectors into one buffer.
    ///
    /// # Errors
    /// Returns [`StretchError::InvalidFormat`] if there are no channels or
    /// the channels differ in length.
    pub fn from_channels(channels: &[Vec<Sample>], sample_rate: u32) -> Result<Self, StretchError> {
        let Some(first) = channels.first() else {
            return Err(StretchError::InvalidFormat("no channels given".to_string()));
        };
        if channels.iter().any(|ch| ch.len() != first.len()) {
            return Err(StretchError::InvalidFormat(
                "all channels must have the same number of samples".to_string(),
            ));
        }
        let num_channels = u16::try_from(channels.len()).map_err(|_| {
            StretchError::InvalidFormat(format!("too many channels: {}", channels.len()))
        })?;
        let data = (0..first.len())
            .flat_map(|i| channels.iter().map(move |ch| ch[i]))
            .collect();
        Ok(Self::new(data, sample_rate, num_channels))
    }

    /// Number of frames (samples per channel).
    pub fn num_frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.data.len() / self.channels as usize
    }

    /// Duration of the audio in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.num_frames() as f64 / self.sample_rate as f64
    }

    /// Copies one channel out of the interleaved data.
    pub fn channel_data(&self, channel: u16) -> Vec<Sample> {
        if channel >= self.channels {
            return Vec::new();
        }
        self.data
            .iter()
            .skip(channel as usize)
            .step_by(self.channels as usize)
            .copied()
            .collect()
    }
}

/// Parameters controlling the time stretch operation.
#[derive(Debug, Clone, PartialEq)]
pub struct StretchParams {
    /// Stretch ratio: >1.0 = longer, <1.0 = shorter.
    pub stretch_ratio: f64,
    /// Sample rate in Hz (default: 44100).
    pub sample_rate: u32,
    /// Number of interleaved channels (default: 1).
    pub channels: u16,
    /// Frame (window / FFT) size `N` (default: 2048).
    pub frame_size: usize,
    /// Analysis hop size (default: 512).
    pub hop_size: usize,
    /// Overlap-add gain (default: unity).
    pub gain: OverlapGain,
}

impl StretchParams {
    /// Creates parameters with the given ratio and defaults for the rest.
    pub fn new(stretch_ratio: f64) -> Self {
        Self {
            stretch_ratio,
            sample_rate: DEFAULT_SAMPLE_RATE,
            channels: 1,
            frame_size: DEFAULT_FRAME_SIZE,
            hop_size: DEFAULT_HOP_SIZE,
            gain: OverlapGain::default(),
        }
    }

    /// Sets the sample rate.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Sets the number of interleaved channels.
    pub fn with_channels(mut self, channels: u16) -> Self {
        self.channels = channels;
        self
    }

    /// Sets the frame size.
    pub fn with_frame_size(mut self, frame_size: usize) -> Self {
        self.frame_size = frame_size;
        self
    }

    /// Sets the analysis hop size.
    pub fn with_hop_size(mut self, hop_size: usize) -> Self {
        self.hop_size = hop_size;
        self
    }

    /// Sets the overlap-add gain.
    pub fn with_gain(mut self, gain: OverlapGain) -> Self {
        self.gain = gain;
        self
    }

    /// Checks the parameters that do not depend on the input length.
    ///
    /// # Errors
    /// [`StretchError::InvalidParameter`] for a non-positive or non-finite
    /// ratio, or a zero frame size, hop, sample rate or channel count;
    /// [`StretchError::OutOfRange`] if the hop exceeds the frame size.
    pub fn validate(&self) -> Result<(), StretchError> {
        if !self.stretch_ratio.is_finite() || self.stretch_ratio <= 0.0 {
            return Err(StretchError::invalid(
                Parameter::StretchRatio,
                self.stretch_ratio,
            ));
        }
        if self.frame_size == 0 {
            return Err(StretchError::invalid(Parameter::FrameSize, 0.0));
        }
        if self.hop_size == 0 {
            return Err(StretchError::invalid(Parameter::HopSize, 0.0));
        }
        if self.hop_size > self.frame_size {
            return Err(StretchError::OutOfRange {
                parameter: Parameter::HopSize,
                value: self.hop_size,
                limit: self.frame_size,
            });
        }
        if self.sample_rate == 0 {
            return Err(StretchError::invalid(Parameter::SampleRate, 0.0));
        }
        if self.channels == 0 {
            return Err(StretchError::invalid(Parameter::Channels, 0.0));
        }
        Ok(())
    }
}

impl Default for StretchParams {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl fmt::Display for StretchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ratio={:.4}, {} Hz, {} ch, N={}, hop={}, gain={:?}",
            self.stretch_ratio,
            self.sample_rate,
            self.channels,
            self.frame_size,
            self.hop_size,
            self.gain
        )
    }
}
