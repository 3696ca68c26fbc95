//! Error types for the pvstretch crate.

use std::fmt;

use thiserror::Error;

/// The parameter a [`StretchError`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    /// Frame (window / FFT) size `N`.
    FrameSize,
    /// Analysis hop size.
    HopSize,
    /// Synthesis hop size derived from the stretch ratio.
    SynthesisHop,
    /// Stretch ratio.
    StretchRatio,
    /// Sampling rate in Hz.
    SampleRate,
    /// Channel count of interleaved input.
    Channels,
    /// Number of benchmark runs.
    Runs,
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Parameter::FrameSize => "frame size",
            Parameter::HopSize => "hop size",
            Parameter::SynthesisHop => "synthesis hop",
            Parameter::StretchRatio => "stretch ratio",
            Parameter::SampleRate => "sample rate",
            Parameter::Channels => "channel count",
            Parameter::Runs => "run count",
        };
        f.write_str(name)
    }
}

/// Errors that can occur during time stretching.
///
/// Parameter errors are raised before any transform work starts; there is
/// never a partially stretched result.
#[derive(Debug, Error)]
pub enum StretchError {
    /// A parameter is zero, negative, or not finite.
    #[error("invalid {parameter}: {value} (must be positive)")]
    InvalidParameter { parameter: Parameter, value: f64 },
    /// The parameters are individually valid but their combination collapses
    /// the hop remapping.
    #[error("degenerate {parameter}: {reason}")]
    DegenerateParameter {
        parameter: Parameter,
        reason: String,
    },
    /// A size exceeds the limit imposed by another parameter or the input.
    #[error("{parameter} out of range: {value} exceeds {limit}")]
    OutOfRange {
        parameter: Parameter,
        value: usize,
        limit: usize,
    },
    /// Input contains NaN or infinite samples.
    #[error("input contains non-finite samples")]
    NonFiniteInput,
    /// Input audio is laid out in a way the pipeline cannot take.
    #[error("invalid format: {0}")]
    InvalidFormat(String),
    /// WAV encoding or decoding failed.
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StretchError {
    /// Returns the offending parameter for parameter errors.
    pub fn parameter(&self) -> Option<Parameter> {
        match self {
            StretchError::InvalidParameter { parameter, .. }
            | StretchError::DegenerateParameter { parameter, .. }
            | StretchError::OutOfRange { parameter, .. } => Some(*parameter),
            _ => None,
        }
    }

    pub(crate) fn invalid(parameter: Parameter, value: f64) -> Self {
        StretchError::InvalidParameter { parameter, value }
    }
}
