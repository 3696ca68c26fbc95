use crate::error::{Parameter, StretchError};
use crate::stretch::analysis::frame_count;

/// Output geometry derived from the input length and stretch ratio.
///
/// The synthesis hop is chosen so that the number of synthesis frames equals
/// the number of analysis frames; the phase processor relies on that 1:1
/// correspondence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StretchPlan {
    /// Input length `n` in samples.
    pub input_len: usize,
    /// Output length, `round(n * ratio)`.
    pub output_len: usize,
    /// Frame size `N`.
    pub frame_size: usize,
    /// Analysis hop.
    pub hop_analysis: usize,
    /// Synthesis hop, `hop_analysis * (output_len - N) / (n - N)` (floor).
    pub hop_synthesis: usize,
    /// Frames on both sides of the pipeline.
    pub frame_count: usize,
}

impl StretchPlan {
    /// Maps `(n, N, hop, ratio)` to the output length and synthesis hop.
    ///
    /// # Errors
    /// - [`StretchError::InvalidParameter`] for a non-positive or non-finite
    ///   ratio, or a zero frame size or hop.
    /// - [`StretchError::OutOfRange`] if `N > n`, or if the synthesis hop
    ///   would exceed `N` and leave gaps between output frames.
    /// - [`StretchError::DegenerateParameter`] if `N == n` (the hop mapping
    ///   divides by `n - N`), or if the ratio is so small that the synthesis
    ///   hop rounds down to zero.
    pub fn new(
        input_len: usize,
        frame_size: usize,
        hop_analysis: usize,
        stretch_ratio: f64,
    ) -> Result<Self, StretchError> {
        if !stretch_ratio.is_finite() || stretch_ratio <= 0.0 {
            return Err(StretchError::invalid(Parameter::StretchRatio, stretch_ratio));
        }
        if frame_size == 0 {
            return Err(StretchError::invalid(Parameter::FrameSize, 0.0));
        }
        if hop_analysis == 0 {
            return Err(StretchError::invalid(Parameter::HopSize, 0.0));
        }
        if frame_size > input_len {
            return Err(StretchError::OutOfRange {
                parameter: Parameter::FrameSize,
                value: frame_size,
                limit: input_len,
            });
        }
        if frame_size == input_len {
            return Err(StretchError::DegenerateParameter {
                parameter: Parameter::FrameSize,
                reason: format!("frame size {frame_size} equals the input length"),
            });
        }

        // Saturates for absurd ratios; the hop check below rejects those
        let output_len = (input_len as f64 * stretch_ratio).round() as usize;
        let hop_synthesis = if output_len > frame_size {
            let hop = hop_analysis as u128 * (output_len - frame_size) as u128
                / (input_len - frame_size) as u128;
            usize::try_from(hop).unwrap_or(usize::MAX)
        } else {
            0
        };
        if hop_synthesis == 0 {
            return Err(StretchError::DegenerateParameter {
                parameter: Parameter::StretchRatio,
                reason: format!(
                    "ratio {stretch_ratio} maps {input_len} samples to {output_len}, \
                     leaving no room to advance {frame_size}-sample frames"
                ),
            });
        }
        if hop_synthesis > frame_size {
            return Err(StretchError::OutOfRange {
                parameter: Parameter::SynthesisHop,
                value: hop_synthesis,
                limit: frame_size,
            });
        }

        Ok(Self {
            input_len,
            output_len,
            frame_size,
            hop_analysis,
            hop_synthesis,
            frame_count: frame_count(input_len, frame_size, hop_analysis),
        })
    }

    /// Ratio actually realised between the hops.
    #[inline]
    pub fn hop_ratio(&self) -> f64 {
        self.hop_synthesis as f64 / self.hop_analysis as f64
    }
}
