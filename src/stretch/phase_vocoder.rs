//! Phase vocoder time stretching of one channel.

use crate::core::fft::FftPair;
use crate::core::types::{OverlapGain, StretchParams};
use crate::core::window::hann_window;
use crate::error::StretchError;
use crate::stretch::analysis::analyze;
use crate::stretch::params::StretchPlan;
use crate::stretch::phase::PhaseProcessor;
use crate::stretch::spectrum::SpectralMatrix;
use crate::stretch::synthesis::synthesize;

/// Window, FFT plans and settings for stretching mono signals.
///
/// One instance can process any number of signals; it keeps no state between
/// calls.
#[derive(Debug, Clone)]
pub struct PhaseVocoder {
    stretch_ratio: f64,
    sample_rate: u32,
    hop_analysis: usize,
    gain: OverlapGain,
    window: Vec<f64>,
    fft: FftPair,
}

impl PhaseVocoder {
    /// Creates a vocoder from validated parameters. `params.channels` is
    /// ignored; every call processes one channel.
    ///
    /// # Errors
    /// Any error from [`StretchParams::validate`].
    pub fn new(params: &StretchParams) -> Result<Self, StretchError> {
        params.validate()?;
        Ok(Self {
            stretch_ratio: params.stretch_ratio,
            sample_rate: params.sample_rate,
            hop_analysis: params.hop_size,
            gain: params.gain,
            window: hann_window(params.frame_size)?,
            fft: FftPair::new(params.frame_size),
        })
    }

    /// Returns the frame size.
    #[inline]
    pub fn frame_size(&self) -> usize {
        self.fft.size()
    }

    /// Returns the analysis hop size.
    #[inline]
    pub fn hop_analysis(&self) -> usize {
        self.hop_analysis
    }

    #[inline]
    pub fn stretch_ratio(&self) -> f64 {
        self.stretch_ratio
    }

    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// The analysis/synthesis window.
    #[inline]
    pub fn window(&self) -> &[f64] {
        &self.window
    }

    /// Output geometry for an input of `input_len` samples.
    pub fn plan(&self, input_len: usize) -> Result<StretchPlan, StretchError> {
        StretchPlan::new(
            input_len,
            self.frame_size(),
            self.hop_analysis,
            self.stretch_ratio,
        )
    }

    /// STFT of `input` with this vocoder's window and hop.
    pub fn analyze(&self, input: &[f32]) -> Result<SpectralMatrix, StretchError> {
        analyze(input, &self.window, self.hop_analysis, &self.fft)
    }

    /// Phase processor matching `plan` at this vocoder's sample rate.
    pub fn phase_processor(&self, plan: &StretchPlan) -> PhaseProcessor {
        PhaseProcessor::new(self.sample_rate, plan)
    }

    /// Stretches a mono signal. The output is exactly
    /// `round(input.len() * ratio)` samples long.
    ///
    /// # Errors
    /// [`StretchError::NonFiniteInput`] for NaN/Inf samples, otherwise any
    /// error from [`StretchPlan::new`]. Nothing is allocated for the
    /// transform before all checks pass.
    pub fn process(&self, input: &[f32]) -> Result<Vec<f32>, StretchError> {
        let plan = self.plan(input.len())?;
        if input.iter().any(|s| !s.is_finite()) {
            return Err(StretchError::NonFiniteInput);
        }
        tracing::debug!(
            input_len = plan.input_len,
            output_len = plan.output_len,
            frame_size = plan.frame_size,
            hop_analysis = plan.hop_analysis,
            hop_synthesis = plan.hop_synthesis,
            hop_ratio = plan.hop_ratio(),
            frames = plan.frame_count,
            "phase vocoder plan"
        );

        let mut spectrum = self.analyze(input)?;
        self.phase_processor(&plan).process(&mut spectrum);
        Ok(synthesize(
            &spectrum,
            &self.window,
            &plan,
            self.gain,
            &self.fft,
        ))
    }
}
