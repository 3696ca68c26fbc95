//! Inverse transform and overlap-add at the synthesis hop.

use rustfft::num_complex::Complex;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::core::fft::{FftPair, COMPLEX_ZERO};
use crate::core::types::OverlapGain;
use crate::core::window::apply_window;
use crate::stretch::params::StretchPlan;
use crate::stretch::spectrum::SpectralMatrix;

/// Frames inverse-transformed per batch before they are accumulated.
const SYNTHESIS_BATCH: usize = 64;

/// Resynthesizes `matrix` into a buffer of `plan.output_len` samples.
///
/// Each frame is mirrored to a full conjugate-symmetric spectrum, inverse
/// transformed (scaled by `1/N`), windowed with the analysis window, scaled
/// by `gain` and added into the output at `i * plan.hop_synthesis`. The sum
/// is not divided by the window envelope.
pub fn synthesize(
    matrix: &SpectralMatrix,
    window: &[f64],
    plan: &StretchPlan,
    gain: OverlapGain,
    fft: &FftPair,
) -> Vec<f32> {
    debug_assert_eq!(matrix.frames(), plan.frame_count);
    debug_assert_eq!(window.len(), fft.size());
    tracing::debug!(
        frames = matrix.frames(),
        hop = plan.hop_synthesis,
        output_len = plan.output_len,
        ?gain,
        "overlap-add"
    );

    let scale = gain.factor() / fft.size() as f64;
    let grain = |frame: usize| {
        let mut samples = inverse_frame(matrix, frame, fft);
        apply_window(&mut samples, window);
        samples.iter_mut().for_each(|s| *s *= scale);
        samples
    };

    let mut output = vec![0.0f64; plan.output_len];
    let frames = matrix.frames();
    for batch_start in (0..frames).step_by(SYNTHESIS_BATCH) {
        let batch = batch_start..(batch_start + SYNTHESIS_BATCH).min(frames);

        #[cfg(feature = "parallel")]
        let grains: Vec<Vec<f64>> = batch.clone().into_par_iter().map(grain).collect();
        #[cfg(not(feature = "parallel"))]
        let grains: Vec<Vec<f64>> = batch.clone().map(grain).collect();

        // Neighbouring grains overlap, so accumulation stays on this thread
        for (frame, samples) in batch.zip(&grains) {
            overlap_add(&mut output, frame * plan.hop_synthesis, samples);
        }
    }

    output.into_iter().map(|s| s as f32).collect()
}

/// Real part of the inverse DFT of frame `frame`, scaled by `1/N` later.
fn inverse_frame(matrix: &SpectralMatrix, frame: usize, fft: &FftPair) -> Vec<f64> {
    let size = fft.size();
    let mut buffer = vec![COMPLEX_ZERO; size];
    matrix.copy_frame_into(frame, &mut buffer);
    mirror_half_spectrum(&mut buffer, matrix.bins());
    fft.inverse(&mut buffer);
    buffer.into_iter().map(|c| c.re).collect()
}

/// Fills bins `bins..N` with the conjugates of their positive-frequency
/// partners so the inverse transform is real. The imaginary parts of DC and
/// (for even `N`) Nyquist are dropped.
fn mirror_half_spectrum(buffer: &mut [Complex<f64>], bins: usize) {
    let size = buffer.len();
    if size == 0 {
        return;
    }
    buffer[0].im = 0.0;
    if size % 2 == 0 {
        buffer[size / 2].im = 0.0;
    }
    for k in bins..size {
        buffer[k] = buffer[size - k].conj();
    }
}

#[inline]
fn overlap_add(output: &mut [f64], offset: usize, grain: &[f64]) {
    let end = (offset + grain.len()).min(output.len());
    if offset >= end {
        return;
    }
    for (out, &s) in output[offset..end].iter_mut().zip(grain) {
        *out += s;
    }
}
