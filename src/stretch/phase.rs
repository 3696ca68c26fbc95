//! Phase re-estimation: true-frequency recovery and synthesis phase
//! integration.
//!
//! For each bin the analysis phase advance between consecutive frames is
//! compared against the advance the bin's centre frequency would produce
//! over one analysis hop. The wrapped residual gives the bin's true
//! instantaneous frequency, which is then integrated over the synthesis hop.
//! Magnitudes are never modified.

use std::f64::consts::PI;

use rustfft::num_complex::Complex;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::stretch::params::StretchPlan;
use crate::stretch::spectrum::SpectralMatrix;

const TWO_PI: f64 = 2.0 * PI;

/// Wraps a phase value to `[-PI, PI)` as `(x + PI) mod 2*PI - PI`.
///
/// `PI` maps to `-PI`; `-PI` stays `-PI`.
#[inline]
pub fn wrap_phase(phase: f64) -> f64 {
    let mut p = (phase + PI).rem_euclid(TWO_PI);
    // rem_euclid rounds tiny negative inputs up to exactly 2*PI
    if p >= TWO_PI {
        p = 0.0;
    }
    p - PI
}

/// True angular frequency (rad/s) of a bin from two consecutive analysis
/// phases taken `dt_analysis` seconds apart.
#[inline]
pub fn true_frequency(prev_phase: f64, phase: f64, bin_frequency: f64, dt_analysis: f64) -> f64 {
    let residual = wrap_phase(phase - prev_phase - bin_frequency * dt_analysis);
    bin_frequency + residual / dt_analysis
}

/// Rewrites spectral phases for resynthesis at the synthesis hop.
#[derive(Debug, Clone)]
pub struct PhaseProcessor {
    /// Centre angular frequency per bin, `2*pi*k*sr/N`.
    bin_frequencies: Vec<f64>,
    dt_analysis: f64,
    dt_synthesis: f64,
}

impl PhaseProcessor {
    pub fn new(sample_rate: u32, plan: &StretchPlan) -> Self {
        let sr = sample_rate as f64;
        let n = plan.frame_size as f64;
        let bin_frequencies = (0..plan.frame_size / 2 + 1)
            .map(|k| TWO_PI * k as f64 * sr / n)
            .collect();
        Self {
            bin_frequencies,
            dt_analysis: plan.hop_analysis as f64 / sr,
            dt_synthesis: plan.hop_synthesis as f64 / sr,
        }
    }

    /// Centre angular frequency of `bin` in rad/s.
    #[inline]
    pub fn bin_frequency(&self, bin: usize) -> f64 {
        self.bin_frequencies[bin]
    }

    /// Seconds between analysis frames.
    #[inline]
    pub fn dt_analysis(&self) -> f64 {
        self.dt_analysis
    }

    /// Seconds between synthesis frames.
    #[inline]
    pub fn dt_synthesis(&self) -> f64 {
        self.dt_synthesis
    }

    /// True angular frequency of `bin` at frames `1..len`, one value per
    /// consecutive frame pair of `row`.
    pub fn true_frequencies<'a>(
        &self,
        bin: usize,
        row: &'a [Complex<f64>],
    ) -> impl Iterator<Item = f64> + 'a {
        let omega = self.bin_frequencies[bin];
        let dt = self.dt_analysis;
        row.windows(2)
            .map(move |pair| true_frequency(pair[0].arg(), pair[1].arg(), omega, dt))
    }

    /// Synthesis phase track of `bin`: the analysis phase at frame 0, then
    /// `phi_s[i] = phi_s[i-1] + dt_s * true_frequency[i]`.
    pub fn synthesis_phases(&self, bin: usize, row: &[Complex<f64>]) -> Vec<f64> {
        let Some(first) = row.first() else {
            return Vec::new();
        };
        let initial = first.arg();
        let dt = self.dt_synthesis;
        std::iter::once(initial)
            .chain(self.true_frequencies(bin, row).scan(initial, move |phase, freq| {
                *phase += dt * freq;
                Some(*phase)
            }))
            .collect()
    }

    /// Replaces the phase of every value in one bin's row. Frame 0 keeps its
    /// analysis phase and is left as is.
    fn process_row(&self, bin: usize, row: &mut [Complex<f64>]) {
        let phases = self.synthesis_phases(bin, row);
        for (value, &phase) in row.iter_mut().zip(&phases).skip(1) {
            *value = Complex::from_polar(value.norm(), phase);
        }
    }

    /// Applies the phase update to every bin of `matrix`.
    ///
    /// Frames within a bin are processed strictly in order; separate bins are
    /// independent and run on the rayon pool when the `parallel` feature is on.
    pub fn process(&self, matrix: &mut SpectralMatrix) {
        if matrix.frames() < 2 {
            return;
        }
        debug_assert_eq!(matrix.bins(), self.bin_frequencies.len());
        tracing::debug!(
            bins = matrix.bins(),
            frames = matrix.frames(),
            dt_analysis = self.dt_analysis,
            dt_synthesis = self.dt_synthesis,
            "integrating synthesis phases"
        );

        #[cfg(feature = "parallel")]
        matrix
            .par_rows_mut()
            .enumerate()
            .for_each(|(bin, row)| self.process_row(bin, row));

        #[cfg(not(feature = "parallel"))]
        for (bin, row) in matrix.rows_mut().enumerate() {
            self.process_row(bin, row);
        }
    }
}
