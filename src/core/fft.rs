//! FFT plans and constants shared by analysis and synthesis.

use std::fmt;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Zero-valued complex number, used for FFT buffer initialization.
pub const COMPLEX_ZERO: Complex<f64> = Complex::new(0.0, 0.0);

/// Forward and inverse transforms for one frame size.
///
/// Planned once per pipeline run. The plans are `Send + Sync`, so frames may
/// be transformed from several threads against the same pair.
#[derive(Clone)]
pub struct FftPair {
    size: usize,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
}

impl FftPair {
    /// Plans both directions for `size`-point transforms.
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            size,
            forward: planner.plan_fft_forward(size),
            inverse: planner.plan_fft_inverse(size),
        }
    }

    /// Transform length.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of non-negative frequency bins, `size / 2 + 1`.
    #[inline]
    pub fn num_bins(&self) -> usize {
        self.size / 2 + 1
    }

    /// Unnormalized forward DFT in place.
    #[inline]
    pub fn forward(&self, buffer: &mut [Complex<f64>]) {
        self.forward.process(buffer);
    }

    /// Unnormalized inverse DFT in place; callers scale by `1 / size`.
    #[inline]
    pub fn inverse(&self, buffer: &mut [Complex<f64>]) {
        self.inverse.process(buffer);
    }
}

impl fmt::Debug for FftPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FftPair").field("size", &self.size).finish()
    }
}
