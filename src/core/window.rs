//! Analysis/synthesis window.
//!
//! The phase vocoder uses one window for both ends of the pipeline. It is the
//! periodic Hann variant: the cosine period is `N`, not `N - 1`, so the last
//! coefficient is not zero and the window tiles evenly at hops that divide `N`.

use std::f64::consts::PI;

use crate::error::{Parameter, StretchError};

/// Generates the periodic Hann window `w[n] = 0.5 * (1 - cos(2*pi*n / N))`.
///
/// # Errors
/// Returns [`StretchError::InvalidParameter`] if `size` is zero.
pub fn hann_window(size: usize) -> Result<Vec<f64>, StretchError> {
    if size == 0 {
        return Err(StretchError::invalid(Parameter::FrameSize, 0.0));
    }
    let n = size as f64;
    Ok((0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f64 / n).cos()))
        .collect())
}

/// Applies a window function to a slice in-place.
#[inline]
pub fn apply_window(data: &mut [f64], window: &[f64]) {
    for (sample, &w) in data.iter_mut().zip(window.iter()) {
        *sample *= w;
    }
}

/// Applies a window function and returns a new vector.
#[inline]
pub fn apply_window_copy(data: &[f32], window: &[f64]) -> Vec<f64> {
    data.iter()
        .zip(window.iter())
        .map(|(&d, &w)| d as f64 * w)
        .collect()
}
