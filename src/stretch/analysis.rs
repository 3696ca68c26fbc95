//! Short-time Fourier analysis: windowed frames at a fixed hop, half spectra.

use rustfft::num_complex::Complex;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::core::fft::FftPair;
use crate::core::window::apply_window_copy;
use crate::error::{Parameter, StretchError};
use crate::stretch::spectrum::SpectralMatrix;

/// Number of whole frames of length `frame_size` that fit in `len` samples
/// at `hop`: `(len - frame_size) / hop + 1`. Zero if nothing fits.
#[inline]
pub fn frame_count(len: usize, frame_size: usize, hop: usize) -> usize {
    if hop == 0 || frame_size > len {
        return 0;
    }
    (len - frame_size) / hop + 1
}

/// Slices `signal` into windowed frames at `hop` and transforms each one.
///
/// No frame reads past the end of the signal; trailing samples that do not
/// fill a whole frame are not analysed.
///
/// # Errors
/// [`StretchError::InvalidParameter`] if `hop` is zero,
/// [`StretchError::OutOfRange`] if the frame is longer than the signal.
pub fn analyze(
    signal: &[f32],
    window: &[f64],
    hop: usize,
    fft: &FftPair,
) -> Result<SpectralMatrix, StretchError> {
    let frame_size = fft.size();
    debug_assert_eq!(window.len(), frame_size);
    if hop == 0 {
        return Err(StretchError::invalid(Parameter::HopSize, 0.0));
    }
    if frame_size > signal.len() {
        return Err(StretchError::OutOfRange {
            parameter: Parameter::FrameSize,
            value: frame_size,
            limit: signal.len(),
        });
    }

    let frames = frame_count(signal.len(), frame_size, hop);
    let bins = fft.num_bins();
    tracing::debug!(frames, bins, hop, "analysing");

    let transform = |frame: usize| {
        let start = frame * hop;
        half_spectrum(&signal[start..start + frame_size], window, fft)
    };

    #[cfg(feature = "parallel")]
    let columns: Vec<Vec<Complex<f64>>> = (0..frames).into_par_iter().map(transform).collect();
    #[cfg(not(feature = "parallel"))]
    let columns: Vec<Vec<Complex<f64>>> = (0..frames).map(transform).collect();

    Ok(SpectralMatrix::from_frames(bins, &columns))
}

/// Windows one frame, runs the forward FFT and keeps bins `0..=N/2`.
fn half_spectrum(frame: &[f32], window: &[f64], fft: &FftPair) -> Vec<Complex<f64>> {
    let mut buffer: Vec<Complex<f64>> = apply_window_copy(frame, window)
        .into_iter()
        .map(|s| Complex::new(s, 0.0))
        .collect();
    fft.forward(&mut buffer);
    buffer.truncate(fft.num_bins());
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::window::hann_window;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_frame_count_formula() {
        assert_eq!(frame_count(44100, 2048, 512), (44100 - 2048) / 512 + 1);
        assert_eq!(frame_count(2048, 2048, 512), 1);
        assert_eq!(frame_count(2559, 2048, 512), 1);
        assert_eq!(frame_count(2560, 2048, 512), 2);
        assert_eq!(frame_count(100, 2048, 512), 0);
    }

    #[test]
    fn test_analyze_dimensions() {
        let n = 64;
        let fft = FftPair::new(n);
        let window = hann_window(n).unwrap();
        let signal = vec![0.25f32; 300];
        let m = analyze(&signal, &window, 16, &fft).unwrap();
        assert_eq!(m.bins(), 33);
        assert_eq!(m.frames(), (300 - 64) / 16 + 1);
    }

    #[test]
    fn test_dc_signal_energy_in_bin_zero() {
        let n = 32;
        let fft = FftPair::new(n);
        let window = hann_window(n).unwrap();
        let signal = vec![1.0f32; 96];
        let m = analyze(&signal, &window, 8, &fft).unwrap();
        // Sum of the periodic Hann is N/2
        for frame in 0..m.frames() {
            assert_abs_diff_eq!(m.get(0, frame).re, n as f64 / 2.0, epsilon = 1e-9);
            assert_abs_diff_eq!(m.magnitude(5, frame), 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_bin_centred_tone_peaks_at_its_bin() {
        let n = 256;
        let bin = 10;
        let fft = FftPair::new(n);
        let window = hann_window(n).unwrap();
        let signal: Vec<f32> = (0..1024)
            .map(|i| (2.0 * PI * bin as f64 * i as f64 / n as f64).cos() as f32)
            .collect();
        let m = analyze(&signal, &window, 64, &fft).unwrap();
        let peak = (0..m.bins())
            .max_by(|&a, &b| m.magnitude(a, 0).total_cmp(&m.magnitude(b, 0)))
            .unwrap();
        assert_eq!(peak, bin);
    }

    #[test]
    fn test_rejects_frame_longer_than_signal() {
        let fft = FftPair::new(64);
        let window = hann_window(64).unwrap();
        let err = analyze(&[0.0; 63], &window, 16, &fft).unwrap_err();
        assert!(matches!(
            err,
            StretchError::OutOfRange {
                parameter: Parameter::FrameSize,
                value: 64,
                limit: 63
            }
        ));
    }

    #[test]
    fn test_rejects_zero_hop() {
        let fft = FftPair::new(8);
        let window = hann_window(8).unwrap();
        let err = analyze(&[0.0; 32], &window, 0, &fft).unwrap_err();
        assert_eq!(err.parameter(), Some(Parameter::HopSize));
    }
}
