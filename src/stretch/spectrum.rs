//! Half-spectrum frame matrix shared by analysis, phase processing and
//! synthesis.

use rustfft::num_complex::Complex;

use crate::core::fft::COMPLEX_ZERO;

/// Complex STFT values, `bins x frames`, bins `0..=N/2` only.
///
/// Storage is bin-major: the track of one bin across all frames is a
/// contiguous row, which is the unit the phase processor works on.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralMatrix {
    bins: usize,
    frames: usize,
    data: Vec<Complex<f64>>,
}

impl SpectralMatrix {
    /// Creates a zero-filled matrix.
    pub fn zeros(bins: usize, frames: usize) -> Self {
        Self {
            bins,
            frames,
            data: vec![COMPLEX_ZERO; bins * frames],
        }
    }

    /// Number of frequency bins (`N/2 + 1`).
    #[inline]
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Number of frames.
    #[inline]
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Value of bin `bin` in frame `frame`.
    #[inline]
    pub fn get(&self, bin: usize, frame: usize) -> Complex<f64> {
        self.data[bin * self.frames + frame]
    }

    #[inline]
    pub fn set(&mut self, bin: usize, frame: usize, value: Complex<f64>) {
        self.data[bin * self.frames + frame] = value;
    }

    #[inline]
    pub fn magnitude(&self, bin: usize, frame: usize) -> f64 {
        self.get(bin, frame).norm()
    }

    #[inline]
    pub fn phase(&self, bin: usize, frame: usize) -> f64 {
        self.get(bin, frame).arg()
    }

    /// One bin's values across all frames.
    #[inline]
    pub fn row(&self, bin: usize) -> &[Complex<f64>] {
        &self.data[bin * self.frames..(bin + 1) * self.frames]
    }

    #[inline]
    pub fn row_mut(&mut self, bin: usize) -> &mut [Complex<f64>] {
        &mut self.data[bin * self.frames..(bin + 1) * self.frames]
    }

    /// Mutable rows in bin order, disjoint so they can be handed to workers.
    pub fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, Complex<f64>> {
        self.data.chunks_exact_mut(self.frames.max(1))
    }

    /// Parallel counterpart of [`rows_mut`](Self::rows_mut).
    #[cfg(feature = "parallel")]
    pub fn par_rows_mut(&mut self) -> rayon::slice::ChunksExactMut<'_, Complex<f64>> {
        use rayon::prelude::*;
        self.data.par_chunks_exact_mut(self.frames.max(1))
    }

    /// Copies frame `frame` (one column) into `out[..bins]`.
    pub fn copy_frame_into(&self, frame: usize, out: &mut [Complex<f64>]) {
        for (bin, slot) in out.iter_mut().take(self.bins).enumerate() {
            *slot = self.get(bin, frame);
        }
    }

    /// Builds a matrix from per-frame half spectra, each `bins` long.
    pub(crate) fn from_frames(bins: usize, columns: &[Vec<Complex<f64>>]) -> Self {
        let frames = columns.len();
        let mut matrix = Self::zeros(bins, frames);
        for (frame, column) in columns.iter().enumerate() {
            for (bin, &value) in column.iter().take(bins).enumerate() {
                matrix.set(bin, frame, value);
            }
        }
        matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_major_layout() {
        let mut m = SpectralMatrix::zeros(3, 4);
        m.set(1, 2, Complex::new(1.0, -1.0));
        assert_eq!(m.row(1)[2], Complex::new(1.0, -1.0));
        assert_eq!(m.get(1, 2), Complex::new(1.0, -1.0));
        assert_eq!(m.rows_mut().count(), 3);
    }

    #[test]
    fn test_from_frames_transposes() {
        let columns = vec![
            vec![Complex::new(0.0, 0.0), Complex::new(1.0, 0.0)],
            vec![Complex::new(2.0, 0.0), Complex::new(3.0, 0.0)],
            vec![Complex::new(4.0, 0.0), Complex::new(5.0, 0.0)],
        ];
        let m = SpectralMatrix::from_frames(2, &columns);
        assert_eq!(m.bins(), 2);
        assert_eq!(m.frames(), 3);
        assert_eq!(m.row(1), &[
            Complex::new(1.0, 0.0),
            Complex::new(3.0, 0.0),
            Complex::new(5.0, 0.0)
        ]);

        let mut frame = vec![COMPLEX_ZERO; 4];
        m.copy_frame_into(2, &mut frame);
        assert_eq!(frame[0], Complex::new(4.0, 0.0));
        assert_eq!(frame[1], Complex::new(5.0, 0.0));
        assert_eq!(frame[2], COMPLEX_ZERO);
    }

    #[test]
    fn test_polar_accessors() {
        let mut m = SpectralMatrix::zeros(1, 1);
        m.set(0, 0, Complex::new(0.0, 2.0));
        assert!((m.magnitude(0, 0) - 2.0).abs() < 1e-15);
        assert!((m.phase(0, 0) - std::f64::consts::FRAC_PI_2).abs() < 1e-15);
    }
}
