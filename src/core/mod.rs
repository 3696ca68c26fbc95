//! Core types, window function and FFT plumbing.

pub mod fft;
pub mod types;
pub mod window;

pub use fft::FftPair;
pub use types::*;
pub use window::{apply_window, apply_window_copy, hann_window};
