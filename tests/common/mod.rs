#![allow(dead_code)]

use std::f32::consts::PI;

use rustfft::{num_complex::Complex, FftPlanner};

pub fn sine(freq_hz: f32, sr: u32, n: usize) -> Vec<f32> {
    (0..n)
        .map(|i| (2.0 * PI * freq_hz * i as f32 / sr as f32).sin())
        .collect()
}

/// Sine whose frequency is exactly the centre of `bin` for a `frame_size` FFT.
pub fn bin_centred_sine(bin: usize, frame_size: usize, n: usize) -> Vec<f32> {
    (0..n)
        .map(|i| {
            let phase = 2.0 * std::f64::consts::PI * bin as f64 * i as f64 / frame_size as f64;
            phase.sin() as f32
        })
        .collect()
}

/// Deterministic pseudo-noise in [-0.5, 0.5).
pub fn noise(n: usize, seed: u32) -> Vec<f32> {
    let mut state = seed.wrapping_mul(747_796_405).wrapping_add(2_891_336_453);
    (0..n)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 8) as f32 / (1u32 << 24) as f32 - 0.5
        })
        .collect()
}

pub fn rms(signal: &[f32]) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = signal.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_sq / signal.len() as f64).sqrt()
}

/// Frequency of the largest Hann-windowed FFT peak of `signal`.
pub fn dominant_frequency(signal: &[f32], sr: u32) -> f64 {
    let n = signal.len();
    let mut buffer: Vec<Complex<f64>> = signal
        .iter()
        .enumerate()
        .map(|(i, &s)| {
            let w = 0.5 * (1.0 - (2.0 * std::f64::consts::PI * i as f64 / n as f64).cos());
            Complex::new(s as f64 * w, 0.0)
        })
        .collect();
    FftPlanner::new().plan_fft_forward(n).process(&mut buffer);
    let peak = (1..n / 2)
        .max_by(|&a, &b| buffer[a].norm().total_cmp(&buffer[b].norm()))
        .unwrap_or(0);
    peak as f64 * sr as f64 / n as f64
}
