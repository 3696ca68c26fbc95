//! Whole-pipeline properties: exact output length, identity reconstruction,
//! magnitude preservation, phase coherence on a pure tone and determinism.

mod common;

use approx::assert_relative_eq;
use pvstretch::{Parameter, PhaseVocoder, StretchError, StretchParams, StretchPlan};

fn vocoder(ratio: f64, frame_size: usize, hop: usize) -> PhaseVocoder {
    PhaseVocoder::new(
        &StretchParams::new(ratio)
            .with_frame_size(frame_size)
            .with_hop_size(hop),
    )
    .unwrap()
}

// ===== Output length =====

#[test]
fn test_output_length_is_rounded_product() {
    let input = common::noise(10_000, 7);
    for (frame_size, hop) in [(256, 64), (512, 128), (1024, 256)] {
        for ratio in [0.5, 0.73, 1.0, 1.37, 2.0, 3.1] {
            let output = vocoder(ratio, frame_size, hop).process(&input).unwrap();
            let expected = (input.len() as f64 * ratio).round() as usize;
            assert_eq!(
                output.len(),
                expected,
                "N={frame_size} hop={hop} ratio={ratio}"
            );
        }
    }
}

#[test]
fn test_plan_frames_cover_output() {
    for (n, frame_size, hop, ratio) in [
        (44_100, 2048, 512, 2.0),
        (10_000, 1024, 256, 0.6),
        (7_777, 512, 100, 1.9),
    ] {
        let plan = StretchPlan::new(n, frame_size, hop, ratio).unwrap();
        let last_end = (plan.frame_count - 1) * plan.hop_synthesis + frame_size;
        assert!(last_end <= plan.output_len, "{plan:?}");
        assert!(plan.hop_synthesis <= frame_size, "{plan:?}");
    }
}

// ===== Identity =====

#[test]
fn test_unit_ratio_reconstructs_scaled_input() {
    // Hann^2 at 75% overlap sums to 1.5 wherever four frames overlap
    let frame_size = 256;
    let hop = 64;
    let input = common::noise(4096, 3);
    let output = vocoder(1.0, frame_size, hop).process(&input).unwrap();
    assert_eq!(output.len(), input.len());
    for i in frame_size..input.len() - frame_size {
        assert!(
            (output[i] - 1.5 * input[i]).abs() < 1e-4,
            "sample {i}: {} vs {}",
            output[i],
            1.5 * input[i]
        );
    }
}

// ===== Phase processing =====

#[test]
fn test_phase_processing_preserves_magnitudes() {
    let pv = vocoder(1.63, 512, 128);
    let input = common::noise(8000, 11);
    let plan = pv.plan(input.len()).unwrap();
    let original = pv.analyze(&input).unwrap();
    let mut processed = original.clone();
    pv.phase_processor(&plan).process(&mut processed);

    for bin in 0..original.bins() {
        assert_eq!(processed.get(bin, 0), original.get(bin, 0));
        for frame in 1..original.frames() {
            let before = original.magnitude(bin, frame);
            let after = processed.magnitude(bin, frame);
            assert_relative_eq!(after, before, max_relative = 1e-12, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_bin_centred_tone_reports_bin_frequency() {
    let sample_rate = 44_100;
    let frame_size = 2048;
    let bin = 20;
    let pv = PhaseVocoder::new(
        &StretchParams::new(1.5)
            .with_sample_rate(sample_rate)
            .with_frame_size(frame_size)
            .with_hop_size(512),
    )
    .unwrap();
    let input = common::bin_centred_sine(bin, frame_size, 20_000);
    let plan = pv.plan(input.len()).unwrap();
    let spectrum = pv.analyze(&input).unwrap();
    let processor = pv.phase_processor(&plan);
    let omega = processor.bin_frequency(bin);

    // Leakage into the neighbours carries the same tone frequency
    for b in [bin - 1, bin, bin + 1] {
        for freq in processor.true_frequencies(b, spectrum.row(b)) {
            assert_relative_eq!(freq, omega, max_relative = 1e-6);
        }
    }

    // The synthesis phase advances by dt_s * omega per frame
    let phases = processor.synthesis_phases(bin, spectrum.row(bin));
    let step = processor.dt_synthesis() * omega;
    for pair in phases.windows(2) {
        assert_relative_eq!(pair[1] - pair[0], step, max_relative = 1e-6);
    }
}

#[test]
fn test_processing_is_deterministic() {
    let pv = vocoder(2.3, 1024, 256);
    let input = common::noise(20_000, 42);
    let plan = pv.plan(input.len()).unwrap();

    let mut first = pv.analyze(&input).unwrap();
    let mut second = first.clone();
    pv.phase_processor(&plan).process(&mut first);
    pv.phase_processor(&plan).process(&mut second);
    assert_eq!(first, second);

    let a = pv.process(&input).unwrap();
    let b = pv.process(&input).unwrap();
    assert_eq!(a, b);
}

// ===== Rejection =====

#[test]
fn test_frame_size_equal_to_input_is_degenerate() {
    let err = vocoder(1.5, 1024, 256).process(&vec![0.1; 1024]).unwrap_err();
    assert!(matches!(
        err,
        StretchError::DegenerateParameter {
            parameter: Parameter::FrameSize,
            ..
        }
    ));
}
