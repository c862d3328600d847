//! Property tests for planned transforms.
//!
//! Convention: test_{module}_{function}_{scenario}
//!
//! Reproduce: `PROPTEST_SEED=<seed> cargo test --test property_tests`

use anyfft::num_complex::Complex;
use anyfft::{Fft, FftDirection, FftPlanner};
use proptest::prelude::*;

fn signal_strategy(max_len: usize) -> impl Strategy<Value = Vec<Complex<f64>>> {
    prop::collection::vec((-1.0f64..1.0, -1.0f64..1.0), 1..max_len)
        .prop_map(|pairs| pairs.into_iter().map(|(re, im)| Complex::new(re, im)).collect())
}

fn forward(planner: &FftPlanner<f64>, signal: &[Complex<f64>]) -> Vec<Complex<f64>> {
    let fft = planner
        .plan_fft_forward(signal.len())
        .expect("planning never fails for small lengths");
    let mut buffer = signal.to_vec();
    fft.process(&mut buffer).expect("buffer matches the planned length");
    buffer
}

fn max_abs_diff(a: &[Complex<f64>], b: &[Complex<f64>]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).norm()).fold(0.0, f64::max)
}

// ═══════════════════════════════════════════════════════════════
// Property 1: inverse(forward(x)) / N recovers x
// ═══════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_plan_fft_roundtrip_recovers_signal(signal in signal_strategy(300)) {
        let planner = FftPlanner::new();
        let len = signal.len();
        let mut buffer = forward(&planner, &signal);

        let inverse = planner.plan_fft(len, FftDirection::Inverse).unwrap();
        inverse.process(&mut buffer).unwrap();
        let recovered: Vec<_> = buffer.iter().map(|c| c / len as f64).collect();

        let error = max_abs_diff(&signal, &recovered);
        prop_assert!(error < 1e-10, "len = {len}, error = {error}");
    }
}

// ═══════════════════════════════════════════════════════════════
// Property 2: fft(a*x + y) == a*fft(x) + fft(y)
// ═══════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_plan_fft_linearity(
        len in 1usize..200,
        seed_re in -2.0f64..2.0,
        seed_im in -2.0f64..2.0,
        scale_re in -3.0f64..3.0,
        scale_im in -3.0f64..3.0,
    ) {
        let planner = FftPlanner::new();
        let scale = Complex::new(scale_re, scale_im);
        let x: Vec<_> = (0..len)
            .map(|i| Complex::new((i as f64 * seed_re).sin(), (i as f64 * seed_im).cos()))
            .collect();
        let y: Vec<_> = (0..len)
            .map(|i| Complex::new((i as f64 + seed_im).cos(), (i as f64 - seed_re).sin()))
            .collect();
        let combined: Vec<_> = x.iter().zip(&y).map(|(a, b)| scale * a + b).collect();

        let fx = forward(&planner, &x);
        let fy = forward(&planner, &y);
        let expected: Vec<_> = fx.iter().zip(&fy).map(|(a, b)| scale * a + b).collect();
        let actual = forward(&planner, &combined);

        let bound = 1e-9 * (len as f64) * (1.0 + scale.norm());
        let error = max_abs_diff(&expected, &actual);
        prop_assert!(error < bound, "len = {len}, error = {error}");
    }
}

// ═══════════════════════════════════════════════════════════════
// Property 3: Parseval, sum |X_k|^2 == N * sum |x_n|^2
// ═══════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_plan_fft_parseval_energy(signal in signal_strategy(300)) {
        let planner = FftPlanner::new();
        let len = signal.len() as f64;
        let spectrum = forward(&planner, &signal);

        let time_energy: f64 = signal.iter().map(|c| c.norm_sqr()).sum();
        let freq_energy: f64 = spectrum.iter().map(|c| c.norm_sqr()).sum();

        let relative = (freq_energy - len * time_energy).abs() / (len * time_energy).max(1e-300);
        prop_assert!(relative < 1e-10, "len = {len}, relative error = {relative}");
    }
}

// ═══════════════════════════════════════════════════════════════
// Property 4: processing N chunks at once equals N separate calls
// ═══════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn test_plan_fft_batch_matches_single(len in 1usize..150, chunks in 1usize..5) {
        let planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(len).unwrap();
        let batch: Vec<_> = (0..len * chunks)
            .map(|i| Complex::new((i as f64 * 0.37).sin(), (i as f64 * 0.11).cos()))
            .collect();

        let mut batched = batch.clone();
        fft.process(&mut batched).unwrap();

        for (chunk, result) in batch.chunks(len).zip(batched.chunks(len)) {
            let mut single = chunk.to_vec();
            fft.process(&mut single).unwrap();
            prop_assert_eq!(single.as_slice(), result);
        }
    }
}
