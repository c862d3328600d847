use std::sync::Arc;

use num_complex::Complex;
use num_traits::{ToPrimitive, Zero};
use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::algorithm::butterflies::*;
use crate::algorithm::Dft;
use crate::{Direction, Fft, FftDirection, FftError, FftNum, Length};

/// The seed for the random number generator used to generate
/// random signals. It's defined here so that we have deterministic
/// tests
const RNG_SEED: [u8; 32] = [
    1, 9, 1, 0, 1, 1, 4, 3, 1, 4, 9, 8, 4, 1, 4, 8, 2, 8, 1, 2, 2, 2, 6, 1, 2, 3, 4, 5, 6, 7, 8, 9,
];

pub fn random_signal<T: FftNum>(length: usize) -> Vec<Complex<T>> {
    let mut rng = StdRng::from_seed(RNG_SEED);
    let distribution = Uniform::new(-1.0f64, 1.0);
    (0..length)
        .map(|_| Complex {
            re: T::from_f64_lossy(rng.sample(distribution)),
            im: T::from_f64_lossy(rng.sample(distribution)),
        })
        .collect()
}

fn to_f64<T: FftNum>(value: Complex<T>) -> Complex<f64> {
    Complex {
        re: value.re.to_f64().unwrap(),
        im: value.im.to_f64().unwrap(),
    }
}

/// Returns true if every element of `vec1` is within a relative tolerance of `vec2`.
/// The tolerance is scaled by the largest magnitude in `vec2`, and loosened for f32.
pub fn compare_vectors<T: FftNum>(vec1: &[Complex<T>], vec2: &[Complex<T>]) -> bool {
    assert_eq!(vec1.len(), vec2.len());
    let tolerance = if std::mem::size_of::<T>() < 8 { 1e-3 } else { 1e-9 };

    let scale = vec2
        .iter()
        .map(|&b| to_f64(b).norm())
        .fold(1.0f64, f64::max);
    // written so that a NaN anywhere fails the comparison
    vec1.iter()
        .zip(vec2.iter())
        .all(|(&a, &b)| (to_f64(a) - to_f64(b)).norm() <= tolerance * scale)
}

/// Computes the DFT of `input` directly from the definition, in f64
pub fn reference_dft<T: FftNum>(input: &[Complex<T>], direction: FftDirection) -> Vec<Complex<T>> {
    let len = input.len();
    let sign = match direction {
        FftDirection::Forward => -1.0,
        FftDirection::Inverse => 1.0,
    };

    (0..len)
        .map(|k| {
            let mut sum = Complex::<f64>::zero();
            for (n, &x) in input.iter().enumerate() {
                // reduce k * n before converting to an angle, so large products don't lose precision
                let index = (k * n) % len;
                let angle = sign * 2.0 * std::f64::consts::PI * index as f64 / len as f64;
                sum = sum + to_f64(x) * Complex::from_polar(1.0, angle);
            }
            Complex {
                re: T::from_f64_lossy(sum.re),
                im: T::from_f64_lossy(sum.im),
            }
        })
        .collect()
}

fn reference_batch<T: FftNum>(input: &[Complex<T>], len: usize, direction: FftDirection) -> Vec<Complex<T>> {
    input
        .chunks_exact(len)
        .flat_map(|chunk| reference_dft(chunk, direction))
        .collect()
}

fn poisoned_scratch<T: FftNum>(len: usize) -> Vec<Complex<T>> {
    vec![Complex::new(T::from_f64_lossy(f64::NAN), T::from_f64_lossy(f64::NAN)); len]
}

/// Checks every processing path of `fft` against the reference DFT on a multi-chunk buffer,
/// and checks that bad buffers are rejected without being modified.
pub fn check_fft_algorithm<T: FftNum>(fft: &dyn Fft<T>, len: usize, direction: FftDirection) {
    assert_eq!(fft.len(), len, "Algorithm reported incorrect size");
    assert_eq!(
        fft.fft_direction(),
        direction,
        "Algorithm reported incorrect FFT direction"
    );
    if len == 0 {
        return;
    }

    let n = 3;
    let input = random_signal::<T>(len * n);
    let expected = reference_batch(&input, len, direction);

    // test process()
    {
        let mut buffer = input.clone();
        fft.process(&mut buffer).unwrap();
        assert!(
            compare_vectors(&expected, &buffer),
            "process() failed, length = {}, direction = {}",
            len,
            direction
        );
    }

    // test process_with_scratch(), with a scratch buffer full of garbage
    {
        let mut buffer = input.clone();
        let mut scratch = poisoned_scratch(fft.get_inplace_scratch_len());
        fft.process_with_scratch(&mut buffer, &mut scratch).unwrap();
        assert!(
            compare_vectors(&expected, &buffer),
            "process_with_scratch() failed, length = {}, direction = {}",
            len,
            direction
        );

        // an oversized scratch buffer is fine too
        let mut buffer = input.clone();
        let mut scratch = poisoned_scratch(fft.get_inplace_scratch_len() + 7);
        fft.process_with_scratch(&mut buffer, &mut scratch).unwrap();
        assert!(
            compare_vectors(&expected, &buffer),
            "process_with_scratch() with extra scratch failed, length = {}, direction = {}",
            len,
            direction
        );
    }

    // test process_outofplace_with_scratch()
    {
        let mut input_copy = input.clone();
        let mut output = vec![Complex::zero(); len * n];
        let mut scratch = poisoned_scratch(fft.get_outofplace_scratch_len());
        fft.process_outofplace_with_scratch(&mut input_copy, &mut output, &mut scratch)
            .unwrap();
        assert!(
            compare_vectors(&expected, &output),
            "process_outofplace_with_scratch() failed, length = {}, direction = {}",
            len,
            direction
        );
    }

    // test process_immutable_with_scratch()
    {
        let mut output = vec![Complex::zero(); len * n];
        let mut scratch = poisoned_scratch(fft.get_immutable_scratch_len());
        fft.process_immutable_with_scratch(&input, &mut output, &mut scratch)
            .unwrap();
        assert!(
            compare_vectors(&expected, &output),
            "process_immutable_with_scratch() failed, length = {}, direction = {}",
            len,
            direction
        );
    }

    check_fft_errors(fft, &input);
}

// Each bad call must return the matching error and leave the buffers alone
fn check_fft_errors<T: FftNum>(fft: &dyn Fft<T>, input: &[Complex<T>]) {
    let len = fft.len();

    // a buffer that isn't a multiple of the FFT length
    if len > 1 {
        let mut buffer = input[..len + 1].to_vec();
        let mut scratch = vec![Complex::zero(); fft.get_inplace_scratch_len()];
        assert_eq!(
            fft.process_with_scratch(&mut buffer, &mut scratch),
            Err(FftError::BufferNotMultiple {
                fft_len: len,
                actual: len + 1
            })
        );
        assert_eq!(buffer, &input[..len + 1]);
    }

    // an empty buffer
    {
        let mut scratch = vec![Complex::zero(); fft.get_inplace_scratch_len()];
        assert_eq!(
            fft.process_with_scratch(&mut [], &mut scratch),
            Err(FftError::BufferNotMultiple {
                fft_len: len,
                actual: 0
            })
        );
    }

    // output buffer of the wrong size
    {
        let mut output = vec![Complex::zero(); len * 2];
        let mut scratch = vec![Complex::zero(); fft.get_immutable_scratch_len()];
        assert_eq!(
            fft.process_immutable_with_scratch(&input[..len], &mut output, &mut scratch),
            Err(FftError::OutputLengthMismatch {
                input: len,
                output: len * 2
            })
        );
        assert!(output.iter().all(|c| c.is_zero()));
    }

    // undersized scratch, for every variant that needs scratch at all
    let required = fft.get_inplace_scratch_len();
    if required > 0 {
        let mut buffer = input[..len].to_vec();
        let mut scratch = vec![Complex::zero(); required - 1];
        assert_eq!(
            fft.process_with_scratch(&mut buffer, &mut scratch),
            Err(FftError::ScratchTooSmall {
                expected: required,
                actual: required - 1
            })
        );
        assert_eq!(buffer, &input[..len]);
    }

    let required = fft.get_outofplace_scratch_len();
    if required > 0 {
        let mut input_copy = input[..len].to_vec();
        let mut output = vec![Complex::zero(); len];
        let mut scratch = vec![Complex::zero(); required - 1];
        assert_eq!(
            fft.process_outofplace_with_scratch(&mut input_copy, &mut output, &mut scratch),
            Err(FftError::ScratchTooSmall {
                expected: required,
                actual: required - 1
            })
        );
        assert_eq!(input_copy, &input[..len]);
    }

    let required = fft.get_immutable_scratch_len();
    if required > 0 {
        let mut output = vec![Complex::zero(); len];
        let mut scratch = vec![Complex::zero(); required - 1];
        assert_eq!(
            fft.process_immutable_with_scratch(&input[..len], &mut output, &mut scratch),
            Err(FftError::ScratchTooSmall {
                expected: required,
                actual: required - 1
            })
        );
    }
}

/// A small FFT of the given length to sit underneath the recursive algorithms in tests
pub fn construct_base(len: usize, direction: FftDirection) -> Arc<dyn Fft<f64>> {
    match len {
        1 => Arc::new(Butterfly1::new(direction)),
        2 => Arc::new(Butterfly2::new(direction)),
        3 => Arc::new(Butterfly3::new(direction)),
        4 => Arc::new(Butterfly4::new(direction)),
        5 => Arc::new(Butterfly5::new(direction)),
        6 => Arc::new(Butterfly6::new(direction)),
        7 => Arc::new(Butterfly7::new(direction)),
        8 => Arc::new(Butterfly8::new(direction)),
        9 => Arc::new(Butterfly9::new(direction)),
        11 => Arc::new(Butterfly11::new(direction)),
        12 => Arc::new(Butterfly12::new(direction)),
        13 => Arc::new(Butterfly13::new(direction)),
        16 => Arc::new(Butterfly16::new(direction)),
        17 => Arc::new(Butterfly17::new(direction)),
        19 => Arc::new(Butterfly19::new(direction)),
        23 => Arc::new(Butterfly23::new(direction)),
        24 => Arc::new(Butterfly24::new(direction)),
        27 => Arc::new(Butterfly27::new(direction)),
        29 => Arc::new(Butterfly29::new(direction)),
        31 => Arc::new(Butterfly31::new(direction)),
        32 => Arc::new(Butterfly32::new(direction)),
        _ => Arc::new(Dft::new(len, direction)),
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_reference_dft_impulse() {
        let mut input = vec![Complex::<f64>::zero(); 6];
        input[0] = Complex::new(1.0, 0.0);
        let output = reference_dft(&input, FftDirection::Forward);
        assert!(compare_vectors(&output, &vec![Complex::new(1.0, 0.0); 6]));
    }

    #[test]
    fn test_compare_vectors_catches_mismatch() {
        let a = random_signal::<f64>(10);
        let mut b = a.clone();
        assert!(compare_vectors(&a, &b));
        b[3] = b[3] + Complex::new(1e-3, 0.0);
        assert!(!compare_vectors(&a, &b));

        b[3] = Complex::new(f64::NAN, 0.0);
        assert!(!compare_vectors(&a, &b));
    }
}
