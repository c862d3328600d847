use crate::{common::FftNum, FftDirection};
use num_complex::Complex;

/// Computes `exp(-2πi·index/fft_len)` for forward FFTs, or its conjugate for inverse FFTs.
///
/// The angle is reduced to the first octant before calling into trig functions, so the quarter
/// and half turns land exactly on `±i` and `-1`.
pub fn compute_twiddle<T: FftNum>(
    index: usize,
    fft_len: usize,
    direction: FftDirection,
) -> Complex<T> {
    let (re, im) = unit_circle_point(index % fft_len, fft_len);
    let result = Complex {
        re: T::from_f64_lossy(re),
        im: T::from_f64_lossy(-im),
    };

    match direction {
        FftDirection::Forward => result,
        FftDirection::Inverse => result.conj(),
    }
}

// returns (cos, sin) of 2π·index/len, for index < len
fn unit_circle_point(index: usize, len: usize) -> (f64, f64) {
    // work in units of len/8, so that every octant boundary is an integer multiple of len
    let scaled = index as u128 * 8;
    let len = len as u128;
    let octant = scaled / len;
    let remainder = scaled % len;

    // position inside the octant, in [0, 1)
    let offset = remainder as f64 / len as f64;
    let angle = |units: f64| units * std::f64::consts::FRAC_PI_4;

    match octant {
        0 => (angle(offset).cos(), angle(offset).sin()),
        1 => (angle(1.0 - offset).sin(), angle(1.0 - offset).cos()),
        2 => (-angle(offset).sin(), angle(offset).cos()),
        3 => (-angle(1.0 - offset).cos(), angle(1.0 - offset).sin()),
        4 => (-angle(offset).cos(), -angle(offset).sin()),
        5 => (-angle(1.0 - offset).sin(), -angle(1.0 - offset).cos()),
        6 => (angle(offset).sin(), -angle(offset).cos()),
        _ => (angle(1.0 - offset).cos(), -angle(1.0 - offset).sin()),
    }
}

pub fn generate_twiddle_factors<T: FftNum>(
    fft_len: usize,
    direction: FftDirection,
) -> Vec<Complex<T>> {
    (0..fft_len)
        .map(|i| compute_twiddle(i, fft_len, direction))
        .collect()
}

#[inline(always)]
pub fn rotate_90<T: FftNum>(value: Complex<T>, direction: FftDirection) -> Complex<T> {
    match direction {
        FftDirection::Forward => Complex {
            re: value.im,
            im: -value.re,
        },
        FftDirection::Inverse => Complex {
            re: -value.im,
            im: value.re,
        },
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::test_utils::compare_vectors;

    #[test]
    fn test_generate() {
        //test the length-0 case
        let zero_twiddles: Vec<Complex<f64>> = generate_twiddle_factors(0, FftDirection::Forward);
        assert_eq!(0, zero_twiddles.len());

        let constant = -2f64 * std::f64::consts::PI;

        for len in 1..40 {
            let actual: Vec<Complex<f64>> = generate_twiddle_factors(len, FftDirection::Forward);
            let expected: Vec<Complex<f64>> = (0..len)
                .map(|i| Complex::from_polar(1f64, constant * i as f64 / len as f64))
                .collect();

            assert!(compare_vectors(&actual, &expected), "len = {}", len)
        }

        //for each len, verify that each element in the inverse is the conjugate of the non-inverse
        for len in 1..40 {
            let twiddles: Vec<Complex<f64>> = generate_twiddle_factors(len, FftDirection::Forward);
            let mut twiddles_inverse: Vec<Complex<f64>> =
                generate_twiddle_factors(len, FftDirection::Inverse);

            for value in twiddles_inverse.iter_mut() {
                *value = value.conj();
            }

            assert_eq!(twiddles, twiddles_inverse, "len = {}", len);
        }
    }

    #[test]
    fn test_twiddle_symmetry() {
        for len in (4..=256).step_by(4) {
            let twiddles: Vec<Complex<f64>> = generate_twiddle_factors(len, FftDirection::Forward);

            assert_eq!(twiddles[0], Complex::new(1.0, 0.0), "len = {}", len);
            assert_eq!(twiddles[len / 4], Complex::new(0.0, -1.0), "len = {}", len);
            assert_eq!(twiddles[len / 2], Complex::new(-1.0, 0.0), "len = {}", len);
            assert_eq!(twiddles[3 * len / 4], Complex::new(0.0, 1.0), "len = {}", len);
        }
    }

    #[test]
    fn test_compute_twiddle_wraps_index() {
        let wrapped: Complex<f64> = compute_twiddle(13, 5, FftDirection::Forward);
        let direct: Complex<f64> = compute_twiddle(3, 5, FftDirection::Forward);
        assert_eq!(wrapped, direct);
    }

    #[test]
    fn test_rotate() {
        // rotating by 90 degrees in the forward direction is the same as multiplying by -i
        let value = Complex::new(3.0f64, 5.0);
        assert_eq!(
            rotate_90(value, FftDirection::Forward),
            value * Complex::new(0.0, -1.0)
        );
        assert_eq!(
            rotate_90(value, FftDirection::Inverse),
            value * Complex::new(0.0, 1.0)
        );
    }
}
