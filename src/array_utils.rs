use std::ops::{Deref, DerefMut};

use num_complex::Complex;

use crate::common::{FftNum, RadixFactor};

/// Random-access reads and writes of complex values.
///
/// Butterflies are written against this trait so that a single kernel serves both in-place calls
/// (a plain mutable slice) and out-of-place calls (a [`DoubleBuf`] that reads one buffer and writes another).
pub trait LoadStore<T: FftNum>: DerefMut {
    fn load(&self, idx: usize) -> Complex<T>;
    fn store(&mut self, val: Complex<T>, idx: usize);
}

impl<T: FftNum> LoadStore<T> for &mut [Complex<T>] {
    #[inline(always)]
    fn load(&self, idx: usize) -> Complex<T> {
        self[idx]
    }
    #[inline(always)]
    fn store(&mut self, val: Complex<T>, idx: usize) {
        self[idx] = val;
    }
}
impl<T: FftNum, const N: usize> LoadStore<T> for &mut [Complex<T>; N] {
    #[inline(always)]
    fn load(&self, idx: usize) -> Complex<T> {
        self[idx]
    }
    #[inline(always)]
    fn store(&mut self, val: Complex<T>, idx: usize) {
        self[idx] = val;
    }
}

/// Reads from `input` and writes to `output`, letting an in-place kernel run out-of-place.
pub struct DoubleBuf<'a, T> {
    pub input: &'a [Complex<T>],
    pub output: &'a mut [Complex<T>],
}
impl<'a, T> Deref for DoubleBuf<'a, T> {
    type Target = [Complex<T>];
    fn deref(&self) -> &Self::Target {
        self.input
    }
}
impl<'a, T> DerefMut for DoubleBuf<'a, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.output
    }
}
impl<'a, T: FftNum> LoadStore<T> for DoubleBuf<'a, T> {
    #[inline(always)]
    fn load(&self, idx: usize) -> Complex<T> {
        self.input[idx]
    }
    #[inline(always)]
    fn store(&mut self, val: Complex<T>, idx: usize) {
        self.output[idx] = val;
    }
}

/// A run of identical radixes in a mixed-radix digit reversal
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TransposeFactor {
    pub factor: RadixFactor,
    pub count: u8,
}

/// Returns `Some(k)` if `value == D^k`, `None` otherwise
pub fn compute_logarithm<const D: usize>(value: usize) -> Option<u32> {
    if value == 0 || D < 2 {
        return None;
    }

    let mut current_exponent = 0;
    let mut current_value = value;

    while current_value % D == 0 {
        current_exponent += 1;
        current_value /= D;
    }

    if current_value == 1 {
        Some(current_exponent)
    } else {
        None
    }
}

// Reverses the lowest `digits` base-D digits of `value`
pub fn reverse_bits<const D: usize>(value: usize, digits: u32) -> usize {
    let mut result: usize = 0;
    let mut value = value;
    for _ in 0..digits {
        result = (result * D) + (value % D);
        value /= D;
    }
    result
}

// Mixed-radix version of reverse_bits: peels digits off `value` in the order given by `factors`
// and pushes them onto the result in reverse.
pub fn reverse_remainders(value: usize, factors: &[TransposeFactor]) -> usize {
    let mut result: usize = 0;
    let mut value = value;
    for f in factors.iter() {
        let radix = f.factor.radix();
        for _ in 0..f.count {
            result = (result * radix) + (value % radix);
            value /= radix;
        }
    }
    result
}

/// Treats `input` as a `height`-row array and copies column `x` into contiguous block `reverse_bits(x)` of `output`.
///
/// `input.len() / height` must be a power of D.
pub fn bitreversed_transpose<T: Copy, const D: usize>(
    height: usize,
    input: &[T],
    output: &mut [T],
) {
    let width = input.len() / height;
    let rev_digits = compute_logarithm::<D>(width).unwrap_or(0);
    debug_assert!(D.pow(rev_digits) == width && input.len() == output.len());

    for x in 0..width {
        let x_rev = reverse_bits::<D>(x, rev_digits);
        let output_block = &mut output[x_rev * height..(x_rev + 1) * height];
        for (y, element) in output_block.iter_mut().enumerate() {
            *element = input[x + y * width];
        }
    }
}

/// Mixed-radix generalization of [`bitreversed_transpose`]. `factors` lists the radixes from the last
/// cross-FFT layer to the first, with adjacent duplicates collapsed.
pub fn factor_transpose<T: Copy>(
    height: usize,
    input: &[T],
    output: &mut [T],
    factors: &[TransposeFactor],
) {
    let width = input.len() / height;
    debug_assert!(input.len() % height == 0 && input.len() == output.len());

    for x in 0..width {
        let x_rev = reverse_remainders(x, factors);
        let output_block = &mut output[x_rev * height..(x_rev + 1) * height];
        for (y, element) in output_block.iter_mut().enumerate() {
            *element = input[x + y * width];
        }
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_compute_logarithm() {
        assert_eq!(compute_logarithm::<4>(1), Some(0));
        assert_eq!(compute_logarithm::<4>(4), Some(1));
        assert_eq!(compute_logarithm::<4>(256), Some(4));
        assert_eq!(compute_logarithm::<4>(128), None);
        assert_eq!(compute_logarithm::<3>(243), Some(5));
        assert_eq!(compute_logarithm::<3>(0), None);
        assert_eq!(compute_logarithm::<2>(6), None);
    }

    #[test]
    fn test_reverse_bits() {
        assert_eq!(reverse_bits::<2>(0b0011, 4), 0b1100);
        assert_eq!(reverse_bits::<2>(0b0110, 4), 0b0110);
        // base 4: digits (1, 2, 3) reversed to (3, 2, 1)
        assert_eq!(reverse_bits::<4>(1 * 16 + 2 * 4 + 3, 3), 3 * 16 + 2 * 4 + 1);
    }

    #[test]
    fn test_reverse_remainders_matches_reverse_bits() {
        let factors = [TransposeFactor {
            factor: RadixFactor::Factor4,
            count: 3,
        }];
        for value in 0..64 {
            assert_eq!(
                reverse_remainders(value, &factors),
                reverse_bits::<4>(value, 3)
            );
        }
    }

    #[test]
    fn test_reverse_remainders_is_permutation() {
        let factors = [
            TransposeFactor {
                factor: RadixFactor::Factor3,
                count: 1,
            },
            TransposeFactor {
                factor: RadixFactor::Factor2,
                count: 2,
            },
            TransposeFactor {
                factor: RadixFactor::Factor5,
                count: 1,
            },
        ];
        let width = 3 * 2 * 2 * 5;
        let mut seen = vec![false; width];
        for value in 0..width {
            let reversed = reverse_remainders(value, &factors);
            assert!(reversed < width);
            assert!(!seen[reversed], "duplicate index {}", reversed);
            seen[reversed] = true;
        }
    }

    #[test]
    fn test_bitreversed_transpose() {
        // height 2, width 4: column x lands in block reverse_bits::<2>(x, 2)
        let input: Vec<usize> = (0..8).collect();
        let mut output = vec![0; 8];
        bitreversed_transpose::<usize, 2>(2, &input, &mut output);

        assert_eq!(output, vec![0, 4, 2, 6, 1, 5, 3, 7]);
    }

    #[test]
    fn test_factor_transpose_single_layer() {
        // with a single factor, the transpose is a plain transpose
        let factors = [TransposeFactor {
            factor: RadixFactor::Factor3,
            count: 1,
        }];
        let input: Vec<usize> = (0..6).collect();
        let mut output = vec![0; 6];
        factor_transpose(2, &input, &mut output, &factors);

        assert_eq!(output, vec![0, 3, 1, 4, 2, 5]);
    }

    #[test]
    fn test_double_buf() {
        let input = [Complex::new(1.0f64, 0.0), Complex::new(2.0, 0.0)];
        let mut output = [Complex::new(0.0f64, 0.0); 2];
        {
            let mut buf = DoubleBuf {
                input: &input,
                output: &mut output,
            };
            let first = buf.load(0);
            buf.store(first, 1);
            // loads always read the input, even after a store to the same index
            let second = buf.load(1);
            buf.store(second, 0);
        }
        assert_eq!(output, [Complex::new(2.0, 0.0), Complex::new(1.0, 0.0)]);
    }
}
