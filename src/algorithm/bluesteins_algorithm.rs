use std::sync::Arc;

use num_complex::Complex;
use num_traits::Zero;

use crate::algorithm::Radix4;
use crate::common::FftNum;
use crate::{twiddles, Fft, FftDirection, FftError, FftResult};

/// Implementation of Bluestein's Algorithm
///
/// This algorithm computes an arbitrary-sized FFT in O(nlogn) time. It does this by converting this size n FFT into a
/// size M where M >= 2N - 1. The most obvious choice for M is a power of two, although any size that satisfies
/// the requirement will work.
///
/// This implementation is used as a fallback for lengths that no cheaper algorithm can handle, most notably
/// large primes, and primes whose `len - 1` is itself hard to factor.
///
/// ~~~
/// // Computes a forward FFT of size 1201 (prime number), using Bluestein's Algorithm
/// use anyfft::algorithm::BluesteinsAlgorithm;
/// use anyfft::{Fft, FftDirection};
/// use anyfft::num_complex::Complex;
///
/// # fn main() -> Result<(), anyfft::FftError> {
/// let mut buffer = vec![Complex{ re: 0.0f32, im: 0.0f32 }; 1201];
///
/// // the inner FFTs are power-of-two Radix4 instances of size 4096
/// let fft = BluesteinsAlgorithm::new(1201, FftDirection::Forward)?;
/// fft.process(&mut buffer)?;
/// # Ok(())
/// # }
/// ~~~
///
/// Bluestein's Algorithm is relatively expensive compared to other FFT algorithms. Benchmarking shows that it is up to
/// an order of magnitude slower than similar composite sizes.
pub struct BluesteinsAlgorithm<T> {
    inner_fft_forward: Arc<dyn Fft<T>>,
    inner_fft_inverse: Arc<dyn Fft<T>>,

    inner_fft_multiplier: Box<[Complex<T>]>,
    twiddles: Box<[Complex<T>]>,

    len: usize,
    direction: FftDirection,
    inner_scratch_len: usize,
}

impl<T: FftNum> BluesteinsAlgorithm<T> {
    /// Creates a FFT instance which will process inputs/outputs of size `len`, using a pair of power-of-two
    /// [`Radix4`] instances of size `(2 * len - 1).next_power_of_two()` as the inner FFTs.
    pub fn new(len: usize, direction: FftDirection) -> FftResult<Self> {
        if len == 0 {
            return Err(FftError::InvalidLength {
                len,
                reason: "Bluestein's algorithm requires a nonzero length",
            });
        }
        let inner_fft_len = min_inner_len(len)
            .and_then(usize::checked_next_power_of_two)
            .ok_or(FftError::InvalidLength {
                len,
                reason: "Bluestein's inner FFT length overflows usize",
            })?;

        let inner_fft_forward = Arc::new(Radix4::new(inner_fft_len, FftDirection::Forward)?);
        let inner_fft_inverse = Arc::new(Radix4::new(inner_fft_len, FftDirection::Inverse)?);

        Self::new_with_inner_ffts(len, direction, inner_fft_forward, inner_fft_inverse)
    }

    /// Creates a FFT instance which will process inputs/outputs of size `len`, computing its convolution
    /// with the provided forward and inverse FFTs.
    ///
    /// Returns `FftError::InvalidLength` if the inner FFTs are shorter than `2 * len - 1`, if their lengths differ,
    /// or if `inner_fft_forward` and `inner_fft_inverse` don't compute forward and inverse FFTs respectively.
    ///
    /// Note that this constructor is quite expensive to run; This algorithm must compute a FFT using `inner_fft_forward`
    /// within the constructor.
    pub fn new_with_inner_ffts(
        len: usize,
        direction: FftDirection,
        inner_fft_forward: Arc<dyn Fft<T>>,
        inner_fft_inverse: Arc<dyn Fft<T>>,
    ) -> FftResult<Self> {
        let inner_fft_len = inner_fft_forward.len();
        if len == 0 {
            return Err(FftError::InvalidLength {
                len,
                reason: "Bluestein's algorithm requires a nonzero length",
            });
        }
        if min_inner_len(len).map_or(true, |min_len| inner_fft_len < min_len) {
            return Err(FftError::InvalidLength {
                len: inner_fft_len,
                reason: "Bluestein's inner FFT must have length at least 2 * len - 1",
            });
        }
        if inner_fft_inverse.len() != inner_fft_len {
            return Err(FftError::InvalidLength {
                len: inner_fft_inverse.len(),
                reason: "Bluestein's forward and inverse inner FFTs must have the same length",
            });
        }
        if inner_fft_forward.fft_direction() != FftDirection::Forward
            || inner_fft_inverse.fft_direction() != FftDirection::Inverse
        {
            return Err(FftError::InvalidLength {
                len: inner_fft_len,
                reason: "Bluestein's inner FFTs must be one forward FFT and one inverse FFT",
            });
        }

        // when computing FFTs, we're going to run our inner multiply pairwise by some precomputed data, then run an inverse inner FFT.
        // we need to normalize the output of that inverse FFT, so fold the normalization into the precomputed data
        let inner_fft_scale = T::from_f64_lossy(1.0 / inner_fft_len as f64);

        // the conjugated chirp, padded out with wraparound symmetry so that the convolution is cyclic
        let mut inner_fft_input = vec![Complex::zero(); inner_fft_len];
        inner_fft_input[0] = Complex::new(inner_fft_scale, T::zero());
        for i in 1..len {
            let twiddle = compute_chirp::<T>(i, len, direction).conj() * inner_fft_scale;
            inner_fft_input[i] = twiddle;
            inner_fft_input[inner_fft_len - i] = twiddle;
        }

        //Compute the inner fft
        let mut inner_fft_scratch = vec![Complex::zero(); inner_fft_forward.get_inplace_scratch_len()];
        inner_fft_forward.process_with_scratch(&mut inner_fft_input, &mut inner_fft_scratch)?;

        // also compute some more mundane twiddle factors to start and end with
        let twiddles: Vec<Complex<T>> = (0..len).map(|i| compute_chirp(i, len, direction)).collect();

        let inner_scratch_len = inner_fft_forward
            .get_inplace_scratch_len()
            .max(inner_fft_inverse.get_inplace_scratch_len());

        Ok(Self {
            inner_fft_forward,
            inner_fft_inverse,

            inner_fft_multiplier: inner_fft_input.into_boxed_slice(),
            twiddles: twiddles.into_boxed_slice(),

            len,
            direction,
            inner_scratch_len,
        })
    }

    fn inplace_scratch_len(&self) -> usize {
        self.inner_fft_multiplier.len() + self.inner_scratch_len
    }
    fn outofplace_scratch_len(&self) -> usize {
        self.inplace_scratch_len()
    }
    fn immut_scratch_len(&self) -> usize {
        self.inplace_scratch_len()
    }

    // Convolves the chirped input in `inner_buffer` with the precomputed kernel
    fn convolve(&self, inner_buffer: &mut [Complex<T>], inner_scratch: &mut [Complex<T>]) -> FftResult<()> {
        self.inner_fft_forward.process_with_scratch(inner_buffer, inner_scratch)?;

        for (inner, multiplier) in inner_buffer.iter_mut().zip(self.inner_fft_multiplier.iter()) {
            *inner = *inner * *multiplier;
        }

        self.inner_fft_inverse.process_with_scratch(inner_buffer, inner_scratch)
    }

    // Multiplies `input` by the chirp into the front of `inner_buffer`, and zero-pads the rest
    fn load_chirped(&self, input: &[Complex<T>], inner_buffer: &mut [Complex<T>]) {
        let (head, tail) = inner_buffer.split_at_mut(input.len());
        for ((inner_entry, buffer_entry), twiddle) in head.iter_mut().zip(input).zip(self.twiddles.iter()) {
            *inner_entry = *buffer_entry * *twiddle;
        }
        for inner_entry in tail {
            *inner_entry = Complex::zero();
        }
    }

    // Applies the chirp again while truncating the convolution back down to `output.len()`
    fn store_chirped(&self, inner_buffer: &[Complex<T>], output: &mut [Complex<T>]) {
        for ((buffer_entry, inner_entry), twiddle) in output
            .iter_mut()
            .zip(inner_buffer.iter())
            .zip(self.twiddles.iter())
        {
            *buffer_entry = *inner_entry * *twiddle;
        }
    }

    fn perform_fft_immut(
        &self,
        input: &[Complex<T>],
        output: &mut [Complex<T>],
        scratch: &mut [Complex<T>],
    ) -> FftResult<()> {
        let (inner_buffer, inner_scratch) = scratch.split_at_mut(self.inner_fft_multiplier.len());

        self.load_chirped(input, inner_buffer);
        self.convolve(inner_buffer, inner_scratch)?;
        self.store_chirped(inner_buffer, output);
        Ok(())
    }

    fn perform_fft_out_of_place(
        &self,
        input: &mut [Complex<T>],
        output: &mut [Complex<T>],
        scratch: &mut [Complex<T>],
    ) -> FftResult<()> {
        self.perform_fft_immut(input, output, scratch)
    }

    fn perform_fft_inplace(
        &self,
        buffer: &mut [Complex<T>],
        scratch: &mut [Complex<T>],
    ) -> FftResult<()> {
        let (inner_buffer, inner_scratch) = scratch.split_at_mut(self.inner_fft_multiplier.len());

        self.load_chirped(buffer, inner_buffer);
        self.convolve(inner_buffer, inner_scratch)?;
        self.store_chirped(inner_buffer, buffer);
        Ok(())
    }
}
boilerplate_fft!(BluesteinsAlgorithm, |this: &BluesteinsAlgorithm<_>| this.len);

// 2 * len - 1, the shortest inner FFT that keeps the convolution from wrapping onto itself
fn min_inner_len(len: usize) -> Option<usize> {
    len.checked_mul(2).map(|double_len| double_len - 1)
}

// exp(-iπ·index²/len) for forward FFTs. index² is reduced mod 2·len first, in wide arithmetic so it can't overflow
fn compute_chirp<T: FftNum>(index: usize, len: usize, direction: FftDirection) -> Complex<T> {
    let double_len = 2 * len as u128;
    let index_squared = (index as u128 * index as u128) % double_len;
    twiddles::compute_twiddle(index_squared as usize, 2 * len, direction)
}
