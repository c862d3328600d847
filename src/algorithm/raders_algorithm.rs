use std::sync::Arc;

use num_complex::Complex;
use num_traits::Zero;
use strength_reduce::StrengthReducedUsize;

use crate::common::FftNum;
use crate::math_utils;
use crate::{twiddles, Fft, FftDirection, FftError, FftResult, Length};

/// Implementation of Rader's Algorithm
///
/// This algorithm computes a prime-sized FFT in O(nlogn) time. It does this by converting this size-N FFT into a
/// size-(N - 1) FFT, which is guaranteed to be composite.
///
/// The worst case for this algorithm is when (N - 1) is 2 * prime, resulting in a
/// [Cunningham Chain](https://en.wikipedia.org/wiki/Cunningham_chain)
///
/// ~~~
/// // Computes a forward FFT of size 1201 (prime number), using Rader's Algorithm
/// use anyfft::algorithm::{RadersAlgorithm, Dft};
/// use anyfft::{Fft, FftPlanner};
/// use anyfft::num_complex::Complex;
///
/// # fn main() -> Result<(), anyfft::FftError> {
/// let mut buffer = vec![Complex{ re: 0.0f32, im: 0.0f32 }; 1201];
///
/// // plan a FFT of size n - 1 = 1200
/// let planner = FftPlanner::new();
/// let inner_fft = planner.plan_fft_forward(1200)?;
///
/// let fft = RadersAlgorithm::new(1201, inner_fft)?;
/// fft.process(&mut buffer)?;
/// # Ok(())
/// # }
/// ~~~
///
/// Rader's Algorithm is relatively expensive compared to other FFT algorithms. Benchmarking shows that it is up to
/// an order of magnitude slower than similar composite sizes. In the example size above of 1201, benchmarking shows
/// that it takes 2.5x more time to compute than a FFT of size 1200.
pub struct RadersAlgorithm<T> {
    inner_fft: Arc<dyn Fft<T>>,
    inner_fft_data: Box<[Complex<T>]>,

    primitive_root: usize,
    primitive_root_inverse: usize,

    len: StrengthReducedUsize,
    inplace_scratch_len: usize,
    outofplace_scratch_len: usize,
    direction: FftDirection,
}

impl<T: FftNum> RadersAlgorithm<T> {
    /// Creates a FFT instance which will process inputs/outputs of size `len`. `inner_fft.len()` must be `len - 1`
    ///
    /// Returns `FftError::NotPrime` if `len` isn't prime, and `FftError::InvalidLength` if the inner FFT has the wrong length.
    ///
    /// Note that this constructor is quite expensive to run; This algorithm must compute a FFT using `inner_fft` within the
    /// constructor. This further underlines the fact that Rader's Algorithm is more expensive to run than other
    /// FFT algorithms
    pub fn new(len: usize, inner_fft: Arc<dyn Fft<T>>) -> FftResult<Self> {
        if !math_utils::is_prime(len) {
            return Err(FftError::NotPrime { len });
        }
        let inner_fft_len = inner_fft.len();
        if inner_fft_len != len - 1 {
            return Err(FftError::InvalidLength {
                len: inner_fft_len,
                reason: "the inner FFT of Rader's algorithm must have length len - 1",
            });
        }
        let direction = inner_fft.fft_direction();
        let reduced_len = StrengthReducedUsize::new(len);

        // compute the primitive root and its inverse for this size
        let primitive_root =
            math_utils::primitive_root(len as u64).ok_or(FftError::NotPrime { len })? as usize;
        let primitive_root_inverse =
            math_utils::multiplicative_inverse(primitive_root as u64, len as u64)
                .ok_or(FftError::NotPrime { len })? as usize;

        // precompute the convolution kernel: twiddles walked along the inverse root's powers, scaled so the
        // second inner FFT doesn't need a separate normalization pass
        let inner_fft_scale = T::from_f64_lossy(1.0 / inner_fft_len as f64);
        let mut inner_fft_input = vec![Complex::zero(); inner_fft_len];
        let mut twiddle_input = 1;
        for input_cell in &mut inner_fft_input {
            let twiddle = twiddles::compute_twiddle::<T>(twiddle_input, len, direction);
            *input_cell = twiddle * inner_fft_scale;

            twiddle_input = (twiddle_input * primitive_root_inverse) % reduced_len;
        }

        let required_inner_scratch = inner_fft.get_inplace_scratch_len();
        let extra_inner_scratch = if required_inner_scratch <= inner_fft_len {
            0
        } else {
            required_inner_scratch
        };

        //precompute a FFT of our reordered twiddle factors
        let mut inner_fft_scratch = vec![Complex::zero(); required_inner_scratch];
        inner_fft.process_with_scratch(&mut inner_fft_input, &mut inner_fft_scratch)?;

        Ok(Self {
            inner_fft,
            inner_fft_data: inner_fft_input.into_boxed_slice(),

            primitive_root,
            primitive_root_inverse,

            len: reduced_len,
            inplace_scratch_len: inner_fft_len + extra_inner_scratch,
            outofplace_scratch_len: extra_inner_scratch,
            direction,
        })
    }

    fn inplace_scratch_len(&self) -> usize {
        self.inplace_scratch_len
    }
    fn outofplace_scratch_len(&self) -> usize {
        self.outofplace_scratch_len
    }
    fn immut_scratch_len(&self) -> usize {
        self.inplace_scratch_len
    }

    // Multiplies the inner FFT output by the kernel, and sets up the second inner FFT to act as an inverse
    fn apply_kernel(&self, inner_data: &mut [Complex<T>], first_input: Complex<T>) {
        for (inner_element, kernel_element) in inner_data.iter_mut().zip(self.inner_fft_data.iter()) {
            *inner_element = (*inner_element * *kernel_element).conj();
        }

        // adding to the DC bin before the transform adds the conjugated first input to every output element
        inner_data[0] = inner_data[0] + first_input.conj();
    }

    fn perform_fft_out_of_place(
        &self,
        input: &mut [Complex<T>],
        output: &mut [Complex<T>],
        scratch: &mut [Complex<T>],
    ) -> FftResult<()> {
        let first_input = input[0];
        let (output_first, output_rest) = output.split_at_mut(1);

        // copy the input into the output, reordering along the powers of the primitive root
        let mut input_index = 1;
        for output_element in output_rest.iter_mut() {
            *output_element = input[input_index];
            input_index = (input_index * self.primitive_root) % self.len;
        }

        // the rest of the input buffer is free, so the inner FFT can use it as scratch unless it needs more
        let (input_first, input_rest) = input.split_at_mut(1);
        let inner_scratch = if scratch.is_empty() {
            &mut input_rest[..]
        } else {
            &mut scratch[..]
        };

        self.inner_fft.process_with_scratch(output_rest, inner_scratch)?;

        // the first output element is the sum of all inputs, which the inner FFT has left in its DC bin
        output_first[0] = first_input + output_rest[0];

        self.apply_kernel(output_rest, first_input);

        self.inner_fft.process_with_scratch(output_rest, inner_scratch)?;

        // copy the final values into the input buffer, undoing the reordering and the conjugation
        input_first[0] = output_first[0];
        let mut output_index = 1;
        for output_element in output_rest.iter() {
            input[output_index] = output_element.conj();
            output_index = (output_index * self.primitive_root_inverse) % self.len;
        }

        // the input buffer now holds the result in the correct order
        output.copy_from_slice(input);
        Ok(())
    }

    fn perform_fft_inplace(
        &self,
        buffer: &mut [Complex<T>],
        scratch: &mut [Complex<T>],
    ) -> FftResult<()> {
        let first_input = buffer[0];
        let (scratch, extra_scratch) = scratch.split_at_mut(self.len() - 1);

        // copy the buffer into the scratch, reordering along the powers of the primitive root
        let mut input_index = 1;
        for scratch_element in scratch.iter_mut() {
            *scratch_element = buffer[input_index];
            input_index = (input_index * self.primitive_root) % self.len;
        }

        let (buffer_first, buffer_rest) = buffer.split_at_mut(1);
        let inner_scratch = if extra_scratch.is_empty() {
            &mut buffer_rest[..]
        } else {
            &mut extra_scratch[..]
        };

        self.inner_fft.process_with_scratch(scratch, inner_scratch)?;

        buffer_first[0] = first_input + scratch[0];

        self.apply_kernel(scratch, first_input);

        self.inner_fft.process_with_scratch(scratch, inner_scratch)?;

        let mut output_index = 1;
        for scratch_element in scratch.iter() {
            buffer[output_index] = scratch_element.conj();
            output_index = (output_index * self.primitive_root_inverse) % self.len;
        }
        Ok(())
    }

    fn perform_fft_immut(
        &self,
        input: &[Complex<T>],
        output: &mut [Complex<T>],
        scratch: &mut [Complex<T>],
    ) -> FftResult<()> {
        output.copy_from_slice(input);
        self.perform_fft_inplace(output, scratch)
    }
}
boilerplate_fft!(RadersAlgorithm, |this: &RadersAlgorithm<_>| this.len.get());
