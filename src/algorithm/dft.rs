use num_complex::Complex;
use num_traits::Zero;

use crate::common::FftNum;
use crate::{twiddles, FftDirection, FftResult};

/// Naive O(n^2) Discrete Fourier Transform implementation
///
/// This implementation is primarily used to test other FFT algorithms. It is also the planner's
/// answer for a zero-length FFT, which does nothing.
///
/// ~~~
/// // Computes a naive DFT of size 123
/// use anyfft::algorithm::Dft;
/// use anyfft::{Fft, FftDirection};
/// use anyfft::num_complex::Complex;
///
/// # fn main() -> Result<(), anyfft::FftError> {
/// let mut buffer = vec![Complex{ re: 0.0f32, im: 0.0f32 }; 123];
///
/// let dft = Dft::new(123, FftDirection::Forward);
/// dft.process(&mut buffer)?;
/// # Ok(())
/// # }
/// ~~~
pub struct Dft<T> {
    twiddles: Vec<Complex<T>>,
    direction: FftDirection,
}

impl<T: FftNum> Dft<T> {
    /// Preallocates necessary arrays and precomputes necessary data to efficiently compute Dft
    pub fn new(len: usize, direction: FftDirection) -> Self {
        Self {
            twiddles: twiddles::generate_twiddle_factors(len, direction),
            direction,
        }
    }

    fn outofplace_scratch_len(&self) -> usize {
        0
    }

    fn perform_fft_out_of_place(
        &self,
        signal: &[Complex<T>],
        spectrum: &mut [Complex<T>],
        _scratch: &mut [Complex<T>],
    ) -> FftResult<()> {
        let len = self.twiddles.len();
        for (k, output_cell) in spectrum.iter_mut().enumerate() {
            *output_cell = Zero::zero();

            // k * i can overflow for huge lengths, so walk the twiddle index modulo len instead
            let mut twiddle_index = 0;
            for input_cell in signal {
                let twiddle = self.twiddles[twiddle_index];
                *output_cell = *output_cell + twiddle * *input_cell;

                twiddle_index += k;
                if twiddle_index >= len {
                    twiddle_index -= len;
                }
            }
        }
        Ok(())
    }
}
boilerplate_fft_oop!(Dft, |this: &Dft<_>| this.twiddles.len());
