use std::sync::Arc;

use num_complex::Complex;

use crate::algorithm::butterflies::{
    Butterfly1, Butterfly16, Butterfly2, Butterfly32, Butterfly4, Butterfly8,
};
use crate::algorithm::radixn::cross_fft_layer;
use crate::array_utils::bitreversed_transpose;
use crate::common::FftNum;
use crate::{twiddles, Fft, FftDirection, FftError, FftResult, Length};

/// FFT algorithm optimized for power-of-two sizes
///
/// ~~~
/// // Computes a forward FFT of size 4096
/// use anyfft::algorithm::Radix4;
/// use anyfft::{Fft, FftDirection};
/// use anyfft::num_complex::Complex;
///
/// # fn main() -> Result<(), anyfft::FftError> {
/// let mut buffer = vec![Complex{ re: 0.0f32, im: 0.0f32 }; 4096];
///
/// let fft = Radix4::new(4096, FftDirection::Forward)?;
/// fft.process(&mut buffer)?;
/// # Ok(())
/// # }
/// ~~~
pub struct Radix4<T> {
    twiddles: Box<[Complex<T>]>,

    base_fft: Arc<dyn Fft<T>>,
    base_len: usize,

    len: usize,
    direction: FftDirection,
    outofplace_scratch_len: usize,
}

impl<T: FftNum> Radix4<T> {
    /// Preallocates necessary arrays and precomputes necessary data to efficiently compute the power-of-two FFT
    ///
    /// Returns `FftError::NotPowerOfTwo` if `len` isn't a power of two.
    pub fn new(len: usize, direction: FftDirection) -> FftResult<Self> {
        if !len.is_power_of_two() {
            return Err(FftError::NotPowerOfTwo { len });
        }

        // Compute the total power of 2 for this length. IE, len = 2^exponent
        let exponent = len.trailing_zeros();

        // figure out which base length we're going to use
        let (base_exponent, base_fft) = match exponent {
            0 => (0, Arc::new(Butterfly1::new(direction)) as Arc<dyn Fft<T>>),
            1 => (1, Arc::new(Butterfly2::new(direction)) as Arc<dyn Fft<T>>),
            2 => (2, Arc::new(Butterfly4::new(direction)) as Arc<dyn Fft<T>>),
            3 => (3, Arc::new(Butterfly8::new(direction)) as Arc<dyn Fft<T>>),
            _ => {
                if exponent % 2 == 1 {
                    (5, Arc::new(Butterfly32::new(direction)) as Arc<dyn Fft<T>>)
                } else {
                    (4, Arc::new(Butterfly16::new(direction)) as Arc<dyn Fft<T>>)
                }
            }
        };

        // every layer on top of the base multiplies the length by 4, so base and len must differ by an even exponent
        Self::new_with_base((exponent - base_exponent) / 2, base_fft)
    }

    /// Constructs a Radix4 instance which computes FFTs of length `4^k * base_fft.len()`
    ///
    /// Returns `FftError::InvalidLength` if that length doesn't fit in a `usize`.
    pub fn new_with_base(k: u32, base_fft: Arc<dyn Fft<T>>) -> FftResult<Self> {
        let base_len = base_fft.len();
        let len = radix4_len(base_len, k).ok_or(FftError::InvalidLength {
            len: base_len,
            reason: "4^k times the base length overflows usize",
        })?;

        let direction = base_fft.fft_direction();

        // precompute the twiddle factors this algorithm will use.
        // every layer's twiddles are packed into a single array, starting with the bottom layer and going up
        const ROW_COUNT: usize = 4;
        let mut cross_fft_len = base_len;
        let mut twiddle_factors = Vec::with_capacity(len * 2);
        while cross_fft_len < len {
            let num_columns = cross_fft_len;
            cross_fft_len *= ROW_COUNT;

            for i in 0..num_columns {
                for k in 1..ROW_COUNT {
                    let twiddle = twiddles::compute_twiddle(i * k, cross_fft_len, direction);
                    twiddle_factors.push(twiddle);
                }
            }
        }

        Ok(Self {
            twiddles: twiddle_factors.into_boxed_slice(),

            outofplace_scratch_len: base_fft.get_inplace_scratch_len(),
            base_fft,
            base_len,

            len,
            direction,
        })
    }

    fn outofplace_scratch_len(&self) -> usize {
        self.outofplace_scratch_len
    }

    fn perform_fft_out_of_place(
        &self,
        input: &[Complex<T>],
        output: &mut [Complex<T>],
        scratch: &mut [Complex<T>],
    ) -> FftResult<()> {
        // copy the data into the output vector
        if self.len() == self.base_len {
            output.copy_from_slice(input);
        } else {
            bitreversed_transpose::<Complex<T>, 4>(self.base_len, input, output);
        }

        // Base-level FFTs
        self.base_fft.process_with_scratch(output, scratch)?;

        // cross-FFTs
        const ROW_COUNT: usize = 4;
        let butterfly4 = Butterfly4::new(self.direction);
        let mut cross_fft_len = self.base_len;
        let mut layer_twiddles: &[Complex<T>] = &self.twiddles;

        while cross_fft_len < input.len() {
            let num_columns = cross_fft_len;
            cross_fft_len *= ROW_COUNT;

            for data in output.chunks_exact_mut(cross_fft_len) {
                cross_fft_layer::<T, ROW_COUNT>(data, layer_twiddles, num_columns, |s| {
                    butterfly4.perform_fft_butterfly(s)
                });
            }

            // skip past all the twiddle factors used in this layer
            let twiddle_offset = num_columns * (ROW_COUNT - 1);
            layer_twiddles = &layer_twiddles[twiddle_offset..];
        }
        Ok(())
    }
}
boilerplate_fft_oop!(Radix4, |this: &Radix4<_>| this.len);

/// `base_len * 4^k`, or None on overflow
fn radix4_len(base_len: usize, k: u32) -> Option<usize> {
    let shift = k.checked_mul(2)?;
    1usize
        .checked_shl(shift)
        .and_then(|power| base_len.checked_mul(power))
}
