use std::sync::Arc;

use num_complex::Complex;
use num_traits::Zero;

use crate::array_utils::{factor_transpose, TransposeFactor};
use crate::common::{FftNum, RadixFactor};
use crate::{twiddles, Fft, FftDirection, FftResult};

use super::butterflies::{Butterfly2, Butterfly3, Butterfly4, Butterfly5, Butterfly6, Butterfly7};

enum InternalRadixFactor<T> {
    Factor2(Butterfly2<T>),
    Factor3(Butterfly3<T>),
    Factor4(Butterfly4<T>),
    Factor5(Butterfly5<T>),
    Factor6(Butterfly6<T>),
    Factor7(Butterfly7<T>),
}
impl<T> InternalRadixFactor<T> {
    pub const fn radix(&self) -> usize {
        match self {
            InternalRadixFactor::Factor2(_) => 2,
            InternalRadixFactor::Factor3(_) => 3,
            InternalRadixFactor::Factor4(_) => 4,
            InternalRadixFactor::Factor5(_) => 5,
            InternalRadixFactor::Factor6(_) => 6,
            InternalRadixFactor::Factor7(_) => 7,
        }
    }
}

/// FFT algorithm for lengths that factor into radixes 2 through 7, times the length of an arbitrary base FFT.
///
/// The input is reordered by a mixed-radix digit reversal, the base FFT runs on each contiguous `base_fft.len()` block,
/// and then one layer of cross-FFTs is applied per factor, in the order the factors were given.
///
/// ~~~
/// // Computes a forward FFT of size 7 * 5 * 4 * 3 = 420
/// use std::sync::Arc;
/// use anyfft::algorithm::{RadixFactor, RadixN, butterflies::Butterfly3};
/// use anyfft::{Fft, FftDirection};
/// use anyfft::num_complex::Complex;
///
/// # fn main() -> Result<(), anyfft::FftError> {
/// let factors = [RadixFactor::Factor7, RadixFactor::Factor5, RadixFactor::Factor4];
/// let base_fft = Arc::new(Butterfly3::<f32>::new(FftDirection::Forward));
/// let fft = RadixN::new(&factors, base_fft);
///
/// let mut buffer = vec![Complex{ re: 0.0f32, im: 0.0f32 }; 420];
/// fft.process(&mut buffer)?;
/// # Ok(())
/// # }
/// ~~~
pub struct RadixN<T> {
    twiddles: Box<[Complex<T>]>,

    base_fft: Arc<dyn Fft<T>>,
    base_len: usize,

    factors: Box<[TransposeFactor]>,
    butterflies: Box<[InternalRadixFactor<T>]>,

    len: usize,
    direction: FftDirection,
    outofplace_scratch_len: usize,
}

impl<T: FftNum> RadixN<T> {
    /// Constructs a RadixN instance which computes FFTs of length `factor_product * base_fft.len()`
    pub fn new(factors: &[RadixFactor], base_fft: Arc<dyn Fft<T>>) -> Self {
        let base_len = base_fft.len();
        let direction = base_fft.fft_direction();

        // set up our cross FFT butterfly instances. simultaneously, compute the number of twiddle factors
        let mut butterflies = Vec::with_capacity(factors.len());
        let mut cross_fft_len = base_len;
        let mut twiddle_count = 0;

        for factor in factors {
            let cross_fft_rows = factor.radix();
            let cross_fft_columns = cross_fft_len;

            twiddle_count += cross_fft_columns * (cross_fft_rows - 1);

            let butterfly = match factor {
                RadixFactor::Factor2 => InternalRadixFactor::Factor2(Butterfly2::new(direction)),
                RadixFactor::Factor3 => InternalRadixFactor::Factor3(Butterfly3::new(direction)),
                RadixFactor::Factor4 => InternalRadixFactor::Factor4(Butterfly4::new(direction)),
                RadixFactor::Factor5 => InternalRadixFactor::Factor5(Butterfly5::new(direction)),
                RadixFactor::Factor6 => InternalRadixFactor::Factor6(Butterfly6::new(direction)),
                RadixFactor::Factor7 => InternalRadixFactor::Factor7(Butterfly7::new(direction)),
            };
            butterflies.push(butterfly);

            cross_fft_len *= cross_fft_rows;
        }
        let len = cross_fft_len;

        // The transpose walks the factors from the last layer to the first. Only adjacent duplicates
        // can be merged: for 7 * 2 * 7 the two sevens must stay separate.
        let mut transpose_factors: Vec<TransposeFactor> = Vec::with_capacity(factors.len());
        for f in factors.iter().rev() {
            match transpose_factors.last_mut() {
                Some(last) if last.factor == *f => last.count += 1,
                _ => transpose_factors.push(TransposeFactor {
                    factor: *f,
                    count: 1,
                }),
            }
        }

        // twiddles for every layer are packed into one array, starting with the bottom layer and going up
        let mut cross_fft_len = base_len;
        let mut twiddle_factors = Vec::with_capacity(twiddle_count);

        for factor in factors {
            let cross_fft_columns = cross_fft_len;
            cross_fft_len *= factor.radix();

            for i in 0..cross_fft_columns {
                for k in 1..factor.radix() {
                    let twiddle = twiddles::compute_twiddle(i * k, cross_fft_len, direction);
                    twiddle_factors.push(twiddle);
                }
            }
        }

        Self {
            twiddles: twiddle_factors.into_boxed_slice(),

            outofplace_scratch_len: base_fft.get_inplace_scratch_len(),
            base_fft,
            base_len,

            factors: transpose_factors.into_boxed_slice(),
            butterflies: butterflies.into_boxed_slice(),

            len,
            direction,
        }
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
        if self.factors.is_empty() {
            // no factors, so just pass data straight to our base
            output.copy_from_slice(input);
        } else {
            factor_transpose(self.base_len, input, output, &self.factors);
        }

        // Base-level FFTs
        self.base_fft.process_with_scratch(output, scratch)?;

        // cross-FFTs
        let mut cross_fft_len = self.base_len;
        let mut layer_twiddles: &[Complex<T>] = &self.twiddles;

        for factor in self.butterflies.iter() {
            let cross_fft_columns = cross_fft_len;
            cross_fft_len *= factor.radix();

            for data in output.chunks_exact_mut(cross_fft_len) {
                match factor {
                    InternalRadixFactor::Factor2(butterfly2) => {
                        cross_fft_layer::<T, 2>(data, layer_twiddles, cross_fft_columns, |s| {
                            butterfly2.perform_fft_butterfly(s)
                        })
                    }
                    InternalRadixFactor::Factor3(butterfly3) => {
                        cross_fft_layer::<T, 3>(data, layer_twiddles, cross_fft_columns, |s| {
                            butterfly3.perform_fft_butterfly(s)
                        })
                    }
                    InternalRadixFactor::Factor4(butterfly4) => {
                        cross_fft_layer::<T, 4>(data, layer_twiddles, cross_fft_columns, |s| {
                            butterfly4.perform_fft_butterfly(s)
                        })
                    }
                    InternalRadixFactor::Factor5(butterfly5) => {
                        cross_fft_layer::<T, 5>(data, layer_twiddles, cross_fft_columns, |s| {
                            butterfly5.perform_fft_butterfly(s)
                        })
                    }
                    InternalRadixFactor::Factor6(butterfly6) => {
                        cross_fft_layer::<T, 6>(data, layer_twiddles, cross_fft_columns, |s| {
                            butterfly6.perform_fft_butterfly(s)
                        })
                    }
                    InternalRadixFactor::Factor7(butterfly7) => {
                        cross_fft_layer::<T, 7>(data, layer_twiddles, cross_fft_columns, |s| {
                            butterfly7.perform_fft_butterfly(s)
                        })
                    }
                }
            }

            // skip past all the twiddle factors used in this layer
            let twiddle_offset = cross_fft_columns * (factor.radix() - 1);
            layer_twiddles = &layer_twiddles[twiddle_offset..];
        }
        Ok(())
    }
}
boilerplate_fft_oop!(RadixN, |this: &RadixN<_>| this.len);

/// One layer of size-`R` cross-FFTs over `data`, which holds `R` rows of `num_columns` already-transformed columns.
///
/// `twiddles` holds `R - 1` twiddles per column, column-major.
#[inline(never)]
pub(crate) fn cross_fft_layer<T: FftNum, const R: usize>(
    data: &mut [Complex<T>],
    twiddles: &[Complex<T>],
    num_columns: usize,
    butterfly: impl Fn(&mut [Complex<T>; R]),
) {
    for idx in 0..num_columns {
        let column_twiddles = &twiddles[idx * (R - 1)..(idx + 1) * (R - 1)];

        let mut scratch = [Complex::zero(); R];
        scratch[0] = data[idx];
        for (row, twiddle) in column_twiddles.iter().enumerate() {
            scratch[row + 1] = data[idx + (row + 1) * num_columns] * *twiddle;
        }

        butterfly(&mut scratch);

        for (row, value) in scratch.iter().enumerate() {
            data[idx + row * num_columns] = *value;
        }
    }
}
