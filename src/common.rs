use num_traits::{FromPrimitive, Signed, ToPrimitive};
use std::fmt::Debug;

use crate::{FftError, FftResult};

/// Generic floating point number, implemented for f32 and f64
pub trait FftNum: Copy + FromPrimitive + ToPrimitive + Signed + Sync + Send + Debug + 'static {
    /// Converts a value computed in double precision, rounding if `Self` is narrower
    fn from_f64_lossy(value: f64) -> Self;
}

impl FftNum for f32 {
    #[inline(always)]
    fn from_f64_lossy(value: f64) -> Self {
        value as f32
    }
}
impl FftNum for f64 {
    #[inline(always)]
    fn from_f64_lossy(value: f64) -> Self {
        value
    }
}

/// A single cross-FFT radix supported by [`RadixN`](crate::algorithm::RadixN)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RadixFactor {
    Factor2,
    Factor3,
    Factor4,
    Factor5,
    Factor6,
    Factor7,
}
impl RadixFactor {
    pub const fn radix(&self) -> usize {
        match self {
            RadixFactor::Factor2 => 2,
            RadixFactor::Factor3 => 3,
            RadixFactor::Factor4 => 4,
            RadixFactor::Factor5 => 5,
            RadixFactor::Factor6 => 6,
            RadixFactor::Factor7 => 7,
        }
    }
}

pub(crate) fn validate_inplace(
    fft_len: usize,
    buffer_len: usize,
    required_scratch: usize,
    scratch_len: usize,
) -> FftResult<()> {
    if buffer_len < fft_len || buffer_len % fft_len != 0 {
        return Err(FftError::BufferNotMultiple {
            fft_len,
            actual: buffer_len,
        });
    }
    if scratch_len < required_scratch {
        return Err(FftError::ScratchTooSmall {
            expected: required_scratch,
            actual: scratch_len,
        });
    }
    Ok(())
}

pub(crate) fn validate_outofplace(
    fft_len: usize,
    input_len: usize,
    output_len: usize,
    required_scratch: usize,
    scratch_len: usize,
) -> FftResult<()> {
    if input_len != output_len {
        return Err(FftError::OutputLengthMismatch {
            input: input_len,
            output: output_len,
        });
    }
    validate_inplace(fft_len, input_len, required_scratch, scratch_len)
}

// Implements Fft for an algorithm whose only primitive is an out-of-place transform that reads its input immutably.
// In-place calls run the transform into the front of the scratch buffer and copy the result back.
//
// The struct must provide `direction: FftDirection`, `fn outofplace_scratch_len(&self) -> usize`, and
// `fn perform_fft_out_of_place(&self, &[Complex<T>], &mut [Complex<T>], &mut [Complex<T>]) -> FftResult<()>`
macro_rules! boilerplate_fft_oop {
    ($struct_name:ident, $len_fn:expr) => {
        impl<T: $crate::FftNum> $crate::Fft<T> for $struct_name<T> {
            fn process_outofplace_with_scratch(
                &self,
                input: &mut [$crate::num_complex::Complex<T>],
                output: &mut [$crate::num_complex::Complex<T>],
                scratch: &mut [$crate::num_complex::Complex<T>],
            ) -> $crate::FftResult<()> {
                $crate::Fft::process_immutable_with_scratch(self, input, output, scratch)
            }
            fn process_immutable_with_scratch(
                &self,
                input: &[$crate::num_complex::Complex<T>],
                output: &mut [$crate::num_complex::Complex<T>],
                scratch: &mut [$crate::num_complex::Complex<T>],
            ) -> $crate::FftResult<()> {
                let fft_len = $crate::Length::len(self);
                if fft_len == 0 {
                    return Ok(());
                }
                let required_scratch = self.outofplace_scratch_len();
                $crate::common::validate_outofplace(
                    fft_len,
                    input.len(),
                    output.len(),
                    required_scratch,
                    scratch.len(),
                )?;

                let scratch = &mut scratch[..required_scratch];
                for (in_chunk, out_chunk) in input
                    .chunks_exact(fft_len)
                    .zip(output.chunks_exact_mut(fft_len))
                {
                    self.perform_fft_out_of_place(in_chunk, out_chunk, scratch)?;
                }
                Ok(())
            }
            fn process_with_scratch(
                &self,
                buffer: &mut [$crate::num_complex::Complex<T>],
                scratch: &mut [$crate::num_complex::Complex<T>],
            ) -> $crate::FftResult<()> {
                let fft_len = $crate::Length::len(self);
                if fft_len == 0 {
                    return Ok(());
                }
                let required_scratch = fft_len + self.outofplace_scratch_len();
                $crate::common::validate_inplace(
                    fft_len,
                    buffer.len(),
                    required_scratch,
                    scratch.len(),
                )?;

                let (transform_output, extra_scratch) =
                    scratch[..required_scratch].split_at_mut(fft_len);
                for chunk in buffer.chunks_exact_mut(fft_len) {
                    self.perform_fft_out_of_place(chunk, transform_output, extra_scratch)?;
                    chunk.copy_from_slice(transform_output);
                }
                Ok(())
            }
            #[inline(always)]
            fn get_inplace_scratch_len(&self) -> usize {
                $crate::Length::len(self) + self.outofplace_scratch_len()
            }
            #[inline(always)]
            fn get_outofplace_scratch_len(&self) -> usize {
                self.outofplace_scratch_len()
            }
            #[inline(always)]
            fn get_immutable_scratch_len(&self) -> usize {
                self.outofplace_scratch_len()
            }
        }
        impl<T> $crate::Length for $struct_name<T> {
            #[inline(always)]
            fn len(&self) -> usize {
                $len_fn(self)
            }
        }
        impl<T> $crate::Direction for $struct_name<T> {
            #[inline(always)]
            fn fft_direction(&self) -> $crate::FftDirection {
                self.direction
            }
        }
    };
}

// Implements Fft for an algorithm with dedicated in-place, out-of-place, and immutable primitives.
//
// The struct must provide `direction: FftDirection`, the three scratch length methods
// `inplace_scratch_len`, `outofplace_scratch_len`, `immut_scratch_len`, and
// `perform_fft_inplace`, `perform_fft_out_of_place`, `perform_fft_immut`, each processing a single chunk.
macro_rules! boilerplate_fft {
    ($struct_name:ident, $len_fn:expr) => {
        impl<T: $crate::FftNum> $crate::Fft<T> for $struct_name<T> {
            fn process_outofplace_with_scratch(
                &self,
                input: &mut [$crate::num_complex::Complex<T>],
                output: &mut [$crate::num_complex::Complex<T>],
                scratch: &mut [$crate::num_complex::Complex<T>],
            ) -> $crate::FftResult<()> {
                let fft_len = $crate::Length::len(self);
                if fft_len == 0 {
                    return Ok(());
                }
                let required_scratch = self.outofplace_scratch_len();
                $crate::common::validate_outofplace(
                    fft_len,
                    input.len(),
                    output.len(),
                    required_scratch,
                    scratch.len(),
                )?;

                let scratch = &mut scratch[..required_scratch];
                for (in_chunk, out_chunk) in input
                    .chunks_exact_mut(fft_len)
                    .zip(output.chunks_exact_mut(fft_len))
                {
                    self.perform_fft_out_of_place(in_chunk, out_chunk, scratch)?;
                }
                Ok(())
            }
            fn process_immutable_with_scratch(
                &self,
                input: &[$crate::num_complex::Complex<T>],
                output: &mut [$crate::num_complex::Complex<T>],
                scratch: &mut [$crate::num_complex::Complex<T>],
            ) -> $crate::FftResult<()> {
                let fft_len = $crate::Length::len(self);
                if fft_len == 0 {
                    return Ok(());
                }
                let required_scratch = self.immut_scratch_len();
                $crate::common::validate_outofplace(
                    fft_len,
                    input.len(),
                    output.len(),
                    required_scratch,
                    scratch.len(),
                )?;

                let scratch = &mut scratch[..required_scratch];
                for (in_chunk, out_chunk) in input
                    .chunks_exact(fft_len)
                    .zip(output.chunks_exact_mut(fft_len))
                {
                    self.perform_fft_immut(in_chunk, out_chunk, scratch)?;
                }
                Ok(())
            }
            fn process_with_scratch(
                &self,
                buffer: &mut [$crate::num_complex::Complex<T>],
                scratch: &mut [$crate::num_complex::Complex<T>],
            ) -> $crate::FftResult<()> {
                let fft_len = $crate::Length::len(self);
                if fft_len == 0 {
                    return Ok(());
                }
                let required_scratch = self.inplace_scratch_len();
                $crate::common::validate_inplace(
                    fft_len,
                    buffer.len(),
                    required_scratch,
                    scratch.len(),
                )?;

                let scratch = &mut scratch[..required_scratch];
                for chunk in buffer.chunks_exact_mut(fft_len) {
                    self.perform_fft_inplace(chunk, scratch)?;
                }
                Ok(())
            }
            #[inline(always)]
            fn get_inplace_scratch_len(&self) -> usize {
                self.inplace_scratch_len()
            }
            #[inline(always)]
            fn get_outofplace_scratch_len(&self) -> usize {
                self.outofplace_scratch_len()
            }
            #[inline(always)]
            fn get_immutable_scratch_len(&self) -> usize {
                self.immut_scratch_len()
            }
        }
        impl<T> $crate::Length for $struct_name<T> {
            #[inline(always)]
            fn len(&self) -> usize {
                $len_fn(self)
            }
        }
        impl<T> $crate::Direction for $struct_name<T> {
            #[inline(always)]
            fn fft_direction(&self) -> $crate::FftDirection {
                self.direction
            }
        }
    };
}
