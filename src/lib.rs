#![forbid(unsafe_code)]

//! anyfft computes Fast Fourier Transforms of any length in O(nlogn) time, in pure Rust.
//!
//! ### Usage
//!
//! The recommended way to use anyfft is to create a [`FftPlanner`](crate::FftPlanner) instance and then call its
//! [`plan_fft`](crate::FftPlanner::plan_fft) method. This method will automatically choose which FFT algorithms are best
//! for a given size and initialize the required buffers and precomputed data.
//!
//! ```
//! // Perform a forward FFT of size 1234
//! use anyfft::{FftPlanner, num_complex::Complex};
//!
//! # fn main() -> Result<(), anyfft::FftError> {
//! let planner = FftPlanner::new();
//! let fft = planner.plan_fft_forward(1234)?;
//!
//! let mut buffer = vec![Complex{ re: 0.0f32, im: 0.0f32 }; 1234];
//! fft.process(&mut buffer)?;
//! # Ok(())
//! # }
//! ```
//! The planner returns trait objects of the [`Fft`](crate::Fft) trait, allowing for FFT sizes that aren't known
//! until runtime.
//!
//! anyfft also exposes individual FFT algorithms. For example, if you know beforehand that you need a power-of-two FFT, you can
//! avoid the overhead of the planner and trait object by directly creating instances of the [`Radix4`](crate::algorithm::Radix4) algorithm:
//!
//! ```
//! // Computes a forward FFT of size 4096
//! use anyfft::{Fft, FftDirection, num_complex::Complex, algorithm::Radix4};
//!
//! # fn main() -> Result<(), anyfft::FftError> {
//! let fft = Radix4::new(4096, FftDirection::Forward)?;
//!
//! let mut buffer = vec![Complex{ re: 0.0f64, im: 0.0f64 }; 4096];
//! fft.process(&mut buffer)?;
//! # Ok(())
//! # }
//! ```
//!
//! For the vast majority of situations, simply using the [`FftPlanner`](crate::FftPlanner) will be enough, but
//! advanced users may have better insight than the planner into which algorithms are best for a specific size.
//!
//! ### Normalization
//!
//! anyfft does not normalize outputs. Callers must manually normalize the results by scaling each element by
//! `1/len().sqrt()`. Multiple normalization steps can be merged into one via pairwise multiplication, so when
//! doing a forward FFT followed by an inverse callers can normalize once by scaling each element by `1/len()`
//!
//! ### Output Order
//!
//! Elements in the output are ordered by ascending frequency, with the first element corresponding to frequency 0.
//!
//! ### Errors
//!
//! Misuse of a transform (a buffer that isn't a multiple of the FFT length, an undersized scratch buffer, or an
//! algorithm constructed for a length it can't handle) is reported through [`FftError`](crate::FftError).
//! No processing call touches its buffers before validating them.

pub use num_complex;
pub use num_traits;

#[macro_use]
mod common;

mod array_utils;
mod error;
mod fft_cache;
mod math_utils;
mod plan;
mod twiddles;

/// Individual FFT algorithms
pub mod algorithm;

use num_complex::Complex;
use num_traits::Zero;

pub use crate::common::FftNum;
pub use crate::error::{FftError, FftResult};
pub use crate::plan::FftPlanner;

/// A trait that allows FFT algorithms to report their expected input/output size
pub trait Length {
    /// The FFT size that this algorithm can process
    fn len(&self) -> usize;
}

/// Represents a FFT direction, IE a forward FFT or an inverse FFT
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum FftDirection {
    Forward,
    Inverse,
}
impl FftDirection {
    /// Returns the opposite direction of `self`.
    ///
    ///  - If `self` is `FftDirection::Forward`, returns `FftDirection::Inverse`
    ///  - If `self` is `FftDirection::Inverse`, returns `FftDirection::Forward`
    #[inline]
    pub fn opposite_direction(&self) -> FftDirection {
        match self {
            Self::Forward => Self::Inverse,
            Self::Inverse => Self::Forward,
        }
    }
}
impl std::fmt::Display for FftDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Self::Forward => f.write_str("Forward"),
            Self::Inverse => f.write_str("Inverse"),
        }
    }
}

/// A trait that allows FFT algorithms to report whether they compute forward FFTs or inverse FFTs
pub trait Direction {
    /// Returns FftDirection::Forward if this instance computes forward FFTs, or FftDirection::Inverse for inverse FFTs
    fn fft_direction(&self) -> FftDirection;
}

/// Trait for algorithms that compute FFTs.
///
/// This trait has a few methods for computing FFTs. Its most convenient method is [`process(buffer)`](crate::Fft::process).
/// It takes in a slice of `Complex<T>` and computes a FFT on that slice, in-place. It may copy the data over to internal scratch buffers
/// if that speeds up the computation, but the output will always end up in the same slice as the input.
///
/// If the provided buffer is longer than the FFT length, the FFT will be computed separately on each consecutive `len()`-sized chunk.
///
/// Every method returns an [`FftError`](crate::FftError) when the buffers don't satisfy the transform's length and scratch contract.
pub trait Fft<T: FftNum>: Length + Direction + Sync + Send {
    /// Computes a FFT in-place.
    ///
    /// Convenience method that allocates a `Vec` with the required scratch space and calls `self.process_with_scratch`.
    /// If you want to re-use that allocation across multiple FFT computations, consider calling `process_with_scratch` instead.
    fn process(&self, buffer: &mut [Complex<T>]) -> FftResult<()> {
        let mut scratch = vec![Complex::zero(); self.get_inplace_scratch_len()];
        self.process_with_scratch(buffer, &mut scratch)
    }

    /// Divides `buffer` into chunks of size `self.len()`, and computes a FFT on each chunk.
    ///
    /// Uses the `scratch` buffer as scratch space, so the contents of `scratch` should be considered garbage
    /// after calling.
    ///
    /// Returns `FftError::BufferNotMultiple` if `buffer.len()` isn't a multiple of `self.len()`,
    /// and `FftError::ScratchTooSmall` if `scratch.len() < self.get_inplace_scratch_len()`.
    fn process_with_scratch(
        &self,
        buffer: &mut [Complex<T>],
        scratch: &mut [Complex<T>],
    ) -> FftResult<()>;

    /// Divides `input` and `output` into chunks of size `self.len()`, and computes a FFT on each chunk.
    ///
    /// This method uses both the `input` buffer and `scratch` buffer as scratch space, so the contents of both should be
    /// considered garbage after calling.
    ///
    /// Returns an error if `input` isn't a multiple of `self.len()`, if `output` isn't the same length as `input`,
    /// or if `scratch.len() < self.get_outofplace_scratch_len()`.
    fn process_outofplace_with_scratch(
        &self,
        input: &mut [Complex<T>],
        output: &mut [Complex<T>],
        scratch: &mut [Complex<T>],
    ) -> FftResult<()>;

    /// Divides `input` and `output` into chunks of size `self.len()`, and computes a FFT on each chunk, leaving `input` untouched.
    ///
    /// Returns an error if `input` isn't a multiple of `self.len()`, if `output` isn't the same length as `input`,
    /// or if `scratch.len() < self.get_immutable_scratch_len()`.
    fn process_immutable_with_scratch(
        &self,
        input: &[Complex<T>],
        output: &mut [Complex<T>],
        scratch: &mut [Complex<T>],
    ) -> FftResult<()>;

    /// Returns the size of the scratch buffer required by `process_with_scratch`
    fn get_inplace_scratch_len(&self) -> usize;

    /// Returns the size of the scratch buffer required by `process_outofplace_with_scratch`
    fn get_outofplace_scratch_len(&self) -> usize;

    /// Returns the size of the scratch buffer required by `process_immutable_with_scratch`
    fn get_immutable_scratch_len(&self) -> usize;
}

#[cfg(test)]
mod test_utils;
