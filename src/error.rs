use thiserror::Error;

pub type FftResult<T> = Result<T, FftError>;

/// Errors reported when an FFT algorithm is constructed for a length it can't handle,
/// or when a processing call is handed buffers that violate its length or scratch contract.
///
/// These all indicate a programming error at the call site. The transform never touches its
/// buffers before returning one of them.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FftError {
    #[error("invalid FFT length {len}: {reason}")]
    InvalidLength { len: usize, reason: &'static str },

    #[error("scratch buffer too small: required {expected} elements, got {actual}")]
    ScratchTooSmall { expected: usize, actual: usize },

    #[error("buffer of {actual} elements is not a positive multiple of the FFT length {fft_len}")]
    BufferNotMultiple { fft_len: usize, actual: usize },

    #[error("output buffer has {output} elements, but input buffer has {input}")]
    OutputLengthMismatch { input: usize, output: usize },

    #[error("{len} is not prime")]
    NotPrime { len: usize },

    #[error("{len} is not a power of two")]
    NotPowerOfTwo { len: usize },
}
