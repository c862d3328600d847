mod bluesteins_algorithm;
mod dft;
mod raders_algorithm;
mod radix4;
mod radixn;

/// Hardcoded size-specific FFT algorithms
pub mod butterflies;

pub use self::bluesteins_algorithm::BluesteinsAlgorithm;
pub use self::dft::Dft;
pub use self::raders_algorithm::RadersAlgorithm;
pub use self::radix4::Radix4;
pub use self::radixn::RadixN;

pub use crate::common::RadixFactor;
