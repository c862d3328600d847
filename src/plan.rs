use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::algorithm::butterflies::*;
use crate::algorithm::*;
use crate::common::FftNum;
use crate::fft_cache::FftCache;
use crate::math_utils::{factorize_into_small_radices, split_small_radices, PrimeFactors};
use crate::{Fft, FftDirection, FftError, FftResult};

/// The smallest power-of-two length handed to Radix4. Everything at or below 2^5 = 32 has a butterfly.
const MIN_RADIX4_BITS: u32 = 6;
/// Primes above this length go straight to Bluestein's algorithm, even if `len - 1` factors nicely
const MAX_RADERS_LEN: usize = 1 << 20;

/// The planner's decision for one FFT length: which algorithm to build, and the recipes of its sub-FFTs.
///
/// Recipes are independent of direction, so they're cached by length alone.
#[derive(Debug, PartialEq, Clone)]
pub(crate) enum Recipe {
    Dft(usize),
    Butterfly1,
    Butterfly2,
    Butterfly3,
    Butterfly4,
    Butterfly5,
    Butterfly6,
    Butterfly7,
    Butterfly8,
    Butterfly9,
    Butterfly11,
    Butterfly12,
    Butterfly13,
    Butterfly16,
    Butterfly17,
    Butterfly19,
    Butterfly23,
    Butterfly24,
    Butterfly27,
    Butterfly29,
    Butterfly31,
    Butterfly32,
    Radix4 {
        len: usize,
        k: u32,
        base_fft: Arc<Recipe>,
    },
    RadixN {
        factors: Box<[RadixFactor]>,
        base_fft: Arc<Recipe>,
    },
    RadersAlgorithm {
        inner_fft: Arc<Recipe>,
    },
    BluesteinsAlgorithm {
        len: usize,
        inner_fft: Arc<Recipe>,
    },
}

impl Recipe {
    pub fn len(&self) -> usize {
        match self {
            Recipe::Dft(length) => *length,
            Recipe::Butterfly1 => 1,
            Recipe::Butterfly2 => 2,
            Recipe::Butterfly3 => 3,
            Recipe::Butterfly4 => 4,
            Recipe::Butterfly5 => 5,
            Recipe::Butterfly6 => 6,
            Recipe::Butterfly7 => 7,
            Recipe::Butterfly8 => 8,
            Recipe::Butterfly9 => 9,
            Recipe::Butterfly11 => 11,
            Recipe::Butterfly12 => 12,
            Recipe::Butterfly13 => 13,
            Recipe::Butterfly16 => 16,
            Recipe::Butterfly17 => 17,
            Recipe::Butterfly19 => 19,
            Recipe::Butterfly23 => 23,
            Recipe::Butterfly24 => 24,
            Recipe::Butterfly27 => 27,
            Recipe::Butterfly29 => 29,
            Recipe::Butterfly31 => 31,
            Recipe::Butterfly32 => 32,
            Recipe::Radix4 { len, .. } => *len,
            Recipe::RadixN { factors, base_fft } => {
                base_fft.len() * factors.iter().map(|f| f.radix()).product::<usize>()
            }
            Recipe::RadersAlgorithm { inner_fft } => inner_fft.len() + 1,
            Recipe::BluesteinsAlgorithm { len, .. } => *len,
        }
    }
}

/// The FFT planner creates new FFT algorithm instances.
///
/// anyfft has several FFT algorithms available. For a given FFT size, the `FftPlanner` decides which of the
/// available FFT algorithms to use and then initializes them.
///
/// ~~~
/// // Perform a forward Fft of size 1234
/// use std::sync::Arc;
/// use anyfft::{FftPlanner, num_complex::Complex};
///
/// # fn main() -> Result<(), anyfft::FftError> {
/// let planner = FftPlanner::new();
/// let fft = planner.plan_fft_forward(1234)?;
///
/// let mut buffer = vec![Complex{ re: 0.0f32, im: 0.0f32 }; 1234];
/// fft.process(&mut buffer)?;
///
/// // The FFT instance returned by the planner has the type `Arc<dyn Fft<T>>`,
/// // where T is the numeric type, ie f32 or f64, so it's cheap to clone
/// let fft_clone = Arc::clone(&fft);
/// # Ok(())
/// # }
/// ~~~
///
/// If you plan on creating multiple FFT instances, it is recommended to reuse the same planner for all of them. This
/// is because the planner re-uses internal data across FFT instances wherever possible, saving memory and reducing
/// setup time. (FFT instances created with one planner will never re-use data and buffers with FFT instances created
/// by a different planner)
///
/// Each FFT instance owns [`Arc`s](std::sync::Arc) to its internal data, rather than borrowing it from the planner, so it's perfectly
/// safe to drop the planner after creating Fft instances.
///
/// The planner's caches sit behind a mutex, so a single planner can be shared between threads, for example
/// through an `Arc<FftPlanner<T>>`. Concurrent requests for the same new length serialize on its construction.
pub struct FftPlanner<T: FftNum> {
    state: Mutex<PlannerState<T>>,
}

struct PlannerState<T: FftNum> {
    algorithm_cache: FftCache<T>,
    recipe_cache: HashMap<usize, Arc<Recipe>>,
}

impl<T: FftNum> FftPlanner<T> {
    /// Creates a new `FftPlanner` instance.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(PlannerState {
                algorithm_cache: FftCache::new(),
                recipe_cache: HashMap::new(),
            }),
        }
    }

    /// Returns a `Fft` instance which computes FFTs of size `len`.
    ///
    /// If the provided `direction` is `FftDirection::Forward`, the returned instance will compute forward FFTs. If it's `FftDirection::Inverse`, it will compute inverse FFTs.
    ///
    /// If this is called multiple times, the planner will attempt to re-use internal data between calls, reducing memory usage and FFT initialization time.
    /// Requesting the same length and direction twice returns the same instance.
    pub fn plan_fft(&self, len: usize, direction: FftDirection) -> FftResult<Arc<dyn Fft<T>>> {
        // the caches are only written after a transform is fully built, so a panic elsewhere can't leave them inconsistent
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let recipe = state.design_fft_for_len(len)?;
        state.build_fft(&recipe, direction)
    }

    /// Returns a `Fft` instance which computes forward FFTs of size `len`
    ///
    /// If this is called multiple times, the planner will attempt to re-use internal data between calls, reducing memory usage and FFT initialization time.
    pub fn plan_fft_forward(&self, len: usize) -> FftResult<Arc<dyn Fft<T>>> {
        self.plan_fft(len, FftDirection::Forward)
    }

    /// Returns a `Fft` instance which computes inverse FFTs of size `len`
    ///
    /// If this is called multiple times, the planner will attempt to re-use internal data between calls, reducing memory usage and FFT initialization time.
    pub fn plan_fft_inverse(&self, len: usize) -> FftResult<Arc<dyn Fft<T>>> {
        self.plan_fft(len, FftDirection::Inverse)
    }

    #[cfg(test)]
    fn design_fft_for_len(&self, len: usize) -> FftResult<Arc<Recipe>> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.design_fft_for_len(len)
    }
}

impl<T: FftNum> Default for FftPlanner<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FftNum> PlannerState<T> {
    // Make a recipe for a length
    fn design_fft_for_len(&mut self, len: usize) -> FftResult<Arc<Recipe>> {
        if let Some(recipe) = self.recipe_cache.get(&len) {
            return Ok(Arc::clone(recipe));
        }

        let recipe = if len < 1 {
            Arc::new(Recipe::Dft(len))
        } else {
            let factors = PrimeFactors::compute(len);
            self.design_fft_with_factors(len, factors)?
        };
        self.recipe_cache.insert(len, Arc::clone(&recipe));
        Ok(recipe)
    }

    // Create the fft from a recipe, take from cache if possible
    fn build_fft(&mut self, recipe: &Recipe, direction: FftDirection) -> FftResult<Arc<dyn Fft<T>>> {
        let len = recipe.len();
        if let Some(instance) = self.algorithm_cache.get(len, direction) {
            return Ok(instance);
        }

        let fft = self.build_new_fft(recipe, direction)?;
        self.algorithm_cache.insert(&fft, len, direction);
        Ok(fft)
    }

    // Create a new fft from a recipe
    fn build_new_fft(
        &mut self,
        recipe: &Recipe,
        direction: FftDirection,
    ) -> FftResult<Arc<dyn Fft<T>>> {
        let fft: Arc<dyn Fft<T>> = match recipe {
            Recipe::Dft(len) => Arc::new(Dft::new(*len, direction)),
            Recipe::Butterfly1 => Arc::new(Butterfly1::new(direction)),
            Recipe::Butterfly2 => Arc::new(Butterfly2::new(direction)),
            Recipe::Butterfly3 => Arc::new(Butterfly3::new(direction)),
            Recipe::Butterfly4 => Arc::new(Butterfly4::new(direction)),
            Recipe::Butterfly5 => Arc::new(Butterfly5::new(direction)),
            Recipe::Butterfly6 => Arc::new(Butterfly6::new(direction)),
            Recipe::Butterfly7 => Arc::new(Butterfly7::new(direction)),
            Recipe::Butterfly8 => Arc::new(Butterfly8::new(direction)),
            Recipe::Butterfly9 => Arc::new(Butterfly9::new(direction)),
            Recipe::Butterfly11 => Arc::new(Butterfly11::new(direction)),
            Recipe::Butterfly12 => Arc::new(Butterfly12::new(direction)),
            Recipe::Butterfly13 => Arc::new(Butterfly13::new(direction)),
            Recipe::Butterfly16 => Arc::new(Butterfly16::new(direction)),
            Recipe::Butterfly17 => Arc::new(Butterfly17::new(direction)),
            Recipe::Butterfly19 => Arc::new(Butterfly19::new(direction)),
            Recipe::Butterfly23 => Arc::new(Butterfly23::new(direction)),
            Recipe::Butterfly24 => Arc::new(Butterfly24::new(direction)),
            Recipe::Butterfly27 => Arc::new(Butterfly27::new(direction)),
            Recipe::Butterfly29 => Arc::new(Butterfly29::new(direction)),
            Recipe::Butterfly31 => Arc::new(Butterfly31::new(direction)),
            Recipe::Butterfly32 => Arc::new(Butterfly32::new(direction)),
            Recipe::Radix4 { k, base_fft, .. } => {
                let base_fft = self.build_fft(base_fft, direction)?;
                Arc::new(Radix4::new_with_base(*k, base_fft)?)
            }
            Recipe::RadixN { factors, base_fft } => {
                let base_fft = self.build_fft(base_fft, direction)?;
                Arc::new(RadixN::new(factors, base_fft))
            }
            Recipe::RadersAlgorithm { inner_fft } => {
                let inner_fft = self.build_fft(inner_fft, direction)?;
                Arc::new(RadersAlgorithm::new(recipe.len(), inner_fft)?)
            }
            Recipe::BluesteinsAlgorithm { len, inner_fft } => {
                let inner_fft_forward = self.build_fft(inner_fft, FftDirection::Forward)?;
                let inner_fft_inverse = self.build_fft(inner_fft, FftDirection::Inverse)?;
                Arc::new(BluesteinsAlgorithm::new_with_inner_ffts(
                    *len,
                    direction,
                    inner_fft_forward,
                    inner_fft_inverse,
                )?)
            }
        };
        Ok(fft)
    }

    fn design_fft_with_factors(
        &mut self,
        len: usize,
        factors: PrimeFactors,
    ) -> FftResult<Arc<Recipe>> {
        if let Some(fft_instance) = Self::design_butterfly_algorithm(len) {
            Ok(fft_instance)
        } else if factors.is_power_of_two() && factors.get_power_of_two() >= MIN_RADIX4_BITS {
            Ok(Self::design_radix4(factors.get_power_of_two()))
        } else if let Some(fft_instance) = self.design_radixn(len)? {
            Ok(fft_instance)
        } else if factors.is_prime() && len <= MAX_RADERS_LEN {
            self.design_prime(len)
        } else {
            self.design_bluesteins(len)
        }
    }

    // Returns Some(instance) if we have a butterfly available for this size. Returns None if there is no butterfly available for this size
    fn design_butterfly_algorithm(len: usize) -> Option<Arc<Recipe>> {
        match len {
            1 => Some(Arc::new(Recipe::Butterfly1)),
            2 => Some(Arc::new(Recipe::Butterfly2)),
            3 => Some(Arc::new(Recipe::Butterfly3)),
            4 => Some(Arc::new(Recipe::Butterfly4)),
            5 => Some(Arc::new(Recipe::Butterfly5)),
            6 => Some(Arc::new(Recipe::Butterfly6)),
            7 => Some(Arc::new(Recipe::Butterfly7)),
            8 => Some(Arc::new(Recipe::Butterfly8)),
            9 => Some(Arc::new(Recipe::Butterfly9)),
            11 => Some(Arc::new(Recipe::Butterfly11)),
            12 => Some(Arc::new(Recipe::Butterfly12)),
            13 => Some(Arc::new(Recipe::Butterfly13)),
            16 => Some(Arc::new(Recipe::Butterfly16)),
            17 => Some(Arc::new(Recipe::Butterfly17)),
            19 => Some(Arc::new(Recipe::Butterfly19)),
            23 => Some(Arc::new(Recipe::Butterfly23)),
            24 => Some(Arc::new(Recipe::Butterfly24)),
            27 => Some(Arc::new(Recipe::Butterfly27)),
            29 => Some(Arc::new(Recipe::Butterfly29)),
            31 => Some(Arc::new(Recipe::Butterfly31)),
            32 => Some(Arc::new(Recipe::Butterfly32)),
            _ => None,
        }
    }

    fn design_radix4(exponent: u32) -> Arc<Recipe> {
        // odd exponents sit on a size-32 base, even ones on a size-16 base, so the rest is a whole number of radix-4 layers
        let (base_exponent, base_fft) = if exponent % 2 == 1 {
            (5, Recipe::Butterfly32)
        } else {
            (4, Recipe::Butterfly16)
        };

        Arc::new(Recipe::Radix4 {
            len: 1 << exponent,
            k: (exponent - base_exponent) / 2,
            base_fft: Arc::new(base_fft),
        })
    }

    // Returns a RadixN recipe if len is a product of radixes 2 through 7, optionally times one butterfly prime
    fn design_radixn(&mut self, len: usize) -> FftResult<Option<Arc<Recipe>>> {
        let (factors, base_fft) = match factorize_into_small_radices(len) {
            Some(mut factors) => {
                if factors.is_empty() {
                    return Ok(None);
                }
                // use the first radix as the base, and stack the rest on top of it
                let base_radix = factors.remove(0).radix();
                (factors, self.design_fft_for_len(base_radix)?)
            }
            None => {
                // what's left only has prime factors above 7, so a butterfly here means a prime butterfly
                let (factors, remainder) = split_small_radices(len);
                match Self::design_butterfly_algorithm(remainder) {
                    Some(base_fft) => (factors, base_fft),
                    None => return Ok(None),
                }
            }
        };

        Ok(Some(Arc::new(Recipe::RadixN {
            factors: factors.into_boxed_slice(),
            base_fft,
        })))
    }

    fn design_prime(&mut self, len: usize) -> FftResult<Arc<Recipe>> {
        let inner_recipe = self.design_fft_for_len(len - 1)?;
        if let Recipe::BluesteinsAlgorithm { .. } = *inner_recipe {
            // a Bluestein's inner FFT would cost more than running Bluestein's on len directly
            self.design_bluesteins(len)
        } else {
            Ok(Arc::new(Recipe::RadersAlgorithm {
                inner_fft: inner_recipe,
            }))
        }
    }

    fn design_bluesteins(&mut self, len: usize) -> FftResult<Arc<Recipe>> {
        let inner_fft_len = len
            .checked_mul(2)
            .and_then(|double_len| (double_len - 1).checked_next_power_of_two())
            .ok_or(FftError::InvalidLength {
                len,
                reason: "Bluestein's inner FFT length overflows usize",
            })?;
        let inner_fft = self.design_fft_for_len(inner_fft_len)?;
        Ok(Arc::new(Recipe::BluesteinsAlgorithm { len, inner_fft }))
    }
}
