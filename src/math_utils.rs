use num_integer::Integer;
use num_traits::{One, PrimInt, Zero};

use crate::common::RadixFactor;

/// Finds the smallest primitive root of `prime`, IE a generator of the multiplicative group mod `prime`
pub fn primitive_root(prime: u64) -> Option<u64> {
    if prime < 2 {
        return None;
    }
    let test_exponents: Vec<u64> = distinct_prime_factors(prime - 1)
        .iter()
        .map(|factor| (prime - 1) / factor)
        .collect();
    'next: for potential_root in 2..prime {
        // for each distinct factor, if potential_root^(p-1)/factor mod p is 1, reject it
        for exp in &test_exponents {
            if modular_exponent(potential_root, *exp, prime) == 1 {
                continue 'next;
            }
        }

        // if we reach this point, it means this root was not rejected, so return it
        return Some(potential_root);
    }

    // 2 is its own group of order 1, generated by 1
    if prime == 2 {
        Some(1)
    } else {
        None
    }
}

/// computes base^exponent % modulo using the standard exponentiation by squaring algorithm
pub fn modular_exponent<T: PrimInt>(mut base: T, mut exponent: T, modulo: T) -> T {
    let one = T::one();

    let mut result = one;
    base = base % modulo;

    while exponent > Zero::zero() {
        if exponent & one == one {
            result = result * base % modulo;
        }
        exponent = exponent >> One::one();
        base = (base * base) % modulo;
    }

    result % modulo
}

/// Computes `a^-1 mod n`, or None if `a` and `n` aren't coprime
pub fn multiplicative_inverse(a: u64, n: u64) -> Option<u64> {
    let gcd_data = (a as i64).extended_gcd(&(n as i64));
    if gcd_data.gcd != 1 {
        return None;
    }
    Some(gcd_data.x.rem_euclid(n as i64) as u64)
}

/// return all of the prime factors of n, but omit duplicate prime factors
pub fn distinct_prime_factors(mut n: u64) -> Vec<u64> {
    let mut result = Vec::new();

    // handle 2 separately so we dont have to worry about adding 2 vs 1
    if n > 0 && n % 2 == 0 {
        while n % 2 == 0 {
            n /= 2;
        }
        result.push(2);
    }

    let mut divisor = 3;
    while divisor <= n / divisor {
        if n % divisor == 0 {
            // remove as many factors as possible from n
            while n % divisor == 0 {
                n /= divisor;
            }
            result.push(divisor);
        }
        divisor += 2;
    }
    if n > 1 {
        result.push(n);
    }

    result
}

/// Deterministic Miller-Rabin primality test. 0 and 1 are not prime.
pub fn is_prime(n: usize) -> bool {
    n >= 2 && primal_check::miller_rabin(n as u64)
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct PrimeFactor {
    pub value: usize,
    pub count: u32,
}

/// Factorization of an FFT length, split into the pieces the planner cares about
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrimeFactors {
    other_factors: Vec<PrimeFactor>,
    n: usize,
    power_two: u32,
    power_three: u32,
    total_factor_count: u32,
}
impl PrimeFactors {
    pub fn compute(mut n: usize) -> Self {
        let mut result = Self {
            other_factors: Vec::new(),
            n,
            power_two: 0,
            power_three: 0,
            total_factor_count: 0,
        };
        if n == 0 {
            return result;
        }

        // compute powers of two separately
        result.power_two = n.trailing_zeros();
        result.total_factor_count += result.power_two;
        n >>= result.power_two;

        // also compute powers of three separately
        while n % 3 == 0 {
            result.power_three += 1;
            n /= 3;
        }
        result.total_factor_count += result.power_three;

        // if we have any other factors, gather them in the "other factors" vec
        // trial division stops as soon as the remainder is prime, so prime lengths never walk up to sqrt(n)
        let mut remainder_is_prime = is_prime(n);
        let mut divisor = 5;
        while !remainder_is_prime && divisor <= n / divisor {
            let mut count = 0;
            while n % divisor == 0 {
                n /= divisor;
                count += 1;
            }
            if count > 0 {
                result.other_factors.push(PrimeFactor {
                    value: divisor,
                    count,
                });
                result.total_factor_count += count;
                remainder_is_prime = is_prime(n);
            }
            divisor += 2;
        }

        // whatever is left over is a prime factor larger than sqrt(n)
        if n > 1 {
            result.other_factors.push(PrimeFactor { value: n, count: 1 });
            result.total_factor_count += 1;
        }

        result
    }

    /// Rebuilds the original value from the stored exponents
    #[cfg(test)]
    pub fn reconstruct(&self) -> usize {
        if self.n == 0 {
            return 0;
        }
        let others: usize = self
            .other_factors
            .iter()
            .map(|factor| factor.value.pow(factor.count))
            .product();
        (1 << self.power_two) * 3usize.pow(self.power_three) * others
    }

    pub fn is_prime(&self) -> bool {
        self.total_factor_count == 1
    }
    pub fn is_power_of_two(&self) -> bool {
        self.n > 0 && self.power_three == 0 && self.other_factors.is_empty()
    }
    pub fn get_power_of_two(&self) -> u32 {
        self.power_two
    }

    // introspection used by the factorization tests
    #[cfg(test)]
    pub fn get_product(&self) -> usize {
        self.n
    }
    #[cfg(test)]
    pub fn get_total_factor_count(&self) -> u32 {
        self.total_factor_count
    }
    #[cfg(test)]
    pub fn get_power_of_three(&self) -> u32 {
        self.power_three
    }
    #[cfg(test)]
    pub fn get_other_factors(&self) -> &[PrimeFactor] {
        &self.other_factors
    }
}

/// Greedily strips radix 7, 5, 3, 2 factors from `n`, pairing up twos into fours.
///
/// Returns the radixes along with whatever couldn't be factored into them.
pub fn split_small_radices(mut n: usize) -> (Vec<RadixFactor>, usize) {
    if n == 0 {
        return (Vec::new(), 0);
    }

    let mut factors = Vec::new();
    for (radix, factor) in [
        (7, RadixFactor::Factor7),
        (5, RadixFactor::Factor5),
        (3, RadixFactor::Factor3),
    ] {
        while n % radix == 0 {
            factors.push(factor);
            n /= radix;
        }
    }

    let mut twos = n.trailing_zeros();
    n >>= twos;
    while twos >= 2 {
        factors.push(RadixFactor::Factor4);
        twos -= 2;
    }
    if twos == 1 {
        factors.push(RadixFactor::Factor2);
    }

    (factors, n)
}

/// Factors `n` entirely into RadixN-compatible radixes, or None if `n` has a prime factor larger than 7
pub fn factorize_into_small_radices(n: usize) -> Option<Vec<RadixFactor>> {
    match split_small_radices(n) {
        (factors, 1) => Some(factors),
        _ => None,
    }
}
