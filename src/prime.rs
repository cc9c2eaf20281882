use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};
use rand::{CryptoRng, RngCore};
use tracing::{debug, warn};

use crate::config::Config;
use crate::errors::Error;

/// A way of deciding whether a field prime candidate is prime
pub trait PrimalityTest {
    /// Returns true if `candidate` is (probably) prime
    fn is_prime(&self, candidate: &BigUint, rng: &mut dyn RngCore) -> bool;
}

/// Trial division up to the integer square root. Exact, but the cost grows with
/// √candidate, so it only suits small fields.
#[derive(Clone, Copy, Debug, Default)]
pub struct TrialDivision;

impl PrimalityTest for TrialDivision {
    fn is_prime(&self, candidate: &BigUint, _rng: &mut dyn RngCore) -> bool {
        if let Some(n) = candidate.to_u64() {
            return is_prime_u64(n);
        }
        if candidate.is_even() {
            return false;
        }

        let limit = candidate.sqrt();
        let mut divisor = BigUint::from(3u32);
        while divisor <= limit {
            if (candidate % &divisor).is_zero() {
                return false;
            }
            divisor += 2u32;
        }
        true
    }
}

fn is_prime_u64(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    let mut d = 3u64;
    while d <= n / d {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

const SMALL_PRIMES: [u32; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// Probabilistic Miller-Rabin test with random bases. A composite survives
/// each round with probability at most 1/4.
#[derive(Clone, Copy, Debug)]
pub struct MillerRabin {
    pub rounds: usize,
}

impl Default for MillerRabin {
    fn default() -> Self {
        MillerRabin { rounds: 40 }
    }
}

impl PrimalityTest for MillerRabin {
    fn is_prime(&self, candidate: &BigUint, rng: &mut dyn RngCore) -> bool {
        if candidate < &BigUint::from(2u32) {
            return false;
        }
        for p in SMALL_PRIMES {
            if candidate == &BigUint::from(p) {
                return true;
            }
            if (candidate % p).is_zero() {
                return false;
            }
        }

        // candidate - 1 = d * 2^s with d odd
        let n_minus_one = candidate - 1u32;
        let s = n_minus_one.trailing_zeros().unwrap_or(0);
        let d = &n_minus_one >> s;
        let two = BigUint::from(2u32);

        'witness: for _ in 0..self.rounds {
            let a = rng.gen_biguint_range(&two, &n_minus_one);
            let mut x = a.modpow(&d, candidate);
            if x.is_one() || x == n_minus_one {
                continue;
            }
            for _ in 1..s {
                x = x.modpow(&two, candidate);
                if x == n_minus_one {
                    continue 'witness;
                }
            }
            return false;
        }
        true
    }
}

/// Pick a random prime strictly greater than `bound`.
///
/// Candidates start at `config.initial_prime_bytes` bytes; whenever a draw is not
/// above `bound` the width grows by one byte. The search stops after
/// `config.max_prime_attempts` draws or once the width would exceed
/// `config.max_prime_bytes`, at which point `config.fallback_prime` is used if it
/// is large enough.
pub fn select_prime<T: PrimalityTest, R: RngCore + CryptoRng>(
    bound: &BigUint,
    config: &Config,
    test: &T,
    rng: &mut R,
) -> Result<BigUint, Error> {
    let mut bytes = config.initial_prime_bytes.max(1);
    let mut attempts = 0;

    while attempts < config.max_prime_attempts && bytes <= config.max_prime_bytes {
        attempts += 1;

        let mut candidate = rng.gen_biguint((bytes * 8) as u64);
        if &candidate <= bound {
            bytes += 1;
            continue;
        }
        // even candidates above 2 are never prime
        if candidate.is_even() {
            candidate += 1u32;
        }
        if test.is_prime(&candidate, &mut *rng) {
            debug!(bits = candidate.bits(), attempts, "selected field prime");
            return Ok(candidate);
        }
    }

    match &config.fallback_prime {
        Some(prime) if prime > bound => {
            warn!(attempts, bits = prime.bits(), "prime search exhausted, using fallback prime");
            Ok(prime.clone())
        }
        _ => Err(Error::OutOfRange {
            search: "prime",
            attempts,
        }),
    }
}
