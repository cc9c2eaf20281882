use num_bigint::{BigUint, RandBigInt};
use num_traits::Zero;
use rand::{CryptoRng, RngCore};
use tracing::debug;

use crate::config::Config;
use crate::errors::Error;

/// f(x) = a_0 + a_1 x + ... + a_{k-1} x^{k-1} over GF(p), with a_0 the secret
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polynomial {
    coefficients: Vec<BigUint>,
    prime: BigUint,
}

impl Polynomial {
    /// build a random degree k-1 polynomial whose constant term is `secret`
    pub fn random<R: RngCore + CryptoRng>(
        secret: &BigUint,
        k: usize,
        prime: &BigUint,
        config: &Config,
        rng: &mut R,
    ) -> Result<Self, Error> {
        if prime < &BigUint::from(3u32) {
            return Err(Error::invalid("field prime must be at least 3"));
        }
        if secret >= prime {
            return Err(Error::invalid("secret must be smaller than the field prime"));
        }
        if k == 0 {
            return Err(Error::invalid("a polynomial needs at least one coefficient"));
        }

        // a_0 = secret
        let mut coefficients = Vec::with_capacity(k);
        coefficients.push(secret.clone());

        // a_1, ..., a_{k-1} are random in [1, p-2]
        for _ in 1..k {
            coefficients.push(random_coefficient(prime, config, rng)?);
        }

        Ok(Polynomial {
            coefficients,
            prime: prime.clone(),
        })
    }

    pub fn coefficients(&self) -> &[BigUint] {
        &self.coefficients
    }

    pub fn prime(&self) -> &BigUint {
        &self.prime
    }

    /// number of coefficients, i.e. the threshold k
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// f(x) mod p
    pub fn evaluate(&self, x: &BigUint) -> BigUint {
        let mut fx = BigUint::zero();
        for (j, coef) in self.coefficients.iter().enumerate() {
            let xj = x.modpow(&BigUint::from(j), &self.prime);
            fx = (fx + coef * xj) % &self.prime;
        }
        fx
    }
}

/// Rejection-sample a coefficient in [1, p-2].
///
/// Draws start at the bit length of p. Every `coefficient_shrink_interval`
/// rejections the width drops by one bit, so the loop settles on widths whose
/// draws all fall below p-1.
fn random_coefficient<R: RngCore + CryptoRng>(
    prime: &BigUint,
    config: &Config,
    rng: &mut R,
) -> Result<BigUint, Error> {
    let upper = prime - 1u32;
    let interval = config.coefficient_shrink_interval.max(1);
    let mut bits = prime.bits();

    for attempt in 1..=config.max_coefficient_attempts {
        let candidate = rng.gen_biguint(bits);
        if !candidate.is_zero() && candidate < upper {
            if attempt > 1 {
                debug!(attempt, bits, "coefficient accepted after rejections");
            }
            return Ok(candidate);
        }
        if attempt % interval == 0 && bits > 1 {
            bits -= 1;
        }
    }

    Err(Error::OutOfRange {
        search: "coefficient",
        attempts: config.max_coefficient_attempts,
    })
}
