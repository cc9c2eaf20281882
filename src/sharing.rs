use num_bigint::BigUint;
use num_traits::{One, Zero};
use std::collections::HashSet;

use crate::errors::Error;
use crate::field;
use crate::polynomial::Polynomial;

// shamir secret sharing reference: https://evervault.com/blog/shamir-secret-sharing
// polynomial interpolation reference: https://vitalik.eth.limo/general/2016/12/10/qap.html

/// a point (x, f(x)) on the secret-encoding polynomial
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Share {
    pub x: BigUint,
    pub y: BigUint,
}

impl Share {
    pub fn new(x: impl Into<BigUint>, y: impl Into<BigUint>) -> Self {
        Share {
            x: x.into(),
            y: y.into(),
        }
    }
}

/// The shares of one split together with the field prime they were generated under
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareSet {
    prime: BigUint,
    shares: Vec<Share>,
}

impl ShareSet {
    pub fn new(prime: BigUint, shares: Vec<Share>) -> Self {
        ShareSet { prime, shares }
    }

    pub fn prime(&self) -> &BigUint {
        &self.prime
    }

    pub fn shares(&self) -> &[Share] {
        &self.shares
    }

    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    pub fn into_parts(self) -> (BigUint, Vec<Share>) {
        (self.prime, self.shares)
    }

    /// Recover the secret from every share in the set
    pub fn reconstruct(&self) -> Result<BigUint, Error> {
        reconstruct(&self.shares, &self.prime)
    }
}

/// evaluate the polynomial at x = 1, ..., n to generate n shares
pub fn generate_shares(poly: &Polynomial, n: usize) -> Vec<Share> {
    (1..=n)
        .map(|i| {
            let x = BigUint::from(i);
            let y = poly.evaluate(&x);
            Share { x, y }
        })
        .collect()
}

/// Lagrange interpolation at x = 0.
///
/// The caller must supply at least k shares of the same split: fewer still
/// produce a field element, just not the secret.
pub fn reconstruct(shares: &[Share], prime: &BigUint) -> Result<BigUint, Error> {
    if shares.is_empty() {
        return Err(Error::invalid("at least one share is required"));
    }
    if prime <= &BigUint::one() {
        return Err(Error::invalid("field prime must be greater than 1"));
    }

    let xs: Vec<BigUint> = shares.iter().map(|s| &s.x % prime).collect();

    let mut seen = HashSet::with_capacity(xs.len());
    for x in &xs {
        if x.is_zero() {
            return Err(Error::invalid("share x-coordinate is 0 in the field"));
        }
        if !seen.insert(x) {
            return Err(Error::invalid(format!("duplicate share x-coordinate {x}")));
        }
    }

    let mut secret = BigUint::zero();
    for (i, (xi, share)) in xs.iter().zip(shares).enumerate() {
        let mut num = BigUint::one();
        let mut den = BigUint::one();

        // ℓ_i(0) = ∏_{j != i} (0 - x_j) / (x_i - x_j)
        for (j, xj) in xs.iter().enumerate() {
            if i != j {
                num = num * field::sub_mod(&BigUint::zero(), xj, prime) % prime;
                den = den * field::sub_mod(xi, xj, prime) % prime;
            }
        }
        let den_inv = field::inverse(&den, prime)
            .ok_or_else(|| Error::invalid("lagrange denominator is not invertible, is the modulus prime?"))?;
        let lagrange_basis = num * den_inv % prime;

        // f(0) = Σ y_i ℓ_i(0)
        secret = (secret + (&share.y % prime) * lagrange_basis) % prime;
    }

    Ok(secret)
}
