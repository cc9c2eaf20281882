//! Threshold secret sharing over a prime field.
//!
//! [`split`] picks a random prime above the secret, hides the secret in the
//! constant term of a random polynomial of degree k-1, and hands out the
//! polynomial's values at x = 1..n. Any k of those shares recover the secret
//! through Lagrange interpolation at x = 0 ([`reconstruct`]); fewer reveal nothing.

pub mod config;
pub mod dealer;
pub mod errors;
pub mod field;
pub mod polynomial;
pub mod prime;
pub mod record;
pub mod sharing;

use num_traits::ToPrimitive;
use rand::rngs::OsRng;

pub use crate::config::Config;
pub use crate::dealer::Dealer;
pub use crate::errors::Error;
pub use crate::prime::{MillerRabin, PrimalityTest, TrialDivision};
pub use crate::record::{reconstruct_records, ShareRecord};
pub use crate::sharing::{reconstruct, Share, ShareSet};

/// Split a decimal `secret` into `n` shares with threshold `k`, using the
/// default configuration and the operating system's randomness.
pub fn split(secret: &str, n: &str, k: &str) -> Result<ShareSet, Error> {
    let secret = record::parse_decimal(secret, "secret")?;
    let n = parse_count(n, "n")?;
    let k = parse_count(k, "k")?;

    Dealer::new(Config::default()).split(&secret, n, k, &mut OsRng)
}

fn parse_count(s: &str, what: &str) -> Result<usize, Error> {
    record::parse_decimal(s, what)?
        .to_usize()
        .ok_or_else(|| Error::invalid(format!("{what} is too large")))
}
