use num_bigint::BigUint;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Errors which can happen while splitting or reconstructing a secret
pub enum Error {
    #[error("invalid argument: {0}")]
    /// Malformed secret/n/k, an empty share list, or shares that cannot be interpolated
    InvalidArgument(String),
    #[error("threshold {k} must be at least 2 and at most the share count {n}")]
    /// The threshold was outside [2, n]
    Threshold {
        /// Requested threshold
        k: usize,
        /// Requested number of shares
        n: usize,
    },
    #[error("shares were recorded under {} different primes", primes.len())]
    /// The shares being combined do not all carry the same field prime
    PrimeConsistency {
        /// The distinct primes found
        primes: Vec<BigUint>,
    },
    #[error("{search} search gave up after {attempts} attempts")]
    /// A bounded random search ran out of budget
    OutOfRange {
        /// Which search failed ("prime" or "coefficient")
        search: &'static str,
        /// How many draws were made
        attempts: usize,
    },
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}
