//! The single-share text record: three decimal lines holding x, y and the field prime.
//! Reading and writing the files themselves is left to the caller.

use num_bigint::BigUint;
use std::fmt;
use std::str::FromStr;

use crate::errors::Error;
use crate::sharing::{Share, ShareSet};

/// One share plus the prime it was generated under
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareRecord {
    pub x: BigUint,
    pub y: BigUint,
    pub prime: BigUint,
}

impl ShareRecord {
    pub fn new(share: Share, prime: BigUint) -> Self {
        ShareRecord {
            x: share.x,
            y: share.y,
            prime,
        }
    }

    pub fn share(&self) -> Share {
        Share {
            x: self.x.clone(),
            y: self.y.clone(),
        }
    }
}

impl fmt::Display for ShareRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.x)?;
        writeln!(f, "{}", self.y)?;
        writeln!(f, "{}", self.prime)
    }
}

impl FromStr for ShareRecord {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        if lines.len() != 3 {
            return Err(Error::invalid(format!(
                "share record must have 3 lines (x, y, prime), found {}",
                lines.len()
            )));
        }

        Ok(ShareRecord {
            x: parse_decimal(lines[0], "x")?,
            y: parse_decimal(lines[1], "y")?,
            prime: parse_decimal(lines[2], "prime")?,
        })
    }
}

/// Parse a non-empty run of ASCII digits. Signs, separators and whitespace are rejected.
pub fn parse_decimal(s: &str, what: &str) -> Result<BigUint, Error> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::invalid(format!("{what} must be a non-negative decimal integer, got {s:?}")));
    }
    BigUint::parse_bytes(s.as_bytes(), 10)
        .ok_or_else(|| Error::invalid(format!("{what} is not a decimal integer: {s:?}")))
}

impl ShareSet {
    /// one record per share, each carrying the set's prime
    pub fn records(&self) -> Vec<ShareRecord> {
        self.shares()
            .iter()
            .map(|s| ShareRecord::new(s.clone(), self.prime().clone()))
            .collect()
    }

    /// Gather records into a set, failing if they were not all produced under one prime
    pub fn from_records(records: &[ShareRecord]) -> Result<Self, Error> {
        let first = records
            .first()
            .ok_or_else(|| Error::invalid("at least one share is required"))?;

        let mut primes: Vec<BigUint> = vec![first.prime.clone()];
        for record in &records[1..] {
            if !primes.contains(&record.prime) {
                primes.push(record.prime.clone());
            }
        }
        if primes.len() > 1 {
            return Err(Error::PrimeConsistency { primes });
        }

        let shares = records.iter().map(ShareRecord::share).collect();
        Ok(ShareSet::new(first.prime.clone(), shares))
    }
}

/// Validate that all records share one prime, then interpolate
pub fn reconstruct_records(records: &[ShareRecord]) -> Result<BigUint, Error> {
    ShareSet::from_records(records)?.reconstruct()
}
