use num_bigint::BigUint;

/// Knobs for one sharing session. A `Config` is never mutated once a dealer holds it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// byte length of the first prime candidate
    pub initial_prime_bytes: usize,
    /// the prime search never draws candidates longer than this
    pub max_prime_bytes: usize,
    /// total candidate draws before the prime search gives up
    pub max_prime_attempts: usize,
    /// draws per coefficient before the polynomial builder gives up
    pub max_coefficient_attempts: usize,
    /// consecutive coefficient rejections before the draw width shrinks
    pub coefficient_shrink_interval: usize,
    /// prime to fall back on once the search budget is spent
    pub fallback_prime: Option<BigUint>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            initial_prime_bytes: 5,
            max_prime_bytes: 512,
            max_prime_attempts: 100_000,
            max_coefficient_attempts: 1_000,
            coefficient_shrink_interval: 5,
            fallback_prime: None,
        }
    }
}

impl Config {
    /// Set the first candidate width in bytes (at least 1)
    pub fn with_initial_prime_bytes(mut self, bytes: usize) -> Self {
        self.initial_prime_bytes = bytes.max(1);
        self
    }

    /// Cap the candidate width in bytes
    pub fn with_max_prime_bytes(mut self, bytes: usize) -> Self {
        self.max_prime_bytes = bytes;
        self
    }

    /// Cap the number of prime candidates drawn
    pub fn with_max_prime_attempts(mut self, attempts: usize) -> Self {
        self.max_prime_attempts = attempts;
        self
    }

    /// Cap the draws spent on each coefficient
    pub fn with_max_coefficient_attempts(mut self, attempts: usize) -> Self {
        self.max_coefficient_attempts = attempts;
        self
    }

    /// Set how many rejections pass before the draw width shrinks (at least 1)
    pub fn with_coefficient_shrink_interval(mut self, interval: usize) -> Self {
        self.coefficient_shrink_interval = interval.max(1);
        self
    }

    /// Set the prime used once the search budget is spent. The caller is
    /// responsible for `prime` actually being prime
    pub fn with_fallback_prime(mut self, prime: BigUint) -> Self {
        self.fallback_prime = Some(prime);
        self
    }
}
