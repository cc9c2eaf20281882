use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};
use tracing::{debug, info};

use crate::config::Config;
use crate::errors::Error;
use crate::polynomial::Polynomial;
use crate::prime::{select_prime, MillerRabin, PrimalityTest};
use crate::sharing::{generate_shares, ShareSet};

/// Runs split sessions: select a field prime, build the polynomial, evaluate the shares.
///
/// A dealer holds only immutable configuration, so one instance can serve any
/// number of sessions, including concurrent ones.
#[derive(Clone, Debug, Default)]
pub struct Dealer<T = MillerRabin> {
    config: Config,
    primality: T,
}

impl Dealer<MillerRabin> {
    pub fn new(config: Config) -> Self {
        Dealer {
            config,
            primality: MillerRabin::default(),
        }
    }
}

impl<T: PrimalityTest> Dealer<T> {
    /// Use a different primality strategy for the prime search
    pub fn with_primality_test(config: Config, primality: T) -> Self {
        Dealer { config, primality }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Split `secret` into `n` shares, any `k` of which recover it
    pub fn split<R: RngCore + CryptoRng>(
        &self,
        secret: &BigUint,
        n: usize,
        k: usize,
        rng: &mut R,
    ) -> Result<ShareSet, Error> {
        check_threshold(n, k)?;

        let prime = select_prime(&field_floor(secret, n), &self.config, &self.primality, rng)?;
        self.deal(secret, n, k, prime, rng)
    }

    /// Split under a caller-chosen prime instead of searching for one
    pub fn split_with_prime<R: RngCore + CryptoRng>(
        &self,
        secret: &BigUint,
        n: usize,
        k: usize,
        prime: BigUint,
        rng: &mut R,
    ) -> Result<ShareSet, Error> {
        check_threshold(n, k)?;

        if prime <= field_floor(secret, n) {
            return Err(Error::invalid(
                "field prime must exceed both the secret and the share count",
            ));
        }
        self.deal(secret, n, k, prime, rng)
    }

    fn deal<R: RngCore + CryptoRng>(
        &self,
        secret: &BigUint,
        n: usize,
        k: usize,
        prime: BigUint,
        rng: &mut R,
    ) -> Result<ShareSet, Error> {
        let poly = Polynomial::random(secret, k, &prime, &self.config, rng)?;
        debug!(k, "built sharing polynomial");

        let shares = generate_shares(&poly, n);
        info!(n, k, prime_bits = prime.bits(), "split secret");

        Ok(ShareSet::new(prime, shares))
    }
}

/// k = 1 would hand the secret out verbatim, so the smallest threshold is 2
fn check_threshold(n: usize, k: usize) -> Result<(), Error> {
    if k < 2 || k > n {
        return Err(Error::Threshold { k, n });
    }
    Ok(())
}

/// The prime must lie above the secret, above n (so x = 1..n stay distinct),
/// and above 2 (so the coefficient range [1, p-2] is not empty).
fn field_floor(secret: &BigUint, n: usize) -> BigUint {
    secret
        .clone()
        .max(BigUint::from(n))
        .max(BigUint::from(2u32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prime::TrialDivision;
    use crate::sharing::reconstruct;
    use num_bigint::RandBigInt;

    fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
        fn go(start: usize, n: usize, k: usize, cur: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
            if cur.len() == k {
                out.push(cur.clone());
                return;
            }
            for i in start..n {
                cur.push(i);
                go(i + 1, n, k, cur, out);
                cur.pop();
            }
        }
        let mut out = Vec::new();
        go(0, n, k, &mut Vec::new(), &mut out);
        out
    }

    fn recover_every_subset(set: &ShareSet, k: usize, secret: &BigUint) {
        for idx in combinations(set.len(), k) {
            let subset: Vec<_> = idx.iter().map(|&i| set.shares()[i].clone()).collect();
            assert_eq!(&reconstruct(&subset, set.prime()).unwrap(), secret, "subset {idx:?}");
        }
    }

    #[test]
    fn test_small_secret_any_two_of_four() {
        let mut rng = crate::test_util::test_rng();
        let secret = BigUint::from(65u32);
        let set = Dealer::new(Config::default()).split(&secret, 4, 2, &mut rng).unwrap();

        assert_eq!(set.len(), 4);
        assert!(set.prime() > &secret);
        recover_every_subset(&set, 2, &secret);
    }

    #[test]
    fn test_large_secret_any_four_of_seven() {
        let mut rng = crate::test_util::test_rng();
        let secret: BigUint = "9876543211234561231313123789".parse().unwrap();
        let set = Dealer::new(Config::default()).split(&secret, 7, 4, &mut rng).unwrap();

        assert!(set.prime() > &secret);
        recover_every_subset(&set, 4, &secret);
    }

    #[test]
    fn test_trial_division_dealer() {
        let mut rng = crate::test_util::test_rng();
        let config = Config::default().with_initial_prime_bytes(3);
        let dealer = Dealer::with_primality_test(config, TrialDivision);
        let secret = BigUint::from(65u32);

        let set = dealer.split(&secret, 5, 3, &mut rng).unwrap();
        assert!(TrialDivision.is_prime(set.prime(), &mut rng));
        recover_every_subset(&set, 3, &secret);
    }

    #[test]
    fn test_seeded_sessions_are_reproducible() {
        let config = Config::default().with_max_coefficient_attempts(500);
        let dealer = Dealer::new(config.clone());
        assert_eq!(dealer.config(), &config);

        let secret = BigUint::from(65u32);
        let first = dealer.split(&secret, 4, 2, &mut crate::test_util::test_rng()).unwrap();
        let second = dealer.split(&secret, 4, 2, &mut crate::test_util::test_rng()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.reconstruct().unwrap(), secret);
    }

    #[test]
    fn test_threshold_bounds() {
        let mut rng = crate::test_util::test_rng();
        let dealer = Dealer::new(Config::default());
        let secret = BigUint::from(65u32);

        for (n, k) in [(4, 0), (4, 1), (4, 5), (0, 2)] {
            let err = dealer.split(&secret, n, k, &mut rng).unwrap_err();
            assert_eq!(err, Error::Threshold { k, n });
        }

        // k = n is allowed
        let set = dealer.split(&secret, 4, 4, &mut rng).unwrap();
        assert_eq!(set.reconstruct().unwrap(), secret);
    }

    #[test]
    fn test_zero_secret() {
        let mut rng = crate::test_util::test_rng();
        let secret = BigUint::from(0u32);
        let set = Dealer::new(Config::default()).split(&secret, 3, 2, &mut rng).unwrap();
        recover_every_subset(&set, 2, &secret);
    }

    #[test]
    fn test_random_secrets_property() {
        let mut rng = crate::test_util::test_rng();
        let dealer = Dealer::new(Config::default());

        for round in 0..25 {
            let secret = rng.gen_biguint(8 + 8 * round as u64);
            let n = 2 + round % 6;
            let k = 2 + round % (n - 1);
            let set = dealer.split(&secret, n, k, &mut rng).unwrap();

            let xs: Vec<BigUint> = set.shares().iter().map(|s| s.x.clone()).collect();
            assert_eq!(xs, (1..=n).map(BigUint::from).collect::<Vec<_>>());
            assert_eq!(reconstruct(&set.shares()[n - k..], set.prime()).unwrap(), secret);

            // one share short of the threshold
            let short = reconstruct(&set.shares()[..k - 1], set.prime()).unwrap();
            assert_ne!(short, secret, "round {round}");
        }
    }

    #[test]
    fn test_split_with_prime() {
        let mut rng = crate::test_util::test_rng();
        let dealer = Dealer::new(Config::default());
        let prime = BigUint::from(2u32).pow(127) - 1u32;
        let secret = BigUint::from(123_456_789u32);

        let set = dealer.split_with_prime(&secret, 5, 3, prime.clone(), &mut rng).unwrap();
        assert_eq!(set.prime(), &prime);
        recover_every_subset(&set, 3, &secret);

        let err = dealer
            .split_with_prime(&secret, 5, 3, BigUint::from(101u32), &mut rng)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        // the prime must also exceed n
        let err = dealer
            .split_with_prime(&BigUint::from(1u32), 7, 3, BigUint::from(7u32), &mut rng)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_fallback_prime_from_config() {
        let mut rng = crate::test_util::test_rng();
        let fallback = BigUint::from(2u32).pow(127) - 1u32;
        let config = Config::default()
            .with_max_prime_attempts(0)
            .with_fallback_prime(fallback.clone());
        let secret: BigUint = "9876543211234561231313123789".parse().unwrap();

        let set = Dealer::new(config).split(&secret, 7, 4, &mut rng).unwrap();
        assert_eq!(set.prime(), &fallback);
        assert_eq!(set.reconstruct().unwrap(), secret);
    }

    #[test]
    fn test_prime_search_exhausted() {
        let mut rng = crate::test_util::test_rng();
        let config = Config::default().with_max_prime_attempts(0);
        let err = Dealer::new(config)
            .split(&BigUint::from(65u32), 4, 2, &mut rng)
            .unwrap_err();
        assert!(matches!(err, Error::OutOfRange { search: "prime", .. }));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_sessions_are_independent() {
        let dealer = std::sync::Arc::new(Dealer::new(Config::default()));

        let handles: Vec<_> = (0u32..16)
            .map(|i| {
                let dealer = dealer.clone();
                tokio::task::spawn_blocking(move || {
                    let mut rng = rand::rngs::OsRng;
                    let secret = BigUint::from(1_000u32 + i);
                    let set = dealer.split(&secret, 5, 3, &mut rng).unwrap();
                    (secret, set)
                })
            })
            .collect();

        for handle in handles {
            let (secret, set) = handle.await.unwrap();
            assert_eq!(reconstruct(&set.shares()[2..], set.prime()).unwrap(), secret);
        }
    }
}
