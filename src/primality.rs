//! Probabilistic primality testing: Fermat and Miller-Rabin with factor recovery

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use tracing::debug;

use crate::error::{CryptoError, Result};
use crate::types::{PrimalityQuery, PrimalityVerdict};
use crate::utils::{factor_powers_of_two, is_coprime, mod_exp, random_in_range};

/// Default number of witness rounds (Miller-Rabin error bound 4^-40)
pub const DEFAULT_ITERATIONS: usize = 40;

/// Runs Fermat and Miller-Rabin tests with a fixed number of rounds
#[derive(Clone, Debug)]
pub struct PrimalityTester {
    iterations: usize,
}

impl Default for PrimalityTester {
    fn default() -> Self {
        PrimalityTester {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl PrimalityTester {
    /// Create a tester running `iterations` rounds per test
    pub fn new(iterations: usize) -> Result<Self> {
        if iterations == 0 {
            return Err(CryptoError::InvalidParameter(
                "Iteration count must be positive".to_string(),
            ));
        }
        Ok(PrimalityTester { iterations })
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Fermat test. `true` means "probably prime".
    ///
    /// Bases sharing a factor with `n` are redrawn without consuming a round.
    /// Carmichael numbers pass every coprime base and are reported as prime.
    pub fn fermat_test(&self, n: &BigUint) -> Result<bool> {
        if let Some(trivial) = trivial_verdict(n)? {
            return Ok(trivial.is_probably_prime());
        }

        let one = BigUint::one();
        let two = BigUint::from(2u32);
        let n_minus_1 = n - 1u32;
        let n_minus_2 = n - 2u32;

        let mut rounds = 0;
        let mut skipped = 0usize;
        while rounds < self.iterations {
            let a = random_in_range(&two, &n_minus_2)?;

            if !is_coprime(&a, n) {
                skipped += 1;
                continue;
            }

            if mod_exp(&a, &n_minus_1, n) != one {
                debug!(rounds, "Fermat witness found");
                return Ok(false);
            }

            rounds += 1;
        }

        debug!(rounds, skipped, "Fermat test passed");
        Ok(true)
    }

    /// Miller-Rabin test on `n`, optionally using `exponent` in place of `n - 1`.
    ///
    /// Besides proving compositeness, a round can expose a factor of `n`
    /// either through `gcd(a, n)` or through a nontrivial square root of 1.
    pub fn miller_rabin_test(
        &self,
        n: &BigUint,
        exponent: Option<&BigUint>,
    ) -> Result<PrimalityVerdict> {
        if let Some(trivial) = trivial_verdict(n)? {
            return Ok(trivial);
        }

        let one = BigUint::one();
        let two = BigUint::from(2u32);
        let n_minus_1 = n - 1u32;
        let n_minus_2 = n - 2u32;

        let exponent = match exponent {
            Some(e) if e.is_zero() => {
                return Err(CryptoError::InvalidParameter(
                    "Exponent must be positive".to_string(),
                ))
            }
            Some(e) => e.clone(),
            None => n_minus_1.clone(),
        };

        // exponent = m * 2^k with m odd
        let (k, m) = factor_powers_of_two(&exponent);

        'witness: for round in 0..self.iterations {
            let a = random_in_range(&two, &n_minus_2)?;

            let d = a.gcd(n);
            if !d.is_one() {
                debug!(round, "base shares a factor with n");
                return Ok(PrimalityVerdict::Composite { factor: Some(d) });
            }

            let mut prev = mod_exp(&a, &m, n);
            if prev == one || prev == n_minus_1 {
                continue;
            }

            for _ in 0..k.saturating_sub(1) {
                let b = mod_exp(&prev, &two, n);

                if b == n_minus_1 {
                    continue 'witness;
                }

                if b == one {
                    // prev is a square root of 1 other than +-1
                    debug!(round, "nontrivial square root of unity");
                    let factor = proper_factor(&(&prev - 1u32), n)
                        .or_else(|| proper_factor(&(&prev + 1u32), n));
                    return Ok(PrimalityVerdict::Composite { factor });
                }

                prev = b;
            }

            debug!(round, "sequence never reached n - 1");
            return Ok(PrimalityVerdict::Composite { factor: None });
        }

        Ok(PrimalityVerdict::ProbablyPrime)
    }

    /// Run Miller-Rabin on a parsed query
    pub fn test_query(&self, query: &PrimalityQuery) -> Result<PrimalityVerdict> {
        self.miller_rabin_test(&query.n, query.exponent.as_ref())
    }
}

/// Miller-Rabin primality check returning a plain verdict.
///
/// Numbers below 2 are not prime.
pub fn is_probable_prime(n: &BigUint, k: usize) -> bool {
    if n <= &BigUint::one() {
        return false;
    }

    let tester = PrimalityTester {
        iterations: k.max(1),
    };
    tester
        .miller_rabin_test(n, None)
        .map(|verdict| verdict.is_probably_prime())
        .unwrap_or(false)
}

/// Handles `n <= 3` and even `n`, where the random base range is empty or pointless
fn trivial_verdict(n: &BigUint) -> Result<Option<PrimalityVerdict>> {
    if n <= &BigUint::one() {
        return Err(CryptoError::InvalidParameter(format!(
            "Primality is undefined for {}",
            n
        )));
    }

    if n <= &BigUint::from(3u32) {
        return Ok(Some(PrimalityVerdict::ProbablyPrime));
    }

    if n.is_even() {
        return Ok(Some(PrimalityVerdict::Composite {
            factor: Some(BigUint::from(2u32)),
        }));
    }

    Ok(None)
}

/// gcd(value, n) when it lies strictly between 1 and n
fn proper_factor(value: &BigUint, n: &BigUint) -> Option<BigUint> {
    let d = value.gcd(n);
    if d.is_one() || &d == n {
        None
    } else {
        Some(d)
    }
}
