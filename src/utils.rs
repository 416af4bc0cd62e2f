//! Arbitrary-precision arithmetic primitives shared by ElGamal and the primality tests

use num_bigint::{BigInt, BigUint, RandBigInt, ToBigUint};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::rngs::OsRng;

use crate::error::{CryptoError, Result};

/// Modular exponentiation: base^exp mod modulus
///
/// `exp = 0` always yields 1, including for a modulus of 1.
/// The modulus must be non-zero.
pub fn mod_exp(base: &BigUint, exp: &BigUint, modulus: &BigUint) -> BigUint {
    if exp.is_zero() {
        return BigUint::one();
    }
    base.modpow(exp, modulus)
}

/// Extended Euclidean algorithm.
///
/// Returns `(gcd, x, y)` with `a*x + b*y = gcd`. For `b = 0` the result is `(a, 1, 0)`.
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
    let (mut old_t, mut t) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let q = &old_r / &r;

        let next_r = &old_r - &q * &r;
        old_r = std::mem::replace(&mut r, next_r);

        let next_s = &old_s - &q * &s;
        old_s = std::mem::replace(&mut s, next_s);

        let next_t = &old_t - &q * &t;
        old_t = std::mem::replace(&mut t, next_t);
    }

    (old_r, old_s, old_t)
}

/// Compute modular inverse using extended Euclidean algorithm
///
/// Returns the unique `x` in `[0, m)` with `a*x ≡ 1 (mod m)`.
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Result<BigUint> {
    if m.is_zero() {
        return Err(CryptoError::NoInverseExists);
    }

    let m_int = BigInt::from(m.clone());
    let (gcd, x, _) = extended_gcd(&BigInt::from(a.clone()), &m_int);

    if !gcd.is_one() {
        return Err(CryptoError::NoInverseExists);
    }

    // Pull the Bézout coefficient into the non-negative residue class
    x.mod_floor(&m_int)
        .to_biguint()
        .ok_or(CryptoError::NoInverseExists)
}

/// Whether `gcd(a, b) == 1`
pub fn is_coprime(a: &BigUint, b: &BigUint) -> bool {
    a.gcd(b).is_one()
}

/// Cryptographically secure uniform integer in `[lo, hi]` (inclusive).
///
/// Draws from the operating system RNG; the range sampler rejects and
/// resamples instead of reducing modulo the range width.
pub fn random_in_range(lo: &BigUint, hi: &BigUint) -> Result<BigUint> {
    if lo > hi {
        return Err(CryptoError::EmptyRange);
    }
    if lo == hi {
        return Ok(lo.clone());
    }

    let upper = hi + 1u32;
    Ok(OsRng.gen_biguint_range(lo, &upper))
}

/// Factor out powers of 2 from n, returning `(s, d)` with `n = d * 2^s` and `d` odd
///
/// `n` must be non-zero.
pub fn factor_powers_of_two(n: &BigUint) -> (u64, BigUint) {
    let s = n.trailing_zeros().unwrap_or(0);
    (s, n >> s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::ToPrimitive;

    fn big(n: u64) -> BigUint {
        n.to_biguint().unwrap()
    }

    #[test]
    fn test_mod_exp() {
        assert_eq!(mod_exp(&big(4), &big(13), &big(497)), big(445));
        assert_eq!(mod_exp(&big(2), &big(10), &big(1000)), big(24));
        assert_eq!(mod_exp(&big(123), &big(0), &big(7)), BigUint::one());
        assert_eq!(mod_exp(&big(123), &big(0), &big(1)), BigUint::one());
        assert_eq!(mod_exp(&big(123), &big(1), &big(7)), big(123 % 7));
    }

    #[test]
    fn test_extended_gcd() {
        let (g, x, y) = extended_gcd(&BigInt::from(240), &BigInt::from(46));
        assert_eq!(g, BigInt::from(2));
        assert_eq!(BigInt::from(240) * x + BigInt::from(46) * y, BigInt::from(2));

        let (g, x, y) = extended_gcd(&BigInt::from(17), &BigInt::zero());
        assert_eq!(g, BigInt::from(17));
        assert_eq!(x, BigInt::one());
        assert_eq!(y, BigInt::zero());
    }

    #[test]
    fn test_mod_inverse() {
        let a = big(3);
        let m = big(11);
        let inv = mod_inverse(&a, &m).unwrap();

        assert_eq!(inv, big(4));
        assert_eq!((a * inv) % m, BigUint::one());
    }

    #[test]
    fn test_mod_inverse_negative_coefficient() {
        // Euclid yields a negative coefficient for 7^-1 mod 40
        let inv = mod_inverse(&big(7), &big(40)).unwrap();
        assert_eq!(inv, big(23));
    }

    #[test]
    fn test_mod_inverse_not_coprime() {
        assert!(matches!(
            mod_inverse(&big(6), &big(9)),
            Err(CryptoError::NoInverseExists)
        ));
        assert!(matches!(
            mod_inverse(&big(0), &big(9)),
            Err(CryptoError::NoInverseExists)
        ));
        assert!(matches!(
            mod_inverse(&big(5), &big(0)),
            Err(CryptoError::NoInverseExists)
        ));
    }

    #[test]
    fn test_is_coprime() {
        assert!(is_coprime(&big(8), &big(15)));
        assert!(!is_coprime(&big(12), &big(18)));
        assert!(is_coprime(&big(1), &big(0)));
    }

    #[test]
    fn test_random_in_range_bounds() {
        let lo = big(5);
        let hi = big(9);
        let mut seen = [false; 5];
        for _ in 0..500 {
            let r = random_in_range(&lo, &hi).unwrap();
            assert!(r >= lo && r <= hi);
            let idx = (r - &lo).to_usize().unwrap();
            seen[idx] = true;
        }
        // Both endpoints are reachable
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_random_in_range_degenerate() {
        assert_eq!(random_in_range(&big(7), &big(7)).unwrap(), big(7));
        assert!(matches!(
            random_in_range(&big(8), &big(7)),
            Err(CryptoError::EmptyRange)
        ));
    }

    #[test]
    fn test_factor_powers_of_two() {
        assert_eq!(factor_powers_of_two(&big(560)), (4, big(35)));
        assert_eq!(factor_powers_of_two(&big(220)), (2, big(55)));
        assert_eq!(factor_powers_of_two(&big(7)), (0, big(7)));
    }
}
