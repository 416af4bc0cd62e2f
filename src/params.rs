//! ElGamal domain parameters (p, g) and their generation

use num_bigint::{BigUint, RandBigInt};
use num_traits::One;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::error::{CryptoError, Result};
use crate::primality::is_probable_prime;
use crate::utils::{mod_exp, random_in_range};

/// Smallest modulus size `generate` accepts
pub const MIN_PARAMETER_BITS: u64 = 16;

/// Smallest modulus for which the exponent range `[1, p-2]` is non-empty
pub const MIN_MODULUS: u32 = 3;

const PRIMALITY_ROUNDS: usize = 20;
const MAX_GENERATOR_ATTEMPTS: usize = 10_000;

/// Prime modulus and group generator shared by all parties
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainParameters {
    pub(crate) p: BigUint,
    pub(crate) g: BigUint,
}

impl DomainParameters {
    /// Wrap caller-supplied parameters without validating them
    pub fn new(p: BigUint, g: BigUint) -> Self {
        DomainParameters { p, g }
    }

    /// Generate a safe prime `p = 2q + 1` of roughly `bit_size` bits and a generator of Z_p^*
    pub fn generate(bit_size: u64) -> Result<Self> {
        if bit_size < MIN_PARAMETER_BITS {
            return Err(CryptoError::InvalidParameter(format!(
                "Modulus must have at least {} bits, got {}",
                MIN_PARAMETER_BITS, bit_size
            )));
        }

        let (p, q) = generate_safe_prime(bit_size)?;
        let g = find_generator(&p, &q)?;
        debug!(bits = p.bits(), "generated domain parameters");

        Ok(DomainParameters { p, g })
    }

    pub fn modulus(&self) -> &BigUint {
        &self.p
    }

    pub fn generator(&self) -> &BigUint {
        &self.g
    }

    pub fn bit_size(&self) -> u64 {
        self.p.bits()
    }

    /// Check `p >= 3` and `1 < g < p`
    pub fn validate(&self) -> Result<()> {
        check_modulus(&self.p)?;

        if self.g <= BigUint::one() || self.g >= self.p {
            return Err(CryptoError::InvalidParameter(
                "Generator g must be in range (1, p)".to_string(),
            ));
        }

        Ok(())
    }

    /// `[p, g]` in storage order
    pub fn to_components(&self) -> Vec<BigUint> {
        vec![self.p.clone(), self.g.clone()]
    }
}

impl fmt::Display for DomainParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DomainParameters({} bits)", self.bit_size())
    }
}

/// Reject moduli below [`MIN_MODULUS`]
pub(crate) fn check_modulus(p: &BigUint) -> Result<()> {
    if p < &BigUint::from(MIN_MODULUS) {
        return Err(CryptoError::InvalidParameter(format!(
            "Modulus p must be at least {}",
            MIN_MODULUS
        )));
    }
    Ok(())
}

/// Generate a safe prime (p = 2q + 1 where q is also prime)
pub fn generate_safe_prime(bit_size: u64) -> Result<(BigUint, BigUint)> {
    if bit_size < MIN_PARAMETER_BITS {
        return Err(CryptoError::InvalidParameter(format!(
            "Modulus must have at least {} bits, got {}",
            MIN_PARAMETER_BITS, bit_size
        )));
    }

    let max_iterations = if bit_size <= 512 {
        500_000
    } else if bit_size <= 1024 {
        200_000
    } else {
        100_000
    };

    for _ in 0..max_iterations {
        // q has bit_size - 1 bits with the top bit set, so p has exactly bit_size
        let mut q = OsRng.gen_biguint(bit_size - 1);
        q |= BigUint::one();
        q |= BigUint::one() << (bit_size - 2);

        if !is_probable_prime(&q, PRIMALITY_ROUNDS) {
            continue;
        }

        let p = &q * 2u32 + 1u32;
        if is_probable_prime(&p, PRIMALITY_ROUNDS) {
            return Ok((p, q));
        }
    }

    warn!(bit_size, max_iterations, "safe prime search exhausted");
    Err(CryptoError::KeyGenerationExhausted {
        attempts: max_iterations,
    })
}

/// Find a generator for the multiplicative group modulo a safe prime p = 2q + 1
///
/// The group order is 2q, so g generates it iff g^2 != 1 and g^q != 1.
pub fn find_generator(p: &BigUint, q: &BigUint) -> Result<BigUint> {
    let two = BigUint::from(2u32);
    let p_minus_2 = p - 2u32;

    for _ in 0..MAX_GENERATOR_ATTEMPTS {
        let g = random_in_range(&two, &p_minus_2)?;

        let g_squared = mod_exp(&g, &two, p);
        let g_to_q = mod_exp(&g, q, p);

        if g_squared != BigUint::one() && g_to_q != BigUint::one() {
            return Ok(g);
        }
    }

    Err(CryptoError::KeyGenerationExhausted {
        attempts: MAX_GENERATOR_ATTEMPTS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyPair;
    use num_bigint::ToBigUint;

    #[test]
    fn test_generate_parameters() {
        let params = DomainParameters::generate(64).unwrap();
        assert_eq!(params.bit_size(), 64);
        params.validate().unwrap();

        let q = (params.modulus() - 1u32) / 2u32;
        assert!(is_probable_prime(params.modulus(), 20));
        assert!(is_probable_prime(&q, 20));

        // g has full order 2q
        let g = params.generator();
        assert_ne!(mod_exp(g, &2u32.to_biguint().unwrap(), params.modulus()), BigUint::one());
        assert_ne!(mod_exp(g, &q, params.modulus()), BigUint::one());
    }

    #[test]
    fn test_minimum_size() {
        assert!(DomainParameters::generate(8).is_err());
        assert!(generate_safe_prime(15).is_err());
        assert!(DomainParameters::generate(16).is_ok());
    }

    #[test]
    fn test_find_generator_small() {
        // 467 = 2 * 233 + 1
        let p = 467u32.to_biguint().unwrap();
        let q = 233u32.to_biguint().unwrap();
        let g = find_generator(&p, &q).unwrap();
        assert!(DomainParameters::new(p, g).validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let bad_modulus = DomainParameters::new(2u32.into(), 1u32.into());
        assert!(matches!(
            bad_modulus.validate(),
            Err(CryptoError::InvalidParameter(_))
        ));
        assert!(DomainParameters::new(0u32.into(), 2u32.into()).validate().is_err());

        // Same lower bound as key generation
        let smallest = DomainParameters::new(MIN_MODULUS.into(), 2u32.into());
        assert!(smallest.validate().is_ok());
        assert!(KeyPair::generate(&smallest).is_ok());

        let bad_generator = DomainParameters::new(467u32.into(), 467u32.into());
        assert!(bad_generator.validate().is_err());

        let one_generator = DomainParameters::new(467u32.into(), 1u32.into());
        assert!(one_generator.validate().is_err());
    }
}
