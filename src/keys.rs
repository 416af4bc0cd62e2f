//! Key generation and management

use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::error::{CryptoError, Result};
use crate::params::{check_modulus, DomainParameters};
use crate::utils::{mod_exp, random_in_range};

/// ElGamal public key
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    pub(crate) p: BigUint,    // Prime modulus
    pub(crate) g: BigUint,    // Generator
    pub(crate) beta: BigUint, // g^b mod p
}

impl PublicKey {
    /// Create a new public key
    pub fn new(p: BigUint, g: BigUint, beta: BigUint) -> Self {
        PublicKey { p, g, beta }
    }

    /// Rebuild from `[p, g, beta]` as stored by the file adapter
    pub fn from_components(values: &[BigUint]) -> Result<Self> {
        match values {
            [p, g, beta] => {
                check_modulus(p)?;
                Ok(PublicKey::new(p.clone(), g.clone(), beta.clone()))
            }
            _ => Err(CryptoError::MalformedInput(format!(
                "Public key needs 3 values, got {}",
                values.len()
            ))),
        }
    }

    /// Get the prime modulus
    pub fn modulus(&self) -> &BigUint {
        &self.p
    }

    /// Get the generator
    pub fn generator(&self) -> &BigUint {
        &self.g
    }

    /// Get the public component (g^b mod p)
    pub fn public_component(&self) -> &BigUint {
        &self.beta
    }

    /// Get the bit size of the modulus
    pub fn bit_size(&self) -> u64 {
        self.p.bits()
    }

    /// Validate the public key
    pub fn validate(&self) -> Result<()> {
        DomainParameters::new(self.p.clone(), self.g.clone()).validate()?;

        if self.beta.is_zero() || self.beta >= self.p {
            return Err(CryptoError::InvalidParameter(
                "Public component beta must be in range (0, p)".to_string(),
            ));
        }

        Ok(())
    }

    /// `[p, g, beta]` in storage order
    pub fn to_components(&self) -> Vec<BigUint> {
        vec![self.p.clone(), self.g.clone(), self.beta.clone()]
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({} bits)", self.bit_size())
    }
}

/// ElGamal private key
///
/// Carries the domain parameters so decryption and signing need nothing else.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateKey {
    pub(crate) p: BigUint,
    pub(crate) g: BigUint,
    pub(crate) b: BigUint, // Secret exponent
}

impl PrivateKey {
    /// Create a new private key
    pub fn new(p: BigUint, g: BigUint, b: BigUint) -> Self {
        PrivateKey { p, g, b }
    }

    /// Rebuild from `[p, g, b]` as stored by the file adapter
    pub fn from_components(values: &[BigUint]) -> Result<Self> {
        match values {
            [p, g, b] => {
                check_modulus(p)?;
                Ok(PrivateKey::new(p.clone(), g.clone(), b.clone()))
            }
            _ => Err(CryptoError::MalformedInput(format!(
                "Private key needs 3 values, got {}",
                values.len()
            ))),
        }
    }

    pub fn modulus(&self) -> &BigUint {
        &self.p
    }

    pub fn generator(&self) -> &BigUint {
        &self.g
    }

    /// Get the secret exponent
    pub fn secret_exponent(&self) -> &BigUint {
        &self.b
    }

    /// Derive the matching public key
    pub fn public_key(&self) -> Result<PublicKey> {
        check_modulus(&self.p)?;
        let beta = mod_exp(&self.g, &self.b, &self.p);
        Ok(PublicKey::new(self.p.clone(), self.g.clone(), beta))
    }

    /// `[p, g, b]` in storage order
    pub fn to_components(&self) -> Vec<BigUint> {
        vec![self.p.clone(), self.g.clone(), self.b.clone()]
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("p", &self.p)
            .field("g", &self.g)
            .field("b", &"***")
            .finish()
    }
}

impl fmt::Display for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey(***)")
    }
}

/// ElGamal key pair
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeyPair {
    pub public_key: PublicKey,
    pub private_key: PrivateKey,
}

impl KeyPair {
    /// Generate a key pair over caller-supplied domain parameters
    ///
    /// `p` and `g` are trusted as given; only `p >= 3` is required so the
    /// exponent range `[1, p-2]` is non-empty.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ntcrypt::{DomainParameters, KeyPair};
    ///
    /// let params = DomainParameters::new(467u32.into(), 2u32.into());
    /// let keypair = KeyPair::generate(&params).expect("Failed to generate keys");
    /// ```
    pub fn generate(params: &DomainParameters) -> Result<Self> {
        let p = &params.p;
        check_modulus(p)?;

        // Secret exponent b uniformly from [1, p-2]
        let b = random_in_range(&BigUint::one(), &(p - 2u32))?;
        let beta = mod_exp(&params.g, &b, p);

        let keypair = KeyPair {
            public_key: PublicKey::new(p.clone(), params.g.clone(), beta),
            private_key: PrivateKey::new(p.clone(), params.g.clone(), b),
        };
        keypair.check_ranges()?;

        debug!(bits = keypair.bit_size(), "generated key pair");
        Ok(keypair)
    }

    /// Create a key pair from existing components
    pub fn from_components(p: BigUint, g: BigUint, b: BigUint) -> Result<Self> {
        let private_key = PrivateKey::new(p, g, b);
        let keypair = KeyPair {
            public_key: private_key.public_key()?,
            private_key,
        };
        keypair.check_ranges()?;

        Ok(keypair)
    }

    /// Get the bit size of the keys
    pub fn bit_size(&self) -> u64 {
        self.public_key.bit_size()
    }

    /// 0 < b < p - 1 and beta < p
    fn check_ranges(&self) -> Result<()> {
        let p = &self.private_key.p;
        let b = &self.private_key.b;

        if b.is_zero() || b >= &(p - 1u32) {
            return Err(CryptoError::InvalidKeyMaterial(
                "Secret exponent outside [1, p-2]".to_string(),
            ));
        }

        if &self.public_key.beta >= p {
            return Err(CryptoError::InvalidKeyMaterial(
                "Public component not reduced modulo p".to_string(),
            ));
        }

        Ok(())
    }
}

impl fmt::Display for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyPair({} bits)", self.bit_size())
    }
}
