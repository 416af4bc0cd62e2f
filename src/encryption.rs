//! Core ElGamal encryption and decryption operations

use num_bigint::BigUint;
use num_traits::{One, Zero};
use tracing::debug;

use crate::encoding::decode_message;
use crate::error::{CryptoError, Result};
use crate::keys::{PrivateKey, PublicKey};
use crate::params::check_modulus;
use crate::types::{Ciphertext, DecodedMessage, ElGamalConfig};
use crate::utils::{mod_exp, mod_inverse, random_in_range};

/// ElGamal cryptosystem bound to one public key
#[derive(Clone, Debug)]
pub struct ElGamal {
    pub public_key: PublicKey,
    config: ElGamalConfig,
}

impl ElGamal {
    /// Create a new ElGamal instance
    pub fn new(public_key: PublicKey) -> Self {
        Self::with_config(public_key, ElGamalConfig::default())
    }

    /// Create a new ElGamal instance with custom configuration
    pub fn with_config(public_key: PublicKey, config: ElGamalConfig) -> Self {
        ElGamal { public_key, config }
    }

    /// Get the configuration
    pub fn config(&self) -> &ElGamalConfig {
        &self.config
    }

    /// Encrypt a plaintext message `m < p` under a fresh ephemeral exponent
    pub fn encrypt(&self, plaintext: &BigUint) -> Result<Ciphertext> {
        let p = &self.public_key.p;
        if plaintext >= p {
            return Err(CryptoError::MessageTooLarge);
        }
        check_modulus(p)?;

        let k = random_in_range(&BigUint::one(), &(p - 2u32))?;
        self.encrypt_with_randomness(plaintext, &k)
    }

    /// Encrypt with a caller-chosen ephemeral exponent `k` in `[1, p-2]`
    ///
    /// Reusing `k` across messages reveals the ratio of the plaintexts.
    pub fn encrypt_with_randomness(&self, plaintext: &BigUint, k: &BigUint) -> Result<Ciphertext> {
        let p = &self.public_key.p;
        check_modulus(p)?;
        if plaintext >= p {
            return Err(CryptoError::MessageTooLarge);
        }
        if k.is_zero() || k >= &(p - 1u32) {
            return Err(CryptoError::InvalidParameter(
                "Ephemeral exponent k must be in [1, p-2]".to_string(),
            ));
        }

        let c1 = mod_exp(&self.public_key.g, k, p);
        let s = mod_exp(&self.public_key.beta, k, p);
        let c2 = (plaintext * s) % p;

        Ok(Ciphertext::new(c1, c2))
    }

    /// Decrypt a ciphertext using the private key
    pub fn decrypt(&self, ciphertext: &Ciphertext, private_key: &PrivateKey) -> Result<BigUint> {
        if private_key.p != self.public_key.p {
            return Err(CryptoError::InvalidParameter(
                "Private key modulus does not match public key".to_string(),
            ));
        }

        decrypt(ciphertext, private_key)
    }

    /// Decrypt and render the plaintext as text or a numeral
    pub fn decrypt_message(
        &self,
        ciphertext: &Ciphertext,
        private_key: &PrivateKey,
    ) -> Result<DecodedMessage> {
        let m = self.decrypt(ciphertext, private_key)?;
        Ok(decode_message(&m))
    }
}

/// Recover `m = c2 * (c1^b)^-1 mod p`
///
/// Needs only the private key, which carries the modulus.
pub fn decrypt(ciphertext: &Ciphertext, private_key: &PrivateKey) -> Result<BigUint> {
    let p = &private_key.p;
    check_modulus(p)?;

    let s = mod_exp(&ciphertext.c1, &private_key.b, p);
    let s_inv = mod_inverse(&s, p).map_err(|_| {
        debug!("masking value not invertible");
        CryptoError::DecryptionFailure
    })?;

    Ok((&ciphertext.c2 * s_inv) % p)
}
