//! ElGamal signatures over message digests
//!
//! Signatures are always computed over a digest integer. The `*_message`
//! helpers hash with SHA-256 first so signer and verifier agree on it.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use tracing::{debug, warn};

use crate::encoding::digest_to_integer;
use crate::encryption::ElGamal;
use crate::error::{CryptoError, Result};
use crate::keys::PrivateKey;
use crate::params::check_modulus;
use crate::types::Signature;
use crate::utils::{is_coprime, mod_exp, mod_inverse, random_in_range};

/// Trait for signing and verification
pub trait SignatureOperations {
    /// Sign a digest with a fresh nonce coprime to p-1
    fn sign(&self, digest: &BigUint, private_key: &PrivateKey) -> Result<Signature>;

    /// Sign with a caller-chosen nonce `k` in `[1, p-2]` with `gcd(k, p-1) = 1`
    fn sign_with_nonce(
        &self,
        digest: &BigUint,
        k: &BigUint,
        private_key: &PrivateKey,
    ) -> Result<Signature>;

    /// Check `g^m == r^x * beta^r (mod p)`
    fn verify(&self, digest: &BigUint, signature: &Signature) -> bool;

    /// Hash `message` with SHA-256 and sign the digest
    fn sign_message(&self, message: &[u8], private_key: &PrivateKey) -> Result<Signature> {
        self.sign(&digest_to_integer(message), private_key)
    }

    /// Hash `message` with SHA-256 and verify against the digest
    fn verify_message(&self, message: &[u8], signature: &Signature) -> bool {
        self.verify(&digest_to_integer(message), signature)
    }
}

impl SignatureOperations for ElGamal {
    fn sign(&self, digest: &BigUint, private_key: &PrivateKey) -> Result<Signature> {
        let p = &private_key.p;
        check_modulus(p)?;

        let p_minus_1 = p - 1u32;
        let p_minus_2 = p - 2u32;
        let attempts = self.config().max_nonce_attempts;

        for attempt in 0..attempts {
            let k = random_in_range(&BigUint::one(), &p_minus_2)?;
            if !is_coprime(&k, &p_minus_1) {
                continue;
            }

            debug!(attempt, "sampled signing nonce");
            return self.sign_with_nonce(digest, &k, private_key);
        }

        warn!(attempts, "no nonce coprime to p-1 found");
        Err(CryptoError::KeyGenerationExhausted { attempts })
    }

    fn sign_with_nonce(
        &self,
        digest: &BigUint,
        k: &BigUint,
        private_key: &PrivateKey,
    ) -> Result<Signature> {
        let p = &private_key.p;
        if p != &self.public_key.p {
            return Err(CryptoError::InvalidParameter(
                "Private key modulus does not match public key".to_string(),
            ));
        }
        check_modulus(p)?;

        let n = p - 1u32;
        if k.is_zero() || k >= &n {
            return Err(CryptoError::InvalidParameter(
                "Nonce k must be in [1, p-2]".to_string(),
            ));
        }

        let k_inv = mod_inverse(k, &n)?;
        let r = mod_exp(&private_key.g, k, p);

        // x = (m - b*r) * k^-1 mod (p-1), kept non-negative
        let m = digest % &n;
        let br = (&private_key.b * &r) % &n;
        let diff = (m + &n - br) % &n;
        let x = (diff * k_inv) % &n;

        Ok(Signature::new(r, x))
    }

    fn verify(&self, digest: &BigUint, signature: &Signature) -> bool {
        let p = &self.public_key.p;

        if signature.r.is_zero() || &signature.r >= p {
            return false;
        }

        let lhs = mod_exp(&self.public_key.g, digest, p);
        let r_x = mod_exp(&signature.r, &signature.x, p);
        let beta_r = mod_exp(&self.public_key.beta, &signature.r, p);
        let rhs = (r_x * beta_r) % p;

        lhs == rhs
    }
}
