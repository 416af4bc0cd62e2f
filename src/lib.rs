//! # ElGamal and Primality Testing over Arbitrary-Precision Integers
//!
//! This library provides the number-theoretic core of a small cryptography toolkit:
//! - Modular arithmetic primitives (exponentiation, extended Euclid, inverses)
//! - ElGamal key generation, encryption and decryption
//! - ElGamal signatures over SHA-256 digests
//! - Fermat and Miller-Rabin primality tests, with factor recovery
//!
//! All randomness comes from the operating system RNG.
//!
//! ## Example
//!
//! ```rust
//! use ntcrypt::{DomainParameters, ElGamal, KeyPair, SignatureOperations};
//!
//! let params = DomainParameters::new(467u32.into(), 2u32.into());
//! let keypair = KeyPair::generate(&params).unwrap();
//! let elgamal = ElGamal::new(keypair.public_key.clone());
//!
//! let ct = elgamal.encrypt(&123u32.into()).unwrap();
//! let m = elgamal.decrypt(&ct, &keypair.private_key).unwrap();
//! assert_eq!(m.to_string(), "123");
//!
//! let sig = elgamal.sign(&55u32.into(), &keypair.private_key).unwrap();
//! assert!(elgamal.verify(&55u32.into(), &sig));
//! ```

pub mod config;
pub mod encoding;
pub mod encryption;
pub mod error;
pub mod io;
pub mod keys;
pub mod params;
pub mod primality;
pub mod signature;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use config::Config;
pub use encryption::ElGamal;
pub use error::{CryptoError, Result};
pub use keys::{KeyPair, PrivateKey, PublicKey};
pub use params::DomainParameters;
pub use primality::{is_probable_prime, PrimalityTester};
pub use signature::SignatureOperations;
pub use types::{
    Ciphertext, DecodedMessage, ElGamalConfig, PrimalityQuery, PrimalityVerdict, Signature,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::ToBigUint;

    #[test]
    fn test_library_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_basic_workflow() {
        let params = DomainParameters::generate(128).unwrap();
        let keypair = KeyPair::generate(&params).unwrap();
        let elgamal = ElGamal::new(keypair.public_key.clone());

        let m = 42u32.to_biguint().unwrap();
        let ct = elgamal.encrypt(&m).unwrap();
        let decrypted = elgamal.decrypt(&ct, &keypair.private_key).unwrap();

        assert_eq!(m, decrypted);
        assert!(is_probable_prime(params.modulus(), 20));
    }
}
