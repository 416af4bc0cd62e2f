//! Core types and data structures

use num_bigint::BigUint;
use std::fmt;

use serde::{Deserialize, Serialize};

/// ElGamal ciphertext (c1, c2)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ciphertext {
    pub(crate) c1: BigUint,
    pub(crate) c2: BigUint,
}

impl Ciphertext {
    /// Create a new ciphertext
    pub fn new(c1: BigUint, c2: BigUint) -> Self {
        Ciphertext { c1, c2 }
    }

    /// Get the first component (g^k mod p)
    pub fn c1(&self) -> &BigUint {
        &self.c1
    }

    /// Get the second component (m * beta^k mod p)
    pub fn c2(&self) -> &BigUint {
        &self.c2
    }

    /// Both components in storage order
    pub fn to_components(&self) -> Vec<BigUint> {
        vec![self.c1.clone(), self.c2.clone()]
    }

    /// Get the size in bytes
    pub fn size_bytes(&self) -> usize {
        self.c1.to_bytes_be().len() + self.c2.to_bytes_be().len()
    }
}

impl fmt::Display for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ciphertext({} bytes)", self.size_bytes())
    }
}

/// ElGamal signature (r, x)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub(crate) r: BigUint,
    pub(crate) x: BigUint,
}

impl Signature {
    pub fn new(r: BigUint, x: BigUint) -> Self {
        Signature { r, x }
    }

    /// Commitment r = g^k mod p
    pub fn r(&self) -> &BigUint {
        &self.r
    }

    /// Response x = (m - b*r) * k^-1 mod (p-1)
    pub fn x(&self) -> &BigUint {
        &self.x
    }

    pub fn to_components(&self) -> Vec<BigUint> {
        vec![self.r.clone(), self.x.clone()]
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature(r: {}, x: {})", self.r, self.x)
    }
}

/// A decrypted plaintext rendered for output.
///
/// Printable ASCII is a presentation convenience only: a number whose
/// big-endian bytes happen to be printable is shown as text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodedMessage {
    /// Every byte of the big-endian encoding is in 32..=126
    Text(String),
    /// Anything else, rendered as a decimal numeral
    Number(BigUint),
}

impl fmt::Display for DecodedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedMessage::Text(text) => write!(f, "{}", text),
            DecodedMessage::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Outcome of a probabilistic primality test
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimalityVerdict {
    /// Every round passed
    ProbablyPrime,
    /// A witness proved compositeness, possibly exposing a nontrivial factor
    Composite { factor: Option<BigUint> },
}

impl PrimalityVerdict {
    pub fn is_probably_prime(&self) -> bool {
        matches!(self, PrimalityVerdict::ProbablyPrime)
    }

    pub fn is_composite(&self) -> bool {
        !self.is_probably_prime()
    }

    /// The nontrivial factor exposed by the witness, if any
    pub fn factor(&self) -> Option<&BigUint> {
        match self {
            PrimalityVerdict::Composite { factor } => factor.as_ref(),
            PrimalityVerdict::ProbablyPrime => None,
        }
    }
}

impl fmt::Display for PrimalityVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimalityVerdict::ProbablyPrime => write!(f, "probably prime"),
            PrimalityVerdict::Composite { factor: None } => write!(f, "composite"),
            PrimalityVerdict::Composite {
                factor: Some(factor),
            } => write!(f, "composite (factor: {})", factor),
        }
    }
}

/// Number under test plus an optional exponent replacing `n - 1`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimalityQuery {
    pub n: BigUint,
    /// Universal exponent, e.g. `e*d - 1` for an RSA modulus
    pub exponent: Option<BigUint>,
}

impl PrimalityQuery {
    pub fn new(n: BigUint) -> Self {
        PrimalityQuery { n, exponent: None }
    }

    pub fn with_exponent(n: BigUint, exponent: BigUint) -> Self {
        PrimalityQuery {
            n,
            exponent: Some(exponent),
        }
    }
}

/// Default cap on nonce draws while signing
pub const DEFAULT_MAX_NONCE_ATTEMPTS: usize = 500;

/// Configuration for ElGamal operations
#[derive(Clone, Debug)]
pub struct ElGamalConfig {
    /// Draws of k allowed before signing gives up on finding one coprime to p-1
    pub max_nonce_attempts: usize,
}

impl Default for ElGamalConfig {
    fn default() -> Self {
        ElGamalConfig {
            max_nonce_attempts: DEFAULT_MAX_NONCE_ATTEMPTS,
        }
    }
}
