//! Error types for the number-theoretic core

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CryptoError>;

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("No modular inverse exists: operands are not coprime")]
    NoInverseExists,

    #[error("Message too large for modulus")]
    MessageTooLarge,

    #[error("Invalid key material: {0}")]
    InvalidKeyMaterial(String),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Decryption failed: masking value is not invertible modulo p")]
    DecryptionFailure,

    #[error("Gave up after {attempts} attempts to sample a usable value")]
    KeyGenerationExhausted { attempts: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Empty sampling range: lower bound exceeds upper bound")]
    EmptyRange,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CryptoError {
    /// Whether the error should abort the caller instead of being retried.
    ///
    /// Key material outside its valid range and unreadable input are never
    /// recoverable by resampling.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CryptoError::InvalidKeyMaterial(_) | CryptoError::MalformedInput(_) | CryptoError::Io(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(CryptoError::InvalidKeyMaterial("b out of range".into()).is_fatal());
        assert!(CryptoError::MalformedInput("bad line".into()).is_fatal());
        assert!(!CryptoError::NoInverseExists.is_fatal());
        assert!(!CryptoError::MessageTooLarge.is_fatal());
        assert!(!CryptoError::KeyGenerationExhausted { attempts: 3 }.is_fatal());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: CryptoError = io.into();
        assert!(matches!(err, CryptoError::Io(_)));
        assert!(err.to_string().contains("missing"));
    }
}
