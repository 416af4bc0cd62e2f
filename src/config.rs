//! Runtime configuration: where the file adapter reads and writes, and tunables
//!
//! Loaded from TOML; every section and field falls back to its default.
//!
//! ```toml
//! [files]
//! dir = "files"
//!
//! [primality]
//! iterations = 40
//!
//! [signing]
//! max_nonce_attempts = 500
//!
//! [logging]
//! level = "info"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{CryptoError, Result};
use crate::primality::DEFAULT_ITERATIONS;
use crate::types::{ElGamalConfig, DEFAULT_MAX_NONCE_ATTEMPTS};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub files: FileLayout,

    #[serde(default)]
    pub primality: PrimalityConfig,

    #[serde(default)]
    pub signing: SigningConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| CryptoError::MalformedInput(format!("{}: {}", path.display(), e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a string (useful for testing).
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| CryptoError::MalformedInput(format!("<string>: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.primality.iterations == 0 {
            return Err(CryptoError::InvalidParameter(
                "primality.iterations must be positive".to_string(),
            ));
        }
        if self.signing.max_nonce_attempts == 0 {
            return Err(CryptoError::InvalidParameter(
                "signing.max_nonce_attempts must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Settings for [`crate::ElGamal::with_config`]
    pub fn elgamal_config(&self) -> ElGamalConfig {
        ElGamalConfig {
            max_nonce_attempts: self.signing.max_nonce_attempts,
        }
    }
}

/// Names of the files each command reads and writes, relative to `dir`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLayout {
    pub dir: PathBuf,
    pub params: String,
    pub private_key: String,
    pub public_key: String,
    pub plaintext: String,
    pub ciphertext: String,
    pub decrypted: String,
    pub message: String,
    pub signature: String,
    pub verification: String,
    pub primality_input: String,
    pub primality_output: String,
}

impl FileLayout {
    /// Resolve a file name against the layout directory
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

impl Default for FileLayout {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("files"),
            params: "elgamal.txt".to_string(),
            private_key: "private.txt".to_string(),
            public_key: "publicKey.txt".to_string(),
            plaintext: "plain.txt".to_string(),
            ciphertext: "crypto.txt".to_string(),
            decrypted: "decrypt.txt".to_string(),
            message: "message.txt".to_string(),
            signature: "signature.txt".to_string(),
            verification: "verify.txt".to_string(),
            primality_input: "wejscie.txt".to_string(),
            primality_output: "wyjscie.txt".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrimalityConfig {
    #[serde(default = "default_iterations")]
    pub iterations: usize,
}

fn default_iterations() -> usize {
    DEFAULT_ITERATIONS
}

impl Default for PrimalityConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningConfig {
    #[serde(default = "default_max_nonce_attempts")]
    pub max_nonce_attempts: usize,
}

fn default_max_nonce_attempts() -> usize {
    DEFAULT_MAX_NONCE_ATTEMPTS
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            max_nonce_attempts: default_max_nonce_attempts(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}
