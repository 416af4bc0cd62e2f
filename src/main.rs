//! `ntcrypt` command-line front end.
//!
//! Each subcommand reads its inputs from the configured file layout,
//! calls into the library and writes its results back as files:
//!
//! ```bash
//! ntcrypt params --bits 256     # p, g      -> files/elgamal.txt
//! ntcrypt keys                  # p, g, b   -> files/private.txt, p, g, beta -> files/publicKey.txt
//! ntcrypt encrypt --text "hi"   # c1, c2    -> files/crypto.txt
//! ntcrypt decrypt               # message   -> files/decrypt.txt
//! ntcrypt sign                  # r, x      -> files/signature.txt
//! ntcrypt verify                # verdict   -> files/verify.txt
//! ntcrypt miller-rabin          # verdict   -> files/wyjscie.txt
//! ntcrypt fermat
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ntcrypt::encoding::encode_message;
use ntcrypt::io::{
    read_integers, read_primality_query, read_text, write_integers, write_text,
};
use ntcrypt::{
    Ciphertext, Config, CryptoError, DomainParameters, ElGamal, KeyPair, PrimalityTester, PrivateKey,
    PublicKey, Signature, SignatureOperations,
};

#[derive(Parser, Debug)]
#[command(name = "ntcrypt")]
#[command(author, version, about = "ElGamal encryption, signatures and primality tests", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "ntcrypt.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a safe prime p and a generator g
    Params {
        /// Bit length of p
        #[arg(short, long, default_value_t = 256)]
        bits: u64,
    },

    /// Generate a key pair from the stored p and g
    Keys,

    /// Encrypt the plaintext integer with the public key
    Encrypt {
        /// Encode this text into the plaintext file first
        #[arg(short, long)]
        text: Option<String>,
    },

    /// Decrypt the ciphertext with the private key
    Decrypt,

    /// Sign the SHA-256 digest of the message file
    Sign {
        /// Write this text to the message file first
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Verify the stored signature over the message file
    Verify,

    /// Fermat test on the number in the primality input file
    Fermat,

    /// Miller-Rabin test, optionally with a universal exponent
    MillerRabin,
}

fn main() {
    let cli = Cli::parse();

    let config = match Config::load_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            init_logging("info");
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.logging.level);

    if let Err(e) = run(cli.command, &config) {
        error!("{:#}", e);

        let recoverable = e
            .chain()
            .find_map(|cause| cause.downcast_ref::<CryptoError>())
            .is_some_and(|cause| !cause.is_fatal());
        if recoverable {
            warn!("The operation may succeed if retried");
        }

        std::process::exit(1);
    }
}

fn run(command: Commands, config: &Config) -> anyhow::Result<()> {
    match command {
        Commands::Params { bits } => cmd_params(config, bits),
        Commands::Keys => cmd_keys(config),
        Commands::Encrypt { text } => cmd_encrypt(config, text),
        Commands::Decrypt => cmd_decrypt(config),
        Commands::Sign { message } => cmd_sign(config, message),
        Commands::Verify => cmd_verify(config),
        Commands::Fermat => cmd_fermat(config),
        Commands::MillerRabin => cmd_miller_rabin(config),
    }
}

fn cmd_params(config: &Config, bits: u64) -> anyhow::Result<()> {
    let files = &config.files;
    let params = DomainParameters::generate(bits)?;

    write_integers(files.path(&files.params), &params.to_components())?;
    info!("{} written to {}", params, files.params);
    Ok(())
}

fn cmd_keys(config: &Config) -> anyhow::Result<()> {
    let files = &config.files;
    let values = read_integers(files.path(&files.params), 2).context("reading p and g")?;
    let params = DomainParameters::new(values[0].clone(), values[1].clone());

    let keypair = KeyPair::generate(&params)?;

    write_integers(files.path(&files.private_key), &keypair.private_key.to_components())?;
    write_integers(files.path(&files.public_key), &keypair.public_key.to_components())?;
    info!("Keys have been successfully created ({})", keypair);
    Ok(())
}

fn cmd_encrypt(config: &Config, text: Option<String>) -> anyhow::Result<()> {
    let files = &config.files;
    let plaintext_path = files.path(&files.plaintext);

    if let Some(text) = text {
        write_integers(&plaintext_path, &[encode_message(&text)])?;
    }

    let m = read_integers(&plaintext_path, 1).context("reading plaintext")?;
    let public_key = load_public_key(config)?;

    let ciphertext = ElGamal::new(public_key).encrypt(&m[0])?;

    write_integers(files.path(&files.ciphertext), &ciphertext.to_components())?;
    info!("Text successfully encrypted into {}", files.ciphertext);
    Ok(())
}

fn cmd_decrypt(config: &Config) -> anyhow::Result<()> {
    let files = &config.files;
    let values = read_integers(files.path(&files.ciphertext), 2).context("reading ciphertext")?;
    let ciphertext = Ciphertext::new(values[0].clone(), values[1].clone());
    let private_key = load_private_key(config)?;

    let elgamal = ElGamal::new(private_key.public_key()?);
    let message = elgamal.decrypt_message(&ciphertext, &private_key)?;

    write_text(files.path(&files.decrypted), &message.to_string())?;
    info!("Text successfully decrypted into {}", files.decrypted);
    Ok(())
}

fn cmd_sign(config: &Config, message: Option<String>) -> anyhow::Result<()> {
    let files = &config.files;
    let message_path = files.path(&files.message);

    if let Some(message) = message {
        write_text(&message_path, &message)?;
    }

    let message = read_text(&message_path).context("reading message")?;
    let private_key = load_private_key(config)?;

    let elgamal = ElGamal::with_config(private_key.public_key()?, config.elgamal_config());
    let signature = elgamal.sign_message(message.as_bytes(), &private_key)?;

    write_integers(files.path(&files.signature), &signature.to_components())?;
    info!("Message successfully signed into {}", files.signature);
    Ok(())
}

fn cmd_verify(config: &Config) -> anyhow::Result<()> {
    let files = &config.files;
    let message = read_text(files.path(&files.message)).context("reading message")?;
    let values = read_integers(files.path(&files.signature), 2).context("reading signature")?;
    let signature = Signature::new(values[0].clone(), values[1].clone());
    let public_key = load_public_key(config)?;

    let valid = ElGamal::new(public_key).verify_message(message.as_bytes(), &signature);
    let verdict = if valid { "valid" } else { "invalid" };

    write_text(files.path(&files.verification), verdict)?;
    info!("Signature is {}", verdict);
    Ok(())
}

fn cmd_fermat(config: &Config) -> anyhow::Result<()> {
    let files = &config.files;
    let query = read_primality_query(files.path(&files.primality_input))
        .context("reading primality input")?;
    let tester = PrimalityTester::new(config.primality.iterations)?;

    let verdict = if tester.fermat_test(&query.n)? {
        "probably prime"
    } else {
        "composite"
    };

    write_text(files.path(&files.primality_output), verdict)?;
    info!("Fermat test result for {}: {}", query.n, verdict);
    Ok(())
}

fn cmd_miller_rabin(config: &Config) -> anyhow::Result<()> {
    let files = &config.files;
    let query = read_primality_query(files.path(&files.primality_input))
        .context("reading primality input")?;
    let tester = PrimalityTester::new(config.primality.iterations)?;

    let verdict = tester.test_query(&query)?;

    // A recovered factor is reported on its own
    let report = match verdict.factor() {
        Some(factor) => factor.to_string(),
        None => verdict.to_string(),
    };

    write_text(files.path(&files.primality_output), &report)?;
    info!("Miller-Rabin result for {}: {}", query.n, verdict);
    Ok(())
}

fn load_public_key(config: &Config) -> anyhow::Result<PublicKey> {
    let files = &config.files;
    let values = read_integers(files.path(&files.public_key), 3).context("reading public key")?;
    Ok(PublicKey::from_components(&values)?)
}

fn load_private_key(config: &Config) -> anyhow::Result<PrivateKey> {
    let files = &config.files;
    let values = read_integers(files.path(&files.private_key), 3).context("reading private key")?;
    Ok(PrivateKey::from_components(&values)?)
}

/// Initializes the tracing subscriber.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .try_init()
        .ok();
}
