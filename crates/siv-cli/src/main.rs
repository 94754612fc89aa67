//! Command-line interface for the SIV AEAD engine.

#![forbid(unsafe_code)]

mod selftest;

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use siv_aead::{Aead, Algorithm};
use siv_envelope::Envelope;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

/// Misuse-resistant AEAD CLI.
#[derive(Parser)]
#[command(
    name = "sivtool",
    version,
    author,
    about = "Seal and open files with AES-SIV (RFC 5297) and AES-GCM-SIV (RFC 8452)"
)]
struct Cli {
    /// Log filter used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a random key for an algorithm as hex.
    Keygen {
        /// Algorithm name, e.g. AES-SIV-CMAC-256 or AES-256-GCM-SIV.
        #[arg(long, value_name = "NAME")]
        algorithm: Algorithm,
        /// Optional RNG seed for reproducible keys (testing only).
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Seal a file into an envelope.
    Seal {
        /// Algorithm name.
        #[arg(long, value_name = "NAME")]
        algorithm: Algorithm,
        /// Key as hex.
        #[arg(long, value_name = "HEX")]
        key_hex: String,
        /// Nonce as hex; random for GCM-SIV and empty for SIV when omitted.
        #[arg(long, value_name = "HEX")]
        nonce_hex: Option<String>,
        /// Associated data to authenticate alongside the file.
        #[arg(long, default_value = "")]
        ad: String,
        /// Plaintext input file.
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        /// Envelope output path.
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Open an envelope back into plaintext.
    Open {
        /// Key as hex.
        #[arg(long, value_name = "HEX")]
        key_hex: String,
        /// Envelope input file.
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        /// Plaintext output path.
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Run the RFC 5297 and RFC 8452 known-answer checks.
    Selftest,
    /// Seal and open random data with every algorithm.
    Demo {
        /// Optional RNG seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;
    match cli.command {
        Commands::Keygen { algorithm, seed } => cmd_keygen(algorithm, seed),
        Commands::Seal {
            algorithm,
            key_hex,
            nonce_hex,
            ad,
            input,
            output,
        } => cmd_seal(algorithm, &key_hex, nonce_hex.as_deref(), &ad, &input, &output),
        Commands::Open {
            key_hex,
            input,
            output,
        } => cmd_open(&key_hex, &input, &output),
        Commands::Selftest => cmd_selftest(),
        Commands::Demo { seed } => cmd_demo(seed),
    }
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise tracing subscriber: {e}"))
}

fn cmd_keygen(algorithm: Algorithm, seed: Option<u64>) -> Result<()> {
    let mut rng = seeded_rng(seed);
    let mut key = Zeroizing::new(vec![0u8; algorithm.key_len()]);
    rng.fill_bytes(&mut key);
    println!("{}", hex::encode(&*key));
    Ok(())
}

fn cmd_seal(
    algorithm: Algorithm,
    key_hex: &str,
    nonce_hex: Option<&str>,
    ad: &str,
    input_path: &PathBuf,
    output_path: &PathBuf,
) -> Result<()> {
    let key = parse_key_hex(key_hex, algorithm)?;
    let nonce = match nonce_hex {
        Some(value) => hex::decode(value.trim()).context("decode nonce hex")?,
        None => fresh_nonce(algorithm, &mut seeded_rng(None)),
    };
    let plaintext = Zeroizing::new(
        fs::read(input_path).with_context(|| format!("read {}", input_path.display()))?,
    );

    let envelope = Envelope::seal(algorithm, &key, &nonce, ad.as_bytes(), &plaintext)
        .context("seal input")?;
    let bytes = envelope.to_bytes().context("serialize envelope")?;
    fs::write(output_path, bytes).with_context(|| format!("write {}", output_path.display()))?;
    info!(%algorithm, input = %input_path.display(), "sealed");
    Ok(())
}

fn cmd_open(key_hex: &str, input_path: &PathBuf, output_path: &PathBuf) -> Result<()> {
    let bytes = fs::read(input_path).with_context(|| format!("read {}", input_path.display()))?;
    let envelope = Envelope::from_bytes(&bytes).context("deserialize envelope")?;
    let key = parse_key_hex(key_hex, envelope.algorithm)?;
    let plaintext = Zeroizing::new(envelope.open(&key).context("open envelope")?);
    fs::write(output_path, &*plaintext)
        .with_context(|| format!("write {}", output_path.display()))?;
    info!(algorithm = %envelope.algorithm, output = %output_path.display(), "opened");
    Ok(())
}

fn cmd_selftest() -> Result<()> {
    for name in selftest::run()? {
        println!("ok: {name}");
    }
    Ok(())
}

fn cmd_demo(seed: Option<u64>) -> Result<()> {
    let mut rng = seeded_rng(seed);
    let mut plaintext = [0u8; 48];
    rng.fill_bytes(&mut plaintext);
    println!("plaintext: {}", hex::encode(plaintext));

    for algorithm in Algorithm::ALL {
        let mut key = Zeroizing::new(vec![0u8; algorithm.key_len()]);
        rng.fill_bytes(&mut key);
        let nonce = fresh_nonce(algorithm, &mut rng);

        let sealed = algorithm.seal(&key, &nonce, b"demo", &plaintext)?;
        let opened = algorithm.open(&key, &nonce, b"demo", &sealed)?;
        println!("{algorithm}: {}", hex::encode(&sealed));
        if opened != plaintext {
            bail!("{algorithm} demo roundtrip failed");
        }

        let mut tampered = sealed.clone();
        tampered[0] ^= 1;
        if algorithm.open(&key, &nonce, b"demo", &tampered).is_ok() {
            bail!("{algorithm} accepted a tampered ciphertext");
        }
        debug!(%algorithm, "demo roundtrip ok");
    }
    Ok(())
}

fn parse_key_hex(hex_str: &str, algorithm: Algorithm) -> Result<Zeroizing<Vec<u8>>> {
    let bytes = Zeroizing::new(hex::decode(hex_str.trim()).context("decode key hex")?);
    if bytes.len() != algorithm.key_len() {
        bail!(
            "{algorithm} key must be {} bytes ({} hex characters)",
            algorithm.key_len(),
            algorithm.key_len() * 2
        );
    }
    Ok(bytes)
}

/// Random nonce for GCM-SIV; SIV runs without one unless the caller supplies it.
fn fresh_nonce(algorithm: Algorithm, rng: &mut impl RngCore) -> Vec<u8> {
    match algorithm.nonce_len() {
        Some(len) => {
            let mut nonce = vec![0u8; len];
            rng.fill_bytes(&mut nonce);
            nonce
        }
        None => Vec::new(),
    }
}

fn seeded_rng(seed: Option<u64>) -> impl RngCore + CryptoRng {
    match seed {
        Some(value) => {
            let mut seed_bytes = [0u8; 32];
            seed_bytes[..8].copy_from_slice(&value.to_le_bytes());
            ChaCha20Rng::from_seed(seed_bytes)
        }
        None => {
            let mut seed_bytes = [0u8; 32];
            rand::rngs::OsRng.fill_bytes(&mut seed_bytes);
            ChaCha20Rng::from_seed(seed_bytes)
        }
    }
}
