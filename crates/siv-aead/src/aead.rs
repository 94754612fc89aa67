//! The uniform AEAD contract and the registry of supported parameterizations.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::gcm_siv::AesGcmSiv;
use crate::siv::AesSiv;
use crate::NONCE_SIZE;

/// Nonce length a construction requires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NonceSize {
    /// Any length, including empty.
    Any,
    /// Exactly this many bytes.
    Exact(usize),
}

impl NonceSize {
    /// Whether `len` satisfies the requirement.
    pub fn accepts(self, len: usize) -> bool {
        match self {
            NonceSize::Any => true,
            NonceSize::Exact(expected) => len == expected,
        }
    }
}

/// Single-shot authenticated encryption with associated data.
///
/// `seal` returns `ciphertext || tag` with a 16-byte tag; `open` takes that
/// layout back. Parameters are validated before any cryptographic work.
pub trait Aead {
    /// Key lengths accepted, in bytes.
    fn key_sizes(&self) -> &'static [usize];

    /// Nonce length accepted.
    fn nonce_size(&self) -> NonceSize;

    /// Encrypts and authenticates `plaintext`, binding `nonce` and `ad`.
    fn seal(&self, key: &[u8], nonce: &[u8], ad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>>;

    /// Verifies and decrypts `sealed`; no plaintext is returned on failure.
    fn open(&self, key: &[u8], nonce: &[u8], ad: &[u8], sealed: &[u8]) -> Result<Vec<u8>>;
}

/// Named algorithm with one fixed key length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    /// AES-SIV with two AES-128 halves (32-byte key).
    AesSivCmac256,
    /// AES-SIV with two AES-256 halves (64-byte key).
    AesSivCmac512,
    /// AES-GCM-SIV with a 16-byte key.
    Aes128GcmSiv,
    /// AES-GCM-SIV with a 32-byte key.
    Aes256GcmSiv,
}

impl Algorithm {
    /// Every registered algorithm.
    pub const ALL: [Algorithm; 4] = [
        Algorithm::AesSivCmac256,
        Algorithm::AesSivCmac512,
        Algorithm::Aes128GcmSiv,
        Algorithm::Aes256GcmSiv,
    ];

    /// Canonical name.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::AesSivCmac256 => "AES-SIV-CMAC-256",
            Algorithm::AesSivCmac512 => "AES-SIV-CMAC-512",
            Algorithm::Aes128GcmSiv => "AES-128-GCM-SIV",
            Algorithm::Aes256GcmSiv => "AES-256-GCM-SIV",
        }
    }

    /// Key length in bytes.
    pub fn key_len(self) -> usize {
        match self {
            Algorithm::AesSivCmac256 => 32,
            Algorithm::AesSivCmac512 => 64,
            Algorithm::Aes128GcmSiv => 16,
            Algorithm::Aes256GcmSiv => 32,
        }
    }

    /// Required nonce length, or `None` when any length works.
    pub fn nonce_len(self) -> Option<usize> {
        match self.nonce_size() {
            NonceSize::Any => None,
            NonceSize::Exact(len) => Some(len),
        }
    }

    fn construction(self) -> &'static dyn Aead {
        match self {
            Algorithm::AesSivCmac256 | Algorithm::AesSivCmac512 => &AesSiv,
            Algorithm::Aes128GcmSiv | Algorithm::Aes256GcmSiv => &AesGcmSiv,
        }
    }

    fn check_key(self, key: &[u8]) -> Result<()> {
        if key.len() != self.key_len() {
            return Err(Error::InvalidKeySize {
                len: key.len(),
                expected: self.key_sizes(),
            });
        }
        Ok(())
    }
}

impl Aead for Algorithm {
    fn key_sizes(&self) -> &'static [usize] {
        match self {
            Algorithm::AesSivCmac256 => &[32],
            Algorithm::AesSivCmac512 => &[64],
            Algorithm::Aes128GcmSiv => &[16],
            Algorithm::Aes256GcmSiv => &[32],
        }
    }

    fn nonce_size(&self) -> NonceSize {
        match self {
            Algorithm::AesSivCmac256 | Algorithm::AesSivCmac512 => NonceSize::Any,
            Algorithm::Aes128GcmSiv | Algorithm::Aes256GcmSiv => NonceSize::Exact(NONCE_SIZE),
        }
    }

    fn seal(&self, key: &[u8], nonce: &[u8], ad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
        self.check_key(key)?;
        self.construction().seal(key, nonce, ad, plaintext)
    }

    fn open(&self, key: &[u8], nonce: &[u8], ad: &[u8], sealed: &[u8]) -> Result<Vec<u8>> {
        self.check_key(key)?;
        self.construction().open(key, nonce, ad, sealed)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name that does not match any registered algorithm.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown algorithm {0:?}")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|alg| alg.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownAlgorithm(s.to_owned()))
    }
}
