//! Sealed message container.
//!
//! An [`Envelope`] records the algorithm, nonce and associated data next to
//! the `ciphertext || tag` so that a holder of the key can open it without
//! out-of-band parameters. Envelopes serialize with `bincode`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

use serde::{Deserialize, Serialize};
use siv_aead::{Aead, Algorithm};
use thiserror::Error;
use tracing::debug;

/// Current envelope format version.
pub const ENVELOPE_VERSION: u8 = 1;

/// Failures while sealing, opening or decoding an envelope.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// The AEAD layer rejected the parameters or the tag.
    #[error(transparent)]
    Aead(#[from] siv_aead::Error),

    /// Bytes are not a well-formed envelope.
    #[error("malformed envelope: {0}")]
    Decode(#[from] bincode::Error),

    /// Envelope was written by an unknown format version.
    #[error("unsupported envelope version {0}")]
    UnsupportedVersion(u8),
}

/// A sealed message and everything needed to open it except the key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Format version.
    pub version: u8,
    /// Algorithm that produced `sealed`.
    pub algorithm: Algorithm,
    /// Nonce, possibly empty for AES-SIV.
    pub nonce: Vec<u8>,
    /// Associated data, authenticated but stored in the clear.
    pub associated_data: Vec<u8>,
    /// `ciphertext || tag`.
    pub sealed: Vec<u8>,
}

impl Envelope {
    /// Seals `plaintext` under `key`.
    pub fn seal(
        algorithm: Algorithm,
        key: &[u8],
        nonce: &[u8],
        associated_data: &[u8],
        plaintext: &[u8],
    ) -> Result<Self, EnvelopeError> {
        let sealed = algorithm.seal(key, nonce, associated_data, plaintext)?;
        debug!(%algorithm, sealed_len = sealed.len(), "sealed envelope");
        Ok(Self {
            version: ENVELOPE_VERSION,
            algorithm,
            nonce: nonce.to_vec(),
            associated_data: associated_data.to_vec(),
            sealed,
        })
    }

    /// Verifies and decrypts the envelope.
    pub fn open(&self, key: &[u8]) -> Result<Vec<u8>, EnvelopeError> {
        self.check_version()?;
        let plaintext = self
            .algorithm
            .open(key, &self.nonce, &self.associated_data, &self.sealed)?;
        debug!(algorithm = %self.algorithm, "opened envelope");
        Ok(plaintext)
    }

    /// Serializes the envelope with `bincode`.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EnvelopeError> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserializes an envelope with `bincode`, rejecting unknown versions.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        let envelope: Self = bincode::deserialize(bytes)?;
        envelope.check_version()?;
        Ok(envelope)
    }

    fn check_version(&self) -> Result<(), EnvelopeError> {
        if self.version != ENVELOPE_VERSION {
            return Err(EnvelopeError::UnsupportedVersion(self.version));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    fn sample(algorithm: Algorithm) -> (Vec<u8>, Envelope) {
        let mut rng = ChaCha20Rng::from_seed([9u8; 32]);
        let mut key = vec![0u8; algorithm.key_len()];
        rng.fill_bytes(&mut key);
        let nonce = vec![0x01u8; algorithm.nonce_len().unwrap_or(0)];
        let envelope = Envelope::seal(algorithm, &key, &nonce, b"file.txt", b"contents").unwrap();
        (key, envelope)
    }

    #[test]
    fn serialize_roundtrip() {
        for algorithm in Algorithm::ALL {
            let (key, envelope) = sample(algorithm);
            let bytes = envelope.to_bytes().expect("serialize");
            let decoded = Envelope::from_bytes(&bytes).expect("deserialize");
            assert_eq!(decoded, envelope);
            assert_eq!(decoded.open(&key).unwrap(), b"contents");
        }
    }

    #[test]
    fn tampered_associated_data_fails() {
        let (key, mut envelope) = sample(Algorithm::Aes256GcmSiv);
        envelope.associated_data = b"other.txt".to_vec();
        assert!(matches!(
            envelope.open(&key),
            Err(EnvelopeError::Aead(siv_aead::Error::AuthenticationFailed))
        ));
    }

    #[test]
    fn rejects_unknown_version_and_garbage() {
        let (_, mut envelope) = sample(Algorithm::AesSivCmac256);
        envelope.version = 7;
        let bytes = bincode::serialize(&envelope).unwrap();
        assert!(matches!(
            Envelope::from_bytes(&bytes),
            Err(EnvelopeError::UnsupportedVersion(7))
        ));
        assert!(matches!(
            Envelope::from_bytes(&[0xff, 0x00]),
            Err(EnvelopeError::Decode(_))
        ));
    }
}
