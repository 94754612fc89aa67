//! Error taxonomy shared by both codecs.

use aes_core::{KeyLengthError, AES128_KEY_LEN, AES256_KEY_LEN};
use thiserror::Error;

use crate::TAG_SIZE;

/// Result alias used across the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Failures reported by seal and open.
///
/// None of the variants carries key material or plaintext.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// Key length is not one the construction accepts.
    #[error("invalid key size {len}, expected one of {expected:?}")]
    InvalidKeySize {
        /// Length supplied.
        len: usize,
        /// Lengths accepted.
        expected: &'static [usize],
    },

    /// Nonce length is not one the construction accepts.
    #[error("invalid nonce size {len}, expected {expected}")]
    InvalidNonceSize {
        /// Length supplied.
        len: usize,
        /// Length required.
        expected: usize,
    },

    /// Sealed input is too short to hold a tag.
    #[error("input of {len} bytes is shorter than the {TAG_SIZE}-byte tag")]
    ShortInput {
        /// Length supplied.
        len: usize,
    },

    /// Tag did not verify; no plaintext is released.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Too many associated-data strings for S2V.
    #[error("{count} associated-data components exceed the limit of {max}")]
    InvalidComponentCount {
        /// Components supplied.
        count: usize,
        /// Largest count accepted.
        max: usize,
    },

    /// Plaintext or associated data longer than the construction can process.
    #[error("input of {len} bytes exceeds the limit of {max}")]
    MessageTooLong {
        /// Length supplied.
        len: u64,
        /// Largest length accepted.
        max: u64,
    },
}

impl From<KeyLengthError> for Error {
    fn from(err: KeyLengthError) -> Self {
        Error::InvalidKeySize {
            len: err.len,
            expected: &[AES128_KEY_LEN, AES256_KEY_LEN],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_lengths() {
        let err = Error::InvalidNonceSize {
            len: 8,
            expected: 12,
        };
        assert_eq!(err.to_string(), "invalid nonce size 8, expected 12");
        assert_eq!(
            Error::ShortInput { len: 3 }.to_string(),
            "input of 3 bytes is shorter than the 16-byte tag"
        );
    }

    #[test]
    fn key_length_error_maps_to_aes_sizes() {
        let err: Error = KeyLengthError { len: 24 }.into();
        assert_eq!(
            err,
            Error::InvalidKeySize {
                len: 24,
                expected: &[16, 32]
            }
        );
    }
}
