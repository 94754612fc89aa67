//! Key types for AES-128 and AES-256.

use core::fmt;

use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::block::Block;

/// AES-128 key length in bytes.
pub const AES128_KEY_LEN: usize = 16;

/// AES-256 key length in bytes.
pub const AES256_KEY_LEN: usize = 32;

/// Largest round count supported (AES-256).
pub(crate) const MAX_ROUNDS: usize = 14;

/// Rejected AES key length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("AES key must be {AES128_KEY_LEN} or {AES256_KEY_LEN} bytes, got {len}")]
pub struct KeyLengthError {
    /// Length of the rejected key.
    pub len: usize,
}

/// Expanded round keys; wiped from memory when dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct RoundKeys {
    keys: [Block; MAX_ROUNDS + 1],
    rounds: usize,
}

impl RoundKeys {
    pub(crate) fn new(keys: [Block; MAX_ROUNDS + 1], rounds: usize) -> Self {
        Self { keys, rounds }
    }

    /// Number of full rounds (10 for AES-128, 14 for AES-256).
    #[inline]
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Returns the round key at the requested index (`0..=rounds`).
    #[inline]
    pub fn get(&self, round: usize) -> &Block {
        &self.keys[round]
    }
}

impl fmt::Debug for RoundKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoundKeys")
            .field("rounds", &self.rounds)
            .finish_non_exhaustive()
    }
}
