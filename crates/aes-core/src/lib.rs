//! AES block cipher used as the keyed oracle underneath the SIV constructions.
//!
//! This crate follows FIPS-197 directly and provides:
//! - Key schedule for AES-128 and AES-256.
//! - Single-block encryption behind the [`BlockCipher`] trait.
//! - CTR keystream generation with the two counter conventions the SIV
//!   modes need (128-bit big-endian and 32-bit little-endian wrapping).
//!
//! The implementation aims for clarity and testability rather than constant-time
//! table lookups; it should not be treated as cache-timing hardened.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod block;
mod cipher;
mod ctr;
mod key;
mod round;
mod sbox;

pub use crate::block::{xor_in_place, Block, BLOCK_SIZE};
pub use crate::cipher::{encrypt_block, expand_key, Aes, BlockCipher};
pub use crate::ctr::{apply_keystream, Counter};
pub use crate::key::{KeyLengthError, RoundKeys, AES128_KEY_LEN, AES256_KEY_LEN};
