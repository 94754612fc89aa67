//! Misuse-resistant authenticated encryption over AES.
//!
//! Two synthetic-IV constructions share one [`Aead`] contract:
//! - [`AesSiv`]: RFC 5297, keyed by CMAC-based S2V. Deterministic, so repeating
//!   a nonce reveals only that two messages are identical.
//! - [`AesGcmSiv`]: RFC 8452, keyed by POLYVAL with per-nonce subkeys.
//!
//! Both emit `ciphertext || tag` with a 16-byte tag, compare tags in constant
//! time, and never release plaintext whose tag did not verify. All derived
//! key material is local to a call and wiped when it is dropped.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod aead;
mod cmac;
mod ct;
mod error;
mod field;
mod gcm_siv;
mod kdf;
mod polyval;
mod s2v;
mod siv;

/// Tag length for both constructions.
pub const TAG_SIZE: usize = 16;

/// AES-GCM-SIV nonce length.
pub const NONCE_SIZE: usize = 12;

pub use crate::aead::{Aead, Algorithm, NonceSize, UnknownAlgorithm};
pub use crate::cmac::Cmac;
pub use crate::ct::constant_time_eq;
pub use crate::error::{Error, Result};
pub use crate::field::{CmacField, PolyvalField};
pub use crate::gcm_siv::{AesGcmSiv, GCM_SIV_KEY_SIZES, MAX_INPUT_LEN};
pub use crate::kdf::{derive_keys, DerivedKeys};
pub use crate::polyval::{polyval_digest, Polyval};
pub use crate::s2v::{s2v, MAX_COMPONENTS};
pub use crate::siv::{AesSiv, SIV_KEY_SIZES};
