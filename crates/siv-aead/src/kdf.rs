//! Per-nonce key derivation for AES-GCM-SIV (RFC 8452 §4).

use aes_core::{Aes, Block, BlockCipher, BLOCK_SIZE};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::Result;
use crate::NONCE_SIZE;

/// Bytes kept from each cipher output; the second half is discarded.
const HALF_BLOCK: usize = BLOCK_SIZE / 2;

/// Message-authentication and message-encryption keys for one nonce.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKeys {
    auth_key: Block,
    enc_key: [u8; 32],
    enc_len: usize,
}

impl DerivedKeys {
    /// POLYVAL key.
    pub fn auth_key(&self) -> &Block {
        &self.auth_key
    }

    /// CTR and tag key, as long as the master key.
    pub fn enc_key(&self) -> &[u8] {
        &self.enc_key[..self.enc_len]
    }
}

/// Derives the per-nonce keys from a 16- or 32-byte master key.
///
/// Counter blocks are `u32le(i) || nonce`; indices 0 and 1 build the
/// authentication key, 2 onward the encryption key, 8 bytes at a time.
pub fn derive_keys(master_key: &[u8], nonce: &[u8; NONCE_SIZE]) -> Result<DerivedKeys> {
    let cipher = Aes::new(master_key)?;
    let mut keys = DerivedKeys {
        auth_key: [0u8; BLOCK_SIZE],
        enc_key: [0u8; 32],
        enc_len: master_key.len(),
    };

    let mut counter = [0u8; BLOCK_SIZE];
    counter[4..].copy_from_slice(nonce);
    let auth_halves = keys.auth_key.chunks_exact_mut(HALF_BLOCK);
    let enc_halves = keys.enc_key[..master_key.len()].chunks_exact_mut(HALF_BLOCK);
    for (index, dst) in auth_halves.chain(enc_halves).enumerate() {
        counter[..4].copy_from_slice(&(index as u32).to_le_bytes());
        let mut out = cipher.encrypt_block(&counter);
        dst.copy_from_slice(&out[..HALF_BLOCK]);
        out.zeroize();
    }
    Ok(keys)
}
