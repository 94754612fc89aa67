//! POLYVAL universal hash (RFC 8452 §3).

use aes_core::{Block, BLOCK_SIZE};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::field::PolyvalField;

/// Running POLYVAL state: `S_j = dot(S_{j-1} + X_j, H)`.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Polyval {
    h: PolyvalField,
    acc: PolyvalField,
}

impl Polyval {
    /// Starts a hash keyed by `h`.
    pub fn new(h: &Block) -> Self {
        Self {
            h: PolyvalField::from_bytes(h),
            acc: PolyvalField::default(),
        }
    }

    /// Absorbs one full block.
    pub fn update_block(&mut self, block: &Block) {
        self.acc = (self.acc ^ PolyvalField::from_bytes(block)) * self.h;
    }

    /// Absorbs `data`, zero-padding a trailing partial block.
    pub fn update_padded(&mut self, data: &[u8]) {
        let mut chunks = data.chunks_exact(BLOCK_SIZE);
        for chunk in &mut chunks {
            let mut block = [0u8; BLOCK_SIZE];
            block.copy_from_slice(chunk);
            self.update_block(&block);
        }
        let tail = chunks.remainder();
        if !tail.is_empty() {
            let mut block = [0u8; BLOCK_SIZE];
            block[..tail.len()].copy_from_slice(tail);
            self.update_block(&block);
            block.zeroize();
        }
    }

    /// Returns the accumulator.
    pub fn finalize(self) -> Block {
        self.acc.to_bytes()
    }
}

/// POLYVAL over `ad`, `plaintext`, and their bit lengths, as GCM-SIV uses it.
pub fn polyval_digest(auth_key: &Block, ad: &[u8], plaintext: &[u8]) -> Block {
    let mut polyval = Polyval::new(auth_key);
    polyval.update_padded(ad);
    polyval.update_padded(plaintext);

    let mut lengths = [0u8; BLOCK_SIZE];
    lengths[..8].copy_from_slice(&bit_len(ad).to_le_bytes());
    lengths[8..].copy_from_slice(&bit_len(plaintext).to_le_bytes());
    polyval.update_block(&lengths);
    polyval.finalize()
}

fn bit_len(data: &[u8]) -> u64 {
    (data.len() as u64).wrapping_mul(8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(hex_str: &str) -> Block {
        hex::decode(hex_str).unwrap().try_into().unwrap()
    }

    #[test]
    fn matches_rfc8452_appendix_a() {
        let mut polyval = Polyval::new(&block("25629347589242761d31f826ba4b757b"));
        polyval.update_block(&block("4f4f95668c83dfb6401762bb2d01a262"));
        polyval.update_block(&block("d1a24ddd2721d006bbe45f20d3c9f362"));
        assert_eq!(hex::encode(polyval.finalize()), "f7a3b47b846119fae5b7866cf5e5b77e");
    }

    #[test]
    fn padded_update_zero_extends() {
        let h = block("25629347589242761d31f826ba4b757b");
        let mut padded = Polyval::new(&h);
        padded.update_padded(&[0xaa; 20]);
        let mut manual = Polyval::new(&h);
        manual.update_block(&[0xaa; 16]);
        let mut tail = [0u8; 16];
        tail[..4].fill(0xaa);
        manual.update_block(&tail);
        assert_eq!(padded.finalize(), manual.finalize());
    }

    #[test]
    fn empty_input_digest_is_zero() {
        let digest = polyval_digest(&block("d9b360279694941ac5dbc6987ada7377"), b"", b"");
        assert_eq!(digest, [0u8; 16]);
    }
}
