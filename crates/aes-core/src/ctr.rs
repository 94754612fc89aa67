//! Counter-mode keystream over a [`BlockCipher`].

use zeroize::Zeroizing;

use crate::block::{Block, BLOCK_SIZE};
use crate::cipher::BlockCipher;

/// How the counter block advances between keystream blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Counter {
    /// The whole block is a big-endian 128-bit integer.
    Be128,
    /// Bytes `0..4` are a little-endian `u32` that wraps modulo 2^32; the rest is fixed.
    Le32,
}

impl Counter {
    fn advance(self, block: &mut Block) {
        match self {
            Counter::Be128 => {
                let next = u128::from_be_bytes(*block).wrapping_add(1);
                *block = next.to_be_bytes();
            }
            Counter::Le32 => {
                let next = u32::from_le_bytes([block[0], block[1], block[2], block[3]])
                    .wrapping_add(1);
                block[..4].copy_from_slice(&next.to_le_bytes());
            }
        }
    }
}

/// XORs the keystream seeded at `initial` into `data`.
///
/// The last, possibly partial, chunk consumes only the prefix of its keystream block.
pub fn apply_keystream<C>(cipher: &C, counter: Counter, initial: &Block, data: &mut [u8])
where
    C: BlockCipher + ?Sized,
{
    let mut block = Zeroizing::new(*initial);
    for chunk in data.chunks_mut(BLOCK_SIZE) {
        let keystream = Zeroizing::new(cipher.encrypt_block(&block));
        for (byte, key) in chunk.iter_mut().zip(keystream.iter()) {
            *byte ^= *key;
        }
        counter.advance(&mut block);
    }
}
