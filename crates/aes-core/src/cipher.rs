//! AES key schedule and block encryption.

use zeroize::Zeroize;

use crate::block::{Block, BLOCK_SIZE};
use crate::key::{KeyLengthError, RoundKeys, AES128_KEY_LEN, AES256_KEY_LEN, MAX_ROUNDS};
use crate::round::{add_round_key, mix_columns, shift_rows, sub_bytes};
use crate::sbox::sbox;

const RCON: [u8; 10] = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x1b, 0x36];

/// A keyed 128-bit block permutation, encryption direction only.
pub trait BlockCipher {
    /// Encrypts one block.
    fn encrypt_block(&self, block: &Block) -> Block;
}

fn rot_word(word: u32) -> u32 {
    word.rotate_left(8)
}

fn sub_word(word: u32) -> u32 {
    u32::from_be_bytes(word.to_be_bytes().map(sbox))
}

/// Expands a 16- or 32-byte key into its round keys.
pub fn expand_key(key: &[u8]) -> Result<RoundKeys, KeyLengthError> {
    let nk = match key.len() {
        AES128_KEY_LEN | AES256_KEY_LEN => key.len() / 4,
        len => return Err(KeyLengthError { len }),
    };
    let rounds = nk + 6;
    let total_words = 4 * (rounds + 1);

    let mut w = [0u32; 4 * (MAX_ROUNDS + 1)];
    for (word, chunk) in w.iter_mut().zip(key.chunks_exact(4)) {
        *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }

    for i in nk..total_words {
        let mut temp = w[i - 1];
        if i % nk == 0 {
            temp = sub_word(rot_word(temp)) ^ (u32::from(RCON[i / nk - 1]) << 24);
        } else if nk > 6 && i % nk == 4 {
            temp = sub_word(temp);
        }
        w[i] = w[i - nk] ^ temp;
    }

    let mut round_keys = [[0u8; BLOCK_SIZE]; MAX_ROUNDS + 1];
    for (round_key, words) in round_keys.iter_mut().zip(w[..total_words].chunks_exact(4)) {
        for (dst, word) in round_key.chunks_exact_mut(4).zip(words) {
            dst.copy_from_slice(&word.to_be_bytes());
        }
    }
    w.zeroize();

    let expanded = RoundKeys::new(round_keys, rounds);
    round_keys.zeroize();
    Ok(expanded)
}

/// Encrypts a single 16-byte block with pre-expanded round keys.
pub fn encrypt_block(block: &Block, round_keys: &RoundKeys) -> Block {
    let rounds = round_keys.rounds();
    let mut state = *block;

    add_round_key(&mut state, round_keys.get(0));

    for round in 1..rounds {
        sub_bytes(&mut state);
        shift_rows(&mut state);
        mix_columns(&mut state);
        add_round_key(&mut state, round_keys.get(round));
    }

    sub_bytes(&mut state);
    shift_rows(&mut state);
    add_round_key(&mut state, round_keys.get(rounds));

    state
}

/// AES keyed with a 128- or 256-bit key.
#[derive(Clone, Debug)]
pub struct Aes {
    round_keys: RoundKeys,
}

impl Aes {
    /// Expands `key`, which must be 16 or 32 bytes.
    pub fn new(key: &[u8]) -> Result<Self, KeyLengthError> {
        Ok(Self {
            round_keys: expand_key(key)?,
        })
    }

    /// Key length in bytes this instance was created with.
    pub fn key_len(&self) -> usize {
        (self.round_keys.rounds() - 6) * 4
    }
}

impl BlockCipher for Aes {
    #[inline]
    fn encrypt_block(&self, block: &Block) -> Block {
        encrypt_block(block, &self.round_keys)
    }
}
