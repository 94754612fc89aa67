//! AES-GCM-SIV (RFC 8452).

use aes_core::{apply_keystream, Aes, Block, BlockCipher, Counter};
use tracing::debug;
use zeroize::Zeroizing;

use crate::aead::{Aead, NonceSize};
use crate::ct::constant_time_eq;
use crate::error::{Error, Result};
use crate::kdf::{derive_keys, DerivedKeys};
use crate::polyval::polyval_digest;
use crate::{NONCE_SIZE, TAG_SIZE};

/// Master key lengths accepted.
pub const GCM_SIV_KEY_SIZES: &[usize] = &[16, 32];

/// Largest plaintext or associated data, in bytes (2^36).
pub const MAX_INPUT_LEN: u64 = 1 << 36;

/// Nonce-misuse-resistant AEAD built on POLYVAL and AES-CTR.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AesGcmSiv;

impl Aead for AesGcmSiv {
    fn key_sizes(&self) -> &'static [usize] {
        GCM_SIV_KEY_SIZES
    }

    fn nonce_size(&self) -> NonceSize {
        NonceSize::Exact(NONCE_SIZE)
    }

    fn seal(&self, key: &[u8], nonce: &[u8], ad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
        let nonce = check_params(key, nonce)?;
        check_len(ad)?;
        check_len(plaintext)?;
        debug!(
            key_len = key.len(),
            ad_len = ad.len(),
            plaintext_len = plaintext.len(),
            "AES-GCM-SIV seal"
        );

        let keys = derive_keys(key, nonce)?;
        let cipher = Aes::new(keys.enc_key())?;
        let tag = compute_tag(&keys, &cipher, nonce, ad, plaintext);

        let mut out = Vec::with_capacity(plaintext.len() + TAG_SIZE);
        out.extend_from_slice(plaintext);
        apply_keystream(&cipher, Counter::Le32, &ctr_seed(&tag), &mut out);
        out.extend_from_slice(&tag);
        Ok(out)
    }

    fn open(&self, key: &[u8], nonce: &[u8], ad: &[u8], sealed: &[u8]) -> Result<Vec<u8>> {
        let nonce = check_params(key, nonce)?;
        if sealed.len() < TAG_SIZE {
            return Err(Error::ShortInput { len: sealed.len() });
        }
        check_len(ad)?;
        check_len(&sealed[..sealed.len() - TAG_SIZE])?;
        debug!(
            key_len = key.len(),
            ad_len = ad.len(),
            sealed_len = sealed.len(),
            "AES-GCM-SIV open"
        );

        let (ciphertext, tag) = sealed.split_at(sealed.len() - TAG_SIZE);
        let mut received = [0u8; TAG_SIZE];
        received.copy_from_slice(tag);

        let keys = derive_keys(key, nonce)?;
        let cipher = Aes::new(keys.enc_key())?;
        let mut plaintext = Zeroizing::new(ciphertext.to_vec());
        apply_keystream(&cipher, Counter::Le32, &ctr_seed(&received), &mut plaintext);

        let expected = Zeroizing::new(compute_tag(&keys, &cipher, nonce, ad, &plaintext));
        if !constant_time_eq(expected.as_slice(), &received) {
            debug!(sealed_len = sealed.len(), "AES-GCM-SIV tag mismatch");
            return Err(Error::AuthenticationFailed);
        }
        Ok(core::mem::take(&mut *plaintext))
    }
}

fn check_params<'a>(key: &[u8], nonce: &'a [u8]) -> Result<&'a [u8; NONCE_SIZE]> {
    if !GCM_SIV_KEY_SIZES.contains(&key.len()) {
        return Err(Error::InvalidKeySize {
            len: key.len(),
            expected: GCM_SIV_KEY_SIZES,
        });
    }
    nonce.try_into().map_err(|_| Error::InvalidNonceSize {
        len: nonce.len(),
        expected: NONCE_SIZE,
    })
}

fn check_len(data: &[u8]) -> Result<()> {
    let len = data.len() as u64;
    if len > MAX_INPUT_LEN {
        return Err(Error::MessageTooLong {
            len,
            max: MAX_INPUT_LEN,
        });
    }
    Ok(())
}

/// POLYVAL digest, nonce mixed into its first 12 bytes, top bit cleared, then encrypted.
fn compute_tag(
    keys: &DerivedKeys,
    cipher: &Aes,
    nonce: &[u8; NONCE_SIZE],
    ad: &[u8],
    plaintext: &[u8],
) -> Block {
    let mut s = Zeroizing::new(polyval_digest(keys.auth_key(), ad, plaintext));
    for (byte, n) in s.iter_mut().zip(nonce) {
        *byte ^= *n;
    }
    s[TAG_SIZE - 1] &= 0x7f;
    cipher.encrypt_block(&s)
}

/// The initial counter is the tag with its top bit set.
fn ctr_seed(tag: &Block) -> Zeroizing<Block> {
    let mut seed = Zeroizing::new(*tag);
    seed[TAG_SIZE - 1] |= 0x80;
    seed
}
