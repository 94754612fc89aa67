//! AES-SIV (RFC 5297): deterministic authenticated encryption keyed by S2V.
//!
//! The key is two equal halves, a CMAC key followed by a CTR key. The synthetic
//! IV doubles as the tag and, with bit 63 and bit 31 cleared, as the initial
//! CTR counter. Output is `ciphertext || tag`.

use aes_core::{apply_keystream, Aes, Block, Counter};
use tracing::debug;
use zeroize::Zeroizing;

use crate::aead::{Aead, NonceSize};
use crate::cmac::Cmac;
use crate::ct::constant_time_eq;
use crate::error::{Error, Result};
use crate::s2v::{s2v, MAX_COMPONENTS};
use crate::TAG_SIZE;

/// Key lengths accepted: two AES-128 halves or two AES-256 halves.
pub const SIV_KEY_SIZES: &[usize] = &[32, 64];

/// The classical synthetic-IV construction over AES-CMAC and AES-CTR.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AesSiv;

impl AesSiv {
    /// Seals `plaintext` authenticating `components` in the order given.
    pub fn seal_vectored(
        &self,
        key: &[u8],
        components: &[&[u8]],
        plaintext: &[u8],
    ) -> Result<Vec<u8>> {
        let (mac, ctr) = split_key(key)?;
        check_components(components)?;
        debug!(
            key_len = key.len(),
            components = components.len(),
            plaintext_len = plaintext.len(),
            "AES-SIV seal"
        );

        let tag = s2v(&mac, components, plaintext);
        let mut out = Vec::with_capacity(plaintext.len() + TAG_SIZE);
        out.extend_from_slice(plaintext);
        apply_keystream(&ctr, Counter::Be128, &ctr_seed(&tag), &mut out);
        out.extend_from_slice(&tag);
        Ok(out)
    }

    /// Opens `sealed` (`ciphertext || tag`) produced with the same `components`.
    ///
    /// The recovered plaintext is wiped and withheld unless the tag verifies.
    pub fn open_vectored(
        &self,
        key: &[u8],
        components: &[&[u8]],
        sealed: &[u8],
    ) -> Result<Vec<u8>> {
        let (mac, ctr) = split_key(key)?;
        check_components(components)?;
        if sealed.len() < TAG_SIZE {
            return Err(Error::ShortInput { len: sealed.len() });
        }
        debug!(
            key_len = key.len(),
            components = components.len(),
            sealed_len = sealed.len(),
            "AES-SIV open"
        );

        let (ciphertext, tag) = sealed.split_at(sealed.len() - TAG_SIZE);
        let mut plaintext = Zeroizing::new(ciphertext.to_vec());
        let mut received = [0u8; TAG_SIZE];
        received.copy_from_slice(tag);
        apply_keystream(&ctr, Counter::Be128, &ctr_seed(&received), &mut plaintext);

        let expected = Zeroizing::new(s2v(&mac, components, &plaintext));
        if !constant_time_eq(expected.as_slice(), &received) {
            debug!(sealed_len = sealed.len(), "AES-SIV tag mismatch");
            return Err(Error::AuthenticationFailed);
        }
        Ok(core::mem::take(&mut *plaintext))
    }
}

impl Aead for AesSiv {
    fn key_sizes(&self) -> &'static [usize] {
        SIV_KEY_SIZES
    }

    fn nonce_size(&self) -> NonceSize {
        NonceSize::Any
    }

    /// The S2V vector is `[nonce, ad]`, each omitted when empty.
    fn seal(&self, key: &[u8], nonce: &[u8], ad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
        self.seal_vectored(key, &components(nonce, ad), plaintext)
    }

    fn open(&self, key: &[u8], nonce: &[u8], ad: &[u8], sealed: &[u8]) -> Result<Vec<u8>> {
        self.open_vectored(key, &components(nonce, ad), sealed)
    }
}

// TODO: revisit whether the nonce should trail the associated data as in the
// RFC 5297 examples; changing it breaks compatibility with existing ciphertexts.
fn components<'a>(nonce: &'a [u8], ad: &'a [u8]) -> Vec<&'a [u8]> {
    [nonce, ad].into_iter().filter(|c| !c.is_empty()).collect()
}

fn split_key(key: &[u8]) -> Result<(Cmac, Aes)> {
    if !SIV_KEY_SIZES.contains(&key.len()) {
        return Err(Error::InvalidKeySize {
            len: key.len(),
            expected: SIV_KEY_SIZES,
        });
    }
    let (mac_key, enc_key) = key.split_at(key.len() / 2);
    Ok((Cmac::new(mac_key)?, Aes::new(enc_key)?))
}

fn check_components(components: &[&[u8]]) -> Result<()> {
    if components.len() > MAX_COMPONENTS {
        return Err(Error::InvalidComponentCount {
            count: components.len(),
            max: MAX_COMPONENTS,
        });
    }
    Ok(())
}

/// Clears the top bit of bytes 8 and 12 so neither 32-bit half-word of the
/// low 64 bits can carry while the counter runs.
fn ctr_seed(tag: &Block) -> Zeroizing<Block> {
    let mut seed = Zeroizing::new(*tag);
    seed[8] &= 0x7f;
    seed[12] &= 0x7f;
    seed
}
