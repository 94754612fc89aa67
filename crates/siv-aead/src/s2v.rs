//! S2V, the string-to-vector PRF of RFC 5297 §2.4.

use aes_core::{Block, BlockCipher, BLOCK_SIZE};
use zeroize::Zeroizing;

use crate::cmac::Cmac;
use crate::field::CmacField;

/// Largest number of associated-data strings S2V accepts ahead of the message.
///
/// RFC 5297 caps the whole vector at 127 strings; the final one is the message.
pub const MAX_COMPONENTS: usize = 126;

/// Folds `components` (in order) and then `message` into one synthetic IV.
pub fn s2v<C: BlockCipher>(cmac: &Cmac<C>, components: &[&[u8]], message: &[u8]) -> Block {
    let mut d = Zeroizing::new(CmacField::from(cmac.sum(&[0u8; BLOCK_SIZE])));
    for component in components {
        *d = d.double() ^ CmacField::from(cmac.sum(component));
    }

    if message.len() >= BLOCK_SIZE {
        return cmac.sum_with_last_mask(message, d.as_bytes());
    }

    let mut padded = Zeroizing::new([0u8; BLOCK_SIZE]);
    padded[..message.len()].copy_from_slice(message);
    padded[message.len()] = 0x80;
    let t = Zeroizing::new(CmacField::from(*padded) ^ d.double());
    cmac.sum(t.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rfc5297_a1_mac() -> Cmac {
        // First half of the RFC 5297 A.1 key.
        Cmac::new(&hex::decode("fffefdfcfbfaf9f8f7f6f5f4f3f2f1f0").unwrap()).unwrap()
    }

    #[test]
    fn short_message_matches_rfc5297_a1() {
        let ad = hex::decode("101112131415161718191a1b1c1d1e1f2021222324252627").unwrap();
        let pt = hex::decode("112233445566778899aabbccddee").unwrap();
        let v = s2v(&rfc5297_a1_mac(), &[ad.as_slice()], &pt);
        assert_eq!(hex::encode(v), "85632d07c6e8f37f950acd320a2ecc93");
    }

    #[test]
    fn fold_start_is_cmac_of_zero_block() {
        let cmac = rfc5297_a1_mac();
        assert_eq!(
            hex::encode(cmac.sum(&[0u8; BLOCK_SIZE])),
            "0e04dfafc1efbf040140582859bf073a"
        );
    }

    #[test]
    fn component_order_changes_the_vector() {
        let cmac = rfc5297_a1_mac();
        let a: &[u8] = b"first component";
        let b: &[u8] = b"second";
        for msg in [&b"short"[..], &b"a message that spans two blocks"[..]] {
            assert_ne!(s2v(&cmac, &[a, b], msg), s2v(&cmac, &[b, a], msg));
        }
    }

    #[test]
    fn message_boundary_is_not_ambiguous() {
        let cmac = rfc5297_a1_mac();
        let fifteen = [0x42u8; 15];
        let mut sixteen = [0x42u8; 16];
        sixteen[15] = 0x80;
        assert_ne!(s2v(&cmac, &[], &fifteen), s2v(&cmac, &[], &sixteen));
    }
}
