//! Behavioral properties shared by both constructions.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use siv_aead::{Aead, AesSiv, Algorithm, Error, TAG_SIZE};

const PLAINTEXT_LENGTHS: [usize; 7] = [0, 1, 15, 16, 17, 31, 32];
const AD_LENGTHS: [usize; 4] = [0, 1, 16, 17];

fn random_bytes(rng: &mut ChaCha20Rng, len: usize) -> Vec<u8> {
    let mut out = vec![0u8; len];
    rng.fill_bytes(&mut out);
    out
}

fn fixture(rng: &mut ChaCha20Rng, alg: Algorithm) -> (Vec<u8>, Vec<u8>) {
    let key = random_bytes(rng, alg.key_len());
    let nonce = random_bytes(rng, alg.nonce_len().unwrap_or(16));
    (key, nonce)
}

#[test]
fn boundary_lengths_round_trip() {
    let mut rng = ChaCha20Rng::from_seed([1u8; 32]);
    for alg in Algorithm::ALL {
        let (key, nonce) = fixture(&mut rng, alg);
        for pt_len in PLAINTEXT_LENGTHS {
            for ad_len in AD_LENGTHS {
                let plaintext = random_bytes(&mut rng, pt_len);
                let ad = random_bytes(&mut rng, ad_len);
                let sealed = alg.seal(&key, &nonce, &ad, &plaintext).unwrap();
                assert_eq!(sealed.len(), pt_len + TAG_SIZE);
                let opened = alg.open(&key, &nonce, &ad, &sealed).unwrap();
                assert_eq!(opened, plaintext, "{alg} pt={pt_len} ad={ad_len}");
            }
        }
    }
}

#[test]
fn every_single_bit_flip_is_rejected() {
    let mut rng = ChaCha20Rng::from_seed([2u8; 32]);
    for alg in Algorithm::ALL {
        let (key, nonce) = fixture(&mut rng, alg);
        for pt_len in [0usize, 5, 17] {
            let plaintext = random_bytes(&mut rng, pt_len);
            let sealed = alg.seal(&key, &nonce, b"context", &plaintext).unwrap();
            for bit in 0..sealed.len() * 8 {
                let mut tampered = sealed.clone();
                tampered[bit / 8] ^= 1 << (bit % 8);
                assert_eq!(
                    alg.open(&key, &nonce, b"context", &tampered).unwrap_err(),
                    Error::AuthenticationFailed,
                    "{alg} bit {bit}"
                );
            }
        }
    }
}

#[test]
fn wrong_key_nonce_or_ad_is_rejected() {
    let mut rng = ChaCha20Rng::from_seed([3u8; 32]);
    for alg in Algorithm::ALL {
        let (key, nonce) = fixture(&mut rng, alg);
        let sealed = alg.seal(&key, &nonce, b"ad", b"secret message").unwrap();

        let mut other_key = key.clone();
        other_key[0] ^= 0x80;
        let mut other_nonce = nonce.clone();
        other_nonce[0] ^= 0x01;

        for (k, n, ad) in [
            (&other_key, &nonce, &b"ad"[..]),
            (&key, &other_nonce, &b"ad"[..]),
            (&key, &nonce, &b"ae"[..]),
        ] {
            assert_eq!(
                alg.open(k, n, ad, &sealed).unwrap_err(),
                Error::AuthenticationFailed
            );
        }
    }
}

#[test]
fn siv_is_deterministic_and_gcm_siv_depends_on_nonce() {
    let mut rng = ChaCha20Rng::from_seed([4u8; 32]);
    for alg in Algorithm::ALL {
        let (key, nonce) = fixture(&mut rng, alg);
        let a = alg.seal(&key, &nonce, b"ad", b"same message").unwrap();
        let b = alg.seal(&key, &nonce, b"ad", b"same message").unwrap();
        assert_eq!(a, b, "{alg}");

        let mut other_nonce = nonce.clone();
        other_nonce[3] ^= 0x10;
        let c = alg.seal(&key, &other_nonce, b"ad", b"same message").unwrap();
        assert_ne!(a, c, "{alg}");
    }
}

#[test]
fn siv_associated_data_order_is_authenticated() {
    let key = [0x5cu8; 64];
    let (a, b) = (b"alpha".as_slice(), b"beta".as_slice());
    let ab = AesSiv.seal_vectored(&key, &[a, b], b"message").unwrap();
    let ba = AesSiv.seal_vectored(&key, &[b, a], b"message").unwrap();
    assert_ne!(ab[ab.len() - TAG_SIZE..], ba[ba.len() - TAG_SIZE..]);

    // Swapping nonce and associated data through the flat API changes the tag too.
    let flat = AesSiv.seal(&key, a, b, b"message").unwrap();
    let swapped = AesSiv.seal(&key, b, a, b"message").unwrap();
    assert_eq!(flat, ab);
    assert_ne!(flat, swapped);
}

#[test]
fn short_input_is_reported_before_verification() {
    for alg in Algorithm::ALL {
        let key = vec![0u8; alg.key_len()];
        let nonce = vec![0u8; alg.nonce_len().unwrap_or(0)];
        for len in [0usize, 1, TAG_SIZE - 1] {
            assert_eq!(
                alg.open(&key, &nonce, b"", &vec![0u8; len]).unwrap_err(),
                Error::ShortInput { len }
            );
        }
    }
}

#[test]
fn concurrent_calls_share_nothing() {
    let handles: Vec<_> = Algorithm::ALL
        .into_iter()
        .map(|alg| {
            std::thread::spawn(move || {
                let key = vec![0x42u8; alg.key_len()];
                let nonce = vec![0x24u8; alg.nonce_len().unwrap_or(8)];
                (0..32)
                    .map(|i| alg.seal(&key, &nonce, b"", &[i as u8; 40]).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();
    for (alg, handle) in Algorithm::ALL.into_iter().zip(handles) {
        let key = vec![0x42u8; alg.key_len()];
        let nonce = vec![0x24u8; alg.nonce_len().unwrap_or(8)];
        for (i, sealed) in handle.join().unwrap().into_iter().enumerate() {
            assert_eq!(sealed, alg.seal(&key, &nonce, b"", &[i as u8; 40]).unwrap());
        }
    }
}
