//! The two GF(2^128) representations used by the SIV constructions.
//!
//! [`CmacField`] reads a block as a big-endian polynomial reduced by
//! `x^128 + x^7 + x^2 + x + 1` and only supports doubling, which is all CMAC and
//! S2V need. [`PolyvalField`] reads a block as two little-endian `u64` limbs
//! reduced by `x^128 + x^127 + x^126 + x^121 + 1` and supports POLYVAL's
//! `dot` multiplication ([RFC 8452 §3]). The two types do not convert into one
//! another, so a value cannot accidentally cross between CMAC and POLYVAL.
//!
//! [RFC 8452 §3]: https://www.rfc-editor.org/rfc/rfc8452#section-3

use core::fmt;
use core::ops::{BitXor, BitXorAssign, Mul, MulAssign};

use aes_core::{Block, BLOCK_SIZE};
use zeroize::Zeroize;

/// Low byte of the CMAC reduction polynomial.
const CMAC_REDUCTION: u8 = 0x87;

/// Element of GF(2^128) in CMAC's big-endian bit order.
#[derive(Clone, Copy, Default, PartialEq, Eq, Zeroize)]
pub struct CmacField(Block);

impl CmacField {
    /// Multiplies by `x`: shift left one bit, folding the carry back in as `0x87`.
    pub fn double(self) -> Self {
        let src = self.0;
        let mut out = [0u8; BLOCK_SIZE];
        for i in 0..BLOCK_SIZE - 1 {
            out[i] = (src[i] << 1) | (src[i + 1] >> 7);
        }
        let carry_mask = 0u8.wrapping_sub(src[0] >> 7);
        out[BLOCK_SIZE - 1] = (src[BLOCK_SIZE - 1] << 1) ^ (CMAC_REDUCTION & carry_mask);
        Self(out)
    }

    /// Borrows the underlying bytes.
    pub fn as_bytes(&self) -> &Block {
        &self.0
    }

    /// Returns the underlying bytes.
    pub fn to_bytes(self) -> Block {
        self.0
    }
}

impl From<Block> for CmacField {
    fn from(block: Block) -> Self {
        Self(block)
    }
}

impl BitXor for CmacField {
    type Output = Self;

    fn bitxor(mut self, rhs: Self) -> Self {
        self ^= rhs;
        self
    }
}

impl BitXorAssign for CmacField {
    fn bitxor_assign(&mut self, rhs: Self) {
        aes_core::xor_in_place(&mut self.0, &rhs.0);
    }
}

impl fmt::Debug for CmacField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CmacField(..)")
    }
}

/// Element of POLYVAL's field, as little-endian 64-bit limbs.
#[derive(Clone, Copy, Default, PartialEq, Eq, Zeroize)]
pub struct PolyvalField {
    lo: u64,
    hi: u64,
}

impl PolyvalField {
    /// Decodes a little-endian block.
    pub fn from_bytes(block: &Block) -> Self {
        let value = u128::from_le_bytes(*block);
        Self {
            lo: value as u64,
            hi: (value >> 64) as u64,
        }
    }

    /// Encodes as a little-endian block.
    pub fn to_bytes(self) -> Block {
        (u128::from(self.lo) | (u128::from(self.hi) << 64)).to_le_bytes()
    }

    /// POLYVAL's `dot(a, b) = a * b * x^-128`.
    ///
    /// Karatsuba over 64-bit halves gives the 256-bit product `v0..v3`; the two
    /// low limbs are then cancelled one at a time by adding multiples of the
    /// polynomial, which leaves the product divided by `x^128` in `v2, v3`.
    pub fn dot(self, rhs: Self) -> Self {
        let lo = clmul64(self.lo, rhs.lo);
        let hi = clmul64(self.hi, rhs.hi);
        let mid = clmul64(self.lo ^ self.hi, rhs.lo ^ rhs.hi) ^ lo ^ hi;

        let v0 = lo as u64;
        let mut v1 = ((lo >> 64) as u64) ^ (mid as u64);
        let mut v2 = (hi as u64) ^ ((mid >> 64) as u64);
        let mut v3 = (hi >> 64) as u64;

        v2 ^= v0 ^ (v0 >> 1) ^ (v0 >> 2) ^ (v0 >> 7);
        v1 ^= (v0 << 63) ^ (v0 << 62) ^ (v0 << 57);
        v3 ^= v1 ^ (v1 >> 1) ^ (v1 >> 2) ^ (v1 >> 7);
        v2 ^= (v1 << 63) ^ (v1 << 62) ^ (v1 << 57);

        Self { lo: v2, hi: v3 }
    }
}

/// Carry-less 64x64 -> 128 multiplication without data-dependent branches.
fn clmul64(a: u64, b: u64) -> u128 {
    let a = u128::from(a);
    let mut acc = 0u128;
    for i in 0..64 {
        let mask = 0u128.wrapping_sub(u128::from((b >> i) & 1));
        acc ^= (a << i) & mask;
    }
    acc
}

impl From<Block> for PolyvalField {
    fn from(block: Block) -> Self {
        Self::from_bytes(&block)
    }
}

impl BitXor for PolyvalField {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self {
        Self {
            lo: self.lo ^ rhs.lo,
            hi: self.hi ^ rhs.hi,
        }
    }
}

impl BitXorAssign for PolyvalField {
    fn bitxor_assign(&mut self, rhs: Self) {
        *self = *self ^ rhs;
    }
}

impl Mul for PolyvalField {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.dot(rhs)
    }
}

impl MulAssign for PolyvalField {
    fn mul_assign(&mut self, rhs: Self) {
        *self = self.dot(rhs);
    }
}

impl fmt::Debug for PolyvalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PolyvalField(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    fn block(hex_str: &str) -> Block {
        hex::decode(hex_str).unwrap().try_into().unwrap()
    }

    /// Inverse of doubling, used to check that `double` loses no information.
    fn halve(value: CmacField) -> CmacField {
        let src = value.to_bytes();
        let lsb = src[BLOCK_SIZE - 1] & 1;
        let mut unreduced = src;
        unreduced[BLOCK_SIZE - 1] ^= CMAC_REDUCTION & 0u8.wrapping_sub(lsb);
        let mut out = [0u8; BLOCK_SIZE];
        for i in (1..BLOCK_SIZE).rev() {
            out[i] = (unreduced[i] >> 1) | (unreduced[i - 1] << 7);
        }
        out[0] = (unreduced[0] >> 1) | (lsb << 7);
        CmacField::from(out)
    }

    #[test]
    fn double_matches_rfc4493_subkeys() {
        // L = AES-128(2b7e1516..., 0^128); K1 = dbl(L); K2 = dbl(K1).
        let l = CmacField::from(block("7df76b0c1ab899b33e42f047b91b546f"));
        let k1 = l.double();
        assert_eq!(hex::encode(k1.as_bytes()), "fbeed618357133667c85e08f7236a8de");
        assert_eq!(hex::encode(k1.double().as_bytes()), "f7ddac306ae266ccf90bc11ee46d513b");
    }

    #[test]
    fn double_without_carry_is_plain_shift() {
        let x = CmacField::from(block("00000000000000000000000000000001"));
        assert_eq!(x.double(), CmacField::from(block("00000000000000000000000000000002")));
        let top = CmacField::from(block("80000000000000000000000000000000"));
        assert_eq!(top.double(), CmacField::from(block("00000000000000000000000000000087")));
    }

    #[test]
    fn halving_undoes_doubling() {
        let mut rng = ChaCha20Rng::from_seed([21u8; 32]);
        for _ in 0..64 {
            let mut bytes = [0u8; BLOCK_SIZE];
            rng.fill_bytes(&mut bytes);
            let x = CmacField::from(bytes);
            assert_eq!(halve(halve(x.double().double())), x);
        }
    }

    #[test]
    fn dot_matches_rfc8452_example() {
        let a = PolyvalField::from(block("66e94bd4ef8a2c3b884cfa59ca342b2e"));
        let b = PolyvalField::from(block("ff000000000000000000000000000000"));
        assert_eq!(hex::encode(a.dot(b).to_bytes()), "ebe563401e7e91ea3ad6426b8140c394");
    }

    #[test]
    fn dot_is_commutative() {
        let mut rng = ChaCha20Rng::from_seed([22u8; 32]);
        for _ in 0..64 {
            let mut x = [0u8; BLOCK_SIZE];
            let mut y = [0u8; BLOCK_SIZE];
            rng.fill_bytes(&mut x);
            rng.fill_bytes(&mut y);
            let (a, b) = (PolyvalField::from(x), PolyvalField::from(y));
            assert_eq!(a * b, b * a);
        }
    }

    #[test]
    fn dot_distributes_over_xor() {
        let mut rng = ChaCha20Rng::from_seed([23u8; 32]);
        let mut draw = || {
            let mut bytes = [0u8; BLOCK_SIZE];
            rng.fill_bytes(&mut bytes);
            PolyvalField::from(bytes)
        };
        for _ in 0..32 {
            let (a, b, c) = (draw(), draw(), draw());
            assert_eq!(a * (b ^ c), (a * b) ^ (a * c));
        }
    }

    #[test]
    fn clmul_matches_schoolbook() {
        assert_eq!(clmul64(0b11, 0b11), 0b101);
        assert_eq!(clmul64(u64::MAX, 2), u128::from(u64::MAX) << 1);
        assert_eq!(clmul64(1 << 63, 1 << 63), 1u128 << 126);
    }

    #[test]
    fn bytes_round_trip_through_limbs() {
        let bytes = block("0102030405060708090a0b0c0d0e0f10");
        assert_eq!(PolyvalField::from_bytes(&bytes).to_bytes(), bytes);
    }
}
