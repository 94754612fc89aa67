//! Constant-time comparison used by every tag check.

use subtle::ConstantTimeEq;

/// Compares two byte strings in time independent of where they differ.
///
/// Lengths are public; slices of different length compare unequal.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}
