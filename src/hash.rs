//! Hash-to-scalar paths.
//!
//! Both paths reduce SHA-256 output into the field by truncation to the low
//! 250 bits (the top 6 bits of the first byte are masked off). Every 250-bit
//! value is below both the field prime and the curve order, so digests embed
//! losslessly into scalars.

use sha2::{Digest, Sha256};

use crate::field::FieldElement;

/// Bits kept from the raw hash output.
const DIGEST_BITS_MASK: u8 = 0x03;

fn truncate_to_field(mut hash: [u8; 32]) -> FieldElement {
    hash[0] &= DIGEST_BITS_MASK;
    // 250-bit value, always below the prime.
    FieldElement::reduce(num_bigint::BigUint::from_bytes_be(&hash))
}

/// Two-to-one compression: SHA-256 over the concatenated 32-byte big-endian
/// encodings of `x` and `y`, truncated to 250 bits.
pub fn hash_pair(x: &FieldElement, y: &FieldElement) -> FieldElement {
    let mut hasher = Sha256::new();
    hasher.update(x.to_bytes_be());
    hasher.update(y.to_bytes_be());
    truncate_to_field(hasher.finalize().into())
}

/// Folds an ordered sequence of field elements into one digest:
/// `H(H(...H(H(0, e1), e2)..., ek), k)`.
///
/// The trailing element count makes the construction injective across
/// lengths, and gives the empty sequence the fixed digest `H(0, 0)`.
pub fn hash_elements(elements: &[FieldElement]) -> FieldElement {
    let mut acc = FieldElement::zero();
    for element in elements {
        acc = hash_pair(&acc, element);
    }
    hash_pair(&acc, &FieldElement::from_u64(elements.len() as u64))
}

/// Digests a raw byte string. Independent of [`hash_elements`]: the two
/// paths never produce comparable digests for the same logical message.
pub fn hash_bytes(message: &[u8]) -> FieldElement {
    truncate_to_field(Sha256::digest(message).into())
}
