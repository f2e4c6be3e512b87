use lazy_static::lazy_static;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use std::fmt;
use std::ops::{Add, Mul, Sub};

use crate::error::{Error, Result};

lazy_static! {
    /// Stark prime, p = 2^251 + 17 * 2^192 + 1.
    pub static ref FIELD_PRIME: BigUint = BigUint::parse_bytes(
        b"0800000000000011000000000000000000000000000000000000000000000001",
        16,
    )
    .unwrap();

    /// p - 2, the Fermat inversion exponent.
    static ref PRIME_MINUS_TWO: BigUint = &*FIELD_PRIME - 2u32;

    /// (p - 1) / 2, the Euler criterion exponent.
    static ref LEGENDRE_EXP: BigUint = (&*FIELD_PRIME - 1u32) >> 1;

    /// Odd part q and two-adicity s of p - 1 = q * 2^s, for Tonelli-Shanks.
    static ref TWO_ADIC_DECOMP: (BigUint, u64) = {
        let mut q = &*FIELD_PRIME - 1u32;
        let mut s = 0u64;
        while !q.bit(0) {
            q >>= 1;
            s += 1;
        }
        (q, s)
    };

    /// Smallest quadratic non-residue mod p, found by the Euler criterion.
    static ref NONRESIDUE: BigUint = {
        let mut z = BigUint::from(2u32);
        loop {
            if z.modpow(&LEGENDRE_EXP, &FIELD_PRIME) != BigUint::one() {
                break z;
            }
            z += 1u32;
        }
    };
}

/// An element of the prime field underlying the Stark curve.
///
/// The value is always fully reduced, i.e. strictly less than [`FIELD_PRIME`].
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldElement(BigUint);

impl FieldElement {
    pub fn zero() -> Self {
        FieldElement(BigUint::zero())
    }

    pub fn one() -> Self {
        FieldElement(BigUint::one())
    }

    /// Wraps an integer already known to be below the prime.
    /// Errors with `MalformedInput` otherwise.
    pub fn new(value: BigUint) -> Result<Self> {
        if value >= *FIELD_PRIME {
            return Error::MalformedInput("field element not below the prime").into_err();
        }
        Ok(FieldElement(value))
    }

    /// Wraps an arbitrary integer, reducing it mod p.
    pub fn reduce(value: BigUint) -> Self {
        FieldElement(value % &*FIELD_PRIME)
    }

    pub fn from_u64(value: u64) -> Self {
        FieldElement(BigUint::from(value))
    }

    /// Decodes a 32-byte big-endian encoding. The value must be below the
    /// prime; anything else is a `MalformedInput` error.
    pub fn from_bytes_be(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 32 {
            return Error::DecodingError {
                expected: 32,
                got: bytes.len(),
            }
            .into_err();
        }
        Self::new(BigUint::from_bytes_be(bytes))
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = crate::encoding_utils::decode_hex_fixed(s, 32)?;
        Self::from_bytes_be(&bytes)
    }

    /// Fixed-width 32-byte big-endian encoding.
    pub fn to_bytes_be(&self) -> [u8; 32] {
        let raw = self.0.to_bytes_be();
        let mut out = [0u8; 32];
        out[32 - raw.len()..].copy_from_slice(&raw);
        out
    }

    pub fn to_hex(&self) -> String {
        crate::encoding_utils::encode_hex_prefixed(&self.to_bytes_be())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Parity of the canonical representative, used for the compressed
    /// public key prefix.
    pub fn is_odd(&self) -> bool {
        self.0.bit(0)
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    pub fn pow(&self, exponent: &BigUint) -> Self {
        FieldElement(self.0.modpow(exponent, &FIELD_PRIME))
    }

    /// Multiplicative inverse by Fermat's little theorem. Maps zero to zero;
    /// callers branch on zero denominators beforehand.
    pub fn invert(&self) -> Self {
        self.pow(&PRIME_MINUS_TWO)
    }

    pub fn negate(&self) -> Self {
        if self.0.is_zero() {
            FieldElement(BigUint::zero())
        } else {
            FieldElement(&*FIELD_PRIME - &self.0)
        }
    }

    /// Modular square root via Tonelli-Shanks (p = 1 mod 4, so the simple
    /// exponentiation shortcut does not apply). Returns `None` for quadratic
    /// non-residues. The returned root is one of the two candidates; the
    /// caller selects by parity.
    pub fn sqrt(&self) -> Option<Self> {
        if self.0.is_zero() {
            return Some(FieldElement::zero());
        }
        if self.0.modpow(&LEGENDRE_EXP, &FIELD_PRIME) != BigUint::one() {
            return None;
        }

        let (q, s) = &*TWO_ADIC_DECOMP;
        let mut m = *s;
        let mut c = NONRESIDUE.modpow(q, &FIELD_PRIME);
        let mut t = self.0.modpow(q, &FIELD_PRIME);
        let r_exp = (q + 1u32) >> 1;
        let mut r = self.0.modpow(&r_exp, &FIELD_PRIME);

        while t != BigUint::one() {
            // Least i with t^(2^i) == 1; exists because self is a residue.
            let mut i = 0u64;
            let mut t2i = t.clone();
            while t2i != BigUint::one() {
                t2i = (&t2i * &t2i) % &*FIELD_PRIME;
                i += 1;
            }

            let mut b = c;
            for _ in 0..(m - i - 1) {
                b = (&b * &b) % &*FIELD_PRIME;
            }
            m = i;
            c = (&b * &b) % &*FIELD_PRIME;
            t = (&t * &c) % &*FIELD_PRIME;
            r = (&r * &b) % &*FIELD_PRIME;
        }
        Some(FieldElement(r))
    }
}

impl Add for &FieldElement {
    type Output = FieldElement;
    fn add(self, other: &FieldElement) -> FieldElement {
        FieldElement((&self.0 + &other.0) % &*FIELD_PRIME)
    }
}

impl Sub for &FieldElement {
    type Output = FieldElement;
    fn sub(self, other: &FieldElement) -> FieldElement {
        if self.0 >= other.0 {
            FieldElement(&self.0 - &other.0)
        } else {
            FieldElement(&*FIELD_PRIME - &other.0 + &self.0)
        }
    }
}

impl Mul for &FieldElement {
    type Output = FieldElement;
    fn mul(self, other: &FieldElement) -> FieldElement {
        FieldElement((&self.0 * &other.0) % &*FIELD_PRIME)
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement({})", self.to_hex())
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
