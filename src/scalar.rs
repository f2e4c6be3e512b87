use lazy_static::lazy_static;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use std::fmt;
use std::ops::{Add, Mul};

use crate::error::{Error, Result};
use crate::field::FieldElement;

lazy_static! {
    /// Order n of the Stark curve generator (prime).
    pub static ref CURVE_ORDER: BigUint = BigUint::parse_bytes(
        b"0800000000000010ffffffffffffffffb781126dcae7b2321e66a241adc64d2f",
        16,
    )
    .unwrap();

    /// n - 2, the Fermat inversion exponent mod n.
    static ref ORDER_MINUS_TWO: BigUint = &*CURVE_ORDER - 2u32;
}

/// An integer mod the curve order n, used for private keys, nonces and
/// signature components. Always fully reduced.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Scalar(BigUint);

impl Scalar {
    pub fn zero() -> Self {
        Scalar(BigUint::zero())
    }

    pub fn one() -> Self {
        Scalar(BigUint::one())
    }

    /// Wraps an integer already known to be below the order.
    /// Errors with `MalformedInput` otherwise.
    pub fn new(value: BigUint) -> Result<Self> {
        if value >= *CURVE_ORDER {
            return Error::MalformedInput("scalar not below the curve order").into_err();
        }
        Ok(Scalar(value))
    }

    /// Wraps an arbitrary integer, reducing it mod n.
    pub fn reduce(value: BigUint) -> Self {
        Scalar(value % &*CURVE_ORDER)
    }

    pub fn from_u64(value: u64) -> Self {
        Scalar(BigUint::from(value))
    }

    /// Strict private key constructor: the scalar must lie in [1, n-1].
    /// Zero and out-of-range values are `InvalidKey`.
    pub fn secret_from_slice(bytes: &[u8]) -> Result<Self> {
        let value = BigUint::from_bytes_be(bytes);
        if value.is_zero() || value >= *CURVE_ORDER {
            return Error::InvalidKey.into_err();
        }
        Ok(Scalar(value))
    }

    pub fn secret_from_hex(s: &str) -> Result<Self> {
        let bytes = crate::encoding_utils::decode_hex_fixed(s, 32)?;
        Self::secret_from_slice(&bytes)
    }

    /// Decodes a 32-byte big-endian signature component; must be below n.
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

    /// Embeds a digest into the scalar group. Digests produced by the hash
    /// module are below 2^250 < n, so this is lossless for them; larger
    /// field elements reduce mod n.
    pub fn from_field(fe: &FieldElement) -> Self {
        Scalar::reduce(fe.as_biguint().clone())
    }

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

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// Multiplicative inverse mod n (n is prime). Maps zero to zero.
    pub fn invert(&self) -> Self {
        Scalar(self.0.modpow(&ORDER_MINUS_TWO, &CURVE_ORDER))
    }
}

impl Add for &Scalar {
    type Output = Scalar;
    fn add(self, other: &Scalar) -> Scalar {
        Scalar((&self.0 + &other.0) % &*CURVE_ORDER)
    }
}

impl Mul for &Scalar {
    type Output = Scalar;
    fn mul(self, other: &Scalar) -> Scalar {
        Scalar((&self.0 * &other.0) % &*CURVE_ORDER)
    }
}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scalar({})", self.to_hex())
    }
}
