use crate::encoding_utils::{encode_hex_prefixed, strip_hex_prefix};
use crate::error::{Error, Result};
use crate::field::FieldElement;
use crate::point::{curve_rhs, CurvePoint};
use crate::scalar::Scalar;

/// A public key: a non-identity point on the Stark curve.
///
/// Serializes to the two SEC1-style encodings: compressed (parity prefix
/// `0x02`/`0x03` + x, 33 bytes) and uncompressed (`0x04` + x + y, 65 bytes).
/// Both are fixed-width big-endian and mutually convertible.
#[derive(Clone, PartialEq, Eq)]
pub struct Pubkey {
    x: FieldElement,
    y: FieldElement,
}

impl Pubkey {
    /// Derives the public key Q = d*G for a private scalar d.
    pub fn derive(secret: &Scalar) -> Result<Pubkey> {
        if secret.is_zero() {
            return Error::InvalidKey.into_err();
        }
        // d in [1, n-1] and G has order n, so d*G is never the identity.
        Self::from_point(CurvePoint::generator().mul(secret))
    }

    pub fn from_point(point: CurvePoint) -> Result<Pubkey> {
        match point {
            CurvePoint::Infinity => {
                Error::MalformedInput("public key is the point at infinity").into_err()
            }
            CurvePoint::Affine { x, y } => Ok(Pubkey { x, y }),
        }
    }

    pub fn point(&self) -> CurvePoint {
        CurvePoint::Affine {
            x: self.x.clone(),
            y: self.y.clone(),
        }
    }

    pub fn serialize_compressed(&self) -> [u8; 33] {
        let mut out = [0u8; 33];
        out[0] = if self.y.is_odd() { 0x03 } else { 0x02 };
        out[1..].copy_from_slice(&self.x.to_bytes_be());
        out
    }

    pub fn serialize_uncompressed(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[0] = 0x04;
        out[1..33].copy_from_slice(&self.x.to_bytes_be());
        out[33..].copy_from_slice(&self.y.to_bytes_be());
        out
    }

    pub fn to_hex_compressed(&self) -> String {
        encode_hex_prefixed(&self.serialize_compressed())
    }

    pub fn to_hex_uncompressed(&self) -> String {
        encode_hex_prefixed(&self.serialize_uncompressed())
    }

    /// Decodes either encoding, selected by the prefix byte. Compressed keys
    /// recover y by square root and the parity bit.
    pub fn from_slice(bytes: &[u8]) -> Result<Pubkey> {
        match bytes.first() {
            Some(0x02) | Some(0x03) => {
                if bytes.len() != 33 {
                    return Error::DecodingError {
                        expected: 33,
                        got: bytes.len(),
                    }
                    .into_err();
                }
                let x = FieldElement::from_bytes_be(&bytes[1..])?;
                let y = decompress_y(&x, bytes[0] == 0x03)?;
                Self::from_point(CurvePoint::from_xy(x, y)?)
            }
            Some(0x04) => {
                if bytes.len() != 65 {
                    return Error::DecodingError {
                        expected: 65,
                        got: bytes.len(),
                    }
                    .into_err();
                }
                let x = FieldElement::from_bytes_be(&bytes[1..33])?;
                let y = FieldElement::from_bytes_be(&bytes[33..])?;
                Self::from_point(CurvePoint::from_xy(x, y)?)
            }
            _ => Error::MalformedInput("unknown public key prefix").into_err(),
        }
    }

    pub fn from_hex(s: &str) -> Result<Pubkey> {
        let bytes = hex::decode(strip_hex_prefix(s))?;
        Self::from_slice(&bytes)
    }
}

impl std::fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Pubkey({})", hex::encode(self.serialize_compressed()))
    }
}

/// Recovers y from x on the curve equation, selecting the root with the
/// requested parity. Errors if x is not on the curve.
fn decompress_y(x: &FieldElement, want_odd: bool) -> Result<FieldElement> {
    let y = curve_rhs(x)
        .sqrt()
        .ok_or(Error::MalformedInput("x coordinate has no square root"))?;
    if y.is_odd() == want_odd {
        Ok(y)
    } else {
        Ok(y.negate())
    }
}

/// Bytes-in/bytes-out key derivation: interprets `secret` as a big-endian
/// private scalar and returns the requested public key encoding.
pub fn derive_pubkey(secret: &[u8], compressed: bool) -> Result<Vec<u8>> {
    if secret.len() > 32 {
        return Error::DecodingError {
            expected: 32,
            got: secret.len(),
        }
        .into_err();
    }
    let scalar = Scalar::secret_from_slice(secret)?;
    let pubkey = Pubkey::derive(&scalar)?;
    Ok(if compressed {
        pubkey.serialize_compressed().to_vec()
    } else {
        pubkey.serialize_uncompressed().to_vec()
    })
}

#[cfg(test)]
mod tests {
    use super::{derive_pubkey, Pubkey};
    use crate::error::{Error, Result};
    use crate::point::CurvePoint;
    use crate::scalar::{Scalar, CURVE_ORDER};

    #[test]
    fn test_derive_one_is_generator() -> Result<()> {
        let pubkey = Pubkey::derive(&Scalar::one())?;
        assert_eq!(pubkey.point(), CurvePoint::generator());
        Ok(())
    }

    #[test]
    fn test_invalid_secrets() {
        assert_eq!(derive_pubkey(&[0u8; 32], true), Err(Error::InvalidKey));
        let n_bytes = {
            let raw = CURVE_ORDER.to_bytes_be();
            let mut out = [0u8; 32];
            out[32 - raw.len()..].copy_from_slice(&raw);
            out
        };
        assert_eq!(derive_pubkey(&n_bytes, false), Err(Error::InvalidKey));
        assert_eq!(Pubkey::derive(&Scalar::zero()), Err(Error::InvalidKey));
    }

    #[test]
    fn test_compression_round_trip() -> Result<()> {
        let secret = Scalar::secret_from_hex("0x1234567890987654321")?;
        let pubkey = Pubkey::derive(&secret)?;

        let compressed = pubkey.serialize_compressed();
        let uncompressed = pubkey.serialize_uncompressed();
        assert_eq!(uncompressed[0], 0x04);
        assert!(compressed[0] == 0x02 || compressed[0] == 0x03);
        assert_eq!(&compressed[1..], &uncompressed[1..33]);

        assert_eq!(Pubkey::from_slice(&compressed)?, pubkey);
        assert_eq!(Pubkey::from_slice(&uncompressed)?, pubkey);
        Ok(())
    }

    #[test]
    fn test_hex_round_trip() -> Result<()> {
        let secret = Scalar::from_u64(42);
        let pubkey = Pubkey::derive(&secret)?;
        let hex = pubkey.to_hex_uncompressed();
        assert!(hex.starts_with("0x04"));
        assert_eq!(Pubkey::from_hex(&hex)?, pubkey);
        assert_eq!(Pubkey::from_hex(&pubkey.to_hex_compressed())?, pubkey);
        Ok(())
    }

    #[test]
    fn test_rejects_bad_encodings() -> Result<()> {
        let secret = Scalar::from_u64(7);
        let pubkey = Pubkey::derive(&secret)?;

        let mut bad_prefix = pubkey.serialize_compressed();
        bad_prefix[0] = 0x05;
        assert_eq!(
            Pubkey::from_slice(&bad_prefix),
            Err(Error::MalformedInput("unknown public key prefix"))
        );

        let uncompressed = pubkey.serialize_uncompressed();
        assert_eq!(
            Pubkey::from_slice(&uncompressed[..40]),
            Err(Error::DecodingError {
                expected: 65,
                got: 40
            })
        );

        let mut off_curve = pubkey.serialize_uncompressed();
        off_curve[64] ^= 0x01;
        assert_eq!(
            Pubkey::from_slice(&off_curve),
            Err(Error::MalformedInput("point not on the curve"))
        );
        Ok(())
    }
}
