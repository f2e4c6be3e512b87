use serde::{Deserialize, Serialize};

use crate::encoding_utils::decode_hex_fixed;
use crate::error::{Error, Result};
use crate::scalar::Scalar;

/// An ECDSA signature over the Stark curve. Both components are guaranteed
/// in `[1, n-1]` by construction.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(try_from = "SignatureHex", into = "SignatureHex")]
pub struct Signature {
    r: Scalar,
    s: Scalar,
}

impl Signature {
    pub fn new(r: Scalar, s: Scalar) -> Result<Signature> {
        if r.is_zero() || s.is_zero() {
            return Error::MalformedInput("signature component is zero").into_err();
        }
        Ok(Signature { r, s })
    }

    pub fn from_hex(r: &str, s: &str) -> Result<Signature> {
        Signature::new(Scalar::from_hex(r)?, Scalar::from_hex(s)?)
    }

    pub fn r(&self) -> &Scalar {
        &self.r
    }

    pub fn s(&self) -> &Scalar {
        &self.s
    }
}

/// Hex wire shape for [`Signature`], the `{ r, s }` object of the JSON
/// surface.
#[derive(Serialize, Deserialize)]
struct SignatureHex {
    r: String,
    s: String,
}

impl From<Signature> for SignatureHex {
    fn from(sig: Signature) -> SignatureHex {
        SignatureHex {
            r: sig.r.to_hex(),
            s: sig.s.to_hex(),
        }
    }
}

impl std::convert::TryFrom<SignatureHex> for Signature {
    type Error = Error;
    fn try_from(hex: SignatureHex) -> Result<Signature> {
        Signature::from_hex(&hex.r, &hex.s)
    }
}

/// Width of one split limb in bytes: half of a 256-bit component.
const LIMB_BYTES: usize = 16;

/// The split interop encoding: each 256-bit component as two 128-bit hex
/// limbs, in the wire order `[r_low, r_high, s_low, s_high, recovery?]`.
///
/// Reconstruction concatenates big-endian, high limb first:
/// `r = r_high || r_low`, `s = s_high || s_low`. A missing recovery part
/// defaults to `0`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SplitSignature {
    pub r_low: u128,
    pub r_high: u128,
    pub s_low: u128,
    pub s_high: u128,
    /// Disambiguates which of the two candidate public keys signed; 0 or 1.
    pub recovery: u8,
}

impl SplitSignature {
    pub fn from_signature(sig: &Signature) -> SplitSignature {
        let (r_high, r_low) = split_limbs(&sig.r().to_bytes_be());
        let (s_high, s_low) = split_limbs(&sig.s().to_bytes_be());
        SplitSignature {
            r_low,
            r_high,
            s_low,
            s_high,
            recovery: 0,
        }
    }

    pub fn with_recovery(mut self, recovery: u8) -> Result<SplitSignature> {
        if recovery > 1 {
            return Error::MalformedInput("recovery indicator must be 0 or 1").into_err();
        }
        self.recovery = recovery;
        Ok(self)
    }

    /// Parses the wire order `[r_low, r_high, s_low, s_high, recovery?]`.
    /// Fewer than four parts is `MalformedInput`; parts beyond the fifth are
    /// ignored.
    pub fn from_parts<S: AsRef<str>>(parts: &[S]) -> Result<SplitSignature> {
        if parts.len() < 4 {
            return Error::MalformedInput("expected at least 4 signature parts").into_err();
        }
        let r_low = decode_limb(parts[0].as_ref())?;
        let r_high = decode_limb(parts[1].as_ref())?;
        let s_low = decode_limb(parts[2].as_ref())?;
        let s_high = decode_limb(parts[3].as_ref())?;
        let recovery = match parts.get(4) {
            Some(part) => {
                let value = decode_limb(part.as_ref())?;
                if value > 1 {
                    return Error::MalformedInput("recovery indicator must be 0 or 1").into_err();
                }
                value as u8
            }
            None => 0,
        };
        Ok(SplitSignature {
            r_low,
            r_high,
            s_low,
            s_high,
            recovery,
        })
    }

    /// Merges the limbs back into a range-checked [`Signature`].
    pub fn to_signature(&self) -> Result<Signature> {
        let r = Scalar::from_bytes_be(&merge_limbs(self.r_high, self.r_low))?;
        let s = Scalar::from_bytes_be(&merge_limbs(self.s_high, self.s_low))?;
        Signature::new(r, s)
    }

    /// The five fixed-width `0x`-hex wire parts.
    pub fn to_parts(&self) -> Vec<String> {
        vec![
            format!("0x{:032x}", self.r_low),
            format!("0x{:032x}", self.r_high),
            format!("0x{:032x}", self.s_low),
            format!("0x{:032x}", self.s_high),
            format!("0x{:x}", self.recovery),
        ]
    }
}

fn split_limbs(bytes: &[u8; 32]) -> (u128, u128) {
    let mut high = [0u8; LIMB_BYTES];
    let mut low = [0u8; LIMB_BYTES];
    high.copy_from_slice(&bytes[..LIMB_BYTES]);
    low.copy_from_slice(&bytes[LIMB_BYTES..]);
    (u128::from_be_bytes(high), u128::from_be_bytes(low))
}

fn merge_limbs(high: u128, low: u128) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[..LIMB_BYTES].copy_from_slice(&high.to_be_bytes());
    out[LIMB_BYTES..].copy_from_slice(&low.to_be_bytes());
    out
}

fn decode_limb(s: &str) -> Result<u128> {
    let bytes = decode_hex_fixed(s, LIMB_BYTES)?;
    let mut limb = [0u8; LIMB_BYTES];
    limb.copy_from_slice(&bytes);
    Ok(u128::from_be_bytes(limb))
}

/// Splits a signature into the interop limb encoding, recovery `0`.
pub fn encode_split(sig: &Signature) -> SplitSignature {
    SplitSignature::from_signature(sig)
}

/// Reconstructs a signature from `>= 4` hex limb parts.
pub fn decode_split<S: AsRef<str>>(parts: &[S]) -> Result<Signature> {
    SplitSignature::from_parts(parts)?.to_signature()
}

/// The two signature shapes accepted at the boundary: the standard `{r, s}`
/// object or the split parts array. Resolved to a [`Signature`] exactly once,
/// instead of re-checking the shape ad hoc downstream.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SignatureRepr {
    Standard(Signature),
    Split(Vec<String>),
}

impl SignatureRepr {
    pub fn resolve(&self) -> Result<Signature> {
        match self {
            SignatureRepr::Standard(sig) => Ok(sig.clone()),
            SignatureRepr::Split(parts) => decode_split(parts),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_split, encode_split, Signature, SignatureRepr, SplitSignature};
    use crate::error::{Error, Result};
    use crate::scalar::Scalar;
    use num_bigint::BigUint;

    fn sample_signature() -> Signature {
        Signature::from_hex(
            "0x04821bd80c1e54eb637d4a26eacb587324fc8dc3b3a0eb164e464ff663881b6f",
            "0x0159ba20efdad4e126b6838839cbe9e1d1b55e85b9f200cefe79aff4f520ab10",
        )
        .unwrap()
    }

    #[test]
    fn test_split_round_trip() -> Result<()> {
        let sig = sample_signature();
        let split = encode_split(&sig);
        assert_eq!(split.to_signature()?, sig);
        assert_eq!(decode_split(&split.to_parts())?, sig);
        Ok(())
    }

    #[test]
    fn test_decode_concrete_parts() -> Result<()> {
        let sig = decode_split(&["0x01", "0x02", "0x03", "0x04"])?;
        // r = r_high || r_low = 0x02 << 128 | 0x01, and likewise for s.
        let expected_r = Scalar::new((BigUint::from(2u8) << 128u32) + 1u8)?;
        let expected_s = Scalar::new((BigUint::from(4u8) << 128u32) + 3u8)?;
        assert_eq!(sig.r(), &expected_r);
        assert_eq!(sig.s(), &expected_s);
        Ok(())
    }

    #[test]
    fn test_recovery_default_and_range() -> Result<()> {
        let split = SplitSignature::from_parts(&["0x01", "0x02", "0x03", "0x04"])?;
        assert_eq!(split.recovery, 0);
        let split = SplitSignature::from_parts(&["0x01", "0x02", "0x03", "0x04", "0x1"])?;
        assert_eq!(split.recovery, 1);
        assert_eq!(
            SplitSignature::from_parts(&["0x01", "0x02", "0x03", "0x04", "0x2"]),
            Err(Error::MalformedInput("recovery indicator must be 0 or 1"))
        );

        let split = encode_split(&sample_signature()).with_recovery(1)?;
        assert_eq!(split.recovery, 1);
        assert_eq!(
            split.with_recovery(2),
            Err(Error::MalformedInput("recovery indicator must be 0 or 1"))
        );
        Ok(())
    }

    #[test]
    fn test_too_few_parts() {
        assert_eq!(
            decode_split(&["0x01", "0x02", "0x03"]),
            Err(Error::MalformedInput("expected at least 4 signature parts"))
        );
    }

    #[test]
    fn test_limb_too_wide() {
        let wide = "0x0100000000000000000000000000000000";
        assert!(matches!(
            decode_split(&[wide, "0x02", "0x03", "0x04"]),
            Err(Error::DecodingError { expected: 16, .. })
        ));
    }

    #[test]
    fn test_zero_components_rejected() {
        assert_eq!(
            decode_split(&["0x00", "0x00", "0x03", "0x04"]),
            Err(Error::MalformedInput("signature component is zero"))
        );
    }

    #[test]
    fn test_parts_are_fixed_width() {
        let sig = sample_signature();
        let parts = encode_split(&sig).to_parts();
        assert_eq!(parts.len(), 5);
        for part in &parts[..4] {
            assert_eq!(part.len(), 2 + 32);
        }
        assert_eq!(parts[4], "0x0");
    }

    #[test]
    fn test_signature_json_shape() -> Result<()> {
        let sig = sample_signature();
        let json = serde_json::to_string(&sig).unwrap();
        assert!(json.contains("\"r\""));
        let back: Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sig);
        Ok(())
    }

    #[test]
    fn test_repr_resolves_both_shapes() -> Result<()> {
        let sig = sample_signature();

        let standard: SignatureRepr =
            serde_json::from_str(&serde_json::to_string(&sig).unwrap()).unwrap();
        assert_eq!(standard.resolve()?, sig);

        let parts_json = serde_json::to_string(&encode_split(&sig).to_parts()).unwrap();
        let split: SignatureRepr = serde_json::from_str(&parts_json).unwrap();
        assert_eq!(split.resolve()?, sig);
        Ok(())
    }

    #[test]
    fn test_json_rejects_out_of_range() {
        // r above the curve order must fail at deserialization.
        let json = r#"{
            "r": "0x0800000000000010ffffffffffffffffb781126dcae7b2321e66a241adc64d2f",
            "s": "0x01"
        }"#;
        assert!(serde_json::from_str::<Signature>(json).is_err());
    }
}
