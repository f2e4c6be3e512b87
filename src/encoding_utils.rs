use crate::error::{Error, Result};

/// Encodes bytes as a `0x`-prefixed lowercase hex string.
pub fn encode_hex_prefixed(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

pub fn strip_hex_prefix(s: &str) -> &str {
    if let Some(stripped) = s.strip_prefix("0x") {
        stripped
    } else if let Some(stripped) = s.strip_prefix("0X") {
        stripped
    } else {
        s
    }
}

/// Decodes a hex string (with or without `0x` prefix) of at most `width`
/// bytes into a left-zero-padded buffer of exactly `width` bytes.
pub fn decode_hex_fixed(s: &str, width: usize) -> Result<Vec<u8>> {
    let digits = strip_hex_prefix(s);
    let padded;
    let digits = if digits.len() % 2 == 1 {
        padded = format!("0{}", digits);
        &padded
    } else {
        digits
    };
    let bytes = hex::decode(digits)?;
    if bytes.len() > width {
        return Error::DecodingError {
            expected: width,
            got: bytes.len(),
        }
        .into_err();
    }
    let mut out = vec![0u8; width];
    out[width - bytes.len()..].copy_from_slice(&bytes);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{decode_hex_fixed, encode_hex_prefixed, strip_hex_prefix};
    use crate::error::{Error, Result};

    #[test]
    fn test_encode_hex_prefixed() {
        assert_eq!(encode_hex_prefixed(&[0x01, 0xab]), "0x01ab");
        assert_eq!(encode_hex_prefixed(&[]), "0x");
    }

    #[test]
    fn test_strip_hex_prefix() {
        assert_eq!(strip_hex_prefix("0x01"), "01");
        assert_eq!(strip_hex_prefix("0X01"), "01");
        assert_eq!(strip_hex_prefix("01"), "01");
    }

    #[test]
    fn test_decode_hex_fixed_pads_left() -> Result<()> {
        assert_eq!(decode_hex_fixed("0x1", 4)?, vec![0, 0, 0, 1]);
        assert_eq!(decode_hex_fixed("0x0201", 4)?, vec![0, 0, 2, 1]);
        assert_eq!(decode_hex_fixed("ff", 1)?, vec![0xff]);
        Ok(())
    }

    #[test]
    fn test_decode_hex_fixed_overflow() {
        assert_eq!(
            decode_hex_fixed("0x010203", 2),
            Err(Error::DecodingError {
                expected: 2,
                got: 3
            })
        );
    }

    #[test]
    fn test_decode_hex_fixed_bad_digit() {
        assert!(matches!(
            decode_hex_fixed("0xzz", 4),
            Err(Error::FromHex(_))
        ));
    }
}
