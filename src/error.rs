use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    /// Private scalar is zero or not below the curve order.
    #[error("invalid private key")]
    InvalidKey,

    /// Structurally unusable input: out-of-range signature components,
    /// undecodable public keys, missing split-signature parts.
    #[error("malformed input: {0}")]
    MalformedInput(&'static str),

    /// A fixed-width field had the wrong byte length.
    #[error("decoding error, expected {expected} bytes, got {got}")]
    DecodingError { expected: usize, got: usize },

    #[error("hex decoding failed: {0}")]
    FromHex(#[from] hex::FromHexError),
}

impl Error {
    pub fn into_err<T>(self) -> Result<T> {
        Err(self)
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn test_variants_compare() {
        assert_eq!(Error::InvalidKey, Error::InvalidKey);
        assert_ne!(
            Error::MalformedInput("a"),
            Error::DecodingError { expected: 32, got: 16 }
        );
        let from_hex = Error::from(hex::decode("0g").unwrap_err());
        assert_eq!(from_hex.clone(), from_hex);
    }
}
