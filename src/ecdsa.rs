use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{Error, Result};
use crate::field::FieldElement;
use crate::point::CurvePoint;
use crate::pubkey::Pubkey;
use crate::scalar::Scalar;
use crate::signature::Signature;

type HmacSha256 = Hmac<Sha256>;

/// Deterministic nonce stream per RFC 6979 (HMAC-SHA256), keyed on the
/// secret scalar and the digest. `next` yields successive candidates so the
/// signing loop can skip the rare zero-r/zero-s cases.
struct Rfc6979 {
    k: [u8; 32],
    v: [u8; 32],
}

fn hmac_digest(key: &[u8], chunks: &[&[u8]]) -> [u8; 32] {
    // 32-byte keys are always a valid HMAC-SHA256 key length.
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    for chunk in chunks {
        mac.update(chunk);
    }
    mac.finalize().into_bytes().into()
}

impl Rfc6979 {
    fn new(secret: &Scalar, digest: &FieldElement) -> Rfc6979 {
        let x = secret.to_bytes_be();
        let h1 = digest.to_bytes_be();
        let mut v = [0x01u8; 32];
        let mut k = [0x00u8; 32];

        k = hmac_digest(&k, &[&v, &[0x00], &x, &h1]);
        v = hmac_digest(&k, &[&v]);
        k = hmac_digest(&k, &[&v, &[0x01], &x, &h1]);
        v = hmac_digest(&k, &[&v]);

        Rfc6979 { k, v }
    }

    fn next(&mut self) -> Scalar {
        loop {
            self.v = hmac_digest(&self.k, &[&self.v]);
            let candidate = Scalar::reduce(num_bigint::BigUint::from_bytes_be(&self.v));
            if !candidate.is_zero() {
                return candidate;
            }
            self.k = hmac_digest(&self.k, &[&self.v, &[0x00]]);
            self.v = hmac_digest(&self.k, &[&self.v]);
        }
    }
}

/// Signs a digest with the standard ECDSA equation on the Stark curve:
/// `r = (k*G).x mod n`, `s = k^-1 * (z + r*d) mod n`.
///
/// Nonces are deterministic (RFC 6979), so signing the same digest with the
/// same key always yields the same signature. Callers wanting randomized
/// nonces supply their own via [`sign_with_nonce`].
pub fn sign(digest: &FieldElement, secret: &Scalar) -> Result<Signature> {
    if secret.is_zero() {
        return Error::InvalidKey.into_err();
    }
    let mut nonces = Rfc6979::new(secret, digest);
    loop {
        let k = nonces.next();
        if let Some(sig) = sign_inner(digest, secret, &k) {
            return Ok(sig);
        }
    }
}

/// Signs with a caller-supplied nonce. The nonce must be unique and
/// unpredictable per (digest, key) pair; reuse leaks the private key.
pub fn sign_with_nonce(digest: &FieldElement, secret: &Scalar, nonce: &Scalar) -> Result<Signature> {
    if secret.is_zero() {
        return Error::InvalidKey.into_err();
    }
    if nonce.is_zero() {
        return Error::MalformedInput("signing nonce is zero").into_err();
    }
    sign_inner(digest, secret, nonce)
        .ok_or(Error::MalformedInput("nonce produced a degenerate signature"))
}

fn sign_inner(digest: &FieldElement, secret: &Scalar, k: &Scalar) -> Option<Signature> {
    let z = Scalar::from_field(digest);
    let r_point = CurvePoint::generator().mul(k);
    let r = Scalar::from_field(r_point.x()?);
    if r.is_zero() {
        return None;
    }
    let s = &k.invert() * &(&z + &(&r * secret));
    if s.is_zero() {
        return None;
    }
    // Components checked nonzero above.
    Signature::new(r, s).ok()
}

/// Verifies a signature: `w = s^-1`, `R' = (z*w)*G + (r*w)*Q`, accept iff
/// `R'.x = r (mod n)`.
///
/// A well-formed but wrong signature is `Ok(false)`; out-of-range components
/// are rejected as `MalformedInput` (the `Signature` constructors already
/// enforce this, re-checked here for defense at the trust boundary).
pub fn verify(sig: &Signature, digest: &FieldElement, pubkey: &Pubkey) -> Result<bool> {
    if sig.r().is_zero() || sig.s().is_zero() {
        return Error::MalformedInput("signature component is zero").into_err();
    }
    let z = Scalar::from_field(digest);
    let w = sig.s().invert();
    let u1 = &z * &w;
    let u2 = sig.r() * &w;

    let candidate = CurvePoint::generator()
        .mul(&u1)
        .add(&pubkey.point().mul(&u2));
    let x = match candidate.x() {
        Some(x) => x,
        None => return Ok(false),
    };
    Ok(&Scalar::from_field(x) == sig.r())
}
