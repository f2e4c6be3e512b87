//! Signing and verification on the STARK-friendly elliptic curve.
//!
//! The crate covers key derivation, hashing message sequences to a field
//! digest, ECDSA signing/verification, and the split-limb signature encoding
//! used for interoperability with Ethereum-curve signers. All operations are
//! pure, synchronous functions of their inputs; there is no I/O and no
//! shared state.
//!
//! Arithmetic is variable-time (`num-bigint`); the crate is intended for
//! interop and verification work, not as a hardened signer for hostile
//! side-channel environments.

mod ecdsa;
pub mod encoding_utils;
pub mod error;
mod field;
mod hash;
mod point;
mod pubkey;
mod scalar;
mod signature;

pub use ecdsa::*;
pub use field::*;
pub use hash::*;
pub use point::*;
pub use pubkey::*;
pub use scalar::*;
pub use signature::*;
