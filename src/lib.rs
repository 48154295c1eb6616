//! JOSE compact serialization core.
//!
//! This crate implements the protocol-level encoding around JSON Web
//! Signatures (RFC 7515): deterministic JSON construction for header
//! canonicalization, unpadded Base64URL, fixed-width big-integer
//! rendering, DER to concatenated `R || S` transcoding for ECDSA
//! signatures, and RFC 7638 JWK thumbprints. The cryptographic
//! primitives themselves stay behind the injected [`JwsSigner`] and
//! [`JwsVerifier`] capabilities, so keystore-backed and software keys
//! plug in the same way.
//!
//! All core operations are synchronous pure functions over immutable
//! values; sign and verify calls are independently safe to run from
//! multiple threads as long as the injected signer is.

#![no_std]
#![deny(missing_debug_implementations)]
// #![deny(missing_docs)]

extern crate alloc;

#[cfg(any(test, feature = "std"))]
#[macro_use]
extern crate std;

#[macro_use]
mod error;
pub use self::error::{Error, ErrorKind};

pub mod b64;

pub mod bigint;

#[cfg(feature = "p256")]
pub mod es256;

pub mod jose;
pub use self::jose::{
    Algorithm, Header, JwsObject, JwsSigner, JwsState, JwsVerifier, Payload, SignatureAlgorithm,
    UnprotectedHeader,
};

pub mod json;

pub mod jwk;
pub use self::jwk::PublicKeyParts;
