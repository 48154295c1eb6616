//! Software ES256 signer and verifier over NIST P-256.
//!
//! The signer emits ASN.1 DER signatures, matching the convention of
//! platform keystores, so the JWS layer exercises the same DER to
//! fixed-width transcoding path it uses against hardware-backed keys.

use alloc::vec::Vec;

use p256::{
    ecdsa::{
        signature::{Signer as _, Verifier as _},
        Signature, SigningKey, VerifyingKey,
    },
    elliptic_curve::sec1::Coordinates,
};
use rand::rngs::OsRng;

use crate::{
    error::Error,
    jose::{JwsSigner, JwsVerifier, SignatureAlgorithm},
    jwk::{EcCurve, PublicKeyParts},
};

/// Length of the raw secret scalar in bytes
pub const SECRET_KEY_LENGTH: usize = 32;

/// A P-256 keypair usable as a JWS signer (with the secret present)
/// and verifier.
#[derive(Clone, Debug)]
pub struct P256KeyPair {
    // SECURITY: SigningKey zeroizes on drop
    secret: Option<SigningKey>,
    public: VerifyingKey,
}

impl P256KeyPair {
    /// Generate a new random keypair
    pub fn generate() -> Self {
        let secret = SigningKey::random(&mut OsRng);
        let public = *secret.verifying_key();
        Self {
            secret: Some(secret),
            public,
        }
    }

    /// Load a keypair from the raw secret scalar bytes
    pub fn from_secret_bytes(key: &[u8]) -> Result<Self, Error> {
        if key.len() != SECRET_KEY_LENGTH {
            return Err(err_msg!("Invalid p-256 secret key length"));
        }
        let secret =
            SigningKey::from_slice(key).map_err(|_| err_msg!("Invalid p-256 secret key bytes"))?;
        let public = *secret.verifying_key();
        Ok(Self {
            secret: Some(secret),
            public,
        })
    }

    /// Load a verify-only key from an SEC1 encoded point
    pub fn from_public_bytes(key: &[u8]) -> Result<Self, Error> {
        let public = VerifyingKey::from_sec1_bytes(key)
            .map_err(|_| err_msg!("Invalid p-256 public key bytes"))?;
        Ok(Self {
            secret: None,
            public,
        })
    }

    /// The public key members for JWK rendering and thumbprints
    pub fn public_key_parts(&self) -> Result<PublicKeyParts, Error> {
        let point = self.public.to_encoded_point(false);
        let (x, y) = match point.coordinates() {
            Coordinates::Uncompressed { x, y } => (x, y),
            _ => return Err(err_msg!("Cannot convert identity point to JWK")),
        };
        Ok(PublicKeyParts::ec(EcCurve::P256, x, y))
    }
}

impl JwsSigner for P256KeyPair {
    fn algorithm(&self) -> SignatureAlgorithm {
        SignatureAlgorithm::Es256
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, Error> {
        let secret = self
            .secret
            .as_ref()
            .ok_or_else(|| err_msg!(Signer, "Missing secret key"))?;
        let signature: Signature = secret
            .try_sign(message)
            .map_err(err_map!(Signer, "p-256 signing failed"))?;
        Ok(signature.to_der().as_bytes().to_vec())
    }
}

impl JwsVerifier for P256KeyPair {
    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<bool, Error> {
        if let Ok(sig) = Signature::from_der(signature) {
            Ok(self.public.verify(message, &sig).is_ok())
        } else {
            Ok(false)
        }
    }
}
