use alloc::{
    format,
    string::{String, ToString},
    vec::Vec,
};

use crate::{
    b64,
    error::Error,
    jose::{
        alg::{Algorithm, SignatureAlgorithm},
        ecdsa,
        header::Header,
        payload::Payload,
    },
};

/// Signature creation capability, implemented over a platform keystore
/// or a software key.
///
/// The signer may block on hardware-backed key operations; callers
/// should keep it off latency-sensitive execution contexts. Errors are
/// propagated to the caller unchanged, never masked, since a missing
/// key must not be mistaken for an unsigned object.
pub trait JwsSigner {
    /// The algorithm this signer produces signatures for
    fn algorithm(&self) -> SignatureAlgorithm;

    /// Sign the message, returning the raw signature bytes in the
    /// platform convention: PKCS#1/PSS bytes for RSA, an ASN.1 DER
    /// `SEQUENCE { r, s }` for ECDSA.
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, Error>;
}

/// Signature verification capability.
///
/// An invalid signature is the `Ok(false)` outcome; errors are reserved
/// for conditions that prevented verification from running at all.
pub trait JwsVerifier {
    /// Check the signature over the message, in the same byte
    /// convention the matching [`JwsSigner`] produces
    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<bool, Error>;
}

/// The signing state of a [`JwsObject`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JwsState {
    /// Header and payload only
    Unsigned,
    /// A signature is attached
    Signed,
}

/// A JSON Web Signature object in compact serialization.
///
/// An object starts `Unsigned` and becomes `Signed` through exactly one
/// [`sign`](Self::sign) call (or by being parsed from a complete compact
/// serialization). Verification never mutates the object; it reports
/// `Ok(true)`/`Ok(false)` for a signature that was checked and an error
/// for input that could not be checked at all.
#[derive(Clone, Debug, PartialEq)]
pub struct JwsObject {
    header: Header,
    payload: Payload,
    signing_input: String,
    signature: Option<Vec<u8>>,
}

impl JwsObject {
    /// Create an unsigned object from a header and payload.
    ///
    /// The signing input `BASE64URL(header) || "." || BASE64URL(payload)`
    /// is fixed here; for a parsed header the original encoded bytes are
    /// used verbatim.
    pub fn new(header: Header, payload: Payload) -> Result<Self, Error> {
        let encoded_payload = payload
            .to_base64url()
            .ok_or_else(|| err_msg!(Input, "Payload cannot be encoded"))?;
        let signing_input = format!("{}.{}", header.to_base64url(), encoded_payload);
        Ok(Self {
            header,
            payload,
            signing_input,
            signature: None,
        })
    }

    /// Parse a compact serialization `header.payload.signature`.
    ///
    /// The string must split into exactly three non-empty Base64URL
    /// segments; anything else is a `Format` error, raised before any
    /// cryptographic material is touched. The signing input is retained
    /// exactly as received.
    pub fn parse(compact: &str) -> Result<Self, Error> {
        let parts: Vec<&str> = compact.split('.').collect();
        let [encoded_header, encoded_payload, encoded_signature]: [&str; 3] = parts
            .try_into()
            .map_err(|_| err_msg!(Format, "Invalid compact JWS: expected 3 segments"))?;
        if encoded_header.is_empty() || encoded_payload.is_empty() || encoded_signature.is_empty() {
            return Err(err_msg!(Format, "Invalid compact JWS: empty segment"));
        }
        let header = Header::from_base64url(encoded_header)?;
        // validate the payload alphabet up front
        b64::decode(encoded_payload)?;
        let signature = b64::decode(encoded_signature)?;
        Ok(Self {
            header,
            payload: Payload::Base64Url(encoded_payload.to_string()),
            signing_input: format!("{}.{}", encoded_header, encoded_payload),
            signature: Some(signature),
        })
    }

    /// The protected header
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The payload
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// The signing state
    pub fn state(&self) -> JwsState {
        if self.signature.is_some() {
            JwsState::Signed
        } else {
            JwsState::Unsigned
        }
    }

    /// Whether a signature is attached
    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// The signing input bytes, `BASE64URL(header) "." BASE64URL(payload)`
    pub fn signing_input(&self) -> &[u8] {
        self.signing_input.as_bytes()
    }

    /// The attached signature in compact form (fixed-width `R || S` for
    /// ECDSA algorithms), if signed
    pub fn signature(&self) -> Option<&[u8]> {
        self.signature.as_deref()
    }

    /// Sign the object, transitioning `Unsigned` to `Signed`.
    ///
    /// The header algorithm must be a JWS algorithm and must match the
    /// signer. ECDSA signatures are transcoded from the signer's DER
    /// output to the fixed-width form compact JWS requires.
    pub fn sign(&mut self, signer: &impl JwsSigner) -> Result<(), Error> {
        if self.signature.is_some() {
            return Err(err_msg!(State, "The JWS object is already signed"));
        }
        let alg = self.signature_algorithm()?;
        if *alg != signer.algorithm() {
            return Err(err_msg!(
                Input,
                "Header algorithm {} does not match signer algorithm {}",
                alg,
                signer.algorithm()
            ));
        }
        #[cfg(feature = "logger")]
        log::debug!("signing JWS object with {}", alg);
        let raw = signer.sign(self.signing_input.as_bytes())?;
        self.signature = Some(match alg.field_length() {
            Some(field_length) => ecdsa::der_to_concat(&raw, field_length)?,
            None => raw,
        });
        Ok(())
    }

    /// Verify the attached signature without mutating the object.
    ///
    /// For ECDSA algorithms the stored fixed-width signature is
    /// transcoded back to DER before the verifier is called. Returns
    /// `Ok(false)` for a signature that was checked and rejected;
    /// errors mean verification could not run.
    pub fn verify(&self, verifier: &impl JwsVerifier) -> Result<bool, Error> {
        let signature = self
            .signature
            .as_ref()
            .ok_or_else(|| err_msg!(State, "The JWS object is not signed"))?;
        let alg = self.signature_algorithm()?;
        #[cfg(feature = "logger")]
        log::debug!("verifying JWS object with {}", alg);
        match alg.field_length() {
            Some(_) => {
                let der = ecdsa::concat_to_der(signature)?;
                verifier.verify(self.signing_input.as_bytes(), &der)
            }
            None => verifier.verify(self.signing_input.as_bytes(), signature),
        }
    }

    /// Emit the compact serialization. The object must be signed.
    pub fn serialize(&self) -> Result<String, Error> {
        let signature = self
            .signature
            .as_ref()
            .ok_or_else(|| err_msg!(State, "The JWS object is not signed"))?;
        Ok(format!("{}.{}", self.signing_input, b64::encode(signature)))
    }

    fn signature_algorithm(&self) -> Result<&SignatureAlgorithm, Error> {
        match self.header.algorithm() {
            Algorithm::Jws(alg) => Ok(alg),
            other => Err(err_msg!(
                Unsupported,
                "Not a JWS algorithm: {}",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use alloc::vec;

    struct StaticSigner {
        alg: SignatureAlgorithm,
        output: Vec<u8>,
    }

    impl JwsSigner for StaticSigner {
        fn algorithm(&self) -> SignatureAlgorithm {
            self.alg.clone()
        }

        fn sign(&self, _message: &[u8]) -> Result<Vec<u8>, Error> {
            Ok(self.output.clone())
        }
    }

    struct ExpectVerifier {
        message: Vec<u8>,
        signature: Vec<u8>,
    }

    impl JwsVerifier for ExpectVerifier {
        fn verify(&self, message: &[u8], signature: &[u8]) -> Result<bool, Error> {
            Ok(message == &self.message[..] && signature == &self.signature[..])
        }
    }

    fn rs256_object() -> JwsObject {
        let header = Header::builder(Algorithm::Jws(SignatureAlgorithm::Rs256)).build();
        JwsObject::new(header, Payload::from("In RSA we trust!")).unwrap()
    }

    #[test]
    fn signing_input_vector() {
        let jws = rs256_object();
        assert_eq!(
            jws.signing_input(),
            b"eyJhbGciOiJSUzI1NiJ9.SW4gUlNBIHdlIHRydXN0IQ"
        );
        assert_eq!(jws.state(), JwsState::Unsigned);
    }

    #[test]
    fn rsa_signature_passes_through() {
        let mut jws = rs256_object();
        let sig = vec![0xabu8; 256];
        jws.sign(&StaticSigner {
            alg: SignatureAlgorithm::Rs256,
            output: sig.clone(),
        })
        .unwrap();
        assert_eq!(jws.signature(), Some(&sig[..]));
        let compact = jws.serialize().unwrap();
        assert_eq!(compact.split('.').count(), 3);
        assert!(compact.starts_with("eyJhbGciOiJSUzI1NiJ9.SW4gUlNBIHdlIHRydXN0IQ."));
    }

    #[test]
    fn ecdsa_signature_is_transcoded() {
        let raw: Vec<u8> = (1u8..=64).collect();
        let der = ecdsa::concat_to_der(&raw).unwrap();

        let header = Header::builder(Algorithm::Jws(SignatureAlgorithm::Es256)).build();
        let mut jws = JwsObject::new(header, Payload::from("msg")).unwrap();
        jws.sign(&StaticSigner {
            alg: SignatureAlgorithm::Es256,
            output: der.clone(),
        })
        .unwrap();
        // stored in fixed-width form
        assert_eq!(jws.signature(), Some(&raw[..]));

        // the verifier receives the DER form again
        let ok = jws
            .verify(&ExpectVerifier {
                message: jws.signing_input().to_vec(),
                signature: der,
            })
            .unwrap();
        assert!(ok);
    }

    #[test]
    fn sign_twice_is_a_state_error() {
        let mut jws = rs256_object();
        let signer = StaticSigner {
            alg: SignatureAlgorithm::Rs256,
            output: vec![1, 2, 3],
        };
        jws.sign(&signer).unwrap();
        assert_eq!(jws.sign(&signer).unwrap_err().kind(), ErrorKind::State);
    }

    #[test]
    fn algorithm_mismatch_is_rejected() {
        let mut jws = rs256_object();
        let err = jws
            .sign(&StaticSigner {
                alg: SignatureAlgorithm::Es256,
                output: vec![],
            })
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Input);
        assert_eq!(jws.state(), JwsState::Unsigned);
    }

    #[test]
    fn verify_unsigned_is_a_state_error() {
        let jws = rs256_object();
        let verifier = ExpectVerifier {
            message: vec![],
            signature: vec![],
        };
        assert_eq!(jws.verify(&verifier).unwrap_err().kind(), ErrorKind::State);
    }

    #[test]
    fn parse_round_trip() {
        let mut jws = rs256_object();
        jws.sign(&StaticSigner {
            alg: SignatureAlgorithm::Rs256,
            output: vec![0x5a; 32],
        })
        .unwrap();
        let compact = jws.serialize().unwrap();
        let parsed = JwsObject::parse(&compact).unwrap();
        assert_eq!(parsed.serialize().unwrap(), compact);
        assert_eq!(parsed.signing_input(), jws.signing_input());
        assert_eq!(parsed.signature(), jws.signature());
        assert_eq!(parsed.payload().to_text().unwrap(), "In RSA we trust!");
    }

    #[test]
    fn parse_rejects_malformed_segments() {
        for bad in ["a.b", "a.b.c.d", "", "..", "a..c", ".b.c", "a.b."] {
            assert_eq!(
                JwsObject::parse(bad).unwrap_err().kind(),
                ErrorKind::Format,
                "{:?} should fail",
                bad
            );
        }
        // invalid alphabet in a segment
        assert_eq!(
            JwsObject::parse("eyJhbGciOiJSUzI1NiJ9.SW4g.+/==")
                .unwrap_err()
                .kind(),
            ErrorKind::Format
        );
    }

    #[test]
    fn signer_error_propagates() {
        struct FailingSigner;
        impl JwsSigner for FailingSigner {
            fn algorithm(&self) -> SignatureAlgorithm {
                SignatureAlgorithm::Rs256
            }
            fn sign(&self, _message: &[u8]) -> Result<Vec<u8>, Error> {
                Err(err_msg!(Signer, "key \"rsa\" not found in keystore"))
            }
        }
        let mut jws = rs256_object();
        let err = jws.sign(&FailingSigner).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Signer);
        assert_eq!(jws.state(), JwsState::Unsigned);
    }
}
