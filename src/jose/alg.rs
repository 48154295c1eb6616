use alloc::string::{String, ToString};
use core::fmt::{self, Display, Formatter};

use serde_json::{Map, Value};

use crate::error::Error;

/// The `alg` header parameter: the unsecured marker, a JWS signature
/// algorithm or a JWE key management algorithm.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Algorithm {
    /// The unsecured `"none"` marker
    None,
    /// A JWS signature algorithm
    Jws(SignatureAlgorithm),
    /// A JWE key management algorithm
    Jwe(EncryptionAlgorithm),
}

impl Algorithm {
    /// The `alg` member value
    pub fn as_str(&self) -> &str {
        match self {
            Self::None => "none",
            Self::Jws(alg) => alg.as_str(),
            Self::Jwe(alg) => alg.as_str(),
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported JWS signature algorithms
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    /// RSASSA-PKCS1-v1_5 using SHA-256
    Rs256,
    /// RSASSA-PKCS1-v1_5 using SHA-384
    Rs384,
    /// RSASSA-PKCS1-v1_5 using SHA-512
    Rs512,
    /// RSASSA-PSS using SHA-256
    Ps256,
    /// RSASSA-PSS using SHA-384
    Ps384,
    /// RSASSA-PSS using SHA-512
    Ps512,
    /// ECDSA using P-256 and SHA-256
    Es256,
    /// ECDSA using secp256k1 and SHA-256
    Es256K,
    /// ECDSA using P-384 and SHA-384
    Es384,
    /// ECDSA using P-521 and SHA-512
    Es512,
    /// EdDSA over Curve25519
    EdDsa,
    /// An algorithm this crate has no special handling for
    Other(String),
}

impl SignatureAlgorithm {
    /// The `alg` member value
    pub fn as_str(&self) -> &str {
        match self {
            Self::Rs256 => "RS256",
            Self::Rs384 => "RS384",
            Self::Rs512 => "RS512",
            Self::Ps256 => "PS256",
            Self::Ps384 => "PS384",
            Self::Ps512 => "PS512",
            Self::Es256 => "ES256",
            Self::Es256K => "ES256K",
            Self::Es384 => "ES384",
            Self::Es512 => "ES512",
            Self::EdDsa => "EdDSA",
            Self::Other(name) => name,
        }
    }

    /// Resolve a registered algorithm name, keeping unknown names as
    /// [`Self::Other`]
    pub fn from_name(name: &str) -> Self {
        match name {
            "RS256" => Self::Rs256,
            "RS384" => Self::Rs384,
            "RS512" => Self::Rs512,
            "PS256" => Self::Ps256,
            "PS384" => Self::Ps384,
            "PS512" => Self::Ps512,
            "ES256" => Self::Es256,
            "ES256K" => Self::Es256K,
            "ES384" => Self::Es384,
            "ES512" => Self::Es512,
            "EdDSA" => Self::EdDsa,
            other => Self::Other(other.to_string()),
        }
    }

    /// Whether signatures for this algorithm require DER to fixed-width
    /// `R || S` transcoding
    pub fn is_ecdsa(&self) -> bool {
        matches!(self, Self::Es256 | Self::Es256K | Self::Es384 | Self::Es512)
    }

    /// Field element width in bytes for ECDSA algorithms
    pub fn field_length(&self) -> Option<usize> {
        match self {
            Self::Es256 | Self::Es256K => Some(32),
            Self::Es384 => Some(48),
            Self::Es512 => Some(66),
            _ => None,
        }
    }

    /// Fixed length of the compact-form signature for ECDSA algorithms
    pub fn signature_length(&self) -> Option<usize> {
        self.field_length().map(|n| n * 2)
    }
}

impl Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported JWE key management algorithms
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EncryptionAlgorithm {
    /// RSAES OAEP using default parameters
    RsaOaep,
    /// RSAES OAEP using SHA-256 and MGF1 with SHA-256
    RsaOaep256,
    /// Direct use of a shared symmetric key
    Dir,
    /// An algorithm this crate has no special handling for
    Other(String),
}

impl EncryptionAlgorithm {
    /// The `alg` member value
    pub fn as_str(&self) -> &str {
        match self {
            Self::RsaOaep => "RSA-OAEP",
            Self::RsaOaep256 => "RSA-OAEP-256",
            Self::Dir => "dir",
            Self::Other(name) => name,
        }
    }

    /// Resolve a registered algorithm name, keeping unknown names as
    /// [`Self::Other`]
    pub fn from_name(name: &str) -> Self {
        match name {
            "RSA-OAEP" => Self::RsaOaep,
            "RSA-OAEP-256" => Self::RsaOaep256,
            "dir" => Self::Dir,
            other => Self::Other(other.to_string()),
        }
    }
}

impl Display for EncryptionAlgorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse the `alg` member of a header JSON object, classifying the
/// algorithm as unsecured (the `"none"` literal), JWE (an `enc` member
/// is present) or JWS (everything else).
pub fn parse_algorithm(json: &Map<String, Value>) -> Result<Algorithm, Error> {
    let name = match json.get("alg") {
        Some(Value::String(name)) => name.as_str(),
        Some(_) => return Err(err_msg!(Format, "Header \"alg\" must be a string")),
        None => return Err(err_msg!(Format, "Missing \"alg\" in header JSON object")),
    };
    if name == "none" {
        Ok(Algorithm::None)
    } else if json.contains_key("enc") {
        Ok(Algorithm::Jwe(EncryptionAlgorithm::from_name(name)))
    } else {
        Ok(Algorithm::Jws(SignatureAlgorithm::from_name(name)))
    }
}
