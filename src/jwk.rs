//! Public JWK rendering and RFC 7638 thumbprints.

use alloc::{string::String, string::ToString, vec::Vec};

use sha2::{Digest, Sha256};

use crate::{
    b64,
    bigint::to_unsigned_fixed_width,
    json::{build_sorted_object, JsonObject},
};

pub static JWK_KEY_TYPE_EC: &str = "EC";
pub static JWK_KEY_TYPE_RSA: &str = "RSA";

/// Supported elliptic curves for EC public keys
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EcCurve {
    /// NIST P-256
    P256,
    /// NIST P-384
    P384,
    /// NIST P-521
    P521,
    /// secp256k1
    Secp256K1,
}

impl EcCurve {
    /// The JWK `crv` member value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::P256 => "P-256",
            Self::P384 => "P-384",
            Self::P521 => "P-521",
            Self::Secp256K1 => "secp256k1",
        }
    }

    /// Coordinate width in bytes: `ceil(field size in bits / 8)`
    pub const fn coordinate_length(&self) -> usize {
        match self {
            Self::P256 | Self::Secp256K1 => 32,
            Self::P384 => 48,
            Self::P521 => 66,
        }
    }
}

/// The required public members of an RSA or EC key, as defined by RFC
/// 7638 for thumbprint computation.
///
/// Constructors accept big-endian integer magnitudes in any rendering
/// (sign-padded or not); coordinates and moduli are normalized to the
/// unsigned form JOSE requires.
#[derive(Clone, Debug, PartialEq)]
pub enum PublicKeyParts {
    /// RSA modulus and public exponent
    Rsa {
        /// Modulus magnitude, big-endian
        n: Vec<u8>,
        /// Public exponent magnitude, big-endian
        e: Vec<u8>,
    },
    /// EC curve and affine point coordinates
    Ec {
        /// The curve
        crv: EcCurve,
        /// X coordinate, zero-padded to the coordinate length
        x: Vec<u8>,
        /// Y coordinate, zero-padded to the coordinate length
        y: Vec<u8>,
    },
}

impl PublicKeyParts {
    /// Create RSA public key parts from big-endian magnitudes
    pub fn rsa(n: &[u8], e: &[u8]) -> Self {
        Self::Rsa {
            n: to_unsigned_fixed_width(n, None),
            e: to_unsigned_fixed_width(e, None),
        }
    }

    /// Create EC public key parts from big-endian coordinate magnitudes
    pub fn ec(crv: EcCurve, x: &[u8], y: &[u8]) -> Self {
        let width = crv.coordinate_length();
        Self::Ec {
            crv,
            x: to_unsigned_fixed_width(x, Some(width)),
            y: to_unsigned_fixed_width(y, Some(width)),
        }
    }

    /// Render the public JWK containing only the required members, in
    /// the lexicographic member order RFC 7638 mandates.
    pub fn to_jwk(&self) -> JsonObject {
        match self {
            Self::Rsa { n, e } => build_sorted_object(|b| {
                b.put("e", b64::encode(e));
                b.put("kty", JWK_KEY_TYPE_RSA);
                b.put("n", b64::encode(n));
            }),
            Self::Ec { crv, x, y } => build_sorted_object(|b| {
                b.put("crv", crv.as_str());
                b.put("kty", JWK_KEY_TYPE_EC);
                b.put("x", b64::encode(x));
                b.put("y", b64::encode(y));
            }),
        }
    }

    /// Compute the RFC 7638 thumbprint: SHA-256 over the UTF-8 bytes
    /// of the canonical JWK, Base64URL-encoded without padding.
    ///
    /// Commonly used as a stable `kid` value.
    pub fn thumbprint(&self) -> String {
        let canon = self.to_jwk().to_string();
        let digest = Sha256::digest(canon.as_bytes());
        b64::encode(digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::b64;

    // RFC 7638 §3.1 example key
    const RFC7638_N: &str = "0vx7agoebGcQSuuPiLJXZptN9nndrQmbXEps2aiAFbWhM78LhWx4cbbfAAtVT86zwu1RK7aPFFxuhDR1L6tSoc_BJECPebWKRXjBZCiFV4n3oknjhMstn64tZ_2W-5JsGY4Hc5n9yBXArwl93lqt7_RN5w6Cf0h4QyQ5v-65YGjQR0_FDW2QvzqY368QQMicAtaSqzs8KJZgnYb9c7d0zgdAZHzu6qMQvRL5hajrn1n91CbOpbISD08qNLyrdkt-bFTWhAI4vMQFh6WeZu0fM4lFd2NcRwr3XPksINHaQ-G_xBniIqbw0Ls1jF44-csFCur-kEgU8awapJzKnqDKgw";
    const RFC7638_E: &str = "AQAB";
    const RFC7638_THUMB: &str = "NzbLsXh8uDCcd-6MNwXF4W_7noWXFZAfHkxZsRGC9Xs";

    #[test]
    fn rsa_thumbprint_rfc7638() {
        let n = b64::decode(RFC7638_N).unwrap();
        let e = b64::decode(RFC7638_E).unwrap();
        let parts = PublicKeyParts::rsa(&n, &e);
        assert_eq!(parts.thumbprint(), RFC7638_THUMB);
        // idempotent
        assert_eq!(parts.thumbprint(), parts.thumbprint());
    }

    #[test]
    fn rsa_thumbprint_sensitive_to_members() {
        let n = b64::decode(RFC7638_N).unwrap();
        let e = b64::decode(RFC7638_E).unwrap();
        let parts = PublicKeyParts::rsa(&n, &e);
        let swapped = PublicKeyParts::rsa(&n, &[0x01, 0x00, 0x03]);
        assert_ne!(parts.thumbprint(), swapped.thumbprint());
    }

    #[test]
    fn ec_jwk_member_order() {
        // from JWS RFC https://tools.ietf.org/html/rfc7515 appendix A.3
        let x = b64::decode("f83OJ3D2xF1Bg8vub9tLe1gHMzV76e8Tus9uPHvRVEU").unwrap();
        let y = b64::decode("x_FEzRu9m36HLN_tue659LNpXW6pCyStikYjKIWI5a0").unwrap();
        let parts = PublicKeyParts::ec(EcCurve::P256, &x, &y);
        let jwk = parts.to_jwk().to_string();
        assert_eq!(
            jwk,
            "{\"crv\":\"P-256\",\"kty\":\"EC\",\
             \"x\":\"f83OJ3D2xF1Bg8vub9tLe1gHMzV76e8Tus9uPHvRVEU\",\
             \"y\":\"x_FEzRu9m36HLN_tue659LNpXW6pCyStikYjKIWI5a0\"}"
        );
    }

    #[test]
    fn ec_coordinates_padded() {
        // a 31-byte coordinate must be left-padded to 32
        let x = [0x7fu8; 31];
        let y = [0x11u8; 32];
        let parts = PublicKeyParts::ec(EcCurve::P256, &x, &y);
        match &parts {
            PublicKeyParts::Ec { x, y, .. } => {
                assert_eq!(x.len(), 32);
                assert_eq!(x[0], 0);
                assert_eq!(y.len(), 32);
            }
            _ => unreachable!(),
        }
    }
}
