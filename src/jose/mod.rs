//! The JOSE object model: algorithms, protected and unprotected
//! headers, payloads and the compact JWS codec.

pub mod alg;
pub mod ecdsa;
pub mod header;
pub mod jws;
pub mod payload;

pub use self::alg::{parse_algorithm, Algorithm, EncryptionAlgorithm, SignatureAlgorithm};
pub use self::header::{Header, HeaderBuilder, UnprotectedHeader, UnprotectedHeaderBuilder};
pub use self::jws::{JwsObject, JwsSigner, JwsState, JwsVerifier};
pub use self::payload::Payload;
