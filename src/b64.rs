//! Base64URL encoding without padding, as required by JOSE (RFC 7515 §2).

use alloc::{string::String, vec::Vec};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;

use crate::error::Error;

/// Encode bytes with the URL-safe alphabet, stripping all `=` padding.
pub fn encode(input: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Decode unpadded Base64URL text.
///
/// Padding characters and symbols outside the URL-safe alphabet are
/// rejected with a `Format` error.
pub fn decode(input: impl AsRef<[u8]>) -> Result<Vec<u8>, Error> {
    URL_SAFE_NO_PAD
        .decode(input)
        .map_err(err_map!(Format, "Invalid Base64URL data"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn round_trip() {
        let msg = b"In RSA we trust!";
        let enc = encode(msg);
        assert_eq!(enc, "SW4gUlNBIHdlIHRydXN0IQ");
        assert_eq!(decode(&enc).unwrap(), msg);
    }

    #[test]
    fn no_padding_emitted() {
        for len in 0..16 {
            let data = alloc::vec![0xa5u8; len];
            assert!(!encode(&data).contains('='));
            assert_eq!(decode(encode(&data)).unwrap(), data);
        }
    }

    #[test]
    fn reject_padding_and_alphabet() {
        assert_eq!(decode("SW4g=").unwrap_err().kind(), ErrorKind::Format);
        assert_eq!(decode("a+b/").unwrap_err().kind(), ErrorKind::Format);
    }
}
