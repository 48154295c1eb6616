//! Fixed-width rendering of big-integer magnitudes.
//!
//! JOSE encodes RSA moduli, exponents and EC coordinates as the unsigned
//! big-endian magnitude of the integer, with no sign byte and (for EC
//! coordinates) zero left-padding to the curve field width.

use alloc::vec::Vec;

/// Render a big-endian magnitude as an unsigned, optionally fixed-width
/// byte array.
///
/// Leading zero bytes (including a two's-complement sign-padding byte)
/// are stripped. When `byte_width` is given the result is left-padded
/// with zeros to exactly that width; a magnitude wider than the target
/// is returned as-is, never truncated, since that indicates a caller
/// contract violation rather than data to be corrected.
pub fn to_unsigned_fixed_width(magnitude: &[u8], byte_width: Option<usize>) -> Vec<u8> {
    let stripped = strip_leading_zeros(magnitude);
    match byte_width {
        Some(width) if stripped.len() < width => {
            let mut out = Vec::with_capacity(width);
            out.resize(width - stripped.len(), 0);
            out.extend_from_slice(stripped);
            out
        }
        _ => stripped.to_vec(),
    }
}

/// Strip leading zero bytes, keeping at least one byte.
pub fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let mut start = 0;
    while start + 1 < bytes.len() && bytes[start] == 0 {
        start += 1;
    }
    &bytes[start..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn strips_sign_byte() {
        // two's-complement rendering of a 256-bit value with the high bit set
        let signed = hex!("00ffac1501c56c3aff6bcf1547dcc4c40d06fec82fe5dd60ea69f46c1ddf30dc4f");
        let out = to_unsigned_fixed_width(&signed, Some(32));
        assert_eq!(out.len(), 32);
        assert_eq!(out[..], signed[1..]);
    }

    #[test]
    fn pads_to_width() {
        let out = to_unsigned_fixed_width(&hex!("03e7"), Some(32));
        assert_eq!(out.len(), 32);
        assert_eq!(out[..30], [0u8; 30]);
        assert_eq!(out[30..], hex!("03e7"));
    }

    #[test]
    fn exact_width_unmodified() {
        let coord = hex!("1a2b3c4d1a2b3c4d1a2b3c4d1a2b3c4d1a2b3c4d1a2b3c4d1a2b3c4d1a2b3c4d");
        assert_eq!(to_unsigned_fixed_width(&coord, Some(32)), coord);
    }

    #[test]
    fn oversized_returned_as_is() {
        let wide = hex!("0102030405");
        assert_eq!(to_unsigned_fixed_width(&wide, Some(4)), wide);
    }

    #[test]
    fn unconstrained_width() {
        assert_eq!(to_unsigned_fixed_width(&hex!("000000"), None), hex!("00"));
        assert_eq!(to_unsigned_fixed_width(&hex!("010001"), None), hex!("010001"));
    }
}
