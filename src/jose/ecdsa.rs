//! ECDSA signature transcoding between ASN.1 DER and the fixed-width
//! concatenated `R || S` form required by compact JWS (RFC 7515 §3.4,
//! RFC 7518 §3.4).
//!
//! Platform signers conventionally emit `SEQUENCE { INTEGER r, INTEGER s }`
//! in DER. Compact JWS instead carries the two scalars back to back,
//! each zero-padded to the curve field width. Both directions here are
//! exact inverses of each other.

use alloc::vec::Vec;

use crate::{bigint::strip_leading_zeros, error::Error};

const TAG_SEQUENCE: u8 = 0x30;
const TAG_INTEGER: u8 = 0x02;
const LONG_FORM_ONE_BYTE: u8 = 0x81;

/// Transcode a DER `SEQUENCE { INTEGER r, INTEGER s }` signature into
/// fixed-width `R || S`, with each half zero-padded to `field_length`
/// bytes (`ceil(curve bits / 8)`).
///
/// Only short-form and single-byte long-form sequence lengths are
/// accepted, which covers every curve up to P-521. Inconsistent tags or
/// lengths fail with a `Format` error.
pub fn der_to_concat(der: &[u8], field_length: usize) -> Result<Vec<u8>, Error> {
    if der.len() < 2 || der[0] != TAG_SEQUENCE {
        return Err(err_msg!(Format, "Invalid DER signature: expected SEQUENCE"));
    }
    let (seq_len, mut pos) = match der[1] {
        short if short < 0x80 => (short as usize, 2),
        LONG_FORM_ONE_BYTE if der.len() > 2 => (der[2] as usize, 3),
        _ => {
            return Err(err_msg!(
                Format,
                "Invalid DER signature: unsupported length encoding"
            ))
        }
    };
    if pos + seq_len != der.len() {
        return Err(err_msg!(Format, "Invalid DER signature: length mismatch"));
    }

    let r = read_der_integer(der, &mut pos)?;
    let s = read_der_integer(der, &mut pos)?;
    if pos != der.len() {
        return Err(err_msg!(
            Format,
            "Invalid DER signature: trailing bytes after s"
        ));
    }

    let raw_len = r.len().max(s.len()).max(field_length);
    let mut out = alloc::vec![0u8; raw_len * 2];
    out[raw_len - r.len()..raw_len].copy_from_slice(r);
    out[raw_len * 2 - s.len()..].copy_from_slice(s);
    Ok(out)
}

/// Transcode a fixed-width `R || S` signature back into a DER
/// `SEQUENCE { INTEGER r, INTEGER s }`.
///
/// The input must split evenly into the two scalar halves. Fails with a
/// `Format` error when it does not, or when the resulting sequence
/// would exceed the single-byte long-form length bound.
pub fn concat_to_der(raw: &[u8]) -> Result<Vec<u8>, Error> {
    if raw.is_empty() || raw.len() % 2 != 0 {
        return Err(err_msg!(
            Format,
            "Invalid concatenated signature length: {}",
            raw.len()
        ));
    }
    let (r, s) = raw.split_at(raw.len() / 2);
    let r_tlv = write_der_integer(r);
    let s_tlv = write_der_integer(s);

    let body_len = r_tlv.len() + s_tlv.len();
    let mut out = Vec::with_capacity(body_len + 3);
    out.push(TAG_SEQUENCE);
    if body_len < 0x80 {
        out.push(body_len as u8);
    } else if body_len <= 0xff {
        out.push(LONG_FORM_ONE_BYTE);
        out.push(body_len as u8);
    } else {
        return Err(err_msg!(Format, "Signature sequence too long for DER"));
    }
    out.extend_from_slice(&r_tlv);
    out.extend_from_slice(&s_tlv);
    Ok(out)
}

/// Read one `INTEGER` TLV, returning the value with sign padding stripped
fn read_der_integer<'d>(der: &'d [u8], pos: &mut usize) -> Result<&'d [u8], Error> {
    if der.len() < *pos + 2 || der[*pos] != TAG_INTEGER {
        return Err(err_msg!(Format, "Invalid DER signature: expected INTEGER"));
    }
    let len = der[*pos + 1] as usize;
    if der[*pos + 1] >= 0x80 || der.len() < *pos + 2 + len || len == 0 {
        return Err(err_msg!(
            Format,
            "Invalid DER signature: bad INTEGER length"
        ));
    }
    let value = &der[*pos + 2..*pos + 2 + len];
    *pos += 2 + len;
    Ok(strip_leading_zeros(value))
}

/// Encode one scalar as an `INTEGER` TLV, re-adding the sign byte when
/// the leading bit is set
fn write_der_integer(scalar: &[u8]) -> Vec<u8> {
    let value = strip_leading_zeros(scalar);
    let sign = (value[0] & 0x80) != 0;
    let mut tlv = Vec::with_capacity(value.len() + 3);
    tlv.push(TAG_INTEGER);
    tlv.push((value.len() + sign as usize) as u8);
    if sign {
        tlv.push(0);
    }
    tlv.extend_from_slice(value);
    tlv
}
