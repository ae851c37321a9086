//! Wire format shared by every exportable artifact.
//!
//! Exports open with a 2-byte header `[scheme_tag, type_tag]`, followed
//! by the artifact's fields. Variable-length fields (group elements,
//! big integers) are length-prefixed with a little-endian `u32`;
//! fixed-width integers (identifiers, counters, protocol parameters)
//! are 8-byte little-endian. List exports (GML, CRL) prefix the live
//! entry count as a `u64`. `export_size` of an artifact must equal the
//! length of its `export` output; exports check this before returning.

use crate::{error::GroupSigError, scheme::Scheme};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::vec::Vec;
use num_bigint::{BigInt, BigUint, Sign};

/// Artifact type tags following the scheme tag in key/signature/proof
/// exports.
pub const TAG_GROUP_KEY: u8 = 0;
pub const TAG_MANAGER_KEY: u8 = 1;
pub const TAG_MEMBER_KEY: u8 = 2;
pub const TAG_SIGNATURE: u8 = 3;
pub const TAG_PROOF: u8 = 4;

pub const HEADER_SIZE: usize = 2;
pub const UINT_SIZE: usize = 8;
const LEN_SIZE: usize = 4;

pub fn put_header(buf: &mut Vec<u8>, scheme: Scheme, type_tag: u8) {
    buf.push(scheme as u8);
    buf.push(type_tag);
}

pub fn put_uint(buf: &mut Vec<u8>, v: u64) {
    buf.extend_from_slice(&v.to_le_bytes());
}

pub fn put_field(buf: &mut Vec<u8>, bytes: &[u8]) {
    buf.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
    buf.extend_from_slice(bytes);
}

pub fn put_ark<T: CanonicalSerialize>(
    buf: &mut Vec<u8>,
    e: &T,
) -> Result<(), GroupSigError> {
    let mut tmp = Vec::with_capacity(e.compressed_size());
    e.serialize_compressed(&mut tmp)?;
    put_field(buf, &tmp);
    Ok(())
}

pub fn put_biguint(buf: &mut Vec<u8>, v: &BigUint) {
    put_field(buf, &v.to_bytes_be());
}

/// Signed integers carry a leading sign byte (0 = non-negative,
/// 1 = negative) inside the length-prefixed field.
pub fn put_bigint(buf: &mut Vec<u8>, v: &BigInt) {
    let (sign, mag) = v.to_bytes_be();
    let mut tmp = Vec::with_capacity(1 + mag.len());
    tmp.push(u8::from(sign == Sign::Minus));
    tmp.extend_from_slice(&mag);
    put_field(buf, &tmp);
}

pub fn field_size(payload: usize) -> usize {
    LEN_SIZE + payload
}

pub fn ark_size<T: CanonicalSerialize>(e: &T) -> usize {
    field_size(e.compressed_size())
}

pub fn biguint_size(v: &BigUint) -> usize {
    // to_bytes_be of zero is a single 0x00 byte
    field_size((v.bits() as usize + 7) / 8).max(field_size(1))
}

pub fn bigint_size(v: &BigInt) -> usize {
    field_size(1 + ((v.bits() as usize + 7) / 8).max(1))
}

/// Checks the size precondition of an export and hands the buffer back.
pub fn finish_export(
    buf: Vec<u8>,
    expected: usize,
) -> Result<Vec<u8>, GroupSigError> {
    if buf.len() != expected {
        return Err(GroupSigError::InvalidFieldLength(buf.len()));
    }
    Ok(buf)
}

/// Reads the scheme tag of an export without consuming it, so callers
/// can dispatch before parsing.
pub fn peek_scheme(bytes: &[u8]) -> Result<Scheme, GroupSigError> {
    let tag = *bytes.first().ok_or(GroupSigError::UnexpectedEndOfInput)?;
    Scheme::from_tag(tag)
}

/// Cursor over an import buffer. Field accessors consume in order;
/// `finish` rejects leftover bytes.
pub struct Reader<'a> {
    bytes: &'a [u8],
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub fn expect_header(
        &mut self,
        scheme: Scheme,
        type_tag: u8,
    ) -> Result<(), GroupSigError> {
        let found = Scheme::from_tag(self.byte()?)?;
        if found != scheme {
            return Err(GroupSigError::SchemeMismatch {
                expected: scheme,
                found,
            });
        }
        let t = self.byte()?;
        if t != type_tag {
            return Err(GroupSigError::UnexpectedTypeTag {
                expected: type_tag,
                found: t,
            });
        }
        Ok(())
    }

    pub fn byte(&mut self) -> Result<u8, GroupSigError> {
        let b = *self.bytes.first().ok_or(GroupSigError::UnexpectedEndOfInput)?;
        self.bytes = &self.bytes[1..];
        Ok(b)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], GroupSigError> {
        if self.bytes.len() < n {
            return Err(GroupSigError::UnexpectedEndOfInput);
        }
        let (head, tail) = self.bytes.split_at(n);
        self.bytes = tail;
        Ok(head)
    }

    pub fn uint(&mut self) -> Result<u64, GroupSigError> {
        let raw = self.take(UINT_SIZE)?;
        let mut b = [0u8; UINT_SIZE];
        b.copy_from_slice(raw);
        Ok(u64::from_le_bytes(b))
    }

    pub fn field(&mut self) -> Result<&'a [u8], GroupSigError> {
        let raw = self.take(LEN_SIZE)?;
        let mut b = [0u8; LEN_SIZE];
        b.copy_from_slice(raw);
        let len = u32::from_le_bytes(b) as usize;
        if len > self.bytes.len() {
            return Err(GroupSigError::InvalidFieldLength(len));
        }
        self.take(len)
    }

    pub fn ark<T: CanonicalDeserialize>(&mut self) -> Result<T, GroupSigError> {
        let bytes = self.field()?;
        Ok(T::deserialize_compressed(bytes)?)
    }

    pub fn biguint(&mut self) -> Result<BigUint, GroupSigError> {
        Ok(BigUint::from_bytes_be(self.field()?))
    }

    pub fn bigint(&mut self) -> Result<BigInt, GroupSigError> {
        let bytes = self.field()?;
        let (&sign, mag) = bytes
            .split_first()
            .ok_or(GroupSigError::UnexpectedEndOfInput)?;
        let sign = match sign {
            0 => Sign::Plus,
            1 => Sign::Minus,
            _ => return Err(GroupSigError::InvalidFieldLength(sign as usize)),
        };
        let v = BigInt::from_bytes_be(sign, mag);
        Ok(v)
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len()
    }

    pub fn finish(self) -> Result<(), GroupSigError> {
        if !self.bytes.is_empty() {
            return Err(GroupSigError::TrailingBytes(self.bytes.len()));
        }
        Ok(())
    }
}
