//! Length-prefixed binary primitives shared by conditions and fulfillments.
//!
//! Integers are little-endian base-128 varuints, high bit set on every byte
//! but the last. Only the canonical form is accepted: an encoding whose
//! final byte is zero (other than the single byte `0x00`) is rejected, as
//! is anything wider than 64 bits. Byte strings carry a varuint length
//! prefix; arrays carry a varuint element count. URI payloads travel as
//! unpadded URL-safe base64.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use thiserror::Error;

/// Longest canonical varuint encoding of a 64-bit value.
const VARUINT_MAX_LEN: usize = 10;

/// Errors from the wire codec and URI field parsers.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Tried to read past the end of the input.
    #[error("would overrun end of input")]
    OverrunInput,

    /// Unconsumed bytes remained after a top-level decode.
    #[error("extra unconsumed input leftover")]
    ExtraInput,

    /// An element count larger than the remaining input could hold.
    #[error("overflow container")]
    OverflowContainer,

    /// A multi-byte varuint whose final byte carries no value.
    #[error("non-canonical varuint encoding")]
    NonCanonicalVaruint,

    /// A varuint wider than 64 bits.
    #[error("varuint exceeds 64 bits")]
    VaruintOverflow,

    /// Invalid base64url payload.
    #[error("invalid base64url payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Structurally invalid URI.
    #[error("malformed uri: {0}")]
    Uri(&'static str),

    /// A field that decoded but violates its schema.
    #[error("invalid field: {0}")]
    Invalid(&'static str),
}

/// Positional reader over a borrowed byte slice.
#[derive(Debug)]
pub struct Reader<'a> {
    buf: &'a [u8],
    at: usize,
}

impl<'a> Reader<'a> {
    /// Starts reading at the beginning of `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, at: 0 }
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.at
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        if n > self.remaining() {
            return Err(CodecError::OverrunInput);
        }
        let slice = &self.buf[self.at..self.at + n];
        self.at += n;
        Ok(slice)
    }

    /// Reads a single byte.
    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take(1)?[0])
    }

    /// Reads a canonical varuint.
    pub fn read_varuint(&mut self) -> Result<u64, CodecError> {
        let mut value = 0u64;
        for i in 0..VARUINT_MAX_LEN {
            let byte = self.read_u8()?;
            let bits = u64::from(byte & 0x7f);
            if i == VARUINT_MAX_LEN - 1 && bits > 1 {
                return Err(CodecError::VaruintOverflow);
            }
            value |= bits << (7 * i);
            if byte & 0x80 == 0 {
                if byte == 0 && i > 0 {
                    return Err(CodecError::NonCanonicalVaruint);
                }
                return Ok(value);
            }
        }
        Err(CodecError::VaruintOverflow)
    }

    /// Reads a length-prefixed byte string.
    pub fn read_varbytes(&mut self) -> Result<&'a [u8], CodecError> {
        let len = self.read_varuint()?;
        if len > self.remaining() as u64 {
            return Err(CodecError::OverrunInput);
        }
        self.take(len as usize)
    }

    /// Reads an array element count, bounded by the remaining input.
    pub fn read_count(&mut self) -> Result<u64, CodecError> {
        let count = self.read_varuint()?;
        if count > self.remaining() as u64 {
            return Err(CodecError::OverflowContainer);
        }
        Ok(count)
    }

    /// Ends a top-level decode, rejecting leftover bytes.
    pub fn finish(self) -> Result<(), CodecError> {
        if self.remaining() > 0 {
            return Err(CodecError::ExtraInput);
        }
        Ok(())
    }
}

/// Appends the canonical varuint encoding of `value`.
pub fn write_varuint(out: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

/// Appends a length-prefixed byte string.
pub fn write_varbytes(out: &mut Vec<u8>, bytes: &[u8]) {
    write_varuint(out, bytes.len() as u64);
    out.extend_from_slice(bytes);
}

/// Encoded size of a varuint, without writing it.
pub fn varuint_len(mut value: u64) -> usize {
    let mut len = 1;
    while value >= 0x80 {
        value >>= 7;
        len += 1;
    }
    len
}

/// Unpadded URL-safe base64 of `bytes`.
pub fn base64url_encode(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decodes unpadded URL-safe base64.
pub fn base64url_decode(s: &str) -> Result<Vec<u8>, CodecError> {
    Ok(URL_SAFE_NO_PAD.decode(s)?)
}

/// Parses a decimal URI field with no sign and no leading zeros.
pub fn parse_dec(s: &str) -> Result<u64, CodecError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CodecError::Uri("expected a decimal field"));
    }
    if s.len() > 1 && s.starts_with('0') {
        return Err(CodecError::Uri("leading zero in decimal field"));
    }
    s.parse()
        .map_err(|_| CodecError::Uri("decimal field out of range"))
}

/// Parses a lowercase hex URI field with no leading zeros.
pub fn parse_hex(s: &str) -> Result<u64, CodecError> {
    if s.is_empty() || !s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
        return Err(CodecError::Uri("expected a lowercase hex field"));
    }
    if s.len() > 1 && s.starts_with('0') {
        return Err(CodecError::Uri("leading zero in hex field"));
    }
    u64::from_str_radix(s, 16).map_err(|_| CodecError::Uri("hex field out of range"))
}
