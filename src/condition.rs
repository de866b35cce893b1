//! The condition record: a compact commitment to a predicate.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use subtle::ConstantTimeEq;

use crate::codec::{self, CodecError, Reader};
use crate::error::ConditionError;
use crate::fulfillment::Fulfillment;
use crate::Result;

/// The only condition format version this crate understands.
pub const VERSION: u8 = 1;

/// A commitment to a predicate.
///
/// The bitmask advertises which feature suites a verifier needs, the hash
/// is the variant-defined fingerprint, and the length field bounds the
/// serialized payload of any fulfillment that can ever satisfy the
/// condition. Conditions are plain values: two are interchangeable iff
/// they are equal, and the ordering compares the canonical binary form
/// byte by byte.
#[derive(Clone, PartialEq, Eq)]
pub struct Condition {
    /// OR of the feature suites required to verify the subtree.
    pub type_bitmask: u64,
    /// Variant-defined fingerprint (32 bytes for all implemented types).
    pub hash: Vec<u8>,
    /// Upper bound on the payload size of any satisfying fulfillment.
    pub max_fulfillment_length: u64,
}

impl Condition {
    /// Parses the `cc:` URI form.
    ///
    /// # Errors
    ///
    /// [`ConditionError::MalformedEncoding`] for any structural defect and
    /// [`ConditionError::UnsupportedVersion`] for a version other than 1.
    pub fn from_uri(uri: &str) -> Result<Self> {
        let parts: Vec<&str> = uri.split(':').collect();
        if parts.len() != 5 {
            return Err(CodecError::Uri("expected five colon-separated fields").into());
        }
        if parts[0] != "cc" {
            return Err(CodecError::Uri("expected the cc: scheme").into());
        }
        let version = codec::parse_dec(parts[1]).map_err(ConditionError::from)?;
        if version != u64::from(VERSION) {
            return Err(ConditionError::UnsupportedVersion(version));
        }
        let type_bitmask = codec::parse_hex(parts[2]).map_err(ConditionError::from)?;
        let hash = codec::base64url_decode(parts[3]).map_err(ConditionError::from)?;
        let max_fulfillment_length = codec::parse_dec(parts[4]).map_err(ConditionError::from)?;
        Ok(Self {
            type_bitmask,
            hash,
            max_fulfillment_length,
        })
    }

    /// Formats the `cc:` URI form: lowercase hex bitmask, unpadded
    /// base64url hash, decimal length bound.
    pub fn to_uri(&self) -> String {
        format!(
            "cc:{}:{:x}:{}:{}",
            VERSION,
            self.type_bitmask,
            codec::base64url_encode(&self.hash),
            self.max_fulfillment_length
        )
    }

    /// Parses the binary form, rejecting trailing bytes.
    pub fn from_binary(buf: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(buf);
        let condition = Self::decode(&mut reader).map_err(ConditionError::from)?;
        reader.finish().map_err(ConditionError::from)?;
        Ok(condition)
    }

    /// Serializes the binary form.
    pub fn to_binary(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode(&mut out);
        out
    }

    pub(crate) fn decode(reader: &mut Reader<'_>) -> std::result::Result<Self, CodecError> {
        let type_bitmask = reader.read_varuint()?;
        let hash = reader.read_varbytes()?.to_vec();
        let max_fulfillment_length = reader.read_varuint()?;
        Ok(Self {
            type_bitmask,
            hash,
            max_fulfillment_length,
        })
    }

    pub(crate) fn encode(&self, out: &mut Vec<u8>) {
        codec::write_varuint(out, self.type_bitmask);
        codec::write_varbytes(out, &self.hash);
        codec::write_varuint(out, self.max_fulfillment_length);
    }

    pub(crate) fn encoded_len(&self) -> usize {
        codec::varuint_len(self.type_bitmask)
            + codec::varuint_len(self.hash.len() as u64)
            + self.hash.len()
            + codec::varuint_len(self.max_fulfillment_length)
    }

    /// Checks an encoded fulfillment against this condition as the trust
    /// root.
    ///
    /// The payload size is gated against [`Condition::max_fulfillment_length`]
    /// before the body is parsed, the derived condition is compared in
    /// constant time, and only then is the witness evaluated. A fulfillment
    /// deriving a different condition is a `false` verdict, not an error.
    ///
    /// # Errors
    ///
    /// [`ConditionError::FulfillmentTooLarge`] when the payload exceeds the
    /// advertised bound, or any parse error from the fulfillment itself.
    pub fn validate_fulfillment(&self, encoded: &[u8], message: Option<&[u8]>) -> Result<bool> {
        let mut reader = Reader::new(encoded);
        reader.read_varuint().map_err(ConditionError::from)?;
        let size = reader.remaining() as u64;
        if size > self.max_fulfillment_length {
            return Err(ConditionError::FulfillmentTooLarge {
                size,
                max: self.max_fulfillment_length,
            });
        }
        let fulfillment = Fulfillment::from_binary(encoded)?;
        let derived = fulfillment.condition()?.to_binary();
        if derived.as_slice().ct_eq(self.to_binary().as_slice()).unwrap_u8() != 1 {
            return Ok(false);
        }
        Ok(fulfillment.validate(message))
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition")
            .field("type_bitmask", &format_args!("{:#x}", self.type_bitmask))
            .field("hash", &hex::encode(&self.hash))
            .field("max_fulfillment_length", &self.max_fulfillment_length)
            .finish()
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uri())
    }
}

impl FromStr for Condition {
    type Err = ConditionError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_uri(s)
    }
}

impl Ord for Condition {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_binary().cmp(&other.to_binary())
    }
}

impl PartialOrd for Condition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
