//! Fulfillments: witnesses that reproduce a condition when measured.
//!
//! A fulfillment is a tagged value that knows how to serialize itself, how
//! to derive the one condition it satisfies, and how to check its witness
//! against a message. Thresholds recurse over subentries that are either
//! further fulfillments or bare conditions.

use std::fmt;
use std::str::FromStr;

use crate::codec::{self, CodecError, Reader};
use crate::condition::{Condition, VERSION};
use crate::error::ConditionError;
use crate::Result;

/// Ed25519 signature fulfillments.
pub mod ed25519;
/// SHA-256 preimage fulfillments.
pub mod preimage;
/// Weighted threshold gates over sub-conditions.
pub mod threshold;

pub use ed25519::Ed25519;
pub use preimage::Preimage;
pub use threshold::{Subentry, SubentryBody, Threshold};

/// Feature suite: SHA-256 hashing.
pub const FEATURE_SHA256: u64 = 0x01;
/// Feature suite: preimage comparison.
pub const FEATURE_PREIMAGE: u64 = 0x02;
/// Feature suite: message prefixing (reserved).
pub const FEATURE_PREFIX: u64 = 0x04;
/// Feature suite: threshold gates.
pub const FEATURE_THRESHOLD: u64 = 0x08;
/// Feature suite: RSA-PSS signatures (reserved).
pub const FEATURE_RSA: u64 = 0x10;
/// Feature suite: Ed25519 signatures.
pub const FEATURE_ED25519: u64 = 0x20;

/// Registry type id of the prefix variant (reserved, rejected at parse).
pub const TYPE_PREFIX: u64 = 1;
/// Registry type id of the RSA variant (reserved, rejected at parse).
pub const TYPE_RSA: u64 = 3;

/// A witness for a cryptographic condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fulfillment {
    /// SHA-256 preimage: possession of the hashed bytes.
    Preimage(Preimage),
    /// Ed25519 signature over the verification message.
    Ed25519(Ed25519),
    /// Weighted m-of-n gate over sub-conditions.
    Threshold(Threshold),
}

impl Fulfillment {
    /// Shorthand for a preimage fulfillment.
    pub fn preimage(preimage: impl Into<Vec<u8>>) -> Self {
        Self::Preimage(Preimage::new(preimage))
    }

    /// Shorthand for an unsigned ed25519 fulfillment.
    pub fn ed25519(public_key: [u8; 32]) -> Self {
        Self::Ed25519(Ed25519::new(public_key))
    }

    /// Registry id of this variant.
    pub fn type_bit(&self) -> u64 {
        match self {
            Self::Preimage(_) => Preimage::TYPE_BIT,
            Self::Ed25519(_) => Ed25519::TYPE_BIT,
            Self::Threshold(_) => Threshold::TYPE_BIT,
        }
    }

    /// Feature suites a verifier needs for this subtree.
    pub fn feature_bitmask(&self) -> u64 {
        match self {
            Self::Preimage(_) => Preimage::FEATURE_BITMASK,
            Self::Ed25519(_) => Ed25519::FEATURE_BITMASK,
            Self::Threshold(threshold) => threshold.feature_bitmask(),
        }
    }

    /// The variant fingerprint the condition commits to.
    ///
    /// # Errors
    ///
    /// [`ConditionError::IncompleteFulfillment`] on an unfinished builder,
    /// [`ConditionError::UnsatisfiedThreshold`] on a gate no subset can
    /// satisfy.
    pub fn fingerprint(&self) -> Result<[u8; 32]> {
        match self {
            Self::Preimage(preimage) => preimage.fingerprint(),
            Self::Ed25519(ed25519) => Ok(ed25519.fingerprint()),
            Self::Threshold(threshold) => threshold.fingerprint(),
        }
    }

    /// Upper bound on the serialized payload of this subtree.
    pub fn max_fulfillment_length(&self) -> Result<u64> {
        match self {
            Self::Preimage(preimage) => preimage.max_fulfillment_length(),
            Self::Ed25519(ed25519) => Ok(ed25519.max_fulfillment_length()),
            Self::Threshold(threshold) => threshold.max_fulfillment_length(),
        }
    }

    /// Derives the condition this fulfillment satisfies. Idempotent: the
    /// result depends only on the fulfillment's committed fields.
    pub fn condition(&self) -> Result<Condition> {
        Ok(Condition {
            type_bitmask: self.feature_bitmask(),
            hash: self.fingerprint()?.to_vec(),
            max_fulfillment_length: self.max_fulfillment_length()?,
        })
    }

    /// Checks the witness against `message`.
    ///
    /// Cryptographic failure and unfinished builders both yield `false`,
    /// never an error. Parsing alone does not tie the witness to any
    /// particular condition; for that, see
    /// [`Condition::validate_fulfillment`].
    pub fn validate(&self, message: Option<&[u8]>) -> bool {
        match self {
            Self::Preimage(preimage) => preimage.validate(),
            Self::Ed25519(ed25519) => ed25519.validate(message),
            Self::Threshold(threshold) => threshold.validate(message),
        }
    }

    /// Serializes the variant payload (everything after the type tag).
    pub fn serialize_payload(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.encode_payload(&mut out)?;
        Ok(out)
    }

    pub(crate) fn encode_payload(&self, out: &mut Vec<u8>) -> Result<()> {
        match self {
            Self::Preimage(preimage) => preimage.encode_payload(out),
            Self::Ed25519(ed25519) => {
                ed25519.encode_payload(out);
                Ok(())
            }
            Self::Threshold(threshold) => threshold.encode_payload(out),
        }
    }

    /// Serializes the binary form: type tag, then payload.
    pub fn to_binary(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        codec::write_varuint(&mut out, self.type_bit());
        self.encode_payload(&mut out)?;
        Ok(out)
    }

    /// Parses the binary form, rejecting trailing bytes.
    pub fn from_binary(buf: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(buf);
        let fulfillment = Self::decode(&mut reader)?;
        reader.finish().map_err(ConditionError::from)?;
        Ok(fulfillment)
    }

    pub(crate) fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        let type_bit = reader.read_varuint().map_err(ConditionError::from)?;
        Self::decode_typed(type_bit, reader)
    }

    fn decode_typed(type_bit: u64, reader: &mut Reader<'_>) -> Result<Self> {
        match type_bit {
            Preimage::TYPE_BIT => Ok(Self::Preimage(
                Preimage::decode_payload(reader).map_err(ConditionError::from)?,
            )),
            Threshold::TYPE_BIT => Ok(Self::Threshold(Threshold::decode_payload(reader)?)),
            Ed25519::TYPE_BIT => Ok(Self::Ed25519(
                Ed25519::decode_payload(reader).map_err(ConditionError::from)?,
            )),
            other => Err(ConditionError::UnsupportedType(other)),
        }
    }

    /// Formats the `cf:` URI form.
    pub fn to_uri(&self) -> Result<String> {
        Ok(format!(
            "cf:{}:{:x}:{}",
            VERSION,
            self.type_bit(),
            codec::base64url_encode(&self.serialize_payload()?)
        ))
    }

    /// Parses the `cf:` URI form and dispatches on the type id.
    ///
    /// # Errors
    ///
    /// [`ConditionError::MalformedEncoding`] for structural defects,
    /// [`ConditionError::UnsupportedVersion`] for versions other than 1,
    /// [`ConditionError::UnsupportedType`] for reserved or unknown ids.
    pub fn from_uri(uri: &str) -> Result<Self> {
        let parts: Vec<&str> = uri.split(':').collect();
        if parts.len() != 4 {
            return Err(CodecError::Uri("expected four colon-separated fields").into());
        }
        if parts[0] != "cf" {
            return Err(CodecError::Uri("expected the cf: scheme").into());
        }
        let version = codec::parse_dec(parts[1]).map_err(ConditionError::from)?;
        if version != u64::from(VERSION) {
            return Err(ConditionError::UnsupportedVersion(version));
        }
        let type_bit = codec::parse_hex(parts[2]).map_err(ConditionError::from)?;
        let payload = codec::base64url_decode(parts[3]).map_err(ConditionError::from)?;
        let mut reader = Reader::new(&payload);
        let fulfillment = Self::decode_typed(type_bit, &mut reader)?;
        reader.finish().map_err(ConditionError::from)?;
        Ok(fulfillment)
    }

    /// Whether every field needed to serialize a witness is present.
    pub(crate) fn is_complete(&self) -> bool {
        match self {
            Self::Preimage(preimage) => preimage.is_complete(),
            Self::Ed25519(ed25519) => ed25519.is_signed(),
            Self::Threshold(threshold) => threshold.is_satisfiable(),
        }
    }
}

impl From<Preimage> for Fulfillment {
    fn from(preimage: Preimage) -> Self {
        Self::Preimage(preimage)
    }
}

impl From<Ed25519> for Fulfillment {
    fn from(ed25519: Ed25519) -> Self {
        Self::Ed25519(ed25519)
    }
}

impl From<Threshold> for Fulfillment {
    fn from(threshold: Threshold) -> Self {
        Self::Threshold(threshold)
    }
}

impl fmt::Display for Fulfillment {
    /// The `cf:` URI form; unfinished builders cannot be displayed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let uri = self.to_uri().map_err(|_| fmt::Error)?;
        f.write_str(&uri)
    }
}

impl FromStr for Fulfillment {
    type Err = ConditionError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_uri(s)
    }
}
