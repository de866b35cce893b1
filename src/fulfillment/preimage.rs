use sha2::{Digest, Sha256};

use crate::codec::{self, CodecError, Reader};
use crate::error::ConditionError;
use crate::fulfillment::{FEATURE_PREIMAGE, FEATURE_SHA256};
use crate::Result;

/// Possession of a byte string hashing to the condition fingerprint.
///
/// Revealing any preimage is the entire predicate, so a well-formed
/// fulfillment validates unconditionally; it is the comparison of the
/// derived condition against a trusted one (see
/// [`Condition::validate_fulfillment`](crate::Condition::validate_fulfillment))
/// that ties the preimage to a particular hash.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Preimage {
    preimage: Option<Vec<u8>>,
}

impl Preimage {
    /// Registry type id.
    pub const TYPE_BIT: u64 = 0;
    /// Feature suites needed to verify this variant.
    pub const FEATURE_BITMASK: u64 = FEATURE_SHA256 | FEATURE_PREIMAGE;

    /// A fulfillment revealing `preimage`.
    pub fn new(preimage: impl Into<Vec<u8>>) -> Self {
        Self {
            preimage: Some(preimage.into()),
        }
    }

    /// The revealed bytes, if the builder has them.
    pub fn preimage(&self) -> Option<&[u8]> {
        self.preimage.as_deref()
    }

    /// Stores the preimage on an empty builder.
    pub fn set_preimage(&mut self, preimage: impl Into<Vec<u8>>) {
        self.preimage = Some(preimage.into());
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.preimage.is_some()
    }

    fn require_preimage(&self) -> Result<&[u8]> {
        self.preimage
            .as_deref()
            .ok_or(ConditionError::IncompleteFulfillment("preimage"))
    }

    pub(crate) fn fingerprint(&self) -> Result<[u8; 32]> {
        Ok(Sha256::digest(self.require_preimage()?).into())
    }

    pub(crate) fn max_fulfillment_length(&self) -> Result<u64> {
        let preimage = self.require_preimage()?;
        Ok((codec::varuint_len(preimage.len() as u64) + preimage.len()) as u64)
    }

    pub(crate) fn encode_payload(&self, out: &mut Vec<u8>) -> Result<()> {
        codec::write_varbytes(out, self.require_preimage()?);
        Ok(())
    }

    pub(crate) fn decode_payload(reader: &mut Reader<'_>) -> std::result::Result<Self, CodecError> {
        Ok(Self {
            preimage: Some(reader.read_varbytes()?.to_vec()),
        })
    }

    pub(crate) fn validate(&self) -> bool {
        self.preimage.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Fulfillment;

    #[test]
    fn empty_preimage() {
        let fulfillment = Fulfillment::from(Preimage::new(""));
        assert_eq!(fulfillment.to_uri().unwrap(), "cf:1:0:AA");

        let condition = fulfillment.condition().unwrap();
        assert_eq!(condition.type_bitmask, 0x03);
        assert_eq!(condition.max_fulfillment_length, 1);
        assert_eq!(
            hex::encode(&condition.hash),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn validates_once_present() {
        assert!(Preimage::new("secret").validate());
        assert!(Fulfillment::from(Preimage::new("secret")).validate(None));
    }

    #[test]
    fn unfinished_builder_has_no_condition() {
        let builder = Preimage::default();
        assert!(!builder.validate());
        assert!(matches!(
            Fulfillment::from(builder).condition(),
            Err(ConditionError::IncompleteFulfillment("preimage"))
        ));
    }

    #[test]
    fn builder_finishes_with_set_preimage() {
        let mut builder = Preimage::default();
        builder.set_preimage("secret");
        assert_eq!(builder, Preimage::new("secret"));
    }

    #[test]
    fn length_bound_counts_the_length_prefix() {
        let fulfillment = Fulfillment::from(Preimage::new(vec![0xaa; 200]));
        let condition = fulfillment.condition().unwrap();
        assert_eq!(condition.max_fulfillment_length, 202);
        assert_eq!(
            fulfillment.serialize_payload().unwrap().len() as u64,
            condition.max_fulfillment_length
        );
    }
}
