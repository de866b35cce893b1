use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};

use crate::codec::{self, CodecError, Reader};
use crate::error::ConditionError;
use crate::fulfillment::FEATURE_ED25519;
use crate::Result;

/// Serialized payload size: length-framed key and signature.
const PAYLOAD_LEN: u64 = 98;

/// An Ed25519 signature over the verification message.
///
/// The condition fingerprint is the public key itself; the variant lives
/// in a SHA-256 framework but performs no hashing of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ed25519 {
    public_key: [u8; 32],
    signature: [u8; 64],
}

impl Ed25519 {
    /// Registry type id.
    pub const TYPE_BIT: u64 = 4;
    /// Feature suites needed to verify this variant.
    pub const FEATURE_BITMASK: u64 = FEATURE_ED25519;

    /// An unsigned fulfillment for `public_key`.
    ///
    /// Unsigned fulfillments never validate; call [`Ed25519::sign`] to
    /// finish them. The all-zero signature is the unsigned sentinel.
    pub fn new(public_key: [u8; 32]) -> Self {
        Self {
            public_key,
            signature: [0; 64],
        }
    }

    /// A fulfillment from an existing key and signature.
    pub fn from_parts(public_key: [u8; 32], signature: [u8; 64]) -> Self {
        Self {
            public_key,
            signature,
        }
    }

    /// The public key the condition commits to.
    pub fn public_key(&self) -> &[u8; 32] {
        &self.public_key
    }

    /// The attached signature.
    pub fn signature(&self) -> &[u8; 64] {
        &self.signature
    }

    /// Whether a signature has been attached.
    pub fn is_signed(&self) -> bool {
        self.signature != [0; 64]
    }

    /// Signs `message`, replacing any previous signature.
    ///
    /// # Errors
    ///
    /// [`ConditionError::KeyMismatch`] if `signing_key` does not derive
    /// this fulfillment's public key.
    pub fn sign(&mut self, message: &[u8], signing_key: &SigningKey) -> Result<()> {
        if signing_key.verifying_key().to_bytes() != self.public_key {
            return Err(ConditionError::KeyMismatch);
        }
        self.signature = signing_key.sign(message).to_bytes();
        Ok(())
    }

    pub(crate) fn fingerprint(&self) -> [u8; 32] {
        self.public_key
    }

    pub(crate) fn max_fulfillment_length(&self) -> u64 {
        PAYLOAD_LEN
    }

    pub(crate) fn encode_payload(&self, out: &mut Vec<u8>) {
        codec::write_varbytes(out, &self.public_key);
        codec::write_varbytes(out, &self.signature);
    }

    pub(crate) fn decode_payload(reader: &mut Reader<'_>) -> std::result::Result<Self, CodecError> {
        let public_key = reader
            .read_varbytes()?
            .try_into()
            .map_err(|_| CodecError::Invalid("ed25519 public key must be 32 bytes"))?;
        let signature = reader
            .read_varbytes()?
            .try_into()
            .map_err(|_| CodecError::Invalid("ed25519 signature must be 64 bytes"))?;
        Ok(Self {
            public_key,
            signature,
        })
    }

    /// The message is mandatory for this variant: an absent message, a
    /// missing signature, an off-curve key and a failed verification all
    /// yield `false`.
    pub(crate) fn validate(&self, message: Option<&[u8]>) -> bool {
        let Some(message) = message else {
            return false;
        };
        if !self.is_signed() {
            return false;
        }
        let Ok(key) = VerifyingKey::from_bytes(&self.public_key) else {
            return false;
        };
        key.verify(message, &Signature::from_bytes(&self.signature))
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Fulfillment;

    fn signing_key() -> SigningKey {
        SigningKey::from_bytes(&[0x42; 32])
    }

    fn signed(message: &[u8]) -> Ed25519 {
        let key = signing_key();
        let mut fulfillment = Ed25519::new(key.verifying_key().to_bytes());
        fulfillment.sign(message, &key).unwrap();
        fulfillment
    }

    #[test]
    fn sign_and_validate() {
        let fulfillment = signed(b"hello");
        assert!(fulfillment.validate(Some(b"hello")));
        assert!(!fulfillment.validate(Some(b"goodbye")));
        assert!(!fulfillment.validate(None));
    }

    #[test]
    fn unsigned_never_validates() {
        let fulfillment = Ed25519::new(signing_key().verifying_key().to_bytes());
        assert!(!fulfillment.is_signed());
        assert!(!fulfillment.validate(Some(b"hello")));
    }

    #[test]
    fn rejects_foreign_signing_key() {
        let mut fulfillment = Ed25519::new(signing_key().verifying_key().to_bytes());
        let other = SigningKey::from_bytes(&[0x43; 32]);
        assert!(matches!(
            fulfillment.sign(b"hello", &other),
            Err(ConditionError::KeyMismatch)
        ));
    }

    #[test]
    fn condition_commits_to_the_public_key() {
        let fulfillment = signed(b"hello");
        let condition = Fulfillment::from(fulfillment.clone()).condition().unwrap();
        assert_eq!(condition.type_bitmask, 0x20);
        assert_eq!(condition.hash, fulfillment.public_key());
        assert_eq!(condition.max_fulfillment_length, PAYLOAD_LEN);
    }

    #[test]
    fn payload_is_length_framed() {
        let fulfillment = Fulfillment::from(signed(b"hello"));
        let payload = fulfillment.serialize_payload().unwrap();
        assert_eq!(payload.len() as u64, PAYLOAD_LEN);
        assert_eq!(payload[0], 32);
        assert_eq!(payload[33], 64);
    }

    #[test]
    fn rejects_wrong_field_sizes() {
        let mut payload = Vec::new();
        codec::write_varbytes(&mut payload, &[0xaa; 31]);
        codec::write_varbytes(&mut payload, &[0xbb; 64]);
        let mut reader = Reader::new(&payload);
        assert!(matches!(
            Ed25519::decode_payload(&mut reader),
            Err(CodecError::Invalid(_))
        ));
    }
}
