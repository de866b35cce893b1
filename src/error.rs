use crate::codec::CodecError;

/// Errors surfaced by condition and fulfillment operations.
///
/// `validate` never reports cryptographic failure through this type; a
/// signature that does not verify is a `false` verdict, not an error.
#[derive(Debug, thiserror::Error)]
pub enum ConditionError {
    /// Structural failure in a binary buffer or URI.
    #[error("malformed encoding: {0}")]
    MalformedEncoding(#[from] CodecError),

    /// A fulfillment type id outside the version-1 registry.
    #[error("unsupported fulfillment type {0}")]
    UnsupportedType(u64),

    /// A condition or fulfillment version other than 1.
    #[error("unsupported version {0}")]
    UnsupportedVersion(u64),

    /// A builder is missing a field required to derive its condition.
    #[error("incomplete fulfillment: missing {0}")]
    IncompleteFulfillment(&'static str),

    /// No subset of sub-fulfillments reaches the threshold.
    #[error("threshold {threshold} cannot be met with available weight {weight}")]
    UnsatisfiedThreshold {
        /// The weight the gate requires.
        threshold: u32,
        /// The weight actually available.
        weight: u64,
    },

    /// The signing key does not correspond to the fulfillment's public key.
    #[error("signing key does not match the fulfillment public key")]
    KeyMismatch,

    /// A fulfillment payload exceeds the bound advertised by its condition.
    #[error("fulfillment payload of {size} bytes exceeds advertised maximum {max}")]
    FulfillmentTooLarge {
        /// Size of the offered payload.
        size: u64,
        /// Bound advertised by the condition.
        max: u64,
    },
}
