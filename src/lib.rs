#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(rustdoc::invalid_html_tags, rustdoc::broken_intra_doc_links)]

//! Crypto-Conditions
//!
//! # Overview
//!
//! `crypto-conditions` is a pure library for building, parsing and
//! verifying *cryptographic conditions* and their *fulfillments*: a
//! self-describing format for boolean combinations of cryptographic
//! checks. A condition is a compact commitment to a predicate; a
//! fulfillment is a witness that, re-serialized and re-hashed, reproduces
//! that commitment. Independent verifiers given the same bytes always
//! reach the same verdict. This crate exposes:
//!
//! - Wire **codec** primitives (`codec.rs`): canonical varuints,
//!   length-prefixed byte strings and unpadded URL-safe base64, shared by
//!   every binary and URI form.
//! - The **Condition** record (`condition.rs`): the
//!   `(type_bitmask, hash, max_fulfillment_length)` tuple with its `cc:`
//!   URI and binary encodings, byte-wise ordering, and fulfillment
//!   checking against a trusted condition.
//! - **Fulfillment** variants (`fulfillment.rs` and its submodules):
//!   SHA-256 preimages, Ed25519 signatures and weighted threshold gates,
//!   with `cf:` URI and binary encodings, condition derivation and
//!   witness validation. Threshold serialization reveals only the
//!   cheapest satisfying subset of witnesses, deterministically.
//! - Error handling (`error.rs`): one [`ConditionError`] with a variant
//!   per distinguishable failure kind.
//! - Serde support (`serde.rs`, feature `json`): conditions and
//!   fulfillments (de)serialize as their URI strings.
//!
//! # Example
//!
//! ```
//! use crypto_conditions::Fulfillment;
//!
//! let fulfillment = Fulfillment::preimage(b"secret".to_vec());
//! let condition = fulfillment.condition()?;
//!
//! // the verifier side: bound-checked parse, commitment comparison,
//! // witness evaluation
//! let encoded = fulfillment.to_binary()?;
//! assert!(condition.validate_fulfillment(&encoded, None)?);
//! # Ok::<(), crypto_conditions::ConditionError>(())
//! ```

/// Wire codec primitives shared by all binary and URI forms.
pub mod codec;

/// The condition record and its encodings.
pub mod condition;

/// Error types used throughout the crate.
pub mod error;

/// Fulfillment variants, their encodings and validation.
pub mod fulfillment;

/// Serde impls for URI-string (de)serialization.
#[cfg(feature = "json")]
mod serde;

pub use codec::CodecError;
pub use condition::{Condition, VERSION};
pub use error::ConditionError;
pub use fulfillment::{Ed25519, Fulfillment, Preimage, Subentry, SubentryBody, Threshold};

/// `Result` type for all crate operations, using [`ConditionError`] as the
/// error.
pub type Result<T> = std::result::Result<T, ConditionError>;
