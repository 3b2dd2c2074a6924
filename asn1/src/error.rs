//! Error types for ASN.1 values and their encoding.

use ber::Tag;
use thiserror::Error;

/// Errors that can occur while encoding values or decoding them from a TLV
/// tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    // Encoding errors
    /// Implicit tagging was requested for a value that has no splice rule.
    #[error("implicit tagging is not defined for {0}")]
    UnsupportedImplicitTagTarget(String),

    // Tagged errors
    #[error("[{0}] does not wrap exactly one value")]
    TaggedNotExplicit(u32),
    #[error("[{number}] content cannot be read as {target}")]
    TaggedContentMismatch { number: u32, target: &'static str },

    // Boolean errors
    #[error("BOOLEAN: content must be one octet, got {0}")]
    InvalidBoolean(usize),

    // Integer errors
    #[error("INTEGER: no data")]
    IntegerNoData,
    #[error("INTEGER: value out of range for {0}")]
    IntegerOutOfRange(&'static str),

    // BitString errors
    #[error("BIT STRING: no data")]
    BitStringNoData,
    #[error("BIT STRING: unused bits {0} out of range (must be 0-7)")]
    BitStringUnusedBitsOutOfRange(u8),

    // Null errors
    #[error("NULL: content must be empty, got {0} octets")]
    NullNotEmpty(usize),

    // ObjectIdentifier errors
    #[error("OBJECT IDENTIFIER: no data")]
    ObjectIdentifierNoData,
    #[error("OBJECT IDENTIFIER: incomplete encoding")]
    ObjectIdentifierIncompleteEncoding,
    #[error("OBJECT IDENTIFIER: non-minimal subidentifier encoding")]
    ObjectIdentifierNonMinimal,
    #[error("OBJECT IDENTIFIER: too few components (need at least 2)")]
    ObjectIdentifierTooFewComponents,
    #[error("OBJECT IDENTIFIER: invalid component '{0}'")]
    ObjectIdentifierInvalidComponent(String),

    // String type errors
    #[error("UTF8String: invalid UTF-8")]
    Utf8StringInvalidUtf8,

    // Form errors
    #[error("{0}: constructed encoding is not allowed")]
    ExpectedPrimitive(Tag),
    #[error("{0}: primitive encoding is not allowed")]
    ExpectedConstructed(Tag),
    #[error("constructed OCTET STRING contains {0}")]
    InvalidOctetStringSegment(Tag),

    // TLV errors
    #[error("invalid BER encoding: {0}")]
    Ber(#[from] ber::error::Error),
}
