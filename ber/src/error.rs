//! Error types for the tag-length-value layer.

use nom::error::{ErrorKind, ParseError};
use thiserror::Error;

/// Structural errors raised while reading or framing TLV data.
///
/// Every error aborts the decode of the whole enclosing tree; there is no
/// partial result.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Invalid tag or length octets, or nesting beyond the configured limit.
    #[error("malformed encoding: {0}")]
    MalformedEncoding(String),

    /// The input ends before a declared length is satisfied.
    #[error("truncated input: {needed} bytes declared, {remaining} remaining")]
    TruncatedInput { needed: usize, remaining: usize },

    /// Bytes left over inside a definite-length value, or after the root
    /// value, once its children were consumed.
    #[error("trailing garbage: {0} unconsumed bytes")]
    TrailingGarbage(usize),

    /// The input ends before the end-of-contents octets of an
    /// indefinite-length value.
    #[error("indefinite-length value is not terminated")]
    UnterminatedIndefiniteValue,

    /// A single byte was requested from an exhausted cursor.
    #[error("unexpected end of input")]
    EndOfInput,

    #[error("parser error {0:?}")]
    Parser(ErrorKind),
}

impl Error {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Error::MalformedEncoding(msg.into())
    }
}

impl<'a> ParseError<&'a [u8]> for Error {
    fn from_error_kind(_input: &'a [u8], kind: ErrorKind) -> Self {
        Error::Parser(kind)
    }

    fn append(_input: &'a [u8], _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

impl From<nom::Err<Error>> for Error {
    fn from(err: nom::Err<Error>) -> Self {
        match err {
            nom::Err::Error(e) | nom::Err::Failure(e) => e,
            // only complete parsers are used, so this means the input ran out
            nom::Err::Incomplete(_) => Error::EndOfInput,
        }
    }
}
