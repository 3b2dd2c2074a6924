//! The capability every encodable value provides.

use ber::Sink;

use crate::error::Error;
use crate::rules::Rules;
use crate::{Element, OctetString};

/// What a value looks like to an implicit tag.
///
/// Implicit tagging reuses the content of the tagged value, so it is only
/// defined for values whose content is a series of children (or octets
/// that can be chunked into children).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind<'a> {
    OctetStringLike(&'a OctetString),
    SequenceLike(&'a [Element]),
    SetLike(&'a [Element]),
    Opaque,
}

/// A value that knows how to encode itself.
///
/// Containers and tagged wrappers only talk to their children through this
/// trait.
pub trait Encodable {
    /// Number of bytes [`Encodable::encode_to`] writes under `rules`.
    fn encoded_len(&self, rules: Rules) -> usize;

    /// Writes the encoding into `sink`.
    ///
    /// The error only reports values that cannot be encoded. Sinks do not
    /// fail through this call: an [`ber::IoSink`] keeps its I/O error until
    /// [`ber::IoSink::finish`], so `Ok(())` does not mean the bytes reached
    /// the writer.
    fn encode_to(&self, rules: Rules, sink: &mut dyn Sink) -> Result<(), Error>;

    /// Constructed bit of the canonical (DER) encoding.
    ///
    /// BER-only representations such as chunked OCTET STRINGs do not
    /// count; they are resolved to their DER form first.
    fn is_constructed(&self) -> bool;

    fn kind(&self) -> Kind<'_>;

    fn to_vec(&self, rules: Rules) -> Result<Vec<u8>, Error> {
        let mut out = Vec::with_capacity(self.encoded_len(rules));
        self.encode_to(rules, &mut out)?;
        Ok(out)
    }
}
