use std::fmt::Display;

use ber::{Length, Sink, Tag};
use log::debug;

use crate::constructed::{self, Container};
use crate::encodable::{Encodable, Kind};
use crate::error::Error;
use crate::rules::Rules;
use crate::{Element, OctetString};

/// A context-specific tag around another value.
///
/// Explicit tagging adds a header layer: `[n] { inner }`. Implicit tagging
/// replaces the inner value's own header with `[n]` and keeps its content,
/// which is only defined for OCTET STRING, SEQUENCE and SET shaped values.
///
/// ```
/// use asn1::{Element, Encodable, Integer, Rules, TaggedObject};
///
/// let children = vec![Element::Boolean(true), Element::Integer(Integer::from(1_i64))];
///
/// let implicit = TaggedObject::implicit(1, Element::Sequence(children.clone()));
/// assert_eq!(
///     vec![0xa1, 0x06, 0x01, 0x01, 0xff, 0x02, 0x01, 0x01],
///     implicit.to_vec(Rules::Der).unwrap()
/// );
///
/// let explicit = TaggedObject::explicit(1, Element::Sequence(children));
/// assert_eq!(
///     vec![0xa1, 0x08, 0x30, 0x06, 0x01, 0x01, 0xff, 0x02, 0x01, 0x01],
///     explicit.to_vec(Rules::Der).unwrap()
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedObject {
    number: u32,
    explicit: bool,
    inner: Box<Element>,
}

impl TaggedObject {
    pub fn explicit(number: u32, inner: Element) -> Self {
        TaggedObject {
            number,
            explicit: true,
            inner: Box::new(inner),
        }
    }

    pub fn implicit(number: u32, inner: Element) -> Self {
        TaggedObject {
            number,
            explicit: false,
            inner: Box::new(inner),
        }
    }

    /// A tag with no payload: `[n]` implicitly tagging an empty SEQUENCE.
    pub fn empty(number: u32) -> Self {
        Self::implicit(number, Element::Sequence(Vec::new()))
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn is_explicit(&self) -> bool {
        self.explicit
    }

    pub fn is_empty(&self) -> bool {
        !self.explicit && matches!(self.inner.kind(), Kind::SequenceLike([]) | Kind::SetLike([]))
    }

    pub fn inner(&self) -> &Element {
        &self.inner
    }

    pub fn into_inner(self) -> Element {
        *self.inner
    }

    /// Reads the content as a single explicitly tagged value.
    ///
    /// A decoded `[n]` has no schema, so a one-child implicit SEQUENCE or
    /// SET is indistinguishable from an explicit tag and is accepted here.
    pub fn as_explicit(&self) -> Result<&Element, Error> {
        if self.explicit {
            return Ok(&self.inner);
        }
        match self.inner.kind() {
            Kind::SequenceLike([only]) | Kind::SetLike([only]) => Ok(only),
            _ => Err(Error::TaggedNotExplicit(self.number)),
        }
    }

    /// Reads the content as an implicitly tagged SEQUENCE or SET.
    ///
    /// Children keep the order they were read in; a SET is not re-sorted.
    pub fn as_implicit(&self, container: Container) -> Result<Element, Error> {
        let children = match self.kind() {
            Kind::SequenceLike(children) | Kind::SetLike(children) => children.to_vec(),
            Kind::OctetStringLike(_) | Kind::Opaque => {
                return Err(Error::TaggedContentMismatch {
                    number: self.number,
                    target: container.name(),
                });
            }
        };
        Ok(match container {
            Container::Sequence => Element::Sequence(children),
            Container::Set => Element::Set(children),
        })
    }

    /// Reads the content as an implicitly tagged OCTET STRING.
    ///
    /// BER writes an implicit OCTET STRING as a series of OCTET STRING
    /// chunks, which decode as an explicit tag or an implicit SEQUENCE;
    /// the chunks are joined back together.
    pub fn as_octet_string(&self) -> Result<OctetString, Error> {
        let mismatch = || Error::TaggedContentMismatch {
            number: self.number,
            target: "OCTET STRING",
        };
        match self.kind() {
            Kind::OctetStringLike(octets) => Ok(octets.clone()),
            Kind::SequenceLike(chunks) | Kind::SetLike(chunks) => {
                let mut octets = Vec::new();
                for chunk in chunks {
                    match chunk {
                        Element::OctetString(chunk) => octets.extend_from_slice(chunk.as_bytes()),
                        _ => return Err(mismatch()),
                    }
                }
                Ok(OctetString::from(octets))
            }
            Kind::Opaque => Err(mismatch()),
        }
    }

    /// Tag of the DER encoding.
    pub fn tag(&self) -> Tag {
        Tag::context(self.number, self.is_constructed())
    }

    fn unsupported(&self) -> Error {
        debug!(
            "implicit [{}] cannot splice {}",
            self.number,
            self.inner.tag()
        );
        Error::UnsupportedImplicitTagTarget(self.inner.tag().to_string())
    }
}

impl Encodable for TaggedObject {
    fn encoded_len(&self, rules: Rules) -> usize {
        let tag = self.tag();
        if self.explicit {
            let inner = self.inner.encoded_len(rules);
            return constructed::framing_len(tag, inner, rules) + inner;
        }
        match self.inner.kind() {
            Kind::OctetStringLike(octets) => octets.encoded_len_as(tag, rules),
            Kind::SequenceLike(children) | Kind::SetLike(children) => {
                constructed::encoded_len(tag, children, rules)
            }
            // Not encodable; report the size the header swap would give.
            Kind::Opaque => {
                tag.encoded_len() + self.inner.encoded_len(rules) - self.inner.tag().encoded_len()
            }
        }
    }

    fn encode_to(&self, rules: Rules, sink: &mut dyn Sink) -> Result<(), Error> {
        let tag = self.tag();
        if self.explicit {
            sink.write_tag(tag);
            if rules.is_indefinite() {
                sink.write_length(Length::Indefinite);
                self.inner.encode_to(rules, sink)?;
                sink.write_end_of_contents();
            } else {
                sink.write_length(Length::Definite(self.inner.encoded_len(rules)));
                self.inner.encode_to(rules, sink)?;
            }
            return Ok(());
        }
        match self.inner.kind() {
            Kind::OctetStringLike(octets) => {
                octets.encode_as(tag, rules, sink);
                Ok(())
            }
            Kind::SequenceLike(children) => {
                constructed::encode(tag, Container::Sequence, children, rules, sink)
            }
            Kind::SetLike(children) => {
                constructed::encode(tag, Container::Set, children, rules, sink)
            }
            Kind::Opaque => Err(self.unsupported()),
        }
    }

    fn is_constructed(&self) -> bool {
        self.explicit || self.inner.is_constructed()
    }

    fn kind(&self) -> Kind<'_> {
        if self.explicit {
            Kind::SequenceLike(std::slice::from_ref(self.inner.as_ref()))
        } else {
            self.inner.kind()
        }
    }
}

impl Display for TaggedObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode = if self.explicit { "EXPLICIT" } else { "IMPLICIT" };
        write!(f, "[{}] {} {}", self.number, mode, self.inner)
    }
}
