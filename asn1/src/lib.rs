//! ASN.1 values on top of the `ber` TLV layer.
//!
//! [`Element`] is the value tree. It is encoded under either [`Rules`]
//! through the [`Encodable`] capability and decoded from any BER input
//! (DER included).
//!
//! ```
//! use asn1::{Element, Encodable, Integer, OctetString, Rules};
//!
//! let set = Element::Set(vec![
//!     Element::OctetString(OctetString::from(vec![0x00])),
//!     Element::Integer(Integer::from(7_i64)),
//! ]);
//!
//! // DER sorts the SET, BER streams it in insertion order.
//! let der = set.to_vec(Rules::Der).unwrap();
//! assert_eq!(vec![0x31, 0x06, 0x02, 0x01, 0x07, 0x04, 0x01, 0x00], der);
//! let ber = set.to_vec(Rules::Ber).unwrap();
//! assert_eq!(
//!     vec![0x31, 0x80, 0x24, 0x80, 0x04, 0x01, 0x00, 0x00, 0x00, 0x02, 0x01, 0x07, 0x00, 0x00],
//!     ber
//! );
//!
//! assert_eq!(set, Element::parse(&ber).unwrap());
//! ```

#![forbid(unsafe_code)]

use std::fmt::Display;

use ber::{Limits, Sink, Tag, Tlv};
use kumiki::decoder::{DecodableFrom, Decoder};
use kumiki::encoder::{EncodableTo, Encoder};

pub mod constructed;
mod decode;
pub mod encodable;
pub mod error;
pub mod primitive;
pub mod rules;
pub mod tagged;

pub use constructed::Container;
pub use encodable::{Encodable, Kind};
pub use error::Error;
pub use primitive::{BitString, Integer, OCTET_STRING_CHUNK_SIZE, ObjectIdentifier, OctetString};
pub use rules::Rules;
pub use tagged::TaggedObject;

use primitive::{primitive_len, write_primitive};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Boolean(bool),
    Integer(Integer),
    BitString(BitString),
    OctetString(OctetString),
    Null,
    ObjectIdentifier(ObjectIdentifier),
    UTF8String(String),
    Sequence(Vec<Element>),
    Set(Vec<Element>),
    Tagged(TaggedObject),
    /// A value this crate does not interpret, kept as read.
    Unimplemented(Tlv),
}

impl Element {
    pub fn parse(input: &[u8]) -> Result<Element, Error> {
        Self::parse_with_limits(input, &Limits::default())
    }

    pub fn parse_with_limits(input: &[u8], limits: &Limits) -> Result<Element, Error> {
        let tlv = Tlv::parse_with_limits(input, limits)?;
        Element::try_from(&tlv)
    }

    /// Tag of the DER encoding.
    pub fn tag(&self) -> Tag {
        match self {
            Element::Boolean(_) => Tag::universal(Tag::BOOLEAN),
            Element::Integer(_) => Tag::universal(Tag::INTEGER),
            Element::BitString(_) => Tag::universal(Tag::BIT_STRING),
            Element::OctetString(_) => Tag::universal(Tag::OCTET_STRING),
            Element::Null => Tag::universal(Tag::NULL),
            Element::ObjectIdentifier(_) => Tag::universal(Tag::OBJECT_IDENTIFIER),
            Element::UTF8String(_) => Tag::universal(Tag::UTF8_STRING),
            Element::Sequence(_) => Container::Sequence.tag(),
            Element::Set(_) => Container::Set.tag(),
            Element::Tagged(tagged) => tagged.tag(),
            Element::Unimplemented(tlv) => *tlv.tag(),
        }
    }
}

impl Encodable for Element {
    fn encoded_len(&self, rules: Rules) -> usize {
        let tag = self.tag();
        match self {
            Element::Boolean(_) => primitive_len(tag, 1),
            Element::Integer(i) => primitive_len(tag, i.to_bytes().len()),
            Element::BitString(bs) => primitive_len(tag, bs.content_len()),
            Element::OctetString(os) => os.encoded_len_as(tag, rules),
            Element::Null => primitive_len(tag, 0),
            Element::ObjectIdentifier(oid) => primitive_len(tag, oid.to_bytes().len()),
            Element::UTF8String(s) => primitive_len(tag, s.len()),
            Element::Sequence(elements) | Element::Set(elements) => {
                constructed::encoded_len(tag, elements, rules)
            }
            Element::Tagged(tagged) => tagged.encoded_len(rules),
            Element::Unimplemented(tlv) => match rules {
                Rules::Ber => tlv.encoded_len(),
                Rules::Der => tlv.definite_len(),
            },
        }
    }

    fn encode_to(&self, rules: Rules, sink: &mut dyn Sink) -> Result<(), Error> {
        let tag = self.tag();
        match self {
            Element::Boolean(b) => write_primitive(sink, tag, &[if *b { 0xff } else { 0x00 }]),
            Element::Integer(i) => write_primitive(sink, tag, &i.to_bytes()),
            Element::BitString(bs) => write_primitive(sink, tag, &bs.content()),
            Element::OctetString(os) => os.encode_as(tag, rules, sink),
            Element::Null => write_primitive(sink, tag, &[]),
            Element::ObjectIdentifier(oid) => write_primitive(sink, tag, &oid.to_bytes()),
            Element::UTF8String(s) => write_primitive(sink, tag, s.as_bytes()),
            Element::Sequence(elements) => {
                constructed::encode(tag, Container::Sequence, elements, rules, sink)?
            }
            Element::Set(elements) => {
                constructed::encode(tag, Container::Set, elements, rules, sink)?
            }
            Element::Tagged(tagged) => tagged.encode_to(rules, sink)?,
            Element::Unimplemented(tlv) => match rules {
                Rules::Ber => tlv.encode_to(sink),
                Rules::Der => tlv.encode_definite_to(sink),
            },
        }
        Ok(())
    }

    fn is_constructed(&self) -> bool {
        match self {
            Element::Sequence(_) | Element::Set(_) => true,
            Element::Tagged(tagged) => tagged.is_constructed(),
            Element::Unimplemented(tlv) => tlv.tag().is_constructed(),
            _ => false,
        }
    }

    fn kind(&self) -> Kind<'_> {
        match self {
            Element::OctetString(os) => Kind::OctetStringLike(os),
            Element::Sequence(elements) => Kind::SequenceLike(elements),
            Element::Set(elements) => Kind::SetLike(elements),
            Element::Tagged(tagged) => tagged.kind(),
            _ => Kind::Opaque,
        }
    }
}

impl From<TaggedObject> for Element {
    fn from(tagged: TaggedObject) -> Self {
        Element::Tagged(tagged)
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Element::Boolean(b) => write!(f, "Boolean({})", b),
            Element::Integer(i) => write!(f, "Integer({})", i),
            Element::BitString(bs) => write!(f, "BitString({})", bs),
            Element::OctetString(os) => write!(f, "OctetString({})", os),
            Element::Null => write!(f, "Null"),
            Element::ObjectIdentifier(oid) => write!(f, "ObjectIdentifier({})", oid),
            Element::UTF8String(s) => write!(f, "UTF8String({})", s),
            Element::Sequence(elements) => write_list(f, "Sequence", elements),
            Element::Set(elements) => write_list(f, "Set", elements),
            Element::Tagged(tagged) => write!(f, "{}", tagged),
            Element::Unimplemented(tlv) => write!(f, "Unimplemented({})", tlv.tag()),
        }
    }
}

fn write_list(f: &mut std::fmt::Formatter<'_>, name: &str, elements: &[Element]) -> std::fmt::Result {
    write!(f, "{}(", name)?;
    for (i, element) in elements.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", element)?;
    }
    write!(f, ")")
}

impl DecodableFrom<Tlv> for Element {}

impl Decoder<Tlv, Element> for Tlv {
    type Error = Error;

    fn decode(&self) -> Result<Element, Self::Error> {
        Element::try_from(self)
    }
}

impl DecodableFrom<&[u8]> for Element {}

impl Decoder<&[u8], Element> for &[u8] {
    type Error = Error;

    fn decode(&self) -> Result<Element, Self::Error> {
        Element::parse(self)
    }
}

impl EncodableTo<Element> for Vec<u8> {}

/// DER encoding.
impl Encoder<Element, Vec<u8>> for Element {
    type Error = Error;

    fn encode(&self) -> Result<Vec<u8>, Self::Error> {
        self.to_vec(Rules::Der)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest(element, expected,
        case(Element::Boolean(true), vec![0x01, 0x01, 0xff]),
        case(Element::Boolean(false), vec![0x01, 0x01, 0x00]),
        case(Element::Integer(Integer::from(-1_i64)), vec![0x02, 0x01, 0xff]),
        case(Element::BitString(BitString::new(6, vec![0x6e, 0x5d, 0xc0]).unwrap()), vec![0x03, 0x04, 0x06, 0x6e, 0x5d, 0xc0]),
        case(Element::OctetString(OctetString::default()), vec![0x04, 0x00]),
        case(Element::Null, vec![0x05, 0x00]),
        case(Element::ObjectIdentifier("1.2.840.113549".parse().unwrap()), vec![0x06, 0x06, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d]),
        case(Element::UTF8String("kumiki".to_string()), vec![0x0c, 0x06, 0x6b, 0x75, 0x6d, 0x69, 0x6b, 0x69]),
        case(Element::Sequence(vec![]), vec![0x30, 0x00]),
        case(Element::Sequence(vec![Element::Null, Element::Boolean(true)]), vec![0x30, 0x05, 0x05, 0x00, 0x01, 0x01, 0xff]),
        case(Element::Set(vec![Element::Boolean(true), Element::Null]), vec![0x31, 0x05, 0x01, 0x01, 0xff, 0x05, 0x00]),
    )]
    fn test_encode_der(element: Element, expected: Vec<u8>) {
        let actual = element.encode().unwrap();
        assert_eq!(expected, actual);
        assert_eq!(actual.len(), element.encoded_len(Rules::Der));
        assert_eq!(element, Element::parse(&actual).unwrap());
    }

    #[test]
    fn test_encode_long_sequence() {
        let element = Element::Sequence(vec![Element::OctetString(OctetString::from(vec![0x5a; 200]))]);
        let der = element.to_vec(Rules::Der).unwrap();
        assert_eq!(&[0x30, 0x81, 0xcb, 0x04, 0x81, 0xc8], &der[..6]);
        assert_eq!(206, der.len());
    }

    #[rstest(input, der,
        // APPLICATION 1, indefinite, one BOOLEAN
        case(vec![0x61, 0x80, 0x01, 0x01, 0xff, 0x00, 0x00], vec![0x61, 0x03, 0x01, 0x01, 0xff]),
        case(vec![0x13, 0x02, 0x68, 0x69], vec![0x13, 0x02, 0x68, 0x69]),
    )]
    fn test_unimplemented_reencode(input: Vec<u8>, der: Vec<u8>) {
        let element = Element::parse(&input).unwrap();
        assert!(matches!(element, Element::Unimplemented(_)));
        assert_eq!(input, element.to_vec(Rules::Ber).unwrap());
        assert_eq!(input.len(), element.encoded_len(Rules::Ber));
        assert_eq!(der, element.to_vec(Rules::Der).unwrap());
        assert_eq!(der.len(), element.encoded_len(Rules::Der));
    }

    #[rstest(element, expected,
        case(Element::Boolean(true), Kind::Opaque),
        case(Element::Null, Kind::Opaque),
        case(Element::Sequence(vec![]), Kind::SequenceLike(&[])),
        case(Element::Set(vec![]), Kind::SetLike(&[])),
    )]
    fn test_kind(element: Element, expected: Kind<'static>) {
        assert_eq!(expected, element.kind());
    }

    #[test]
    fn test_decoder_traits() {
        let bytes: &[u8] = &[0x30, 0x03, 0x02, 0x01, 0x2a];
        let element: Element = bytes.decode().unwrap();
        assert_eq!(Element::Sequence(vec![Element::Integer(Integer::from(42_i64))]), element);

        let tlv = Tlv::parse(bytes).unwrap();
        let from_tlv: Element = tlv.decode().unwrap();
        assert_eq!(element, from_tlv);
    }

    #[test]
    fn test_parse_with_limits() {
        let input = [0x30, 0x02, 0x30, 0x00];
        assert!(Element::parse_with_limits(&input, &Limits::new(1)).is_ok());
        assert!(matches!(
            Element::parse_with_limits(&input, &Limits::new(0)),
            Err(Error::Ber(ber::error::Error::MalformedEncoding(_)))
        ));
    }

    #[test]
    fn test_display() {
        let element = Element::Sequence(vec![
            Element::Integer(Integer::from(1_i64)),
            Element::Tagged(TaggedObject::explicit(0, Element::Null)),
        ]);
        assert_eq!("Sequence(Integer(1), [0] EXPLICIT Null)", element.to_string());
    }
}
