//! Mapping of a raw TLV tree onto [`Element`] values.
//!
//! Both BER and DER input are accepted: OCTET STRINGs may arrive as a
//! constructed series of segments and any constructed value may use the
//! indefinite length form. Context-specific tags are interpreted without a
//! schema, see [`TaggedObject`] for the resulting shapes.

use ber::{Class, Tag, Tlv};
use log::trace;

use crate::error::Error;
use crate::{BitString, Element, Integer, ObjectIdentifier, OctetString, TaggedObject};

fn primitive(tlv: &Tlv) -> Result<&[u8], Error> {
    tlv.data().ok_or(Error::ExpectedPrimitive(*tlv.tag()))
}

fn children(tlv: &Tlv) -> Result<Vec<Element>, Error> {
    tlv.tlvs()
        .ok_or(Error::ExpectedConstructed(*tlv.tag()))?
        .iter()
        .map(Element::try_from)
        .collect()
}

/// Concatenates the segments of a constructed OCTET STRING. Segments may
/// themselves be constructed.
fn collect_segments(tlv: &Tlv, out: &mut Vec<u8>) -> Result<(), Error> {
    for segment in tlv.tlvs().unwrap_or_default() {
        if !segment.tag().is_universal(Tag::OCTET_STRING) {
            return Err(Error::InvalidOctetStringSegment(*segment.tag()));
        }
        match segment.data() {
            Some(data) => out.extend_from_slice(data),
            None => collect_segments(segment, out)?,
        }
    }
    Ok(())
}

fn octet_string(tlv: &Tlv) -> Result<OctetString, Error> {
    match tlv.data() {
        Some(data) => Ok(OctetString::from(data)),
        None => {
            let mut octets = Vec::new();
            collect_segments(tlv, &mut octets)?;
            Ok(OctetString::from(octets))
        }
    }
}

fn context_specific(tlv: &Tlv, number: u32) -> Result<TaggedObject, Error> {
    let Some(tlvs) = tlv.tlvs() else {
        return Ok(TaggedObject::implicit(number, Element::OctetString(octet_string(tlv)?)));
    };
    match tlvs {
        [] => Ok(TaggedObject::empty(number)),
        [inner] => Ok(TaggedObject::explicit(number, Element::try_from(inner)?)),
        _ => Ok(TaggedObject::implicit(number, Element::Sequence(children(tlv)?))),
    }
}

impl TryFrom<&Tlv> for Element {
    type Error = Error;

    fn try_from(tlv: &Tlv) -> Result<Self, Self::Error> {
        let tag = tlv.tag();
        trace!("decoding {}", tag);

        match tag.class() {
            Class::ContextSpecific => {
                return Ok(Element::Tagged(context_specific(tlv, tag.number())?));
            }
            Class::Application | Class::Private => return Ok(Element::Unimplemented(tlv.clone())),
            Class::Universal => {}
        }

        match tag.number() {
            Tag::BOOLEAN => {
                let data = primitive(tlv)?;
                match data {
                    [b] => Ok(Element::Boolean(*b != 0x00)),
                    _ => Err(Error::InvalidBoolean(data.len())),
                }
            }
            Tag::INTEGER => {
                let data = primitive(tlv)?;
                if data.is_empty() {
                    return Err(Error::IntegerNoData);
                }
                Ok(Element::Integer(Integer::from(data)))
            }
            Tag::BIT_STRING => Ok(Element::BitString(BitString::try_from(primitive(tlv)?)?)),
            Tag::OCTET_STRING => Ok(Element::OctetString(octet_string(tlv)?)),
            Tag::NULL => match primitive(tlv)?.len() {
                0 => Ok(Element::Null),
                n => Err(Error::NullNotEmpty(n)),
            },
            Tag::OBJECT_IDENTIFIER => Ok(Element::ObjectIdentifier(
                ObjectIdentifier::try_from(primitive(tlv)?)?,
            )),
            Tag::UTF8_STRING => {
                let s = std::str::from_utf8(primitive(tlv)?)
                    .map_err(|_| Error::Utf8StringInvalidUtf8)?;
                Ok(Element::UTF8String(s.to_string()))
            }
            Tag::SEQUENCE => Ok(Element::Sequence(children(tlv)?)),
            Tag::SET => Ok(Element::Set(children(tlv)?)),
            _ => Ok(Element::Unimplemented(tlv.clone())),
        }
    }
}
