use kumiki::decoder::{DecodableFrom, Decoder};
use kumiki::encoder::{EncodableTo, Encoder};
use log::{debug, trace};

use crate::cursor::Cursor;
use crate::error::Error;
use crate::length::{Length, length_octets};
use crate::sink::Sink;
use crate::tag::Tag;

/// Terminator of an indefinite-length value. Not a value itself.
pub const END_OF_CONTENTS: [u8; 2] = [0x00, 0x00];

pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Bounds applied while decoding untrusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    max_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Limits {
    /// `max_depth` counts TLV levels below the outermost value, primitive
    /// leaves included.
    pub fn new(max_depth: usize) -> Self {
        Limits { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Data(Vec<u8>),
    Tlvs(Vec<Tlv>),
}

/// A decoded tag-length-value tree.
///
/// The length form that was read is kept, so a BER input is re-encoded
/// the way it arrived. [`Tlv::encode_definite_to`] produces the definite-length
/// form instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tlv {
    tag: Tag,
    length: Length,
    value: Value,
}

impl Tlv {
    pub fn new_primitive(tag: Tag, data: Vec<u8>) -> Self {
        Tlv {
            tag: tag.with_constructed(false),
            length: Length::Definite(data.len()),
            value: Value::Data(data),
        }
    }

    pub fn new_constructed(tag: Tag, tlvs: Vec<Tlv>) -> Self {
        let content = tlvs.iter().map(Tlv::encoded_len).sum();
        Tlv {
            tag: tag.with_constructed(true),
            length: Length::Definite(content),
            value: Value::Tlvs(tlvs),
        }
    }

    pub fn new_indefinite(tag: Tag, tlvs: Vec<Tlv>) -> Self {
        Tlv {
            tag: tag.with_constructed(true),
            length: Length::Indefinite,
            value: Value::Tlvs(tlvs),
        }
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    /// The length as it was read or constructed.
    pub fn length(&self) -> Length {
        self.length
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn data(&self) -> Option<&[u8]> {
        match &self.value {
            Value::Data(data) => Some(data),
            Value::Tlvs(_) => None,
        }
    }

    pub fn tlvs(&self) -> Option<&[Tlv]> {
        match &self.value {
            Value::Data(_) => None,
            Value::Tlvs(tlvs) => Some(tlvs),
        }
    }

    /// Decodes exactly one value spanning all of `input`.
    pub fn parse(input: &[u8]) -> Result<Tlv, Error> {
        Self::parse_with_limits(input, &Limits::default())
    }

    pub fn parse_with_limits(input: &[u8], limits: &Limits) -> Result<Tlv, Error> {
        let mut cursor = Cursor::new(input);
        let tlv = Self::read(&mut cursor, limits)?;
        if !cursor.is_empty() {
            debug!("{} bytes after the outermost value", cursor.remaining());
            return Err(Error::TrailingGarbage(cursor.remaining()));
        }
        Ok(tlv)
    }

    /// Decodes the next value from `cursor`, leaving anything after it unread.
    pub fn read(cursor: &mut Cursor<'_>, limits: &Limits) -> Result<Tlv, Error> {
        Self::read_nested(cursor, 0, limits)
    }

    fn read_nested(cursor: &mut Cursor<'_>, depth: usize, limits: &Limits) -> Result<Tlv, Error> {
        if depth > limits.max_depth {
            debug!("nesting depth limit {} reached at offset {}", limits.max_depth, cursor.position());
            return Err(Error::malformed(format!(
                "nesting depth exceeds {}",
                limits.max_depth
            )));
        }

        let position = cursor.position();
        let tag = cursor.read_tag()?;
        if tag.is_universal(Tag::END_OF_CONTENTS) {
            debug!("end-of-contents tag used as a value at offset {position}");
            return Err(Error::malformed("end-of-contents tag outside a terminator"));
        }
        let length = cursor.read_length()?;

        if !tag.is_constructed() {
            return match length {
                Length::Definite(n) => {
                    let data = cursor.read_bytes(n)?;
                    Ok(Tlv::new_primitive(tag, data.to_vec()))
                }
                Length::Indefinite => Err(Error::malformed(format!(
                    "indefinite length on primitive {tag}"
                ))),
            };
        }

        trace!("entering {tag} with {length:?} at depth {depth}");
        let tlvs = match length {
            Length::Definite(n) => {
                let mut inner = Cursor::new(cursor.read_bytes(n)?);
                Self::read_bounded(&mut inner, depth, limits)?
            }
            Length::Indefinite => Self::read_until_end_of_contents(cursor, depth, limits)?,
        };

        Ok(Tlv {
            tag,
            length,
            value: Value::Tlvs(tlvs),
        })
    }

    // Children of a definite-length value must use up the bound exactly.
    fn read_bounded(inner: &mut Cursor<'_>, depth: usize, limits: &Limits) -> Result<Vec<Tlv>, Error> {
        let mut tlvs = Vec::new();
        while !inner.is_empty() {
            if inner
                .peek_bytes(END_OF_CONTENTS.len())
                .is_some_and(|bytes| bytes == END_OF_CONTENTS)
            {
                debug!("end-of-contents inside a definite-length value");
                return Err(Error::TrailingGarbage(inner.remaining()));
            }
            tlvs.push(Self::read_nested(inner, depth + 1, limits)?);
        }
        Ok(tlvs)
    }

    fn read_until_end_of_contents(
        cursor: &mut Cursor<'_>,
        depth: usize,
        limits: &Limits,
    ) -> Result<Vec<Tlv>, Error> {
        let mut tlvs = Vec::new();
        loop {
            match cursor.peek_bytes(END_OF_CONTENTS.len()) {
                None => {
                    debug!("input ends before end-of-contents at offset {}", cursor.position());
                    return Err(Error::UnterminatedIndefiniteValue);
                }
                Some(bytes) if bytes == END_OF_CONTENTS => {
                    cursor.read_bytes(END_OF_CONTENTS.len())?;
                    return Ok(tlvs);
                }
                Some(_) => tlvs.push(Self::read_nested(cursor, depth + 1, limits)?),
            }
        }
    }

    /// Size of the encoding produced by [`Tlv::encode_to`].
    pub fn encoded_len(&self) -> usize {
        self.measure(false)
    }

    /// Size of the encoding produced by [`Tlv::encode_definite_to`].
    pub fn definite_len(&self) -> usize {
        self.measure(true)
    }

    fn content_len(&self, definite: bool) -> usize {
        match &self.value {
            Value::Data(data) => data.len(),
            Value::Tlvs(tlvs) => tlvs.iter().map(|tlv| tlv.measure(definite)).sum(),
        }
    }

    fn measure(&self, definite: bool) -> usize {
        let content = self.content_len(definite);
        if self.length.is_indefinite() && !definite {
            self.tag.encoded_len() + 1 + content + END_OF_CONTENTS.len()
        } else {
            self.tag.encoded_len() + length_octets(content) + content
        }
    }

    /// Writes the value with the length forms it was read with.
    pub fn encode_to(&self, sink: &mut dyn Sink) {
        self.write(sink, false);
    }

    /// Writes the value with definite lengths throughout.
    pub fn encode_definite_to(&self, sink: &mut dyn Sink) {
        self.write(sink, true);
    }

    fn write(&self, sink: &mut dyn Sink, definite: bool) {
        sink.write_tag(self.tag);
        let indefinite = self.length.is_indefinite() && !definite;
        if indefinite {
            sink.write_length(Length::Indefinite);
        } else {
            sink.write_length(Length::Definite(self.content_len(definite)));
        }
        match &self.value {
            Value::Data(data) => sink.write_bytes(data),
            Value::Tlvs(tlvs) => {
                for tlv in tlvs {
                    tlv.write(sink, definite);
                }
            }
        }
        if indefinite {
            sink.write_end_of_contents();
        }
    }

    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode_to(&mut out);
        out
    }
}

impl DecodableFrom<&[u8]> for Tlv {}

impl Decoder<&[u8], Tlv> for &[u8] {
    type Error = Error;

    fn decode(&self) -> Result<Tlv, Self::Error> {
        Tlv::parse(self)
    }
}

impl DecodableFrom<Vec<u8>> for Tlv {}

impl Decoder<Vec<u8>, Tlv> for Vec<u8> {
    type Error = Error;

    fn decode(&self) -> Result<Tlv, Self::Error> {
        Tlv::parse(self)
    }
}

impl EncodableTo<Tlv> for Vec<u8> {}

impl Encoder<Tlv, Vec<u8>> for Tlv {
    type Error = Error;

    fn encode(&self) -> Result<Vec<u8>, Self::Error> {
        Ok(self.to_vec())
    }
}
