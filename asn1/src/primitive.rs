use std::fmt::Display;
use std::str::FromStr;

use ber::{Length, Sink, Tag, length_octets};
use num_bigint::BigInt;
use num_traits::ToPrimitive;

use crate::error::Error;
use crate::rules::Rules;

/// Largest segment of a constructed OCTET STRING written under BER.
pub const OCTET_STRING_CHUNK_SIZE: usize = 1000;

pub(crate) fn primitive_len(tag: Tag, content: usize) -> usize {
    tag.encoded_len() + length_octets(content) + content
}

pub(crate) fn write_primitive(sink: &mut dyn Sink, tag: Tag, content: &[u8]) {
    sink.write_tag(tag.with_constructed(false));
    sink.write_length(Length::Definite(content.len()));
    sink.write_bytes(content);
}

// ASN1 integer is possible to be a positive and negative value.
// This can be arbitrary sized values.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Integer {
    inner: BigInt,
}

impl Integer {
    /// Returns a reference to the inner BigInt
    pub fn as_bigint(&self) -> &BigInt {
        &self.inner
    }

    /// Minimal two's complement content octets.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.inner.to_signed_bytes_be()
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.inner.to_i64()
    }

    pub fn to_u64(&self) -> Option<u64> {
        self.inner.to_u64()
    }
}

impl From<&[u8]> for Integer {
    fn from(value: &[u8]) -> Self {
        Integer {
            inner: BigInt::from_signed_bytes_be(value),
        }
    }
}

impl From<BigInt> for Integer {
    fn from(inner: BigInt) -> Self {
        Integer { inner }
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Integer {
            inner: BigInt::from(value),
        }
    }
}

impl TryFrom<&Integer> for i64 {
    type Error = Error;

    fn try_from(value: &Integer) -> Result<Self, Self::Error> {
        value.to_i64().ok_or(Error::IntegerOutOfRange("i64"))
    }
}

impl TryFrom<&Integer> for u64 {
    type Error = Error;

    fn try_from(value: &Integer) -> Result<Self, Self::Error> {
        value.to_u64().ok_or(Error::IntegerOutOfRange("u64"))
    }
}

impl Display for Integer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitString {
    unused: u8,
    data: Vec<u8>,
}

impl BitString {
    /// Creates a new BitString with the specified number of unused bits and data
    pub fn new(unused: u8, data: Vec<u8>) -> Result<Self, Error> {
        if unused > 7 || (data.is_empty() && unused != 0) {
            return Err(Error::BitStringUnusedBitsOutOfRange(unused));
        }
        Ok(BitString { unused, data })
    }

    /// Returns the number of unused bits in the last byte
    pub fn unused_bits(&self) -> u8 {
        self.unused
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns the total number of bits (excluding unused bits)
    pub fn bit_len(&self) -> usize {
        self.data.len() * 8 - self.unused as usize
    }

    pub(crate) fn content_len(&self) -> usize {
        1 + self.data.len()
    }

    pub(crate) fn content(&self) -> Vec<u8> {
        let mut content = Vec::with_capacity(self.content_len());
        content.push(self.unused);
        content.extend_from_slice(&self.data);
        content
    }
}

impl From<Vec<u8>> for BitString {
    /// A bit string using every bit of `data`.
    fn from(data: Vec<u8>) -> Self {
        BitString { unused: 0, data }
    }
}

impl TryFrom<&[u8]> for BitString {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        match value.split_first() {
            Some((&unused, data)) => BitString::new(unused, data.to_vec()),
            None => Err(Error::BitStringNoData),
        }
    }
}

impl Display for BitString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for i in 0..self.bit_len() {
            let bit = (self.data[i / 8] >> (7 - i % 8)) & 1;
            write!(f, "{}", bit)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OctetString {
    inner: Vec<u8>,
}

impl OctetString {
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.inner
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Segments of the BER constructed form. An empty string has none.
    pub fn chunks(&self) -> impl Iterator<Item = &[u8]> {
        self.inner.chunks(OCTET_STRING_CHUNK_SIZE)
    }

    /// Encoded size when written with `tag` in place of OCTET STRING.
    pub(crate) fn encoded_len_as(&self, tag: Tag, rules: Rules) -> usize {
        match rules {
            Rules::Der => primitive_len(tag, self.len()),
            Rules::Ber => {
                let segment = Tag::universal(Tag::OCTET_STRING);
                let content: usize = self
                    .chunks()
                    .map(|chunk| primitive_len(segment, chunk.len()))
                    .sum();
                tag.encoded_len() + 1 + content + ber::END_OF_CONTENTS.len()
            }
        }
    }

    pub(crate) fn encode_as(&self, tag: Tag, rules: Rules, sink: &mut dyn Sink) {
        match rules {
            Rules::Der => write_primitive(sink, tag, &self.inner),
            Rules::Ber => {
                sink.write_tag(tag.with_constructed(true));
                sink.write_length(Length::Indefinite);
                for chunk in self.chunks() {
                    write_primitive(sink, Tag::universal(Tag::OCTET_STRING), chunk);
                }
                sink.write_end_of_contents();
            }
        }
    }
}

impl AsRef<[u8]> for OctetString {
    fn as_ref(&self) -> &[u8] {
        &self.inner
    }
}

impl From<Vec<u8>> for OctetString {
    fn from(value: Vec<u8>) -> Self {
        OctetString { inner: value }
    }
}

impl From<&[u8]> for OctetString {
    fn from(value: &[u8]) -> Self {
        OctetString {
            inner: value.to_vec(),
        }
    }
}

impl Display for OctetString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for b in &self.inner {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

/// An OBJECT IDENTIFIER with at least two arcs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectIdentifier {
    inner: Vec<u64>,
}

impl ObjectIdentifier {
    pub fn new(arcs: Vec<u64>) -> Result<Self, Error> {
        match arcs.as_slice() {
            [] | [_] => Err(Error::ObjectIdentifierTooFewComponents),
            [first, second, ..] if *first > 2 || (*first < 2 && *second >= 40) => Err(
                Error::ObjectIdentifierInvalidComponent(format!("{first}.{second}")),
            ),
            [_, second, ..] if *second > u64::MAX - 80 => Err(
                Error::ObjectIdentifierInvalidComponent(second.to_string()),
            ),
            _ => Ok(ObjectIdentifier { inner: arcs }),
        }
    }

    pub fn arcs(&self) -> &[u64] {
        &self.inner
    }

    /// Content octets: base-128 subidentifiers, the first two arcs merged.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::new();
        push_subidentifier(&mut result, self.inner[0] * 40 + self.inner[1]);
        for arc in &self.inner[2..] {
            push_subidentifier(&mut result, *arc);
        }
        result
    }
}

fn push_subidentifier(out: &mut Vec<u8>, value: u64) {
    let groups = ((u64::BITS - value.leading_zeros()) as usize).div_ceil(7).max(1);
    for i in (0..groups).rev() {
        let group = ((value >> (7 * i)) & 0x7f) as u8;
        // If this is not the last byte, set the continuation bit
        if i == 0 {
            out.push(group);
        } else {
            out.push(group | 0x80);
        }
    }
}

impl TryFrom<&[u8]> for ObjectIdentifier {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(Error::ObjectIdentifierNoData);
        }

        let mut subidentifiers = Vec::new();
        let mut val = 0u64;
        let mut in_progress = false;
        for &b in value {
            if !in_progress && b == 0x80 {
                return Err(Error::ObjectIdentifierNonMinimal);
            }
            if val > u64::MAX >> 7 {
                return Err(Error::ObjectIdentifierInvalidComponent(
                    "subidentifier overflows u64".to_string(),
                ));
            }
            val = (val << 7) | (b & 0x7f) as u64;
            in_progress = b & 0x80 != 0;
            if !in_progress {
                subidentifiers.push(val);
                val = 0;
            }
        }
        if in_progress {
            return Err(Error::ObjectIdentifierIncompleteEncoding);
        }

        let first = subidentifiers[0];
        let mut arcs = Vec::with_capacity(subidentifiers.len() + 1);
        match first {
            0..40 => arcs.extend([0, first]),
            40..80 => arcs.extend([1, first - 40]),
            _ => arcs.extend([2, first - 80]),
        }
        arcs.extend_from_slice(&subidentifiers[1..]);
        Ok(ObjectIdentifier { inner: arcs })
    }
}

impl Display for ObjectIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self
            .inner
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{}", s)
    }
}

impl FromStr for ObjectIdentifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let arcs = s
            .split('.')
            .map(|arc| {
                arc.parse::<u64>()
                    .map_err(|_| Error::ObjectIdentifierInvalidComponent(arc.to_string()))
            })
            .collect::<Result<Vec<u64>, Error>>()?;
        ObjectIdentifier::new(arcs)
    }
}
