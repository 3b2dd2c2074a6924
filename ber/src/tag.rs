//! Identifier octets: class, constructed bit and tag number.

use std::fmt::Display;

use nom::IResult;
use nom::number::complete::be_u8;

use crate::error::Error;

pub type ParseResult<'a, T> = IResult<&'a [u8], T, Error>;

pub const TAG_CONSTRUCTED: u8 = 0x20;

const CLASS_MASK: u8 = 0xc0;
const NUMBER_MASK: u8 = 0x1f;
// Bits 0-4 all set: the number follows in continuation octets.
const HIGH_TAG_NUMBER: u8 = 0x1f;
const CONTINUATION: u8 = 0x80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Class {
    Universal,
    Application,
    ContextSpecific,
    Private,
}

impl Class {
    fn bits(self) -> u8 {
        match self {
            Class::Universal => 0x00,
            Class::Application => 0x40,
            Class::ContextSpecific => 0x80,
            Class::Private => 0xc0,
        }
    }

    fn from_bits(octet: u8) -> Self {
        match octet & CLASS_MASK {
            0x00 => Class::Universal,
            0x40 => Class::Application,
            0x80 => Class::ContextSpecific,
            _ => Class::Private,
        }
    }
}

/// The tag of an encoded value.
///
/// A tag is immutable; the `with_constructed` helper returns a copy with
/// the constructed bit changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag {
    class: Class,
    number: u32,
    constructed: bool,
}

impl Tag {
    pub const END_OF_CONTENTS: u32 = 0;
    pub const BOOLEAN: u32 = 1;
    pub const INTEGER: u32 = 2;
    pub const BIT_STRING: u32 = 3;
    pub const OCTET_STRING: u32 = 4;
    pub const NULL: u32 = 5;
    pub const OBJECT_IDENTIFIER: u32 = 6;
    pub const UTF8_STRING: u32 = 12;
    pub const SEQUENCE: u32 = 16;
    pub const SET: u32 = 17;

    pub const fn new(class: Class, number: u32, constructed: bool) -> Self {
        Tag {
            class,
            number,
            constructed,
        }
    }

    /// A primitive UNIVERSAL tag.
    pub const fn universal(number: u32) -> Self {
        Tag::new(Class::Universal, number, false)
    }

    pub const fn context(number: u32, constructed: bool) -> Self {
        Tag::new(Class::ContextSpecific, number, constructed)
    }

    pub const fn with_constructed(self, constructed: bool) -> Self {
        Tag::new(self.class, self.number, constructed)
    }

    pub fn class(&self) -> Class {
        self.class
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn is_constructed(&self) -> bool {
        self.constructed
    }

    pub fn is_universal(&self, number: u32) -> bool {
        self.class == Class::Universal && self.number == number
    }

    /// Number of identifier octets this tag occupies.
    pub fn encoded_len(&self) -> usize {
        tag_length(self.number)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        encode_tag(*self)
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let form = if self.constructed { "C" } else { "P" };
        match self.class {
            Class::Universal => write!(f, "UNIVERSAL {} ({})", self.number, form),
            Class::Application => write!(f, "[APPLICATION {}] ({})", self.number, form),
            Class::ContextSpecific => write!(f, "[{}] ({})", self.number, form),
            Class::Private => write!(f, "[PRIVATE {}] ({})", self.number, form),
        }
    }
}

/// Number of identifier octets needed for tag number `number`.
///
/// Always equal to `encode_tag(..).len()` for a tag with that number.
pub fn tag_length(number: u32) -> usize {
    if number < HIGH_TAG_NUMBER as u32 {
        return 1;
    }
    let bits = (u32::BITS - number.leading_zeros()) as usize;
    1 + bits.div_ceil(7)
}

pub fn encode_tag(tag: Tag) -> Vec<u8> {
    let mut first = tag.class.bits();
    if tag.constructed {
        first |= TAG_CONSTRUCTED;
    }
    if tag.number < HIGH_TAG_NUMBER as u32 {
        return vec![first | tag.number as u8];
    }

    let groups = tag_length(tag.number) - 1;
    let mut out = Vec::with_capacity(groups + 1);
    out.push(first | HIGH_TAG_NUMBER);
    // big-endian 7-bit groups, continuation bit on all but the last
    for i in (0..groups).rev() {
        let group = ((tag.number >> (7 * i)) & 0x7f) as u8;
        if i == 0 {
            out.push(group);
        } else {
            out.push(group | CONTINUATION);
        }
    }
    out
}

fn malformed(msg: &str) -> nom::Err<Error> {
    nom::Err::Failure(Error::malformed(msg))
}

/// Parses the identifier octets at the start of `input`.
///
/// Non-minimal continuation octets and the high-number form used for
/// numbers below 31 are rejected.
pub fn parse_tag(input: &[u8]) -> ParseResult<'_, Tag> {
    let (mut input, first) =
        be_u8(input).map_err(|_: nom::Err<Error>| malformed("input ends before tag"))?;
    let class = Class::from_bits(first);
    let constructed = first & TAG_CONSTRUCTED == TAG_CONSTRUCTED;

    let low = first & NUMBER_MASK;
    if low != HIGH_TAG_NUMBER {
        return Ok((input, Tag::new(class, low as u32, constructed)));
    }

    let mut number: u32 = 0;
    let mut octets = 0;
    loop {
        let (rest, octet) = be_u8(input)
            .map_err(|_: nom::Err<Error>| malformed("input ends inside tag number"))?;
        input = rest;
        if octets == 0 && octet == CONTINUATION {
            return Err(malformed("non-minimal tag number encoding"));
        }
        if number > u32::MAX >> 7 {
            return Err(malformed("tag number overflows u32"));
        }
        number = (number << 7) | (octet & 0x7f) as u32;
        octets += 1;
        if octet & CONTINUATION == 0 {
            break;
        }
    }

    if number < HIGH_TAG_NUMBER as u32 {
        return Err(malformed("high tag number form used for a low tag number"));
    }
    Ok((input, Tag::new(class, number, constructed)))
}
