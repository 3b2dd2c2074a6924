//! Length octets: short, long and indefinite form.

use nom::Parser;
use nom::bytes::complete::take;
use nom::number::complete::be_u8;

use crate::error::Error;
use crate::tag::ParseResult;

/// The single length octet announcing an indefinite-length value.
pub const INDEFINITE_LENGTH: u8 = 0x80;

const LONG_FORM: u8 = 0x80;
// 0xff is reserved by X.690 8.1.3.5.
const RESERVED_LENGTH: u8 = 0xff;
const SHORT_FORM_MAX: usize = 0x7f;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Length {
    Definite(usize),
    /// Content runs until the end-of-contents octets `00 00`.
    Indefinite,
}

impl Length {
    pub fn is_indefinite(&self) -> bool {
        matches!(self, Length::Indefinite)
    }

    pub fn definite(&self) -> Option<usize> {
        match self {
            Length::Definite(n) => Some(*n),
            Length::Indefinite => None,
        }
    }

    /// Number of length octets this length occupies.
    pub fn encoded_len(&self) -> usize {
        match self {
            Length::Definite(n) => length_octets(*n),
            Length::Indefinite => 1,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        encode_length(*self)
    }
}

/// Size of the definite length header for `n` content bytes.
pub fn length_octets(n: usize) -> usize {
    if n <= SHORT_FORM_MAX {
        1
    } else {
        1 + magnitude_octets(n)
    }
}

fn magnitude_octets(n: usize) -> usize {
    (usize::BITS - n.leading_zeros()).div_ceil(8) as usize
}

pub fn encode_length(length: Length) -> Vec<u8> {
    match length {
        Length::Indefinite => vec![INDEFINITE_LENGTH],
        Length::Definite(n) if n <= SHORT_FORM_MAX => vec![n as u8],
        Length::Definite(n) => {
            let count = magnitude_octets(n);
            let mut out = Vec::with_capacity(count + 1);
            out.push(LONG_FORM | count as u8);
            out.extend_from_slice(&n.to_be_bytes()[size_of::<usize>() - count..]);
            out
        }
    }
}

/// Parses the length octets at the start of `input`.
///
/// A definite length larger than what is left of `input` fails with
/// `TruncatedInput`, so callers can hand in a slice bounded by the
/// enclosing value.
pub fn parse_length(input: &[u8]) -> ParseResult<'_, Length> {
    let (input, first) = be_u8(input).map_err(|_: nom::Err<Error>| {
        nom::Err::Failure(Error::TruncatedInput {
            needed: 1,
            remaining: 0,
        })
    })?;

    let length = match first {
        INDEFINITE_LENGTH => return Ok((input, Length::Indefinite)),
        RESERVED_LENGTH => {
            return Err(nom::Err::Failure(Error::malformed(
                "reserved length octet 0xff",
            )));
        }
        n if n & LONG_FORM == 0 => n as usize,
        n => {
            // long form
            // The low 7 bits give the number of length octets that follow.
            let count = (n & !LONG_FORM) as usize;
            if count > size_of::<usize>() {
                return Err(nom::Err::Failure(Error::malformed(format!(
                    "{count} length octets do not fit in usize"
                ))));
            }
            let remaining = input.len();
            let (rest, octets) = take(count).parse(input).map_err(|_: nom::Err<Error>| {
                nom::Err::Failure(Error::TruncatedInput {
                    needed: count,
                    remaining,
                })
            })?;
            let length = octets
                .iter()
                .fold(0usize, |acc, &b| (acc << 8) | b as usize);
            return check_remaining(rest, length);
        }
    };
    check_remaining(input, length)
}

fn check_remaining(input: &[u8], length: usize) -> ParseResult<'_, Length> {
    if length > input.len() {
        return Err(nom::Err::Failure(Error::TruncatedInput {
            needed: length,
            remaining: input.len(),
        }));
    }
    Ok((input, Length::Definite(length)))
}
