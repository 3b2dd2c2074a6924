//! Tag-length-value layer of the kumiki codec.
//!
//! This crate reads and writes the framing shared by BER and DER: identifier
//! octets ([`Tag`]), length octets ([`Length`], including the indefinite
//! form) and the raw [`Tlv`] tree. It knows nothing about what the content
//! bytes mean; that is the job of the `asn1` crate.
//!
//! ```
//! use ber::{Length, Tlv};
//!
//! // SET, indefinite length, one BOOLEAN, end-of-contents
//! let bytes = [0x31, 0x80, 0x01, 0x01, 0xff, 0x00, 0x00];
//! let tlv = Tlv::parse(&bytes).unwrap();
//! assert_eq!(Length::Indefinite, tlv.length());
//! assert_eq!(1, tlv.tlvs().unwrap().len());
//! ```

#![forbid(unsafe_code)]

pub mod cursor;
pub mod error;
pub mod length;
pub mod sink;
pub mod tag;
pub mod tlv;

pub use cursor::Cursor;
pub use length::{INDEFINITE_LENGTH, Length, encode_length, length_octets, parse_length};
pub use sink::{IoSink, Sink};
pub use tag::{Class, TAG_CONSTRUCTED, Tag, encode_tag, parse_tag, tag_length};
pub use tlv::{DEFAULT_MAX_DEPTH, END_OF_CONTENTS, Limits, Tlv, Value};
