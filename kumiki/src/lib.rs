//! # kumiki
//!
//! Core traits for encoding and decoding in the kumiki BER/DER codec.
//!
//! This crate defines the `Decoder` and `Encoder` traits that every layer of
//! the codec implements. The layers are:
//!
//! ```text
//! &[u8] → Tlv → Element
//! ```
//!
//! `ber` turns bytes into a raw TLV tree (tags, lengths, nested values),
//! and `asn1` turns that tree into typed values. Encoding goes back from
//! typed values straight to bytes, in either the canonical DER form or the
//! streaming BER form.
//!
//! ## Type Safety
//!
//! The marker traits `DecodableFrom` and `EncodableTo` whitelist each
//! conversion, so only the supported pairs compile.
//!
//! ## Example
//!
//! ```ignore
//! use kumiki::decoder::Decoder;
//! use kumiki::encoder::Encoder;
//! use asn1::Element;
//!
//! let bytes = vec![0x30, 0x03, 0x01, 0x01, 0xff];
//! let element: Element = bytes.as_slice().decode().unwrap();
//! let der: Vec<u8> = element.encode().unwrap();
//! assert_eq!(bytes, der);
//! ```

#![forbid(unsafe_code)]

pub mod decoder;
pub mod encoder;
