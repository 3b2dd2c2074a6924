//! Decoder trait for type-safe conversions.
//!
//! The `Decoder` trait turns a source representation `T` into a richer
//! destination `D`. The codec chains these conversions layer by layer:
//! raw bytes become a TLV tree, and a TLV tree becomes typed ASN.1 values.
//!
//! The pattern is split across two traits:
//!
//! 1. `Decoder<T, D>` - performs the conversion
//! 2. `DecodableFrom<T>` - marker that whitelists the destination type
//!
//! Only pairs that were explicitly marked can be converted, so a mistaken
//! conversion is a compile error rather than a runtime surprise.
//!
//! ```no_run
//! use kumiki::decoder::{DecodableFrom, Decoder};
//!
//! struct Octets(Vec<u8>);
//! struct Hex(String);
//!
//! #[derive(Debug)]
//! struct NeverFails;
//!
//! impl DecodableFrom<Octets> for Hex {}
//!
//! impl Decoder<Octets, Hex> for Octets {
//!     type Error = NeverFails;
//!
//!     fn decode(&self) -> Result<Hex, Self::Error> {
//!         Ok(Hex(self.0.iter().map(|b| format!("{:02x}", b)).collect()))
//!     }
//! }
//! ```
//!
//! The `ber` crate implements the first step of the chain:
//!
//! ```ignore
//! use kumiki::decoder::Decoder;
//! use ber::Tlv;
//!
//! let bytes = vec![0x30, 0x80, 0x00, 0x00]; // indefinite-length SEQUENCE
//! let tlv: Tlv = bytes.decode().unwrap();
//! ```

/// Converts `self` (of type `T`) into `D`.
///
/// # Type Parameters
///
/// * `T` - The source type (usually `Self`)
/// * `D` - The destination type, which must be marked `DecodableFrom<T>`
pub trait Decoder<T, D: DecodableFrom<T>> {
    /// The error type returned when decoding fails.
    type Error;

    /// Decodes `self` into type `D`.
    ///
    /// # Errors
    ///
    /// Returns an error when the source is not a valid representation of
    /// `D`. Decoding never yields partial results.
    fn decode(&self) -> Result<D, Self::Error>;
}

/// Marker trait indicating that type `D` can be decoded from type `T`.
///
/// It has no methods; implement it next to the matching `Decoder`.
pub trait DecodableFrom<T> {}
