//! Encoder trait, the reverse direction of [`crate::decoder::Decoder`].
//!
//! ```ignore
//! use kumiki::encoder::Encoder;
//! use asn1::Element;
//!
//! let der: Vec<u8> = Element::Boolean(true).encode().unwrap();
//! assert_eq!(der, vec![0x01, 0x01, 0xff]);
//! ```

/// Converts `self` (of type `T`) into `E`.
pub trait Encoder<T, E: EncodableTo<T>> {
    /// The error type returned when encoding fails.
    type Error;

    /// Encodes `self` into type `E`.
    fn encode(&self) -> Result<E, Self::Error>;
}

/// Marker trait indicating that `Self` can be produced by encoding a `T`.
pub trait EncodableTo<T> {}
