use crate::error::Error;
use crate::length::{Length, parse_length};
use crate::tag::{ParseResult, Tag, parse_tag};

/// Forward-only reader over a caller-owned byte slice.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Cursor { data, position: 0 }
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The unread part of the input.
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.position..]
    }

    pub fn peek_byte(&self) -> Option<u8> {
        self.rest().first().copied()
    }

    /// The next `n` bytes without consuming them, if that many remain.
    pub fn peek_bytes(&self, n: usize) -> Option<&'a [u8]> {
        self.rest().get(..n)
    }

    pub fn read_byte(&mut self) -> Result<u8, Error> {
        let byte = self.peek_byte().ok_or(Error::EndOfInput)?;
        self.position += 1;
        Ok(byte)
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], Error> {
        let bytes = self.peek_bytes(n).ok_or(Error::TruncatedInput {
            needed: n,
            remaining: self.remaining(),
        })?;
        self.position += n;
        Ok(bytes)
    }

    pub fn read_tag(&mut self) -> Result<Tag, Error> {
        self.apply(parse_tag)
    }

    pub fn read_length(&mut self) -> Result<Length, Error> {
        self.apply(parse_length)
    }

    /// Runs a parser on the unread input and advances past what it consumed.
    pub fn apply<T>(
        &mut self,
        parser: impl FnOnce(&'a [u8]) -> ParseResult<'a, T>,
    ) -> Result<T, Error> {
        let input = self.rest();
        let (rest, value) = parser(input)?;
        self.position += input.len() - rest.len();
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_reads() {
        let data = [0x30, 0x03, 0x02, 0x01, 0x05];
        let mut cursor = Cursor::new(&data);

        assert_eq!(Some(0x30), cursor.peek_byte());
        assert_eq!(0, cursor.position());
        assert_eq!(Tag::universal(Tag::SEQUENCE).with_constructed(true), cursor.read_tag().unwrap());
        assert_eq!(Length::Definite(3), cursor.read_length().unwrap());
        assert_eq!(2, cursor.position());
        assert_eq!(0x02, cursor.read_byte().unwrap());
        assert_eq!(&[0x01, 0x05], cursor.read_bytes(2).unwrap());
        assert!(cursor.is_empty());
        assert_eq!(None, cursor.peek_byte());
        assert_eq!(Err(Error::EndOfInput), cursor.read_byte());
    }

    #[test]
    fn test_cursor_read_bytes_truncated() {
        let data = [0x01, 0x02];
        let mut cursor = Cursor::new(&data);

        let err = cursor.read_bytes(3).unwrap_err();
        assert_eq!(
            Error::TruncatedInput {
                needed: 3,
                remaining: 2
            },
            err
        );
        // a failed read consumes nothing
        assert_eq!(0, cursor.position());
    }

    #[test]
    fn test_cursor_failed_parse_keeps_position() {
        let data = [0x02, 0xff];
        let mut cursor = Cursor::new(&data);

        cursor.read_tag().unwrap();
        assert!(matches!(cursor.read_length(), Err(Error::MalformedEncoding(_))));
        assert_eq!(1, cursor.position());
    }
}
