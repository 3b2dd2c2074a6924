use std::io::{self, Write};

use crate::length::{Length, encode_length};
use crate::tag::{Tag, encode_tag};
use crate::tlv::END_OF_CONTENTS;

/// Append-only byte sink the encoders write to.
///
/// There is no seek or rewrite, so indefinite-length values can be streamed
/// out as they are produced.
pub trait Sink {
    fn write_byte(&mut self, byte: u8);

    fn write_bytes(&mut self, bytes: &[u8]);

    fn write_tag(&mut self, tag: Tag) {
        self.write_bytes(&encode_tag(tag));
    }

    fn write_length(&mut self, length: Length) {
        self.write_bytes(&encode_length(length));
    }

    fn write_end_of_contents(&mut self) {
        self.write_bytes(&END_OF_CONTENTS);
    }
}

impl Sink for Vec<u8> {
    fn write_byte(&mut self, byte: u8) {
        self.push(byte);
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn write_byte(&mut self, byte: u8) {
        (**self).write_byte(byte);
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        (**self).write_bytes(bytes);
    }
}

/// Streams encoded bytes into any `io::Write`.
///
/// The first I/O error is kept and every later write is dropped; call
/// [`IoSink::finish`] to find out whether the output is complete.
#[derive(Debug)]
pub struct IoSink<W> {
    writer: W,
    written: usize,
    error: Option<io::Error>,
}

impl<W: Write> IoSink<W> {
    pub fn new(writer: W) -> Self {
        IoSink {
            writer,
            written: 0,
            error: None,
        }
    }

    /// Bytes successfully handed to the writer.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> Sink for IoSink<W> {
    fn write_byte(&mut self, byte: u8) {
        self.write_bytes(&[byte]);
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        if self.error.is_some() {
            return;
        }
        match self.writer.write_all(bytes) {
            Ok(()) => self.written += bytes.len(),
            Err(err) => self.error = Some(err),
        }
    }
}
