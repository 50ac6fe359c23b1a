//! Content payloads for whole-file reads and writes.

use bytes::Bytes;

use crate::{ContentFormat, Error};

/// Fully materialized file content in one of the four read formats.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// UTF-8 text.
    Text(String),
    /// Binary string: one char per byte.
    Binary(String),
    /// `data:` URL.
    DataUrl(String),
    /// Raw bytes.
    Buffer(Bytes),
}

impl Content {
    /// The format this content was materialized in.
    pub fn format(&self) -> ContentFormat {
        match self {
            Content::Text(_) => ContentFormat::Text,
            Content::Binary(_) => ContentFormat::Binary,
            Content::DataUrl(_) => ContentFormat::DataUrl,
            Content::Buffer(_) => ContentFormat::Buffer,
        }
    }

    /// The text payload, if this is `Text`.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The raw bytes, if this is `Buffer`.
    pub fn as_buffer(&self) -> Option<&Bytes> {
        match self {
            Content::Buffer(b) => Some(b),
            _ => None,
        }
    }
}

/// A write payload: raw bytes or text.
///
/// These are the two shapes `write` and `write_file` accept. Ranges are
/// measured in bytes for both; slicing a text payload off a char boundary
/// is an argument error, never a panic.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteBuffer {
    Bytes(Bytes),
    Text(String),
}

impl WriteBuffer {
    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        match self {
            WriteBuffer::Bytes(b) => b.len(),
            WriteBuffer::Text(s) => s.len(),
        }
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Up to `length` bytes starting at `offset`, clamped to the payload.
    ///
    /// Never slices past the payload's end: both the start and the count
    /// are clamped against `len()` before slicing.
    pub fn slice(&self, offset: usize, length: usize) -> Result<Bytes, Error> {
        let start = offset.min(self.len());
        let end = offset.saturating_add(length).min(self.len());
        match self {
            WriteBuffer::Bytes(b) => Ok(b.slice(start..end)),
            WriteBuffer::Text(s) => {
                if !s.is_char_boundary(start) || !s.is_char_boundary(end) {
                    return Err(Error::MissingArgument {
                        message: format!(
                            "byte range {}..{} splits a character in the text buffer",
                            start, end
                        ),
                    });
                }
                Ok(Bytes::copy_from_slice(&s.as_bytes()[start..end]))
            }
        }
    }

    /// The whole payload as bytes.
    pub fn into_bytes(self) -> Bytes {
        match self {
            WriteBuffer::Bytes(b) => b,
            WriteBuffer::Text(s) => Bytes::from(s),
        }
    }
}

impl From<Bytes> for WriteBuffer {
    fn from(b: Bytes) -> Self {
        WriteBuffer::Bytes(b)
    }
}

impl From<Vec<u8>> for WriteBuffer {
    fn from(v: Vec<u8>) -> Self {
        WriteBuffer::Bytes(Bytes::from(v))
    }
}

impl From<&[u8]> for WriteBuffer {
    fn from(v: &[u8]) -> Self {
        WriteBuffer::Bytes(Bytes::copy_from_slice(v))
    }
}

impl From<String> for WriteBuffer {
    fn from(s: String) -> Self {
        WriteBuffer::Text(s)
    }
}

impl From<&str> for WriteBuffer {
    fn from(s: &str) -> Self {
        WriteBuffer::Text(s.to_string())
    }
}
