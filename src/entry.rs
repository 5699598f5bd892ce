//! Values passed into and out of the archive functions.
//!
//! [`Entry`] is what callers hand to the writer, [`File`] is what the reader
//! hands back. A record itself is never materialised; it only exists as a
//! byte range in the archive buffer.

use std::borrow::Cow;
use std::str::Utf8Error;

// ── Content ───────────────────────────────────────────────────────────────────

/// Uncompressed payload of an [`Entry`], supplied either as raw bytes or as
/// text. Text is stored as its UTF-8 encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content<'a> {
    Bytes(Cow<'a, [u8]>),
    Text(Cow<'a, str>),
}

impl<'a> Content<'a> {
    /// The bytes that get compressed.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Content::Bytes(b) => &**b,
            Content::Text(s)  => s.as_bytes(),
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'a> From<&'a [u8]> for Content<'a> {
    fn from(b: &'a [u8]) -> Self { Content::Bytes(Cow::Borrowed(b)) }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Content<'a> {
    fn from(b: &'a [u8; N]) -> Self { Content::Bytes(Cow::Borrowed(b.as_slice())) }
}

impl<'a> From<Vec<u8>> for Content<'a> {
    fn from(b: Vec<u8>) -> Self { Content::Bytes(Cow::Owned(b)) }
}

impl<'a> From<&'a str> for Content<'a> {
    fn from(s: &'a str) -> Self { Content::Text(Cow::Borrowed(s)) }
}

impl<'a> From<String> for Content<'a> {
    fn from(s: String) -> Self { Content::Text(Cow::Owned(s)) }
}

// ── Entry ─────────────────────────────────────────────────────────────────────

/// A named payload to be archived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<'a> {
    pub name:    Cow<'a, str>,
    pub content: Content<'a>,
}

impl<'a> Entry<'a> {
    pub fn new(name: impl Into<Cow<'a, str>>, content: impl Into<Content<'a>>) -> Self {
        Self { name: name.into(), content: content.into() }
    }
}

// ── File ──────────────────────────────────────────────────────────────────────

/// A named payload recovered from an archive. `content` is always the
/// decompressed bytes, whichever form the original entry used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub name:    String,
    pub content: Vec<u8>,
}

impl File {
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self { name: name.into(), content }
    }

    /// Content decoded as UTF-8, for entries that were archived as text.
    pub fn text(&self) -> Result<&str, Utf8Error> {
        std::str::from_utf8(&self.content)
    }
}

impl<'a> PartialEq<Entry<'a>> for File {
    fn eq(&self, other: &Entry<'a>) -> bool {
        self.name == other.name && self.content == other.content.as_bytes()
    }
}

// ── RecordInfo ────────────────────────────────────────────────────────────────

/// Header-level description of one record, returned by [`crate::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordInfo {
    pub index:           usize,
    pub name:            String,
    /// Offset of the record's `name_length` field.
    pub offset:          usize,
    pub compressed_size: usize,
}

impl RecordInfo {
    /// Total encoded size of the record, header fields included.
    pub fn encoded_len(&self) -> usize {
        crate::encoding::NAME_LEN_WIDTH
            + self.name.len()
            + crate::encoding::PAYLOAD_LEN_WIDTH
            + self.compressed_size
    }
}
