//! Record writer.
//!
//! Each entry becomes one self-contained record:
//!
//! ```text
//! name_length:u16le | name:u8[name_length] | payload_length:u32le | payload:u8[payload_length]
//! ```
//!
//! Records are concatenated in input order with no separator, header or
//! index. Every payload is compressed on its own; nothing is shared between
//! entries.

use tracing::{debug, trace};

use crate::codec::{Codec, DeflateCodec};
use crate::encoding::{concat, encode_text, encode_u16_le, encode_u32_le};
use crate::entry::{Content, Entry};
use crate::error::{ArchiveError, Result};
use crate::options::PackOptions;

/// Encode one entry as a record. `index` is only used for error reporting.
pub fn encode_record<C: Codec + ?Sized>(index: usize, entry: &Entry<'_>, codec: &C) -> Result<Vec<u8>> {
    let name = encode_text(&entry.name);
    let name_len = u16::try_from(name.len())
        .map_err(|_| ArchiveError::NameTooLong { index, length: name.len() })?;

    let payload = codec
        .compress(entry.content.as_bytes())
        .map_err(|source| ArchiveError::Compression { index, source })?;
    let payload_len = u32::try_from(payload.len())
        .map_err(|_| ArchiveError::PayloadTooLarge { index, length: payload.len() })?;

    trace!(index, name_len, payload_len, raw_len = entry.content.len(), "encoded record");

    Ok(concat(&[
        &encode_u16_le(name_len)[..],
        name,
        &encode_u32_le(payload_len)[..],
        &payload[..],
    ]))
}

/// Serialise `entries` into one archive buffer using raw deflate at the
/// default level. An empty slice yields an empty buffer.
pub fn archive(entries: &[Entry<'_>]) -> Result<Vec<u8>> {
    archive_with(entries, &DeflateCodec::new())
}

/// [`archive`] with a caller-chosen codec.
pub fn archive_with<C: Codec + ?Sized>(entries: &[Entry<'_>], codec: &C) -> Result<Vec<u8>> {
    let records = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| encode_record(index, entry, codec))
        .collect::<Result<Vec<_>>>()?;

    let out = concat(&records);
    debug!(entries = entries.len(), bytes = out.len(), codec = codec.name(), "archive written");
    Ok(out)
}

// ── Archiver ──────────────────────────────────────────────────────────────────

/// Staging builder: collect entries with [`put`](Archiver::put), then encode
/// them all with [`finish`](Archiver::finish).
///
/// ```
/// use primitive_archiver::{parse, Archiver};
///
/// let mut ar = Archiver::new();
/// ar.put("file.txt", "Nothing makes sense anymore.")
///   .put("some bytes", vec![1u8, 2, 3, 4, 5]);
/// let bytes = ar.finish()?;
///
/// let files = parse(&bytes)?;
/// assert_eq!(files[1].content, [1, 2, 3, 4, 5]);
/// # Ok::<(), primitive_archiver::ArchiveError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Archiver<'a, C: Codec = DeflateCodec> {
    codec:   C,
    entries: Vec<Entry<'a>>,
}

impl<'a> Archiver<'a, DeflateCodec> {
    pub fn new() -> Self {
        Self::with_codec(DeflateCodec::new())
    }

    pub fn with_options(opts: &PackOptions) -> Self {
        Self::with_codec(DeflateCodec::from_options(opts))
    }
}

impl<'a> Default for Archiver<'a, DeflateCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, C: Codec> Archiver<'a, C> {
    pub fn with_codec(codec: C) -> Self {
        Self { codec, entries: Vec::new() }
    }

    /// Stage an entry. Validation happens in [`finish`](Archiver::finish).
    pub fn put(&mut self, name: impl Into<std::borrow::Cow<'a, str>>, content: impl Into<Content<'a>>) -> &mut Self {
        self.entries.push(Entry::new(name, content));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry<'a>] {
        &self.entries
    }

    /// Encode every staged entry, in staging order. The first entry that
    /// cannot be encoded aborts the whole archive.
    pub fn finish(&self) -> Result<Vec<u8>> {
        archive_with(&self.entries, &self.codec)
    }
}
