//! Sequential record reader.
//!
//! # Scan
//! The buffer is consumed from offset 0, one record at a time, until the
//! cursor lands exactly on the end of the buffer. There is no index, so this
//! is the only way to enumerate entries.
//!
//! # Bounds
//! Every field read first checks that the bytes it needs are present. A short
//! buffer is reported as [`ArchiveError::Truncated`] naming the field and the
//! offset where it starts; it is never clamped into a shorter field. This also
//! covers stray trailing bytes, which read as an incomplete next record.
//!
//! # Failure
//! Fail-fast: the first error ends the scan. [`RecordReader`] yields that
//! error once and then stops; [`parse`] returns it instead of any files.

use std::iter::FusedIterator;

use tracing::{debug, trace};

use crate::codec::{Codec, DeflateCodec};
use crate::encoding::{decode_text, decode_u16_le, decode_u32_le, NAME_LEN_WIDTH, PAYLOAD_LEN_WIDTH};
use crate::entry::{File, RecordInfo};
use crate::error::{ArchiveError, Field, Result};

/// One record located in the buffer but not yet decompressed.
#[derive(Debug, Clone, Copy)]
struct RawRecord<'a> {
    index:          usize,
    offset:         usize,
    name:           &'a str,
    payload_offset: usize,
    payload:        &'a [u8],
}

/// Iterator over the records of an archive buffer, in on-disk order.
///
/// ```
/// use primitive_archiver::{archive, Entry, RecordReader};
///
/// let bytes = archive(&[Entry::new("a.txt", "alpha"), Entry::new("b.bin", &[1u8, 2, 3])])?;
/// let mut reader = RecordReader::new(&bytes);
/// let first = reader.next().unwrap()?;
/// assert_eq!(first.name, "a.txt");
/// assert!(!reader.is_finished());
/// # Ok::<(), primitive_archiver::ArchiveError>(())
/// ```
#[derive(Debug)]
pub struct RecordReader<'a, C: Codec = DeflateCodec> {
    buf:    &'a [u8],
    cursor: usize,
    index:  usize,
    codec:  C,
    failed: bool,
}

impl<'a> RecordReader<'a, DeflateCodec> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self::with_codec(buf, DeflateCodec::new())
    }
}

impl<'a, C: Codec> RecordReader<'a, C> {
    pub fn with_codec(buf: &'a [u8], codec: C) -> Self {
        Self { buf, cursor: 0, index: 0, codec, failed: false }
    }

    /// Offset of the next record to be read.
    pub fn offset(&self) -> usize {
        self.cursor
    }

    /// Number of record headers read so far.
    pub fn records_read(&self) -> usize {
        self.index
    }

    /// True once the buffer is exhausted or an error has been returned.
    pub fn is_finished(&self) -> bool {
        self.failed || self.cursor == self.buf.len()
    }

    // ── Field reads ──────────────────────────────────────────────────────────

    fn take(&mut self, len: usize, field: Field) -> Result<&'a [u8]> {
        let buf = self.buf;
        let start = self.cursor;
        let available = buf.len() - start;
        let bytes = start
            .checked_add(len)
            .and_then(|end| buf.get(start..end))
            .ok_or(ArchiveError::Truncated {
                field,
                offset: start,
                needed: len,
                available,
            })?;
        self.cursor += len;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self, field: Field) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, field)?);
        Ok(out)
    }

    /// Read the four fields of the next record and advance past it.
    fn next_raw(&mut self) -> Result<RawRecord<'a>> {
        let index = self.index;
        let offset = self.cursor;

        let name_len = decode_u16_le(self.take_array::<NAME_LEN_WIDTH>(Field::NameLength)?) as usize;
        let name_offset = self.cursor;
        let name = decode_text(self.take(name_len, Field::NameBytes)?)
            .map_err(|source| ArchiveError::Encoding { index, offset: name_offset, source })?;

        let payload_len = decode_u32_le(self.take_array::<PAYLOAD_LEN_WIDTH>(Field::PayloadLength)?) as usize;
        let payload_offset = self.cursor;
        let payload = self.take(payload_len, Field::PayloadBytes)?;

        trace!(index, offset, name_len, payload_len, "read record header");
        self.index += 1;
        Ok(RawRecord { index, offset, name, payload_offset, payload })
    }

    fn decode(&self, raw: RawRecord<'a>) -> Result<File> {
        let content = self.codec.decompress(raw.payload).map_err(|source| ArchiveError::Decompression {
            index: raw.index,
            offset: raw.payload_offset,
            source,
        })?;
        Ok(File::new(raw.name, content))
    }

    fn fail(&mut self, err: ArchiveError) -> ArchiveError {
        debug!(error = %err, offset = ?err.offset(), records = self.index, "archive rejected");
        self.failed = true;
        err
    }
}

impl<'a, C: Codec> Iterator for RecordReader<'a, C> {
    type Item = Result<File>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_finished() {
            return None;
        }
        let file = self.next_raw().and_then(|raw| self.decode(raw));
        Some(file.map_err(|err| self.fail(err)))
    }
}

impl<'a, C: Codec> FusedIterator for RecordReader<'a, C> {}

// ── Entry points ──────────────────────────────────────────────────────────────

/// Decode every record in `bytes` with raw deflate. An empty buffer yields no
/// files.
pub fn parse(bytes: &[u8]) -> Result<Vec<File>> {
    parse_with(bytes, DeflateCodec::new())
}

/// [`parse`] with a caller-chosen codec.
pub fn parse_with<C: Codec>(bytes: &[u8], codec: C) -> Result<Vec<File>> {
    let files = RecordReader::with_codec(bytes, codec).collect::<Result<Vec<_>>>()?;
    debug!(records = files.len(), bytes = bytes.len(), "archive parsed");
    Ok(files)
}

/// Describe every record without decompressing any payload. Framing and name
/// checks are the same as [`parse`]; payload contents are not validated.
pub fn list(bytes: &[u8]) -> Result<Vec<RecordInfo>> {
    let mut reader = RecordReader::new(bytes);
    let mut infos = Vec::new();
    while !reader.is_finished() {
        let raw = reader.next_raw().map_err(|err| reader.fail(err))?;
        infos.push(RecordInfo {
            index:           raw.index,
            name:            raw.name.to_owned(),
            offset:          raw.offset,
            compressed_size: raw.payload.len(),
        });
    }
    Ok(infos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Entry;
    use crate::writer::archive;

    fn sample() -> Vec<u8> {
        archive(&[
            Entry::new("file.txt", "Nothing makes sense anymore."),
            Entry::new("some bytes", &[1u8, 2, 3, 4, 5]),
        ])
        .unwrap()
    }

    #[test]
    fn empty_buffer_has_no_records() {
        assert!(parse(&[]).unwrap().is_empty());
        assert!(list(&[]).unwrap().is_empty());
        assert!(RecordReader::new(&[]).next().is_none());
    }

    #[test]
    fn reads_records_in_order() {
        let files = parse(&sample()).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].name, "file.txt");
        assert_eq!(files[0].text().unwrap(), "Nothing makes sense anymore.");
        assert_eq!(files[1].name, "some bytes");
        assert_eq!(files[1].content, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn single_trailing_byte_is_truncated_name_length() {
        let mut bytes = sample();
        let end = bytes.len();
        bytes.push(0);
        let err = parse(&bytes).unwrap_err();
        assert!(matches!(
            err,
            ArchiveError::Truncated { field: Field::NameLength, offset, needed: 2, available: 1 } if offset == end
        ));
    }

    #[test]
    fn short_name_is_truncated_name_bytes() {
        // name_length says 5, only 3 bytes follow.
        let bytes = [5, 0, b'a', b'b', b'c'];
        let err = parse(&bytes).unwrap_err();
        assert!(matches!(
            err,
            ArchiveError::Truncated { field: Field::NameBytes, offset: 2, needed: 5, available: 3 }
        ));
    }

    #[test]
    fn missing_payload_length_is_truncated() {
        let bytes = [1, 0, b'a', 9, 0];
        let err = parse(&bytes).unwrap_err();
        assert!(matches!(
            err,
            ArchiveError::Truncated { field: Field::PayloadLength, offset: 3, needed: 4, available: 2 }
        ));
    }

    #[test]
    fn short_payload_is_truncated_payload_bytes() {
        let mut bytes = sample();
        bytes.pop();
        let err = parse(&bytes).unwrap_err();
        assert!(matches!(err, ArchiveError::Truncated { field: Field::PayloadBytes, .. }));
    }

    #[test]
    fn huge_declared_payload_is_truncated_not_clamped() {
        let bytes = [1, 0, b'a', 0xFF, 0xFF, 0xFF, 0xFF, 0x03, 0x00];
        let err = parse(&bytes).unwrap_err();
        assert!(matches!(
            err,
            ArchiveError::Truncated { field: Field::PayloadBytes, offset: 7, available: 2, .. }
        ));
    }

    #[test]
    fn invalid_name_is_encoding_error() {
        let payload = DeflateCodec::new().compress(b"x").unwrap();
        let mut bytes = vec![2, 0, 0xC3, 0x28];
        bytes.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&payload);
        let err = parse(&bytes).unwrap_err();
        assert!(matches!(err, ArchiveError::Encoding { index: 0, offset: 2, .. }));
    }

    #[test]
    fn corrupt_payload_carries_index_and_offset() {
        let mut bytes = sample();
        let second = list(&bytes).unwrap()[1].offset;
        let payload_offset = second + 2 + "some bytes".len() + 4;
        bytes[payload_offset] = 0xFF;
        let err = parse(&bytes).unwrap_err();
        assert!(matches!(err, ArchiveError::Decompression { index: 1, offset, .. } if offset == payload_offset));
    }

    #[test]
    fn reader_is_fused_after_error() {
        let mut bytes = sample();
        bytes.truncate(bytes.len() - 1);
        let mut reader = RecordReader::new(&bytes);
        assert!(reader.next().unwrap().is_ok());
        assert!(reader.next().unwrap().is_err());
        assert!(reader.is_finished());
        assert!(reader.next().is_none());
        assert_eq!(reader.records_read(), 1);
    }

    #[test]
    fn reader_tracks_offset() {
        let bytes = sample();
        let infos = list(&bytes).unwrap();
        let mut reader = RecordReader::new(&bytes);
        assert_eq!(reader.offset(), 0);
        reader.next().unwrap().unwrap();
        assert_eq!(reader.offset(), infos[1].offset);
        reader.next().unwrap().unwrap();
        assert_eq!(reader.offset(), bytes.len());
        assert!(reader.is_finished());
    }

    #[test]
    fn list_skips_payloads() {
        let mut bytes = sample();
        let infos = list(&bytes).unwrap();
        assert_eq!(infos.len(), 2);
        assert_eq!(infos[0].offset, 0);
        assert_eq!(infos[0].name, "file.txt");
        assert_eq!(infos[0].encoded_len(), infos[1].offset);
        assert_eq!(infos[1].offset + infos[1].encoded_len(), bytes.len());

        // Payload damage is invisible to a header scan.
        let last = bytes.len() - 1;
        bytes[infos[1].offset + 2 + 10 + 4] = 0xFF;
        assert_eq!(list(&bytes).unwrap(), infos);
        bytes.truncate(last);
        assert!(list(&bytes).is_err());
    }
}
