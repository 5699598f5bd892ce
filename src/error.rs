use std::fmt;
use std::str::Utf8Error;

use thiserror::Error;

use crate::codec::CodecError;

/// One of the four wire fields of a record, in on-disk order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    NameLength,
    NameBytes,
    PayloadLength,
    PayloadBytes,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::NameLength    => "name_length",
            Field::NameBytes     => "name_bytes",
            Field::PayloadLength => "payload_length",
            Field::PayloadBytes  => "payload_bytes",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every way `archive` or `parse` can fail. Errors are fail-fast: the first
/// violation aborts the call and no partial output is returned.
///
/// `index` is the zero-based entry/record position; `offset` is a byte offset
/// into the archive buffer.
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("entry {index}: encoded name is {length} bytes, limit is 65535")]
    NameTooLong { index: usize, length: usize },

    #[error("entry {index}: compressed payload is {length} bytes, limit is 4294967295")]
    PayloadTooLarge { index: usize, length: usize },

    #[error("entry {index}: compression failed")]
    Compression {
        index: usize,
        #[source]
        source: CodecError,
    },

    #[error("record {index} at offset {offset}: name is not valid UTF-8")]
    Encoding {
        index: usize,
        offset: usize,
        #[source]
        source: Utf8Error,
    },

    #[error("truncated input: {field} at offset {offset} needs {needed} byte(s), {available} available")]
    Truncated {
        field: Field,
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("record {index}: payload at offset {offset} does not decompress")]
    Decompression {
        index: usize,
        offset: usize,
        #[source]
        source: CodecError,
    },
}

impl ArchiveError {
    /// Byte offset into the archive buffer, for reader-side errors.
    pub fn offset(&self) -> Option<usize> {
        match self {
            ArchiveError::Encoding { offset, .. }
            | ArchiveError::Truncated { offset, .. }
            | ArchiveError::Decompression { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ArchiveError>;
