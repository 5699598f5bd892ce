//! Minimal container format: a flat run of named, independently
//! raw-deflate-compressed payloads.
//!
//! ```
//! use primitive_archiver::{archive, parse, Entry};
//!
//! let bytes = archive(&[
//!     Entry::new("readme.txt", "Hello, world!"),
//!     Entry::new("blob.bin", vec![0u8, 1, 2, 3]),
//! ])?;
//!
//! let files = parse(&bytes)?;
//! assert_eq!(files[0].name, "readme.txt");
//! assert_eq!(files[0].content, b"Hello, world!");
//! # Ok::<(), primitive_archiver::ArchiveError>(())
//! ```
//!
//! # Wire format
//! ```text
//! archive := record*
//! record  := name_length:u16le name:u8[name_length] payload_length:u32le payload:u8[payload_length]
//! ```
//! No magic, no version, no index, no checksum. The buffer ends exactly where
//! its last record ends.

pub mod codec;
pub mod encoding;
pub mod entry;
pub mod error;
pub mod options;
pub mod reader;
pub mod writer;

pub use codec::{Codec, CodecError, DeflateCodec};
pub use entry::{Content, Entry, File, RecordInfo};
pub use error::{ArchiveError, Field, Result};
pub use options::PackOptions;
pub use reader::{list, parse, parse_with, RecordReader};
pub use writer::{archive, archive_with, Archiver};
