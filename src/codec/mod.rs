//! Payload codec seam.
//!
//! # Contract
//! A codec is a pair of pure functions satisfying
//! `decompress(compress(x)) == x` for every byte sequence `x`, with
//! `decompress` failing on malformed input. Codecs hold configuration only;
//! no state survives between calls, so one codec value can be shared freely
//! across threads.
//!
//! # On-disk codec
//! The format has no codec tag. Every payload is a raw deflate stream (RFC
//! 1951, no zlib or gzip envelope), so [`DeflateCodec`] is the only codec
//! that produces interoperable archives. The trait exists so the record
//! framing never names a concrete compressor.

use std::io::{self, Write};

use flate2::write::DeflateEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};
use thiserror::Error;

use crate::options::PackOptions;

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Compression error: {0}")]
    Compression(String),
    #[error("Decompression error: {0}")]
    Decompression(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

// ── Codec trait ──────────────────────────────────────────────────────────────

pub trait Codec: Send + Sync {
    /// Human-readable name (diagnostics only).
    fn name(&self) -> &'static str;
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError>;
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError>;
}

impl<C: Codec + ?Sized> Codec for &C {
    fn name(&self) -> &'static str { (**self).name() }
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> { (**self).compress(data) }
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> { (**self).decompress(data) }
}

impl<C: Codec + ?Sized> Codec for Box<C> {
    fn name(&self) -> &'static str { (**self).name() }
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> { (**self).compress(data) }
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> { (**self).decompress(data) }
}

// ── Raw deflate ──────────────────────────────────────────────────────────────

/// Raw deflate, backed by `flate2`.
///
/// Decompression is strict: the input must hold exactly one complete deflate
/// stream. A stream that stops before its final block, or trailing bytes after
/// it, is an error rather than a short or padded result.
#[derive(Debug, Clone, Copy)]
pub struct DeflateCodec {
    level: Compression,
}

impl DeflateCodec {
    pub fn new() -> Self {
        Self::from_options(&PackOptions::default())
    }

    pub fn from_options(opts: &PackOptions) -> Self {
        Self { level: Compression::new(opts.level()) }
    }

    pub fn level(&self) -> u32 {
        self.level.level()
    }
}

impl Default for DeflateCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Codec for DeflateCodec {
    fn name(&self) -> &'static str { "deflate" }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut encoder = DeflateEncoder::new(Vec::with_capacity(data.len() / 2 + 16), self.level);
        encoder
            .write_all(data)
            .map_err(|e| CodecError::Compression(e.to_string()))?;
        encoder
            .finish()
            .map_err(|e| CodecError::Compression(e.to_string()))
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut inflater = Decompress::new(false);
        let mut out = Vec::with_capacity(data.len().saturating_mul(3).max(64));

        loop {
            if out.len() == out.capacity() {
                out.reserve(out.capacity().max(64));
            }
            let consumed = stream_pos(inflater.total_in())?;
            let (before_in, before_out) = (inflater.total_in(), inflater.total_out());

            let status = inflater
                .decompress_vec(data.get(consumed..).unwrap_or_default(), &mut out, FlushDecompress::None)
                .map_err(|e| CodecError::Decompression(e.to_string()))?;

            match status {
                Status::StreamEnd => break,
                Status::Ok | Status::BufError => {
                    // Output had room, so no progress means the input ran out.
                    if inflater.total_in() == before_in && inflater.total_out() == before_out {
                        return Err(CodecError::Decompression(
                            "unexpected end of deflate stream".to_string(),
                        ));
                    }
                }
            }
        }

        let consumed = stream_pos(inflater.total_in())?;
        if consumed != data.len() {
            return Err(CodecError::Decompression(format!(
                "{} trailing byte(s) after end of deflate stream",
                data.len() - consumed
            )));
        }
        Ok(out)
    }
}

fn stream_pos(total_in: u64) -> Result<usize, CodecError> {
    usize::try_from(total_in)
        .map_err(|_| CodecError::Decompression("deflate stream position overflow".to_string()))
}
