/// Deflate level used by [`PackOptions::default`].
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;
/// Highest deflate level; larger values are clamped.
pub const MAX_COMPRESSION_LEVEL: u32 = 9;

/// Writer-side configuration.
///
/// Nothing here is recorded in the archive, so a reader never needs to know
/// which options produced a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackOptions {
    level: u32,
}

impl PackOptions {
    pub fn with_level(level: u32) -> Self {
        Self { level: level.min(MAX_COMPRESSION_LEVEL) }
    }

    pub fn fastest() -> Self {
        Self::with_level(1)
    }

    pub fn best() -> Self {
        Self::with_level(MAX_COMPRESSION_LEVEL)
    }

    pub fn level(&self) -> u32 {
        self.level
    }
}

impl Default for PackOptions {
    fn default() -> Self {
        Self { level: DEFAULT_COMPRESSION_LEVEL }
    }
}
