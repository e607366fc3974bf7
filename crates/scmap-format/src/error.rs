use scmap_core::CheckError;
use scmap_dds::DdsError;

/// Errors that can occur while loading, saving or creating a map.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("invalid map magic {0:#010x} (expected 0x1a70614d)")]
    InvalidMagic(u32),

    #[error("unsupported map version {major}.{minor}")]
    UnsupportedVersion { major: u32, minor: u32 },

    #[error("unexpected end of data: {needed} bytes needed at offset {offset}, {available} available")]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("{field}: length mismatch, expected {expected} bytes, got {actual}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{field}: invalid dimensions {width}x{height}, expected {expected_width}x{expected_height}")]
    InvalidDimensions {
        field: &'static str,
        width: u32,
        height: u32,
        expected_width: u32,
        expected_height: u32,
    },

    #[error("string at offset {0} is not valid UTF-8")]
    InvalidString(usize),

    #[error("{0} bytes of trailing data after the last section")]
    TrailingData(usize),

    #[error(transparent)]
    Check(#[from] CheckError),

    #[error(transparent)]
    Dds(#[from] DdsError),

    #[error("{section} section (starting at byte {start}) failed at byte {offset}: {source}")]
    Section {
        section: &'static str,
        start: usize,
        offset: usize,
        #[source]
        source: Box<MapError>,
    },

    #[error("invalid map args: {0}")]
    Args(String),
}
