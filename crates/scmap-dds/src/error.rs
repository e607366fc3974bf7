use scmap_core::{BitfieldError, CheckError};

/// Errors that can occur while decoding or encoding a DDS image.
#[derive(Debug, thiserror::Error)]
pub enum DdsError {
    #[error("invalid DDS magic {0:?} (expected \"DDS \")")]
    InvalidMagic([u8; 4]),

    #[error("DDS buffer too small ({0} bytes, minimum {1})")]
    TooSmall(usize, usize),

    #[error("DDS header check failed: {0}")]
    Check(#[from] CheckError),

    #[error("DDS bitfield error: {0}")]
    Bitfield(#[from] BitfieldError),

    #[error("unsupported DDS pixel format (ddspf.flags {0:#010x})")]
    UnsupportedFormat(u32),

    #[error("pixel buffer length mismatch: expected {expected} bytes, got {actual}")]
    BufferLength { expected: usize, actual: usize },

    #[error("{width}x{height} surface does not fit in memory")]
    SurfaceTooLarge { width: u32, height: u32 },

    #[error("truncated pixel payload: expected {expected} bytes, got {actual}")]
    TruncatedPayload { expected: usize, actual: usize },
}
