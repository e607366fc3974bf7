use thiserror::Error;

/// A named field failed one of the sanity checks in [`crate::checks`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{name}: {message}")]
pub struct CheckError {
    pub name: String,
    pub message: String,
}

impl CheckError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Errors raised by the [`crate::bitfield::Bitfield`] cursor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitfieldError {
    #[error("bit access out of bounds: {bits} bits at offset {offset} exceeds capacity {capacity}")]
    OutOfBounds {
        offset: usize,
        bits: u32,
        capacity: usize,
    },

    #[error("invalid bit width {0} (must be 0..=32)")]
    InvalidWidth(u32),

    #[error("seek to bit {offset} past capacity {capacity}")]
    SeekOutOfBounds { offset: usize, capacity: usize },
}
