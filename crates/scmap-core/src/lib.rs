pub mod bitfield;
pub mod checks;
pub mod constants;
pub mod error;
pub mod types;

pub use bitfield::Bitfield;
pub use error::{BitfieldError, CheckError};
pub use types::{DirtyRegion, SizeClass};
