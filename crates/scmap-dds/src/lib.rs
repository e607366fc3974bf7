pub mod argb;
pub mod container;
pub mod dxt5;
pub mod error;
pub mod format;
pub mod header;
pub mod image;
pub mod rgb;

pub use container::{encoded_len, DdsImage};
pub use error::DdsError;
pub use format::PixelFormat;
pub use header::DdsHeader;
pub use image::{Argb, Image};
