//! Reader and writer for Supreme Commander `.scmap` files, version 2.56.
//!
//! [`Map::load`] parses a whole file held in memory, [`Map::save`] produces the
//! bytes again and [`Map::create`] builds a blank map from [`MapArgs`].

pub mod args;
pub mod error;
pub mod map;
pub mod sections;
pub mod stream;

pub use args::MapArgs;
pub use error::MapError;
pub use map::Map;
pub use stream::{ByteReader, ByteWriter};
