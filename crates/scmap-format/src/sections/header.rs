use scmap_core::constants::{MAP_HEADER_MARKER, MAP_HEADER_MARKER_2, MAP_MAGIC, MAP_VERSION_MAJOR};
use scmap_core::{checks, SizeClass};

use crate::error::MapError;
use crate::stream::{ByteReader, ByteWriter};

/// File signature, major version and nominal map extent.
///
/// ```text
/// magic u32 | major u32 | 0xBEEFFEED u32 | 2 u32 | width f32 | height f32
/// reserved u32 | reserved u16
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub width: u32,
    pub height: u32,
    pub reserved_int: u32,
    pub reserved_short: u16,
}

impl Header {
    pub const ENCODED_LEN: usize = 30;

    pub fn create(size: SizeClass) -> Self {
        Self {
            width: size.dimension(),
            height: size.dimension(),
            reserved_int: 0,
            reserved_short: 0,
        }
    }

    pub fn encoded_len(&self) -> usize {
        Self::ENCODED_LEN
    }

    pub fn load(r: &mut ByteReader) -> Result<Self, MapError> {
        let magic = r.read_u32()?;
        if magic != MAP_MAGIC {
            return Err(MapError::InvalidMagic(magic));
        }
        let major = r.read_u32()?;
        if major != MAP_VERSION_MAJOR {
            return Err(MapError::UnsupportedVersion { major, minor: 0 });
        }
        checks::equal("header.marker", r.read_u32()?, MAP_HEADER_MARKER)?;
        checks::equal("header.marker2", r.read_u32()?, MAP_HEADER_MARKER_2)?;

        let width = read_extent(r, "header.width")?;
        let height = read_extent(r, "header.height")?;

        Ok(Self {
            width,
            height,
            reserved_int: r.read_u32()?,
            reserved_short: r.read_u16()?,
        })
    }

    pub fn save(&self) -> Vec<u8> {
        let mut w = ByteWriter::with_capacity(Self::ENCODED_LEN);
        w.write_u32(MAP_MAGIC);
        w.write_u32(MAP_VERSION_MAJOR);
        w.write_u32(MAP_HEADER_MARKER);
        w.write_u32(MAP_HEADER_MARKER_2);
        w.write_f32(self.width as f32);
        w.write_f32(self.height as f32);
        w.write_u32(self.reserved_int);
        w.write_u16(self.reserved_short);
        w.into_inner()
    }
}

/// Extents are stored as floats but must be one of the size-class dimensions.
fn read_extent(r: &mut ByteReader, field: &str) -> Result<u32, MapError> {
    let value = r.read_f32()?;
    checks::equal(field, value.fract(), 0.0)?;
    checks::between(field, value, 0.0, u32::MAX as f32)?;
    let dimension = value as u32;
    SizeClass::from_dimension(dimension)
        .map_err(|e| scmap_core::CheckError::new(field, e.message))?;
    Ok(dimension)
}
