//! The twelve sections of a map file, in on-disk order.
//!
//! Every section is a value type with a `load` factory that consumes exactly
//! its own bytes, a `save` that emits a self-contained buffer, and an
//! `encoded_len` the container checks after each decode.

pub mod decals;
pub mod header;
pub mod heightmap;
pub mod layers;
pub mod lighting;
pub mod normalmap;
pub mod preview;
pub mod props;
pub mod texturemap;
pub mod textures;
pub mod water;
pub mod watermap;

pub use decals::{Decal, DecalGroup, DecalType, Decals};
pub use header::Header;
pub use heightmap::Heightmap;
pub use layers::{Layer, Layers};
pub use lighting::Lighting;
pub use normalmap::Normalmap;
pub use preview::PreviewImage;
pub use props::{Prop, Props};
pub use texturemap::Texturemap;
pub use textures::{Cubemap, Textures};
pub use water::{WaveGenerator, WaveTexture, Water};
pub use watermap::Watermap;

use scmap_dds::{container, Image, PixelFormat};

use crate::error::MapError;
use crate::stream::{ByteReader, ByteWriter};

/// Read a u32 length prefix and the embedded DDS stream it covers.
///
/// The prefix must match the size a `format` image of `width × height`
/// encodes to, and the decoder must consume exactly that many bytes.
pub(crate) fn read_dds(
    r: &mut ByteReader,
    field: &'static str,
    format: PixelFormat,
    width: u32,
    height: u32,
) -> Result<Image, MapError> {
    let expected = container::encoded_len(format, width, height)?;
    let length = r.read_u32()? as usize;
    if length != expected {
        return Err(MapError::LengthMismatch {
            field,
            expected,
            actual: length,
        });
    }

    let dds = container::load(r.take(length)?)?;
    if dds.format != format {
        return Err(MapError::Check(scmap_core::CheckError::new(
            field,
            format!("expected {format} surface, got {}", dds.format),
        )));
    }
    if dds.image.width() != width || dds.image.height() != height {
        return Err(MapError::InvalidDimensions {
            field,
            width: dds.image.width(),
            height: dds.image.height(),
            expected_width: width,
            expected_height: height,
        });
    }
    if dds.consumed() != length {
        return Err(MapError::LengthMismatch {
            field,
            expected: length,
            actual: dds.consumed(),
        });
    }
    Ok(dds.image)
}

/// Write a u32 length prefix followed by `image` encoded as `format`.
pub(crate) fn write_dds(
    w: &mut ByteWriter,
    image: &Image,
    format: PixelFormat,
) -> Result<(), MapError> {
    let bytes = container::save(image, format)?;
    w.write_u32(bytes.len() as u32);
    w.write_bytes(&bytes);
    Ok(())
}

/// Read `N` consecutive records.
pub(crate) fn read_array<T: Default, const N: usize>(
    r: &mut ByteReader,
    mut read: impl FnMut(&mut ByteReader) -> Result<T, MapError>,
) -> Result<[T; N], MapError> {
    let mut out: [T; N] = std::array::from_fn(|_| T::default());
    for slot in &mut out {
        *slot = read(r)?;
    }
    Ok(out)
}

/// Encoded size of a length-prefixed DDS image. Saturates for surfaces too
/// large to encode, which `save` then rejects.
pub(crate) fn dds_len(format: PixelFormat, width: u32, height: u32) -> usize {
    container::encoded_len(format, width, height).map_or(usize::MAX, |len| 4 + len)
}

pub(crate) fn check_dimensions(
    field: &'static str,
    width: u32,
    height: u32,
    expected_width: u32,
    expected_height: u32,
) -> Result<(), MapError> {
    if width != expected_width || height != expected_height {
        return Err(MapError::InvalidDimensions {
            field,
            width,
            height,
            expected_width,
            expected_height,
        });
    }
    Ok(())
}
