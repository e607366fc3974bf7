use scmap_core::{checks, SizeClass};
use scmap_dds::dxt5::{pack_565, unpack_565};
use scmap_dds::{Argb, Image, PixelFormat};

use super::{dds_len, read_dds, write_dds};
use crate::error::MapError;
use crate::stream::{ByteReader, ByteWriter};

/// Tangent-space terrain normals at heightmap resolution, stored DXT5.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalmap {
    image: Image,
}

/// Straight-up normal after a round trip through RGB565.
fn flat_normal() -> Argb {
    let [r, g, b] = unpack_565(pack_565([128, 128, 255]));
    Argb::opaque(r, g, b)
}

impl Normalmap {
    pub fn create(size: SizeClass) -> Self {
        let dim = size.dimension();
        Self {
            image: Image::filled(dim, dim, flat_normal()),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    /// Replace the normals. The dimensions may not change.
    pub fn import_image(&mut self, image: Image) -> Result<(), MapError> {
        super::check_dimensions(
            "normalmap",
            image.width(),
            image.height(),
            self.width(),
            self.height(),
        )?;
        self.image = image;
        Ok(())
    }

    pub fn encoded_len(&self) -> usize {
        12 + dds_len(PixelFormat::Dxt5, self.width(), self.height())
    }

    pub fn load(r: &mut ByteReader) -> Result<Self, MapError> {
        let width = r.read_u32()?;
        let height = r.read_u32()?;
        SizeClass::from_dimension(width)?;
        super::check_dimensions("normalmap", width, height, width, width)?;
        checks::equal("normalmap.count", r.read_u32()?, 1)?;
        let image = read_dds(r, "normalmap", PixelFormat::Dxt5, width, height)?;
        Ok(Self { image })
    }

    pub fn save(&self) -> Result<Vec<u8>, MapError> {
        let mut w = ByteWriter::with_capacity(self.encoded_len());
        w.write_u32(self.width());
        w.write_u32(self.height());
        w.write_u32(1);
        write_dds(&mut w, &self.image, PixelFormat::Dxt5)?;
        Ok(w.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_normalmap_roundtrip_is_exact() {
        let normalmap = Normalmap::create(SizeClass::S256);
        let bytes = normalmap.save().expect("save");
        assert_eq!(bytes.len(), normalmap.encoded_len());
        assert_eq!(bytes.len(), 12 + 4 + 128 + 256 * 256);

        let mut r = ByteReader::new(&bytes);
        let loaded = Normalmap::load(&mut r).expect("load");
        assert!(r.is_empty());
        assert_eq!(loaded, normalmap);
    }

    #[test]
    fn test_flat_normal_points_up() {
        let normal = flat_normal();
        assert_eq!(normal.a, 255);
        assert!(normal.b > 240);
        assert!((120..=136).contains(&normal.r));
        assert!((120..=136).contains(&normal.g));
    }

    #[test]
    fn test_map_count_must_be_one() {
        let mut bytes = Normalmap::create(SizeClass::S256).save().expect("save");
        bytes[8..12].copy_from_slice(&2u32.to_le_bytes());
        let err = Normalmap::load(&mut ByteReader::new(&bytes)).unwrap_err();
        assert!(err.to_string().contains("normalmap.count"), "{err}");
    }

    #[test]
    fn test_import_keeps_dimensions() {
        let mut normalmap = Normalmap::create(SizeClass::S256);
        let result = normalmap.import_image(Image::new(512, 512));
        assert!(matches!(result, Err(MapError::InvalidDimensions { .. })));
    }
}
