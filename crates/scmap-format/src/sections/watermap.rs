use scmap_core::{checks, SizeClass};
use scmap_dds::{Image, PixelFormat};

use super::{check_dimensions, dds_len, read_dds, write_dds};
use crate::error::MapError;
use crate::stream::{ByteReader, ByteWriter};

pub const DEFAULT_FOAM: u8 = 0;
pub const DEFAULT_FLATNESS: u8 = 255;
pub const DEFAULT_DEPTH_BIAS: u8 = 127;
pub const DEFAULT_TERRAIN_TYPE: u8 = 1;

/// Water surface masks and the terrain-type raster.
///
/// Everything here is at half heightmap resolution except `terrain_type`,
/// which has one byte per heightmap cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Watermap {
    width: u32,
    height: u32,
    pub image: Image,
    pub foam: Vec<u8>,
    pub flatness: Vec<u8>,
    pub depth_bias: Vec<u8>,
    pub terrain_type: Vec<u8>,
}

impl Watermap {
    pub fn create(size: SizeClass) -> Self {
        let (width, height) = (size.half_dimension(), size.half_dimension());
        let half = width as usize * height as usize;
        let full = 4 * half;
        Self {
            width,
            height,
            image: Image::new(width, height),
            foam: vec![DEFAULT_FOAM; half],
            flatness: vec![DEFAULT_FLATNESS; half],
            depth_bias: vec![DEFAULT_DEPTH_BIAS; half],
            terrain_type: vec![DEFAULT_TERRAIN_TYPE; full],
        }
    }

    /// Mask resolution.
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn mask_len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    fn terrain_type_len(&self) -> usize {
        4 * self.mask_len()
    }

    /// Check every raster against the stored resolution.
    pub fn validate(&self) -> Result<(), MapError> {
        check_dimensions(
            "watermap.image",
            self.image.width(),
            self.image.height(),
            self.width,
            self.height,
        )?;
        let masks = [
            ("watermap.foam", &self.foam),
            ("watermap.flatness", &self.flatness),
            ("watermap.depth_bias", &self.depth_bias),
        ];
        for (field, mask) in masks {
            checks::equal(field, mask.len(), self.mask_len())?;
        }
        checks::equal(
            "watermap.terrain_type",
            self.terrain_type.len(),
            self.terrain_type_len(),
        )?;
        Ok(())
    }

    pub fn encoded_len(&self) -> usize {
        4 + dds_len(PixelFormat::Dxt5, self.width, self.height)
            + 3 * self.mask_len()
            + self.terrain_type_len()
    }

    /// Dimensions come from the heightmap; nothing in the section stores them.
    pub fn load(
        r: &mut ByteReader,
        heightmap_width: u32,
        heightmap_height: u32,
    ) -> Result<Self, MapError> {
        let (width, height) = (heightmap_width / 2, heightmap_height / 2);
        checks::equal("watermap.count", r.read_u32()?, 1)?;
        let image = read_dds(r, "watermap", PixelFormat::Dxt5, width, height)?;

        let half = width as usize * height as usize;
        let foam = r.take(half)?.to_vec();
        let flatness = r.take(half)?.to_vec();
        let depth_bias = r.take(half)?.to_vec();
        let terrain_type = r.take(4 * half)?.to_vec();

        Ok(Self {
            width,
            height,
            image,
            foam,
            flatness,
            depth_bias,
            terrain_type,
        })
    }

    pub fn save(&self) -> Result<Vec<u8>, MapError> {
        self.validate()?;
        let mut w = ByteWriter::with_capacity(self.encoded_len());
        w.write_u32(1);
        write_dds(&mut w, &self.image, PixelFormat::Dxt5)?;
        w.write_bytes(&self.foam);
        w.write_bytes(&self.flatness);
        w.write_bytes(&self.depth_bias);
        w.write_bytes(&self.terrain_type);
        Ok(w.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_sizes() {
        let watermap = Watermap::create(SizeClass::S256);
        assert_eq!((watermap.width(), watermap.height()), (128, 128));
        assert_eq!(watermap.foam.len(), 128 * 128);
        assert_eq!(watermap.terrain_type.len(), 256 * 256);
        assert!(watermap.flatness.iter().all(|&b| b == DEFAULT_FLATNESS));
        watermap.validate().expect("valid");
    }

    #[test]
    fn test_roundtrip() {
        let mut watermap = Watermap::create(SizeClass::S256);
        watermap.foam[17] = 99;
        watermap.terrain_type[256 * 256 - 1] = 7;
        let bytes = watermap.save().expect("save");
        assert_eq!(bytes.len(), watermap.encoded_len());

        let mut r = ByteReader::new(&bytes);
        let loaded = Watermap::load(&mut r, 256, 256).expect("load");
        assert!(r.is_empty());
        assert_eq!(loaded, watermap);
    }

    #[test]
    fn test_mask_length_checked_on_save() {
        let mut watermap = Watermap::create(SizeClass::S256);
        watermap.depth_bias.pop();
        let err = watermap.save().unwrap_err();
        assert!(err.to_string().contains("watermap.depth_bias"), "{err}");
    }

    #[test]
    fn test_truncated_terrain_type_fails() {
        let bytes = Watermap::create(SizeClass::S256).save().expect("save");
        let result = Watermap::load(&mut ByteReader::new(&bytes[..bytes.len() - 1]), 256, 256);
        assert!(matches!(result, Err(MapError::UnexpectedEof { .. })));
    }
}
