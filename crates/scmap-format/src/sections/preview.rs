use scmap_core::constants::PREVIEW_SIZE;
use scmap_dds::{Argb, Image, PixelFormat};

use super::{dds_len, read_dds, write_dds};
use crate::error::MapError;
use crate::stream::{ByteReader, ByteWriter};

/// Fixed 256×256 thumbnail shown in the lobby map list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewImage {
    image: Image,
}

impl PreviewImage {
    /// Opaque black thumbnail.
    pub fn create() -> Self {
        Self {
            image: Image::filled(PREVIEW_SIZE, PREVIEW_SIZE, Argb::opaque(0, 0, 0)),
        }
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    /// Replace the thumbnail. Only 256×256 images are accepted.
    pub fn set_image(&mut self, image: Image) -> Result<(), MapError> {
        super::check_dimensions(
            "preview",
            image.width(),
            image.height(),
            PREVIEW_SIZE,
            PREVIEW_SIZE,
        )?;
        self.image = image;
        Ok(())
    }

    pub fn encoded_len(&self) -> usize {
        dds_len(PixelFormat::Argb8888, PREVIEW_SIZE, PREVIEW_SIZE)
    }

    pub fn load(r: &mut ByteReader) -> Result<Self, MapError> {
        let image = read_dds(
            r,
            "preview",
            PixelFormat::Argb8888,
            PREVIEW_SIZE,
            PREVIEW_SIZE,
        )?;
        Ok(Self { image })
    }

    pub fn save(&self) -> Result<Vec<u8>, MapError> {
        let mut w = ByteWriter::with_capacity(self.encoded_len());
        write_dds(&mut w, &self.image, PixelFormat::Argb8888)?;
        Ok(w.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_roundtrip_keeps_pixels() {
        let mut preview = PreviewImage::create();
        let mut image = preview.image().clone();
        image.set_pixel(10, 20, Argb::new(128, 1, 2, 3));
        preview.set_image(image).expect("256x256 accepted");

        let bytes = preview.save().expect("save");
        assert_eq!(bytes.len(), preview.encoded_len());

        let mut r = ByteReader::new(&bytes);
        let loaded = PreviewImage::load(&mut r).expect("load");
        assert!(r.is_empty());
        assert_eq!(loaded, preview);
        assert_eq!(loaded.image().pixel(10, 20), Argb::new(128, 1, 2, 3));
    }

    #[test]
    fn test_wrong_size_rejected() {
        let mut preview = PreviewImage::create();
        let result = preview.set_image(Image::new(128, 128));
        assert!(matches!(result, Err(MapError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_length_prefix_must_match_surface() {
        let mut bytes = PreviewImage::create().save().expect("save");
        bytes[0..4].copy_from_slice(&100u32.to_le_bytes());
        let result = PreviewImage::load(&mut ByteReader::new(&bytes));
        assert!(matches!(
            result,
            Err(MapError::LengthMismatch { field: "preview", .. })
        ));
    }
}
