use glam::UVec2;
use scmap_core::{DirtyRegion, SizeClass};
use scmap_dds::{Image, PixelFormat};

use super::{check_dimensions, dds_len, read_dds, write_dds};
use crate::error::MapError;
use crate::stream::{ByteReader, ByteWriter};

/// Eight 8-bit channels stored per image.
pub const CHANNELS_PER_IMAGE: usize = 4;
pub const CHANNEL_COUNT: usize = 2 * CHANNELS_PER_IMAGE;

/// Byte offset of each channel inside a `[B, G, R, A]` pixel, in R, G, B, A order.
const CHANNEL_BYTE: [usize; CHANNELS_PER_IMAGE] = [2, 1, 0, 3];

/// Layer blend weights at half heightmap resolution.
///
/// Channel `c` lives in image `c / 4`. Within an image the channels are
/// red, green, blue, alpha. Channel 0 blends albedo layer 1 over layer 0.
#[derive(Debug, Clone)]
pub struct Texturemap {
    images: [Image; 2],
    dirty: DirtyRegion,
}

impl PartialEq for Texturemap {
    fn eq(&self, other: &Self) -> bool {
        self.images == other.images
    }
}

impl Texturemap {
    /// Zero weights everywhere, so only the base layer shows.
    pub fn create(size: SizeClass) -> Self {
        let (width, height) = (size.half_dimension(), size.half_dimension());
        Self {
            images: [Image::new(width, height), Image::new(width, height)],
            dirty: DirtyRegion::default(),
        }
    }

    pub fn width(&self) -> u32 {
        self.images[0].width()
    }

    pub fn height(&self) -> u32 {
        self.images[0].height()
    }

    fn locate(&self, channel: usize, x: u32, y: u32) -> (usize, usize) {
        assert!(channel < CHANNEL_COUNT, "texturemap channel {channel} out of range");
        assert!(
            x < self.width() && y < self.height(),
            "texturemap pixel ({x}, {y}) out of bounds for {}x{}",
            self.width(),
            self.height()
        );
        let pixel = (y as usize * self.width() as usize + x as usize) * 4;
        (
            channel / CHANNELS_PER_IMAGE,
            pixel + CHANNEL_BYTE[channel % CHANNELS_PER_IMAGE],
        )
    }

    pub fn get_pixel(&self, channel: usize, x: u32, y: u32) -> u8 {
        let (image, offset) = self.locate(channel, x, y);
        self.images[image].pixels()[offset]
    }

    pub fn set_pixel(&mut self, channel: usize, x: u32, y: u32, value: u8) {
        let (image, offset) = self.locate(channel, x, y);
        self.images[image].pixels_mut()[offset] = value;
        self.dirty.mark(x, y);
    }

    /// Channels `4 * index ..= 4 * index + 3` packed as one ARGB image.
    pub fn image(&self, index: usize) -> &Image {
        &self.images[index]
    }

    pub fn import_image(&mut self, index: usize, image: Image) -> Result<(), MapError> {
        check_dimensions(
            "texturemap",
            image.width(),
            image.height(),
            self.width(),
            self.height(),
        )?;
        self.images[index] = image;
        self.dirty.mark_all(self.width(), self.height());
        Ok(())
    }

    /// Region edited since the last call.
    pub fn take_dirty(&mut self) -> Option<(UVec2, UVec2)> {
        self.dirty.take()
    }

    pub fn encoded_len(&self) -> usize {
        2 * dds_len(PixelFormat::Argb8888, self.width(), self.height())
    }

    /// Resolution is half the heightmap's.
    pub fn load(
        r: &mut ByteReader,
        heightmap_width: u32,
        heightmap_height: u32,
    ) -> Result<Self, MapError> {
        let (width, height) = (heightmap_width / 2, heightmap_height / 2);
        let first = read_dds(r, "texturemap", PixelFormat::Argb8888, width, height)?;
        let second = read_dds(r, "texturemap", PixelFormat::Argb8888, width, height)?;
        Ok(Self {
            images: [first, second],
            dirty: DirtyRegion::default(),
        })
    }

    pub fn save(&self) -> Result<Vec<u8>, MapError> {
        let mut w = ByteWriter::with_capacity(self.encoded_len());
        for image in &self.images {
            write_dds(&mut w, image, PixelFormat::Argb8888)?;
        }
        Ok(w.into_inner())
    }
}
