use scmap_core::constants::ARGB_BYTES_PER_PIXEL;

use crate::error::DdsError;

/// One pixel of the canonical buffer, by channel name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Argb {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Argb {
    pub const fn new(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(255, r, g, b)
    }

    /// Channels in canonical buffer order.
    pub fn to_bytes(self) -> [u8; 4] {
        [self.b, self.g, self.r, self.a]
    }

    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self {
            b: bytes[0],
            g: bytes[1],
            r: bytes[2],
            a: bytes[3],
        }
    }

    pub fn to_u32(self) -> u32 {
        u32::from_le_bytes(self.to_bytes())
    }
}

/// Bytes covered by `width × height` units of `unit_bytes`, or
/// [`DdsError::SurfaceTooLarge`] if that overflows `usize`.
pub fn surface_len(width: u32, height: u32, unit_bytes: usize) -> Result<usize, DdsError> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(unit_bytes))
        .ok_or(DdsError::SurfaceTooLarge { width, height })
}

/// Decompressed ARGB8888 image.
///
/// Each pixel is the little-endian u32 `0xAARRGGBB`, so the bytes of one pixel
/// are `[B, G, R, A]`. Rows are stored top to bottom with no padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Image {
    /// Transparent black image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; Self::byte_len(width, height)],
        }
    }

    pub fn filled(width: u32, height: u32, colour: Argb) -> Self {
        let pixels = colour.to_bytes().repeat(width as usize * height as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, DdsError> {
        let expected = Self::byte_len(width, height);
        if pixels.len() != expected {
            return Err(DdsError::BufferLength {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Size of a canonical buffer for the given dimensions. Saturates at
    /// `usize::MAX`, which no real buffer can match.
    pub fn byte_len(width: u32, height: u32) -> usize {
        surface_len(width, height, ARGB_BYTES_PER_PIXEL).unwrap_or(usize::MAX)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} image",
            self.width,
            self.height
        );
        (y as usize * self.width as usize + x as usize) * ARGB_BYTES_PER_PIXEL
    }

    /// Panics if `(x, y)` is outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Argb {
        let i = self.offset(x, y);
        Argb::from_bytes([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    /// Panics if `(x, y)` is outside the image.
    pub fn set_pixel(&mut self, x: u32, y: u32, colour: Argb) {
        let i = self.offset(x, y);
        self.pixels[i..i + ARGB_BYTES_PER_PIXEL].copy_from_slice(&colour.to_bytes());
    }
}
