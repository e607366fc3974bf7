use scmap_core::{DirtyRegion, SizeClass};

use crate::error::MapError;
use crate::stream::{ByteReader, ByteWriter};

/// Scale applied to raw u16 samples to obtain world-space height.
pub const DEFAULT_HEIGHT_SCALE: f32 = 1.0 / 128.0;

/// Terrain elevation samples.
///
/// The grid has one more sample than the map extent in each direction:
/// a 256×256 map stores 257×257 heights. Samples are row-major.
#[derive(Debug, Clone)]
pub struct Heightmap {
    width: u32,
    height: u32,
    scale: f32,
    samples: Vec<u16>,
    /// Trailing byte after the samples. Always zero in shipped maps.
    pub flag: u8,
    dirty: DirtyRegion,
}

impl PartialEq for Heightmap {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.scale == other.scale
            && self.samples == other.samples
            && self.flag == other.flag
    }
}

impl Heightmap {
    pub fn create(size: SizeClass, default_height: u16) -> Self {
        let width = size.dimension();
        let height = size.dimension();
        let count = Self::sample_count(width, height);
        Self {
            width,
            height,
            scale: DEFAULT_HEIGHT_SCALE,
            samples: vec![default_height; count],
            flag: 0,
            dirty: DirtyRegion::default(),
        }
    }

    fn sample_count(width: u32, height: u32) -> usize {
        (width as usize + 1) * (height as usize + 1)
    }

    /// Map extent, not sample count.
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size_class(&self) -> Result<SizeClass, MapError> {
        Ok(SizeClass::from_dimension(self.width)?)
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
        self.dirty.mark_all(self.width + 1, self.height + 1);
    }

    pub fn samples(&self) -> &[u16] {
        &self.samples
    }

    pub fn to_u16_vec(&self) -> Vec<u16> {
        self.samples.clone()
    }

    fn index(&self, x: u32, y: u32) -> usize {
        assert!(
            x <= self.width && y <= self.height,
            "heightmap sample ({x}, {y}) out of bounds for {}x{} map",
            self.width,
            self.height
        );
        y as usize * (self.width as usize + 1) + x as usize
    }

    /// Sample at grid point `(x, y)`, with `x <= width` and `y <= height`.
    pub fn get_pixel(&self, x: u32, y: u32) -> u16 {
        self.samples[self.index(x, y)]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, value: u16) {
        let i = self.index(x, y);
        self.samples[i] = value;
        self.dirty.mark(x, y);
    }

    /// Replace every sample at once. `samples` must cover the full grid.
    pub fn import(&mut self, samples: Vec<u16>) -> Result<(), MapError> {
        let expected = Self::sample_count(self.width, self.height);
        if samples.len() != expected {
            return Err(MapError::LengthMismatch {
                field: "heightmap.samples",
                expected,
                actual: samples.len(),
            });
        }
        self.samples = samples;
        self.dirty.mark_all(self.width + 1, self.height + 1);
        Ok(())
    }

    /// Region edited since the last call, in sample coordinates.
    pub fn take_dirty(&mut self) -> Option<(glam::UVec2, glam::UVec2)> {
        self.dirty.take()
    }

    pub fn encoded_len(&self) -> usize {
        4 + 4 + 4 + self.samples.len() * 2 + 1
    }

    pub fn load(r: &mut ByteReader) -> Result<Self, MapError> {
        let width = r.read_u32()?;
        let height = r.read_u32()?;
        SizeClass::from_dimension(width)?;
        super::check_dimensions("heightmap", width, height, width, width)?;
        let scale = r.read_f32()?;
        let samples = r.read_u16_vec(Self::sample_count(width, height))?;
        let flag = r.read_u8()?;
        if flag != 0 {
            log::warn!("heightmap trailing flag is {flag}, expected 0");
        }
        Ok(Self {
            width,
            height,
            scale,
            samples,
            flag,
            dirty: DirtyRegion::default(),
        })
    }

    pub fn save(&self) -> Vec<u8> {
        let mut w = ByteWriter::with_capacity(self.encoded_len());
        w.write_u32(self.width);
        w.write_u32(self.height);
        w.write_f32(self.scale);
        w.write_u16_slice(&self.samples);
        w.write_u8(self.flag);
        w.into_inner()
    }
}
