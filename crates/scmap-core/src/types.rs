use glam::UVec2;
use serde::{Deserialize, Serialize};

use crate::checks;
use crate::error::CheckError;

/// Map resolution tier. The numeric value is what map args and the editor use;
/// the pixel dimension is derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SizeClass {
    S256 = 0,
    S512 = 1,
    S1024 = 2,
    S2048 = 3,
    S4096 = 4,
}

impl SizeClass {
    pub const ALL: [SizeClass; 5] = [
        SizeClass::S256,
        SizeClass::S512,
        SizeClass::S1024,
        SizeClass::S2048,
        SizeClass::S4096,
    ];

    pub fn from_index(index: u8) -> Result<Self, CheckError> {
        checks::between("size", index, 0, 4)?;
        Ok(Self::ALL[index as usize])
    }

    /// Reverse lookup from a heightmap/normalmap dimension.
    pub fn from_dimension(dimension: u32) -> Result<Self, CheckError> {
        let allowed: Vec<u32> = Self::ALL.iter().map(|s| s.dimension()).collect();
        checks::one_of("dimension", dimension, &allowed)?;
        Ok(Self::ALL[dimension.trailing_zeros() as usize - 8])
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    /// Heightmap and normalmap side length.
    pub fn dimension(self) -> u32 {
        256 << self.index()
    }

    /// Texturemap and watermap side length.
    pub fn half_dimension(self) -> u32 {
        self.dimension() / 2
    }
}

impl TryFrom<u8> for SizeClass {
    type Error = CheckError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_index(value)
    }
}

impl From<SizeClass> for u8 {
    fn from(size: SizeClass) -> u8 {
        size.index()
    }
}

/// Inclusive rectangle of samples modified since the last upload.
///
/// Renderers call `take` once per frame and upload only the covered texels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirtyRegion {
    bounds: Option<(UVec2, UVec2)>,
}

impl DirtyRegion {
    pub fn is_clean(&self) -> bool {
        self.bounds.is_none()
    }

    /// Grow the region to include sample `(x, y)`.
    pub fn mark(&mut self, x: u32, y: u32) {
        let p = UVec2::new(x, y);
        self.bounds = Some(match self.bounds {
            Some((min, max)) => (min.min(p), max.max(p)),
            None => (p, p),
        });
    }

    /// Mark the whole `width × height` grid.
    pub fn mark_all(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.mark(0, 0);
        self.mark(width - 1, height - 1);
    }

    /// Inclusive `(min, max)` corners, if anything is dirty.
    pub fn bounds(&self) -> Option<(UVec2, UVec2)> {
        self.bounds
    }

    /// Return the current bounds and reset to clean.
    pub fn take(&mut self) -> Option<(UVec2, UVec2)> {
        self.bounds.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_class_dimensions() {
        let dims: Vec<u32> = SizeClass::ALL.iter().map(|s| s.dimension()).collect();
        assert_eq!(dims, vec![256, 512, 1024, 2048, 4096]);
        assert_eq!(SizeClass::S1024.half_dimension(), 512);
    }

    #[test]
    fn test_size_class_from_dimension() {
        for size in SizeClass::ALL {
            let back = SizeClass::from_dimension(size.dimension()).expect("valid dimension");
            assert_eq!(back, size);
        }
        assert!(SizeClass::from_dimension(300).is_err());
        assert!(SizeClass::from_dimension(128).is_err());
    }

    #[test]
    fn test_size_class_index_out_of_range() {
        let err = SizeClass::from_index(5).unwrap_err();
        assert!(err.to_string().contains("size"));
    }

    #[test]
    fn test_dirty_region_grows_and_resets() {
        let mut dirty = DirtyRegion::default();
        assert!(dirty.is_clean());

        dirty.mark(5, 9);
        dirty.mark(2, 12);
        assert_eq!(dirty.bounds(), Some((UVec2::new(2, 9), UVec2::new(5, 12))));

        assert!(dirty.take().is_some());
        assert!(dirty.is_clean());
    }

    #[test]
    fn test_dirty_region_mark_all() {
        let mut dirty = DirtyRegion::default();
        dirty.mark_all(257, 257);
        assert_eq!(dirty.bounds(), Some((UVec2::ZERO, UVec2::new(256, 256))));
    }
}
