//! Single source of truth for the on-disk constants shared by the DDS and
//! map container crates.

/// `"Map\x1a"` read as a little-endian u32.
pub const MAP_MAGIC: u32 = 0x1A70_614D;

/// The only major container version this codec understands.
pub const MAP_VERSION_MAJOR: u32 = 2;

/// Minor version written after the preview image.
pub const MAP_VERSION_MINOR: u32 = 56;

/// Fixed marker following the major version (`0xBEEFFEED`).
pub const MAP_HEADER_MARKER: u32 = 0xBEEF_FEED;

/// Constant that follows the header marker in every known file.
pub const MAP_HEADER_MARKER_2: u32 = 2;

/// Side length of the preview image in pixels.
pub const PREVIEW_SIZE: u32 = 256;

/// Number of albedo layers in the terrain stratum table.
pub const ALBEDO_LAYER_COUNT: usize = 10;

/// Number of normal layers in the terrain stratum table.
pub const NORMAL_LAYER_COUNT: usize = 9;

/// Number of water wave-texture slots.
pub const WAVE_TEXTURE_COUNT: usize = 4;

/// Number of f32 values in the lighting record.
pub const LIGHTING_FLOAT_COUNT: usize = 23;

/// Highest army index a decal may be owned by. `-1` means unowned.
pub const MAX_ARMY_INDEX: i32 = 15;

/// Bytes per pixel of the canonical ARGB8888 buffer.
pub const ARGB_BYTES_PER_PIXEL: usize = 4;

/// Bytes per pixel of the packed RGB888 format.
pub const RGB_BYTES_PER_PIXEL: usize = 3;

/// Side length of a DXT5 block in pixels.
pub const DXT5_BLOCK_DIM: u32 = 4;

/// Size of one encoded DXT5 block in bytes.
pub const DXT5_BLOCK_BYTES: usize = 16;

/// Largest DDS side length accepted on load or save (the Direct3D texture limit).
pub const MAX_DDS_DIMENSION: u32 = 16384;
