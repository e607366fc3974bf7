//! DDS header layout and flag constants.
//!
//! ```text
//! 0x00  "DDS "                      magic (not part of DdsHeader)
//! 0x04  DdsHeader (124 bytes)
//!       size(0) flags(4) height(8) width(12) pitch_or_linear_size(16)
//!       depth(20) mip_map_count(24) reserved(28, 11 x u32)
//!       ddspf { size(72) flags(76) fourcc(80) rgb_bit_count(84)
//!               r(88) g(92) b(96) a(100) masks }
//!       caps(104) caps2(108) caps3(112) caps4(116) reserved2(120)
//! 0x80  pixel payload
//! ```

use bytemuck::{Pod, Zeroable};

use crate::error::DdsError;

/// Magic bytes at the start of every DDS stream.
pub const DDS_MAGIC: [u8; 4] = *b"DDS ";

/// Value of `DdsHeader::size`.
pub const DDS_HEADER_SIZE: usize = 124;

/// Magic plus header.
pub const DDS_PREFIX_SIZE: usize = 4 + DDS_HEADER_SIZE;

/// Value of `DdsPixelFormat::size`.
pub const DDS_PIXEL_FORMAT_SIZE: usize = 32;

// DdsHeader::flags
pub const DDSD_CAPS: u32 = 0x1;
pub const DDSD_HEIGHT: u32 = 0x2;
pub const DDSD_WIDTH: u32 = 0x4;
pub const DDSD_PITCH: u32 = 0x8;
pub const DDSD_PIXELFORMAT: u32 = 0x1000;
pub const DDSD_MIPMAPCOUNT: u32 = 0x2_0000;
pub const DDSD_LINEARSIZE: u32 = 0x8_0000;
pub const DDSD_DEPTH: u32 = 0x80_0000;

/// Flags every header this codec reads must carry.
pub const DDSD_REQUIRED: u32 = DDSD_HEIGHT | DDSD_WIDTH | DDSD_PIXELFORMAT;

// DdsPixelFormat::flags
pub const DDPF_ALPHAPIXELS: u32 = 0x1;
pub const DDPF_ALPHA: u32 = 0x2;
pub const DDPF_FOURCC: u32 = 0x4;
pub const DDPF_RGB: u32 = 0x40;
pub const DDPF_LUMINANCE: u32 = 0x2_0000;

// DdsHeader::caps
pub const DDSCAPS_COMPLEX: u32 = 0x8;
pub const DDSCAPS_TEXTURE: u32 = 0x1000;
pub const DDSCAPS_MIPMAP: u32 = 0x40_0000;

/// Compression tag of the only block format supported.
pub const FOURCC_DXT5: [u8; 4] = *b"DXT5";

/// Channel masks of a 32bpp ARGB surface.
pub const ARGB_MASKS: ChannelMasks = ChannelMasks {
    r: 0x00FF_0000,
    g: 0x0000_FF00,
    b: 0x0000_00FF,
    a: 0xFF00_0000,
};

/// Channel masks of a 24bpp RGB surface.
pub const RGB_MASKS: ChannelMasks = ChannelMasks {
    r: 0x00FF_0000,
    g: 0x0000_FF00,
    b: 0x0000_00FF,
    a: 0,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelMasks {
    pub r: u32,
    pub g: u32,
    pub b: u32,
    pub a: u32,
}

/// DDS_PIXELFORMAT. 32 bytes, repr(C) for byte-level serialization.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct DdsPixelFormat {
    pub size: u32,
    pub flags: u32,
    pub four_cc: [u8; 4],
    pub rgb_bit_count: u32,
    pub r_mask: u32,
    pub g_mask: u32,
    pub b_mask: u32,
    pub a_mask: u32,
}

impl DdsPixelFormat {
    pub fn masks(&self) -> ChannelMasks {
        ChannelMasks {
            r: self.r_mask,
            g: self.g_mask,
            b: self.b_mask,
            a: self.a_mask,
        }
    }

    pub fn set_masks(&mut self, masks: ChannelMasks) {
        self.r_mask = masks.r;
        self.g_mask = masks.g;
        self.b_mask = masks.b;
        self.a_mask = masks.a;
    }
}

/// Row pitch of an uncompressed surface, checked against the u32 header field.
pub fn pitch(width: u32, height: u32, bytes_per_pixel: usize) -> Result<u32, DdsError> {
    (width as usize)
        .checked_mul(bytes_per_pixel)
        .and_then(|p| u32::try_from(p).ok())
        .ok_or(DdsError::SurfaceTooLarge { width, height })
}

/// DDS_HEADER. Fixed 124 bytes, repr(C) for byte-level serialization.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct DdsHeader {
    pub size: u32,
    pub flags: u32,
    pub height: u32,
    pub width: u32,
    pub pitch_or_linear_size: u32,
    pub depth: u32,
    pub mip_map_count: u32,
    pub reserved: [u32; 11],
    pub pixel_format: DdsPixelFormat,
    pub caps: u32,
    pub caps2: u32,
    pub caps3: u32,
    pub caps4: u32,
    pub reserved2: u32,
}

impl DdsHeader {
    /// Header with the fields common to every surface this codec writes.
    /// Format-specific fields are left zeroed.
    pub fn for_surface(width: u32, height: u32) -> Self {
        let mut header = Self::zeroed();
        header.size = DDS_HEADER_SIZE as u32;
        header.flags = DDSD_CAPS | DDSD_REQUIRED;
        header.width = width;
        header.height = height;
        header.pixel_format.size = DDS_PIXEL_FORMAT_SIZE as u32;
        header.caps = DDSCAPS_TEXTURE;
        header
    }

    /// On-disk bytes. The layout is little-endian; like the rest of the
    /// workspace this assumes a little-endian host.
    pub fn to_bytes(&self) -> [u8; DDS_HEADER_SIZE] {
        let mut out = [0u8; DDS_HEADER_SIZE];
        out.copy_from_slice(bytemuck::bytes_of(self));
        out
    }

    /// Parse from at least `DDS_HEADER_SIZE` bytes.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let bytes = bytes.get(..DDS_HEADER_SIZE)?;
        Some(bytemuck::pod_read_unaligned(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_size() {
        assert_eq!(std::mem::size_of::<DdsHeader>(), DDS_HEADER_SIZE);
        assert_eq!(std::mem::size_of::<DdsPixelFormat>(), DDS_PIXEL_FORMAT_SIZE);
    }

    #[test]
    fn test_field_offsets() {
        let mut header = DdsHeader::zeroed();
        header.pitch_or_linear_size = 0x1111_1111;
        header.pixel_format.size = 32;
        header.pixel_format.four_cc = FOURCC_DXT5;
        header.pixel_format.a_mask = 0xFF00_0000;
        header.caps = DDSCAPS_TEXTURE;

        let bytes = header.to_bytes();
        assert_eq!(&bytes[16..20], &[0x11; 4]);
        assert_eq!(&bytes[72..76], &32u32.to_le_bytes());
        assert_eq!(&bytes[80..84], b"DXT5");
        assert_eq!(&bytes[100..104], &0xFF00_0000u32.to_le_bytes());
        assert_eq!(&bytes[104..108], &DDSCAPS_TEXTURE.to_le_bytes());
    }

    #[test]
    fn test_header_roundtrip() {
        let mut header = DdsHeader::for_surface(512, 256);
        header.pixel_format.flags = DDPF_RGB | DDPF_ALPHAPIXELS;
        header.pixel_format.set_masks(ARGB_MASKS);

        let bytes = header.to_bytes();
        let parsed = DdsHeader::from_bytes(&bytes).expect("124 bytes");
        assert_eq!(parsed, header);
        assert_eq!(parsed.pixel_format.masks(), ARGB_MASKS);
    }

    #[test]
    fn test_from_bytes_too_short() {
        assert!(DdsHeader::from_bytes(&[0u8; 100]).is_none());
    }
}
