//! A single-surface DDS stream: magic, header, then one pixel payload.
//! Mipmaps and extra surfaces are never written and are ignored on read.

use scmap_core::checks;
use scmap_core::constants::MAX_DDS_DIMENSION;

use crate::error::DdsError;
use crate::format::PixelFormat;
use crate::header::*;
use crate::image::Image;

/// A decoded DDS stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdsImage {
    pub image: Image,
    pub format: PixelFormat,
    pub header: DdsHeader,
    consumed: usize,
}

impl DdsImage {
    /// Bytes of the stream this image was decoded from: prefix plus payload.
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

/// Total stream length for an image of the given format and dimensions.
pub fn encoded_len(format: PixelFormat, width: u32, height: u32) -> Result<usize, DdsError> {
    format
        .payload_len(width, height)?
        .checked_add(DDS_PREFIX_SIZE)
        .ok_or(DdsError::SurfaceTooLarge { width, height })
}

/// Both sides must be in `1..=MAX_DDS_DIMENSION` before any codec sizes a buffer.
fn check_surface(width: u32, height: u32) -> Result<(), DdsError> {
    checks::between("header.width", width, 1, MAX_DDS_DIMENSION)?;
    checks::between("header.height", height, 1, MAX_DDS_DIMENSION)?;
    Ok(())
}

/// Select a pixel format from a validated header, checking every field the
/// chosen codec depends on.
pub fn detect_format(header: &DdsHeader) -> Result<PixelFormat, DdsError> {
    let pf = &header.pixel_format;

    if pf.flags & DDPF_FOURCC != 0 {
        checks::equal("ddspf.fourcc", pf.four_cc, FOURCC_DXT5)?;
        return Ok(PixelFormat::Dxt5);
    }

    if pf.flags & (DDPF_RGB | DDPF_ALPHAPIXELS) == DDPF_RGB | DDPF_ALPHAPIXELS {
        checks::equal("ddspf.rgb_bit_count", pf.rgb_bit_count, 32)?;
        checks::equal("ddspf.r_mask", pf.r_mask, ARGB_MASKS.r)?;
        checks::equal("ddspf.g_mask", pf.g_mask, ARGB_MASKS.g)?;
        checks::equal("ddspf.b_mask", pf.b_mask, ARGB_MASKS.b)?;
        checks::equal("ddspf.a_mask", pf.a_mask, ARGB_MASKS.a)?;
        return Ok(PixelFormat::Argb8888);
    }

    if pf.flags & DDPF_RGB != 0 {
        checks::bits_not_set("ddspf.flags", pf.flags, DDPF_ALPHAPIXELS)?;
        checks::equal("ddspf.rgb_bit_count", pf.rgb_bit_count, 24)?;
        checks::equal("ddspf.r_mask", pf.r_mask, RGB_MASKS.r)?;
        checks::equal("ddspf.g_mask", pf.g_mask, RGB_MASKS.g)?;
        checks::equal("ddspf.b_mask", pf.b_mask, RGB_MASKS.b)?;
        return Ok(PixelFormat::Rgb888);
    }

    Err(DdsError::UnsupportedFormat(pf.flags))
}

/// Decode a DDS stream. `bytes` may extend past the first surface.
pub fn load(bytes: &[u8]) -> Result<DdsImage, DdsError> {
    if bytes.len() < DDS_PREFIX_SIZE {
        return Err(DdsError::TooSmall(bytes.len(), DDS_PREFIX_SIZE));
    }

    let magic = [bytes[0], bytes[1], bytes[2], bytes[3]];
    if magic != DDS_MAGIC {
        return Err(DdsError::InvalidMagic(magic));
    }

    let header = DdsHeader::from_bytes(&bytes[4..])
        .ok_or(DdsError::TooSmall(bytes.len(), DDS_PREFIX_SIZE))?;
    checks::equal("header.size", header.size as usize, DDS_HEADER_SIZE)?;
    checks::bits_set("header.flags", header.flags, DDSD_REQUIRED)?;
    checks::equal(
        "ddspf.size",
        header.pixel_format.size as usize,
        DDS_PIXEL_FORMAT_SIZE,
    )?;

    let format = detect_format(&header)?;
    let (width, height) = (header.width, header.height);
    check_surface(width, height)?;
    format.sanity_checks(width, height)?;

    let pixels = format.load(&bytes[DDS_PREFIX_SIZE..], width, height)?;
    let consumed = encoded_len(format, width, height)?;
    let image = Image::from_pixels(width, height, pixels)?;
    log::debug!("Decoded {width}x{height} {format} DDS surface");

    Ok(DdsImage {
        image,
        format,
        header,
        consumed,
    })
}

/// Encode `image` as a DDS stream in `format`.
pub fn save(image: &Image, format: PixelFormat) -> Result<Vec<u8>, DdsError> {
    let (width, height) = (image.width(), image.height());
    check_surface(width, height)?;
    format.sanity_checks(width, height)?;

    let mut header = DdsHeader::for_surface(width, height);
    format.populate_header(width, height, &mut header)?;

    let mut out = Vec::with_capacity(encoded_len(format, width, height)?);
    out.extend_from_slice(&DDS_MAGIC);
    out.extend_from_slice(&header.to_bytes());
    format.save(&mut out, image.pixels(), width, height)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::Argb;

    fn test_image() -> Image {
        let mut img = Image::filled(8, 4, Argb::opaque(10, 20, 30));
        img.set_pixel(7, 3, Argb::new(128, 200, 100, 50));
        img
    }

    #[test]
    fn test_argb_roundtrip() {
        let img = test_image();
        let bytes = save(&img, PixelFormat::Argb8888).expect("save");
        assert_eq!(
            bytes.len(),
            encoded_len(PixelFormat::Argb8888, 8, 4).expect("fits")
        );
        assert_eq!(&bytes[0..4], b"DDS ");

        let loaded = load(&bytes).expect("load");
        assert_eq!(loaded.format, PixelFormat::Argb8888);
        assert_eq!(loaded.image, img);
        assert_eq!(loaded.consumed(), bytes.len());
    }

    #[test]
    fn test_rgb_roundtrip_forces_alpha() {
        let img = test_image();
        let bytes = save(&img, PixelFormat::Rgb888).expect("save");
        assert_eq!(bytes.len(), 128 + 8 * 4 * 3);

        let loaded = load(&bytes).expect("load");
        assert_eq!(loaded.format, PixelFormat::Rgb888);
        assert_eq!(loaded.image.pixel(0, 0), Argb::opaque(10, 20, 30));
        assert_eq!(loaded.image.pixel(7, 3), Argb::opaque(200, 100, 50));
    }

    #[test]
    fn test_dxt5_roundtrip_header_fields() {
        let img = Image::filled(8, 8, Argb::opaque(0, 255, 0));
        let bytes = save(&img, PixelFormat::Dxt5).expect("save");
        assert_eq!(&bytes[84..88], b"DXT5");

        let loaded = load(&bytes).expect("load");
        assert_eq!(loaded.format, PixelFormat::Dxt5);
        assert_eq!(loaded.header.pitch_or_linear_size, 64);
        assert_eq!(loaded.image, img);
    }

    #[test]
    fn test_invalid_magic_rejected() {
        let mut bytes = save(&test_image(), PixelFormat::Argb8888).expect("save");
        bytes[0..4].copy_from_slice(b"NOPE");
        assert!(matches!(load(&bytes), Err(DdsError::InvalidMagic(m)) if &m == b"NOPE"));
    }

    #[test]
    fn test_too_small_rejected() {
        assert!(matches!(load(&[0u8; 50]), Err(DdsError::TooSmall(50, 128))));
    }

    #[test]
    fn test_bad_header_size_names_field() {
        let mut bytes = save(&test_image(), PixelFormat::Argb8888).expect("save");
        bytes[4..8].copy_from_slice(&100u32.to_le_bytes());
        let err = load(&bytes).unwrap_err();
        assert!(err.to_string().contains("header.size"), "{err}");
    }

    #[test]
    fn test_missing_required_flags_rejected() {
        let mut bytes = save(&test_image(), PixelFormat::Argb8888).expect("save");
        bytes[8..12].copy_from_slice(&DDSD_CAPS.to_le_bytes());
        let err = load(&bytes).unwrap_err();
        assert!(err.to_string().contains("header.flags"), "{err}");
    }

    #[test]
    fn test_wrong_argb_mask_rejected() {
        let mut bytes = save(&test_image(), PixelFormat::Argb8888).expect("save");
        // ddspf.r_mask lives at header offset 88, stream offset 92
        bytes[92..96].copy_from_slice(&0x0000_00FFu32.to_le_bytes());
        let err = load(&bytes).unwrap_err();
        assert!(err.to_string().contains("ddspf.r_mask"), "{err}");
    }

    #[test]
    fn test_other_fourcc_rejected() {
        let mut bytes = save(&Image::new(4, 4), PixelFormat::Dxt5).expect("save");
        bytes[84..88].copy_from_slice(b"DXT1");
        let err = load(&bytes).unwrap_err();
        assert!(err.to_string().contains("ddspf.fourcc"), "{err}");
    }

    #[test]
    fn test_unsupported_format_rejected() {
        let mut bytes = save(&test_image(), PixelFormat::Argb8888).expect("save");
        bytes[80..84].copy_from_slice(&DDPF_LUMINANCE.to_le_bytes());
        assert!(matches!(load(&bytes), Err(DdsError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_oversized_dimensions_name_the_field() {
        let mut bytes = save(&test_image(), PixelFormat::Argb8888).expect("save");
        // height at stream offset 12, width at 16
        bytes[12..20].copy_from_slice(&[0xFF; 8]);
        let err = load(&bytes).unwrap_err();
        assert!(matches!(err, DdsError::Check(_)));
        assert!(err.to_string().contains("header.width"), "{err}");

        let mut bytes = save(&test_image(), PixelFormat::Argb8888).expect("save");
        bytes[12..16].copy_from_slice(&0u32.to_le_bytes());
        let err = load(&bytes).unwrap_err();
        assert!(err.to_string().contains("header.height"), "{err}");
    }

    #[test]
    fn test_save_rejects_oversized_image() {
        let img = Image::new(MAX_DDS_DIMENSION + 4, 4);
        let err = save(&img, PixelFormat::Dxt5).unwrap_err();
        assert!(err.to_string().contains("header.width"), "{err}");
    }

    #[test]
    fn test_truncated_payload_rejected() {
        let bytes = save(&test_image(), PixelFormat::Argb8888).expect("save");
        let result = load(&bytes[..bytes.len() - 1]);
        assert!(matches!(result, Err(DdsError::TruncatedPayload { .. })));
    }

    #[test]
    fn test_dxt5_save_rejects_odd_dimensions() {
        let result = save(&Image::new(6, 4), PixelFormat::Dxt5);
        assert!(matches!(result, Err(DdsError::Check(_))));
    }
}
