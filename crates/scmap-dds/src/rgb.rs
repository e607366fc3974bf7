//! Uncompressed 24bpp RGB. Alpha is synthesised as 255 on load and dropped on save.

use scmap_core::constants::{ARGB_BYTES_PER_PIXEL, RGB_BYTES_PER_PIXEL};

use crate::error::DdsError;
use crate::header::{pitch, DdsHeader, DDPF_RGB, DDSD_PITCH, RGB_MASKS};
use crate::image::surface_len;

pub fn payload_len(width: u32, height: u32) -> Result<usize, DdsError> {
    surface_len(width, height, RGB_BYTES_PER_PIXEL)
}

pub fn populate_header(width: u32, height: u32, header: &mut DdsHeader) -> Result<(), DdsError> {
    header.flags |= DDSD_PITCH;
    header.pitch_or_linear_size = pitch(width, height, RGB_BYTES_PER_PIXEL)?;
    header.pixel_format.flags = DDPF_RGB;
    header.pixel_format.rgb_bit_count = 24;
    header.pixel_format.set_masks(RGB_MASKS);
    Ok(())
}

pub fn load(data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, DdsError> {
    let expected = payload_len(width, height)?;
    let payload = data.get(..expected).ok_or(DdsError::TruncatedPayload {
        expected,
        actual: data.len(),
    })?;

    let mut pixels =
        Vec::with_capacity(expected / RGB_BYTES_PER_PIXEL * ARGB_BYTES_PER_PIXEL);
    for bgr in payload.chunks_exact(RGB_BYTES_PER_PIXEL) {
        pixels.extend_from_slice(bgr);
        pixels.push(255);
    }
    Ok(pixels)
}

pub fn save(out: &mut Vec<u8>, pixels: &[u8], width: u32, height: u32) -> Result<(), DdsError> {
    let expected = surface_len(width, height, ARGB_BYTES_PER_PIXEL)?;
    if pixels.len() != expected {
        return Err(DdsError::BufferLength {
            expected,
            actual: pixels.len(),
        });
    }

    out.reserve(payload_len(width, height)?);
    for bgra in pixels.chunks_exact(ARGB_BYTES_PER_PIXEL) {
        out.extend_from_slice(&bgra[..RGB_BYTES_PER_PIXEL]);
    }
    Ok(())
}
