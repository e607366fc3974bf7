//! Uncompressed 32bpp ARGB. The on-disk payload is already the canonical
//! buffer, so both directions are a copy.

use scmap_core::constants::ARGB_BYTES_PER_PIXEL;

use crate::error::DdsError;
use crate::header::{
    pitch, DdsHeader, ARGB_MASKS, DDPF_ALPHAPIXELS, DDPF_RGB, DDSD_PITCH,
};
use crate::image::surface_len;

pub fn payload_len(width: u32, height: u32) -> Result<usize, DdsError> {
    surface_len(width, height, ARGB_BYTES_PER_PIXEL)
}

pub fn populate_header(width: u32, height: u32, header: &mut DdsHeader) -> Result<(), DdsError> {
    header.flags |= DDSD_PITCH;
    header.pitch_or_linear_size = pitch(width, height, ARGB_BYTES_PER_PIXEL)?;
    header.pixel_format.flags = DDPF_RGB | DDPF_ALPHAPIXELS;
    header.pixel_format.rgb_bit_count = 32;
    header.pixel_format.set_masks(ARGB_MASKS);
    Ok(())
}

pub fn load(data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, DdsError> {
    let expected = payload_len(width, height)?;
    let payload = data.get(..expected).ok_or(DdsError::TruncatedPayload {
        expected,
        actual: data.len(),
    })?;
    Ok(payload.to_vec())
}

pub fn save(out: &mut Vec<u8>, pixels: &[u8], width: u32, height: u32) -> Result<(), DdsError> {
    let expected = payload_len(width, height)?;
    if pixels.len() != expected {
        return Err(DdsError::BufferLength {
            expected,
            actual: pixels.len(),
        });
    }
    out.extend_from_slice(pixels);
    Ok(())
}
