//! DXT5 (S3TC / BC3) block codec.
//!
//! Each 4×4 block is 16 bytes, read LSB-first:
//!
//! ```text
//! a0: u8, a1: u8, 16 × 3-bit alpha indices      (8 bytes)
//! c0: u16 RGB565, c1: u16 RGB565, 16 × 2-bit colour indices  (8 bytes)
//! ```
//!
//! Pixels inside a block are indexed row-major, `i = y * 4 + x`.

use scmap_core::bitfield::Bitfield;
use scmap_core::checks;
use scmap_core::constants::{ARGB_BYTES_PER_PIXEL, DXT5_BLOCK_BYTES, DXT5_BLOCK_DIM};

use crate::error::DdsError;
use crate::header::{DdsHeader, DDPF_FOURCC, DDSD_LINEARSIZE, FOURCC_DXT5};
use crate::image::{surface_len, Argb};

const PIXELS_PER_BLOCK: usize = 16;

pub type Rgb = [u8; 3];
pub type Block = [Argb; PIXELS_PER_BLOCK];

pub fn sanity_checks(width: u32, height: u32) -> Result<(), DdsError> {
    checks::equal("dxt5 width % 4", width % DXT5_BLOCK_DIM, 0)?;
    checks::equal("dxt5 height % 4", height % DXT5_BLOCK_DIM, 0)?;
    Ok(())
}

pub fn payload_len(width: u32, height: u32) -> Result<usize, DdsError> {
    surface_len(width / DXT5_BLOCK_DIM, height / DXT5_BLOCK_DIM, DXT5_BLOCK_BYTES)
        .map_err(|_| DdsError::SurfaceTooLarge { width, height })
}

pub fn populate_header(width: u32, height: u32, header: &mut DdsHeader) -> Result<(), DdsError> {
    header.flags |= DDSD_LINEARSIZE;
    header.pitch_or_linear_size = u32::try_from(payload_len(width, height)?)
        .map_err(|_| DdsError::SurfaceTooLarge { width, height })?;
    header.pixel_format.flags = DDPF_FOURCC;
    header.pixel_format.four_cc = FOURCC_DXT5;
    Ok(())
}

pub fn pack_565(rgb: Rgb) -> u16 {
    ((rgb[0] as u16 >> 3) << 11) | ((rgb[1] as u16 >> 2) << 5) | (rgb[2] as u16 >> 3)
}

/// Expand RGB565 with bit replication so 0x1F maps to 255, not 248.
pub fn unpack_565(colour: u16) -> Rgb {
    let r = ((colour >> 11) & 0x1F) as u8;
    let g = ((colour >> 5) & 0x3F) as u8;
    let b = (colour & 0x1F) as u8;
    [(r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2)]
}

/// Interpolated alpha values for endpoints `a0`, `a1`.
///
/// `a0 > a1` selects the 8-value schedule (six interpolated steps), otherwise
/// four steps are interpolated and indices 6 and 7 are pinned to 0 and 255.
pub fn alpha_table(a0: u8, a1: u8) -> [u8; 8] {
    let (hi, lo) = (a0 as u32, a1 as u32);
    let mut table = [a0, a1, 0, 0, 0, 0, 0, 255];
    if a0 > a1 {
        for (i, value) in table.iter_mut().enumerate().skip(2) {
            let i = i as u32;
            *value = (((8 - i) * hi + (i - 1) * lo) / 7) as u8;
        }
    } else {
        for (i, value) in table.iter_mut().enumerate().take(6).skip(2) {
            let i = i as u32;
            *value = (((6 - i) * hi + (i - 1) * lo) / 5) as u8;
        }
    }
    table
}

/// `{c0, c1, 2/3 c0 + 1/3 c1, 1/3 c0 + 2/3 c1}`.
pub fn colour_palette(c0: u16, c1: u16) -> [Rgb; 4] {
    let a = unpack_565(c0);
    let b = unpack_565(c1);
    let lerp = |wa: u32, wb: u32| -> Rgb {
        let mut out = [0u8; 3];
        for ch in 0..3 {
            out[ch] = ((wa * a[ch] as u32 + wb * b[ch] as u32) / 3) as u8;
        }
        out
    };
    [a, b, lerp(2, 1), lerp(1, 2)]
}

pub fn decode_block(block: &[u8]) -> Result<Block, DdsError> {
    let mut bits = Bitfield::from(block);

    let a0 = bits.read_bits(8)? as u8;
    let a1 = bits.read_bits(8)? as u8;
    let alphas = alpha_table(a0, a1);
    let mut alpha_indices = [0usize; PIXELS_PER_BLOCK];
    for index in alpha_indices.iter_mut() {
        *index = bits.read_bits(3)? as usize;
    }

    let c0 = bits.read_bits(16)? as u16;
    let c1 = bits.read_bits(16)? as u16;
    let palette = colour_palette(c0, c1);

    let mut pixels = [Argb::default(); PIXELS_PER_BLOCK];
    for (pixel, alpha_index) in pixels.iter_mut().zip(alpha_indices) {
        let [r, g, b] = palette[bits.read_bits(2)? as usize];
        *pixel = Argb::new(alphas[alpha_index], r, g, b);
    }
    Ok(pixels)
}

struct AlphaFit {
    a0: u8,
    a1: u8,
    indices: [u8; PIXELS_PER_BLOCK],
}

/// Endpoints are the true max and min alpha; each pixel takes the nearest
/// table entry, ties going to the lower index.
fn fit_alpha(pixels: &Block) -> AlphaFit {
    let max = pixels.iter().map(|p| p.a).max().unwrap_or(0);
    let min = pixels.iter().map(|p| p.a).min().unwrap_or(0);
    let table = alpha_table(max, min);

    let mut indices = [0u8; PIXELS_PER_BLOCK];
    for (index, pixel) in indices.iter_mut().zip(pixels) {
        *index = nearest_alpha(&table, pixel.a);
    }
    AlphaFit {
        a0: max,
        a1: min,
        indices,
    }
}

fn nearest_alpha(table: &[u8; 8], alpha: u8) -> u8 {
    let mut best = 0;
    let mut best_error = u32::MAX;
    for (i, &value) in table.iter().enumerate() {
        let error = (value as i32 - alpha as i32).unsigned_abs();
        if error < best_error {
            best = i as u8;
            best_error = error;
        }
    }
    best
}

/// A candidate colour encoding and its total squared error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColourFit {
    pub c0: u16,
    pub c1: u16,
    pub indices: [u8; PIXELS_PER_BLOCK],
    pub error: u32,
}

fn distance_sq(a: Rgb, b: Rgb) -> u32 {
    (0..3)
        .map(|ch| {
            let d = a[ch] as i32 - b[ch] as i32;
            (d * d) as u32
        })
        .sum()
}

fn rgb_of(pixel: &Argb) -> Rgb {
    [pixel.r, pixel.g, pixel.b]
}

/// Quantise a candidate endpoint pair and assign every pixel to its nearest
/// palette entry.
pub fn fit_endpoints(pixels: &Block, first: Rgb, second: Rgb) -> ColourFit {
    let (mut c0, mut c1) = (pack_565(first), pack_565(second));
    if c0 < c1 {
        std::mem::swap(&mut c0, &mut c1);
    }
    let palette = colour_palette(c0, c1);

    let mut indices = [0u8; PIXELS_PER_BLOCK];
    let mut error = 0u32;
    for (index, pixel) in indices.iter_mut().zip(pixels) {
        let rgb = rgb_of(pixel);
        let mut best = 0;
        let mut best_error = u32::MAX;
        for (i, entry) in palette.iter().enumerate() {
            let e = distance_sq(rgb, *entry);
            if e < best_error {
                best = i as u8;
                best_error = e;
            }
        }
        *index = best;
        error += best_error;
    }

    ColourFit {
        c0,
        c1,
        indices,
        error,
    }
}

pub fn luminance(rgb: Rgb) -> u32 {
    rgb[0] as u32 + 2 * rgb[1] as u32 + rgb[2] as u32
}

/// Brightest and darkest pixel by `r + 2g + b`, first found on ties.
pub fn luminance_extremes(pixels: &Block) -> (Rgb, Rgb) {
    let mut brightest = rgb_of(&pixels[0]);
    let mut darkest = brightest;
    for pixel in &pixels[1..] {
        let rgb = rgb_of(pixel);
        if luminance(rgb) > luminance(brightest) {
            brightest = rgb;
        }
        if luminance(rgb) < luminance(darkest) {
            darkest = rgb;
        }
    }
    (brightest, darkest)
}

/// Per-channel maximum and minimum: the corners of the RGB bounding box.
pub fn rgb_extents(pixels: &Block) -> (Rgb, Rgb) {
    let mut max = [0u8; 3];
    let mut min = [255u8; 3];
    for pixel in pixels {
        let rgb = rgb_of(pixel);
        for ch in 0..3 {
            max[ch] = max[ch].max(rgb[ch]);
            min[ch] = min[ch].min(rgb[ch]);
        }
    }
    (max, min)
}

/// Shrink a bounding box by 1/16 of its extent on each side.
pub fn inset_extents((max, min): (Rgb, Rgb)) -> (Rgb, Rgb) {
    let mut inner_max = max;
    let mut inner_min = min;
    for ch in 0..3 {
        let inset = max[ch].saturating_sub(min[ch]) / 16;
        inner_max[ch] = max[ch] - inset;
        inner_min[ch] = min[ch] + inset;
    }
    (inner_max, inner_min)
}

/// Try every candidate endpoint generator and keep the lowest-error fit.
/// Earlier candidates win ties.
pub fn fit_colour(pixels: &Block) -> ColourFit {
    let extents = rgb_extents(pixels);
    let candidates = [luminance_extremes(pixels), extents, inset_extents(extents)];

    let mut best = fit_endpoints(pixels, candidates[0].0, candidates[0].1);
    for (first, second) in candidates.into_iter().skip(1) {
        if best.error == 0 {
            break;
        }
        let fit = fit_endpoints(pixels, first, second);
        if fit.error < best.error {
            best = fit;
        }
    }
    best
}

pub fn encode_block(pixels: &Block) -> Result<[u8; DXT5_BLOCK_BYTES], DdsError> {
    let alpha = fit_alpha(pixels);
    let colour = fit_colour(pixels);

    let mut bits = Bitfield::zeroed(DXT5_BLOCK_BYTES);
    bits.write_bits(8, alpha.a0 as u32)?;
    bits.write_bits(8, alpha.a1 as u32)?;
    for index in alpha.indices {
        bits.write_bits(3, index as u32)?;
    }
    bits.write_bits(16, colour.c0 as u32)?;
    bits.write_bits(16, colour.c1 as u32)?;
    for index in colour.indices {
        bits.write_bits(2, index as u32)?;
    }

    let mut out = [0u8; DXT5_BLOCK_BYTES];
    out.copy_from_slice(bits.as_bytes());
    Ok(out)
}

fn pixel_offset(width: u32, x: u32, y: u32) -> usize {
    (y as usize * width as usize + x as usize) * ARGB_BYTES_PER_PIXEL
}

pub fn load(data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, DdsError> {
    sanity_checks(width, height)?;
    let expected = payload_len(width, height)?;
    let payload = data.get(..expected).ok_or(DdsError::TruncatedPayload {
        expected,
        actual: data.len(),
    })?;

    let blocks_x = (width / DXT5_BLOCK_DIM).max(1) as usize;
    let mut pixels = vec![0u8; surface_len(width, height, ARGB_BYTES_PER_PIXEL)?];
    for (block_index, block) in payload.chunks_exact(DXT5_BLOCK_BYTES).enumerate() {
        let bx = (block_index % blocks_x) as u32 * DXT5_BLOCK_DIM;
        let by = (block_index / blocks_x) as u32 * DXT5_BLOCK_DIM;
        for (i, pixel) in decode_block(block)?.iter().enumerate() {
            let x = bx + i as u32 % DXT5_BLOCK_DIM;
            let y = by + i as u32 / DXT5_BLOCK_DIM;
            let o = pixel_offset(width, x, y);
            pixels[o..o + ARGB_BYTES_PER_PIXEL].copy_from_slice(&pixel.to_bytes());
        }
    }
    Ok(pixels)
}

pub fn save(out: &mut Vec<u8>, pixels: &[u8], width: u32, height: u32) -> Result<(), DdsError> {
    sanity_checks(width, height)?;
    let expected = surface_len(width, height, ARGB_BYTES_PER_PIXEL)?;
    if pixels.len() != expected {
        return Err(DdsError::BufferLength {
            expected,
            actual: pixels.len(),
        });
    }

    out.reserve(payload_len(width, height)?);
    for by in (0..height).step_by(DXT5_BLOCK_DIM as usize) {
        for bx in (0..width).step_by(DXT5_BLOCK_DIM as usize) {
            let mut block = [Argb::default(); PIXELS_PER_BLOCK];
            for (i, pixel) in block.iter_mut().enumerate() {
                let x = bx + i as u32 % DXT5_BLOCK_DIM;
                let y = by + i as u32 / DXT5_BLOCK_DIM;
                let o = pixel_offset(width, x, y);
                *pixel = Argb::from_bytes([pixels[o], pixels[o + 1], pixels[o + 2], pixels[o + 3]]);
            }
            out.extend_from_slice(&encode_block(&block)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::Image;

    fn solid_block(colour: Argb) -> Block {
        [colour; PIXELS_PER_BLOCK]
    }

    #[test]
    fn test_565_packing() {
        assert_eq!(pack_565([255, 255, 255]), 0xFFFF);
        assert_eq!(pack_565([255, 0, 0]), 0xF800);
        assert_eq!(pack_565([0, 255, 0]), 0x07E0);
        assert_eq!(pack_565([0, 0, 255]), 0x001F);
        assert_eq!(unpack_565(0xFFFF), [255, 255, 255]);
        assert_eq!(unpack_565(0x07E0), [0, 255, 0]);
        assert_eq!(unpack_565(0), [0, 0, 0]);
    }

    #[test]
    fn test_alpha_table_eight_value_schedule() {
        let table = alpha_table(255, 0);
        assert_eq!(table, [255, 0, 218, 182, 145, 109, 72, 36]);
    }

    #[test]
    fn test_alpha_table_six_value_schedule() {
        let table = alpha_table(10, 200);
        assert_eq!(&table[..2], &[10u8, 200]);
        assert_eq!(table[2] as u32, (4 * 10 + 200) / 5);
        assert_eq!(table[5] as u32, (10 + 4 * 200) / 5);
        assert_eq!(table[6], 0);
        assert_eq!(table[7], 255);

        // Equal endpoints fall into the same schedule.
        assert_eq!(&alpha_table(90, 90)[..6], &[90u8; 6]);
    }

    #[test]
    fn test_decode_handcrafted_block() {
        let mut bits = Bitfield::zeroed(16);
        bits.write_bits(8, 200).expect("a0");
        bits.write_bits(8, 100).expect("a1");
        for _ in 0..16 {
            bits.write_bits(3, 2).expect("alpha index");
        }
        bits.write_bits(16, 0xF800).expect("c0 red");
        bits.write_bits(16, 0x001F).expect("c1 blue");
        for _ in 0..16 {
            bits.write_bits(2, 3).expect("colour index");
        }

        let pixels = decode_block(bits.as_bytes()).expect("decode");
        for pixel in pixels {
            // (6 * 200 + 100) / 7 = 185; (255 + 2 * 0) / 3 = 85; (0 + 2 * 255) / 3 = 170
            assert_eq!(pixel, Argb::new(185, 85, 0, 170));
        }
    }

    #[test]
    fn test_solid_blocks_are_exact() {
        for colour in [
            Argb::opaque(255, 255, 255),
            Argb::opaque(255, 0, 0),
            Argb::opaque(0, 255, 0),
            Argb::opaque(0, 0, 255),
            Argb::new(17, 0, 0, 0),
        ] {
            let encoded = encode_block(&solid_block(colour)).expect("encode");
            let decoded = decode_block(&encoded).expect("decode");
            assert_eq!(decoded, solid_block(colour), "colour {colour:?}");
        }
    }

    #[test]
    fn test_quadrant_image_roundtrip() {
        let mut img = Image::new(8, 8);
        let quadrants = [
            Argb::opaque(255, 255, 255),
            Argb::opaque(255, 0, 0),
            Argb::opaque(0, 255, 0),
            Argb::opaque(0, 0, 255),
        ];
        for y in 0..8 {
            for x in 0..8 {
                let q = (y / 4 * 2 + x / 4) as usize;
                img.set_pixel(x, y, quadrants[q]);
            }
        }

        let mut encoded = Vec::new();
        save(&mut encoded, img.pixels(), 8, 8).expect("save");
        assert_eq!(encoded.len(), 4 * DXT5_BLOCK_BYTES);

        let decoded = load(&encoded, 8, 8).expect("load");
        let decoded = Image::from_pixels(8, 8, decoded).expect("8x8");
        assert_eq!(decoded.pixel(0, 0), quadrants[0]);
        assert_eq!(decoded.pixel(7, 0), quadrants[1]);
        assert_eq!(decoded.pixel(0, 7), quadrants[2]);
        assert_eq!(decoded.pixel(7, 7), quadrants[3]);
        assert_eq!(decoded, img);
    }

    #[test]
    fn test_two_tone_block_has_zero_error() {
        let mut block = solid_block(Argb::opaque(0, 0, 0));
        for pixel in block.iter_mut().step_by(3) {
            *pixel = Argb::opaque(255, 255, 255);
        }
        let fit = fit_colour(&block);
        assert_eq!(fit.error, 0);
    }

    #[test]
    fn test_alpha_extremes_are_exact() {
        let mut block = solid_block(Argb::new(0, 9, 9, 9));
        block[5].a = 255;
        block[11].a = 255;
        let decoded = decode_block(&encode_block(&block).expect("encode")).expect("decode");
        for (got, want) in decoded.iter().zip(block.iter()) {
            assert_eq!(got.a, want.a);
        }
    }

    #[test]
    fn test_alpha_gradient_error_bounded() {
        let mut block = solid_block(Argb::default());
        for (i, pixel) in block.iter_mut().enumerate() {
            pixel.a = (i * 17) as u8;
        }
        let decoded = decode_block(&encode_block(&block).expect("encode")).expect("decode");
        for (got, want) in decoded.iter().zip(block.iter()) {
            // Half of one 255/7 interpolation step.
            assert!((got.a as i32 - want.a as i32).abs() <= 19);
        }
    }

    #[test]
    fn test_luminance_extremes_are_distinct() {
        let mut block = solid_block(Argb::opaque(100, 100, 100));
        block[3] = Argb::opaque(250, 240, 230);
        block[12] = Argb::opaque(5, 10, 15);
        let (brightest, darkest) = luminance_extremes(&block);
        assert_eq!(brightest, [250, 240, 230]);
        assert_eq!(darkest, [5, 10, 15]);
    }

    #[test]
    fn test_inset_extents() {
        let (max, min) = inset_extents(([255, 160, 16], [0, 0, 16]));
        assert_eq!(max, [240, 150, 16]);
        assert_eq!(min, [15, 10, 16]);
    }

    #[test]
    fn test_best_candidate_never_worse_than_bounding_box() {
        let mut block = solid_block(Argb::default());
        for (i, pixel) in block.iter_mut().enumerate() {
            let v = (i * 16) as u8;
            *pixel = Argb::opaque(v, 255 - v, v / 2);
        }
        let (max, min) = rgb_extents(&block);
        let bbox = fit_endpoints(&block, max, min);
        assert!(fit_colour(&block).error <= bbox.error);
    }

    #[test]
    fn test_sanity_checks_require_multiple_of_four() {
        assert!(sanity_checks(8, 4).is_ok());
        assert!(matches!(sanity_checks(6, 8), Err(DdsError::Check(_))));
        assert!(sanity_checks(8, 10).is_err());
    }

    #[test]
    fn test_save_rejects_wrong_length() {
        let mut out = Vec::new();
        let result = save(&mut out, &[0u8; 63], 4, 4);
        assert!(matches!(result, Err(DdsError::BufferLength { .. })));
    }

    #[test]
    fn test_payload_len() {
        assert_eq!(payload_len(512, 512).expect("fits"), 128 * 128 * 16);
        assert_eq!(payload_len(4, 4).expect("fits"), 16);
        assert!(matches!(
            payload_len(u32::MAX - 3, u32::MAX - 3),
            Err(DdsError::SurfaceTooLarge { .. })
        ));
    }
}
