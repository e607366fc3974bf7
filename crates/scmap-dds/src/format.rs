use crate::error::DdsError;
use crate::header::DdsHeader;
use crate::{argb, dxt5, rgb};

/// The closed set of pixel formats this codec reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Argb8888,
    Rgb888,
    Dxt5,
}

impl PixelFormat {
    pub fn name(self) -> &'static str {
        match self {
            PixelFormat::Argb8888 => "ARGB8888",
            PixelFormat::Rgb888 => "RGB888",
            PixelFormat::Dxt5 => "DXT5",
        }
    }

    /// Format-specific preconditions on the surface dimensions.
    pub fn sanity_checks(self, width: u32, height: u32) -> Result<(), DdsError> {
        match self {
            PixelFormat::Argb8888 | PixelFormat::Rgb888 => Ok(()),
            PixelFormat::Dxt5 => dxt5::sanity_checks(width, height),
        }
    }

    /// Set the format-selection flags, masks and pitch on a fresh header.
    pub fn populate_header(
        self,
        width: u32,
        height: u32,
        header: &mut DdsHeader,
    ) -> Result<(), DdsError> {
        match self {
            PixelFormat::Argb8888 => argb::populate_header(width, height, header),
            PixelFormat::Rgb888 => rgb::populate_header(width, height, header),
            PixelFormat::Dxt5 => dxt5::populate_header(width, height, header),
        }
    }

    /// Encoded payload size, excluding the DDS magic and header.
    pub fn payload_len(self, width: u32, height: u32) -> Result<usize, DdsError> {
        match self {
            PixelFormat::Argb8888 => argb::payload_len(width, height),
            PixelFormat::Rgb888 => rgb::payload_len(width, height),
            PixelFormat::Dxt5 => dxt5::payload_len(width, height),
        }
    }

    /// Decode a payload into a canonical ARGB buffer.
    pub fn load(self, data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, DdsError> {
        match self {
            PixelFormat::Argb8888 => argb::load(data, width, height),
            PixelFormat::Rgb888 => rgb::load(data, width, height),
            PixelFormat::Dxt5 => dxt5::load(data, width, height),
        }
    }

    /// Encode a canonical ARGB buffer, appending the payload to `out`.
    pub fn save(
        self,
        out: &mut Vec<u8>,
        pixels: &[u8],
        width: u32,
        height: u32,
    ) -> Result<(), DdsError> {
        match self {
            PixelFormat::Argb8888 => argb::save(out, pixels, width, height),
            PixelFormat::Rgb888 => rgb::save(out, pixels, width, height),
            PixelFormat::Dxt5 => dxt5::save(out, pixels, width, height),
        }
    }
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
