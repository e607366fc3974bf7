//! Forward-only little-endian cursor over a fully materialised map buffer,
//! and the matching writer.

use glam::{Vec2, Vec3, Vec4};

use crate::error::MapError;

pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Borrow the next `len` bytes and advance past them.
    pub fn take(&mut self, len: usize) -> Result<&'a [u8], MapError> {
        if len > self.remaining() {
            return Err(MapError::UnexpectedEof {
                offset: self.pos,
                needed: len,
                available: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], MapError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, MapError> {
        Ok(self.take_array::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, MapError> {
        Ok(u16::from_le_bytes(self.take_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, MapError> {
        Ok(u32::from_le_bytes(self.take_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32, MapError> {
        Ok(i32::from_le_bytes(self.take_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32, MapError> {
        Ok(f32::from_le_bytes(self.take_array()?))
    }

    pub fn read_vec2(&mut self) -> Result<Vec2, MapError> {
        Ok(Vec2::new(self.read_f32()?, self.read_f32()?))
    }

    pub fn read_vec3(&mut self) -> Result<Vec3, MapError> {
        Ok(Vec3::new(self.read_f32()?, self.read_f32()?, self.read_f32()?))
    }

    pub fn read_vec4(&mut self) -> Result<Vec4, MapError> {
        Ok(Vec4::new(
            self.read_f32()?,
            self.read_f32()?,
            self.read_f32()?,
            self.read_f32()?,
        ))
    }

    /// `count` little-endian u16 samples.
    pub fn read_u16_vec(&mut self, count: usize) -> Result<Vec<u16>, MapError> {
        let bytes = self.take(count * 2)?;
        Ok(bytes
            .chunks_exact(2)
            .map(|b| u16::from_le_bytes([b[0], b[1]]))
            .collect())
    }

    /// NUL-terminated string. The terminator is consumed.
    pub fn read_string(&mut self) -> Result<String, MapError> {
        let start = self.pos;
        let rest = &self.data[self.pos..];
        let len = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or(MapError::UnexpectedEof {
                offset: start,
                needed: rest.len() + 1,
                available: rest.len(),
            })?;
        let bytes = self.take(len)?;
        self.pos += 1;
        String::from_utf8(bytes.to_vec()).map_err(|_| MapError::InvalidString(start))
    }

    /// u32 length followed by that many bytes, no terminator.
    pub fn read_sized_string(&mut self) -> Result<String, MapError> {
        let len = self.read_u32()? as usize;
        let start = self.pos;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| MapError::InvalidString(start))
    }
}

#[derive(Debug, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_f32(&mut self, value: f32) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_vec2(&mut self, v: Vec2) {
        v.to_array().into_iter().for_each(|c| self.write_f32(c));
    }

    pub fn write_vec3(&mut self, v: Vec3) {
        v.to_array().into_iter().for_each(|c| self.write_f32(c));
    }

    pub fn write_vec4(&mut self, v: Vec4) {
        v.to_array().into_iter().for_each(|c| self.write_f32(c));
    }

    pub fn write_u16_slice(&mut self, values: &[u16]) {
        self.buf.reserve(values.len() * 2);
        for v in values {
            self.write_u16(*v);
        }
    }

    pub fn write_string(&mut self, s: &str) {
        self.write_bytes(s.as_bytes());
        self.write_u8(0);
    }

    pub fn write_sized_string(&mut self, s: &str) {
        self.write_u32(s.len() as u32);
        self.write_bytes(s.as_bytes());
    }
}

/// Encoded size of a NUL-terminated string.
pub fn string_len(s: &str) -> usize {
    s.len() + 1
}

/// Encoded size of a u32-length-prefixed string.
pub fn sized_string_len(s: &str) -> usize {
    4 + s.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_roundtrip() {
        let mut w = ByteWriter::new();
        w.write_u8(7);
        w.write_u16(0xBEEF);
        w.write_i32(-1);
        w.write_f32(1.5);
        w.write_vec3(Vec3::new(1.0, 2.0, 3.0));
        w.write_string("abc");
        w.write_sized_string("xyz");
        let bytes = w.into_inner();
        assert_eq!(bytes.len(), 1 + 2 + 4 + 4 + 12 + 4 + 7);

        let mut r = ByteReader::new(&bytes);
        assert_eq!(r.read_u8().expect("u8"), 7);
        assert_eq!(r.read_u16().expect("u16"), 0xBEEF);
        assert_eq!(r.read_i32().expect("i32"), -1);
        assert_eq!(r.read_f32().expect("f32"), 1.5);
        assert_eq!(r.read_vec3().expect("vec3"), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(r.read_string().expect("string"), "abc");
        assert_eq!(r.read_sized_string().expect("sized string"), "xyz");
        assert!(r.is_empty());
    }

    #[test]
    fn test_read_past_end_reports_offset() {
        let mut r = ByteReader::new(&[1, 2, 3]);
        r.read_u16().expect("u16");
        let err = r.read_u32().unwrap_err();
        assert!(matches!(
            err,
            MapError::UnexpectedEof {
                offset: 2,
                needed: 4,
                available: 1
            }
        ));
    }

    #[test]
    fn test_unterminated_string_fails() {
        let mut r = ByteReader::new(b"abc");
        assert!(matches!(
            r.read_string(),
            Err(MapError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let mut r = ByteReader::new(&[0xFF, 0xFE, 0x00]);
        assert!(matches!(r.read_string(), Err(MapError::InvalidString(0))));
    }

    #[test]
    fn test_u16_vec() {
        let mut w = ByteWriter::new();
        w.write_u16_slice(&[1, 2, 65535]);
        let bytes = w.into_inner();
        let mut r = ByteReader::new(&bytes);
        assert_eq!(r.read_u16_vec(3).expect("samples"), vec![1, 2, 65535]);
    }
}
