//! LSB-first bit cursor over a byte buffer.
//!
//! Bit 0 of the stream is bit 0 of byte 0; values wider than the remainder
//! of a byte continue in the low bits of the next byte. This is the layout of
//! DXT5 alpha and colour index tables.

use crate::error::BitfieldError;

/// Widest value a single read or write may move.
pub const MAX_BITS: u32 = 32;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bitfield {
    bytes: Vec<u8>,
    offset: usize,
}

impl Bitfield {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes, offset: 0 }
    }

    /// A cursor over the 4 little-endian bytes of `value`.
    pub fn from_u32(value: u32) -> Self {
        Self::new(value.to_le_bytes().to_vec())
    }

    /// A cursor over `len` zero bytes, ready for writing.
    pub fn zeroed(len: usize) -> Self {
        Self::new(vec![0u8; len])
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn capacity_bits(&self) -> usize {
        self.bytes.len() * 8
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }

    pub fn seek_bits(&mut self, offset: usize) -> Result<(), BitfieldError> {
        if offset > self.capacity_bits() {
            return Err(BitfieldError::SeekOutOfBounds {
                offset,
                capacity: self.capacity_bits(),
            });
        }
        self.offset = offset;
        Ok(())
    }

    fn check_access(&self, bits: u32) -> Result<(), BitfieldError> {
        if bits > MAX_BITS {
            return Err(BitfieldError::InvalidWidth(bits));
        }
        if self.offset + bits as usize > self.capacity_bits() {
            return Err(BitfieldError::OutOfBounds {
                offset: self.offset,
                bits,
                capacity: self.capacity_bits(),
            });
        }
        Ok(())
    }

    /// Consume `bits` bits and return them as an unsigned integer.
    pub fn read_bits(&mut self, bits: u32) -> Result<u32, BitfieldError> {
        self.check_access(bits)?;

        let mut value = 0u64;
        let mut shift = 0u32;
        let mut remaining = bits;
        while remaining > 0 {
            let byte = self.bytes[self.offset / 8];
            let bit = (self.offset % 8) as u32;
            let take = remaining.min(8 - bit);
            let mask = (1u32 << take) - 1;
            let chunk = (byte as u32 >> bit) & mask;

            value |= (chunk as u64) << shift;
            shift += take;
            remaining -= take;
            self.offset += take as usize;
        }

        Ok(value as u32)
    }

    /// Write the low `bits` bits of `value`, leaving all other bits of the
    /// touched bytes unchanged.
    pub fn write_bits(&mut self, bits: u32, value: u32) -> Result<(), BitfieldError> {
        self.check_access(bits)?;

        let mut value = value as u64;
        let mut remaining = bits;
        while remaining > 0 {
            let index = self.offset / 8;
            let bit = (self.offset % 8) as u32;
            let take = remaining.min(8 - bit);
            let mask = ((1u32 << take) - 1) as u8;
            let chunk = (value as u8) & mask;

            self.bytes[index] = (self.bytes[index] & !(mask << bit)) | (chunk << bit);
            value >>= take;
            remaining -= take;
            self.offset += take as usize;
        }

        Ok(())
    }
}

impl From<&[u8]> for Bitfield {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes.to_vec())
    }
}

impl From<Vec<u8>> for Bitfield {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read_is_value_mod_width() {
        let mut field = Bitfield::zeroed(8);
        field.seek_bits(5).expect("seek");
        field.write_bits(11, 0xFFFF_1234).expect("write");

        field.seek_bits(5).expect("seek");
        assert_eq!(field.read_bits(11).expect("read"), 0x1234 & 0x7FF);
        assert_eq!(field.offset(), 16);
    }

    #[test]
    fn test_nibbles_compose_into_byte() {
        let mut field = Bitfield::new(vec![0xA7, 0x3C]);
        let low = field.read_bits(4).expect("low nibble");
        let high = field.read_bits(4).expect("high nibble");

        field.reset();
        let whole = field.read_bits(8).expect("byte");
        assert_eq!(low + high * 16, whole);
        assert_eq!(whole, 0xA7);
    }

    #[test]
    fn test_read_across_byte_boundary() {
        // 0b1011_0000, 0b0000_0110 -> bits 4..12 = 0b0110_1011
        let mut field = Bitfield::new(vec![0b1011_0000, 0b0000_0110]);
        field.seek_bits(4).expect("seek");
        assert_eq!(field.read_bits(8).expect("read"), 0b0110_1011);
    }

    #[test]
    fn test_write_preserves_neighbouring_bits() {
        let mut field = Bitfield::new(vec![0xFF, 0xFF]);
        field.seek_bits(6).expect("seek");
        field.write_bits(4, 0).expect("write");
        assert_eq!(field.as_bytes(), &[0b0011_1111, 0b1111_1100]);
    }

    #[test]
    fn test_full_width_u32() {
        let mut field = Bitfield::from_u32(0xDEAD_BEEF);
        assert_eq!(field.read_bits(32).expect("read"), 0xDEAD_BEEF);

        field.reset();
        field.write_bits(32, 0x0102_0304).expect("write");
        assert_eq!(field.into_bytes(), vec![0x04, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn test_read_past_end_fails() {
        let mut field = Bitfield::zeroed(2);
        field.seek_bits(10).expect("seek");
        let result = field.read_bits(7);
        assert!(matches!(
            result,
            Err(BitfieldError::OutOfBounds {
                offset: 10,
                bits: 7,
                capacity: 16
            })
        ));
    }

    #[test]
    fn test_write_past_end_fails() {
        let mut field = Bitfield::zeroed(1);
        assert!(field.write_bits(9, 1).is_err());
        field.seek_bits(8).expect("seek to end is allowed");
        assert!(field.write_bits(1, 1).is_err());
        assert!(field.write_bits(0, 1).is_ok());
    }

    #[test]
    fn test_width_over_32_rejected() {
        let mut field = Bitfield::zeroed(16);
        assert!(matches!(
            field.read_bits(33),
            Err(BitfieldError::InvalidWidth(33))
        ));
    }

    #[test]
    fn test_seek_past_end_rejected() {
        let mut field = Bitfield::zeroed(1);
        assert!(field.seek_bits(9).is_err());
    }
}
