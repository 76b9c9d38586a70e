use byteorder::{ByteOrder, LittleEndian};

use crate::status::DracoError;
use crate::version::BitstreamVersion;

/// Input buffer for reading compressed Draco data.
///
/// All multi-byte values are little-endian.
///
/// # Example
///
/// ```
/// use draco_core::DecoderBuffer;
///
/// let data = [0x44, 0x52, 0x41, 0x43, 0x4F];
/// let mut buffer = DecoderBuffer::new(&data);
///
/// assert_eq!(buffer.decode_u8().unwrap(), 0x44);
/// assert_eq!(buffer.remaining_size(), 4);
/// ```
pub struct DecoderBuffer<'a> {
    data: &'a [u8],
    pos: usize,
    version: BitstreamVersion,
}

fn end_of_buffer(need: usize, have: usize) -> DracoError {
    DracoError::IoError(format!(
        "Unexpected end of buffer: need {} bytes, have {}",
        need, have
    ))
}

impl<'a> DecoderBuffer<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            version: BitstreamVersion::MESH,
        }
    }

    /// Sets the bitstream version for version-dependent decoding.
    pub fn set_version(&mut self, version: BitstreamVersion) {
        self.version = version;
    }

    pub fn version(&self) -> BitstreamVersion {
        self.version
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining_size(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Decodes and returns a slice of the specified size.
    pub fn decode_slice(&mut self, size: usize) -> Result<&'a [u8], DracoError> {
        if size > self.remaining_size() {
            return Err(end_of_buffer(size, self.remaining_size()));
        }
        let slice = &self.data[self.pos..self.pos + size];
        self.pos += size;
        Ok(slice)
    }

    pub fn decode_bytes(&mut self, out: &mut [u8]) -> Result<(), DracoError> {
        let src = self.decode_slice(out.len())?;
        out.copy_from_slice(src);
        Ok(())
    }

    pub fn decode_u8(&mut self) -> Result<u8, DracoError> {
        Ok(self.decode_slice(1)?[0])
    }

    pub fn decode_i8(&mut self) -> Result<i8, DracoError> {
        Ok(self.decode_u8()? as i8)
    }

    pub fn decode_u16(&mut self) -> Result<u16, DracoError> {
        Ok(LittleEndian::read_u16(self.decode_slice(2)?))
    }

    pub fn decode_u32(&mut self) -> Result<u32, DracoError> {
        Ok(LittleEndian::read_u32(self.decode_slice(4)?))
    }

    pub fn decode_f32(&mut self) -> Result<f32, DracoError> {
        Ok(LittleEndian::read_f32(self.decode_slice(4)?))
    }

    /// Decodes a variable-length unsigned integer (varint).
    pub fn decode_varint(&mut self) -> Result<u64, DracoError> {
        let mut val = 0u64;
        let mut shift = 0;
        loop {
            let b = self.decode_u8()?;
            val |= ((b & 0x7F) as u64) << shift;
            if (b & 0x80) == 0 {
                break;
            }
            shift += 7;
            if shift >= 64 {
                return Err(DracoError::IoError("Varint exceeds 64 bits".into()));
            }
        }
        Ok(val)
    }

    /// Decodes a varint that must fit in a `u32`.
    pub fn decode_varint_u32(&mut self) -> Result<u32, DracoError> {
        let v = self.decode_varint()?;
        u32::try_from(v).map_err(|_| DracoError::IoError(format!("Varint {} exceeds 32 bits", v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian() {
        let data = [0x34, 0x12, 0x78, 0x56, 0x34, 0x12];
        let mut buffer = DecoderBuffer::new(&data);
        assert_eq!(buffer.decode_u16().unwrap(), 0x1234);
        assert_eq!(buffer.decode_u32().unwrap(), 0x1234_5678);
        assert_eq!(buffer.remaining_size(), 0);
        assert!(buffer.decode_u8().is_err());
    }

    #[test]
    fn reads_varint() {
        let data = [0xAC, 0x02, 0x05];
        let mut buffer = DecoderBuffer::new(&data);
        assert_eq!(buffer.decode_varint().unwrap(), 300);
        assert_eq!(buffer.decode_varint_u32().unwrap(), 5);
        assert_eq!(buffer.position(), 3);
    }

    #[test]
    fn short_slice_does_not_advance() {
        let data = [1u8, 2];
        let mut buffer = DecoderBuffer::new(&data);
        assert!(buffer.decode_slice(3).is_err());
        assert_eq!(buffer.position(), 0);
    }
}
