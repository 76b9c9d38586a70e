use byteorder::{LittleEndian, WriteBytesExt};

/// Output buffer for Draco serialization. Multi-byte values are little-endian.
#[derive(Debug, Clone, Default)]
pub struct EncoderBuffer {
    buffer: Vec<u8>,
}

impl EncoderBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn data(&self) -> &[u8] {
        &self.buffer
    }

    pub fn size(&self) -> usize {
        self.buffer.len()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buffer
    }

    pub fn encode_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn encode_i8(&mut self, value: i8) {
        self.buffer.push(value as u8);
    }

    // Writes into a Vec<u8> cannot fail.
    pub fn encode_u16(&mut self, value: u16) {
        let _ = self.buffer.write_u16::<LittleEndian>(value);
    }

    pub fn encode_u32(&mut self, value: u32) {
        let _ = self.buffer.write_u32::<LittleEndian>(value);
    }

    pub fn encode_f32(&mut self, value: f32) {
        let _ = self.buffer.write_f32::<LittleEndian>(value);
    }

    pub fn encode_bytes(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Encodes a variable-length unsigned integer (varint).
    pub fn encode_varint(&mut self, mut value: u64) {
        loop {
            let mut byte = (value & 0x7F) as u8;
            value >>= 7;
            if value != 0 {
                byte |= 0x80;
            }
            self.buffer.push(byte);
            if value == 0 {
                break;
            }
        }
    }
}
