use byteorder::{ByteOrder, NativeEndian};

use crate::decoder_buffer::DecoderBuffer;
use crate::draco_types::DataType;
use crate::encoder_buffer::EncoderBuffer;
use crate::geometry_attribute::PointAttribute;
use crate::quantization_utils::{max_quantized_value, Dequantizer, Quantizer};
use crate::status::{DracoError, Status};

/// Valid quantization depths for float attributes.
pub const QUANTIZATION_BITS_RANGE: std::ops::RangeInclusive<i32> = 1..=30;

/// Uniform quantization of a float32 attribute over its bounding box.
#[derive(Debug, Clone)]
pub struct AttributeQuantizationTransform {
    quantization_bits: i32,
    min_values: Vec<f32>,
    range: f32,
}

impl Default for AttributeQuantizationTransform {
    fn default() -> Self {
        Self {
            quantization_bits: -1,
            min_values: Vec::new(),
            range: 0.0,
        }
    }
}

impl AttributeQuantizationTransform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quantization_bits(&self) -> i32 {
        self.quantization_bits
    }

    pub fn min_values(&self) -> &[f32] {
        &self.min_values
    }

    pub fn range(&self) -> f32 {
        self.range
    }

    pub fn set_parameters(&mut self, quantization_bits: i32, min_values: &[f32], range: f32) -> bool {
        if !QUANTIZATION_BITS_RANGE.contains(&quantization_bits) {
            return false;
        }
        self.quantization_bits = quantization_bits;
        self.min_values = min_values.to_vec();
        self.range = range;
        true
    }

    /// Computes the bounding box of a float32 attribute.
    pub fn compute_parameters(&mut self, attribute: &PointAttribute, quantization_bits: i32) -> bool {
        if !QUANTIZATION_BITS_RANGE.contains(&quantization_bits)
            || attribute.data_type() != DataType::Float32
        {
            return false;
        }
        self.quantization_bits = quantization_bits;
        let num_components = attribute.num_components() as usize;
        self.min_values = vec![f32::MAX; num_components];
        let mut max_values = vec![f32::MIN; num_components];

        for entry in attribute.buffer().data().chunks_exact(num_components * 4) {
            for (c, bytes) in entry.chunks_exact(4).enumerate() {
                let val = NativeEndian::read_f32(bytes);
                self.min_values[c] = self.min_values[c].min(val);
                max_values[c] = max_values[c].max(val);
            }
        }
        if attribute.size() == 0 {
            self.min_values.iter_mut().for_each(|v| *v = 0.0);
            max_values.iter_mut().for_each(|v| *v = 0.0);
        }

        self.range = self
            .min_values
            .iter()
            .zip(&max_values)
            .map(|(lo, hi)| hi - lo)
            .fold(0.0, f32::max);
        if self.range == 0.0 {
            self.range = 1.0;
        }
        true
    }

    /// Quantizes every component of `attribute`, entry-major.
    pub fn quantize(&self, attribute: &PointAttribute) -> Vec<i32> {
        let mut quantizer = Quantizer::new();
        quantizer.init(self.range, max_quantized_value(self.quantization_bits));
        let num_components = attribute.num_components() as usize;
        let mut values = Vec::with_capacity(attribute.size() * num_components);
        for entry in attribute.buffer().data().chunks_exact(num_components * 4) {
            for (c, bytes) in entry.chunks_exact(4).enumerate() {
                let val = NativeEndian::read_f32(bytes) - self.min_values[c];
                values.push(quantizer.quantize_float(val));
            }
        }
        values
    }

    /// Writes dequantized floats for `values` into a float32 attribute.
    pub fn dequantize_into(&self, values: &[i32], attribute: &mut PointAttribute) -> bool {
        if attribute.data_type() != DataType::Float32
            || !QUANTIZATION_BITS_RANGE.contains(&self.quantization_bits)
        {
            return false;
        }
        let num_components = attribute.num_components() as usize;
        if self.min_values.len() != num_components
            || values.len() != attribute.size() * num_components
        {
            return false;
        }
        let mut dequantizer = Dequantizer::new();
        if !dequantizer.init(self.range, max_quantized_value(self.quantization_bits)) {
            return false;
        }
        let data = attribute.buffer_mut().data_mut();
        for (i, (&q, bytes)) in values.iter().zip(data.chunks_exact_mut(4)).enumerate() {
            let val = dequantizer.dequantize_float(q) + self.min_values[i % num_components];
            NativeEndian::write_f32(bytes, val);
        }
        true
    }

    pub fn encode_parameters(&self, encoder_buffer: &mut EncoderBuffer) {
        for &val in &self.min_values {
            encoder_buffer.encode_f32(val);
        }
        encoder_buffer.encode_f32(self.range);
        encoder_buffer.encode_u8(self.quantization_bits as u8);
    }

    pub fn decode_parameters(
        &mut self,
        attribute: &PointAttribute,
        decoder_buffer: &mut DecoderBuffer,
    ) -> Status {
        let num_components = attribute.num_components() as usize;
        self.min_values = (0..num_components)
            .map(|_| decoder_buffer.decode_f32())
            .collect::<Result<_, _>>()?;
        self.range = decoder_buffer.decode_f32()?;
        self.quantization_bits = decoder_buffer.decode_u8()? as i32;
        if !QUANTIZATION_BITS_RANGE.contains(&self.quantization_bits) {
            return Err(DracoError::DracoError(format!(
                "Invalid quantization bits {}",
                self.quantization_bits
            )));
        }
        Ok(())
    }
}
