use log::debug;

use crate::attribute_quantization_transform::{AttributeQuantizationTransform, QUANTIZATION_BITS_RANGE};
use crate::compression_config::{SequentialAttributeEncoderType, PREDICTION_NONE};
use crate::draco_types::{swap_le_in_place, DataType};
use crate::encoder_buffer::EncoderBuffer;
use crate::encoder_options::EncoderOptions;
use crate::point_cloud::PointCloud;
use crate::quantization_utils::convert_signed_int_to_symbol;
use crate::status::{DracoError, Status, StatusOr};

/// Encodes the values of one attribute in point order.
pub enum SequentialAttributeEncoder {
    Generic { attribute_id: i32 },
    Quantization {
        attribute_id: i32,
        transform: AttributeQuantizationTransform,
    },
}

impl SequentialAttributeEncoder {
    /// Picks the payload kind for an attribute. Float32 attributes with a
    /// configured quantization depth are quantized, everything else is raw.
    pub fn for_attribute(
        point_cloud: &PointCloud,
        attribute_id: i32,
        options: &EncoderOptions,
    ) -> StatusOr<Self> {
        let att = point_cloud
            .attribute(attribute_id)
            .ok_or_else(|| DracoError::InvalidParameter(format!("Invalid attribute id {}", attribute_id)))?;
        let bits = options.quantization_bits(attribute_id, att.attribute_type());
        if bits <= 0 || att.data_type() != DataType::Float32 {
            return Ok(SequentialAttributeEncoder::Generic { attribute_id });
        }
        if !QUANTIZATION_BITS_RANGE.contains(&bits) {
            return Err(DracoError::DracoError("Invalid quantization bits.".into()));
        }
        let mut transform = AttributeQuantizationTransform::new();
        if !transform.compute_parameters(att, bits) {
            return Err(DracoError::DracoError("Failed to compute quantization parameters.".into()));
        }
        Ok(SequentialAttributeEncoder::Quantization { attribute_id, transform })
    }

    pub fn attribute_id(&self) -> i32 {
        match self {
            SequentialAttributeEncoder::Generic { attribute_id }
            | SequentialAttributeEncoder::Quantization { attribute_id, .. } => *attribute_id,
        }
    }

    pub fn encoder_type(&self) -> SequentialAttributeEncoderType {
        match self {
            SequentialAttributeEncoder::Generic { .. } => SequentialAttributeEncoderType::Generic,
            SequentialAttributeEncoder::Quantization { .. } => SequentialAttributeEncoderType::Quantization,
        }
    }

    pub fn encode_values(&self, point_cloud: &PointCloud, out_buffer: &mut EncoderBuffer) -> Status {
        let att = point_cloud
            .attribute(self.attribute_id())
            .ok_or_else(|| DracoError::DracoError("Missing attribute.".into()))?;
        match self {
            SequentialAttributeEncoder::Generic { .. } => {
                let stride = att.byte_stride() as usize;
                let mut entry = vec![0u8; stride];
                for p in 0..point_cloud.num_points() {
                    let bytes = att
                        .value_bytes(att.mapped_index(p.into()))
                        .ok_or_else(|| DracoError::DracoError("Attribute has fewer values than points.".into()))?;
                    entry.copy_from_slice(bytes);
                    swap_le_in_place(att.data_type(), &mut entry);
                    out_buffer.encode_bytes(&entry);
                }
                Ok(())
            }
            SequentialAttributeEncoder::Quantization { transform, .. } => {
                let values = transform.quantize(att);
                if values.len() != point_cloud.num_points() * att.num_components() as usize {
                    return Err(DracoError::DracoError("Attribute has fewer values than points.".into()));
                }
                encode_integer_values(&values, out_buffer);
                Ok(())
            }
        }
    }

    pub fn encode_data_needed_by_portable_transform(&self, out_buffer: &mut EncoderBuffer) {
        if let SequentialAttributeEncoder::Quantization { transform, .. } = self {
            transform.encode_parameters(out_buffer);
        }
    }
}

/// Writes integer values without prediction as raw zig-zag symbols.
fn encode_integer_values(values: &[i32], out_buffer: &mut EncoderBuffer) {
    out_buffer.encode_i8(PREDICTION_NONE);
    let symbols: Vec<u32> = values.iter().map(|&v| convert_signed_int_to_symbol(v)).collect();
    // Symbols are stored raw rather than entropy coded.
    out_buffer.encode_u8(0);
    let masked = symbols.iter().fold(0u32, |acc, &s| acc | s);
    let msb = if masked == 0 { 0 } else { 31 - masked.leading_zeros() };
    let num_bytes = 1 + msb / 8;
    out_buffer.encode_u8(num_bytes as u8);
    for s in symbols {
        out_buffer.encode_bytes(&s.to_le_bytes()[..num_bytes as usize]);
    }
}

/// Writes the attributes block of a point cloud or mesh.
pub fn encode_attributes(
    point_cloud: &PointCloud,
    options: &EncoderOptions,
    out_buffer: &mut EncoderBuffer,
) -> Status {
    let num_attributes = point_cloud.num_attributes();
    if num_attributes == 0 {
        out_buffer.encode_u8(0);
        return Ok(());
    }
    // All attributes share a single sequential attributes encoder.
    out_buffer.encode_u8(1);

    let encoders = (0..num_attributes)
        .map(|id| SequentialAttributeEncoder::for_attribute(point_cloud, id, options))
        .collect::<StatusOr<Vec<_>>>()?;

    out_buffer.encode_varint(num_attributes as u64);
    for att in point_cloud.attributes() {
        out_buffer.encode_u8(att.attribute_type() as u8);
        out_buffer.encode_u8(att.data_type() as u8);
        out_buffer.encode_u8(att.num_components());
        out_buffer.encode_u8(u8::from(att.normalized()));
        out_buffer.encode_varint(att.unique_id() as u64);
    }
    for encoder in &encoders {
        out_buffer.encode_u8(encoder.encoder_type() as u8);
    }
    for encoder in &encoders {
        encoder.encode_values(point_cloud, out_buffer)?;
        debug!(
            "encoded attribute {} as {:?}",
            encoder.attribute_id(),
            encoder.encoder_type()
        );
    }
    for encoder in &encoders {
        encoder.encode_data_needed_by_portable_transform(out_buffer);
    }
    Ok(())
}
