use log::debug;

use crate::attribute_quantization_transform::AttributeQuantizationTransform;
use crate::compression_config::{SequentialAttributeEncoderType, PREDICTION_NONE};
use crate::decoder_buffer::DecoderBuffer;
use crate::draco_types::{swap_le_in_place, DataType};
use crate::geometry_attribute::{GeometryAttributeType, PointAttribute};
use crate::point_cloud::PointCloud;
use crate::quantization_utils::convert_symbol_to_signed_int;
use crate::status::{DracoError, Status};

fn attributes_error() -> DracoError {
    DracoError::DracoError("Failed to decode point attributes.".into())
}

/// Reads raw zig-zag symbols written without prediction.
fn decode_integer_values(num_values: usize, buffer: &mut DecoderBuffer) -> Result<Vec<i32>, DracoError> {
    let prediction = buffer.decode_i8()?;
    if prediction != PREDICTION_NONE {
        debug!("prediction scheme {} is not supported", prediction);
        return Err(attributes_error());
    }
    let compressed = buffer.decode_u8()?;
    if compressed != 0 {
        debug!("entropy coded attribute values are not supported");
        return Err(attributes_error());
    }
    let num_bytes = buffer.decode_u8()? as usize;
    if !(1..=4).contains(&num_bytes) {
        return Err(attributes_error());
    }
    let data = buffer.decode_slice(num_values.checked_mul(num_bytes).ok_or_else(attributes_error)?)?;
    Ok(data
        .chunks_exact(num_bytes)
        .map(|chunk| {
            let mut symbol = [0u8; 4];
            symbol[..num_bytes].copy_from_slice(chunk);
            convert_symbol_to_signed_int(u32::from_le_bytes(symbol))
        })
        .collect())
}

struct AttributeDescriptor {
    role: GeometryAttributeType,
    data_type: DataType,
    num_components: u8,
    normalized: bool,
    unique_id: u32,
}

impl AttributeDescriptor {
    fn decode(buffer: &mut DecoderBuffer) -> Result<Self, DracoError> {
        let role = GeometryAttributeType::from_tag(buffer.decode_u8()? as i64);
        let data_type = DataType::from(buffer.decode_u8()?);
        let num_components = buffer.decode_u8()?;
        let normalized = buffer.decode_u8()? != 0;
        let unique_id = buffer.decode_varint_u32()?;
        if role == GeometryAttributeType::Invalid
            || data_type == DataType::Invalid
            || !(1..=4).contains(&num_components)
        {
            return Err(attributes_error());
        }
        Ok(AttributeDescriptor {
            role,
            data_type,
            num_components,
            normalized,
            unique_id,
        })
    }

    /// Fewest payload bytes `num_points` values can take. Quantized symbols
    /// use at least one byte each.
    fn min_payload_size(&self, num_points: usize, decoder_type: SequentialAttributeEncoderType) -> Option<usize> {
        let num_values = num_points.checked_mul(self.num_components as usize)?;
        match decoder_type {
            SequentialAttributeEncoderType::Quantization => Some(num_values),
            _ => num_values.checked_mul(self.data_type.byte_length()),
        }
    }
}

struct PendingAttribute {
    attribute_id: i32,
    decoder_type: SequentialAttributeEncoderType,
    quantized: Vec<i32>,
    transform: AttributeQuantizationTransform,
}

/// Reads the attributes block into `point_cloud`, whose point count must
/// already be set.
pub fn decode_attributes(buffer: &mut DecoderBuffer, point_cloud: &mut PointCloud) -> Status {
    let num_encoders = buffer.decode_u8().map_err(|_| attributes_error())?;
    for _ in 0..num_encoders {
        decode_attributes_block(buffer, point_cloud).map_err(|err| {
            debug!("attribute block: {}", err);
            attributes_error()
        })?;
    }
    Ok(())
}

fn decode_attributes_block(buffer: &mut DecoderBuffer, point_cloud: &mut PointCloud) -> Status {
    let num_points = point_cloud.num_points();
    let num_attributes = buffer.decode_varint_u32()? as usize;
    // Each descriptor takes at least five bytes.
    if num_attributes == 0 || num_attributes > buffer.remaining_size() / 5 {
        return Err(attributes_error());
    }

    let descriptors = (0..num_attributes)
        .map(|_| AttributeDescriptor::decode(buffer))
        .collect::<Result<Vec<_>, _>>()?;
    let decoder_types = (0..num_attributes)
        .map(|_| SequentialAttributeEncoderType::from_u8(buffer.decode_u8()?).ok_or_else(attributes_error))
        .collect::<Result<Vec<_>, _>>()?;

    // Values are allocated from the point count, so the input has to be
    // able to hold every payload before anything is allocated.
    let mut min_size = 0usize;
    for (descriptor, &decoder_type) in descriptors.iter().zip(&decoder_types) {
        min_size = descriptor
            .min_payload_size(num_points, decoder_type)
            .and_then(|size| min_size.checked_add(size))
            .ok_or_else(attributes_error)?;
    }
    if min_size > buffer.remaining_size() {
        debug!(
            "{} points need at least {} bytes of attribute values, {} left",
            num_points,
            min_size,
            buffer.remaining_size()
        );
        return Err(attributes_error());
    }

    let mut pending = Vec::with_capacity(num_attributes);
    for (descriptor, decoder_type) in descriptors.into_iter().zip(decoder_types) {
        let mut att = PointAttribute::new();
        att.init(
            descriptor.role,
            descriptor.num_components,
            descriptor.data_type,
            descriptor.normalized,
            num_points,
        );
        let attribute_id = point_cloud.add_attribute(att);
        if let Some(att) = point_cloud.attribute_mut(attribute_id) {
            att.set_unique_id(descriptor.unique_id);
        }
        pending.push(PendingAttribute {
            attribute_id,
            decoder_type,
            quantized: Vec::new(),
            transform: AttributeQuantizationTransform::new(),
        });
    }

    for p in pending.iter_mut() {
        let att = point_cloud.attribute_mut(p.attribute_id).ok_or_else(attributes_error)?;
        match p.decoder_type {
            SequentialAttributeEncoderType::Generic => {
                let size = att.buffer().data_size();
                let data_type = att.data_type();
                let data = att.buffer_mut().data_mut();
                data.copy_from_slice(buffer.decode_slice(size)?);
                swap_le_in_place(data_type, data);
            }
            SequentialAttributeEncoderType::Quantization => {
                if att.data_type() != DataType::Float32 {
                    return Err(attributes_error());
                }
                let num_values = num_points * att.num_components() as usize;
                p.quantized = decode_integer_values(num_values, buffer)?;
            }
            other => {
                debug!("sequential decoder type {:?} is not supported", other);
                return Err(attributes_error());
            }
        }
    }

    for p in pending.iter_mut() {
        if p.decoder_type == SequentialAttributeEncoderType::Quantization {
            let att = point_cloud.attribute(p.attribute_id).ok_or_else(attributes_error)?;
            p.transform.decode_parameters(att, buffer)?;
        }
    }

    for p in &pending {
        if p.decoder_type == SequentialAttributeEncoderType::Quantization {
            let att = point_cloud.attribute_mut(p.attribute_id).ok_or_else(attributes_error)?;
            if !p.transform.dequantize_into(&p.quantized, att) {
                return Err(attributes_error());
            }
        }
    }
    Ok(())
}
