use log::debug;

use crate::compression_config::{EncodedGeometryType, PointCloudEncodingMethod};
use crate::encoder_buffer::EncoderBuffer;
use crate::encoder_options::EncoderOptions;
use crate::point_cloud::PointCloud;
use crate::sequential_attribute_encoder::encode_attributes;
use crate::status::{DracoError, Status};
use crate::version::BitstreamVersion;

/// Writes the fixed Draco header. Flags are always zero: no metadata.
pub fn encode_header(
    buffer: &mut EncoderBuffer,
    version: BitstreamVersion,
    geometry_type: EncodedGeometryType,
    method: u8,
) {
    buffer.encode_bytes(b"DRACO");
    buffer.encode_u8(version.major);
    buffer.encode_u8(version.minor);
    buffer.encode_u8(geometry_type as u8);
    buffer.encode_u8(method);
    buffer.encode_u16(0);
}

/// Rejects any encoding method other than sequential.
pub fn check_sequential_method(options: &EncoderOptions) -> Status {
    match options.get_encoding_method() {
        None | Some(0) => Ok(()),
        Some(method) => Err(DracoError::UnsupportedFeature(format!(
            "Encoding method {} is not supported.",
            method
        ))),
    }
}

/// Sequential point cloud encoder.
#[derive(Debug, Default)]
pub struct PointCloudEncoder;

impl PointCloudEncoder {
    pub fn new() -> Self {
        Self
    }

    pub fn encode(
        &self,
        point_cloud: &PointCloud,
        options: &EncoderOptions,
        out_buffer: &mut EncoderBuffer,
    ) -> Status {
        check_sequential_method(options)?;
        let num_points = u32::try_from(point_cloud.num_points())
            .map_err(|_| DracoError::InvalidParameter("Too many points.".into()))?;
        encode_header(
            out_buffer,
            BitstreamVersion::POINT_CLOUD,
            EncodedGeometryType::PointCloud,
            PointCloudEncodingMethod::PointCloudSequentialEncoding as u8,
        );
        out_buffer.encode_u32(num_points);
        encode_attributes(point_cloud, options, out_buffer)?;
        debug!(
            "encoded point cloud: {} points, {} attributes, {} bytes",
            num_points,
            point_cloud.num_attributes(),
            out_buffer.size()
        );
        Ok(())
    }
}
