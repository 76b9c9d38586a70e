//! Top-level encoder configured once and reused across calls.

use crate::encoder_buffer::EncoderBuffer;
use crate::encoder_options::EncoderOptions;
use crate::geometry_attribute::GeometryAttributeType;
use crate::mesh::Mesh;
use crate::mesh_encoder::MeshEncoder;
use crate::point_cloud::PointCloud;
use crate::point_cloud_encoder::PointCloudEncoder;
use crate::status::{DracoError, Status};

#[derive(Debug, Clone, Default)]
pub struct Encoder {
    options: EncoderOptions,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(&self) -> &EncoderOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut EncoderOptions {
        &mut self.options
    }

    /// Quantizes float attributes with role `role` to `bits` bits on encode.
    /// Zero or negative depths store the attribute losslessly.
    pub fn set_attribute_quantization(&mut self, role: GeometryAttributeType, bits: i32) -> Status {
        if role == GeometryAttributeType::Invalid {
            return Err(DracoError::InvalidParameter("Invalid attribute type.".into()));
        }
        self.options.set_attribute_quantization(role, bits);
        Ok(())
    }

    pub fn encode_point_cloud_to_buffer(&self, pc: &PointCloud, out_buffer: &mut EncoderBuffer) -> Status {
        PointCloudEncoder::new().encode(pc, &self.options, out_buffer)
    }

    pub fn encode_mesh_to_buffer(&self, mesh: &Mesh, out_buffer: &mut EncoderBuffer) -> Status {
        MeshEncoder::new().encode(mesh, &self.options, out_buffer)
    }
}
