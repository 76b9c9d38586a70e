//! Top-level decoder. Decoding replaces the target geometry's contents.

use crate::compression_config::EncodedGeometryType;
use crate::decoder_buffer::DecoderBuffer;
use crate::mesh::Mesh;
use crate::mesh_decoder::MeshDecoder;
use crate::point_cloud::PointCloud;
use crate::point_cloud_decoder::parse_header;
use crate::status::{Status, StatusOr};

#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder;

impl Decoder {
    pub fn new() -> Self {
        Self
    }

    /// Reads only the header of `data`.
    pub fn get_encoded_geometry_type(data: &[u8]) -> StatusOr<EncodedGeometryType> {
        parse_header(&mut DecoderBuffer::new(data)).map(|header| header.encoder_type)
    }

    /// Decodes a mesh stream, or a point cloud stream as a mesh without faces.
    pub fn decode_mesh_from_buffer(&self, data: &[u8], out_mesh: &mut Mesh) -> Status {
        let mut mesh = Mesh::new();
        MeshDecoder::new().decode(&mut DecoderBuffer::new(data), &mut mesh)?;
        *out_mesh = mesh;
        Ok(())
    }

    /// Decodes any stream as a point cloud, dropping mesh connectivity.
    pub fn decode_point_cloud_from_buffer(&self, data: &[u8], out_pc: &mut PointCloud) -> Status {
        let mut mesh = Mesh::new();
        MeshDecoder::new().decode(&mut DecoderBuffer::new(data), &mut mesh)?;
        *out_pc = mesh.into_point_cloud();
        Ok(())
    }
}
