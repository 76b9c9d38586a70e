//! Geometry engine behind the Draco C API.
//!
//! A geometry model (point clouds, meshes, typed point attributes), the
//! sequential subset of the Draco bitstream, incremental builders, and a C
//! API over all of it.
//!
//! Only sequential encoding is implemented: streams using edgebreaker
//! connectivity, KD-tree point clouds, prediction schemes or entropy coded
//! values are rejected with a [`DracoError`].

pub mod attribute_quantization_transform;
pub mod compression_config;
pub mod data_buffer;
pub mod decode;
pub mod decoder_buffer;
pub mod draco_types;
pub mod encode;
pub mod encoder_buffer;
pub mod encoder_options;
pub mod geometry_attribute;
pub mod geometry_indices;
pub mod mesh;
pub mod mesh_decoder;
pub mod mesh_encoder;
pub mod point_cloud;
pub mod point_cloud_builder;
pub mod point_cloud_decoder;
pub mod point_cloud_encoder;
pub mod quantization_utils;
pub mod sequential_attribute_decoder;
pub mod sequential_attribute_encoder;
pub mod status;
pub mod triangle_soup_mesh_builder;
pub mod version;

#[cfg(feature = "c-api")]
pub mod c_api;

pub use attribute_quantization_transform::AttributeQuantizationTransform;
pub use compression_config::EncodedGeometryType;
pub use data_buffer::DataBuffer;
pub use decode::Decoder;
pub use decoder_buffer::DecoderBuffer;
pub use draco_types::{DataType, DracoScalar};
pub use encode::Encoder;
pub use encoder_buffer::EncoderBuffer;
pub use encoder_options::EncoderOptions;
pub use geometry_attribute::{GeometryAttributeType, PointAttribute};
pub use geometry_indices::{AttributeValueIndex, FaceIndex, PointIndex};
pub use mesh::Mesh;
pub use mesh_decoder::MeshDecoder;
pub use mesh_encoder::MeshEncoder;
pub use point_cloud::PointCloud;
pub use point_cloud_builder::PointCloudBuilder;
pub use point_cloud_decoder::PointCloudDecoder;
pub use point_cloud_encoder::PointCloudEncoder;
pub use status::{DracoError, ErrorCode, Status, StatusOr};
pub use triangle_soup_mesh_builder::TriangleSoupMeshBuilder;
