//! Typed Rust bindings over the Draco C API.
//!
//! Point clouds, meshes, encoders, decoders and builders each own one
//! native handle, released on drop or earlier through `release`. Attribute
//! values cross the boundary as borrowed slices of any [`AttributeValue`]
//! shape: scalars and 1 to 4 component arrays over the eleven
//! [`ElementKind`]s, plus `glam` vectors with the `glam` feature.
//!
//! ```
//! use draco::{AttributeRole, Decoder, Encoder, Geometry, MeshBuilder};
//!
//! let mut builder = MeshBuilder::new();
//! builder.start(1);
//! builder
//!     .set_attribute(1, &[[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]], AttributeRole::Position)
//!     .unwrap();
//! let mesh = builder.finish().unwrap();
//!
//! let bytes = Encoder::new().encode_mesh(&mesh).unwrap();
//! let decoded = Decoder::new()
//!     .decode(draco::get_encoded_geometry_type(&bytes), &bytes)
//!     .unwrap();
//! assert_eq!(decoded.num_points(), 3);
//! ```

mod attribute;
mod builder;
mod decoder;
mod encoder;
mod error;
mod handle;
mod mesh;
mod point_cloud;
mod registry;

pub use attribute::PointAttr;
pub use builder::{MeshBuilder, PointCloudBuilder};
pub use decoder::{get_encoded_geometry_type, DecodedGeometry, Decoder};
pub use encoder::Encoder;
pub use error::Error;
pub use mesh::Mesh;
pub use point_cloud::{Geometry, PointCloud};
pub use registry::{shape_of, AttributeBuffer, AttributeRole, AttributeValue, Element, ElementKind, GeometryType};

/// Installs an `env_logger` backend. `RUST_LOG` overrides `default_level`.
///
/// Returns false if a logger is already installed.
pub fn init_logging(default_level: log::LevelFilter) -> bool {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level.to_string()))
        .format_timestamp_millis()
        .try_init()
        .is_ok()
}
