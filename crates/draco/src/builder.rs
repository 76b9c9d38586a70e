//! Incremental construction of point clouds and triangle-soup meshes.
//!
//! A builder is started with an item count, receives one call per
//! attribute, and is consumed by `finish`, which hands the product over and
//! releases the builder's native handle.

use std::ffi::c_void;
use std::os::raw::c_int;

use draco_core::c_api::{
    draco_mesh_builder_get, draco_mesh_builder_start, draco_mesh_builder_t, draco_mesh_set_attribute,
    draco_new_mesh_builder, draco_new_point_cloud_builder, draco_point_cloud_builder_get,
    draco_point_cloud_builder_start, draco_point_cloud_builder_t, draco_point_cloud_set_attribute,
};
use log::{debug, warn};

use crate::error::Error;
use crate::handle::Handle;
use crate::mesh::Mesh;
use crate::point_cloud::PointCloud;
use crate::registry::{flatten, AttributeBuffer, AttributeRole, AttributeValue, Element, ElementKind};

/// A borrowed, flat view of attribute values ready for one native call.
struct AttributeSource {
    kind: ElementKind,
    components: usize,
    ptr: *const c_void,
    len: usize,
}

impl AttributeSource {
    fn from_values<V: AttributeValue>(values: &[V]) -> Self {
        let flat = flatten(values);
        AttributeSource {
            kind: <V::Element as Element>::KIND,
            components: V::COMPONENTS,
            ptr: flat.as_ptr().cast(),
            len: flat.len(),
        }
    }

    fn from_buffer(buffer: &AttributeBuffer, components: usize) -> Result<Self, Error> {
        if !(1..=4).contains(&components) {
            return Err(Error::UnsupportedShape { components });
        }
        Ok(AttributeSource {
            kind: buffer.kind(),
            components,
            ptr: buffer.as_ptr(),
            len: buffer.len(),
        })
    }

    /// Checks that the view holds `items * corners_per_item` values.
    fn check(&self, items: usize, corners_per_item: usize) -> Result<c_int, Error> {
        if items == 0 {
            return Err(Error::ZeroCount);
        }
        let expected = items * corners_per_item * self.components;
        if self.len != expected {
            return Err(Error::LengthMismatch {
                expected,
                actual: self.len,
            });
        }
        c_int::try_from(items).map_err(|_| Error::LengthMismatch {
            expected: c_int::MAX as usize,
            actual: items,
        })
    }
}

fn attribute_id(id: c_int, role: AttributeRole) -> Result<i32, Error> {
    if id < 0 {
        warn!("engine rejected {:?} attribute", role);
        return Err(Error::AttributeRejected { role });
    }
    debug!("added {:?} attribute {}", role, id);
    Ok(id)
}

fn start_count(count: usize) -> c_int {
    c_int::try_from(count).unwrap_or(c_int::MAX)
}

/// Builds a [`PointCloud`].
pub struct PointCloudBuilder {
    handle: Handle<draco_point_cloud_builder_t>,
}

impl PointCloudBuilder {
    pub fn new() -> Self {
        Self {
            handle: Handle::from_raw(draco_new_point_cloud_builder()),
        }
    }

    /// Starts a build of `num_points` points, discarding any unfinished one.
    pub fn start(&mut self, num_points: usize) {
        unsafe { draco_point_cloud_builder_start(self.handle.as_ptr(), start_count(num_points)) };
    }

    /// Adds an attribute with one value per point and returns its id.
    ///
    /// `num_points` must match `start`; values are copied before returning.
    pub fn set_attribute<V: AttributeValue>(
        &mut self,
        num_points: usize,
        values: &[V],
        role: AttributeRole,
    ) -> Result<i32, Error> {
        self.set_source(num_points, AttributeSource::from_values(values), role)
    }

    /// Adds an attribute from flat values with `components` per point.
    pub fn set_attribute_buffer(
        &mut self,
        num_points: usize,
        buffer: &AttributeBuffer,
        components: usize,
        role: AttributeRole,
    ) -> Result<i32, Error> {
        self.set_source(num_points, AttributeSource::from_buffer(buffer, components)?, role)
    }

    fn set_source(&mut self, num_points: usize, source: AttributeSource, role: AttributeRole) -> Result<i32, Error> {
        let builder = self.handle.live()?;
        let count = source.check(num_points, 1)?;
        let id = unsafe {
            draco_point_cloud_set_attribute(
                count,
                builder,
                source.ptr,
                role.native_tag(),
                source.components as i8,
                source.kind.tag(),
            )
        };
        attribute_id(id, role)
    }

    /// Takes the finished point cloud and releases the builder.
    pub fn finish(mut self) -> Result<PointCloud, Error> {
        let builder = self.handle.live()?;
        let product = Handle::from_raw(unsafe { draco_point_cloud_builder_get(builder) });
        self.handle.release();
        if product.is_released() {
            return Err(Error::NotStarted);
        }
        Ok(PointCloud::from_handle(product))
    }
}

impl Default for PointCloudBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a triangle-soup [`Mesh`]: face `f` uses points `3f`, `3f + 1`
/// and `3f + 2`, and attribute values are given per face corner.
pub struct MeshBuilder {
    handle: Handle<draco_mesh_builder_t>,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self {
            handle: Handle::from_raw(draco_new_mesh_builder()),
        }
    }

    pub fn start(&mut self, num_faces: usize) {
        unsafe { draco_mesh_builder_start(self.handle.as_ptr(), start_count(num_faces)) };
    }

    /// Adds an attribute with `3 * num_faces` corner values and returns its
    /// id.
    pub fn set_attribute<V: AttributeValue>(
        &mut self,
        num_faces: usize,
        values: &[V],
        role: AttributeRole,
    ) -> Result<i32, Error> {
        self.set_source(num_faces, AttributeSource::from_values(values), role)
    }

    pub fn set_attribute_buffer(
        &mut self,
        num_faces: usize,
        buffer: &AttributeBuffer,
        components: usize,
        role: AttributeRole,
    ) -> Result<i32, Error> {
        self.set_source(num_faces, AttributeSource::from_buffer(buffer, components)?, role)
    }

    fn set_source(&mut self, num_faces: usize, source: AttributeSource, role: AttributeRole) -> Result<i32, Error> {
        let builder = self.handle.live()?;
        let count = source.check(num_faces, 3)?;
        let id = unsafe {
            draco_mesh_set_attribute(
                count,
                builder,
                source.ptr,
                role.native_tag(),
                source.components as i8,
                source.kind.tag(),
            )
        };
        attribute_id(id, role)
    }

    /// Takes the finished mesh and releases the builder.
    pub fn finish(mut self) -> Result<Mesh, Error> {
        let builder = self.handle.live()?;
        let product = Handle::from_raw(unsafe { draco_mesh_builder_get(builder) });
        self.handle.release();
        if product.is_released() {
            return Err(Error::NotStarted);
        }
        Ok(Mesh::from_handle(product))
    }
}

impl Default for MeshBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point_cloud::Geometry;

    #[test]
    fn validates_before_native_call() {
        let mut builder = PointCloudBuilder::new();
        builder.start(2);
        assert_eq!(
            builder.set_attribute(0, &[1.0f32], AttributeRole::Generic),
            Err(Error::ZeroCount)
        );
        assert_eq!(
            builder.set_attribute(2, &[[1.0f32, 2.0]], AttributeRole::Generic),
            Err(Error::LengthMismatch { expected: 4, actual: 2 })
        );
        let buffer = AttributeBuffer::from(vec![0i32; 10]);
        assert_eq!(
            builder.set_attribute_buffer(2, &buffer, 5, AttributeRole::Generic),
            Err(Error::UnsupportedShape { components: 5 })
        );
        assert_eq!(
            builder.set_attribute_buffer(2, &buffer, 0, AttributeRole::Generic),
            Err(Error::UnsupportedShape { components: 0 })
        );
    }

    #[test]
    fn engine_rejections_are_errors() {
        let mut builder = PointCloudBuilder::new();
        // Not started.
        assert_eq!(
            builder.set_attribute(1, &[1u8], AttributeRole::Generic),
            Err(Error::AttributeRejected {
                role: AttributeRole::Generic
            })
        );
        builder.start(3);
        // Count differs from start.
        assert!(builder.set_attribute(2, &[1u8, 2], AttributeRole::Generic).is_err());
        assert_eq!(
            builder.set_attribute(3, &[1u8, 2, 3], AttributeRole::Invalid),
            Err(Error::AttributeRejected {
                role: AttributeRole::Invalid
            })
        );
        assert_eq!(builder.set_attribute(3, &[1u8, 2, 3], AttributeRole::Generic), Ok(0));
        assert_eq!(builder.set_attribute(3, &[[0.5f64; 4]; 3], AttributeRole::Normal), Ok(1));
        let pc = builder.finish().unwrap();
        assert_eq!(pc.num_attrs(), 2);
    }

    #[test]
    fn finishing_unstarted_builder_fails() {
        assert_eq!(PointCloudBuilder::new().finish().unwrap_err(), Error::NotStarted);
        assert_eq!(MeshBuilder::new().finish().unwrap_err(), Error::NotStarted);
    }

    #[test]
    fn mesh_values_are_per_corner() {
        let mut builder = MeshBuilder::new();
        builder.start(1);
        assert_eq!(
            builder.set_attribute(1, &[[0.0f32; 2]; 2], AttributeRole::TexCoord),
            Err(Error::LengthMismatch { expected: 6, actual: 4 })
        );
        let buffer = AttributeBuffer::from(vec![1u16, 2, 3]);
        assert_eq!(builder.set_attribute_buffer(1, &buffer, 1, AttributeRole::Generic), Ok(0));
        let mesh = builder.finish().unwrap();
        assert_eq!(mesh.num_faces(), 1);
        let attr = mesh.attr(0).unwrap();
        assert_eq!(mesh.attr_values(&attr, Vec::<u16>::new()), (vec![1, 2, 3], true));
    }
}
