use std::fmt;

use draco_core::c_api::{draco_mesh_get_indices, draco_mesh_num_faces, draco_mesh_t, draco_new_mesh, draco_point_cloud_t};
use log::debug;

use crate::error::Error;
use crate::handle::Handle;
use crate::point_cloud::{sealed, Geometry};

/// A triangle mesh owned by the engine. Also a point cloud: every
/// [`Geometry`] accessor applies.
pub struct Mesh {
    handle: Handle<draco_mesh_t>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::from_handle(Handle::from_raw(draco_new_mesh()))
    }

    pub(crate) fn from_handle(handle: Handle<draco_mesh_t>) -> Self {
        Self { handle }
    }

    pub fn num_faces(&self) -> u32 {
        unsafe { draco_mesh_num_faces(self.handle.as_ptr()) }
    }

    /// Face corner indices, three per face.
    ///
    /// `buffer` is reused when given. The result always holds exactly
    /// `3 * num_faces` indices.
    pub fn faces(&self, buffer: Option<Vec<u32>>) -> Vec<u32> {
        let len = self.num_faces() as usize * 3;
        let mut indices = buffer.unwrap_or_default();
        indices.resize(len, 0);
        if len > 0 {
            let size = len * std::mem::size_of::<u32>();
            let ok = unsafe { draco_mesh_get_indices(self.handle.as_ptr(), size, indices.as_mut_ptr()) };
            if !ok {
                debug!("face transfer of {} bytes refused", size);
            }
        }
        indices
    }

    /// Frees the native mesh. Later calls are no-ops and accessors report
    /// an empty geometry.
    pub fn release(&mut self) {
        self.handle.release();
    }

    pub fn is_released(&self) -> bool {
        self.handle.is_released()
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

impl sealed::Sealed for Mesh {}

impl Geometry for Mesh {
    fn raw(&self) -> *mut draco_point_cloud_t {
        self.handle.as_ptr()
    }

    fn live_raw(&self) -> Result<*mut draco_point_cloud_t, Error> {
        self.handle.live()
    }
}

impl fmt::Debug for Mesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_released() {
            return f.write_str("Mesh(released)");
        }
        f.debug_struct("Mesh")
            .field("num_faces", &self.num_faces())
            .field("num_points", &self.num_points())
            .field("num_attrs", &self.num_attrs())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::MeshBuilder;
    use crate::registry::AttributeRole;

    fn two_triangles() -> Mesh {
        let mut builder = MeshBuilder::new();
        builder.start(2);
        let positions = [
            [0.0f32, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 0.0, 0.0],
        ];
        builder.set_attribute(2, &positions, AttributeRole::Position).unwrap();
        builder.finish().unwrap()
    }

    #[test]
    fn faces_have_exact_length() {
        let mesh = two_triangles();
        assert_eq!(mesh.num_faces(), 2);
        assert_eq!(mesh.num_points(), 6);
        assert_eq!(mesh.faces(None), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(mesh.faces(Some(vec![9; 2])), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(mesh.faces(Some(vec![9; 40])), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn empty_mesh_has_no_faces() {
        let mesh = Mesh::new();
        assert_eq!(mesh.num_faces(), 0);
        assert!(mesh.faces(Some(vec![1, 2, 3])).is_empty());
    }

    #[test]
    fn released_mesh_is_empty() {
        let mut mesh = two_triangles();
        mesh.release();
        mesh.release();
        assert_eq!(mesh.num_faces(), 0);
        assert!(mesh.faces(None).is_empty());
        assert_eq!(format!("{:?}", mesh), "Mesh(released)");
    }
}
