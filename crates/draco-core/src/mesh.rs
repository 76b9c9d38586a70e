use std::ops::{Deref, DerefMut};

use crate::geometry_indices::{FaceIndex, PointIndex};
use crate::point_cloud::PointCloud;

/// Three corners of a triangle, in winding order.
pub type Face = [PointIndex; 3];

/// Points and attributes plus a triangle list.
///
/// Derefs to the underlying [`PointCloud`], so a mesh can be passed wherever
/// only points and attributes matter.
#[derive(Debug, Default, Clone)]
pub struct Mesh {
    points: PointCloud,
    triangles: Vec<Face>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_face(&mut self, face: Face) {
        self.triangles.push(face);
    }

    pub fn reserve_faces(&mut self, additional: usize) {
        self.triangles.reserve(additional);
    }

    pub fn clear_faces(&mut self) {
        self.triangles.clear();
    }

    /// Panics when `index` is out of range.
    pub fn face(&self, index: FaceIndex) -> Face {
        self.triangles[usize::from(index)]
    }

    pub fn faces(&self) -> &[Face] {
        &self.triangles
    }

    pub fn num_faces(&self) -> usize {
        self.triangles.len()
    }

    /// Drops the triangles, keeping points and attributes.
    pub fn into_point_cloud(self) -> PointCloud {
        self.points
    }
}

impl From<PointCloud> for Mesh {
    fn from(points: PointCloud) -> Self {
        Mesh {
            points,
            triangles: Vec::new(),
        }
    }
}

impl Deref for Mesh {
    type Target = PointCloud;

    fn deref(&self) -> &PointCloud {
        &self.points
    }
}

impl DerefMut for Mesh {
    fn deref_mut(&mut self) -> &mut PointCloud {
        &mut self.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faces_keep_insertion_order() {
        let mut mesh = Mesh::new();
        mesh.add_face([0, 1, 2].map(PointIndex));
        mesh.add_face([3, 4, 5].map(PointIndex));
        assert_eq!(mesh.num_faces(), 2);
        assert_eq!(mesh.face(FaceIndex(1)), [3, 4, 5].map(PointIndex));
        mesh.clear_faces();
        assert!(mesh.faces().is_empty());
    }

    #[test]
    fn converts_to_and_from_point_cloud() {
        let mut cloud = PointCloud::new();
        cloud.set_num_points(7);
        let mesh = Mesh::from(cloud);
        assert_eq!(mesh.num_points(), 7);
        assert_eq!(mesh.num_faces(), 0);
        assert_eq!(mesh.into_point_cloud().num_points(), 7);
    }
}
