#![cfg(feature = "glam")]

use draco::{shape_of, AttributeRole, ElementKind, Geometry, MeshBuilder};
use glam::{UVec2, Vec3};

#[test]
fn glam_vectors_are_attribute_values() {
    assert_eq!(shape_of::<Vec3>(), (ElementKind::Float32, 3));
    assert_eq!(shape_of::<glam::DVec4>(), (ElementKind::Float64, 4));

    let positions = [Vec3::ZERO, Vec3::X, Vec3::Y];
    let ids = [UVec2::new(1, 2), UVec2::new(3, 4), UVec2::new(5, 6)];
    let mut builder = MeshBuilder::new();
    builder.start(1);
    builder.set_attribute(1, &positions, AttributeRole::Position).unwrap();
    builder.set_attribute(1, &ids, AttributeRole::Generic).unwrap();
    let mesh = builder.finish().unwrap();

    let position = mesh.named_attr(AttributeRole::Position).unwrap();
    assert_eq!(mesh.attr_vectors::<Vec3>(&position), Some(positions.to_vec()));
    let generic = mesh.named_attr(AttributeRole::Generic).unwrap();
    assert_eq!(generic.data_type(), Some(ElementKind::Uint32));
    assert_eq!(mesh.attr_vectors::<UVec2>(&generic), Some(ids.to_vec()));
}
