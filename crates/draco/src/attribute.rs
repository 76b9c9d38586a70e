use std::marker::PhantomData;
use std::ptr::NonNull;

use draco_core::c_api::{
    draco_point_attr_byte_offset, draco_point_attr_byte_stride, draco_point_attr_normalized,
    draco_point_attr_num_components, draco_point_attr_size, draco_point_attr_t, draco_point_attr_type,
    draco_point_attr_unique_id, draco_point_cloud_t, draco_point_data_type,
};

use crate::registry::{AttributeRole, ElementKind};

/// Read-only view of an attribute owned by a point cloud or mesh.
///
/// Borrows its geometry, so the geometry cannot be released or decoded
/// into while the view is alive.
#[derive(Clone, Copy)]
pub struct PointAttr<'a> {
    ptr: NonNull<draco_point_attr_t>,
    _geometry: PhantomData<&'a draco_point_cloud_t>,
}

impl<'a> PointAttr<'a> {
    pub(crate) fn from_raw(raw: *const draco_point_attr_t) -> Option<Self> {
        NonNull::new(raw.cast_mut()).map(|ptr| PointAttr {
            ptr,
            _geometry: PhantomData,
        })
    }

    pub(crate) fn as_ptr(&self) -> *const draco_point_attr_t {
        self.ptr.as_ptr()
    }

    pub fn role(&self) -> AttributeRole {
        AttributeRole::from_native(unsafe { draco_point_attr_type(self.as_ptr()) })
    }

    /// `None` if the engine reports an invalid data type.
    pub fn data_type(&self) -> Option<ElementKind> {
        ElementKind::from_native(unsafe { draco_point_data_type(self.as_ptr()) })
    }

    pub fn num_components(&self) -> u8 {
        unsafe { draco_point_attr_num_components(self.as_ptr()) }.max(0) as u8
    }

    pub fn normalized(&self) -> bool {
        unsafe { draco_point_attr_normalized(self.as_ptr()) }
    }

    pub fn byte_stride(&self) -> i64 {
        unsafe { draco_point_attr_byte_stride(self.as_ptr()) }
    }

    pub fn byte_offset(&self) -> i64 {
        unsafe { draco_point_attr_byte_offset(self.as_ptr()) }
    }

    pub fn unique_id(&self) -> u32 {
        unsafe { draco_point_attr_unique_id(self.as_ptr()) }
    }

    /// Number of unique values stored for the attribute.
    pub fn size(&self) -> usize {
        unsafe { draco_point_attr_size(self.as_ptr()) }
    }
}

impl std::fmt::Debug for PointAttr<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointAttr")
            .field("unique_id", &self.unique_id())
            .field("role", &self.role())
            .field("data_type", &self.data_type())
            .field("num_components", &self.num_components())
            .finish()
    }
}

impl PartialEq for PointAttr<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr == other.ptr
    }
}
