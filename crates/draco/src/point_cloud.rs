use std::ffi::c_void;
use std::fmt;
use std::os::raw::c_int;
use std::ptr;

use draco_core::c_api::{
    draco_new_point_cloud, draco_point_cloud_get_attribute, draco_point_cloud_get_attribute_by_unique_id,
    draco_point_cloud_get_attribute_data, draco_point_cloud_get_named_attribute_id,
    draco_point_cloud_num_attrs, draco_point_cloud_num_points, draco_point_cloud_t,
};
use log::debug;

use crate::attribute::PointAttr;
use crate::error::Error;
use crate::handle::Handle;
use crate::registry::{flatten_mut, AttributeBuffer, AttributeRole, AttributeValue, Element, ElementKind};

pub(crate) mod sealed {
    pub trait Sealed {}
}

/// Read access shared by point clouds, meshes and decoded geometry.
pub trait Geometry: sealed::Sealed {
    #[doc(hidden)]
    fn raw(&self) -> *mut draco_point_cloud_t;

    #[doc(hidden)]
    fn live_raw(&self) -> Result<*mut draco_point_cloud_t, Error>;

    fn num_points(&self) -> u32 {
        unsafe { draco_point_cloud_num_points(self.raw()) }
    }

    fn num_attrs(&self) -> i32 {
        unsafe { draco_point_cloud_num_attrs(self.raw()) }
    }

    /// Attribute at `index`, `None` when out of range.
    fn attr(&self, index: i32) -> Option<PointAttr<'_>> {
        PointAttr::from_raw(unsafe { draco_point_cloud_get_attribute(self.raw(), index) })
    }

    fn attr_by_unique_id(&self, unique_id: u32) -> Option<PointAttr<'_>> {
        PointAttr::from_raw(unsafe { draco_point_cloud_get_attribute_by_unique_id(self.raw(), unique_id) })
    }

    /// Id of the first attribute with `role`, or -1.
    fn named_attribute_id(&self, role: AttributeRole) -> i32 {
        unsafe { draco_point_cloud_get_named_attribute_id(self.raw(), role.tag() as c_int) }
    }

    fn named_attr(&self, role: AttributeRole) -> Option<PointAttr<'_>> {
        self.attr(self.named_attribute_id(role))
    }

    /// Reads all point values of `attr`.
    ///
    /// Without a buffer, or with an empty one, the values come back in the
    /// attribute's own kind. A non-empty buffer keeps its kind and is grown
    /// with zeros or truncated to `num_points * num_components` elements.
    /// The flag is false when the engine refused the transfer, e.g. for
    /// values not representable in the requested kind.
    fn attr_data(&self, attr: &PointAttr<'_>, buffer: Option<AttributeBuffer>) -> (AttributeBuffer, bool) {
        let required = required_len(self.num_points(), attr);
        let mut buffer = match (buffer, attr.data_type()) {
            (Some(buffer), Some(kind)) if buffer.is_empty() => AttributeBuffer::zeroed(kind, required),
            (Some(buffer), _) => buffer,
            (None, Some(kind)) => AttributeBuffer::zeroed(kind, required),
            (None, None) => return (AttributeBuffer::Uint8(Vec::new()), false),
        };
        buffer.resize(required);
        let kind = buffer.kind();
        let ok = transfer(self.raw(), attr, kind, required, buffer.as_mut_ptr());
        (buffer, ok)
    }

    /// Typed form of [`Geometry::attr_data`], converting to `T`.
    fn attr_values<T: Element>(&self, attr: &PointAttr<'_>, mut buffer: Vec<T>) -> (Vec<T>, bool) {
        let required = required_len(self.num_points(), attr);
        buffer.resize(required, T::default());
        let ok = transfer(self.raw(), attr, T::KIND, required, buffer.as_mut_ptr().cast());
        (buffer, ok)
    }

    /// One `V` per point, `None` when the component counts differ or the
    /// transfer fails.
    fn attr_vectors<V: AttributeValue>(&self, attr: &PointAttr<'_>) -> Option<Vec<V>> {
        if attr.num_components() as usize != V::COMPONENTS {
            debug!(
                "attribute {} has {} components, requested {}",
                attr.unique_id(),
                attr.num_components(),
                V::COMPONENTS
            );
            return None;
        }
        let mut values = vec![V::default(); self.num_points() as usize];
        let flat = flatten_mut(&mut values);
        let ok = transfer(
            self.raw(),
            attr,
            <V::Element as Element>::KIND,
            flat.len(),
            flat.as_mut_ptr().cast(),
        );
        ok.then_some(values)
    }
}

fn required_len(num_points: u32, attr: &PointAttr<'_>) -> usize {
    num_points as usize * attr.num_components() as usize
}

/// One native get-attribute call over `len` elements at `out`. Empty
/// transfers pass a null pointer.
fn transfer(
    geometry: *mut draco_point_cloud_t,
    attr: &PointAttr<'_>,
    kind: ElementKind,
    len: usize,
    out: *mut c_void,
) -> bool {
    let out = if len == 0 { ptr::null_mut() } else { out };
    let size = len * kind.byte_width();
    unsafe { draco_point_cloud_get_attribute_data(geometry, attr.as_ptr(), kind.tag(), size, out) }
}

/// A point cloud owned by the engine.
pub struct PointCloud {
    handle: Handle<draco_point_cloud_t>,
}

impl PointCloud {
    pub fn new() -> Self {
        Self::from_handle(Handle::from_raw(draco_new_point_cloud()))
    }

    pub(crate) fn from_handle(handle: Handle<draco_point_cloud_t>) -> Self {
        Self { handle }
    }

    /// Frees the native point cloud. Later calls are no-ops and accessors
    /// report an empty geometry.
    pub fn release(&mut self) {
        self.handle.release();
    }

    pub fn is_released(&self) -> bool {
        self.handle.is_released()
    }
}

impl Default for PointCloud {
    fn default() -> Self {
        Self::new()
    }
}

impl sealed::Sealed for PointCloud {}

impl Geometry for PointCloud {
    fn raw(&self) -> *mut draco_point_cloud_t {
        self.handle.as_ptr()
    }

    fn live_raw(&self) -> Result<*mut draco_point_cloud_t, Error> {
        self.handle.live()
    }
}

impl fmt::Debug for PointCloud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_released() {
            return f.write_str("PointCloud(released)");
        }
        f.debug_struct("PointCloud")
            .field("num_points", &self.num_points())
            .field("num_attrs", &self.num_attrs())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::PointCloudBuilder;

    fn colors() -> PointCloud {
        let mut builder = PointCloudBuilder::new();
        builder.start(3);
        builder
            .set_attribute(3, &[[255u8, 0, 0], [0, 255, 0], [0, 0, 255]], AttributeRole::Color)
            .unwrap();
        builder.finish().unwrap()
    }

    #[test]
    fn reads_in_own_kind() {
        let pc = colors();
        assert_eq!(pc.num_points(), 3);
        assert_eq!(pc.num_attrs(), 1);
        let attr = pc.named_attr(AttributeRole::Color).unwrap();
        assert_eq!(attr.data_type(), Some(ElementKind::Uint8));
        let (values, ok) = pc.attr_data(&attr, None);
        assert!(ok);
        assert_eq!(values, AttributeBuffer::Uint8(vec![255, 0, 0, 0, 255, 0, 0, 0, 255]));
    }

    #[test]
    fn supplied_kind_wins() {
        let pc = colors();
        let attr = pc.attr(0).unwrap();
        let (values, ok) = pc.attr_data(&attr, Some(AttributeBuffer::Float64(vec![-1.0; 2])));
        assert!(ok);
        assert_eq!(values.kind(), ElementKind::Float64);
        assert_eq!(values.len(), 9);
        assert_eq!(values.as_slice::<f64>().map(|v| v[0]), Some(255.0));

        // 255 does not fit in an i8.
        let (values, ok) = pc.attr_values(&attr, vec![7i8; 20]);
        assert!(!ok);
        assert_eq!(values.len(), 9);

        let (values, ok) = pc.attr_values(&attr, vec![1u16]);
        assert!(ok);
        assert_eq!(values, vec![255, 0, 0, 0, 255, 0, 0, 0, 255]);
    }

    #[test]
    fn empty_buffer_reads_in_own_kind() {
        let mut builder = PointCloudBuilder::new();
        builder.start(2);
        builder.set_attribute(2, &[1.5f32, 2.5], AttributeRole::Generic).unwrap();
        let pc = builder.finish().unwrap();
        let attr = pc.attr(0).unwrap();
        let (values, ok) = pc.attr_data(&attr, Some(AttributeBuffer::Uint8(Vec::new())));
        assert!(ok);
        assert_eq!(values, AttributeBuffer::Float32(vec![1.5, 2.5]));
    }

    #[test]
    fn vectors_need_matching_components() {
        let pc = colors();
        let attr = pc.attr(0).unwrap();
        assert_eq!(
            pc.attr_vectors::<[u8; 3]>(&attr),
            Some(vec![[255, 0, 0], [0, 255, 0], [0, 0, 255]])
        );
        assert!(pc.attr_vectors::<[u8; 2]>(&attr).is_none());
        assert_eq!(pc.attr_vectors::<[f32; 3]>(&attr).map(|v| v[1]), Some([0.0, 255.0, 0.0]));
    }

    #[test]
    fn out_of_range_lookups_are_absent() {
        let pc = colors();
        assert!(pc.attr(1).is_none());
        assert!(pc.attr(-1).is_none());
        assert!(pc.attr_by_unique_id(9).is_none());
        assert_eq!(pc.named_attribute_id(AttributeRole::Normal), -1);
        assert_eq!(pc.attr_by_unique_id(0), pc.attr(0));
    }

    #[test]
    fn released_point_cloud_is_empty() {
        let mut pc = colors();
        pc.release();
        pc.release();
        assert!(pc.is_released());
        assert_eq!(pc.num_points(), 0);
        assert!(pc.attr(0).is_none());
        assert_eq!(pc.live_raw(), Err(Error::Released));
        assert_eq!(format!("{:?}", pc), "PointCloud(released)");
    }
}
