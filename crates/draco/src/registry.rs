//! Element kinds, attribute roles and the closed set of value shapes that
//! can cross the native boundary.
//!
//! Every shape accepted by an attribute transfer implements
//! [`AttributeValue`], which resolves to one `(ElementKind, components)`
//! pair. Supporting a new shape means adding an impl here and nowhere else.

use std::ffi::c_void;
use std::mem;

use draco_core::c_api::{draco_data_type, draco_encoded_geometry_type, draco_geometry_attr_type};

/// Primitive type of one attribute component.
///
/// Discriminants are the native data type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ElementKind {
    Int8 = 1,
    Uint8 = 2,
    Int16 = 3,
    Uint16 = 4,
    Int32 = 5,
    Uint32 = 6,
    Int64 = 7,
    Uint64 = 8,
    Float32 = 9,
    Float64 = 10,
    Bool = 11,
}

impl ElementKind {
    pub const ALL: [ElementKind; 11] = [
        ElementKind::Int8,
        ElementKind::Uint8,
        ElementKind::Int16,
        ElementKind::Uint16,
        ElementKind::Int32,
        ElementKind::Uint32,
        ElementKind::Int64,
        ElementKind::Uint64,
        ElementKind::Float32,
        ElementKind::Float64,
        ElementKind::Bool,
    ];

    pub const fn byte_width(self) -> usize {
        match self {
            ElementKind::Int8 | ElementKind::Uint8 | ElementKind::Bool => 1,
            ElementKind::Int16 | ElementKind::Uint16 => 2,
            ElementKind::Int32 | ElementKind::Uint32 | ElementKind::Float32 => 4,
            ElementKind::Int64 | ElementKind::Uint64 | ElementKind::Float64 => 8,
        }
    }

    /// Native data type tag.
    pub const fn tag(self) -> u32 {
        self as u32
    }

    /// `None` for the invalid tag 0 and unknown tags.
    pub fn from_tag(tag: u32) -> Option<Self> {
        ElementKind::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    pub(crate) fn from_native(data_type: draco_data_type) -> Option<Self> {
        Self::from_tag(data_type as u32)
    }
}

/// Semantic role of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum AttributeRole {
    Invalid = -1,
    Position = 0,
    Normal = 1,
    Color = 2,
    TexCoord = 3,
    Generic = 4,
}

impl AttributeRole {
    pub const fn tag(self) -> i32 {
        self as i32
    }

    pub(crate) fn from_native(role: draco_geometry_attr_type) -> Self {
        match role {
            draco_geometry_attr_type::DRACO_GAT_POSITION => AttributeRole::Position,
            draco_geometry_attr_type::DRACO_GAT_NORMAL => AttributeRole::Normal,
            draco_geometry_attr_type::DRACO_GAT_COLOR => AttributeRole::Color,
            draco_geometry_attr_type::DRACO_GAT_TEX_COORD => AttributeRole::TexCoord,
            draco_geometry_attr_type::DRACO_GAT_GENERIC => AttributeRole::Generic,
            draco_geometry_attr_type::DRACO_GAT_INVALID => AttributeRole::Invalid,
        }
    }

    /// Tag as passed to the unsigned role parameters of the C API. The
    /// invalid role wraps to a tag the engine rejects.
    pub(crate) fn native_tag(self) -> u32 {
        self.tag() as u32
    }
}

/// Geometry stored in an encoded blob, read from its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum GeometryType {
    Invalid = -1,
    PointCloud = 0,
    TriangularMesh = 1,
}

impl GeometryType {
    pub(crate) fn from_native(egt: draco_encoded_geometry_type) -> Self {
        match egt {
            draco_encoded_geometry_type::DRACO_EGT_POINT_CLOUD => GeometryType::PointCloud,
            draco_encoded_geometry_type::DRACO_EGT_TRIANGULAR_MESH => GeometryType::TriangularMesh,
            draco_encoded_geometry_type::DRACO_EGT_INVALID => GeometryType::Invalid,
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A primitive that can be transferred as one attribute component.
pub trait Element: sealed::Sealed + Copy + Default + PartialEq + Send + Sync + 'static {
    const KIND: ElementKind;

    #[doc(hidden)]
    fn into_buffer(values: Vec<Self>) -> AttributeBuffer;

    #[doc(hidden)]
    fn from_buffer(buffer: AttributeBuffer) -> Result<Vec<Self>, AttributeBuffer>;

    #[doc(hidden)]
    fn slice_of(buffer: &AttributeBuffer) -> Option<&[Self]>;
}

/// A per-point value: a scalar or a vector of 1 to 4 components.
///
/// Implementors are laid out as exactly `COMPONENTS` contiguous elements,
/// so a slice of values is viewed as a slice of elements without copying.
pub trait AttributeValue: sealed::Sealed + Copy + Default + 'static {
    type Element: Element;
    const COMPONENTS: usize;
}

/// Kind and component count of `V`.
pub fn shape_of<V: AttributeValue>() -> (ElementKind, usize) {
    (<V::Element as Element>::KIND, V::COMPONENTS)
}

/// Views values as their flat components.
pub(crate) fn flatten<V: AttributeValue>(values: &[V]) -> &[V::Element] {
    debug_assert_eq!(mem::size_of::<V>(), V::COMPONENTS * mem::size_of::<V::Element>());
    unsafe { std::slice::from_raw_parts(values.as_ptr().cast(), values.len() * V::COMPONENTS) }
}

pub(crate) fn flatten_mut<V: AttributeValue>(values: &mut [V]) -> &mut [V::Element] {
    debug_assert_eq!(mem::size_of::<V>(), V::COMPONENTS * mem::size_of::<V::Element>());
    unsafe { std::slice::from_raw_parts_mut(values.as_mut_ptr().cast(), values.len() * V::COMPONENTS) }
}

/// Owned attribute values of any element kind.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeBuffer {
    Int8(Vec<i8>),
    Uint8(Vec<u8>),
    Int16(Vec<i16>),
    Uint16(Vec<u16>),
    Int32(Vec<i32>),
    Uint32(Vec<u32>),
    Int64(Vec<i64>),
    Uint64(Vec<u64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Bool(Vec<bool>),
}

macro_rules! for_each_variant {
    ($buffer:expr, $values:ident => $body:expr) => {
        match $buffer {
            AttributeBuffer::Int8($values) => $body,
            AttributeBuffer::Uint8($values) => $body,
            AttributeBuffer::Int16($values) => $body,
            AttributeBuffer::Uint16($values) => $body,
            AttributeBuffer::Int32($values) => $body,
            AttributeBuffer::Uint32($values) => $body,
            AttributeBuffer::Int64($values) => $body,
            AttributeBuffer::Uint64($values) => $body,
            AttributeBuffer::Float32($values) => $body,
            AttributeBuffer::Float64($values) => $body,
            AttributeBuffer::Bool($values) => $body,
        }
    };
}

impl AttributeBuffer {
    /// `len` zero values of `kind`.
    pub fn zeroed(kind: ElementKind, len: usize) -> Self {
        match kind {
            ElementKind::Int8 => AttributeBuffer::Int8(vec![0; len]),
            ElementKind::Uint8 => AttributeBuffer::Uint8(vec![0; len]),
            ElementKind::Int16 => AttributeBuffer::Int16(vec![0; len]),
            ElementKind::Uint16 => AttributeBuffer::Uint16(vec![0; len]),
            ElementKind::Int32 => AttributeBuffer::Int32(vec![0; len]),
            ElementKind::Uint32 => AttributeBuffer::Uint32(vec![0; len]),
            ElementKind::Int64 => AttributeBuffer::Int64(vec![0; len]),
            ElementKind::Uint64 => AttributeBuffer::Uint64(vec![0; len]),
            ElementKind::Float32 => AttributeBuffer::Float32(vec![0.0; len]),
            ElementKind::Float64 => AttributeBuffer::Float64(vec![0.0; len]),
            ElementKind::Bool => AttributeBuffer::Bool(vec![false; len]),
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            AttributeBuffer::Int8(_) => ElementKind::Int8,
            AttributeBuffer::Uint8(_) => ElementKind::Uint8,
            AttributeBuffer::Int16(_) => ElementKind::Int16,
            AttributeBuffer::Uint16(_) => ElementKind::Uint16,
            AttributeBuffer::Int32(_) => ElementKind::Int32,
            AttributeBuffer::Uint32(_) => ElementKind::Uint32,
            AttributeBuffer::Int64(_) => ElementKind::Int64,
            AttributeBuffer::Uint64(_) => ElementKind::Uint64,
            AttributeBuffer::Float32(_) => ElementKind::Float32,
            AttributeBuffer::Float64(_) => ElementKind::Float64,
            AttributeBuffer::Bool(_) => ElementKind::Bool,
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        for_each_variant!(self, values => values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Grows with zero values or truncates to `len` elements.
    pub fn resize(&mut self, len: usize) {
        for_each_variant!(self, values => values.resize(len, Default::default()))
    }

    pub fn byte_len(&self) -> usize {
        self.len() * self.kind().byte_width()
    }

    pub fn as_slice<T: Element>(&self) -> Option<&[T]> {
        T::slice_of(self)
    }

    /// The values as `Vec<T>`, or the buffer back when its kind differs.
    pub fn into_vec<T: Element>(self) -> Result<Vec<T>, Self> {
        T::from_buffer(self)
    }

    pub(crate) fn as_ptr(&self) -> *const c_void {
        for_each_variant!(self, values => values.as_ptr().cast())
    }

    pub(crate) fn as_mut_ptr(&mut self) -> *mut c_void {
        for_each_variant!(self, values => values.as_mut_ptr().cast())
    }
}

impl<T: Element> From<Vec<T>> for AttributeBuffer {
    fn from(values: Vec<T>) -> Self {
        T::into_buffer(values)
    }
}

macro_rules! impl_element {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl sealed::Sealed for $t {}

            impl Element for $t {
                const KIND: ElementKind = ElementKind::$variant;

                fn into_buffer(values: Vec<Self>) -> AttributeBuffer {
                    AttributeBuffer::$variant(values)
                }

                fn from_buffer(buffer: AttributeBuffer) -> Result<Vec<Self>, AttributeBuffer> {
                    match buffer {
                        AttributeBuffer::$variant(values) => Ok(values),
                        other => Err(other),
                    }
                }

                fn slice_of(buffer: &AttributeBuffer) -> Option<&[Self]> {
                    match buffer {
                        AttributeBuffer::$variant(values) => Some(values),
                        _ => None,
                    }
                }
            }

            impl AttributeValue for $t {
                type Element = $t;
                const COMPONENTS: usize = 1;
            }

            impl_arrays!($t; 1, 2, 3, 4);
        )*
    };
}

macro_rules! impl_arrays {
    ($t:ty; $($n:literal),*) => {
        $(
            impl sealed::Sealed for [$t; $n] {}

            impl AttributeValue for [$t; $n] {
                type Element = $t;
                const COMPONENTS: usize = $n;
            }
        )*
    };
}

impl_element!(
    i8 => Int8,
    u8 => Uint8,
    i16 => Int16,
    u16 => Uint16,
    i32 => Int32,
    u32 => Uint32,
    i64 => Int64,
    u64 => Uint64,
    f32 => Float32,
    f64 => Float64,
    bool => Bool,
);

#[cfg(feature = "glam")]
macro_rules! impl_glam {
    ($($t:ty => $e:ty, $n:literal);* $(;)?) => {
        $(
            impl sealed::Sealed for $t {}

            impl AttributeValue for $t {
                type Element = $e;
                const COMPONENTS: usize = $n;
            }
        )*
    };
}

#[cfg(feature = "glam")]
impl_glam!(
    glam::Vec2 => f32, 2;
    glam::Vec3 => f32, 3;
    glam::Vec4 => f32, 4;
    glam::DVec2 => f64, 2;
    glam::DVec3 => f64, 3;
    glam::DVec4 => f64, 4;
    glam::IVec2 => i32, 2;
    glam::IVec3 => i32, 3;
    glam::IVec4 => i32, 4;
    glam::UVec2 => u32, 2;
    glam::UVec3 => u32, 3;
    glam::UVec4 => u32, 4;
);

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_layout<V: AttributeValue>() {
        assert_eq!(mem::size_of::<V>(), V::COMPONENTS * mem::size_of::<V::Element>());
        assert!(mem::align_of::<V>() >= mem::align_of::<V::Element>());
        assert_eq!(mem::size_of::<V::Element>(), shape_of::<V>().0.byte_width());
    }

    #[test]
    fn shapes_are_contiguous() {
        assert_layout::<i8>();
        assert_layout::<[u16; 3]>();
        assert_layout::<[f64; 4]>();
        assert_layout::<[bool; 2]>();
        assert_layout::<u64>();
        #[cfg(feature = "glam")]
        {
            assert_layout::<glam::Vec3>();
            assert_layout::<glam::Vec4>();
            assert_layout::<glam::DVec3>();
            assert_layout::<glam::UVec2>();
        }
    }

    #[test]
    fn shape_resolution() {
        assert_eq!(shape_of::<f32>(), (ElementKind::Float32, 1));
        assert_eq!(shape_of::<[i16; 2]>(), (ElementKind::Int16, 2));
        assert_eq!(shape_of::<[bool; 4]>(), (ElementKind::Bool, 4));
    }

    #[test]
    fn tags_round_trip() {
        for kind in ElementKind::ALL {
            assert_eq!(ElementKind::from_tag(kind.tag()), Some(kind));
            assert_eq!(AttributeBuffer::zeroed(kind, 3).kind(), kind);
        }
        assert_eq!(ElementKind::from_tag(0), None);
        assert_eq!(ElementKind::from_tag(12), None);
        assert_eq!(ElementKind::Int64.byte_width(), 8);
        assert_eq!(ElementKind::Bool.byte_width(), 1);
    }

    #[test]
    fn buffer_resizes_with_zeros() {
        let mut buffer = AttributeBuffer::from(vec![1.5f32, 2.5]);
        buffer.resize(4);
        assert_eq!(buffer.as_slice::<f32>(), Some(&[1.5, 2.5, 0.0, 0.0][..]));
        buffer.resize(1);
        assert_eq!(buffer.byte_len(), 4);
        assert!(buffer.as_slice::<f64>().is_none());
        let back = buffer.into_vec::<f32>().unwrap();
        assert_eq!(back, vec![1.5]);

        let empty = AttributeBuffer::zeroed(ElementKind::Uint16, 0);
        assert!(empty.is_empty());
        assert!(empty.into_vec::<i16>().is_err());
    }

    #[test]
    fn flatten_views_components() {
        let values = [[1u16, 2], [3, 4], [5, 6]];
        assert_eq!(flatten(&values), &[1u16, 2, 3, 4, 5, 6][..]);
    }
}
