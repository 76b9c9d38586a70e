//! Typed indices into points, faces and attribute values.

use std::fmt;

macro_rules! define_index {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
            pub struct $name(pub u32);

            impl From<u32> for $name {
                fn from(value: u32) -> Self {
                    $name(value)
                }
            }

            impl From<usize> for $name {
                fn from(value: usize) -> Self {
                    $name(value as u32)
                }
            }

            impl From<$name> for usize {
                fn from(index: $name) -> Self {
                    index.0 as usize
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }
        )*
    };
}

define_index!(
    /// Index of a point of a point cloud or mesh.
    PointIndex,
    /// Index of a face of a mesh.
    FaceIndex,
    /// Index of a stored attribute value. Points map to values one to one.
    AttributeValueIndex,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_keep_value() {
        assert_eq!(PointIndex::from(7usize), PointIndex(7));
        assert_eq!(usize::from(FaceIndex(3)), 3);
        assert_eq!(AttributeValueIndex::from(9u32).to_string(), "9");
    }
}
