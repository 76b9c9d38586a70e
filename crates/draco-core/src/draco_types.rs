//! Data types stored in geometry attributes.

use std::fmt;

use byteorder::{ByteOrder, NativeEndian};
use num_traits::{NumCast, ToPrimitive};

/// Draco data types for geometry attributes.
///
/// Discriminants are the stable tags used in the bitstream and in the C API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum DataType {
    /// Not a legal value for DataType. Used to indicate a field has not been set.
    #[default]
    Invalid = 0,
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

impl DataType {
    /// Size of one value in bytes, 0 for `Invalid`.
    pub const fn byte_length(self) -> usize {
        match self {
            DataType::Invalid => 0,
            DataType::Int8 | DataType::Uint8 | DataType::Bool => 1,
            DataType::Int16 | DataType::Uint16 => 2,
            DataType::Int32 | DataType::Uint32 | DataType::Float32 => 4,
            DataType::Int64 | DataType::Uint64 | DataType::Float64 => 8,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            DataType::Invalid => "invalid",
            DataType::Int8 => "int8",
            DataType::Uint8 => "uint8",
            DataType::Int16 => "int16",
            DataType::Uint16 => "uint16",
            DataType::Int32 => "int32",
            DataType::Uint32 => "uint32",
            DataType::Int64 => "int64",
            DataType::Uint64 => "uint64",
            DataType::Float32 => "float32",
            DataType::Float64 => "float64",
            DataType::Bool => "bool",
        }
    }

    /// Returns true for all integer types, including `Bool`.
    pub const fn is_integral(self) -> bool {
        !matches!(
            self,
            DataType::Float32 | DataType::Float64 | DataType::Invalid
        )
    }

    pub const fn is_floating_point(self) -> bool {
        matches!(self, DataType::Float32 | DataType::Float64)
    }

    /// Maps a C API tag to a data type; unknown tags map to `Invalid`.
    pub fn from_tag(tag: u32) -> Self {
        u8::try_from(tag).map(DataType::from).unwrap_or(DataType::Invalid)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<u8> for DataType {
    fn from(value: u8) -> Self {
        match value {
            1 => DataType::Int8,
            2 => DataType::Uint8,
            3 => DataType::Int16,
            4 => DataType::Uint16,
            5 => DataType::Int32,
            6 => DataType::Uint32,
            7 => DataType::Int64,
            8 => DataType::Uint64,
            9 => DataType::Float32,
            10 => DataType::Float64,
            11 => DataType::Bool,
            _ => DataType::Invalid,
        }
    }
}

/// Rust scalar types that can be stored in or read out of an attribute.
///
/// Values are kept in host byte order inside attribute buffers, exactly as
/// they are transferred through the C API.
pub trait DracoScalar: Copy + Default + 'static {
    const DATA_TYPE: DataType;

    /// Converts a component of another type, `None` when not representable.
    fn cast_from<S: ToPrimitive>(value: S) -> Option<Self>;

    fn write_ne(self, out: &mut [u8]);
}

macro_rules! impl_numeric_scalar {
    ($($t:ty => $dt:ident),* $(,)?) => {
        $(
            impl DracoScalar for $t {
                const DATA_TYPE: DataType = DataType::$dt;

                fn cast_from<S: ToPrimitive>(value: S) -> Option<Self> {
                    <$t as NumCast>::from(value)
                }

                fn write_ne(self, out: &mut [u8]) {
                    out[..std::mem::size_of::<$t>()].copy_from_slice(&self.to_ne_bytes());
                }
            }
        )*
    };
}

impl_numeric_scalar!(
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
);

impl DracoScalar for bool {
    const DATA_TYPE: DataType = DataType::Bool;

    fn cast_from<S: ToPrimitive>(value: S) -> Option<Self> {
        value.to_f64().map(|v| v != 0.0)
    }

    fn write_ne(self, out: &mut [u8]) {
        out[0] = self as u8;
    }
}

/// Reads one component of type `data_type` from `bytes` and converts it.
pub fn convert_component<T: DracoScalar>(data_type: DataType, bytes: &[u8]) -> Option<T> {
    if bytes.len() < data_type.byte_length() {
        return None;
    }
    match data_type {
        DataType::Int8 => T::cast_from(bytes[0] as i8),
        DataType::Uint8 => T::cast_from(bytes[0]),
        DataType::Int16 => T::cast_from(NativeEndian::read_i16(bytes)),
        DataType::Uint16 => T::cast_from(NativeEndian::read_u16(bytes)),
        DataType::Int32 => T::cast_from(NativeEndian::read_i32(bytes)),
        DataType::Uint32 => T::cast_from(NativeEndian::read_u32(bytes)),
        DataType::Int64 => T::cast_from(NativeEndian::read_i64(bytes)),
        DataType::Uint64 => T::cast_from(NativeEndian::read_u64(bytes)),
        DataType::Float32 => T::cast_from(NativeEndian::read_f32(bytes)),
        DataType::Float64 => T::cast_from(NativeEndian::read_f64(bytes)),
        DataType::Bool => T::cast_from((bytes[0] != 0) as u8),
        DataType::Invalid => None,
    }
}

/// Reorders every component of `data` between host and little-endian order.
/// A no-op on little-endian hosts.
pub fn swap_le_in_place(data_type: DataType, data: &mut [u8]) {
    let width = data_type.byte_length();
    if cfg!(target_endian = "big") && width > 1 {
        data.chunks_exact_mut(width).for_each(|c| c.reverse());
    }
}
