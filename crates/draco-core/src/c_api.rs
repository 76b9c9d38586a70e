//! C API for the Draco engine.
//!
//! Every handle is heap allocated by a `draco_new_*` function and released
//! by the matching `*_free` function. All functions accept null handles and
//! return a neutral value for them. A mesh handle is a point cloud handle
//! with faces, so every `draco_point_cloud_*` function accepts a mesh.

#![allow(non_camel_case_types)]

use std::ffi::c_void;
use std::os::raw::{c_char, c_int};
use std::ptr;
use std::slice;

use log::warn;

use crate::compression_config::EncodedGeometryType;
use crate::decode::Decoder;
use crate::draco_types::{DataType, DracoScalar};
use crate::encode::Encoder;
use crate::encoder_buffer::EncoderBuffer;
use crate::geometry_attribute::{GeometryAttributeType, PointAttribute};
use crate::mesh::Mesh;
use crate::point_cloud::PointCloud;
use crate::point_cloud_builder::PointCloudBuilder;
use crate::status::{DracoError, ErrorCode, Status};
use crate::triangle_soup_mesh_builder::TriangleSoupMeshBuilder;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum draco_encoded_geometry_type {
    DRACO_EGT_INVALID = -1,
    DRACO_EGT_POINT_CLOUD = 0,
    DRACO_EGT_TRIANGULAR_MESH = 1,
}

impl From<EncodedGeometryType> for draco_encoded_geometry_type {
    fn from(value: EncodedGeometryType) -> Self {
        match value {
            EncodedGeometryType::InvalidGeometryType => draco_encoded_geometry_type::DRACO_EGT_INVALID,
            EncodedGeometryType::PointCloud => draco_encoded_geometry_type::DRACO_EGT_POINT_CLOUD,
            EncodedGeometryType::TriangularMesh => draco_encoded_geometry_type::DRACO_EGT_TRIANGULAR_MESH,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum draco_geometry_attr_type {
    DRACO_GAT_INVALID = -1,
    DRACO_GAT_POSITION = 0,
    DRACO_GAT_NORMAL = 1,
    DRACO_GAT_COLOR = 2,
    DRACO_GAT_TEX_COORD = 3,
    DRACO_GAT_GENERIC = 4,
}

impl From<GeometryAttributeType> for draco_geometry_attr_type {
    fn from(value: GeometryAttributeType) -> Self {
        match value {
            GeometryAttributeType::Invalid => draco_geometry_attr_type::DRACO_GAT_INVALID,
            GeometryAttributeType::Position => draco_geometry_attr_type::DRACO_GAT_POSITION,
            GeometryAttributeType::Normal => draco_geometry_attr_type::DRACO_GAT_NORMAL,
            GeometryAttributeType::Color => draco_geometry_attr_type::DRACO_GAT_COLOR,
            GeometryAttributeType::TexCoord => draco_geometry_attr_type::DRACO_GAT_TEX_COORD,
            GeometryAttributeType::Generic => draco_geometry_attr_type::DRACO_GAT_GENERIC,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum draco_data_type {
    DRACO_DT_INVALID = 0,
    DRACO_DT_INT8,
    DRACO_DT_UINT8,
    DRACO_DT_INT16,
    DRACO_DT_UINT16,
    DRACO_DT_INT32,
    DRACO_DT_UINT32,
    DRACO_DT_INT64,
    DRACO_DT_UINT64,
    DRACO_DT_FLOAT32,
    DRACO_DT_FLOAT64,
    DRACO_DT_BOOL,
}

impl From<DataType> for draco_data_type {
    fn from(value: DataType) -> Self {
        match value {
            DataType::Invalid => draco_data_type::DRACO_DT_INVALID,
            DataType::Int8 => draco_data_type::DRACO_DT_INT8,
            DataType::Uint8 => draco_data_type::DRACO_DT_UINT8,
            DataType::Int16 => draco_data_type::DRACO_DT_INT16,
            DataType::Uint16 => draco_data_type::DRACO_DT_UINT16,
            DataType::Int32 => draco_data_type::DRACO_DT_INT32,
            DataType::Uint32 => draco_data_type::DRACO_DT_UINT32,
            DataType::Int64 => draco_data_type::DRACO_DT_INT64,
            DataType::Uint64 => draco_data_type::DRACO_DT_UINT64,
            DataType::Float32 => draco_data_type::DRACO_DT_FLOAT32,
            DataType::Float64 => draco_data_type::DRACO_DT_FLOAT64,
            DataType::Bool => draco_data_type::DRACO_DT_BOOL,
        }
    }
}

/// Log level for `draco_logging_init`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum draco_log_level {
    DRACO_LOG_OFF = 0,
    DRACO_LOG_ERROR = 1,
    DRACO_LOG_WARN = 2,
    DRACO_LOG_INFO = 3,
    DRACO_LOG_DEBUG = 4,
    DRACO_LOG_TRACE = 5,
}

impl From<draco_log_level> for log::LevelFilter {
    fn from(level: draco_log_level) -> Self {
        match level {
            draco_log_level::DRACO_LOG_OFF => log::LevelFilter::Off,
            draco_log_level::DRACO_LOG_ERROR => log::LevelFilter::Error,
            draco_log_level::DRACO_LOG_WARN => log::LevelFilter::Warn,
            draco_log_level::DRACO_LOG_INFO => log::LevelFilter::Info,
            draco_log_level::DRACO_LOG_DEBUG => log::LevelFilter::Debug,
            draco_log_level::DRACO_LOG_TRACE => log::LevelFilter::Trace,
        }
    }
}

/// Result of a decode or encode call.
pub struct draco_status_t {
    code: ErrorCode,
    message: String,
}

impl draco_status_t {
    fn boxed(status: Status) -> *mut draco_status_t {
        let status = match status {
            Ok(()) => draco_status_t {
                code: ErrorCode::Ok,
                message: String::new(),
            },
            Err(err) => draco_status_t {
                code: err.code(),
                message: err.message().to_string(),
            },
        };
        Box::into_raw(Box::new(status))
    }
}

/// An attribute owned by a point cloud. Valid while the point cloud lives.
#[repr(transparent)]
pub struct draco_point_attr_t(PointAttribute);

impl draco_point_attr_t {
    fn from_attribute(att: &PointAttribute) -> *const draco_point_attr_t {
        (att as *const PointAttribute).cast()
    }
}

pub struct draco_point_cloud_t {
    geometry: Mesh,
}

pub type draco_mesh_t = draco_point_cloud_t;

pub struct draco_decoder_t(Decoder);

pub struct draco_encoder_t(Encoder);

pub struct draco_point_cloud_builder_t(PointCloudBuilder);

pub struct draco_mesh_builder_t(TriangleSoupMeshBuilder);

fn new_geometry(geometry: Mesh) -> *mut draco_point_cloud_t {
    Box::into_raw(Box::new(draco_point_cloud_t { geometry }))
}

// ===== Logging =====

/// Installs an `env_logger` backend for the engine's log output.
///
/// Returns false if a logger is already installed.
#[no_mangle]
pub extern "C" fn draco_logging_init(level: draco_log_level) -> bool {
    env_logger::Builder::new()
        .filter_level(level.into())
        .format_timestamp_millis()
        .try_init()
        .is_ok()
}

// ===== Status =====

/// # Safety
/// `status` must be null or a pointer returned by this library, freed once.
#[no_mangle]
pub unsafe extern "C" fn draco_status_free(status: *mut draco_status_t) {
    if !status.is_null() {
        drop(Box::from_raw(status));
    }
}

/// # Safety
/// `status` must be null or a live status.
#[no_mangle]
pub unsafe extern "C" fn draco_status_code(status: *const draco_status_t) -> c_int {
    status.as_ref().map_or(ErrorCode::DracoError as c_int, |s| s.code as c_int)
}

/// # Safety
/// `status` must be null or a live status.
#[no_mangle]
pub unsafe extern "C" fn draco_status_ok(status: *const draco_status_t) -> bool {
    status.as_ref().is_some_and(|s| s.code == ErrorCode::Ok)
}

/// Message length including the NUL terminator.
///
/// # Safety
/// `status` must be null or a live status.
#[no_mangle]
pub unsafe extern "C" fn draco_status_error_msg_length(status: *const draco_status_t) -> usize {
    status.as_ref().map_or(0, |s| s.message.len() + 1)
}

/// Copies the NUL-terminated message into `msg`. Returns the number of bytes
/// written, or 0 when `msg` is null or `length` is too small.
///
/// # Safety
/// `status` must be null or a live status; `msg` must be null or valid for
/// `length` bytes.
#[no_mangle]
pub unsafe extern "C" fn draco_status_error_msg(
    status: *const draco_status_t,
    msg: *mut c_char,
    length: usize,
) -> usize {
    let Some(status) = status.as_ref() else {
        return 0;
    };
    let text = status.message.as_bytes();
    if msg.is_null() || text.len() >= length {
        return 0;
    }
    let out = slice::from_raw_parts_mut(msg.cast::<u8>(), text.len() + 1);
    out[..text.len()].copy_from_slice(text);
    out[text.len()] = 0;
    text.len() + 1
}

// ===== Point attribute =====

/// # Safety
/// `pa` must be null or an attribute of a live point cloud.
#[no_mangle]
pub unsafe extern "C" fn draco_point_attr_size(pa: *const draco_point_attr_t) -> usize {
    pa.as_ref().map_or(0, |a| a.0.size())
}

/// # Safety
/// `pa` must be null or an attribute of a live point cloud.
#[no_mangle]
pub unsafe extern "C" fn draco_point_attr_type(pa: *const draco_point_attr_t) -> draco_geometry_attr_type {
    pa.as_ref().map_or(draco_geometry_attr_type::DRACO_GAT_INVALID, |a| {
        a.0.attribute_type().into()
    })
}

/// # Safety
/// `pa` must be null or an attribute of a live point cloud.
#[no_mangle]
pub unsafe extern "C" fn draco_point_data_type(pa: *const draco_point_attr_t) -> draco_data_type {
    pa.as_ref()
        .map_or(draco_data_type::DRACO_DT_INVALID, |a| a.0.data_type().into())
}

/// # Safety
/// `pa` must be null or an attribute of a live point cloud.
#[no_mangle]
pub unsafe extern "C" fn draco_point_attr_num_components(pa: *const draco_point_attr_t) -> i8 {
    pa.as_ref().map_or(0, |a| a.0.num_components() as i8)
}

/// # Safety
/// `pa` must be null or an attribute of a live point cloud.
#[no_mangle]
pub unsafe extern "C" fn draco_point_attr_normalized(pa: *const draco_point_attr_t) -> bool {
    pa.as_ref().is_some_and(|a| a.0.normalized())
}

/// # Safety
/// `pa` must be null or an attribute of a live point cloud.
#[no_mangle]
pub unsafe extern "C" fn draco_point_attr_byte_stride(pa: *const draco_point_attr_t) -> i64 {
    pa.as_ref().map_or(0, |a| a.0.byte_stride())
}

/// # Safety
/// `pa` must be null or an attribute of a live point cloud.
#[no_mangle]
pub unsafe extern "C" fn draco_point_attr_byte_offset(pa: *const draco_point_attr_t) -> i64 {
    pa.as_ref().map_or(0, |a| a.0.byte_offset())
}

/// # Safety
/// `pa` must be null or an attribute of a live point cloud.
#[no_mangle]
pub unsafe extern "C" fn draco_point_attr_unique_id(pa: *const draco_point_attr_t) -> u32 {
    pa.as_ref().map_or(0, |a| a.0.unique_id())
}

// ===== Point cloud =====

#[no_mangle]
pub extern "C" fn draco_new_point_cloud() -> *mut draco_point_cloud_t {
    new_geometry(Mesh::new())
}

/// # Safety
/// `pc` must be null or a pointer returned by this library, freed once.
#[no_mangle]
pub unsafe extern "C" fn draco_point_cloud_free(pc: *mut draco_point_cloud_t) {
    if !pc.is_null() {
        drop(Box::from_raw(pc));
    }
}

/// # Safety
/// `pc` must be null or a live point cloud.
#[no_mangle]
pub unsafe extern "C" fn draco_point_cloud_num_points(pc: *const draco_point_cloud_t) -> u32 {
    pc.as_ref().map_or(0, |pc| pc.geometry.num_points() as u32)
}

/// # Safety
/// `pc` must be null or a live point cloud.
#[no_mangle]
pub unsafe extern "C" fn draco_point_cloud_num_attrs(pc: *const draco_point_cloud_t) -> i32 {
    pc.as_ref().map_or(0, |pc| pc.geometry.num_attributes())
}

/// Null when `att_id` is out of range.
///
/// # Safety
/// `pc` must be null or a live point cloud.
#[no_mangle]
pub unsafe extern "C" fn draco_point_cloud_get_attribute(
    pc: *const draco_point_cloud_t,
    att_id: i32,
) -> *const draco_point_attr_t {
    pc.as_ref()
        .and_then(|pc| pc.geometry.attribute(att_id))
        .map_or(ptr::null(), draco_point_attr_t::from_attribute)
}

/// -1 when no attribute has the role.
///
/// # Safety
/// `pc` must be null or a live point cloud.
#[no_mangle]
pub unsafe extern "C" fn draco_point_cloud_get_named_attribute_id(
    pc: *const draco_point_cloud_t,
    geo_type: c_int,
) -> i32 {
    let role = GeometryAttributeType::from_tag(geo_type as i64);
    match pc.as_ref() {
        Some(pc) if role != GeometryAttributeType::Invalid => pc.geometry.named_attribute_id(role),
        _ => -1,
    }
}

/// # Safety
/// `pc` must be null or a live point cloud.
#[no_mangle]
pub unsafe extern "C" fn draco_point_cloud_get_attribute_by_unique_id(
    pc: *const draco_point_cloud_t,
    unique_id: u32,
) -> *const draco_point_attr_t {
    pc.as_ref()
        .and_then(|pc| pc.geometry.attribute_by_unique_id(unique_id))
        .map_or(ptr::null(), draco_point_attr_t::from_attribute)
}

fn fill_attribute_data<T: DracoScalar>(att: &PointAttribute, out: &mut [u8]) -> bool {
    let num_components = att.num_components() as usize;
    let width = std::mem::size_of::<T>();
    if num_components == 0 {
        return out.is_empty();
    }
    if T::DATA_TYPE == att.data_type() && T::DATA_TYPE != DataType::Bool {
        let src = att.buffer().data();
        if src.len() < out.len() {
            return false;
        }
        out.copy_from_slice(&src[..out.len()]);
        return true;
    }
    let mut values = vec![T::default(); num_components];
    for (p, entry) in out.chunks_exact_mut(num_components * width).enumerate() {
        if !att.convert_value(att.mapped_index(p.into()), &mut values) {
            return false;
        }
        for (value, bytes) in values.iter().zip(entry.chunks_exact_mut(width)) {
            value.write_ne(bytes);
        }
    }
    true
}

/// Copies all point values of `pa` converted to `data_type` into
/// `out_values`. `out_size` is in bytes and must equal
/// `num_points * num_components * sizeof(data_type)`. Returns false on a
/// size mismatch, an invalid type, or a value not representable in the
/// requested type.
///
/// # Safety
/// `pc` must be null or a live point cloud and `pa` one of its attributes;
/// `out_values` must be valid for `out_size` bytes and may be null only
/// when `out_size` is 0.
#[no_mangle]
pub unsafe extern "C" fn draco_point_cloud_get_attribute_data(
    pc: *const draco_point_cloud_t,
    pa: *const draco_point_attr_t,
    data_type: u32,
    out_size: usize,
    out_values: *mut c_void,
) -> bool {
    let (Some(pc), Some(pa)) = (pc.as_ref(), pa.as_ref()) else {
        return false;
    };
    let pc: &PointCloud = &pc.geometry;
    let att = &pa.0;
    if !pc.attributes().iter().any(|a| ptr::eq(a, att)) {
        warn!("attribute does not belong to the point cloud");
        return false;
    }
    let data_type = DataType::from_tag(data_type);
    if data_type == DataType::Invalid {
        return false;
    }
    let expected = pc.num_points() * att.num_components() as usize * data_type.byte_length();
    if expected != out_size {
        return false;
    }
    if out_size == 0 {
        return true;
    }
    if out_values.is_null() {
        return false;
    }
    let out = slice::from_raw_parts_mut(out_values.cast::<u8>(), out_size);
    match data_type {
        DataType::Int8 => fill_attribute_data::<i8>(att, out),
        DataType::Uint8 => fill_attribute_data::<u8>(att, out),
        DataType::Int16 => fill_attribute_data::<i16>(att, out),
        DataType::Uint16 => fill_attribute_data::<u16>(att, out),
        DataType::Int32 => fill_attribute_data::<i32>(att, out),
        DataType::Uint32 => fill_attribute_data::<u32>(att, out),
        DataType::Int64 => fill_attribute_data::<i64>(att, out),
        DataType::Uint64 => fill_attribute_data::<u64>(att, out),
        DataType::Float32 => fill_attribute_data::<f32>(att, out),
        DataType::Float64 => fill_attribute_data::<f64>(att, out),
        DataType::Bool => fill_attribute_data::<bool>(att, out),
        DataType::Invalid => false,
    }
}

// ===== Mesh =====

#[no_mangle]
pub extern "C" fn draco_new_mesh() -> *mut draco_mesh_t {
    new_geometry(Mesh::new())
}

/// # Safety
/// `mesh` must be null or a pointer returned by this library, freed once.
#[no_mangle]
pub unsafe extern "C" fn draco_mesh_free(mesh: *mut draco_mesh_t) {
    draco_point_cloud_free(mesh);
}

/// # Safety
/// `mesh` must be null or a live mesh.
#[no_mangle]
pub unsafe extern "C" fn draco_mesh_num_faces(mesh: *const draco_mesh_t) -> u32 {
    mesh.as_ref().map_or(0, |m| m.geometry.num_faces() as u32)
}

/// Copies the face indices as `u32`. `out_size` is in bytes and must equal
/// `num_faces * 3 * 4`.
///
/// # Safety
/// `mesh` must be null or a live mesh; `out_values` must be valid for
/// `out_size` bytes and may be null only when `out_size` is 0.
#[no_mangle]
pub unsafe extern "C" fn draco_mesh_get_indices(
    mesh: *const draco_mesh_t,
    out_size: usize,
    out_values: *mut u32,
) -> bool {
    let Some(mesh) = mesh.as_ref() else {
        return false;
    };
    let faces = mesh.geometry.faces();
    if out_size != faces.len() * 3 * std::mem::size_of::<u32>() {
        return false;
    }
    if faces.is_empty() {
        return true;
    }
    if out_values.is_null() {
        return false;
    }
    let out = slice::from_raw_parts_mut(out_values, faces.len() * 3);
    for (dst, face) in out.chunks_exact_mut(3).zip(faces) {
        for (d, p) in dst.iter_mut().zip(face) {
            *d = p.0;
        }
    }
    true
}

// ===== Decoder =====

/// Reads only the header of `data`.
///
/// # Safety
/// `data` must be null or valid for `data_size` bytes.
#[no_mangle]
pub unsafe extern "C" fn draco_get_encoded_geometry_type(
    data: *const c_char,
    data_size: usize,
) -> draco_encoded_geometry_type {
    if data.is_null() {
        return draco_encoded_geometry_type::DRACO_EGT_INVALID;
    }
    let bytes = slice::from_raw_parts(data.cast::<u8>(), data_size);
    Decoder::get_encoded_geometry_type(bytes)
        .unwrap_or(EncodedGeometryType::InvalidGeometryType)
        .into()
}

#[no_mangle]
pub extern "C" fn draco_new_decoder() -> *mut draco_decoder_t {
    Box::into_raw(Box::new(draco_decoder_t(Decoder::new())))
}

/// # Safety
/// `decoder` must be null or a pointer returned by this library, freed once.
#[no_mangle]
pub unsafe extern "C" fn draco_decoder_free(decoder: *mut draco_decoder_t) {
    if !decoder.is_null() {
        drop(Box::from_raw(decoder));
    }
}

unsafe fn input_bytes<'a>(data: *const c_char, data_size: usize) -> &'a [u8] {
    if data.is_null() || data_size == 0 {
        &[]
    } else {
        slice::from_raw_parts(data.cast::<u8>(), data_size)
    }
}

fn invalid_handles() -> *mut draco_status_t {
    draco_status_t::boxed(Err(DracoError::InvalidParameter("Null handle.".into())))
}

/// Decodes `data` into `out_mesh`, replacing its contents. Always returns a
/// status to be released with `draco_status_free`.
///
/// # Safety
/// Handles must be null or live; `data` must be null or valid for
/// `data_size` bytes.
#[no_mangle]
pub unsafe extern "C" fn draco_decoder_decode_mesh(
    decoder: *mut draco_decoder_t,
    data: *const c_char,
    data_size: usize,
    out_mesh: *mut draco_mesh_t,
) -> *mut draco_status_t {
    let (Some(decoder), Some(out)) = (decoder.as_ref(), out_mesh.as_mut()) else {
        return invalid_handles();
    };
    let bytes = input_bytes(data, data_size);
    draco_status_t::boxed(decoder.0.decode_mesh_from_buffer(bytes, &mut out.geometry))
}

/// Decodes `data` into `out_pc` without connectivity.
///
/// # Safety
/// Handles must be null or live; `data` must be null or valid for
/// `data_size` bytes.
#[no_mangle]
pub unsafe extern "C" fn draco_decoder_decode_point_cloud(
    decoder: *mut draco_decoder_t,
    data: *const c_char,
    data_size: usize,
    out_pc: *mut draco_point_cloud_t,
) -> *mut draco_status_t {
    let (Some(decoder), Some(out)) = (decoder.as_ref(), out_pc.as_mut()) else {
        return invalid_handles();
    };
    let bytes = input_bytes(data, data_size);
    let mut pc = PointCloud::new();
    let status = decoder.0.decode_point_cloud_from_buffer(bytes, &mut pc);
    if status.is_ok() {
        out.geometry = Mesh::from(pc);
    }
    draco_status_t::boxed(status)
}

// ===== Encoder =====

#[no_mangle]
pub extern "C" fn draco_new_encoder() -> *mut draco_encoder_t {
    Box::into_raw(Box::new(draco_encoder_t(Encoder::new())))
}

/// # Safety
/// `encoder` must be null or a pointer returned by this library, freed once.
#[no_mangle]
pub unsafe extern "C" fn draco_encoder_free(encoder: *mut draco_encoder_t) {
    if !encoder.is_null() {
        drop(Box::from_raw(encoder));
    }
}

/// # Safety
/// `encoder` must be null or live.
#[no_mangle]
pub unsafe extern "C" fn draco_encoder_set_attribute_quantization(
    encoder: *mut draco_encoder_t,
    att: u32,
    bits: c_int,
) {
    let Some(encoder) = encoder.as_mut() else {
        return;
    };
    let role = GeometryAttributeType::from_tag(att as i64);
    if let Err(err) = encoder.0.set_attribute_quantization(role, bits) {
        warn!("draco_encoder_set_attribute_quantization: {}", err);
    }
}

/// Hands the encoded bytes to the caller. They must be released with
/// `draco_buffer_free`.
unsafe fn write_output(buffer: EncoderBuffer, out_data: *mut *mut c_char, data_size: *mut usize) {
    let bytes = buffer.into_vec().into_boxed_slice();
    let len = bytes.len();
    let raw = Box::into_raw(bytes).cast::<c_char>();
    if out_data.is_null() || data_size.is_null() {
        draco_buffer_free(raw, len);
        return;
    }
    *out_data = raw;
    *data_size = len;
}

/// Encodes `in_mesh`. The output buffer is produced even on failure and must
/// be released with `draco_buffer_free`.
///
/// # Safety
/// Handles must be null or live; `out_data` and `data_size` must be valid
/// for writes.
#[no_mangle]
pub unsafe extern "C" fn draco_encoder_encode_mesh(
    encoder: *mut draco_encoder_t,
    in_mesh: *mut draco_mesh_t,
    out_data: *mut *mut c_char,
    data_size: *mut usize,
) -> *mut draco_status_t {
    let mut buffer = EncoderBuffer::new();
    let status = match (encoder.as_ref(), in_mesh.as_ref()) {
        (Some(encoder), Some(mesh)) => encoder.0.encode_mesh_to_buffer(&mesh.geometry, &mut buffer),
        _ => Err(DracoError::InvalidParameter("Null handle.".into())),
    };
    write_output(buffer, out_data, data_size);
    draco_status_t::boxed(status)
}

/// Encodes `in_pc` as a point cloud, ignoring any faces.
///
/// # Safety
/// Handles must be null or live; `out_data` and `data_size` must be valid
/// for writes.
#[no_mangle]
pub unsafe extern "C" fn draco_encoder_encode_point_cloud(
    encoder: *mut draco_encoder_t,
    in_pc: *mut draco_point_cloud_t,
    out_data: *mut *mut c_char,
    data_size: *mut usize,
) -> *mut draco_status_t {
    let mut buffer = EncoderBuffer::new();
    let status = match (encoder.as_ref(), in_pc.as_ref()) {
        (Some(encoder), Some(pc)) => encoder.0.encode_point_cloud_to_buffer(&pc.geometry, &mut buffer),
        _ => Err(DracoError::InvalidParameter("Null handle.".into())),
    };
    write_output(buffer, out_data, data_size);
    draco_status_t::boxed(status)
}

/// Releases a buffer returned by an encode call.
///
/// # Safety
/// `data` must be null or a buffer returned by this library with its size,
/// freed once.
#[no_mangle]
pub unsafe extern "C" fn draco_buffer_free(data: *mut c_char, size: usize) {
    if !data.is_null() {
        drop(Box::from_raw(ptr::slice_from_raw_parts_mut(data.cast::<u8>(), size)));
    }
}

// ===== Builders =====

/// Checks a set-attribute request and returns its raw bytes.
unsafe fn attribute_source<'a>(
    count: c_int,
    expected_count: Option<usize>,
    values_per_item: usize,
    src: *const c_void,
    att: u32,
    ncomp: i8,
    dt: u32,
) -> Option<(GeometryAttributeType, u8, DataType, &'a [u8])> {
    let role = GeometryAttributeType::from_tag(att as i64);
    let data_type = DataType::from_tag(dt);
    let expected = expected_count?;
    if src.is_null()
        || usize::try_from(count).ok() != Some(expected)
        || role == GeometryAttributeType::Invalid
        || data_type == DataType::Invalid
        || !(1..=4).contains(&ncomp)
    {
        warn!(
            "rejected set attribute: count {} (expected {}), role {}, {} components, type {}",
            count, expected, att, ncomp, dt
        );
        return None;
    }
    let len = expected * values_per_item * ncomp as usize * data_type.byte_length();
    let bytes = if len == 0 {
        &[][..]
    } else {
        slice::from_raw_parts(src.cast::<u8>(), len)
    };
    Some((role, ncomp as u8, data_type, bytes))
}

#[no_mangle]
pub extern "C" fn draco_new_point_cloud_builder() -> *mut draco_point_cloud_builder_t {
    Box::into_raw(Box::new(draco_point_cloud_builder_t(PointCloudBuilder::new())))
}

/// # Safety
/// `builder` must be null or a pointer returned by this library, freed once.
#[no_mangle]
pub unsafe extern "C" fn draco_point_cloud_builder_free(builder: *mut draco_point_cloud_builder_t) {
    if !builder.is_null() {
        drop(Box::from_raw(builder));
    }
}

/// # Safety
/// `builder` must be null or live.
#[no_mangle]
pub unsafe extern "C" fn draco_point_cloud_builder_start(builder: *mut draco_point_cloud_builder_t, size: c_int) {
    if let Some(builder) = builder.as_mut() {
        builder.0.start(usize::try_from(size).unwrap_or(0));
    }
}

/// Adds an attribute with `num_points * ncomp` values of type `dt` read from
/// `src`. Returns the attribute id, or -1.
///
/// # Safety
/// `builder` must be null or live; `src` must be null or hold
/// `num_points * ncomp` values of type `dt`.
#[no_mangle]
pub unsafe extern "C" fn draco_point_cloud_set_attribute(
    num_points: c_int,
    builder: *mut draco_point_cloud_builder_t,
    src: *const c_void,
    att: u32,
    ncomp: i8,
    dt: u32,
) -> c_int {
    let Some(builder) = builder.as_mut() else {
        return -1;
    };
    let Some((role, ncomp, data_type, bytes)) =
        attribute_source(num_points, builder.0.num_points(), 1, src, att, ncomp, dt)
    else {
        return -1;
    };
    let att_id = builder.0.add_attribute(role, ncomp, data_type, false);
    if att_id < 0 || !builder.0.set_attribute_values_for_all_points(att_id, bytes) {
        return -1;
    }
    att_id
}

/// Finalizes the build once. Later calls return null.
///
/// # Safety
/// `builder` must be null or live.
#[no_mangle]
pub unsafe extern "C" fn draco_point_cloud_builder_get(
    builder: *mut draco_point_cloud_builder_t,
) -> *mut draco_point_cloud_t {
    builder
        .as_mut()
        .and_then(|b| b.0.finalize())
        .map_or(ptr::null_mut(), |pc| new_geometry(Mesh::from(pc)))
}

#[no_mangle]
pub extern "C" fn draco_new_mesh_builder() -> *mut draco_mesh_builder_t {
    Box::into_raw(Box::new(draco_mesh_builder_t(TriangleSoupMeshBuilder::new())))
}

/// # Safety
/// `builder` must be null or a pointer returned by this library, freed once.
#[no_mangle]
pub unsafe extern "C" fn draco_mesh_builder_free(builder: *mut draco_mesh_builder_t) {
    if !builder.is_null() {
        drop(Box::from_raw(builder));
    }
}

/// # Safety
/// `builder` must be null or live.
#[no_mangle]
pub unsafe extern "C" fn draco_mesh_builder_start(builder: *mut draco_mesh_builder_t, num_faces: c_int) {
    if let Some(builder) = builder.as_mut() {
        builder.0.start(usize::try_from(num_faces).unwrap_or(0));
    }
}

/// Adds a corner attribute with `3 * num_faces * ncomp` values of type `dt`
/// read from `src`, face by face. Returns the attribute id, or -1.
///
/// # Safety
/// `builder` must be null or live; `src` must be null or hold
/// `3 * num_faces * ncomp` values of type `dt`.
#[no_mangle]
pub unsafe extern "C" fn draco_mesh_set_attribute(
    num_faces: c_int,
    builder: *mut draco_mesh_builder_t,
    src: *const c_void,
    att: u32,
    ncomp: i8,
    dt: u32,
) -> c_int {
    let Some(builder) = builder.as_mut() else {
        return -1;
    };
    let Some((role, ncomp, data_type, bytes)) =
        attribute_source(num_faces, builder.0.num_faces(), 3, src, att, ncomp, dt)
    else {
        return -1;
    };
    let att_id = builder.0.add_attribute(role, ncomp, data_type, false);
    if att_id < 0 || !builder.0.set_attribute_values_for_all_corners(att_id, bytes) {
        return -1;
    }
    att_id
}

/// Finalizes the build once. Later calls return null.
///
/// # Safety
/// `builder` must be null or live.
#[no_mangle]
pub unsafe extern "C" fn draco_mesh_builder_get(builder: *mut draco_mesh_builder_t) -> *mut draco_mesh_t {
    builder
        .as_mut()
        .and_then(|b| b.0.finalize())
        .map_or(ptr::null_mut(), new_geometry)
}
