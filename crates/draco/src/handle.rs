use std::ptr::{self, NonNull};

use draco_core::c_api::{
    draco_decoder_free, draco_decoder_t, draco_encoder_free, draco_encoder_t, draco_mesh_builder_free,
    draco_mesh_builder_t, draco_point_cloud_builder_free, draco_point_cloud_builder_t, draco_point_cloud_free,
    draco_point_cloud_t,
};
use log::{trace, warn};

use crate::error::Error;

/// A native object type with a matching destructor.
pub(crate) trait NativeObject {
    const NAME: &'static str;

    /// # Safety
    /// `ptr` must be a live object of this type, freed once.
    unsafe fn free(ptr: *mut Self);
}

macro_rules! native_object {
    ($($t:ty => $free:ident, $name:literal);* $(;)?) => {
        $(
            impl NativeObject for $t {
                const NAME: &'static str = $name;

                unsafe fn free(ptr: *mut Self) {
                    $free(ptr)
                }
            }
        )*
    };
}

// Mesh handles are point cloud handles with faces and share the destructor.
native_object!(
    draco_point_cloud_t => draco_point_cloud_free, "geometry";
    draco_decoder_t => draco_decoder_free, "decoder";
    draco_encoder_t => draco_encoder_free, "encoder";
    draco_point_cloud_builder_t => draco_point_cloud_builder_free, "point cloud builder";
    draco_mesh_builder_t => draco_mesh_builder_free, "mesh builder";
);

/// Exclusive owner of one native object.
///
/// Release is idempotent and also runs on drop.
pub(crate) struct Handle<T: NativeObject> {
    ptr: Option<NonNull<T>>,
}

impl<T: NativeObject> Handle<T> {
    /// Takes ownership of `raw`. A null pointer yields a released handle.
    pub(crate) fn from_raw(raw: *mut T) -> Self {
        Self { ptr: NonNull::new(raw) }
    }

    /// The live pointer, or null with a warning once released. The engine
    /// treats null handles as empty.
    pub(crate) fn as_ptr(&self) -> *mut T {
        match self.ptr {
            Some(ptr) => ptr.as_ptr(),
            None => {
                warn!("{} used after release", T::NAME);
                ptr::null_mut()
            }
        }
    }

    pub(crate) fn live(&self) -> Result<*mut T, Error> {
        self.ptr.map(NonNull::as_ptr).ok_or(Error::Released)
    }

    pub(crate) fn is_released(&self) -> bool {
        self.ptr.is_none()
    }

    pub(crate) fn release(&mut self) {
        if let Some(ptr) = self.ptr.take() {
            trace!("releasing {} {:p}", T::NAME, ptr);
            unsafe { T::free(ptr.as_ptr()) };
        }
    }
}

impl<T: NativeObject> Drop for Handle<T> {
    fn drop(&mut self) {
        self.release();
    }
}

// The engine keeps no thread affinity; each handle has a single owner.
unsafe impl<T: NativeObject> Send for Handle<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use draco_core::c_api::draco_new_decoder;

    #[test]
    fn release_is_idempotent() {
        let mut handle = Handle::from_raw(draco_new_decoder());
        assert!(handle.live().is_ok());
        handle.release();
        handle.release();
        assert!(handle.is_released());
        assert_eq!(handle.live(), Err(Error::Released));
        assert!(handle.as_ptr().is_null());
    }

    #[test]
    fn null_is_released() {
        let handle = Handle::<draco_encoder_t>::from_raw(ptr::null_mut());
        assert!(handle.is_released());
    }
}
