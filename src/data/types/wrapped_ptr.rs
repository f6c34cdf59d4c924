//! Structs without a runtime type.
//!
//! Some structs have no runtime type and no allocator of their own. The bindings allocate them
//! with [`calloc_bytes`] and copy them with a type-specific function. Whether a struct is freed
//! depends on `FREE`: if it's `None` the struct is never freed by the bindings, which is used for
//! structs that are owned by a foreign container.
//!
//! [`calloc_bytes`]: crate::memory::alloc::calloc_bytes

use std::{any::type_name, ffi::c_void, ptr::NonNull};

use super::CopyFn;
use crate::{
    data::managed::ManagedWrapper,
    error::{GiResult, PointerError},
    memory::{
        alloc::{calloc_bytes, copy_bytes},
        finalizer::{Finalizer, FinalizerFn},
        managed_ptr::ManagedPtr,
    },
};

/// Trait implemented by wrappers of structs that are allocated by the bindings.
///
/// Safety: `SIZE` must be the size of `Self::Foreign`, `COPY` must return a new instance owned
/// by the caller, or null, and `FREE` must release instances allocated by [`WrappedPtr::calloc`]
/// and `COPY`.
pub unsafe trait WrappedPtr: ManagedWrapper {
    /// The size of the struct in bytes.
    const SIZE: usize;

    /// Copies an instance. Use [`copy_sized`] for structs that can be copied bytewise.
    const COPY: CopyFn;

    /// Frees an instance, `None` if instances must never be freed.
    const FREE: Option<FinalizerFn>;

    /// Allocate a zero-initialized instance. The caller is responsible for wrapping or freeing
    /// it.
    fn calloc() -> GiResult<NonNull<Self::Foreign>> {
        Ok(calloc_bytes(Self::SIZE)?.cast())
    }

    /// Allocate and wrap a zero-initialized instance.
    #[track_caller]
    fn new_zeroed() -> GiResult<Self> {
        let ptr = Self::calloc()?;
        // Safety: `ptr` is a new instance owned by us.
        unsafe { Ok(Self::wrap_non_null_ptr(ptr)) }
    }

    /// Wrap an instance whose ownership is transferred to the wrapper.
    ///
    /// Returns `PointerError::InvalidPointer` if `ptr` is null.
    ///
    /// Safety: `ptr` must point to a valid instance that can be freed with `FREE`.
    #[track_caller]
    unsafe fn wrap_ptr(ptr: *mut Self::Foreign) -> GiResult<Self> {
        match NonNull::new(ptr) {
            Some(ptr) => Ok(Self::wrap_non_null_ptr(ptr)),
            None => Err(PointerError::InvalidPointer {
                type_name: type_name::<Self::Foreign>(),
            })?,
        }
    }

    /// Wrap a copy of an instance that is borrowed.
    ///
    /// Returns `PointerError::InvalidPointer` if `ptr` is null.
    ///
    /// Safety: `ptr` must point to a valid instance.
    #[track_caller]
    unsafe fn new_ptr(ptr: *const Self::Foreign) -> GiResult<Self> {
        if ptr.is_null() {
            return Err(PointerError::InvalidPointer {
                type_name: type_name::<Self::Foreign>(),
            }
            .into());
        }

        let copy = wrapped_copy::<Self>(ptr)?;
        Ok(Self::wrap_non_null_ptr(copy))
    }

    /// Copy the struct.
    ///
    /// The copy has its own managed pointer, and is freed with `FREE`.
    #[track_caller]
    fn copy_wrapped(&self) -> GiResult<Self> {
        let ptr = self.managed_ptr().access();

        // Safety: `ptr` points to a valid instance, the copy is owned by us.
        unsafe {
            let copy = wrapped_copy::<Self>(ptr.as_ptr())?;
            Ok(Self::wrap_non_null_ptr(copy))
        }
    }

    #[doc(hidden)]
    #[track_caller]
    unsafe fn wrap_non_null_ptr(ptr: NonNull<Self::Foreign>) -> Self {
        let finalizer = Finalizer::from_optional(Self::FREE);
        Self::from_managed_ptr(ManagedPtr::wrap_non_null(ptr, finalizer))
    }
}

/// A [`CopyFn`] that copies `W::SIZE` bytes into a new allocation, which can be freed with
/// [`free_mem`].
///
/// [`free_mem`]: crate::memory::alloc::free_mem
pub unsafe extern "C" fn copy_sized<W: WrappedPtr>(ptr: *const c_void) -> *mut c_void {
    match NonNull::new(ptr as *mut c_void) {
        Some(src) => match copy_bytes(W::SIZE, src) {
            Ok(copy) => copy.as_ptr(),
            Err(_) => std::ptr::null_mut(),
        },
        None => std::ptr::null_mut(),
    }
}

unsafe fn wrapped_copy<W: WrappedPtr>(ptr: *const W::Foreign) -> GiResult<NonNull<W::Foreign>> {
    match NonNull::new(W::COPY(ptr.cast()).cast::<W::Foreign>()) {
        Some(copy) => Ok(copy),
        None => Err(PointerError::CopyFailed { type_name: W::NAME })?,
    }
}
