//! Boxed values.
//!
//! Boxed values are opaque structs with a runtime type and their own copy and free functions.
//! Copying a boxed value never shares the managed pointer of the source: the copy function is
//! called and the new instance is wrapped in a new managed pointer.

use std::{any::type_name, ptr::NonNull};

use super::{type_tag::HasTypeTag, CopyFn};
use crate::{
    data::managed::ManagedWrapper,
    error::{GiResult, PointerError},
    memory::{finalizer::FinalizerFn, managed_ptr::ManagedPtr},
};

/// Trait implemented by wrappers of boxed values.
///
/// Safety: `COPY` must return a new instance of `Self::Foreign` that is owned by the caller, or
/// null, and `FREE` must release such an instance.
pub unsafe trait BoxedType: ManagedWrapper + HasTypeTag {
    /// Copies an instance, e.g. a function that calls `g_boxed_copy` with the type of `Self`.
    const COPY: CopyFn;

    /// Frees an instance, e.g. a function that calls `g_boxed_free` with the type of `Self`.
    const FREE: FinalizerFn;

    /// Wrap a boxed value whose ownership is transferred to the wrapper.
    ///
    /// Returns `PointerError::InvalidPointer` if `ptr` is null.
    ///
    /// Safety: `ptr` must point to a valid instance that is owned by the caller.
    #[track_caller]
    unsafe fn wrap_boxed(ptr: *mut Self::Foreign) -> GiResult<Self> {
        let ptr = ManagedPtr::wrap(ptr, Self::FREE)?;
        Ok(Self::from_managed_ptr(ptr))
    }

    /// Wrap a copy of a boxed value that is borrowed.
    ///
    /// Returns `PointerError::InvalidPointer` if `ptr` is null.
    ///
    /// Safety: `ptr` must point to a valid instance.
    #[track_caller]
    unsafe fn new_boxed(ptr: *const Self::Foreign) -> GiResult<Self> {
        if ptr.is_null() {
            return Err(PointerError::InvalidPointer {
                type_name: type_name::<Self::Foreign>(),
            }
            .into());
        }

        let copy = boxed_copy::<Self>(ptr)?;
        Ok(Self::from_managed_ptr(ManagedPtr::wrap_non_null(
            copy,
            Self::FREE,
        )))
    }

    /// Copy the boxed value and return the raw pointer to the copy, which is owned by the
    /// caller.
    #[track_caller]
    fn copy_boxed_ptr(&self) -> GiResult<NonNull<Self::Foreign>> {
        let ptr = self.managed_ptr().access();
        // Safety: `ptr` points to a valid instance.
        unsafe { boxed_copy::<Self>(ptr.as_ptr()) }
    }

    /// Copy the boxed value.
    ///
    /// The copy has its own managed pointer, disowning either has no effect on the other.
    #[track_caller]
    fn copy_boxed(&self) -> GiResult<Self> {
        let copy = self.copy_boxed_ptr()?;
        // Safety: the copy is a new instance owned by us.
        let ptr = unsafe { ManagedPtr::wrap_non_null(copy, Self::FREE) };
        Ok(Self::from_managed_ptr(ptr))
    }

    /// Free the boxed value now rather than when it's dropped.
    ///
    /// This is only possible if `self` is the last handle to its managed pointer, otherwise
    /// nothing happens and `self` is returned. A disowned value belongs to its new owner and
    /// isn't freed.
    #[track_caller]
    fn free_boxed(self) -> Result<(), Self> {
        if self.managed_ptr().handle_count() != 1 {
            return Err(self);
        }

        if let Some(ptr) = self.managed_ptr().try_disown() {
            // Safety: no other handle to the instance exists.
            unsafe { Self::FREE(ptr.as_ptr().cast()) }
        }

        Ok(())
    }
}

unsafe fn boxed_copy<B: BoxedType>(ptr: *const B::Foreign) -> GiResult<NonNull<B::Foreign>> {
    match NonNull::new(B::COPY(ptr.cast()).cast::<B::Foreign>()) {
        Some(copy) => Ok(copy),
        None => Err(PointerError::CopyFailed { type_name: B::NAME })?,
    }
}
