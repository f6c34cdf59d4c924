//! Reference-counted objects.
//!
//! Objects keep track of their own reference count. A wrapper of an object owns one reference,
//! when the last handle to its managed pointer is dropped that reference is released with the
//! object's unref function.

use std::{any::type_name, ptr::NonNull};

use super::{
    type_tag::{HasTypeTag, TypeTagProvider},
    RefFn,
};
use crate::{
    data::managed::ManagedWrapper,
    error::{GiResult, PointerError, TypeError},
    memory::{finalizer::FinalizerFn, managed_ptr::ManagedPtr},
};

/// Trait implemented by wrappers of reference-counted objects.
///
/// Safety: `REF` and `UNREF` must add and release a reference to instances of `Self::Foreign`,
/// and every instance of `Self::Foreign` must be an instance of the runtime type of `Self`.
pub unsafe trait GObject: ManagedWrapper + HasTypeTag {
    /// Adds a reference, e.g. `g_object_ref`.
    const REF: RefFn;

    /// Releases a reference, e.g. `g_object_unref`.
    const UNREF: FinalizerFn;

    /// Wrap an object whose reference is transferred to the wrapper.
    ///
    /// Returns `PointerError::InvalidPointer` if `ptr` is null.
    ///
    /// Safety: `ptr` must point to a valid instance and the caller must own a reference to it.
    #[track_caller]
    unsafe fn wrap_object(ptr: *mut Self::Foreign) -> GiResult<Self> {
        let ptr = ManagedPtr::wrap(ptr, Self::UNREF)?;
        Ok(Self::from_managed_ptr(ptr))
    }

    /// Wrap an object that is borrowed, a new reference is added for the wrapper.
    ///
    /// Returns `PointerError::InvalidPointer` if `ptr` is null.
    ///
    /// Safety: `ptr` must point to a valid instance.
    #[track_caller]
    unsafe fn new_object(ptr: *mut Self::Foreign) -> GiResult<Self> {
        let ptr = match NonNull::new(ptr) {
            Some(ptr) => ptr,
            None => Err(PointerError::InvalidPointer {
                type_name: type_name::<Self::Foreign>(),
            })?,
        };

        Self::REF(ptr.as_ptr().cast());
        Ok(Self::from_managed_ptr(ManagedPtr::wrap_non_null(
            ptr,
            Self::UNREF,
        )))
    }

    /// Release the reference owned by this wrapper now rather than when it's dropped.
    ///
    /// This is only possible if `self` is the last handle to its managed pointer, otherwise
    /// nothing happens and `self` is returned. Casts share the managed pointer of their source
    /// and count as handles. If the pointer has been disowned the reference belongs to its new
    /// owner and isn't released.
    #[track_caller]
    fn release_object(self) -> Result<(), Self> {
        if self.managed_ptr().handle_count() != 1 {
            return Err(self);
        }

        if let Some(ptr) = self.managed_ptr().try_disown() {
            // Safety: this wrapper owned a reference and no other handle to it exists.
            unsafe { Self::UNREF(ptr.as_ptr().cast()) }
        }

        Ok(())
    }

    /// Cast this object to another object type if it's an instance of that type.
    ///
    /// The result shares its managed pointer with `self`.
    #[track_caller]
    fn cast_to<U, P>(&self, provider: &P) -> Option<U>
    where
        U: GObject,
        P: TypeTagProvider + ?Sized,
    {
        let ptr = self.managed_ptr().access();
        // Safety: `ptr` points to a valid instance of `Self::Foreign`.
        let ty = unsafe { provider.instance_type(ptr.cast()) };

        if provider.is_a(ty, U::type_tag()) {
            // Safety: the instance is an instance of `U::Foreign`.
            let ptr = unsafe { self.managed_ptr().clone().cast::<U::Foreign>() };
            Some(U::from_managed_ptr(ptr))
        } else {
            None
        }
    }

    /// Cast this object to another object type.
    ///
    /// Returns `TypeError::NotA` if this object is not an instance of `U`.
    #[track_caller]
    fn try_cast_to<U, P>(&self, provider: &P) -> GiResult<U>
    where
        U: GObject,
        P: TypeTagProvider + ?Sized,
    {
        match self.cast_to(provider) {
            Some(obj) => Ok(obj),
            None => {
                // Safety: `ptr` points to a valid instance of `Self::Foreign`.
                let ty = unsafe { provider.instance_type(self.managed_ptr().access().cast()) };
                Err(TypeError::NotA {
                    value_type: provider.type_name(ty),
                    target_type: U::NAME,
                })?
            }
        }
    }
}
