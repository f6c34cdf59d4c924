//! Wrappers of managed pointers.
//!
//! Bindings wrap every foreign pointer type in its own Rust type, e.g. a `GtkWidget *` is
//! wrapped in a `Widget`. All these wrappers share the same ownership implementation by holding
//! a [`ManagedPtr`] and implementing [`ManagedWrapper`], which is normally done with the
//! [`impl_managed_wrapper`] macro:
//!
//! ```
//! use gi_managed::{impl_managed_wrapper, prelude::*};
//!
//! #[repr(C)]
//! pub struct GtkWidget {
//!     _private: [u8; 0],
//! }
//!
//! #[derive(Clone, Debug)]
//! pub struct Widget(ManagedPtr<GtkWidget>);
//!
//! impl_managed_wrapper!(Widget, GtkWidget);
//! ```
//!
//! [`ManagedPtr`]: crate::memory::managed_ptr::ManagedPtr
//! [`impl_managed_wrapper`]: crate::impl_managed_wrapper

use std::ptr::{null_mut, NonNull};

use smallvec::SmallVec;

use crate::memory::managed_ptr::ManagedPtr;

/// Trait implemented by all wrappers of managed pointers.
pub trait ManagedWrapper: Sized {
    /// The foreign type this wrapper points to.
    type Foreign;

    /// The name of the wrapper type.
    const NAME: &'static str;

    /// Create a new wrapper from a managed pointer.
    fn from_managed_ptr(ptr: ManagedPtr<Self::Foreign>) -> Self;

    /// Returns a reference to the managed pointer of this wrapper.
    fn managed_ptr(&self) -> &ManagedPtr<Self::Foreign>;

    /// Disown the managed pointer of this wrapper and return the raw pointer.
    ///
    /// This is used when ownership of the data is transferred to a foreign function or
    /// container. See [`ManagedPtr::disown`].
    #[track_caller]
    #[inline]
    fn disown(&self) -> NonNull<Self::Foreign> {
        self.managed_ptr().disown()
    }

    /// Returns `true` if the managed pointer of this wrapper has been disowned.
    #[inline]
    fn is_disowned(&self) -> bool {
        self.managed_ptr().is_disowned()
    }

    /// Returns the raw pointer without checking if it has been disowned.
    #[inline]
    fn as_ptr(&self) -> *mut Self::Foreign {
        self.managed_ptr().as_ptr()
    }

    /// Call `func` with the raw pointer.
    ///
    /// `self` is borrowed while `func` is called, so the data can't be finalized before `func`
    /// returns. A warning is logged if the pointer has been disowned.
    #[track_caller]
    #[inline]
    fn with_managed_ptr<R, F>(&self, func: F) -> R
    where
        F: FnOnce(NonNull<Self::Foreign>) -> R,
    {
        func(self.managed_ptr().access())
    }
}

/// Call `func` with the raw pointer of `wrapper`, or with a null pointer if it's `None`.
#[track_caller]
pub fn maybe_with_managed_ptr<W, R, F>(wrapper: Option<&W>, func: F) -> R
where
    W: ManagedWrapper,
    F: FnOnce(*mut W::Foreign) -> R,
{
    match wrapper {
        Some(wrapper) => func(wrapper.managed_ptr().access().as_ptr()),
        None => func(null_mut()),
    }
}

/// Call `func` with the raw pointers of all `wrappers`, in order.
#[track_caller]
pub fn with_managed_ptr_list<W, R, F>(wrappers: &[W], func: F) -> R
where
    W: ManagedWrapper,
    F: FnOnce(&[NonNull<W::Foreign>]) -> R,
{
    let ptrs: SmallVec<[NonNull<W::Foreign>; 8]> = wrappers
        .iter()
        .map(|wrapper| wrapper.managed_ptr().access())
        .collect();

    func(&ptrs)
}

/// Implement [`ManagedWrapper`] for a tuple struct that wraps a [`ManagedPtr`].
///
/// [`ManagedWrapper`]: crate::data::managed::ManagedWrapper
/// [`ManagedPtr`]: crate::memory::managed_ptr::ManagedPtr
#[macro_export]
macro_rules! impl_managed_wrapper {
    ($type:ident, $foreign:ty) => {
        impl $crate::data::managed::ManagedWrapper for $type {
            type Foreign = $foreign;

            const NAME: &'static str = stringify!($type);

            #[inline]
            fn from_managed_ptr(ptr: $crate::memory::managed_ptr::ManagedPtr<$foreign>) -> Self {
                $type(ptr)
            }

            #[inline]
            fn managed_ptr(&self) -> &$crate::memory::managed_ptr::ManagedPtr<$foreign> {
                &self.0
            }
        }
    };
}
