//! Functions that release foreign memory.

use std::{
    ffi::c_void,
    fmt::{Debug, Formatter, Result as FmtResult},
    ptr::NonNull,
};

/// A foreign function that releases the memory a pointer points to, e.g. `g_object_unref` or
/// `g_free`.
pub type FinalizerFn = unsafe extern "C" fn(*mut c_void);

/// The finalizer of a [`ManagedPtr`].
///
/// A finalizer is stored with every managed pointer when it's created, and is called with the
/// wrapped pointer when the last handle to that managed pointer is dropped. Finalizers are
/// assumed to be infallible.
///
/// [`ManagedPtr`]: crate::memory::managed_ptr::ManagedPtr
pub enum Finalizer {
    /// Never release the memory.
    None,
    /// Release the memory with a foreign function.
    Foreign(FinalizerFn),
    /// Release the memory with a closure, used when the foreign function needs more than the
    /// pointer, e.g. `g_boxed_free` which also takes the type of the boxed value.
    Closure(Box<dyn FnOnce(NonNull<c_void>) + Send>),
}

impl Finalizer {
    /// A finalizer that does nothing.
    #[inline]
    pub const fn none() -> Self {
        Finalizer::None
    }

    /// A finalizer that calls `func`.
    #[inline]
    pub const fn foreign(func: FinalizerFn) -> Self {
        Finalizer::Foreign(func)
    }

    /// A finalizer that calls `func` if it's `Some`, and does nothing otherwise.
    #[inline]
    pub const fn from_optional(func: Option<FinalizerFn>) -> Self {
        match func {
            Some(func) => Finalizer::Foreign(func),
            None => Finalizer::None,
        }
    }

    /// A finalizer that calls the closure `func`.
    #[inline]
    pub fn closure<F>(func: F) -> Self
    where
        F: FnOnce(NonNull<c_void>) + Send + 'static,
    {
        Finalizer::Closure(Box::new(func))
    }

    /// Returns `true` if calling this finalizer has no effect.
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Finalizer::None)
    }

    // Safety: `ptr` must be valid for this finalizer and must not be used afterwards.
    pub(crate) unsafe fn invoke(self, ptr: NonNull<c_void>) {
        match self {
            Finalizer::None => (),
            Finalizer::Foreign(func) => func(ptr.as_ptr()),
            Finalizer::Closure(func) => func(ptr),
        }
    }
}

impl Debug for Finalizer {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Finalizer::None => f.write_str("Finalizer::None"),
            Finalizer::Foreign(func) => write!(f, "Finalizer::Foreign({:p})", *func as *const ()),
            Finalizer::Closure(_) => f.write_str("Finalizer::Closure"),
        }
    }
}

impl From<FinalizerFn> for Finalizer {
    #[inline]
    fn from(func: FinalizerFn) -> Self {
        Finalizer::Foreign(func)
    }
}

impl From<Option<FinalizerFn>> for Finalizer {
    #[inline]
    fn from(func: Option<FinalizerFn>) -> Self {
        Finalizer::from_optional(func)
    }
}
