//! Runtime type identifiers.
//!
//! Most foreign types have a runtime type, its identifier is returned by a function provided by
//! the library like `gtk_widget_get_type`. This function is exposed through [`HasTypeTag`].
//! Queries that need an instance, like the dynamic type of an object, are answered by a
//! [`TypeTagProvider`].

use std::{ffi::c_void, ptr::NonNull};

/// The runtime identifier of a foreign type, e.g. a `GType`.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeTag(usize);

impl TypeTag {
    /// The invalid type.
    pub const INVALID: TypeTag = TypeTag(0);

    /// Create a tag from its raw value.
    #[inline]
    pub const fn from_raw(raw: usize) -> Self {
        TypeTag(raw)
    }

    /// Returns the raw value of this tag.
    #[inline]
    pub const fn as_raw(self) -> usize {
        self.0
    }

    /// Returns `false` if this is the invalid type.
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

/// A foreign function that returns the runtime type of some foreign type, e.g.
/// `gtk_widget_get_type`.
pub type GetTypeFn = unsafe extern "C" fn() -> TypeTag;

/// Trait implemented by types that have a runtime type.
///
/// Safety: `GET_TYPE` must return the runtime type of `Self`, and must be safe to call at any
/// time.
pub unsafe trait HasTypeTag {
    /// The function that returns the runtime type of `Self`.
    const GET_TYPE: GetTypeFn;

    /// Returns the runtime type of `Self`.
    #[inline]
    fn type_tag() -> TypeTag {
        // Safety: guaranteed by the implementation of this trait.
        unsafe { Self::GET_TYPE() }
    }
}

/// Returns the runtime type of `value`.
///
/// The value itself is never inspected, so this is also valid for a value that has been
/// disowned.
#[inline]
pub fn type_of<T: HasTypeTag>(_value: &T) -> TypeTag {
    T::type_tag()
}

/// Answers type queries about instances.
pub trait TypeTagProvider {
    /// Returns the dynamic type of the instance `ptr` points to.
    ///
    /// Safety: `ptr` must point to a valid instance of some type known to this provider.
    unsafe fn instance_type(&self, ptr: NonNull<c_void>) -> TypeTag;

    /// Returns `true` if `ty` is `ancestor` or a subtype of it.
    fn is_a(&self, ty: TypeTag, ancestor: TypeTag) -> bool;

    /// Returns the name of `ty`.
    fn type_name(&self, ty: TypeTag) -> String {
        format!("{:?}", ty)
    }
}
