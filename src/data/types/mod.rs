//! Capability traits of foreign types.
//!
//! How a foreign value is allocated, copied and released depends on what kind of type it is.
//! Each kind has its own trait:
//!
//!  - [`GObject`]: reference-counted objects, released by dropping a reference.
//!  - [`BoxedType`]: boxed values that are copied and freed with type-specific functions.
//!  - [`EnumType`] and [`FlagsType`]: plain values with a runtime type.
//!  - [`WrappedPtr`]: structs without a runtime type that are allocated by the bindings, with
//!    an optional free function.
//!
//! Everything except [`WrappedPtr`] has a runtime type, see [`HasTypeTag`].
//!
//! [`GObject`]: crate::data::types::object::GObject
//! [`BoxedType`]: crate::data::types::boxed::BoxedType
//! [`EnumType`]: crate::data::types::enums::EnumType
//! [`FlagsType`]: crate::data::types::enums::FlagsType
//! [`WrappedPtr`]: crate::data::types::wrapped_ptr::WrappedPtr
//! [`HasTypeTag`]: crate::data::types::type_tag::HasTypeTag

use std::ffi::c_void;

pub mod boxed;
pub mod enums;
pub mod object;
pub mod type_tag;
pub mod wrapped_ptr;

/// A foreign function that returns a new copy of the data a pointer points to, e.g.
/// `gtk_border_copy`.
pub type CopyFn = unsafe extern "C" fn(*const c_void) -> *mut c_void;

/// A foreign function that adds a reference to an object and returns it, e.g. `g_object_ref`.
pub type RefFn = unsafe extern "C" fn(*mut c_void) -> *mut c_void;
