//! gi-managed is the ownership core of bindings to GObject-based C libraries. It decides when
//! foreign data that is used from Rust is released, and makes transferring ownership back to
//! the foreign side explicit.
//!
//! # Overview
//!
//! Every pointer to foreign data is wrapped in a [`ManagedPtr`]. A managed pointer stores the
//! [`Finalizer`] that releases the data, and calls it once when the last handle to it is
//! dropped. When a foreign function or container takes ownership of the data, the managed
//! pointer is disowned and its finalizer never runs:
//!
//! ```
//! use std::{
//!     ffi::c_void,
//!     sync::atomic::{AtomicUsize, Ordering},
//! };
//!
//! use gi_managed::prelude::*;
//!
//! static FREED: AtomicUsize = AtomicUsize::new(0);
//!
//! unsafe extern "C" fn free(_: *mut c_void) {
//!     FREED.fetch_add(1, Ordering::SeqCst);
//! }
//!
//! let owned = unsafe { ManagedPtr::wrap(0xdef as *mut u8, free as FinalizerFn) }?;
//! std::mem::drop(owned);
//! assert_eq!(FREED.load(Ordering::SeqCst), 1);
//!
//! let disowned = unsafe { ManagedPtr::wrap(0xabc as *mut u8, free as FinalizerFn) }?;
//! let raw = disowned.disown();
//! assert_eq!(raw.as_ptr() as usize, 0xabc);
//! std::mem::drop(disowned);
//! assert_eq!(FREED.load(Ordering::SeqCst), 1);
//! # Ok::<(), Box<GiError>>(())
//! ```
//!
//! Bindings wrap each foreign type in its own type that implements [`ManagedWrapper`]. What
//! happens when an instance is wrapped, copied and released depends on the kind of type, each
//! kind has its own capability trait:
//!
//!  - [`GObject`] for reference-counted objects.
//!  - [`BoxedType`] for boxed values with their own copy and free functions.
//!  - [`EnumType`] and [`FlagsType`] for enums and flags, which have a runtime type but no
//!    pointer.
//!  - [`WrappedPtr`] for structs that are allocated by the bindings.
//!
//! Foreign containers like `GList` are only exposed as raw handles, see the [`containers`]
//! module.
//!
//! # Null pointers
//!
//! Generated bindings check pointers that are declared to never be null with
//! [`check_unexpected_null`], which returns [`UnexpectedNullPointerReturn`] when the declaration
//! turns out to be wrong. The [`catch_null_return`] adapter turns this error into an absent value.
//!
//! # Features
//!
//! - `call-sites` (enabled by default): record where managed pointers are created and disowned.
//!   These records are included in the warnings that are logged when a disowned pointer is
//!   accessed.
//! - `mem-debug`: also capture a backtrace with every record.
//!
//! Diagnostics are logged with the [`log`] crate, no logger is installed by this crate.
//!
//! [`ManagedPtr`]: crate::memory::managed_ptr::ManagedPtr
//! [`Finalizer`]: crate::memory::finalizer::Finalizer
//! [`ManagedWrapper`]: crate::data::managed::ManagedWrapper
//! [`GObject`]: crate::data::types::object::GObject
//! [`BoxedType`]: crate::data::types::boxed::BoxedType
//! [`EnumType`]: crate::data::types::enums::EnumType
//! [`FlagsType`]: crate::data::types::enums::FlagsType
//! [`WrappedPtr`]: crate::data::types::wrapped_ptr::WrappedPtr
//! [`containers`]: crate::data::containers
//! [`check_unexpected_null`]: crate::catch::check_unexpected_null
//! [`UnexpectedNullPointerReturn`]: crate::error::UnexpectedNullPointerReturn
//! [`catch_null_return`]: crate::catch::catch_null_return
//! [`log`]: https://docs.rs/log

pub mod catch;
pub mod data;
pub mod error;
pub mod memory;
pub mod prelude;
pub(crate) mod util;
