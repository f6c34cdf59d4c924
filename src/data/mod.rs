//! Wrappers for foreign data.
//!
//! Every foreign type that is exposed by the bindings is represented by a wrapper type. Wrappers
//! of pointer types hold a [`ManagedPtr`] and implement [`ManagedWrapper`], what happens when a
//! wrapper is created, copied and dropped depends on the capability traits in the [`types`]
//! module it implements. Enums and flags are plain values and are also found in that module.
//!
//! Foreign containers are not wrapped, the [`containers`] module provides raw handles that are
//! used when a function takes or returns one.
//!
//! [`ManagedPtr`]: crate::memory::managed_ptr::ManagedPtr
//! [`ManagedWrapper`]: crate::data::managed::ManagedWrapper

pub mod containers;
pub mod managed;
pub mod types;
