//! Ownership of foreign memory.
//!
//! Every pointer that enters the bindings from a C library is wrapped in a [`ManagedPtr`]. The
//! managed pointer stores the [`Finalizer`] that releases the foreign memory, and calls it
//! exactly once when the last handle to it is dropped. Ownership can be transferred back to the
//! foreign side by disowning the pointer, after which the finalizer is never called.
//!
//! Managed pointers optionally remember where they were created and disowned, see
//! [`CallSite`]. These records only exist to make ownership bugs easier to track down, they are
//! never required for correctness and are not collected if the `call-sites` feature is disabled.
//!
//! The [`alloc`] module provides the plain allocation functions that are used by structs which
//! have no allocator of their own.
//!
//! [`ManagedPtr`]: crate::memory::managed_ptr::ManagedPtr
//! [`Finalizer`]: crate::memory::finalizer::Finalizer
//! [`CallSite`]: crate::memory::call_site::CallSite

pub mod alloc;
pub mod call_site;
pub mod finalizer;
pub mod managed_ptr;
