//! Handles of foreign containers.
//!
//! Foreign functions can take and return GLib containers like `GList` and `GHashTable`. These
//! handles are raw pointers with the element types attached, they have no ownership semantics.
//! Converting a container to Rust data, and deciding whether its elements are owned or
//! borrowed, is up to the code that uses the handle.
//!
//! The list handles can free their node chain, see [`GList::free`]. The elements themselves are
//! never freed by this operation.

use std::{
    ffi::c_void,
    fmt::{Debug, Formatter, Result as FmtResult},
    marker::PhantomData,
};

use once_cell::sync::OnceCell;

use crate::{
    error::{ContainerError, GiResult},
    memory::finalizer::FinalizerFn,
    util::load_finalizer_fn,
};

macro_rules! container_handle {
    ($(#[$meta:meta])* $name:ident<$($param:ident),*>) => {
        $(#[$meta])*
        #[repr(transparent)]
        pub struct $name<$($param),*> {
            ptr: *mut c_void,
            _marker: PhantomData<fn() -> ($($param,)*)>,
        }

        impl<$($param),*> $name<$($param),*> {
            /// Create a handle from a raw pointer.
            ///
            /// Safety: `ptr` must be null or point to a container with the expected element
            /// types.
            #[inline]
            pub unsafe fn from_ptr(ptr: *mut c_void) -> Self {
                $name {
                    ptr,
                    _marker: PhantomData,
                }
            }

            /// Returns the raw pointer.
            #[inline]
            pub fn as_ptr(self) -> *mut c_void {
                self.ptr
            }

            /// Returns `true` if the handle is null.
            #[inline]
            pub fn is_null(self) -> bool {
                self.ptr.is_null()
            }
        }

        impl<$($param),*> Clone for $name<$($param),*> {
            #[inline]
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<$($param),*> Copy for $name<$($param),*> {}

        impl<$($param),*> Debug for $name<$($param),*> {
            fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
                write!(f, "{}({:p})", stringify!($name), self.ptr)
            }
        }
    };
}

container_handle!(
    /// A `GArray` with elements of type `T`.
    GArray<T>
);

container_handle!(
    /// A `GPtrArray` with elements of type `T`.
    GPtrArray<T>
);

container_handle!(
    /// A `GByteArray`.
    GByteArray<>
);

container_handle!(
    /// A `GHashTable` with keys of type `K` and values of type `V`.
    GHashTable<K, V>
);

container_handle!(
    /// A doubly-linked `GList` with elements of type `T`, null is the empty list.
    GList<T>
);

container_handle!(
    /// A singly-linked `GSList` with elements of type `T`, null is the empty list.
    GSList<T>
);

static G_LIST_FREE: OnceCell<Option<FinalizerFn>> = OnceCell::new();
static G_SLIST_FREE: OnceCell<Option<FinalizerFn>> = OnceCell::new();

macro_rules! impl_list_free {
    ($name:ident, $cache:ident, $c_symbol:expr, $symbol:literal) => {
        impl<T> $name<T> {
            #[doc = concat!("Free the nodes of this list with `", $symbol, "`.")]
            ///
            /// The elements are not freed. The function is looked up in the libraries loaded
            /// by the current process, if it can't be found `ContainerError::SymbolNotFound`
            /// is returned. Freeing the empty list does nothing.
            ///
            /// Safety: the list must be owned by the caller and must not be used afterwards.
            pub unsafe fn free(self) -> GiResult<()> {
                if self.is_null() {
                    return Ok(());
                }

                match load_finalizer_fn(&$cache, $c_symbol) {
                    Some(func) => {
                        self.free_with(func);
                        Ok(())
                    }
                    None => Err(ContainerError::SymbolNotFound { symbol: $symbol })?,
                }
            }

            /// Free the nodes of this list with `func`. Freeing the empty list does nothing.
            ///
            /// Safety: the list must be owned by the caller and must not be used afterwards,
            /// `func` must free the node chain of this kind of list.
            pub unsafe fn free_with(self, func: FinalizerFn) {
                if !self.is_null() {
                    func(self.ptr)
                }
            }
        }
    };
}

impl_list_free!(GList, G_LIST_FREE, c"g_list_free", "g_list_free");
impl_list_free!(GSList, G_SLIST_FREE, c"g_slist_free", "g_slist_free");
