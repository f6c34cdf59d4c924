//! Managed foreign pointers.
//!
//! A [`ManagedPtr`] owns a single block of foreign memory. Handles to the same managed pointer
//! can be cloned freely and shared between threads, the finalizer is called when the last handle
//! is dropped unless the pointer has been disowned.
//!
//! Ownership is tracked with a small state machine stored in an atomic cell:
//!
//! ```text
//! Owned ──disown──▶ Disowned
//!   │
//!   └──last handle dropped──▶ Finalized
//! ```
//!
//! `Disowned` is terminal: dropping the last handle to a disowned pointer does nothing, and the
//! pointer can never become owned again. Both transitions out of `Owned` are compare-and-swaps
//! on the same cell, so a disowned pointer is never finalized and a finalized pointer is never
//! disowned.

use std::{
    any::type_name,
    ffi::c_void,
    fmt::{Debug, Formatter, Result as FmtResult},
    marker::PhantomData,
    ptr::NonNull,
    sync::{
        atomic::{AtomicU8, Ordering},
        Arc,
    },
};

use parking_lot::Mutex;
use smallvec::SmallVec;

use super::{call_site::CallSite, finalizer::Finalizer};
use crate::error::{GiResult, PointerError};

const OWNED: u8 = 0;
const DISOWNED: u8 = 1;
const FINALIZED: u8 = 2;

/// Whether the finalizer of a managed pointer will run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DisownState {
    /// The finalizer runs when the last handle is dropped.
    Owned,
    /// Ownership has been transferred elsewhere, the finalizer never runs.
    Disowned,
}

struct Inner {
    ptr: NonNull<c_void>,
    type_name: &'static str,
    state: AtomicU8,
    finalizer: Option<Finalizer>,
    allocation_site: Option<CallSite>,
    disown_sites: Mutex<SmallVec<[CallSite; 1]>>,
}

// Safety: the address is never mutated, the state is atomic and the diagnostic records are
// protected by a mutex. The finalizer is only accessed from `drop`.
unsafe impl Send for Inner {}
unsafe impl Sync for Inner {}

impl Drop for Inner {
    fn drop(&mut self) {
        match self
            .state
            .compare_exchange(OWNED, FINALIZED, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => {
                if let Some(finalizer) = self.finalizer.take() {
                    log::trace!(
                        "finalizing {} at {:p} with {:?}",
                        self.type_name,
                        self.ptr,
                        finalizer
                    );

                    // Safety: the pointer was owned, this is the only time the finalizer is
                    // called and no handles remain.
                    unsafe { finalizer.invoke(self.ptr) };
                }
            }
            Err(_) => {
                log::trace!(
                    "not finalizing disowned {} at {:p}",
                    self.type_name,
                    self.ptr
                );
            }
        }
    }
}

/// A handle to a managed foreign pointer.
///
/// Cloning a `ManagedPtr` creates a new handle to the same managed pointer, it doesn't copy the
/// foreign data. Use [`ManagedPtr::same_identity`] to check if two handles refer to the same
/// managed pointer.
pub struct ManagedPtr<T> {
    inner: Arc<Inner>,
    _marker: PhantomData<*mut T>,
}

// Safety: a managed pointer only exposes the address of the foreign data, and the foreign
// libraries wrapped by this crate allow their finalizers to be called from any thread.
unsafe impl<T> Send for ManagedPtr<T> {}
unsafe impl<T> Sync for ManagedPtr<T> {}

impl<T> ManagedPtr<T> {
    /// Wrap `ptr` and call `finalizer` when the last handle is dropped.
    ///
    /// Returns `PointerError::InvalidPointer` if `ptr` is null.
    ///
    /// Safety: `ptr` must point to a valid instance of `T` that is owned by the caller, and
    /// `finalizer` must be the correct function to release it.
    #[track_caller]
    pub unsafe fn wrap<F: Into<Finalizer>>(ptr: *mut T, finalizer: F) -> GiResult<Self> {
        match NonNull::new(ptr) {
            Some(ptr) => Ok(Self::wrap_non_null(ptr, finalizer)),
            None => Err(PointerError::InvalidPointer {
                type_name: type_name::<T>(),
            })?,
        }
    }

    /// Wrap `ptr` if it's not null.
    ///
    /// Safety: see [`ManagedPtr::wrap`].
    #[track_caller]
    pub unsafe fn wrap_nullable<F: Into<Finalizer>>(ptr: *mut T, finalizer: F) -> Option<Self> {
        // Not `Option::map`, closures don't propagate the caller's location.
        match NonNull::new(ptr) {
            Some(ptr) => Some(Self::wrap_non_null(ptr, finalizer)),
            None => None,
        }
    }

    /// Wrap a non-null pointer.
    ///
    /// Safety: see [`ManagedPtr::wrap`].
    #[track_caller]
    pub unsafe fn wrap_non_null<F: Into<Finalizer>>(ptr: NonNull<T>, finalizer: F) -> Self {
        let finalizer = finalizer.into();
        let type_name = type_name::<T>();
        log::trace!("wrapping {} at {:p}", type_name, ptr);

        ManagedPtr {
            inner: Arc::new(Inner {
                ptr: ptr.cast(),
                type_name,
                state: AtomicU8::new(OWNED),
                finalizer: Some(finalizer),
                allocation_site: CallSite::capture(),
                disown_sites: Mutex::new(SmallVec::new()),
            }),
            _marker: PhantomData,
        }
    }

    /// Wrap `ptr` without a finalizer. The foreign data is never released through this managed
    /// pointer.
    ///
    /// Safety: `ptr` must point to a valid instance of `T` that outlives every handle to the
    /// returned managed pointer.
    #[track_caller]
    pub unsafe fn new_unowned(ptr: *mut T) -> GiResult<Self> {
        Self::wrap(ptr, Finalizer::none())
    }

    /// Transfer ownership of the foreign data away from this managed pointer.
    ///
    /// After this method has been called the finalizer will never be called, whoever disowned
    /// the pointer is responsible for releasing it. Disowning an already disowned pointer has
    /// no additional effect, but every call site is recorded.
    #[track_caller]
    pub fn disown(&self) -> NonNull<T> {
        self.disown_inner(CallSite::capture());
        self.as_non_null()
    }

    /// Disown this managed pointer if it's owned.
    ///
    /// Returns the raw pointer if this call disowned it, and `None` if it had already been
    /// disowned. This is used to release foreign data immediately without risking releasing it
    /// twice.
    #[track_caller]
    pub fn try_disown(&self) -> Option<NonNull<T>> {
        if self.disown_inner(CallSite::capture()) {
            Some(self.as_non_null())
        } else {
            None
        }
    }

    fn disown_inner(&self, site: Option<CallSite>) -> bool {
        let disowned = self
            .inner
            .state
            .compare_exchange(OWNED, DISOWNED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();

        if disowned {
            log::debug!(
                "disowned {} at {:p}{}",
                self.inner.type_name,
                self.inner.ptr,
                fmt_site(" from ", site.as_ref())
            );
        } else {
            log::debug!(
                "disowning {} at {:p} again{}",
                self.inner.type_name,
                self.inner.ptr,
                fmt_site(" from ", site.as_ref())
            );
        }

        if let Some(site) = site {
            self.inner.disown_sites.lock().push(site);
        }

        disowned
    }

    /// Returns `true` if this pointer has been disowned.
    #[inline]
    pub fn is_disowned(&self) -> bool {
        self.inner.state.load(Ordering::Acquire) == DISOWNED
    }

    /// Returns the current disown state.
    #[inline]
    pub fn disown_state(&self) -> DisownState {
        if self.is_disowned() {
            DisownState::Disowned
        } else {
            DisownState::Owned
        }
    }

    /// Returns the wrapped pointer.
    ///
    /// This only reads the address and never warns, see [`ManagedPtr::access`].
    #[inline]
    pub fn as_non_null(&self) -> NonNull<T> {
        self.inner.ptr.cast()
    }

    /// Returns the wrapped pointer.
    #[inline]
    pub fn as_ptr(&self) -> *mut T {
        self.as_non_null().as_ptr()
    }

    /// Returns the wrapped pointer to access the foreign data.
    ///
    /// If the pointer has been disowned a warning is logged, the data might have been freed by
    /// its new owner.
    #[track_caller]
    pub fn access(&self) -> NonNull<T> {
        if self.is_disowned() {
            self.warn_disowned_access(CallSite::capture());
        }

        self.as_non_null()
    }

    /// Where this managed pointer was created, if it was recorded.
    #[inline]
    pub fn allocation_site(&self) -> Option<&CallSite> {
        self.inner.allocation_site.as_ref()
    }

    /// Every recorded call site where this managed pointer was disowned, in order.
    pub fn disown_sites(&self) -> Vec<CallSite> {
        self.inner.disown_sites.lock().to_vec()
    }

    /// Returns `true` if `a` and `b` are handles to the same managed pointer.
    #[inline]
    pub fn same_identity<U>(a: &Self, b: &ManagedPtr<U>) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    /// The number of handles to this managed pointer.
    #[inline]
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    // Safety: the foreign data must be a valid instance of `U`.
    pub(crate) unsafe fn cast<U>(self) -> ManagedPtr<U> {
        ManagedPtr {
            inner: self.inner,
            _marker: PhantomData,
        }
    }

    #[cold]
    #[inline(never)]
    fn warn_disowned_access(&self, site: Option<CallSite>) {
        let disowned_at = self.inner.disown_sites.lock().first().cloned();
        log::warn!(
            "accessing disowned {} at {:p}{}{}{}",
            self.inner.type_name,
            self.inner.ptr,
            fmt_site(" from ", site.as_ref()),
            fmt_site(", allocated at ", self.allocation_site()),
            fmt_site(", disowned at ", disowned_at.as_ref()),
        );
    }
}

impl<T> Clone for ManagedPtr<T> {
    #[inline]
    fn clone(&self) -> Self {
        ManagedPtr {
            inner: self.inner.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> Debug for ManagedPtr<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "ManagedPtr<{}>({:p}, {:?})",
            self.inner.type_name,
            self.inner.ptr,
            self.disown_state()
        )
    }
}

fn fmt_site(prefix: &str, site: Option<&CallSite>) -> String {
    match site {
        Some(site) => format!("{}{}", prefix, site),
        None => String::new(),
    }
}
