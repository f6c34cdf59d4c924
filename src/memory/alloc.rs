//! Plain allocation for structs without an allocator of their own.
//!
//! Memory allocated by these functions comes from the C allocator, it can be released with
//! [`free_mem`] and passed to C libraries that free it with `free` or `g_free`.

use std::{
    ffi::c_void,
    ptr::{self, NonNull},
};

use crate::error::{GiResult, PointerError};

/// Allocate a zero-initialized block of `size` bytes.
///
/// Zero-sized requests allocate a single byte so the returned pointer is unique and can be
/// passed to [`free_mem`].
pub fn calloc_bytes(size: usize) -> GiResult<NonNull<c_void>> {
    let ptr = unsafe { libc::calloc(1, size.max(1)) };

    match NonNull::new(ptr) {
        Some(ptr) => Ok(ptr),
        None => Err(PointerError::AllocationFailed { size })?,
    }
}

/// Allocate a new block of `size` bytes and copy the first `size` bytes of `src` to it.
///
/// Safety: `src` must be valid for reads of `size` bytes.
pub unsafe fn copy_bytes(size: usize, src: NonNull<c_void>) -> GiResult<NonNull<c_void>> {
    let ptr = libc::malloc(size.max(1));

    match NonNull::new(ptr) {
        Some(dst) => {
            ptr::copy_nonoverlapping(src.as_ptr().cast::<u8>(), dst.as_ptr().cast::<u8>(), size);
            Ok(dst)
        }
        None => Err(PointerError::AllocationFailed { size })?,
    }
}

/// Release memory allocated by [`calloc_bytes`] or [`copy_bytes`].
///
/// This function can be used as a [`FinalizerFn`].
///
/// Safety: `ptr` must be null or have been allocated by the C allocator, and must not be used
/// afterwards.
///
/// [`FinalizerFn`]: crate::memory::finalizer::FinalizerFn
pub unsafe extern "C" fn free_mem(ptr: *mut c_void) {
    libc::free(ptr)
}
