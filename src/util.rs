use std::{ffi::c_void, ffi::CStr, ptr::NonNull};

use once_cell::sync::OnceCell;

use crate::memory::finalizer::FinalizerFn;

/// Look up `name` in the libraries that have been loaded by the current process.
#[cfg(unix)]
pub(crate) fn find_symbol(name: &CStr) -> Option<NonNull<c_void>> {
    // Safety: `name` is a valid C string, RTLD_DEFAULT searches the global scope.
    unsafe { NonNull::new(libc::dlsym(libc::RTLD_DEFAULT, name.as_ptr())) }
}

#[cfg(not(unix))]
pub(crate) fn find_symbol(_name: &CStr) -> Option<NonNull<c_void>> {
    None
}

/// Look up a function that takes a single pointer, the result is cached in `cache`.
///
/// Safety: if the symbol exists it must be a function with the signature of `FinalizerFn`.
#[inline]
pub(crate) unsafe fn load_finalizer_fn(
    cache: &OnceCell<Option<FinalizerFn>>,
    name: &CStr,
) -> Option<FinalizerFn> {
    *cache.get_or_init(|| load_finalizer_fn_cold(name))
}

#[inline(never)]
#[cold]
unsafe fn load_finalizer_fn_cold(name: &CStr) -> Option<FinalizerFn> {
    let func = find_symbol(name)?;
    log::trace!("loaded {:?} from {:p}", name, func);
    Some(std::mem::transmute::<*mut c_void, FinalizerFn>(func.as_ptr()))
}
