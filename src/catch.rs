//! Unexpected null pointers.
//!
//! The introspection data that bindings are generated from doesn't always declare correctly
//! whether a function can return null. If a function that should never return null does so
//! anyway, the bindings return [`UnexpectedNullPointerReturn`] rather than wrapping the null
//! pointer, see [`check_unexpected_null`].
//!
//! Until the introspection data has been fixed, [`catch_null_return`] can be used to treat such
//! a null pointer as an absent value. Functions that already return an `Option` are returned as
//! is, the result is never wrapped twice:
//!
//! ```
//! use gi_managed::{catch::catch_null_return, error::UnexpectedNullPointerReturn};
//!
//! let value: Result<i32, UnexpectedNullPointerReturn> = Ok(3);
//! assert_eq!(catch_null_return(|| value), Ok(Some(3)));
//!
//! let missing: Result<i32, _> = Err(UnexpectedNullPointerReturn::new("get_value"));
//! assert_eq!(catch_null_return(|| missing), Ok(None));
//!
//! let optional: Result<Option<i32>, UnexpectedNullPointerReturn> = Ok(None);
//! assert_eq!(catch_null_return(|| optional), Ok(None));
//! ```
//!
//! [`UnexpectedNullPointerReturn`]: crate::error::UnexpectedNullPointerReturn

use std::ptr::NonNull;

use crate::{
    data::managed::ManagedWrapper,
    error::{GiError, UnexpectedNullPointerReturn},
};

/// Check a pointer returned by the foreign function `fn_name` that was declared to never be
/// null.
#[inline]
pub fn check_unexpected_null<T>(
    fn_name: &str,
    ptr: *mut T,
) -> Result<NonNull<T>, UnexpectedNullPointerReturn> {
    match NonNull::new(ptr) {
        Some(ptr) => Ok(ptr),
        None => Err(null_return(fn_name)),
    }
}

#[cold]
#[inline(never)]
fn null_return(fn_name: &str) -> UnexpectedNullPointerReturn {
    log::debug!("{} returned an unexpected null pointer", fn_name);
    UnexpectedNullPointerReturn::new(fn_name)
}

/// Trait implemented by errors that can signal an unexpected null pointer.
pub trait MaybeNullReturn {
    /// Returns `true` if this error signals an unexpected null pointer.
    fn is_unexpected_null(&self) -> bool;
}

impl MaybeNullReturn for UnexpectedNullPointerReturn {
    #[inline]
    fn is_unexpected_null(&self) -> bool {
        true
    }
}

impl MaybeNullReturn for GiError {
    #[inline]
    fn is_unexpected_null(&self) -> bool {
        GiError::is_unexpected_null(self)
    }
}

impl MaybeNullReturn for Box<GiError> {
    #[inline]
    fn is_unexpected_null(&self) -> bool {
        GiError::is_unexpected_null(self)
    }
}

/// Trait implemented by the results of functions that can be used with [`catch_null_return`].
///
/// This trait is implemented for `Option`, all wrappers, raw pointers, primitives, strings,
/// vectors, boxed slices and tuples of up to four elements. Other types that are returned by
/// bindings can implement it with `Optional = Option<Self>`. There is no implementation for
/// `Box<T>`, because it would conflict with the implementation for wrappers.
pub trait NullableReturn: Sized {
    /// The optional version of `Self`.
    type Optional;

    /// Convert a result to a present value.
    fn present(self) -> Self::Optional;

    /// Returns the absent value.
    fn absent() -> Self::Optional;
}

impl<T> NullableReturn for Option<T> {
    type Optional = Option<T>;

    #[inline]
    fn present(self) -> Self::Optional {
        self
    }

    #[inline]
    fn absent() -> Self::Optional {
        None
    }
}

impl<W: ManagedWrapper> NullableReturn for W {
    type Optional = Option<W>;

    #[inline]
    fn present(self) -> Self::Optional {
        Some(self)
    }

    #[inline]
    fn absent() -> Self::Optional {
        None
    }
}

impl<T> NullableReturn for NonNull<T> {
    type Optional = Option<NonNull<T>>;

    #[inline]
    fn present(self) -> Self::Optional {
        Some(self)
    }

    #[inline]
    fn absent() -> Self::Optional {
        None
    }
}

macro_rules! impl_nullable_return {
    ($($type:ty),+) => {
        $(
            impl NullableReturn for $type {
                type Optional = Option<$type>;

                #[inline]
                fn present(self) -> Self::Optional {
                    Some(self)
                }

                #[inline]
                fn absent() -> Self::Optional {
                    None
                }
            }
        )+
    };
}

impl_nullable_return!(
    (),
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    &'static str,
    String,
    Box<str>
);

macro_rules! impl_nullable_return_generic {
    ($(<$($param:ident),+> $type:ty),+) => {
        $(
            impl<$($param),+> NullableReturn for $type {
                type Optional = Option<$type>;

                #[inline]
                fn present(self) -> Self::Optional {
                    Some(self)
                }

                #[inline]
                fn absent() -> Self::Optional {
                    None
                }
            }
        )+
    };
}

impl_nullable_return_generic!(
    <T> Vec<T>,
    <T> Box<[T]>,
    <A> (A,),
    <A, B> (A, B),
    <A, B, C> (A, B, C),
    <A, B, C, D> (A, B, C, D)
);

/// Call `op` and convert an unexpected null pointer to an absent value.
///
/// If `op` succeeds its result is returned as a present value, if it returns an error that
/// signals an unexpected null pointer the absent value is returned instead. All other errors
/// are returned unchanged. If `op` already returns an `Option` the result is not wrapped again.
///
/// This is a workaround for incorrect introspection data, the function that returned null
/// should be reported to the maintainers of the library.
pub fn catch_null_return<T, E, F>(op: F) -> Result<T::Optional, E>
where
    T: NullableReturn,
    E: MaybeNullReturn,
    F: FnOnce() -> Result<T, E>,
{
    match op() {
        Ok(value) => Ok(value.present()),
        Err(e) if e.is_unexpected_null() => Ok(T::absent()),
        Err(e) => Err(e),
    }
}

/// Call `op` and convert an unexpected null pointer to an absent value.
///
/// This is the compatibility name of [`catch_null_return`], which also logs a warning every
/// time a null pointer is caught.
#[deprecated(
    note = "incorrect nullability should be reported to the maintainers of the library, use \
            `catch_null_return` until it has been fixed"
)]
pub fn null_to_nothing<T, E, F>(op: F) -> Result<T::Optional, E>
where
    T: NullableReturn,
    E: MaybeNullReturn + std::fmt::Display,
    F: FnOnce() -> Result<T, E>,
{
    catch_null_return(|| {
        op().map_err(|e| {
            if e.is_unexpected_null() {
                log::warn!("converting unexpected null pointer to an absent value: {}", e);
            }
            e
        })
    })
}
