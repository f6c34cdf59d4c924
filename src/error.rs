//! Everything related to errors.

use std::{error::Error as StdErr, sync::Arc};

use thiserror::Error;

/// Alias that is used for most `Result`s in this crate.
pub type GiResult<T> = Result<T, Box<GiError>>;

/// Pointer errors.
#[derive(Debug, Error, Clone)]
pub enum PointerError {
    #[error("cannot wrap a null pointer as {type_name}")]
    InvalidPointer { type_name: &'static str },
    #[error("failed to allocate {size} bytes")]
    AllocationFailed { size: usize },
    #[error("copying an instance of {type_name} returned a null pointer")]
    CopyFailed { type_name: &'static str },
}

/// Type errors.
#[derive(Debug, Error, Clone)]
pub enum TypeError {
    #[error("instance of {value_type} is not a {target_type}")]
    NotA {
        value_type: String,
        target_type: &'static str,
    },
}

/// Container errors.
#[derive(Debug, Error, Clone)]
pub enum ContainerError {
    #[error("symbol {symbol} could not be found in the current process")]
    SymbolNotFound { symbol: &'static str },
}

/// A foreign function returned a null pointer where a valid pointer was expected.
///
/// Generated bindings raise this error when the nullability metadata of a function claims the
/// returned pointer can't be null, but the function returned null anyway. It can be converted to
/// an absent value with [`catch_null_return`].
///
/// [`catch_null_return`]: crate::catch::catch_null_return
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{msg}")]
pub struct UnexpectedNullPointerReturn {
    msg: String,
}

impl UnexpectedNullPointerReturn {
    /// Create a new error for the foreign function `fn_name`.
    pub fn new<S: AsRef<str>>(fn_name: S) -> Self {
        let msg = format!(
            "received an unexpected null pointer from \"{}\"; this is likely a bug in the \
             introspection data of the library or a use of the API the bindings did not \
             anticipate, please report it to the maintainers",
            fn_name.as_ref()
        );

        UnexpectedNullPointerReturn { msg }
    }

    /// Returns a reference to the error message.
    pub fn get_message(&self) -> &str {
        &self.msg
    }
}

/// All different errors.
#[derive(Debug, Error, Clone)]
pub enum GiError {
    #[error("Other: {0}")]
    Other(Arc<dyn StdErr + 'static + Send + Sync>),
    #[error("Pointer error: {0}")]
    PointerError(PointerError),
    #[error("Null return: {0}")]
    UnexpectedNullPointerReturn(UnexpectedNullPointerReturn),
    #[error("Type error: {0}")]
    TypeError(TypeError),
    #[error("Container error: {0}")]
    ContainerError(ContainerError),
}

impl GiError {
    /// Convert an arbitrary error to `GiError::Other`.
    #[inline]
    pub fn other<E: StdErr + 'static + Send + Sync>(reason: E) -> Self {
        GiError::Other(Arc::new(reason))
    }

    /// Convert an arbitrary error to `Err(GiError::Other)`.
    #[inline]
    pub fn other_error<T, E: StdErr + 'static + Send + Sync>(reason: E) -> Result<T, Self> {
        Err(Self::other(reason))
    }

    /// Returns `true` if this error signals an unexpected null pointer.
    #[inline]
    pub fn is_unexpected_null(&self) -> bool {
        matches!(self, GiError::UnexpectedNullPointerReturn(_))
    }
}

macro_rules! impl_from {
    ($type:ident) => {
        impl From<$type> for GiError {
            #[inline]
            fn from(e: $type) -> Self {
                GiError::$type(e)
            }
        }

        impl From<$type> for Box<GiError> {
            #[inline]
            fn from(e: $type) -> Self {
                Box::new(GiError::from(e))
            }
        }
    };
}

impl_from!(PointerError);
impl_from!(UnexpectedNullPointerReturn);
impl_from!(TypeError);
impl_from!(ContainerError);
