//! Reexports structs and traits you're likely to need.

pub use crate::{
    catch::{catch_null_return, check_unexpected_null},
    data::{
        containers::{GArray, GByteArray, GHashTable, GList, GPtrArray, GSList},
        managed::{maybe_with_managed_ptr, with_managed_ptr_list, ManagedWrapper},
        types::{
            boxed::BoxedType,
            enums::{EnumType, FlagsType},
            object::GObject,
            type_tag::{type_of, HasTypeTag, TypeTag, TypeTagProvider},
            wrapped_ptr::WrappedPtr,
        },
    },
    error::{GiError, GiResult, UnexpectedNullPointerReturn},
    memory::{
        finalizer::{Finalizer, FinalizerFn},
        managed_ptr::{DisownState, ManagedPtr},
    },
};
