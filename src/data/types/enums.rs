//! Enums and flags.
//!
//! Enums and flags are plain integers on the foreign side, they don't involve a managed pointer.
//! Values that are unknown to the bindings, e.g. because the library is newer than the bindings,
//! must be preserved by `from_raw`, typically with a catch-all variant.

use super::type_tag::HasTypeTag;

/// Trait implemented by enums with a runtime type.
pub trait EnumType: HasTypeTag + Copy {
    /// Convert the enum to its foreign representation.
    fn to_raw(self) -> i32;

    /// Convert the foreign representation to the enum.
    fn from_raw(raw: i32) -> Self;
}

/// Trait implemented by the individual flags of a flags type with a runtime type.
pub trait FlagsType: HasTypeTag + Copy {
    /// Convert the flag to its foreign representation.
    fn to_raw(self) -> u32;

    /// Convert the foreign representation of a single flag to the flag.
    fn from_raw(raw: u32) -> Self;

    /// Combine `self` with `other`.
    #[inline]
    fn union(self, other: Self) -> u32 {
        self.to_raw() | other.to_raw()
    }
}

/// Combine `flags` into the foreign representation.
pub fn flags_to_word<F: FlagsType>(flags: &[F]) -> u32 {
    flags.iter().fold(0, |word, flag| word | flag.to_raw())
}

/// Split the foreign representation of a set of flags into individual flags, ordered from the
/// least to the most significant bit.
pub fn word_to_flags<F: FlagsType>(word: u32) -> Vec<F> {
    (0..u32::BITS)
        .map(|bit| 1u32 << bit)
        .filter(|flag| word & flag != 0)
        .map(F::from_raw)
        .collect()
}

/// Returns `true` if all bits of `flag` are set in `word`.
#[inline]
pub fn has_flag<F: FlagsType>(word: u32, flag: F) -> bool {
    let raw = flag.to_raw();
    word & raw == raw
}
