//! The [`TagU32`] newtype: a validated FIX tag number.

use std::fmt;
use std::num::NonZeroU32;

/// A FIX tag number.
///
/// Tags are positive integers in `[1, 99999]` on the wire.
/// [`TagU32`] only enforces the "positive" half of that constraint at
/// construction time — the upper bound is a wire convention, not a safety
/// invariant, so out-of-range-but-positive tags are accepted and simply
/// round-trip as opaque numbers.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TagU32(NonZeroU32);

impl TagU32 {
    /// Creates a new [`TagU32`] from a `u32`, returning `None` for zero.
    #[inline]
    pub fn new(tag: u32) -> Option<Self> {
        NonZeroU32::new(tag).map(Self)
    }

    /// Returns the underlying tag number.
    #[inline]
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for TagU32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.get())
    }
}

impl From<TagU32> for u32 {
    fn from(tag: TagU32) -> u32 {
        tag.get()
    }
}

impl TryFrom<u32> for TagU32 {
    type Error = InvalidTag;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        TagU32::new(value).ok_or(InvalidTag(value))
    }
}

/// A tag number that failed validation (zero is the only rejected value).
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
#[error("tag {0} is not a valid FIX tag (tags must be positive)")]
pub struct InvalidTag(pub u32);

/// The well-known tags that receive special treatment during encoding.
pub mod well_known {
    /// `BeginString`, synthesized at encode time, never stored as a user field.
    pub const BEGIN_STRING: u32 = 8;
    /// `BodyLength`, synthesized at encode time, never stored as a user field.
    pub const BODY_LENGTH: u32 = 9;
    /// `MsgType`, stored like any other field but placed first in the body.
    pub const MSG_TYPE: u32 = 35;
    /// `CheckSum`, synthesized at encode time, never stored as a user field.
    pub const CHECK_SUM: u32 = 10;
}
