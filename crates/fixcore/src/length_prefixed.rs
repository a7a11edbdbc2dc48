//! The compile-time table of `(length_tag, data_tag)` pairs for FIX's
//! length-prefixed binary fields.
//!
//! Additional pairs are not recognized by either parser; callers may not
//! extend the table at runtime.

/// The four canonical length-prefixed field pairs.
pub const LENGTH_PREFIXED_PAIRS: &[(u32, u32)] = &[
    (91, 90),   // SecureDataLen / SecureData
    (93, 89),   // SignatureLength / Signature
    (212, 213), // XmlDataLen / XmlData
    (354, 355), // EncodedTextLen / EncodedText
];

/// Returns the data tag paired with `length_tag`, if `length_tag` is one of
/// the four recognized length tags.
#[inline]
pub fn data_tag_for_length_tag(length_tag: u32) -> Option<u32> {
    LENGTH_PREFIXED_PAIRS
        .iter()
        .find(|&&(len_tag, _)| len_tag == length_tag)
        .map(|&(_, data_tag)| data_tag)
}

/// Returns `true` if `tag` is a recognized length tag (the first element of
/// one of the canonical pairs).
#[inline]
pub fn is_length_tag(tag: u32) -> bool {
    LENGTH_PREFIXED_PAIRS.iter().any(|&(len_tag, _)| len_tag == tag)
}

/// Returns `true` if `tag` is a recognized data tag (the second element of
/// one of the canonical pairs) paired with `length_tag`.
#[inline]
pub fn is_paired_data_tag(length_tag: u32, data_tag: u32) -> bool {
    data_tag_for_length_tag(length_tag) == Some(data_tag)
}
