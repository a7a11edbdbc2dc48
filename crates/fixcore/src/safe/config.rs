//! Parser tuning flags.

/// Behavior flags for [`super::SafeParser`].
///
/// Every flag defaults to strict behavior; callers opt into leniency
/// explicitly rather than the parser guessing intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// If `true`, a field whose value is the empty string is accepted as
    /// written (`tag=<SOH>`). If `false` (the default), an empty value is
    /// treated as malformed and triggers resynchronization.
    pub allow_empty_values: bool,

    /// If `true`, the parser accepts a message that never produces a `8=`
    /// field, treating `BeginString` as absent rather than malformed. If
    /// `false` (the default), a stream that never finds `8=` never yields a
    /// message.
    pub allow_missing_begin_string: bool,

    /// If `true`, any bytes preceding the first `8=` in the buffer are
    /// discarded once `8=` is found, rather than kept as leading garbage
    /// fields. Mirrors the resynchronization behavior already applied when
    /// a mid-stream sync point is lost.
    pub strip_fields_before_begin_string: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            allow_empty_values: false,
            allow_missing_begin_string: false,
            strip_fields_before_begin_string: true,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_is_strict_but_strips_leading_garbage() {
        let config = ParserConfig::default();
        assert!(!config.allow_empty_values);
        assert!(!config.allow_missing_begin_string);
        assert!(config.strip_fields_before_begin_string);
    }
}
