//! The incremental, resynchronizing framing state machine.
//!
//! Grounded in the peeked-prefix framing of ForgeFIX's `fix::decode` (the
//! `parse_peeked_prefix` body-length arithmetic and `FieldIter` state
//! machine), adapted to own a growing buffer rather than borrow a fixed
//! slice.

use super::config::ParserConfig;
use super::message::SafeMessage;
use crate::SOH;
use crate::length_prefixed::data_tag_for_length_tag;
use crate::tag::TagU32;
use log::{debug, trace};

const TRAILER_LEN: usize = 7; // "10=DDD" + SOH

/// Incremental FIX framer: bytes arrive via [`SafeParser::append_buffer`],
/// complete messages leave via [`SafeParser::get_message`].
#[derive(Debug)]
pub struct SafeParser {
    config: ParserConfig,
    buffer: Vec<u8>,
}

impl SafeParser {
    /// Creates a parser with an empty buffer.
    pub fn new(config: ParserConfig) -> Self {
        Self {
            config,
            buffer: Vec::new(),
        }
    }

    /// Appends more bytes to the parser's internal buffer.
    pub fn append_buffer(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Number of bytes currently buffered and not yet consumed.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Attempts to extract one complete message from the buffer.
    ///
    /// Returns `None` if the buffer doesn't yet hold a complete message.
    /// Every call either returns a message or advances consumption by at
    /// least one byte, so repeated polling is always `O(n)` total work.
    pub fn get_message(&mut self) -> Option<SafeMessage> {
        loop {
            let begin_at = find_subslice(&self.buffer, b"8=")?;
            if begin_at > 0 {
                if self.config.strip_fields_before_begin_string {
                    trace!("safe parser: dropping {begin_at} bytes of junk before \"8=\"");
                    self.buffer.drain(..begin_at);
                } else {
                    // The leading bytes stay, but framing still starts at
                    // the anchor; nothing to extract from them.
                }
            }
            let begin_at = if self.config.strip_fields_before_begin_string {
                0
            } else {
                begin_at
            };

            let tail = &self.buffer[begin_at..];
            let mut soh_9_pattern = [0u8; 4];
            soh_9_pattern[0] = SOH;
            soh_9_pattern[1] = b'9';
            soh_9_pattern[2] = b'=';
            let body_len_at = match find_subslice(tail, &soh_9_pattern[..3]) {
                Some(i) => i,
                None => return None,
            };

            let digits_start = begin_at + body_len_at + 3;
            let Some(digits_end_rel) = find_subslice(&self.buffer[digits_start..], &[SOH]) else {
                return None;
            };
            let digits_end = digits_start + digits_end_rel;

            let digits = &self.buffer[digits_start..digits_end];
            let body_len: usize = match std::str::from_utf8(digits).ok().and_then(|s| s.parse().ok()) {
                Some(n) => n,
                None => {
                    debug!("safe parser: malformed body length, dropping one byte and resyncing");
                    self.buffer.drain(..1);
                    continue;
                }
            };

            let total_len = (digits_end + 1) + body_len + TRAILER_LEN;
            if self.buffer.len() < total_len {
                return None;
            }

            let message_bytes: Vec<u8> = self.buffer.drain(..total_len).collect();
            return Some(self.extract_fields(&message_bytes));
        }
    }

    fn extract_fields(&self, bytes: &[u8]) -> SafeMessage {
        let mut message = SafeMessage::new();
        let mut pos = 0;
        let mut pending_length: Option<(u32, usize)> = None;

        while pos < bytes.len() {
            let Some(eq_rel) = find_subslice(&bytes[pos..], &[b'=']) else {
                break;
            };
            let eq_at = pos + eq_rel;
            let tag_bytes = &bytes[pos..eq_at];
            let Some(tag) = std::str::from_utf8(tag_bytes).ok().and_then(|s| s.parse::<u32>().ok()) else {
                pos += 1;
                continue;
            };
            if TagU32::new(tag).is_none() {
                pos += 1;
                continue;
            }

            let value_start = eq_at + 1;
            let (value_end, next_pos) = match pending_length {
                Some((len_tag, n)) if data_tag_for_length_tag(len_tag) == Some(tag) && n > 0 => {
                    let end = value_start + n;
                    if end >= bytes.len() || bytes[end] != SOH {
                        // Malformed length-prefixed field: fall back to
                        // ordinary SOH-delimited framing for this field.
                        match find_subslice(&bytes[value_start..], &[SOH]) {
                            Some(rel) => (value_start + rel, value_start + rel + 1),
                            None => (bytes.len(), bytes.len()),
                        }
                    } else {
                        (end, end + 1)
                    }
                }
                _ => match find_subslice(&bytes[value_start..], &[SOH]) {
                    Some(rel) => (value_start + rel, value_start + rel + 1),
                    None => (bytes.len(), bytes.len()),
                },
            };

            let value = &bytes[value_start..value_end];
            if value.is_empty() && !self.config.allow_empty_values {
                trace!("safe parser: skipping empty value for tag {tag}");
            } else {
                message.append(tag, value, false);
            }

            pending_length = if crate::length_prefixed::is_length_tag(tag) {
                std::str::from_utf8(value).ok().and_then(|s| s.parse().ok()).map(|n| (tag, n))
            } else {
                None
            };

            pos = next_pos;
        }

        message
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|window| window == needle)
}
