//! A zero-copy indexed message view over an owned backing buffer.

use arrayvec::ArrayVec;

/// Fixed capacity of [`MarketDataMessage`]'s inline field arrays.
pub const MARKET_DATA_CAPACITY: usize = 2000;

/// A self-owning, non-borrowing FIX message: one contiguous backing
/// buffer plus three parallel index arrays.
///
/// Field `i` is the byte range `buffer[starts[i]..ends[i])`. The arrays
/// grow together; `add_field` is the only writer and is trusted by its
/// caller (the Fast Parser) to pass in-bounds, ordered ranges — every
/// access here stays safe: no raw pointers, just slice indexing that
/// panics loudly on a caller bug instead of reading out of bounds.
#[derive(Debug, Clone, Default)]
pub struct FastMessage {
    buffer: Vec<u8>,
    tags: Vec<u32>,
    starts: Vec<usize>,
    ends: Vec<usize>,
}

impl FastMessage {
    /// Creates an empty message with no reserved capacity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty message with buffer and index capacity
    /// pre-reserved for `field_capacity` fields of total byte size
    /// `byte_capacity`.
    pub fn with_capacity(byte_capacity: usize, field_capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(byte_capacity),
            tags: Vec::with_capacity(field_capacity),
            starts: Vec::with_capacity(field_capacity),
            ends: Vec::with_capacity(field_capacity),
        }
    }

    /// Replaces the backing buffer wholesale and clears the index arrays.
    /// Used by [`super::FastParser`] at the start of every parse.
    pub fn load_buffer(&mut self, bytes: &[u8]) {
        self.buffer.clear();
        self.buffer.extend_from_slice(bytes);
        self.tags.clear();
        self.starts.clear();
        self.ends.clear();
    }

    /// Appends a field reference into the backing buffer without bounds
    /// checking beyond a debug assertion; the parser is responsible for
    /// passing ranges that satisfy `start <= end <= buffer.len()`.
    #[inline]
    pub fn add_field(&mut self, tag: u32, start: usize, end: usize) {
        debug_assert!(start <= end && end <= self.buffer.len());
        self.tags.push(tag);
        self.starts.push(start);
        self.ends.push(end);
    }

    /// Returns the first occurrence of `tag`, copied out as an owned
    /// buffer.
    pub fn get(&self, tag: u32) -> Option<Vec<u8>> {
        self.get_nth(tag, 1)
    }

    /// Returns the `nth` (1-based) occurrence of `tag`, copied out as an
    /// owned buffer.
    pub fn get_nth(&self, tag: u32, nth: usize) -> Option<Vec<u8>> {
        self.index_of_nth(tag, nth).map(|i| self.buffer[self.starts[i]..self.ends[i]].to_vec())
    }

    /// Returns the first occurrence of `tag` as a borrowed slice, avoiding
    /// the copy that [`FastMessage::get`] performs.
    pub fn get_slice(&self, tag: u32) -> Option<&[u8]> {
        self.index_of_nth(tag, 1).map(|i| &self.buffer[self.starts[i]..self.ends[i]])
    }

    fn index_of_nth(&self, tag: u32, nth: usize) -> Option<usize> {
        let nth = nth.max(1);
        let mut seen = 0;
        for (i, &t) in self.tags.iter().enumerate() {
            if t == tag {
                seen += 1;
                if seen == nth {
                    return Some(i);
                }
            }
        }
        None
    }

    /// Returns `true` if `tag` appears at least once.
    pub fn has_field(&self, tag: u32) -> bool {
        self.tags.contains(&tag)
    }

    /// Total number of fields indexed.
    pub fn field_count(&self) -> usize {
        self.tags.len()
    }

    /// Truncates the index arrays to zero length without releasing
    /// capacity; the backing buffer is left as-is until the next
    /// [`FastMessage::load_buffer`].
    pub fn clear(&mut self) {
        self.tags.clear();
        self.starts.clear();
        self.ends.clear();
    }

    /// Returns the tag at position `i` in discovery (wire) order.
    pub fn tag_at(&self, i: usize) -> Option<u32> {
        self.tags.get(i).copied()
    }

    /// Returns the value slice at position `i` in discovery (wire) order.
    pub fn value_at(&self, i: usize) -> Option<&[u8]> {
        if i >= self.tags.len() {
            return None;
        }
        Some(&self.buffer[self.starts[i]..self.ends[i]])
    }

    /// Direct access to the backing buffer, for callers building their own
    /// field walk (e.g. a templated message specialization).
    pub fn backing_buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Moves the backing buffer out, leaving an empty one in its place.
    ///
    /// Lets [`super::FastParser`] scan the buffer by value without holding
    /// a borrow of `self` that would conflict with the interleaved
    /// `add_field` calls, and without cloning the bytes. Pair with
    /// [`FastMessage::restore_buffer`] once the scan is done.
    pub(crate) fn take_buffer(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buffer)
    }

    /// Puts a buffer previously removed by [`FastMessage::take_buffer`]
    /// back in place.
    pub(crate) fn restore_buffer(&mut self, buffer: Vec<u8>) {
        self.buffer = buffer;
    }
}

/// A stack-allocated specialization of [`FastMessage`] for a known,
/// high-volume message class (market-data snapshots/incrementals), whose
/// field count rarely if ever exceeds [`MARKET_DATA_CAPACITY`], making a
/// heap-free representation worthwhile.
///
/// Capacity is fixed at compile time: a message with more than
/// [`MARKET_DATA_CAPACITY`] fields silently stops indexing further fields
/// rather than reallocating, since the whole point of this specialization
/// is to never touch the heap.
#[derive(Debug, Clone)]
pub struct MarketDataMessage {
    buffer: ArrayVec<u8, { MARKET_DATA_CAPACITY * 16 }>,
    tags: ArrayVec<u32, MARKET_DATA_CAPACITY>,
    starts: ArrayVec<usize, MARKET_DATA_CAPACITY>,
    ends: ArrayVec<usize, MARKET_DATA_CAPACITY>,
}

impl Default for MarketDataMessage {
    fn default() -> Self {
        Self {
            buffer: ArrayVec::new(),
            tags: ArrayVec::new(),
            starts: ArrayVec::new(),
            ends: ArrayVec::new(),
        }
    }
}

impl MarketDataMessage {
    /// Creates an empty message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the backing buffer; truncates and re-fills it up to its
    /// fixed inline capacity, silently dropping any excess bytes.
    pub fn load_buffer(&mut self, bytes: &[u8]) {
        self.buffer.clear();
        let take = bytes.len().min(self.buffer.capacity());
        self.buffer.try_extend_from_slice(&bytes[..take]).expect("take is bounded by remaining capacity");
        self.tags.clear();
        self.starts.clear();
        self.ends.clear();
    }

    /// Appends a field reference; does nothing if the inline arrays are
    /// already full.
    #[inline]
    pub fn add_field(&mut self, tag: u32, start: usize, end: usize) {
        if self.tags.is_full() {
            return;
        }
        debug_assert!(start <= end && end <= self.buffer.len());
        self.tags.push(tag);
        self.starts.push(start);
        self.ends.push(end);
    }

    /// Returns the first occurrence of `tag` as a borrowed slice.
    pub fn get_slice(&self, tag: u32) -> Option<&[u8]> {
        let i = self.tags.iter().position(|&t| t == tag)?;
        Some(&self.buffer[self.starts[i]..self.ends[i]])
    }

    /// Total number of fields indexed.
    pub fn field_count(&self) -> usize {
        self.tags.len()
    }

    /// Truncates the index arrays to zero length.
    pub fn clear(&mut self) {
        self.tags.clear();
        self.starts.clear();
        self.ends.clear();
    }
}
