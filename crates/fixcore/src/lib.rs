//! A FIX tag-value codec with paired safe and zero-allocation fast
//! pipelines.
//!
//! Two independent codec pipelines share the same wire-format rules:
//!
//! - [`safe`] — an owning [`safe::SafeMessage`] and an incremental,
//!   resynchronizing [`safe::SafeParser`], built for correctness and
//!   general use.
//! - [`fast`] — a zero-copy [`fast::FastMessage`] view, a SIMD-scanning
//!   [`fast::FastParser`], and a backward-composing [`fast::FastBuilder`],
//!   built for sub-microsecond single-core throughput.
//!
//! Both pipelines are backed by the same [`checksum`] and [`time`]
//! utilities, and agree on the same [`length_prefixed`] field table.

pub mod buffer_pool;
pub mod checksum;
pub mod error;
pub mod fast;
pub mod length_prefixed;
pub mod safe;
pub mod tag;
pub mod time;

#[cfg(feature = "utils-chrono")]
pub mod utils_chrono;

/// The FIX field delimiter: Start-of-Header, `0x01`.
pub const SOH: u8 = 0x01;

/// Commonly used types, re-exported for a single `use fixcore::prelude::*`.
pub mod prelude {
    pub use crate::buffer_pool::BufferPool;
    pub use crate::error::{BuilderError, PoolError};
    pub use crate::fast::{FastBuilder, FastMessage, FastParser, MarketDataMessage};
    pub use crate::safe::{ParserConfig, SafeField, SafeMessage, SafeParser, ToFixValue};
    pub use crate::tag::TagU32;
    pub use crate::time::Precision;
    pub use crate::SOH;
}
