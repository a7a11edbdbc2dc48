//! The fast codec pipeline: a zero-copy indexed message view, a SIMD
//! scanning parser, and a backward-composing builder, optimized for
//! sub-microsecond single-core throughput.

mod builder;
mod message;
mod parser;

pub use builder::FastBuilder;
pub use message::{FastMessage, MarketDataMessage, MARKET_DATA_CAPACITY};
pub use parser::FastParser;
