//! The safe codec pipeline: an owning message representation and an
//! incremental, resynchronizing parser, optimized for correctness and
//! general use.

mod config;
mod message;
mod parser;

pub use config::ParserConfig;
pub use message::{SafeField, SafeMessage, ToFixValue};
pub use parser::SafeParser;
