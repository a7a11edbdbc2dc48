//! Error types for the rare conditions that aren't expressible as an absent
//! result or a `false` verdict.
//!
//! The codec never raises from a hot path: incomplete framing, malformed
//! tags, and empty-value policy are all handled by skipping bytes and
//! returning `None`/`false`. The types here
//! exist for the handful of *programming* errors that are neither framing
//! conditions nor validation failures, mirroring how `rustyfast::errors`
//! layers `StaticError`/`DynamicError`/`ReportableError` under one `Error`.

use thiserror::Error;

/// Errors that can occur while finalizing a [`crate::fast::FastBuilder`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    /// `finish` was called without ever setting `BeginString`.
    #[error("no BeginString was set before finalizing the message")]
    MissingBeginString,
    /// `finish` was called without ever setting `MsgType`.
    #[error("no MsgType was set before finalizing the message")]
    MissingMsgType,
    /// The reserved head-room was too small for the synthesized header.
    #[error("head-room of {head_room} bytes is too small for a header of {needed} bytes")]
    HeadRoomExceeded {
        /// The configured head-room, in bytes.
        head_room: usize,
        /// The header size that would have been required.
        needed: usize,
    },
}

/// Errors that can occur while leasing a buffer from a [`crate::buffer_pool::BufferPool`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// Every slot in the pool is currently leased.
    #[error("buffer pool exhausted: all {capacity} slots are leased")]
    Exhausted {
        /// Total pool capacity.
        capacity: usize,
    },
    /// The caller passed an index that is out of range or not currently leased.
    #[error("index {0} is not a currently-leased slot")]
    InvalidIndex(usize),
}
