//! Construction-time failures (C9). Kept as a small hand-written enum rather
//! than pulling in an error-derive crate: nothing in this domain's corpus of
//! allocator crates reaches for one, and the taxonomy here is fixed and small.

use std::fmt;

/// Why `init` refused a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
  /// The segment cannot even host one block (a header plus the variant's
  /// minimum payload).
  SegmentTooSmall { available: usize, required: usize },
  /// The segment's base address is not [`crate::ALIGNMENT`]-byte aligned.
  Misaligned { address: usize },
  /// The segment's length is not a multiple of [`crate::ALIGNMENT`].
  SizeNotAligned { size: usize },
}

impl fmt::Display for InitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match *self {
      InitError::SegmentTooSmall {
        available,
        required,
      } => write!(
        f,
        "segment of {available} bytes is too small to host a single block (needs at least {required})"
      ),
      InitError::Misaligned { address } => {
        write!(
          f,
          "segment base address {address:#x} is not {}-byte aligned",
          crate::ALIGNMENT
        )
      }
      InitError::SizeNotAligned { size } => {
        write!(
          f,
          "segment size {size} is not a multiple of {}",
          crate::ALIGNMENT
        )
      }
    }
  }
}

impl std::error::Error for InitError {}
