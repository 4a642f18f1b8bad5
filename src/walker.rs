//! Forward iteration over the chain of blocks that tile a segment (C2).
//!
//! Blocks carry no `prev` pointer and no boundary tag, so the only way to
//! reach a block is to walk forward from `base`; this is also why coalescing
//! (§4.5) can only ever look at a block's successor, never its predecessor.

use crate::header::{self, Header};

/// Returns the header of the block physically following `header`, or `None`
/// if `header` is the last block in the segment (its successor would land at
/// or past `end`).
///
/// # Safety
/// `header` must be a valid header inside the segment bounded by `end`.
pub(crate) unsafe fn next_block(header: Header, end: *mut u8) -> Option<Header> {
  unsafe {
    let size = header::read_size(header);
    let next = header::header_to_payload(header).add(size) as Header;
    if (next as *mut u8) < end {
      Some(next)
    } else {
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::header::{Header, write_header};

  #[test]
  fn stops_at_segment_end() {
    let mut buf = [0u8; 32];
    let base = buf.as_mut_ptr() as Header;
    unsafe {
      write_header(base, 24, true);
      let end = buf.as_mut_ptr().add(32);
      assert_eq!(next_block(base, end), None);
    }
  }

  #[test]
  fn walks_to_the_following_header() {
    let mut buf = [0u8; 40];
    let base = buf.as_mut_ptr() as Header;
    unsafe {
      write_header(base, 16, false);
      let end = buf.as_mut_ptr().add(40);
      let next = next_block(base, end).expect("a block follows");
      assert_eq!(next as usize, base as usize + 8 + 16);
    }
  }
}
