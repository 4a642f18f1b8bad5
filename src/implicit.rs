//! The implicit allocator: free-block discovery relies solely on walking the
//! inline header chain (C3, C5, C6, C7, C8 for this variant; C4 does not apply).

use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::error::InitError;
use crate::header::{self, ALIGNMENT, HEADER_SIZE};
use crate::roundup;
use crate::walker;

/// A splittable remainder must itself be a valid block: one header plus one
/// more header's worth of payload space.
const MIN_BLOCK_SIZE: usize = 2 * HEADER_SIZE;

/// An allocator over a caller-provided segment that finds free blocks by
/// linearly walking the header chain from `base` on every `malloc`.
///
/// Simpler and with less per-block overhead than [`crate::ExplicitAllocator`],
/// at the cost of an O(n_blocks) scan per allocation regardless of how many
/// blocks are actually free.
#[derive(Debug)]
pub struct ImplicitAllocator<'seg> {
  base: *mut u8,
  end: *mut u8,
  size: usize,
  used: usize,
  max_request_size: usize,
  _segment: PhantomData<&'seg mut [u8]>,
}

impl<'seg> ImplicitAllocator<'seg> {
  /// Installs a single free block spanning the whole of `segment` and
  /// returns a handle to it. `max_request_size` bounds any single `malloc`
  /// or `realloc` request.
  ///
  /// Calling `init` again (by dropping this handle and building a fresh one
  /// over the same or a different segment) fully resets the heap; nothing
  /// about a prior handle's state carries over.
  pub fn init(segment: &'seg mut [u8], max_request_size: usize) -> Result<Self, InitError> {
    let base = segment.as_mut_ptr();
    let size = segment.len();

    if (base as usize) % ALIGNMENT != 0 {
      return Err(InitError::Misaligned {
        address: base as usize,
      });
    }
    if size % ALIGNMENT != 0 {
      return Err(InitError::SizeNotAligned { size });
    }
    if size < MIN_BLOCK_SIZE {
      return Err(InitError::SegmentTooSmall {
        available: size,
        required: MIN_BLOCK_SIZE,
      });
    }

    let end = unsafe { base.add(size) };
    let payload_size = size - HEADER_SIZE;
    unsafe { header::write_header(base as header::Header, payload_size, true) };

    Ok(Self {
      base,
      end,
      size,
      used: HEADER_SIZE,
      max_request_size,
      _segment: PhantomData,
    })
  }

  /// Finds a free block of at least `need` bytes by first-fit and places a
  /// request in it, splitting off a free remainder when there's enough room
  /// to do so, or returns `None` if nothing fits.
  pub fn malloc(&mut self, n: usize) -> Option<NonNull<u8>> {
    if n == 0 || n > self.max_request_size {
      return None;
    }
    let need = roundup!(n, ALIGNMENT);
    if self.used + HEADER_SIZE + need > self.size {
      return None;
    }

    let mut header_ptr = self.base as header::Header;
    loop {
      if unsafe { header::is_free(header_ptr) } {
        let block_size = unsafe { header::read_size(header_ptr) };

        if need == block_size {
          unsafe { header::write_header(header_ptr, need, false) };
          self.used += need;
          return Some(unsafe { self.payload(header_ptr) });
        }
        if need + MIN_BLOCK_SIZE <= block_size {
          self.split(header_ptr, need, block_size);
          return Some(unsafe { self.payload(header_ptr) });
        }
        if block_size >= need {
          // Tight fit: not enough left over for a standalone block,
          // so the whole block is granted rather than split.
          unsafe { header::write_header(header_ptr, block_size, false) };
          self.used += block_size;
          return Some(unsafe { self.payload(header_ptr) });
        }
      }

      header_ptr = unsafe { walker::next_block(header_ptr, self.end) }?;
    }
  }

  /// Carves an allocated block of `need` bytes out of a free block of
  /// `block_size` bytes, leaving a free remainder in its place.
  fn split(&mut self, header_ptr: header::Header, need: usize, block_size: usize) {
    unsafe {
      header::write_header(header_ptr, need, false);
      let remainder_header = header::header_to_payload(header_ptr).add(need) as header::Header;
      let remainder_size = block_size - HEADER_SIZE - need;
      header::write_header(remainder_header, remainder_size, true);
    }
    self.used += need + HEADER_SIZE;
  }

  unsafe fn payload(&self, header_ptr: header::Header) -> NonNull<u8> {
    unsafe { NonNull::new_unchecked(header::header_to_payload(header_ptr)) }
  }

  /// Frees the block at `ptr`. A `None` pointer or a pointer to an
  /// already-free block is a no-op. If the block's immediate successor is
  /// also free, the two are coalesced into one.
  ///
  /// # Safety
  /// `ptr` must be `None` or a value previously returned by [`Self::malloc`]
  /// or [`Self::realloc`] on this allocator, not yet freed.
  pub unsafe fn free(&mut self, ptr: Option<NonNull<u8>>) {
    let Some(ptr) = ptr else { return };
    unsafe {
      debug_assert!(
        (ptr.as_ptr() as usize) >= (self.base as usize + HEADER_SIZE)
          && (ptr.as_ptr() as usize) < self.end as usize,
        "pointer passed to free() does not lie within this allocator's segment"
      );

      let header_ptr = header::payload_to_header(ptr.as_ptr());
      if header::is_free(header_ptr) {
        return;
      }
      let block_size = header::read_size(header_ptr);

      match walker::next_block(header_ptr, self.end) {
        Some(next_header) if header::is_free(next_header) => {
          let next_size = header::read_size(next_header);
          header::write_header(header_ptr, block_size + HEADER_SIZE + next_size, true);
          self.used -= HEADER_SIZE + block_size;
        }
        _ => {
          header::write_header(header_ptr, block_size, true);
          self.used -= block_size;
        }
      }
    }
  }

  /// Allocates `n` bytes, copies `min(old_size, n)` bytes from `ptr`'s
  /// current block, frees `ptr`, and returns the new block — or `None` if
  /// `ptr` is non-null and no replacement block could be placed, in which
  /// case `ptr` is left untouched and still live.
  ///
  /// `n == 0` requests a zero-byte block: `malloc` always refuses that, but
  /// `ptr` is still freed before `None` is returned.
  ///
  /// # Safety
  /// `ptr` must be `None` or a value previously returned by [`Self::malloc`]
  /// or [`Self::realloc`] on this allocator, not yet freed.
  pub unsafe fn realloc(&mut self, ptr: Option<NonNull<u8>>, n: usize) -> Option<NonNull<u8>> {
    let Some(old) = ptr else {
      return self.malloc(n);
    };
    if n == 0 {
      unsafe { self.free(Some(old)) };
      return None;
    }
    let new = self.malloc(n)?;
    unsafe {
      let old_header = header::payload_to_header(old.as_ptr());
      let old_size = header::read_size(old_header);
      let copy_len = old_size.min(n);
      std::ptr::copy_nonoverlapping(old.as_ptr(), new.as_ptr(), copy_len);
      self.free(Some(old));
    }
    Some(new)
  }

  /// Walks the whole segment, checking that the tiling accounts for every
  /// byte and that `used` matches the true sum of header and allocated-
  /// payload bytes. Never mutates state.
  pub fn validate(&self) -> bool {
    if self.used > self.size {
      return false;
    }

    let mut total = 0usize;
    let mut used_accounted = 0usize;
    let mut header_ptr = self.base as header::Header;
    loop {
      let block_size = unsafe { header::read_size(header_ptr) };
      total += HEADER_SIZE + block_size;
      used_accounted += HEADER_SIZE;
      if unsafe { !header::is_free(header_ptr) } {
        used_accounted += block_size;
      }
      match unsafe { walker::next_block(header_ptr, self.end) } {
        Some(next) => header_ptr = next,
        None => break,
      }
    }

    total == self.size && used_accounted == self.used
  }

  /// Writes a one-line-per-block diagnostic dump to `w`.
  pub fn dump(&self, w: &mut impl fmt::Write) -> fmt::Result {
    writeln!(
      w,
      "implicit segment {:p}..{:p} ({} bytes, {} used)",
      self.base, self.end, self.size, self.used
    )?;
    let mut header_ptr = self.base as header::Header;
    loop {
      let size = unsafe { header::read_size(header_ptr) };
      let free = unsafe { header::is_free(header_ptr) };
      writeln!(
        w,
        "  [{:p}] size={:<6} {}",
        header_ptr,
        size,
        if free { "free" } else { "alloc" }
      )?;
      match unsafe { walker::next_block(header_ptr, self.end) } {
        Some(next) => header_ptr = next,
        None => break,
      }
    }
    Ok(())
  }
}
