//! # segalloc - A Segment-Backed Heap Allocator
//!
//! This crate provides two variants of a user-space dynamic memory allocator
//! that manage a single, contiguous, caller-provided byte segment: an
//! [`ImplicitAllocator`], which finds free blocks by scanning the whole
//! header chain, and an [`ExplicitAllocator`], which additionally threads
//! free blocks through a doubly linked free list stored in their own
//! payloads.
//!
//! ## Block layout
//!
//! ```text
//!   Single block:
//!   ┌──────────┬─────────────────────────────────────┐
//!   │  header  │               payload               │
//!   │ (8 bytes)│         (a multiple of 8 bytes)      │
//!   └──────────┴─────────────────────────────────────┘
//!              ▲
//!              └── address returned to the caller by malloc/realloc
//!
//!   The header is one 8-byte word: bit 0 is the free/allocated flag, the
//!   remaining bits hold the payload size. Blocks tile the segment exactly,
//!   with no gaps and no trailing boundary tag:
//!
//!   [base] [hdr|payload][hdr|payload][hdr|payload] ... [end)
//! ```
//!
//! ## Variant comparison
//!
//! ```text
//!   segalloc
//!   ├── header    - header codec: pack/unpack (size, status) in one word
//!   ├── walker    - forward-only block iteration
//!   ├── freelist  - doubly linked free list (explicit variant only)
//!   ├── implicit  - ImplicitAllocator: O(n_blocks) malloc, O(1) free
//!   └── explicit  - ExplicitAllocator: O(free blocks) malloc, 16-byte payload floor
//! ```
//!
//! ## Quick start
//!
//! ```
//! use segalloc::ImplicitAllocator;
//!
//! let mut buf = vec![0u64; 16]; // 128 bytes, 8-byte aligned
//! let segment = unsafe { std::slice::from_raw_parts_mut(buf.as_mut_ptr() as *mut u8, 128) };
//!
//! let mut heap = ImplicitAllocator::init(segment, 128).unwrap();
//! let p = heap.malloc(16).unwrap();
//! unsafe {
//!     p.as_ptr().write(0xAB);
//!     heap.free(Some(p));
//! }
//! assert!(heap.validate());
//! ```
//!
//! ## Coalescing is forward-only
//!
//! Neither variant stores a `prev` pointer or a boundary tag, so `free` can
//! only ever merge a block with the block physically after it, never before.
//! This keeps per-block overhead at a single header word, at the cost of
//! leaving some reclaimable adjacency unmerged when blocks are freed in an
//! order that doesn't walk forward through the segment (see `DESIGN.md`).
//!
//! ## Safety
//!
//! This crate is inherently unsafe: it reinterprets raw bytes of a
//! caller-supplied segment as headers and, in the explicit variant, as free
//! list nodes. `malloc`, `validate` and `dump` are safe to call for any
//! input; `free` and `realloc` carry the precondition that the pointer
//! passed in was returned by this same allocator and not yet freed —
//! violating that is undefined behavior, exactly as it would be for a
//! `GlobalAlloc` implementation.

mod align;
mod error;
mod explicit;
mod freelist;
mod header;
mod implicit;
mod walker;

pub use error::InitError;
pub use explicit::ExplicitAllocator;
pub use header::{ALIGNMENT, HEADER_SIZE};
pub use implicit::ImplicitAllocator;
