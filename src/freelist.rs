//! Doubly linked free list threaded through free payloads (C4, explicit
//! variant only).
//!
//! There is no dedicated head pointer; the head is whatever free block is
//! first reached by walking forward from `base`. Keeping the list in address
//! order (rather than, say, LIFO at the head) makes test output deterministic
//! at the cost of an O(list length) insert.

use crate::header::{self, Header};
use crate::walker;

/// A free list node, overlaid on the first 16 bytes of a free block's payload.
#[repr(C)]
pub(crate) struct Node {
  pub prev: *mut Node,
  pub next: *mut Node,
}

/// Forward-walks block headers starting at `header` (inclusive) until a free
/// block is found, returning its payload reinterpreted as a list node.
///
/// # Safety
/// `header` must be a valid header inside the segment bounded by `end`.
pub(crate) unsafe fn find_first_free_from(mut header: Header, end: *mut u8) -> Option<*mut Node> {
  loop {
    if unsafe { header::is_free(header) } {
      return Some(unsafe { header::header_to_payload(header) } as *mut Node);
    }
    header = unsafe { walker::next_block(header, end) }?;
  }
}

/// Splices `node` out of whatever list it currently belongs to.
///
/// # Safety
/// `node` must currently be a member of a well-formed free list (its `prev`
/// and `next`, if non-null, must point to live nodes in that same list).
pub(crate) unsafe fn detach(node: *mut Node) {
  unsafe {
    let prev = (*node).prev;
    let next = (*node).next;
    if let Some(p) = prev.as_mut() {
      p.next = next;
    }
    if let Some(n) = next.as_mut() {
      n.prev = prev;
    }
  }
}

/// Inserts `node` into the free list, keeping the list in address order.
///
/// Callers must not yet have marked the underlying block free when calling
/// this (see the allocator modules): the positional scan walks free blocks
/// starting just past `node`, and a block that reads as free would match
/// itself.
///
/// # Safety
/// `node` must be the payload of a block inside the segment `[base, end)`;
/// every other free block's `prev`/`next` must form a consistent list.
pub(crate) unsafe fn insert(base: Header, end: *mut u8, node: *mut Node) {
  unsafe {
    let node_header = header::payload_to_header(node as *mut u8);

    let higher =
      walker::next_block(node_header, end).and_then(|next| find_first_free_from(next, end));

    if let Some(next_node) = higher {
      let prev = (*next_node).prev;
      (*node).prev = prev;
      (*node).next = next_node;
      (*next_node).prev = node;
      if let Some(p) = prev.as_mut() {
        p.next = node;
      }
      return;
    }

    match find_first_free_from(base, end) {
      Some(head) => {
        let mut tail = head;
        while let Some(next) = (*tail).next.as_mut() {
          tail = next;
        }
        (*tail).next = node;
        (*node).prev = tail;
        (*node).next = core::ptr::null_mut();
      }
      None => {
        (*node).prev = core::ptr::null_mut();
        (*node).next = core::ptr::null_mut();
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::header::{HEADER_SIZE, write_header};

  /// Lays out `sizes.len()` adjacent blocks in `buf`, each marked allocated,
  /// and returns their header addresses.
  fn lay_out_blocks(buf: &mut [u8], sizes: &[usize]) -> Vec<Header> {
    let mut headers = Vec::new();
    let mut addr = buf.as_mut_ptr();
    for &size in sizes {
      let header = addr as Header;
      unsafe { write_header(header, size, false) };
      headers.push(header);
      addr = unsafe { addr.add(HEADER_SIZE + size) };
    }
    headers
  }

  #[test]
  fn insert_into_empty_list_is_a_singleton() {
    let mut buf = [0u8; 40];
    let end = unsafe { buf.as_mut_ptr().add(40) };
    let headers = lay_out_blocks(&mut buf, &[32]);
    let node = unsafe { header::header_to_payload(headers[0]) } as *mut Node;

    unsafe {
      insert(headers[0], end, node);
      write_header(headers[0], 32, true);
      assert!((*node).prev.is_null());
      assert!((*node).next.is_null());
    }
  }

  #[test]
  fn insert_keeps_address_order() {
    // Three same-size blocks; insert the last, then the first, then the middle.
    let mut buf = [0u8; 3 * (8 + 16)];
    let end = unsafe { buf.as_mut_ptr().add(buf.len()) };
    let headers = lay_out_blocks(&mut buf, &[16, 16, 16]);
    let nodes: Vec<*mut Node> = headers
      .iter()
      .map(|&h| unsafe { header::header_to_payload(h) } as *mut Node)
      .collect();

    unsafe {
      insert(headers[0], end, nodes[2]);
      write_header(headers[2], 16, true);
      insert(headers[0], end, nodes[0]);
      write_header(headers[0], 16, true);
      insert(headers[0], end, nodes[1]);
      write_header(headers[1], 16, true);

      assert!((*nodes[0]).prev.is_null());
      assert_eq!((*nodes[0]).next, nodes[1]);
      assert_eq!((*nodes[1]).prev, nodes[0]);
      assert_eq!((*nodes[1]).next, nodes[2]);
      assert_eq!((*nodes[2]).prev, nodes[1]);
      assert!((*nodes[2]).next.is_null());
    }
  }

  #[test]
  fn detach_splices_out_a_middle_node() {
    let mut buf = [0u8; 3 * (8 + 16)];
    let end = unsafe { buf.as_mut_ptr().add(buf.len()) };
    let headers = lay_out_blocks(&mut buf, &[16, 16, 16]);
    let nodes: Vec<*mut Node> = headers
      .iter()
      .map(|&h| unsafe { header::header_to_payload(h) } as *mut Node)
      .collect();

    unsafe {
      insert(headers[0], end, nodes[0]);
      write_header(headers[0], 16, true);
      insert(headers[0], end, nodes[1]);
      write_header(headers[1], 16, true);
      insert(headers[0], end, nodes[2]);
      write_header(headers[2], 16, true);

      detach(nodes[1]);

      assert_eq!((*nodes[0]).next, nodes[2]);
      assert_eq!((*nodes[2]).prev, nodes[0]);
    }
  }
}
