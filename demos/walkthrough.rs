use std::io::Read;

use segalloc::{ExplicitAllocator, ImplicitAllocator};

/// Waits until the user presses ENTER.
/// Useful when you want to step through the walkthrough one allocation at a
/// time and read the `dump` output in between.
fn block_until_enter_pressed() {
  println!("\n>>> Press ENTER to continue...");
  let _ = std::io::stdin().bytes().next();
}

/// Reinterprets a `Vec<u64>`'s storage as a byte segment. Going through
/// `u64` rather than `u8` guarantees 8-byte alignment without relying on an
/// implementation detail of `Vec<u8>`.
fn segment_from(words: &mut [u64]) -> &mut [u8] {
  unsafe { std::slice::from_raw_parts_mut(words.as_mut_ptr() as *mut u8, words.len() * 8) }
}

fn dump(label: &str, text: &str) {
  println!("\n[{label}]\n{text}");
}

fn main() {
  // --------------------------------------------------------------------
  // Part 1: the implicit allocator. Free blocks are found by walking the
  // header chain from the start of the segment on every malloc.
  // --------------------------------------------------------------------
  let mut backing = vec![0u64; 32]; // 256 bytes
  let mut heap = ImplicitAllocator::init(segment_from(&mut backing), 256).unwrap();

  println!("=== implicit allocator ===");
  let mut out = String::new();
  heap.dump(&mut out).unwrap();
  dump("empty segment", &out);
  block_until_enter_pressed();

  let a = heap.malloc(16).unwrap();
  let b = heap.malloc(32).unwrap();
  unsafe {
    a.as_ptr().write(0xAA);
    b.as_ptr().write(0xBB);
  }
  out.clear();
  heap.dump(&mut out).unwrap();
  dump("after two mallocs", &out);
  block_until_enter_pressed();

  unsafe { heap.free(Some(a)) };
  out.clear();
  heap.dump(&mut out).unwrap();
  dump("after freeing the first block", &out);
  assert!(heap.validate());
  block_until_enter_pressed();

  let grown = unsafe { heap.realloc(Some(b), 64) }.unwrap();
  out.clear();
  heap.dump(&mut out).unwrap();
  dump("after growing the second block via realloc", &out);
  assert_eq!(unsafe { grown.as_ptr().read() }, 0xBB);

  // --------------------------------------------------------------------
  // Part 2: the explicit allocator. Free blocks are additionally threaded
  // through a doubly linked list, so malloc only ever visits free blocks.
  // --------------------------------------------------------------------
  let mut backing = vec![0u64; 32];
  let mut heap = ExplicitAllocator::init(segment_from(&mut backing), 256).unwrap();

  println!("\n=== explicit allocator ===");
  let p1 = heap.malloc(16).unwrap();
  let p2 = heap.malloc(16).unwrap();
  let p3 = heap.malloc(16).unwrap();
  unsafe {
    p1.as_ptr().write(1);
    p2.as_ptr().write(2);
    p3.as_ptr().write(3);
  }

  let mut out = String::new();
  heap.dump(&mut out).unwrap();
  dump("three mallocs, no free blocks yet", &out);
  block_until_enter_pressed();

  unsafe {
    heap.free(Some(p2));
  }
  out.clear();
  heap.dump(&mut out).unwrap();
  dump("p2 freed: note its prev/next in the free list", &out);
  assert!(heap.validate());

  unsafe {
    heap.free(Some(p1));
  }
  out.clear();
  heap.dump(&mut out).unwrap();
  dump("p1 freed too: the list now threads both free blocks", &out);
  assert!(heap.validate());

  println!("\nEnd of walkthrough.");
}
