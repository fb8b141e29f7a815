//! The allocator proper: D (`alloc`), E (`free`), F (`realloc`) and G
//! (`check`), layered over the block/free-list core and any
//! [`HeapPrimitive`].
//!
//! Each concern lives in its own submodule as an `impl<H: HeapPrimitive>
//! Allocator<H>` block: separate components with separate invariants, even
//! though they share one struct.

mod alloc;
mod check;
mod free;
mod realloc;

pub use check::{CheckReport, Violation};

use crate::block::{align_up, WORD};
use crate::error::AllocError;
use crate::free_list;
use crate::heap::HeapPrimitive;
use crate::offset::HeapOffset;

/// A best-fit, coalescing, address-ordered explicit free-list allocator
/// over a [`HeapPrimitive`].
///
/// Not `Send` or `Sync`: this type holds no locks and is not reentrant.
/// Callers needing concurrent access must supply their own external
/// synchronization; this crate does not attempt it.
pub struct Allocator<H: HeapPrimitive> {
  heap: H,
}

impl<H: HeapPrimitive> Allocator<H> {
  /// Wraps a heap primitive in a fresh allocator. No heap mutation happens
  /// here; the head cell is installed lazily on the first `alloc`.
  pub fn new(heap: H) -> Self {
    Self { heap }
  }

  /// Idempotent; does nothing. Kept only so callers ported from a C `mm_init`
  /// convention have somewhere to call. Real initialization happens lazily,
  /// inside the first `alloc`.
  pub fn init(&mut self) {}

  /// Read-only access to the underlying primitive, e.g. for inspecting
  /// `heap_size()` in tests.
  pub fn heap(&self) -> &H {
    &self.heap
  }

  /// The header address of the first block, once the heap has been
  /// initialized: the head cell occupies exactly one word at offset 0 and
  /// needs no further padding since `P == WORD` on every target this crate
  /// supports.
  fn block_region_start(&self) -> HeapOffset {
    HeapOffset::new(align_up(WORD))
  }

  /// Installs the head cell on first use. A no-op once the heap is
  /// non-empty.
  fn ensure_initialized(&mut self) -> Result<(), AllocError> {
    if self.heap.heap_size() == 0 {
      let head_cell_bytes = self.block_region_start().get();
      self.heap.extend(head_cell_bytes)?;
      free_list::set_head(&mut self.heap, None);
      log::debug!("allocator initialized: head cell installed at offset 0");
    }
    Ok(())
  }

  fn payload_ptr(&self, offset: HeapOffset) -> *mut u8 {
    self.heap.offset_to_ptr(offset)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::heap::ArenaHeap;

  #[test]
  fn new_allocator_does_not_touch_the_heap() {
    let allocator = Allocator::new(ArenaHeap::with_capacity(256));
    assert_eq!(allocator.heap().heap_size(), 0);
  }

  #[test]
  fn init_is_a_repeatable_no_op() {
    let mut allocator = Allocator::new(ArenaHeap::with_capacity(256));
    allocator.init();
    allocator.init();
    assert_eq!(allocator.heap().heap_size(), 0);
  }
}
