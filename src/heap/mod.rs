//! The heap primitive seam: everything the block/free-list/allocator core
//! needs from the host, and nothing else.
//!
//! Two implementations: [`SbrkHeap`], a thin wrapper over `libc::sbrk` that
//! calls it directly the same way an ordinary bump allocator would, and
//! [`ArenaHeap`], an in-process byte-buffer arena used by the test suite so
//! the core is exercised deterministically without touching the real
//! process break.

mod arena;
mod sbrk;

pub use arena::ArenaHeap;
pub use sbrk::SbrkHeap;

use crate::error::HeapError;
use crate::offset::HeapOffset;

/// The host primitive the allocator core is built against.
///
/// Every method here operates on [`HeapOffset`]s, not raw pointers;
/// `offset_to_ptr`/`ptr_to_offset` are the only place raw pointers enter or
/// leave this trait, and they are used exclusively at the public
/// `Allocator` API boundary.
pub trait HeapPrimitive {
  /// Address of the byte-region start. Always `HeapOffset(0)`: offsets are
  /// relative to the primitive's own base, whatever that base is.
  fn heap_low(&self) -> HeapOffset;

  /// Current size of the managed region, in bytes.
  fn heap_size(&self) -> usize;

  /// Grows the region by `delta` bytes, returning the offset of the first
  /// new byte, or [`HeapError::ExtensionFailed`] if the host refused.
  fn extend(&mut self, delta: usize) -> Result<HeapOffset, HeapError>;

  /// Reads a machine word at `at`. `at` must be within `[heap_low,
  /// heap_low + heap_size)` and leave room for a full word.
  fn read_word(&self, at: HeapOffset) -> usize;

  /// Writes a machine word at `at`, with the same preconditions as
  /// [`HeapPrimitive::read_word`].
  fn write_word(&mut self, at: HeapOffset, value: usize);

  /// Converts an offset into this heap to a raw payload/header pointer.
  fn offset_to_ptr(&self, at: HeapOffset) -> *mut u8;

  /// Converts a raw pointer previously produced by `offset_to_ptr` back to
  /// an offset.
  fn ptr_to_offset(&self, ptr: *mut u8) -> HeapOffset;

  /// Address of the last valid byte, or `None` when the heap is empty.
  ///
  /// Provided in terms of `heap_low`/`heap_size` so implementations need
  /// not track it separately.
  fn heap_high(&self) -> Option<HeapOffset> {
    let size = self.heap_size();
    if size == 0 {
      None
    } else {
      Some(self.heap_low() + (size - 1))
    }
  }
}
