use std::mem;
use std::ptr;

use libc::{c_void, intptr_t, sbrk};

use super::HeapPrimitive;
use crate::error::HeapError;
use crate::offset::HeapOffset;

/// The production [`HeapPrimitive`]: a thin wrapper over `sbrk(2)`, called
/// directly the same way a bump allocator would.
///
/// `sbrk` hands out a monotonically growing region of the process's data
/// segment; this type remembers the address of the first byte it ever saw
/// so later calls can report offsets relative to it.
pub struct SbrkHeap {
  base: Option<*mut u8>,
  size: usize,
}

impl SbrkHeap {
  /// Creates a heap that has not yet called `sbrk`. The base address is
  /// captured lazily, on the first successful `extend`.
  pub fn new() -> Self {
    Self { base: None, size: 0 }
  }
}

impl Default for SbrkHeap {
  fn default() -> Self {
    Self::new()
  }
}

impl HeapPrimitive for SbrkHeap {
  fn heap_low(&self) -> HeapOffset {
    HeapOffset::new(0)
  }

  fn heap_size(&self) -> usize {
    self.size
  }

  fn extend(&mut self, delta: usize) -> Result<HeapOffset, HeapError> {
    let raw = unsafe { sbrk(delta as intptr_t) };
    if raw == usize::MAX as *mut c_void {
      return Err(HeapError::ExtensionFailed { requested: delta });
    }

    let base = *self.base.get_or_insert(raw as *mut u8);
    let offset = HeapOffset::new((raw as usize) - (base as usize));
    self.size += delta;
    Ok(offset)
  }

  fn read_word(&self, at: HeapOffset) -> usize {
    let addr = self.base.expect("read before first extend") as usize + at.get();
    unsafe { ptr::read(addr as *const usize) }
  }

  fn write_word(&mut self, at: HeapOffset, value: usize) {
    let addr = self.base.expect("write before first extend") as usize + at.get();
    unsafe { ptr::write(addr as *mut usize, value) };
  }

  fn offset_to_ptr(&self, at: HeapOffset) -> *mut u8 {
    let base = self.base.expect("offset_to_ptr before first extend") as usize;
    (base + at.get()) as *mut u8
  }

  fn ptr_to_offset(&self, ptr: *mut u8) -> HeapOffset {
    let base = self.base.expect("ptr_to_offset before first extend") as usize;
    HeapOffset::new(ptr as usize - base)
  }
}

const _: () = assert!(mem::size_of::<usize>() == mem::size_of::<*mut u8>());
