use super::HeapPrimitive;
use crate::error::HeapError;
use crate::offset::HeapOffset;

/// Default backing capacity for an [`ArenaHeap`] created with [`ArenaHeap::new`].
const DEFAULT_CAPACITY: usize = 1 << 20;

/// A [`HeapPrimitive`] backed by a single fixed-capacity byte buffer, used by
/// the test suite in place of the real process break.
///
/// An arena-with-indices design: the storage is allocated once, up front,
/// as a `Box<[u8]>`, so its address never moves and pointers handed out by
/// the allocator stay valid for the arena's lifetime. `extend` past the
/// configured capacity fails exactly the way a real `sbrk` would fail
/// under a resource limit.
pub struct ArenaHeap {
  storage: Box<[u8]>,
  len: usize,
}

impl ArenaHeap {
  /// Creates an arena with the default capacity, generous enough for the
  /// scenario and property tests this crate ships with.
  pub fn new() -> Self {
    Self::with_capacity(DEFAULT_CAPACITY)
  }

  /// Creates an arena backed by exactly `capacity` bytes of storage,
  /// allocated up front.
  pub fn with_capacity(capacity: usize) -> Self {
    Self { storage: vec![0u8; capacity].into_boxed_slice(), len: 0 }
  }
}

impl Default for ArenaHeap {
  fn default() -> Self {
    Self::new()
  }
}

impl HeapPrimitive for ArenaHeap {
  fn heap_low(&self) -> HeapOffset {
    HeapOffset::new(0)
  }

  fn heap_size(&self) -> usize {
    self.len
  }

  fn extend(&mut self, delta: usize) -> Result<HeapOffset, HeapError> {
    let new_len = self
      .len
      .checked_add(delta)
      .filter(|&n| n <= self.storage.len())
      .ok_or(HeapError::ExtensionFailed { requested: delta })?;

    let start = HeapOffset::new(self.len);
    self.len = new_len;
    Ok(start)
  }

  fn read_word(&self, at: HeapOffset) -> usize {
    let bytes: [u8; 8] = self.storage[at.get()..at.get() + 8].try_into().unwrap();
    usize::from_ne_bytes(bytes)
  }

  fn write_word(&mut self, at: HeapOffset, value: usize) {
    self.storage[at.get()..at.get() + 8].copy_from_slice(&value.to_ne_bytes());
  }

  fn offset_to_ptr(&self, at: HeapOffset) -> *mut u8 {
    unsafe { self.storage.as_ptr().add(at.get()) as *mut u8 }
  }

  fn ptr_to_offset(&self, ptr: *mut u8) -> HeapOffset {
    let base = self.storage.as_ptr() as usize;
    HeapOffset::new(ptr as usize - base)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn extend_reports_sequential_offsets() {
    let mut arena = ArenaHeap::with_capacity(64);
    let a = arena.extend(8).unwrap();
    let b = arena.extend(16).unwrap();
    assert_eq!(a, HeapOffset::new(0));
    assert_eq!(b, HeapOffset::new(8));
    assert_eq!(arena.heap_size(), 24);
  }

  #[test]
  fn extend_past_capacity_fails_without_mutating_len() {
    let mut arena = ArenaHeap::with_capacity(16);
    assert!(arena.extend(8).is_ok());
    assert!(matches!(arena.extend(64), Err(HeapError::ExtensionFailed { requested: 64 })));
    assert_eq!(arena.heap_size(), 8);
  }

  #[test]
  fn word_read_write_round_trips() {
    let mut arena = ArenaHeap::with_capacity(32);
    let at = arena.extend(16).unwrap();
    arena.write_word(at, 0xDEAD_BEEF);
    assert_eq!(arena.read_word(at), 0xDEAD_BEEF);
  }

  #[test]
  fn pointer_offset_round_trips() {
    let mut arena = ArenaHeap::with_capacity(32);
    let at = arena.extend(16).unwrap();
    let ptr = arena.offset_to_ptr(at);
    assert_eq!(arena.ptr_to_offset(ptr), at);
  }
}
