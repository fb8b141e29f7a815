use super::Allocator;
use crate::block::{self, align_up, MIN_BLOCK_SIZE, WORD};
use crate::free_list;
use crate::heap::HeapPrimitive;
use crate::offset::HeapOffset;

impl<H: HeapPrimitive> Allocator<H> {
  /// Allocates `size` payload bytes, returning a `WORD`-aligned pointer, or
  /// `None` if the heap primitive could not be extended.
  ///
  /// Best-fit: searches the whole free list for the smallest block that
  /// fits, splitting from its high end when there's enough slack to leave a
  /// usable free remainder, consuming it whole otherwise. Falls back to
  /// extending the heap — reusing a free block that already abuts the heap
  /// end, if one exists — when nothing in the list fits.
  pub fn alloc(&mut self, size: usize) -> Option<*mut u8> {
    self.ensure_initialized().ok()?;

    let need = Self::normalize(size);
    let header = self.alloc_header(need)?;
    log::trace!("alloc({size}) -> header={} need={}", header.get(), need);
    Some(self.payload_ptr(block::payload(header)))
  }

  /// `r' = max(r, 2*LINK)`, then word-align `r' + WORD`: every block must
  /// be large enough to hold free-list links once it's freed.
  fn normalize(size: usize) -> usize {
    let min_payload = 2 * WORD;
    let payload = size.max(min_payload);
    align_up(payload + WORD)
  }

  fn alloc_header(&mut self, need: usize) -> Option<HeapOffset> {
    match self.find_best_fit(need) {
      Some((best, best_size, true)) => {
        // Exact fit: unlink and hand the whole block over, no split.
        free_list::unlink(&mut self.heap, block::payload(best));
        block::write_header(&mut self.heap, best, best_size, true);
        Some(best)
      }
      Some((best, best_size, false)) if best_size - need >= MIN_BLOCK_SIZE => {
        // Splittable: carve the allocation off the high end so the free
        // remainder keeps `best`'s header address, and therefore its list
        // position — no list surgery needed on this path.
        let remainder = best_size - need;
        block::write_header(&mut self.heap, best, remainder, false);
        let alloc_header = best + remainder;
        block::write_header(&mut self.heap, alloc_header, need, true);
        Some(alloc_header)
      }
      Some((best, best_size, false)) => {
        // Oversized but not splittable: consume the whole block, absorbing
        // the slack as internal fragmentation.
        free_list::unlink(&mut self.heap, block::payload(best));
        block::write_header(&mut self.heap, best, best_size, true);
        Some(best)
      }
      None => self.extend_for(need),
    }
  }

  /// Walks the free list once, tracking the smallest block strictly larger
  /// than `need` (ties broken by first-found) and returning immediately on
  /// an exact match. Returns `(header, size, is_exact_match)`.
  fn find_best_fit(&self, need: usize) -> Option<(HeapOffset, usize, bool)> {
    let mut cursor = free_list::head(&self.heap);
    let mut best: Option<(HeapOffset, usize)> = None;

    while let Some(node) = cursor {
      let header = block::header_from_payload(node);
      let size = block::size_of_header(&self.heap, header);

      if size == need {
        return Some((header, size, true));
      }
      if size > need && best.is_none_or(|(_, best_size)| size < best_size) {
        best = Some((header, size));
      }

      cursor = free_list::forward(&self.heap, node);
    }

    best.map(|(header, size)| (header, size, false))
  }

  /// No free block fit: grow the heap. If the highest-address free block
  /// already abuts the heap end, only the shortfall needs to be requested
  /// and its header address is reused; otherwise a fresh block is placed at
  /// the new top of heap.
  fn extend_for(&mut self, need: usize) -> Option<HeapOffset> {
    if let Some(tail_header) = self.free_tail_at_heap_end() {
      let tail_size = block::size_of_header(&self.heap, tail_header);
      self.heap.extend(need - tail_size).ok()?;
      free_list::unlink(&mut self.heap, block::payload(tail_header));
      block::write_header(&mut self.heap, tail_header, need, true);
      return Some(tail_header);
    }

    let header = self.heap.extend(need).ok()?;
    block::write_header(&mut self.heap, header, need, true);
    Some(header)
  }

  /// The highest-address free-list node, if its block ends exactly at the
  /// current top of heap.
  fn free_tail_at_heap_end(&self) -> Option<HeapOffset> {
    let heap_high = self.heap.heap_high()?;

    let mut cursor = free_list::head(&self.heap);
    let mut tail = None;
    while let Some(node) = cursor {
      tail = Some(node);
      cursor = free_list::forward(&self.heap, node);
    }

    let header = block::header_from_payload(tail?);
    let size = block::size_of_header(&self.heap, header);
    (block::end(header, size) == heap_high + 1).then_some(header)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::heap::ArenaHeap;

  fn new_allocator() -> Allocator<ArenaHeap> {
    Allocator::new(ArenaHeap::with_capacity(4096))
  }

  #[test]
  fn first_alloc_initializes_and_returns_aligned_pointer() {
    let mut alloc = new_allocator();
    let ptr = alloc.alloc(24).expect("alloc should succeed");
    assert_eq!(ptr as usize % WORD, 0);
  }

  #[test]
  fn distinct_allocations_do_not_overlap() {
    let mut alloc = new_allocator();
    let a = alloc.alloc(32).unwrap();
    let b = alloc.alloc(32).unwrap();
    assert_ne!(a, b);
  }

  #[test]
  fn exact_fit_is_not_split() {
    let mut alloc = new_allocator();
    let a = alloc.alloc(64).unwrap();
    alloc.free(a);

    let before = alloc.heap().heap_size();
    let b = alloc.alloc(64).unwrap();
    assert_eq!(a, b, "reusing the exact-size free block should not move allocations");
    assert_eq!(alloc.heap().heap_size(), before, "exact fit must not grow the heap");
  }

  #[test]
  fn best_fit_prefers_the_smallest_sufficient_free_block() {
    let mut alloc = new_allocator();
    let a = alloc.alloc(64).unwrap();
    let b = alloc.alloc(16).unwrap();
    let c = alloc.alloc(64).unwrap();
    alloc.free(a);
    alloc.free(c);

    let before = alloc.heap().heap_size();
    let d = alloc.alloc(24).unwrap();
    assert!(d == a || d == c, "should reuse one of the freed same-size blocks, not grow the heap");
    assert_eq!(alloc.heap().heap_size(), before);
    let _ = b;
  }

  #[test]
  fn no_fit_extends_the_heap() {
    let mut alloc = new_allocator();
    let before = alloc.heap().heap_size();
    alloc.alloc(32).unwrap();
    assert!(alloc.heap().heap_size() > before);
  }
}
