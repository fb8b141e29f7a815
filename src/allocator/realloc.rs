use super::Allocator;
use crate::block::{self, align_up, MIN_BLOCK_SIZE, WORD};
use crate::free_list;
use crate::heap::HeapPrimitive;
use crate::offset::HeapOffset;

impl<H: HeapPrimitive> Allocator<H> {
  /// Resizes a previous allocation to `size` payload bytes.
  ///
  /// Degenerate cases: `ptr == null` behaves as [`Allocator::alloc`]; `size
  /// == 0` with a non-null `ptr` frees it and returns `None` (the
  /// conventional modern `realloc(ptr, 0)` behavior, not the C source's
  /// "return the freed pointer").
  ///
  /// Otherwise: if the new size already fits in the current block, returns
  /// `ptr` unchanged with no header mutation at all. Failing that, tries to
  /// grow in place into a free right neighbor, then tries to grow by
  /// extending the heap if `ptr` is the last block, and only then falls
  /// back to allocate+copy+free.
  pub fn realloc(&mut self, ptr: *mut u8, size: usize) -> Option<*mut u8> {
    if ptr.is_null() {
      return self.alloc(size);
    }
    if size == 0 {
      self.free(ptr);
      return None;
    }

    let payload = self.heap.ptr_to_offset(ptr);
    let header = block::header_from_payload(payload);
    let cur = block::size_of_header(&self.heap, header);
    let new_block = align_up(size + WORD);

    if new_block <= cur {
      return Some(ptr);
    }

    self
      .grow_into_right_neighbor(header, cur, new_block)
      .or_else(|| self.grow_at_heap_end(header, cur, new_block))
      .or_else(|| self.realloc_fallback(ptr, cur, size))
  }

  /// Grows `header` in place by absorbing its free right neighbor, either
  /// shrinking that neighbor from its low end (if enough remains to stay a
  /// legal free block) or consuming it whole.
  fn grow_into_right_neighbor(&mut self, header: HeapOffset, cur: usize, new_block: usize) -> Option<*mut u8> {
    let next_header = block::end(header, cur);
    let heap_high = self.heap.heap_high()?;
    if next_header > heap_high {
      return None;
    }

    let (next_size, next_allocated) = block::read_header(&self.heap, next_header);
    if next_allocated {
      return None;
    }

    let needed_extra = new_block - cur;
    if next_size < needed_extra {
      return None;
    }

    let remaining = next_size - needed_extra;
    let grown_size = if remaining >= MIN_BLOCK_SIZE {
      self.shrink_neighbor_low_end(next_header, needed_extra, remaining);
      new_block
    } else {
      free_list::unlink(&mut self.heap, block::payload(next_header));
      cur + next_size
    };

    block::write_header(&mut self.heap, header, grown_size, true);
    log::trace!("realloc: grew header={} into right neighbor, new size={}", header.get(), grown_size);
    Some(self.payload_ptr(block::payload(header)))
  }

  /// Moves the free neighbor's header up by `needed_extra` bytes, shrinking
  /// it to `remaining` bytes, and migrates its free-list links to the new
  /// header position.
  fn shrink_neighbor_low_end(&mut self, next_header: HeapOffset, needed_extra: usize, remaining: usize) {
    let old_payload = block::payload(next_header);
    let prev = free_list::backward(&self.heap, old_payload);
    let next = free_list::forward(&self.heap, old_payload);

    let new_header = next_header + needed_extra;
    block::write_header(&mut self.heap, new_header, remaining, false);
    let new_payload = block::payload(new_header);

    free_list::insert_migrated(&mut self.heap, new_payload, prev, next);
  }

  /// Grows `header` by extending the heap, only valid if `header` is the
  /// final block (its end is exactly the top of heap).
  fn grow_at_heap_end(&mut self, header: HeapOffset, cur: usize, new_block: usize) -> Option<*mut u8> {
    let heap_high = self.heap.heap_high()?;
    if block::end(header, cur) != heap_high + 1 {
      return None;
    }

    self.heap.extend(new_block - cur).ok()?;
    block::write_header(&mut self.heap, header, new_block, true);
    log::trace!("realloc: grew header={} at heap end, new size={}", header.get(), new_block);
    Some(self.payload_ptr(block::payload(header)))
  }

  /// `alloc` + copy + `free`. Copies `min(cur - WORD, requested)` payload
  /// bytes — never the raw requested size, which would read past the old
  /// payload when growing.
  fn realloc_fallback(&mut self, old_ptr: *mut u8, cur: usize, requested: usize) -> Option<*mut u8> {
    let new_ptr = self.alloc(requested)?;
    let copy_len = (cur - WORD).min(requested);
    unsafe {
      std::ptr::copy_nonoverlapping(old_ptr, new_ptr, copy_len);
    }
    self.free(old_ptr);
    log::trace!("realloc: fell back to alloc+copy+free, copied {copy_len} bytes");
    Some(new_ptr)
  }
}
