use super::Allocator;
use crate::block;
use crate::free_list;
use crate::heap::HeapPrimitive;
use crate::offset::HeapOffset;

impl<H: HeapPrimitive> Allocator<H> {
  /// Frees a payload pointer previously returned by [`Allocator::alloc`] or
  /// [`Allocator::realloc`].
  ///
  /// Inserts the block back into the free list in address order, then
  /// coalesces with its immediate right neighbor and then its immediate
  /// left neighbor if either is itself free. Right before left, so the
  /// left-neighbor check below sees the already-merged block's true end.
  ///
  /// `ptr` must be non-null and must have been returned by this allocator
  /// and not already freed; violating either is undefined behavior, and
  /// this does not defend against them beyond the null check.
  pub fn free(&mut self, ptr: *mut u8) {
    if ptr.is_null() {
      return;
    }

    let payload = self.heap.ptr_to_offset(ptr);
    let header = block::header_from_payload(payload);
    let size = block::size_of_header(&self.heap, header);
    block::write_header(&mut self.heap, header, size, false);

    let pivot = free_list::find_insertion_point(&self.heap, payload);
    free_list::insert_before(&mut self.heap, payload, pivot);
    log::trace!("free: header={} size={}", header.get(), size);

    self.coalesce_right(header);
    self.coalesce_left(header);
  }

  /// If the block immediately after `header` is free, absorb it: sum sizes
  /// into `header`'s header and unlink the successor.
  fn coalesce_right(&mut self, header: HeapOffset) {
    let size = block::size_of_header(&self.heap, header);
    let next_header = block::end(header, size);

    let Some(heap_high) = self.heap.heap_high() else { return };
    if next_header > heap_high {
      return;
    }

    let (next_size, next_allocated) = block::read_header(&self.heap, next_header);
    if next_allocated {
      return;
    }

    free_list::unlink(&mut self.heap, block::payload(next_header));
    block::write_header(&mut self.heap, header, size + next_size, false);
    log::trace!("coalesce_right: absorbed header={} into header={}", next_header.get(), header.get());
  }

  /// If the block immediately before `header` is free, absorb `header` into
  /// it: sum sizes into the predecessor's header and unlink `header`.
  ///
  /// The predecessor is found via the free list's own backward link from
  /// `header`'s node: since the list is address-ordered, that is the
  /// nearest free block with a smaller address. It's only an *adjacent*
  /// neighbor if its end equals `header` exactly, which is what's checked
  /// before merging.
  fn coalesce_left(&mut self, header: HeapOffset) {
    let payload = block::payload(header);
    let Some(prev_node) = free_list::backward(&self.heap, payload) else { return };
    let prev_header = block::header_from_payload(prev_node);
    let (prev_size, prev_allocated) = block::read_header(&self.heap, prev_header);
    if prev_allocated || block::end(prev_header, prev_size) != header {
      return;
    }

    let size = block::size_of_header(&self.heap, header);
    free_list::unlink(&mut self.heap, payload);
    block::write_header(&mut self.heap, prev_header, prev_size + size, false);
    log::trace!("coalesce_left: absorbed header={} into header={}", header.get(), prev_header.get());
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
  fn free_null_is_a_no_op() {
    let mut alloc = new_allocator();
    alloc.free(std::ptr::null_mut());
    assert_eq!(alloc.heap().heap_size(), 0);
  }

  #[test]
  fn single_alloc_free_cycle_leaves_one_free_block() {
    let mut alloc = new_allocator();
    let p1 = alloc.alloc(24).unwrap();
    assert!(alloc.check());
    alloc.free(p1);
    assert!(alloc.check());

    let header = alloc.block_region_start();
    let (_, allocated) = block::read_header(alloc.heap(), header);
    assert!(!allocated);
    assert!(free_list::contains(alloc.heap(), header));
  }

  #[test]
  fn coalesces_both_neighbors_into_one_block() {
    let mut alloc = new_allocator();
    let a = alloc.alloc(32).unwrap();
    let b = alloc.alloc(32).unwrap();
    let c = alloc.alloc(32).unwrap();

    alloc.free(a);
    alloc.free(c);
    alloc.free(b);

    assert!(alloc.check());
    let header = alloc.block_region_start();
    assert_eq!(free_list::head(alloc.heap()), Some(block::payload(header)));
    assert_eq!(free_list::forward(alloc.heap(), block::payload(header)), None);
  }

  #[test]
  fn freeing_a_middle_block_only_coalesces_with_free_neighbors() {
    let mut alloc = new_allocator();
    let a = alloc.alloc(32).unwrap();
    let b = alloc.alloc(32).unwrap();
    let _c = alloc.alloc(32).unwrap();

    alloc.free(b);
    assert!(alloc.check());
    // a and c remain allocated, so b's block stays a singleton free node.
    let b_header = block::header_from_payload(alloc.heap().ptr_to_offset(b));
    assert!(free_list::contains(alloc.heap(), b_header));
    let _ = a;
  }
}
