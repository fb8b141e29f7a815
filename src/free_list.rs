//! The address-ordered explicit free list (component C).
//!
//! A doubly-linked list threaded through the two link words of each free
//! block, rooted at a fixed head cell at offset 0 of the heap. Deliberately
//! indexes nodes by their *forward-link address* (i.e. [`block::payload`]
//! of the header), not the header address: nearly every operation here
//! touches the links first, so treating the link address as the node's
//! identity saves a subtraction on every traversal step. Ordering
//! comparisons happen in that same address space, which is equivalent to
//! ordering by header address since the `WORD` offset between them is
//! constant.
//!
//! `null` is represented as `Option::None` throughout, never a reserved
//! sentinel value, since the core is built on [`HeapOffset`] rather than
//! raw pointers.

use crate::block::{self, LINK};
use crate::heap::HeapPrimitive;
use crate::offset::HeapOffset;

const HEAD_CELL: HeapOffset = HeapOffset::new(0);

fn decode(word: usize) -> Option<HeapOffset> {
  if word == 0 { None } else { Some(HeapOffset::new(word)) }
}

fn encode(link: Option<HeapOffset>) -> usize {
  link.map_or(0, HeapOffset::get)
}

/// The first node in the list, or `None` if it is empty.
pub fn head<H: HeapPrimitive>(heap: &H) -> Option<HeapOffset> {
  decode(heap.read_word(HEAD_CELL))
}

/// Overwrites the head cell directly. Only the list operations below and
/// allocator initialization should call this.
pub fn set_head<H: HeapPrimitive>(heap: &mut H, node: Option<HeapOffset>) {
  heap.write_word(HEAD_CELL, encode(node));
}

/// The node following `node`, or `None` if `node` is last.
pub fn forward<H: HeapPrimitive>(heap: &H, node: HeapOffset) -> Option<HeapOffset> {
  decode(heap.read_word(node))
}

fn set_forward<H: HeapPrimitive>(heap: &mut H, node: HeapOffset, value: Option<HeapOffset>) {
  heap.write_word(node, encode(value));
}

/// The node preceding `node`, or `None` if `node` is first.
pub fn backward<H: HeapPrimitive>(heap: &H, node: HeapOffset) -> Option<HeapOffset> {
  decode(heap.read_word(node + LINK))
}

fn set_backward<H: HeapPrimitive>(heap: &mut H, node: HeapOffset, value: Option<HeapOffset>) {
  heap.write_word(node + LINK, encode(value));
}

/// The first node with address strictly greater than `addr`, or `None` if
/// every node's address is `<= addr` (including the empty-list case).
pub fn find_insertion_point<H: HeapPrimitive>(heap: &H, addr: HeapOffset) -> Option<HeapOffset> {
  let mut cursor = head(heap);
  while let Some(node) = cursor {
    if node > addr {
      return Some(node);
    }
    cursor = forward(heap, node);
  }
  None
}

/// Splices `node` into the list immediately before `pivot`, or at the tail
/// if `pivot` is `None`. `node`'s own links are fully overwritten; the
/// caller need not initialize them first.
pub fn insert_before<H: HeapPrimitive>(heap: &mut H, node: HeapOffset, pivot: Option<HeapOffset>) {
  match pivot {
    Some(pivot_node) => {
      let prior_back = backward(heap, pivot_node);
      set_backward(heap, pivot_node, Some(node));
      set_forward(heap, node, Some(pivot_node));
      set_backward(heap, node, prior_back);
      match prior_back {
        Some(prior_node) => set_forward(heap, prior_node, Some(node)),
        None => set_head(heap, Some(node)),
      }
    }
    None => match tail(heap) {
      Some(last) => {
        set_forward(heap, last, Some(node));
        set_backward(heap, node, Some(last));
        set_forward(heap, node, None);
      }
      None => {
        set_head(heap, Some(node));
        set_forward(heap, node, None);
        set_backward(heap, node, None);
      }
    },
  }
}

/// Removes `node` from the list, patching its neighbors (and the head cell,
/// if `node` was first).
pub fn unlink<H: HeapPrimitive>(heap: &mut H, node: HeapOffset) {
  let prev = backward(heap, node);
  let next = forward(heap, node);

  match prev {
    Some(prev_node) => set_forward(heap, prev_node, next),
    None => set_head(heap, next),
  }
  if let Some(next_node) = next {
    set_backward(heap, next_node, prev);
  }
}

/// Relinks a node that has just moved to a new address (its old neighbors
/// already read out as `prev`/`next`) without touching list order.
///
/// Used when [`Allocator::realloc`](crate::allocator::Allocator::realloc)
/// shrinks a free neighbor from its low end: the node's identity (its
/// forward-link address) changes with the header move even though its
/// place in the list does not.
pub fn insert_migrated<H: HeapPrimitive>(heap: &mut H, node: HeapOffset, prev: Option<HeapOffset>, next: Option<HeapOffset>) {
  set_forward(heap, node, next);
  set_backward(heap, node, prev);
  match prev {
    Some(prev_node) => set_forward(heap, prev_node, Some(node)),
    None => set_head(heap, Some(node)),
  }
  if let Some(next_node) = next {
    set_backward(heap, next_node, Some(node));
  }
}

fn tail<H: HeapPrimitive>(heap: &H) -> Option<HeapOffset> {
  let mut cursor = head(heap)?;
  while let Some(next) = forward(heap, cursor) {
    cursor = next;
  }
  Some(cursor)
}

/// Whether `header`'s list identity (its payload address) is reachable by
/// walking from the head. `O(n)`; used only by the consistency checker.
pub fn contains<H: HeapPrimitive>(heap: &H, header: HeapOffset) -> bool {
  let target = block::payload(header);
  let mut cursor = head(heap);
  while let Some(node) = cursor {
    if node == target {
      return true;
    }
    cursor = forward(heap, node);
  }
  false
}
