//! Block layout and pointer arithmetic (component B).
//!
//! A block is `[ header | payload... ]` with no footer. The header's low
//! bit is the allocated flag; the remaining bits hold the total block size,
//! header included. A free block stores its forward and backward free-list
//! links in the first two payload words — see [`crate::free_list`].
//!
//! Every function here is a pure translation between canonical positions in
//! a block (header, payload, backlink, end) plus the header's flag/size
//! encoding. Nothing here owns any state; callers pass in the
//! [`HeapPrimitive`] to read and write through.

use std::mem;

use crate::align;
use crate::heap::HeapPrimitive;
use crate::offset::HeapOffset;

/// The machine word size. All block sizes are multiples of this.
pub const WORD: usize = mem::size_of::<usize>();

/// Width of a free-list link, equal to `WORD` on every target this crate
/// supports (both are pointer-width).
pub const LINK: usize = mem::size_of::<usize>();

/// Smallest legal block size: header plus room for both free-list links.
pub const MIN_BLOCK_SIZE: usize = WORD + 2 * LINK;

const ALLOCATED_FLAG: usize = 1;

/// Rounds `value` up to the next multiple of the machine word size.
pub fn align_up(value: usize) -> usize {
  align!(value)
}

/// The payload address of a block, given its header address. Also the
/// address at which a free block's forward link lives — see the free-list
/// module-level docs for why the list indexes nodes by this address rather
/// than by header address.
pub fn payload(header: HeapOffset) -> HeapOffset {
  header + WORD
}

/// The address of a free block's backward link.
pub fn backlink(header: HeapOffset) -> HeapOffset {
  header + WORD + LINK
}

/// The header address one past this block, i.e. of its heap-order
/// successor (or one-past-heap-end, if this is the last block).
pub fn end(header: HeapOffset, size: usize) -> HeapOffset {
  header + size
}

/// Recovers a block's header address from its payload address.
pub fn header_from_payload(payload: HeapOffset) -> HeapOffset {
  payload - WORD
}

/// Reads a block's header, returning `(size, is_allocated)`.
pub fn read_header<H: HeapPrimitive>(heap: &H, header: HeapOffset) -> (usize, bool) {
  let word = heap.read_word(header);
  (word & !ALLOCATED_FLAG, word & ALLOCATED_FLAG == ALLOCATED_FLAG)
}

/// Just the size half of [`read_header`], for call sites that don't need
/// the allocated flag.
pub fn size_of_header<H: HeapPrimitive>(heap: &H, header: HeapOffset) -> usize {
  read_header(heap, header).0
}

/// Writes a block's header, encoding `size` and the allocated flag into a
/// single word.
///
/// `size` must already be word-aligned; the low bit it would otherwise
/// occupy is reserved for the flag.
pub fn write_header<H: HeapPrimitive>(heap: &mut H, header: HeapOffset, size: usize, allocated: bool) {
  debug_assert_eq!(size & (WORD - 1), 0, "block size must be a multiple of the word size");
  let flag = if allocated { ALLOCATED_FLAG } else { 0 };
  heap.write_word(header, size | flag);
}
