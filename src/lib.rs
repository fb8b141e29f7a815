//! # fragalloc — a best-fit, coalescing, explicit free-list allocator
//!
//! This crate implements a general-purpose heap allocator over a single
//! contiguous, grow-only byte region. It is the block-level core of a
//! `malloc`/`free`/`realloc` trio: in-heap data layout, an address-ordered
//! explicit free list, best-fit placement with high-end splitting,
//! bidirectional coalescing on free, and an in-place-extending reallocator.
//!
//! ## Overview
//!
//! Unlike a bump allocator — which only ever grows a pointer forward and
//! can't reuse freed space — this allocator tracks every free block in a
//! doubly-linked, address-ordered list threaded through the free blocks
//! themselves, and searches that list for the best-fitting block before
//! falling back to growing the heap:
//!
//! ```text
//!   Explicit Free List Concept:
//!
//!   ┌────────────────────────────────────────────────────────────────────┐
//!   │                         HEAP MEMORY                                │
//!   │                                                                    │
//!   │  ┌──────┬────────┬──────┬────────┬──────┬─────────────────────┐   │
//!   │  │ head │ alloc  │ free │ alloc  │ free │      free (end)     │   │
//!   │  │ cell │ block  │ block│ block  │ block│        block        │   │
//!   │  └──────┴────────┴──┬───┴────────┴──┬───┴──────────┬──────────┘   │
//!   │                     └───────────────┴──────────────┘              │
//!   │                     doubly-linked, address-ordered                │
//!   └────────────────────────────────────────────────────────────────────┘
//!
//!   alloc(): best-fit search of the free list, split from the high end.
//!   free():  insert in address order, then coalesce with both neighbors.
//! ```
//!
//! ## Crate structure
//!
//! ```text
//!   fragalloc
//!   ├── align      - word-alignment macro shared by block/realloc math
//!   ├── offset     - HeapOffset, the byte-offset newtype the core is built on
//!   ├── error      - HeapError / AllocError (thiserror)
//!   ├── block      - block layout & header pointer arithmetic (component B)
//!   ├── free_list  - the address-ordered explicit free list (component C)
//!   ├── heap       - the HeapPrimitive seam: SbrkHeap and ArenaHeap
//!   └── allocator  - Allocator<H>: alloc/free/realloc/check (D, E, F, G)
//! ```
//!
//! ## Quick start
//!
//! ```rust
//! use fragalloc::{Allocator, ArenaHeap};
//!
//! let mut allocator = Allocator::new(ArenaHeap::new());
//!
//! let ptr = allocator.alloc(24).expect("alloc should succeed");
//! unsafe {
//!     (ptr as *mut u64).write(42);
//!     assert_eq!((ptr as *mut u64).read(), 42);
//! }
//! allocator.free(ptr);
//! assert!(allocator.check());
//! ```
//!
//! Production callers reach for [`SbrkHeap`] instead of [`ArenaHeap`] to
//! back the allocator with the real process break:
//!
//! ```rust,no_run
//! use fragalloc::{Allocator, SbrkHeap};
//!
//! let mut allocator = Allocator::new(SbrkHeap::new());
//! let ptr = allocator.alloc(64).unwrap();
//! allocator.free(ptr);
//! ```
//!
//! ## Safety
//!
//! This crate manages untyped memory directly. `alloc`/`free`/`realloc`
//! hand out and consume raw `*mut u8` pointers; using a pointer after it
//! has been freed or reallocated, double-freeing, or freeing a pointer this
//! allocator never returned are all undefined behavior, exactly as with the
//! C standard library's `malloc` family. The allocator itself holds no
//! locks and is not reentrant: do not call it from a signal handler or from
//! within one of its own callouts (see the crate's concurrency notes).
//!
//! ## Limitations
//!
//! - **Single-threaded only**: `Allocator<H>` is neither `Send` nor `Sync`.
//! - **No shrink-to-fit on realloc**: shrinking a block never splits it;
//!   the slack becomes internal fragmentation until the next free.
//! - **No defragmentation**: free blocks only merge with immediate
//!   neighbors; there is no compaction pass.

pub mod align;
mod allocator;
mod block;
mod error;
mod free_list;
mod heap;
mod offset;

pub use allocator::{Allocator, CheckReport, Violation};
pub use error::{AllocError, HeapError};
pub use heap::{ArenaHeap, HeapPrimitive, SbrkHeap};
pub use offset::HeapOffset;
