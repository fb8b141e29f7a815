use thiserror::Error;

/// Failure of the underlying [`HeapPrimitive`](crate::heap::HeapPrimitive) to
/// grow its managed region.
///
/// This is the typed form of the POSIX `sbrk` `(void*)-1` sentinel. The
/// public `alloc`/`realloc` surface collapses it to `None`; it is kept
/// around as a real type for callers embedding the allocator who want the
/// reason, and for logging.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
  #[error("heap primitive refused to extend by {requested} bytes")]
  ExtensionFailed { requested: usize },
}

/// Internal allocator failure. Every public entry point collapses this to
/// `None`/`bool`; no variant of it is ever allowed to unwind across the
/// public API.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
  #[error(transparent)]
  Heap(#[from] HeapError),
}
