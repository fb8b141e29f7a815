//! Exercises `SbrkHeap` against the real process break. Kept to a single
//! test function deliberately: `SbrkHeap` assumes nothing else calls `sbrk`
//! between its own `extend` calls, so unlike the `ArenaHeap`-backed
//! scenario suite this one can't be split across parallel test threads
//! without risking another test's allocations landing in the gap.

use fragalloc::{Allocator, SbrkHeap};

#[test]
fn sbrk_backed_allocator_round_trips_through_the_real_break() {
  // `RUST_LOG=trace cargo test --test sbrk_smoke -- --nocapture` surfaces
  // every alloc/free/coalesce decision logged along this path.
  let _ = env_logger::try_init();

  let mut alloc = Allocator::new(SbrkHeap::new());

  let a = alloc.alloc(64).expect("alloc should succeed against the real heap");
  unsafe { std::ptr::write_bytes(a, 0x42, 64) };
  assert!(alloc.check());

  let b = alloc.alloc(32).expect("second alloc should succeed");
  assert_ne!(a, b);
  assert!(alloc.check());

  alloc.free(a);
  assert!(alloc.check());

  // Reusing freed space should not require extending the break again.
  let brk_before_reuse = unsafe { libc::sbrk(0) };
  let c = alloc.alloc(64).expect("third alloc should reuse the freed block");
  let brk_after_reuse = unsafe { libc::sbrk(0) };
  assert_eq!(c, a, "best-fit should reuse the exact-size freed block");
  assert_eq!(brk_before_reuse, brk_after_reuse, "reusing a free block must not extend the heap");

  let r = alloc.realloc(b, 1024).expect("realloc should succeed against the real heap");
  assert!(alloc.check());
  alloc.free(r);
  assert!(alloc.check());
}
