//! The consistency checker (component G).
//!
//! Read-only: walks the free list once and the block region once, checking
//! every data-model invariant that isn't already enforced by construction.
//! Findings accumulate into a [`CheckReport`] rather than bailing out on
//! the first one, so a single `check()` call tells the whole story: every
//! code path here produces a complete report, never an early return with
//! nothing to show for it.

use std::collections::HashSet;

use super::Allocator;
use crate::block::{self, MIN_BLOCK_SIZE, WORD};
use crate::free_list;
use crate::heap::HeapPrimitive;
use crate::offset::HeapOffset;

/// A single invariant violation, named after the data-model invariant it
/// violates. Carries enough detail to log a useful `warn!` line without
/// re-walking the heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
  /// Invariant 1/7: a block's size is not a positive multiple of `WORD`.
  MisalignedSize { header: HeapOffset, size: usize },
  /// Invariant 1: a block is smaller than the minimum legal block size.
  UndersizedBlock { header: HeapOffset, size: usize },
  /// Invariant 2: summing block sizes from the first block did not land
  /// exactly on `heap_high() + 1`.
  HeapSizeMismatch { expected: usize, summed: usize },
  /// Invariant 3: a free block is not reachable by walking the free list.
  FreeBlockNotInList { header: HeapOffset },
  /// Invariant 3: an allocated block's header address is reachable in the
  /// free list even though its flag says otherwise.
  AllocatedBlockInList { header: HeapOffset },
  /// Invariant 4: the free list is not strictly ascending by address.
  ListNotAscending { prev: HeapOffset, next: HeapOffset },
  /// Invariant 5: a node's back-link does not invert its predecessor's
  /// forward-link (or an endpoint's link isn't `null`).
  BackLinkMismatch { node: HeapOffset, expected_prev: Option<HeapOffset>, actual_prev: Option<HeapOffset> },
  /// Invariant 6: two free blocks sit immediately next to each other.
  AdjacentFreeBlocks { left: HeapOffset, right: HeapOffset },
}

/// The outcome of [`Allocator::check`]'s internal walk. The public surface
/// collapses this to `ok`; the full report exists so a failure can be
/// logged in detail instead of just `false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
  pub ok: bool,
  pub violations: Vec<Violation>,
}

impl CheckReport {
  fn from_violations(violations: Vec<Violation>) -> Self {
    Self { ok: violations.is_empty(), violations }
  }
}

impl<H: HeapPrimitive> Allocator<H> {
  /// Runs the consistency checker and collapses the result to a boolean,
  /// logging each violation at `warn!` first. Side-effect free beyond that
  /// logging.
  pub fn check(&self) -> bool {
    let report = self.check_report();
    for violation in &report.violations {
      log::warn!("consistency check failed: {violation:?}");
    }
    report.ok
  }

  /// The full [`CheckReport`], for callers that want the detail rather
  /// than the collapsed boolean (e.g. the scenario test suite).
  pub fn check_report(&self) -> CheckReport {
    if self.heap.heap_size() == 0 {
      return CheckReport::from_violations(Vec::new());
    }

    let mut violations = self.check_free_list();
    violations.extend(self.check_block_region());
    CheckReport::from_violations(violations)
  }

  /// Invariants 1, 4, 5: walks the free list once, checking block size
  /// legality, strict address ordering, and that every back-link inverts
  /// its neighbor's forward-link.
  fn check_free_list(&self) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut prev: Option<HeapOffset> = None;
    let mut cursor = free_list::head(&self.heap);

    while let Some(node) = cursor {
      let header = block::header_from_payload(node);
      let size = block::size_of_header(&self.heap, header);
      check_block_size(header, size, &mut violations);

      if let Some(prev_node) = prev {
        if node <= prev_node {
          violations.push(Violation::ListNotAscending { prev: prev_node, next: node });
        }
      }

      let actual_prev = free_list::backward(&self.heap, node);
      if actual_prev != prev {
        violations.push(Violation::BackLinkMismatch { node, expected_prev: prev, actual_prev });
      }

      prev = Some(node);
      cursor = free_list::forward(&self.heap, node);
    }

    violations
  }

  /// Invariants 1, 2, 3, 6: walks the block region once from the first
  /// block to `heap_high() + 1`, checking size legality, that the walk
  /// lands exactly on the heap boundary, that free/allocated flags agree
  /// with free-list membership, and that no two free blocks are adjacent.
  fn check_block_region(&self) -> Vec<Violation> {
    let mut violations = Vec::new();
    let free_nodes: HashSet<HeapOffset> = free_list_nodes(&self.heap);

    let mut header = self.block_region_start();
    let Some(heap_high) = self.heap.heap_high() else { return violations };
    let boundary = heap_high + 1;

    let mut summed = 0usize;
    let mut prev_was_free: Option<HeapOffset> = None;

    while header < boundary {
      let (size, allocated) = block::read_header(&self.heap, header);
      check_block_size(header, size, &mut violations);

      let in_list = free_nodes.contains(&block::payload(header));
      match (allocated, in_list) {
        (false, false) => violations.push(Violation::FreeBlockNotInList { header }),
        (true, true) => violations.push(Violation::AllocatedBlockInList { header }),
        _ => {}
      }

      if !allocated {
        if let Some(left) = prev_was_free {
          violations.push(Violation::AdjacentFreeBlocks { left, right: header });
        }
        prev_was_free = Some(header);
      } else {
        prev_was_free = None;
      }

      summed += size;
      header = block::end(header, size);
    }

    let expected = (boundary - self.block_region_start()) as usize;
    if summed != expected {
      violations.push(Violation::HeapSizeMismatch { expected, summed });
    }

    violations
  }
}

fn check_block_size(header: HeapOffset, size: usize, violations: &mut Vec<Violation>) {
  if size == 0 || size % WORD != 0 {
    violations.push(Violation::MisalignedSize { header, size });
  } else if size < MIN_BLOCK_SIZE {
    violations.push(Violation::UndersizedBlock { header, size });
  }
}

fn free_list_nodes<H: HeapPrimitive>(heap: &H) -> HashSet<HeapOffset> {
  let mut nodes = HashSet::new();
  let mut cursor = free_list::head(heap);
  while let Some(node) = cursor {
    nodes.insert(node);
    cursor = free_list::forward(heap, node);
  }
  nodes
}
