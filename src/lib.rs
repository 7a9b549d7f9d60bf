//! # Fibheap
//!
//! A Fibonacci heap: a forest of heap-ordered trees whose roots form a
//! circular list, giving O(1) amortized insert, find-min, merge and
//! decrease-key, and O(log n) amortized delete-min.
//!
//! Nodes are addressed through [`NodeHandle`]s returned by
//! [`FibHeap::insert`]. The [`analysis`] module recomputes the heap's
//! counters by traversal and checks the degree bound.

#![warn(missing_debug_implementations)]

pub mod analysis;
pub mod bounds;
mod error;
/// Module containing the heap implementation
pub mod heap;
pub mod node;

pub use error::HeapError;
pub use heap::FibHeap;
pub use node::{NodeHandle, NodeRef};
