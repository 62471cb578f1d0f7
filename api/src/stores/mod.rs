//! Concrete store implementations.
//!
//! The in-memory stores are the in-tree document store: each collection is
//! a map behind its own lock, and every document mutation runs as a closure
//! under that lock, which is what keeps like/unlike and sub-entity edits
//! atomic. A durable backend implements the same provider traits.

pub mod memory;

pub use memory::{MemoryPostRepository, MemoryProfileRepository, MemoryUserRepository};
