//! An ordered map implemented with a probabilistic skiplist.
//!
//! A skiplist maintains a linked hierarchy of subsequences: the lowest level
//! is a sorted linked list of every entry, and each higher level contains a
//! random subset of the level below it. Searching starts at the sparsest
//! level and descends, skipping over runs of smaller keys, which gives
//! expected logarithmic search, insertion, and deletion.
//!
//! Nodes live in a slab [`arena`](arena/index.html) and link to each other
//! through copyable slot indices, so the structure contains no unsafe code
//! and every node has exactly one owner.

extern crate rand;

mod entry;
pub mod arena;
pub mod skiplist;
