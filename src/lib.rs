//! This crate implements tango trees next to the classic Binary Search Trees
//! (BSTs) they are usually compared with, and counts the work each one does.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree stores records under ordered keys. For every `Node`,
//! all keys in its left subtree are smaller than its own and all keys in its
//! right subtree are larger. Searching takes `O(height)`, so most variants
//! spend their effort keeping the height down or keeping frequently accessed
//! keys near the root:
//!
//! - [`PlainTree`] does nothing of the sort.
//! - [`RedBlackTree`] colors its nodes so that no path is more than twice as
//!   long as any other, which bounds the height by `2 lg N`.
//! - [`SplayTree`] rotates every node it finds up to the root.
//!
//! ## Tango trees
//!
//! A tango tree is `O(lg lg N)`-competitive: on any access sequence, it does at
//! most `O(lg lg N)` times the work of the best offline BST for that sequence.
//! It is built once as a perfect tree and then only searched. See the
//! [`tango`] module for how it works. [`RedBlackTango`] keeps its auxiliary
//! trees balanced, as the analysis requires; [`UnbalancedTango`] does not, for
//! comparison.
//!
//! ## Counting work
//!
//! Every tree counts the rotations it performs, the nodes its searches visit
//! and the nodes its other walks visit. [`harness`] replays search sequences
//! against perfect trees and reports those counters.
//!
//! ```
//! use tango::{RedBlackTango, SearchTree};
//!
//! let mut tree: RedBlackTango<i32> = RedBlackTango::new();
//! tree.initialize_perfect_tree(4).unwrap();
//!
//! assert_eq!(tree.search(11), Some(&11));
//! assert_eq!(tree.keys(), (1..16).collect::<Vec<_>>());
//! assert!(tree.insert(16, 16).is_err());
//! ```
//!
//! ## Structure
//!
//! All variants share one [`Engine`](engine::Engine): an arena of nodes
//! addressed by [`NodeId`], with the rotations, walks and bookkeeping the
//! variants are built from. The same node type serves every variant, so the
//! engine can be inspected the same way whatever tree owns it.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod engine;
pub mod error;
pub mod harness;
pub mod node;
pub mod plain;
pub mod red_black;
pub mod splay;
pub mod stats;
pub mod tango;
pub mod tree;

#[cfg(test)]
mod test;

pub use error::Error;
pub use node::{Color, Key, Node, NodeId, NIL_KEY};
pub use plain::PlainTree;
pub use red_black::RedBlackTree;
pub use splay::SplayTree;
pub use stats::TreeStats;
pub use tango::{AuxStrategy, Balanced, RedBlackTango, TangoTree, Unbalanced, UnbalancedTango};
pub use tree::SearchTree;
