//! The interface every tree variant exposes.

use crate::engine::Engine;
use crate::error::Error;
use crate::node::{Key, Node, NodeId};
use crate::stats::TreeStats;

/// A key-indexed search tree.
///
/// The variants differ in what `search` does to the shape of the tree and in
/// which updates they accept. All of them can be seeded with a perfect tree.
pub trait SearchTree<V> {
    /// Inserts `value` under `key`, replacing the payload if the key is
    /// already present, and returns the node now holding it.
    fn insert(&mut self, key: Key, value: V) -> Result<NodeId, Error>;

    /// Removes `key` and returns its payload, or `None` if it isn't present.
    fn remove(&mut self, key: Key) -> Result<Option<V>, Error>;

    /// Looks `key` up, reorganizing the tree if the variant does so on access.
    ///
    /// Returns the payload of the matching node or, when the key is absent, of
    /// the real node where the search ended. `None` only for an empty tree.
    fn search(&mut self, key: Key) -> Option<&V>;

    /// Replaces the contents with a perfect tree of `levels` levels holding the
    /// keys `1..2^levels`. Each payload is made from its key.
    fn initialize_perfect_tree(&mut self, levels: u32) -> Result<(), Error>
    where
        V: From<Key>;

    /// The engine holding the nodes.
    fn engine(&self) -> &Engine<V>;

    /// The root of the whole tree.
    fn root(&self) -> Option<NodeId> {
        self.engine().root()
    }

    /// The node stored at `id`.
    fn node(&self, id: NodeId) -> &Node<V> {
        self.engine().node(id)
    }

    /// A snapshot of the counters.
    fn stats(&self) -> TreeStats {
        self.engine().stats()
    }

    /// All keys in increasing order.
    fn keys(&self) -> Vec<Key> {
        self.engine().keys()
    }

    /// The number of keys.
    fn len(&self) -> usize {
        self.engine().len()
    }

    /// Whether the tree holds no keys.
    fn is_empty(&self) -> bool {
        self.engine().is_empty()
    }

    /// The number of levels of the tree.
    fn height(&self) -> usize {
        self.engine().height()
    }
}
