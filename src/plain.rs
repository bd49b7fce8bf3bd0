//! An ordinary binary search tree. Nothing is ever rebalanced, so inserting
//! keys in sorted order builds a linked list.

use crate::engine::Engine;
use crate::error::Error;
use crate::node::{Key, NodeId, NIL_KEY};
use crate::tree::SearchTree;

/// An unbalanced binary search tree.
#[derive(Clone, Debug)]
pub struct PlainTree<V> {
    engine: Engine<V>,
}

impl<V> Default for PlainTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> PlainTree<V> {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self {
            engine: Engine::new(),
        }
    }
}

impl<V> SearchTree<V> for PlainTree<V> {
    fn insert(&mut self, key: Key, value: V) -> Result<NodeId, Error> {
        if key == NIL_KEY {
            return Err(Error::ReservedKey(key));
        }
        Ok(self.engine.insert(key, value))
    }

    fn remove(&mut self, key: Key) -> Result<Option<V>, Error> {
        Ok(self.engine.remove(key))
    }

    fn search(&mut self, key: Key) -> Option<&V> {
        let n = self.engine.search_by_key(key)?;
        self.engine.node(n).value()
    }

    fn initialize_perfect_tree(&mut self, levels: u32) -> Result<(), Error>
    where
        V: From<Key>,
    {
        self.engine.build_perfect(levels, false, |_| {})
    }

    fn engine(&self) -> &Engine<V> {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::validate;

    #[test]
    fn sorted_inserts_make_a_list() {
        let mut tree = PlainTree::new();
        for key in 1..=10 {
            tree.insert(key, key).unwrap();
        }

        assert_eq!(tree.height(), 10);
        assert_eq!(tree.len(), 10);
        assert_eq!(tree.stats().rotations, 0);
        validate::assert_bst(&tree.engine);
    }

    #[test]
    fn search_absent_key_returns_last_visited() {
        let mut tree = PlainTree::new();
        assert_eq!(tree.search(3), None);

        for key in [10, 5, 15] {
            tree.insert(key, key * 2).unwrap();
        }
        let before = tree.stats().main_steps;

        assert_eq!(tree.search(5), Some(&10));
        assert_eq!(tree.search(7), Some(&10));
        assert_eq!(tree.search(100), Some(&30));
        assert_eq!(tree.stats().main_steps - before, 6);
    }

    #[test]
    fn reserved_key() {
        let mut tree = PlainTree::new();
        assert_eq!(tree.insert(NIL_KEY, 0), Err(Error::ReservedKey(NIL_KEY)));
        assert!(tree.is_empty());
    }

    #[test]
    fn perfect_tree_replaces_contents() {
        let mut tree = PlainTree::new();
        tree.insert(100, 100).unwrap();
        tree.initialize_perfect_tree(3).unwrap();

        assert_eq!(tree.keys(), (1..=7).collect::<Vec<_>>());
        assert_eq!(tree.search(6), Some(&6));
        assert_eq!(tree.remove(4), Ok(Some(4)));
        validate::assert_bst(&tree.engine);
    }
}
