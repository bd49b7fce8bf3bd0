//! A splay tree: every search rotates the node it ends on up to the root.
//!
//! There is no balance information. Recently accessed keys stay close to the
//! root, which gives amortized `O(lg N)` searches.

use crate::engine::Engine;
use crate::error::Error;
use crate::node::{Key, NodeId, NIL_KEY};
use crate::tree::SearchTree;

/// A self-adjusting search tree.
#[derive(Clone, Debug)]
pub struct SplayTree<V> {
    engine: Engine<V>,
}

impl<V> Default for SplayTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> SplayTree<V> {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self {
            engine: Engine::new(),
        }
    }

    /// Rotates `u` up to the root.
    ///
    /// ```text
    ///  zig:       p          u
    ///            /     ->     \
    ///           u              p
    ///
    ///  zig-zig:     g        u
    ///              /          \
    ///             p     ->     p
    ///            /              \
    ///           u                g
    ///
    ///  zig-zag:   g
    ///            /            u
    ///           p      ->    / \
    ///            \          p   g
    ///             u
    /// ```
    fn splay(&mut self, u: NodeId) {
        let engine = &mut self.engine;
        while let Some(p) = engine.parent(u) {
            let Some(g) = engine.parent(p) else {
                if engine.is_left_child(u) {
                    engine.rotate_right(p);
                } else {
                    engine.rotate_left(p);
                }
                continue;
            };

            match (engine.is_left_child(u), engine.is_left_child(p)) {
                (true, true) => {
                    engine.rotate_right(g);
                    engine.rotate_right(p);
                }
                (false, false) => {
                    engine.rotate_left(g);
                    engine.rotate_left(p);
                }
                (true, false) => {
                    engine.rotate_right(p);
                    engine.rotate_left(g);
                }
                (false, true) => {
                    engine.rotate_left(p);
                    engine.rotate_right(g);
                }
            }
        }
    }
}

impl<V> SearchTree<V> for SplayTree<V> {
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
        self.splay(n);
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
    fn search_moves_node_to_root() {
        let mut tree: SplayTree<Key> = SplayTree::new();
        tree.initialize_perfect_tree(4).unwrap();

        for key in [1, 15, 8, 3, 3, 12] {
            assert_eq!(tree.search(key), Some(&key));
            assert_eq!(tree.node(tree.root().unwrap()).key(), key);
            validate::assert_bst(&tree.engine);
        }
        assert_eq!(tree.keys(), (1..=15).collect::<Vec<_>>());
    }

    #[test]
    fn zig_zig_on_a_list() {
        let mut tree = SplayTree::new();
        for key in (1..=7).rev() {
            tree.insert(key, key).unwrap();
        }
        assert_eq!(tree.height(), 7);

        tree.search(1);

        // Splaying the bottom of a list roughly halves its depth.
        assert_eq!(tree.node(tree.root().unwrap()).key(), 1);
        assert_eq!(tree.height(), 5);
        assert_eq!(tree.stats().rotations, 6);
        validate::assert_bst(&tree.engine);
    }

    #[test]
    fn absent_key_splays_terminus() {
        let mut tree: SplayTree<Key> = SplayTree::new();
        tree.initialize_perfect_tree(3).unwrap();

        assert_eq!(tree.search(100), Some(&7));
        assert_eq!(tree.node(tree.root().unwrap()).key(), 7);
        validate::assert_bst(&tree.engine);
    }

    #[test]
    fn searching_root_does_nothing() {
        let mut tree: SplayTree<Key> = SplayTree::new();
        tree.initialize_perfect_tree(3).unwrap();

        assert_eq!(tree.search(4), Some(&4));
        assert_eq!(tree.stats().rotations, 0);
        assert_eq!(tree.stats().main_steps, 1);
    }
}

#[cfg(test)]
mod quicktests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::test::quick::Op;
    use crate::test::validate;

    quickcheck::quickcheck! {
        fn fuzz_multiple_operations_i8(ops: Vec<Op<i8, i8>>) -> bool {
            let mut tree = SplayTree::new();
            let mut map = BTreeMap::new();

            for op in &ops {
                match *op {
                    Op::Insert(k, v) => {
                        tree.insert(Key::from(k), v).unwrap();
                        map.insert(Key::from(k), v);
                    }
                    Op::Remove(k) => {
                        assert_eq!(tree.remove(Key::from(k)).unwrap(), map.remove(&Key::from(k)));
                    }
                    Op::Search(k) => {
                        let found = tree.search(Key::from(k)).copied();
                        if let Some(v) = map.get(&Key::from(k)) {
                            assert_eq!(found, Some(*v));
                        }
                        validate::assert_bst(&tree.engine);
                    }
                    Op::Iter => {
                        assert_eq!(tree.keys(), map.keys().copied().collect::<Vec<_>>());
                    }
                }
            }

            tree.keys() == map.keys().copied().collect::<Vec<_>>()
        }
    }
}
