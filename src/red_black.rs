//! A red-black tree, plus the red-black bookkeeping and fix-up ladders the
//! balanced preferred-path strategy reuses on each auxiliary tree.
//!
//! A red-black tree is a binary search tree where each node carries a color
//! and the following invariants hold:
//!
//! 1. The root is black.
//! 2. A red node has no red children.
//! 3. Every path from a node down to a nil leaf crosses the same number of
//!    black nodes (its black height).
//!
//! Together these keep the height within `2 lg(N + 1)`.
//!
//! Every real node of a [`RedBlackTree`] has two children, which may be nil
//! sentinels. The fix-up code below works on any red-black scope: the
//! standalone tree, or one auxiliary tree bounded by marked nodes.

use crate::engine::Engine;
use crate::error::Error;
use crate::node::{Color, Key, NodeId, NIL_KEY};
use crate::tree::SearchTree;

impl<V> Engine<V> {
    /// Recomputes the black height of `n` from its children in the same scope.
    /// Children outside the scope count as black leaves.
    pub(crate) fn update_black_height(&mut self, n: NodeId) {
        if self.is_nil(n) {
            debug_assert_eq!(self.node(n).black_height, 1);
            return;
        }

        let lh = match self.left(n) {
            Some(l) if self.has_left(n) => self.node(l).black_height,
            _ => 1,
        };
        let rh = match self.right(n) {
            Some(r) if self.has_right(n) => self.node(r).black_height,
            _ => 1,
        };
        // The fix-up ladders call this while a deficit is still being repaired,
        // so the two sides may differ for a moment.
        let black = u32::from(self.node(n).color == Color::Black);
        self.node_mut(n).black_height = lh.max(rh) + black;
    }

    /// Recomputes black heights from `n` up to the root of its scope.
    pub(crate) fn update_black_height_path(&mut self, mut n: NodeId) {
        self.update_black_height(n);
        while !self.is_aux_root(n) {
            n = self.parent(n).expect("Non-root => parent");
            self.update_black_height(n);
        }
    }

    /// Restores the red-black invariants after the red node `n` has been linked in.
    pub(crate) fn insert_fixup(&mut self, mut n: NodeId) {
        loop {
            if self.is_aux_root(n) {
                self.set_color(n, Color::Black);
                self.update_black_height(n);
                return;
            }

            self.update_black_height(n);
            let p = self.parent(n).expect("Non-root => parent");
            if self.is_black(Some(p)) {
                self.update_black_height(p);
                return;
            }

            // A red parent is never a scope root, so the grandparent exists.
            let g = self.parent(p).expect("Red parent => grandparent");
            match self.sibling(p) {
                Some(u) if self.is_red(Some(u)) => {
                    self.set_color(p, Color::Black);
                    self.update_black_height(p);
                    self.set_color(u, Color::Black);
                    self.update_black_height(u);
                    self.set_color(g, Color::Red);
                    self.update_black_height(g);
                    n = g;
                }
                _ => {
                    self.insert_fixup_rotate(n);
                    return;
                }
            }
        }
    }

    /// The black-uncle cases: turn an inner grandchild into an outer one, then
    /// rotate the grandparent away from it.
    fn insert_fixup_rotate(&mut self, mut n: NodeId) {
        let p = self.parent(n).expect("Red parent => parent");
        if self.is_left_child(p) && self.is_right_child(n) {
            self.rotate_left(p);
            n = p;
        } else if self.is_right_child(p) && self.is_left_child(n) {
            self.rotate_right(p);
            n = p;
        }

        let p = self.parent(n).expect("Outer grandchild => parent");
        let g = self.parent(p).expect("Outer grandchild => grandparent");
        self.set_color(p, Color::Black);
        self.set_color(g, Color::Red);
        if self.is_left_child(p) {
            self.rotate_right(g);
        } else {
            self.rotate_left(g);
        }
        self.update_black_height(g);
        self.update_black_height(p);
    }

    /// Restores the red-black invariants when `n` sits one black node short of
    /// its sibling after a black node was removed above it.
    pub(crate) fn delete_fixup(&mut self, mut n: NodeId) {
        loop {
            if self.is_aux_root(n) {
                return;
            }
            let p = self.parent(n).expect("Non-root => parent");

            let s = self.sibling(n).expect("Black deficit => sibling");
            if self.is_red(Some(s)) {
                debug_assert!(self.is_black(Some(p)));
                self.set_color(p, Color::Red);
                self.set_color(s, Color::Black);
                if self.is_left_child(n) {
                    self.rotate_left(p);
                } else {
                    self.rotate_right(p);
                }
            }

            let s = self.sibling(n).expect("Black deficit => sibling");
            let (sl, sr) = (self.left(s), self.right(s));
            if self.is_black(sl) && self.is_black(sr) {
                self.set_color(s, Color::Red);
                self.update_black_height(s);
                if self.is_black(Some(p)) {
                    // The deficit moves up a level.
                    n = p;
                    continue;
                }
                self.set_color(p, Color::Black);
                self.update_black_height(p);
                return;
            }

            self.delete_fixup_rotate(n);
            return;
        }
    }

    /// The cases where the sibling has a red child: make it the outer child,
    /// then rotate the parent toward `n`.
    fn delete_fixup_rotate(&mut self, n: NodeId) {
        let s = self.sibling(n).expect("Black deficit => sibling");
        let (sl, sr) = (self.left(s), self.right(s));
        if self.is_left_child(s) {
            if self.is_black(sl) {
                let sr = sr.expect("Red nephew => right child");
                self.set_color(s, Color::Red);
                self.set_color(sr, Color::Black);
                self.update_black_height(sr);
                self.rotate_left(s);
            }
        } else if self.is_black(sr) {
            let sl = sl.expect("Red nephew => left child");
            self.set_color(s, Color::Red);
            self.set_color(sl, Color::Black);
            self.update_black_height(sl);
            self.rotate_right(s);
        }

        let p = self.parent(n).expect("Black deficit => parent");
        let s = self.sibling(n).expect("Black deficit => sibling");
        let parent_color = self.node(p).color;
        self.set_color(s, parent_color);
        self.set_color(p, Color::Black);
        if self.is_left_child(s) {
            let sl = self.left(s).expect("Red nephew => left child");
            self.set_color(sl, Color::Black);
            self.update_black_height(sl);
            self.rotate_right(p);
        } else {
            let sr = self.right(s).expect("Red nephew => right child");
            self.set_color(sr, Color::Black);
            self.update_black_height(sr);
            self.rotate_left(p);
        }
    }
}

/// A balanced search tree with nil sentinels at every leaf.
#[derive(Clone, Debug)]
pub struct RedBlackTree<V> {
    engine: Engine<V>,
}

impl<V> Default for RedBlackTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> RedBlackTree<V> {
    /// Creates an empty tree, which is a single nil sentinel.
    pub fn new() -> Self {
        let mut engine = Engine::new();
        engine.root = Some(engine.alloc_nil(None));
        Self { engine }
    }
}

impl<V> SearchTree<V> for RedBlackTree<V> {
    fn insert(&mut self, key: Key, value: V) -> Result<NodeId, Error> {
        if key == NIL_KEY {
            return Err(Error::ReservedKey(key));
        }

        let n = self.engine.search_by_key(key).expect("Red-black tree => nil root");
        if !self.engine.is_nil(n) {
            self.engine.node_mut(n).value = Some(value);
            return Ok(n);
        }

        // The nil the search ended on becomes the new node.
        let left = self.engine.alloc_nil(Some(n));
        let right = self.engine.alloc_nil(Some(n));
        let node = self.engine.node_mut(n);
        node.key = key;
        node.value = Some(value);
        node.color = Color::Red;
        node.left = Some(left);
        node.right = Some(right);
        node.size = 3;
        self.engine.update_size_path(self.engine.parent(n));

        if self.engine.root == Some(n) {
            self.engine.set_color(n, Color::Black);
        } else {
            self.engine.insert_fixup(n);
        }
        self.engine.update_black_height_path(n);

        Ok(n)
    }

    fn remove(&mut self, key: Key) -> Result<Option<V>, Error> {
        let engine = &mut self.engine;
        let Some(d) = engine.search_by_key(key).filter(|&d| !engine.is_nil(d)) else {
            return Ok(None);
        };

        let dl = engine.left(d).expect("Red-black node => left child");
        let dr = engine.right(d).expect("Red-black node => right child");

        // `removed` is the node that leaves the tree and `r` the one taking its place.
        let (removed, r, value) = match (engine.is_nil(dl), engine.is_nil(dr)) {
            (true, true) => {
                engine.node_mut(dl).parent = engine.parent(d);
                if engine.root == Some(d) {
                    engine.root = Some(dl);
                } else {
                    engine.set_parent_reference(d, Some(dl));
                }
                engine.release(dr);
                (d, dl, engine.node_mut(d).value.take())
            }
            (false, false) => {
                let pred = engine.predecessor(d).expect("Two children => predecessor");
                let pred_key = engine.key(pred);
                let pred_value = engine.node_mut(pred).value.take();

                let node = engine.node_mut(d);
                node.key = pred_key;
                let value = std::mem::replace(&mut node.value, pred_value);

                let pl = engine.left(pred).expect("Red-black node => left child");
                let pr = engine.right(pred).expect("Red-black node => right child");
                debug_assert!(engine.is_nil(pr));
                engine.set_parent_reference(pred, Some(pl));
                engine.node_mut(pl).parent = engine.parent(pred);
                engine.release(pr);
                (pred, pl, value)
            }
            (dl_nil, _) => {
                let (c, nil) = if dl_nil { (dr, dl) } else { (dl, dr) };
                engine.node_mut(c).parent = engine.parent(d);
                if engine.root == Some(d) {
                    engine.root = Some(c);
                } else {
                    engine.set_parent_reference(d, Some(c));
                }
                engine.release(nil);
                (d, c, engine.node_mut(d).value.take())
            }
        };

        engine.update_size_path(engine.parent(removed));
        if engine.node(removed).color == Color::Black {
            if engine.is_red(Some(r)) {
                engine.set_color(r, Color::Black);
            } else {
                engine.delete_fixup(r);
            }
        }
        engine.update_black_height_path(r);
        engine.release(removed);

        Ok(value)
    }

    fn search(&mut self, key: Key) -> Option<&V> {
        let mut n = self.engine.search_by_key(key)?;
        if self.engine.is_nil(n) {
            n = self.engine.parent(n)?;
        }
        self.engine.node(n).value()
    }

    fn initialize_perfect_tree(&mut self, levels: u32) -> Result<(), Error>
    where
        V: From<Key>,
    {
        self.engine.build_perfect(levels, true, |node| {
            node.color = Color::Black;
            node.black_height = levels - node.depth + 1;
        })
    }

    fn engine(&self) -> &Engine<V> {
        &self.engine
    }
}
