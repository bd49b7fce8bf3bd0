//! Tango trees: `O(lg lg N)`-competitive search trees.
//!
//! A tango tree is built over a fixed *reference tree*, a perfect tree whose
//! shape never changes. Every reference node remembers which child was
//! accessed last (its preferred child), and following preferred children
//! splits the reference tree into *preferred paths*.
//!
//! Each preferred path is stored as an auxiliary tree, ordered by key rather
//! than by depth, whose root is *marked*. The auxiliary trees hang off each
//! other: the tree of a path sits in the key gap of the path above it where
//! the reference subtree of the path's top node lives. Searching walks the
//! whole structure by key; every time it crosses a mark, the preferred path
//! above is cut at the depth where the search leaves it, and the path below is
//! joined in its place.
//!
//! Cutting and joining reduce to two primitives supplied by an
//! [`AuxStrategy`]:
//!
//! - `split(n, v_root)` brings `n` to the root of the auxiliary tree rooted at
//!   `v_root`, so that `n`'s left subtree holds the smaller keys and its right
//!   subtree the larger ones.
//! - `merge(n)` rebalances the auxiliary tree rooted at `n` after its children
//!   were changed.
//!
//! [`Balanced`] keeps every auxiliary tree a red-black tree; [`Unbalanced`]
//! only rotates and never rebalances.

mod balanced;
mod unbalanced;

use std::cmp::Ordering;

use tracing::trace;

use crate::engine::Engine;
use crate::error::Error;
use crate::node::{Key, Node, NodeId};
use crate::tree::SearchTree;

pub use balanced::Balanced;
pub use unbalanced::Unbalanced;

/// How a tango tree keeps its auxiliary trees.
pub trait AuxStrategy {
    /// Adjusts each node of a freshly built perfect tree, where every node is
    /// a one-node auxiliary tree.
    fn prepare<V>(&self, _node: &mut Node<V>) {}

    /// Brings `n` to the root of the auxiliary tree rooted at `v_root` and
    /// returns it. `v_root` may be unmarked, in which case it is the root of a
    /// subtree of an auxiliary tree.
    fn split<V>(&self, engine: &mut Engine<V>, n: NodeId, v_root: NodeId) -> NodeId;

    /// Restores the shape invariants of the auxiliary tree rooted at `n` and
    /// returns its new root.
    fn merge<V>(&self, engine: &mut Engine<V>, n: NodeId) -> NodeId;
}

/// A tango tree with red-black auxiliary trees.
pub type RedBlackTango<V> = TangoTree<V, Balanced>;

/// A tango tree with unbalanced auxiliary trees.
pub type UnbalancedTango<V> = TangoTree<V, Unbalanced>;

/// A tango tree. It can only be populated with
/// [`SearchTree::initialize_perfect_tree`]; insertion and removal fail.
#[derive(Clone, Debug)]
pub struct TangoTree<V, S> {
    engine: Engine<V>,
    strategy: S,
}

impl<V, S> Default for TangoTree<V, S>
where
    S: AuxStrategy + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V, S> TangoTree<V, S>
where
    S: AuxStrategy,
{
    /// Creates an empty tree.
    pub fn new() -> Self
    where
        S: Default,
    {
        Self::with_strategy(S::default())
    }

    /// Creates an empty tree using `strategy` for its auxiliary trees.
    pub fn with_strategy(strategy: S) -> Self {
        Self {
            engine: Engine::new(),
            strategy,
        }
    }

    /// The root of the auxiliary tree containing `n`.
    fn aux_root_of(&self, mut n: NodeId) -> NodeId {
        while !self.engine.is_aux_root(n) {
            n = self.engine.parent(n).expect("Non-root => parent");
        }
        n
    }

    /// The search walked onto the marked node `n`: make the path above it end
    /// right where `n`'s path begins and glue the two together. Returns the
    /// root of the combined auxiliary tree.
    fn cut_and_join(&mut self, n: NodeId) -> NodeId {
        let above = self.engine.parent(n).expect("Marked child => parent");
        let top = self.aux_root_of(above);
        let cut_depth = self.engine.node(n).min_depth - 1;
        trace!(node = %n, key = self.engine.key(n), cut_depth, "cut and join");

        let top = self.cut(top, cut_depth);
        self.join(top, n, cut_depth)
    }

    /// Moves every node deeper than `cut_depth` in the auxiliary tree at
    /// `v_root` into its own marked auxiliary tree. Returns the root of the
    /// shallow remainder.
    fn cut(&mut self, v_root: NodeId, cut_depth: u32) -> NodeId {
        let l = self.find_min_with_depth(v_root, cut_depth);
        let r = self.find_max_with_depth(v_root, cut_depth);
        let lp = l.and_then(|l| self.engine.predecessor(l));
        let rp = r.and_then(|r| self.engine.successor(r));

        let engine = &mut self.engine;
        match (lp, rp) {
            (None, None) => v_root,
            (Some(lp), None) => {
                self.strategy.split(engine, lp, v_root);
                let deep = engine.right(lp).expect("Cut => deep keys right of lp");
                debug_assert!(!engine.is_aux_leaf(Some(deep)));
                engine.mark(deep);
                engine.update_min_max_path(lp);
                self.strategy.merge(engine, lp)
            }
            (None, Some(rp)) => {
                self.strategy.split(engine, rp, v_root);
                let deep = engine.left(rp).expect("Cut => deep keys left of rp");
                debug_assert!(!engine.is_aux_leaf(Some(deep)));
                engine.mark(deep);
                engine.update_min_max_path(rp);
                self.strategy.merge(engine, rp)
            }
            (Some(lp), Some(rp)) => {
                self.strategy.split(engine, lp, v_root);
                let upper = engine.right(lp).expect("Cut => rp right of lp");
                self.strategy.split(engine, rp, upper);
                let deep = engine.left(rp).expect("Cut => deep keys left of rp");
                debug_assert!(!engine.is_aux_leaf(Some(deep)));
                engine.mark(deep);
                // Covers lp as well.
                engine.update_min_max_path(rp);
                self.strategy.merge(engine, rp);
                self.strategy.merge(engine, lp)
            }
        }
    }

    /// Merges the auxiliary tree rooted at the marked `n` into the one rooted
    /// at `top`, whose deepest node sits at `cut_depth` right above `n`'s
    /// shallowest one. Returns the root of the combined auxiliary tree.
    fn join(&mut self, top: NodeId, n: NodeId, cut_depth: u32) -> NodeId {
        let engine = &mut self.engine;
        debug_assert!(engine.is_aux_root(top));
        debug_assert!(engine.is_marked(n));
        debug_assert!(engine.node(top).max_depth <= cut_depth);
        debug_assert!(cut_depth < engine.node(n).min_depth);

        // The nodes of `top`'s tree bordering the gap `n` hangs in.
        let key = engine.key(n);
        let (mut lp, mut rp) = (None, None);
        let mut x = top;
        while x != n {
            let next = if engine.key(x) > key {
                rp = Some(x);
                engine.left(x)
            } else {
                lp = Some(x);
                engine.right(x)
            };
            x = next.expect("Joined tree hangs below the top tree");
        }

        match (lp, rp) {
            (None, None) => panic!("{} can't be joined to itself", n),
            (Some(lp), None) => {
                self.strategy.split(engine, lp, top);
                let gap = engine.right(lp).expect("Join => gap right of lp");
                debug_assert_eq!(gap, n);
                engine.unmark(gap);
                engine.update_min_max_path(gap);
                self.strategy.merge(engine, lp)
            }
            (None, Some(rp)) => {
                self.strategy.split(engine, rp, top);
                let gap = engine.left(rp).expect("Join => gap left of rp");
                debug_assert_eq!(gap, n);
                engine.unmark(gap);
                engine.update_min_max_path(gap);
                self.strategy.merge(engine, rp)
            }
            (Some(lp), Some(rp)) => {
                self.strategy.split(engine, lp, top);
                let upper = engine.right(lp).expect("Join => rp right of lp");
                self.strategy.split(engine, rp, upper);
                debug_assert_eq!(engine.right(lp), Some(rp));
                let gap = engine.left(rp).expect("Join => gap left of rp");
                debug_assert_eq!(gap, n);
                engine.unmark(gap);
                // Covers rp and lp as well.
                engine.update_min_max_path(gap);
                self.strategy.merge(engine, rp);
                self.strategy.merge(engine, lp)
            }
        }
    }

    /// The smallest key deeper than `depth` in the auxiliary tree at `x`.
    fn find_min_with_depth(&self, mut x: NodeId, depth: u32) -> Option<NodeId> {
        let engine = &self.engine;
        let deep = |c: &NodeId| !engine.is_aux_leaf(Some(*c)) && engine.node(*c).max_depth > depth;

        if engine.node(x).max_depth <= depth {
            return None;
        }
        loop {
            if let Some(l) = engine.left(x).filter(deep) {
                x = l;
            } else if engine.depth(x) > depth {
                return Some(x);
            } else {
                x = engine.right(x).filter(deep)?;
            }
        }
    }

    /// The largest key deeper than `depth` in the auxiliary tree at `x`.
    fn find_max_with_depth(&self, mut x: NodeId, depth: u32) -> Option<NodeId> {
        let engine = &self.engine;
        let deep = |c: &NodeId| !engine.is_aux_leaf(Some(*c)) && engine.node(*c).max_depth > depth;

        if engine.node(x).max_depth <= depth {
            return None;
        }
        loop {
            if let Some(r) = engine.right(x).filter(deep) {
                x = r;
            } else if engine.depth(x) > depth {
                return Some(x);
            } else {
                x = engine.left(x).filter(deep)?;
            }
        }
    }

    /// Searches the auxiliary tree at `root` for the key just below `key`. The
    /// first marked node on the way roots the path hanging left of `key`.
    fn find_marked_predecessor(&mut self, root: NodeId, key: Key) -> Option<NodeId> {
        let key = key - 1;
        let mut n = root;
        while !self.engine.is_nil(n) {
            self.engine.count_aux_step();
            let next = match key.cmp(&self.engine.key(n)) {
                Ordering::Less => self.engine.left(n),
                Ordering::Greater => self.engine.right(n),
                Ordering::Equal => return None,
            };
            n = next.expect("Real tango node => two children");
            if self.engine.is_marked(n) {
                return Some(n);
            }
        }
        None
    }
}

impl<V, S> SearchTree<V> for TangoTree<V, S>
where
    S: AuxStrategy,
{
    fn insert(&mut self, _key: Key, _value: V) -> Result<NodeId, Error> {
        Err(Error::InsertionNotSupported)
    }

    fn remove(&mut self, _key: Key) -> Result<Option<V>, Error> {
        Err(Error::RemovalNotSupported)
    }

    fn search(&mut self, key: Key) -> Option<&V> {
        let mut n = self.engine.root?;
        debug_assert!(self.engine.is_marked(n));

        while !self.engine.is_nil(n) {
            self.engine.count_main_step();
            let next = match key.cmp(&self.engine.key(n)) {
                Ordering::Less => self.engine.left(n),
                Ordering::Greater => self.engine.right(n),
                Ordering::Equal => break,
            };
            n = next.expect("Real tango node => two children");
            if self.engine.is_marked(n) {
                n = self.cut_and_join(n);
            }
        }

        // A walk ending on a nil finishes at the last real node.
        let x = if self.engine.is_nil(n) {
            self.engine.parent(n).expect("Nil => parent")
        } else {
            n
        };
        let depth = self.engine.depth(x);
        trace!(key, node = %x, depth, "finish search");

        let top = self.aux_root_of(x);
        let r = self.cut(top, depth);
        if let Some(p) = self.find_marked_predecessor(r, self.engine.key(x)) {
            self.join(r, p, depth);
        }

        self.engine.node(x).value()
    }

    fn initialize_perfect_tree(&mut self, levels: u32) -> Result<(), Error>
    where
        V: From<Key>,
    {
        let strategy = &self.strategy;
        self.engine.build_perfect(levels, true, |node| {
            node.marked = true;
            strategy.prepare(node);
        })
    }

    fn engine(&self) -> &Engine<V> {
        &self.engine
    }
}
