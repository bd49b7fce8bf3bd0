//! The ordered-tree engine shared by every tree in this crate.
//!
//! An [`Engine`] owns all nodes of one tree in an arena, the current root and
//! the [`TreeStats`] counters. It implements the mechanics the variants have in
//! common: key-guided search, rotations, unbalanced insertion and removal,
//! predecessor/successor walks, subtree-size and depth-range bookkeeping, and
//! bulk construction of perfect trees.
//!
//! # Boundaries
//!
//! The preferred-path trees store many auxiliary trees inside one physical
//! tree. A marked node is the root of its own auxiliary tree, so the
//! inspection helpers here (`has_left`, `is_left_child`, `sibling`, the
//! predecessor/successor walks and so on) treat a marked
//! child as if it weren't there. Nil sentinels count as children but never as
//! real nodes. The plain, splay and red-black trees never mark a node, so the
//! same helpers give them ordinary BST semantics.

use std::cmp::Ordering;

use crate::error::{Error, MAX_LEVELS};
use crate::node::{Color, Key, Node, NodeId};
use crate::stats::TreeStats;

/// Node storage and the shared ordered-tree mechanics of one tree.
#[derive(Clone, Debug)]
pub struct Engine<V> {
    nodes: Vec<Node<V>>,
    /// Released slots, reused by later allocations.
    free: Vec<NodeId>,
    pub(crate) root: Option<NodeId>,
    pub(crate) stats: TreeStats,
}

impl<V> Default for Engine<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Engine<V> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: None,
            stats: TreeStats::default(),
        }
    }

    /// The root of the whole structure.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// The node stored at `id`.
    ///
    /// ## Panics
    ///
    /// When `id` doesn't belong to this tree.
    pub fn node(&self, id: NodeId) -> &Node<V> {
        &self.nodes[id.index()]
    }

    /// A snapshot of the counters.
    pub fn stats(&self) -> TreeStats {
        self.stats
    }

    /// The keys of all real nodes in symmetric order, ignoring auxiliary-tree boundaries.
    pub fn keys(&self) -> Vec<Key> {
        self.real_nodes().map(|n| self.key(n)).collect()
    }

    /// The number of real (non-nil) nodes.
    pub fn len(&self) -> usize {
        self.real_nodes().count()
    }

    /// Whether the tree holds no real nodes.
    pub fn is_empty(&self) -> bool {
        self.real_nodes().next().is_none()
    }

    /// Real nodes in symmetric order. Walks the raw links, so marks don't stop it.
    fn real_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        let first = self.root.map(|r| self.leftmost(r));
        std::iter::successors(first, move |&n| self.next_in_order(n)).filter(move |&n| !self.is_nil(n))
    }

    fn leftmost(&self, mut n: NodeId) -> NodeId {
        while let Some(l) = self.node(n).left {
            n = l;
        }
        n
    }

    fn next_in_order(&self, mut n: NodeId) -> Option<NodeId> {
        if let Some(r) = self.node(n).right {
            return Some(self.leftmost(r));
        }
        loop {
            let p = self.node(n).parent?;
            if self.node(p).left == Some(n) {
                return Some(p);
            }
            n = p;
        }
    }

    /// The number of levels of real nodes. An empty tree has height 0.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(NodeId, usize)> = self.root.into_iter().map(|r| (r, 1)).collect();
        while let Some((n, level)) = stack.pop() {
            if self.is_nil(n) {
                continue;
            }
            height = height.max(level);
            let node = self.node(n);
            stack.extend(node.left.map(|l| (l, level + 1)));
            stack.extend(node.right.map(|r| (r, level + 1)));
        }
        height
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<V> {
        &mut self.nodes[id.index()]
    }

    /// Drops every node. The counters are kept.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.root = None;
    }

    fn alloc_node(&mut self, node: Node<V>) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.index()] = node;
                id
            }
            None => {
                let id = NodeId(u32::try_from(self.nodes.len()).expect("node arena overflow"));
                self.nodes.push(node);
                id
            }
        }
    }

    pub(crate) fn alloc(&mut self, key: Key, value: V) -> NodeId {
        self.alloc_node(Node::new(key, value))
    }

    pub(crate) fn alloc_nil(&mut self, parent: Option<NodeId>) -> NodeId {
        self.alloc_node(Node::nil(parent))
    }

    /// Frees the slot of a node that is no longer linked from anywhere and returns its payload.
    pub(crate) fn release(&mut self, id: NodeId) -> Option<V> {
        let node = self.node_mut(id);
        node.parent = None;
        node.left = None;
        node.right = None;
        let value = node.value.take();
        self.free.push(id);
        value
    }

    pub(crate) fn key(&self, n: NodeId) -> Key {
        self.node(n).key
    }

    pub(crate) fn parent(&self, n: NodeId) -> Option<NodeId> {
        self.node(n).parent
    }

    pub(crate) fn left(&self, n: NodeId) -> Option<NodeId> {
        self.node(n).left
    }

    pub(crate) fn right(&self, n: NodeId) -> Option<NodeId> {
        self.node(n).right
    }

    pub(crate) fn depth(&self, n: NodeId) -> u32 {
        self.node(n).depth
    }

    pub(crate) fn is_nil(&self, n: NodeId) -> bool {
        self.node(n).is_nil()
    }

    pub(crate) fn is_marked(&self, n: NodeId) -> bool {
        self.node(n).marked
    }

    pub(crate) fn mark(&mut self, n: NodeId) {
        self.node_mut(n).marked = true;
    }

    pub(crate) fn unmark(&mut self, n: NodeId) {
        self.node_mut(n).marked = false;
    }

    pub(crate) fn set_color(&mut self, n: NodeId, color: Color) {
        self.node_mut(n).color = color;
    }

    /// Absent slots count as black, like nil sentinels.
    pub(crate) fn is_red(&self, n: Option<NodeId>) -> bool {
        n.map_or(false, |n| self.node(n).color == Color::Red)
    }

    pub(crate) fn is_black(&self, n: Option<NodeId>) -> bool {
        !self.is_red(n)
    }

    pub(crate) fn count_main_step(&mut self) {
        self.stats.main_steps += 1;
    }

    pub(crate) fn count_aux_step(&mut self) {
        self.stats.aux_steps += 1;
    }

    /// Whether `n` is the root of the auxiliary tree containing it.
    pub(crate) fn is_aux_root(&self, n: NodeId) -> bool {
        self.parent(n).is_none() || self.is_marked(n)
    }

    /// Whether a child slot is outside the current auxiliary tree: empty, a
    /// nil sentinel, or the root of another auxiliary tree.
    pub(crate) fn is_aux_leaf(&self, slot: Option<NodeId>) -> bool {
        slot.map_or(true, |n| self.is_nil(n) || self.is_marked(n))
    }

    pub(crate) fn has_left(&self, n: NodeId) -> bool {
        self.left(n).map_or(false, |l| !self.is_marked(l))
    }

    pub(crate) fn has_right(&self, n: NodeId) -> bool {
        self.right(n).map_or(false, |r| !self.is_marked(r))
    }

    pub(crate) fn is_left_child(&self, n: NodeId) -> bool {
        !self.is_marked(n) && self.parent(n).map_or(false, |p| self.left(p) == Some(n))
    }

    pub(crate) fn is_right_child(&self, n: NodeId) -> bool {
        !self.is_marked(n) && self.parent(n).map_or(false, |p| self.right(p) == Some(n))
    }

    /// The other child of `n`'s parent, if both live in the same auxiliary tree.
    pub(crate) fn sibling(&self, n: NodeId) -> Option<NodeId> {
        if self.is_aux_root(n) {
            return None;
        }
        let p = self.parent(n)?;
        if self.is_left_child(n) && self.has_right(p) {
            self.right(p)
        } else if self.is_right_child(n) && self.has_left(p) {
            self.left(p)
        } else {
            None
        }
    }

    /// Points the slot of `cur`'s parent that holds `cur` at `new` instead.
    /// `cur.parent` itself is left alone.
    ///
    /// ## Panics
    ///
    /// When `cur` has no parent or its parent doesn't hold it.
    pub(crate) fn set_parent_reference(&mut self, cur: NodeId, new: Option<NodeId>) {
        let p = self.parent(cur).expect("Parent reference => parent");
        let parent = self.node_mut(p);
        if parent.left == Some(cur) {
            parent.left = new;
        } else if parent.right == Some(cur) {
            parent.right = new;
        } else {
            panic!("{} is not a child of its parent {}", cur, p);
        }
    }

    pub(crate) fn clear_parent_reference(&mut self, n: NodeId) {
        self.set_parent_reference(n, None);
    }

    /// Unlinks `n` from `par`. The caller names the parent to prove it knows the shape.
    pub(crate) fn detach(&mut self, n: NodeId, par: NodeId) {
        assert_eq!(self.parent(n), Some(par), "detaching {} from a node that isn't its parent", n);
        self.clear_parent_reference(n);
        self.node_mut(n).parent = None;
    }

    /// Links the parentless `n` under `par` on the side its key belongs to.
    pub(crate) fn attach_up(&mut self, n: NodeId, par: NodeId) {
        debug_assert!(self.parent(n).is_none());
        debug_assert!(!self.is_nil(n));
        if self.key(n) < self.key(par) {
            self.attach_left(n, par);
        } else {
            self.attach_right(n, par);
        }
    }

    pub(crate) fn attach_left(&mut self, n: NodeId, par: NodeId) {
        debug_assert!(self.parent(n).is_none());
        debug_assert!(self.left(par).is_none(), "{} already has a left child", par);
        debug_assert!(self.is_nil(n) || self.key(n) < self.key(par));
        self.node_mut(par).left = Some(n);
        self.node_mut(n).parent = Some(par);
    }

    pub(crate) fn attach_right(&mut self, n: NodeId, par: NodeId) {
        debug_assert!(self.parent(n).is_none());
        debug_assert!(self.right(par).is_none(), "{} already has a right child", par);
        debug_assert!(self.is_nil(n) || self.key(n) > self.key(par));
        self.node_mut(par).right = Some(n);
        self.node_mut(n).parent = Some(par);
    }

    /// Recomputes the size of `n`, assuming its children are correct.
    pub(crate) fn update_size(&mut self, n: NodeId) {
        let node = self.node(n);
        let left = node.left.map_or(0, |l| self.node(l).size);
        let right = node.right.map_or(0, |r| self.node(r).size);
        self.node_mut(n).size = 1 + left + right;
    }

    /// Recomputes sizes from `n` up to the root of the whole structure.
    pub(crate) fn update_size_path(&mut self, n: Option<NodeId>) {
        let mut cur = n;
        while let Some(n) = cur {
            self.update_size(n);
            cur = self.parent(n);
        }
    }

    /// Recomputes the depth range of `n` from its children in the same auxiliary tree.
    pub(crate) fn update_min_max(&mut self, n: NodeId) {
        let node = self.node(n);
        let mut min = node.depth;
        let mut max = node.depth;
        for child in [node.left, node.right] {
            if let (false, Some(c)) = (self.is_aux_leaf(child), child) {
                min = min.min(self.node(c).min_depth);
                max = max.max(self.node(c).max_depth);
            }
        }
        let node = self.node_mut(n);
        node.min_depth = min;
        node.max_depth = max;
    }

    /// Recomputes depth ranges from `n` up to the root of its auxiliary tree.
    pub(crate) fn update_min_max_path(&mut self, mut n: NodeId) {
        self.update_min_max(n);
        while !self.is_aux_root(n) {
            n = self.parent(n).expect("Non-root => parent");
            self.update_min_max(n);
        }
    }

    /// Rotates `n` to the left, moving its right child up and `n` down. Sizes,
    /// depth ranges and black heights of the two nodes are refreshed, and if
    /// `n` was an auxiliary-tree root the mark moves to the new subtree root.
    ///
    /// ## Panics
    ///
    /// When `n` has no right child.
    ///
    /// # Diagram
    ///
    /// ```text
    ///   Option<parent>              Option<parent>
    ///     /                           /
    ///    n                          pivot
    ///   / \                          / \
    ///  x  pivot     rotate ->       n   z
    ///      / \                     / \
    ///     y   z                   x   y
    /// ```
    pub(crate) fn rotate_left(&mut self, n: NodeId) {
        let pivot = self.right(n).expect("Rotate left => right child");
        self.promote(n, pivot);

        let moved = self.left(pivot);
        self.node_mut(n).right = moved;
        if let Some(moved) = moved {
            self.node_mut(moved).parent = Some(n);
        }

        self.node_mut(pivot).left = Some(n);
        self.node_mut(n).parent = Some(pivot);

        self.after_rotation(n, pivot);
    }

    /// Mirror image of [`Engine::rotate_left`]: moves the left child of `n` up.
    ///
    /// ## Panics
    ///
    /// When `n` has no left child.
    pub(crate) fn rotate_right(&mut self, n: NodeId) {
        let pivot = self.left(n).expect("Rotate right => left child");
        self.promote(n, pivot);

        let moved = self.right(pivot);
        self.node_mut(n).left = moved;
        if let Some(moved) = moved {
            self.node_mut(moved).parent = Some(n);
        }

        self.node_mut(pivot).right = Some(n);
        self.node_mut(n).parent = Some(pivot);

        self.after_rotation(n, pivot);
    }

    /// Puts `pivot` into the slot `n` occupies (or makes it the root).
    fn promote(&mut self, n: NodeId, pivot: NodeId) {
        let parent = self.parent(n);
        self.node_mut(pivot).parent = parent;
        match parent {
            Some(_) => self.set_parent_reference(n, Some(pivot)),
            // A detached subtree root has nobody to notify.
            None if self.root == Some(n) => self.root = Some(pivot),
            None => {}
        }
    }

    fn after_rotation(&mut self, n: NodeId, pivot: NodeId) {
        self.stats.rotations += 1;

        self.update_size(n);
        self.update_size(pivot);

        debug_assert!(!self.is_marked(pivot), "rotating a marked pivot {}", pivot);
        if self.is_marked(n) {
            self.mark(pivot);
            self.unmark(n);
        }

        self.update_min_max(n);
        self.update_min_max(pivot);
        self.update_black_height(n);
        self.update_black_height(pivot);
    }

    fn real_left(&self, n: NodeId) -> Option<NodeId> {
        self.left(n).filter(|&l| !self.is_aux_leaf(Some(l)))
    }

    fn real_right(&self, n: NodeId) -> Option<NodeId> {
        self.right(n).filter(|&r| !self.is_aux_leaf(Some(r)))
    }

    /// The real node of maximum key in `n`'s subtree within its auxiliary tree.
    pub(crate) fn maximum_child(&mut self, mut n: NodeId) -> NodeId {
        while let Some(r) = self.real_right(n) {
            n = r;
            self.count_aux_step();
        }
        n
    }

    /// The real node of minimum key in `n`'s subtree within its auxiliary tree.
    pub(crate) fn minimum_child(&mut self, mut n: NodeId) -> NodeId {
        while let Some(l) = self.real_left(n) {
            n = l;
            self.count_aux_step();
        }
        n
    }

    /// The in-order predecessor of `n` within its auxiliary tree.
    pub(crate) fn predecessor(&mut self, mut n: NodeId) -> Option<NodeId> {
        if let Some(l) = self.real_left(n) {
            return Some(self.maximum_child(l));
        }
        while !self.is_aux_root(n) && self.is_left_child(n) {
            n = self.parent(n)?;
            self.count_aux_step();
        }
        if self.is_aux_root(n) {
            None
        } else {
            self.parent(n)
        }
    }

    /// The in-order successor of `n` within its auxiliary tree.
    pub(crate) fn successor(&mut self, mut n: NodeId) -> Option<NodeId> {
        if let Some(r) = self.real_right(n) {
            return Some(self.minimum_child(r));
        }
        while !self.is_aux_root(n) && self.is_right_child(n) {
            n = self.parent(n)?;
            self.count_aux_step();
        }
        if self.is_aux_root(n) {
            None
        } else {
            self.parent(n)
        }
    }

    /// Walks down from the root comparing keys, ignoring auxiliary-tree
    /// boundaries. Returns the matching node, or the last node visited (which
    /// may be a nil sentinel) when the key is absent. `None` only for an empty
    /// tree.
    pub(crate) fn search_by_key(&mut self, key: Key) -> Option<NodeId> {
        let mut cur = self.root;
        let mut last = None;

        while let Some(n) = cur {
            last = Some(n);
            self.count_main_step();

            if self.is_nil(n) {
                break;
            }
            cur = match key.cmp(&self.key(n)) {
                Ordering::Less => self.left(n),
                Ordering::Greater => self.right(n),
                Ordering::Equal => break,
            };
        }

        last
    }

    /// Inserts without rebalancing. An existing key has its payload replaced.
    pub(crate) fn insert(&mut self, key: Key, value: V) -> NodeId {
        match self.search_by_key(key) {
            None => {
                let n = self.alloc(key, value);
                self.root = Some(n);
                n
            }
            Some(p) if self.key(p) == key => {
                self.node_mut(p).value = Some(value);
                p
            }
            Some(p) => {
                let n = self.alloc(key, value);
                if key < self.key(p) {
                    self.attach_left(n, p);
                } else {
                    self.attach_right(n, p);
                }
                self.update_size_path(Some(p));
                n
            }
        }
    }

    /// Removes `key` without rebalancing and returns its payload.
    ///
    /// A node with two children takes over its predecessor's key and payload,
    /// and the predecessor (which has no right child) is unlinked instead.
    pub(crate) fn remove(&mut self, key: Key) -> Option<V> {
        let d = self.search_by_key(key).filter(|&d| self.key(d) == key)?;

        let (removed, value) = match (self.left(d), self.right(d)) {
            (None, None) => {
                if self.root == Some(d) {
                    self.root = None;
                } else {
                    self.clear_parent_reference(d);
                }
                (d, self.node_mut(d).value.take())
            }
            (Some(_), Some(_)) => {
                let pred = self.predecessor(d).expect("Two children => predecessor");
                let pred_key = self.key(pred);
                let pred_value = self.node_mut(pred).value.take();

                let node = self.node_mut(d);
                node.key = pred_key;
                let value = std::mem::replace(&mut node.value, pred_value);

                match self.left(pred) {
                    None => self.clear_parent_reference(pred),
                    Some(pl) => {
                        self.set_parent_reference(pred, Some(pl));
                        self.node_mut(pl).parent = self.parent(pred);
                    }
                }
                (pred, value)
            }
            (Some(child), None) | (None, Some(child)) => {
                self.node_mut(child).parent = self.parent(d);
                if self.root == Some(d) {
                    self.root = Some(child);
                } else {
                    self.set_parent_reference(d, Some(child));
                }
                (d, self.node_mut(d).value.take())
            }
        };

        self.update_size_path(self.parent(removed));
        self.release(removed);
        value
    }

    /// Replaces the contents with a perfect tree of `levels` levels holding
    /// keys `1..2^levels`, each node's payload made from its key. Every node
    /// gets its reference depth; with `nils`, the bottom level gets nil
    /// sentinels one level deeper. `init` then runs on every real node.
    pub(crate) fn build_perfect<F>(&mut self, levels: u32, nils: bool, mut init: F) -> Result<(), Error>
    where
        V: From<Key>,
        F: FnMut(&mut Node<V>),
    {
        if levels == 0 || levels > MAX_LEVELS {
            return Err(Error::InvalidLevels(levels));
        }

        self.clear();
        let root = self.build_perfect_subtree(levels - 1, 0, 1, nils, &mut init);
        self.root = Some(root);
        Ok(())
    }

    /// Builds the subtree at `depth` whose bottom level is `bottom`, with keys starting at `first`.
    fn build_perfect_subtree<F>(&mut self, bottom: u32, depth: u32, first: Key, nils: bool, init: &mut F) -> NodeId
    where
        V: From<Key>,
        F: FnMut(&mut Node<V>),
    {
        let (n, left, right) = if depth == bottom {
            let n = self.alloc(first, V::from(first));
            if nils {
                let l = self.alloc_nil(Some(n));
                let r = self.alloc_nil(Some(n));
                self.node_mut(l).depth = depth + 1;
                self.node_mut(r).depth = depth + 1;
                (n, Some(l), Some(r))
            } else {
                (n, None, None)
            }
        } else {
            let l = self.build_perfect_subtree(bottom, depth + 1, first, nils, init);
            // The left subtree holds 2^(bottom - depth) - 1 keys.
            let key = first + (1 << (bottom - depth)) - 1;
            let n = self.alloc(key, V::from(key));
            let r = self.build_perfect_subtree(bottom, depth + 1, key + 1, nils, init);
            self.node_mut(l).parent = Some(n);
            self.node_mut(r).parent = Some(n);
            (n, Some(l), Some(r))
        };

        let node = self.node_mut(n);
        node.left = left;
        node.right = right;
        node.depth = depth;
        node.min_depth = depth;
        node.max_depth = depth;
        init(node);
        self.update_size(n);
        n
    }
}
