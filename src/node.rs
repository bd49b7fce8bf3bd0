//! The atomic tree cell shared by every tree in this crate.
//!
//! Nodes never own each other. They live in an arena owned by the tree's
//! [`Engine`](crate::engine::Engine) and refer to each other by [`NodeId`]. The
//! `parent` link is therefore just another index and can't form an ownership
//! cycle.

use std::fmt;

/// The key type of every tree. Keys form a single, totally ordered domain.
pub type Key = i32;

/// The reserved key carried by nil sentinels. No real node may use it.
pub const NIL_KEY: Key = Key::MIN;

/// An index into a tree's node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The color of a node in a red-black scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    /// A red node. Its children must be black.
    Red,
    /// A black node. Nil sentinels are always black.
    Black,
}

/// A node in one of the trees.
///
/// A single representation serves every variant: the plain and splay trees
/// only use the key, payload, links and size; the preferred-path trees also
/// use the reference depth, the depth range and the mark; the red-black
/// variants also use the color and the black height. Fields a variant doesn't
/// use keep their defaults (unmarked, black).
#[derive(Clone, Debug)]
pub struct Node<V> {
    pub(crate) key: Key,
    pub(crate) value: Option<V>,

    pub(crate) parent: Option<NodeId>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,

    /// Number of nodes in the subtree rooted here, including this one (and any nil sentinels).
    pub(crate) size: usize,

    pub(crate) depth: u32,
    pub(crate) min_depth: u32,
    pub(crate) max_depth: u32,
    pub(crate) marked: bool,

    pub(crate) color: Color,
    /// Black nodes on any path from here down to a leaf of the red-black scope, leaf included.
    pub(crate) black_height: u32,
}

impl<V> Node<V> {
    pub(crate) fn new(key: Key, value: V) -> Self {
        Self {
            key,
            value: Some(value),
            parent: None,
            left: None,
            right: None,
            size: 1,
            depth: 0,
            min_depth: 0,
            max_depth: 0,
            marked: false,
            color: Color::Black,
            black_height: 1,
        }
    }

    pub(crate) fn nil(parent: Option<NodeId>) -> Self {
        Self {
            key: NIL_KEY,
            value: None,
            parent,
            left: None,
            right: None,
            size: 1,
            depth: 0,
            min_depth: 0,
            max_depth: 0,
            marked: false,
            color: Color::Black,
            black_height: 1,
        }
    }

    /// The key of this node, or [`NIL_KEY`] for a nil sentinel.
    pub fn key(&self) -> Key {
        self.key
    }

    /// The payload stored at this node. Nil sentinels carry none.
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// Whether this node is a nil sentinel.
    pub fn is_nil(&self) -> bool {
        self.key == NIL_KEY
    }

    /// The node holding this one in its `left` or `right` slot, if any.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The left child.
    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    /// The right child.
    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    /// The number of nodes in the subtree rooted at this node, itself included.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The level of this node in the reference tree. Fixed when a preferred-path tree is built.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// The smallest reference depth reachable from here without crossing a mark.
    pub fn min_depth(&self) -> u32 {
        self.min_depth
    }

    /// The largest reference depth reachable from here without crossing a mark.
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Whether this node is the root of an auxiliary tree.
    pub fn is_marked(&self) -> bool {
        self.marked
    }

    /// The red-black color of this node.
    pub fn color(&self) -> Color {
        self.color
    }

    /// The number of black nodes, this one included, on any path down to a nil leaf.
    pub fn black_height(&self) -> u32 {
        self.black_height
    }
}
