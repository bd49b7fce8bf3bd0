//! Structural checks used by the unit tests. Each one panics with a
//! description of the first broken invariant it finds.

use crate::engine::Engine;
use crate::node::{Color, Key, NodeId};

/// Checks links, key order and subtree sizes of the whole structure.
pub(crate) fn assert_bst<V>(engine: &Engine<V>) {
    if let Some(root) = engine.root() {
        assert_eq!(engine.node(root).parent(), None, "root {} has a parent", root);
        check_subtree(engine, root, None, None);
    }
}

/// Returns the size of the subtree at `n`.
fn check_subtree<V>(engine: &Engine<V>, n: NodeId, lo: Option<Key>, hi: Option<Key>) -> usize {
    let node = engine.node(n);

    if node.is_nil() {
        assert!(node.left().is_none() && node.right().is_none(), "nil {} has children", n);
        assert!(node.value().is_none(), "nil {} has a payload", n);
        assert_eq!(node.size(), 1, "nil {} has size {}", n, node.size());
        return 1;
    }

    let key = node.key();
    assert!(lo.map_or(true, |lo| lo < key), "{} out of order: {} <= {:?}", n, key, lo);
    assert!(hi.map_or(true, |hi| key < hi), "{} out of order: {} >= {:?}", n, key, hi);
    assert!(node.value().is_some(), "{} ({}) has no payload", n, key);

    let mut size = 1;
    if let Some(l) = node.left() {
        assert_eq!(engine.node(l).parent(), Some(n), "left child of {} ({}) disowns it", n, key);
        size += check_subtree(engine, l, lo, Some(key));
    }
    if let Some(r) = node.right() {
        assert_eq!(engine.node(r).parent(), Some(n), "right child of {} ({}) disowns it", n, key);
        size += check_subtree(engine, r, Some(key), hi);
    }
    assert_eq!(node.size(), size, "{} ({}) has the wrong size", n, key);
    size
}

/// Checks the red-black rules over the whole structure, treated as a single scope.
pub(crate) fn assert_red_black<V>(engine: &Engine<V>) {
    assert_bst(engine);
    if let Some(root) = engine.root() {
        assert_eq!(engine.node(root).color(), Color::Black, "red root {}", root);
        let bh = black_height(engine, Some(root));
        assert_eq!(engine.node(root).black_height(), bh, "root {} has a stale black height", root);
    }
}

/// Checks every auxiliary tree: the whole-tree root is marked, each auxiliary
/// tree holds one node per depth of a contiguous range, and the cached depth
/// ranges are right. With `red_black`, each auxiliary tree must also be a
/// red-black tree with marked children and nils as its leaves.
pub(crate) fn assert_aux_trees<V>(engine: &Engine<V>, red_black: bool) {
    assert_bst(engine);
    let Some(root) = engine.root() else {
        return;
    };
    assert!(engine.node(root).is_marked(), "root {} is not marked", root);

    let mut stack = vec![root];
    while let Some(n) = stack.pop() {
        let node = engine.node(n);
        if node.is_nil() {
            continue;
        }
        stack.extend(node.left());
        stack.extend(node.right());

        if !node.is_marked() {
            continue;
        }

        let mut depths = Vec::new();
        depth_range(engine, n, &mut depths);
        depths.sort_unstable();
        let first = depths[0];
        for (offset, depth) in depths.iter().enumerate() {
            assert_eq!(
                *depth,
                first + offset as u32,
                "auxiliary tree at {} doesn't hold a path: {:?}",
                n,
                depths
            );
        }

        if red_black {
            assert_eq!(node.color(), Color::Black, "red auxiliary root {}", n);
            let bh = black_height(engine, Some(n));
            assert_eq!(node.black_height(), bh, "auxiliary root {} has a stale black height", n);
        }
    }
}

/// Collects the depths in the auxiliary tree below `n` and checks the cached
/// range of every node on the way. Returns that range.
fn depth_range<V>(engine: &Engine<V>, n: NodeId, depths: &mut Vec<u32>) -> (u32, u32) {
    let node = engine.node(n);
    depths.push(node.depth());

    let (mut min, mut max) = (node.depth(), node.depth());
    for child in [node.left(), node.right()] {
        if let Some(c) = child.filter(|&c| is_inside(engine, c)) {
            let (cmin, cmax) = depth_range(engine, c, depths);
            min = min.min(cmin);
            max = max.max(cmax);
        }
    }

    assert_eq!(node.min_depth(), min, "{} ({}) has a stale min depth", n, node.key());
    assert_eq!(node.max_depth(), max, "{} ({}) has a stale max depth", n, node.key());
    (min, max)
}

fn is_inside<V>(engine: &Engine<V>, n: NodeId) -> bool {
    let node = engine.node(n);
    !node.is_nil() && !node.is_marked()
}

/// Black height of the scope below a slot. Slots outside the scope count as one black leaf.
fn black_height<V>(engine: &Engine<V>, slot: Option<NodeId>) -> u32 {
    let Some(n) = slot else {
        return 1;
    };
    let node = engine.node(n);
    if node.is_nil() {
        return 1;
    }

    let inside = |c: &NodeId| is_inside(engine, *c);
    let left = node.left().filter(inside);
    let right = node.right().filter(inside);

    if node.color() == Color::Red {
        for child in [left, right].into_iter().flatten() {
            assert_eq!(
                engine.node(child).color(),
                Color::Black,
                "red {} ({}) has a red child",
                n,
                node.key()
            );
        }
    }

    let lh = black_height(engine, left);
    let rh = black_height(engine, right);
    assert_eq!(lh, rh, "{} ({}) has unequal black heights", n, node.key());
    let bh = lh + u32::from(node.color() == Color::Black);
    assert_eq!(node.black_height(), bh, "{} ({}) has a stale black height", n, node.key());
    bh
}
