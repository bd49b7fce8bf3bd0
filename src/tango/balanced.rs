use std::cmp::Ordering;

use crate::engine::Engine;
use crate::node::{Color, Node, NodeId};

use super::AuxStrategy;

/// Keeps every auxiliary tree a red-black tree, so that cutting and joining
/// take `O(lg lg N)` time per crossed mark.
///
/// Splitting takes the auxiliary tree apart along the search path for `n` and
/// reassembles the two halves with 3-way red-black joins. Merging is a single
/// 3-way join of a root and its two subtrees.
#[derive(Clone, Copy, Debug, Default)]
pub struct Balanced;

impl AuxStrategy for Balanced {
    fn prepare<V>(&self, node: &mut Node<V>) {
        node.color = Color::Black;
        // A lone black node over two nil leaves.
        node.black_height = 2;
    }

    fn split<V>(&self, engine: &mut Engine<V>, n: NodeId, v_root: NodeId) -> NodeId {
        let vpar = engine.parent(v_root);
        if let Some(vpar) = vpar {
            engine.detach(v_root, vpar);
        }
        let v_mark = engine.is_marked(v_root);
        engine.unmark(v_root);

        let key = engine.key(n);
        let mut k = v_root;
        // The trees of keys left and right of `n`, and the pivots that will join
        // them to the next subtree peeled off on their side.
        let (mut tl, mut vl) = (None, None);
        let (mut tr, mut vr) = (None, None);

        while !engine.is_aux_leaf(Some(k)) {
            let kl = engine.left(k).expect("Tango node => left child");
            let kr = engine.right(k).expect("Tango node => right child");
            engine.detach(kl, k);
            engine.detach(kr, k);
            blacken(engine, kl);
            blacken(engine, kr);

            match key.cmp(&engine.key(k)) {
                Ordering::Less => {
                    tr = Some(join3(engine, Some(kr), vr, tr));
                    vr = Some(k);
                    k = kl;
                }
                Ordering::Greater => {
                    tl = Some(join3(engine, tl, vl, Some(kl)));
                    vl = Some(k);
                    k = kr;
                }
                Ordering::Equal => {
                    let l = join3(engine, tl, vl, Some(kl));
                    let r = join3(engine, Some(kr), vr, tr);
                    engine.attach_left(l, k);
                    engine.attach_right(r, k);
                    break;
                }
            }
        }
        assert_eq!(k, n, "split target {} is not in the auxiliary tree", n);

        engine.update_size(n);
        engine.update_min_max(n);
        match vpar {
            Some(vpar) => engine.attach_up(n, vpar),
            None => engine.root = Some(n),
        }
        if v_mark {
            engine.mark(n);
        }
        n
    }

    fn merge<V>(&self, engine: &mut Engine<V>, n: NodeId) -> NodeId {
        let np = engine.parent(n);
        let nl = engine.left(n).expect("Tango node => left child");
        let nr = engine.right(n).expect("Tango node => right child");
        let mark = engine.is_marked(n);
        engine.unmark(n);

        if let Some(np) = np {
            engine.detach(n, np);
        }
        engine.detach(nl, n);
        engine.detach(nr, n);
        blacken(engine, n);
        blacken(engine, nl);
        blacken(engine, nr);

        let root = join3(engine, Some(nl), Some(n), Some(nr));
        match np {
            Some(np) => engine.attach_up(root, np),
            None => engine.root = Some(root),
        }
        if mark {
            engine.mark(root);
        }
        root
    }
}

/// Makes `n` the black root of a standalone red-black tree.
fn blacken<V>(engine: &mut Engine<V>, n: NodeId) {
    engine.set_color(n, Color::Black);
    engine.update_black_height(n);
}

/// Joins the detached red-black trees `nl` and `nr` with the detached node `n`
/// whose key lies between them, and returns the root of the result.
///
/// Either tree may be missing or be a leaf of the auxiliary tree (a nil or a
/// marked node), in which case it is just linked in as a leaf. Otherwise the
/// shorter tree and `n` are grafted onto the taller tree at the first black
/// node of matching black height, and `n` is fixed up like a freshly
/// inserted red node.
fn join3<V>(engine: &mut Engine<V>, nl: Option<NodeId>, n: Option<NodeId>, nr: Option<NodeId>) -> NodeId {
    let Some(n) = n else {
        return nr.or(nl).expect("Joining two missing trees");
    };

    match (engine.is_aux_leaf(nl), engine.is_aux_leaf(nr)) {
        (true, true) => {
            if let Some(l) = nl {
                engine.attach_left(l, n);
            }
            if let Some(r) = nr {
                engine.attach_right(r, n);
            }
        }
        (true, false) => {
            attach_as_minimum(engine, n, nr.expect("Inner tree => some"));
            if let Some(l) = nl {
                engine.attach_left(l, n);
            }
        }
        (false, true) => {
            attach_as_maximum(engine, n, nl.expect("Inner tree => some"));
            if let Some(r) = nr {
                engine.attach_right(r, n);
            }
        }
        (false, false) => {
            let l = nl.expect("Inner tree => some");
            let r = nr.expect("Inner tree => some");
            let lh = engine.node(l).black_height;
            let rh = engine.node(r).black_height;

            match lh.cmp(&rh) {
                Ordering::Equal => {
                    engine.attach_left(l, n);
                    engine.attach_right(r, n);
                }
                Ordering::Less => {
                    let p = find_min_with_black_height(engine, r, lh);
                    let pp = engine.parent(p).expect("Taller tree => parent");
                    engine.attach_left(l, n);
                    engine.detach(p, pp);
                    engine.attach_right(p, n);
                    engine.attach_left(n, pp);
                }
                Ordering::Greater => {
                    let p = find_max_with_black_height(engine, l, rh);
                    let pp = engine.parent(p).expect("Taller tree => parent");
                    engine.attach_right(r, n);
                    engine.detach(p, pp);
                    engine.attach_left(p, n);
                    engine.attach_right(n, pp);
                }
            }
        }
    }

    engine.set_color(n, Color::Red);
    engine.update_min_max_path(n);
    engine.update_size_path(Some(n));
    engine.insert_fixup(n);
    engine.update_black_height_path(n);

    let mut root = n;
    while let Some(p) = engine.parent(root) {
        root = p;
    }
    root
}

/// Walks down the left spine of `r` to the first black node of black height `bh`.
fn find_min_with_black_height<V>(engine: &mut Engine<V>, mut r: NodeId, bh: u32) -> NodeId {
    debug_assert!(engine.node(r).black_height > bh);
    while !engine.is_aux_leaf(Some(r)) {
        let node = engine.node(r);
        if node.color == Color::Black && node.black_height == bh {
            break;
        }
        r = engine.left(r).expect("Tango node => left child");
        engine.count_aux_step();
    }
    debug_assert_eq!(engine.node(r).black_height, bh);
    r
}

/// Walks down the right spine of `l` to the first black node of black height `bh`.
fn find_max_with_black_height<V>(engine: &mut Engine<V>, mut l: NodeId, bh: u32) -> NodeId {
    debug_assert!(engine.node(l).black_height > bh);
    while !engine.is_aux_leaf(Some(l)) {
        let node = engine.node(l);
        if node.color == Color::Black && node.black_height == bh {
            break;
        }
        l = engine.right(l).expect("Tango node => right child");
        engine.count_aux_step();
    }
    debug_assert_eq!(engine.node(l).black_height, bh);
    l
}

/// Hangs `n` below the smallest node of `t`, taking over that node's left leaf.
fn attach_as_minimum<V>(engine: &mut Engine<V>, n: NodeId, t: NodeId) {
    let a = engine.minimum_child(t);
    let al = engine.left(a).expect("Tango node => left child");
    engine.detach(al, a);
    engine.attach_right(al, n);
    engine.attach_left(n, a);
    engine.update_min_max_path(n);
}

/// Hangs `n` below the largest node of `t`, taking over that node's right leaf.
fn attach_as_maximum<V>(engine: &mut Engine<V>, n: NodeId, t: NodeId) {
    let a = engine.maximum_child(t);
    let ar = engine.right(a).expect("Tango node => right child");
    engine.detach(ar, a);
    engine.attach_left(ar, n);
    engine.attach_right(n, a);
    engine.update_min_max_path(n);
}
