use crate::engine::Engine;
use crate::node::NodeId;

use super::AuxStrategy;

/// Leaves auxiliary trees unbalanced. Splitting rotates the target up one
/// level at a time and merging only refreshes the depth range, so an
/// auxiliary tree can degrade to a list.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unbalanced;

impl AuxStrategy for Unbalanced {
    fn split<V>(&self, engine: &mut Engine<V>, n: NodeId, v_root: NodeId) -> NodeId {
        if engine.is_aux_root(n) || n == v_root {
            return n;
        }

        // Rotations hand the mark over to whichever node moves above it, so
        // the mark tells when `n` has reached the top.
        let v_mark = engine.is_marked(v_root);
        engine.mark(v_root);
        while !engine.is_marked(n) {
            let p = engine.parent(n).expect("Below the mark => parent");
            if engine.is_left_child(n) {
                engine.rotate_right(p);
            } else {
                engine.rotate_left(p);
            }
        }
        if !v_mark {
            engine.unmark(n);
        }
        n
    }

    fn merge<V>(&self, engine: &mut Engine<V>, n: NodeId) -> NodeId {
        engine.update_min_max(n);
        n
    }
}
