//! Work counters.

use std::fmt;

/// Counters describing the work a tree has done since it was constructed.
///
/// A tree hands out copies of its counters, so a `TreeStats` is a snapshot and
/// never changes after it is returned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Single rotations performed.
    pub rotations: u64,
    /// Nodes visited by key-guided searches from the root.
    pub main_steps: u64,
    /// Nodes visited by every other walk (predecessor/successor, min/max, etc).
    pub aux_steps: u64,
}

impl fmt::Display for TreeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TreeStats: rot={},trav={},otrav={}",
            self.rotations, self.main_steps, self.aux_steps
        )
    }
}
