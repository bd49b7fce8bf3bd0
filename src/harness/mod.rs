//! Statistics runner.
//!
//! A [`Config`] names one tree variant, one kind of search sequence and a
//! range of perfect-tree sizes. [`Runner::run`] builds the tree for every
//! size and set, searches the generated sequence and reports the counters of
//! each run as a [`RunRecord`].
//!
//! ```toml
//! tree_type = "rbTango"
//! sequence_type = "Permutation"
//! num_sets = 3
//! min_levels = 4
//! max_levels = 12
//! sequence_repetitions = 2
//! seed = 7
//! ```

mod config;
mod runner;
pub mod sequence;

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::node::Key;
use crate::plain::PlainTree;
use crate::red_black::RedBlackTree;
use crate::splay::SplayTree;
use crate::stats::TreeStats;
use crate::tango::{RedBlackTango, UnbalancedTango};
use crate::tree::SearchTree;

pub use config::{Config, ConfigError};
pub use runner::{RunRecord, Runner};

/// The tree variant a run measures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TreeType {
    /// [`PlainTree`]
    Basic,
    /// [`RedBlackTree`]
    RedBlack,
    /// [`SplayTree`]
    Splay,
    /// [`RedBlackTango`]
    RbTango,
    /// [`UnbalancedTango`]
    UTango,
}

impl TreeType {
    /// Every variant, in the order they are usually reported.
    pub const ALL: [TreeType; 5] = [
        TreeType::Basic,
        TreeType::RedBlack,
        TreeType::Splay,
        TreeType::RbTango,
        TreeType::UTango,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::RedBlack => "RedBlack",
            Self::Splay => "Splay",
            Self::RbTango => "rbTango",
            Self::UTango => "uTango",
        }
    }
}

impl fmt::Display for TreeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TreeType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownTreeType(s.to_owned()))
    }
}

/// The kind of search sequence a run replays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SequenceType {
    /// Keys read from a file, one per line.
    File,
    /// `1, 2, ..., n`
    Increasing,
    /// `n, n - 1, ..., 1`
    Decreasing,
    /// Every key once, in random order.
    Permutation,
    /// `n` keys drawn uniformly with replacement.
    Random,
    /// Every key once, striding by `floor(sqrt n)`.
    Sqrt,
}

impl SequenceType {
    /// Every kind of sequence.
    pub const ALL: [SequenceType; 6] = [
        SequenceType::File,
        SequenceType::Increasing,
        SequenceType::Decreasing,
        SequenceType::Permutation,
        SequenceType::Random,
        SequenceType::Sqrt,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::File => "File",
            Self::Increasing => "Increasing",
            Self::Decreasing => "Decreasing",
            Self::Permutation => "Permutation",
            Self::Random => "Random",
            Self::Sqrt => "Sqrt",
        }
    }
}

impl fmt::Display for SequenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SequenceType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownSequenceType(s.to_owned()))
    }
}

/// One tree of any variant, keyed and valued by [`Key`].
#[derive(Clone, Debug)]
pub(crate) enum AnyTree {
    Basic(PlainTree<Key>),
    RedBlack(RedBlackTree<Key>),
    Splay(SplayTree<Key>),
    RbTango(RedBlackTango<Key>),
    UTango(UnbalancedTango<Key>),
    /// A plain tree that panics when searched for the given key.
    #[cfg(test)]
    Faulty(PlainTree<Key>, Key),
}

impl AnyTree {
    pub(crate) fn new(tree_type: TreeType) -> Self {
        match tree_type {
            TreeType::Basic => Self::Basic(PlainTree::new()),
            TreeType::RedBlack => Self::RedBlack(RedBlackTree::new()),
            TreeType::Splay => Self::Splay(SplayTree::new()),
            TreeType::RbTango => Self::RbTango(RedBlackTango::new()),
            TreeType::UTango => Self::UTango(UnbalancedTango::new()),
        }
    }

    pub(crate) fn initialize_perfect_tree(&mut self, levels: u32) -> Result<(), Error> {
        match self {
            Self::Basic(t) => t.initialize_perfect_tree(levels),
            Self::RedBlack(t) => t.initialize_perfect_tree(levels),
            Self::Splay(t) => t.initialize_perfect_tree(levels),
            Self::RbTango(t) => t.initialize_perfect_tree(levels),
            Self::UTango(t) => t.initialize_perfect_tree(levels),
            #[cfg(test)]
            Self::Faulty(t, _) => t.initialize_perfect_tree(levels),
        }
    }

    pub(crate) fn search(&mut self, key: Key) -> Option<Key> {
        match self {
            Self::Basic(t) => t.search(key).copied(),
            Self::RedBlack(t) => t.search(key).copied(),
            Self::Splay(t) => t.search(key).copied(),
            Self::RbTango(t) => t.search(key).copied(),
            Self::UTango(t) => t.search(key).copied(),
            #[cfg(test)]
            Self::Faulty(t, bad) => {
                assert_ne!(key, *bad, "searched the faulty key");
                t.search(key).copied()
            }
        }
    }

    pub(crate) fn stats(&self) -> TreeStats {
        match self {
            Self::Basic(t) => t.stats(),
            Self::RedBlack(t) => t.stats(),
            Self::Splay(t) => t.stats(),
            Self::RbTango(t) => t.stats(),
            Self::UTango(t) => t.stats(),
            #[cfg(test)]
            Self::Faulty(t, _) => t.stats(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_type_names() {
        assert_eq!("rbtango".parse::<TreeType>().unwrap(), TreeType::RbTango);
        assert_eq!("  UTANGO ".parse::<TreeType>().unwrap(), TreeType::UTango);
        assert_eq!("redBlack".parse::<TreeType>().unwrap(), TreeType::RedBlack);
        for t in TreeType::ALL {
            assert_eq!(t.to_string().parse::<TreeType>().unwrap(), t);
        }
        assert!(matches!(
            "avl".parse::<TreeType>(),
            Err(ConfigError::UnknownTreeType(name)) if name == "avl"
        ));
    }

    #[test]
    fn sequence_type_names() {
        assert_eq!("sqrt".parse::<SequenceType>().unwrap(), SequenceType::Sqrt);
        assert_eq!("PERMUTATION".parse::<SequenceType>().unwrap(), SequenceType::Permutation);
        assert!(matches!(
            "zigzag".parse::<SequenceType>(),
            Err(ConfigError::UnknownSequenceType(_))
        ));
    }

    #[test]
    fn every_variant_finds_every_key() {
        for t in TreeType::ALL {
            let mut tree = AnyTree::new(t);
            tree.initialize_perfect_tree(5).unwrap();
            for key in (1..32).rev() {
                assert_eq!(tree.search(key), Some(key), "{} lost {}", t, key);
            }
            assert!(tree.stats().main_steps > 0);
        }
    }
}
