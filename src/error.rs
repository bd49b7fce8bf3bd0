//! Errors reported by the trees.

use thiserror::Error;

use crate::node::Key;

/// The largest number of levels a perfect tree can have while its keys still fit in a [`Key`].
pub const MAX_LEVELS: u32 = 31;

/// Errors returned by the tree operations.
///
/// A missing key is not an error: `search` and `remove` report it with `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// The tree only supports bulk construction and searching.
    #[error("preferred-path trees do not allow insertion")]
    InsertionNotSupported,
    /// The tree only supports bulk construction and searching.
    #[error("preferred-path trees do not allow removal")]
    RemovalNotSupported,
    /// The key is reserved for nil sentinels.
    #[error("key {0} is reserved for nil sentinels")]
    ReservedKey(Key),
    /// A perfect tree was requested with an unusable number of levels.
    #[error("a perfect tree needs between 1 and {max} levels, got {0}", max = MAX_LEVELS)]
    InvalidLevels(u32),
}
