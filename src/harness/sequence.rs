//! Search sequences over the keys `1..=n` of a perfect tree.

use std::fs;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::node::Key;

use super::ConfigError;

/// `1, 2, ..., n`
pub fn increasing(n: Key) -> Vec<Key> {
    info!("generating increasing sequence from 1 to {}", n);
    (1..=n).collect()
}

/// `n, n - 1, ..., 1`
pub fn decreasing(n: Key) -> Vec<Key> {
    info!("generating decreasing sequence from {} to 1", n);
    (1..=n).rev().collect()
}

/// Every key of `1..=n` once, shuffled.
pub fn permutation<R: Rng + ?Sized>(n: Key, rng: &mut R) -> Vec<Key> {
    info!("generating random permutation of 1 to {}", n);
    let mut keys: Vec<Key> = (1..=n).collect();
    keys.shuffle(rng);
    keys
}

/// `n` keys drawn uniformly from `1..=n`.
pub fn random<R: Rng + ?Sized>(n: Key, rng: &mut R) -> Vec<Key> {
    info!("generating {} random keys between 1 and {}", n, n);
    (0..n).map(|_| rng.gen_range(1..=n)).collect()
}

/// Every key of `1..=n` once: with `s = floor(sqrt n)`, the runs
/// `i, i + s, i + 2s, ...` for `i` in `1..=s`.
pub fn sqrt(n: Key) -> Vec<Key> {
    let s = (f64::from(n)).sqrt() as Key;
    info!("generating square root sequence from 1 to {} with stride {}", n, s);

    let mut keys = Vec::with_capacity(usize::try_from(n).unwrap_or_default());
    for i in 1..=s {
        let mut key = i;
        while key <= n {
            keys.push(key);
            key += s;
        }
    }
    keys
}

/// Parses one key per non-blank line.
pub fn parse(text: &str) -> Result<Vec<Key>, ConfigError> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .map(|(i, line)| {
            line.parse().map_err(|_| ConfigError::BadSequenceEntry {
                line: i + 1,
                text: line.to_owned(),
            })
        })
        .collect()
}

/// Reads a sequence written one key per line.
pub fn read_file(path: &Path) -> Result<Vec<Key>, ConfigError> {
    info!("reading sequence from {}", path.display());
    let keys = parse(&fs::read_to_string(path)?)?;
    debug!(len = keys.len(), "read sequence");
    Ok(keys)
}

/// `keys` played back `reps` times in a row. Only for sequences that don't
/// change between repetitions.
pub fn repeat(keys: &[Key], reps: usize) -> Vec<Key> {
    let seq = keys.repeat(reps);
    debug!(?seq, "sequence");
    seq
}
