use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error, info};

use crate::node::Key;
use crate::stats::TreeStats;

use super::{sequence, AnyTree, Config, ConfigError, SequenceType, TreeType};

/// The counters of one tree after searching one sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunRecord {
    /// The variant searched.
    pub tree_type: TreeType,
    /// The kind of sequence searched.
    pub sequence_type: SequenceType,
    /// Levels of the perfect tree the run started from.
    pub levels: u32,
    /// Searches performed, repetitions included.
    pub sequence_len: usize,
    /// Which of the `num_sets` runs for this size.
    pub set: u32,
    /// Counters at the end of the run.
    pub stats: TreeStats,
}

impl fmt::Display for RunRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "treetype:{};seqtype:{};levels:{};seqsize:{};set:{};rot:{};trav:{};otrav:{}",
            self.tree_type,
            self.sequence_type,
            self.levels,
            self.sequence_len,
            self.set,
            self.stats.rotations,
            self.stats.main_steps,
            self.stats.aux_steps
        )
    }
}

/// Runs every level and set of a [`Config`].
#[derive(Debug)]
pub struct Runner {
    config: Config,
    rng: StdRng,
}

impl Runner {
    /// Validates `config` and seeds the random sequences from it.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self { config, rng })
    }

    /// The configuration being run.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Performs every run, in order of levels then sets.
    ///
    /// A run whose searches trip an internal check is logged and still
    /// reported, with the counters it had reached.
    pub fn run(&mut self) -> Result<Vec<RunRecord>, ConfigError> {
        let from_file = match (&self.config.sequence_type, &self.config.sequence_file) {
            (SequenceType::File, Some(path)) => Some(sequence::read_file(path)?),
            (SequenceType::File, None) => return Err(ConfigError::MissingSequenceFile),
            _ => None,
        };

        let mut records = Vec::new();
        for levels in self.config.min_levels..=self.config.max_levels {
            for set in 0..self.config.num_sets {
                let keys = match &from_file {
                    Some(keys) => sequence::repeat(keys, self.reps()),
                    None => self.generate(levels),
                };
                let record = self.run_one(levels, set, &keys);
                info!("{}", record);
                records.push(record);
            }
        }
        Ok(records)
    }

    fn reps(&self) -> usize {
        self.config.sequence_repetitions as usize
    }

    /// One fresh draw per repetition, so random sequences don't replay themselves.
    fn generate(&mut self, levels: u32) -> Vec<Key> {
        let n = ((1i64 << levels) - 1) as Key;
        let mut seq = Vec::with_capacity(n as usize * self.reps());
        for _ in 0..self.reps() {
            seq.extend(match self.config.sequence_type {
                SequenceType::Increasing => sequence::increasing(n),
                SequenceType::Decreasing => sequence::decreasing(n),
                SequenceType::Permutation => sequence::permutation(n, &mut self.rng),
                SequenceType::Random => sequence::random(n, &mut self.rng),
                SequenceType::Sqrt => sequence::sqrt(n),
                SequenceType::File => unreachable!("File sequences are read once per run"),
            });
        }
        debug!(?seq, "sequence");
        seq
    }

    fn run_one(&self, levels: u32, set: u32, keys: &[Key]) -> RunRecord {
        self.measure(AnyTree::new(self.config.tree_type), levels, set, keys)
    }

    fn measure(&self, mut tree: AnyTree, levels: u32, set: u32, keys: &[Key]) -> RunRecord {
        let tree_type = self.config.tree_type;
        let searched = panic::catch_unwind(AssertUnwindSafe(|| {
            tree.initialize_perfect_tree(levels)
                .expect("Validated config => levels in range");
            for &key in keys {
                tree.search(key);
            }
        }));
        if let Err(cause) = searched {
            let cause = cause
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| cause.downcast_ref::<String>().cloned())
                .unwrap_or_default();
            error!(%tree_type, levels, set, "search failed an internal check: {}", cause);
        }

        RunRecord {
            tree_type,
            sequence_type: self.config.sequence_type,
            levels,
            sequence_len: keys.len(),
            set,
            stats: tree.stats(),
        }
    }
}
