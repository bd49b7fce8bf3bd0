use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::error::MAX_LEVELS;

use super::{SequenceType, TreeType};

/// Why a configuration, or the sequence file it names, can't be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file could not be read.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The configuration is not valid TOML or is missing keys.
    #[error("malformed configuration: {0}")]
    Toml(#[from] toml::de::Error),
    /// `tree_type` names no known variant.
    #[error("unknown tree type `{0}`")]
    UnknownTreeType(String),
    /// `sequence_type` names no known sequence.
    #[error("unknown sequence type `{0}`")]
    UnknownSequenceType(String),
    /// The level range is empty or out of bounds.
    #[error("levels must satisfy 1 <= min_levels <= max_levels <= {limit}, got {min}..={max}", limit = MAX_LEVELS)]
    InvalidLevels {
        /// Configured `min_levels`.
        min: u32,
        /// Configured `max_levels`.
        max: u32,
    },
    /// `num_sets` is zero.
    #[error("num_sets must be at least 1")]
    NoSets,
    /// `sequence_repetitions` is zero.
    #[error("sequence_repetitions must be at least 1")]
    NoRepetitions,
    /// A `File` sequence was requested without a `sequence_file`.
    #[error("sequence type File needs a sequence_file")]
    MissingSequenceFile,
    /// A line of the sequence file is not a key.
    #[error("line {line} of the sequence file is not a key: `{text}`")]
    BadSequenceEntry {
        /// One-based line number.
        line: usize,
        /// The offending line, trimmed.
        text: String,
    },
}

/// The on-disk shape of a configuration, before validation.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    tree_type: String,
    sequence_type: String,
    num_sets: u32,
    min_levels: u32,
    max_levels: u32,
    sequence_repetitions: u32,
    sequence_file: Option<PathBuf>,
    seed: Option<u64>,
}

/// A validated run configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// The variant to measure.
    pub tree_type: TreeType,
    /// The sequence to search.
    pub sequence_type: SequenceType,
    /// Independent runs per tree size.
    pub num_sets: u32,
    /// Smallest perfect tree, in levels.
    pub min_levels: u32,
    /// Largest perfect tree, in levels.
    pub max_levels: u32,
    /// How many sequences each run searches back to back. Random kinds draw a
    /// fresh sequence each time.
    pub sequence_repetitions: u32,
    /// Where a `File` sequence is read from.
    pub sequence_file: Option<PathBuf>,
    /// Seed for the random sequences. Runs are unrepeatable without it.
    pub seed: Option<u64>,
}

impl Config {
    /// Parses and validates a TOML configuration.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(s)?;
        let config = Self {
            tree_type: raw.tree_type.parse()?,
            sequence_type: raw.sequence_type.parse()?,
            num_sets: raw.num_sets,
            min_levels: raw.min_levels,
            max_levels: raw.max_levels,
            sequence_repetitions: raw.sequence_repetitions,
            sequence_file: raw.sequence_file,
            seed: raw.seed,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates the TOML configuration at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    /// Checks the invariants a [`Runner`](super::Runner) relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_levels == 0 || self.max_levels < self.min_levels || self.max_levels > MAX_LEVELS {
            return Err(ConfigError::InvalidLevels {
                min: self.min_levels,
                max: self.max_levels,
            });
        }
        if self.num_sets == 0 {
            return Err(ConfigError::NoSets);
        }
        if self.sequence_repetitions == 0 {
            return Err(ConfigError::NoRepetitions);
        }
        if self.sequence_type == SequenceType::File && self.sequence_file.is_none() {
            return Err(ConfigError::MissingSequenceFile);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD: &str = r#"
        tree_type = "uTango"
        sequence_type = "random"
        num_sets = 2
        min_levels = 3
        max_levels = 5
        sequence_repetitions = 4
        seed = 11
    "#;

    #[test]
    fn parses_a_full_config() {
        let config = Config::from_toml_str(GOOD).unwrap();
        assert_eq!(
            config,
            Config {
                tree_type: TreeType::UTango,
                sequence_type: SequenceType::Random,
                num_sets: 2,
                min_levels: 3,
                max_levels: 5,
                sequence_repetitions: 4,
                sequence_file: None,
                seed: Some(11),
            }
        );
    }

    #[test]
    fn rejects_bad_levels() {
        for (min, max) in [(0, 3), (5, 4), (1, 32)] {
            let text = GOOD
                .replace("min_levels = 3", &format!("min_levels = {}", min))
                .replace("max_levels = 5", &format!("max_levels = {}", max));
            assert!(matches!(
                Config::from_toml_str(&text),
                Err(ConfigError::InvalidLevels { .. })
            ));
        }
    }

    #[test]
    fn rejects_empty_runs() {
        let text = GOOD.replace("num_sets = 2", "num_sets = 0");
        assert!(matches!(Config::from_toml_str(&text), Err(ConfigError::NoSets)));

        let text = GOOD.replace("sequence_repetitions = 4", "sequence_repetitions = 0");
        assert!(matches!(Config::from_toml_str(&text), Err(ConfigError::NoRepetitions)));
    }

    #[test]
    fn file_sequence_needs_a_file() {
        let text = GOOD.replace("\"random\"", "\"File\"");
        assert!(matches!(
            Config::from_toml_str(&text),
            Err(ConfigError::MissingSequenceFile)
        ));

        let text = format!("{}\nsequence_file = \"keys.txt\"", text);
        let config = Config::from_toml_str(&text).unwrap();
        assert_eq!(config.sequence_file, Some(PathBuf::from("keys.txt")));
    }

    #[test]
    fn rejects_unknown_names_and_keys() {
        let text = GOOD.replace("\"uTango\"", "\"avl\"");
        assert!(matches!(
            Config::from_toml_str(&text),
            Err(ConfigError::UnknownTreeType(_))
        ));

        let text = format!("{}\nsequnce_file = \"typo.txt\"", GOOD);
        assert!(matches!(Config::from_toml_str(&text), Err(ConfigError::Toml(_))));

        let text = GOOD.replace("num_sets = 2", "");
        assert!(matches!(Config::from_toml_str(&text), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_reports_missing_file() {
        let path = std::env::temp_dir().join("tango-no-such-config.toml");
        assert!(matches!(Config::load(path), Err(ConfigError::Io(_))));
    }
}
