use std::fs;

use tango::harness::{Config, ConfigError, Runner, SequenceType, TreeType};

fn config(tree_type: &str, sequence_type: &str) -> String {
    format!(
        r#"
        tree_type = "{}"
        sequence_type = "{}"
        num_sets = 1
        min_levels = 3
        max_levels = 6
        sequence_repetitions = 3
        seed = 1234
        "#,
        tree_type, sequence_type
    )
}

#[test]
fn every_tree_and_sequence_runs() {
    for tree_type in TreeType::ALL {
        for sequence_type in SequenceType::ALL {
            if sequence_type == SequenceType::File {
                continue;
            }
            let text = config(&tree_type.to_string(), &sequence_type.to_string());
            let config = Config::from_toml_str(&text).unwrap();
            let records = Runner::new(config).unwrap().run().unwrap();

            assert_eq!(records.len(), 4);
            for (record, levels) in records.iter().zip(3..) {
                assert_eq!(record.tree_type, tree_type);
                assert_eq!(record.sequence_type, sequence_type);
                assert_eq!(record.levels, levels);
                assert_eq!(record.sequence_len, 3 * ((1 << levels) - 1));
                assert!(record.stats.main_steps >= record.sequence_len as u64);
            }
        }
    }
}

#[test]
fn plain_tree_cost_is_symmetric() {
    let run = |sequence_type: &str| {
        let config = Config::from_toml_str(&config("basic", sequence_type)).unwrap();
        Runner::new(config).unwrap().run().unwrap()
    };
    let up = run("increasing");
    let down = run("decreasing");

    // A perfect tree is its own mirror image.
    for (u, d) in up.iter().zip(&down) {
        assert_eq!(u.stats, d.stats);
        assert_eq!(u.stats.rotations, 0);
        assert_eq!(u.stats.aux_steps, 0);
    }
    // 1 + 2*2 + 4*3 visits for each pass over a 3-level tree.
    assert_eq!(up[0].stats.main_steps, 3 * 17);
}

#[test]
fn file_sequence_is_read_from_disk() {
    let dir = std::env::temp_dir().join(format!("tango-harness-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let keys = dir.join("keys.txt");
    fs::write(&keys, "5\n1\n\n7\n").unwrap();
    let config_path = dir.join("run.toml");
    fs::write(
        &config_path,
        format!(
            "{}\nsequence_file = {:?}\n",
            config("RedBlack", "File"),
            keys.to_string_lossy()
        ),
    )
    .unwrap();

    let config = Config::load(&config_path).unwrap();
    let records = Runner::new(config).unwrap().run().unwrap();

    assert_eq!(records.len(), 4);
    assert!(records.iter().all(|r| r.sequence_len == 9));
    assert!(records[0].to_string().starts_with("treetype:RedBlack;seqtype:File;levels:3;seqsize:9;set:0;"));

    fs::write(&keys, "5\nseven\n").unwrap();
    let config = Config::load(&config_path).unwrap();
    assert!(matches!(
        Runner::new(config).unwrap().run(),
        Err(ConfigError::BadSequenceEntry { line: 2, .. })
    ));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn configuration_errors_are_fatal() {
    assert!(matches!(
        Config::from_toml_str(&config("bogus", "Sqrt")),
        Err(ConfigError::UnknownTreeType(_))
    ));
    assert!(matches!(
        Config::from_toml_str(&config("Splay", "bogus")),
        Err(ConfigError::UnknownSequenceType(_))
    ));
    assert!(matches!(
        Config::from_toml_str("tree_type = 3"),
        Err(ConfigError::Toml(_))
    ));
}
