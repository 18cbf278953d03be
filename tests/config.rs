use std::fs;

use assert_matches::assert_matches;

use seqdb_sampler::config::{
    AllowlistEntry, Config, ConfigLoader, ConfigOverrides, RunEntry, RunEntryObject, SeedMode,
};
use seqdb_sampler::domain::{FirstOnlyAccessions, StrategyName};
use seqdb_sampler::error::SeqdbError;
use seqdb_sampler::selection::Strategy;

#[test]
fn default_plan_mirrors_historical_databases() {
    let resolved =
        ConfigLoader::resolve_config(Config::default(), &ConfigOverrides::default()).unwrap();
    let names: Vec<_> = resolved.runs.iter().map(|run| run.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "full_refseq",
            "only_first",
            "each_random_1",
            "each_random_2",
            "each_random_3",
            "only_gut_nature",
            "random_30_1",
            "random_30_2",
            "random_30_3",
            "random_10_1",
            "random_10_2",
            "random_10_3",
        ]
    );
    assert_eq!(resolved.seed, 42);
    assert_eq!(resolved.seed_mode, SeedMode::PerRun);
    assert!(resolved.runs[0].output_base.ends_with("db_files/full_refseq"));
    assert_eq!(resolved.mapping_path.as_str(), "mapping.json");
}

#[test]
fn per_run_seeds_follow_plan_position() {
    let resolved = ConfigLoader::resolve_config(
        Config::default(),
        &ConfigOverrides {
            seed: Some(100),
            ..ConfigOverrides::default()
        },
    )
    .unwrap();
    let seeds: Vec<_> = resolved.runs.iter().map(|run| run.seed).collect();
    assert_eq!(seeds, (100..112).collect::<Vec<u64>>());
}

#[test]
fn parses_detailed_and_shorthand_entries() {
    let config: Config = serde_json::from_str(
        r#"{
            "seed": 7,
            "first_only_accessions": "taxon",
            "allowlist": ["Foo_bar"],
            "runs": [
                "first-only",
                "random-fraction:0.25",
                {"strategy": "random-single", "name": "rs", "replicates": 2, "seed": 1000},
                {"strategy": "allowlist", "name": "picked"}
            ]
        }"#,
    )
    .unwrap();
    let resolved = ConfigLoader::resolve_config(config, &ConfigOverrides::default()).unwrap();

    let names: Vec<_> = resolved.runs.iter().map(|run| run.name.as_str()).collect();
    assert_eq!(names, vec!["only_first", "random_25", "rs_1", "rs_2", "picked"]);
    assert_eq!(
        resolved.runs[0].strategy,
        Strategy::FirstOnly {
            accessions: FirstOnlyAccessions::Taxon
        }
    );
    assert_eq!(resolved.runs[1].seed, 8);
    assert_eq!(resolved.runs[2].seed, 1000);
    assert_eq!(resolved.runs[3].seed, 1001);
    assert_matches!(&resolved.runs[4].strategy, Strategy::Allowlist(list) if list.len() == 1);
}

#[test]
fn allowlist_file_is_loaded() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("species.txt");
    fs::write(&path, "# gut isolates\nBacteroides_fragilis\n\nescherichia_coli # K-12\n").unwrap();

    let config = Config {
        allowlist: Some(AllowlistEntry::File {
            file: path.to_string_lossy().to_string(),
        }),
        runs: vec![RunEntry::Shorthand("allowlist".to_string())],
        ..Config::default()
    };
    let resolved = ConfigLoader::resolve_config(config, &ConfigOverrides::default()).unwrap();
    assert_eq!(resolved.allowlist.len(), 2);
    assert!(resolved.allowlist.contains(&"bacteroides_fragilis".parse().unwrap()));
}

#[test]
fn random_fraction_requires_fraction() {
    let config = Config {
        runs: vec![RunEntry::Detailed(RunEntryObject::new(StrategyName::RandomFraction))],
        ..Config::default()
    };
    let err = ConfigLoader::resolve_config(config, &ConfigOverrides::default()).unwrap_err();
    assert_matches!(err, SeqdbError::InvalidRun(_));
}

#[test]
fn rejects_bad_entries() {
    let bad = |entry: RunEntry| {
        let config = Config {
            runs: vec![entry],
            ..Config::default()
        };
        ConfigLoader::resolve_config(config, &ConfigOverrides::default()).unwrap_err()
    };

    assert_matches!(
        bad(RunEntry::Shorthand("sideways".to_string())),
        SeqdbError::InvalidStrategy(_)
    );
    assert_matches!(
        bad(RunEntry::Shorthand("random-fraction:2".to_string())),
        SeqdbError::InvalidFraction(_)
    );
    assert_matches!(
        bad(RunEntry::Detailed(RunEntryObject {
            replicates: Some(0),
            ..RunEntryObject::new(StrategyName::Full)
        })),
        SeqdbError::InvalidRun(_)
    );
}

#[test]
fn missing_explicit_config_is_an_error() {
    let err = ConfigLoader::resolve(Some("/nonexistent/seqdb.json"), &ConfigOverrides::default())
        .unwrap_err();
    assert_matches!(err, SeqdbError::ConfigRead(_));
}

#[test]
fn colliding_output_names_are_rejected() {
    let resolve = |runs: &[&str]| {
        let config = Config {
            runs: runs.iter().map(|run| RunEntry::Shorthand(run.to_string())).collect(),
            ..Config::default()
        };
        ConfigLoader::resolve_config(config, &ConfigOverrides::default())
    };

    assert_matches!(
        resolve(&["random-single", "random-single"]),
        Err(SeqdbError::InvalidRun(message)) if message.contains("each_random")
    );
    assert_matches!(
        resolve(&["random-fraction:0.3", "random-fraction:0.304"]),
        Err(SeqdbError::InvalidRun(message)) if message.contains("random_30")
    );
    assert!(resolve(&["random-fraction:0.3", "random-fraction:0.1"]).is_ok());
}

#[test]
fn replicate_labels_collide_with_explicit_names() {
    let config: Config = serde_json::from_str(
        r#"{"runs": [
            {"strategy": "random-single", "replicates": 2},
            {"strategy": "full", "name": "each_random_2"}
        ]}"#,
    )
    .unwrap();
    let err = ConfigLoader::resolve_config(config, &ConfigOverrides::default()).unwrap_err();
    assert_matches!(err, SeqdbError::InvalidRun(_));
}

#[test]
fn detailed_entries_accept_shorthand_spellings() {
    let config: Config = serde_json::from_str(
        r#"{"runs": [
            {"strategy": "first"},
            {"strategy": "random_fraction", "fraction": 0.2},
            {"strategy": "Random-Single"}
        ]}"#,
    )
    .unwrap();
    let resolved = ConfigLoader::resolve_config(config, &ConfigOverrides::default()).unwrap();
    let names: Vec<_> = resolved.runs.iter().map(|run| run.name.as_str()).collect();
    assert_eq!(names, vec!["only_first", "random_20", "each_random"]);

    let err = serde_json::from_str::<Config>(r#"{"runs": [{"strategy": "sideways"}]}"#);
    assert!(err.is_err());
}

#[test]
fn strategy_names_serialize_canonically() {
    let entry = RunEntryObject::new(StrategyName::RandomFraction);
    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(json["strategy"], "random-fraction");
}

#[test]
fn allowlist_file_is_relative_to_config() {
    let temp = tempfile::tempdir().unwrap();
    fs::write(temp.path().join("species.txt"), "Bacteroides_fragilis\n").unwrap();
    let config_path = temp.path().join("seqdb.json");
    fs::write(
        &config_path,
        r#"{"allowlist": {"file": "species.txt"}, "runs": ["allowlist"]}"#,
    )
    .unwrap();

    let resolved = ConfigLoader::resolve(
        Some(config_path.to_str().unwrap()),
        &ConfigOverrides::default(),
    )
    .unwrap();
    assert_eq!(resolved.allowlist.len(), 1);
    assert!(resolved.allowlist.contains(&"bacteroides_fragilis".parse().unwrap()));
}

#[test]
fn unknown_schema_version_is_rejected() {
    let config = Config {
        schema_version: Some(2),
        ..Config::default()
    };
    let err = ConfigLoader::resolve_config(config, &ConfigOverrides::default()).unwrap_err();
    assert_matches!(err, SeqdbError::ConfigParse(message) if message.contains("schema_version 2"));

    let config = Config {
        schema_version: Some(1),
        ..Config::default()
    };
    assert!(ConfigLoader::resolve_config(config, &ConfigOverrides::default()).is_ok());
}
