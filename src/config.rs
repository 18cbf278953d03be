use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use camino::Utf8PathBuf;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::allowlist::Allowlist;
use crate::app::RunRequest;
use crate::domain::{FirstOnlyAccessions, StrategyName};
use crate::error::SeqdbError;
use crate::selection::Strategy;

pub const DEFAULT_CONFIG: &str = "seqdb.json";
pub const DEFAULT_SEED: u64 = 42;
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub schema_version: Option<u32>,
    #[serde(default)]
    pub mapping: Option<String>,
    #[serde(default)]
    pub protein_dir: Option<String>,
    #[serde(default)]
    pub nucleotide_dir: Option<String>,
    #[serde(default)]
    pub output_dir: Option<String>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub seed_mode: Option<SeedMode>,
    #[serde(default)]
    pub first_only_accessions: Option<FirstOnlyAccessions>,
    #[serde(default)]
    pub allowlist: Option<AllowlistEntry>,
    #[serde(default)]
    pub runs: Vec<RunEntry>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AllowlistEntry {
    Inline(Vec<String>),
    File { file: String },
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RunEntry {
    Shorthand(String),
    Detailed(RunEntryObject),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunEntryObject {
    pub strategy: StrategyName,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub fraction: Option<f64>,
    #[serde(default)]
    pub replicates: Option<u32>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub first_only_accessions: Option<FirstOnlyAccessions>,
}

impl RunEntryObject {
    pub fn new(strategy: StrategyName) -> Self {
        Self {
            strategy,
            name: None,
            fraction: None,
            replicates: None,
            seed: None,
            first_only_accessions: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SeedMode {
    Shared,
    #[default]
    PerRun,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub seed: Option<u64>,
    pub seed_mode: Option<SeedMode>,
    pub first_only_accessions: Option<FirstOnlyAccessions>,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub mapping_path: Utf8PathBuf,
    pub protein_dir: Utf8PathBuf,
    pub nucleotide_dir: Utf8PathBuf,
    pub output_dir: Utf8PathBuf,
    pub seed: u64,
    pub seed_mode: SeedMode,
    pub first_only_accessions: FirstOnlyAccessions,
    pub allowlist: Allowlist,
    pub runs: Vec<RunRequest>,
}

impl ResolvedConfig {
    pub fn expand(&self, entry: &RunEntry, position: usize) -> Result<Vec<RunRequest>, SeqdbError> {
        let entry = match entry {
            RunEntry::Shorthand(value) => parse_shorthand(value)?,
            RunEntry::Detailed(obj) => obj.clone(),
        };

        let strategy = match entry.strategy {
            StrategyName::Full => Strategy::Full,
            StrategyName::FirstOnly => Strategy::FirstOnly {
                accessions: entry
                    .first_only_accessions
                    .unwrap_or(self.first_only_accessions),
            },
            StrategyName::RandomSingle => Strategy::RandomSingle,
            StrategyName::RandomFraction => {
                let fraction = entry.fraction.ok_or_else(|| {
                    SeqdbError::InvalidRun("random-fraction requires a fraction".to_string())
                })?;
                Strategy::random_fraction(fraction)?
            }
            StrategyName::Allowlist => Strategy::Allowlist(self.allowlist.clone()),
        };

        let name = entry
            .name
            .clone()
            .unwrap_or_else(|| default_run_name(&strategy));
        if name.trim().is_empty() || name.contains('/') {
            return Err(SeqdbError::InvalidRun(format!("invalid run name: {name:?}")));
        }

        let replicates = entry.replicates.unwrap_or(1);
        if replicates == 0 {
            return Err(SeqdbError::InvalidRun(format!(
                "{name}: replicates must be at least 1"
            )));
        }

        Ok((0..replicates)
            .map(|replicate| {
                let label = if replicates > 1 {
                    format!("{name}_{}", replicate + 1)
                } else {
                    name.clone()
                };
                let seed = match entry.seed {
                    Some(seed) => seed.wrapping_add(u64::from(replicate)),
                    None => self
                        .seed
                        .wrapping_add((position + replicate as usize) as u64),
                };
                RunRequest {
                    output_base: self.output_dir.join(&label),
                    name: label,
                    strategy: strategy.clone(),
                    seed,
                }
            })
            .collect())
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn resolve(
        path: Option<&str>,
        overrides: &ConfigOverrides,
    ) -> Result<ResolvedConfig, SeqdbError> {
        let path = match path {
            Some(path) => Some(Path::new(path)),
            None if Path::new(DEFAULT_CONFIG).exists() => Some(Path::new(DEFAULT_CONFIG)),
            None => None,
        };
        match path {
            Some(path) => {
                let config = Self::read(path)?;
                let base_dir = path.parent().unwrap_or(Path::new(""));
                Self::resolve_config_in(config, base_dir, overrides)
            }
            None => Self::resolve_config(Config::default(), overrides),
        }
    }

    pub fn read(path: &Path) -> Result<Config, SeqdbError> {
        let content =
            fs::read_to_string(path).map_err(|_| SeqdbError::ConfigRead(PathBuf::from(path)))?;
        serde_json::from_str(&content).map_err(|err| SeqdbError::ConfigParse(err.to_string()))
    }

    pub fn resolve_config(
        config: Config,
        overrides: &ConfigOverrides,
    ) -> Result<ResolvedConfig, SeqdbError> {
        Self::resolve_config_in(config, Path::new(""), overrides)
    }

    // Relative allowlist files are looked up under `base_dir`.
    pub fn resolve_config_in(
        config: Config,
        base_dir: &Path,
        overrides: &ConfigOverrides,
    ) -> Result<ResolvedConfig, SeqdbError> {
        if let Some(version) = config.schema_version {
            if version != SCHEMA_VERSION {
                return Err(SeqdbError::ConfigParse(format!(
                    "unsupported schema_version {version}"
                )));
            }
        }

        let allowlist = match config.allowlist {
            None => Allowlist::gut_microbiota(),
            Some(AllowlistEntry::Inline(species)) => Allowlist::new(species),
            Some(AllowlistEntry::File { file }) => Allowlist::from_file(&base_dir.join(file))?,
        };

        let mut resolved = ResolvedConfig {
            mapping_path: Utf8PathBuf::from(config.mapping.unwrap_or_else(|| "mapping.json".to_string())),
            protein_dir: Utf8PathBuf::from(config.protein_dir.unwrap_or_else(|| "prot".to_string())),
            nucleotide_dir: Utf8PathBuf::from(
                config.nucleotide_dir.unwrap_or_else(|| "nucl".to_string()),
            ),
            output_dir: Utf8PathBuf::from(config.output_dir.unwrap_or_else(|| "db_files".to_string())),
            seed: overrides.seed.or(config.seed).unwrap_or(DEFAULT_SEED),
            seed_mode: overrides.seed_mode.or(config.seed_mode).unwrap_or_default(),
            first_only_accessions: overrides
                .first_only_accessions
                .or(config.first_only_accessions)
                .unwrap_or_default(),
            allowlist,
            runs: Vec::new(),
        };

        let entries = if config.runs.is_empty() {
            default_runs()
        } else {
            config.runs
        };
        let mut bases = HashSet::new();
        for entry in &entries {
            let requests = resolved.expand(entry, resolved.runs.len())?;
            for request in &requests {
                if !bases.insert(request.output_base.clone()) {
                    return Err(SeqdbError::InvalidRun(format!(
                        "duplicate output name {}",
                        request.output_base
                    )));
                }
            }
            resolved.runs.extend(requests);
        }

        Ok(resolved)
    }
}

pub fn default_runs() -> Vec<RunEntry> {
    let entry = |strategy, name: &str, fraction: Option<f64>, replicates: u32| {
        RunEntry::Detailed(RunEntryObject {
            name: Some(name.to_string()),
            fraction,
            replicates: Some(replicates),
            ..RunEntryObject::new(strategy)
        })
    };
    vec![
        entry(StrategyName::Full, "full_refseq", None, 1),
        entry(StrategyName::FirstOnly, "only_first", None, 1),
        entry(StrategyName::RandomSingle, "each_random", None, 3),
        entry(StrategyName::Allowlist, "only_gut_nature", None, 1),
        entry(StrategyName::RandomFraction, "random_30", Some(0.3), 3),
        entry(StrategyName::RandomFraction, "random_10", Some(0.1), 3),
    ]
}

pub fn default_run_name(strategy: &Strategy) -> String {
    match strategy {
        Strategy::Full => "full_refseq".to_string(),
        Strategy::FirstOnly { .. } => "only_first".to_string(),
        Strategy::RandomSingle => "each_random".to_string(),
        Strategy::RandomFraction { fraction } => format!("random_{}", (fraction * 100.0).round()),
        Strategy::Allowlist(_) => "only_gut_nature".to_string(),
    }
}

fn parse_shorthand(value: &str) -> Result<RunEntryObject, SeqdbError> {
    let (name, fraction) = match value.split_once(':') {
        Some((name, fraction)) => {
            let fraction = fraction
                .trim()
                .parse::<f64>()
                .map_err(|_| SeqdbError::InvalidFraction(fraction.to_string()))?;
            (name, Some(fraction))
        }
        None => (value, None),
    };
    let strategy: StrategyName = name.parse()?;
    if fraction.is_some() && strategy != StrategyName::RandomFraction {
        return Err(SeqdbError::InvalidRun(format!(
            "{strategy} does not take a fraction"
        )));
    }
    Ok(RunEntryObject {
        fraction,
        ..RunEntryObject::new(strategy)
    })
}
