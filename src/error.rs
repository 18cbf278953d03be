use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum SeqdbError {
    #[error("invalid species identifier: {0}")]
    InvalidSpecies(String),

    #[error("invalid taxonomic id: {0}")]
    InvalidTaxonId(String),

    #[error("invalid accession id: {0}")]
    InvalidAccession(String),

    #[error("unknown sampling strategy: {0}")]
    InvalidStrategy(String),

    #[error("inclusion fraction must be within [0, 1]: {0}")]
    InvalidFraction(String),

    #[error("invalid run entry: {0}")]
    InvalidRun(String),

    #[error("failed to read mapping file at {0}")]
    MappingRead(PathBuf),

    #[error("failed to parse mapping: {0}")]
    MappingParse(String),

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("failed to read allowlist at {0}")]
    AllowlistRead(PathBuf),

    #[error("failed to read source {path}: {message}")]
    SourceRead { path: String, message: String },

    #[error("failed to write output {path}: {message}")]
    OutputWrite { path: String, message: String },

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
