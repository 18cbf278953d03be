use std::time::{Duration, Instant};

use camino::Utf8PathBuf;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::Serialize;

use crate::config::{ResolvedConfig, SeedMode};
use crate::domain::Molecule;
use crate::error::SeqdbError;
use crate::filter::{FilterStats, filter_file};
use crate::header::{nucleotide_key, protein_key};
use crate::mapping::MappingStore;
use crate::selection::{Selection, Strategy};
use crate::store::{OutputPair, SourceStore};

#[derive(Debug, Clone)]
pub struct RunRequest {
    pub name: String,
    pub output_base: Utf8PathBuf,
    pub strategy: Strategy,
    pub seed: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub fresh: bool,
    pub dry_run: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            fresh: true,
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    EmptySelection,
    MissingProteinSource,
    MissingNucleotideSource,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedSpecies {
    pub species: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateResult {
    pub protein_output: String,
    pub nucleotide_output: String,
    pub species_processed: Vec<String>,
    pub species_skipped: Vec<SkippedSpecies>,
    pub protein: FilterStats,
    pub nucleotide: FilterStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub name: String,
    pub strategy: String,
    pub seed: u64,
    pub dry_run: bool,
    pub generated_at: String,
    pub taxa_selected: usize,
    pub accessions_selected: usize,
    #[serde(flatten)]
    pub outcome: GenerateResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildResult {
    pub runs: Vec<RunResult>,
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
    pub elapsed: Option<Duration>,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

pub struct App {
    store: SourceStore,
    mapping: MappingStore,
}

impl App {
    pub fn new(store: SourceStore, mapping: MappingStore) -> Self {
        Self { store, mapping }
    }

    pub fn build(
        &self,
        config: &ResolvedConfig,
        options: RunOptions,
        sink: &dyn ProgressSink,
    ) -> Result<BuildResult, SeqdbError> {
        let mut runs = Vec::with_capacity(config.runs.len());
        match config.seed_mode {
            SeedMode::Shared => {
                let mut rng = SmallRng::seed_from_u64(config.seed);
                for request in &config.runs {
                    runs.push(self.run_with(request, config.seed, &mut rng, options, sink)?);
                }
            }
            SeedMode::PerRun => {
                for request in &config.runs {
                    runs.push(self.run(request, options, sink)?);
                }
            }
        }
        Ok(BuildResult { runs })
    }

    pub fn run(
        &self,
        request: &RunRequest,
        options: RunOptions,
        sink: &dyn ProgressSink,
    ) -> Result<RunResult, SeqdbError> {
        let mut rng = SmallRng::seed_from_u64(request.seed);
        self.run_with(request, request.seed, &mut rng, options, sink)
    }

    fn run_with(
        &self,
        request: &RunRequest,
        seed: u64,
        rng: &mut SmallRng,
        options: RunOptions,
        sink: &dyn ProgressSink,
    ) -> Result<RunResult, SeqdbError> {
        let selection = request.strategy.select(&self.mapping, rng);
        tracing::info!(
            run = %request.name,
            strategy = %request.strategy,
            species = selection.len(),
            taxa = selection.taxon_count(),
            accessions = selection.accession_count(),
            "selection ready"
        );
        sink.event(ProgressEvent {
            message: format!("phase=Select; {} ({})", request.name, request.strategy),
            elapsed: None,
        });

        let outputs = OutputPair::from_base(&request.output_base);
        let outcome = self.generate(&selection, &outputs, options, sink)?;

        Ok(RunResult {
            name: request.name.clone(),
            strategy: request.strategy.to_string(),
            seed,
            dry_run: options.dry_run,
            generated_at: chrono::Utc::now().to_rfc3339(),
            taxa_selected: selection.taxon_count(),
            accessions_selected: selection.accession_count(),
            outcome,
        })
    }

    /// Appends the selected records of every qualifying species to `outputs`.
    ///
    /// A species is skipped when it selects no taxa or lacks either source
    /// file. Species are written in selection order, records in source order.
    pub fn generate(
        &self,
        selection: &Selection,
        outputs: &OutputPair,
        options: RunOptions,
        sink: &dyn ProgressSink,
    ) -> Result<GenerateResult, SeqdbError> {
        if !options.dry_run {
            outputs.prepare(options.fresh)?;
        }

        let mut result = GenerateResult {
            protein_output: outputs.protein.to_string(),
            nucleotide_output: outputs.nucleotide.to_string(),
            species_processed: Vec::new(),
            species_skipped: Vec::new(),
            protein: FilterStats::default(),
            nucleotide: FilterStats::default(),
        };

        for entry in selection.iter() {
            let sources = if entry.taxa.is_empty() {
                Err(SkipReason::EmptySelection)
            } else {
                match (
                    self.store.locate_source(Molecule::Protein, &entry.species),
                    self.store.locate_source(Molecule::Nucleotide, &entry.species),
                ) {
                    (None, _) => Err(SkipReason::MissingProteinSource),
                    (Some(_), None) => Err(SkipReason::MissingNucleotideSource),
                    (Some(protein), Some(nucleotide)) => Ok((protein, nucleotide)),
                }
            };

            let (protein_source, nucleotide_source) = match sources {
                Ok(paths) => paths,
                Err(reason) => {
                    tracing::debug!(species = %entry.species, ?reason, "skipping species");
                    result.species_skipped.push(SkippedSpecies {
                        species: entry.species.to_string(),
                        reason,
                    });
                    continue;
                }
            };

            if !options.dry_run {
                let start = Instant::now();
                result.protein += filter_file(
                    &protein_source,
                    &outputs.protein,
                    protein_key,
                    |key| entry.keeps_taxon(key),
                )?;
                result.nucleotide += filter_file(
                    &nucleotide_source,
                    &outputs.nucleotide,
                    nucleotide_key,
                    |key| entry.keeps_accession(key),
                )?;
                sink.event(ProgressEvent {
                    message: format!("phase=Filter; {}", entry.species),
                    elapsed: Some(start.elapsed()),
                });
            }
            result.species_processed.push(entry.species.to_string());
        }

        tracing::info!(
            protein = %outputs.protein,
            nucleotide = %outputs.nucleotide,
            processed = result.species_processed.len(),
            skipped = result.species_skipped.len(),
            "database pair written"
        );
        Ok(result)
    }
}
