use std::io::{self, Write};

use serde::Serialize;

use crate::app::{BuildResult, ProgressEvent, ProgressSink, RunResult};
use crate::config::{ResolvedConfig, SeedMode};
use crate::store::OutputPair;

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Human,
    Json,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanView {
    pub mapping: String,
    pub protein_dir: String,
    pub nucleotide_dir: String,
    pub seed: u64,
    pub seed_mode: SeedMode,
    pub runs: Vec<PlanEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanEntry {
    pub name: String,
    pub strategy: String,
    pub seed: u64,
    pub protein_output: String,
    pub nucleotide_output: String,
}

impl From<&ResolvedConfig> for PlanView {
    fn from(config: &ResolvedConfig) -> Self {
        Self {
            mapping: config.mapping_path.to_string(),
            protein_dir: config.protein_dir.to_string(),
            nucleotide_dir: config.nucleotide_dir.to_string(),
            seed: config.seed,
            seed_mode: config.seed_mode,
            runs: config
                .runs
                .iter()
                .map(|run| {
                    let outputs = OutputPair::from_base(&run.output_base);
                    PlanEntry {
                        name: run.name.clone(),
                        strategy: run.strategy.to_string(),
                        seed: match config.seed_mode {
                            SeedMode::Shared => config.seed,
                            SeedMode::PerRun => run.seed,
                        },
                        protein_output: outputs.protein.to_string(),
                        nucleotide_output: outputs.nucleotide.to_string(),
                    }
                })
                .collect(),
        }
    }
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_build(result: &BuildResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_plan(plan: &PlanView) -> io::Result<()> {
        Self::print_json(plan)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

impl ProgressSink for JsonOutput {
    fn event(&self, _event: ProgressEvent) {}
}

pub struct ConsoleOutput;

impl ConsoleOutput {
    pub fn print_build(result: &BuildResult) -> io::Result<()> {
        for run in &result.runs {
            Self::print_run(run)?;
        }
        Ok(())
    }

    pub fn print_run(run: &RunResult) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        let marker = if run.dry_run { " (dry run)" } else { "" };
        writeln!(stdout, "{} [{}]{marker}", run.name, run.strategy)?;
        writeln!(
            stdout,
            "   species: {} processed, {} skipped",
            run.outcome.species_processed.len(),
            run.outcome.species_skipped.len()
        )?;
        writeln!(
            stdout,
            "   protein: {} of {} records -> {}",
            run.outcome.protein.records_kept,
            run.outcome.protein.records_seen,
            run.outcome.protein_output
        )?;
        writeln!(
            stdout,
            "   nucleotide: {} of {} records -> {}",
            run.outcome.nucleotide.records_kept,
            run.outcome.nucleotide.records_seen,
            run.outcome.nucleotide_output
        )?;
        Ok(())
    }

    pub fn print_plan(plan: &PlanView) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "mapping: {}", plan.mapping)?;
        writeln!(stdout, "sources: {} / {}", plan.protein_dir, plan.nucleotide_dir)?;
        for run in &plan.runs {
            writeln!(
                stdout,
                "{:<20} {:<32} seed={:<6} {}",
                run.name, run.strategy, run.seed, run.protein_output
            )?;
        }
        Ok(())
    }
}

impl ProgressSink for ConsoleOutput {
    fn event(&self, event: ProgressEvent) {
        match event.elapsed {
            Some(elapsed) => eprintln!("{} ({:.2?})", event.message, elapsed),
            None => eprintln!("{}", event.message),
        }
    }
}
