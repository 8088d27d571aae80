//! Athlete Pipeline Library
//!
//! CSV feed → [`athlete_core::Engine`] → flat CSV/JSON rows and reports.

pub mod export;
pub mod ingest;

pub use export::{write_rows, EnrichedRow, OutputFormat};
pub use ingest::{read_csv, read_sources, IngestError};

use anyhow::{Context, Result};
use athlete_core::{
    output_digest, summarize, Engine, EngineConfig, EntitySummary, RunOutput,
};
use std::path::{Path, PathBuf};
use tracing::info;

/// Result of a file-to-file run
#[derive(Debug)]
pub struct ProcessOutcome {
    pub output: RunOutput,
    pub summaries: Vec<EntitySummary>,
    pub digest: String,
}

/// Explicit config file, else `ATHLETE_ENGINE_CONFIG` / `ATHLETE_ENGINE_PROFILE`.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(p) => EngineConfig::from_path(p)
            .with_context(|| format!("Failed to load config: {}", p.display())),
        None => EngineConfig::from_env_or_default().context("Failed to load config from environment"),
    }
}

/// Ingest `inputs`, run the engine, write rows to `out`.
pub fn process_files(
    inputs: &[PathBuf],
    config: EngineConfig,
    out: &Path,
    format: OutputFormat,
) -> Result<ProcessOutcome> {
    let observations = read_sources(inputs)?;
    let engine = Engine::new(config).context("Invalid engine configuration")?;
    let output = engine.run(observations);

    write_rows(out, &output.rows, format)?;
    let digest = output_digest(&output.rows)?;
    info!(out = %out.display(), digest = %digest, "wrote enriched rows");

    Ok(ProcessOutcome {
        summaries: summarize(&output.rows),
        output,
        digest,
    })
}
