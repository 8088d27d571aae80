//! Athlete Pipeline CLI
//!
//! CSV feed → enriched risk rows, reconciliation report, config presets.

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "athlete_pipeline")]
#[command(about = "Athlete performance and injury-risk pipeline", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Run the engine over one or more CSV feeds
    Process {
        /// Input CSV files, concatenated in the order given
        #[arg(long = "input", short = 'i', required = true, num_args = 1..)]
        inputs: Vec<PathBuf>,

        /// Engine config file (.yaml/.yml/.json)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output file for enriched rows
        #[arg(long)]
        out: PathBuf,

        /// Output format (csv or json); guessed from --out when omitted
        #[arg(long)]
        format: Option<String>,

        /// Per-athlete summary JSON
        #[arg(long)]
        summary: Option<PathBuf>,
    },

    /// Print how every raw athlete label resolves (JSON)
    Reconcile {
        /// Input CSV files
        #[arg(long = "input", short = 'i', required = true, num_args = 1..)]
        inputs: Vec<PathBuf>,

        /// Engine config file (.yaml/.yml/.json)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Dump a configuration preset as YAML
    Config {
        /// default, legacy or strict
        #[arg(long, default_value = "default")]
        preset: String,

        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[cfg(feature = "cli")]
fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    use athlete_core::{Engine, EngineConfig};
    use athlete_pipeline::{load_config, process_files, read_sources, OutputFormat};

    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            inputs,
            config,
            out,
            format,
            summary,
        } => {
            let format = match format {
                Some(f) => f.parse::<OutputFormat>().map_err(anyhow::Error::msg)?,
                None => OutputFormat::from_path(&out),
            };
            let config = load_config(config.as_deref())?;

            println!("Processing {} input file(s)...", inputs.len());
            for input in &inputs {
                println!("   Input:  {}", input.display());
            }
            println!("   Output: {}", out.display());

            let outcome = process_files(&inputs, config, &out, format)?;
            let counts = &outcome.output.reconciliation.counts;

            println!("\nDone.");
            println!("   Rows:       {}", outcome.output.rows.len());
            println!("   Athletes:   {}", outcome.output.entity_count);
            println!(
                "   Labels:     {} exact, {} alias, {} fuzzy, {} unresolved, {} missing",
                counts.exact, counts.alias, counts.fuzzy, counts.unresolved, counts.missing
            );
            println!("   Digest:     {}", outcome.digest);

            if let Some(summary_path) = summary {
                athlete_pipeline::export::write_json_file(&summary_path, &outcome.summaries)?;
                println!("   Summary:    {}", summary_path.display());
            }
        }

        Commands::Reconcile { inputs, config } => {
            let config = load_config(config.as_deref())?;
            let observations = read_sources(&inputs)?;
            let engine = Engine::new(config).context("Invalid engine configuration")?;
            let report = engine.reconcile(&observations);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Commands::Config { preset, out } => {
            let yaml = EngineConfig::from_profile(&preset)
                .to_yaml()
                .context("Failed to render config")?;
            match out {
                Some(path) => {
                    std::fs::write(&path, yaml)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Config preset '{}' written to {}", preset, path.display());
                }
                None => print!("{}", yaml),
            }
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("athlete_pipeline CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
