use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use pnad_covid::config::PipelineConfig;
use pnad_covid::domain::FIELD_SPECS;
use pnad_covid::logging;
use pnad_covid::pipeline::SummaryFilter;
use pnad_covid::{normalize_file, summarize_file};

#[derive(Parser)]
#[command(name = "pnad_covid")]
#[command(about = "PNAD-COVID-19 microdata cleaning and descriptive statistics")]
#[command(version)]
struct Cli {
    /// TOML configuration file (recoding policy, report, logging)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean a raw survey extract into the canonical dataset
    Normalize {
        /// Raw comma-separated file with survey field codes as header
        input: PathBuf,
        /// Destination for the canonical file; parent directories are created
        output: PathBuf,
        /// Also write the quality report as JSON to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Compute descriptive statistics for a canonical dataset
    Summary {
        /// Canonical comma-separated file produced by `normalize`
        input: PathBuf,
        /// Keep only this estado (exact match)
        #[arg(long)]
        estado: Option<String>,
        /// Keep only this sexo value (exact match)
        #[arg(long)]
        sexo: Option<String>,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the fixed field table
    Schema,
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let config = PipelineConfig::load_optional(cli.config.as_deref())?;
    let _log_guard = logging::init_logging(config.logging.directory.as_deref())?;

    match cli.command {
        Commands::Normalize {
            input,
            output,
            report,
        } => {
            info!(input = %input.display(), output = %output.display(), "Starting normalization");
            let outcome = normalize_file(&input, &output, report.as_deref(), &config)?;
            println!("{}", outcome.confirmation());
        }
        Commands::Summary {
            input,
            estado,
            sexo,
            json,
        } => {
            let filter = SummaryFilter { estado, sexo };
            let summary = summarize_file(&input, &filter)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{summary}");
            }
        }
        Commands::Schema => {
            println!(
                "{:<8} {:<24} {:<24} {}",
                "source", "canonical", "kind", "imputation"
            );
            for spec in FIELD_SPECS.iter() {
                println!(
                    "{:<8} {:<24} {:<24} {}",
                    spec.source_key,
                    spec.canonical_name,
                    spec.kind.name(),
                    spec.imputation
                );
            }
        }
    }
    Ok(())
}
