//! Random Map Generator - Development Tools

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rmg_core::settings::MapSettings;
use rmg_tools::output::{write_export_file, OutputFormat};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "rmg-tools")]
#[command(about = "Development tools for the random map generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the sample map and write its export
    Generate {
        /// Random seed
        #[arg(long, default_value_t = rmg_core::rng::DEFAULT_SEED)]
        seed: u64,
        /// Map edge length in tiles
        #[arg(long, default_value_t = 128)]
        size: u32,
        /// Settings file; `--seed` and `--size` are ignored when given
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Output file (defaults to `map.<ext>`)
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Output encoding
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Validate a settings file
    Validate {
        /// Path to a RON settings file
        path: PathBuf,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            seed,
            size,
            settings,
            output,
            format,
        } => generate(seed, size, settings, output, format),
        Commands::Validate { path } => validate(&path),
    };

    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn generate(
    seed: u64,
    size: u32,
    settings: Option<PathBuf>,
    output: Option<PathBuf>,
    format: OutputFormat,
) -> rmg_tools::error::Result<()> {
    let settings = match settings {
        Some(path) => rmg_tools::validate::validate_settings_file(&path)?,
        None => {
            let settings = MapSettings::default().with_seed(seed).with_size(size);
            settings.validate()?;
            settings
        }
    };
    tracing::info!(seed = settings.seed, size = settings.size, "Generating sample map");

    let export = rmg_tools::recipes::generate_sample(&settings)?;
    let output = output.unwrap_or_else(|| PathBuf::from(format!("map.{}", format.extension())));
    write_export_file(&export, format, &output)
}

fn validate(path: &std::path::Path) -> rmg_tools::error::Result<()> {
    tracing::info!("Validating settings file: {}", path.display());
    let settings = rmg_tools::validate::validate_settings_file(path)?;
    println!("{}", rmg_tools::validate::normalized_settings(&settings)?);
    tracing::info!("Validation passed");
    Ok(())
}
