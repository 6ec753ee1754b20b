extern crate beicalc;

use anyhow::Context;
use beicalc::catalog::validator::validate_catalog_file;
use beicalc::config::EngineConfig;
use beicalc::output::{FileOutput, StdoutOutput};
use beicalc::{run_bei, run_compliance, write_json_output, Engine};
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct BeicalcArgs {
    #[command(subcommand)]
    command: Command,
    #[command(flatten)]
    engine: EngineArgs,
    /// directory to write results into; results go to stdout when not given
    #[arg(long, short, global = true)]
    output_dir: Option<PathBuf>,
    /// also write a per-use breakdown CSV (needs an output directory)
    #[arg(long, global = true, default_value_t = false, requires = "output_dir")]
    csv: bool,
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,
}

#[derive(Args, Clone, Default, Debug)]
struct EngineArgs {
    /// engine configuration (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// standard intensity catalog, overriding the configured one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a building against the envelope and primary energy standards
    Compliance { input_file: PathBuf },
    /// Calculate the BEI of one building (a JSON object) or a batch (a JSON array)
    Bei { input_file: PathBuf },
    /// Validate an intensity catalog file, by default the configured one
    ValidateCatalog { catalog_file: Option<PathBuf> },
    /// Query the configured intensity catalog
    #[command(subcommand)]
    Catalog(CatalogQuery),
}

#[derive(Subcommand, Debug)]
enum CatalogQuery {
    Uses,
    Zones { building_use: String },
    Intensity { building_use: String, zone: String },
}

fn main() -> anyhow::Result<()> {
    let args = BeicalcArgs::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let engine = Engine::new(&engine_config(&args.engine)?)?;

    match &args.command {
        Command::Compliance { input_file } => {
            let input = open_input(input_file)?;
            match output_dir_for(&args, input_file) {
                Some(output) => run_compliance(&engine, input, &output, args.csv)?,
                None => run_compliance(&engine, input, StdoutOutput, false)?,
            };
        }
        Command::Bei { input_file } => {
            let input = open_input(input_file)?;
            match output_dir_for(&args, input_file) {
                Some(output) => run_bei(&engine, input, &output, args.csv)?,
                None => run_bei(&engine, input, StdoutOutput, false)?,
            }
        }
        Command::ValidateCatalog { catalog_file } => {
            let validation = match catalog_file {
                Some(path) => validate_catalog_file(path),
                None => engine.validate_catalog(),
            };
            info!(summary = ?validation.summary, "validated catalog");
            write_result(&args, "catalog_validation.json", &validation)?;
            if !validation.is_valid {
                anyhow::bail!("Catalog is not valid");
            }
        }
        Command::Catalog(query) => match query {
            CatalogQuery::Uses => {
                write_result(&args, "catalog_uses.json", &engine.catalog_uses()?)?
            }
            CatalogQuery::Zones { building_use } => write_result(
                &args,
                "catalog_zones.json",
                &engine.catalog_zones(building_use)?,
            )?,
            CatalogQuery::Intensity { building_use, zone } => write_result(
                &args,
                "catalog_intensity.json",
                &engine.catalog_intensity(building_use, zone)?,
            )?,
        },
    }

    Ok(())
}

/// Configuration from the config file (or defaults), then the environment, then the flags.
fn engine_config(args: &EngineArgs) -> anyhow::Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    }
    .with_env_overrides();

    if let Some(catalog) = &args.catalog {
        config.catalog_path = catalog.clone();
    }

    Ok(config)
}

fn open_input(input_file: &Path) -> anyhow::Result<BufReader<File>> {
    Ok(BufReader::new(File::open(input_file).with_context(|| {
        format!("Could not open input file '{}'", input_file.display())
    })?))
}

/// Results for an input file are named after it, e.g. `office.json` gives `office_bei.json`.
fn output_dir_for(args: &BeicalcArgs, input_file: &Path) -> Option<FileOutput> {
    let stem = input_file
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "results".into());

    args.output_dir
        .as_ref()
        .map(|directory| FileOutput::new(directory.clone(), format!("{stem}_{{}}")))
}

fn write_result(
    args: &BeicalcArgs,
    location_key: &str,
    value: &impl serde::Serialize,
) -> anyhow::Result<()> {
    match &args.output_dir {
        Some(directory) => write_json_output(
            &FileOutput::new(directory.clone(), "{}".into()),
            location_key,
            value,
        ),
        None => write_json_output(&StdoutOutput, location_key, value),
    }
}
