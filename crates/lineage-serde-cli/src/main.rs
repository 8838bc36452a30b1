use std::fs::File;
use std::io::{Read, stdin};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use lineage_serde::atlan::{self, DatabaseRecord, ProcessRecord, SchemaRecord, TableRecord};
use lineage_serde::{Options, Style};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Normalized event JSON for the lineage API
    Lineage,
    AtlanDatabase,
    AtlanSchema,
    AtlanTable,
    AtlanProcess,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StyleArg {
    Compact,
    Spaced,
    Pretty,
}

#[derive(Parser, Debug)]
#[command(
    name = "lineage-serde-cli",
    about = "Normalize lineage events and build Atlan entity documents",
    version
)]
struct Args {
    /// Output document to produce from the input record
    #[arg(short, long, value_enum, default_value_t = FormatArg::Lineage)]
    format: FormatArg,

    /// JSON layout; keys are sorted in every style
    #[arg(long, value_enum, default_value_t = StyleArg::Compact)]
    style: StyleArg,

    /// Input JSON file (defaults to stdin)
    input: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut buf = String::new();
    match &args.input {
        Some(path) => {
            let mut f =
                File::open(path).with_context(|| format!("opening {}", path.display()))?;
            f.read_to_string(&mut buf)?;
        }
        None => {
            stdin().read_to_string(&mut buf)?;
        }
    }

    let style = match args.style {
        StyleArg::Compact => Style::Compact,
        StyleArg::Spaced => Style::Spaced,
        StyleArg::Pretty => Style::Pretty,
    };
    let options = Options::default().with_style(style);
    tracing::debug!(format = ?args.format, ?options, "converting input");

    let out = match args.format {
        FormatArg::Lineage => {
            let value: serde_json::Value = serde_json::from_str(&buf)?;
            lineage_serde::to_json(&value, &options)?
        }
        FormatArg::AtlanDatabase => {
            let record: DatabaseRecord = serde_json::from_str(&buf)?;
            atlan::to_atlan_database(&record, style)?
        }
        FormatArg::AtlanSchema => {
            let record: SchemaRecord = serde_json::from_str(&buf)?;
            atlan::to_atlan_schema(&record, style)?
        }
        FormatArg::AtlanTable => {
            let record: TableRecord = serde_json::from_str(&buf)?;
            atlan::to_atlan_table(&record, style)?
        }
        FormatArg::AtlanProcess => {
            let record: ProcessRecord = serde_json::from_str(&buf)?;
            atlan::to_atlan_process(&record, style)?
        }
    };
    println!("{}", out);

    Ok(())
}
