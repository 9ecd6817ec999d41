//! Export command
//!
//! Export the filtered company list to a CSV file.

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use ft_api::DataSource;
use ft_core::config::ExportStrategy;
use ft_core::export::{
    export_date, DirectorySink, DownloadSink, ExportOutcome, RecordExporter, StdoutSink,
};
use ft_core::filter::{FilterCriteria, FilterSummary};

use super::context::{block_on, AppContext};
use super::empresas::FilterArgs;

/// Arguments for the export command
#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Directory to save the file in (defaults to `export.output_dir`)
    #[arg(long, short)]
    pub output_dir: Option<PathBuf>,

    /// Filename prefix (defaults to `export.filename_prefix`)
    #[arg(long)]
    pub prefix: Option<String>,

    /// Let the backend render the CSV
    #[arg(long, conflicts_with = "sample")]
    pub server: bool,

    /// Export from the built-in sample companies
    #[arg(long)]
    pub sample: bool,

    /// Write the CSV to stdout instead of a file
    #[arg(long, conflicts_with = "output_dir")]
    pub stdout: bool,
}

/// Execute the export command
pub fn execute(args: ExportArgs, config_path: Option<PathBuf>) -> Result<()> {
    let criteria = args.filter.criteria()?;
    let ctx = AppContext::load(config_path)?;
    let date = export_date();

    let prefix = args
        .prefix
        .clone()
        .unwrap_or_else(|| ctx.config.export.filename_prefix.clone());
    let sink: Box<dyn DownloadSink> = if args.stdout {
        Box::new(StdoutSink)
    } else {
        let dir = args
            .output_dir
            .clone()
            .unwrap_or_else(|| ctx.config.export.output_dir.clone());
        Box::new(DirectorySink::new(dir))
    };

    let strategy = if args.server {
        ExportStrategy::Server
    } else {
        ctx.config.export.strategy
    };

    let outcome = match strategy {
        ExportStrategy::Server if !args.sample => {
            export_server(&ctx, &criteria, sink.as_ref(), &prefix, date)?
        }
        _ => {
            let loaded = ctx.records(args.sample)?;
            if loaded.source == DataSource::Sample && !args.sample {
                eprintln!("{} API unavailable, exporting sample data", "⚠".yellow());
            }
            let visible = criteria.apply(&loaded.records);
            eprintln!(
                "{}",
                FilterSummary::new(visible.len(), loaded.records.len())
                    .to_string()
                    .dimmed()
            );
            RecordExporter::new()
                .with_prefix(prefix)
                .export(&visible, sink.as_ref(), date)?
        }
    };

    report(&outcome, args.stdout);
    Ok(())
}

fn export_server(
    ctx: &AppContext,
    criteria: &FilterCriteria,
    sink: &dyn DownloadSink,
    prefix: &str,
    date: NaiveDate,
) -> Result<ExportOutcome> {
    let client = ctx.client()?;
    let outcome = block_on(
        "Requesting export from server...",
        ft_api::export_via_server(&client, criteria, sink, prefix, date),
    )??;
    Ok(outcome)
}

fn report(outcome: &ExportOutcome, to_stdout: bool) {
    let line = match outcome {
        ExportOutcome::Exported { .. } => format!("{} {}", "✓".green(), outcome.message()),
        ExportOutcome::NothingToExport => format!("{} {}", "⚠".yellow(), outcome.message()),
    };
    // Keep stdout clean when it carries the CSV itself
    if to_stdout {
        eprintln!("{}", line);
    } else {
        println!("{}", line);
    }
}
