//! Upload command
//!
//! Send a CSV file to one of the bulk ingestion endpoints.

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use ft_api::{FiscalApi, UploadFile, UploadKind};

use super::context::{block_on, AppContext};

/// Arguments for the upload command
#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Dataset: empresas, incentivos, iss, iptu
    #[arg(long, short = 't', default_value = "empresas")]
    pub tipo: UploadKind,

    /// CSV file to upload
    pub file: Option<PathBuf>,

    /// Print the expected CSV header of every dataset and exit
    #[arg(long)]
    pub formats: bool,
}

/// Execute the upload command
pub fn execute(args: UploadArgs, config_path: Option<PathBuf>) -> Result<()> {
    if args.formats {
        print_formats();
        return Ok(());
    }

    let Some(path) = args.file else {
        bail!("Please select a file");
    };
    let file = UploadFile::read(&path)?;

    if !file.header_matches(args.tipo) {
        eprintln!(
            "{} Header does not look like {} (expected: {})",
            "⚠".yellow(),
            args.tipo.label(),
            args.tipo.expected_format().cyan()
        );
    }

    let ctx = AppContext::load(config_path)?;
    let client = ctx.client()?;
    let report = block_on(
        &format!("Uploading {}...", file.file_name),
        client.upload_csv(args.tipo, &file),
    )??;

    println!("{} {}", "✓".green(), report.message);
    if let Some(total) = report.total {
        println!("  Records processed: {}", total.to_string().yellow());
    }
    if !report.errors.is_empty() {
        println!("  {} ({}):", "Errors".red(), report.errors.len());
        for error in &report.errors {
            println!("    {}", error);
        }
    }

    Ok(())
}

fn print_formats() {
    println!("{}", "Expected CSV formats:".bold().underline());
    println!();
    for kind in UploadKind::ALL {
        println!("  {:<11} {}", kind.key().cyan(), kind.expected_format());
    }
}
