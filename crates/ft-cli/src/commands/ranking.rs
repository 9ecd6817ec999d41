//! Ranking command
//!
//! Show the impact ranking, optionally exporting it as CSV.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use ft_api::{FiscalApi, RankingEntry, RankingKind};
use ft_core::export::{export_date, DirectorySink, RecordExporter};
use ft_core::Record;

use super::context::{block_on, format_brl, AppContext};

/// Arguments for the ranking command
#[derive(Debug, Args)]
pub struct RankingArgs {
    /// Ordering: melhores, piores, impacto
    #[arg(long, short = 't', default_value = "melhores")]
    pub tipo: RankingKind,

    /// Number of entries (defaults to `data.ranking_limit`)
    #[arg(long, short)]
    pub limite: Option<u32>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Also export the ranked companies as CSV into this directory
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// Execute the ranking command
pub fn execute(args: RankingArgs, config_path: Option<PathBuf>) -> Result<()> {
    let ctx = AppContext::load(config_path)?;
    let limite = args.limite.unwrap_or(ctx.config.data.ranking_limit);
    let client = ctx.client()?;

    let entries = block_on("Loading ranking...", client.ranking(args.tipo, limite))??;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        print_ranking(args.tipo, &entries);
    }

    if let Some(dir) = args.export {
        let records: Vec<Record> = entries.iter().map(RankingEntry::to_record).collect();
        let outcome = RecordExporter::new()
            .with_prefix(format!("ranking-{}", args.tipo))
            .export(&records, &DirectorySink::new(dir), export_date())?;
        eprintln!("{} {}", "✓".green(), outcome.message());
    }

    Ok(())
}

fn print_ranking(kind: RankingKind, entries: &[RankingEntry]) {
    if entries.is_empty() {
        println!("No ranking data available.");
        return;
    }

    println!(
        "{}",
        format!("Ranking ({}):", kind).bold().underline()
    );
    println!();
    for (position, entry) in entries.iter().enumerate() {
        let name = entry
            .empresa
            .razao_social
            .as_deref()
            .unwrap_or_else(|| entry.empresa.cnpj.as_str());
        println!(
            "  {:>2}. {} {}",
            position + 1,
            name.bold(),
            entry.empresa.cnpj.formatted().dimmed()
        );
        println!(
            "      B/C {}   Impacto {}",
            format!("{:.2}", entry.bc_ratio).cyan(),
            format_brl(entry.impacto_liquido)
        );
    }
}
