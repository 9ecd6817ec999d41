//! Empresas command
//!
//! List the loaded companies with the dashboard filters applied.

use anyhow::Result;
use clap::Args;
use colored::{ColoredString, Colorize};
use std::path::PathBuf;

use ft_api::DataSource;
use ft_core::filter::{
    distinct_portes, distinct_setores, is_unrestricted, FilterCriteria, FilterSummary,
};
use ft_core::record::BcRating;
use ft_core::{Porte, Record};

use super::context::{format_brl, AppContext};

/// Filter options shared by listing and export
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Search by company name or CNPJ
    #[arg(long)]
    pub busca: Option<String>,

    /// Sector (exact label, or "todos")
    #[arg(long)]
    pub setor: Option<String>,

    /// Size class: MEI, ME, EPP, MEDIA, GRANDE (or "todos")
    #[arg(long)]
    pub porte: Option<String>,
}

impl FilterArgs {
    /// Build filter criteria, rejecting unknown size classes
    pub fn criteria(&self) -> Result<FilterCriteria> {
        let mut criteria = FilterCriteria::new();
        if let Some(busca) = &self.busca {
            criteria = criteria.with_busca(busca.as_str());
        }
        if let Some(setor) = &self.setor {
            criteria = criteria.with_setor(setor.as_str());
        }
        if let Some(porte) = self.porte.as_deref().filter(|p| !is_unrestricted(p)) {
            criteria = criteria.with_porte(porte.parse::<Porte>()?);
        }
        Ok(criteria)
    }
}

/// Arguments for the empresas command
#[derive(Debug, Default, Args)]
pub struct EmpresasArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Use the built-in sample companies instead of the API
    #[arg(long)]
    pub sample: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// List the available sectors and size classes instead of companies
    #[arg(long)]
    pub options: bool,
}

/// Execute the empresas command
pub fn execute(args: EmpresasArgs, config_path: Option<PathBuf>) -> Result<()> {
    let criteria = args.filter.criteria()?;
    let ctx = AppContext::load(config_path)?;
    let loaded = ctx.records(args.sample)?;

    if loaded.source == DataSource::Sample && !args.sample {
        eprintln!(
            "{} API unavailable, showing sample data",
            "⚠".yellow()
        );
    }

    if args.options {
        print_options(&loaded.records);
        return Ok(());
    }

    let visible = criteria.apply(&loaded.records);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&visible)?);
        return Ok(());
    }

    print_table(&visible);
    println!();
    println!(
        "{}",
        FilterSummary::new(visible.len(), loaded.records.len())
            .to_string()
            .dimmed()
    );

    Ok(())
}

fn print_options(records: &[Record]) {
    println!("{}", "Setores:".bold().underline());
    for setor in distinct_setores(records) {
        println!("  {}", setor);
    }
    println!();
    println!("{}", "Portes:".bold().underline());
    for porte in distinct_portes(records) {
        println!("  {} - {}", porte.code().cyan(), porte.label());
    }
}

fn print_table(records: &[Record]) {
    if records.is_empty() {
        println!("No companies match the current filters.");
        return;
    }

    println!(
        "{}",
        format!(
            "{:<4} {:<14} {:<32} {:<16} {:<7} {:>6} {:>18}",
            "ID", "CNPJ", "Razão Social", "Setor", "Porte", "B/C", "Impacto Líquido"
        )
        .bold()
    );

    for record in records {
        let bc = record
            .bc_ratio
            .map(|r| format!("{:.2}", r))
            .unwrap_or_else(|| "-".to_string());
        let impacto = record
            .impacto_liquido
            .map(format_brl)
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:<4} {:<14} {:<32} {:<16} {:<7} {} {:>18}",
            record.id.to_string(),
            record.cnpj.as_str(),
            truncate(record.razao_social.as_deref().unwrap_or(""), 32),
            truncate(record.setor().unwrap_or(""), 16),
            record.porte.map(|p| p.code()).unwrap_or("-"),
            color_bc(record.bc_rating(), format!("{:>6}", bc)),
            impacto
        );
    }
}

fn color_bc(rating: Option<BcRating>, text: String) -> ColoredString {
    match rating {
        Some(BcRating::Good) => text.green(),
        Some(BcRating::Ok) => text.yellow(),
        Some(BcRating::Bad) => text.red(),
        None => text.normal(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
