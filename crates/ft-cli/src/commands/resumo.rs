//! Resumo command
//!
//! Print the executive summary of the incentive program.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use ft_api::{DashboardSummary, FiscalApi};

use super::context::{block_on, format_brl, AppContext};

/// Arguments for the resumo command
#[derive(Debug, Default, Args)]
pub struct ResumoArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the resumo command
pub fn execute(args: ResumoArgs, config_path: Option<PathBuf>) -> Result<()> {
    let ctx = AppContext::load(config_path)?;
    let client = ctx.client()?;
    let summary = block_on("Loading summary...", client.resumo())??;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &DashboardSummary) {
    println!("{}", "Resumo Executivo".bold().underline());
    if let Some(updated) = &summary.data_atualizacao {
        println!("{}", format!("Atualizado em {}", updated).dimmed());
    }
    println!();

    println!("  Incentivos ativos:       {}", summary.total_incentivos_ativos.to_string().cyan());
    println!("  Empresas:                {}", summary.total_empresas.to_string().cyan());
    println!("  Custo fiscal:            {}", format_brl(summary.custo_fiscal_total));
    println!("  Arrecadação incremental: {}", format_brl(summary.arrecadacao_incremental_total));
    println!("  Impacto líquido:         {}", format_brl(summary.impacto_liquido_total));
    println!("  B/C médio:               {}", format!("{:.2}", summary.bc_medio).cyan());
    println!("  Alertas ativos:          {}", summary.total_alertas_ativos.to_string().yellow());

    if !summary.distribuicao_porte.is_empty() {
        println!();
        println!("{}", "Distribuição por porte:".bold());
        for item in &summary.distribuicao_porte {
            println!("  {:<8} {}", item.porte, item.count);
        }
    }

    if !summary.top_setores.is_empty() {
        println!();
        println!("{}", "Principais setores:".bold());
        for item in &summary.top_setores {
            println!("  {:<32} {}", item.cnae_descricao, item.count);
        }
    }
}
