//! Alertas command
//!
//! List current alerts or ask the backend to generate new ones.

use anyhow::Result;
use clap::Subcommand;
use colored::{ColoredString, Colorize};
use std::path::PathBuf;

use ft_api::{Alerta, FiscalApi, Severidade};

use super::context::{block_on, AppContext};

/// Alertas subcommands
#[derive(Debug, Subcommand)]
pub enum AlertasCommand {
    /// List alerts
    List {
        /// Only show alerts at or above this severity
        #[arg(long)]
        min: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate alerts for expiring incentives and low B/C ratios
    Gerar,
}

/// Execute the alertas command
pub fn execute(cmd: AlertasCommand, config_path: Option<PathBuf>) -> Result<()> {
    let ctx = AppContext::load(config_path)?;
    let client = ctx.client()?;

    match cmd {
        AlertasCommand::List { min, json } => {
            let min = min.as_deref().map(parse_severity).transpose()?;
            let mut alertas = block_on("Loading alerts...", client.alertas())??;
            if let Some(min) = min {
                alertas.retain(|a| a.severidade >= min);
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&alertas)?);
            } else {
                print_alertas(&alertas);
            }
        }
        AlertasCommand::Gerar => {
            let generated = block_on("Generating alerts...", client.gerar_alertas())??;
            println!("{} {}", "✓".green(), generated.message);
            for alerta in &generated.alertas {
                println!(
                    "  {} {} {}",
                    alerta.tipo.yellow(),
                    alerta.empresa,
                    alerta.cnpj.formatted().dimmed()
                );
            }
        }
    }

    Ok(())
}

fn parse_severity(s: &str) -> Result<Severidade> {
    serde_json::from_value(serde_json::Value::String(s.trim().to_ascii_uppercase()))
        .map_err(|_| anyhow::anyhow!("Unknown severity: {} (BAIXA, MEDIA, ALTA, CRITICA)", s))
}

fn print_alertas(alertas: &[Alerta]) {
    if alertas.is_empty() {
        println!("No active alerts.");
        return;
    }

    println!("{}", "Alertas:".bold().underline());
    println!();
    for alerta in alertas {
        let empresa = alerta
            .empresa_razao_social
            .as_deref()
            .unwrap_or_else(|| alerta.empresa.as_str());
        println!(
            "  {} {} {}",
            severity_badge(alerta.severidade),
            alerta
                .tipo_display
                .as_deref()
                .unwrap_or(&alerta.tipo_alerta)
                .bold(),
            empresa.dimmed()
        );
        println!("      {}", alerta.descricao);
    }
}

fn severity_badge(severidade: Severidade) -> ColoredString {
    let label = format!("[{}]", severidade);
    match severidade {
        Severidade::Critica => label.red().bold(),
        Severidade::Alta => label.red(),
        Severidade::Media => label.yellow(),
        Severidade::Baixa => label.blue(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_severity() {
        assert_eq!(parse_severity("alta").unwrap(), Severidade::Alta);
        assert!(parse_severity("urgent").is_err());
    }
}
