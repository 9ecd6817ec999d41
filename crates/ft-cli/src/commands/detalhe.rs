//! Detalhe command
//!
//! Show everything the backend knows about one company.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde_json::Value;
use std::path::PathBuf;

use super::context::{block_on, AppContext};

/// Arguments for the detalhe command
#[derive(Debug, Args)]
pub struct DetalheArgs {
    /// Company CNPJ, digits or punctuated (`11.222.333/0001-81`)
    pub cnpj: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the detalhe command
pub fn execute(args: DetalheArgs, config_path: Option<PathBuf>) -> Result<()> {
    let ctx = AppContext::load(config_path)?;
    let client = ctx.client()?;
    let detail = block_on(
        "Loading company detail...",
        ft_api::fetch_detalhe(&client, &args.cnpj),
    )??;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
    } else {
        print!("{}", render(&detail));
    }
    Ok(())
}

/// Scalar fields as `key: value` lines, then nested sections as indented JSON
fn render(detail: &Value) -> String {
    let Value::Object(fields) = detail else {
        return format!("{}\n", detail);
    };

    let mut out = String::new();
    let mut sections = Vec::new();
    for (key, value) in fields {
        match value {
            Value::Object(_) | Value::Array(_) => sections.push((key, value)),
            Value::Null => out.push_str(&format!("  {:<24} {}\n", key, "-".dimmed())),
            Value::String(s) => out.push_str(&format!("  {:<24} {}\n", key, s)),
            other => out.push_str(&format!("  {:<24} {}\n", key, other)),
        }
    }

    for (key, value) in sections {
        out.push('\n');
        out.push_str(&format!("{}\n", key.bold()));
        let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
        for line in pretty.lines() {
            out.push_str(&format!("  {}\n", line));
        }
    }
    out
}
