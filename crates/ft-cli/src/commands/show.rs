//! Show command
//!
//! Render one of the dashboard views in the terminal.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use ft_api::UploadKind;
use ft_core::view::View;

use super::alertas::{self, AlertasCommand};
use super::context::AppContext;
use super::empresas::{self, EmpresasArgs};
use super::resumo::{self, ResumoArgs};
use super::upload::{self, UploadArgs};

/// Arguments for the show command
#[derive(Debug, Args)]
pub struct ShowArgs {
    /// View: dashboard, empresas, upload, alertas
    #[arg(default_value = "dashboard")]
    pub view: View,
}

/// Execute the show command
pub fn execute(args: ShowArgs, config_path: Option<PathBuf>) -> Result<()> {
    let ctx = AppContext::load(config_path.clone())?;
    if !ctx.session.is_authenticated() {
        eprintln!(
            "{} Not logged in. Run '{}' first.",
            "⚠".yellow(),
            "fiscal-tracker login".cyan()
        );
        return Ok(());
    }

    println!("{}", args.view.title().bold());
    println!();

    match args.view {
        View::Dashboard => resumo::execute(ResumoArgs::default(), config_path),
        View::Empresas => empresas::execute(EmpresasArgs::default(), config_path),
        View::Upload => upload::execute(
            UploadArgs {
                tipo: UploadKind::Empresas,
                file: None,
                formats: true,
            },
            config_path,
        ),
        View::Alertas => alertas::execute(
            AlertasCommand::List {
                min: None,
                json: false,
            },
            config_path,
        ),
    }
}
