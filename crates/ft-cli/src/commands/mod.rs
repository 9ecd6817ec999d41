//! CLI commands module
//!
//! This module contains all CLI command implementations.

pub mod alertas;
pub mod auth;
pub mod config;
pub mod context;
pub mod detalhe;
pub mod empresas;
pub mod export;
pub mod ranking;
pub mod resumo;
pub mod show;
pub mod upload;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// fiscal-tracker - Municipal fiscal incentive tracker
#[derive(Debug, Parser)]
#[command(name = "fiscal-tracker")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List companies, optionally filtered
    Empresas(empresas::EmpresasArgs),

    /// Show the full record of one company by CNPJ
    Detalhe(detalhe::DetalheArgs),

    /// Export the filtered company list as CSV
    Export(export::ExportArgs),

    /// Upload a CSV file for bulk ingestion
    Upload(upload::UploadArgs),

    /// Show the impact ranking
    Ranking(ranking::RankingArgs),

    /// List or generate alerts
    #[command(subcommand)]
    Alertas(alertas::AlertasCommand),

    /// Show the executive summary
    Resumo(resumo::ResumoArgs),

    /// Render one of the dashboard views
    Show(show::ShowArgs),

    /// Log in to the backend
    Login(auth::LoginArgs),

    /// Log out and clear the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Manage configuration
    #[command(subcommand)]
    Config(config::ConfigCommand),
}

/// Run the CLI application
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    setup_logging(cli.verbose);

    // Handle color output
    if cli.no_color {
        colored::control::set_override(false);
    }

    let config_path = cli.config;

    // Dispatch to command handler
    match cli.command {
        Commands::Empresas(args) => empresas::execute(args, config_path),
        Commands::Detalhe(args) => detalhe::execute(args, config_path),
        Commands::Export(args) => export::execute(args, config_path),
        Commands::Upload(args) => upload::execute(args, config_path),
        Commands::Ranking(args) => ranking::execute(args, config_path),
        Commands::Alertas(cmd) => alertas::execute(cmd, config_path),
        Commands::Resumo(args) => resumo::execute(args, config_path),
        Commands::Show(args) => show::execute(args, config_path),
        Commands::Login(args) => auth::login(args, config_path),
        Commands::Logout => auth::logout(config_path),
        Commands::Whoami => auth::whoami(config_path),
        Commands::Config(cmd) => config::execute(cmd, config_path),
    }
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_help_text() {
        let cmd = Cli::command();
        assert!(cmd.get_about().is_some());
    }

    #[test]
    fn test_detalhe_takes_cnpj() {
        let cli = Cli::try_parse_from(["fiscal-tracker", "detalhe", "11.222.333/0001-81"]).unwrap();
        match cli.command {
            Commands::Detalhe(args) => assert_eq!(args.cnpj, "11.222.333/0001-81"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["fiscal-tracker", "empresas", "-vv", "--no-color"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.no_color);
    }
}
