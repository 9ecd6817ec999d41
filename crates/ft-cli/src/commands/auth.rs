//! Login, logout and whoami commands

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::context::{block_on, AppContext};

/// Arguments for the login command
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username
    pub username: String,

    /// Password (prompted for when omitted)
    #[arg(long, env = "FISCAL_TRACKER_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

/// Execute the login command
pub fn login(args: LoginArgs, config_path: Option<PathBuf>) -> Result<()> {
    let ctx = AppContext::load(config_path)?;

    let senha = match args.password {
        Some(password) => password,
        None => dialoguer::Password::new()
            .with_prompt("Senha")
            .interact()
            .context("Failed to read password")?,
    };

    let client = ctx.client()?;
    let session = block_on(
        "Signing in...",
        ft_api::auth::login(&client, &ctx.store, &args.username, &senha),
    )??;

    if let Some(user) = session.user() {
        println!("{} Logged in as {}", "✓".green(), user.display_name().cyan());
    }
    Ok(())
}

/// Execute the logout command
pub fn logout(config_path: Option<PathBuf>) -> Result<()> {
    let mut ctx = AppContext::load(config_path)?;

    if !ctx.session.is_authenticated() {
        println!("Not logged in.");
        return Ok(());
    }

    ft_api::auth::logout(&mut ctx.session, &ctx.store)?;
    println!("{} Logged out.", "✓".green());
    Ok(())
}

/// Execute the whoami command
pub fn whoami(config_path: Option<PathBuf>) -> Result<()> {
    let ctx = AppContext::load(config_path)?;

    match ctx.session.user() {
        Some(user) => {
            println!("{}", user.display_name().bold());
            println!("  Username: {}", user.username);
            if let Some(email) = &user.email {
                println!("  Email: {}", email);
            }
            if let Some(cargo) = &user.cargo {
                println!("  Cargo: {}", cargo);
            }
            if let Some(departamento) = &user.departamento {
                println!("  Departamento: {}", departamento);
            }
        }
        None => println!("Not logged in."),
    }
    Ok(())
}
