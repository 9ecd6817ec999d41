//! Config command
//!
//! Manage fiscal-tracker configuration.

use anyhow::{Context, Result};
use clap::Subcommand;
use std::fs;
use std::path::{Path, PathBuf};

use ft_core::config::Config;

use super::context::{config_path, load_config};

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show effective configuration
    Show {
        /// Show as JSON
        #[arg(long)]
        json: bool,
    },

    /// Reset to default configuration
    Reset {
        /// Force reset without confirmation
        #[arg(long)]
        force: bool,
    },

    /// Validate configuration
    Validate,

    /// Print the configuration file path
    Path,
}

/// Execute the config command
pub fn execute(cmd: ConfigCommand, explicit_path: Option<PathBuf>) -> Result<()> {
    let path = config_path(explicit_path);
    match cmd {
        ConfigCommand::Show { json } => show_config(&path, json),
        ConfigCommand::Reset { force } => reset_config(&path, force),
        ConfigCommand::Validate => validate_config(&path),
        ConfigCommand::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn show_config(path: &Path, as_json: bool) -> Result<()> {
    use colored::Colorize;

    let config = load_config(path)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        println!("{}", "Configuration:".bold().underline());
        if path.exists() {
            println!("{}", path.display().to_string().dimmed());
        } else {
            println!("{}", "(defaults, no configuration file)".dimmed());
        }
        println!();
        println!("{}", config.to_toml()?);
    }

    Ok(())
}

fn reset_config(path: &Path, force: bool) -> Result<()> {
    use colored::Colorize;

    if !force {
        use dialoguer::Confirm;

        let confirmed = Confirm::new()
            .with_prompt("Reset configuration to defaults?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Reset cancelled.");
            return Ok(());
        }
    }

    // Backup existing
    if path.exists() {
        let backup_path = format!(
            "{}.backup-{}",
            path.display(),
            chrono::Local::now().format("%Y%m%d-%H%M%S")
        );
        fs::copy(path, &backup_path)?;
        println!("{} Backed up to {}", "✓".green(), backup_path);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let content = format!("# fiscal-tracker configuration\n\n{}", Config::default().to_toml()?);
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;

    println!("{} Configuration reset to defaults.", "✓".green());

    Ok(())
}

fn validate_config(path: &Path) -> Result<()> {
    use colored::Colorize;

    if !path.exists() {
        eprintln!(
            "{} Configuration not found at {}, defaults apply",
            "⚠".yellow(),
            path.display()
        );
        return Ok(());
    }

    let content = fs::read_to_string(path)?;

    let value = match toml::from_str::<toml::Value>(&content) {
        Ok(value) => value,
        Err(e) => {
            eprintln!("{} Invalid TOML: {}", "✗".red(), e);
            return Ok(());
        }
    };
    println!("{} Configuration is valid TOML", "✓".green());

    // Check for expected sections
    let mut warnings = Vec::new();
    for section in ["api", "export", "data"] {
        if value.get(section).is_none() {
            warnings.push(format!("[{}] section not found, defaults apply", section));
        }
    }
    for warning in &warnings {
        println!("{} {}", "⚠".yellow(), warning);
    }

    match Config::load(path) {
        Ok(_) => println!("{} All values valid", "✓".green()),
        Err(e) => eprintln!("{} {}", "✗".red(), e),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_reset_writes_loadable_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        reset_config(&path, true).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_reset_backs_up_existing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[data]\nranking_limit = 5\n").unwrap();

        reset_config(&path, true).unwrap();

        let backups = fs::read_dir(temp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains(".backup-"))
            .count();
        assert_eq!(backups, 1);
    }
}
