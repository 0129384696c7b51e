//! `apiparse init` — write a default config file.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use apiparse_core::config::{get_config_path, save_config, Config};

/// Run the init command. An existing file is left untouched.
pub fn run(path: Option<&Path>) -> Result<()> {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(get_config_path);

    println!();
    if config_path.exists() {
        println!(
            "  {} config already exists at {}",
            "✓".green(),
            config_path.display()
        );
    } else {
        // Defaults only: credentials from the environment stay out of the file.
        save_config(&Config::default(), Some(&config_path))
            .with_context(|| format!("failed to write {}", config_path.display()))?;
        println!(
            "  {} created config at {}",
            "✓".green(),
            config_path.display()
        );
    }
    println!(
        "  {}",
        "Set credentials in the file, a .env file, or the environment.".dimmed()
    );
    println!();

    Ok(())
}
