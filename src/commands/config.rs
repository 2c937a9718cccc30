use anyhow::Result;
use std::path::Path;
use tracing::info;

use crate::cli::ConfigCommands;
use crate::config::CsxdepsConfig;
use crate::merger::MergedConfig;

pub fn run(command: &ConfigCommands, merged: &MergedConfig) -> Result<()> {
    match command {
        ConfigCommands::Validate { path } => validate(path),
        ConfigCommands::Generate => generate(),
        ConfigCommands::Show => show(merged),
    }
}

fn validate(path: &Path) -> Result<()> {
    info!("Validating config file: {}", path.display());

    let config = CsxdepsConfig::from_file(path)?;

    println!("✓ Configuration file is valid: {}", path.display());
    println!("\nSummary:");
    println!("  - Target framework: {}", config.project.target_framework);
    println!("  - SDK: {}", config.project.sdk);
    println!(
        "  - Supported framework: {}",
        config.packages.supported_framework
    );
    println!("  - Package sources: {}", config.packages.sources.len());

    for (i, source) in config.packages.sources.iter().enumerate() {
        println!("    {}. {}", i + 1, source);
    }

    Ok(())
}

fn generate() -> Result<()> {
    println!("{}", CsxdepsConfig::example()?);
    Ok(())
}

fn show(merged: &MergedConfig) -> Result<()> {
    info!("Showing effective configuration");

    println!("Effective Configuration:\n");
    println!("{}", toml::to_string_pretty(merged)?);

    Ok(())
}
