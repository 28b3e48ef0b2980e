//! `kindgen check` command

use crate::config::{DEFAULT_CONFIG, GenerateConfig};
use crate::generate::build_pipeline;
use anyhow::{Context, Result};
use kindgen_codegen::{OutputWriter, WriteMode};
use std::path::Path;

/// Validate the config and every kind without writing anything
pub fn run(config: Option<String>, log_level: Option<String>) -> Result<()> {
    let config_path = config.as_deref().unwrap_or(DEFAULT_CONFIG);
    println!("Checking config: {}", config_path);

    let config = GenerateConfig::from_file(Path::new(config_path))?;
    config
        .validate()
        .with_context(|| format!("Invalid config: {}", config_path))?;
    kindgen_logging::init_logging(config.log_level(log_level.as_deref())?);
    println!("✓ Config is valid");

    let failures = check_config(&config)?;
    if failures > 0 {
        anyhow::bail!("{} cell(s) failed to generate", failures);
    }

    println!("✓ All kinds generate cleanly");
    Ok(())
}

/// Render every cell in memory, output paths included. Returns the number
/// of failed cells.
pub fn check_config(config: &GenerateConfig) -> Result<usize> {
    let loaded = config.load_kinds()?;
    let writer = OutputWriter::new(config.output_dir()).with_mode(WriteMode::DryRun);
    let pipeline = build_pipeline(config, writer, None)?;

    let mut report = pipeline.run(&loaded.kinds);
    for (name, error) in &loaded.rejected {
        pipeline.reject(&mut report, name, error);
    }

    for file in &report.written {
        println!("  ✓ {} -> {}", file.cell, file.path.display());
    }
    for failure in &report.failures {
        eprintln!(
            "  ✗ {} [{}]: {}",
            failure.cell,
            failure.error.category(),
            failure.error
        );
    }

    Ok(report.failures.len())
}
