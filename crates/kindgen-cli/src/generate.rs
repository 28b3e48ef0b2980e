//! `kindgen generate` command

use crate::config::{DEFAULT_CONFIG, GenerateConfig};
use anyhow::{Context, Result};
use kindgen_codegen::{OutputWriter, Pipeline, RunReport, WriteMode};
use std::path::{Path, PathBuf};

/// Command line overrides for a generation run.
#[derive(Debug, Default, Clone)]
pub struct GenerateOptions {
    pub config: Option<String>,
    pub output: Option<String>,
    pub variant: Option<String>,
    pub log_level: Option<String>,
    /// Compare with the files on disk instead of writing
    pub check: bool,
}

/// Run the generate command
pub fn run(options: GenerateOptions) -> Result<()> {
    let config_path = options.config.as_deref().unwrap_or(DEFAULT_CONFIG);
    let config = GenerateConfig::from_file(Path::new(config_path))?;
    config
        .validate()
        .with_context(|| format!("Invalid config: {}", config_path))?;

    kindgen_logging::init_logging(config.log_level(options.log_level.as_deref())?);

    let report = execute(&config, &options)?;
    print_report(&report);

    if !report.is_success() {
        anyhow::bail!(
            "{} of {} cell(s) failed",
            report.failures.len(),
            report.failures.len() + report.written.len()
        );
    }

    if options.check {
        println!("✓ Generated output is up to date");
    } else {
        println!("✓ Generated {} file(s)", report.written.len());
    }
    Ok(())
}

/// Build the pipeline for `config` and run it over every configured kind.
///
/// Kind files that fail to load are reported as failed cells next to the
/// cells of the kinds that did load.
pub fn execute(config: &GenerateConfig, options: &GenerateOptions) -> Result<RunReport> {
    let loaded = config.load_kinds()?;
    let output_dir = options
        .output
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| config.output_dir());
    let mode = if options.check {
        WriteMode::Verify
    } else {
        WriteMode::Write
    };

    let pipeline = build_pipeline(
        config,
        OutputWriter::new(&output_dir).with_mode(mode),
        options.variant.as_deref(),
    )?;

    println!(
        "{} {} kind(s) into {}",
        if options.check { "Checking" } else { "Generating" },
        loaded.kinds.len(),
        output_dir.display()
    );

    let mut report = pipeline.run(&loaded.kinds);
    for (name, error) in &loaded.rejected {
        pipeline.reject(&mut report, name, error);
    }
    Ok(report)
}

/// Pipeline with the generators, variants and prefixes of `config`.
pub fn build_pipeline(
    config: &GenerateConfig,
    writer: OutputWriter,
    variant: Option<&str>,
) -> Result<Pipeline> {
    let mut pipeline = Pipeline::new(writer);
    for id in config.generator_ids()? {
        pipeline = pipeline.with_generator_id(id);
    }
    for variant in config.variants(variant)? {
        pipeline = pipeline.with_variant(variant);
    }
    for (id, prefix) in config.prefixes()? {
        pipeline = pipeline.with_prefix(id, prefix);
    }
    Ok(pipeline)
}

fn print_report(report: &RunReport) {
    for file in &report.written {
        println!("  ✓ {}", file.path.display());
    }
    for cell in &report.skipped {
        println!("  - {} (variant not supported by kind)", cell);
    }
    for failure in &report.failures {
        eprintln!(
            "  ✗ {} [{}]: {}",
            failure.cell,
            failure.error.category(),
            failure.error
        );
    }
}
