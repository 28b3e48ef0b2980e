//! `kindgen render` command

use crate::config::{load_kind, parse_generator, parse_variant};
use anyhow::{Context, Result};
use kindgen_codegen::{GeneratorParams, OutputWriter, Pipeline, Target, Variant, WriteMode};
use std::path::Path;

/// Render one cell and return the file content. Cells with several files
/// return each one under a `==> path <==` line.
pub fn render(kind: &Path, generator: &str, variant: &str, params: GeneratorParams) -> Result<String> {
    let kind = load_kind(kind)?;
    let id = parse_generator(generator)?;
    let variant = Variant {
        id: parse_variant(variant)?,
        params,
    };
    let pipeline = Pipeline::new(OutputWriter::new(".").with_mode(WriteMode::DryRun));
    let failed = || format!("Failed to render {} with {}", kind.name, id);

    let files = match id.target() {
        Target::PerKind(generator) => pipeline
            .generate(&kind, generator.as_ref(), &variant)
            .with_context(failed)?,
        Target::Aggregate(generator) => {
            let output = pipeline.generate_aggregate(&[&kind], generator.as_ref(), &variant);
            if let Some(failure) = output.excluded.into_iter().next() {
                return Err(anyhow::Error::new(failure.error).context(failed()));
            }
            vec![output.file.with_context(failed)?]
        }
    };

    Ok(match files.as_slice() {
        [file] => file.content.clone(),
        files => files
            .iter()
            .map(|file| format!("==> {} <==\n{}", file.path.display(), file.content))
            .collect::<Vec<_>>()
            .join("\n"),
    })
}

/// Print one cell to stdout
pub fn run(kind: &Path, generator: &str, variant: &str, params: Option<&Path>) -> Result<()> {
    let params = match params {
        Some(path) => load_params(path)?,
        None => GeneratorParams::default(),
    };

    print!("{}", render(kind, generator, variant, params)?);
    Ok(())
}

/// Read a `[params]`-style TOML table from its own file
fn load_params(path: &Path) -> Result<GeneratorParams> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read params: {:?}", path))?;

    toml::from_str(&content).context("Failed to parse params")
}
