//! Output writer.
//!
//! Files land under a root directory keyed by kind, generator and variant:
//!
//! ```text
//! {root}/{machine}_{Layout}_{Variant}/[{prefix}/]{machine}/{machine}_{suffix}
//! ```
//!
//! e.g. `folder_TSTypesJenny_NoParams/root/folder/folder_types.gen.ts`.
//! Aggregate generators write one file per variant:
//!
//! ```text
//! {root}/{Layout}_{Variant}/[{prefix}/]{file}
//! ```
//!
//! Kinds with distinct machine names never share a path. The pipeline
//! rejects colliding cells before anything is written, so parallel writers
//! never touch the same file.

use crate::generator::GeneratorId;
use kindgen_core::{VariantId, WriteError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// What [`OutputWriter::write`] does with a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Overwrite unconditionally
    #[default]
    Write,
    /// Compare with the file on disk and fail when missing or different
    Verify,
    /// Touch nothing; only report where the file would go
    DryRun,
}

/// One generated output unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub kind: String,
    pub generator: GeneratorId,
    pub variant: VariantId,
    /// Path relative to the writer root
    pub path: PathBuf,
    pub content: String,
}

/// Relative path of the main file of a (kind, generator, variant) cell.
pub fn relative_path(
    machine_name: &str,
    generator: GeneratorId,
    variant: VariantId,
    prefix: Option<&str>,
) -> PathBuf {
    kind_dir(machine_name, generator, variant, prefix)
        .join(format!("{machine_name}_{}", generator.artifact_suffix()))
}

/// Relative directory holding every file of a (kind, generator, variant) cell.
pub fn kind_dir(
    machine_name: &str,
    generator: GeneratorId,
    variant: VariantId,
    prefix: Option<&str>,
) -> PathBuf {
    let mut path = PathBuf::from(format!(
        "{machine_name}_{}_{}",
        generator.layout_name(),
        variant.as_str()
    ));
    if let Some(prefix) = prefix.filter(|p| !p.is_empty()) {
        path.push(prefix);
    }
    path.push(machine_name);
    path
}

/// Relative path of an aggregate generator's file.
pub fn aggregate_path(
    file_name: &str,
    generator: GeneratorId,
    variant: VariantId,
    prefix: Option<&str>,
) -> PathBuf {
    let mut path = PathBuf::from(format!("{}_{}", generator.layout_name(), variant.as_str()));
    if let Some(prefix) = prefix.filter(|p| !p.is_empty()) {
        path.push(prefix);
    }
    path.push(file_name);
    path
}

/// Flushes generated files below a root directory.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    root: PathBuf,
    mode: WriteMode,
}

impl OutputWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            mode: WriteMode::Write,
        }
    }

    /// A writer that checks files instead of writing them.
    pub fn verifying(root: impl Into<PathBuf>) -> Self {
        Self::new(root).with_mode(WriteMode::Verify)
    }

    pub fn with_mode(mut self, mode: WriteMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn mode(&self) -> WriteMode {
        self.mode
    }

    /// Write (or verify) a file and return its path below the root.
    pub fn write(&self, file: &GeneratedFile) -> Result<PathBuf, WriteError> {
        let path = self.root.join(&file.path);

        match self.mode {
            WriteMode::Write => {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent).map_err(|e| WriteError::io(parent, e))?;
                }
                fs::write(&path, &file.content).map_err(|e| WriteError::io(&path, e))?;
                tracing::debug!(path = %path.display(), bytes = file.content.len(), "wrote file");
            }
            WriteMode::Verify => {
                let existing = match fs::read_to_string(&path) {
                    Ok(existing) => existing,
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {
                        return Err(WriteError::Stale { path });
                    }
                    Err(e) => return Err(WriteError::io(&path, e)),
                };
                if existing != file.content {
                    return Err(WriteError::Stale { path });
                }
                tracing::debug!(path = %path.display(), "verified file");
            }
            WriteMode::DryRun => {
                tracing::debug!(path = %path.display(), "dry run, not writing");
            }
        }

        Ok(path)
    }
}
