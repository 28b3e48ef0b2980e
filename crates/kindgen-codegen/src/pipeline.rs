//! Pipeline orchestration.
//!
//! A run covers the cartesian product kinds × generators × variants, plus
//! one cell per aggregate generator and variant. Cells render in parallel on
//! the rayon pool. Output paths are checked across all cells before any file
//! is written, then the surviving cells write in parallel. A failed cell is
//! recorded in the [`RunReport`] and never stops the others.
//!
//! # Example
//!
//! ```no_run
//! use kindgen_codegen::{GeneratorId, OutputWriter, Pipeline, Variant};
//! use kindgen_core::Kind;
//!
//! let kind = Kind::from_json(&std::fs::read_to_string("folder.json").unwrap()).unwrap();
//!
//! let report = Pipeline::new(OutputWriter::new("generated"))
//!     .with_generator_id(GeneratorId::TsTypes)
//!     .with_generator_id(GeneratorId::TsIndex)
//!     .with_variant(Variant::no_params())
//!     .with_prefix(GeneratorId::TsTypes, "root")
//!     .run(&[kind]);
//!
//! assert!(report.is_success());
//! ```

use crate::generator::{AggregateGenerator, Generator, GeneratorId, Target, Variant};
use crate::header::with_header;
use crate::writer::{GeneratedFile, OutputWriter, aggregate_path, kind_dir};
use kindgen_core::{Kind, Resolver, SchemaError, UnsupportedConstructError, VariantId, WriteError};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use thiserror::Error;

/// Kind name of aggregate cells.
pub const ALL_KINDS: &str = "*";

/// Identity of one (kind, generator, variant) cell.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellId {
    pub kind: String,
    pub generator: GeneratorId,
    pub variant: VariantId,
}

impl CellId {
    pub fn new(kind: impl Into<String>, generator: GeneratorId, variant: VariantId) -> Self {
        Self {
            kind: kind.into(),
            generator,
            variant,
        }
    }
}

impl std::fmt::Display for CellId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.kind, self.generator, self.variant)
    }
}

/// Why a cell failed.
#[derive(Error, Debug)]
pub enum CellError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Unsupported(#[from] UnsupportedConstructError),

    #[error(transparent)]
    Write(#[from] WriteError),
}

impl CellError {
    /// Error category as shown in run reports
    pub fn category(&self) -> &'static str {
        match self {
            CellError::Schema(_) => "SchemaError",
            CellError::Unsupported(_) => "UnsupportedConstructError",
            CellError::Write(_) => "WriteError",
        }
    }
}

#[derive(Debug)]
pub struct WrittenFile {
    pub cell: CellId,
    pub path: PathBuf,
}

#[derive(Debug)]
pub struct CellFailure {
    pub cell: CellId,
    pub error: CellError,
}

/// Outcome of a run, sorted by kind, generator and variant.
#[derive(Debug, Default)]
pub struct RunReport {
    /// One entry per file; a cell may write several
    pub written: Vec<WrittenFile>,
    pub failures: Vec<CellFailure>,
    /// Cells whose kind does not declare the variant
    pub skipped: Vec<CellId>,
}

impl RunReport {
    /// True when no cell failed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failure(&self, cell: &CellId) -> Option<&CellError> {
        self.failures
            .iter()
            .find(|f| &f.cell == cell)
            .map(|f| &f.error)
    }

    fn sort(&mut self) {
        self.written
            .sort_by(|a, b| a.cell.cmp(&b.cell).then_with(|| a.path.cmp(&b.path)));
        self.failures.sort_by(|a, b| a.cell.cmp(&b.cell));
        self.skipped.sort();
    }
}

/// An aggregate file plus the kinds left out of it.
#[derive(Debug)]
pub struct AggregateOutput {
    pub file: Result<GeneratedFile, CellError>,
    /// Failures of kinds that could not take part, keyed by their own name
    pub excluded: Vec<CellFailure>,
}

type CellOutcome = (CellId, Result<Vec<GeneratedFile>, CellError>);

/// Runs generators over kinds and flushes the results.
pub struct Pipeline {
    writer: OutputWriter,
    generators: Vec<Box<dyn Generator>>,
    aggregates: Vec<Box<dyn AggregateGenerator>>,
    variants: Vec<Variant>,
    prefixes: HashMap<GeneratorId, String>,
}

impl Pipeline {
    pub fn new(writer: OutputWriter) -> Self {
        Self {
            writer,
            generators: Vec::new(),
            aggregates: Vec::new(),
            variants: Vec::new(),
            prefixes: HashMap::new(),
        }
    }

    pub fn with_generator(mut self, generator: impl Generator + 'static) -> Self {
        self.generators.push(Box::new(generator));
        self
    }

    pub fn with_aggregate(mut self, generator: impl AggregateGenerator + 'static) -> Self {
        self.aggregates.push(Box::new(generator));
        self
    }

    pub fn with_generator_id(mut self, id: GeneratorId) -> Self {
        match id.target() {
            Target::PerKind(generator) => self.generators.push(generator),
            Target::Aggregate(generator) => self.aggregates.push(generator),
        }
        self
    }

    /// Add a variant. Without any, runs use [`Variant::no_params`].
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variants.push(variant);
        self
    }

    /// Directory inserted between the output root and the kind directory.
    pub fn with_prefix(mut self, generator: GeneratorId, prefix: impl Into<String>) -> Self {
        self.prefixes.insert(generator, prefix.into());
        self
    }

    pub fn writer(&self) -> &OutputWriter {
        &self.writer
    }

    fn prefix(&self, id: GeneratorId) -> Option<&str> {
        self.prefixes.get(&id).map(String::as_str)
    }

    fn variants(&self) -> Vec<Variant> {
        if self.variants.is_empty() {
            vec![Variant::no_params()]
        } else {
            self.variants.clone()
        }
    }

    /// Every generator id of the run, per-kind first.
    fn generator_ids(&self) -> Vec<GeneratorId> {
        self.generators
            .iter()
            .map(|g| g.id())
            .chain(self.aggregates.iter().map(|g| g.id()))
            .collect()
    }

    /// Resolve and render one cell without touching the filesystem.
    pub fn generate(
        &self,
        kind: &Kind,
        generator: &dyn Generator,
        variant: &Variant,
    ) -> Result<Vec<GeneratedFile>, CellError> {
        let resolved = Resolver::new(generator.policy()).resolve(kind)?;
        let rendered = generator.render_files(&resolved, variant)?;

        let id = generator.id();
        let dir = kind_dir(&resolved.machine_name, id, variant.id, self.prefix(id));
        Ok(rendered
            .into_iter()
            .map(|file| self.finish(&kind.name, id, variant, dir.join(file.name), file.content))
            .collect())
    }

    /// Resolve `kinds` and render one aggregate file without touching the
    /// filesystem. Kinds that fail to resolve or share a machine name are
    /// left out and reported in [`AggregateOutput::excluded`].
    pub fn generate_aggregate(
        &self,
        kinds: &[&Kind],
        generator: &dyn AggregateGenerator,
        variant: &Variant,
    ) -> AggregateOutput {
        let id = generator.id();
        let resolver = Resolver::new(generator.policy());
        let clashes = machine_name_clashes(kinds.iter().copied());

        let mut excluded = Vec::new();
        let mut resolved = Vec::with_capacity(kinds.len());
        for kind in kinds {
            let result = match clashes.get(&kind.name) {
                Some(error) => Err(error.clone()),
                None => resolver.resolve(kind),
            };
            match result {
                Ok(resolved_kind) => resolved.push(resolved_kind),
                Err(error) => excluded.push(CellFailure {
                    cell: CellId::new(&kind.name, id, variant.id),
                    error: error.into(),
                }),
            }
        }
        resolved.sort_by(|a, b| a.machine_name.cmp(&b.machine_name));

        let file = generator
            .render(&resolved, variant)
            .map(|content| {
                let path = aggregate_path(generator.file_name(), id, variant.id, self.prefix(id));
                self.finish(ALL_KINDS, id, variant, path, content)
            })
            .map_err(CellError::from);

        AggregateOutput { file, excluded }
    }

    fn finish(
        &self,
        kind: &str,
        id: GeneratorId,
        variant: &Variant,
        path: PathBuf,
        content: String,
    ) -> GeneratedFile {
        let content = match variant.effective_params().header {
            Some(main) => with_header(&path, &main, id.as_str(), &content),
            None => content,
        };

        GeneratedFile {
            kind: kind.to_string(),
            generator: id,
            variant: variant.id,
            path,
            content,
        }
    }

    /// Run every cell and collect the outcome.
    pub fn run(&self, kinds: &[Kind]) -> RunReport {
        let variants = self.variants();
        let clashes = machine_name_clashes(kinds);

        let mut report = RunReport::default();
        let mut cells = Vec::new();
        for kind in kinds {
            for generator in &self.generators {
                for variant in &variants {
                    let cell = CellId::new(&kind.name, generator.id(), variant.id);
                    if kind.supports(variant.id) {
                        cells.push((cell, kind, generator.as_ref(), variant));
                    } else {
                        tracing::debug!(%cell, "variant not declared by kind, skipping");
                        report.skipped.push(cell);
                    }
                }
            }
        }

        tracing::info!(
            kinds = kinds.len(),
            generators = self.generators.len(),
            aggregates = self.aggregates.len(),
            cells = cells.len(),
            "running generation pipeline"
        );

        let mut outcomes: Vec<CellOutcome> = cells
            .into_par_iter()
            .map(|(cell, kind, generator, variant)| {
                tracing::debug!(%cell, "generating");
                let result = match clashes.get(&kind.name) {
                    Some(error) => Err(CellError::from(error.clone())),
                    None => self.generate(kind, generator, variant),
                };
                (cell, result)
            })
            .collect();

        for generator in &self.aggregates {
            for variant in &variants {
                let mut members = Vec::with_capacity(kinds.len());
                for kind in kinds {
                    if kind.supports(variant.id) {
                        members.push(kind);
                    } else {
                        report
                            .skipped
                            .push(CellId::new(&kind.name, generator.id(), variant.id));
                    }
                }

                let cell = CellId::new(ALL_KINDS, generator.id(), variant.id);
                tracing::debug!(%cell, kinds = members.len(), "generating aggregate");
                let output = self.generate_aggregate(&members, generator.as_ref(), variant);
                for failure in output.excluded {
                    tracing::warn!(
                        cell = %failure.cell,
                        category = failure.error.category(),
                        "kind left out of aggregate: {}",
                        failure.error
                    );
                    report.failures.push(failure);
                }
                outcomes.push((cell, output.file.map(|file| vec![file])));
            }
        }

        reject_shared_paths(&mut outcomes);

        let results: Vec<(CellId, Result<Vec<PathBuf>, CellError>)> = outcomes
            .into_par_iter()
            .map(|(cell, result)| {
                let result: Result<Vec<PathBuf>, CellError> = result.and_then(|files| {
                    files
                        .iter()
                        .map(|file| self.writer.write(file).map_err(CellError::from))
                        .collect()
                });
                (cell, result)
            })
            .collect();

        for (cell, result) in results {
            match result {
                Ok(paths) => {
                    for path in paths {
                        report.written.push(WrittenFile {
                            cell: cell.clone(),
                            path,
                        });
                    }
                }
                Err(error) => {
                    tracing::warn!(%cell, category = error.category(), "cell failed: {}", error);
                    report.failures.push(CellFailure { cell, error });
                }
            }
        }

        report.sort();

        tracing::info!(
            written = report.written.len(),
            failed = report.failures.len(),
            skipped = report.skipped.len(),
            "pipeline finished"
        );

        report
    }

    /// Record a kind that never reached [`Pipeline::run`], e.g. one whose
    /// file could not be loaded, as failed in every cell it would have had.
    pub fn reject(&self, report: &mut RunReport, kind: &str, error: &SchemaError) {
        tracing::warn!(kind, "kind rejected: {}", error);
        for id in self.generator_ids() {
            for variant in self.variants() {
                report.failures.push(CellFailure {
                    cell: CellId::new(kind, id, variant.id),
                    error: error.clone().into(),
                });
            }
        }
        report.sort();
    }
}

/// Kinds whose machine names collide, each mapped to the error its cells get.
fn machine_name_clashes<'a>(
    kinds: impl IntoIterator<Item = &'a Kind>,
) -> HashMap<String, SchemaError> {
    let mut claimants: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for kind in kinds {
        claimants
            .entry(kind.machine_name())
            .or_default()
            .push(kind.name.clone());
    }

    let mut clashes = HashMap::new();
    for (machine_name, mut names) in claimants {
        if names.len() < 2 {
            continue;
        }
        names.sort();
        for name in &names {
            clashes.insert(
                name.clone(),
                SchemaError::DuplicateOutputPath {
                    path: format!("{machine_name}/"),
                    kinds: names.clone(),
                },
            );
        }
    }
    clashes
}

/// Fail every cell that would write a path some other file also claims.
fn reject_shared_paths(outcomes: &mut [CellOutcome]) {
    let mut claimants: HashMap<PathBuf, Vec<String>> = HashMap::new();
    for (_, result) in outcomes.iter() {
        for file in result.iter().flatten() {
            claimants
                .entry(file.path.clone())
                .or_default()
                .push(file.kind.clone());
        }
    }

    for (cell, result) in outcomes.iter_mut() {
        let shared = result.as_ref().ok().and_then(|files| {
            files.iter().find_map(|file| {
                claimants
                    .get(&file.path)
                    .filter(|kinds| kinds.len() > 1)
                    .map(|kinds| (file.path.clone(), kinds.clone()))
            })
        });

        if let Some((path, mut kinds)) = shared {
            kinds.sort();
            kinds.dedup();
            tracing::debug!(%cell, path = %path.display(), "output path claimed twice");
            *result = Err(SchemaError::DuplicateOutputPath {
                path: path.display().to_string(),
                kinds,
            }
            .into());
        }
    }
}
