//! TypeScript index re-exporting every kind of a run.
//!
//! One line per kind, sorted by machine name:
//!
//! ```text
//! export type { Folder, spec as FolderSpec } from './folder/folder_types.gen';
//! ```
//!
//! Module paths are relative to the package root that holds the per-kind
//! `{machine}/` directories written by the `ts-types` generator.

use crate::generator::{AggregateGenerator, GeneratorId, Variant};
use kindgen_core::{ResolvePolicy, ResolvedKind, UnsupportedConstructError};
use std::collections::HashSet;

const TARGET: &str = "typescript";

/// Renders `index.gen.ts` for all kinds of a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct TsIndexGenerator;

impl AggregateGenerator for TsIndexGenerator {
    fn id(&self) -> GeneratorId {
        GeneratorId::TsIndex
    }

    fn policy(&self) -> ResolvePolicy {
        ResolvePolicy::INLINE
    }

    fn render(
        &self,
        kinds: &[ResolvedKind],
        _variant: &Variant,
    ) -> Result<String, UnsupportedConstructError> {
        generate_ts_index(kinds)
    }
}

/// Render the index module. Two kinds may share neither a name nor a
/// machine name.
pub fn generate_ts_index(kinds: &[ResolvedKind]) -> Result<String, UnsupportedConstructError> {
    if kinds.is_empty() {
        return Ok("export {};\n".to_string());
    }

    let mut sorted: Vec<&ResolvedKind> = kinds.iter().collect();
    sorted.sort_by(|a, b| a.machine_name.cmp(&b.machine_name));

    let mut names = HashSet::new();
    let mut modules = HashSet::new();
    let mut code = String::new();
    for kind in sorted {
        if !names.insert(kind.name.as_str()) {
            return Err(UnsupportedConstructError::new(
                format!("kind '{}' exported twice", kind.name),
                TARGET,
            ));
        }
        if !modules.insert(kind.machine_name.as_str()) {
            return Err(UnsupportedConstructError::new(
                format!("module './{0}/{0}_types.gen' exported twice", kind.machine_name),
                TARGET,
            ));
        }

        code.push_str(&format!(
            "export type {{ {name}, spec as {name}Spec }} from './{machine}/{machine}_{suffix}';\n",
            name = kind.name,
            machine = kind.machine_name,
            suffix = module_suffix(),
        ));
    }
    Ok(code)
}

/// The `ts-types` file name without its `.ts` extension.
fn module_suffix() -> &'static str {
    let suffix = GeneratorId::TsTypes.artifact_suffix();
    suffix.strip_suffix(".ts").unwrap_or(suffix)
}
