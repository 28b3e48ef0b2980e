//! Go types split per envelope section.
//!
//! The kind's resource file `{machine}_gen.go` holds only the envelope
//! struct, whose `metadata`, `spec` and `status` members refer to section
//! types named after the capitalised section. Each section then gets its
//! own `{machine}_{section}_gen.go` with its root type and the declarations
//! it reaches. A declaration reached from several sections is emitted once,
//! in the first section that reaches it.

use crate::envelope::envelope_fields;
use crate::generator::{Generator, GeneratorId, GeneratorParams, RenderedFile, Variant};
use crate::golang::{GoWriter, declarations_use_time, go_file, package_name, uses_date_time};
use kindgen_core::naming::to_identifier;
use kindgen_core::{
    Declaration, ResolvePolicy, ResolvedField, ResolvedKind, ResolvedType,
    UnsupportedConstructError,
};
use std::collections::HashSet;

const TARGET: &str = "go";

/// Renders `{machine}_gen.go` plus one file per envelope section.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoSectionTypesGenerator;

impl Generator for GoSectionTypesGenerator {
    fn id(&self) -> GeneratorId {
        GeneratorId::GoSectionTypes
    }

    fn policy(&self) -> ResolvePolicy {
        ResolvePolicy::NOMINAL
    }

    fn render(
        &self,
        kind: &ResolvedKind,
        variant: &Variant,
    ) -> Result<String, UnsupportedConstructError> {
        let files = generate_go_sections(kind, &variant.effective_params())?;
        Ok(files
            .into_iter()
            .next()
            .map(|file| file.content)
            .unwrap_or_default())
    }

    fn render_files(
        &self,
        kind: &ResolvedKind,
        variant: &Variant,
    ) -> Result<Vec<RenderedFile>, UnsupportedConstructError> {
        generate_go_sections(kind, &variant.effective_params())
    }
}

/// Render the resource file followed by the section files, in envelope order.
pub fn generate_go_sections(
    kind: &ResolvedKind,
    params: &GeneratorParams,
) -> Result<Vec<RenderedFile>, UnsupportedConstructError> {
    let writer = GoWriter::new(params.member_order);
    let envelope = envelope_fields(kind, params.metadata);
    let package = package_name(kind, params);

    let mut sections: Vec<(String, &ResolvedField)> = Vec::with_capacity(envelope.len());
    for field in &envelope {
        let name = to_identifier(&field.name).ok_or_else(|| {
            UnsupportedConstructError::new(format!("section name '{}'", field.name), TARGET)
        })?;
        sections.push((name, field));
    }

    let reachable = kind.reachable(envelope.iter().map(|f| &f.ty));
    if let Some(decl) = reachable
        .iter()
        .find(|d| sections.iter().any(|(name, _)| *name == d.name))
    {
        return Err(UnsupportedConstructError::new(
            format!("declaration '{}' shadows the section type of the same name", decl.name),
            TARGET,
        ));
    }

    let mut files = Vec::with_capacity(sections.len() + 1);

    let members: Vec<ResolvedField> = sections
        .iter()
        .map(|(name, field)| ResolvedField {
            ty: ResolvedType::Named(name.clone()),
            ..(*field).clone()
        })
        .collect();
    let resource = writer.envelope(kind, &members)?;
    files.push(RenderedFile {
        name: format!("{}_gen.go", kind.machine_name),
        content: go_file(&package, false, &[], vec![(kind.name.clone(), resource)])?,
    });

    let mut claimed: HashSet<String> = HashSet::new();
    for (name, field) in &sections {
        let decls: Vec<&Declaration> = kind
            .reachable([&field.ty])
            .into_iter()
            .filter(|d| claimed.insert(d.name.clone()))
            .collect();

        let mut types = Vec::with_capacity(decls.len() + 1);
        types.push((name.clone(), writer.named(name, &field.docs, &field.ty)?));
        for decl in &decls {
            types.push((decl.name.clone(), writer.declaration(decl)?));
        }

        let uses_time = uses_date_time(&field.ty) || declarations_use_time(&decls);
        files.push(RenderedFile {
            name: format!("{}_{}_gen.go", kind.machine_name, field.name.to_lowercase()),
            content: go_file(&package, uses_time, &decls, types)?,
        });
    }

    Ok(files)
}
