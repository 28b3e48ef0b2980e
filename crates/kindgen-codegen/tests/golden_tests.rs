//! Golden-file tests for generated output.
//!
//! Generated files are compared byte-for-byte with the checked-in copies
//! under `testdata/output`. Set `KINDGEN_UPDATE_GOLDEN=1` to rewrite them.

#![allow(non_snake_case)]

use kindgen_codegen::{
    GeneratorId, GeneratorParams, OutputWriter, Pipeline, Variant, WriteMode,
    typescript::generate_typescript,
};
use kindgen_core::{Kind, resolve};
use std::path::PathBuf;

fn testdata() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn load_kind(name: &str) -> Kind {
    let path = testdata().join("kinds").join(format!("{name}.json"));
    let content = std::fs::read_to_string(&path).unwrap();
    Kind::from_json(&content).unwrap()
}

fn golden_mode() -> WriteMode {
    match std::env::var("KINDGEN_UPDATE_GOLDEN") {
        Ok(value) if value == "1" || value == "true" => WriteMode::Write,
        _ => WriteMode::Verify,
    }
}

#[test]
fn folder___ts_types_no_params___matches_golden_file() {
    let pipeline = Pipeline::new(OutputWriter::new(testdata().join("output")).with_mode(golden_mode()))
        .with_generator_id(GeneratorId::TsTypes)
        .with_variant(Variant::no_params())
        .with_prefix(GeneratorId::TsTypes, "root");

    let report = pipeline.run(&[load_kind("folder")]);

    for failure in &report.failures {
        eprintln!("{}: {}", failure.cell, failure.error);
    }
    assert!(report.is_success());
    assert_eq!(report.written.len(), 1);
}

#[test]
fn folder___ts_types___standalone_spec_then_envelope() {
    let resolved = resolve(&load_kind("folder")).unwrap();

    let code = generate_typescript(&resolved, &GeneratorParams::default());

    let spec = code.find("export interface spec {").unwrap();
    let envelope = code.find("export interface Folder {").unwrap();
    assert!(spec < envelope);
    assert!(code.contains("state: ('success' | 'in_progress' | 'failed'),"));
}

#[test]
fn folder___ts_types___optionality_fidelity() {
    let kind = load_kind("folder");
    let resolved = resolve(&kind).unwrap();

    let code = generate_typescript(&resolved, &GeneratorParams::default());

    for field in &kind.spec.fields {
        let marker = if field.optional {
            format!("{}?: ", field.name)
        } else {
            format!("{}: ", field.name)
        };
        assert!(code.contains(&marker), "missing `{marker}`");
    }
}

#[test]
fn folder___ts_types___rendering_is_idempotent() {
    let resolved = resolve(&load_kind("folder")).unwrap();

    let first = generate_typescript(&resolved, &GeneratorParams::default());
    let second = generate_typescript(&resolve(&load_kind("folder")).unwrap(), &GeneratorParams::default());

    assert_eq!(first, second);
}
