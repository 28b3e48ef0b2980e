#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

#[test]
fn SchemaError___cycle___displays_chain() {
    let err = SchemaError::Cycle {
        chain: vec!["Node".into(), "Edge".into(), "Node".into()],
    };

    assert_eq!(err.to_string(), "cyclic reference: Node -> Edge -> Node");
}

#[test]
fn SchemaError___unresolved_reference___displays_name_and_path() {
    let err = SchemaError::UnresolvedReference {
        path: "spec.owner".into(),
        name: "Owner".into(),
    };

    assert_eq!(err.to_string(), "unresolved reference 'Owner' at spec.owner");
}

#[test_case(SchemaError::EmptyKindName, "empty_kind_name")]
#[test_case(SchemaError::EmptyName { path: "spec".into() }, "empty_name")]
#[test_case(SchemaError::DuplicateField { path: "spec".into(), field: "uid".into() }, "duplicate_field")]
#[test_case(SchemaError::DuplicateDefinition("A".into()), "duplicate_definition")]
#[test_case(SchemaError::EmptyEnum { path: "spec.mode".into() }, "empty_enum")]
#[test_case(SchemaError::DuplicateEnumValue { path: "spec.mode".into(), value: "a".into() }, "duplicate_enum_value")]
#[test_case(SchemaError::UnresolvedReference { path: "spec".into(), name: "X".into() }, "unresolved_reference")]
#[test_case(SchemaError::Cycle { chain: vec![] }, "cycle")]
#[test_case(SchemaError::InvalidKindName("My Folder".into()), "invalid_kind_name")]
#[test_case(SchemaError::InvalidMachineName("../x".into()), "invalid_machine_name")]
#[test_case(SchemaError::DefinitionShadowsKind("Folder".into()), "definition_shadows_kind")]
#[test_case(SchemaError::Malformed { source_name: "bad".into(), message: "eof".into() }, "malformed")]
#[test_case(SchemaError::DuplicateOutputPath { path: "a".into(), kinds: vec![] }, "duplicate_output_path")]
fn SchemaError___variant___maps_to_code(error: SchemaError, expected: &str) {
    assert_eq!(error.code(), expected);
}

#[test]
fn SchemaError___duplicate_output_path___lists_kinds() {
    let err = SchemaError::DuplicateOutputPath {
        path: "folder/folder_types.gen.ts".into(),
        kinds: vec!["Directory".into(), "Folder".into()],
    };

    assert_eq!(
        err.to_string(),
        "output path folder/folder_types.gen.ts is claimed by Directory, Folder"
    );
}

#[test]
fn UnsupportedConstructError___display___names_construct_and_target() {
    let err = UnsupportedConstructError::new("inline enum at spec.mode", "go");

    assert_eq!(
        err.to_string(),
        "unsupported construct inline enum at spec.mode for target language go"
    );
}

#[test]
fn WriteError___io___displays_path() {
    let err = WriteError::io(
        "out/folder/folder_types.gen.ts",
        std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
    );

    let msg = err.to_string();
    assert!(msg.contains("out/folder/folder_types.gen.ts"));
    assert!(msg.contains("denied"));
}

#[test]
fn WriteError___stale___exposes_path() {
    let err = WriteError::Stale {
        path: PathBuf::from("a/b.ts"),
    };

    assert_eq!(err.path(), std::path::Path::new("a/b.ts"));
    assert_eq!(err.to_string(), "generated output is stale: a/b.ts");
}
