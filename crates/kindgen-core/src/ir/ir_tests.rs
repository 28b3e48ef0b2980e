#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

const FOLDER_JSON: &str = r#"{
  "name": "Folder",
  "maturity": "merged",
  "spec": {
    "fields": [
      { "name": "uid", "type": { "kind": "scalar", "scalar": "string" },
        "docs": ["Unique folder id. (will be k8s name)"] },
      { "name": "parent", "optional": true,
        "type": { "kind": "scalar", "scalar": "string" } },
      { "name": "tags",
        "type": { "kind": "array", "items": { "kind": "scalar", "scalar": "string" } } },
      { "name": "mode",
        "type": { "kind": "enum", "values": ["a", "b"] } }
    ]
  }
}"#;

#[test]
fn Kind___from_json___fills_defaults() {
    let kind = Kind::from_json(FOLDER_JSON).unwrap();

    assert_eq!(kind.name, "Folder");
    assert_eq!(kind.variants, vec![VariantId::NoParams, VariantId::WithParams]);
    assert_eq!(kind.metadata, Section::common_metadata());
    assert_eq!(kind.status, common::standard_status());
    assert!(kind.definitions.is_empty());
}

#[test]
fn Kind___from_json___parses_field_shapes() {
    let kind = Kind::from_json(FOLDER_JSON).unwrap();
    let fields = &kind.spec.fields;

    assert_eq!(fields.len(), 4);
    assert_eq!(fields[0].docs, vec!["Unique folder id. (will be k8s name)"]);
    assert!(fields[1].optional);
    assert_eq!(fields[2].ty, TypeRef::array(TypeRef::string()));
    assert_eq!(fields[3].ty, TypeRef::enumeration(["a", "b"]));
}

#[test]
fn Kind___from_json___unknown_type_kind___fails() {
    let json = r#"{ "name": "X", "spec": { "fields": [
        { "name": "a", "type": { "kind": "tuple" } } ] } }"#;

    assert!(Kind::from_json(json).is_err());
}

#[test]
fn TypeRef___serialize___uses_internal_tag() {
    let json = serde_json::to_value(TypeRef::map(TypeRef::any())).unwrap();

    assert_eq!(
        json,
        serde_json::json!({ "kind": "map", "values": { "kind": "scalar", "scalar": "any" } })
    );
}

#[test_case("Folder", "folder")]
#[test_case("PlaylistItem", "playlist_item")]
fn Kind___machine_name___derived_from_name(name: &str, expected: &str) {
    let kind = Kind::new(name, StructType::default());

    assert_eq!(kind.machine_name(), expected);
}

#[test]
fn Kind___machine_name___explicit_value_wins() {
    let mut kind = Kind::new("Folder", StructType::default());
    kind.machine_name = Some("dir".into());

    assert_eq!(kind.machine_name(), "dir");
}

#[test]
fn Kind___plural_name___defaults_to_suffix_s() {
    let kind = Kind::new("Folder", StructType::default());

    assert_eq!(kind.plural_name(), "Folders");
}

#[test]
fn Kind___supports___respects_declared_variants() {
    let mut kind = Kind::new("Folder", StructType::default());
    kind.variants = vec![VariantId::NoParams];

    assert!(kind.supports(VariantId::NoParams));
    assert!(!kind.supports(VariantId::WithParams));
}

#[test]
fn Kind___definition___local_overrides_builtin() {
    let mut kind = Kind::new("Folder", StructType::default());
    kind.definitions.push(Definition::new(
        common::COMMON_METADATA,
        TypeRef::structure(vec![Field::required("uid", TypeRef::string())]),
    ));

    let def = kind.definition(common::COMMON_METADATA).unwrap();

    assert_eq!(
        def.ty,
        TypeRef::structure(vec![Field::required("uid", TypeRef::string())])
    );
}

#[test]
fn Kind___definition___falls_back_to_builtin() {
    let kind = Kind::new("Folder", StructType::default());

    assert!(kind.definition(common::COMMON_METADATA).is_some());
    assert!(kind.definition("Missing").is_none());
}

#[test]
fn Kind___validate___well_formed___ok() {
    let kind = Kind::from_json(FOLDER_JSON).unwrap();

    assert!(kind.validate().is_ok());
}

#[test]
fn Kind___validate___empty_name___fails() {
    let kind = Kind::new("  ", StructType::default());

    assert_eq!(kind.validate(), Err(SchemaError::EmptyKindName));
}

#[test_case("My Folder")]
#[test_case("folder")]
#[test_case("Folder-v2")]
fn Kind___validate___non_pascal_name___fails(name: &str) {
    let kind = Kind::new(name, StructType::default());

    assert_eq!(kind.validate(), Err(SchemaError::InvalidKindName(name.into())));
}

#[test_case("../../escape")]
#[test_case("nested/folder")]
#[test_case("Folder")]
#[test_case("")]
fn Kind___validate___machine_name_not_a_segment___fails(machine_name: &str) {
    let mut kind = Kind::new("Folder", StructType::default());
    kind.machine_name = Some(machine_name.into());

    assert_eq!(
        kind.validate(),
        Err(SchemaError::InvalidMachineName(machine_name.into()))
    );
}

#[test]
fn Kind___validate___machine_name_from_json___checked() {
    let kind = Kind::from_json(
        r#"{ "name": "Folder", "machineName": "../../escape", "spec": { "fields": [] } }"#,
    )
    .unwrap();

    assert!(matches!(kind.validate(), Err(SchemaError::InvalidMachineName(_))));
}

#[test]
fn Kind___validate___definition_named_like_kind___fails() {
    let mut kind = Kind::new("Folder", StructType::default());
    kind.definitions = vec![Definition::new("Folder", TypeRef::string())];

    assert_eq!(
        kind.validate(),
        Err(SchemaError::DefinitionShadowsKind("Folder".into()))
    );
}

#[test]
fn Kind___validate___kind_named_like_builtin___fails() {
    let kind = Kind::new("CommonMetadata", StructType::default());

    assert_eq!(
        kind.validate(),
        Err(SchemaError::DefinitionShadowsKind("CommonMetadata".into()))
    );
}

#[test]
fn Kind___validate___duplicate_field___reports_path() {
    let kind = Kind::new(
        "Folder",
        StructType::new(vec![
            Field::required("uid", TypeRef::string()),
            Field::optional("uid", TypeRef::string()),
        ]),
    );

    assert_eq!(
        kind.validate(),
        Err(SchemaError::DuplicateField {
            path: "spec".into(),
            field: "uid".into(),
        })
    );
}

#[test]
fn Kind___validate___nested_empty_enum___reports_path() {
    let kind = Kind::new(
        "Folder",
        StructType::new(vec![Field::required(
            "options",
            TypeRef::structure(vec![Field::required(
                "mode",
                TypeRef::enumeration(Vec::<String>::new()),
            )]),
        )]),
    );

    assert_eq!(
        kind.validate(),
        Err(SchemaError::EmptyEnum {
            path: "spec.options.mode".into(),
        })
    );
}

#[test]
fn Kind___validate___duplicate_enum_value___fails() {
    let kind = Kind::new(
        "Folder",
        StructType::new(vec![Field::required(
            "mode",
            TypeRef::enumeration(["a", "a"]),
        )]),
    );

    assert_eq!(
        kind.validate(),
        Err(SchemaError::DuplicateEnumValue {
            path: "spec.mode".into(),
            value: "a".into(),
        })
    );
}

#[test]
fn Kind___validate___duplicate_definition___fails() {
    let mut kind = Kind::new("Folder", StructType::default());
    kind.definitions = vec![
        Definition::new("Owner", TypeRef::string()),
        Definition::new("Owner", TypeRef::boolean()),
    ];

    assert_eq!(
        kind.validate(),
        Err(SchemaError::DuplicateDefinition("Owner".into()))
    );
}

#[test]
fn Maturity___ordering___follows_milestones() {
    assert!(Maturity::Merged < Maturity::Experimental);
    assert!(Maturity::Experimental < Maturity::Stable);
    assert!(Maturity::Stable < Maturity::Mature);
    assert_eq!(Maturity::Stable.to_string(), "stable");
}

#[test_case("NoParams", Some(VariantId::NoParams))]
#[test_case("with-params", Some(VariantId::WithParams))]
#[test_case("Other", None)]
fn VariantId___parse___accepts_both_spellings(input: &str, expected: Option<VariantId>) {
    assert_eq!(VariantId::parse(input), expected);
}
