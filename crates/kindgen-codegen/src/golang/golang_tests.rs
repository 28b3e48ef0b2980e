#![allow(non_snake_case)]

use super::*;
use crate::generator::MetadataMode;
use kindgen_core::{Field, Kind, ResolvePolicy, Resolver, StructType, TypeRef, VariantId};
use test_case::test_case;

fn widget() -> Kind {
    let mut kind = Kind::new(
        "Widget",
        StructType::new(vec![
            Field::required("name", TypeRef::string()),
            Field::required("mode", TypeRef::enumeration(["on", "off"]))
                .with_docs(["Mode of the widget."]),
            Field::optional("createdAt", TypeRef::date_time()),
        ]),
    );
    kind.metadata.ty = TypeRef::structure(vec![Field::required("uid", TypeRef::string())]);
    kind.status = StructType::default();
    kind
}

fn render(kind: &Kind, params: &GeneratorParams) -> Result<String, UnsupportedConstructError> {
    let resolved = Resolver::new(ResolvePolicy::NOMINAL).resolve(kind).unwrap();
    generate_go(&resolved, params)
}

#[test]
fn generate_go___widget___exact_output() {
    let code = render(&widget(), &GeneratorParams::default()).unwrap();

    let expected = concat!(
        "package widget\n",
        "\n",
        "import (\n",
        "\t\"time\"\n",
        ")\n",
        "\n",
        "// Defines values for SpecMode.\n",
        "const (\n",
        "\tSpecModeOn  SpecMode = \"on\"\n",
        "\tSpecModeOff SpecMode = \"off\"\n",
        ")\n",
        "\n",
        "// SpecMode Mode of the widget.\n",
        "type SpecMode string\n",
        "\n",
        "// Widget defines model for Widget.\n",
        "type Widget struct {\n",
        "\tMetadata struct {\n",
        "\t\tUid string `json:\"uid\"`\n",
        "\t} `json:\"metadata\"`\n",
        "\tSpec struct {\n",
        "\t\tName string `json:\"name\"`\n",
        "\n",
        "\t\t// Mode of the widget.\n",
        "\t\tMode      SpecMode   `json:\"mode\"`\n",
        "\t\tCreatedAt *time.Time `json:\"createdAt,omitempty\"`\n",
        "\t} `json:\"spec\"`\n",
        "\tStatus struct{} `json:\"status\"`\n",
        "}\n",
    );
    assert_eq!(code, expected);
}

#[test]
fn generate_go___no_date_time___omits_time_import() {
    let mut kind = widget();
    kind.spec.fields.pop();

    let code = render(&kind, &GeneratorParams::default()).unwrap();

    assert!(!code.contains("import"));
}

#[test]
fn generate_go___standard_status___extracts_operator_state() {
    let mut kind = widget();
    kind.status = kindgen_core::common::standard_status();

    let code = render(&kind, &GeneratorParams::default()).unwrap();

    assert!(code.contains("\t\tOperatorStates map[string]StatusOperatorStates `json:\"operatorStates,omitempty\"`\n"));
    assert!(code.contains("// StatusOperatorStates defines model for StatusOperatorStates.\ntype StatusOperatorStates struct {\n"));
    assert!(code.contains("\tStatusOperatorStatesStateInProgress StatusOperatorStatesState = \"in_progress\"\n"));
    assert!(code.contains("\tDescriptiveState *string `json:\"descriptiveState,omitempty\"`\n"));
    assert!(code.contains("\tDetails map[string]any `json:\"details,omitempty\"`\n"));
}

#[test]
fn generate_go___declared_enum_order___preserved_in_const_block() {
    let mut kind = widget();
    kind.spec.fields[1].ty = TypeRef::enumeration(["zeta", "alpha"]);

    let code = render(&kind, &GeneratorParams::default()).unwrap();

    let zeta = code.find("SpecModeZeta").unwrap();
    let alpha = code.find("SpecModeAlpha").unwrap();
    assert!(zeta < alpha);
}

#[test]
fn generate_go___literal_without_identifier___unsupported() {
    let mut kind = widget();
    kind.spec.fields[1].ty = TypeRef::enumeration(["9lives"]);

    let err = render(&kind, &GeneratorParams::default()).unwrap_err();

    assert_eq!(err.target, "go");
    assert_eq!(err.construct, "enum literal '9lives' in SpecMode");
}

#[test]
fn generate_go___inline_enum___unsupported() {
    let resolved = Resolver::new(ResolvePolicy::INLINE).resolve(&widget()).unwrap();

    let err = generate_go(&resolved, &GeneratorParams::default()).unwrap_err();

    assert_eq!(err.construct, "inline enum at Widget.spec.mode");
}

#[test]
fn generate_go___reference_metadata___names_common_metadata() {
    let kind = Kind::new(
        "Folder",
        StructType::new(vec![Field::required("uid", TypeRef::string())]),
    );
    let params = GeneratorParams {
        metadata: MetadataMode::Reference,
        ..GeneratorParams::default()
    };

    let code = render(&kind, &params).unwrap();

    assert!(code.contains("\tMetadata CommonMetadata `json:\"metadata\"`\n"));
    assert!(code.contains("type CommonMetadata struct {\n"));
    assert!(code.contains("\tDeletionTimestamp *time.Time `json:\"deletionTimestamp,omitempty\"`\n"));
}

#[test]
fn generate_go___package_param___overrides_machine_name() {
    let params = GeneratorParams {
        package: Some("models".into()),
        ..GeneratorParams::default()
    };

    let code = render(&widget(), &params).unwrap();

    assert!(code.starts_with("package models\n"));
}

#[test]
fn generate_go___alphabetical_order___sorts_fields() {
    let params = GeneratorParams {
        member_order: MemberOrder::Alphabetical,
        ..GeneratorParams::default()
    };

    let code = render(&widget(), &params).unwrap();

    let created = code.find("CreatedAt").unwrap();
    let name = code.find("\t\tName").unwrap();
    assert!(created < name);
}

#[test]
fn type_comment___multi_line_docs___prefixes_first_line_with_name() {
    let docs = vec!["first line".to_string(), String::new(), "third".to_string()];

    assert_eq!(
        type_comment("Thing", &docs),
        "// Thing first line\n//\n// third\n"
    );
}

#[test_case(&["Thing"], "// Thing\n" ; "bare name")]
#[test_case(&["Thing is a widget."], "// Thing is a widget.\n" ; "leading name")]
#[test_case(&["Things are widgets."], "// Thing Things are widgets.\n" ; "name as word prefix")]
fn type_comment___docs_opening_with_name___not_repeated(docs: &[&str], expected: &str) {
    let docs: Vec<String> = docs.iter().map(|d| d.to_string()).collect();

    assert_eq!(type_comment("Thing", &docs), expected);
}

#[test]
fn generate_go___kind_description_opening_with_name___single_prefix() {
    let mut kind = widget();
    kind.description = vec!["Widget is a test kind.".into()];

    let code = render(&kind, &GeneratorParams::default()).unwrap();

    assert!(code.contains("\n// Widget is a test kind.\ntype Widget struct {\n"));
    assert!(!code.contains("Widget Widget"));
}

#[test]
fn generate_go___fields_sharing_identifier___unsupported() {
    let mut kind = widget();
    kind.spec.fields = vec![
        Field::required("fooBar", TypeRef::string()),
        Field::required("foo_bar", TypeRef::string()),
    ];

    let err = render(&kind, &GeneratorParams::default()).unwrap_err();

    assert!(err.construct.contains("'fooBar' and 'foo_bar'"), "{}", err);
    assert!(err.construct.contains("'FooBar'"), "{}", err);
}

#[test]
fn generate_go___nested_fields_sharing_identifier___unsupported() {
    let mut kind = widget();
    kind.spec.fields = vec![Field::required(
        "inner",
        TypeRef::structure(vec![
            Field::required("a-b", TypeRef::string()),
            Field::optional("a_b", TypeRef::string()),
        ]),
    )];

    let err = render(&kind, &GeneratorParams::default()).unwrap_err();

    assert!(err.construct.contains("spec.inner"), "{}", err);
}

#[test]
fn generate_go___enum_literals_sharing_constant___unsupported() {
    let mut kind = widget();
    kind.spec.fields = vec![Field::required(
        "mode",
        TypeRef::enumeration(["a-b", "a_b"]),
    )];

    let err = render(&kind, &GeneratorParams::default()).unwrap_err();

    assert!(err.construct.contains("'a-b' and 'a_b'"), "{}", err);
    assert!(err.construct.contains("SpecModeAB"), "{}", err);
}

#[test]
fn GoTypesGenerator___render___with_params_applies_payload() {
    let resolved = Resolver::new(ResolvePolicy::NOMINAL).resolve(&widget()).unwrap();
    let variant = Variant {
        id: VariantId::WithParams,
        params: GeneratorParams {
            package: Some("api".into()),
            ..GeneratorParams::default()
        },
    };

    let code = GoTypesGenerator.render(&resolved, &variant).unwrap();

    assert!(code.starts_with("package api\n"));
}
