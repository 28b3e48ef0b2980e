//! JSON Schema generation from resolved kinds.

use crate::envelope::{envelope_fields, ordered};
use crate::generator::{Generator, GeneratorId, GeneratorParams, MemberOrder, Variant};
use kindgen_core::{
    DeclarationBody, ResolvePolicy, ResolvedField, ResolvedKind, ResolvedType, ScalarKind,
    UnsupportedConstructError,
};
use serde_json::{Value, json};

/// Renders `{machine}_types_gen.json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSchemaGenerator;

impl Generator for JsonSchemaGenerator {
    fn id(&self) -> GeneratorId {
        GeneratorId::JsonSchema
    }

    fn policy(&self) -> ResolvePolicy {
        ResolvePolicy::INLINE
    }

    fn render(
        &self,
        kind: &ResolvedKind,
        variant: &Variant,
    ) -> Result<String, UnsupportedConstructError> {
        let schema = generate_json_schema(kind, &variant.effective_params());
        Ok(format!("{schema:#}\n"))
    }
}

/// Generate a draft-07 JSON Schema with the kind envelope as its root.
pub fn generate_json_schema(kind: &ResolvedKind, params: &GeneratorParams) -> Value {
    let order = params.member_order;
    let envelope = envelope_fields(kind, params.metadata);

    let mut definitions = serde_json::Map::new();
    for decl in kind.reachable(envelope.iter().map(|f| &f.ty)) {
        let mut schema = match &decl.body {
            DeclarationBody::Struct(s) => object_schema(ordered(&s.fields, order), order),
            DeclarationBody::Enum(values) => enum_schema(values),
            DeclarationBody::Alias(ty) => type_schema(ty, order),
        };
        describe(&mut schema, &decl.docs);
        definitions.insert(decl.name.clone(), schema);
    }

    let mut schema = json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "title": kind.name,
    });
    describe(&mut schema, &kind.description);

    // Envelope keeps metadata/spec/status order
    if let (Value::Object(root), Value::Object(body)) =
        (&mut schema, object_schema(envelope.iter().collect(), order))
    {
        root.extend(body);
    }

    if !definitions.is_empty() {
        schema["definitions"] = Value::Object(definitions);
    }

    schema
}

/// Object schema for fields already in output order.
fn object_schema(fields: Vec<&ResolvedField>, order: MemberOrder) -> Value {
    let mut properties = serde_json::Map::new();
    let mut required = Vec::new();

    for field in fields {
        let mut property = type_schema(&field.ty, order);
        describe(&mut property, &field.docs);
        properties.insert(field.name.clone(), property);

        if !field.optional {
            required.push(field.name.clone());
        }
    }

    let mut schema = json!({
        "type": "object",
        "properties": properties,
    });

    if !required.is_empty() {
        schema["required"] = json!(required);
    }

    schema
}

/// Generate JSON Schema for a resolved type.
fn type_schema(ty: &ResolvedType, order: MemberOrder) -> Value {
    match ty {
        ResolvedType::Scalar(ScalarKind::String) => json!({"type": "string"}),
        ResolvedType::Scalar(ScalarKind::DateTime) => {
            json!({"type": "string", "format": "date-time"})
        }
        ResolvedType::Scalar(ScalarKind::Boolean) => json!({"type": "boolean"}),
        ResolvedType::Scalar(ScalarKind::Int64) => json!({"type": "integer"}),
        ResolvedType::Scalar(ScalarKind::Float64) => json!({"type": "number"}),
        ResolvedType::Scalar(ScalarKind::Any) => json!({}),
        ResolvedType::Enum(values) => enum_schema(values),
        ResolvedType::Array(inner) => json!({
            "type": "array",
            "items": type_schema(inner, order),
        }),
        ResolvedType::Map(inner) => json!({
            "type": "object",
            "additionalProperties": type_schema(inner, order),
        }),
        ResolvedType::Struct(s) => object_schema(ordered(&s.fields, order), order),
        ResolvedType::Named(name) => json!({
            "$ref": format!("#/definitions/{}", name)
        }),
    }
}

fn enum_schema(values: &[String]) -> Value {
    json!({"type": "string", "enum": values})
}

fn describe(schema: &mut Value, docs: &[String]) {
    if !docs.is_empty() {
        schema["description"] = json!(docs.join("\n"));
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::generator::MetadataMode;
    use kindgen_core::{Field, Kind, StructType, TypeRef, resolve};

    fn folder() -> ResolvedKind {
        resolve(&Kind::new(
            "Folder",
            StructType::new(vec![
                Field::required("uid", TypeRef::string()).with_docs(["Unique folder id."]),
                Field::optional("parent", TypeRef::string()),
            ]),
        ))
        .unwrap()
    }

    #[test]
    fn generate_json_schema___root___is_envelope_object() {
        let schema = generate_json_schema(&folder(), &GeneratorParams::default());

        assert_eq!(schema["$schema"], "http://json-schema.org/draft-07/schema#");
        assert_eq!(schema["title"], "Folder");
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["metadata", "spec", "status"]));
        let keys: Vec<_> = schema["properties"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["metadata", "spec", "status"]);
    }

    #[test]
    fn generate_json_schema___fields___keep_docs_and_optionality() {
        let schema = generate_json_schema(&folder(), &GeneratorParams::default());
        let spec = &schema["properties"]["spec"];

        assert_eq!(spec["properties"]["uid"]["description"], "Unique folder id.");
        assert_eq!(spec["required"], json!(["uid"]));
    }

    #[test]
    fn generate_json_schema___inline_metadata___no_definitions() {
        let schema = generate_json_schema(&folder(), &GeneratorParams::default());

        assert!(schema.get("definitions").is_none());
        assert_eq!(
            schema["properties"]["metadata"]["properties"]["creationTimestamp"],
            json!({"type": "string", "format": "date-time"})
        );
    }

    #[test]
    fn generate_json_schema___reference_metadata___uses_ref() {
        let params = GeneratorParams {
            metadata: MetadataMode::Reference,
            ..GeneratorParams::default()
        };

        let schema = generate_json_schema(&folder(), &params);

        assert_eq!(
            schema["properties"]["metadata"]["$ref"],
            "#/definitions/CommonMetadata"
        );
        assert_eq!(schema["definitions"]["CommonMetadata"]["type"], "object");
    }

    #[test]
    fn type_schema___map_of_struct___uses_additional_properties() {
        let schema = generate_json_schema(&folder(), &GeneratorParams::default());
        let states = &schema["properties"]["status"]["properties"]["operatorStates"];

        assert_eq!(states["type"], "object");
        assert_eq!(
            states["additionalProperties"]["properties"]["state"]["enum"],
            json!(["success", "in_progress", "failed"])
        );
    }

    #[test]
    fn type_schema___handles_primitives() {
        assert_eq!(
            type_schema(&ResolvedType::Scalar(ScalarKind::Int64), MemberOrder::Declared),
            json!({"type": "integer"})
        );
        assert_eq!(
            type_schema(&ResolvedType::Scalar(ScalarKind::Any), MemberOrder::Declared),
            json!({})
        );
    }

    #[test]
    fn JsonSchemaGenerator___render___pretty_with_trailing_newline() {
        let text = JsonSchemaGenerator
            .render(&folder(), &Variant::no_params())
            .unwrap();

        assert!(text.starts_with("{\n  \"$schema\""));
        assert!(text.ends_with("}\n"));
    }
}
