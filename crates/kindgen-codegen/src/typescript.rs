//! TypeScript type declarations.
//!
//! Output layout:
//!
//! ```text
//! export interface spec { ... }      standalone spec fields
//!
//! export interface Folder { ... }    metadata/spec/status envelope
//!
//! export interface X { ... }         one per reachable declaration
//! ```
//!
//! # Type mapping
//!
//! | IR | TypeScript |
//! |----|------------|
//! | `string`, `dateTime` | `string` |
//! | `int64`, `float64` | `number` |
//! | `boolean` | `boolean` |
//! | `any` | `unknown` |
//! | enum | `('a' \| 'b')` |
//! | array | `Array<T>` |
//! | map | `Record<string, T>` |
//!
//! Struct literals in member position nest one level deeper with `;`
//! separators. Struct literals that are type arguments of `Record`/`Array`
//! are emitted flush: members at one indent with `,` separators and the
//! closing brace at column 0. Existing generated files depend on that layout.

use crate::envelope::{envelope_fields, ordered};
use crate::generator::{Generator, GeneratorId, GeneratorParams, MemberOrder, Variant};
use kindgen_core::{
    Declaration, DeclarationBody, ResolvePolicy, ResolvedField, ResolvedKind, ResolvedType,
    ScalarKind, UnsupportedConstructError,
};

const INDENT: &str = "  ";

/// Renders `{machine}_types.gen.ts`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeScriptGenerator;

impl Generator for TypeScriptGenerator {
    fn id(&self) -> GeneratorId {
        GeneratorId::TsTypes
    }

    fn policy(&self) -> ResolvePolicy {
        ResolvePolicy::INLINE
    }

    fn render(
        &self,
        kind: &ResolvedKind,
        variant: &Variant,
    ) -> Result<String, UnsupportedConstructError> {
        Ok(generate_typescript(kind, &variant.effective_params()))
    }
}

/// Render the TypeScript module for a resolved kind.
pub fn generate_typescript(kind: &ResolvedKind, params: &GeneratorParams) -> String {
    let writer = TsWriter {
        order: params.member_order,
    };
    let mut code = String::new();

    // Standalone spec
    code.push_str("export interface spec {\n");
    for field in ordered(kind.spec_fields(), params.spec_declaration_order) {
        writer.member(&mut code, field, 1, ';');
    }
    code.push_str("}\n\n");

    // Envelope
    let envelope = envelope_fields(kind, params.metadata);
    write_docs(&mut code, &kind.description, 0);
    code.push_str(&format!("export interface {} {{\n", kind.name));
    for field in &envelope {
        writer.member(&mut code, field, 1, ';');
    }
    code.push_str("}\n");

    for decl in kind.reachable(envelope.iter().map(|f| &f.ty)) {
        code.push('\n');
        writer.declaration(&mut code, decl);
    }

    code
}

struct TsWriter {
    order: MemberOrder,
}

impl TsWriter {
    fn declaration(&self, code: &mut String, decl: &Declaration) {
        write_docs(code, &decl.docs, 0);
        match &decl.body {
            DeclarationBody::Struct(s) => {
                code.push_str(&format!("export interface {} {{\n", decl.name));
                for field in ordered(&s.fields, self.order) {
                    self.member(code, field, 1, ';');
                }
                code.push_str("}\n");
            }
            DeclarationBody::Enum(values) => {
                code.push_str(&format!("export type {} = {};\n", decl.name, union(values)));
            }
            DeclarationBody::Alias(ty) => {
                code.push_str(&format!(
                    "export type {} = {};\n",
                    decl.name,
                    self.type_expr(ty, 0)
                ));
            }
        }
    }

    fn member(&self, code: &mut String, field: &ResolvedField, level: usize, separator: char) {
        write_docs(code, &field.docs, level);
        let optional = if field.optional { "?" } else { "" };
        code.push_str(&format!(
            "{}{}{}: {}{}\n",
            INDENT.repeat(level),
            property_name(&field.name),
            optional,
            self.type_expr(&field.ty, level),
            separator
        ));
    }

    /// Type expression for a member at `level`.
    fn type_expr(&self, ty: &ResolvedType, level: usize) -> String {
        match ty {
            ResolvedType::Scalar(scalar) => scalar_type(*scalar).to_string(),
            ResolvedType::Enum(values) => union(values),
            ResolvedType::Array(inner) => format!("Array<{}>", self.type_argument(inner, level)),
            ResolvedType::Map(inner) => {
                format!("Record<string, {}>", self.type_argument(inner, level))
            }
            ResolvedType::Named(name) => name.clone(),
            ResolvedType::Struct(s) if s.fields.is_empty() => "{}".to_string(),
            ResolvedType::Struct(s) => {
                let mut literal = String::from("{\n");
                for field in ordered(&s.fields, self.order) {
                    self.member(&mut literal, field, level + 1, ';');
                }
                literal.push_str(&INDENT.repeat(level));
                literal.push('}');
                literal
            }
        }
    }

    /// Type expression in `Array<_>` / `Record<string, _>` argument position.
    fn type_argument(&self, ty: &ResolvedType, level: usize) -> String {
        match ty {
            ResolvedType::Struct(s) if !s.fields.is_empty() => {
                let mut literal = String::from("{\n");
                for field in ordered(&s.fields, self.order) {
                    self.member(&mut literal, field, 1, ',');
                }
                literal.push('}');
                literal
            }
            other => self.type_expr(other, level),
        }
    }
}

fn scalar_type(scalar: ScalarKind) -> &'static str {
    match scalar {
        ScalarKind::String | ScalarKind::DateTime => "string",
        ScalarKind::Int64 | ScalarKind::Float64 => "number",
        ScalarKind::Boolean => "boolean",
        ScalarKind::Any => "unknown",
    }
}

fn union(values: &[String]) -> String {
    let literals: Vec<_> = values.iter().map(|v| string_literal(v)).collect();
    format!("({})", literals.join(" | "))
}

fn string_literal(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

/// Member names that are not identifiers are quoted.
fn property_name(name: &str) -> String {
    let mut chars = name.chars();
    let is_identifier = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');

    if is_identifier {
        name.to_string()
    } else {
        string_literal(name)
    }
}

/// Doc lines go inside `/** */`, so a literal `*/` must not close it early.
fn write_docs(code: &mut String, docs: &[String], level: usize) {
    if docs.is_empty() {
        return;
    }

    let pad = INDENT.repeat(level);
    code.push_str(&format!("{pad}/**\n"));
    for line in docs {
        if line.is_empty() {
            code.push_str(&format!("{pad} *\n"));
        } else {
            code.push_str(&format!("{pad} * {}\n", line.replace("*/", "*\\/")));
        }
    }
    code.push_str(&format!("{pad} */\n"));
}
