//! Go type declarations in the style of oapi-codegen.
//!
//! Every enum is a named `string` type with a `const` block of values, and
//! anonymous structs in slices or maps are lifted, so the generator asks
//! the resolver for [`ResolvePolicy::NOMINAL`]. Declarations are emitted
//! sorted by name and aligned the way gofmt aligns struct fields.

use crate::envelope::{envelope_fields, ordered};
use crate::generator::{Generator, GeneratorId, GeneratorParams, MemberOrder, Variant};
use kindgen_core::naming::to_identifier;
use kindgen_core::{
    Declaration, DeclarationBody, ResolvePolicy, ResolvedField, ResolvedKind, ResolvedStruct,
    ResolvedType, ScalarKind, UnsupportedConstructError,
};

const TARGET: &str = "go";

/// Renders `{machine}_types_gen.go`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoTypesGenerator;

impl Generator for GoTypesGenerator {
    fn id(&self) -> GeneratorId {
        GeneratorId::GoTypes
    }

    fn policy(&self) -> ResolvePolicy {
        ResolvePolicy::NOMINAL
    }

    fn render(
        &self,
        kind: &ResolvedKind,
        variant: &Variant,
    ) -> Result<String, UnsupportedConstructError> {
        generate_go(kind, &variant.effective_params())
    }
}

/// Render the Go source file for a resolved kind.
pub fn generate_go(
    kind: &ResolvedKind,
    params: &GeneratorParams,
) -> Result<String, UnsupportedConstructError> {
    let writer = GoWriter::new(params.member_order);
    let envelope = envelope_fields(kind, params.metadata);
    let decls = kind.reachable(envelope.iter().map(|f| &f.ty));

    // Named types, envelope included
    let mut types: Vec<(String, String)> = Vec::with_capacity(decls.len() + 1);
    types.push((kind.name.clone(), writer.envelope(kind, &envelope)?));
    for decl in &decls {
        types.push((decl.name.clone(), writer.declaration(decl)?));
    }

    let uses_time =
        envelope.iter().any(|f| uses_date_time(&f.ty)) || declarations_use_time(&decls);
    go_file(&package_name(kind, params), uses_time, &decls, types)
}

/// The `package` clause name. Defaults to the kind's machine name.
pub(crate) fn package_name(kind: &ResolvedKind, params: &GeneratorParams) -> String {
    params
        .package
        .clone()
        .unwrap_or_else(|| kind.machine_name.clone())
}

/// Assemble one Go file: package clause, imports, a `const` block per enum
/// in `decls`, then `types` sorted by name.
pub(crate) fn go_file(
    package: &str,
    uses_time: bool,
    decls: &[&Declaration],
    mut types: Vec<(String, String)>,
) -> Result<String, UnsupportedConstructError> {
    types.sort_by(|a, b| a.0.cmp(&b.0));

    let mut enums: Vec<&Declaration> = decls
        .iter()
        .copied()
        .filter(|d| matches!(d.body, DeclarationBody::Enum(_)))
        .collect();
    enums.sort_by(|a, b| a.name.cmp(&b.name));

    let mut code = format!("package {package}\n");
    if uses_time {
        code.push_str("\nimport (\n\t\"time\"\n)\n");
    }

    for decl in enums {
        code.push('\n');
        code.push_str(&const_block(decl)?);
    }

    for (_, source) in types {
        code.push('\n');
        code.push_str(&source);
    }

    Ok(code)
}

pub(crate) fn declarations_use_time(decls: &[&Declaration]) -> bool {
    decls.iter().any(|d| match &d.body {
        DeclarationBody::Struct(s) => s.fields.iter().any(|f| uses_date_time(&f.ty)),
        DeclarationBody::Enum(_) => false,
        DeclarationBody::Alias(ty) => uses_date_time(ty),
    })
}

pub(crate) struct GoWriter {
    order: MemberOrder,
}

/// One rendered struct field before alignment.
struct GoField {
    docs: Vec<String>,
    /// JSON key the field came from
    key: String,
    name: String,
    ty: String,
    tag: String,
}

impl GoField {
    fn is_multiline(&self) -> bool {
        self.ty.contains('\n')
    }
}

impl GoWriter {
    pub(crate) fn new(order: MemberOrder) -> Self {
        Self { order }
    }

    pub(crate) fn envelope(
        &self,
        kind: &ResolvedKind,
        envelope: &[ResolvedField],
    ) -> Result<String, UnsupportedConstructError> {
        let mut code = type_comment(&kind.name, &kind.description);
        let fields: Vec<&ResolvedField> = envelope.iter().collect();
        code.push_str(&format!("type {} struct {{\n", kind.name));
        code.push_str(&self.fields(&fields, 1, &kind.name)?);
        code.push_str("}\n");
        Ok(code)
    }

    pub(crate) fn declaration(&self, decl: &Declaration) -> Result<String, UnsupportedConstructError> {
        let mut code = type_comment(&decl.name, &decl.docs);
        match &decl.body {
            DeclarationBody::Struct(s) => {
                code.push_str(&format!("type {} struct {{\n", decl.name));
                code.push_str(&self.struct_fields(s, 1, &decl.name)?);
                code.push_str("}\n");
            }
            DeclarationBody::Enum(_) => {
                code.push_str(&format!("type {} string\n", decl.name));
            }
            DeclarationBody::Alias(ty) => {
                let ty = self.type_expr(ty, 0, &decl.name)?;
                code.push_str(&format!("type {} {}\n", decl.name, ty));
            }
        }
        Ok(code)
    }

    /// A top-level type named `name` whose underlying type is `ty`.
    pub(crate) fn named(
        &self,
        name: &str,
        docs: &[String],
        ty: &ResolvedType,
    ) -> Result<String, UnsupportedConstructError> {
        let mut code = type_comment(name, docs);
        match ty {
            ResolvedType::Struct(s) if !s.fields.is_empty() => {
                code.push_str(&format!("type {name} struct {{\n"));
                code.push_str(&self.struct_fields(s, 1, name)?);
                code.push_str("}\n");
            }
            other => {
                let ty = self.type_expr(other, 0, name)?;
                code.push_str(&format!("type {name} {ty}\n"));
            }
        }
        Ok(code)
    }

    fn struct_fields(
        &self,
        s: &ResolvedStruct,
        level: usize,
        path: &str,
    ) -> Result<String, UnsupportedConstructError> {
        self.fields(&ordered(&s.fields, self.order), level, path)
    }

    /// Field lines at `level` tabs, gofmt-aligned.
    ///
    /// Alignment runs break at blank lines, which precede every commented
    /// field but the first, and around multi-line fields.
    fn fields(
        &self,
        fields: &[&ResolvedField],
        level: usize,
        path: &str,
    ) -> Result<String, UnsupportedConstructError> {
        let mut rendered: Vec<GoField> = Vec::with_capacity(fields.len());
        for field in fields {
            let field = self.field(field, level, path)?;
            if let Some(other) = rendered.iter().find(|f| f.name == field.name) {
                return Err(UnsupportedConstructError::new(
                    format!(
                        "fields '{}' and '{}' at {path} both map to Go field '{}'",
                        other.key, field.key, field.name
                    ),
                    TARGET,
                ));
            }
            rendered.push(field);
        }

        let mut runs: Vec<Vec<GoField>> = Vec::new();
        for field in rendered {
            let starts_run = !field.docs.is_empty()
                || field.is_multiline()
                || runs
                    .last()
                    .and_then(|run| run.last())
                    .is_some_and(GoField::is_multiline);
            match runs.last_mut() {
                Some(run) if !starts_run => run.push(field),
                _ => runs.push(vec![field]),
            }
        }

        let tabs = "\t".repeat(level);
        let mut code = String::new();
        for (i, run) in runs.iter().enumerate() {
            if i > 0 && run.first().is_some_and(|f| !f.docs.is_empty()) {
                code.push('\n');
            }

            let name_width = run.iter().map(|f| f.name.len()).max().unwrap_or(0);
            let type_width = run.iter().map(|f| f.ty.len()).max().unwrap_or(0);

            for field in run {
                for line in &field.docs {
                    code.push_str(&comment_line(&tabs, line));
                }
                if field.is_multiline() {
                    code.push_str(&format!("{tabs}{} {} {}\n", field.name, field.ty, field.tag));
                } else {
                    code.push_str(&format!(
                        "{tabs}{:<name_width$} {:<type_width$} {}\n",
                        field.name, field.ty, field.tag
                    ));
                }
            }
        }
        Ok(code)
    }

    fn field(
        &self,
        field: &ResolvedField,
        level: usize,
        path: &str,
    ) -> Result<GoField, UnsupportedConstructError> {
        let field_path = format!("{path}.{}", field.name);
        let name = to_identifier(&field.name).ok_or_else(|| {
            UnsupportedConstructError::new(format!("field name '{}' at {path}", field.name), TARGET)
        })?;

        let mut ty = self.type_expr(&field.ty, level, &field_path)?;
        if field.optional && needs_pointer(&field.ty) {
            ty = format!("*{ty}");
        }

        let tag = if field.optional {
            format!("`json:\"{},omitempty\"`", field.name)
        } else {
            format!("`json:\"{}\"`", field.name)
        };

        Ok(GoField {
            docs: field.docs.clone(),
            key: field.name.clone(),
            name,
            ty,
            tag,
        })
    }

    fn type_expr(
        &self,
        ty: &ResolvedType,
        level: usize,
        path: &str,
    ) -> Result<String, UnsupportedConstructError> {
        match ty {
            ResolvedType::Scalar(scalar) => Ok(scalar_type(*scalar).to_string()),
            ResolvedType::Enum(_) => Err(UnsupportedConstructError::new(
                format!("inline enum at {path}"),
                TARGET,
            )),
            ResolvedType::Array(inner) => Ok(format!("[]{}", self.type_expr(inner, level, path)?)),
            ResolvedType::Map(inner) => Ok(format!(
                "map[string]{}",
                self.type_expr(inner, level, path)?
            )),
            ResolvedType::Named(name) => Ok(name.clone()),
            ResolvedType::Struct(s) if s.fields.is_empty() => Ok("struct{}".to_string()),
            ResolvedType::Struct(s) => {
                let mut literal = String::from("struct {\n");
                literal.push_str(&self.struct_fields(s, level + 1, path)?);
                literal.push_str(&"\t".repeat(level));
                literal.push('}');
                Ok(literal)
            }
        }
    }
}

fn scalar_type(scalar: ScalarKind) -> &'static str {
    match scalar {
        ScalarKind::String => "string",
        ScalarKind::DateTime => "time.Time",
        ScalarKind::Boolean => "bool",
        ScalarKind::Int64 => "int64",
        ScalarKind::Float64 => "float64",
        ScalarKind::Any => "any",
    }
}

/// Optional values are pointers unless the type already has a nil value.
fn needs_pointer(ty: &ResolvedType) -> bool {
    !matches!(
        ty,
        ResolvedType::Array(_) | ResolvedType::Map(_) | ResolvedType::Scalar(ScalarKind::Any)
    )
}

pub(crate) fn uses_date_time(ty: &ResolvedType) -> bool {
    match ty {
        ResolvedType::Scalar(scalar) => *scalar == ScalarKind::DateTime,
        ResolvedType::Enum(_) | ResolvedType::Named(_) => false,
        ResolvedType::Array(inner) | ResolvedType::Map(inner) => uses_date_time(inner),
        ResolvedType::Struct(s) => s.fields.iter().any(|f| uses_date_time(&f.ty)),
    }
}

/// `// Name ...` comment above a type declaration. Docs that already open
/// with the name are kept as written.
fn type_comment(name: &str, docs: &[String]) -> String {
    let Some((first, rest)) = docs.split_first() else {
        return format!("// {name} defines model for {name}.\n");
    };

    let mut code = if first == name || first.starts_with(&format!("{name} ")) {
        format!("// {first}\n")
    } else {
        format!("// {name} {first}\n")
    };
    for line in rest {
        code.push_str(&comment_line("", line));
    }
    code
}

fn comment_line(tabs: &str, line: &str) -> String {
    if line.is_empty() {
        format!("{tabs}//\n")
    } else {
        format!("{tabs}// {line}\n")
    }
}

/// `const (...)` block for an enum declaration, values in declared order.
fn const_block(decl: &Declaration) -> Result<String, UnsupportedConstructError> {
    let DeclarationBody::Enum(values) = &decl.body else {
        return Ok(String::new());
    };

    let mut consts = Vec::with_capacity(values.len());
    for value in values {
        let ident = to_identifier(value).ok_or_else(|| {
            UnsupportedConstructError::new(
                format!("enum literal '{value}' in {}", decl.name),
                TARGET,
            )
        })?;
        let name = format!("{}{ident}", decl.name);
        if let Some((_, other)) = consts.iter().find(|(existing, _)| *existing == name) {
            return Err(UnsupportedConstructError::new(
                format!("enum literals '{other}' and '{value}' both map to Go constant '{name}'"),
                TARGET,
            ));
        }
        consts.push((name, value));
    }

    let width = consts.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    let mut code = format!("// Defines values for {}.\nconst (\n", decl.name);
    for (name, value) in consts {
        code.push_str(&format!(
            "\t{name:<width$} {} = {}\n",
            decl.name,
            go_string(value)
        ));
    }
    code.push_str(")\n");
    Ok(code)
}

fn go_string(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

#[cfg(test)]
#[path = "golang/golang_tests.rs"]
mod golang_tests;
