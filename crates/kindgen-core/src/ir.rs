//! Schema intermediate representation.
//!
//! The IR is the contract between the external schema front end and the
//! generators. It is a language-agnostic, immutable description of a Kind:
//!
//! - [`Kind`]: the top-level schema unit with its `metadata`, `spec` and
//!   `status` sections plus locally named [`Definition`]s
//! - [`StructType`]: an ordered list of [`Field`]s
//! - [`TypeRef`]: a closed set of type constructs
//!
//! Field order is significant everywhere: it is the order generators emit.
//!
//! # JSON form
//!
//! ```json
//! {
//!   "name": "Folder",
//!   "spec": {
//!     "fields": [
//!       { "name": "uid", "type": { "kind": "scalar", "scalar": "string" },
//!         "docs": ["Unique folder id. (will be k8s name)"] },
//!       { "name": "parent", "optional": true,
//!         "type": { "kind": "scalar", "scalar": "string" } }
//!     ]
//!   }
//! }
//! ```

use crate::common;
use crate::error::{SchemaError, SchemaResult};
use crate::naming::{is_machine_name, is_pascal_identifier, to_snake_case};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Scalar leaf types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScalarKind {
    String,
    /// String carrying an RFC 3339 timestamp
    DateTime,
    Boolean,
    Int64,
    Float64,
    /// Free-form value
    Any,
}

/// A type construct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TypeRef {
    Scalar {
        scalar: ScalarKind,
    },

    /// Closed set of string literals, in declared order.
    #[serde(rename = "enum")]
    EnumLiteral {
        values: Vec<String>,
    },

    Array {
        items: Box<TypeRef>,
    },

    /// Mapping from string keys to values.
    Map {
        values: Box<TypeRef>,
    },

    Struct(StructType),

    /// A named definition, local to the kind or built in.
    Reference {
        name: String,
    },
}

impl TypeRef {
    pub fn scalar(scalar: ScalarKind) -> Self {
        TypeRef::Scalar { scalar }
    }

    pub fn string() -> Self {
        Self::scalar(ScalarKind::String)
    }

    pub fn date_time() -> Self {
        Self::scalar(ScalarKind::DateTime)
    }

    pub fn boolean() -> Self {
        Self::scalar(ScalarKind::Boolean)
    }

    pub fn any() -> Self {
        Self::scalar(ScalarKind::Any)
    }

    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TypeRef::EnumLiteral {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn array(items: TypeRef) -> Self {
        TypeRef::Array {
            items: Box::new(items),
        }
    }

    pub fn map(values: TypeRef) -> Self {
        TypeRef::Map {
            values: Box::new(values),
        }
    }

    pub fn structure(fields: Vec<Field>) -> Self {
        TypeRef::Struct(StructType::new(fields))
    }

    pub fn reference(name: impl Into<String>) -> Self {
        TypeRef::Reference { name: name.into() }
    }
}

/// An ordered, struct-like type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructType {
    /// Name annotation; annotated structs are always extracted under it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Documentation of the struct as a concept of its own.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub docs: Vec<String>,

    pub fields: Vec<Field>,
}

impl StructType {
    pub fn new(fields: Vec<Field>) -> Self {
        Self {
            name: None,
            docs: Vec::new(),
            fields,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_docs<I, S>(mut self, docs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.docs = docs.into_iter().map(Into::into).collect();
        self
    }

    /// Anonymous structs have no name annotation.
    pub fn is_anonymous(&self) -> bool {
        self.name.is_none()
    }
}

/// A field of a struct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: TypeRef,

    #[serde(default)]
    pub optional: bool,

    /// Documentation lines, emitted verbatim.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub docs: Vec<String>,
}

impl Field {
    pub fn required(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
            docs: Vec::new(),
        }
    }

    pub fn optional(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            optional: true,
            ..Self::required(name, ty)
        }
    }

    pub fn with_docs<I, S>(mut self, docs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.docs = docs.into_iter().map(Into::into).collect();
        self
    }
}

/// A named type addressable through [`TypeRef::Reference`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Definition {
    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub docs: Vec<String>,

    #[serde(rename = "type")]
    pub ty: TypeRef,
}

impl Definition {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            docs: Vec::new(),
            ty,
        }
    }
}

/// Envelope section whose type is given by reference or inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub docs: Vec<String>,

    #[serde(rename = "type")]
    pub ty: TypeRef,
}

impl Section {
    /// The shared common metadata, by reference.
    pub fn common_metadata() -> Self {
        Self {
            docs: Vec::new(),
            ty: TypeRef::reference(common::COMMON_METADATA),
        }
    }
}

impl Default for Section {
    fn default() -> Self {
        Self::common_metadata()
    }
}

/// Kind maturity milestones, in increasing order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Maturity {
    #[default]
    Merged,
    Experimental,
    Stable,
    Mature,
}

impl std::fmt::Display for Maturity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Maturity::Merged => write!(f, "merged"),
            Maturity::Experimental => write!(f, "experimental"),
            Maturity::Stable => write!(f, "stable"),
            Maturity::Mature => write!(f, "mature"),
        }
    }
}

/// Named rendering mode of a Kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VariantId {
    NoParams,
    WithParams,
}

impl VariantId {
    pub const ALL: [VariantId; 2] = [VariantId::NoParams, VariantId::WithParams];

    pub fn as_str(&self) -> &'static str {
        match self {
            VariantId::NoParams => "NoParams",
            VariantId::WithParams => "WithParams",
        }
    }

    /// Parse a variant id as written in configuration.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NoParams" | "no-params" => Some(VariantId::NoParams),
            "WithParams" | "with-params" => Some(VariantId::WithParams),
            _ => None,
        }
    }
}

impl std::fmt::Display for VariantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_variants() -> Vec<VariantId> {
    VariantId::ALL.to_vec()
}

/// Top-level schema unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kind {
    /// PascalCase kind name, e.g. `Folder`.
    pub name: String,

    /// Lowercase name used for file paths. Derived from `name` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plural_name: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub description: Vec<String>,

    #[serde(default)]
    pub maturity: Maturity,

    /// Variants this kind may be rendered in.
    #[serde(default = "default_variants")]
    pub variants: Vec<VariantId>,

    #[serde(default)]
    pub metadata: Section,

    pub spec: StructType,

    #[serde(default = "common::standard_status")]
    pub status: StructType,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub definitions: Vec<Definition>,
}

impl Kind {
    /// A kind with common metadata and the standard status.
    pub fn new(name: impl Into<String>, spec: StructType) -> Self {
        Self {
            name: name.into(),
            machine_name: None,
            plural_name: None,
            description: Vec::new(),
            maturity: Maturity::default(),
            variants: default_variants(),
            metadata: Section::common_metadata(),
            spec,
            status: common::standard_status(),
            definitions: Vec::new(),
        }
    }

    /// Parse a kind from its JSON IR form.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    pub fn machine_name(&self) -> String {
        match &self.machine_name {
            Some(name) => name.clone(),
            None => to_snake_case(&self.name),
        }
    }

    pub fn plural_name(&self) -> String {
        match &self.plural_name {
            Some(name) => name.clone(),
            None => format!("{}s", self.name),
        }
    }

    pub fn supports(&self, variant: VariantId) -> bool {
        self.variants.contains(&variant)
    }

    /// Look up a definition, local first, then built in.
    pub fn definition(&self, name: &str) -> Option<Definition> {
        self.definitions
            .iter()
            .find(|d| d.name == name)
            .cloned()
            .or_else(|| common::builtin_definition(name))
    }

    /// Check structural rules that do not need reference resolution.
    pub fn validate(&self) -> SchemaResult<()> {
        if self.name.trim().is_empty() {
            return Err(SchemaError::EmptyKindName);
        }
        if !is_pascal_identifier(&self.name) {
            return Err(SchemaError::InvalidKindName(self.name.clone()));
        }
        let machine_name = self.machine_name();
        if !is_machine_name(&machine_name) {
            return Err(SchemaError::InvalidMachineName(machine_name));
        }
        if common::builtin_definition(&self.name).is_some() {
            return Err(SchemaError::DefinitionShadowsKind(self.name.clone()));
        }

        let mut names = HashSet::new();
        for def in &self.definitions {
            if def.name.is_empty() {
                return Err(SchemaError::EmptyName {
                    path: "definitions".to_string(),
                });
            }
            if def.name == self.name {
                return Err(SchemaError::DefinitionShadowsKind(def.name.clone()));
            }
            if !names.insert(def.name.as_str()) {
                return Err(SchemaError::DuplicateDefinition(def.name.clone()));
            }
            validate_type(&def.ty, &def.name)?;
        }

        validate_type(&self.metadata.ty, "metadata")?;
        validate_struct(&self.spec, "spec")?;
        validate_struct(&self.status, "status")?;

        Ok(())
    }
}

fn validate_struct(s: &StructType, path: &str) -> SchemaResult<()> {
    let mut seen = HashSet::new();
    for field in &s.fields {
        if field.name.is_empty() {
            return Err(SchemaError::EmptyName {
                path: path.to_string(),
            });
        }
        if !seen.insert(field.name.as_str()) {
            return Err(SchemaError::DuplicateField {
                path: path.to_string(),
                field: field.name.clone(),
            });
        }
        validate_type(&field.ty, &format!("{path}.{}", field.name))?;
    }
    Ok(())
}

fn validate_type(ty: &TypeRef, path: &str) -> SchemaResult<()> {
    match ty {
        TypeRef::Scalar { .. } => Ok(()),
        TypeRef::EnumLiteral { values } => {
            if values.is_empty() {
                return Err(SchemaError::EmptyEnum {
                    path: path.to_string(),
                });
            }
            let mut seen = HashSet::new();
            for value in values {
                if !seen.insert(value.as_str()) {
                    return Err(SchemaError::DuplicateEnumValue {
                        path: path.to_string(),
                        value: value.clone(),
                    });
                }
            }
            Ok(())
        }
        TypeRef::Array { items } => validate_type(items, path),
        TypeRef::Map { values } => validate_type(values, path),
        TypeRef::Struct(s) => validate_struct(s, path),
        TypeRef::Reference { name } => {
            if name.is_empty() {
                return Err(SchemaError::EmptyName {
                    path: path.to_string(),
                });
            }
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "ir/ir_tests.rs"]
mod ir_tests;
