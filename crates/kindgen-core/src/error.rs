//! Error types for kindgen generation cells

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for resolution and validation
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Malformed, cyclic or unresolvable schema IR.
///
/// Fatal to the affected Kind only.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The kind has no name
    #[error("kind name cannot be empty")]
    EmptyKindName,

    /// The kind name is not a PascalCase identifier
    #[error("invalid kind name '{0}' (expected a PascalCase identifier)")]
    InvalidKindName(String),

    /// The machine name is not a single lowercase path segment
    #[error("invalid machine name '{0}' (expected [a-z][a-z0-9_]*)")]
    InvalidMachineName(String),

    /// A definition reuses the kind's own name
    #[error("definition '{0}' has the same name as its kind")]
    DefinitionShadowsKind(String),

    /// A field or definition has an empty name
    #[error("empty name at {path}")]
    EmptyName { path: String },

    /// Two fields of one struct share a name
    #[error("duplicate field '{field}' in {path}")]
    DuplicateField { path: String, field: String },

    /// Two definitions of one kind share a name
    #[error("duplicate definition '{0}'")]
    DuplicateDefinition(String),

    /// An enum with no literals
    #[error("enum at {path} has no values")]
    EmptyEnum { path: String },

    /// The same literal appears twice in one enum
    #[error("duplicate enum value '{value}' at {path}")]
    DuplicateEnumValue { path: String, value: String },

    /// A reference names a type that is neither defined locally nor built in
    #[error("unresolved reference '{name}' at {path}")]
    UnresolvedReference { path: String, name: String },

    /// A struct contains itself, directly or transitively
    #[error("cyclic reference: {}", chain.join(" -> "))]
    Cycle { chain: Vec<String> },

    /// The kind document could not be read as IR
    #[error("malformed kind {source_name}: {message}")]
    Malformed { source_name: String, message: String },

    /// Two kinds would be generated to the same file
    #[error("output path {path} is claimed by {}", kinds.join(", "))]
    DuplicateOutputPath { path: String, kinds: Vec<String> },
}

impl SchemaError {
    /// Short machine-readable label used in run reports
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::EmptyKindName => "empty_kind_name",
            SchemaError::InvalidKindName(_) => "invalid_kind_name",
            SchemaError::InvalidMachineName(_) => "invalid_machine_name",
            SchemaError::DefinitionShadowsKind(_) => "definition_shadows_kind",
            SchemaError::EmptyName { .. } => "empty_name",
            SchemaError::DuplicateField { .. } => "duplicate_field",
            SchemaError::DuplicateDefinition(_) => "duplicate_definition",
            SchemaError::EmptyEnum { .. } => "empty_enum",
            SchemaError::DuplicateEnumValue { .. } => "duplicate_enum_value",
            SchemaError::UnresolvedReference { .. } => "unresolved_reference",
            SchemaError::Cycle { .. } => "cycle",
            SchemaError::Malformed { .. } => "malformed",
            SchemaError::DuplicateOutputPath { .. } => "duplicate_output_path",
        }
    }
}

/// A target language cannot express a TypeRef construct.
///
/// Fatal to the (Kind, generator) cell only.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported construct {construct} for target language {target}")]
pub struct UnsupportedConstructError {
    /// Description of the construct, e.g. `inline enum at status.state`
    pub construct: String,
    /// Target language name
    pub target: String,
}

impl UnsupportedConstructError {
    pub fn new(construct: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            construct: construct.into(),
            target: target.into(),
        }
    }
}

/// Filesystem failure while flushing a generated file.
///
/// Retryable by re-running the whole pipeline.
#[derive(Error, Debug)]
pub enum WriteError {
    /// I/O error reading or writing the target path
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Verify mode found missing or different content on disk
    #[error("generated output is stale: {}", path.display())]
    Stale { path: PathBuf },
}

impl WriteError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WriteError::Io {
            path: path.into(),
            source,
        }
    }

    /// Path the failure happened at
    pub fn path(&self) -> &std::path::Path {
        match self {
            WriteError::Io { path, .. } | WriteError::Stale { path } => path,
        }
    }
}

#[cfg(test)]
#[path = "error/error_tests.rs"]
mod error_tests;
