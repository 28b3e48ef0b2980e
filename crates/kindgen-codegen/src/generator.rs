//! Generator traits, identifiers and variant descriptors.

use crate::go_sections::GoSectionTypesGenerator;
use crate::golang::GoTypesGenerator;
use crate::json_schema::JsonSchemaGenerator;
use crate::ts_index::TsIndexGenerator;
use crate::typescript::TypeScriptGenerator;
use kindgen_core::{ResolvePolicy, ResolvedKind, UnsupportedConstructError, VariantId};
use serde::{Deserialize, Serialize};

/// One file produced for a kind, named relative to the kind directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub name: String,
    pub content: String,
}

/// A renderer for one target language.
///
/// Generators are stateless: the same resolved kind and variant always
/// produce the same text.
pub trait Generator: Send + Sync {
    fn id(&self) -> GeneratorId;

    /// What the resolver must lift into named declarations for this target.
    fn policy(&self) -> ResolvePolicy;

    /// The kind's main file.
    fn render(
        &self,
        kind: &ResolvedKind,
        variant: &Variant,
    ) -> Result<String, UnsupportedConstructError>;

    /// File name suffix appended to the kind's machine name.
    fn artifact_suffix(&self) -> &'static str {
        self.id().artifact_suffix()
    }

    /// Every file for the kind. Defaults to the main file alone, named
    /// `{machine}_{suffix}`.
    fn render_files(
        &self,
        kind: &ResolvedKind,
        variant: &Variant,
    ) -> Result<Vec<RenderedFile>, UnsupportedConstructError> {
        Ok(vec![RenderedFile {
            name: format!("{}_{}", kind.machine_name, self.artifact_suffix()),
            content: self.render(kind, variant)?,
        }])
    }
}

/// A renderer that folds every kind of a run into a single file.
pub trait AggregateGenerator: Send + Sync {
    fn id(&self) -> GeneratorId;

    fn policy(&self) -> ResolvePolicy;

    /// Render the file for `kinds`, which arrive sorted by machine name.
    fn render(
        &self,
        kinds: &[ResolvedKind],
        variant: &Variant,
    ) -> Result<String, UnsupportedConstructError>;

    fn file_name(&self) -> &'static str {
        self.id().artifact_suffix()
    }
}

/// A built-in generator, ready to run.
pub enum Target {
    /// One cell per kind
    PerKind(Box<dyn Generator>),
    /// One cell for all kinds together
    Aggregate(Box<dyn AggregateGenerator>),
}

impl Target {
    pub fn id(&self) -> GeneratorId {
        match self {
            Target::PerKind(generator) => generator.id(),
            Target::Aggregate(generator) => generator.id(),
        }
    }
}

/// Built-in generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeneratorId {
    TsTypes,
    GoTypes,
    JsonSchema,
    GoSectionTypes,
    TsIndex,
}

impl GeneratorId {
    pub const ALL: [GeneratorId; 5] = [
        GeneratorId::TsTypes,
        GeneratorId::GoTypes,
        GeneratorId::JsonSchema,
        GeneratorId::GoSectionTypes,
        GeneratorId::TsIndex,
    ];

    /// Generators enabled when a config does not list any.
    pub const DEFAULTS: [GeneratorId; 3] = [
        GeneratorId::TsTypes,
        GeneratorId::GoTypes,
        GeneratorId::JsonSchema,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GeneratorId::TsTypes => "ts-types",
            GeneratorId::GoTypes => "go-types",
            GeneratorId::JsonSchema => "json-schema",
            GeneratorId::GoSectionTypes => "go-section-types",
            GeneratorId::TsIndex => "ts-index",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_str() == s)
    }

    /// Name used in the output root directory, e.g. `folder_TSTypesJenny_NoParams`.
    pub fn layout_name(&self) -> &'static str {
        match self {
            GeneratorId::TsTypes => "TSTypesJenny",
            GeneratorId::GoTypes => "GoTypesJenny",
            GeneratorId::JsonSchema => "JsonSchemaJenny",
            GeneratorId::GoSectionTypes => "GoResourceTypes",
            GeneratorId::TsIndex => "TSVeneerIndex",
        }
    }

    /// Suffix of the main file name. Aggregate generators use it as the
    /// whole file name.
    pub fn artifact_suffix(&self) -> &'static str {
        match self {
            GeneratorId::TsTypes => "types.gen.ts",
            GeneratorId::GoTypes => "types_gen.go",
            GeneratorId::JsonSchema => "types_gen.json",
            GeneratorId::GoSectionTypes => "gen.go",
            GeneratorId::TsIndex => "index.gen.ts",
        }
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self, GeneratorId::TsIndex)
    }

    /// Instantiate the generator.
    pub fn target(&self) -> Target {
        match self {
            GeneratorId::TsTypes => Target::PerKind(Box::new(TypeScriptGenerator)),
            GeneratorId::GoTypes => Target::PerKind(Box::new(GoTypesGenerator)),
            GeneratorId::JsonSchema => Target::PerKind(Box::new(JsonSchemaGenerator)),
            GeneratorId::GoSectionTypes => Target::PerKind(Box::new(GoSectionTypesGenerator)),
            GeneratorId::TsIndex => Target::Aggregate(Box::new(TsIndexGenerator)),
        }
    }
}

impl std::fmt::Display for GeneratorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the envelope's `metadata` section is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataMode {
    /// Expand the referenced shape in place
    #[default]
    Inline,
    /// Refer to a named shared declaration
    Reference,
}

/// Member order within rendered structs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberOrder {
    #[default]
    Declared,
    Alphabetical,
}

/// Rendering switches carried by the `WithParams` variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorParams {
    pub metadata: MetadataMode,

    pub member_order: MemberOrder,

    /// Member order of the standalone `spec` declaration.
    pub spec_declaration_order: MemberOrder,

    /// Main generator path named in the generated-file header.
    pub header: Option<String>,

    /// Go package name. Defaults to the kind's machine name.
    pub package: Option<String>,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            metadata: MetadataMode::Inline,
            member_order: MemberOrder::Declared,
            spec_declaration_order: MemberOrder::Alphabetical,
            header: None,
            package: None,
        }
    }
}

/// A named rendering mode plus its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub id: VariantId,
    pub params: GeneratorParams,
}

impl Variant {
    pub fn no_params() -> Self {
        Self {
            id: VariantId::NoParams,
            params: GeneratorParams::default(),
        }
    }

    pub fn with_params(params: GeneratorParams) -> Self {
        Self {
            id: VariantId::WithParams,
            params,
        }
    }

    /// Parameters in effect. `NoParams` ignores any configured payload.
    pub fn effective_params(&self) -> GeneratorParams {
        match self.id {
            VariantId::NoParams => GeneratorParams::default(),
            VariantId::WithParams => self.params.clone(),
        }
    }
}

impl Default for Variant {
    fn default() -> Self {
        Self::no_params()
    }
}
