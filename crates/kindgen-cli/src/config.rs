//! kindgen.toml parsing and validation

use anyhow::{Context, Result};
use kindgen_codegen::{GeneratorId, GeneratorParams, Variant};
use kindgen_core::{Kind, SchemaError, VariantId};
use kindgen_logging::LogLevel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Config file used when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "kindgen.toml";

/// Generation run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateConfig {
    /// Kind files, or directories holding `*.json` kind files
    pub kinds: Vec<String>,

    #[serde(default = "default_generators")]
    pub generators: Vec<String>,

    /// Single variant shorthand
    #[serde(default)]
    pub variant: Option<String>,

    #[serde(default)]
    pub variants: Vec<String>,

    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    #[serde(default)]
    pub log_level: Option<String>,

    /// Per-generator directory inserted below the variant directory
    #[serde(default)]
    pub prefixes: BTreeMap<String, String>,

    /// Payload of the `WithParams` variant
    #[serde(default)]
    pub params: GeneratorParams,

    /// Directory of the config file; relative paths resolve against it
    #[serde(skip)]
    pub base_dir: PathBuf,
}

fn default_generators() -> Vec<String> {
    GeneratorId::DEFAULTS
        .iter().map(|id| id.as_str().to_string()).collect()
}

fn default_output_dir() -> String {
    "generated".to_string()
}

impl GenerateConfig {
    /// Load a config from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {:?}", path))?;

        let mut config = Self::from_str(&content)?;
        config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(config)
    }

    /// Parse a config from a TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config")
    }

    /// Validate the config
    pub fn validate(&self) -> Result<()> {
        if self.kinds.is_empty() {
            anyhow::bail!("kinds cannot be empty");
        }

        if self.generators.is_empty() {
            anyhow::bail!("generators cannot be empty");
        }

        self.generator_ids()?;
        self.variants(None)?;
        self.log_level(None)?;

        for generator in self.prefixes.keys() {
            if GeneratorId::parse(generator).is_none() {
                anyhow::bail!("prefix configured for unknown generator '{}'", generator);
            }
            if !self.generators.contains(generator) {
                anyhow::bail!("prefix configured for generator '{}' which is not enabled", generator);
            }
        }

        if self.output_dir.trim().is_empty() {
            anyhow::bail!("output_dir cannot be empty");
        }

        Ok(())
    }

    /// Enabled generators, deduplicated in config order
    pub fn generator_ids(&self) -> Result<Vec<GeneratorId>> {
        let mut ids = Vec::new();
        for name in &self.generators {
            let id = parse_generator(name)?;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    /// Variants to run. `requested` overrides the config; `NoParams` when neither names one.
    pub fn variants(&self, requested: Option<&str>) -> Result<Vec<Variant>> {
        let names: Vec<&str> = match (requested, &self.variant) {
            (Some(name), _) => vec![name],
            (None, Some(name)) => {
                if !self.variants.is_empty() {
                    anyhow::bail!("set either variant or variants, not both");
                }
                vec![name.as_str()]
            }
            (None, None) if !self.variants.is_empty() => {
                self.variants.iter().map(String::as_str).collect()
            }
            (None, None) => vec![VariantId::NoParams.as_str()],
        };

        let mut variants: Vec<Variant> = Vec::new();
        for name in names {
            let id = parse_variant(name)?;
            if variants.iter().any(|v| v.id == id) {
                continue;
            }
            variants.push(Variant {
                id,
                params: self.params.clone(),
            });
        }
        Ok(variants)
    }

    /// Effective log level. `requested` overrides the config.
    pub fn log_level(&self, requested: Option<&str>) -> Result<LogLevel> {
        match requested.or(self.log_level.as_deref()) {
            Some(level) => level.parse().context("Invalid log level"),
            None => Ok(LogLevel::default()),
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.base_dir.join(&self.output_dir)
    }

    /// Prefixes keyed by generator
    pub fn prefixes(&self) -> Result<Vec<(GeneratorId, String)>> {
        self.prefixes
            .iter()
            .map(|(name, prefix)| Ok((parse_generator(name)?, prefix.clone())))
            .collect()
    }

    /// Expand `kinds` into kind files. Directory entries are sorted by name.
    pub fn kind_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in &self.kinds {
            let path = self.base_dir.join(entry);
            if path.is_dir() {
                let mut found: Vec<PathBuf> = std::fs::read_dir(&path)
                    .with_context(|| format!("Failed to read kinds directory: {:?}", path))?
                    .filter_map(|entry| entry.ok().map(|e| e.path()))
                    .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
                    .collect();
                found.sort();
                if found.is_empty() {
                    anyhow::bail!("no *.json kind files in {:?}", path);
                }
                files.extend(found);
            } else {
                files.push(path);
            }
        }
        Ok(files)
    }

    /// Read every configured kind. A file that cannot be used is rejected
    /// on its own; the other kinds still load.
    pub fn load_kinds(&self) -> Result<LoadedKinds> {
        let mut loaded = LoadedKinds::default();
        for path in self.kind_files()? {
            let source_name = source_name(&path);
            let kind = match load_kind(&path) {
                Ok(kind) => kind,
                Err(e) => {
                    tracing::warn!(path = %path.display(), "rejecting kind file: {:#}", e);
                    loaded.rejected.push((
                        source_name.clone(),
                        SchemaError::Malformed {
                            source_name,
                            message: format!("{:#}", e),
                        },
                    ));
                    continue;
                }
            };

            if loaded.kinds.iter().any(|k| k.name == kind.name) {
                tracing::warn!(kind = %kind.name, path = %path.display(), "duplicate kind name");
                loaded.rejected.push((
                    source_name.clone(),
                    SchemaError::Malformed {
                        source_name,
                        message: format!("kind '{}' is defined more than once", kind.name),
                    },
                ));
                continue;
            }
            loaded.kinds.push(kind);
        }
        Ok(loaded)
    }
}

/// Kinds read from the configured files.
#[derive(Debug, Default)]
pub struct LoadedKinds {
    pub kinds: Vec<Kind>,
    /// Unusable files, keyed by file stem
    pub rejected: Vec<(String, SchemaError)>,
}

fn source_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read one kind file
pub fn load_kind(path: &Path) -> Result<Kind> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read kind: {:?}", path))?;

    let kind = Kind::from_json(&content)
        .with_context(|| format!("Failed to parse kind: {:?}", path))?;

    tracing::debug!(kind = %kind.name, path = %path.display(), "loaded kind");
    Ok(kind)
}

pub fn parse_generator(name: &str) -> Result<GeneratorId> {
    GeneratorId::parse(name).with_context(|| {
        format!(
            "unknown generator '{}' (expected one of: {})",
            name,
            GeneratorId::ALL.map(|id| id.as_str()).join(", ")
        )
    })
}

pub fn parse_variant(name: &str) -> Result<VariantId> {
    VariantId::parse(name)
        .with_context(|| format!("unknown variant '{}' (expected NoParams or WithParams)", name))
}
