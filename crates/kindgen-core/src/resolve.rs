//! Type resolution.
//!
//! Walks a [`Kind`] and produces a [`ResolvedKind`]: a tree in which every
//! nested structure is either kept inline or lifted into a named
//! [`Declaration`], and every reference has been checked.
//!
//! Resolution is a pure function of the kind and a [`ResolvePolicy`]. The
//! policy is supplied by the renderer, since some targets need named types
//! where others can inline them.
//!
//! # Extraction rules
//!
//! An anonymous struct is lifted when any of these hold:
//! - it occurs at two or more sites (structural equality)
//! - it carries documentation of its own
//! - it is an array element or map value and the policy lifts container structs
//!
//! Annotated structs are always lifted under their annotation. Enums are
//! lifted when the policy says so. Envelope section roots never are.
//!
//! Lifted names are the PascalCase join of the field path, with a numeric
//! suffix on collision. The same kind always yields the same names.

use crate::common;
use crate::error::{SchemaError, SchemaResult};
use crate::ir::{Definition, Field, Kind, ScalarKind, StructType, TypeRef};
use crate::naming::path_type_name;
use std::collections::{HashMap, HashSet};

/// Which constructs the target needs as named declarations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolvePolicy {
    /// Lift anonymous structs that are array elements or map values.
    pub extract_container_structs: bool,
    /// Lift enums into named declarations.
    pub extract_enums: bool,
}

impl ResolvePolicy {
    /// Inline whatever the extraction rules allow.
    pub const INLINE: ResolvePolicy = ResolvePolicy {
        extract_container_structs: false,
        extract_enums: false,
    };

    /// For targets without anonymous container element types or literal unions.
    pub const NOMINAL: ResolvePolicy = ResolvePolicy {
        extract_container_structs: true,
        extract_enums: true,
    };
}

/// A type after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedType {
    Scalar(ScalarKind),
    Enum(Vec<String>),
    Array(Box<ResolvedType>),
    Map(Box<ResolvedType>),
    Struct(ResolvedStruct),
    /// A declaration of the resolved kind.
    Named(String),
}

impl ResolvedType {
    fn collect_names(&self, out: &mut Vec<String>) {
        match self {
            ResolvedType::Scalar(_) | ResolvedType::Enum(_) => {}
            ResolvedType::Array(inner) | ResolvedType::Map(inner) => inner.collect_names(out),
            ResolvedType::Struct(s) => s.collect_names(out),
            ResolvedType::Named(name) => out.push(name.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedStruct {
    pub fields: Vec<ResolvedField>,
}

impl ResolvedStruct {
    fn collect_names(&self, out: &mut Vec<String>) {
        for field in &self.fields {
            field.ty.collect_names(out);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField {
    pub name: String,
    pub ty: ResolvedType,
    pub optional: bool,
    pub docs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationBody {
    Struct(ResolvedStruct),
    Enum(Vec<String>),
    Alias(ResolvedType),
}

impl DeclarationBody {
    fn collect_names(&self, out: &mut Vec<String>) {
        match self {
            DeclarationBody::Struct(s) => s.collect_names(out),
            DeclarationBody::Enum(_) => {}
            DeclarationBody::Alias(ty) => ty.collect_names(out),
        }
    }
}

/// Where a declaration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationOrigin {
    /// A named definition, local or built in.
    Defined,
    /// Lifted from the field at `path`.
    Extracted { path: String },
}

/// A named top-level type of the resolved kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub docs: Vec<String>,
    pub body: DeclarationBody,
    pub origin: DeclarationOrigin,
}

/// Resolved type tree of one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedKind {
    pub name: String,
    pub machine_name: String,
    pub description: Vec<String>,
    pub metadata: ResolvedField,
    pub spec: ResolvedField,
    pub status: ResolvedField,
    /// In first-reservation order.
    pub declarations: Vec<Declaration>,
}

impl ResolvedKind {
    /// Envelope fields in render order.
    pub fn envelope(&self) -> [&ResolvedField; 3] {
        [&self.metadata, &self.spec, &self.status]
    }

    pub fn spec_fields(&self) -> &[ResolvedField] {
        match &self.spec.ty {
            ResolvedType::Struct(s) => &s.fields,
            _ => &[],
        }
    }

    pub fn declaration(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|d| d.name == name)
    }

    /// Declarations reachable from `roots`, in declaration order.
    pub fn reachable<'a, I>(&'a self, roots: I) -> Vec<&'a Declaration>
    where
        I: IntoIterator<Item = &'a ResolvedType>,
    {
        let mut pending = Vec::new();
        for root in roots {
            root.collect_names(&mut pending);
        }

        let mut wanted = HashSet::new();
        while let Some(name) = pending.pop() {
            if wanted.insert(name.clone()) {
                if let Some(decl) = self.declaration(&name) {
                    decl.body.collect_names(&mut pending);
                }
            }
        }

        self.declarations
            .iter()
            .filter(|d| wanted.contains(&d.name))
            .collect()
    }
}

/// Resolves kinds under a fixed policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolver {
    policy: ResolvePolicy,
}

impl Resolver {
    pub fn new(policy: ResolvePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ResolvePolicy {
        self.policy
    }

    pub fn resolve(&self, kind: &Kind) -> SchemaResult<ResolvedKind> {
        kind.validate()?;

        let mut cx = ResolveContext::new(kind, self.policy);

        let metadata = cx.section("metadata", &kind.metadata.docs, &kind.metadata.ty)?;
        let spec = cx.root_struct("spec", &kind.spec)?;
        let status = cx.root_struct("status", &kind.status)?;

        let declarations = cx.finish();
        tracing::debug!(
            kind = %kind.name,
            declarations = declarations.len(),
            "resolved kind"
        );

        Ok(ResolvedKind {
            name: kind.name.clone(),
            machine_name: kind.machine_name(),
            description: kind.description.clone(),
            metadata,
            spec,
            status,
            declarations,
        })
    }
}

/// Resolve with [`ResolvePolicy::INLINE`].
pub fn resolve(kind: &Kind) -> SchemaResult<ResolvedKind> {
    Resolver::default().resolve(kind)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Member,
    Container,
}

struct ResolveContext<'k> {
    kind: &'k Kind,
    policy: ResolvePolicy,
    definitions: HashMap<String, Definition>,
    occurrences: HashMap<StructType, usize>,
    lifted: HashMap<StructType, String>,
    used_names: HashSet<String>,
    slots: Vec<Option<Declaration>>,
    completed: HashSet<String>,
    visiting: Vec<String>,
}

impl<'k> ResolveContext<'k> {
    fn new(kind: &'k Kind, policy: ResolvePolicy) -> Self {
        let mut definitions = HashMap::new();
        for def in common::builtin_definitions() {
            definitions.insert(def.name.clone(), def);
        }
        for def in &kind.definitions {
            definitions.insert(def.name.clone(), def.clone());
        }
        let mut used_names: HashSet<String> = definitions.keys().cloned().collect();
        used_names.insert(kind.name.clone());

        let mut occurrences = HashMap::new();
        count_type(&kind.metadata.ty, true, &mut occurrences);
        for field in kind.spec.fields.iter().chain(&kind.status.fields) {
            count_type(&field.ty, false, &mut occurrences);
        }
        for def in &kind.definitions {
            count_type(&def.ty, true, &mut occurrences);
        }

        Self {
            kind,
            policy,
            definitions,
            occurrences,
            lifted: HashMap::new(),
            used_names,
            slots: Vec::new(),
            completed: HashSet::new(),
            visiting: Vec::new(),
        }
    }

    fn finish(self) -> Vec<Declaration> {
        self.slots.into_iter().flatten().collect()
    }

    fn section(
        &mut self,
        name: &str,
        docs: &[String],
        ty: &TypeRef,
    ) -> SchemaResult<ResolvedField> {
        let path = vec![name.to_string()];
        let ty = match ty {
            TypeRef::Struct(s) => ResolvedType::Struct(self.fields(&s.fields, &path)?),
            other => self.resolve_type(other, &path, docs, Position::Member)?,
        };

        Ok(ResolvedField {
            name: name.to_string(),
            ty,
            optional: false,
            docs: docs.to_vec(),
        })
    }

    fn root_struct(&mut self, name: &str, s: &StructType) -> SchemaResult<ResolvedField> {
        let path = vec![name.to_string()];
        let fields = self.fields(&s.fields, &path)?;

        Ok(ResolvedField {
            name: name.to_string(),
            ty: ResolvedType::Struct(fields),
            optional: false,
            docs: s.docs.clone(),
        })
    }

    fn fields(&mut self, fields: &[Field], path: &[String]) -> SchemaResult<ResolvedStruct> {
        let mut resolved = Vec::with_capacity(fields.len());
        for field in fields {
            let child = child_path(path, &field.name);
            let ty = self.resolve_type(&field.ty, &child, &field.docs, Position::Member)?;
            resolved.push(ResolvedField {
                name: field.name.clone(),
                ty,
                optional: field.optional,
                docs: field.docs.clone(),
            });
        }
        Ok(ResolvedStruct { fields: resolved })
    }

    fn resolve_type(
        &mut self,
        ty: &TypeRef,
        path: &[String],
        docs: &[String],
        position: Position,
    ) -> SchemaResult<ResolvedType> {
        match ty {
            TypeRef::Scalar { scalar } => Ok(ResolvedType::Scalar(*scalar)),
            TypeRef::EnumLiteral { values } => {
                if !self.policy.extract_enums {
                    return Ok(ResolvedType::Enum(values.clone()));
                }
                let name = self.unique_name(path_type_name(path));
                tracing::debug!(kind = %self.kind.name, %name, path = %path.join("."), "extracted enum");
                self.slots.push(Some(Declaration {
                    name: name.clone(),
                    docs: docs.to_vec(),
                    body: DeclarationBody::Enum(values.clone()),
                    origin: DeclarationOrigin::Extracted {
                        path: path.join("."),
                    },
                }));
                Ok(ResolvedType::Named(name))
            }
            TypeRef::Array { items } => {
                let inner = self.resolve_type(items, path, docs, Position::Container)?;
                Ok(ResolvedType::Array(Box::new(inner)))
            }
            TypeRef::Map { values } => {
                let inner = self.resolve_type(values, path, docs, Position::Container)?;
                Ok(ResolvedType::Map(Box::new(inner)))
            }
            TypeRef::Struct(s) => self.struct_use(s, path, position),
            TypeRef::Reference { name } => self.reference(name, path),
        }
    }

    fn struct_use(
        &mut self,
        s: &StructType,
        path: &[String],
        position: Position,
    ) -> SchemaResult<ResolvedType> {
        if let Some(name) = self.lifted.get(s) {
            return Ok(ResolvedType::Named(name.clone()));
        }

        let shared = self.occurrences.get(s).copied().unwrap_or(0) >= 2;
        let base = match &s.name {
            Some(annotation) => Some(annotation.clone()),
            None if shared
                || !s.docs.is_empty()
                || (position == Position::Container && self.policy.extract_container_structs) =>
            {
                Some(path_type_name(path))
            }
            None => None,
        };

        let Some(base) = base else {
            return Ok(ResolvedType::Struct(self.fields(&s.fields, path)?));
        };

        let name = self.unique_name(base);
        tracing::debug!(kind = %self.kind.name, %name, path = %path.join("."), shared, "extracted struct");
        self.lifted.insert(s.clone(), name.clone());

        let slot = self.reserve();
        let body = self.fields(&s.fields, path)?;
        self.slots[slot] = Some(Declaration {
            name: name.clone(),
            docs: s.docs.clone(),
            body: DeclarationBody::Struct(body),
            origin: DeclarationOrigin::Extracted {
                path: path.join("."),
            },
        });

        Ok(ResolvedType::Named(name))
    }

    fn reference(&mut self, name: &str, path: &[String]) -> SchemaResult<ResolvedType> {
        if self.completed.contains(name) {
            return Ok(ResolvedType::Named(name.to_string()));
        }

        if let Some(start) = self.visiting.iter().position(|n| n == name) {
            let mut chain = self.visiting[start..].to_vec();
            chain.push(name.to_string());
            return Err(SchemaError::Cycle { chain });
        }

        let def = self
            .definitions
            .get(name)
            .cloned()
            .ok_or_else(|| SchemaError::UnresolvedReference {
                path: path.join("."),
                name: name.to_string(),
            })?;

        self.visiting.push(def.name.clone());
        let slot = self.reserve();
        let def_path = vec![def.name.clone()];

        let (body, docs) = match &def.ty {
            TypeRef::Struct(s) => {
                let docs = if def.docs.is_empty() {
                    s.docs.clone()
                } else {
                    def.docs.clone()
                };
                (DeclarationBody::Struct(self.fields(&s.fields, &def_path)?), docs)
            }
            TypeRef::EnumLiteral { values } => (DeclarationBody::Enum(values.clone()), def.docs.clone()),
            other => {
                let ty = self.resolve_type(other, &def_path, &def.docs, Position::Member)?;
                (DeclarationBody::Alias(ty), def.docs.clone())
            }
        };

        self.visiting.pop();
        self.completed.insert(def.name.clone());
        self.slots[slot] = Some(Declaration {
            name: def.name.clone(),
            docs,
            body,
            origin: DeclarationOrigin::Defined,
        });

        Ok(ResolvedType::Named(def.name))
    }

    fn reserve(&mut self) -> usize {
        self.slots.push(None);
        self.slots.len() - 1
    }

    fn unique_name(&mut self, base: String) -> String {
        let base = if base.is_empty() {
            "Anonymous".to_string()
        } else {
            base
        };

        if self.used_names.insert(base.clone()) {
            return base;
        }

        let mut index = 1;
        loop {
            let candidate = format!("{base}{index}");
            if self.used_names.insert(candidate.clone()) {
                return candidate;
            }
            index += 1;
        }
    }
}

fn child_path(path: &[String], name: &str) -> Vec<String> {
    let mut child = path.to_vec();
    child.push(name.to_string());
    child
}

/// Count anonymous struct occurrences. A repeated struct is not descended
/// into again, so its contents count once.
fn count_type(ty: &TypeRef, root: bool, counts: &mut HashMap<StructType, usize>) {
    match ty {
        TypeRef::Struct(s) => {
            if !root && s.is_anonymous() {
                let seen = counts.entry(s.clone()).or_insert(0);
                *seen += 1;
                if *seen > 1 {
                    return;
                }
            }
            for field in &s.fields {
                count_type(&field.ty, false, counts);
            }
        }
        TypeRef::Array { items } => count_type(items, false, counts),
        TypeRef::Map { values } => count_type(values, false, counts),
        TypeRef::Scalar { .. } | TypeRef::EnumLiteral { .. } | TypeRef::Reference { .. } => {}
    }
}
