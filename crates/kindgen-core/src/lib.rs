//! kindgen-core - Schema IR, type resolution and error types
//!
//! This crate provides the language-agnostic half of kindgen:
//! - [`Kind`] and the rest of the schema IR
//! - [`common`] shapes shared by every kind (common metadata, operator state)
//! - [`Resolver`] for turning a kind into a [`ResolvedKind`]
//! - [`SchemaError`], [`UnsupportedConstructError`] and [`WriteError`]

pub mod common;
mod error;
mod ir;
pub mod naming;
mod resolve;

pub use error::{SchemaError, SchemaResult, UnsupportedConstructError, WriteError};
pub use ir::{
    Definition, Field, Kind, Maturity, ScalarKind, Section, StructType, TypeRef, VariantId,
};
pub use resolve::{
    Declaration, DeclarationBody, DeclarationOrigin, ResolvePolicy, ResolvedField, ResolvedKind,
    ResolvedStruct, ResolvedType, Resolver, resolve,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Field, Kind, ResolvePolicy, ResolvedKind, Resolver, SchemaError, StructType, TypeRef,
        VariantId,
    };
}
