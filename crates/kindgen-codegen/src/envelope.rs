//! Envelope assembly shared by the renderers.

use crate::generator::{MemberOrder, MetadataMode};
use kindgen_core::{DeclarationBody, ResolvedField, ResolvedKind, ResolvedType};

/// The kind's `metadata`, `spec` and `status` fields as a renderer sees them.
///
/// In [`MetadataMode::Inline`] a metadata reference to a struct declaration
/// is replaced by that struct's body.
pub(crate) fn envelope_fields(kind: &ResolvedKind, mode: MetadataMode) -> Vec<ResolvedField> {
    let mut metadata = kind.metadata.clone();

    if mode == MetadataMode::Inline {
        if let ResolvedType::Named(name) = &kind.metadata.ty {
            if let Some(decl) = kind.declaration(name) {
                if let DeclarationBody::Struct(body) = &decl.body {
                    metadata.ty = ResolvedType::Struct(body.clone());
                }
            }
        }
    }

    vec![metadata, kind.spec.clone(), kind.status.clone()]
}

/// Fields in the requested order. Alphabetical order is by field name.
pub(crate) fn ordered(fields: &[ResolvedField], order: MemberOrder) -> Vec<&ResolvedField> {
    let mut fields: Vec<_> = fields.iter().collect();
    if order == MemberOrder::Alphabetical {
        fields.sort_by(|a, b| a.name.cmp(&b.name));
    }
    fields
}
