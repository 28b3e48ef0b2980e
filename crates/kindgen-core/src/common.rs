//! Shapes shared by every kind.
//!
//! Common metadata and the operator state record are schema-level constants.
//! They live here once and are referenced from each kind's IR.

use crate::ir::{Definition, Field, StructType, TypeRef};

/// Name of the built-in common metadata definition.
pub const COMMON_METADATA: &str = "CommonMetadata";

/// Literals of [`operator_state`]'s `state` field, in declared order.
pub const OPERATOR_STATES: [&str; 3] = ["success", "in_progress", "failed"];

/// Kubernetes-style object metadata shared by all kinds.
pub fn common_metadata() -> StructType {
    StructType::new(vec![
        Field::required("updateTimestamp", TypeRef::date_time()),
        Field::required("createdBy", TypeRef::string()),
        Field::required("updatedBy", TypeRef::string()),
        Field::required("uid", TypeRef::string()),
        Field::required("creationTimestamp", TypeRef::date_time()),
        Field::optional("deletionTimestamp", TypeRef::date_time()),
        Field::required("finalizers", TypeRef::array(TypeRef::string())),
        Field::required("resourceVersion", TypeRef::string()),
        Field::required("extraFields", TypeRef::map(TypeRef::any())).with_docs([
            "extraFields is reserved for any fields that are pulled from the API server metadata but do not have concrete fields in the CUE metadata",
        ]),
        Field::required("labels", TypeRef::map(TypeRef::string())),
    ])
}

/// One operator's last evaluation of a resource.
pub fn operator_state() -> StructType {
    StructType::new(vec![
        Field::required("lastEvaluation", TypeRef::string())
            .with_docs(["lastEvaluation is the ResourceVersion last evaluated"]),
        Field::required("state", TypeRef::enumeration(OPERATOR_STATES)).with_docs([
            "state describes the state of the lastEvaluation.",
            "It is limited to three possible states for machine evaluation.",
        ]),
        Field::optional("descriptiveState", TypeRef::string()).with_docs([
            "descriptiveState is an optional more descriptive state field which has no requirements on format",
        ]),
        Field::optional("details", TypeRef::map(TypeRef::any()))
            .with_docs(["details contains any extra information that is operator-specific"]),
    ])
}

/// Status with the operator state map and a free-form extension field.
pub fn standard_status() -> StructType {
    StructType::new(vec![
        Field::optional(
            "operatorStates",
            TypeRef::map(TypeRef::Struct(operator_state())),
        )
        .with_docs([
            "operatorStates is a map of operator ID to operator state evaluations.",
            "Any operator which consumes this kind SHOULD add its state evaluation information to this field.",
        ]),
        Field::optional("additionalFields", TypeRef::map(TypeRef::any()))
            .with_docs(["additionalFields is reserved for future use"]),
    ])
}

/// Built-in definitions addressable by reference from any kind.
pub fn builtin_definitions() -> Vec<Definition> {
    vec![Definition::new(
        COMMON_METADATA,
        TypeRef::Struct(common_metadata()),
    )]
}

pub fn builtin_definition(name: &str) -> Option<Definition> {
    builtin_definitions().into_iter().find(|d| d.name == name)
}
