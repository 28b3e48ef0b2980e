//! kindgen-codegen - Renderers, output writer and pipeline orchestration
//!
//! # Architecture
//!
//! ```text
//! Kind (IR)
//!     ↓
//!  [Resolver]  policy chosen by the generator
//!     ↓
//!  ResolvedKind
//!     ↓
//!  ├─→ [TypeScriptGenerator]     → {machine}_types.gen.ts
//!  ├─→ [GoTypesGenerator]        → {machine}_types_gen.go
//!  ├─→ [JsonSchemaGenerator]     → {machine}_types_gen.json
//!  ├─→ [GoSectionTypesGenerator] → {machine}_gen.go + {machine}_{section}_gen.go
//!  └─→ [TsIndexGenerator]        → index.gen.ts (all kinds)
//!     ↓
//!  [OutputWriter]
//! ```
//!
//! [`Pipeline`] drives the whole chain for many kinds at once and returns a
//! [`RunReport`].

mod envelope;
mod generator;
pub mod go_sections;
pub mod golang;
pub mod header;
pub mod json_schema;
mod pipeline;
pub mod ts_index;
pub mod typescript;
mod writer;

pub use generator::{
    AggregateGenerator, Generator, GeneratorId, GeneratorParams, MemberOrder, MetadataMode,
    RenderedFile, Target, Variant,
};
pub use go_sections::GoSectionTypesGenerator;
pub use golang::GoTypesGenerator;
pub use json_schema::JsonSchemaGenerator;
pub use pipeline::{
    ALL_KINDS, AggregateOutput, CellError, CellFailure, CellId, Pipeline, RunReport, WrittenFile,
};
pub use ts_index::TsIndexGenerator;
pub use typescript::TypeScriptGenerator;
pub use writer::{
    GeneratedFile, OutputWriter, WriteMode, aggregate_path, kind_dir, relative_path,
};
