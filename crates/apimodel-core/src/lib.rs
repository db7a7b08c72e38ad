//! apimodel core: API model schemas from relational entity metadata
//!
//! Walks an entity catalog (tables, columns, relationships) and produces
//! declarative field schemas for API documentation and marshalling:
//!
//! ```text
//! Entity ──► Column Inspector ────────┐
//!    │                                ├──► Schema Assembler ──► ModelRegistry
//!    └────► Relationship Inspector ───┘          (Swagger definitions, ...)
//!                  │
//!                  └── (nested mode) recurse into target Entity
//! ```
//!
//! The catalog is read-only input. Each generation call builds its schemas
//! fresh and hands them to the registry; nothing is cached between calls.

pub mod assemble;
pub mod catalog;
pub mod column;
pub mod error;
pub mod field;
pub mod naming;
pub mod options;
pub mod registry;
pub mod relationship;
pub mod swagger;
pub mod typemap;

pub use assemble::{build_field_schema, create_api_model, default_model_name, gen_api_model_from_db};
pub use catalog::{Catalog, Column, ColumnDefault, ColumnType, Entity, ForeignKeyRef, Relationship, ScalarValue};
pub use error::GenerateError;
pub use field::{FieldDescriptor, FieldKind, FieldSchema, FieldType, ModelRef};
pub use options::{GenerateOptions, RelationshipMode};
pub use registry::ModelRegistry;
pub use swagger::SwaggerRegistry;

/// Default bound on nested relationship expansion depth.
pub const DEFAULT_MAX_DEPTH: usize = 32;
