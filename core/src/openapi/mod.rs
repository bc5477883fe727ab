#![deny(missing_docs)]

//! # OpenAPI Document Model
//!
//! - **document**: Schema Node intermediate representation, component
//!   sections, and the multi-document `DocumentSet`.
//! - **refs**: `$ref` pointer parsing and cross-document resolution.

pub mod document;
pub mod refs;

pub use document::{
    AdditionalProperties, BodyObject, Components, Discriminator, DocumentSet, MediaObject,
    ParameterObject, SchemaKind, SchemaNode, SpecDocument,
};
pub use refs::{get_ref_info, RefComponent, RefInfo};
