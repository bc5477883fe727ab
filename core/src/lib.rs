#![deny(missing_docs)]

//! # Tsgen Core
//!
//! Core library for the OpenAPI -> TypeScript model generator.

/// Shared error types.
pub mod error;

/// Identifier casing and sanitization.
pub mod naming;

/// Document model and reference resolution.
pub mod openapi;

/// Whole-set document pre-passes.
pub mod passes;

/// Schema-to-type resolution.
pub mod resolver;

/// Top-level definition generation.
pub mod generators;

pub use error::{GenError, GenResult};
pub use generators::{
    combined_imports, generate_all, generate_parameters, generate_request_bodies,
    generate_responses, generate_schemas,
};
pub use openapi::{
    get_ref_info, DocumentSet, RefComponent, RefInfo, SchemaKind, SchemaNode, SpecDocument,
};
pub use resolver::{
    dedup_imports, resolve_value, GeneratedSchema, Import, OutputOptions, ResolvedValue,
    ResolverContext, SuffixTable, ValueKind,
};
