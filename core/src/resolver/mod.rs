#![deny(missing_docs)]

//! # Schema Resolution
//!
//! Maps Schema Nodes to TypeScript type expressions.
//!
//! - **value**: the dispatcher every other resolver re-enters for sub-values.
//! - **scalar**: primitive kinds, literal unions, formats.
//! - **array**: `items` resolution.
//! - **object**: properties, additionalProperties, structural promotion.
//! - **combine**: allOf (`&`) and oneOf/anyOf (`|`) flattening.
//! - **enums**: named enum synthesis (type alias + runtime value map).
//!
//! Every resolver returns the same [`ResolvedValue`] record; resolving a
//! parent aggregates the imports and generated schemas of every child it
//! resolved.

pub mod array;
pub mod combine;
pub mod enums;
pub mod object;
pub mod scalar;
pub mod value;

use crate::error::{GenError, GenResult};
use crate::openapi::document::{DocumentSet, SpecDocument};
use std::cell::RefCell;
use std::collections::HashSet;

pub use value::resolve_value;

/// Coarse kind tag carried by every resolved value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Structural object expression.
    Object,
    /// Array-of-T expression.
    Array,
    /// Plain string (incl. binary/date variants).
    StringLike,
    /// Plain number.
    Number,
    /// Plain boolean.
    Boolean,
    /// Literal union of enumeration values.
    Enum,
    /// A named reference to another generated artifact.
    Ref,
    /// No usable type information.
    Unknown,
}

/// A reference from one generated artifact to another by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// Canonical name of the imported artifact.
    pub name: String,
    /// Originating document key, for cross-document dedup. `None` for the
    /// current document.
    pub spec_key: Option<String>,
    /// True when the import carries a runtime value (enumerations need both
    /// the type and the companion value map).
    pub values: bool,
}

impl Import {
    /// A type-only import from the current document.
    pub fn named(name: impl Into<String>) -> Self {
        Import {
            name: name.into(),
            spec_key: None,
            values: false,
        }
    }
}

/// A named, emittable type artifact produced as a side effect of resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSchema {
    /// Canonical artifact name.
    pub name: String,
    /// Emitted declaration text (one or more TypeScript statements).
    pub model: String,
    /// Imports this artifact depends on.
    pub imports: Vec<Import>,
}

/// The universal output of resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedValue {
    /// The type expression.
    pub value: String,
    /// True when the expression is a literal union of enumeration values.
    pub is_enum: bool,
    /// Coarse kind tag.
    pub kind: ValueKind,
    /// Imports required by the expression.
    pub imports: Vec<Import>,
    /// Auxiliary schemas produced while resolving this node (e.g. an
    /// anonymous nested object promoted to a named type).
    pub schemas: Vec<GeneratedSchema>,
}

impl ResolvedValue {
    /// A self-contained expression with no imports or side products.
    pub fn inline(value: impl Into<String>, kind: ValueKind) -> Self {
        ResolvedValue {
            value: value.into(),
            is_enum: false,
            kind,
            imports: Vec::new(),
            schemas: Vec::new(),
        }
    }
}

/// Naming suffix table, per component section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixTable {
    /// Suffix for data schemas.
    pub schemas: String,
    /// Suffix for responses.
    pub responses: String,
    /// Suffix for parameters.
    pub parameters: String,
    /// Suffix for request bodies.
    pub request_bodies: String,
}

impl Default for SuffixTable {
    fn default() -> Self {
        SuffixTable {
            schemas: String::new(),
            responses: "Response".to_string(),
            parameters: String::new(),
            request_bodies: "Body".to_string(),
        }
    }
}

/// Per-output configuration consumed opaquely during resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputOptions {
    /// Map `date` / `date-time` formatted strings to `Date` instead of
    /// `string`.
    pub use_dates: bool,
    /// Naming suffix table per component section.
    pub suffixes: SuffixTable,
}

/// Ambient state shared by one resolution run: the loaded document set, the
/// current document key, output options, and the cycle guard.
pub struct ResolverContext<'a> {
    /// All loaded documents (read-only; the pre-passes have already run).
    pub specs: &'a DocumentSet,
    /// The document key resolution is currently relative to.
    pub spec_key: String,
    /// Output configuration.
    pub options: OutputOptions,
    /// Canonical names currently being resolved. Guards reference cycles:
    /// a re-entered name degrades to a bare named import instead of
    /// descending again.
    resolving: RefCell<HashSet<String>>,
}

impl<'a> ResolverContext<'a> {
    /// Creates a context for one document of the set.
    pub fn new(specs: &'a DocumentSet, spec_key: impl Into<String>, options: OutputOptions) -> Self {
        ResolverContext {
            specs,
            spec_key: spec_key.into(),
            options,
            resolving: RefCell::new(HashSet::new()),
        }
    }

    /// The current document.
    pub fn document(&self) -> GenResult<&'a SpecDocument> {
        self.specs.get(&self.spec_key).ok_or_else(|| {
            GenError::General(format!("document '{}' is not loaded", self.spec_key))
        })
    }

    /// Marks a canonical name as being resolved. Returns false when the name
    /// is already on the stack (a cycle).
    pub(crate) fn enter(&self, key: &str) -> bool {
        self.resolving.borrow_mut().insert(key.to_string())
    }

    /// Removes a canonical name from the in-flight set.
    pub(crate) fn exit(&self, key: &str) {
        self.resolving.borrow_mut().remove(key);
    }
}

/// Deduplicates imports by `(name, spec_key)`, OR-ing the `values` flag of
/// merged duplicates.
pub fn dedup_imports(imports: Vec<Import>) -> Vec<Import> {
    let mut out: Vec<Import> = Vec::new();
    for import in imports {
        if let Some(existing) = out
            .iter_mut()
            .find(|i| i.name == import.name && i.spec_key == import.spec_key)
        {
            existing.values |= import.values;
        } else {
            out.push(import);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_suffix_table() {
        let table = SuffixTable::default();
        assert_eq!(table.schemas, "");
        assert_eq!(table.responses, "Response");
        assert_eq!(table.parameters, "");
        assert_eq!(table.request_bodies, "Body");
    }

    #[test]
    fn test_dedup_imports_merges_values_flag() {
        let imports = vec![
            Import::named("Pet"),
            Import {
                name: "Pet".into(),
                spec_key: None,
                values: true,
            },
            Import {
                name: "Pet".into(),
                spec_key: Some("other.yaml".into()),
                values: false,
            },
        ];
        let deduped = dedup_imports(imports);
        assert_eq!(deduped.len(), 2);
        assert!(deduped[0].values, "values flag must survive the merge");
    }

    #[test]
    fn test_cycle_guard_enter_exit() {
        let set = DocumentSet::new();
        let ctx = ResolverContext::new(&set, "spec.yaml", OutputOptions::default());
        assert!(ctx.enter("spec.yaml:Node"));
        assert!(!ctx.enter("spec.yaml:Node"));
        ctx.exit("spec.yaml:Node");
        assert!(ctx.enter("spec.yaml:Node"));
    }
}
