#![deny(missing_docs)]

//! # Combinator Resolver
//!
//! Flattens `allOf` / `oneOf` / `anyOf` into TypeScript intersection and
//! union expressions. Each branch goes back through the main dispatcher,
//! so references stay references and nested combinators nest naturally.
//!
//! Branches of a named combinator are resolved under a `{name}Data`
//! qualifier so that anonymous inline structures promoted inside a branch
//! get stable names.

use crate::error::GenResult;
use crate::openapi::document::SchemaNode;
use crate::resolver::object::resolve_properties;
use crate::resolver::value::resolve_value;
use crate::resolver::{GeneratedSchema, Import, ResolvedValue, ResolverContext, ValueKind};

/// How the branches of a combinator are joined.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Separator {
    /// `allOf` branches, joined with `&`.
    Intersection,
    /// `oneOf` / `anyOf` branches, joined with `|`.
    Union,
}

impl Separator {
    fn token(self) -> &'static str {
        match self {
            Separator::Intersection => " & ",
            Separator::Union => " | ",
        }
    }
}

/// Resolves a schema carrying `allOf`, `oneOf` or `anyOf`.
pub fn combine_schemas(
    node: &SchemaNode,
    name: Option<&str>,
    separator: Separator,
    ctx: &ResolverContext<'_>,
) -> GenResult<ResolvedValue> {
    let empty = Vec::new();
    let branches = match separator {
        Separator::Intersection => node.all_of.as_ref().unwrap_or(&empty),
        Separator::Union => node
            .one_of
            .as_ref()
            .or(node.any_of.as_ref())
            .unwrap_or(&empty),
    };

    let branch_name = name.map(|n| format!("{}Data", n));

    let mut imports: Vec<Import> = Vec::new();
    let mut schemas: Vec<GeneratedSchema> = Vec::new();
    let mut parts: Vec<String> = Vec::new();

    for branch in branches {
        let resolved = resolve_value(branch, branch_name.as_deref(), ctx)?;
        parts.push(parenthesize(resolved.value, separator));
        imports.extend(resolved.imports);
        schemas.extend(resolved.schemas);
    }

    // A combinator node may declare properties of its own alongside the
    // branch list. They contribute one more structural part.
    if !node.properties.is_empty() {
        let own = resolve_properties_part(node, branch_name.as_deref(), ctx)?;
        parts.push(parenthesize(own.value, separator));
        imports.extend(own.imports);
        schemas.extend(own.schemas);
    }

    let mut value = parts.join(separator.token());
    if value.is_empty() {
        value = "unknown".to_string();
    }
    if node.is_nullable() {
        if separator == Separator::Intersection {
            value = format!("({})", value);
        }
        value.push_str(" | null");
    }

    Ok(ResolvedValue {
        value,
        is_enum: false,
        kind: ValueKind::Object,
        imports,
        schemas,
    })
}

fn resolve_properties_part(
    node: &SchemaNode,
    name: Option<&str>,
    ctx: &ResolverContext<'_>,
) -> GenResult<ResolvedValue> {
    // Resolve only the node's own property map; nullability is handled by
    // the caller at the full-expression level.
    let mut own = node.clone();
    own.all_of = None;
    own.one_of = None;
    own.any_of = None;
    own.nullable = false;
    own.type_tag.null = false;
    resolve_properties(&own, name, ctx)
}

/// Union-shaped branches must be parenthesized inside an intersection to
/// preserve precedence.
fn parenthesize(value: String, separator: Separator) -> String {
    if separator == Separator::Intersection && value.contains('|') {
        format!("({})", value)
    } else {
        value
    }
}
