#![deny(missing_docs)]

//! # Array Resolver
//!
//! Maps a schema with an `items` clause to an array-of-T expression,
//! resolving the element through the dispatcher under an `Item`-suffixed
//! semantic name.

use crate::error::{GenError, GenResult};
use crate::openapi::document::SchemaNode;
use crate::resolver::value::resolve_value;
use crate::resolver::{ResolvedValue, ResolverContext, ValueKind};

/// Resolves an array Schema Node. Fails when no item schema is declared.
pub fn get_array(
    node: &SchemaNode,
    name: Option<&str>,
    ctx: &ResolverContext<'_>,
) -> GenResult<ResolvedValue> {
    let Some(items) = &node.items else {
        return Err(GenError::InvalidSchema(
            "arrays must declare their item schema".to_string(),
        ));
    };

    let item_name = name.map(|n| format!("{}Item", n));
    let item = resolve_value(items, item_name.as_deref(), ctx)?;

    // Union/intersection element types are parenthesized so the `[]` suffix
    // keeps its precedence.
    let element = if item.value.contains('|') || item.value.contains('&') {
        format!("({})", item.value)
    } else {
        item.value.clone()
    };

    let mut value = format!("{}[]", element);
    if node.is_nullable() {
        value.push_str(" | null");
    }

    Ok(ResolvedValue {
        value,
        is_enum: false,
        kind: ValueKind::Array,
        imports: item.imports,
        schemas: item.schemas,
    })
}
