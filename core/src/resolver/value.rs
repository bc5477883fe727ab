#![deny(missing_docs)]

//! # Value Resolver
//!
//! The dispatcher: given a Schema Node, decides whether it is a reference,
//! combinator, array, scalar, or object, and produces the standard
//! [`ResolvedValue`] record consumed everywhere else.
//!
//! This is the recursion anchor. References are never inlined: they resolve
//! to their canonical name plus one import, which both keeps deeply nested
//! output flat and guarantees termination on cyclic schema graphs. The
//! context's in-flight name set guards the remaining shallow inspection.

use crate::error::GenResult;
use crate::openapi::document::{SchemaKind, SchemaNode};
use crate::openapi::refs::{self, get_ref_info, RefInfo};
use crate::resolver::combine::{combine_schemas, Separator};
use crate::resolver::object::get_object;
use crate::resolver::scalar::get_scalar;
use crate::resolver::{array::get_array, Import, ResolvedValue, ResolverContext, ValueKind};
use std::collections::HashSet;

/// Resolves one Schema Node to a type expression.
///
/// # Arguments
///
/// * `node` - The schema node to resolve.
/// * `name` - Optional semantic name; nested artifacts derive their names
///   from it (`{name}{Property}`, `{name}Item`, `{name}Data`).
/// * `ctx` - Ambient document set, current document key, and options.
pub fn resolve_value(
    node: &SchemaNode,
    name: Option<&str>,
    ctx: &ResolverContext<'_>,
) -> GenResult<ResolvedValue> {
    if let Some(ref_str) = &node.reference {
        return resolve_reference(ref_str, ctx);
    }
    if node.all_of.is_some() {
        return combine_schemas(node, name, Separator::Intersection, ctx);
    }
    if node.one_of.is_some() || node.any_of.is_some() {
        return combine_schemas(node, name, Separator::Union, ctx);
    }
    if node.items.is_some() || node.kind() == Some(SchemaKind::Array) {
        return get_array(node, name, ctx);
    }
    match node.kind() {
        Some(SchemaKind::String)
        | Some(SchemaKind::Number)
        | Some(SchemaKind::Integer)
        | Some(SchemaKind::Boolean) => get_scalar(node, ctx),
        _ => get_object(node, name, ctx),
    }
}

/// Short-circuits a reference into its canonical name plus one import.
fn resolve_reference(ref_str: &str, ctx: &ResolverContext<'_>) -> GenResult<ResolvedValue> {
    let info = get_ref_info(ref_str, ctx)?;
    let guard_key = format!("{}:{}", info.target_key(&ctx.spec_key), info.name);

    if !ctx.enter(&guard_key) {
        // Already resolving this name further up the stack: degrade to a
        // bare named reference without inspecting the target again.
        return Ok(named_reference(&info, ValueKind::Ref, false));
    }
    let inspected = inspect_target(&info, ctx);
    ctx.exit(&guard_key);
    let (kind, is_enum) = inspected?;

    Ok(named_reference(&info, kind, is_enum))
}

fn named_reference(info: &RefInfo, kind: ValueKind, is_enum: bool) -> ResolvedValue {
    ResolvedValue {
        value: info.name.clone(),
        is_enum,
        kind,
        imports: vec![Import {
            name: info.name.clone(),
            spec_key: info.spec_key.clone(),
            values: is_enum,
        }],
        schemas: Vec::new(),
    }
}

/// Shallowly inspects a reference target for its coarse kind and enum-ness,
/// following ref-to-ref alias chains with an explicit visited set.
fn inspect_target(info: &RefInfo, ctx: &ResolverContext<'_>) -> GenResult<(ValueKind, bool)> {
    let mut visited: HashSet<String> = HashSet::new();
    let mut current_key = info.target_key(&ctx.spec_key).to_string();
    let mut current = info.clone();

    loop {
        let Some(node) = refs::target_schema(&current, &ctx.spec_key, ctx.specs)? else {
            // Payload component without a schema (e.g. empty response body).
            return Ok((ValueKind::Unknown, false));
        };
        let Some(next_ref) = node.reference.clone() else {
            return Ok(coarse_kind(node));
        };
        if !visited.insert(format!("{}:{}", current_key, current.name)) {
            // Pure ref-alias cycle; nothing more to learn.
            return Ok((ValueKind::Ref, false));
        }
        current = refs::get_ref_info_in(&next_ref, &current_key, ctx.specs, &ctx.options.suffixes)?;
        current_key = current.target_key(&current_key).to_string();
        current.spec_key = Some(current_key.clone());
    }
}

/// The coarse kind tag of an inline node, without resolving it.
fn coarse_kind(node: &SchemaNode) -> (ValueKind, bool) {
    if node.is_enumerated() {
        return (ValueKind::Enum, true);
    }
    if node.has_combinators() {
        return (ValueKind::Object, false);
    }
    match node.kind() {
        Some(SchemaKind::Object) => (ValueKind::Object, false),
        Some(SchemaKind::Array) => (ValueKind::Array, false),
        Some(SchemaKind::String) => (ValueKind::StringLike, false),
        Some(SchemaKind::Number) | Some(SchemaKind::Integer) => (ValueKind::Number, false),
        Some(SchemaKind::Boolean) => (ValueKind::Boolean, false),
        None => {
            if node.items.is_some() {
                (ValueKind::Array, false)
            } else if !node.properties.is_empty() || node.additional_properties.is_some() {
                (ValueKind::Object, false)
            } else {
                (ValueKind::Unknown, false)
            }
        }
    }
}
