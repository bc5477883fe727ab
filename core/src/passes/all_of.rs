#![deny(missing_docs)]

//! # All-Of Pre-Merge
//!
//! Rewrites `allOf` compositions whose branches all turn out to be plain
//! objects into a single flat object node, so the resolver later emits one
//! structural literal instead of an `&`-chain.
//!
//! A composition is left untouched (and resolves to an intersection type)
//! when any branch is not a plain object: enumerations, arrays, scalars,
//! remaining combinators, or a reference cycle.

use indexmap::IndexMap;
use std::collections::HashSet;

use crate::error::GenResult;
use crate::openapi::document::{AdditionalProperties, DocumentSet, SchemaKind, SchemaNode};
use crate::openapi::refs::{get_ref_info_in, target_schema};
use crate::resolver::SuffixTable;

/// Pre-merges mergeable `allOf` compositions across every document.
pub fn merge_all_of(specs: &mut DocumentSet) -> GenResult<()> {
    // Merging reads referenced schemas while rewriting others, so all
    // lookups go against a pre-pass snapshot of the set.
    let snapshot = specs.clone();
    let keys: Vec<String> = specs.iter().map(|(k, _)| k.clone()).collect();

    for key in keys {
        let doc = match specs.get_mut(&key) {
            Some(doc) => doc,
            None => continue,
        };
        for node in doc
            .components
            .schemas
            .values_mut()
            .chain(doc.definitions.values_mut())
        {
            let mut visited = HashSet::new();
            merge_node(node, &key, &snapshot, &mut visited)?;
        }
    }
    Ok(())
}

/// Depth-first merge of one node and everything nested under it.
fn merge_node(
    node: &mut SchemaNode,
    current_key: &str,
    snapshot: &DocumentSet,
    visited: &mut HashSet<String>,
) -> GenResult<()> {
    for child in node.properties.values_mut() {
        merge_node(child, current_key, snapshot, visited)?;
    }
    if let Some(items) = node.items.as_deref_mut() {
        merge_node(items, current_key, snapshot, visited)?;
    }
    if let Some(AdditionalProperties::Node(inner)) = node.additional_properties.as_mut() {
        merge_node(inner, current_key, snapshot, visited)?;
    }
    for list in [node.one_of.as_mut(), node.any_of.as_mut(), node.all_of.as_mut()]
        .into_iter()
        .flatten()
    {
        for branch in list.iter_mut() {
            merge_node(branch, current_key, snapshot, visited)?;
        }
    }

    let branches = match node.all_of.clone() {
        Some(branches) if !branches.is_empty() => branches,
        _ => return Ok(()),
    };

    let mut properties: IndexMap<String, SchemaNode> = IndexMap::new();
    let mut required: Vec<String> = Vec::new();

    for branch in &branches {
        let concrete = match materialize(branch, current_key, snapshot, visited)? {
            Some(concrete) if is_mergeable(&concrete) => concrete,
            // Mixed composition or a cycle; keep the intersection form.
            _ => return Ok(()),
        };
        for (prop_name, prop) in &concrete.properties {
            properties.insert(prop_name.clone(), prop.clone());
        }
        for field in &concrete.required {
            if !required.contains(field) {
                required.push(field.clone());
            }
        }
    }

    // The node's own members take precedence over every branch.
    for (prop_name, prop) in &node.properties {
        properties.insert(prop_name.clone(), prop.clone());
    }
    for field in &node.required {
        if !required.contains(field) {
            required.push(field.clone());
        }
    }

    node.all_of = None;
    node.properties = properties;
    node.required = required;
    if node.type_tag.kind.is_none() {
        node.type_tag.kind = Some(SchemaKind::Object);
    }
    Ok(())
}

/// Resolves a branch to a concrete node, chasing references through the
/// snapshot and merging the target's own `allOf` first. `None` signals a
/// cycle or an unresolvable target; the caller then skips the merge.
fn materialize(
    branch: &SchemaNode,
    current_key: &str,
    snapshot: &DocumentSet,
    visited: &mut HashSet<String>,
) -> GenResult<Option<SchemaNode>> {
    let reference = match &branch.reference {
        Some(reference) => reference,
        None => return Ok(Some(branch.clone())),
    };

    let info = get_ref_info_in(reference, current_key, snapshot, &SuffixTable::default())?;
    let target_key = info.target_key(current_key).to_string();
    let guard = format!("{}:{}", target_key, info.original_name);
    if !visited.insert(guard.clone()) {
        return Ok(None);
    }

    let result = match target_schema(&info, current_key, snapshot)? {
        Some(target) => {
            let mut target = target.clone();
            merge_node(&mut target, &target_key, snapshot, visited)?;
            if target.is_reference() {
                materialize(&target, &target_key, snapshot, visited)?
            } else {
                Some(target)
            }
        }
        None => None,
    };

    visited.remove(&guard);
    Ok(result)
}

/// True for branches representable as a plain object fragment.
fn is_mergeable(node: &SchemaNode) -> bool {
    !node.is_reference()
        && !node.has_combinators()
        && !node.is_enumerated()
        && node.items.is_none()
        && matches!(node.kind(), None | Some(SchemaKind::Object))
}
