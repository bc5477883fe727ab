#![deny(missing_docs)]

//! # Reference Resolution
//!
//! Parses `$ref` pointer strings and looks up the component they designate,
//! across one or many loaded documents. Resolution is a pure lookup: no
//! document is ever fetched, and nothing is mutated.
//!
//! Cross-document pointers (`./pets.yaml#/components/schemas/Pet`) resolve
//! the document part against the current document key; relative paths are
//! joined through a dummy base URL so plain file-path keys work too.

use crate::error::{GenError, GenResult};
use crate::naming::pascal;
use crate::openapi::document::{DocumentSet, SchemaNode, SpecDocument};
use crate::resolver::{ResolverContext, SuffixTable};
use percent_encoding::percent_decode_str;
use url::Url;

const DUMMY_BASE: &str = "http://example.invalid/";

/// The component section a `$ref` pointer targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefComponent {
    /// `#/components/schemas/...` (also legacy `#/definitions/...`).
    Schemas,
    /// `#/components/responses/...`
    Responses,
    /// `#/components/parameters/...`
    Parameters,
    /// `#/components/requestBodies/...`
    RequestBodies,
}

impl RefComponent {
    fn from_section(section: &str) -> Option<Self> {
        match section {
            "schemas" => Some(Self::Schemas),
            "responses" => Some(Self::Responses),
            "parameters" => Some(Self::Parameters),
            "requestBodies" => Some(Self::RequestBodies),
            _ => None,
        }
    }

    /// The canonical-name suffix for this section, per the output options.
    pub fn suffix<'a>(&self, table: &'a SuffixTable) -> &'a str {
        match self {
            Self::Schemas => &table.schemas,
            Self::Responses => &table.responses,
            Self::Parameters => &table.parameters,
            Self::RequestBodies => &table.request_bodies,
        }
    }
}

/// The result of resolving a `$ref` pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct RefInfo {
    /// Which component section the pointer targets.
    pub component: RefComponent,
    /// The component name exactly as written in the document.
    pub original_name: String,
    /// Canonical generated name: pascal-cased original plus section suffix.
    pub name: String,
    /// Set only when the pointer crosses document boundaries; later lookups
    /// must resolve relative to this document key.
    pub spec_key: Option<String>,
}

impl RefInfo {
    /// The document key the target lives in, given the current key.
    pub fn target_key<'a>(&'a self, current_key: &'a str) -> &'a str {
        self.spec_key.as_deref().unwrap_or(current_key)
    }
}

/// Resolves a `$ref` pointer against the current resolver context.
pub fn get_ref_info(ref_str: &str, ctx: &ResolverContext<'_>) -> GenResult<RefInfo> {
    get_ref_info_in(ref_str, &ctx.spec_key, ctx.specs, &ctx.options.suffixes)
}

/// Lower-level variant used by the pre-passes, which run before a resolver
/// context exists.
pub(crate) fn get_ref_info_in(
    ref_str: &str,
    current_key: &str,
    specs: &DocumentSet,
    suffixes: &SuffixTable,
) -> GenResult<RefInfo> {
    let (document, fragment) = split_ref(ref_str);
    let fragment = fragment.ok_or_else(|| {
        GenError::UnresolvedRef(format!("'{}' has no component fragment", ref_str))
    })?;

    let segments: Vec<&str> = fragment.trim_start_matches('/').split('/').collect();
    let (component, name_seg) = match segments.as_slice() {
        ["components", section, name] => {
            let component = RefComponent::from_section(section).ok_or_else(|| {
                GenError::UnresolvedRef(format!(
                    "'{}' does not target a supported component section",
                    ref_str
                ))
            })?;
            (component, *name)
        }
        // Swagger 2.0 legacy schema section.
        ["definitions", name] => (RefComponent::Schemas, *name),
        _ => {
            return Err(GenError::UnresolvedRef(format!(
                "'{}' does not target a supported component section",
                ref_str
            )));
        }
    };

    let original_name = decode_pointer_segment(name_seg);
    if original_name.is_empty() {
        return Err(GenError::UnresolvedRef(format!(
            "'{}' names an empty component",
            ref_str
        )));
    }

    let spec_key = if document.is_empty() {
        None
    } else {
        let resolved = resolve_document_key(document, current_key, specs)?;
        if resolved == current_key {
            None
        } else {
            Some(resolved)
        }
    };

    let target_key = spec_key.as_deref().unwrap_or(current_key);
    let doc = specs.get(target_key).ok_or_else(|| {
        GenError::UnresolvedRef(format!("document '{}' is not loaded", target_key))
    })?;
    verify_target(doc, component, &original_name, ref_str, target_key)?;

    let name = format!("{}{}", pascal(&original_name), component.suffix(suffixes));

    Ok(RefInfo {
        component,
        original_name,
        name,
        spec_key,
    })
}

/// Returns the Schema Node a resolved reference designates. Responses,
/// request bodies, and parameters unwrap to their payload schema; a payload
/// without a schema yields `None`.
pub(crate) fn target_schema<'a>(
    info: &RefInfo,
    current_key: &str,
    specs: &'a DocumentSet,
) -> GenResult<Option<&'a SchemaNode>> {
    let key = info.target_key(current_key);
    let doc = specs
        .get(key)
        .ok_or_else(|| GenError::UnresolvedRef(format!("document '{}' is not loaded", key)))?;

    let node = match info.component {
        RefComponent::Schemas => doc.schema(&info.original_name),
        RefComponent::Responses => doc
            .components
            .responses
            .get(&info.original_name)
            .and_then(|body| body.body_schema()),
        RefComponent::RequestBodies => doc
            .components
            .request_bodies
            .get(&info.original_name)
            .and_then(|body| body.body_schema()),
        RefComponent::Parameters => doc
            .components
            .parameters
            .get(&info.original_name)
            .and_then(|param| param.schema.as_ref()),
    };
    Ok(node)
}

fn verify_target(
    doc: &SpecDocument,
    component: RefComponent,
    name: &str,
    ref_str: &str,
    key: &str,
) -> GenResult<()> {
    let present = match component {
        RefComponent::Schemas => doc.schema(name).is_some(),
        RefComponent::Responses => doc.components.responses.contains_key(name),
        RefComponent::Parameters => doc.components.parameters.contains_key(name),
        RefComponent::RequestBodies => doc.components.request_bodies.contains_key(name),
    };
    if present {
        Ok(())
    } else {
        Err(GenError::UnresolvedRef(format!(
            "'{}': '{}' not found in document '{}'",
            ref_str, name, key
        )))
    }
}

/// Splits a `$ref` string into its document part and fragment.
fn split_ref(ref_str: &str) -> (&str, Option<&str>) {
    match ref_str.split_once('#') {
        Some((document, fragment)) => (document, Some(fragment)),
        None => (ref_str, None),
    }
}

/// Decodes a JSON Pointer segment (handles `~1`, `~0` and percent-encoding).
pub(crate) fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded)
        .decode_utf8_lossy()
        .into_owned()
}

/// Resolves the document part of a cross-document pointer to a registered
/// document key.
fn resolve_document_key(
    document: &str,
    current_key: &str,
    specs: &DocumentSet,
) -> GenResult<String> {
    for candidate in candidate_keys(document, current_key) {
        if specs.contains(&candidate) {
            return Ok(candidate);
        }
    }
    Err(GenError::UnresolvedRef(format!(
        "document '{}' (referenced from '{}') is not loaded",
        document, current_key
    )))
}

fn candidate_keys(document: &str, current_key: &str) -> Vec<String> {
    let mut candidates = vec![document.to_string()];

    // Absolute URL keys join natively.
    if let Ok(current) = Url::parse(current_key) {
        if let Ok(joined) = current.join(document) {
            candidates.push(joined.to_string());
        }
    }

    // Plain path keys join through a dummy base.
    if let Ok(dummy) = Url::parse(DUMMY_BASE) {
        let trimmed = current_key.trim_start_matches('/');
        if let Ok(base) = dummy.join(trimmed) {
            if let Ok(joined) = base.join(document) {
                if let Some(path) = joined.as_str().strip_prefix(DUMMY_BASE) {
                    candidates.push(path.to_string());
                    candidates.push(format!("/{}", path));
                }
            }
        }
    }

    candidates
}
