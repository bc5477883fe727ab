#![deny(missing_docs)]

//! # Top-Level Definition Generators
//!
//! Orchestrate the resolvers over a document's component sections and turn
//! every named entry into emittable artifacts:
//!
//! - `components/schemas` (and legacy `definitions`) -> type declarations,
//! - `components/responses` -> `{Name}Response` payload types,
//! - `components/requestBodies` -> `{Name}Body` payload types,
//! - `components/parameters` -> parameter value types.
//!
//! Each entry yields the named artifact itself plus every auxiliary schema
//! its resolution spawned. The orchestration layer afterwards deduplicates
//! artifact names and strips self-referential imports; the resolvers never
//! do either.

use crate::error::{GenError, GenResult};
use crate::naming::pascal;
use crate::openapi::document::{SchemaKind, SchemaNode};
use crate::resolver::enums::generate_enum;
use crate::resolver::{
    dedup_imports, resolve_value, GeneratedSchema, Import, ResolverContext,
};

/// Generates artifacts for every named data schema of the current document.
pub fn generate_schemas(ctx: &ResolverContext<'_>) -> GenResult<Vec<GeneratedSchema>> {
    let doc = ctx.document()?;
    let suffix = ctx.options.suffixes.schemas.clone();
    let mut out: Vec<GeneratedSchema> = Vec::new();
    for (name, node) in doc.schemas() {
        let canonical = format!("{}{}", pascal(name), suffix);
        append_artifact(node, &canonical, ctx, &mut out)?;
    }
    Ok(finalize(out))
}

/// Generates `{Name}Response` artifacts from `components/responses`.
pub fn generate_responses(ctx: &ResolverContext<'_>) -> GenResult<Vec<GeneratedSchema>> {
    let doc = ctx.document()?;
    let suffix = ctx.options.suffixes.responses.clone();
    let mut out: Vec<GeneratedSchema> = Vec::new();
    for (name, body) in &doc.components.responses {
        let canonical = format!("{}{}", pascal(name), suffix);
        match body.body_schema() {
            Some(node) => append_artifact(node, &canonical, ctx, &mut out)?,
            // A bodyless response still gets a named placeholder type.
            None => out.push(alias(&canonical, "unknown", Vec::new())),
        }
    }
    Ok(finalize(out))
}

/// Generates `{Name}Body` artifacts from `components/requestBodies`.
pub fn generate_request_bodies(ctx: &ResolverContext<'_>) -> GenResult<Vec<GeneratedSchema>> {
    let doc = ctx.document()?;
    let suffix = ctx.options.suffixes.request_bodies.clone();
    let mut out: Vec<GeneratedSchema> = Vec::new();
    for (name, body) in &doc.components.request_bodies {
        let canonical = format!("{}{}", pascal(name), suffix);
        match body.body_schema() {
            Some(node) => append_artifact(node, &canonical, ctx, &mut out)?,
            None => out.push(alias(&canonical, "unknown", Vec::new())),
        }
    }
    Ok(finalize(out))
}

/// Generates parameter value types from `components/parameters`.
pub fn generate_parameters(ctx: &ResolverContext<'_>) -> GenResult<Vec<GeneratedSchema>> {
    let doc = ctx.document()?;
    let suffix = ctx.options.suffixes.parameters.clone();
    let mut out: Vec<GeneratedSchema> = Vec::new();
    for (name, parameter) in &doc.components.parameters {
        let canonical = format!("{}{}", pascal(name), suffix);
        let node = parameter.schema.as_ref().ok_or_else(|| {
            GenError::InvalidSchema(format!(
                "Parameter '{}' declares no schema to generate a type from",
                parameter.name
            ))
        })?;
        append_artifact(node, &canonical, ctx, &mut out)?;
    }
    Ok(finalize(out))
}

/// Generates every artifact of the current document, all sections combined.
pub fn generate_all(ctx: &ResolverContext<'_>) -> GenResult<Vec<GeneratedSchema>> {
    let mut out = generate_schemas(ctx)?;
    out.extend(generate_responses(ctx)?);
    out.extend(generate_request_bodies(ctx)?);
    out.extend(generate_parameters(ctx)?);
    Ok(finalize(out))
}

/// The combined, deduplicated import list for one file-grouping unit.
/// Imports satisfied by an artifact inside the unit itself are dropped;
/// cross-document imports always survive.
pub fn combined_imports(artifacts: &[GeneratedSchema]) -> Vec<Import> {
    let local: Vec<&str> = artifacts.iter().map(|a| a.name.as_str()).collect();
    let all: Vec<Import> = artifacts
        .iter()
        .flat_map(|a| a.imports.iter().cloned())
        .collect();
    dedup_imports(all)
        .into_iter()
        .filter(|import| import.spec_key.is_some() || !local.contains(&import.name.as_str()))
        .collect()
}

/// Resolves one named top-level node and appends the resulting artifacts:
/// auxiliary schemas first, then the named entity itself.
fn append_artifact(
    node: &SchemaNode,
    canonical: &str,
    ctx: &ResolverContext<'_>,
    out: &mut Vec<GeneratedSchema>,
) -> GenResult<()> {
    // Empty plain objects short-circuit to a placeholder declaration.
    if node.is_plain_object()
        && node.properties.is_empty()
        && node.additional_properties.is_none()
    {
        out.push(alias(
            canonical,
            "{ [key: string]: unknown } // no declared properties",
            Vec::new(),
        ));
        return Ok(());
    }

    let resolved = resolve_value(node, Some(canonical), ctx)?;
    out.extend(resolved.schemas);

    if resolved.is_enum && !node.is_reference() {
        let numeric = matches!(
            node.kind(),
            Some(SchemaKind::Number) | Some(SchemaKind::Integer)
        );
        out.push(generate_enum(&resolved.value, numeric, canonical));
    } else {
        out.push(alias(canonical, &resolved.value, resolved.imports));
    }
    Ok(())
}

fn alias(name: &str, value: &str, imports: Vec<Import>) -> GeneratedSchema {
    GeneratedSchema {
        name: name.to_string(),
        model: format!("export type {} = {};", name, value),
        imports,
    }
}

/// Per-artifact cleanup: imports are deduplicated and self-imports (from
/// recursive structures) removed; artifact names are deduplicated keeping
/// the first occurrence.
fn finalize(artifacts: Vec<GeneratedSchema>) -> Vec<GeneratedSchema> {
    let mut out: Vec<GeneratedSchema> = Vec::new();
    for mut artifact in artifacts {
        if out.iter().any(|existing| existing.name == artifact.name) {
            continue;
        }
        artifact.imports = dedup_imports(artifact.imports)
            .into_iter()
            .filter(|import| import.spec_key.is_some() || import.name != artifact.name)
            .collect();
        out.push(artifact);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openapi::document::DocumentSet;
    use crate::resolver::OutputOptions;
    use pretty_assertions::assert_eq;

    fn context(set: &DocumentSet) -> ResolverContext<'_> {
        ResolverContext::new(set, "spec.yaml", OutputOptions::default())
    }

    fn loaded(yaml: &str) -> DocumentSet {
        let mut set = DocumentSet::new();
        set.register_yaml("spec.yaml", yaml).unwrap();
        set
    }

    #[test]
    fn test_schema_artifact_with_promoted_enum() {
        let set = loaded(
            r#"
components:
  schemas:
    Pet:
      type: object
      properties:
        id: { type: integer }
        tag:
          type: string
          enum: [a, b]
      required: [id]
"#,
        );
        let artifacts = generate_schemas(&context(&set)).unwrap();
        let names: Vec<&String> = artifacts.iter().map(|a| &a.name).collect();
        assert_eq!(names, ["PetTag", "Pet"]);
        assert_eq!(
            artifacts[1].model,
            "export type Pet = { id: number; tag?: PetTag };"
        );
        assert!(artifacts[0].model.contains("A: 'a' as PetTag,"));
        assert!(artifacts[0].model.contains("B: 'b' as PetTag,"));
    }

    #[test]
    fn test_top_level_enum_emits_pair() {
        let set = loaded(
            r#"
components:
  schemas:
    pet_status:
      type: string
      enum: [sold, pending]
"#,
        );
        let artifacts = generate_schemas(&context(&set)).unwrap();
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].name, "PetStatus");
        assert!(artifacts[0]
            .model
            .starts_with("export type PetStatus = 'sold' | 'pending';"));
        assert!(artifacts[0].model.contains("SOLD: 'sold' as PetStatus,"));
    }

    #[test]
    fn test_empty_object_placeholder() {
        let set = loaded(
            r#"
components:
  schemas:
    Empty:
      type: object
"#,
        );
        let artifacts = generate_schemas(&context(&set)).unwrap();
        assert!(artifacts[0].model.contains("no declared properties"));
    }

    #[test]
    fn test_self_import_is_filtered() {
        let set = loaded(
            r#"
components:
  schemas:
    Node:
      type: object
      properties:
        children:
          type: array
          items:
            $ref: '#/components/schemas/Node'
"#,
        );
        let artifacts = generate_schemas(&context(&set)).unwrap();
        let node = artifacts.iter().find(|a| a.name == "Node").unwrap();
        assert_eq!(node.model, "export type Node = { children?: Node[] };");
        assert!(node.imports.is_empty());
    }

    #[test]
    fn test_response_suffix_and_body_extraction() {
        let set = loaded(
            r#"
components:
  responses:
    PetList:
      description: a list
      content:
        application/json:
          schema:
            type: array
            items: { type: string }
    Empty:
      description: no body
"#,
        );
        let artifacts = generate_responses(&context(&set)).unwrap();
        assert_eq!(artifacts[0].name, "PetListResponse");
        assert_eq!(artifacts[0].model, "export type PetListResponse = string[];");
        assert_eq!(artifacts[1].model, "export type EmptyResponse = unknown;");
    }

    #[test]
    fn test_request_body_suffix() {
        let set = loaded(
            r#"
components:
  requestBodies:
    CreatePet:
      content:
        application/json:
          schema:
            $ref: '#/components/schemas/Pet'
  schemas:
    Pet: { type: object }
"#,
        );
        let artifacts = generate_request_bodies(&context(&set)).unwrap();
        assert_eq!(artifacts[0].name, "CreatePetBody");
        assert_eq!(artifacts[0].model, "export type CreatePetBody = Pet;");
    }

    #[test]
    fn test_parameter_without_schema_is_fatal() {
        let set = loaded(
            r#"
components:
  parameters:
    PetId:
      name: petId
      in: path
      required: true
"#,
        );
        let err = generate_parameters(&context(&set)).unwrap_err();
        assert!(err.to_string().contains("petId"));
    }

    #[test]
    fn test_combined_imports_drop_local_names() {
        let set = loaded(
            r#"
components:
  schemas:
    Pet:
      type: object
      properties:
        tag: { $ref: '#/components/schemas/Tag' }
    Tag:
      type: string
      enum: [a]
"#,
        );
        let artifacts = generate_schemas(&context(&set)).unwrap();
        assert!(combined_imports(&artifacts).is_empty());
    }
}
