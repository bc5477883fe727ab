#![deny(missing_docs)]

//! # Discriminator Propagation
//!
//! For every `discriminator.mapping` entry, narrows the tag property of the
//! mapped schema to the single literal value that selects it, so each union
//! branch later resolves with a discriminating literal type.
//!
//! Runs before the all-of pre-merge: narrowing targets the original branch
//! schemas, and the merge then folds the narrowed properties in.

use serde_json::Value;
use std::collections::HashSet;

use crate::error::{GenError, GenResult};
use crate::openapi::document::{DocumentSet, SchemaKind, SchemaNode, SpecDocument};
use crate::openapi::refs::{get_ref_info_in, RefComponent};
use crate::resolver::SuffixTable;

/// One pending narrowing: set `property` of `schema` (in document
/// `spec_key`) to the single enum value `tag`.
#[derive(Debug)]
struct Edit {
    spec_key: String,
    schema: String,
    property: String,
    tag: String,
}

/// Applies every `discriminator.mapping` across the whole document set.
pub fn propagate_discriminators(specs: &mut DocumentSet) -> GenResult<()> {
    // Collect first, apply after: a mapping may target a schema in any
    // document, including the one being walked.
    let mut edits: Vec<Edit> = Vec::new();
    for (key, doc) in specs.iter() {
        for (_, node) in doc.schemas() {
            collect_edits(node, key, specs, &mut edits)?;
        }
    }

    // First mapping for a given schema property wins.
    let mut seen: HashSet<(String, String, String)> = HashSet::new();
    for edit in edits {
        if !seen.insert((edit.spec_key.clone(), edit.schema.clone(), edit.property.clone())) {
            continue;
        }
        let doc = match specs.get_mut(&edit.spec_key) {
            Some(doc) => doc,
            None => continue,
        };
        apply_edit(doc, &edit);
    }
    Ok(())
}

fn collect_edits(
    node: &SchemaNode,
    current_key: &str,
    specs: &DocumentSet,
    edits: &mut Vec<Edit>,
) -> GenResult<()> {
    if let Some(discriminator) = &node.discriminator {
        for (tag, target) in &discriminator.mapping {
            // Mapping values may be bare schema names rather than full
            // reference pointers.
            let reference = if target.contains('#') || target.contains('/') {
                target.clone()
            } else {
                format!("#/components/schemas/{}", target)
            };
            let info = get_ref_info_in(&reference, current_key, specs, &SuffixTable::default())?;
            if info.component != RefComponent::Schemas {
                return Err(GenError::InvalidSchema(format!(
                    "Unsupported discriminator mapping target '{}': only schema references can be narrowed",
                    target
                )));
            }
            edits.push(Edit {
                spec_key: info.target_key(current_key).to_string(),
                schema: info.original_name.clone(),
                property: discriminator.property_name.clone(),
                tag: tag.clone(),
            });
        }
    }

    for child in node.properties.values() {
        collect_edits(child, current_key, specs, edits)?;
    }
    if let Some(items) = node.items.as_deref() {
        collect_edits(items, current_key, specs, edits)?;
    }
    for list in [&node.all_of, &node.one_of, &node.any_of].into_iter().flatten() {
        for branch in list {
            collect_edits(branch, current_key, specs, edits)?;
        }
    }
    Ok(())
}

fn apply_edit(doc: &mut SpecDocument, edit: &Edit) {
    let node = match doc
        .components
        .schemas
        .get_mut(&edit.schema)
        .or_else(|| doc.definitions.get_mut(&edit.schema))
    {
        Some(node) => node,
        None => return,
    };

    let tag = Value::String(edit.tag.clone());

    // Narrow an existing property, looking through allOf branches for
    // compositions that have not been merged yet.
    if let Some(prop) = node.properties.get_mut(&edit.property) {
        if prop.enum_values.is_none() {
            prop.enum_values = Some(vec![tag]);
        }
        return;
    }
    if let Some(branches) = node.all_of.as_mut() {
        for branch in branches.iter_mut() {
            if let Some(prop) = branch.properties.get_mut(&edit.property) {
                if prop.enum_values.is_none() {
                    prop.enum_values = Some(vec![tag]);
                }
                return;
            }
        }
    }

    // No declared tag property; synthesize a narrowed string one.
    let mut prop = SchemaNode::default();
    prop.type_tag.kind = Some(SchemaKind::String);
    prop.enum_values = Some(vec![tag]);
    node.properties.insert(edit.property.clone(), prop);
    if !node.required.contains(&edit.property) {
        node.required.push(edit.property.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn narrowed(yaml: &str) -> DocumentSet {
        let mut set = DocumentSet::new();
        set.register_yaml("spec.yaml", yaml).unwrap();
        propagate_discriminators(&mut set).unwrap();
        set
    }

    #[test]
    fn test_existing_property_is_narrowed() {
        let set = narrowed(
            r#"
components:
  schemas:
    Pet:
      oneOf:
        - $ref: '#/components/schemas/Cat'
      discriminator:
        propertyName: petType
        mapping:
          cat: '#/components/schemas/Cat'
    Cat:
      type: object
      properties:
        petType: { type: string }
"#,
        );
        let cat = set.get("spec.yaml").unwrap().schema("Cat").unwrap();
        let tag = cat.properties.get("petType").unwrap();
        assert_eq!(
            tag.enum_values,
            Some(vec![Value::String("cat".to_string())])
        );
    }

    #[test]
    fn test_bare_name_mapping_value() {
        let set = narrowed(
            r#"
components:
  schemas:
    Pet:
      oneOf:
        - $ref: '#/components/schemas/Cat'
      discriminator:
        propertyName: petType
        mapping:
          cat: Cat
    Cat:
      type: object
      properties:
        petType: { type: string }
"#,
        );
        let cat = set.get("spec.yaml").unwrap().schema("Cat").unwrap();
        assert!(cat.properties.get("petType").unwrap().enum_values.is_some());
    }

    #[test]
    fn test_missing_property_is_synthesized() {
        let set = narrowed(
            r#"
components:
  schemas:
    Pet:
      oneOf:
        - $ref: '#/components/schemas/Cat'
      discriminator:
        propertyName: petType
        mapping:
          cat: '#/components/schemas/Cat'
    Cat:
      type: object
      properties:
        name: { type: string }
"#,
        );
        let cat = set.get("spec.yaml").unwrap().schema("Cat").unwrap();
        let tag = cat.properties.get("petType").unwrap();
        assert_eq!(tag.kind(), Some(SchemaKind::String));
        assert!(cat.required.contains(&"petType".to_string()));
    }

    #[test]
    fn test_all_of_branch_property_is_narrowed() {
        let set = narrowed(
            r#"
components:
  schemas:
    Pet:
      oneOf:
        - $ref: '#/components/schemas/Cat'
      discriminator:
        propertyName: petType
        mapping:
          cat: '#/components/schemas/Cat'
    Cat:
      allOf:
        - type: object
          properties:
            petType: { type: string }
"#,
        );
        let cat = set.get("spec.yaml").unwrap().schema("Cat").unwrap();
        let branch = &cat.all_of.as_ref().unwrap()[0];
        assert!(branch.properties.get("petType").unwrap().enum_values.is_some());
    }

    #[test]
    fn test_first_mapping_wins() {
        let set = narrowed(
            r#"
components:
  schemas:
    PetA:
      oneOf:
        - $ref: '#/components/schemas/Cat'
      discriminator:
        propertyName: petType
        mapping:
          cat: '#/components/schemas/Cat'
    PetB:
      oneOf:
        - $ref: '#/components/schemas/Cat'
      discriminator:
        propertyName: petType
        mapping:
          feline: '#/components/schemas/Cat'
    Cat:
      type: object
      properties:
        petType: { type: string }
"#,
        );
        let cat = set.get("spec.yaml").unwrap().schema("Cat").unwrap();
        assert_eq!(
            cat.properties.get("petType").unwrap().enum_values,
            Some(vec![Value::String("cat".to_string())])
        );
    }

    #[test]
    fn test_non_schema_target_is_rejected() {
        let mut set = DocumentSet::new();
        set.register_yaml(
            "spec.yaml",
            r#"
components:
  schemas:
    Pet:
      discriminator:
        propertyName: petType
        mapping:
          odd: '#/components/responses/Odd'
  responses:
    Odd:
      description: odd
"#,
        )
        .unwrap();
        let err = propagate_discriminators(&mut set).unwrap_err();
        assert!(err.to_string().contains("discriminator mapping target"));
    }
}
