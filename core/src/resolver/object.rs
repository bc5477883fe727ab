#![deny(missing_docs)]

//! # Object Resolver
//!
//! Maps a schema with `properties` / `additionalProperties` to a structural
//! type expression, descending into each property through the dispatcher.
//!
//! Nested anonymous structures that resolve to a "real" structural
//! expression are promoted to their own named Generated Schema instead of
//! being inlined, which keeps deeply nested output flat and readable.
//! Named inline enums route through enum synthesis the same way.

use crate::error::GenResult;
use crate::naming::{is_valid_key, pascal};
use crate::openapi::document::{AdditionalProperties, SchemaKind, SchemaNode};
use crate::resolver::combine::{combine_schemas, Separator};
use crate::resolver::enums::generate_enum;
use crate::resolver::value::resolve_value;
use crate::resolver::{GeneratedSchema, Import, ResolvedValue, ResolverContext, ValueKind};

/// Resolves an object (or default-kind) Schema Node.
pub fn get_object(
    node: &SchemaNode,
    name: Option<&str>,
    ctx: &ResolverContext<'_>,
) -> GenResult<ResolvedValue> {
    if node.is_reference() {
        return resolve_value(node, name, ctx);
    }
    if node.all_of.is_some() {
        return combine_schemas(node, name, Separator::Intersection, ctx);
    }
    if node.one_of.is_some() || node.any_of.is_some() {
        return combine_schemas(node, name, Separator::Union, ctx);
    }
    if !node.properties.is_empty() {
        return resolve_properties(node, name, ctx);
    }
    if let Some(additional) = &node.additional_properties {
        return resolve_additional_properties(node, additional, name, ctx);
    }

    // No structural information at all.
    let resolved = if node.kind() == Some(SchemaKind::Object) {
        let mut value = "{ [key: string]: unknown }".to_string();
        if node.is_nullable() {
            value.push_str(" | null");
        }
        ResolvedValue::inline(value, ValueKind::Object)
    } else {
        ResolvedValue::inline("unknown", ValueKind::Unknown)
    };
    Ok(resolved)
}

/// Resolves the `properties` map of a node into one structural expression.
/// Also used by the combinator resolver for nodes that mix `allOf` with
/// their own properties.
pub(crate) fn resolve_properties(
    node: &SchemaNode,
    name: Option<&str>,
    ctx: &ResolverContext<'_>,
) -> GenResult<ResolvedValue> {
    let mut imports: Vec<Import> = Vec::new();
    let mut schemas: Vec<GeneratedSchema> = Vec::new();
    let mut fields: Vec<String> = Vec::new();

    for (key, prop) in &node.properties {
        let qualified = name.map(|n| format!("{}{}", n, pascal(key)));
        let resolved = resolve_value(prop, qualified.as_deref(), ctx)?;

        let mut field_type = resolved.value.clone();
        let mut prop_imports = resolved.imports;
        let mut prop_schemas = resolved.schemas;

        if let Some(qualified_name) = &qualified {
            if resolved.is_enum && !prop.is_reference() {
                // A named inline enum becomes a reusable named artifact.
                let numeric = matches!(
                    prop.kind(),
                    Some(SchemaKind::Number) | Some(SchemaKind::Integer)
                );
                prop_schemas.push(generate_enum(&resolved.value, numeric, qualified_name));
                field_type = qualified_name.clone();
                imports.push(Import {
                    name: qualified_name.clone(),
                    spec_key: None,
                    values: true,
                });
            } else if !prop.is_reference() && is_structural(&resolved.value) {
                // Promote a real nested structure to its own named type.
                prop_schemas.push(GeneratedSchema {
                    name: qualified_name.clone(),
                    model: format!("export type {} = {};", qualified_name, resolved.value),
                    imports: prop_imports.clone(),
                });
                field_type = qualified_name.clone();
                imports.push(Import::named(qualified_name.clone()));
            }
        }

        imports.extend(prop_imports);
        schemas.extend(prop_schemas);

        let field_key = if is_valid_key(key) {
            key.clone()
        } else {
            format!("'{}'", key.replace('\'', "\\'"))
        };
        let optional = if node.required.contains(key) { "" } else { "?" };
        fields.push(format!("{}{}: {}", field_key, optional, field_type));
    }

    let mut value = format!("{{ {} }}", fields.join("; "));
    if node.is_nullable() {
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

fn resolve_additional_properties(
    node: &SchemaNode,
    additional: &AdditionalProperties,
    name: Option<&str>,
    ctx: &ResolverContext<'_>,
) -> GenResult<ResolvedValue> {
    let resolved = match additional {
        AdditionalProperties::Flag(true) => {
            ResolvedValue::inline("{ [key: string]: unknown }", ValueKind::Object)
        }
        AdditionalProperties::Flag(false) => {
            // A closed object with no declared properties admits nothing.
            ResolvedValue::inline("{ [key: string]: never }", ValueKind::Object)
        }
        AdditionalProperties::Node(schema) => {
            let inner = resolve_value(schema, name, ctx)?;
            ResolvedValue {
                value: format!("{{ [key: string]: {} }}", inner.value),
                is_enum: false,
                kind: ValueKind::Object,
                imports: inner.imports,
                schemas: inner.schemas,
            }
        }
    };

    let mut value = resolved.value;
    if node.is_nullable() {
        value.push_str(" | null");
    }
    Ok(ResolvedValue { value, ..resolved })
}

/// True for expressions worth promoting to a named artifact: structural
/// object literals and real unions/intersections. A bare `T | null` does
/// not count.
fn is_structural(expression: &str) -> bool {
    if expression.contains('{') || expression.contains('&') {
        return true;
    }
    let without_null = expression.strip_suffix(" | null").unwrap_or(expression);
    without_null.contains('|')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openapi::document::DocumentSet;
    use crate::resolver::OutputOptions;
    use pretty_assertions::assert_eq;

    fn resolve(yaml: &str, name: Option<&str>, set: &DocumentSet) -> ResolvedValue {
        let ctx = ResolverContext::new(set, "spec.yaml", OutputOptions::default());
        let node: SchemaNode = serde_yaml::from_str(yaml).unwrap();
        get_object(&node, name, &ctx).unwrap()
    }

    #[test]
    fn test_required_and_optional_fields() {
        let set = DocumentSet::new();
        let resolved = resolve(
            r#"
type: object
properties:
  id: { type: integer }
  tag: { type: string }
required: [id]
"#,
            Some("Pet"),
            &set,
        );
        assert_eq!(resolved.value, "{ id: number; tag?: string }");
    }

    #[test]
    fn test_named_inline_enum_is_promoted() {
        let set = DocumentSet::new();
        let resolved = resolve(
            r#"
type: object
properties:
  tag:
    type: string
    enum: [a, b]
"#,
            Some("Pet"),
            &set,
        );
        assert_eq!(resolved.value, "{ tag?: PetTag }");
        assert_eq!(resolved.schemas.len(), 1);
        assert_eq!(resolved.schemas[0].name, "PetTag");
        assert!(resolved.schemas[0].model.contains("export type PetTag = 'a' | 'b';"));
        let tag_import = resolved.imports.iter().find(|i| i.name == "PetTag").unwrap();
        assert!(tag_import.values);
    }

    #[test]
    fn test_nested_object_is_promoted() {
        let set = DocumentSet::new();
        let resolved = resolve(
            r#"
type: object
properties:
  owner:
    type: object
    properties:
      name: { type: string }
"#,
            Some("Pet"),
            &set,
        );
        assert_eq!(resolved.value, "{ owner?: PetOwner }");
        assert_eq!(resolved.schemas[0].name, "PetOwner");
        assert_eq!(
            resolved.schemas[0].model,
            "export type PetOwner = { name?: string };"
        );
    }

    #[test]
    fn test_anonymous_nested_object_stays_inline() {
        let set = DocumentSet::new();
        let resolved = resolve(
            r#"
type: object
properties:
  owner:
    type: object
    properties:
      name: { type: string }
"#,
            None,
            &set,
        );
        assert_eq!(resolved.value, "{ owner?: { name?: string } }");
        assert!(resolved.schemas.is_empty());
    }

    #[test]
    fn test_nullable_scalar_property_not_promoted() {
        let set = DocumentSet::new();
        let resolved = resolve(
            r#"
type: object
properties:
  note: { type: string, nullable: true }
"#,
            Some("Pet"),
            &set,
        );
        assert_eq!(resolved.value, "{ note?: string | null }");
        assert!(resolved.schemas.is_empty());
    }

    #[test]
    fn test_additional_properties_open_map() {
        let set = DocumentSet::new();
        let resolved = resolve("type: object\nadditionalProperties: true", None, &set);
        assert_eq!(resolved.value, "{ [key: string]: unknown }");
    }

    #[test]
    fn test_additional_properties_schema_map() {
        let mut set = DocumentSet::new();
        set.register_yaml(
            "spec.yaml",
            r#"
components:
  schemas:
    Pet: { type: object }
"#,
        )
        .unwrap();
        let resolved = resolve(
            "type: object\nadditionalProperties: { $ref: '#/components/schemas/Pet' }",
            None,
            &set,
        );
        assert_eq!(resolved.value, "{ [key: string]: Pet }");
        assert_eq!(resolved.imports, vec![Import::named("Pet")]);
    }

    #[test]
    fn test_empty_object_fallbacks() {
        let set = DocumentSet::new();
        assert_eq!(
            resolve("type: object", None, &set).value,
            "{ [key: string]: unknown }"
        );
        assert_eq!(resolve("{}", None, &set).value, "unknown");
    }

    #[test]
    fn test_quoted_property_keys() {
        let set = DocumentSet::new();
        let resolved = resolve(
            r#"
type: object
properties:
  content-type: { type: string }
"#,
            None,
            &set,
        );
        assert_eq!(resolved.value, "{ 'content-type'?: string }");
    }
}
