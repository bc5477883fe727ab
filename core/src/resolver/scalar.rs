#![deny(missing_docs)]

//! # Scalar Resolver
//!
//! Maps leaf schemas (number, string, boolean, binary, date) to type
//! expressions, handling enumerations and nullability. Never recurses and
//! never produces imports or auxiliary schemas.

use crate::error::GenResult;
use crate::openapi::document::{SchemaKind, SchemaNode};
use crate::resolver::{ResolvedValue, ResolverContext, ValueKind};
use serde_json::Value;

/// Resolves a primitive Schema Node.
pub fn get_scalar(node: &SchemaNode, ctx: &ResolverContext<'_>) -> GenResult<ResolvedValue> {
    let mut saw_null = node.is_nullable();

    let (mut value, kind, is_enum) = match node.kind() {
        Some(SchemaKind::Number) | Some(SchemaKind::Integer) => match enum_literals(node) {
            Some((literals, null_literal)) => {
                saw_null |= null_literal;
                (literals.join(" | "), ValueKind::Enum, true)
            }
            None => ("number".to_string(), ValueKind::Number, false),
        },
        Some(SchemaKind::Boolean) => ("boolean".to_string(), ValueKind::Boolean, false),
        Some(SchemaKind::String) => match enum_literals(node) {
            Some((literals, null_literal)) => {
                saw_null |= null_literal;
                (literals.join(" | "), ValueKind::Enum, true)
            }
            None => (string_expression(node, ctx), ValueKind::StringLike, false),
        },
        // Defensive default; the dispatcher only routes primitives here.
        _ => ("unknown".to_string(), ValueKind::Unknown, false),
    };

    if saw_null {
        value.push_str(" | null");
    }

    Ok(ResolvedValue {
        value,
        is_enum,
        kind,
        imports: Vec::new(),
        schemas: Vec::new(),
    })
}

fn string_expression(node: &SchemaNode, ctx: &ResolverContext<'_>) -> String {
    match node.format.as_deref() {
        Some("binary") => "Blob".to_string(),
        Some("date") | Some("date-time") if ctx.options.use_dates => "Date".to_string(),
        _ => "string".to_string(),
    }
}

/// Renders the node's enumeration values as literals, deduplicated in
/// declaration order. Returns `None` when no enumeration is declared;
/// the second element reports whether `null` appeared among the values.
fn enum_literals(node: &SchemaNode) -> Option<(Vec<String>, bool)> {
    let values = node.enum_values.as_ref()?;
    if values.is_empty() {
        return None;
    }

    let mut seen: Vec<&Value> = Vec::new();
    let mut literals = Vec::new();
    let mut saw_null = false;
    for value in values {
        if seen.contains(&value) {
            continue;
        }
        seen.push(value);
        match render_literal(value) {
            Some(literal) => literals.push(literal),
            None => saw_null = true,
        }
    }

    if literals.is_empty() {
        None
    } else {
        Some((literals, saw_null))
    }
}

/// One enum value as a TypeScript literal; `None` for null.
fn render_literal(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(format!("'{}'", s.replace('\'', "\\'"))),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openapi::document::DocumentSet;
    use crate::resolver::OutputOptions;
    use pretty_assertions::assert_eq;

    fn resolve(yaml: &str, options: OutputOptions) -> ResolvedValue {
        let set = DocumentSet::new();
        let ctx = ResolverContext::new(&set, "spec.yaml", options);
        let node: SchemaNode = serde_yaml::from_str(yaml).unwrap();
        get_scalar(&node, &ctx).unwrap()
    }

    #[test]
    fn test_primitives() {
        assert_eq!(resolve("type: integer", OutputOptions::default()).value, "number");
        assert_eq!(resolve("type: number", OutputOptions::default()).value, "number");
        assert_eq!(resolve("type: boolean", OutputOptions::default()).value, "boolean");
        assert_eq!(resolve("type: string", OutputOptions::default()).value, "string");
    }

    #[test]
    fn test_string_enum_literal_union() {
        let resolved = resolve("type: string\nenum: [a, b]", OutputOptions::default());
        assert_eq!(resolved.value, "'a' | 'b'");
        assert!(resolved.is_enum);
        assert_eq!(resolved.kind, ValueKind::Enum);
    }

    #[test]
    fn test_number_enum_literal_union() {
        let resolved = resolve("type: integer\nenum: [1, 2, 3]", OutputOptions::default());
        assert_eq!(resolved.value, "1 | 2 | 3");
        assert!(resolved.is_enum);
    }

    #[test]
    fn test_enum_duplicates_collapse() {
        let resolved = resolve("type: string\nenum: [a, a, b]", OutputOptions::default());
        assert_eq!(resolved.value, "'a' | 'b'");
    }

    #[test]
    fn test_enum_null_entry_becomes_null_union() {
        let resolved = resolve("type: string\nenum: [a, null]", OutputOptions::default());
        assert_eq!(resolved.value, "'a' | null");
    }

    #[test]
    fn test_binary_format() {
        let resolved = resolve("type: string\nformat: binary", OutputOptions::default());
        assert_eq!(resolved.value, "Blob");
    }

    #[test]
    fn test_date_format_follows_override() {
        assert_eq!(
            resolve("type: string\nformat: date-time", OutputOptions::default()).value,
            "string"
        );
        let options = OutputOptions {
            use_dates: true,
            ..OutputOptions::default()
        };
        assert_eq!(resolve("type: string\nformat: date-time", options).value, "Date");
    }

    #[test]
    fn test_nullable_appends_null_branch() {
        let resolved = resolve("type: string\nnullable: true", OutputOptions::default());
        assert_eq!(resolved.value, "string | null");
        let resolved = resolve(r#"type: [integer, "null"]"#, OutputOptions::default());
        assert_eq!(resolved.value, "number | null");
    }

    #[test]
    fn test_no_imports_for_pure_scalars() {
        let resolved = resolve("type: string", OutputOptions::default());
        assert!(resolved.imports.is_empty());
        assert!(resolved.schemas.is_empty());
    }

    #[test]
    fn test_quote_escaping() {
        let resolved = resolve("type: string\nenum: [\"it's\"]", OutputOptions::default());
        assert_eq!(resolved.value, r"'it\'s'");
    }
}
