#![deny(missing_docs)]

//! # Enum Synthesis
//!
//! Turns a resolved literal-union expression into the exported pair every
//! enumeration compiles to: a union type alias plus a `const` value map
//! whose entries are usable at runtime.
//!
//! ```text
//! export type PetTag = 'lost' | 'found';
//!
//! export const PetTag = {
//!   LOST: 'lost' as PetTag,
//!   FOUND: 'found' as PetTag,
//! };
//! ```

use crate::naming::{sanitize_identifier, starts_with_digit};
use crate::resolver::GeneratedSchema;

/// Builds the type alias + value map pair for an enumeration.
///
/// `value_expr` is the already-rendered union (e.g. `'a' | 'b' | null`);
/// `numeric` selects numeric key derivation for number/integer enums.
pub fn generate_enum(value_expr: &str, numeric: bool, name: &str) -> GeneratedSchema {
    let mut entries: Vec<(String, String)> = Vec::new();

    for literal in value_expr.split(" | ") {
        let literal = literal.trim();
        // `null` participates in the type alias but has no map entry.
        if literal.is_empty() || literal == "null" {
            continue;
        }
        let key = unique_key(derive_key(literal, numeric), &entries);
        entries.push((key, literal.to_string()));
    }

    let mut model = format!("export type {} = {};\n", name, value_expr);
    model.push_str(&format!("\nexport const {} = {{\n", name));
    for (key, literal) in &entries {
        model.push_str(&format!("  {}: {} as {},\n", key, literal, name));
    }
    model.push_str("};");

    GeneratedSchema {
        name: name.to_string(),
        model,
        imports: Vec::new(),
    }
}

/// Derives the value-map key for one literal.
fn derive_key(literal: &str, numeric: bool) -> String {
    if numeric {
        let key = format!("NUMBER_{}", literal.replace('-', "MINUS"));
        return sanitize_identifier(&key);
    }
    let unquoted = literal
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .unwrap_or(literal)
        .replace("\\'", "'");
    let key = sanitize_identifier(&unquoted).to_uppercase();
    if starts_with_digit(&key) {
        format!("'{}'", key)
    } else {
        key
    }
}

/// Disambiguates colliding keys with a numeric suffix, first repeat `_2`.
fn unique_key(base: String, entries: &[(String, String)]) -> String {
    if !entries.iter().any(|(k, _)| *k == base) {
        return base;
    }
    let mut counter = 2;
    loop {
        let candidate = format!("{}_{}", base, counter);
        if !entries.iter().any(|(k, _)| *k == candidate) {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_string_enum_pair() {
        let schema = generate_enum("'lost' | 'found'", false, "PetTag");
        assert_eq!(
            schema.model,
            "export type PetTag = 'lost' | 'found';\n\n\
             export const PetTag = {\n\
             \x20 LOST: 'lost' as PetTag,\n\
             \x20 FOUND: 'found' as PetTag,\n\
             };"
        );
    }

    #[test]
    fn test_numeric_enum_keys() {
        let schema = generate_enum("1 | -2", true, "Code");
        assert!(schema.model.contains("NUMBER_1: 1 as Code,"));
        assert!(schema.model.contains("NUMBER_MINUS2: -2 as Code,"));
    }

    #[test]
    fn test_null_kept_in_alias_but_not_in_map() {
        let schema = generate_enum("'a' | null", false, "Maybe");
        assert!(schema.model.contains("export type Maybe = 'a' | null;"));
        assert!(schema.model.contains("A: 'a' as Maybe,"));
        assert!(!schema.model.contains("NULL"));
    }

    #[test]
    fn test_digit_leading_key_is_quoted() {
        let schema = generate_enum("'1st' | '2nd'", false, "Place");
        assert!(schema.model.contains("'1ST': '1st' as Place,"));
    }

    #[test]
    fn test_colliding_keys_get_suffix() {
        let schema = generate_enum("'a-b' | 'a b'", false, "Odd");
        assert!(schema.model.contains("A_B: 'a-b' as Odd,"));
        assert!(schema.model.contains("A_B_2: 'a b' as Odd,"));
    }

    #[test]
    fn test_symbol_only_literal() {
        let schema = generate_enum("'<' | '>'", false, "Cmp");
        assert!(schema.model.contains("_: '<' as Cmp,"));
        assert!(schema.model.contains("_2: '>' as Cmp,"));
    }
}
