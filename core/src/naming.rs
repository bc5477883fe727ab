#![deny(missing_docs)]

//! # Naming
//!
//! Identifier casing and sanitization helpers shared by the resolvers and
//! the enum synthesis layer.

use heck::ToUpperCamelCase;
use regex::Regex;
use std::sync::OnceLock;

/// Pascal-cases an arbitrary schema or property name (e.g. `pet_tag` -> `PetTag`).
pub fn pascal(input: &str) -> String {
    input.to_upper_camel_case()
}

/// Replaces every character that is not valid inside a TypeScript identifier
/// with an underscore. Does not address leading digits; callers quote those.
pub fn sanitize_identifier(input: &str) -> String {
    static INVALID_RE: OnceLock<Regex> = OnceLock::new();
    let re = INVALID_RE
        .get_or_init(|| Regex::new(r"[^A-Za-z0-9_$]").expect("Invalid regex constant"));
    re.replace_all(input, "_").into_owned()
}

/// Returns true when `input` is usable as a bare TypeScript property key.
pub fn is_valid_key(input: &str) -> bool {
    if input.is_empty() || starts_with_digit(input) {
        return false;
    }
    input
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Returns true when `input` begins with an ASCII digit.
pub fn starts_with_digit(input: &str) -> bool {
    input.chars().next().is_some_and(|c| c.is_ascii_digit())
}
