//! # Error Handling
//!
//! Provides the unified `GenError` enum used across the workspace.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum GenError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// A `$ref` pointer that does not designate a known component.
    /// Created explicitly; `From<String>` maps to `General`.
    #[from(ignore)]
    #[display("Unresolved Reference: {_0}")]
    UnresolvedRef(String),

    /// A schema shape the generator cannot resolve (e.g. array without items).
    #[from(ignore)]
    #[display("Invalid Schema: {_0}")]
    InvalidSchema(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for GenError {}

/// Helper type alias for Result using GenError.
pub type GenResult<T> = Result<T, GenError>;
