#![deny(missing_docs)]

//! # Document Pre-Passes
//!
//! Whole-set rewrites executed once, before any resolution starts:
//!
//! - [`discriminator`] narrows the tag property of every schema named in a
//!   `discriminator.mapping` to the single literal that selects it.
//! - [`all_of`] pre-merges `allOf` compositions whose branches are all
//!   plain objects into a single flat object node.
//!
//! Both run through [`crate::openapi::DocumentSet::prepare`] in that order,
//! so merged objects already carry their narrowed tag properties.

pub mod all_of;
pub mod discriminator;
