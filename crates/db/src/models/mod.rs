//! Row structs mapping database rows onto domain types.
//!
//! Each submodule contains a `FromRow` row struct and its conversion into the
//! corresponding `taxonomy_core` type.

pub mod category;
pub mod user;
