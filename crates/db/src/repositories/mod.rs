//! Repository layer.
//!
//! Each `*Repo` is a zero-sized struct providing async queries that accept
//! `&PgPool` as the first argument. The `Pg*Store` types wrap a pool and
//! implement the `taxonomy_core` store traits on top of them.

pub mod category_repo;
pub mod user_repo;

pub use category_repo::{CategoryRepo, PgCategoryStore};
pub use user_repo::{PgUserStore, UserRepo};
