//! Domain layer of the category taxonomy service.
//!
//! - [`category`] -- category records, engine inputs, name validation.
//! - [`tree`] -- flat list to forest assembly.
//! - [`service`] -- the tree engine ([`service::CategoryService`]).
//! - [`store`] -- persistence traits the engine and auth layer depend on.
//! - [`memory`] -- in-process store implementations.
//! - [`user`] -- user accounts and password rules.

pub mod category;
pub mod error;
pub mod memory;
pub mod service;
pub mod store;
pub mod tree;
pub mod types;
pub mod user;
