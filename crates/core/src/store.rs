//! Persistence interfaces consumed by the engine and the auth layer.
//!
//! Implementations live in `taxonomy_db` (PostgreSQL) and [`crate::memory`]
//! (in-process). Backend failures surface as [`CoreError::Internal`]; unique
//! and foreign-key violations surface as [`CoreError::Conflict`].
//!
//! [`CoreError::Internal`]: crate::error::CoreError::Internal
//! [`CoreError::Conflict`]: crate::error::CoreError::Conflict

use async_trait::async_trait;

use crate::category::{Category, CategoryChanges, CategoryStatus, InsertCategory};
use crate::error::CoreResult;
use crate::types::DbId;
use crate::user::{NewUser, User};

/// Category persistence.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Point lookup by id.
    async fn find_by_id(&self, id: DbId) -> CoreResult<Option<Category>>;

    /// Every category, ordered by name ascending (ties broken by id).
    async fn find_all(&self) -> CoreResult<Vec<Category>>;

    /// Direct children of `parent_id`, ordered by name ascending.
    async fn find_by_parent(&self, parent_id: DbId) -> CoreResult<Vec<Category>>;

    /// The category named `name` under `parent_id` (`None` = among roots).
    async fn find_sibling_by_name(
        &self,
        parent_id: Option<DbId>,
        name: &str,
    ) -> CoreResult<Option<Category>>;

    /// Insert a row, returning it with generated id and timestamps.
    async fn insert(&self, input: &InsertCategory) -> CoreResult<Category>;

    /// Apply `changes` to one row. Returns `None` if the row does not exist.
    async fn update_by_id(
        &self,
        id: DbId,
        changes: &CategoryChanges,
    ) -> CoreResult<Option<Category>>;

    /// Set `status` on every direct child of `parent_id`. Returns the number of
    /// rows touched.
    async fn set_status_by_parent(&self, parent_id: DbId, status: CategoryStatus)
        -> CoreResult<u64>;

    /// Move every direct child of `id` under `new_parent`, then delete `id`.
    ///
    /// Both steps take effect together or not at all. Returns the number of
    /// children moved.
    async fn reassign_children_and_delete(
        &self,
        id: DbId,
        new_parent: Option<DbId>,
    ) -> CoreResult<u64>;
}

/// User account persistence.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: DbId) -> CoreResult<Option<User>>;

    /// Lookup by normalized email.
    async fn find_by_email(&self, email: &str) -> CoreResult<Option<User>>;

    /// Insert a user. A duplicate email yields `Conflict`.
    async fn insert(&self, input: &NewUser) -> CoreResult<User>;
}
