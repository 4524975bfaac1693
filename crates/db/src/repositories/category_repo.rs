//! Repository for the `categories` table.

use async_trait::async_trait;
use sqlx::PgPool;
use taxonomy_core::category::{
    Category, CategoryChanges, CategoryStatus, InsertCategory, CATEGORY_ENTITY,
};
use taxonomy_core::error::{CoreError, CoreResult};
use taxonomy_core::store::CategoryStore;
use taxonomy_core::types::DbId;

use crate::map_sqlx_error;
use crate::models::category::CategoryRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, parent_id, status_id, created_at, updated_at";

/// Provides raw queries for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Find a category by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CategoryRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, CategoryRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all categories, ordered by name ascending.
    pub async fn list(pool: &PgPool) -> Result<Vec<CategoryRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories ORDER BY name ASC, id ASC");
        sqlx::query_as::<_, CategoryRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// List the direct children of a category, ordered by name ascending.
    pub async fn list_by_parent(
        pool: &PgPool,
        parent_id: DbId,
    ) -> Result<Vec<CategoryRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM categories WHERE parent_id = $1 ORDER BY name ASC, id ASC"
        );
        sqlx::query_as::<_, CategoryRow>(&query)
            .bind(parent_id)
            .fetch_all(pool)
            .await
    }

    /// Find the category called `name` under `parent_id` (`None` = roots).
    pub async fn find_by_parent_and_name(
        pool: &PgPool,
        parent_id: Option<DbId>,
        name: &str,
    ) -> Result<Option<CategoryRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM categories \
             WHERE parent_id IS NOT DISTINCT FROM $1 AND name = $2"
        );
        sqlx::query_as::<_, CategoryRow>(&query)
            .bind(parent_id)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new category, returning the created row.
    pub async fn create(pool: &PgPool, input: &InsertCategory) -> Result<CategoryRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (name, parent_id, status_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CategoryRow>(&query)
            .bind(&input.name)
            .bind(input.parent_id)
            .bind(input.status.id())
            .fetch_one(pool)
            .await
    }

    /// Partially update a category.
    ///
    /// Uses `COALESCE` so only provided fields are changed. `parent_id` uses a
    /// provided-flag so it can be cleared to `NULL`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        changes: &CategoryChanges,
    ) -> Result<Option<CategoryRow>, sqlx::Error> {
        let parent_provided = changes.parent_id.is_some();
        let parent_value = changes.parent_id.flatten();

        let query = format!(
            "UPDATE categories SET \
                 name      = COALESCE($2, name), \
                 parent_id = CASE WHEN $3 THEN $4 ELSE parent_id END, \
                 status_id = COALESCE($5, status_id) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CategoryRow>(&query)
            .bind(id)
            .bind(&changes.name)
            .bind(parent_provided)
            .bind(parent_value)
            .bind(changes.status.map(CategoryStatus::id))
            .fetch_optional(pool)
            .await
    }

    /// Set the status of every direct child of `parent_id`.
    ///
    /// Returns the number of rows updated.
    pub async fn update_status_by_parent(
        pool: &PgPool,
        parent_id: DbId,
        status: CategoryStatus,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE categories SET status_id = $2 WHERE parent_id = $1")
            .bind(parent_id)
            .bind(status.id())
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Move the children of `id` under `new_parent` and delete `id`, in one
    /// transaction.
    ///
    /// Returns `None` if `id` did not exist (nothing is changed), otherwise
    /// the number of children moved.
    pub async fn reassign_children_and_delete(
        pool: &PgPool,
        id: DbId,
        new_parent: Option<DbId>,
    ) -> Result<Option<u64>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // A child may share the deleted category's name; uniqueness is
        // checked once the row is gone.
        sqlx::query("SET CONSTRAINTS uq_categories_parent_name DEFERRED")
            .execute(&mut *tx)
            .await?;

        let moved = sqlx::query("UPDATE categories SET parent_id = $2 WHERE parent_id = $1")
            .bind(id)
            .bind(new_parent)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        tx.commit().await?;
        Ok(Some(moved))
    }
}

/// [`CategoryStore`] backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgCategoryStore {
    pool: PgPool,
}

impl PgCategoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_categories(rows: Vec<CategoryRow>) -> CoreResult<Vec<Category>> {
    rows.into_iter().map(Category::try_from).collect()
}

#[async_trait]
impl CategoryStore for PgCategoryStore {
    async fn find_by_id(&self, id: DbId) -> CoreResult<Option<Category>> {
        CategoryRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_sqlx_error)?
            .map(Category::try_from)
            .transpose()
    }

    async fn find_all(&self) -> CoreResult<Vec<Category>> {
        let rows = CategoryRepo::list(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        into_categories(rows)
    }

    async fn find_by_parent(&self, parent_id: DbId) -> CoreResult<Vec<Category>> {
        let rows = CategoryRepo::list_by_parent(&self.pool, parent_id)
            .await
            .map_err(map_sqlx_error)?;
        into_categories(rows)
    }

    async fn find_sibling_by_name(
        &self,
        parent_id: Option<DbId>,
        name: &str,
    ) -> CoreResult<Option<Category>> {
        CategoryRepo::find_by_parent_and_name(&self.pool, parent_id, name)
            .await
            .map_err(map_sqlx_error)?
            .map(Category::try_from)
            .transpose()
    }

    async fn insert(&self, input: &InsertCategory) -> CoreResult<Category> {
        let row = CategoryRepo::create(&self.pool, input)
            .await
            .map_err(map_sqlx_error)?;
        Category::try_from(row)
    }

    async fn update_by_id(
        &self,
        id: DbId,
        changes: &CategoryChanges,
    ) -> CoreResult<Option<Category>> {
        CategoryRepo::update(&self.pool, id, changes)
            .await
            .map_err(map_sqlx_error)?
            .map(Category::try_from)
            .transpose()
    }

    async fn set_status_by_parent(
        &self,
        parent_id: DbId,
        status: CategoryStatus,
    ) -> CoreResult<u64> {
        CategoryRepo::update_status_by_parent(&self.pool, parent_id, status)
            .await
            .map_err(map_sqlx_error)
    }

    async fn reassign_children_and_delete(
        &self,
        id: DbId,
        new_parent: Option<DbId>,
    ) -> CoreResult<u64> {
        CategoryRepo::reassign_children_and_delete(&self.pool, id, new_parent)
            .await
            .map_err(map_sqlx_error)?
            .ok_or(CoreError::NotFound {
                entity: CATEGORY_ENTITY,
                id,
            })
    }
}
