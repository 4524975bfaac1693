//! Category row model.

use sqlx::FromRow;
use taxonomy_core::category::{Category, CategoryStatus};
use taxonomy_core::error::CoreError;
use taxonomy_core::types::{DbId, Timestamp};

/// A row from the `categories` table.
#[derive(Debug, Clone, FromRow)]
pub struct CategoryRow {
    pub id: DbId,
    pub name: String,
    pub parent_id: Option<DbId>,
    pub status_id: i16,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<CategoryRow> for Category {
    type Error = CoreError;

    fn try_from(row: CategoryRow) -> Result<Self, Self::Error> {
        let status = CategoryStatus::from_id(row.status_id).ok_or_else(|| {
            CoreError::Internal(format!(
                "Category {} has unknown status id {}",
                row.id, row.status_id
            ))
        })?;
        Ok(Category {
            id: row.id,
            name: row.name,
            parent_id: row.parent_id,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
