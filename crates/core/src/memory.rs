//! In-process store implementations.
//!
//! Used by the test suites and by the server when no `DATABASE_URL` is
//! configured. They enforce the same constraints as the PostgreSQL schema:
//! unique `(parent_id, name)`, existing parent references, and unique email.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::category::{Category, CategoryChanges, CategoryStatus, InsertCategory};
use crate::error::{CoreError, CoreResult};
use crate::store::{CategoryStore, UserStore};
use crate::types::DbId;
use crate::user::{NewUser, User};

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct CategoryTable {
    next_id: DbId,
    rows: BTreeMap<DbId, Category>,
}

impl CategoryTable {
    fn sorted<'a>(rows: impl Iterator<Item = &'a Category>) -> Vec<Category> {
        let mut out: Vec<Category> = rows.cloned().collect();
        out.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        out
    }

    fn check_parent_exists(&self, parent_id: Option<DbId>) -> CoreResult<()> {
        match parent_id {
            Some(pid) if !self.rows.contains_key(&pid) => Err(CoreError::Conflict(format!(
                "Parent category {pid} does not exist"
            ))),
            _ => Ok(()),
        }
    }

    fn check_unique(&self, parent_id: Option<DbId>, name: &str, except: DbId) -> CoreResult<()> {
        let taken = self
            .rows
            .values()
            .any(|c| c.id != except && c.parent_id == parent_id && c.name == name);
        if taken {
            return Err(CoreError::Conflict(format!(
                "A category named '{name}' already exists under this parent"
            )));
        }
        Ok(())
    }
}

/// Category store backed by a `BTreeMap` behind an async `RwLock`.
#[derive(Debug, Default)]
pub struct InMemoryCategoryStore {
    table: RwLock<CategoryTable>,
}

impl InMemoryCategoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoryStore for InMemoryCategoryStore {
    async fn find_by_id(&self, id: DbId) -> CoreResult<Option<Category>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_all(&self) -> CoreResult<Vec<Category>> {
        let table = self.table.read().await;
        Ok(CategoryTable::sorted(table.rows.values()))
    }

    async fn find_by_parent(&self, parent_id: DbId) -> CoreResult<Vec<Category>> {
        let table = self.table.read().await;
        Ok(CategoryTable::sorted(
            table
                .rows
                .values()
                .filter(|c| c.parent_id == Some(parent_id)),
        ))
    }

    async fn find_sibling_by_name(
        &self,
        parent_id: Option<DbId>,
        name: &str,
    ) -> CoreResult<Option<Category>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .find(|c| c.parent_id == parent_id && c.name == name)
            .cloned())
    }

    async fn insert(&self, input: &InsertCategory) -> CoreResult<Category> {
        let mut table = self.table.write().await;
        table.check_parent_exists(input.parent_id)?;
        table.check_unique(input.parent_id, &input.name, 0)?;

        table.next_id += 1;
        let now = Utc::now();
        let category = Category {
            id: table.next_id,
            name: input.name.clone(),
            parent_id: input.parent_id,
            status: input.status,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update_by_id(
        &self,
        id: DbId,
        changes: &CategoryChanges,
    ) -> CoreResult<Option<Category>> {
        let mut table = self.table.write().await;
        let Some(current) = table.rows.get(&id).cloned() else {
            return Ok(None);
        };

        let mut next = current;
        if let Some(name) = &changes.name {
            next.name = name.clone();
        }
        if let Some(parent_id) = changes.parent_id {
            next.parent_id = parent_id;
        }
        if let Some(status) = changes.status {
            next.status = status;
        }

        table.check_parent_exists(next.parent_id)?;
        table.check_unique(next.parent_id, &next.name, id)?;

        next.updated_at = Utc::now();
        table.rows.insert(id, next.clone());
        Ok(Some(next))
    }

    async fn set_status_by_parent(
        &self,
        parent_id: DbId,
        status: CategoryStatus,
    ) -> CoreResult<u64> {
        let mut table = self.table.write().await;
        let now = Utc::now();
        let mut touched = 0;
        for row in table
            .rows
            .values_mut()
            .filter(|c| c.parent_id == Some(parent_id))
        {
            row.status = status;
            row.updated_at = now;
            touched += 1;
        }
        Ok(touched)
    }

    async fn reassign_children_and_delete(
        &self,
        id: DbId,
        new_parent: Option<DbId>,
    ) -> CoreResult<u64> {
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&id) {
            return Err(CoreError::NotFound {
                entity: crate::category::CATEGORY_ENTITY,
                id,
            });
        }

        let child_ids: Vec<DbId> = table
            .rows
            .values()
            .filter(|c| c.parent_id == Some(id))
            .map(|c| c.id)
            .collect();

        // Validate every move before writing anything.
        for child_id in &child_ids {
            let name = &table.rows[child_id].name;
            let clash = table
                .rows
                .values()
                .any(|c| c.id != id && c.parent_id == new_parent && &c.name == name);
            if clash {
                return Err(CoreError::Conflict(format!(
                    "A category named '{name}' already exists under the target parent"
                )));
            }
        }

        let now = Utc::now();
        for child_id in &child_ids {
            if let Some(child) = table.rows.get_mut(child_id) {
                child.parent_id = new_parent;
                child.updated_at = now;
            }
        }
        table.rows.remove(&id);
        Ok(child_ids.len() as u64)
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct UserTable {
    next_id: DbId,
    rows: BTreeMap<DbId, User>,
}

/// User store backed by a `BTreeMap` behind an async `RwLock`.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    table: RwLock<UserTable>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_id(&self, id: DbId) -> CoreResult<Option<User>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> CoreResult<Option<User>> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, input: &NewUser) -> CoreResult<User> {
        let mut table = self.table.write().await;
        if table.rows.values().any(|u| u.email == input.email) {
            return Err(CoreError::Conflict(
                "User with this email already exists".into(),
            ));
        }

        table.next_id += 1;
        let now = Utc::now();
        let user = User {
            id: table.next_id,
            name: input.name.clone(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(user.id, user.clone());
        Ok(user)
    }
}
