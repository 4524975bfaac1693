//! The category tree engine.
//!
//! [`CategoryService`] validates structural operations, keeps the inherited
//! inactive status consistent, and assembles the forest view. It only talks to
//! an injected [`CategoryStore`]; it never retries and never holds locks
//! across store calls.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use crate::category::{
    validate_category_name, Category, CategoryChanges, CategoryNode, CategoryPatch,
    CategoryStatus, DeleteOutcome, InsertCategory, NewCategory, ParentChange, CATEGORY_ENTITY,
};
use crate::error::{CoreError, CoreResult};
use crate::store::CategoryStore;
use crate::tree::build_forest;
use crate::types::DbId;

/// Category hierarchy operations over a shared store.
#[derive(Clone)]
pub struct CategoryService {
    store: Arc<dyn CategoryStore>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn CategoryStore>) -> Self {
        Self { store }
    }

    /// Create a category.
    ///
    /// A category created under an inactive parent is always inactive, whatever
    /// status was requested.
    pub async fn create(&self, input: NewCategory) -> CoreResult<Category> {
        let name = validate_category_name(&input.name)?;
        let mut status = input.status.unwrap_or_default();

        if let Some(parent_id) = input.parent_id {
            let parent = self.require(parent_id).await?;
            if parent.status.is_inactive() {
                status = CategoryStatus::Inactive;
            }
        }

        self.ensure_name_free(input.parent_id, &name, None).await?;

        let category = self
            .store
            .insert(&InsertCategory {
                name,
                parent_id: input.parent_id,
                status,
            })
            .await?;

        tracing::info!(
            category_id = category.id,
            parent_id = ?category.parent_id,
            status = %category.status,
            "Category created",
        );
        Ok(category)
    }

    /// Every category, arranged as a forest with siblings sorted by name.
    pub async fn tree(&self) -> CoreResult<Vec<CategoryNode>> {
        let categories = self.store.find_all().await?;
        Ok(build_forest(categories))
    }

    pub async fn get_by_id(&self, id: DbId) -> CoreResult<Category> {
        self.require(id).await
    }

    /// Apply a partial update.
    ///
    /// Moving a category under an inactive parent, or setting it inactive,
    /// makes the category and all of its descendants inactive. Activating a
    /// category never touches its descendants, and a category whose parent is
    /// inactive stays inactive.
    pub async fn update(&self, id: DbId, patch: CategoryPatch) -> CoreResult<Category> {
        let current = self.require(id).await?;
        let mut changes = CategoryChanges::default();

        let name = match patch.name {
            Some(raw) => {
                let name = validate_category_name(&raw)?;
                if name != current.name {
                    changes.name = Some(name.clone());
                }
                name
            }
            None => current.name.clone(),
        };

        let mut parent_inactive = false;
        let parent_id = match patch.parent {
            ParentChange::Unchanged => current.parent_id,
            ParentChange::Root => {
                if current.parent_id.is_some() {
                    changes.parent_id = Some(None);
                }
                None
            }
            ParentChange::Set(parent_id) => {
                if parent_id == id {
                    return Err(CoreError::InvalidOperation(
                        "A category cannot be its own parent".into(),
                    ));
                }
                let parent = self.require(parent_id).await?;
                self.ensure_not_descendant(id, &parent).await?;
                parent_inactive = parent.status.is_inactive();
                if current.parent_id != Some(parent_id) {
                    changes.parent_id = Some(Some(parent_id));
                }
                Some(parent_id)
            }
        };

        if changes.name.is_some() || changes.parent_id.is_some() {
            self.ensure_name_free(parent_id, &name, Some(id)).await?;
        }

        // Requesting `active` under an unchanged parent still has to respect
        // that parent's status.
        if patch.status == Some(CategoryStatus::Active)
            && patch.parent == ParentChange::Unchanged
        {
            if let Some(pid) = parent_id {
                parent_inactive = self.require(pid).await?.status.is_inactive();
            }
        }

        let status = if parent_inactive {
            Some(CategoryStatus::Inactive)
        } else {
            patch.status
        };
        if let Some(status) = status {
            if status != current.status {
                changes.status = Some(status);
            }
        }

        if status == Some(CategoryStatus::Inactive) {
            let cascaded = self.cascade_inactive(id).await?;
            if cascaded > 0 {
                tracing::info!(category_id = id, cascaded, "Inactive status cascaded");
            }
        }

        if changes.is_empty() {
            return Ok(current);
        }

        let updated = self
            .store
            .update_by_id(id, &changes)
            .await?
            .ok_or_else(|| {
                CoreError::Internal(format!("Category {id} missing after update"))
            })?;

        tracing::info!(
            category_id = id,
            parent_id = ?updated.parent_id,
            status = %updated.status,
            "Category updated",
        );
        Ok(updated)
    }

    /// Delete a category, moving its direct children to its former parent.
    pub async fn delete(&self, id: DbId) -> CoreResult<DeleteOutcome> {
        let category = self.require(id).await?;
        let children = self.store.find_by_parent(id).await?;

        for child in &children {
            if let Some(existing) = self
                .store
                .find_sibling_by_name(category.parent_id, &child.name)
                .await?
            {
                if existing.id != id {
                    return Err(CoreError::Conflict(format!(
                        "Cannot move '{}' up: a sibling with that name already exists",
                        child.name
                    )));
                }
            }
        }

        let reassigned_count = self
            .store
            .reassign_children_and_delete(id, category.parent_id)
            .await?;

        tracing::info!(
            category_id = id,
            new_parent_id = ?category.parent_id,
            reassigned_count,
            "Category deleted",
        );
        Ok(DeleteOutcome { reassigned_count })
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    async fn require(&self, id: DbId) -> CoreResult<Category> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: CATEGORY_ENTITY,
                id,
            })
    }

    async fn ensure_name_free(
        &self,
        parent_id: Option<DbId>,
        name: &str,
        except: Option<DbId>,
    ) -> CoreResult<()> {
        match self.store.find_sibling_by_name(parent_id, name).await? {
            Some(existing) if Some(existing.id) != except => Err(CoreError::Conflict(format!(
                "A category named '{name}' already exists under this parent"
            ))),
            _ => Ok(()),
        }
    }

    /// Reject moving `id` beneath `new_parent` when `new_parent` is one of its
    /// descendants.
    async fn ensure_not_descendant(&self, id: DbId, new_parent: &Category) -> CoreResult<()> {
        let mut seen = HashSet::from([new_parent.id]);
        let mut cursor = new_parent.parent_id;
        while let Some(ancestor) = cursor {
            if ancestor == id {
                return Err(CoreError::InvalidOperation(
                    "A category cannot be moved beneath one of its own descendants".into(),
                ));
            }
            if !seen.insert(ancestor) {
                break;
            }
            cursor = self
                .store
                .find_by_id(ancestor)
                .await?
                .and_then(|c| c.parent_id);
        }
        Ok(())
    }

    /// Mark every descendant of `root` inactive, one tree level per store
    /// write. Returns the number of rows touched.
    ///
    /// Children are read before each bulk write because the write does not
    /// report which rows it changed.
    async fn cascade_inactive(&self, root: DbId) -> CoreResult<u64> {
        let mut queue = VecDeque::from([root]);
        let mut seen = HashSet::from([root]);
        let mut total = 0;

        while let Some(parent_id) = queue.pop_front() {
            let children = self.store.find_by_parent(parent_id).await?;
            if children.is_empty() {
                continue;
            }

            let touched = self
                .store
                .set_status_by_parent(parent_id, CategoryStatus::Inactive)
                .await?;
            total += touched;
            tracing::debug!(parent_id, touched, "Cascade level applied");

            queue.extend(children.into_iter().map(|c| c.id).filter(|id| seen.insert(*id)));
        }

        Ok(total)
    }
}
