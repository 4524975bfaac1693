//! Category domain types and input validation.
//!
//! [`Category`] is the persisted record. The remaining types describe what
//! callers ask for ([`NewCategory`], [`CategoryPatch`]), what the engine asks
//! the store to write ([`InsertCategory`], [`CategoryChanges`]), and what it
//! hands back ([`CategoryNode`], [`DeleteOutcome`]).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{DbId, Timestamp};

/// Entity name used in `NotFound` errors.
pub const CATEGORY_ENTITY: &str = "Category";

/// Minimum category name length in characters (after trimming).
pub const NAME_MIN_LEN: usize = 2;

/// Maximum category name length in characters (after trimming).
pub const NAME_MAX_LEN: usize = 100;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Category status.
///
/// The discriminants match the seed rows of the `category_statuses` lookup
/// table.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryStatus {
    #[default]
    Active = 1,
    Inactive = 2,
}

impl CategoryStatus {
    /// Return the database status ID.
    pub fn id(self) -> i16 {
        self as i16
    }

    /// Resolve a database status ID. Returns `None` for unknown IDs.
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(Self::Active),
            2 => Some(Self::Inactive),
            _ => None,
        }
    }

    pub fn is_inactive(self) -> bool {
        self == Self::Inactive
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl FromStr for CategoryStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(CoreError::Validation(
                "Status must be 'active' or 'inactive'".into(),
            )),
        }
    }
}

impl fmt::Display for CategoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A persisted category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    /// `None` for root categories.
    pub parent_id: Option<DbId>,
    pub status: CategoryStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One node of the assembled category forest.
///
/// The parent link is expressed by position in the tree, so it is not repeated
/// here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryNode {
    pub id: DbId,
    pub name: String,
    pub status: CategoryStatus,
    pub children: Vec<CategoryNode>,
}

/// Result of deleting a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    /// Number of direct children moved to the deleted category's parent.
    pub reassigned_count: u64,
}

// ---------------------------------------------------------------------------
// Engine inputs
// ---------------------------------------------------------------------------

/// Request to create a category.
#[derive(Debug, Clone, Default)]
pub struct NewCategory {
    pub name: String,
    pub parent_id: Option<DbId>,
    /// Defaults to [`CategoryStatus::Active`]. Ignored when the parent is inactive.
    pub status: Option<CategoryStatus>,
}

/// What an update does to the parent link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParentChange {
    /// Keep the current parent.
    #[default]
    Unchanged,
    /// Detach the category and make it a root.
    Root,
    /// Move the category under the given parent.
    Set(DbId),
}

impl From<Option<Option<DbId>>> for ParentChange {
    /// Outer `None` means "field absent", inner `None` means explicit `null`.
    fn from(value: Option<Option<DbId>>) -> Self {
        match value {
            None => Self::Unchanged,
            Some(None) => Self::Root,
            Some(Some(id)) => Self::Set(id),
        }
    }
}

/// Partial update of a category.
#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub parent: ParentChange,
    pub status: Option<CategoryStatus>,
}

// ---------------------------------------------------------------------------
// Store inputs
// ---------------------------------------------------------------------------

/// A fully resolved row to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertCategory {
    pub name: String,
    pub parent_id: Option<DbId>,
    pub status: CategoryStatus,
}

/// Field changes applied by a single store update.
///
/// `parent_id` uses `Option<Option<DbId>>` so the parent can be cleared:
/// `Some(None)` writes `NULL`, `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub parent_id: Option<Option<DbId>>,
    pub status: Option<CategoryStatus>,
}

impl CategoryChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.parent_id.is_none() && self.status.is_none()
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a category name and return it trimmed.
///
/// Length is counted in characters, not bytes.
pub fn validate_category_name(name: &str) -> CoreResult<String> {
    let trimmed = name.trim();
    let len = trimmed.chars().count();
    if len < NAME_MIN_LEN || len > NAME_MAX_LEN {
        return Err(CoreError::Validation(format!(
            "Name must be between {NAME_MIN_LEN} and {NAME_MAX_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}
