//! Handlers for the `/categories` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Deserializer, Serialize};
use taxonomy_core::category::{CategoryPatch, CategoryStatus, NewCategory};
use taxonomy_core::types::DbId;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /categories`.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<DbId>,
    /// `"active"` or `"inactive"`; anything else is a validation error.
    #[serde(default)]
    pub status: Option<String>,
}

/// Request body for `PUT /categories/{id}`.
///
/// `parent_id` is tri-state: absent keeps the parent, `null` makes the
/// category a root, and an id moves it.
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub parent_id: Option<Option<DbId>>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Wraps whatever value is present (including `null`) in `Some`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn parse_status(status: Option<&str>) -> AppResult<Option<CategoryStatus>> {
    Ok(status.map(str::parse).transpose()?)
}

/// Response body for `DELETE /categories/{id}`.
#[derive(Debug, Serialize)]
pub struct DeleteCategoryResponse {
    pub reassigned_count: u64,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/categories
pub async fn create_category(
    user: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateCategoryRequest>,
) -> AppResult<impl IntoResponse> {
    let category = state
        .categories
        .create(NewCategory {
            name: input.name,
            parent_id: input.parent_id,
            status: parse_status(input.status.as_deref())?,
        })
        .await?;

    tracing::debug!(category_id = category.id, user_id = user.user_id, "Create request served");

    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// GET /api/v1/categories
///
/// The whole taxonomy as a forest, siblings sorted by name.
pub async fn get_category_tree(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let tree = state.categories.tree().await?;
    Ok(Json(DataResponse { data: tree }))
}

/// GET /api/v1/categories/{id}
pub async fn get_category(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let category = state.categories.get_by_id(id).await?;
    Ok(Json(DataResponse { data: category }))
}

/// PUT /api/v1/categories/{id}
///
/// Partially update name, parent and status.
pub async fn update_category(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateCategoryRequest>,
) -> AppResult<impl IntoResponse> {
    let status = parse_status(input.status.as_deref())?;
    let category = state
        .categories
        .update(
            id,
            CategoryPatch {
                name: input.name,
                parent: input.parent_id.into(),
                status,
            },
        )
        .await?;

    tracing::debug!(category_id = id, user_id = user.user_id, "Update request served");

    Ok(Json(DataResponse { data: category }))
}

/// DELETE /api/v1/categories/{id}
///
/// Delete a category. Its direct children move up to its parent.
pub async fn delete_category(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let outcome = state.categories.delete(id).await?;

    tracing::debug!(category_id = id, user_id = user.user_id, "Delete request served");

    Ok(Json(DataResponse {
        data: DeleteCategoryResponse {
            reassigned_count: outcome.reassigned_count,
            message: format!(
                "Category deleted, {} child categories reassigned",
                outcome.reassigned_count
            ),
        },
    }))
}
