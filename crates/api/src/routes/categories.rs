//! Route definitions for the `/categories` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::categories;
use crate::state::AppState;

/// Routes mounted at `/categories`. All require auth.
///
/// ```text
/// GET    /      -> get_category_tree
/// POST   /      -> create_category
/// GET    /{id}  -> get_category
/// PUT    /{id}  -> update_category
/// DELETE /{id}  -> delete_category
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(categories::get_category_tree).post(categories::create_category),
        )
        .route(
            "/{id}",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
}
