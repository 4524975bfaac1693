//! Integration tests for `/api/v1/categories`.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_category, delete_auth, get, get_auth, post_json_auth, put_json_auth,
    register_token,
};
use serde_json::json;

async fn app_with_token() -> (axum::Router, String) {
    let app = common::build_test_app();
    let token = register_token(&app, "editor@example.com").await;
    (app, token)
}

fn id_of(category: &serde_json::Value) -> i64 {
    category["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Auth guard
// ---------------------------------------------------------------------------

#[tokio::test]
async fn category_routes_require_auth() {
    let app = common::build_test_app();

    let response = get(app.clone(), "/api/v1/categories").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get(app, "/api/v1/categories/1").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_root_defaults_to_active() {
    let (app, token) = app_with_token().await;
    let category = create_category(&app, &token, json!({ "name": "  Electronics " })).await;

    assert_eq!(category["name"], "Electronics");
    assert_eq!(category["status"], "active");
    assert!(category["parent_id"].is_null());
    assert!(category["created_at"].is_string());
}

#[tokio::test]
async fn create_under_inactive_parent_is_forced_inactive() {
    let (app, token) = app_with_token().await;
    let parent =
        create_category(&app, &token, json!({ "name": "Archive", "status": "inactive" })).await;

    let child = create_category(
        &app,
        &token,
        json!({ "name": "Old Stuff", "parent_id": id_of(&parent), "status": "active" }),
    )
    .await;

    assert_eq!(child["status"], "inactive");
    assert_eq!(child["parent_id"], parent["id"]);
}

#[tokio::test]
async fn create_with_missing_parent_returns_404() {
    let (app, token) = app_with_token().await;
    let response = post_json_auth(
        app,
        "/api/v1/categories",
        json!({ "name": "Orphan", "parent_id": 4242 }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[tokio::test]
async fn create_duplicate_sibling_returns_409() {
    let (app, token) = app_with_token().await;
    let root = create_category(&app, &token, json!({ "name": "Electronics" })).await;
    let body = json!({ "name": "Phones", "parent_id": id_of(&root) });
    create_category(&app, &token, body.clone()).await;

    let response = post_json_auth(app, "/api/v1/categories", body, &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn create_with_invalid_name_returns_400() {
    let (app, token) = app_with_token().await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/categories",
        json!({ "name": "x" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response = post_json_auth(
        app,
        "/api/v1/categories",
        json!({ "name": "Valid", "status": "archived" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_tree_is_empty_array() {
    let (app, token) = app_with_token().await;
    let response = get_auth(app, "/api/v1/categories", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"], json!([]));
}

#[tokio::test]
async fn tree_nests_children_sorted_by_name() {
    let (app, token) = app_with_token().await;
    let root = create_category(&app, &token, json!({ "name": "Electronics" })).await;
    let phones = create_category(
        &app,
        &token,
        json!({ "name": "Phones", "parent_id": id_of(&root) }),
    )
    .await;
    create_category(
        &app,
        &token,
        json!({ "name": "Laptops", "parent_id": id_of(&root) }),
    )
    .await;
    create_category(
        &app,
        &token,
        json!({ "name": "Android", "parent_id": id_of(&phones) }),
    )
    .await;

    let response = get_auth(app, "/api/v1/categories", &token).await;
    let tree = body_json(response).await["data"].clone();

    assert_eq!(tree.as_array().unwrap().len(), 1);
    let children = tree[0]["children"].as_array().unwrap();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0]["name"], "Laptops");
    assert_eq!(children[1]["name"], "Phones");
    assert_eq!(children[1]["children"][0]["name"], "Android");
    assert!(tree[0].get("parent_id").is_none());
}

#[tokio::test]
async fn get_missing_category_returns_404() {
    let (app, token) = app_with_token().await;
    let response = get_auth(app, "/api/v1/categories/999", &token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Category with id 999 not found");
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn self_parent_returns_invalid_operation() {
    let (app, token) = app_with_token().await;
    let root = create_category(&app, &token, json!({ "name": "Electronics" })).await;
    let uri = format!("/api/v1/categories/{}", id_of(&root));

    let response = put_json_auth(
        app.clone(),
        &uri,
        json!({ "parent_id": id_of(&root) }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_OPERATION");

    let current = body_json(get_auth(app, &uri, &token).await).await;
    assert!(current["data"]["parent_id"].is_null());
}

#[tokio::test]
async fn reparent_under_descendant_is_rejected() {
    let (app, token) = app_with_token().await;
    let root = create_category(&app, &token, json!({ "name": "Electronics" })).await;
    let child = create_category(
        &app,
        &token,
        json!({ "name": "Phones", "parent_id": id_of(&root) }),
    )
    .await;

    let response = put_json_auth(
        app,
        &format!("/api/v1/categories/{}", id_of(&root)),
        json!({ "parent_id": id_of(&child) }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_OPERATION");
}

#[tokio::test]
async fn null_parent_detaches_and_absent_parent_keeps_it() {
    let (app, token) = app_with_token().await;
    let root = create_category(&app, &token, json!({ "name": "Electronics" })).await;
    let child = create_category(
        &app,
        &token,
        json!({ "name": "Phones", "parent_id": id_of(&root) }),
    )
    .await;
    let uri = format!("/api/v1/categories/{}", id_of(&child));

    let renamed = body_json(
        put_json_auth(app.clone(), &uri, json!({ "name": "Mobiles" }), &token).await,
    )
    .await;
    assert_eq!(renamed["data"]["name"], "Mobiles");
    assert_eq!(renamed["data"]["parent_id"], root["id"]);

    let detached =
        body_json(put_json_auth(app, &uri, json!({ "parent_id": null }), &token).await).await;
    assert!(detached["data"]["parent_id"].is_null());
}

#[tokio::test]
async fn deactivation_cascades_and_delete_reassigns() {
    let (app, token) = app_with_token().await;
    let r = create_category(&app, &token, json!({ "name": "Root" })).await;
    let a = create_category(&app, &token, json!({ "name": "Alpha", "parent_id": id_of(&r) })).await;
    let b = create_category(&app, &token, json!({ "name": "Beta", "parent_id": id_of(&a) })).await;

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/categories/{}", id_of(&r)),
        json!({ "status": "inactive" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "inactive");

    for id in [id_of(&a), id_of(&b)] {
        let response = get_auth(app.clone(), &format!("/api/v1/categories/{id}"), &token).await;
        assert_eq!(body_json(response).await["data"]["status"], "inactive");
    }

    let response = delete_auth(
        app.clone(),
        &format!("/api/v1/categories/{}", id_of(&a)),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["reassigned_count"], 1);
    assert!(json["data"]["message"].is_string());

    let response = get_auth(
        app.clone(),
        &format!("/api/v1/categories/{}", id_of(&b)),
        &token,
    )
    .await;
    let b_now = body_json(response).await["data"].clone();
    assert_eq!(b_now["parent_id"], r["id"]);
    assert_eq!(b_now["status"], "inactive");

    let response = get_auth(app, &format!("/api/v1/categories/{}", id_of(&a)), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_missing_category_returns_404() {
    let (app, token) = app_with_token().await;
    let response = put_json_auth(
        app,
        "/api/v1/categories/777",
        json!({ "name": "Ghost" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_with_unknown_status_returns_validation_error() {
    let (app, token) = app_with_token().await;
    let created = create_category(&app, &token, json!({ "name": "Books" })).await;
    let id = id_of(&created);

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/categories/{id}"),
        json!({ "status": "archived" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response = get_auth(app, &format!("/api/v1/categories/{id}"), &token).await;
    assert_eq!(body_json(response).await["data"]["status"], "active");
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_missing_category_returns_404() {
    let (app, token) = app_with_token().await;
    let response = delete_auth(app, "/api/v1/categories/777", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_root_promotes_children_to_roots() {
    let (app, token) = app_with_token().await;
    let root = create_category(&app, &token, json!({ "name": "Electronics" })).await;
    for name in ["Phones", "Laptops"] {
        create_category(
            &app,
            &token,
            json!({ "name": name, "parent_id": id_of(&root) }),
        )
        .await;
    }

    let response = delete_auth(
        app.clone(),
        &format!("/api/v1/categories/{}", id_of(&root)),
        &token,
    )
    .await;
    assert_eq!(body_json(response).await["data"]["reassigned_count"], 2);

    let tree = body_json(get_auth(app, "/api/v1/categories", &token).await).await;
    let names: Vec<_> = tree["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["Laptops", "Phones"]);
}
