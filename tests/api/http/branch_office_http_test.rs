//! Branch office API HTTP tests

use super::{
    build_test_router, delete_json, get_json, patch_json, post_json, post_raw, put_json,
    send_plain_text, TestAppState,
};
use crate::api::{create_test_office, create_trashed_office};
use axum::http::{Method, StatusCode};
use chrono::Utc;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn create_payload(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "address": "Jl. Merdeka 1",
        "phone_number": "021-555",
        "city": "Jakarta",
        "fax_number": "021-556"
    })
}

async fn seeded(names: &[(&str, &str)]) -> (TestAppState, axum::Router) {
    let state = TestAppState::new();
    for (id, name) in names {
        state
            .branch_office_repo
            .add_office(create_test_office(id, name))
            .await;
    }
    let app = build_test_router(state.clone());
    (state, app)
}

fn names(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["name"].as_str().unwrap().to_string())
        .collect()
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_create_branch_office() {
    let (state, app) = seeded(&[]).await;

    let (status, body): (StatusCode, Option<Value>) =
        post_json(&app, "/branch-office", &create_payload("b1", "North")).await;

    assert_eq!(status, StatusCode::CREATED);
    let body = body.unwrap();
    assert_eq!(body["message"], "Created");
    assert_eq!(body["data"]["id"], "b1");
    assert_eq!(body["data"]["name"], "North");
    assert_eq!(body["data"]["phone_number"], "021-555");
    assert_eq!(body["data"]["fax_number"], "021-556");
    assert!(body["data"]["created_at"].is_i64());
    assert!(body["data"].get("deleted_at").is_none());

    let stored = state.branch_office_repo.get_raw("b1").await.unwrap();
    assert_eq!(stored.city, "Jakarta");
    assert!(stored.deleted_at.is_none());
}

#[tokio::test]
async fn test_create_then_read_back() {
    let (_, app) = seeded(&[]).await;

    let (_, created): (StatusCode, Option<Value>) =
        post_json(&app, "/branch-office", &create_payload("b1", "North")).await;
    let (status, fetched): (StatusCode, Option<Value>) =
        get_json(&app, "/branch-office/b1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched.unwrap()["data"], created.unwrap()["data"]);
}

#[tokio::test]
async fn test_create_duplicate_name_is_rejected() {
    let (_, app) = seeded(&[("b0", "North")]).await;

    let (status, body): (StatusCode, Option<Value>) =
        post_json(&app, "/branch-office", &create_payload("b1", "North")).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let body = body.unwrap();
    assert_eq!(body["error"], "validation");
    assert_eq!(body["details"]["name"], "exists");
}

#[tokio::test]
async fn test_create_reuses_name_of_trashed_office() {
    let state = TestAppState::new();
    state
        .branch_office_repo
        .add_office(create_trashed_office("b0", "North", Utc::now()))
        .await;
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) =
        post_json(&app, "/branch-office", &create_payload("b1", "North")).await;

    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_create_empty_field_is_required() {
    let (_, app) = seeded(&[]).await;
    let mut payload = create_payload("b1", "North");
    payload["city"] = json!("");

    let (status, body): (StatusCode, Option<Value>) =
        post_json(&app, "/branch-office", &payload).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body.unwrap()["details"]["city"], "required");
}

#[tokio::test]
async fn test_create_missing_field_is_validation_error() {
    let (_, app) = seeded(&[]).await;

    let (status, body): (StatusCode, Option<Value>) =
        post_json(&app, "/branch-office", &json!({"id": "b1", "name": "North"})).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body.unwrap()["error"], "validation");
}

#[tokio::test]
async fn test_create_malformed_json_is_validation_error() {
    let (_, app) = seeded(&[]).await;

    let (status, body): (StatusCode, Option<Value>) =
        post_raw(&app, "/branch-office", "{\"id\": \"b1\",").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body.unwrap()["error"], "validation");
}

#[tokio::test]
async fn test_create_without_json_content_type_is_bad_request() {
    let (state, app) = seeded(&[]).await;

    let (status, body): (StatusCode, Option<Value>) = send_plain_text(
        &app,
        Method::POST,
        "/branch-office",
        r#"{"id":"b1","name":"North","address":"a","phone_number":"1","city":"c","fax_number":"2"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.unwrap()["error"], "bad_request");
    assert!(state.branch_office_repo.get_raw("b1").await.is_none());
}

// ============================================================================
// Show
// ============================================================================

#[tokio::test]
async fn test_show_unknown_is_not_found() {
    let (_, app) = seeded(&[]).await;

    let (status, body): (StatusCode, Option<Value>) = get_json(&app, "/branch-office/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.unwrap()["error"], "not_found");
}

#[tokio::test]
async fn test_show_hides_trashed_office() {
    let state = TestAppState::new();
    state
        .branch_office_repo
        .add_office(create_trashed_office("b1", "North", Utc::now()))
        .await;
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) = get_json(&app, "/branch-office/b1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Update
// ============================================================================

#[tokio::test]
async fn test_update_without_json_content_type_is_bad_request() {
    let (state, app) = seeded(&[("b1", "North")]).await;

    let (status, body): (StatusCode, Option<Value>) = send_plain_text(
        &app,
        Method::PUT,
        "/branch-office/b1",
        r#"{"city":"Bandung"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.unwrap()["error"], "bad_request");
    assert_eq!(state.branch_office_repo.get_raw("b1").await.unwrap().city, "Jakarta");
}

#[tokio::test]
async fn test_update_changes_only_supplied_fields() {
    let (state, app) = seeded(&[("b1", "North")]).await;
    let before = state.branch_office_repo.get_raw("b1").await.unwrap();

    let (status, body): (StatusCode, Option<Value>) =
        put_json(&app, "/branch-office/b1", &json!({"city": "Bandung", "name": ""})).await;

    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["message"], "OK");
    assert_eq!(body["data"]["city"], "Bandung");
    assert_eq!(body["data"]["name"], "North");
    assert_eq!(body["data"]["address"], before.address.as_str());
    assert_eq!(body["data"]["created_at"], before.created_at.timestamp());
}

#[tokio::test]
async fn test_update_is_idempotent() {
    let (_, app) = seeded(&[("b1", "North")]).await;
    let payload = json!({"address": "Jl. Asia Afrika 8"});

    let (_, first): (StatusCode, Option<Value>) =
        put_json(&app, "/branch-office/b1", &payload).await;
    let (status, second): (StatusCode, Option<Value>) =
        put_json(&app, "/branch-office/b1", &payload).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(first.unwrap()["data"], second.unwrap()["data"]);
}

#[tokio::test]
async fn test_update_unknown_is_not_found_before_body_validation() {
    let (_, app) = seeded(&[]).await;
    let long_name = "x".repeat(200);

    let (status, _): (StatusCode, Option<Value>) =
        put_json(&app, "/branch-office/nope", &json!({"name": long_name})).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_trashed_is_not_found() {
    let state = TestAppState::new();
    state
        .branch_office_repo
        .add_office(create_trashed_office("b1", "North", Utc::now()))
        .await;
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) =
        put_json(&app, "/branch-office/b1", &json!({"city": "Bandung"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_rejects_too_long_field() {
    let (_, app) = seeded(&[("b1", "North")]).await;

    let (status, body): (StatusCode, Option<Value>) = put_json(
        &app,
        "/branch-office/b1",
        &json!({"name": "x".repeat(101)}),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body.unwrap()["details"]["name"], "length");
}

#[tokio::test]
async fn test_update_does_not_recheck_name_uniqueness() {
    let (state, app) = seeded(&[("b1", "North"), ("b2", "South")]).await;

    let (status, _): (StatusCode, Option<Value>) =
        put_json(&app, "/branch-office/b2", &json!({"name": "North"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        state.branch_office_repo.get_raw("b2").await.unwrap().name,
        "North"
    );
}

// ============================================================================
// Soft delete, restore, hard delete
// ============================================================================

#[tokio::test]
async fn test_soft_delete_then_restore() {
    let (_, app) = seeded(&[]).await;

    let (status, _): (StatusCode, Option<Value>) =
        post_json(&app, "/branch-office", &create_payload("b1", "North")).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _): (StatusCode, Option<Value>) = get_json(&app, "/branch-office/b1").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body): (StatusCode, Option<Value>) =
        delete_json(&app, "/branch-office/b1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap(), json!({"message": "OK"}));

    let (status, _): (StatusCode, Option<Value>) = get_json(&app, "/branch-office/b1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body): (StatusCode, Option<Value>) = patch_json(&app, "/branch-office/b1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["message"], "OK");

    let (status, body): (StatusCode, Option<Value>) = get_json(&app, "/branch-office/b1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["data"]["name"], "North");
}

#[tokio::test]
async fn test_soft_delete_moves_office_between_lists() {
    let (_, app) = seeded(&[("b1", "North"), ("b2", "South")]).await;

    let (status, _): (StatusCode, Option<Value>) =
        delete_json(&app, "/branch-office/b1").await;
    assert_eq!(status, StatusCode::OK);

    let (_, live): (StatusCode, Option<Value>) = get_json(&app, "/branch-offices").await;
    assert_eq!(names(&live.unwrap()), vec!["South"]);

    let (_, trashed): (StatusCode, Option<Value>) =
        get_json(&app, "/branch-offices?status=deleted").await;
    assert_eq!(names(&trashed.unwrap()), vec!["North"]);
}

#[tokio::test]
async fn test_soft_delete_twice_is_not_found() {
    let (_, app) = seeded(&[("b1", "North")]).await;

    let (first, _): (StatusCode, Option<Value>) = delete_json(&app, "/branch-office/b1").await;
    let (second, _): (StatusCode, Option<Value>) = delete_json(&app, "/branch-office/b1").await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_restore_unknown_is_not_found() {
    let (_, app) = seeded(&[]).await;

    let (status, body): (StatusCode, Option<Value>) = patch_json(&app, "/branch-office/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.unwrap()["error"], "not_found");
}

#[tokio::test]
async fn test_hard_delete_trashed_office_is_terminal() {
    let state = TestAppState::new();
    state
        .branch_office_repo
        .add_office(create_trashed_office("b1", "North", Utc::now()))
        .await;
    let app = build_test_router(state.clone());

    let (status, body): (StatusCode, Option<Value>) =
        delete_json(&app, "/branch-office/hard-delete/b1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["message"], "OK");
    assert!(state.branch_office_repo.get_raw("b1").await.is_none());

    let (status, _): (StatusCode, Option<Value>) = get_json(&app, "/branch-office/b1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _): (StatusCode, Option<Value>) = patch_json(&app, "/branch-office/b1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _): (StatusCode, Option<Value>) =
        delete_json(&app, "/branch-office/hard-delete/b1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_hard_delete_live_office() {
    let (state, app) = seeded(&[("b1", "North")]).await;

    let (status, _): (StatusCode, Option<Value>) =
        delete_json(&app, "/branch-office/hard-delete/b1").await;

    assert_eq!(status, StatusCode::OK);
    assert!(state.branch_office_repo.get_raw("b1").await.is_none());
}

// ============================================================================
// List
// ============================================================================

#[tokio::test]
async fn test_list_defaults() {
    let ids: Vec<(String, String)> = (1..=12)
        .map(|i| (format!("b{:02}", i), format!("Office {:02}", i)))
        .collect();
    let refs: Vec<(&str, &str)> = ids.iter().map(|(a, b)| (a.as_str(), b.as_str())).collect();
    let (_, app) = seeded(&refs).await;

    let (status, body): (StatusCode, Option<Value>) = get_json(&app, "/branch-offices").await;

    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["message"], "OK");
    assert_eq!(body["data"].as_array().unwrap().len(), 10);
    assert_eq!(
        body["meta"]["pagination"],
        json!({"limit": 10, "page": 1, "total_rows": 12, "total_pages": 2})
    );
}

#[tokio::test]
async fn test_list_ordered_by_name() {
    let (_, app) = seeded(&[("b1", "Charlie"), ("b2", "Alpha"), ("b3", "Bravo")]).await;

    let (_, body): (StatusCode, Option<Value>) = get_json(&app, "/branch-offices").await;

    assert_eq!(names(&body.unwrap()), vec!["Alpha", "Bravo", "Charlie"]);
}

#[tokio::test]
async fn test_list_pagination() {
    let (_, app) = seeded(&[("b1", "Alpha"), ("b2", "Bravo"), ("b3", "Charlie")]).await;

    let (_, body): (StatusCode, Option<Value>) =
        get_json(&app, "/branch-offices?limit=2&page=2").await;
    let body = body.unwrap();

    assert_eq!(names(&body), vec!["Charlie"]);
    assert_eq!(
        body["meta"]["pagination"],
        json!({"limit": 2, "page": 2, "total_rows": 3, "total_pages": 2})
    );
}

#[tokio::test]
async fn test_list_page_beyond_last_is_empty() {
    let (_, app) = seeded(&[("b1", "Alpha"), ("b2", "Bravo"), ("b3", "Charlie")]).await;

    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, "/branch-offices?limit=2&page=5").await;
    let body = body.unwrap();

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
    assert_eq!(body["meta"]["pagination"]["total_rows"], 3);
    assert_eq!(body["meta"]["pagination"]["total_pages"], 2);
    assert_eq!(body["meta"]["pagination"]["page"], 5);
}

#[tokio::test]
async fn test_list_max_page_is_empty_not_error() {
    let (_, app) = seeded(&[("b1", "Alpha"), ("b2", "Bravo")]).await;

    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, "/branch-offices?page=9223372036854775807&limit=10").await;
    let body = body.unwrap();

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
    assert_eq!(body["meta"]["pagination"]["page"], i64::MAX);
    assert_eq!(body["meta"]["pagination"]["limit"], 10);
    assert_eq!(body["meta"]["pagination"]["total_rows"], 2);
    assert_eq!(body["meta"]["pagination"]["total_pages"], 1);
}

#[tokio::test]
async fn test_list_max_limit_returns_everything_on_one_page() {
    let (_, app) = seeded(&[("b1", "Alpha"), ("b2", "Bravo")]).await;

    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, "/branch-offices?limit=9223372036854775807").await;
    let body = body.unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["Alpha", "Bravo"]);
    assert_eq!(body["meta"]["pagination"]["total_rows"], 2);
    assert_eq!(body["meta"]["pagination"]["total_pages"], 1);
}

#[tokio::test]
async fn test_list_max_limit_second_page_is_empty() {
    let (_, app) = seeded(&[("b1", "Alpha")]).await;

    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, "/branch-offices?limit=9223372036854775807&page=2").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.unwrap()["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_keyword_defaults_to_name() {
    let (_, app) = seeded(&[("b1", "North Jakarta"), ("b2", "South Bandung")]).await;

    let (_, body): (StatusCode, Option<Value>) =
        get_json(&app, "/branch-offices?keyword=north").await;
    let body = body.unwrap();

    assert_eq!(names(&body), vec!["North Jakarta"]);
    assert_eq!(body["meta"]["pagination"]["total_rows"], 1);
}

#[tokio::test]
async fn test_list_keyword_on_address() {
    let state = TestAppState::new();
    let mut office = create_test_office("b1", "North");
    office.address = "Jl. Asia Afrika 8".to_string();
    state.branch_office_repo.add_office(office).await;
    state
        .branch_office_repo
        .add_office(create_test_office("b2", "South"))
        .await;
    let app = build_test_router(state);

    let (_, by_name): (StatusCode, Option<Value>) =
        get_json(&app, "/branch-offices?keyword=afrika").await;
    assert!(by_name.unwrap()["data"].as_array().unwrap().is_empty());

    let (_, by_address): (StatusCode, Option<Value>) =
        get_json(&app, "/branch-offices?keyword=afrika&fields=address").await;
    assert_eq!(names(&by_address.unwrap()), vec!["North"]);

    let (_, comma_separated): (StatusCode, Option<Value>) =
        get_json(&app, "/branch-offices?keyword=afrika&fields=name,address").await;
    assert_eq!(names(&comma_separated.unwrap()), vec!["North"]);
}

#[tokio::test]
async fn test_list_disallowed_fields_apply_no_keyword() {
    let (_, app) = seeded(&[("b1", "North"), ("b2", "South")]).await;

    let (_, body): (StatusCode, Option<Value>) =
        get_json(&app, "/branch-offices?keyword=north&fields=city").await;

    assert_eq!(names(&body.unwrap()), vec!["North", "South"]);
}

#[tokio::test]
async fn test_list_keyword_of_only_symbols_applies_no_filter() {
    let (_, app) = seeded(&[("b1", "North"), ("b2", "South")]).await;

    let (_, body): (StatusCode, Option<Value>) =
        get_json(&app, "/branch-offices?keyword=%3C%3E%3B").await;

    assert_eq!(names(&body.unwrap()), vec!["North", "South"]);
}

#[tokio::test]
async fn test_list_rejects_invalid_status() {
    let (_, app) = seeded(&[]).await;

    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, "/branch-offices?status=archived").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body.unwrap()["details"]["status"], "oneof");
}

#[tokio::test]
async fn test_list_rejects_invalid_pagination() {
    let (_, app) = seeded(&[]).await;

    for path in [
        "/branch-offices?limit=0",
        "/branch-offices?page=-1",
        "/branch-offices?page=abc",
    ] {
        let (status, body): (StatusCode, Option<Value>) = get_json(&app, path).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "path {}", path);
        assert_eq!(body.unwrap()["error"], "validation");
    }
}

// ============================================================================
// Simple list
// ============================================================================

#[tokio::test]
async fn test_list_simple_returns_id_and_name_without_pagination() {
    let ids: Vec<(String, String)> = (1..=12)
        .map(|i| (format!("b{:02}", i), format!("Office {:02}", i)))
        .collect();
    let refs: Vec<(&str, &str)> = ids.iter().map(|(a, b)| (a.as_str(), b.as_str())).collect();
    let (_, app) = seeded(&refs).await;

    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, "/branch-offices/simple").await;

    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["message"], "OK");
    assert!(body.get("meta").is_none());
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 12);
    assert_eq!(data[0], json!({"id": "b01", "name": "Office 01"}));
}

#[tokio::test]
async fn test_list_simple_keyword_filters_by_name() {
    let state = TestAppState::new();
    state
        .branch_office_repo
        .add_office(create_test_office("b1", "North"))
        .await;
    state
        .branch_office_repo
        .add_office(create_test_office("b2", "South"))
        .await;
    state
        .branch_office_repo
        .add_office(create_trashed_office("b3", "Northwest", Utc::now()))
        .await;
    let app = build_test_router(state);

    let (_, body): (StatusCode, Option<Value>) =
        get_json(&app, "/branch-offices/simple?keyword=NOR").await;

    assert_eq!(names(&body.unwrap()), vec!["North"]);
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_database_failure_is_internal_error() {
    let (state, app) = seeded(&[("b1", "North")]).await;
    state.branch_office_repo.fail_all();

    let (status, body): (StatusCode, Option<Value>) = get_json(&app, "/branch-offices").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body = body.unwrap();
    assert_eq!(body["error"], "database_error");
    assert_eq!(body["message"], "A database error occurred");
}

#[tokio::test]
async fn test_create_uniqueness_lookup_failure_is_internal_error() {
    let (state, app) = seeded(&[]).await;
    state.branch_office_repo.fail_all();

    let (status, _): (StatusCode, Option<Value>) =
        post_json(&app, "/branch-office", &create_payload("b1", "North")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
