//! The HTTP gateway against a mock server and against the real router.

use std::sync::Arc;

use axum::Router;
use httpmock::prelude::*;
use modkit::TracedClient;
use sea_orm::Database;
use serde_json::json;
use url::Url;

use users_info::config::UsersInfoConfig;
use users_info::contract::{
    client::UsersInfoApi,
    error::UsersInfoError,
    model::{NewUser, UserPatch},
};
use users_info::gateways::http::UsersInfoHttpClient;
use users_info::store::UserStore;
use users_info::UsersInfo;

fn gateway(base: &str) -> UsersInfoHttpClient {
    UsersInfoHttpClient::new(TracedClient::default(), Url::parse(base).unwrap())
}

fn user_json(id: &str, email: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "email": email,
        "name": name,
        "createdAt": "2024-05-01T08:30:00Z",
        "updatedAt": "2024-05-01T08:30:00Z"
    })
}

#[tokio::test]
async fn list_sends_traceparent_and_decodes_users() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/users").header_exists("traceparent");
            then.status(200)
                .json_body(json!([user_json("1", "a@x.com", "Ann")]));
        })
        .await;

    let users = gateway(&server.base_url()).list_users().await.unwrap();

    mock.assert_async().await;
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].email, "a@x.com");
}

#[tokio::test]
async fn not_found_problem_maps_to_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(DELETE).path("/users/zzz");
            then.status(404)
                .header("content-type", "application/problem+json")
                .json_body(json!({
                    "type": "https://errors.example.com/USERS_NOT_FOUND",
                    "title": "User not found",
                    "status": 404,
                    "detail": "User with ID zzz not found",
                    "code": "USERS_NOT_FOUND"
                }));
        })
        .await;

    let err = gateway(&server.base_url())
        .delete_user("zzz")
        .await
        .unwrap_err();

    assert_eq!(err, UsersInfoError::not_found("zzz"));
}

#[tokio::test]
async fn conflict_maps_to_conflict_with_requested_email() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/users")
                .json_body(json!({ "email": "dup@x.com", "name": "Ann" }));
            then.status(409).json_body(json!({
                "title": "Email already exists",
                "status": 409
            }));
        })
        .await;

    let err = gateway(&server.base_url())
        .create_user(NewUser {
            email: "dup@x.com".into(),
            name: "Ann".into(),
        })
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert_eq!(err, UsersInfoError::conflict("dup@x.com"));
}

#[tokio::test]
async fn patch_sends_only_supplied_fields() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(PATCH)
                .path("/users/1")
                .json_body(json!({ "name": "X" }));
            then.status(200).json_body(user_json("1", "a@x.com", "X"));
        })
        .await;

    let user = gateway(&server.base_url())
        .update_user(
            "1",
            UserPatch {
                email: None,
                name: Some("X".into()),
            },
        )
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(user.name, "X");
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let cfg = UsersInfoConfig {
        api_base_url: "http://127.0.0.1:9".into(),
        request_timeout_ms: 500,
    };
    let client = UsersInfoHttpClient::from_config(&cfg).unwrap();

    let err = client.list_users().await.unwrap_err();
    assert!(matches!(err, UsersInfoError::Transport { .. }));
}

/// Serve the real module router on an ephemeral port.
async fn spawn_server() -> String {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    UsersInfo::migrate(&db).await.unwrap();
    let app: Router = UsersInfo::new(db).register_rest(Router::new());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn store_over_http_mirrors_server_state() {
    let base = spawn_server().await;
    let api: Arc<dyn UsersInfoApi> = Arc::new(gateway(&base));
    let store = UserStore::new(api.clone());

    store.fetch_users().await.unwrap();
    assert!(store.users().is_empty());

    store
        .create_user(NewUser {
            email: "a@x.com".into(),
            name: "Ann".into(),
        })
        .await
        .unwrap();
    let id = store.users()[0].id.clone();

    store
        .update_user(
            &id,
            UserPatch {
                email: None,
                name: Some("Annie".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(store.users()[0].name, "Annie");

    // Server-side validation comes back as a contract error
    let err = store
        .create_user(NewUser {
            email: "bad".into(),
            name: "B".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, UsersInfoError::Validation { .. }));
    assert_eq!(store.users().len(), 1);

    store.delete_user(&id).await.unwrap();
    assert!(store.users().is_empty());

    let err = store.delete_user(&id).await.unwrap_err();
    assert_eq!(err, UsersInfoError::not_found(id));
    assert!(!store.is_loading());

    assert!(api.list_users().await.unwrap().is_empty());
}
