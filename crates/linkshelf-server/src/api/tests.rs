use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use linkshelf_shared::identity::Identity;

use super::*;

fn app() -> Router {
    let db = Database::open_in_memory().unwrap();
    build_router(AppState::new(db, ServerConfig::default()))
}

fn request(method: &str, uri: &str, who: Option<&Identity>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(id) = who {
        builder = builder.header(header::AUTHORIZATION, id.caller_token_now().to_header_value());
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn add_body(id: &str, url: &str, title: &str) -> Value {
    json!({ "id": id, "link": { "url": url, "title": title } })
}

#[tokio::test]
async fn health_is_public() {
    let app = app();
    let (status, body) = send(&app, request("GET", "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn add_list_delete_roundtrip() {
    let app = app();
    let alice = Identity::generate();

    let (status, _) = send(
        &app,
        request("POST", "/links", Some(&alice), Some(add_body("a", "https://example.com", "Example"))),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, request("GET", "/links", Some(&alice), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{ "id": "a", "link": { "url": "https://example.com", "title": "Example" } }])
    );

    let (status, _) = send(&app, request("DELETE", "/links/a", Some(&alice), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, request("GET", "/links", Some(&alice), None)).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn update_and_get_link() {
    let app = app();
    let alice = Identity::generate();
    send(
        &app,
        request("POST", "/links", Some(&alice), Some(add_body("a", "https://example.com", "Example"))),
    )
    .await;

    let edited = json!({ "url": "https://example.org", "title": "Edited", "description": "new" });
    let (status, _) = send(&app, request("PUT", "/links/a", Some(&alice), Some(edited.clone()))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, request("GET", "/links/a", Some(&alice), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, edited);
}

#[tokio::test]
async fn unknown_link_is_not_found() {
    let app = app();
    let alice = Identity::generate();
    let link = json!({ "url": "https://example.com", "title": "Example" });

    let (status, body) = send(&app, request("GET", "/links/nope", Some(&alice), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Link not found");

    let (status, _) = send(&app, request("PUT", "/links/nope", Some(&alice), Some(link))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, request("DELETE", "/links/nope", Some(&alice), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn url_shaped_ids_survive_the_path() {
    let app = app();
    let alice = Identity::generate();
    let id = "https://example.com/a";
    send(&app, request("POST", "/links", Some(&alice), Some(add_body(id, id, "A")))).await;

    let (status, body) = send(
        &app,
        request("GET", "/links/https:%2F%2Fexample.com%2Fa", Some(&alice), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], id);
}

#[tokio::test]
async fn invalid_link_is_rejected() {
    let app = app();
    let alice = Identity::generate();

    let (status, body) = send(
        &app,
        request("POST", "/links", Some(&alice), Some(add_body("a", "http://nodot", "x"))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid URL: hostname must be a valid domain");

    let (status, body) = send(
        &app,
        request("POST", "/links", Some(&alice), Some(add_body("", "https://a.io", "x"))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Link id is required");
}

#[tokio::test]
async fn links_are_private_per_caller() {
    let app = app();
    let alice = Identity::generate();
    let bob = Identity::generate();

    send(
        &app,
        request("POST", "/links", Some(&alice), Some(add_body("a", "https://a.io", "A"))),
    )
    .await;

    let (_, body) = send(&app, request("GET", "/links", Some(&bob), None)).await;
    assert_eq!(body, json!([]));
    let (status, _) = send(&app, request("GET", "/links/a", Some(&bob), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn anonymous_caller_is_guest() {
    let app = app();

    let (status, body) = send(&app, request("GET", "/role", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("guest"));

    let (_, body) = send(&app, request("GET", "/role/admin", None, None)).await;
    assert_eq!(body, json!(false));

    let (status, _) = send(&app, request("GET", "/links", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, request("GET", "/profile", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bad_signature_is_unauthorized() {
    let app = app();
    let alice = Identity::generate();
    let mallory = Identity::generate();

    let mut token = mallory.caller_token_now();
    token.principal = alice.principal();
    let req = Request::builder()
        .uri("/links")
        .header(header::AUTHORIZATION, token.to_header_value())
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized: Invalid signature");

    let stale = alice.caller_token(chrono::Utc::now().timestamp() - 3_600);
    let req = Request::builder()
        .uri("/links")
        .header(header::AUTHORIZATION, stale.to_header_value())
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn first_caller_becomes_admin() {
    let app = app();
    let admin = Identity::generate();
    let user = Identity::generate();

    let (_, body) = send(&app, request("GET", "/role", Some(&admin), None)).await;
    assert_eq!(body, json!("admin"));
    let (_, body) = send(&app, request("GET", "/role", Some(&user), None)).await;
    assert_eq!(body, json!("user"));

    let (_, body) = send(&app, request("GET", "/role/admin", Some(&admin), None)).await;
    assert_eq!(body, json!(true));
    let (_, body) = send(&app, request("GET", "/role/admin", Some(&user), None)).await;
    assert_eq!(body, json!(false));
}

#[tokio::test]
async fn admin_assigns_roles() {
    let app = app();
    let admin = Identity::generate();
    let user = Identity::generate();
    send(&app, request("GET", "/role", Some(&admin), None)).await;
    send(&app, request("GET", "/role", Some(&user), None)).await;

    let uri = format!("/users/{}/role", user.principal());

    // plain users cannot assign
    let (status, _) = send(
        &app,
        request("PUT", &uri, Some(&user), Some(json!({ "role": "admin" }))),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        request("PUT", &uri, Some(&admin), Some(json!({ "role": "guest" }))),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // demoted to guest: link access is gone
    let (_, body) = send(&app, request("GET", "/role", Some(&user), None)).await;
    assert_eq!(body, json!("guest"));
    let (status, _) = send(&app, request("GET", "/links", Some(&user), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn profile_roundtrip() {
    let app = app();
    let alice = Identity::generate();

    let (status, body) = send(&app, request("GET", "/profile", Some(&alice), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);

    let (status, _) = send(
        &app,
        request("PUT", "/profile", Some(&alice), Some(json!({ "name": "  Alice " }))),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, request("GET", "/profile", Some(&alice), None)).await;
    assert_eq!(body, json!({ "name": "Alice" }));

    let (status, body) = send(
        &app,
        request("PUT", "/profile", Some(&alice), Some(json!({ "name": "" }))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Name is required");
}

#[tokio::test]
async fn user_profile_visibility() {
    let app = app();
    let admin = Identity::generate();
    let alice = Identity::generate();
    let bob = Identity::generate();
    send(&app, request("GET", "/role", Some(&admin), None)).await;
    send(
        &app,
        request("PUT", "/profile", Some(&alice), Some(json!({ "name": "Alice" }))),
    )
    .await;

    let uri = format!("/users/{}/profile", alice.principal());

    let (status, body) = send(&app, request("GET", &uri, Some(&alice), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "name": "Alice" }));

    let (status, _) = send(&app, request("GET", &uri, Some(&admin), None)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, request("GET", &uri, Some(&bob), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_cannot_be_handed_to_newcomers() {
    let app = app();
    let admin = Identity::generate();
    let newcomer = Identity::generate();
    send(&app, request("GET", "/role", Some(&admin), None)).await;

    let uri = format!("/users/{}/role", admin.principal());
    let (status, body) = send(
        &app,
        request("PUT", &uri, Some(&admin), Some(json!({ "role": "user" }))),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Cannot remove the last admin");

    let (_, body) = send(&app, request("GET", "/role", Some(&admin), None)).await;
    assert_eq!(body, json!("admin"));
    let (_, body) = send(&app, request("GET", "/role", Some(&newcomer), None)).await;
    assert_eq!(body, json!("user"));
}

#[tokio::test]
async fn malformed_requests_get_json_errors() {
    let app = app();
    let alice = Identity::generate();

    let req = Request::builder()
        .method("POST")
        .uri("/links")
        .header(header::AUTHORIZATION, alice.caller_token_now().to_header_value())
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("JSON"));

    // missing content type
    let req = Request::builder()
        .method("POST")
        .uri("/links")
        .header(header::AUTHORIZATION, alice.caller_token_now().to_header_value())
        .body(Body::from(add_body("a", "https://example.com", "Example").to_string()))
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(body["error"].is_string());

    let (status, body) = send(&app, request("GET", "/users/zz/profile", Some(&alice), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(&app, request("GET", "/nowhere", Some(&alice), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found");
}

#[tokio::test]
async fn dot_and_blank_ids_are_rejected() {
    let app = app();
    let alice = Identity::generate();

    for (id, message) in [
        (".", "Link id cannot be \".\" or \"..\""),
        ("..", "Link id cannot be \".\" or \"..\""),
        ("   ", "Link id is required"),
    ] {
        let (status, body) = send(
            &app,
            request("POST", "/links", Some(&alice), Some(add_body(id, "https://example.com", "X"))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], message);
    }

    let (_, body) = send(&app, request("GET", "/links", Some(&alice), None)).await;
    assert_eq!(body, json!([]));
}
