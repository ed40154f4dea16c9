//! The HTTP surface, driven in-process through the full middleware chain.

use std::sync::Arc;

use bytes::Bytes;
use http::header::{ALLOW, AUTHORIZATION, CONTENT_TYPE};
use serde_json::{Value, json};

use scribe::middleware::{Authenticator, StaticToken};
use scribe::{MemoryStore, Request, Router, Status, app};

struct Reply {
    status: Status,
    content_type: Option<String>,
    allow: Option<String>,
    body: Vec<u8>,
}

impl Reply {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is JSON")
    }
}

fn service() -> Arc<Router> {
    Arc::new(app::build(Arc::new(MemoryStore::new()), None))
}

fn guarded(token: &str) -> Arc<Router> {
    let auth: Arc<dyn Authenticator> = Arc::new(StaticToken::new(token));
    Arc::new(app::build(Arc::new(MemoryStore::new()), Some(auth)))
}

async fn send(router: &Arc<Router>, method: &str, path: &str, body: &str) -> Reply {
    send_with(router, method, path, body, None).await
}

async fn send_with(
    router: &Arc<Router>,
    method: &str,
    path: &str,
    body: &str,
    bearer: Option<&str>,
) -> Reply {
    let mut builder = http::Request::builder().method(method).uri(path);
    if let Some(token) = bearer {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let req: Request = builder.body(Bytes::copy_from_slice(body.as_bytes())).unwrap().into();

    let res = router.handle(req).await;
    Reply {
        status: res.status(),
        content_type: res.headers().get(CONTENT_TYPE).map(|v| v.to_str().unwrap().to_owned()),
        allow: res.headers().get(ALLOW).map(|v| v.to_str().unwrap().to_owned()),
        body: res.body().to_vec(),
    }
}

fn assert_error(reply: &Reply, status: Status, message: &str) {
    assert_eq!(reply.status, status);
    assert_eq!(reply.json(), json!({ "error": status.reason(), "message": message }));
}

#[tokio::test]
async fn health_reports_healthy() {
    let app = service();
    let reply = send(&app, "GET", "/health", "").await;
    assert_eq!(reply.status, Status::Ok);
    assert_eq!(reply.json(), json!({ "status": "healthy" }));
}

#[tokio::test]
async fn health_rejects_other_methods() {
    let app = service();
    let reply = send(&app, "POST", "/health", "").await;
    assert_error(&reply, Status::MethodNotAllowed, "Method not allowed");
}

#[tokio::test]
async fn create_returns_201_with_assigned_fields() {
    let app = service();
    let reply = send(&app, "POST", "/posts", r#"{"content":"hello"}"#).await;

    assert_eq!(reply.status, Status::Created);
    assert_eq!(reply.content_type.as_deref(), Some("application/json"));
    let post = reply.json();
    assert_eq!(post["content"], "hello");
    assert!(post["id"].as_u64().unwrap() >= 1);
    assert_eq!(post["created_at"], post["updated_at"]);
    assert!(chrono::DateTime::parse_from_rfc3339(post["created_at"].as_str().unwrap()).is_ok());
}

#[tokio::test]
async fn create_ignores_client_supplied_id_and_timestamps() {
    let app = service();
    let body = r#"{"id":500,"content":"x","created_at":"2000-01-01T00:00:00Z"}"#;
    let post = send(&app, "POST", "/posts", body).await.json();
    assert_eq!(post["id"], 1);
    assert_ne!(post["created_at"], "2000-01-01T00:00:00Z");
}

#[tokio::test]
async fn create_rejects_empty_content() {
    let app = service();
    for body in [r#"{"content":""}"#, "{}"] {
        let reply = send(&app, "POST", "/posts", body).await;
        assert_error(&reply, Status::BadRequest, "Body cannot be empty");
    }
}

#[tokio::test]
async fn create_rejects_malformed_json() {
    let app = service();
    for body in ["", "{", "not json", r#"{"content":42}"#] {
        let reply = send(&app, "POST", "/posts", body).await;
        assert_error(&reply, Status::BadRequest, "Invalid JSON");
    }
}

#[tokio::test]
async fn get_after_create_round_trips() {
    let app = service();
    let created = send(&app, "POST", "/posts", r#"{"content":"hello"}"#).await.json();
    let id = created["id"].as_u64().unwrap();

    let reply = send(&app, "GET", &format!("/posts/{id}"), "").await;
    assert_eq!(reply.status, Status::Ok);
    assert_eq!(reply.json(), created);
}

#[tokio::test]
async fn get_invalid_id_is_400() {
    let app = service();
    for path in ["/posts/abc", "/posts/-1", "/posts/1/2", "/posts/"] {
        let reply = send(&app, "GET", path, "").await;
        assert_error(&reply, Status::BadRequest, "Invalid post ID");
    }
}

#[tokio::test]
async fn get_unknown_id_is_404() {
    let app = service();
    let reply = send(&app, "GET", "/posts/999", "").await;
    assert_error(&reply, Status::NotFound, "Post not found");
}

#[tokio::test]
async fn delete_returns_204_then_404() {
    let app = service();
    let id = send(&app, "POST", "/posts", r#"{"content":"bye"}"#).await.json()["id"].as_u64().unwrap();
    let path = format!("/posts/{id}");

    let reply = send(&app, "DELETE", &path, "").await;
    assert_eq!(reply.status, Status::NoContent);
    assert!(reply.body.is_empty());

    assert_error(&send(&app, "GET", &path, "").await, Status::NotFound, "Post not found");
    assert_error(&send(&app, "DELETE", &path, "").await, Status::NotFound, "Post not found");
}

#[tokio::test]
async fn delete_invalid_id_is_400() {
    let app = service();
    for path in ["/posts/abc", "/posts/"] {
        let reply = send(&app, "DELETE", path, "").await;
        assert_error(&reply, Status::BadRequest, "Invalid post ID");
    }
}

#[tokio::test]
async fn invalid_id_wins_over_unsupported_method() {
    let app = service();
    for method in ["POST", "PUT", "PATCH"] {
        let reply = send(&app, method, "/posts/abc", "").await;
        assert_error(&reply, Status::BadRequest, "Invalid post ID");
    }
    let reply = send(&app, "PUT", "/posts/", "").await;
    assert_error(&reply, Status::BadRequest, "Invalid post ID");
}

#[tokio::test]
async fn list_reflects_creates_and_deletes() {
    let app = service();
    assert_eq!(send(&app, "GET", "/posts", "").await.json(), json!([]));

    for content in ["a", "b", "c"] {
        send(&app, "POST", "/posts", &json!({ "content": content }).to_string()).await;
    }
    send(&app, "DELETE", "/posts/2", "").await;

    let reply = send(&app, "GET", "/posts", "").await;
    assert_eq!(reply.status, Status::Ok);
    let mut ids: Vec<u64> = reply.json().as_array().unwrap().iter()
        .map(|p| p["id"].as_u64().unwrap())
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, [1, 3]);
}

#[tokio::test]
async fn unsupported_methods_are_405() {
    let app = service();
    let reply = send(&app, "PUT", "/posts", "").await;
    assert_error(&reply, Status::MethodNotAllowed, "Method not allowed");
    assert_eq!(reply.allow.as_deref(), Some("GET, POST"));

    let reply = send(&app, "PATCH", "/posts/1", "").await;
    assert_error(&reply, Status::MethodNotAllowed, "Method not allowed");
    assert_eq!(reply.allow.as_deref(), Some("DELETE, GET"));
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = service();
    assert_error(&send(&app, "GET", "/users", "").await, Status::NotFound, "Route not found");
}

#[tokio::test]
async fn separate_services_have_separate_stores() {
    let (a, b) = (service(), service());
    send(&a, "POST", "/posts", r#"{"content":"only in a"}"#).await;
    assert_eq!(send(&b, "GET", "/posts", "").await.json(), json!([]));
}

#[tokio::test]
async fn concurrent_creates_get_distinct_ids() {
    let app = service();
    let tasks: Vec<_> = (0..64)
        .map(|i| {
            let app = Arc::clone(&app);
            tokio::spawn(async move {
                let body = json!({ "content": format!("post {i}") }).to_string();
                send(&app, "POST", "/posts", &body).await.json()["id"].as_u64().unwrap()
            })
        })
        .collect();

    let mut ids = Vec::new();
    for t in tasks {
        ids.push(t.await.unwrap());
    }
    ids.sort_unstable();
    assert_eq!(ids, (1..=64).collect::<Vec<u64>>());
}

#[tokio::test]
async fn bearer_gate_guards_posts_but_not_health() {
    let app = guarded("s3cret");

    assert_error(&send(&app, "GET", "/posts", "").await, Status::Unauthorized, "Missing auth token");
    assert_error(
        &send_with(&app, "GET", "/posts", "", Some("wrong")).await,
        Status::Unauthorized,
        "Invalid token",
    );
    assert_eq!(send_with(&app, "GET", "/posts", "", Some("s3cret")).await.status, Status::Ok);
    assert_eq!(send(&app, "GET", "/health", "").await.status, Status::Ok);
}
