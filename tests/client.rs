mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use merch::client::config::{ClientConfig, Deployment};
use merch::client::env::{Environment, MemoryEnvironment};
use merch::client::factory::ClientFactory;
use merch::client::{Client, RequestError};
use merch::types::order::{BulkActionRequest, OrderAction, OrderStatus};
use merch::types::request::Query;
use reqwest::Method;
use serde_json::{json, Value};

use common::{ok, status, StubServer};

fn plain_client(url: &str) -> Client {
    Client::new(url, Arc::new(MemoryEnvironment::new()), Deployment::Local).unwrap()
}

#[tokio::test]
async fn test_retry_on_server_errors() {
    let server = StubServer::start().await;
    server.on(
        "GET",
        "/ping",
        vec![status(503, ""), status(503, ""), ok(r#"{"pong":true}"#)],
    );

    let client = plain_client(&server.url());
    let started = Instant::now();
    let value: Value = client.request(Method::GET, "ping", None).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(value, json!({"pong": true}));

    let hits = server.hits_for("GET", "/ping");
    assert_eq!(hits.len(), 3);

    // Two fixed pauses between the three attempts.
    assert!(elapsed >= Duration::from_millis(1900), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_secs(10), "elapsed {elapsed:?}");
    let gap = hits[1].at.duration_since(hits[0].at);
    assert!(gap >= Duration::from_millis(900), "gap {gap:?}");
}

#[tokio::test]
async fn test_client_errors_are_terminal() {
    let server = StubServer::start().await;
    server.on(
        "GET",
        "/orders/o1",
        vec![status(404, r#"{"detail": "order not found"}"#)],
    );

    let client = plain_client(&server.url());
    let err = client
        .request::<Value>(Method::GET, "orders/o1", None)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "order not found");
    assert!(err.is_not_found());
    assert!(matches!(err, RequestError::Status { code: 404, .. }));
    assert_eq!(server.hits_for("GET", "/orders/o1").len(), 1);
}

#[tokio::test]
async fn test_empty_success_body() {
    let server = StubServer::start().await;
    server.on("DELETE", "/integrations/channels/c1", vec![ok("")]);

    let client = plain_client(&server.url());
    let value: Value = client
        .request(Method::DELETE, "integrations/channels/c1", None)
        .await
        .unwrap();

    assert_eq!(value, json!({}));
}

#[tokio::test]
async fn test_invalid_json_not_retried() {
    let server = StubServer::start().await;
    server.on("GET", "/ping", vec![ok("not json")]);

    let client = plain_client(&server.url());
    let err = client
        .request::<Value>(Method::GET, "ping", None)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Invalid JSON response");
    assert!(matches!(err, RequestError::InvalidJson));
    // A malformed success body is terminal, not worth another attempt.
    assert_eq!(server.hits_for("GET", "/ping").len(), 1);
}

#[tokio::test]
async fn test_error_message_extraction() {
    let server = StubServer::start().await;
    let client = plain_client(&server.url());

    // detail wins over the other fields.
    server.on(
        "GET",
        "/a",
        vec![status(
            400,
            r#"{"detail": "bad email", "error": "e", "message": "m"}"#,
        )],
    );
    let err = client.request::<Value>(Method::GET, "a", None).await;
    assert_eq!(err.unwrap_err().to_string(), "bad email");

    // Non-string fields are stringified, not skipped.
    server.on("GET", "/b", vec![status(400, r#"{"detail": {"field": "email"}}"#)]);
    let err = client.request::<Value>(Method::GET, "b", None).await;
    assert_eq!(err.unwrap_err().to_string(), r#"{"field":"email"}"#);

    // Non-JSON error bodies surface as-is.
    server.on("GET", "/c", vec![status(403, "upstream denied")]);
    let err = client.request::<Value>(Method::GET, "c", None).await;
    assert_eq!(err.unwrap_err().to_string(), "upstream denied");

    // Nothing useful at all gets the synthesized fallback.
    server.on("GET", "/d", vec![status(403, "")]);
    let err = client.request::<Value>(Method::GET, "d", None).await;
    assert_eq!(err.unwrap_err().to_string(), "Request failed with status 403");
}

#[tokio::test]
async fn test_auth_without_credentials() {
    let server = StubServer::start().await;
    let env = Arc::new(MemoryEnvironment::new());
    let client = Client::new(&server.url(), env.clone(), Deployment::Local).unwrap();

    let err = client
        .auth_request::<Value>(Method::GET, "orders", None)
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Authentication required. Please login again."
    );
    assert!(err.is_auth_required());
    assert_eq!(env.navigations(), 1);
    // Failed before any traffic went out.
    assert!(server.hits().is_empty());
}

#[tokio::test]
async fn test_auth_header_defaults_and_overrides() {
    let server = StubServer::start().await;
    server.on("GET", "/orders", vec![ok("[]")]);

    let env = Arc::new(MemoryEnvironment::with_token("tok_abc"));
    let client = Client::new(&server.url(), env, Deployment::Local).unwrap();

    let orders: Value = client
        .auth_request_with_headers(
            Method::GET,
            "orders",
            None,
            &[("accept", "text/plain"), ("x-request-id", "req-1")],
        )
        .await
        .unwrap();
    assert_eq!(orders, json!([]));

    let hits = server.hits_for("GET", "/orders");
    assert_eq!(hits.len(), 1);
    let headers = &hits[0].headers;
    assert_eq!(headers["authorization"], "Bearer tok_abc");
    assert_eq!(headers["content-type"], "application/json");
    // Caller headers win over the defaults.
    assert_eq!(headers["accept"], "text/plain");
    assert_eq!(headers["x-request-id"], "req-1");
}

#[tokio::test]
async fn test_stored_token_wins_over_cookie() {
    let server = StubServer::start().await;
    server.on("GET", "/auth/me", vec![ok(r#"{"name":"Jo"}"#)]);

    let env = MemoryEnvironment::with_token("store_tok");
    env.store_cookie_token("cookie_tok").unwrap();
    let client = Client::new(&server.url(), Arc::new(env), Deployment::Local).unwrap();

    client.me().await.unwrap();
    let hits = server.hits_for("GET", "/auth/me");
    assert_eq!(hits[0].headers["authorization"], "Bearer store_tok");
}

#[tokio::test]
async fn test_cookie_fallback_token() {
    let server = StubServer::start().await;
    server.on(
        "GET",
        "/auth/me",
        vec![ok(
            r#"{"name":"Jo","email":"jo@acme.io","merchant":"acme","create_time":1721001600}"#,
        )],
    );

    let env = MemoryEnvironment::with_cookie_line("session=zzz; token=tok%20fallback; Path=/");
    let client = Client::new(&server.url(), Arc::new(env), Deployment::Local).unwrap();

    let user = client.me().await.unwrap();
    assert_eq!(user.name, "Jo");
    assert_eq!(user.merchant, "acme");

    let hits = server.hits_for("GET", "/auth/me");
    assert_eq!(hits[0].headers["authorization"], "Bearer tok fallback");
}

#[tokio::test]
async fn test_list_orders_builds_query() {
    let server = StubServer::start().await;
    server.on(
        "GET",
        "/orders",
        vec![ok(r##"[{"id":"o1","name":"#1001"},{"id":"o2","name":"#1002"}]"##)],
    );

    let env = Arc::new(MemoryEnvironment::with_token("tok_abc"));
    let client = Client::new(&server.url(), env, Deployment::Local).unwrap();

    let query = Query {
        limit: Some(2),
        status: Some(OrderStatus::Pending),
        ..Default::default()
    };
    let orders = client.list_orders(&query).await.unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].id, "o1");
    // Absent fields fall back to their defaults.
    assert_eq!(orders[0].status, OrderStatus::Pending);

    let hits = server.hits_for("GET", "/orders");
    assert_eq!(hits[0].path, "/orders?limit=2&status=pending");
}

#[tokio::test]
async fn test_typed_decode_mismatch_is_invalid_json() {
    let server = StubServer::start().await;
    // An object where a list is expected.
    server.on("GET", "/orders", vec![ok("{}")]);

    let env = Arc::new(MemoryEnvironment::with_token("tok_abc"));
    let client = Client::new(&server.url(), env, Deployment::Local).unwrap();

    let err = client.list_orders(&Query::default()).await.unwrap_err();
    assert!(matches!(err, RequestError::InvalidJson));
    assert_eq!(server.hits_for("GET", "/orders").len(), 1);
}

#[tokio::test]
async fn test_update_order_status_sends_patch() {
    let server = StubServer::start().await;
    server.on(
        "PATCH",
        "/orders/o1",
        vec![ok(r##"{"id":"o1","name":"#1001","status":"confirmed"}"##)],
    );

    let env = Arc::new(MemoryEnvironment::with_token("tok_abc"));
    let client = Client::new(&server.url(), env, Deployment::Local).unwrap();

    let order = client
        .update_order_status("o1", OrderStatus::Confirmed)
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Confirmed);

    let hits = server.hits_for("PATCH", "/orders/o1");
    assert_eq!(hits.len(), 1);
    let body: Value = serde_json::from_str(&hits[0].body).unwrap();
    assert_eq!(body, json!({"status": "confirmed"}));
}

#[tokio::test]
async fn test_bulk_order_action() {
    let server = StubServer::start().await;
    server.on(
        "POST",
        "/orders/bulk",
        vec![ok(
            r#"{"succeeded":["o1"],"failed":[{"id":"o2","message":"already shipped"}]}"#,
        )],
    );

    let env = Arc::new(MemoryEnvironment::with_token("tok_abc"));
    let client = Client::new(&server.url(), env, Deployment::Local).unwrap();

    let req = BulkActionRequest {
        ids: vec![String::from("o1"), String::from("o2")],
        action: OrderAction::Confirm,
    };
    let result = client.bulk_order_action(&req).await.unwrap();
    assert_eq!(result.succeeded, vec!["o1"]);
    assert_eq!(result.failed.len(), 1);
    assert_eq!(result.failed[0].id, "o2");
    assert_eq!(result.failed[0].message, "already shipped");

    let hits = server.hits_for("POST", "/orders/bulk");
    assert_eq!(hits.len(), 1);
    let body: Value = serde_json::from_str(&hits[0].body).unwrap();
    assert_eq!(body, json!({"ids": ["o1", "o2"], "action": "confirm"}));
}

#[tokio::test]
async fn test_reads_are_idempotent() {
    let server = StubServer::start().await;
    server.on(
        "GET",
        "/auth/me",
        vec![ok(r#"{"name":"Jo","email":"jo@acme.io"}"#)],
    );

    let env = Arc::new(MemoryEnvironment::with_token("tok_abc"));
    let client = Client::new(&server.url(), env.clone(), Deployment::Local).unwrap();

    let first = client.me().await.unwrap();
    let second = client.me().await.unwrap();
    assert_eq!(first.name, second.name);
    assert_eq!(first.email, second.email);
    // Reads leave the stored credential untouched.
    assert_eq!(env.stored_token(), Some(String::from("tok_abc")));
    assert_eq!(server.hits_for("GET", "/auth/me").len(), 2);
}

#[tokio::test]
async fn test_network_error_hints_local_placeholder() {
    // Bind then drop to get a port nobody listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = Client::new(
        &format!("http://{addr}"),
        Arc::new(MemoryEnvironment::new()),
        Deployment::Production,
    )
    .unwrap();

    let err = client
        .request::<Value>(Method::GET, "ping", None)
        .await
        .unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("Network error:"), "{message}");
    assert!(message.contains("local placeholder"), "{message}");
}

#[tokio::test]
async fn test_login_persists_credentials() {
    let server = StubServer::start().await;
    server.on(
        "POST",
        "/auth/login",
        vec![ok(
            r#"{"token":"tok_live","user":{"name":"Jo","email":"jo@acme.io","merchant":"acme","create_time":1721001600}}"#,
        )],
    );
    server.on(
        "GET",
        "/auth/me",
        vec![ok(
            r#"{"name":"Jo","email":"jo@acme.io","merchant":"acme","create_time":1721001600}"#,
        )],
    );

    let dir = std::env::temp_dir().join("_merch_test_login_flow");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();

    let cfg = ClientConfig {
        server: server.url(),
        environment: Deployment::Local,
        token_path: dir.join("token").display().to_string(),
        cookie_path: dir.join("cookies").display().to_string(),
        user_path: dir.join("user.json").display().to_string(),
    };
    let factory = ClientFactory::new(cfg);

    let user = factory
        .login(String::from("jo@acme.io"), String::from("hunter2"))
        .await
        .unwrap();
    assert_eq!(user.merchant, "acme");

    let login_hits = server.hits_for("POST", "/auth/login");
    assert_eq!(login_hits.len(), 1);
    let body: Value = serde_json::from_str(&login_hits[0].body).unwrap();
    assert_eq!(body, json!({"email": "jo@acme.io", "password": "hunter2"}));

    // Both slots hold the credential, plus the cached user blob.
    let token = std::fs::read_to_string(dir.join("token")).unwrap();
    assert_eq!(token, "tok_live");
    let cookie = std::fs::read_to_string(dir.join("cookies")).unwrap();
    assert!(cookie.starts_with("token=tok_live; Max-Age="), "{cookie}");
    let cached = factory.cached_user().unwrap();
    assert_eq!(cached.email, "jo@acme.io");

    // Authenticated calls now carry the persisted token.
    let client = factory.build_client().unwrap();
    client.me().await.unwrap();
    let me_hits = server.hits_for("GET", "/auth/me");
    assert_eq!(me_hits[0].headers["authorization"], "Bearer tok_live");

    factory.logout().unwrap();
    assert!(!dir.join("token").exists());
    assert!(factory.cached_user().is_none());

    std::fs::remove_dir_all(&dir).unwrap();
}
