use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

// ============================================================================
// Request Helpers
// ============================================================================

/// Sends one request through the router and returns status, parsed JSON body
/// (Null when the body is empty), and response headers.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value, HeaderMap) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("x-auth", token);
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json, headers)
}

/// Signs up a user and returns (public user body, x-auth token)
pub async fn signup(app: &Router, name: &str, email: &str) -> (Value, String) {
    let (status, body, headers) = send(
        app,
        "POST",
        "/users",
        None,
        Some(serde_json::json!({
            "name": name,
            "email": email,
            "contactno": "5551234",
            "password": "hunter22"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "signup failed: {}", body);
    let token = headers
        .get("x-auth")
        .expect("signup response missing x-auth header")
        .to_str()
        .unwrap()
        .to_string();
    (body, token)
}

/// Logs in with credentials and returns (public user body, x-auth token)
pub async fn login(app: &Router, email: &str, password: &str) -> (Value, String) {
    let (status, body, headers) = send(
        app,
        "POST",
        "/users/login",
        None,
        Some(serde_json::json!({ "email": email, "password": password })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    let token = headers
        .get("x-auth")
        .expect("login response missing x-auth header")
        .to_str()
        .unwrap()
        .to_string();
    (body, token)
}

/// Creates a todo for the token's owner and returns the created document
pub async fn create_todo(app: &Router, token: &str, title: &str) -> Value {
    let (status, body, _) = send(
        app,
        "POST",
        "/todos",
        Some(token),
        Some(serde_json::json!({ "title": title })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "create_todo failed: {}", body);
    body
}
