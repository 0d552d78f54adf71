//! Integration tests for the axum layer: bypass, error handlers, verdicts
//! left for handlers, and body handling.

use axum::body::Body;
use axum::extract::Request;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use body_validator::web::{Validated, ValidationLocals};
use body_validator::{
    Config, ErrorKind, RequestBody, RestrictNumberOnly, RestrictStringLength, RestrictUnicode,
    Restrictor, ValidationError, ValidatorLayer,
};
use tower::ServiceExt;

fn json_post(uri: &str, body: &'static str) -> Request {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn echo(body: String) -> String {
    body
}

#[tokio::test]
async fn next_predicate_bypasses_validation() {
    let app = Router::new()
        .route("/import", post(echo))
        .route("/users", post(echo))
        .layer(ValidatorLayer::new(
            Config::default()
                .rule(RestrictUnicode::new(["name"]))
                .with_next(|request| request.uri().path() == "/import"),
        ));

    let skipped = app
        .clone()
        .oneshot(json_post("/import", r#"{"name":"Gøpher"}"#))
        .await
        .unwrap();
    assert_eq!(skipped.status(), StatusCode::OK);
    assert_eq!(body_string(skipped).await, r#"{"name":"Gøpher"}"#);

    let checked = app
        .oneshot(json_post("/users", r#"{"name":"Gøpher"}"#))
        .await
        .unwrap();
    assert_eq!(checked.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bypassed_request_is_not_marked_validated() {
    let app = Router::new()
        .route(
            "/",
            post(|request: Request| async move {
                request.extensions().get::<Validated>().is_some().to_string()
            }),
        )
        .layer(ValidatorLayer::new(Config::default().with_next(|_| true)));

    let response = app.oneshot(json_post("/", "{}")).await.unwrap();

    assert_eq!(body_string(response).await, "false");
}

#[tokio::test]
async fn handler_receives_the_full_body() {
    let app = Router::new()
        .route("/", post(echo))
        .layer(ValidatorLayer::new(
            Config::default().rule(RestrictStringLength::new(["title"]).max_length(20)),
        ));

    let body = r#"{"title":"Ferris","tags":["crab","rust"]}"#;
    let response = app.oneshot(json_post("/", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, body);
}

#[tokio::test]
async fn json_extractor_still_works_after_validation() {
    let app = Router::new()
        .route(
            "/",
            post(|Json(value): Json<serde_json::Value>| async move {
                value["age"].to_string()
            }),
        )
        .layer(ValidatorLayer::new(
            Config::default().rule(RestrictNumberOnly::new(["age"]).max(150)),
        ));

    let response = app.oneshot(json_post("/", r#"{"age":42}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "42");
}

#[tokio::test]
async fn passing_request_is_marked_validated() {
    let app = Router::new()
        .route(
            "/",
            post(|request: Request| async move {
                request.extensions().get::<Validated>().is_some().to_string()
            }),
        )
        .layer(ValidatorLayer::new(
            Config::default().rule(RestrictUnicode::new(["name"])),
        ));

    let response = app
        .oneshot(json_post("/", r#"{"name":"Gopher"}"#))
        .await
        .unwrap();

    assert_eq!(body_string(response).await, "true");
}

#[tokio::test]
async fn context_key_stores_passing_verdict() {
    let app = Router::new()
        .route(
            "/",
            post(|locals: ValidationLocals| async move {
                match locals.get("validation") {
                    Some(None) => "passed",
                    Some(Some(_)) => "failed",
                    None => "missing",
                }
            }),
        )
        .layer(ValidatorLayer::new(
            Config::default()
                .rule(RestrictUnicode::new(["name"]))
                .with_context_key("validation"),
        ));

    let response = app
        .oneshot(json_post("/", r#"{"name":"Gopher"}"#))
        .await
        .unwrap();

    assert_eq!(body_string(response).await, "passed");
}

#[tokio::test]
async fn context_key_is_visible_to_custom_error_handler() {
    let app = Router::new()
        .route("/", post(|| async { "handled" }))
        .layer(ValidatorLayer::new(
            Config::default()
                .rule(RestrictNumberOnly::new(["age"]))
                .with_context_key("validation")
                .with_error_handler(|parts, err| {
                    let stored = parts
                        .extensions
                        .get::<ValidationLocals>()
                        .and_then(|locals| locals.error("validation"))
                        .map(|stored| stored == &err)
                        .unwrap_or(false);
                    (StatusCode::UNPROCESSABLE_ENTITY, stored.to_string()).into_response()
                }),
        ));

    let response = app
        .oneshot(json_post("/", r#"{"age":"old"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_string(response).await, "true");
}

#[tokio::test]
async fn locals_extractor_defaults_without_context_key() {
    let app = Router::new()
        .route(
            "/",
            post(|locals: ValidationLocals| async move {
                locals.contains("validation").to_string()
            }),
        )
        .layer(ValidatorLayer::new(Config::default()));

    let response = app.oneshot(json_post("/", "{}")).await.unwrap();

    assert_eq!(body_string(response).await, "false");
}

#[tokio::test]
async fn custom_error_handler_controls_the_response() {
    let app = Router::new()
        .route("/", post(|| async { "handled" }))
        .layer(ValidatorLayer::new(
            Config::default()
                .rule(RestrictStringLength::new(["bio"]).max_length(3))
                .with_error_handler(|parts, err| {
                    let body = format!("{} {}: {}", parts.method, parts.uri.path(), err.kind());
                    (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
                }),
        ));

    let response = app
        .oneshot(json_post("/", r#"{"bio":"too long"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_string(response).await, "POST /: exceeds max length");
}

struct RequireTenant;

impl Restrictor for RequireTenant {
    fn restrict(&self, request: &RequestBody<'_>) -> Result<(), ValidationError> {
        if request.text().contains("tenant") {
            Ok(())
        } else {
            Err(ValidationError::new(StatusCode::FORBIDDEN, "tenant is required"))
        }
    }

    fn name(&self) -> &'static str {
        "require_tenant"
    }
}

#[tokio::test]
async fn custom_rule_status_is_honoured() {
    let app = Router::new()
        .route("/", post(|| async { "handled" }))
        .layer(ValidatorLayer::new(Config::default().rule(RequireTenant)));

    let rejected = app
        .clone()
        .oneshot(json_post("/", r#"{"name":"Gopher"}"#))
        .await
        .unwrap();
    assert_eq!(rejected.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        body_string(rejected).await,
        r#"{"error":"tenant is required"}"#
    );

    let accepted = app
        .oneshot(json_post("/", r#"{"tenant":"acme"}"#))
        .await
        .unwrap();
    assert_eq!(accepted.status(), StatusCode::OK);
}

#[tokio::test]
async fn body_over_limit_is_rejected() {
    let app = Router::new()
        .route("/", post(|| async { "handled" }))
        .layer(ValidatorLayer::new(Config::default().with_body_limit(8)));

    let response = app
        .oneshot(json_post("/", r#"{"name":"longer than eight bytes"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn empty_chain_passes_everything() {
    let app = Router::new()
        .route("/", post(echo))
        .layer(ValidatorLayer::default());

    let response = app.oneshot(json_post("/", "not json at all")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "not json at all");
}

#[tokio::test]
async fn get_without_body_passes_absent_field_rules() {
    let app = Router::new()
        .route("/", get(|| async { "ok" }))
        .layer(ValidatorLayer::new(
            Config::default().rule(RestrictNumberOnly::new(["age"]).max(10)),
        ));

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn layer_exposes_its_validator() {
    let layer = ValidatorLayer::new(Config::default().rule(RestrictUnicode::new(["name"])));

    let err = layer
        .validator()
        .validate(&RequestBody::new(
            Some("application/json"),
            r#"{"name":"Gøpher"}"#.as_bytes(),
        ))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UnicodeNotAllowed);
}
