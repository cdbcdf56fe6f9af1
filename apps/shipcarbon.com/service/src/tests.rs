use std::path::PathBuf;

use anyhow::Result;
use axum::body::Body;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE, LOCATION};
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use shipcarbon_client_core::config::EmailPrefill;
use tempfile::tempdir;
use tower::ServiceExt;

use crate::build_router;
use crate::config::Config;

fn test_config(static_dir: PathBuf) -> Config {
    Config::for_tests(static_dir)
}

async fn read_json(response: axum::response::Response) -> Result<Value> {
    let bytes = response.into_body().collect().await?.to_bytes();
    let value = serde_json::from_slice::<Value>(&bytes)?;
    Ok(value)
}

async fn read_text(response: axum::response::Response) -> Result<String> {
    let bytes = response.into_body().collect().await?.to_bytes();
    Ok(String::from_utf8(bytes.to_vec())?)
}

fn post_access_request(body: &str) -> Result<Request<Body>> {
    Ok(Request::builder()
        .method("POST")
        .uri("/api/request-api-key")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))?)
}

#[tokio::test]
async fn healthz_route_returns_ok() -> Result<()> {
    let app = build_router(test_config(std::env::temp_dir()));
    let request = Request::builder().uri("/healthz").body(Body::empty())?;
    let response = app.oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await?;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "shipcarbon-control-service");
    Ok(())
}

#[tokio::test]
async fn each_view_route_renders_html() -> Result<()> {
    let app = build_router(test_config(std::env::temp_dir()));

    for (path, marker) in [
        ("/", "Key Features"),
        ("/dashboard-home", "Welcome to the Maritime Emissions Analysis Platform"),
        ("/request_form", "Submit API Access Request"),
        ("/request-api", "Submit API Access Request"),
    ] {
        let request = Request::builder().uri(path).body(Body::empty())?;
        let response = app.clone().oneshot(request).await?;

        assert_eq!(response.status(), StatusCode::OK, "status for {path}");
        assert_eq!(
            response.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()),
            Some("text/html; charset=utf-8")
        );
        let html = read_text(response).await?;
        assert!(html.contains(marker), "{path} should contain {marker}");
        assert!(html.contains("id=\"shipcarbon-shell-config\""));
    }
    Ok(())
}

#[tokio::test]
async fn responses_carry_request_id() -> Result<()> {
    let app = build_router(test_config(std::env::temp_dir()));
    let request = Request::builder().uri("/").body(Body::empty())?;
    let response = app.oneshot(request).await?;

    assert!(response.headers().get("x-request-id").is_some());
    Ok(())
}

#[tokio::test]
async fn unknown_path_renders_not_found_view() -> Result<()> {
    let app = build_router(test_config(std::env::temp_dir()));
    let request = Request::builder()
        .uri("/no-such-page")
        .body(Body::empty())?;
    let response = app.oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let html = read_text(response).await?;
    assert!(html.contains("Page not found"));
    assert!(html.contains("/no-such-page"));
    Ok(())
}

#[tokio::test]
async fn unknown_api_path_returns_json_not_found() -> Result<()> {
    let app = build_router(test_config(std::env::temp_dir()));
    let request = Request::builder()
        .uri("/api/unknown")
        .body(Body::empty())?;
    let response = app.oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await?;
    assert_eq!(body["error"]["code"], "not_found");
    Ok(())
}

#[tokio::test]
async fn request_form_renders_fixed_prefill_email() -> Result<()> {
    let mut config = test_config(std::env::temp_dir());
    config.email_prefill = EmailPrefill::Fixed {
        email: "user@example.com".to_string(),
    };
    let app = build_router(config);
    let request = Request::builder()
        .uri("/request_form")
        .body(Body::empty())?;
    let response = app.oneshot(request).await?;

    let html = read_text(response).await?;
    assert!(html.contains("value=\"user@example.com\""));
    Ok(())
}

#[tokio::test]
async fn access_request_accepts_valid_body() -> Result<()> {
    let app = build_router(test_config(std::env::temp_dir()));
    let response = app
        .oneshot(post_access_request(
            r#"{"email":"ops@harbor.example","purpose":"Fleet CO2 reporting"}"#,
        )?)
        .await?;

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = read_json(response).await?;
    assert_eq!(body["data"]["status"], "pending");
    let request_id = body["data"]["request_id"].as_str().unwrap_or_default();
    assert!(request_id.starts_with("areq_"));
    assert!(body["data"]["received_at"].is_string());
    Ok(())
}

#[tokio::test]
async fn access_request_rejects_empty_purpose_and_bad_email() -> Result<()> {
    let app = build_router(test_config(std::env::temp_dir()));

    let response = app
        .clone()
        .oneshot(post_access_request(
            r#"{"email":"ops@harbor.example","purpose":"   "}"#,
        )?)
        .await?;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json(response).await?;
    assert_eq!(body["error"]["code"], "invalid_request");
    assert_eq!(body["errors"]["purpose"][0], "Tell us how you plan to use the API.");

    let response = app
        .oneshot(post_access_request(
            r#"{"email":"not-an-email","purpose":"Fleet CO2 reporting"}"#,
        )?)
        .await?;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json(response).await?;
    assert_eq!(body["errors"]["email"][0], "Enter a valid email address.");
    Ok(())
}

#[tokio::test]
async fn access_request_rejects_malformed_json() -> Result<()> {
    let app = build_router(test_config(std::env::temp_dir()));
    let response = app.oneshot(post_access_request("{not json")?).await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await?;
    assert_eq!(body["error"]["code"], "malformed_request");
    Ok(())
}

#[tokio::test]
async fn access_requests_survive_restart_when_store_is_configured() -> Result<()> {
    let store_dir = tempdir()?;
    let store_path = store_dir.path().join("access-requests.json");
    let mut config = test_config(std::env::temp_dir());
    config.access_request_store_path = Some(store_path.clone());

    let app = build_router(config.clone());
    let response = app
        .oneshot(post_access_request(
            r#"{"email":"ops@harbor.example","purpose":"Port emissions audit"}"#,
        )?)
        .await?;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let restored = crate::access_requests::AccessRequestLedger::from_config(&config);
    let records = restored.list().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].purpose, "Port emissions audit");
    assert!(store_path.is_file());
    Ok(())
}

#[tokio::test]
async fn external_links_redirect_temporarily() -> Result<()> {
    let app = build_router(test_config(std::env::temp_dir()));

    let request = Request::builder().uri("/go/docs").body(Body::empty())?;
    let response = app.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers().get(LOCATION).and_then(|v| v.to_str().ok()),
        Some("https://maritime-emissions.readme.io/reference/get_")
    );

    let request = Request::builder()
        .uri("/go/dashboard")
        .body(Body::empty())?;
    let response = app.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers().get(LOCATION).and_then(|v| v.to_str().ok()),
        Some("http://localhost:8088/superset/dashboard/p/XRGL1P2kjmJ/")
    );
    Ok(())
}

#[tokio::test]
async fn static_asset_is_served_with_guessed_content_type() -> Result<()> {
    let static_dir = tempdir()?;
    std::fs::write(
        static_dir.path().join("shipcarbon_web_shell.js"),
        "export default function init() {}",
    )?;
    let app = build_router(test_config(static_dir.path().to_path_buf()));

    let request = Request::builder()
        .uri("/assets/shipcarbon_web_shell.js")
        .body(Body::empty())?;
    let response = app.oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.contains("javascript"));
    assert_eq!(
        response.headers().get(CACHE_CONTROL).and_then(|v| v.to_str().ok()),
        Some("public, max-age=60")
    );
    Ok(())
}

#[tokio::test]
async fn static_asset_rejects_path_traversal_segments() -> Result<()> {
    let static_dir = tempdir()?;
    let app = build_router(test_config(static_dir.path().to_path_buf()));

    let request = Request::builder()
        .uri("/assets/../Cargo.toml")
        .body(Body::empty())?;
    let response = app.oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}
