use std::path::Path as FsPath;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::{HeaderValue, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use shipcarbon_client_core::access_request::{
    ACCESS_REQUEST_PATH, AccessRequest, AccessRequestInputError,
};
use shipcarbon_client_core::routes::{
    AppRoute, DASHBOARD_HOME_PATH, LANDING_PATH, REQUEST_FORM_ALIAS_PATH, REQUEST_FORM_PATH,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub mod access_requests;
pub mod api_envelope;
pub mod config;
pub mod web_maud;

#[cfg(test)]
mod tests;

use crate::access_requests::AccessRequestLedger;
use crate::api_envelope::{
    ApiErrorCode, ApiErrorTuple, accepted_data, error_response, malformed_request_error,
    not_found_error, validation_error,
};
use crate::config::Config;
use crate::web_maud::{WebBody, WebPage, render_page};

pub const SERVICE_NAME: &str = "shipcarbon-control-service";
const CACHE_SHORT_LIVED: &str = "public, max-age=60";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    access_requests: AccessRequestLedger,
    started_at: SystemTime,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    uptime_seconds: u64,
}

#[derive(Debug, Deserialize)]
struct AccessRequestBody {
    #[serde(default)]
    email: String,
    #[serde(default)]
    purpose: String,
}

pub fn build_router(config: Config) -> Router {
    let access_requests = AccessRequestLedger::from_config(&config);
    let state = AppState {
        config: Arc::new(config),
        access_requests,
        started_at: SystemTime::now(),
    };

    Router::new()
        .route(LANDING_PATH, get(web_view))
        .route(DASHBOARD_HOME_PATH, get(web_view))
        .route(REQUEST_FORM_PATH, get(web_view))
        .route(REQUEST_FORM_ALIAS_PATH, get(web_view))
        .route("/healthz", get(health))
        .route("/go/docs", get(redirect_docs))
        .route("/go/dashboard", get(redirect_analytics_dashboard))
        .route("/assets/*path", get(static_asset))
        .route(ACCESS_REQUEST_PATH, post(create_access_request))
        .fallback(web_not_found)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(REQUEST_TIMEOUT)),
        )
}

pub async fn serve(config: Config) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        target: "shipcarbon.service",
        service = SERVICE_NAME,
        bind_addr = %config.bind_addr,
        static_dir = %config.static_dir.display(),
        "shipcarbon service listening"
    );
    axum::serve(listener, build_router(config)).await?;
    Ok(())
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime_seconds = match state.started_at.elapsed() {
        Ok(duration) => duration.as_secs(),
        Err(_) => 0,
    };

    Json(HealthResponse {
        status: "ok",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds,
    })
}

async fn web_view(State(state): State<AppState>, uri: Uri) -> Result<Response, ApiErrorTuple> {
    let route = AppRoute::from_path(uri.path());
    render_route(&state.config, &route)
}

async fn web_not_found(State(state): State<AppState>, uri: Uri) -> Result<Response, ApiErrorTuple> {
    let path = uri.path();
    if path.starts_with("/api/") {
        return Err(not_found_error(format!("Route '{path}' was not found.")));
    }
    render_route(
        &state.config,
        &AppRoute::NotFound {
            path: path.to_string(),
        },
    )
}

fn render_route(config: &Config, route: &AppRoute) -> Result<Response, ApiErrorTuple> {
    let shell_config = config.shell_config();
    let shell_config_json = shell_config.to_embedded_json().map_err(|error| {
        tracing::error!(target: "shipcarbon.service", error = %error, "failed to encode shell config");
        error_response(ApiErrorCode::InternalError, "Failed to render page.")
    })?;

    let body = match route {
        AppRoute::Landing => WebBody::Landing,
        AppRoute::DashboardHome => WebBody::DashboardHome {
            docs_url: shell_config.docs_url.clone(),
            analytics_dashboard_url: shell_config.analytics_dashboard_url.clone(),
        },
        // Credential-derived prefill needs the browser's stored token; the shell fills it in.
        AppRoute::RequestForm => WebBody::RequestForm {
            initial_email: shell_config.email_prefill.resolve(None),
        },
        AppRoute::NotFound { path } => WebBody::NotFound { path: path.clone() },
    };

    let page = WebPage {
        title: route.title().to_string(),
        shell_config_json,
        body,
    };
    let status = if route.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    };

    Ok((status, Html(render_page(&page))).into_response())
}

async fn redirect_docs(State(state): State<AppState>) -> Redirect {
    Redirect::temporary(&state.config.docs_url)
}

async fn redirect_analytics_dashboard(State(state): State<AppState>) -> Redirect {
    Redirect::temporary(&state.config.analytics_dashboard_url)
}

async fn create_access_request(
    State(state): State<AppState>,
    payload: Result<Json<AccessRequestBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiErrorTuple> {
    let Json(payload) = payload.map_err(|rejection| {
        tracing::debug!(
            target: "shipcarbon.access_requests",
            error = %rejection.body_text(),
            "rejected malformed access request body"
        );
        malformed_request_error("Request body must be a JSON object with email and purpose.")
    })?;

    let request = AccessRequest::new(&payload.email, &payload.purpose).map_err(|error| {
        let field = match error {
            AccessRequestInputError::EmptyEmail | AccessRequestInputError::InvalidEmail => "email",
            AccessRequestInputError::EmptyPurpose => "purpose",
        };
        validation_error(field, &error.to_string())
    })?;

    let receipt = state.access_requests.record(request).await.map_err(|error| {
        tracing::error!(
            target: "shipcarbon.access_requests",
            error = %error,
            "failed to record access request"
        );
        error_response(
            ApiErrorCode::InternalError,
            "Failed to record access request.",
        )
    })?;

    Ok(accepted_data(receipt))
}

async fn static_asset(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<impl IntoResponse, ApiErrorTuple> {
    let relative_path = normalize_static_path(&path)
        .ok_or_else(|| not_found_error(format!("Asset '{path}' was not found.")))?;

    let asset_path = state.config.static_dir.join(&relative_path);
    if !asset_path.is_file() {
        return Err(not_found_error(format!(
            "Asset '{relative_path}' was not found."
        )));
    }

    let response = build_static_response(&asset_path, CACHE_SHORT_LIVED)
        .await
        .map_err(map_static_error)?;
    Ok(response)
}

async fn build_static_response(
    file_path: &FsPath,
    cache_control: &'static str,
) -> Result<Response, StaticResponseError> {
    let bytes = tokio::fs::read(file_path).await.map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            StaticResponseError::NotFound(format!(
                "Static file '{}' was not found.",
                file_path.display()
            ))
        } else {
            StaticResponseError::Io(source)
        }
    })?;

    let content_type = mime_guess::from_path(file_path).first_or_octet_stream();
    let mut response = Response::new(Body::from(bytes));
    response.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_str(content_type.as_ref())
            .map_err(|_| StaticResponseError::InvalidHeader(content_type.to_string()))?,
    );
    response
        .headers_mut()
        .insert(CACHE_CONTROL, HeaderValue::from_static(cache_control));

    Ok(response)
}

#[derive(Debug, thiserror::Error)]
enum StaticResponseError {
    #[error("{0}")]
    NotFound(String),
    #[error("static file read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid header value '{0}'")]
    InvalidHeader(String),
}

fn map_static_error(error: StaticResponseError) -> ApiErrorTuple {
    match error {
        StaticResponseError::NotFound(message) => not_found_error(message),
        StaticResponseError::Io(_) | StaticResponseError::InvalidHeader(_) => {
            tracing::warn!(target: "shipcarbon.service", error = %error, "static asset failed");
            error_response(
                ApiErrorCode::StaticAssetError,
                "Failed to serve static asset.",
            )
        }
    }
}

fn normalize_static_path(path: &str) -> Option<String> {
    let trimmed = path.trim().trim_start_matches('/');
    if trimmed.is_empty() {
        return None;
    }

    let mut normalized_parts = Vec::new();
    for part in trimmed.split('/') {
        let segment = part.trim();
        if segment.is_empty() || segment == "." || segment == ".." || segment.contains('\\') {
            return None;
        }
        normalized_parts.push(segment);
    }

    Some(normalized_parts.join("/"))
}
