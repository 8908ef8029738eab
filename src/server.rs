//! HTTP server for the collection search site.
//!
//! Serves HTML pages for browsers plus a small JSON API over the same
//! [`Catalog`].
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/`, `/index` | Search page, re-running the search saved in the cookie |
//! | `GET` | `/search?l=&c=&a=&d=` | Result table fragment; saves the search in a cookie |
//! | `GET` | `/obj/{id}` | Object detail page |
//! | `GET` | `/api/search?l=&c=&a=&d=` | Search results as JSON |
//! | `GET` | `/api/obj/{id}` | Object detail as JSON |
//! | `GET` | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! JSON routes answer errors with
//!
//! ```json
//! { "error": { "code": "not_found", "message": "Error: object with id 7 does not exist" } }
//! ```
//!
//! Error codes: `not_found` (404), `backend_unavailable` (503), `internal`
//! (500). HTML routes
//! render the same message in an error page with the same status.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::CatalogError;
use crate::models::{CatalogObject, ObjectDetail, SearchParams};
use crate::render;

/// Cookie holding the last search as JSON. The jar percent-encodes it.
pub const SEARCH_COOKIE: &str = "search_parameters";

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    catalog: Arc<Catalog>,
}

/// Opens the catalog and serves until the process is terminated.
///
/// `port` overrides the port in `[server].bind`. The database is checked
/// before the listener is bound, so a bad path fails fast.
pub async fn run_server(config: &Config, port: Option<u16>) -> anyhow::Result<()> {
    let bind_addr = match port {
        Some(p) => config.bind_with_port(p)?.to_string(),
        None => config.server.bind.clone(),
    };

    let catalog = Catalog::open(config).await?;
    catalog.ping().await?;

    run_server_with_catalog(&bind_addr, Arc::new(catalog)).await
}

/// Serves an already-opened catalog on `bind_addr`.
pub async fn run_server_with_catalog(bind_addr: &str, catalog: Arc<Catalog>) -> anyhow::Result<()> {
    let app = router(catalog);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "catalog server listening");
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the application router.
pub fn router(catalog: Arc<Catalog>) -> Router {
    let state = AppState { catalog };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_index))
        .route("/index", get(handle_index))
        .route("/search", get(handle_search))
        .route("/obj", get(handle_missing_object_id))
        .route("/obj/{id}", get(handle_object))
        .route("/api/search", get(handle_api_search))
        .route("/api/obj/{id}", get(handle_api_object))
        .route("/health", get(handle_health))
        .fallback(handle_fallback)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into either an HTML or JSON response.
struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
    json: bool,
}

impl AppError {
    fn as_json(mut self) -> Self {
        self.json = true;
        self
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.json {
            let body = ErrorBody {
                error: ErrorDetail {
                    code: self.code.to_string(),
                    message: self.message,
                },
            };
            (self.status, Json(body)).into_response()
        } else {
            (self.status, Html(render::error_page(&self.message))).into_response()
        }
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found",
        message: message.into(),
        json: false,
    }
}

fn object_not_found(id: &str) -> AppError {
    not_found(format!("Error: object with id {} does not exist", id))
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        tracing::error!(error = %err, "catalog request failed");
        let (status, code) = if err.is_backend() {
            (StatusCode::SERVICE_UNAVAILABLE, "backend_unavailable")
        } else {
            (StatusCode::INTERNAL_SERVER_ERROR, "internal")
        };
        AppError {
            status,
            code,
            message: err.to_string(),
            json: false,
        }
    }
}

// ============ Search parameters ============

/// Query string of `/search` and `/api/search`. Missing keys are empty.
#[derive(Debug, Default, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    l: String,
    #[serde(default)]
    c: String,
    #[serde(default)]
    a: String,
    #[serde(default)]
    d: String,
}

impl From<SearchQuery> for SearchParams {
    fn from(q: SearchQuery) -> Self {
        SearchParams::new(Some(q.l), Some(q.c), Some(q.a), Some(q.d))
    }
}

fn saved_search(jar: &CookieJar) -> Option<SearchParams> {
    let raw = jar.get(SEARCH_COOKIE)?.value();
    match serde_json::from_str(raw) {
        Ok(params) => Some(params),
        Err(e) => {
            tracing::debug!(error = %e, "ignoring unreadable search cookie");
            None
        }
    }
}

fn search_cookie(params: &SearchParams) -> Cookie<'static> {
    // Serializing plain strings cannot fail.
    let json = serde_json::to_string(params).unwrap_or_default();
    Cookie::build((SEARCH_COOKIE, json))
        .path("/")
        .build()
}

// ============ HTML routes ============

async fn handle_index(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Html<String>, AppError> {
    let (params, results) = match saved_search(&jar) {
        Some(params) => {
            let objects = state.catalog.search(&params).await?;
            let fragment = if objects.is_empty() {
                render::message("No results found for the last search.")
            } else {
                render::search_results(&objects)
            };
            (params, fragment)
        }
        None => (SearchParams::default(), String::new()),
    };

    Ok(Html(render::index_page(&params, &results)))
}

async fn handle_search(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<SearchQuery>,
) -> Result<(CookieJar, Html<String>), AppError> {
    let params = SearchParams::from(query);

    let html = if params.is_empty() && jar.get(SEARCH_COOKIE).is_none() {
        render::message("No search terms provided. Please enter some search terms.")
    } else {
        let objects = state.catalog.search(&params).await?;
        render::search_results(&objects)
    };

    Ok((jar.add(search_cookie(&params)), Html(html)))
}

async fn handle_object(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Result<(CookieJar, Html<String>), AppError> {
    let object_id: i64 = id.parse().map_err(|_| object_not_found(&id))?;

    let detail = state
        .catalog
        .object_detail(object_id)
        .await?
        .ok_or_else(|| object_not_found(&id))?;

    let jar = jar.add(Cookie::new("activate", "true"));
    Ok((jar, Html(render::object_page(&detail))))
}

async fn handle_missing_object_id() -> AppError {
    not_found("Error: missing object ID")
}

async fn handle_fallback() -> AppError {
    not_found("Error: page not found")
}

// ============ JSON routes ============

#[derive(Serialize)]
struct SearchResponse {
    objects: Vec<CatalogObject>,
}

async fn handle_api_search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    let params = SearchParams::from(query);
    let objects = state
        .catalog
        .search(&params)
        .await
        .map_err(|e| AppError::from(e).as_json())?;
    Ok(Json(SearchResponse { objects }))
}

async fn handle_api_object(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ObjectDetail>, AppError> {
    let object_id: i64 = id.parse().map_err(|_| object_not_found(&id).as_json())?;

    let detail = state
        .catalog
        .object_detail(object_id)
        .await
        .map_err(|e| AppError::from(e).as_json())?
        .ok_or_else(|| object_not_found(&id).as_json())?;

    Ok(Json(detail))
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
