//! HTTP surface
//!
//! Thin axum layer over the pipeline. Route map:
//!
//!   GET /health       — liveness probe
//!   GET /reviews      — ranked review cards for a topic
//!   GET /review-url   — a single card built from a direct URL
//!
//! Error policy: 400 for caller input errors, 500 only when no discovery
//! source is available at all (total misconfiguration) or a directly
//! requested URL cannot be fetched; everything else — including every source
//! failing at request time — degrades to 200 with as many cards as could
//! honestly be assembled.

use crate::assemble::ResultAssembler;
use crate::config::{Config, ServerConfig};
use crate::discovery::LinkDiscoveryCoordinator;
use crate::extract::{title_text, ExcerptExtractor};
use crate::text::normalize;
use crate::url::{logo_url, registrable_domain};
use crate::{discovery, ScoutError};
use axum::extract::{Query, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Default and maximum result counts for /reviews.
const DEFAULT_COUNT: i64 = 10;
const MAX_COUNT: i64 = 20;

/// Minimum lengths for caller-supplied parameters.
const MIN_TITLE_LEN: usize = 2;
const MIN_URL_LEN: usize = 8;

/// Message returned with an empty (but successful) result set.
const NO_RESULTS_MESSAGE: &str = "No results found for this title.";

/// Shared application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    coordinator: Arc<LinkDiscoveryCoordinator>,
    assembler: Arc<ResultAssembler>,
    extractor: Arc<ExcerptExtractor>,
}

impl AppState {
    /// Builds the pipeline components from configuration
    pub fn from_config(config: &Config) -> Result<Self, ScoutError> {
        let extractor = Arc::new(ExcerptExtractor::new(&config.fetch)?);
        let assembler = Arc::new(ResultAssembler::new(
            extractor.clone(),
            config.pipeline.max_concurrent_extractions,
        ));
        let coordinator = Arc::new(LinkDiscoveryCoordinator::new(config)?);

        Ok(Self {
            coordinator,
            assembler,
            extractor,
        })
    }
}

/// Builds the application router with CORS and request tracing
pub fn router(state: AppState, server: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/reviews", get(reviews_handler))
        .route("/review-url", get(review_url_handler))
        .layer(cors_layer(&server.allowed_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the configured address and serves requests until shutdown
pub async fn serve(config: Config) -> Result<(), ScoutError> {
    let state = AppState::from_config(&config)?;
    let app = router(state, &config.server);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

fn cors_layer(allowed_origin: &str) -> CorsLayer {
    let origin = if allowed_origin == "*" {
        AllowOrigin::any()
    } else {
        match allowed_origin.parse::<HeaderValue>() {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                tracing::warn!("Unusable allowed-origin '{}', allowing any", allowed_origin);
                AllowOrigin::any()
            }
        }
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

#[derive(Debug, Deserialize)]
struct ReviewsParams {
    title: Option<String>,
    n: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ReviewUrlParams {
    url: Option<String>,
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({"ok": true}))
}

async fn reviews_handler(
    State(state): State<AppState>,
    Query(params): Query<ReviewsParams>,
) -> Response {
    let title = match params.title.as_deref().map(str::trim) {
        None | Some("") => return error_response(StatusCode::BAD_REQUEST, "Missing title"),
        Some(t) if t.chars().count() < MIN_TITLE_LEN => {
            return error_response(StatusCode::BAD_REQUEST, "Title too short")
        }
        Some(t) => t.to_string(),
    };

    // The one server-side failure: nothing in the chain could ever answer.
    if state.coordinator.available_sources() == 0 {
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "No discovery sources are configured",
        );
    }

    let desired = clamp_count(params.n);
    let candidates = state.coordinator.discover(&title, desired).await;
    let items = state.assembler.assemble(candidates, desired).await;

    let body = if items.is_empty() {
        json!({"title": title, "items": items, "message": NO_RESULTS_MESSAGE})
    } else {
        json!({"title": title, "items": items})
    };

    (StatusCode::OK, Json(body)).into_response()
}

async fn review_url_handler(
    State(state): State<AppState>,
    Query(params): Query<ReviewUrlParams>,
) -> Response {
    let url = match params.url.as_deref().map(str::trim) {
        None | Some("") => return error_response(StatusCode::BAD_REQUEST, "Missing url"),
        Some(u) if u.len() < MIN_URL_LEN || !discovery::is_http_url(u) => {
            return error_response(StatusCode::BAD_REQUEST, "Invalid url")
        }
        Some(u) => u.to_string(),
    };

    let Some(body) = state.extractor.fetch_page(&url).await else {
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "URL fetch failed");
    };

    let name = title_text(&body).unwrap_or_else(|| display_name_fallback(&url));
    // Unlike /reviews, a direct URL is answered even without an excerpt; the
    // caller asked for this specific page.
    let excerpt = state.extractor.excerpt_from_html(&body).unwrap_or_default();

    let card = json!({
        "url": url,
        "name": name,
        "excerpt": excerpt,
        "logo": logo_url(&url),
        "score": "",
    });

    (StatusCode::OK, Json(card)).into_response()
}

/// Clamps the requested result count into [1, MAX_COUNT], defaulting when
/// absent.
fn clamp_count(requested: Option<i64>) -> usize {
    requested.unwrap_or(DEFAULT_COUNT).clamp(1, MAX_COUNT) as usize
}

/// Display name for a page with no usable title: its registrable domain,
/// or the URL itself as a last resort.
fn display_name_fallback(url: &str) -> String {
    let domain = registrable_domain(url);
    if domain.is_empty() {
        normalize(url)
    } else {
        domain
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"error": message}))).into_response()
}
