// HTTP routes: chat relay, marketing pages, feature table, health and metrics.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{MatchedPath, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::Instrument;

use crate::features::FEATURES;
use crate::metrics;
use crate::pages::Pages;
use crate::particles::{ParticleField, PARTICLE_COUNT};
use crate::relay::{ChatRelay, ChatRequest, ChatResponse};
use crate::sections::{NavEvent, Section, SectionTracker};
use crate::session::{SessionProvider, SessionToken};

/// Canvas size the server seeds particles for; the client scales to fit.
const PARTICLE_CANVAS: (f64, f64) = (1920.0, 1080.0);

// ── Shared application state ─────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub relay: ChatRelay,
    pub sessions: Arc<dyn SessionProvider>,
    pub pages: Arc<Pages>,
}

// ── Response helpers ─────────────────────────────────────────────────

/// Current instant as ISO-8601 UTC with millisecond precision.
pub fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

fn chat_reply(status: StatusCode, body: ChatResponse) -> Response {
    (status, [(header::CACHE_CONTROL, "no-cache")], Json(body)).into_response()
}

// ── Router ────────────────────────────────────────────────────────────

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Pages
        .route("/", get(landing))
        .route("/features", get(features_page))
        // API
        .route("/api/chat", post(chat))
        .route("/api/features", get(list_features))
        // Operations
        .route("/metrics", get(get_metrics))
        .route("/llms.txt", get(get_llms_txt))
        .layer(middleware::from_fn(track_requests))
        .with_state(state)
}

/// Count every routed request by method, route and status.
async fn track_requests(req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let endpoint = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;

    metrics::API_REQUESTS_TOTAL
        .with_label_values(&[method.as_str(), endpoint.as_str(), response.status().as_str()])
        .inc();
    response
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "service": "questmaster-backend" }))
}

// ── Chat relay ───────────────────────────────────────────────────────

async fn chat(State(state): State<AppState>, body: Bytes) -> Response {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("chat", %request_id);
    handle_chat(state, body).instrument(span).await
}

async fn handle_chat(state: AppState, body: Bytes) -> Response {
    tracing::info!("Starting chat request processing");

    let request: ChatRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!("Invalid chat request body: {e}");
            metrics::CHAT_REQUESTS_TOTAL
                .with_label_values(&["rejected"])
                .inc();
            return chat_reply(
                StatusCode::BAD_REQUEST,
                ChatResponse::Failed {
                    error: "Invalid request body".to_string(),
                    details: e.to_string(),
                    timestamp: timestamp_now(),
                },
            );
        }
    };

    match state.relay.respond(&request).await {
        Ok(text) => {
            metrics::CHAT_REQUESTS_TOTAL.with_label_values(&["ok"]).inc();
            chat_reply(StatusCode::OK, ChatResponse::Reply { response: text })
        }
        Err(e) if e.is_client_error() => {
            metrics::CHAT_REQUESTS_TOTAL
                .with_label_values(&["rejected"])
                .inc();
            chat_reply(
                StatusCode::BAD_REQUEST,
                ChatResponse::Rejected {
                    error: e.to_string(),
                },
            )
        }
        Err(e) => {
            tracing::error!(model = state.relay.model(), "Chat relay error: {e}");
            metrics::CHAT_REQUESTS_TOTAL
                .with_label_values(&["failed"])
                .inc();
            chat_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                ChatResponse::Failed {
                    error: "Failed to process request".to_string(),
                    details: e.to_string(),
                    timestamp: timestamp_now(),
                },
            )
        }
    }
}

// ── Pages ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LandingParams {
    pub section: Option<String>,
}

async fn landing(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    Query(params): Query<LandingParams>,
) -> Response {
    match state.sessions.current_user(token.as_deref()).await {
        Ok(Some(user)) => {
            tracing::info!(user_id = %user.id, "Signed-in visitor, redirecting to dashboard");
            metrics::LANDING_REDIRECTS_TOTAL.inc();
            return Redirect::to("/dashboard").into_response();
        }
        Ok(None) => {}
        Err(e) => {
            // Marketing page stays reachable when the auth provider is down
            tracing::warn!("Session check failed, rendering anonymous landing page: {e}");
            metrics::SESSION_CHECK_FAILURES_TOTAL.inc();
        }
    }

    let mut tracker = SectionTracker::new();
    if let Some(section) = params.section.as_deref().and_then(Section::from_id) {
        tracker.handle(NavEvent::Select(section), Instant::now());
    }

    let (width, height) = PARTICLE_CANVAS;
    let field = ParticleField::new(PARTICLE_COUNT, width, height, &mut rand::thread_rng());

    render_page(state.pages.landing(tracker.active(), &field))
}

async fn features_page(State(state): State<AppState>) -> Response {
    render_page(state.pages.features())
}

fn render_page(page: Result<String, minijinja::Error>) -> Response {
    match page {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Failed to render page: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn list_features() -> impl IntoResponse {
    (StatusCode::OK, Json(FEATURES))
}

// ── Operations ───────────────────────────────────────────────────────

async fn get_metrics() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4")],
        metrics::gather_metrics(),
    )
        .into_response()
}

async fn get_llms_txt() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        crate::llms_txt::LLMS_TXT,
    )
        .into_response()
}
