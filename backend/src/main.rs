use std::sync::Arc;
use std::time::Duration;

use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use questmaster_backend::api::{self, AppState};
use questmaster_backend::config::Config;
use questmaster_backend::metrics;
use questmaster_backend::pages::Pages;
use questmaster_backend::provider::GeminiClient;
use questmaster_backend::relay::ChatRelay;
use questmaster_backend::session::{AnonymousSessions, SessionProvider, SupabaseSessions};

const SESSION_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() {
    // Optional .env file
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    metrics::register_metrics();

    let gemini = match GeminiClient::new(
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
        config.gemini_base_url.clone(),
        config.chat_timeout,
    ) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to build model client: {e}");
            std::process::exit(1);
        }
    };
    let relay = ChatRelay::new(Arc::new(gemini), config.chat_timeout);

    let sessions: Arc<dyn SessionProvider> = match &config.auth {
        Some(auth) => match SupabaseSessions::new(auth, SESSION_CHECK_TIMEOUT) {
            Ok(sessions) => Arc::new(sessions),
            Err(e) => {
                tracing::error!("Failed to build auth client: {e}");
                std::process::exit(1);
            }
        },
        None => {
            tracing::info!("No auth provider configured; all visitors are anonymous");
            Arc::new(AnonymousSessions)
        }
    };

    let pages = match Pages::new() {
        Ok(pages) => Arc::new(pages),
        Err(e) => {
            tracing::error!("Failed to compile page templates: {e}");
            std::process::exit(1);
        }
    };

    let mut app = api::router(AppState {
        relay,
        sessions,
        pages,
    });
    if let Some(dir) = &config.static_dir {
        tracing::info!("Serving static files from {}", dir.display());
        app = app.fallback_service(ServeDir::new(dir));
    }
    let app = app
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .unwrap_or_else(|e| panic!("Failed to bind to port {}: {e}", config.port));

    tracing::info!(
        model = %config.gemini_model,
        "Quest Master backend listening on port {}",
        config.port
    );
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
