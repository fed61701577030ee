use std::sync::{Arc, RwLock};
use std::time::Duration;

use anyhow::Result;
use axum::middleware;
use axum::{Router, extract::Request, response::Response};
use http::{HeaderValue, header};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use super::routes;
use crate::api::state::AppState;
use crate::core::{AppConfig, ProblemCatalog};
use crate::report::mailer_from_config;

async fn set_static_cache_control(request: Request, next: middleware::Next) -> Response {
    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    response
}

pub fn app(shared_state: Arc<RwLock<AppState>>) -> Router {
    let cors = CorsLayer::permissive();
    let static_path = shared_state
        .read()
        .expect("Unable to read share state")
        .config
        .static_path
        .clone();

    Router::new()
        // API routes
        .nest("/api", routes::router())
        // Static server of the browser UI
        .fallback_service(
            ServiceBuilder::new()
                .layer(middleware::from_fn(set_static_cache_control))
                .service(ServeDir::new(static_path).precompressed_gzip()),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::clone(&shared_state))
}

pub fn init_tracing() {
    // Ignore the error when a subscriber was already installed
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // axum logs rejections from built-in extractors with the `axum::rejection`
                // target, at `TRACE` level. `axum::rejection=trace` enables showing those events
                format! {
                    "{}=debug,tower_http=debug,axum::rejection=trace",
                    env!("CARGO_CRATE_NAME")
                }
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Periodically drops sessions nobody has touched for
/// `config.session_idle_minutes`.
fn spawn_session_sweeper(shared_state: Arc<RwLock<AppState>>, every: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let (evicted, remaining) = {
                let mut state = shared_state.write().expect("Unable to write share state");
                let max_idle = chrono::Duration::minutes(state.config.session_idle_minutes);
                let evicted = state.evict_idle(chrono::Utc::now(), max_idle);
                (evicted, state.sessions.len())
            };
            if evicted > 0 {
                tracing::info!("Evicted {} idle sessions, {} remaining", evicted, remaining);
            }
        }
    });
}

// Run the server
pub async fn serve(host: String, port: String, config: AppConfig) -> Result<()> {
    init_tracing();

    let problems = ProblemCatalog::load(&config.problems_path)?;
    tracing::info!(
        "Loaded {} problems from {}",
        problems.len(),
        config.problems_path
    );

    let mailer = mailer_from_config(&config);
    let app_state = AppState::new(config, problems, mailer);
    let shared_state = Arc::new(RwLock::new(app_state));
    let app = app(Arc::clone(&shared_state));
    spawn_session_sweeper(Arc::clone(&shared_state), Duration::from_secs(60 * 5));

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;

    tracing::debug!("Server started. Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
