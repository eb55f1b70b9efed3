/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use chirpy_api::{app::{build_router, AppState}, config::Config};
/// use chirpy_shared::store::memory::MemoryStore;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(Arc::new(MemoryStore::new()), config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::metrics::FileserverHitsLayer};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use chirpy_shared::{auth::middleware::create_jwt_middleware, store::Store};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Persistence port
    pub store: Arc<dyn Store>,

    /// Application configuration
    pub config: Arc<Config>,

    /// Requests served under `/app` since start or last reset
    pub fileserver_hits: Arc<AtomicU64>,
}

impl AppState {
    /// Creates new application state
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
            fileserver_hits: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    pub fn hits(&self) -> u64 {
        self.fileserver_hits.load(Ordering::Relaxed)
    }

    pub fn reset_hits(&self) {
        self.fileserver_hits.store(0, Ordering::Relaxed);
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /app/*                     # Static files (counted)
/// ├── /api/
/// │   ├── GET    /healthz        # Readiness (plain text)
/// │   ├── GET    /health         # Health with store status
/// │   ├── POST   /users          # Register
/// │   ├── PUT    /users          # Update own credentials (session)
/// │   ├── POST   /login
/// │   ├── POST   /refresh        # Refresh token -> session token
/// │   ├── POST   /revoke
/// │   ├── POST   /chirps         # (session)
/// │   ├── GET    /chirps
/// │   ├── GET    /chirps/:id
/// │   ├── DELETE /chirps/:id     # (session, owner only)
/// │   └── POST   /polka/webhooks # (ApiKey)
/// └── /admin/
///     ├── GET  /metrics
///     └── POST /reset            # dev platform only
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Session authentication (per-route basis)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Routes that need a valid session token
    let session_routes = Router::new()
        .route("/users", axum::routing::put(routes::users::update_user))
        .route("/chirps", post(routes::chirps::create_chirp))
        .route("/chirps/:chirp_id", axum::routing::delete(routes::chirps::delete_chirp))
        .route_layer(axum::middleware::from_fn(create_jwt_middleware(
            state.config.jwt.secret.clone(),
        )));

    let public_routes = Router::new()
        .route("/healthz", get(routes::health::readiness))
        .route("/health", get(routes::health::health_check))
        .route("/users", post(routes::users::create_user))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh))
        .route("/revoke", post(routes::auth::revoke))
        .route("/chirps", get(routes::chirps::list_chirps))
        .route("/chirps/:chirp_id", get(routes::chirps::get_chirp))
        .route("/polka/webhooks", post(routes::webhooks::polka_webhook));

    let admin_routes = Router::new()
        .route("/metrics", get(routes::admin::metrics))
        .route("/reset", post(routes::admin::reset));

    let fileserver = ServiceBuilder::new()
        .layer(FileserverHitsLayer::new(state.fileserver_hits.clone()))
        .service(ServeDir::new(&state.config.api.fileserver_root));

    Router::new()
        .nest("/api", public_routes.merge(session_routes))
        .nest("/admin", admin_routes)
        .nest_service("/app", fileserver)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config.api.cors_origins))
        .with_state(state)
}

/// Permissive when `*` is listed, otherwise only the configured origins
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600))
}
