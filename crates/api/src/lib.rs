//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes
//! - Authentication middleware
//! - Request extractors and the response envelope
//! - Spreadsheet reading and rendering
//! - Background workers for notifications and queued imports

pub mod error;
pub mod events;
pub mod extractors;
pub mod imports;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod spreadsheet;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use hrms_core::cache::StatsCache;
use hrms_shared::{AppConfig, ImportConfig, JwtConfig, JwtService};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::events::EventBus;
use crate::imports::ImportQueue;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Upload limits.
    pub import: ImportConfig,
    /// Cached statistics payloads.
    pub cache: StatsCache,
    /// Publishes domain events to the notification subscriber.
    pub events: EventBus,
    /// Hands large uploads to the background import worker.
    pub imports: ImportQueue,
}

impl AppState {
    /// Builds the state and spawns the notification and import workers.
    ///
    /// Must be called inside a Tokio runtime.
    #[must_use]
    pub fn new(db: DatabaseConnection, config: &AppConfig) -> Self {
        let jwt_service = JwtService::new(JwtConfig {
            secret: config.jwt.secret.clone(),
            access_token_expires_minutes: i64::try_from(config.jwt.access_token_expiry_secs / 60)
                .unwrap_or(i64::MAX),
        });
        let db = Arc::new(db);
        let cache = StatsCache::new(config.cache.max_capacity, config.cache.stats_ttl_secs);
        let events = events::spawn_subscriber(Arc::clone(&db));
        let imports = imports::spawn_worker(Arc::clone(&db), cache.clone(), events.clone());

        Self {
            db,
            jwt_service: Arc::new(jwt_service),
            import: config.import.clone(),
            cache,
            events,
            imports,
        }
    }

    /// Owned connection handle for repositories.
    #[must_use]
    pub fn conn(&self) -> DatabaseConnection {
        (*self.db).clone()
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    // Multipart bodies are capped by the upload handler; leave headroom for the envelope.
    let body_limit = state.import.max_upload_bytes.saturating_add(64 * 1024);

    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
