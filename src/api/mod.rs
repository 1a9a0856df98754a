mod handlers;
mod middleware;
mod types;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::catalog::Catalog;
use crate::db::Database;
use crate::sink::DatabaseSink;
use crate::survey::{LogCelebration, SessionStore, SurveyController};

pub use middleware::{RateLimiter, SecurityConfig};
pub use types::*;

/// Shared state behind every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub sessions: SessionStore,
    pub controller: SurveyController,
}

impl AppState {
    /// Sessions submit straight into `db`.
    pub fn new(db: Database, catalog: Arc<Catalog>) -> Self {
        let controller = SurveyController::new(Arc::new(DatabaseSink::new(db.clone())))
            .with_celebration(Arc::new(LogCelebration));
        Self::with_controller(db, catalog, controller)
    }

    pub fn with_controller(db: Database, catalog: Arc<Catalog>, controller: SurveyController) -> Self {
        Self {
            db,
            sessions: SessionStore::new(catalog),
            controller,
        }
    }
}

/// Router over the built-in course survey with no CORS or rate limits.
pub fn create_router(db: Database) -> Router {
    let state = AppState::new(db, Arc::new(Catalog::course_survey()));
    create_router_with_config(state, SecurityConfig::disabled())
}

pub fn create_router_with_config(state: AppState, config: SecurityConfig) -> Router {
    let mut writes = Router::new()
        // Submission entry point
        .route("/feedback", post(handlers::submit_feedback))
        // Sessions
        .route("/sessions", post(handlers::create_session))
        .route("/sessions/{id}/identity", post(handlers::begin_survey))
        .route("/sessions/{id}/answers/{question_id}", put(handlers::record_answer))
        .route("/sessions/{id}/advance", post(handlers::advance))
        .route("/sessions/{id}/start-over", post(handlers::start_over));

    if let Some(limiter) = config.rate_limiter.clone() {
        writes = writes.route_layer(axum::middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    let reads = Router::new()
        .route("/questions", get(handlers::list_questions))
        .route("/sessions/{id}", get(handlers::get_session))
        .route("/sessions/{id}", delete(handlers::delete_session))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", writes.merge(reads))
        .layer(TraceLayer::new_for_http())
        .layer(config.cors_layer())
        .with_state(state)
}
