use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::config::PersistenceEnv;
use crate::probe::{NoopProbe, PersistenceProbe};

pub mod diagnostics;
pub mod health;
pub mod matches;
pub mod predictions;
pub mod standings;

/// Shared, read-only handler state. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub probe: Arc<dyn PersistenceProbe>,
    pub persistence: PersistenceEnv,
}

impl AppState {
    pub fn new(probe: Arc<dyn PersistenceProbe>, persistence: PersistenceEnv) -> Self {
        AppState {
            probe,
            persistence,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        AppState::new(Arc::new(NoopProbe), PersistenceEnv::default())
    }
}

#[derive(Serialize)]
pub struct RootMessage {
    message: &'static str,
}

// GET / - Liveness message
pub async fn root() -> Json<RootMessage> {
    Json(RootMessage {
        message: "SCORETURK Backend Running",
    })
}

pub fn router(state: AppState) -> Router {
    Router::new()
        // Root and health
        .route("/", get(root))
        .route("/health", get(health::health_check))

        // Sample data endpoints
        .route("/api/live", get(matches::get_live_matches))
        .route("/api/match/{match_id}", get(matches::get_match))
        .route("/api/standings", get(standings::get_standings))
        .route("/api/predictions", get(predictions::get_predictions))

        // Diagnostics
        .route("/test", get(diagnostics::test_database))

        .with_state(state)
}
