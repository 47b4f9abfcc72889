use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use axum::{extract::State, response::Json};
use serde::Serialize;

use crate::config::PersistenceEnv;
use crate::probe::PersistenceProbe;
use crate::routes::AppState;

const MAX_COLLECTIONS: usize = 10;
const MAX_ERROR_CHARS: usize = 50;

/// Status report for the persistence collaborator. Every field is always present.
#[derive(Debug, Serialize, PartialEq)]
pub struct DiagnosticReport {
    pub backend: String,
    pub database: String,
    pub database_url: Option<String>,
    pub database_name: Option<String>,
    pub connection_status: String,
    pub collections: Vec<String>,
}

impl Default for DiagnosticReport {
    fn default() -> Self {
        DiagnosticReport {
            backend: "✅ Running".to_string(),
            database: "❌ Not Available".to_string(),
            database_url: None,
            database_name: None,
            connection_status: "Not Connected".to_string(),
            collections: Vec::new(),
        }
    }
}

fn truncate(message: &str) -> String {
    message.chars().take(MAX_ERROR_CHARS).collect()
}

/// Text carried by a panic payload (`panic!("..")` yields `&str` or `String`).
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn set_or_not(present: bool) -> String {
    let label = if present { "✅ Set" } else { "❌ Not Set" };
    label.to_string()
}

/// Fill in the database section of `report` from the probe.
fn inspect(probe: &dyn PersistenceProbe, report: &mut DiagnosticReport) {
    if !probe.is_installed() {
        report.database = "❌ Database module not found (run enable-database first)".to_string();
        return;
    }

    if !probe.is_available() {
        report.database = "⚠️  Available but not initialized".to_string();
        return;
    }

    report.database = "✅ Available".to_string();
    report.database_url = Some("✅ Configured".to_string());
    report.database_name = Some(probe.name().unwrap_or_else(|| "✅ Connected".to_string()));
    report.connection_status = "Connected".to_string();

    // A panic while listing is reported like an error, keeping the connected state.
    let listed = panic::catch_unwind(AssertUnwindSafe(|| probe.list_collections()))
        .map_err(|payload| panic_message(payload.as_ref()))
        .and_then(|result| result.map_err(|e| e.to_string()));

    match listed {
        Ok(collections) => {
            report.collections = collections.into_iter().take(MAX_COLLECTIONS).collect();
            report.database = "✅ Connected & Working".to_string();
        }
        Err(message) => {
            tracing::warn!("Persistence probe could not list collections: {}", message);
            report.database = format!("⚠️  Connected but Error: {}", truncate(&message));
        }
    }
}

/// Build the full report. Never fails; probe failures become status strings.
pub async fn build_report(state: AppState) -> DiagnosticReport {
    let probe = state.probe.clone();

    // The probe is synchronous and may block or panic; keep it off the runtime workers.
    let probed = tokio::task::spawn_blocking(move || {
        let mut report = DiagnosticReport::default();
        inspect(probe.as_ref(), &mut report);
        report
    })
    .await;

    let mut report = match probed {
        Ok(report) => report,
        Err(e) => {
            let message = if e.is_panic() {
                panic_message(e.into_panic().as_ref())
            } else {
                e.to_string()
            };
            tracing::warn!("Persistence probe failed: {}", message);
            DiagnosticReport {
                database: format!("❌ Error: {}", truncate(&message)),
                ..DiagnosticReport::default()
            }
        }
    };

    let PersistenceEnv {
        database_url,
        database_name,
    } = state.persistence;
    report.database_url = Some(set_or_not(database_url));
    report.database_name = Some(set_or_not(database_name));

    report
}

// GET /test - Check whether a database is available and accessible
pub async fn test_database(State(state): State<AppState>) -> Json<DiagnosticReport> {
    Json(build_report(state).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::ProbeError;
    use crate::routes::{router, test_support::get_json};
    use axum::http::StatusCode;
    use std::sync::Arc;

    const KEYS: [&str; 6] = [
        "backend",
        "database",
        "database_url",
        "database_name",
        "connection_status",
        "collections",
    ];

    struct FakeStore {
        available: bool,
        collections: Result<Vec<String>, &'static str>,
    }

    impl PersistenceProbe for FakeStore {
        fn is_available(&self) -> bool {
            self.available
        }

        fn name(&self) -> Option<String> {
            Some("scoreturk".to_string())
        }

        fn list_collections(&self) -> Result<Vec<String>, ProbeError> {
            self.collections
                .clone()
                .map_err(|msg| ProbeError::Query(msg.to_string()))
        }
    }

    fn store(available: bool, collections: Result<Vec<String>, &'static str>) -> FakeStore {
        FakeStore {
            available,
            collections,
        }
    }

    struct PanickingStore;

    impl PersistenceProbe for PanickingStore {
        fn is_available(&self) -> bool {
            panic!("driver exploded while checking availability")
        }

        fn list_collections(&self) -> Result<Vec<String>, ProbeError> {
            unreachable!()
        }
    }

    struct StalledCursorStore;

    impl PersistenceProbe for StalledCursorStore {
        fn is_available(&self) -> bool {
            true
        }

        fn list_collections(&self) -> Result<Vec<String>, ProbeError> {
            panic!("cursor timed out")
        }
    }

    fn state(probe: impl PersistenceProbe + 'static, env: PersistenceEnv) -> AppState {
        AppState::new(Arc::new(probe), env)
    }

    #[tokio::test]
    async fn endpoint_reports_all_keys_without_a_store() {
        let (status, json) = get_json(router(AppState::default()), "/test").await;

        assert_eq!(status, StatusCode::OK);
        let object = json.as_object().unwrap();
        for key in KEYS {
            assert!(object.contains_key(key), "missing key {key}");
        }
        assert_eq!(object.len(), KEYS.len());

        assert_eq!(json["backend"], "✅ Running");
        assert_eq!(json["database"], "❌ Database module not found (run enable-database first)");
        assert_eq!(json["database_url"], "❌ Not Set");
        assert_eq!(json["database_name"], "❌ Not Set");
        assert_eq!(json["connection_status"], "Not Connected");
        assert_eq!(json["collections"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn env_flags_override_probe_values() {
        let env = PersistenceEnv {
            database_url: true,
            database_name: false,
        };
        let report = build_report(state(store(true, Ok(vec![])), env)).await;

        assert_eq!(report.database_url.as_deref(), Some("✅ Set"));
        assert_eq!(report.database_name.as_deref(), Some("❌ Not Set"));
    }

    #[tokio::test]
    async fn uninitialized_store() {
        let report = build_report(state(store(false, Ok(vec![])), PersistenceEnv::default())).await;

        assert_eq!(report.database, "⚠️  Available but not initialized");
        assert_eq!(report.connection_status, "Not Connected");
    }

    #[tokio::test]
    async fn working_store_lists_first_ten_collections() {
        let names: Vec<String> = (0..12).map(|i| format!("c{i}")).collect();
        let report = build_report(state(store(true, Ok(names)), PersistenceEnv::default())).await;

        assert_eq!(report.database, "✅ Connected & Working");
        assert_eq!(report.connection_status, "Connected");
        assert_eq!(report.collections.len(), 10);
        assert_eq!(report.collections[9], "c9");
    }

    #[tokio::test]
    async fn collection_error_is_truncated() {
        let long = "connection reset by peer while reading the collection catalogue from primary";
        let report = build_report(state(store(true, Err(long)), PersistenceEnv::default())).await;

        let expected_error: String = format!("query failed: {long}").chars().take(50).collect();
        assert_eq!(report.database, format!("⚠️  Connected but Error: {expected_error}"));
        assert_eq!(report.connection_status, "Connected");
        assert!(report.collections.is_empty());
    }

    #[tokio::test]
    async fn panicking_probe_is_reported_not_raised() {
        let app = router(state(PanickingStore, PersistenceEnv::default()));
        let (status, json) = get_json(app, "/test").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["database"], "❌ Error: driver exploded while checking availability");
        assert_eq!(json["connection_status"], "Not Connected");
        assert_eq!(json["database_url"], "❌ Not Set");
        assert_eq!(json.as_object().unwrap().len(), KEYS.len());
    }

    #[tokio::test]
    async fn panic_while_listing_keeps_connected_state() {
        let report = build_report(state(StalledCursorStore, PersistenceEnv::default())).await;

        assert_eq!(report.database, "⚠️  Connected but Error: cursor timed out");
        assert_eq!(report.connection_status, "Connected");
        assert!(report.collections.is_empty());
        assert_eq!(report.database_name.as_deref(), Some("❌ Not Set"));
    }

    #[test]
    fn panic_message_reads_str_and_string_payloads() {
        let from_str = panic::catch_unwind(|| -> u8 { panic!("static text") }).unwrap_err();
        assert_eq!(panic_message(from_str.as_ref()), "static text");

        let from_string = panic::catch_unwind(|| -> u8 { panic!("code {}", 7) }).unwrap_err();
        assert_eq!(panic_message(from_string.as_ref()), "code 7");
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate(&"é".repeat(60)).chars().count(), 50);
        assert_eq!(truncate("short"), "short");
    }
}
