use axum::{extract::Query, response::Json};
use serde::Deserialize;

use crate::error::ApiError;
use crate::models::{validate_all, StandingRow};
use crate::sample::{self, DEFAULT_LEAGUE};

// Query parameters for the league table
#[derive(Deserialize)]
pub struct StandingsQuery {
    #[serde(default)]
    league: Option<String>,
}

// GET /api/standings?league=La Liga - League table
pub async fn get_standings(
    Query(params): Query<StandingsQuery>,
) -> Result<Json<Vec<StandingRow>>, ApiError> {
    // Only one sample table exists; the requested league does not change it.
    let league = params.league.as_deref().unwrap_or(DEFAULT_LEAGUE);
    tracing::debug!("Serving sample standings for league {}", league);

    let table = sample::sample_standings();
    validate_all(&table)?;

    Ok(Json(table))
}
