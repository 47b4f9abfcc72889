use axum::{extract::Path, response::Json};
use chrono::Utc;

use crate::error::ApiError;
use crate::models::{validate_all, Match, Validated};
use crate::sample;

// GET /api/live - Matches currently in play
pub async fn get_live_matches() -> Result<Json<Vec<Match>>, ApiError> {
    let matches = vec![sample::sample_match(Utc::now())];
    validate_all(&matches)?;

    Ok(Json(matches))
}

// GET /api/match/{match_id} - Single match
//
// There is only one sample match, so every id resolves to it.
pub async fn get_match(Path(match_id): Path<String>) -> Result<Json<Match>, ApiError> {
    tracing::debug!("Serving sample match for id {}", match_id);

    let sample = sample::sample_match(Utc::now());
    sample.validate()?;

    Ok(Json(sample))
}
