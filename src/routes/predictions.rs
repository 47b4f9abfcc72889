use axum::response::Json;

use crate::error::ApiError;
use crate::models::{validate_all, Prediction};
use crate::sample;

// GET /api/predictions - Model predictions with suggested bets
pub async fn get_predictions() -> Result<Json<Vec<Prediction>>, ApiError> {
    let predictions = sample::sample_predictions();
    validate_all(&predictions)?;

    Ok(Json(predictions))
}
