//! Land-cover processing route

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::{extract::State, Json};
use smartcity_nexus_shared::types::{BoundingBox, LandCoverReport, ProcessRequest};
use smartcity_nexus_shared::validation::validate_bounds;
use tracing::info;

/// Analyse land cover inside a bounding box
///
/// POST /process
pub async fn process(
    State(state): State<AppState>,
    Json(req): Json<ProcessRequest>,
) -> ApiResult<Json<LandCoverReport>> {
    let bbox = BoundingBox::from_array(req.bounds);
    validate_bounds(&bbox).map_err(ApiError::Validation)?;

    let report = state.geo().land_cover(bbox).await?;

    info!(
        ?bbox,
        samples = report.population_data.date.len(),
        "Land-cover analysis completed"
    );
    Ok(Json(report))
}
