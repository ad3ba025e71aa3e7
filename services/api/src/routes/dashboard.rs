//! Organization-wide dashboard

use axum::{Json, extract::State};
use reporting::stats::{DashboardSummary, dashboard_summary};

use super::internal;
use crate::{error::ApiResult, models::ApiResponse, state::AppState};

/// Cross-entity summary over every user's records
pub async fn summary(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<DashboardSummary>>> {
    let energy = state
        .energy_repository
        .list_all()
        .await
        .map_err(internal("Failed to fetch dashboard summary"))?;
    let waste = state
        .waste_repository
        .list_all()
        .await
        .map_err(internal("Failed to fetch dashboard summary"))?;

    Ok(Json(ApiResponse::ok(dashboard_summary(&energy, &waste))))
}
