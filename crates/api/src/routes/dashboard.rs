//! Admin dashboard metrics route.

use axum::{extract::State, response::IntoResponse, Json};

use persistence::repositories::{DashboardRepository, YearRepository};

use crate::app::AppState;
use crate::error::ApiError;

/// GET /api/v1/admin/dashboard
///
/// Aggregate counts for the active year: registrant totals, catalog sizes,
/// per-activity registration counts and the 14-day registration trend.
/// All zeroes when no year is active.
pub async fn get_dashboard(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let years = YearRepository::new(state.pool.clone());
    let active_year_id = years.find_active().await?.map(|year| year.id);

    let repo = DashboardRepository::new(state.pool.clone());
    let metrics = repo.get_metrics(active_year_id).await?;

    Ok(Json(metrics))
}
