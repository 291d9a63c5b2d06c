//! Activity log API routes. Super admin only.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};

use domain::models::{ActivityLog, ActivityLogPage, ListLogsQuery};
use persistence::repositories::ActivityLogRepository;
use shared::pagination::{decode_cursor, encode_cursor};

use crate::app::AppState;
use crate::error::ApiError;

/// GET /api/v1/admin/logs
///
/// Page through the activity log, newest first. `limit` defaults to 50 and
/// caps at 100; `cursor` comes from the previous page's `nextCursor`.
pub async fn list_logs(
    State(state): State<AppState>,
    Query(query): Query<ListLogsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = query.effective_limit();
    let after = match query.cursor.as_deref() {
        Some(cursor) => Some(
            decode_cursor(cursor)
                .map_err(|_| ApiError::Validation("Invalid cursor".to_string()))?,
        ),
        None => None,
    };

    let repo = ActivityLogRepository::new(state.pool.clone());
    let entities = repo.list(limit, after).await?;

    let next_cursor = if entities.len() as i64 == limit {
        entities
            .last()
            .map(|entry| encode_cursor(entry.created_at, entry.id))
    } else {
        None
    };

    let entries: Vec<ActivityLog> = entities.into_iter().map(Into::into).collect();

    Ok(Json(ActivityLogPage {
        entries,
        next_cursor,
    }))
}
