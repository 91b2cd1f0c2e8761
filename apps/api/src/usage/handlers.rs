use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

use super::{self as usage, Identity, UsageSnapshot};

/// GET /api/v1/usage/:client_id — remaining quota for an anonymous client.
pub async fn get_usage(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
) -> Result<Json<UsageSnapshot>, AppError> {
    let snapshot =
        usage::snapshot(state.store.as_ref(), &Identity::Anonymous { client_id }).await?;
    Ok(Json(snapshot))
}
