use axum::{extract::State, Extension, Json};
use ytsent_core::AgentProfile;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState};

pub(super) async fn get_profile(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<AgentProfile>>, ApiError> {
    let profile = state
        .profile
        .as_deref()
        .cloned()
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "no agent profile configured"))?;
    Ok(Json(ApiResponse::new(profile, req_id.0)))
}
