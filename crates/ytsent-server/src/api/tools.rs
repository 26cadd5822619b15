use axum::{
    body::Bytes,
    extract::{Path, State},
    Extension, Json,
};
use serde_json::Value;
use ytsent_sentiment::{ToolDefinition, ToolError, ToolOutput};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState};

pub(super) async fn list_tools(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<ToolDefinition>>> {
    Json(ApiResponse::new(state.registry.definitions(), req_id.0))
}

/// Run one tool. Domain failures come back as `200` with `is_error: true`;
/// only malformed calls are HTTP errors.
pub(super) async fn invoke_tool(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<ApiResponse<ToolOutput>>, ApiError> {
    let arguments = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            ApiError::new(
                req_id.0.clone(),
                "validation_error",
                format!("request body is not valid JSON: {e}"),
            )
        })?
    };

    let output = state
        .registry
        .execute(&name, arguments)
        .await
        .map_err(|e| map_tool_error(req_id.0.clone(), &e))?;

    tracing::info!(tool = %name, is_error = output.is_error, "tool call finished");
    Ok(Json(ApiResponse::new(output, req_id.0)))
}

fn map_tool_error(request_id: String, error: &ToolError) -> ApiError {
    match error {
        ToolError::UnknownTool(_) => ApiError::new(request_id, "not_found", error.to_string()),
        ToolError::InvalidArguments { .. } => {
            ApiError::new(request_id, "validation_error", error.to_string())
        }
    }
}
