use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::ServiceError;
use crate::state::AppState;

// POST /api/admin/login
#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<Value>, ServiceError> {
    let req: LoginRequest = serde_json::from_str(&body)
        .map_err(|e| ServiceError::MalformedRequest(format!("Malformed request body: {e}")))?;

    if !state.credentials.verify(&req.username, &req.password) {
        tracing::warn!("admin login failed");
        return Err(ServiceError::InvalidCredentials);
    }

    tracing::info!("admin login");
    Ok(Json(json!({ "success": true })))
}
