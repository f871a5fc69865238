use axum::{body::Bytes, extract::State, routing::post, Json, Router};
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::models::RelayConfig;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub success: bool,
    pub message: String,
}

pub fn relay_routes() -> Router<AppState> {
    Router::new().route("/config", post(set_relay_config))
}

/// POST /api/config - Set (or replace) the relay configuration
async fn set_relay_config(State(state): State<AppState>, body: Bytes) -> Result<Json<ConfigResponse>> {
    let payload: Value = serde_json::from_slice(&body)?;
    let relay_config = RelayConfig::from_payload(&payload)?;

    tracing::info!(
        host = %relay_config.host(),
        port = relay_config.port(),
        user = %relay_config.user(),
        "Relay configuration set"
    );

    state.set_relay_config(relay_config).await;

    Ok(Json(ConfigResponse {
        success: true,
        message: "Email configuration set successfully".to_string(),
    }))
}
