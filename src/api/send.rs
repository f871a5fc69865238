use axum::{body::Bytes, extract::State, routing::post, Json, Router};
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::models::{BulkResult, BulkSummary, SendRequest};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub success: bool,
    pub results: BulkResult,
    pub summary: BulkSummary,
}

pub fn send_routes() -> Router<AppState> {
    Router::new().route("/send", post(send_bulk))
}

/// POST /api/send - Send one message to every listed recipient
async fn send_bulk(State(state): State<AppState>, body: Bytes) -> Result<Json<SendResponse>> {
    // Checked before the body is parsed
    let relay_config = state.relay_config().await?;

    let payload: Value = serde_json::from_slice(&body)?;
    let request = SendRequest::from_payload(&payload)?;

    tracing::info!(
        recipients = request.recipients.len(),
        attachments = request.attachments.len(),
        "Starting bulk send"
    );

    let results = state.dispatcher.send_bulk(&relay_config, &request).await;
    let summary = results.summary();

    Ok(Json(SendResponse {
        success: true,
        results,
        summary,
    }))
}
