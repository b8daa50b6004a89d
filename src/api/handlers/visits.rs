//! Handler for transport-delivered visit batches.

use axum::{Json, body::Bytes, extract::State};

use crate::api::dto::visits::{VisitBatchRequest, VisitBatchResponse};
use crate::domain::visit_event::VisitMessage;
use crate::error::AppError;
use crate::state::AppState;

/// Counts visits for a batch of queue messages.
///
/// # Endpoint
///
/// `POST /visits/batch`
///
/// # Response
///
/// Always 200 once the envelope parses. Messages that should be redelivered
/// are listed by id; everything else in the batch is considered consumed.
///
/// ```json
/// { "batchItemFailures": [ { "itemIdentifier": "msg-3" } ] }
/// ```
///
/// # Errors
///
/// An envelope that cannot be parsed fails the whole batch with 500 so the
/// transport retries all of it.
pub async fn visit_batch_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<VisitBatchResponse>, AppError> {
    let request: VisitBatchRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::internal(format!("malformed visit batch envelope: {}", e)))?;

    let messages: Vec<VisitMessage> = request.records.into_iter().map(Into::into).collect();

    let report = state.visit_service.process_batch(messages).await;

    Ok(Json(VisitBatchResponse::from(&report)))
}
