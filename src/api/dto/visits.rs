//! DTOs for the visit batch endpoint.
//!
//! The envelope mirrors what a queue-triggered function receives: a list of
//! `Records`, each with a `messageId`, a string `body` and transport
//! `attributes`. The response lists the records to redeliver.

use serde::{Deserialize, Serialize};

use crate::application::services::BatchReport;
use crate::domain::visit_event::VisitMessage;

/// An envelope without `Records` is an empty batch.
#[derive(Debug, Deserialize)]
pub struct VisitBatchRequest {
    #[serde(rename = "Records", default)]
    pub records: Vec<VisitRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitRecord {
    pub message_id: String,
    pub body: String,
    #[serde(default)]
    pub attributes: RecordAttributes,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecordAttributes {
    #[serde(rename = "ApproximateReceiveCount")]
    pub approximate_receive_count: Option<String>,
}

impl VisitRecord {
    /// Missing or unparseable receive counts are taken as a first delivery.
    pub fn receive_count(&self) -> u32 {
        self.attributes
            .approximate_receive_count
            .as_deref()
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .unwrap_or(1)
            .max(1)
    }
}

impl From<VisitRecord> for VisitMessage {
    fn from(record: VisitRecord) -> Self {
        let receive_count = record.receive_count();
        VisitMessage::new(record.message_id, record.body).with_receive_count(receive_count)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitBatchResponse {
    pub batch_item_failures: Vec<BatchItemFailure>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemFailure {
    pub item_identifier: String,
}

impl From<&BatchReport> for VisitBatchResponse {
    fn from(report: &BatchReport) -> Self {
        Self {
            batch_item_failures: report
                .failed_message_ids()
                .into_iter()
                .map(|item_identifier| BatchItemFailure { item_identifier })
                .collect(),
        }
    }
}
