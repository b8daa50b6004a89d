//! Visit counting service fed by the queueing transport.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use metrics::counter;
use tracing::{debug, error, info, warn};

use crate::domain::repositories::{MappingRepository, with_store_timeout};
use crate::domain::visit_event::VisitMessage;

/// Tuning knobs for batch processing.
#[derive(Debug, Clone, Copy)]
pub struct VisitCountSettings {
    pub store_timeout: Duration,
    /// Messages processed at the same time within one batch.
    pub concurrency: usize,
    /// Deliveries after which a failing message stops being redelivered.
    pub max_receive_count: u32,
}

impl Default for VisitCountSettings {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_secs(2),
            concurrency: 8,
            max_receive_count: 5,
        }
    }
}

/// What happened to one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    Counted {
        message_id: String,
        short_code: String,
        visit_count: i64,
    },
    /// Reported back so the transport redelivers it.
    Failed {
        message_id: String,
        reason: String,
        permanent: bool,
    },
    /// Failed on its last allowed delivery; logged and dropped.
    DeadLettered { message_id: String, reason: String },
}

impl EventOutcome {
    pub fn message_id(&self) -> &str {
        match self {
            Self::Counted { message_id, .. }
            | Self::Failed { message_id, .. }
            | Self::DeadLettered { message_id, .. } => message_id,
        }
    }
}

/// Per-message outcomes for one batch, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub outcomes: Vec<EventOutcome>,
}

impl BatchReport {
    /// Identifiers the transport should redeliver.
    pub fn failed_message_ids(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, EventOutcome::Failed { .. }))
            .map(|o| o.message_id().to_string())
            .collect()
    }

    pub fn counted(&self) -> usize {
        self.count(|o| matches!(o, EventOutcome::Counted { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, EventOutcome::Failed { .. }))
    }

    pub fn dead_lettered(&self) -> usize {
        self.count(|o| matches!(o, EventOutcome::DeadLettered { .. }))
    }

    fn count(&self, pred: impl Fn(&EventOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }
}

struct VisitFailure {
    reason: String,
    permanent: bool,
}

/// Applies visit increments for batches of transport messages.
///
/// Each message is isolated: a failure is recorded for that message only and
/// never stops its siblings. The store's atomic add makes increments order
/// independent, so messages are processed concurrently.
pub struct VisitCountService<M: MappingRepository + ?Sized> {
    repository: Arc<M>,
    settings: VisitCountSettings,
}

impl<M: MappingRepository + ?Sized> VisitCountService<M> {
    /// Creates a new visit count service.
    pub fn new(repository: Arc<M>, settings: VisitCountSettings) -> Self {
        Self {
            repository,
            settings,
        }
    }

    /// Processes every message of a batch and reports per-message outcomes.
    ///
    /// # Redelivery
    ///
    /// Failures are reported for redelivery until a message reaches
    /// `max_receive_count` deliveries. At that point it is dead-lettered:
    /// logged with its body, counted, and left out of the failure list.
    pub async fn process_batch(&self, messages: Vec<VisitMessage>) -> BatchReport {
        let total = messages.len();

        let outcomes: Vec<EventOutcome> = stream::iter(messages)
            .map(|message| self.process_message(message))
            .buffered(self.settings.concurrency.max(1))
            .collect()
            .await;

        let report = BatchReport { outcomes };

        info!(
            total,
            counted = report.counted(),
            failed = report.failed(),
            dead_lettered = report.dead_lettered(),
            "Processed visit batch"
        );

        report
    }

    async fn process_message(&self, message: VisitMessage) -> EventOutcome {
        match self.count_visit(&message).await {
            Ok((short_code, visit_count)) => {
                counter!("visits_counted_total").increment(1);
                debug!(
                    message_id = %message.message_id,
                    %short_code,
                    visit_count,
                    "Visit counted"
                );

                EventOutcome::Counted {
                    message_id: message.message_id,
                    short_code,
                    visit_count,
                }
            }
            Err(failure) => self.fail(message, failure),
        }
    }

    async fn count_visit(&self, message: &VisitMessage) -> Result<(String, i64), VisitFailure> {
        let event = message.parse_event().map_err(|reason| VisitFailure {
            reason,
            permanent: true,
        })?;

        debug!(
            message_id = %message.message_id,
            short_code = %event.short_code,
            timestamp = ?event.timestamp,
            "Processing visit event"
        );

        let visit_count = with_store_timeout(
            self.settings.store_timeout,
            self.repository.increment_visit_count(&event.short_code),
        )
        .await
        .map_err(|e| VisitFailure {
            permanent: e.is_permanent(),
            reason: e.to_string(),
        })?;

        Ok((event.short_code, visit_count))
    }

    fn fail(&self, message: VisitMessage, failure: VisitFailure) -> EventOutcome {
        if message.receive_count >= self.settings.max_receive_count {
            counter!("visits_dead_lettered_total").increment(1);
            error!(
                message_id = %message.message_id,
                receive_count = message.receive_count,
                body = %message.body,
                reason = %failure.reason,
                "Dead-lettering visit event"
            );

            return EventOutcome::DeadLettered {
                message_id: message.message_id,
                reason: failure.reason,
            };
        }

        counter!("visits_failed_total").increment(1);
        warn!(
            message_id = %message.message_id,
            receive_count = message.receive_count,
            permanent = failure.permanent,
            reason = %failure.reason,
            "Visit event failed"
        );

        EventOutcome::Failed {
            message_id: message.message_id,
            reason: failure.reason,
            permanent: failure.permanent,
        }
    }
}
