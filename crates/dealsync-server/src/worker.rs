use dealsync_core::event::DealEvent;
use dealsync_core::workflow::{EventOutcome, Workflow};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

// ---------------------------------------------------------------------------
// BatchReport
// ---------------------------------------------------------------------------

/// Published on the broadcast channel after each batch finishes, so that
/// "response sent" and "batch processed" are two separately observable
/// events. The webhook acknowledgement never waits for this.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub outcomes: Vec<EventReport>,
}

#[derive(Debug, Clone)]
pub struct EventReport {
    pub deal_id: String,
    pub state: &'static str,
}

// ---------------------------------------------------------------------------
// Worker
// ---------------------------------------------------------------------------

/// Spawn the reconcile worker: a single task that owns the workflow and
/// drains webhook batches sequentially. All store writes funnel through
/// here, which makes it the serialization point in front of the flat file.
pub fn spawn(
    workflow: Arc<Workflow>,
    mut jobs: mpsc::Receiver<Vec<DealEvent>>,
    reports: broadcast::Sender<BatchReport>,
) {
    tokio::spawn(async move {
        while let Some(batch) = jobs.recv().await {
            let outcomes = workflow.process_batch(&batch).await;
            let report = BatchReport {
                outcomes: batch
                    .iter()
                    .zip(&outcomes)
                    .map(|(event, outcome)| EventReport {
                        deal_id: event.object_id.to_string(),
                        state: outcome.state(),
                    })
                    .collect(),
            };
            tracing::debug!(events = report.outcomes.len(), "batch reconciled");
            // Nobody listening is fine; reports exist for tests and tooling.
            let _ = reports.send(report);
        }
    });
}
