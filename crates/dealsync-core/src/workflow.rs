use crate::basecamp::ProjectHost;
use crate::debuglog::DebugLog;
use crate::event::DealEvent;
use crate::hubspot::HubSpotClient;
use crate::record::{ProjectRecord, DEFAULT_PROJECT_NAME};
use crate::store::ProjectStore;

// ---------------------------------------------------------------------------
// EventOutcome
// ---------------------------------------------------------------------------

/// Terminal state of one event's run through the reconcile state machine.
#[derive(Debug, Clone)]
pub enum EventOutcome {
    /// Not a `dealstage → closedwon` transition; no side effect.
    Ignored,
    /// A record for this deal already exists; no side effect.
    Duplicate,
    /// Project created and recorded.
    Created(ProjectRecord),
    /// An outbound call failed; nothing written, siblings unaffected.
    Failed(String),
}

impl EventOutcome {
    pub fn state(&self) -> &'static str {
        match self {
            Self::Ignored => "ignored",
            Self::Duplicate => "duplicate",
            Self::Created(_) => "created",
            Self::Failed(_) => "failed",
        }
    }
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

/// Event-to-project reconciliation: filter, dedup, enrich, create, persist.
///
/// Per-event errors are contained — the webhook acknowledgement has already
/// gone out by the time this runs, so an outcome is only observable through
/// logs, the debug buffer, and the store itself.
pub struct Workflow {
    store: ProjectStore,
    crm: Option<HubSpotClient>,
    host: ProjectHost,
    log: DebugLog,
}

impl Workflow {
    pub fn new(store: ProjectStore, crm: Option<HubSpotClient>, host: ProjectHost) -> Self {
        Self {
            store,
            crm,
            host,
            log: DebugLog::default(),
        }
    }

    pub fn store(&self) -> &ProjectStore {
        &self.store
    }

    pub fn log(&self) -> &DebugLog {
        &self.log
    }

    /// Process a batch sequentially. Outcomes align with `events` by index;
    /// one event failing never blocks or rolls back its siblings.
    pub async fn process_batch(&self, events: &[DealEvent]) -> Vec<EventOutcome> {
        let mut outcomes = Vec::with_capacity(events.len());
        for event in events {
            outcomes.push(self.process_event(event).await);
        }
        outcomes
    }

    pub async fn process_event(&self, event: &DealEvent) -> EventOutcome {
        if !event.is_closed_won() {
            return EventOutcome::Ignored;
        }
        let deal_id = event.object_id.to_string();

        if self.store.contains_deal(&deal_id) {
            tracing::info!(deal_id = %deal_id, "deal already reconciled, skipping");
            self.log.push(format!("deal {deal_id}: duplicate, skipped"));
            return EventOutcome::Duplicate;
        }

        // Enrich from the CRM when a token is configured. A configured-but-
        // failing CRM fails the event; only the absence of a token falls
        // back to defaults.
        let (name, amount) = match &self.crm {
            Some(crm) => match crm.fetch_deal(&deal_id).await {
                Ok(deal) => (deal.name, deal.amount),
                Err(e) => {
                    tracing::warn!(deal_id = %deal_id, error = %e, "deal lookup failed");
                    self.log.push(format!("deal {deal_id}: lookup failed ({e})"));
                    return EventOutcome::Failed(e.to_string());
                }
            },
            None => (DEFAULT_PROJECT_NAME.to_string(), 0.0),
        };

        let description = format!("Created from HubSpot deal {deal_id} (amount: {amount})");
        let created = match self.host.create_project(&name, &description).await {
            Ok(created) => created,
            Err(e) => {
                tracing::warn!(deal_id = %deal_id, error = %e, "project creation failed");
                self.log
                    .push(format!("deal {deal_id}: project creation failed ({e})"));
                return EventOutcome::Failed(e.to_string());
            }
        };

        let record = ProjectRecord::new(created.id, name, deal_id.clone(), amount);
        self.store.append(record.clone());
        tracing::info!(deal_id = %deal_id, project_id = record.id, "project created");
        self.log
            .push(format!("deal {deal_id}: created project {}", record.id));
        EventOutcome::Created(record)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
