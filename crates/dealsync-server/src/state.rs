use crate::worker::{self, BatchReport};
use dealsync_core::config::Config;
use dealsync_core::event::DealEvent;
use dealsync_core::hubspot::HubSpotClient;
use dealsync_core::store::ProjectStore;
use dealsync_core::workflow::Workflow;
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, mpsc};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: ProjectStore,
    pub workflow: Arc<Workflow>,
    pub hubspot: Option<HubSpotClient>,
    /// Inbound webhook batches, drained by the reconcile worker.
    pub job_tx: mpsc::Sender<Vec<DealEvent>>,
    /// Per-batch outcome reports from the worker.
    pub report_tx: broadcast::Sender<BatchReport>,
    /// OAuth `state` parameter issued on the last authorize redirect.
    pub oauth_state: Arc<Mutex<Option<String>>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store = ProjectStore::new(config.store_path());
        let hubspot = config.hubspot_client();
        let workflow = Arc::new(Workflow::new(
            store.clone(),
            hubspot.clone(),
            config.project_host(),
        ));

        let (job_tx, job_rx) = mpsc::channel(64);
        let (report_tx, _) = broadcast::channel(64);

        // Guard: only spawn if inside a Tokio runtime (skipped in sync unit
        // tests; without the worker, enqueued batches are simply dropped).
        if tokio::runtime::Handle::try_current().is_ok() {
            worker::spawn(workflow.clone(), job_rx, report_tx.clone());
        }

        Self {
            config,
            store,
            workflow,
            hubspot,
            job_tx,
            report_tx,
            oauth_state: Arc::new(Mutex::new(None)),
        }
    }
}
