use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name used when the CRM cannot be queried for the real deal name.
pub const DEFAULT_PROJECT_NAME: &str = "New Project";
/// Origin tag stamped on every record this system creates.
pub const SOURCE_HUBSPOT: &str = "hubspot";

// ---------------------------------------------------------------------------
// ProjectStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Created,
}

// ---------------------------------------------------------------------------
// ProjectRecord
// ---------------------------------------------------------------------------

/// One created project, written exactly once and never mutated. The wire and
/// file form is camelCase to match what the CRM integration historically
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    /// Host-assigned project id, or a time-derived local fallback in mock mode.
    pub id: i64,
    pub name: String,
    pub deal_id: String,
    pub amount: f64,
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub status: ProjectStatus,
}

impl ProjectRecord {
    pub fn new(id: i64, name: impl Into<String>, deal_id: impl Into<String>, amount: f64) -> Self {
        Self {
            id,
            name: name.into(),
            deal_id: deal_id.into(),
            amount: clamp_amount(amount),
            source: SOURCE_HUBSPOT.to_string(),
            created_at: Utc::now(),
            status: ProjectStatus::Created,
        }
    }
}

/// Invariant: `amount` is always a finite non-negative number. Anything the
/// upstream sends that violates that coerces to 0 rather than failing.
pub fn clamp_amount(amount: f64) -> f64 {
    if amount.is_finite() && amount >= 0.0 {
        amount
    } else {
        0.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
