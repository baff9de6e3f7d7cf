use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Deal stage property watched on inbound events.
pub const DEAL_STAGE_PROPERTY: &str = "dealstage";
/// Stage value that triggers project creation.
pub const CLOSED_WON: &str = "closedwon";

// ---------------------------------------------------------------------------
// DealId
// ---------------------------------------------------------------------------

/// Canonical string form of a CRM deal identifier.
///
/// HubSpot sends `objectId` as either a JSON number or a string depending on
/// the subscription type; both normalize to the same string here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DealId(String);

impl DealId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DealId {
    fn default() -> Self {
        Self("unknown".to_string())
    }
}

impl fmt::Display for DealId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DealId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl<'de> Deserialize<'de> for DealId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Str(String),
            Num(serde_json::Number),
        }
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Str(s) => Self(s),
            Raw::Num(n) => Self(n.to_string()),
        })
    }
}

// ---------------------------------------------------------------------------
// DealEvent
// ---------------------------------------------------------------------------

/// One inbound CRM webhook event. Untrusted; every field missing from the
/// wire falls back to a default instead of failing the parse.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DealEvent {
    pub object_id: DealId,
    pub property_name: String,
    pub property_value: String,
    pub subscription_type: String,
}

impl DealEvent {
    /// True only for a `dealstage` transition into `closedwon` — the sole
    /// trigger condition for project creation.
    pub fn is_closed_won(&self) -> bool {
        self.property_name == DEAL_STAGE_PROPERTY && self.property_value == CLOSED_WON
    }

    /// Canonical closed-won event, used by the manual test trigger.
    pub fn closed_won(deal_id: &str) -> Self {
        Self {
            object_id: DealId::from(deal_id),
            property_name: DEAL_STAGE_PROPERTY.to_string(),
            property_value: CLOSED_WON.to_string(),
            subscription_type: "deal.propertyChange".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// WebhookPayload
// ---------------------------------------------------------------------------

/// HubSpot posts subscription events as an array, but single-object bodies
/// appear in manual tests and older app configurations. Both are valid.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WebhookPayload {
    Batch(Vec<DealEvent>),
    Single(DealEvent),
}

impl WebhookPayload {
    pub fn into_events(self) -> Vec<DealEvent> {
        match self {
            Self::Batch(events) => events,
            Self::Single(event) => vec![event],
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
