use crate::error::{Result, SyncError};
use crate::record::{clamp_amount, DEFAULT_PROJECT_NAME};
use serde::Deserialize;
use serde_json::json;
use std::fmt;

const DEFAULT_HUBSPOT_API_URL: &str = "https://api.hubapi.com";
const DEAL_PROPERTIES: &str = "dealname,amount,dealstage,closedate";

// ---------------------------------------------------------------------------
// DealDetails
// ---------------------------------------------------------------------------

/// Properties of a single CRM deal, normalized from HubSpot's wire shape.
#[derive(Debug, Clone)]
pub struct DealDetails {
    pub id: String,
    pub name: String,
    pub amount: f64,
    pub stage: Option<String>,
    pub close_date: Option<String>,
}

#[derive(Deserialize)]
struct DealResponse {
    id: String,
    #[serde(default)]
    properties: DealProperties,
}

#[derive(Default, Deserialize)]
struct DealProperties {
    dealname: Option<String>,
    amount: Option<String>,
    dealstage: Option<String>,
    closedate: Option<String>,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<DealResponse>,
}

impl From<DealResponse> for DealDetails {
    fn from(deal: DealResponse) -> Self {
        // HubSpot sends amount as a string property; anything unparseable
        // counts as 0 rather than failing the deal.
        let amount = deal
            .properties
            .amount
            .as_deref()
            .and_then(|a| a.parse::<f64>().ok())
            .map(clamp_amount)
            .unwrap_or(0.0);
        Self {
            id: deal.id,
            name: deal
                .properties
                .dealname
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string()),
            amount,
            stage: deal.properties.dealstage,
            close_date: deal.properties.closedate,
        }
    }
}

// ---------------------------------------------------------------------------
// HubSpotClient
// ---------------------------------------------------------------------------

/// Authenticated reader for the HubSpot CRM API. Only constructed when an
/// access token is configured; without one the workflow skips enrichment
/// entirely.
#[derive(Clone)]
pub struct HubSpotClient {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl fmt::Debug for HubSpotClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HubSpotClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl HubSpotClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_HUBSPOT_API_URL.to_string(),
            token: token.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Point the client at a different API host (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch one deal's properties by id.
    pub async fn fetch_deal(&self, deal_id: &str) -> Result<DealDetails> {
        let url = format!(
            "{}/crm/v3/objects/deals/{}?properties={}",
            self.base_url, deal_id, DEAL_PROPERTIES
        );
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SyncError::remote("hubspot", response.status()));
        }
        let deal: DealResponse = response.json().await?;
        Ok(deal.into())
    }

    /// Search for all deals currently in the `closedwon` stage. Feeds the
    /// live read-through view of `/projects`; never writes anything back.
    pub async fn list_closed_won(&self) -> Result<Vec<DealDetails>> {
        let url = format!("{}/crm/v3/objects/deals/search", self.base_url);
        let body = json!({
            "filterGroups": [{
                "filters": [{
                    "propertyName": "dealstage",
                    "operator": "EQ",
                    "value": "closedwon",
                }],
            }],
            "properties": ["dealname", "amount", "dealstage", "closedate"],
            "limit": 100,
        });
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SyncError::remote("hubspot", response.status()));
        }
        let search: SearchResponse = response.json().await?;
        Ok(search.results.into_iter().map(Into::into).collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
