use crate::basecamp::{BasecampClient, OAuthApp, ProjectHost};
use crate::hubspot::HubSpotClient;
use std::path::PathBuf;

pub const DEFAULT_STORE_FILE: &str = "projects.json";

/// Environment-supplied configuration. Every credential is optional: absence
/// degrades to skip (HubSpot enrichment) or mock mode (Basecamp) rather than
/// being an error.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub hubspot_token: Option<String>,
    pub basecamp_token: Option<String>,
    pub basecamp_account_id: Option<String>,
    pub basecamp_client_id: Option<String>,
    pub basecamp_client_secret: Option<String>,
    pub basecamp_redirect_uri: Option<String>,
    pub store_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            hubspot_token: env_opt("HUBSPOT_ACCESS_TOKEN"),
            basecamp_token: env_opt("BASECAMP_ACCESS_TOKEN"),
            basecamp_account_id: env_opt("BASECAMP_ACCOUNT_ID"),
            basecamp_client_id: env_opt("BASECAMP_CLIENT_ID"),
            basecamp_client_secret: env_opt("BASECAMP_CLIENT_SECRET"),
            basecamp_redirect_uri: env_opt("BASECAMP_REDIRECT_URI"),
            store_path: env_opt("DEALSYNC_STORE").map(PathBuf::from),
        }
    }

    pub fn store_path(&self) -> PathBuf {
        self.store_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_FILE))
    }

    /// CRM client, only when a token is configured.
    pub fn hubspot_client(&self) -> Option<HubSpotClient> {
        self.hubspot_token.as_deref().map(HubSpotClient::new)
    }

    /// Project-host strategy, decided once here: real Basecamp when both
    /// token and account id are present, local mock otherwise.
    pub fn project_host(&self) -> ProjectHost {
        match (&self.basecamp_token, &self.basecamp_account_id) {
            (Some(token), Some(account_id)) => {
                ProjectHost::Basecamp(BasecampClient::new(token, account_id))
            }
            _ => ProjectHost::Local,
        }
    }

    /// OAuth application, only when the full client registration is present.
    pub fn oauth_app(&self) -> Option<OAuthApp> {
        match (
            &self.basecamp_client_id,
            &self.basecamp_client_secret,
            &self.basecamp_redirect_uri,
        ) {
            (Some(id), Some(secret), Some(redirect)) => Some(OAuthApp::new(id, secret, redirect)),
            _ => None,
        }
    }
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
