use crate::error::{Result, SyncError};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

const DEFAULT_BASECAMP_API_URL: &str = "https://3.basecampapi.com";
const DEFAULT_LAUNCHPAD_URL: &str = "https://launchpad.37signals.com";

// ---------------------------------------------------------------------------
// CreatedProject
// ---------------------------------------------------------------------------

/// Identifier handed back by the project host (or synthesized locally).
#[derive(Debug, Clone)]
pub struct CreatedProject {
    pub id: i64,
}

#[derive(Deserialize)]
struct ProjectResponse {
    id: i64,
}

// ---------------------------------------------------------------------------
// BasecampClient
// ---------------------------------------------------------------------------

/// Authenticated writer for the Basecamp 3 API. Needs a bearer token and an
/// account id, both supplied externally (the OAuth helper produces the
/// token, it is not acquired here).
#[derive(Clone)]
pub struct BasecampClient {
    base_url: String,
    token: String,
    account_id: String,
    client: reqwest::Client,
}

impl fmt::Debug for BasecampClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasecampClient")
            .field("base_url", &self.base_url)
            .field("account_id", &self.account_id)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl BasecampClient {
    pub fn new(token: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASECAMP_API_URL.to_string(),
            token: token.into(),
            account_id: account_id.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Point the client at a different API host (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub async fn create_project(&self, name: &str, description: &str) -> Result<CreatedProject> {
        let url = format!("{}/{}/projects.json", self.base_url, self.account_id);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&json!({ "name": name, "description": description }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SyncError::remote("basecamp", response.status()));
        }
        let project: ProjectResponse = response.json().await?;
        Ok(CreatedProject { id: project.id })
    }
}

// ---------------------------------------------------------------------------
// ProjectHost — real or local, chosen once at startup
// ---------------------------------------------------------------------------

/// Strategy for creating projects. `Basecamp` calls out with a configured
/// token; `Local` is mock mode, synthesizing a time-derived id without any
/// network, used whenever the Basecamp credential or account id is absent.
#[derive(Debug, Clone)]
pub enum ProjectHost {
    Basecamp(BasecampClient),
    Local,
}

impl ProjectHost {
    pub async fn create_project(&self, name: &str, description: &str) -> Result<CreatedProject> {
        match self {
            Self::Basecamp(client) => client.create_project(name, description).await,
            Self::Local => Ok(CreatedProject {
                id: Utc::now().timestamp_millis(),
            }),
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Self::Basecamp(_))
    }
}

// ---------------------------------------------------------------------------
// OAuthApp — authorization-code exchange for the Basecamp credential
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Registered Basecamp OAuth application. Exchanges an authorization code
/// for the bearer token that `BasecampClient` consumes; the operator places
/// the returned token in the environment and restarts.
#[derive(Clone)]
pub struct OAuthApp {
    launchpad_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    client: reqwest::Client,
}

impl fmt::Debug for OAuthApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthApp")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

impl OAuthApp {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            launchpad_url: DEFAULT_LAUNCHPAD_URL.to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Point the exchange at a different host (tests).
    pub fn with_launchpad_url(mut self, url: impl Into<String>) -> Self {
        self.launchpad_url = url.into();
        self
    }

    /// URL the operator's browser is redirected to for consent.
    pub fn authorize_url(&self, state: &str) -> String {
        let url = reqwest::Url::parse_with_params(
            &format!("{}/authorization/new", self.launchpad_url),
            &[
                ("type", "web_server"),
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("state", state),
            ],
        );
        match url {
            Ok(url) => url.to_string(),
            // launchpad_url is a constant or test-supplied; a parse failure
            // here means misconfiguration, surface it as an empty redirect.
            Err(_) => String::new(),
        }
    }

    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse> {
        let url = format!("{}/authorization/token.json", self.launchpad_url);
        let response = self
            .client
            .post(&url)
            .query(&[
                ("type", "web_server"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("code", code),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SyncError::remote("basecamp", response.status()));
        }
        Ok(response.json().await?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
