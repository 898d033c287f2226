use std::time::{Duration, Instant};

use reqwest::Client;
use tokio::sync::Mutex;

use super::types::TokenResponse;
use super::GraphError;
use crate::config::GraphConfig;

const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Tokens are refreshed this long before the identity provider expires them.
const EXPIRY_MARGIN: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
pub struct AccessToken {
    pub secret: String,
    pub refresh_at: Instant,
}

impl AccessToken {
    fn is_fresh(&self) -> bool {
        Instant::now() < self.refresh_at
    }
}

/// Client-credentials token source with a single cached token.
pub struct TokenProvider {
    http: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    cached: Mutex<Option<AccessToken>>,
}

impl TokenProvider {
    pub fn new(http: Client, config: &GraphConfig) -> Self {
        Self {
            http,
            token_url: format!(
                "{}/{}/oauth2/v2.0/token",
                config.authority_url, config.tenant_id
            ),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            cached: Mutex::new(None),
        }
    }

    pub async fn token(&self) -> Result<String, GraphError> {
        // Held across the refresh so concurrent requests wait for one token.
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.secret.clone());
        }

        let token = self.request_token().await?;
        let secret = token.secret.clone();
        *cached = Some(token);
        Ok(secret)
    }

    async fn request_token(&self) -> Result<AccessToken, GraphError> {
        tracing::debug!("Requesting Graph access token");

        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "client_credentials"),
            ("scope", GRAPH_SCOPE),
        ];

        let resp = self
            .http
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| GraphError::Auth(format!("token request failed: {e}")))?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(GraphError::Auth(format!("token endpoint returned {status}: {body}")));
        }

        let parsed: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| GraphError::Auth(format!("invalid token response: {e}")))?;

        let Some(secret) = parsed.access_token.filter(|t| !t.is_empty()) else {
            return Err(GraphError::Auth(format!("no access_token in response: {body}")));
        };

        let lifetime = Duration::from_secs(parsed.expires_in.unwrap_or(0));
        tracing::info!("Graph access token acquired (expires in {}s)", lifetime.as_secs());

        Ok(AccessToken {
            secret,
            refresh_at: Instant::now() + lifetime.saturating_sub(EXPIRY_MARGIN),
        })
    }
}
