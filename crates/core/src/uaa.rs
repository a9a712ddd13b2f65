use std::{
    fmt,
    time::{Duration, Instant},
};

use reqwest::{Client, Url};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    director::parse_base_url,
    error::{BoshStatsError, Result},
};

/// Refresh this long before the reported expiry.
const EXPIRY_MARGIN: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(alias = "token")]
    access_token: String,
    #[serde(default = "default_token_type")]
    token_type: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

#[derive(Clone)]
struct CachedToken {
    authorization: String,
    expires_at: Option<Instant>,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        self.expires_at
            .is_none_or(|at| Instant::now() + EXPIRY_MARGIN < at)
    }
}

/// Client-credentials session against a UAA server.
pub struct UaaTokenSession {
    http: Client,
    token_url: Url,
    client_id: String,
    client_secret: String,
    cached: Mutex<Option<CachedToken>>,
}

impl fmt::Debug for UaaTokenSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UaaTokenSession")
            .field("token_url", &self.token_url.as_str())
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl UaaTokenSession {
    pub fn new(
        http: Client,
        uaa_url: &str,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            http,
            token_url: parse_base_url(uaa_url, "oauth/token")?,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            cached: Mutex::new(None),
        })
    }

    /// `Authorization` header value, fetching a new token when needed.
    pub async fn authorization(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.authorization.clone());
        }

        let token = self.request_token().await?;
        let authorization = token.authorization.clone();
        *cached = Some(token);
        Ok(authorization)
    }

    async fn request_token(&self) -> Result<CachedToken> {
        debug!(url = %self.token_url, client_id = %self.client_id, "requesting UAA token");
        let response = self
            .http
            .post(self.token_url.clone())
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header("Accept", "application/json")
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BoshStatsError::Uaa {
                status,
                body: response.text().await.unwrap_or_default(),
            });
        }

        let token: TokenResponse = response.json().await?;
        Ok(CachedToken {
            authorization: format!("{} {}", token.token_type, token.access_token),
            expires_at: token
                .expires_in
                .map(|secs| Instant::now() + Duration::from_secs(secs)),
        })
    }
}
