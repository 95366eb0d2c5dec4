use super::Environment;
use crate::utils::find_char_boundary;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::time::Duration;

/// OAuth2 client for the eBay refresh-token grant.
#[derive(Debug, Clone)]
pub struct AuthClient {
    client_id: String,
    client_secret: String,
    refresh_token: String,
    environment: Environment,
    token_url: String,
    http: reqwest::Client,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[allow(dead_code)]
    expires_in: Option<u64>,
    #[allow(dead_code)]
    token_type: Option<String>,
}

impl AuthClient {
    pub fn new(
        client_id: String,
        client_secret: String,
        refresh_token: String,
        environment: Environment,
    ) -> Self {
        Self {
            client_id,
            client_secret,
            refresh_token,
            token_url: environment.token_url().to_string(),
            environment,
            http: reqwest::Client::new(),
        }
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Point the client at a different token endpoint. Used by tests to
    /// target a mock server.
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Exchange the refresh token for a short-lived access token.
    pub async fn get_access_token(&self) -> Result<String> {
        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", self.refresh_token.as_str()),
        ];

        let resp = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&params)
            .timeout(Duration::from_secs(120))
            .send()
            .await
            .with_context(|| format!("Token request to {} failed", self.token_url))?;

        let status = resp.status();
        let body = resp.text().await.context("Failed to read token response")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Token request failed with status {}: {}",
                status.as_u16(),
                body
            ));
        }

        let parsed: TokenResponse = serde_json::from_str(&body).with_context(|| {
            format!(
                "Failed to parse token response. Raw body:\n{}",
                &body[..find_char_boundary(&body, 500)]
            )
        })?;

        Ok(parsed.access_token)
    }
}
