pub mod auth;
pub mod listing;

pub use auth::AuthClient;
pub use listing::ListingClient;

use anyhow::{anyhow, Result};

const SANDBOX_TOKEN_URL: &str = "https://api.sandbox.ebay.com/identity/v1/oauth2/token";
const PRODUCTION_TOKEN_URL: &str = "https://api.ebay.com/identity/v1/oauth2/token";

const SANDBOX_API_BASE_URL: &str = "https://api.sandbox.ebay.com/sell/inventory/v1";
const PRODUCTION_API_BASE_URL: &str = "https://api.ebay.com/sell/inventory/v1";

/// eBay deployment environment. Sandbox and production expose the same API
/// under different hosts and with unrelated credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Sandbox,
    Production,
}

impl Environment {
    /// Parse the `EBAY_ENVIRONMENT` value. Unknown values are rejected
    /// rather than silently falling back to sandbox.
    pub fn from_config(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sandbox" => Ok(Self::Sandbox),
            "production" | "prod" => Ok(Self::Production),
            other => Err(anyhow!(
                "Unknown EBAY_ENVIRONMENT '{}'. Supported: sandbox, production",
                other
            )),
        }
    }

    /// OAuth2 token endpoint for this environment.
    pub fn token_url(&self) -> &'static str {
        match self {
            Self::Sandbox => SANDBOX_TOKEN_URL,
            Self::Production => PRODUCTION_TOKEN_URL,
        }
    }

    /// Sell Inventory API base URL for this environment.
    pub fn api_base_url(&self) -> &'static str {
        match self {
            Self::Sandbox => SANDBOX_API_BASE_URL,
            Self::Production => PRODUCTION_API_BASE_URL,
        }
    }

    /// Human-readable name for display.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Sandbox => "sandbox",
            Self::Production => "production",
        }
    }
}
