use crate::ebay::Environment;
use anyhow::{anyhow, Result};
use std::env;

/// Application configuration, loaded once from environment variables.
///
/// A `.env` file in the working directory is honored (loaded in `run()`
/// before this is read). All fields except `environment` are required.
#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini API key.
    pub gemini_api_key: String,
    /// Prompt sent to Gemini alongside the photos.
    pub prompt: String,

    /// eBay OAuth client id.
    pub ebay_client_id: String,
    /// eBay OAuth client secret.
    pub ebay_client_secret: String,
    /// eBay OAuth refresh token.
    pub ebay_refresh_token: String,
    /// Sandbox or production; defaults to sandbox when unset.
    pub environment: Environment,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary variable lookup. Split out from
    /// `load()` so tests never have to mutate the process environment.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| -> Result<String> {
            match lookup(key) {
                Some(v) if !v.is_empty() => Ok(v),
                _ => Err(anyhow!("{} environment variable is required", key)),
            }
        };

        let environment = match lookup("EBAY_ENVIRONMENT") {
            Some(v) if !v.is_empty() => Environment::from_config(&v)?,
            _ => Environment::Sandbox,
        };

        Ok(Self {
            gemini_api_key: required("GEMINI_API_KEY")?,
            prompt: required("EBAY_PROMPT")?,
            ebay_client_id: required("EBAY_CLIENT_ID")?,
            ebay_client_secret: required("EBAY_CLIENT_SECRET")?,
            ebay_refresh_token: required("EBAY_REFRESH_TOKEN")?,
            environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn full_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("GEMINI_API_KEY", "gk"),
            ("EBAY_PROMPT", "describe this item"),
            ("EBAY_CLIENT_ID", "cid"),
            ("EBAY_CLIENT_SECRET", "csecret"),
            ("EBAY_REFRESH_TOKEN", "rtoken"),
            ("EBAY_ENVIRONMENT", "production"),
        ])
    }

    fn load_from(vars: &HashMap<&str, &str>) -> Result<Config> {
        Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn test_full_config_loads() {
        let cfg = load_from(&full_env()).unwrap();
        assert_eq!(cfg.gemini_api_key, "gk");
        assert_eq!(cfg.prompt, "describe this item");
        assert_eq!(cfg.ebay_client_id, "cid");
        assert_eq!(cfg.ebay_client_secret, "csecret");
        assert_eq!(cfg.ebay_refresh_token, "rtoken");
        assert_eq!(cfg.environment, Environment::Production);
    }

    #[test]
    fn test_each_required_variable_rejected_individually() {
        let required = [
            "GEMINI_API_KEY",
            "EBAY_PROMPT",
            "EBAY_CLIENT_ID",
            "EBAY_CLIENT_SECRET",
            "EBAY_REFRESH_TOKEN",
        ];
        for missing in required {
            let mut vars = full_env();
            vars.remove(missing);
            let err = load_from(&vars).unwrap_err();
            assert!(
                err.to_string().contains(missing),
                "error for missing {missing} was: {err}"
            );
        }
    }

    #[test]
    fn test_blank_required_variable_rejected() {
        let mut vars = full_env();
        vars.insert("EBAY_CLIENT_ID", "");
        let err = load_from(&vars).unwrap_err();
        assert!(err.to_string().contains("EBAY_CLIENT_ID"));
    }

    #[test]
    fn test_environment_defaults_to_sandbox() {
        let mut vars = full_env();
        vars.remove("EBAY_ENVIRONMENT");
        let cfg = load_from(&vars).unwrap();
        assert_eq!(cfg.environment, Environment::Sandbox);

        // Blank counts as unset too
        let mut vars = full_env();
        vars.insert("EBAY_ENVIRONMENT", "");
        let cfg = load_from(&vars).unwrap();
        assert_eq!(cfg.environment, Environment::Sandbox);
    }

    #[test]
    fn test_unknown_environment_rejected() {
        let mut vars = full_env();
        vars.insert("EBAY_ENVIRONMENT", "staging");
        let err = load_from(&vars).unwrap_err();
        assert!(err.to_string().contains("staging"));
    }
}
