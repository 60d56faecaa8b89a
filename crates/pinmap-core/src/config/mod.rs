//! Client configuration.
//!
//! Provides a unified `ClientConfig` used by front ends to discover the
//! pinmap REST backend and the place search provider. Values come from a JSON
//! file and can be overridden by environment variables.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::{normalize_base_url, normalize_text_option};

pub const API_BASE_URL_ENV: &str = "PINMAP_API_BASE_URL";
pub const KAKAO_REST_API_KEY_ENV: &str = "KAKAO_REST_API_KEY";

/// Endpoints and public keys a client needs to talk to its collaborators.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub kakao_rest_api_key: Option<String>,
}

impl ClientConfig {
    /// Load from a JSON file. A missing file yields the empty config.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|error| {
            Error::Config(format!(
                "Failed to read config at {}: {}",
                path.display(),
                error
            ))
        })?;
        parse_client_config(&raw)
            .map_err(|error| Error::Config(format!("{} ({})", error, path.display())))
    }

    /// Write the config as pretty JSON, creating parent directories.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                Error::Config(format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    error
                ))
            })?;
        }
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path, raw).map_err(|error| {
            Error::Config(format!(
                "Failed to write config at {}: {}",
                path.display(),
                error
            ))
        })
    }

    /// Override fields with environment values when they are set.
    #[must_use]
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = normalize_text_option(lookup(API_BASE_URL_ENV)) {
            self.api_base_url = Some(url);
        }
        if let Some(key) = normalize_text_option(lookup(KAKAO_REST_API_KEY_ENV)) {
            self.kakao_rest_api_key = Some(key);
        }
        self
    }

    /// Normalized API base URL, required for every backend call.
    pub fn require_api_base_url(&self) -> Result<String> {
        let url = normalize_text_option(self.api_base_url.clone()).ok_or_else(|| {
            Error::Config(format!(
                "API base URL is not set. Set {API_BASE_URL_ENV} or run `pinmap config init`."
            ))
        })?;
        normalize_base_url(&url).map_err(Error::Config)
    }

    /// Kakao REST key, required only for place search.
    pub fn require_kakao_rest_api_key(&self) -> Result<String> {
        normalize_text_option(self.kakao_rest_api_key.clone()).ok_or_else(|| {
            Error::Config(format!(
                "Place search needs a Kakao REST API key. Set {KAKAO_REST_API_KEY_ENV}."
            ))
        })
    }
}

/// Parse a client config from a raw JSON payload.
pub fn parse_client_config(payload: &str) -> std::result::Result<ClientConfig, String> {
    let mut config: ClientConfig = serde_json::from_str(payload)
        .map_err(|error| format!("invalid client config JSON: {error}"))?;
    config.api_base_url = normalize_text_option(config.api_base_url);
    config.kakao_rest_api_key = normalize_text_option(config.kakao_rest_api_key);
    Ok(config)
}
