use std::path::Path;

use pinmap_core::config::ClientConfig;
use pinmap_core::util::{normalize_base_url, normalize_text_option};

use crate::cli::ConfigCommands;
use crate::commands::common::load_config;
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, config_path: &Path) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            api_base_url,
            kakao_rest_api_key,
        } => {
            let existing = ClientConfig::load_from_path(config_path)?;
            let config = merge_config(existing, api_base_url, kakao_rest_api_key)?;
            config.save_to_path(config_path)?;
            println!("Saved config to {}", config_path.display());
            Ok(())
        }
        ConfigCommands::Show => {
            let config = load_config(config_path)?;
            println!("config: {}", config_path.display());
            println!(
                "api_base_url: {}",
                config.api_base_url.as_deref().unwrap_or("(not set)")
            );
            println!(
                "kakao_rest_api_key: {}",
                if config.kakao_rest_api_key.is_some() {
                    "(set)"
                } else {
                    "(not set)"
                }
            );
            Ok(())
        }
    }
}

/// Apply explicit values over the stored config, validating the base URL.
pub fn merge_config(
    mut config: ClientConfig,
    api_base_url: Option<String>,
    kakao_rest_api_key: Option<String>,
) -> Result<ClientConfig, CliError> {
    if let Some(url) = normalize_text_option(api_base_url) {
        config.api_base_url = Some(normalize_base_url(&url).map_err(CliError::Config)?);
    }
    if let Some(key) = normalize_text_option(kakao_rest_api_key) {
        config.kakao_rest_api_key = Some(key);
    }
    if config.api_base_url.is_none() {
        return Err(CliError::Config(
            "API base URL is required. Pass --api-base-url.".to_string(),
        ));
    }
    Ok(config)
}
