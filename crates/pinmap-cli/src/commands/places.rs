use std::path::Path;

use pinmap_core::api::PlaceSearch;
use pinmap_core::models::PlaceResult;

use crate::cli::PlaceCommands;
use crate::commands::common::{load_config, normalize_keyword};
use crate::error::CliError;

pub async fn run_places(command: PlaceCommands, config_path: &Path) -> Result<(), CliError> {
    match command {
        PlaceCommands::Search { keyword, json } => {
            let keyword = normalize_keyword(&keyword)?;
            let config = load_config(config_path)?;
            let search =
                pinmap_core::api::KakaoPlaceSearch::new(config.require_kakao_rest_api_key()?)?;
            let places = search.search_places(&keyword).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&places)?);
            } else if places.is_empty() {
                println!("No places found for '{keyword}'");
            } else {
                for line in format_place_lines(&places) {
                    println!("{line}");
                }
            }
            Ok(())
        }
    }
}

pub fn format_place_lines(places: &[PlaceResult]) -> Vec<String> {
    places
        .iter()
        .map(|place| {
            format!(
                "{}  {}  ({:.5}, {:.5})",
                place.name, place.address, place.lat, place.lng
            )
        })
        .collect()
}
