//! Place search results

use serde::{Deserialize, Serialize};

/// A geocoded place returned by keyword search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceResult {
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
}
