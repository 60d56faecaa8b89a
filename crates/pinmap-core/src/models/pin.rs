//! Pin model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::ValidationIssue;

use super::content::{split_content, DatedContent};
use super::ids::{PinId, UserId};

/// Who may see a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PinVisibility {
    #[default]
    Public,
    Private,
    Friends,
}

impl PinVisibility {
    /// Form value understood by the backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "PUBLIC",
            Self::Private => "PRIVATE",
            Self::Friends => "FRIENDS",
        }
    }
}

/// A file the backend stores for a pin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinFile {
    pub id: i64,
    pub name: String,
    /// Public download URL
    pub url: String,
    pub content_type: String,
    pub size: u64,
}

impl PinFile {
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}

/// A geotagged note authored by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    /// Backend identifier
    pub id: PinId,
    /// Author
    pub user_id: UserId,
    pub title: String,
    /// Stored content, including the date marker line when dated
    pub content: String,
    pub latitude: f64,
    pub longitude: f64,
    pub visibility: PinVisibility,
    pub like_count: u32,
    pub view_count: u32,
    pub files: Vec<PinFile>,
    pub created_at: Option<NaiveDateTime>,
}

impl Pin {
    /// Split the stored content into its date marker and body.
    #[must_use]
    pub fn dated_content(&self) -> DatedContent {
        split_content(&self.content)
    }

    /// Body text truncated to `max_len` characters, without the date marker.
    #[must_use]
    pub fn preview(&self, max_len: usize) -> String {
        self.dated_content()
            .body
            .lines()
            .find(|line| !line.trim().is_empty())
            .unwrap_or("")
            .chars()
            .take(max_len)
            .collect()
    }

    /// URL of the first attached image, shown as the pin's photo.
    #[must_use]
    pub fn cover_url(&self) -> Option<&str> {
        self.files
            .iter()
            .find(|file| file.is_image())
            .map(|file| file.url.as_str())
    }

    /// The backend stores a missing location as `(0, 0)`.
    #[must_use]
    pub fn has_location(&self) -> bool {
        self.latitude.abs() > f64::EPSILON || self.longitude.abs() > f64::EPSILON
    }
}

/// Outbound fields for creating or updating a pin
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PinPayload {
    pub user_id: UserId,
    pub title: String,
    pub content: String,
    pub latitude: f64,
    pub longitude: f64,
    pub visibility: PinVisibility,
}

/// Which pins a list view asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinScope {
    /// Pins authored by the signed-in user
    Mine(UserId),
    /// Pins authored by another user (a friend's map)
    User(UserId),
    /// Every pin the backend lists
    All,
}

impl PinScope {
    #[must_use]
    pub const fn author(self) -> Option<UserId> {
        match self {
            Self::Mine(user_id) | Self::User(user_id) => Some(user_id),
            Self::All => None,
        }
    }
}

/// Sort direction of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Requested page of a paginated listing (one-based, newest first by default)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub direction: SortDirection,
}

impl PageRequest {
    #[must_use]
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page: page.max(1),
            size: size.max(1),
            ..Self::default()
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            size: 10,
            direction: SortDirection::Desc,
        }
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// One-based page number
    pub page: u32,
    pub total_pages: u32,
}

impl<T> Page<T> {
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Radius query around a map position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyQuery {
    pub latitude: f64,
    pub longitude: f64,
    /// Search radius in kilometres
    pub distance_km: f64,
}

/// Check that a latitude/longitude pair lies on the globe.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), ValidationIssue> {
    let lat_ok = latitude.is_finite() && (-90.0..=90.0).contains(&latitude);
    let lng_ok = longitude.is_finite() && (-180.0..=180.0).contains(&longitude);
    if lat_ok && lng_ok {
        Ok(())
    } else {
        Err(ValidationIssue::InvalidCoordinates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pin(content: &str) -> Pin {
        Pin {
            id: PinId::new(1).unwrap(),
            user_id: UserId::new(2).unwrap(),
            title: "Trip".to_string(),
            content: content.to_string(),
            latitude: 37.55,
            longitude: 126.99,
            visibility: PinVisibility::Public,
            like_count: 0,
            view_count: 0,
            files: Vec::new(),
            created_at: None,
        }
    }

    #[test]
    fn preview_skips_date_marker() {
        let pin = sample_pin("📅 2025-01-01\n\nGreat view\nsecond line");
        assert_eq!(pin.preview(50), "Great view");
        assert_eq!(pin.preview(5), "Great");
    }

    #[test]
    fn cover_url_picks_first_image() {
        let mut pin = sample_pin("body");
        assert_eq!(pin.cover_url(), None);
        pin.files = vec![
            PinFile {
                id: 1,
                name: "notes.txt".to_string(),
                url: "https://cdn.example.com/notes.txt".to_string(),
                content_type: "text/plain".to_string(),
                size: 10,
            },
            PinFile {
                id: 2,
                name: "view.jpg".to_string(),
                url: "https://cdn.example.com/view.jpg".to_string(),
                content_type: "image/jpeg".to_string(),
                size: 2048,
            },
        ];
        assert_eq!(pin.cover_url(), Some("https://cdn.example.com/view.jpg"));
    }

    #[test]
    fn origin_counts_as_missing_location() {
        let mut pin = sample_pin("body");
        assert!(pin.has_location());
        pin.latitude = 0.0;
        pin.longitude = 0.0;
        assert!(!pin.has_location());
    }

    #[test]
    fn coordinates_must_be_on_the_globe() {
        assert!(validate_coordinates(37.55, 126.99).is_ok());
        assert!(validate_coordinates(91.0, 0.0).is_err());
        assert!(validate_coordinates(0.0, -181.0).is_err());
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn page_request_is_one_based() {
        assert_eq!(PageRequest::new(0, 0).page, 1);
        assert_eq!(PageRequest::new(0, 0).size, 1);
        assert_eq!(PageRequest::default().direction.as_str(), "DESC");
    }

    #[test]
    fn page_reports_remaining_pages() {
        let page = Page::<Pin> {
            items: Vec::new(),
            page: 1,
            total_pages: 2,
        };
        assert!(page.has_next());
        let last = Page::<Pin> {
            items: Vec::new(),
            page: 2,
            total_pages: 2,
        };
        assert!(!last.has_next());
    }
}
