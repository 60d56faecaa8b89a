//! JSON shapes exchanged with the backend, validated into domain models.

use chrono::{DateTime, NaiveDateTime};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{
    validate_coordinates, Folder, FolderId, FolderPayload, Friendship, FriendshipId,
    FriendshipStatus, NewUser, Page, Pin, PinFile, PinId, PinVisibility, User, UserId,
};
use crate::util::{compact_text, normalize_text_option};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FileRecord {
    file_id: i64,
    #[serde(default)]
    name: String,
    url: String,
    #[serde(default)]
    content_type: String,
    #[serde(default)]
    file_size: u64,
}

impl From<FileRecord> for PinFile {
    fn from(record: FileRecord) -> Self {
        Self {
            id: record.file_id,
            name: record.name,
            url: record.url,
            content_type: record.content_type,
            size: record.file_size,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PostRecord {
    post_id: i64,
    user_id: i64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    reg_date: Option<String>,
    #[serde(default)]
    like_count: u32,
    #[serde(default)]
    view_count: u32,
    #[serde(default)]
    longitude: Option<f64>,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    scope: Option<PinVisibility>,
    #[serde(default)]
    files: Vec<FileRecord>,
}

impl TryFrom<PostRecord> for Pin {
    type Error = Error;

    fn try_from(record: PostRecord) -> Result<Self> {
        let latitude = record.latitude.unwrap_or_default();
        let longitude = record.longitude.unwrap_or_default();
        validate_coordinates(latitude, longitude).map_err(|_| {
            Error::Malformed(format!(
                "post {} has coordinates out of range ({latitude}, {longitude})",
                record.post_id
            ))
        })?;

        Ok(Self {
            id: PinId::new(record.post_id).ok_or_else(|| invalid_id("post", record.post_id))?,
            user_id: UserId::new(record.user_id).ok_or_else(|| invalid_id("user", record.user_id))?,
            title: record.title,
            content: record.content,
            latitude,
            longitude,
            visibility: record.scope.unwrap_or_default(),
            like_count: record.like_count,
            view_count: record.view_count,
            files: record.files.into_iter().map(PinFile::from).collect(),
            created_at: record.reg_date.as_deref().and_then(parse_timestamp),
        })
    }
}

/// Paged listing envelope shared by every list endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageRecord<T> {
    #[serde(default = "Vec::new")]
    dto_list: Vec<T>,
    #[serde(default)]
    page: u32,
    #[serde(default)]
    total_page: u32,
}

impl<T> PageRecord<T> {
    pub(crate) fn try_into_page<U>(self) -> Result<Page<U>>
    where
        U: TryFrom<T, Error = Error>,
    {
        let items = self
            .dto_list
            .into_iter()
            .map(U::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(Page {
            items,
            page: self.page.max(1),
            total_pages: self.total_page,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserRecord {
    user_id: Option<i64>,
    username: String,
    #[serde(default)]
    phone_number: Option<String>,
    #[serde(default)]
    reg_date: Option<String>,
}

impl TryFrom<UserRecord> for User {
    type Error = Error;

    fn try_from(record: UserRecord) -> Result<Self> {
        let raw = record.user_id.unwrap_or_default();
        Ok(Self {
            id: UserId::new(raw).ok_or_else(|| invalid_id("user", raw))?,
            username: record.username,
            phone_number: normalize_text_option(record.phone_number),
            created_at: record.reg_date.as_deref().and_then(parse_timestamp),
        })
    }
}

/// Registration body. The backend expects the full user shape with a zero id.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewUserRecord<'a> {
    user_id: i64,
    username: &'a str,
    password: &'a str,
    phone_number: &'a str,
    reg_date: String,
    mod_date: String,
}

impl<'a> NewUserRecord<'a> {
    pub(crate) fn new(user: &'a NewUser, now: NaiveDateTime) -> Self {
        let stamp = now.format("%Y-%m-%dT%H:%M:%S").to_string();
        Self {
            user_id: 0,
            username: user.username.trim(),
            password: &user.password,
            phone_number: &user.phone_number,
            reg_date: stamp.clone(),
            mod_date: stamp,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FolderRecord {
    id: i64,
    name: String,
    user_id: i64,
    #[serde(default)]
    post_ids: Vec<i64>,
}

impl FolderRecord {
    pub(crate) fn new_folder(payload: &FolderPayload) -> Self {
        Self {
            id: 0,
            name: payload.name.clone(),
            user_id: payload.user_id.get(),
            post_ids: payload.pin_ids.iter().map(|id| id.get()).collect(),
        }
    }
}

impl From<&Folder> for FolderRecord {
    fn from(folder: &Folder) -> Self {
        Self {
            id: folder.id.get(),
            name: folder.name.clone(),
            user_id: folder.user_id.get(),
            post_ids: folder.pin_ids.iter().map(|id| id.get()).collect(),
        }
    }
}

impl TryFrom<FolderRecord> for Folder {
    type Error = Error;

    fn try_from(record: FolderRecord) -> Result<Self> {
        let pin_ids = record
            .post_ids
            .into_iter()
            .map(|raw| PinId::new(raw).ok_or_else(|| invalid_id("post", raw)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            id: FolderId::new(record.id).ok_or_else(|| invalid_id("folder", record.id))?,
            user_id: UserId::new(record.user_id)
                .ok_or_else(|| invalid_id("user", record.user_id))?,
            name: record.name,
            pin_ids,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct FriendshipRecord {
    id: i64,
    friend1: UserRecord,
    friend2: UserRecord,
    status: FriendshipStatus,
}

impl TryFrom<FriendshipRecord> for Friendship {
    type Error = Error;

    fn try_from(record: FriendshipRecord) -> Result<Self> {
        Ok(Self {
            id: FriendshipId::new(record.id).ok_or_else(|| invalid_id("friendship", record.id))?,
            requester: User::try_from(record.friend1)?,
            receiver: User::try_from(record.friend2)?,
            status: record.status,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FriendshipRequestRecord {
    pub(crate) requester_id: UserId,
    pub(crate) receiver_id: UserId,
}

/// Parse the bare numeric id that create, update and login endpoints return.
pub(crate) fn parse_id_body<T>(body: &str, kind: &str, wrap: fn(i64) -> Option<T>) -> Result<T> {
    let trimmed = body.trim();
    let raw = trimmed.parse::<i64>().map_err(|_| {
        Error::Malformed(format!(
            "expected a {kind} id, got '{}'",
            compact_text(trimmed)
        ))
    })?;
    wrap(raw).ok_or_else(|| invalid_id(kind, raw))
}

/// Backend timestamps are local date-times, occasionally with an offset.
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    raw.parse::<NaiveDateTime>()
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_local()))
}

#[derive(Debug, Deserialize)]
struct ErrorRecord {
    message: Option<String>,
    error: Option<String>,
}

/// Map a failed HTTP response onto the error taxonomy.
pub(crate) fn error_for_status(status: StatusCode, body: &str, context: &str) -> Error {
    let detail = parse_error_detail(body);
    let message = if detail.is_empty() {
        format!("{context} (HTTP {})", status.as_u16())
    } else {
        format!("{context}: {detail}")
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Auth(message),
        StatusCode::NOT_FOUND => Error::NotFound(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Error::Rejected(message),
        _ => Error::Server {
            status: status.as_u16(),
            message,
        },
    }
}

fn parse_error_detail(body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ErrorRecord>(body) {
        if let Some(message) = normalize_text_option(payload.message.or(payload.error)) {
            return compact_text(&message);
        }
    }
    compact_text(body)
}

fn invalid_id(kind: &str, raw: i64) -> Error {
    Error::Malformed(format!("{kind} id must be positive, got {raw}"))
}
