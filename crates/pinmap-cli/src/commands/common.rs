use std::path::{Path, PathBuf};

use pinmap_core::api::{ApiGateway, HttpApiGateway, KakaoPlaceSearch, PlaceSearch};
use pinmap_core::config::ClientConfig;
use pinmap_core::models::{
    Attachment, Folder, FolderId, IdParseError, Pin, PinId, PinVisibility, PlaceResult, UserId,
};
use pinmap_core::state::{AppState, DraftEdit, SelectedLocation, SessionController};
use pinmap_core::util::compact_text;
use serde::Serialize;

use crate::cli::{PinFields, VisibilityArg};
use crate::error::CliError;
use crate::session_store::FileSessionStore;

const CONFIG_FILE_NAME: &str = "config.json";

/// Everything a backend command needs: config, gateway, restored session
/// and the client state it drives.
pub struct CliContext {
    pub config: ClientConfig,
    pub gateway: HttpApiGateway,
    pub session: SessionController<FileSessionStore>,
    pub state: AppState,
}

impl CliContext {
    pub async fn open(config_path: &Path) -> Result<Self, CliError> {
        let config = load_config(config_path)?;
        let gateway = HttpApiGateway::new(config.require_api_base_url()?)?;
        let session = SessionController::new(FileSessionStore::beside(config_path));
        tracing::debug!(path = %session.store().path().display(), "session store");
        let mut state = AppState::new();
        if let Some(user_id) = session.restore_on_boot(&mut state, &gateway).await? {
            tracing::debug!(user = %user_id, "restored session");
        }
        Ok(Self {
            config,
            gateway,
            session,
            state,
        })
    }

    pub fn require_user(&self) -> Result<UserId, CliError> {
        self.state.current_user_id().ok_or(CliError::NotSignedIn)
    }

    pub fn place_search(&self) -> Result<KakaoPlaceSearch, CliError> {
        Ok(KakaoPlaceSearch::new(
            self.config.require_kakao_rest_api_key()?,
        )?)
    }

    /// One of the signed-in user's folders.
    pub async fn find_folder(&self, id: FolderId) -> Result<Folder, CliError> {
        let user_id = self.require_user()?;
        self.gateway
            .list_folders_for_user(user_id)
            .await?
            .into_iter()
            .find(|folder| folder.id == id)
            .ok_or(CliError::FolderNotFound(id.get()))
    }

    /// Add `pin_id` to a folder and save it. Returns whether it was newly filed.
    pub async fn file_pin(&self, folder_id: FolderId, pin_id: PinId) -> Result<bool, CliError> {
        let mut folder = self.find_folder(folder_id).await?;
        if !folder.file_pin(pin_id) {
            return Ok(false);
        }
        self.gateway.update_folder(&folder).await?;
        tracing::debug!(folder = %folder_id, pin = %pin_id, "filed pin");
        Ok(true)
    }
}

impl From<VisibilityArg> for PinVisibility {
    fn from(arg: VisibilityArg) -> Self {
        match arg {
            VisibilityArg::Public => Self::Public,
            VisibilityArg::Private => Self::Private,
            VisibilityArg::Friends => Self::Friends,
        }
    }
}

pub fn default_config_path() -> Result<PathBuf, CliError> {
    dirs::config_dir()
        .map(|dir| dir.join("pinmap").join(CONFIG_FILE_NAME))
        .ok_or_else(|| CliError::Config("Failed to resolve CLI config directory".to_string()))
}

pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf, CliError> {
    explicit.map_or_else(default_config_path, |path| Ok(path.to_path_buf()))
}

/// Config file merged with `PINMAP_API_BASE_URL` / `KAKAO_REST_API_KEY`.
pub fn load_config(path: &Path) -> Result<ClientConfig, CliError> {
    Ok(ClientConfig::load_from_path(path)?.with_env_overrides(|key| std::env::var(key).ok()))
}

pub fn parse_id<T>(raw: i64, wrap: fn(i64) -> Option<T>) -> Result<T, CliError> {
    wrap(raw).ok_or(CliError::InvalidId(IdParseError::NotPositive(raw)))
}

pub fn normalize_keyword(parts: &[String]) -> Result<String, CliError> {
    let keyword = parts.join(" ");
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return Err(CliError::EmptyKeyword);
    }
    Ok(keyword.to_string())
}

/// Draft edits for the fields present on the command line, in form order.
pub fn draft_edits(fields: &PinFields) -> Result<Vec<DraftEdit>, CliError> {
    let mut edits = Vec::new();
    if let Some(title) = &fields.title {
        edits.push(DraftEdit::Title(title.clone()));
    }
    if let Some(content) = &fields.content {
        edits.push(DraftEdit::Content(content.clone()));
    }
    if let Some(date) = &fields.date {
        edits.push(DraftEdit::Date(date.clone()));
    }
    if let Some(visibility) = fields.visibility {
        edits.push(DraftEdit::Visibility(visibility.into()));
    }
    for path in &fields.attachments {
        edits.push(DraftEdit::Attach(read_attachment(path)?));
    }
    Ok(edits)
}

/// Location from explicit coordinates, or from the first place search hit.
pub async fn resolve_location(
    context: &CliContext,
    fields: &PinFields,
) -> Result<Option<SelectedLocation>, CliError> {
    if let (Some(lat), Some(lng)) = (fields.lat, fields.lng) {
        return Ok(Some(fields.address.as_ref().map_or_else(
            || SelectedLocation::at(lat, lng),
            |address| SelectedLocation::new(address.clone(), lat, lng),
        )));
    }

    let Some(keyword) = fields.place.as_deref() else {
        return Ok(None);
    };
    let places = context.place_search()?.search_places(keyword).await?;
    first_place(keyword, places).map(Some)
}

pub fn first_place(keyword: &str, places: Vec<PlaceResult>) -> Result<SelectedLocation, CliError> {
    places
        .into_iter()
        .next()
        .map(SelectedLocation::from)
        .ok_or_else(|| CliError::PlaceNotFound(keyword.to_string()))
}

pub fn read_attachment(path: &Path) -> Result<Attachment, CliError> {
    let bytes = std::fs::read(path).map_err(|source| CliError::Attachment {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map_or_else(|| "upload".to_string(), |name| name.to_string_lossy().into_owned());
    let content_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    Ok(Attachment::new(file_name, content_type, bytes))
}

#[derive(Debug, Serialize)]
pub struct PinListItem {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub date: Option<String>,
    pub preview: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub visibility: PinVisibility,
    pub likes: u32,
    pub views: u32,
    pub image_url: Option<String>,
}

pub fn pin_to_list_item(pin: &Pin) -> PinListItem {
    let dated = pin.dated_content();
    let located = pin.has_location();
    PinListItem {
        id: pin.id.get(),
        user_id: pin.user_id.get(),
        title: pin.title.clone(),
        date: (!dated.date.is_empty()).then_some(dated.date),
        preview: pin.preview(40),
        latitude: located.then_some(pin.latitude),
        longitude: located.then_some(pin.longitude),
        visibility: pin.visibility,
        likes: pin.like_count,
        views: pin.view_count,
        image_url: pin.cover_url().map(str::to_string),
    }
}

fn format_position(pin: &Pin) -> String {
    if pin.has_location() {
        format!("({:.5}, {:.5})", pin.latitude, pin.longitude)
    } else {
        "(no location)".to_string()
    }
}

pub fn format_pin_lines(pins: &[Pin]) -> Vec<String> {
    pins.iter()
        .map(|pin| {
            let item = pin_to_list_item(pin);
            let date = item.date.map(|date| format!(" [{date}]")).unwrap_or_default();
            format!(
                "{:>6}  {}{}  {}  {}",
                item.id,
                compact_text(&item.title),
                date,
                format_position(pin),
                item.preview
            )
        })
        .collect()
}

pub fn format_pin_detail(pin: &Pin) -> String {
    let dated = pin.dated_content();
    let mut lines = vec![
        format!("#{} {}", pin.id, pin.title),
        format!(
            "{}  {}  by user {}",
            format_position(pin),
            pin.visibility.as_str().to_lowercase(),
            pin.user_id
        ),
        format!("Likes: {}  Views: {}", pin.like_count, pin.view_count),
    ];
    if !dated.date.is_empty() {
        lines.push(format!("Date: {}", dated.date));
    }
    if let Some(url) = pin.cover_url() {
        lines.push(format!("Image: {url}"));
    }
    if pin.files.len() > 1 {
        lines.push(format!("Files: {}", pin.files.len()));
    }
    if let Some(created_at) = pin.created_at {
        lines.push(format!("Created: {}", created_at.format("%Y-%m-%d %H:%M")));
    }
    lines.push(String::new());
    lines.push(dated.body);
    lines.join("\n")
}

/// Print and dismiss the outcome notice left by a controller action.
pub fn print_notice(state: &mut AppState) {
    if let Some(notice) = state.notice() {
        println!("{}", notice.message);
    }
    state.dismiss_notice();
}
