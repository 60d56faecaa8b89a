use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] pinmap_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid id: {0}")]
    InvalidId(#[from] pinmap_core::models::IdParseError),
    #[error("Not signed in. Run `pinmap auth login` first.")]
    NotSignedIn,
    #[error("Folder name cannot be empty")]
    EmptyFolderName,
    #[error("No folder {0} among your folders")]
    FolderNotFound(i64),
    #[error("No friendship or pending request with user {0}")]
    NoFriendship(i64),
    #[error("No place found for '{0}'")]
    PlaceNotFound(String),
    #[error("Search keyword cannot be empty")]
    EmptyKeyword,
    #[error("Failed to read attachment {}: {source}", path.display())]
    Attachment { path: PathBuf, source: io::Error },
    #[error("Configuration error: {0}")]
    Config(String),
}
