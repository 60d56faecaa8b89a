//! Data models for Pinmap

mod attachment;
mod content;
mod folder;
mod ids;
mod pin;
mod place;
mod user;

pub use attachment::Attachment;
pub use content::{
    compose_content, leads_with_date_marker, parse_date, split_content, DatedContent, DATE_FORMAT,
    DATE_MARKER,
};
pub use folder::{Folder, FolderPayload};
pub use ids::{FolderId, FriendshipId, IdParseError, PinId, UserId};
pub use pin::{
    validate_coordinates, NearbyQuery, Page, PageRequest, Pin, PinFile, PinPayload, PinScope,
    PinVisibility, SortDirection,
};
pub use place::PlaceResult;
pub use user::{
    Credentials, Friendship, FriendshipStatus, NewUser, RequestDirection, User,
};
