//! Backend collaborators: the REST gateway and the place search provider.
//!
//! The state controllers only ever talk to these traits; the HTTP
//! implementations live in [`http`] and [`places`].

pub mod http;
pub mod places;
mod wire;

use crate::error::Result;
use crate::models::{
    Attachment, Credentials, Folder, FolderId, FolderPayload, Friendship, FriendshipId,
    NearbyQuery, NewUser, Page, PageRequest, Pin, PinId, PinPayload, PinScope, PlaceResult,
    RequestDirection, User, UserId,
};

pub use http::HttpApiGateway;
pub use places::KakaoPlaceSearch;

/// Typed CRUD surface of the pinmap backend.
///
/// Every failure is mapped onto the crate's error taxonomy: rejected input is
/// `Rejected`, rejected identity is `Auth`, a vanished target is `NotFound`,
/// and everything transient is `Network` or `Server`.
#[allow(async_fn_in_trait)]
pub trait ApiGateway {
    async fn create_pin(&self, payload: &PinPayload, files: &[Attachment]) -> Result<PinId>;
    async fn update_pin(
        &self,
        id: PinId,
        payload: &PinPayload,
        files: &[Attachment],
    ) -> Result<PinId>;
    async fn delete_pin(&self, id: PinId) -> Result<()>;
    async fn get_pin(&self, id: PinId) -> Result<Pin>;
    async fn list_pins(&self, scope: PinScope, page: PageRequest) -> Result<Page<Pin>>;
    async fn nearby_pins(&self, query: NearbyQuery) -> Result<Vec<Pin>>;

    async fn get_user(&self, id: UserId) -> Result<User>;
    async fn create_user(&self, profile: &NewUser) -> Result<UserId>;
    async fn login(&self, credentials: &Credentials) -> Result<UserId>;
    async fn logout(&self) -> Result<()>;

    async fn create_folder(&self, payload: &FolderPayload) -> Result<FolderId>;
    /// Save the folder's name and pin membership.
    async fn update_folder(&self, folder: &Folder) -> Result<()>;
    async fn delete_folder(&self, id: FolderId) -> Result<()>;
    async fn list_folders_for_user(&self, user_id: UserId) -> Result<Vec<Folder>>;

    /// Accepted friendships of `user_id`.
    async fn list_friends(&self, user_id: UserId) -> Result<Vec<Friendship>>;
    /// Pending requests `user_id` received or sent.
    async fn list_friend_requests(
        &self,
        user_id: UserId,
        direction: RequestDirection,
    ) -> Result<Vec<Friendship>>;
    async fn request_friend(&self, requester: UserId, receiver: UserId) -> Result<FriendshipId>;
    async fn accept_friend(&self, requester: UserId, receiver: UserId) -> Result<()>;
    async fn remove_friend(&self, requester: UserId, receiver: UserId) -> Result<()>;
}

/// Keyword geocoding provider backing the location picker.
#[allow(async_fn_in_trait)]
pub trait PlaceSearch {
    async fn search_places(&self, keyword: &str) -> Result<Vec<PlaceResult>>;
}
