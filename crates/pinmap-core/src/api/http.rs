//! REST implementation of [`ApiGateway`] on top of `reqwest`.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use super::wire::{
    error_for_status, parse_id_body, FolderRecord, FriendshipRecord, FriendshipRequestRecord,
    NewUserRecord, PageRecord, PostRecord, UserRecord,
};
use super::ApiGateway;
use crate::error::{Error, Result};
use crate::models::{
    Attachment, Credentials, Folder, FolderId, FolderPayload, Friendship, FriendshipId,
    NearbyQuery, NewUser, Page, PageRequest, Pin, PinId, PinPayload, PinScope, RequestDirection,
    User, UserId,
};
use crate::util::normalize_base_url;

const HTTP_TIMEOUT_SECS: u64 = 15;
const API_PREFIX: &str = "/api";
const SORT_FIELD: &str = "regDate";

/// HTTP client for the pinmap REST backend.
///
/// The backend authenticates with a session cookie set by `/api/login`, so
/// the client keeps a cookie store for its whole lifetime.
#[derive(Debug, Clone)]
pub struct HttpApiGateway {
    base_url: String,
    client: Client,
}

impl HttpApiGateway {
    /// Builds a gateway for an explicit API base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let base_url = normalize_base_url(base_url.as_ref()).map_err(Error::Config)?;
        let client = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|error| Error::Config(format!("Failed to construct HTTP client: {error}")))?;
        Ok(Self { base_url, client })
    }

    /// Returns the base URL this gateway was configured with.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, route: &str) -> String {
        format!("{}{API_PREFIX}{route}", self.base_url)
    }

    async fn send(&self, request: RequestBuilder, context: &str) -> Result<Response> {
        let response = request.send().await?;
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(%status, context, "backend request failed");
        Err(error_for_status(status, &body, context))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        context: &str,
    ) -> Result<T> {
        let response = self
            .send(request.header("Accept", "application/json"), context)
            .await?;
        Ok(response.json::<T>().await?)
    }

    async fn send_for_id<T>(
        &self,
        request: RequestBuilder,
        context: &str,
        kind: &str,
        wrap: fn(i64) -> Option<T>,
    ) -> Result<T> {
        let body = self.send(request, context).await?.text().await?;
        parse_id_body(&body, kind, wrap)
    }

    fn pin_form(payload: &PinPayload, files: &[Attachment]) -> Result<Form> {
        let mut form = Form::new()
            .text("userId", payload.user_id.to_string())
            .text("title", payload.title.clone())
            .text("content", payload.content.clone())
            .text("longitude", payload.longitude.to_string())
            .text("latitude", payload.latitude.to_string())
            .text("scope", payload.visibility.as_str());
        for file in files {
            let part = Part::bytes(file.bytes().to_vec())
                .file_name(file.file_name.clone())
                .mime_str(&file.content_type)
                .map_err(|error| {
                    Error::Rejected(format!(
                        "attachment '{}' has invalid content type: {error}",
                        file.file_name
                    ))
                })?;
            form = form.part("files", part);
        }
        Ok(form)
    }
}

fn list_query(scope: PinScope, page: PageRequest) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("page", page.page.to_string()),
        ("size", page.size.to_string()),
        ("sortBy", SORT_FIELD.to_string()),
        ("direction", page.direction.as_str().to_string()),
    ];
    if let Some(user_id) = scope.author() {
        query.push(("userId", user_id.to_string()));
    }
    query
}

fn nearby_query(query: NearbyQuery) -> [(&'static str, String); 3] {
    [
        ("longitude", query.longitude.to_string()),
        ("latitude", query.latitude.to_string()),
        ("distance", query.distance_km.to_string()),
    ]
}

const fn request_route(direction: RequestDirection) -> &'static str {
    match direction {
        RequestDirection::Received => "received-requests",
        RequestDirection::Sent => "sent-requests",
    }
}

impl ApiGateway for HttpApiGateway {
    async fn create_pin(&self, payload: &PinPayload, files: &[Attachment]) -> Result<PinId> {
        let form = Self::pin_form(payload, files)?;
        self.send_for_id(
            self.client.post(self.url("/posts")).multipart(form),
            "create post",
            "post",
            PinId::new,
        )
        .await
    }

    async fn update_pin(
        &self,
        id: PinId,
        payload: &PinPayload,
        files: &[Attachment],
    ) -> Result<PinId> {
        let form = Self::pin_form(payload, files)?;
        self.send_for_id(
            self.client
                .put(self.url(&format!("/posts/{id}")))
                .multipart(form),
            "update post",
            "post",
            PinId::new,
        )
        .await
    }

    async fn delete_pin(&self, id: PinId) -> Result<()> {
        self.send(
            self.client.delete(self.url(&format!("/posts/{id}"))),
            "delete post",
        )
        .await?;
        Ok(())
    }

    async fn get_pin(&self, id: PinId) -> Result<Pin> {
        let record: PostRecord = self
            .send_json(
                self.client.get(self.url(&format!("/posts/{id}"))),
                "get post",
            )
            .await?;
        Pin::try_from(record)
    }

    async fn list_pins(&self, scope: PinScope, page: PageRequest) -> Result<Page<Pin>> {
        let record: PageRecord<PostRecord> = self
            .send_json(
                self.client
                    .get(self.url("/posts"))
                    .query(&list_query(scope, page)),
                "list posts",
            )
            .await?;
        record.try_into_page()
    }

    async fn nearby_pins(&self, query: NearbyQuery) -> Result<Vec<Pin>> {
        let records: Vec<PostRecord> = self
            .send_json(
                self.client
                    .get(self.url("/posts/near"))
                    .query(&nearby_query(query)),
                "list nearby posts",
            )
            .await?;
        records.into_iter().map(Pin::try_from).collect()
    }

    async fn get_user(&self, id: UserId) -> Result<User> {
        let record: UserRecord = self
            .send_json(
                self.client.get(self.url(&format!("/users/{id}"))),
                "get user",
            )
            .await?;
        User::try_from(record)
    }

    async fn create_user(&self, profile: &NewUser) -> Result<UserId> {
        let body = NewUserRecord::new(profile, chrono::Local::now().naive_local());
        self.send_for_id(
            self.client.post(self.url("/users")).json(&body),
            "create user",
            "user",
            UserId::new,
        )
        .await
    }

    async fn login(&self, credentials: &Credentials) -> Result<UserId> {
        self.send_for_id(
            self.client.post(self.url("/login")).json(credentials),
            "login",
            "user",
            UserId::new,
        )
        .await
        .map_err(|error| match error {
            Error::Rejected(message) | Error::NotFound(message) | Error::Auth(message) => {
                Error::Credentials(message)
            }
            other => other,
        })
    }

    async fn logout(&self) -> Result<()> {
        self.send(self.client.post(self.url("/logout")), "logout")
            .await?;
        Ok(())
    }

    async fn create_folder(&self, payload: &FolderPayload) -> Result<FolderId> {
        self.send_for_id(
            self.client
                .post(self.url("/folders"))
                .json(&FolderRecord::new_folder(payload)),
            "create folder",
            "folder",
            FolderId::new,
        )
        .await
    }

    async fn update_folder(&self, folder: &Folder) -> Result<()> {
        self.send(
            self.client
                .put(self.url("/folders"))
                .json(&FolderRecord::from(folder)),
            "update folder",
        )
        .await?;
        Ok(())
    }

    async fn delete_folder(&self, id: FolderId) -> Result<()> {
        self.send(
            self.client.delete(self.url(&format!("/folders/{id}"))),
            "delete folder",
        )
        .await?;
        Ok(())
    }

    async fn list_folders_for_user(&self, user_id: UserId) -> Result<Vec<Folder>> {
        let records: Vec<FolderRecord> = self
            .send_json(
                self.client
                    .get(self.url(&format!("/folders/user/{user_id}"))),
                "list folders",
            )
            .await?;
        records.into_iter().map(Folder::try_from).collect()
    }

    async fn list_friends(&self, user_id: UserId) -> Result<Vec<Friendship>> {
        let records: Vec<FriendshipRecord> = self
            .send_json(
                self.client
                    .get(self.url(&format!("/friendships/accepted/{user_id}"))),
                "list friends",
            )
            .await?;
        records.into_iter().map(Friendship::try_from).collect()
    }

    async fn list_friend_requests(
        &self,
        user_id: UserId,
        direction: RequestDirection,
    ) -> Result<Vec<Friendship>> {
        let route = format!("/friendships/{}/{user_id}", request_route(direction));
        let records: Vec<FriendshipRecord> = self
            .send_json(self.client.get(self.url(&route)), "list friend requests")
            .await?;
        records.into_iter().map(Friendship::try_from).collect()
    }

    async fn request_friend(&self, requester: UserId, receiver: UserId) -> Result<FriendshipId> {
        let body = FriendshipRequestRecord {
            requester_id: requester,
            receiver_id: receiver,
        };
        self.send_for_id(
            self.client.post(self.url("/friendships")).json(&body),
            "request friend",
            "friendship",
            FriendshipId::new,
        )
        .await
    }

    async fn accept_friend(&self, requester: UserId, receiver: UserId) -> Result<()> {
        let body = FriendshipRequestRecord {
            requester_id: requester,
            receiver_id: receiver,
        };
        self.send(
            self.client.put(self.url("/friendships")).json(&body),
            "accept friend",
        )
        .await?;
        Ok(())
    }

    async fn remove_friend(&self, requester: UserId, receiver: UserId) -> Result<()> {
        self.send(
            self.client
                .delete(self.url(&format!("/friendships/{requester}/{receiver}"))),
            "remove friend",
        )
        .await?;
        Ok(())
    }
}
