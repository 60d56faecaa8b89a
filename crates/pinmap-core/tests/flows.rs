//! End-to-end controller flows against a recording in-memory backend.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use pinmap_core::api::ApiGateway;
use pinmap_core::models::{
    Attachment, Credentials, Folder, FolderId, FolderPayload, Friendship, FriendshipId,
    NearbyQuery, NewUser, Page, PageRequest, Pin, PinId, PinPayload, PinScope, PinVisibility,
    RequestDirection, User, UserId,
};
use pinmap_core::state::{
    submit::{delete_selected_pin, submit_draft},
    AppState, DetailOrigin, DraftEdit, DraftPhase, Intent, ListSlot, MemorySessionStore,
    PendingAction, SelectedLocation, SessionController, SessionStore, StoredSession,
};
use pinmap_core::{Error, ErrorKind, Result};
use pretty_assertions::assert_eq;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    CreatePin(PinPayload, usize),
    UpdatePin(PinId, PinPayload),
    DeletePin(PinId),
    GetPin(PinId),
    ListPins(PinScope),
    NearbyPins,
    GetUser(UserId),
    CreateUser(String),
    Login(String),
    Logout,
    Folder,
    Friend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    NotFound,
    Network,
}

impl Failure {
    fn into_error(self, what: &str) -> Error {
        match self {
            Self::NotFound => Error::NotFound(what.to_string()),
            Self::Network => Error::Network(format!("{what}: connection reset")),
        }
    }
}

#[derive(Debug)]
struct FakeBackend {
    calls: Mutex<Vec<Call>>,
    users: Mutex<Vec<(User, String)>>,
    pins: Mutex<Vec<Pin>>,
    next_id: AtomicI64,
    user_failure: Mutex<Option<Failure>>,
    logout_failure: Mutex<Option<Failure>>,
}

impl FakeBackend {
    fn new() -> Self {
        let backend = Self {
            calls: Mutex::new(Vec::new()),
            users: Mutex::new(Vec::new()),
            pins: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(100),
            user_failure: Mutex::new(None),
            logout_failure: Mutex::new(None),
        };
        backend.add_user("alice", "secret");
        backend
    }

    fn add_user(&self, username: &str, password: &str) -> UserId {
        let id = self.allocate(UserId::new);
        self.users.lock().unwrap().push((
            User {
                id,
                username: username.to_string(),
                phone_number: None,
                created_at: None,
            },
            password.to_string(),
        ));
        id
    }

    fn alice(&self) -> UserId {
        self.users.lock().unwrap()[0].0.id
    }

    fn seed_pin(&self, title: &str, content: &str) -> Pin {
        let pin = Pin {
            id: self.allocate(PinId::new),
            user_id: self.alice(),
            title: title.to_string(),
            content: content.to_string(),
            latitude: 37.55,
            longitude: 126.99,
            visibility: PinVisibility::Public,
            like_count: 0,
            view_count: 0,
            files: Vec::new(),
            created_at: None,
        };
        self.pins.lock().unwrap().push(pin.clone());
        pin
    }

    fn allocate<T>(&self, wrap: fn(i64) -> Option<T>) -> T {
        let raw = self.next_id.fetch_add(1, Ordering::SeqCst);
        wrap(raw).unwrap()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn pin_writes(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| {
                matches!(
                    call,
                    Call::CreatePin(..) | Call::UpdatePin(..) | Call::DeletePin(_)
                )
            })
            .collect()
    }

    fn fail_user_lookup(&self, failure: Option<Failure>) {
        *self.user_failure.lock().unwrap() = failure;
    }

    fn fail_logout(&self, failure: Option<Failure>) {
        *self.logout_failure.lock().unwrap() = failure;
    }

    fn pin_from_payload(id: PinId, payload: &PinPayload) -> Pin {
        Pin {
            id,
            user_id: payload.user_id,
            title: payload.title.clone(),
            content: payload.content.clone(),
            latitude: payload.latitude,
            longitude: payload.longitude,
            visibility: payload.visibility,
            like_count: 0,
            view_count: 0,
            files: Vec::new(),
            created_at: None,
        }
    }
}

impl ApiGateway for FakeBackend {
    async fn create_pin(&self, payload: &PinPayload, files: &[Attachment]) -> Result<PinId> {
        self.record(Call::CreatePin(payload.clone(), files.len()));
        let id = self.allocate(PinId::new);
        self.pins
            .lock()
            .unwrap()
            .push(Self::pin_from_payload(id, payload));
        Ok(id)
    }

    async fn update_pin(
        &self,
        id: PinId,
        payload: &PinPayload,
        _files: &[Attachment],
    ) -> Result<PinId> {
        self.record(Call::UpdatePin(id, payload.clone()));
        let mut pins = self.pins.lock().unwrap();
        let slot = pins
            .iter_mut()
            .find(|pin| pin.id == id)
            .ok_or_else(|| Error::NotFound(format!("post {id}")))?;
        *slot = Self::pin_from_payload(id, payload);
        Ok(id)
    }

    async fn delete_pin(&self, id: PinId) -> Result<()> {
        self.record(Call::DeletePin(id));
        let mut pins = self.pins.lock().unwrap();
        let before = pins.len();
        pins.retain(|pin| pin.id != id);
        if pins.len() == before {
            return Err(Error::NotFound(format!("post {id}")));
        }
        Ok(())
    }

    async fn get_pin(&self, id: PinId) -> Result<Pin> {
        self.record(Call::GetPin(id));
        self.pins
            .lock()
            .unwrap()
            .iter()
            .find(|pin| pin.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("post {id}")))
    }

    async fn list_pins(&self, scope: PinScope, page: PageRequest) -> Result<Page<Pin>> {
        self.record(Call::ListPins(scope));
        let items = self
            .pins
            .lock()
            .unwrap()
            .iter()
            .filter(|pin| scope.author().is_none_or(|author| pin.user_id == author))
            .cloned()
            .collect();
        Ok(Page {
            items,
            page: page.page,
            total_pages: 1,
        })
    }

    async fn nearby_pins(&self, _query: NearbyQuery) -> Result<Vec<Pin>> {
        self.record(Call::NearbyPins);
        Ok(self.pins.lock().unwrap().clone())
    }

    async fn get_user(&self, id: UserId) -> Result<User> {
        self.record(Call::GetUser(id));
        if let Some(failure) = *self.user_failure.lock().unwrap() {
            return Err(failure.into_error("user"));
        }
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|(user, _)| user.id == id)
            .map(|(user, _)| user.clone())
            .ok_or_else(|| Error::NotFound(format!("user {id}")))
    }

    async fn create_user(&self, profile: &NewUser) -> Result<UserId> {
        let username = profile.username.trim();
        self.record(Call::CreateUser(username.to_string()));
        Ok(self.add_user(username, &profile.password))
    }

    async fn login(&self, credentials: &Credentials) -> Result<UserId> {
        self.record(Call::Login(credentials.username.clone()));
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|(user, password)| {
                user.username == credentials.username && *password == credentials.password
            })
            .map(|(user, _)| user.id)
            .ok_or_else(|| Error::Rejected("bad credentials".to_string()))
    }

    async fn logout(&self) -> Result<()> {
        self.record(Call::Logout);
        match *self.logout_failure.lock().unwrap() {
            Some(failure) => Err(failure.into_error("logout")),
            None => Ok(()),
        }
    }

    async fn create_folder(&self, _payload: &FolderPayload) -> Result<FolderId> {
        self.record(Call::Folder);
        Ok(self.allocate(FolderId::new))
    }

    async fn update_folder(&self, _folder: &Folder) -> Result<()> {
        self.record(Call::Folder);
        Ok(())
    }

    async fn delete_folder(&self, _id: FolderId) -> Result<()> {
        self.record(Call::Folder);
        Ok(())
    }

    async fn list_folders_for_user(&self, _user_id: UserId) -> Result<Vec<Folder>> {
        self.record(Call::Folder);
        Ok(Vec::new())
    }

    async fn list_friends(&self, _user_id: UserId) -> Result<Vec<Friendship>> {
        self.record(Call::Friend);
        Ok(Vec::new())
    }

    async fn list_friend_requests(
        &self,
        _user_id: UserId,
        _direction: RequestDirection,
    ) -> Result<Vec<Friendship>> {
        self.record(Call::Friend);
        Ok(Vec::new())
    }

    async fn request_friend(&self, _requester: UserId, _receiver: UserId) -> Result<FriendshipId> {
        self.record(Call::Friend);
        Ok(self.allocate(FriendshipId::new))
    }

    async fn accept_friend(&self, _requester: UserId, _receiver: UserId) -> Result<()> {
        self.record(Call::Friend);
        Ok(())
    }

    async fn remove_friend(&self, _requester: UserId, _receiver: UserId) -> Result<()> {
        self.record(Call::Friend);
        Ok(())
    }
}

async fn signed_in(backend: &FakeBackend) -> (AppState, SessionController<MemorySessionStore>) {
    let mut state = AppState::new();
    let session = SessionController::new(MemorySessionStore::default());
    session
        .login(&mut state, backend, &Credentials::new("alice", "secret"))
        .await
        .unwrap();
    (state, session)
}

fn seoul_tower() -> SelectedLocation {
    SelectedLocation::new("Seoul Tower", 37.55, 126.99)
}

#[tokio::test]
async fn trip_to_seoul_tower_is_sent_with_date_marker() {
    let backend = FakeBackend::new();
    let (mut state, _session) = signed_in(&backend).await;

    state.dispatch(Intent::ToggleEditor);
    state.dispatch(Intent::EditDraft(DraftEdit::Title("Trip".to_string())));
    state.dispatch(Intent::OpenLocationPicker);
    state.dispatch(Intent::SelectLocation(seoul_tower()));
    state.dispatch(Intent::EditDraft(DraftEdit::Content("Great view".to_string())));
    state.dispatch(Intent::EditDraft(DraftEdit::Date("2025-01-01".to_string())));
    let before = state.refresh_token().value();

    let id = submit_draft(&mut state, &backend).await.unwrap();

    let writes = backend.pin_writes();
    assert_eq!(writes.len(), 1);
    let Call::CreatePin(payload, files) = &writes[0] else {
        panic!("expected a create, got {writes:?}");
    };
    assert_eq!(payload.content, "📅 2025-01-01\n\nGreat view");
    assert_eq!(payload.title, "Trip");
    assert_eq!(payload.latitude, 37.55);
    assert_eq!(payload.longitude, 126.99);
    assert_eq!(payload.visibility, PinVisibility::Public);
    assert_eq!(*files, 0);

    assert_eq!(state.refresh_token().value(), before + 1);
    assert!(!state.visibility().show_pin_editor);
    assert!(state.draft().is_blank());
    assert!(state.selected_location().is_none());
    assert_eq!(state.pending(), None);
    assert!(backend.get_pin(id).await.is_ok());
}

#[tokio::test]
async fn empty_title_never_reaches_the_gateway() {
    let backend = FakeBackend::new();
    let (mut state, _session) = signed_in(&backend).await;
    let calls_before = backend.calls().len();

    state.toggle_editor();
    state.edit_draft(DraftEdit::Content("Great view".to_string()));
    state.select_location(seoul_tower());
    let result = submit_draft(&mut state, &backend).await;

    assert!(matches!(result, Err(ref error) if error.kind() == ErrorKind::Validation));
    assert_eq!(backend.calls().len(), calls_before);
    assert_eq!(state.pending(), None);
    assert!(state.visibility().show_pin_editor);
}

#[tokio::test]
async fn hydrate_submit_hydrate_round_trips_date_and_body() {
    let backend = FakeBackend::new();
    let (mut state, _session) = signed_in(&backend).await;
    let original = backend.seed_pin("Trip", "📅 2025-01-01\n\nGreat view\nsecond line");

    state.open_pin_detail(original.clone(), DetailOrigin::Other);
    state.open_edit_from_detail(original.clone());
    let first = state.draft().clone();
    assert_eq!(first.date_str, "2025-01-01");
    assert_eq!(first.content, "Great view\nsecond line");
    assert_eq!(state.draft_phase(), DraftPhase::Hydrated(original.id));

    let id = submit_draft(&mut state, &backend).await.unwrap();
    assert_eq!(id, original.id);
    assert!(matches!(backend.pin_writes()[0], Call::UpdatePin(target, _) if target == original.id));

    let reloaded = backend.get_pin(id).await.unwrap();
    assert_eq!(reloaded.content, original.content);
    state.open_pin_detail(reloaded.clone(), DetailOrigin::Other);
    state.open_edit_from_detail(reloaded);
    assert_eq!(state.draft().date_str, first.date_str);
    assert_eq!(state.draft().content, first.content);
}

#[tokio::test]
async fn edit_keeps_existing_location_when_none_is_picked() {
    let backend = FakeBackend::new();
    let (mut state, _session) = signed_in(&backend).await;
    let pin = backend.seed_pin("Cafe", "Latte");

    state.open_pin_detail(pin.clone(), DetailOrigin::PinList);
    state.open_edit_from_detail(pin.clone());
    state.edit_draft(DraftEdit::Title("Cafe again".to_string()));
    submit_draft(&mut state, &backend).await.unwrap();

    let Call::UpdatePin(_, payload) = &backend.pin_writes()[0] else {
        panic!("expected an update");
    };
    assert_eq!(payload.title, "Cafe again");
    assert_eq!(payload.latitude, pin.latitude);
    assert_eq!(payload.longitude, pin.longitude);
}

#[tokio::test]
async fn saving_an_edit_from_folder_detail_reopens_the_folder_browser() {
    let backend = FakeBackend::new();
    let (mut state, _session) = signed_in(&backend).await;
    let pin = backend.seed_pin("Trip", "Great view");

    state.toggle_folder_browser();
    state.open_pin_detail(pin.clone(), DetailOrigin::FolderBrowser);
    state.open_edit_from_detail(pin);
    state.edit_draft(DraftEdit::Title("Trip again".to_string()));
    submit_draft(&mut state, &backend).await.unwrap();

    let visibility = state.visibility();
    assert!(visibility.show_folder_browser);
    assert!(!visibility.show_pin_editor);
    assert!(!visibility.show_pin_detail);
    assert!(!visibility.show_pin_list_overlay);
    assert_eq!(visibility.pin_detail_origin, DetailOrigin::Other);
    assert!(state.selected_post().is_none());
}

#[tokio::test]
async fn close_detail_restores_only_its_origin() {
    let backend = FakeBackend::new();
    let (mut state, _session) = signed_in(&backend).await;
    let pin = backend.seed_pin("Trip", "Great view");

    for origin in [
        DetailOrigin::FolderBrowser,
        DetailOrigin::PinList,
        DetailOrigin::Other,
    ] {
        match origin {
            DetailOrigin::FolderBrowser => state.toggle_folder_browser(),
            DetailOrigin::PinList => state.toggle_pin_list_overlay(),
            DetailOrigin::Other => {}
        }
        state.open_pin_detail(pin.clone(), origin);
        state.close_pin_detail();

        let visibility = state.visibility();
        assert!(!visibility.show_pin_detail);
        assert_eq!(
            visibility.show_folder_browser,
            origin == DetailOrigin::FolderBrowser
        );
        assert_eq!(
            visibility.show_pin_list_overlay,
            origin == DetailOrigin::PinList
        );
        assert!(!visibility.show_friend_overlay);
        assert_eq!(visibility.pin_detail_origin, DetailOrigin::Other);

        state.global_reset();
    }
}

#[tokio::test]
async fn cancel_edit_from_folder_detail_returns_to_detail() {
    let backend = FakeBackend::new();
    let (mut state, _session) = signed_in(&backend).await;
    let pin = backend.seed_pin("Trip", "Great view");

    state.dispatch(Intent::ToggleFolderBrowser);
    state.dispatch(Intent::OpenPinDetail {
        post: pin.clone(),
        origin: DetailOrigin::FolderBrowser,
    });
    state.dispatch(Intent::OpenEditFromDetail(pin.clone()));
    state.dispatch(Intent::EditDraft(DraftEdit::Title("Changed".to_string())));
    state.dispatch(Intent::CancelEditor);

    let visibility = state.visibility();
    assert!(visibility.show_pin_detail);
    assert!(!visibility.show_folder_browser);
    assert!(!visibility.show_pin_editor);
    assert_eq!(visibility.pin_detail_origin, DetailOrigin::FolderBrowser);
    assert_eq!(state.selected_post().map(|post| post.id), Some(pin.id));
    assert!(state.draft().is_blank());
    assert!(backend.pin_writes().is_empty());

    state.dispatch(Intent::ClosePinDetail);
    assert!(state.visibility().show_folder_browser);
}

#[tokio::test]
async fn location_picker_round_trip_restores_draft() {
    let backend = FakeBackend::new();
    let (mut state, _session) = signed_in(&backend).await;

    state.toggle_editor();
    state.edit_draft(DraftEdit::Title("Trip".to_string()));
    state.edit_draft(DraftEdit::Content("Great view".to_string()));
    state.edit_draft(DraftEdit::Date("2025-01-01".to_string()));
    state.edit_draft(DraftEdit::Attach(Attachment::new(
        "photo.jpg",
        "image/jpeg",
        vec![1_u8, 2, 3],
    )));
    let before = state.draft().clone();

    state.open_location_picker();
    assert!(!state.visibility().show_pin_editor);
    assert!(state.visibility().show_location_picker);
    state.select_location(seoul_tower());

    assert_eq!(state.draft().title, before.title);
    assert_eq!(state.draft().content, before.content);
    assert_eq!(state.draft().date_str, before.date_str);
    assert!(state.draft().attachments[0].shares_bytes_with(&before.attachments[0]));
    assert_eq!(state.selected_location(), Some(&seoul_tower()));
    assert!(state.visibility().show_pin_editor);
}

#[tokio::test]
async fn global_reset_closes_everything_and_bumps_once() {
    let backend = FakeBackend::new();
    let (mut state, _session) = signed_in(&backend).await;
    let pin = backend.seed_pin("Trip", "Great view");

    state.toggle_friend_overlay();
    state.toggle_pin_list_overlay();
    state.open_pin_detail(pin, DetailOrigin::PinList);
    state.toggle_editor();
    state.edit_draft(DraftEdit::Title("Half typed".to_string()));
    state.open_location_picker();
    let before = state.refresh_token().value();

    state.global_reset();

    assert!(state.visibility().all_closed());
    assert!(state.draft().is_blank());
    assert!(!state.has_suspended_draft());
    assert!(state.selected_post().is_none());
    assert!(state.selected_location().is_none());
    assert_eq!(state.refresh_token().value(), before + 1);
}

#[tokio::test]
async fn failed_submit_keeps_draft_for_retry() {
    let backend = FakeBackend::new();
    let (mut state, _session) = signed_in(&backend).await;
    state.toggle_editor();
    state.edit_draft(DraftEdit::Title("Trip".to_string()));
    state.edit_draft(DraftEdit::Content("Great view".to_string()));
    state.select_location(seoul_tower());

    backend.fail_user_lookup(Some(Failure::Network));
    let result = submit_draft(&mut state, &backend).await;
    assert!(matches!(result, Err(Error::Network(_))));
    assert!(backend.pin_writes().is_empty());
    assert_eq!(state.draft().title, "Trip");
    assert!(state.notice().is_some());

    backend.fail_user_lookup(None);
    submit_draft(&mut state, &backend).await.unwrap();
    assert_eq!(backend.pin_writes().len(), 1);
}

#[tokio::test]
async fn vanished_author_is_an_auth_failure() {
    let backend = FakeBackend::new();
    let (mut state, _session) = signed_in(&backend).await;
    state.toggle_editor();
    state.edit_draft(DraftEdit::Title("Trip".to_string()));
    state.edit_draft(DraftEdit::Content("Great view".to_string()));
    state.select_location(seoul_tower());

    backend.fail_user_lookup(Some(Failure::NotFound));
    let result = submit_draft(&mut state, &backend).await;

    assert!(matches!(result, Err(Error::Auth(_))));
    assert!(backend.pin_writes().is_empty());
}

#[tokio::test]
async fn submit_pending_across_logout_is_discarded() {
    let backend = FakeBackend::new();
    let (mut state, session) = signed_in(&backend).await;
    state.toggle_editor();
    state.edit_draft(DraftEdit::Title("Trip".to_string()));
    state.edit_draft(DraftEdit::Content("Great view".to_string()));
    state.select_location(seoul_tower());

    let request = state.begin_submit().unwrap();
    assert_eq!(state.pending(), Some(PendingAction::Submit));
    session.logout(&mut state, &backend).await.unwrap();
    let token = state.refresh_token();

    let outcome = backend.create_pin(&request.payload, &request.attachments).await;
    let _ = state.finish_submit(&request, outcome);

    assert_eq!(state.refresh_token(), token);
    assert!(state.notice().is_none());
    assert_eq!(state.current_user_id(), None);
}

#[tokio::test]
async fn delete_from_pin_list_refreshes_and_restores_list() {
    let backend = FakeBackend::new();
    let (mut state, _session) = signed_in(&backend).await;
    let pin = backend.seed_pin("Trip", "Great view");
    state.toggle_pin_list_overlay();
    state.open_pin_detail(pin.clone(), DetailOrigin::PinList);
    let before = state.refresh_token().value();

    delete_selected_pin(&mut state, &backend).await.unwrap();

    assert_eq!(backend.pin_writes(), vec![Call::DeletePin(pin.id)]);
    assert!(state.visibility().show_pin_list_overlay);
    assert!(!state.visibility().show_pin_detail);
    assert_eq!(state.refresh_token().value(), before + 1);

    state.open_pin_detail(pin, DetailOrigin::PinList);
    let result = delete_selected_pin(&mut state, &backend).await;
    assert!(matches!(result, Err(Error::NotFound(_))));
    assert!(!state.visibility().show_pin_detail);
}

#[tokio::test]
async fn list_view_reloads_after_submit() {
    let backend = FakeBackend::new();
    let (mut state, _session) = signed_in(&backend).await;
    let me = state.current_user_id().unwrap();
    let mut slot = ListSlot::<Pin>::default();
    let mut changes = state.refresh().subscribe();

    let ticket = slot.begin_load(state.refresh_token());
    let (profile, page) = tokio::join!(
        backend.get_user(me),
        backend.list_pins(PinScope::Mine(me), PageRequest::default())
    );
    assert_eq!(profile.unwrap().username, "alice");
    assert!(slot.apply(&ticket, page.unwrap().items));
    assert!(slot.items().is_empty());
    assert!(!slot.needs_reload(state.refresh_token()));

    state.toggle_editor();
    state.edit_draft(DraftEdit::Title("Trip".to_string()));
    state.edit_draft(DraftEdit::Content("Great view".to_string()));
    state.select_location(seoul_tower());
    submit_draft(&mut state, &backend).await.unwrap();

    assert!(changes.has_changed().unwrap());
    assert!(slot.needs_reload(state.refresh_token()));
    let ticket = slot.begin_load(state.refresh_token());
    let page = backend
        .list_pins(PinScope::Mine(me), PageRequest::default())
        .await
        .unwrap();
    assert!(slot.apply(&ticket, page.items));
    assert_eq!(slot.items().len(), 1);
}

#[tokio::test]
async fn login_persists_session_and_resets_views() {
    let backend = FakeBackend::new();
    let store = MemorySessionStore::default();
    let session = SessionController::new(store.clone());
    let mut state = AppState::new();
    state.toggle_friend_overlay();
    let before = state.refresh_token().value();

    let profile = session
        .login(&mut state, &backend, &Credentials::new("alice", "secret"))
        .await
        .unwrap();

    assert_eq!(profile.username, "alice");
    assert_eq!(state.current_user_id(), Some(backend.alice()));
    assert!(state.visibility().all_closed());
    assert_eq!(state.refresh_token().value(), before + 1);
    assert_eq!(
        store.load().unwrap(),
        Some(StoredSession {
            user_id: backend.alice(),
            signed_in: true,
        })
    );
}

#[tokio::test]
async fn rejected_login_leaves_state_untouched() {
    let backend = FakeBackend::new();
    let store = MemorySessionStore::default();
    let session = SessionController::new(store.clone());
    let mut state = AppState::new();
    state.toggle_friend_overlay();
    let before = state.refresh_token();

    let result = session
        .login(&mut state, &backend, &Credentials::new("alice", "wrong"))
        .await;

    let error = result.unwrap_err();
    assert!(matches!(error, Error::Credentials(_)));
    assert_eq!(error.kind(), ErrorKind::Auth);
    assert!(error.user_message().contains("username and password"));
    assert!(state.visibility().show_friend_overlay);
    assert_eq!(state.refresh_token(), before);
    assert_eq!(store.load().unwrap(), None);
}

#[tokio::test]
async fn blank_credentials_skip_the_backend() {
    let backend = FakeBackend::new();
    let session = SessionController::new(MemorySessionStore::default());
    let mut state = AppState::new();

    let result = session
        .login(&mut state, &backend, &Credentials::new("alice", "  "))
        .await;

    assert!(matches!(result, Err(Error::Credentials(_))));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn logout_clears_local_session_even_if_backend_fails() {
    let backend = FakeBackend::new();
    let (mut state, session) = signed_in(&backend).await;
    state.toggle_editor();
    state.edit_draft(DraftEdit::Title("Unsaved".to_string()));
    backend.fail_logout(Some(Failure::Network));
    let before = state.refresh_token().value();

    session.logout(&mut state, &backend).await.unwrap();

    assert_eq!(state.current_user_id(), None);
    assert!(state.draft().is_blank());
    assert!(state.visibility().all_closed());
    assert_eq!(state.refresh_token().value(), before + 1);
    assert_eq!(session.store().load().unwrap(), None);
}

#[tokio::test]
async fn register_signs_into_the_new_account() {
    let backend = FakeBackend::new();
    let session = SessionController::new(MemorySessionStore::default());
    let mut state = AppState::new();

    let user = session
        .register(
            &mut state,
            &backend,
            &NewUser::new(" bob ", "hunter2"),
        )
        .await
        .unwrap();

    assert_eq!(state.current_user_id(), Some(user.id));
    assert!(backend.calls().contains(&Call::CreateUser("bob".to_string())));
    assert!(backend.calls().contains(&Call::Login("bob".to_string())));
}

#[tokio::test]
async fn restore_on_boot_handles_each_stored_state() {
    let backend = FakeBackend::new();
    let alice = backend.alice();

    let empty = SessionController::new(MemorySessionStore::default());
    let mut state = AppState::new();
    assert_eq!(empty.restore_on_boot(&mut state, &backend).await.unwrap(), None);
    assert_eq!(state.current_user_id(), None);

    let stored = StoredSession {
        user_id: alice,
        signed_in: true,
    };
    let session = SessionController::new(MemorySessionStore::with_session(stored));
    let restored = session.restore_on_boot(&mut state, &backend).await.unwrap();
    assert_eq!(restored, Some(alice));
    assert_eq!(
        state.session().profile().map(|user| user.username.as_str()),
        Some("alice")
    );

    backend.fail_user_lookup(Some(Failure::Network));
    let mut offline = AppState::new();
    let session = SessionController::new(MemorySessionStore::with_session(stored));
    let restored = session.restore_on_boot(&mut offline, &backend).await.unwrap();
    assert_eq!(restored, Some(alice));
    assert!(offline.session().profile().is_none());

    backend.fail_user_lookup(Some(Failure::NotFound));
    let mut gone = AppState::new();
    let session = SessionController::new(MemorySessionStore::with_session(stored));
    let restored = session.restore_on_boot(&mut gone, &backend).await.unwrap();
    assert_eq!(restored, None);
    assert_eq!(gone.current_user_id(), None);
    assert_eq!(session.store().load().unwrap(), None);
}

#[tokio::test]
async fn register_without_password_never_creates_a_user() {
    let backend = FakeBackend::new();
    let session = SessionController::new(MemorySessionStore::default());
    let mut state = AppState::new();

    let error = session
        .register(&mut state, &backend, &NewUser::new("bob", " "))
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Auth);
    assert!(backend.calls().is_empty());
    assert_eq!(state.current_user_id(), None);
}
