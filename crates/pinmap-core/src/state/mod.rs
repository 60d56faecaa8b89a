//! Client state orchestration.
//!
//! [`AppState`] is the single authority for overlay visibility, the pin
//! draft, the selected location and post, the refresh token and the signed-in
//! session. Views read it through accessors and change it only through the
//! operations in [`navigation`], [`submit`] and [`session`], or by
//! dispatching an [`Intent`].

pub mod draft;
pub mod navigation;
pub mod refresh;
pub mod session;
pub mod submit;
pub mod visibility;

use crate::error::{Error, ErrorKind};
use crate::models::{Pin, User, UserId};

pub use draft::{Draft, DraftEdit, DraftPhase, DraftState, SelectedLocation};
pub use navigation::Intent;
pub use refresh::{FetchTicket, ListSlot, MountGuard, RefreshBroadcaster, RefreshToken};
pub use session::{MemorySessionStore, Session, SessionController, SessionStore, StoredSession};
pub use submit::{DeleteRequest, PendingAction, SubmitRequest};
pub use visibility::{DetailOrigin, VisibilitySet};

/// User-visible outcome of the last action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error(ErrorKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn from_error(error: &Error) -> Self {
        Self {
            level: NoticeLevel::Error(error.kind()),
            message: error.user_message(),
        }
    }
}

/// Everything a global reset puts back to its initial value.
#[derive(Debug, Clone, Default, PartialEq)]
struct ViewState {
    visibility: VisibilitySet,
    drafts: DraftState,
    selected_location: Option<SelectedLocation>,
    selected_post: Option<Pin>,
    /// Detail origin to return to when an edit entered from pin detail is cancelled
    edit_return: Option<DetailOrigin>,
    pending: Option<PendingAction>,
    notice: Option<Notice>,
}

/// Shared client state.
#[derive(Debug, Default)]
pub struct AppState {
    view: ViewState,
    refresh: RefreshBroadcaster,
    session: Session,
    /// Incremented by every global reset; in-flight results from an older
    /// epoch are discarded.
    epoch: u64,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn visibility(&self) -> &VisibilitySet {
        &self.view.visibility
    }

    pub const fn draft(&self) -> &Draft {
        self.view.drafts.draft()
    }

    pub const fn draft_phase(&self) -> DraftPhase {
        self.view.drafts.phase()
    }

    pub const fn has_suspended_draft(&self) -> bool {
        self.view.drafts.is_suspended()
    }

    pub const fn selected_location(&self) -> Option<&SelectedLocation> {
        self.view.selected_location.as_ref()
    }

    pub const fn selected_post(&self) -> Option<&Pin> {
        self.view.selected_post.as_ref()
    }

    pub const fn notice(&self) -> Option<&Notice> {
        self.view.notice.as_ref()
    }

    pub const fn pending(&self) -> Option<PendingAction> {
        self.view.pending
    }

    pub const fn session(&self) -> &Session {
        &self.session
    }

    pub fn current_user_id(&self) -> Option<UserId> {
        self.session.user_id()
    }

    pub fn refresh_token(&self) -> RefreshToken {
        self.refresh.current()
    }

    pub const fn refresh(&self) -> &RefreshBroadcaster {
        &self.refresh
    }

    /// Return every overlay, the draft and the selections to their initial
    /// values and bump the refresh token once.
    ///
    /// The session is left alone; login and logout set it around the reset.
    pub fn global_reset(&mut self) {
        self.view = ViewState::default();
        self.epoch += 1;
        self.refresh.bump();
        tracing::debug!(epoch = self.epoch, "global state reset");
    }

    pub fn dismiss_notice(&mut self) {
        self.view.notice = None;
    }

    pub(crate) fn sign_in(&mut self, user_id: UserId, profile: Option<User>) {
        self.session = Session::signed_in(user_id, profile);
        self.global_reset();
    }

    pub(crate) fn sign_out(&mut self) {
        self.session = Session::default();
        self.global_reset();
    }

    pub(crate) fn set_notice(&mut self, notice: Notice) {
        self.view.notice = Some(notice);
    }

    fn debug_check(&self) {
        let checked = self.view.visibility.check();
        debug_assert!(checked.is_ok(), "visibility invariant broken: {checked:?}");
    }
}
