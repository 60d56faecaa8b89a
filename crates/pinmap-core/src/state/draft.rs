//! In-progress pin draft and its suspend/resume snapshot

use crate::error::ValidationIssue;
use crate::models::{
    compose_content, leads_with_date_marker, parse_date, validate_coordinates, Attachment, Pin,
    PinId, PinPayload, PinVisibility, PlaceResult, UserId,
};

/// A chosen place for the pin being authored
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedLocation {
    pub address: String,
    pub lat: f64,
    pub lng: f64,
}

impl SelectedLocation {
    pub fn new(address: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            address: address.into(),
            lat,
            lng,
        }
    }

    /// A location known only by its coordinates, labelled with them.
    pub fn at(lat: f64, lng: f64) -> Self {
        Self::new(format!("{lat:.5}, {lng:.5}"), lat, lng)
    }
}

impl From<PlaceResult> for SelectedLocation {
    fn from(place: PlaceResult) -> Self {
        let address = if place.address.trim().is_empty() {
            place.name
        } else {
            place.address
        };
        Self {
            address,
            lat: place.lat,
            lng: place.lng,
        }
    }
}

/// The pin being composed or edited
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    pub title: String,
    /// Body text without the date marker
    pub content: String,
    /// `YYYY-MM-DD` or empty
    pub date_str: String,
    pub attachments: Vec<Attachment>,
    pub visibility: PinVisibility,
    /// Set when editing an existing pin
    pub edit_target_id: Option<PinId>,
    /// Where the edited pin already sits, used when no new location is picked
    pub pinned_location: Option<SelectedLocation>,
}

impl Draft {
    /// True when the draft carries nothing worth keeping.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty()
            && self.content.trim().is_empty()
            && self.date_str.trim().is_empty()
            && self.attachments.is_empty()
            && self.visibility == PinVisibility::default()
            && self.edit_target_id.is_none()
    }

    /// Local checks that must pass before any network call.
    pub fn validate(&self) -> Result<(), ValidationIssue> {
        if self.title.trim().is_empty() {
            return Err(ValidationIssue::MissingTitle);
        }
        if self.content.trim().is_empty() {
            return Err(ValidationIssue::MissingContent);
        }
        if !self.date_str.trim().is_empty() && parse_date(&self.date_str).is_none() {
            return Err(ValidationIssue::InvalidDate);
        }
        if self.date_str.trim().is_empty() && leads_with_date_marker(&self.content) {
            return Err(ValidationIssue::DateLineInContent);
        }
        Ok(())
    }

    /// Build the outbound body, merging the date back into the content.
    pub fn to_payload(
        &self,
        user_id: UserId,
        location: &SelectedLocation,
    ) -> Result<PinPayload, ValidationIssue> {
        self.validate()?;
        validate_coordinates(location.lat, location.lng)?;
        Ok(PinPayload {
            user_id,
            title: self.title.trim().to_string(),
            content: compose_content(&self.date_str, &self.content),
            latitude: location.lat,
            longitude: location.lng,
            visibility: self.visibility,
        })
    }

    fn from_post(post: &Pin) -> Self {
        let dated = post.dated_content();
        Self {
            title: post.title.clone(),
            content: dated.body,
            date_str: dated.date,
            attachments: Vec::new(),
            visibility: post.visibility,
            edit_target_id: Some(post.id),
            pinned_location: post
                .has_location()
                .then(|| SelectedLocation::at(post.latitude, post.longitude)),
        }
    }
}

/// Where the current edit session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DraftPhase {
    /// Nothing loaded or typed yet
    #[default]
    Empty,
    /// Loaded from an existing pin and not yet touched
    Hydrated(PinId),
    /// The user has changed something
    Dirty,
}

/// A single edit to the draft, as emitted by the editor form.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftEdit {
    Title(String),
    Content(String),
    Date(String),
    Visibility(PinVisibility),
    Attach(Attachment),
    RemoveAttachment(usize),
    ClearAttachments,
}

#[derive(Debug, Clone, PartialEq)]
struct SuspendedDraft {
    draft: Draft,
    phase: DraftPhase,
}

/// Owns the draft, its hydration phase and the suspended snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftState {
    draft: Draft,
    phase: DraftPhase,
    suspended: Option<SuspendedDraft>,
}

impl DraftState {
    pub const fn draft(&self) -> &Draft {
        &self.draft
    }

    pub const fn phase(&self) -> DraftPhase {
        self.phase
    }

    pub const fn is_suspended(&self) -> bool {
        self.suspended.is_some()
    }

    /// Load `post` into the draft once per edit session.
    ///
    /// Returns `false` without touching the draft when this post is already
    /// the session's source, so repeated renders never clobber user edits.
    pub fn hydrate_from_post(&mut self, post: &Pin) -> bool {
        let same_session = match self.phase {
            DraftPhase::Hydrated(id) => id == post.id,
            DraftPhase::Dirty => self.draft.edit_target_id == Some(post.id),
            DraftPhase::Empty => false,
        };
        if same_session {
            return false;
        }
        if self.phase == DraftPhase::Dirty {
            tracing::warn!(
                "Replacing unsaved draft with pin {} for editing",
                post.id
            );
        }
        self.draft = Draft::from_post(post);
        self.phase = DraftPhase::Hydrated(post.id);
        self.suspended = None;
        true
    }

    pub fn apply(&mut self, edit: DraftEdit) {
        match edit {
            DraftEdit::Title(title) => self.draft.title = title,
            DraftEdit::Content(content) => self.draft.content = content,
            DraftEdit::Date(date) => self.draft.date_str = date.trim().to_string(),
            DraftEdit::Visibility(visibility) => self.draft.visibility = visibility,
            DraftEdit::Attach(attachment) => self.draft.attachments.push(attachment),
            DraftEdit::RemoveAttachment(index) => {
                if index < self.draft.attachments.len() {
                    self.draft.attachments.remove(index);
                }
            }
            DraftEdit::ClearAttachments => self.draft.attachments.clear(),
        }
        self.phase = DraftPhase::Dirty;
        // The live draft is now newer than any snapshot.
        self.suspended = None;
    }

    /// Snapshot the draft so it survives the location picker.
    ///
    /// The attachment list is copied; the file bytes stay shared.
    pub fn suspend(&mut self) {
        self.suspended = Some(SuspendedDraft {
            draft: self.draft.clone(),
            phase: self.phase,
        });
    }

    /// Restore the snapshot verbatim. Returns `false` when there was none,
    /// which includes a snapshot superseded by later edits or hydration.
    pub fn resume(&mut self) -> bool {
        match self.suspended.take() {
            Some(snapshot) => {
                self.draft = snapshot.draft;
                self.phase = snapshot.phase;
                true
            }
            None => false,
        }
    }

    /// Drop the draft, the snapshot and the hydration phase.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
