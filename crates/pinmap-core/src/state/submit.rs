//! Pin submission and deletion.
//!
//! Each action runs in three steps so a view can render its trigger disabled
//! while the request is out: a synchronous `begin_*` that validates and marks
//! the action pending, the async gateway call, and a synchronous `finish_*`
//! that applies the outcome. Only one action may be pending at a time; the
//! backend has no idempotency key.

use crate::api::ApiGateway;
use crate::error::{Error, ErrorKind, Result, ValidationIssue};
use crate::models::{Attachment, PinId, PinPayload, UserId};

use super::{AppState, Notice};

/// The action currently waiting on the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    Submit,
    Delete(PinId),
}

/// Everything the gateway phase of a submit needs.
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    epoch: u64,
    pub user_id: UserId,
    /// Pin being updated; `None` creates a new pin
    pub target: Option<PinId>,
    pub payload: PinPayload,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteRequest {
    epoch: u64,
    pub target: PinId,
}

impl AppState {
    /// Whether the submit control should be enabled.
    pub fn can_submit(&self) -> bool {
        self.view.pending.is_none()
            && self.session.user_id().is_some()
            && self.submit_payload_check().is_ok()
    }

    fn submit_payload_check(&self) -> std::result::Result<(), ValidationIssue> {
        self.draft().validate()?;
        if self.submit_location().is_none() {
            return Err(ValidationIssue::MissingLocation);
        }
        Ok(())
    }

    fn submit_location(&self) -> Option<&super::SelectedLocation> {
        self.view
            .selected_location
            .as_ref()
            .or(self.draft().pinned_location.as_ref())
    }

    /// Validate the draft and mark a submit as pending.
    ///
    /// Validation failures return without touching any state; the view keeps
    /// the submit control disabled instead of showing a dialog.
    pub fn begin_submit(&mut self) -> Result<SubmitRequest> {
        if self.view.pending.is_some() {
            return Err(Error::Busy);
        }
        let Some(user_id) = self.session.user_id() else {
            let error = Error::Auth("sign in to save pins".to_string());
            self.set_notice(Notice::from_error(&error));
            return Err(error);
        };
        let location = self
            .submit_location()
            .ok_or(ValidationIssue::MissingLocation)?;
        let payload = self.draft().to_payload(user_id, location)?;

        let request = SubmitRequest {
            epoch: self.epoch,
            user_id,
            target: self.draft().edit_target_id,
            payload,
            attachments: self.draft().attachments.clone(),
        };
        self.view.pending = Some(PendingAction::Submit);
        self.view.notice = None;
        tracing::debug!(target = ?request.target, "submit started");
        Ok(request)
    }

    /// Apply the gateway outcome of a submit.
    ///
    /// On success the draft and selected location are cleared, the refresh
    /// token is bumped and the editor and detail views close. On failure the
    /// draft and overlays stay as they are so the user can retry.
    pub fn finish_submit(
        &mut self,
        request: &SubmitRequest,
        outcome: Result<PinId>,
    ) -> Result<PinId> {
        if request.epoch != self.epoch {
            tracing::debug!("discarding submit result from a previous session");
            return outcome;
        }
        self.view.pending = None;

        match outcome {
            Ok(id) => {
                self.view.drafts.clear();
                self.view.selected_location = None;
                self.view.visibility.show_pin_editor = false;
                if let Some(origin) = self.view.edit_return.take() {
                    self.view.visibility.set_overlay_for_origin(origin, true);
                }
                self.close_pin_detail();
                self.refresh.bump();
                let verb = if request.target.is_some() {
                    "updated"
                } else {
                    "saved"
                };
                tracing::info!(pin = %id, "pin {}", verb);
                self.set_notice(Notice::info(format!("Pin {verb}.")));
                Ok(id)
            }
            Err(error) => {
                tracing::warn!("Pin submit failed: {}", error);
                if error.kind() == ErrorKind::NotFound {
                    self.refresh.bump();
                }
                self.set_notice(Notice::from_error(&error));
                Err(error)
            }
        }
    }

    /// Mark deletion of the inspected pin as pending.
    pub fn begin_delete(&mut self) -> Result<DeleteRequest> {
        if self.view.pending.is_some() {
            return Err(Error::Busy);
        }
        let target = self
            .selected_post()
            .map(|post| post.id)
            .ok_or_else(|| Error::NotFound("no pin is selected".to_string()))?;
        self.view.pending = Some(PendingAction::Delete(target));
        self.view.notice = None;
        Ok(DeleteRequest {
            epoch: self.epoch,
            target,
        })
    }

    /// Apply the gateway outcome of a delete.
    ///
    /// A pin that already vanished is treated like a successful delete but
    /// reported to the user.
    pub fn finish_delete(&mut self, request: &DeleteRequest, outcome: Result<()>) -> Result<()> {
        if request.epoch != self.epoch {
            tracing::debug!("discarding delete result from a previous session");
            return outcome;
        }
        self.view.pending = None;

        match outcome {
            Ok(()) => {
                self.close_pin_detail();
                self.refresh.bump();
                tracing::info!(pin = %request.target, "pin deleted");
                self.set_notice(Notice::info("Pin deleted."));
                Ok(())
            }
            Err(error) if error.kind() == ErrorKind::NotFound => {
                self.close_pin_detail();
                self.refresh.bump();
                self.set_notice(Notice::from_error(&error));
                Err(error)
            }
            Err(error) => {
                tracing::warn!("Pin delete failed: {}", error);
                self.set_notice(Notice::from_error(&error));
                Err(error)
            }
        }
    }
}

/// Gateway phase of a submit: confirm the author still exists, then create or
/// update.
pub async fn send_submit<G: ApiGateway>(gateway: &G, request: &SubmitRequest) -> Result<PinId> {
    gateway
        .get_user(request.user_id)
        .await
        .map_err(|error| match error {
            Error::NotFound(message) => Error::Auth(message),
            other => other,
        })?;

    match request.target {
        Some(id) => {
            gateway
                .update_pin(id, &request.payload, &request.attachments)
                .await
        }
        None => {
            gateway
                .create_pin(&request.payload, &request.attachments)
                .await
        }
    }
}

/// Validate, send and apply a pin submit in one call.
pub async fn submit_draft<G: ApiGateway>(state: &mut AppState, gateway: &G) -> Result<PinId> {
    let request = state.begin_submit()?;
    let outcome = send_submit(gateway, &request).await;
    state.finish_submit(&request, outcome)
}

/// Delete the inspected pin in one call.
pub async fn delete_selected_pin<G: ApiGateway>(state: &mut AppState, gateway: &G) -> Result<()> {
    let request = state.begin_delete()?;
    let outcome = gateway.delete_pin(request.target).await;
    state.finish_delete(&request, outcome)
}
