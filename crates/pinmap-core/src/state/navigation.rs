//! Overlay navigation: exclusivity and origin-aware restoration.
//!
//! Closing paths come in two kinds. An explicit cancel (`cancel_editor`, or
//! `toggle_editor` while the editor is open) always clears the draft.
//! Incidental navigation (detail taking over the editor's layer, the location
//! picker interrupting the editor) never does.

use crate::models::Pin;

use super::draft::{DraftEdit, SelectedLocation};
use super::visibility::DetailOrigin;
use super::AppState;

/// Everything a view can ask the controller to do synchronously.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    OpenLocationPicker,
    CloseLocationPicker,
    SelectLocation(SelectedLocation),
    OpenPinDetail { post: Pin, origin: DetailOrigin },
    ClosePinDetail,
    OpenEditFromDetail(Pin),
    ToggleEditor,
    CancelEditor,
    ToggleFolderBrowser,
    TogglePinListOverlay,
    ToggleFriendOverlay,
    EditDraft(DraftEdit),
    DismissNotice,
}

impl AppState {
    pub fn dispatch(&mut self, intent: Intent) {
        tracing::trace!(?intent, "dispatch");
        match intent {
            Intent::OpenLocationPicker => self.open_location_picker(),
            Intent::CloseLocationPicker => self.close_location_picker(),
            Intent::SelectLocation(location) => self.select_location(location),
            Intent::OpenPinDetail { post, origin } => self.open_pin_detail(post, origin),
            Intent::ClosePinDetail => self.close_pin_detail(),
            Intent::OpenEditFromDetail(post) => self.open_edit_from_detail(post),
            Intent::ToggleEditor => self.toggle_editor(),
            Intent::CancelEditor => self.cancel_editor(),
            Intent::ToggleFolderBrowser => self.toggle_folder_browser(),
            Intent::TogglePinListOverlay => self.toggle_pin_list_overlay(),
            Intent::ToggleFriendOverlay => self.toggle_friend_overlay(),
            Intent::EditDraft(edit) => self.edit_draft(edit),
            Intent::DismissNotice => self.dismiss_notice(),
        }
    }

    /// Hide the editor behind the place search panel, keeping its draft.
    pub fn open_location_picker(&mut self) {
        let visibility = &mut self.view.visibility;
        if visibility.show_pin_editor {
            self.view.drafts.suspend();
            visibility.show_pin_editor = false;
        }
        visibility.show_location_picker = true;
        self.debug_check();
    }

    /// Take the picked place and hand control back to the editor.
    pub fn select_location(&mut self, location: SelectedLocation) {
        tracing::debug!(address = %location.address, "location selected");
        self.view.selected_location = Some(location);
        self.view.visibility.show_location_picker = false;
        self.hide_detail_for_editor();
        self.view.visibility.show_pin_editor = true;
        self.view.drafts.resume();
        self.debug_check();
    }

    /// Leave the picker without choosing a place.
    pub fn close_location_picker(&mut self) {
        self.view.visibility.show_location_picker = false;
        if self.view.drafts.resume() {
            self.hide_detail_for_editor();
            self.view.visibility.show_pin_editor = true;
        }
        self.debug_check();
    }

    pub fn open_pin_detail(&mut self, post: Pin, origin: DetailOrigin) {
        let visibility = &mut self.view.visibility;
        // A map click on top of an open detail keeps the list it came from.
        let origin = if visibility.show_pin_detail && origin == DetailOrigin::Other {
            visibility.pin_detail_origin
        } else {
            origin
        };

        visibility.show_pin_editor = false;
        visibility.set_overlay_for_origin(origin, false);
        visibility.show_pin_detail = true;
        visibility.pin_detail_origin = origin;
        self.view.edit_return = None;
        tracing::debug!(pin = %post.id, ?origin, "pin detail opened");
        self.view.selected_post = Some(post);
        self.debug_check();
    }

    /// Close the detail view and reopen exactly the overlay it came from.
    pub fn close_pin_detail(&mut self) {
        let visibility = &mut self.view.visibility;
        if visibility.show_pin_detail {
            let origin = visibility.pin_detail_origin;
            visibility.show_pin_detail = false;
            visibility.set_overlay_for_origin(origin, true);
            tracing::debug!(?origin, "pin detail closed");
        }
        visibility.pin_detail_origin = DetailOrigin::Other;
        self.view.selected_post = None;
        self.debug_check();
    }

    /// Switch from the detail view to editing `post`.
    ///
    /// The detail origin is parked on the edit session so a cancel can bring
    /// the detail view back.
    pub fn open_edit_from_detail(&mut self, post: Pin) {
        let visibility = &mut self.view.visibility;
        let origin = if visibility.show_pin_detail {
            visibility.pin_detail_origin
        } else {
            DetailOrigin::Other
        };
        visibility.show_pin_detail = false;
        visibility.pin_detail_origin = DetailOrigin::Other;
        visibility.show_pin_editor = true;

        self.view.drafts.hydrate_from_post(&post);
        self.view.edit_return = Some(origin);
        self.view.selected_post = Some(post);
        self.debug_check();
    }

    /// Flip the editor. Closing it this way is an explicit cancel.
    pub fn toggle_editor(&mut self) {
        if self.view.visibility.show_pin_editor {
            self.cancel_editor();
            return;
        }

        if self.view.drafts.draft().edit_target_id.is_none() && !self.view.drafts.draft().is_blank()
        {
            tracing::debug!("reopening editor with a kept draft");
        }
        if self.view.visibility.show_location_picker {
            // Reopening the editor abandons the pick. A snapshot only
            // survives when nothing was edited since it was taken.
            self.view.visibility.show_location_picker = false;
            self.view.drafts.resume();
        }
        self.hide_detail_for_editor();
        self.view.visibility.show_pin_editor = true;
        self.debug_check();
    }

    /// Abandon the current draft. An edit entered from pin detail returns to
    /// that detail view.
    pub fn cancel_editor(&mut self) {
        self.view.visibility.show_pin_editor = false;
        self.view.drafts.clear();

        match (self.view.edit_return.take(), self.view.selected_post.is_some()) {
            (Some(origin), true) => {
                let visibility = &mut self.view.visibility;
                visibility.show_location_picker = false;
                visibility.show_pin_detail = true;
                visibility.pin_detail_origin = origin;
            }
            _ => self.view.selected_post = None,
        }
        self.debug_check();
    }

    pub fn toggle_folder_browser(&mut self) {
        let visibility = &mut self.view.visibility;
        visibility.show_folder_browser = !visibility.show_folder_browser;
    }

    pub fn toggle_pin_list_overlay(&mut self) {
        let visibility = &mut self.view.visibility;
        visibility.show_pin_list_overlay = !visibility.show_pin_list_overlay;
    }

    pub fn toggle_friend_overlay(&mut self) {
        let visibility = &mut self.view.visibility;
        visibility.show_friend_overlay = !visibility.show_friend_overlay;
    }

    pub fn edit_draft(&mut self, edit: DraftEdit) {
        self.view.drafts.apply(edit);
    }

    /// The editor is about to take the detail view's layer.
    fn hide_detail_for_editor(&mut self) {
        let visibility = &mut self.view.visibility;
        if !visibility.show_pin_detail {
            return;
        }
        visibility.show_pin_detail = false;
        visibility.pin_detail_origin = DetailOrigin::Other;
        if self.view.drafts.draft().edit_target_id.is_none() {
            self.view.selected_post = None;
        }
    }
}
