//! Folder model

use serde::{Deserialize, Serialize};

use super::ids::{FolderId, PinId, UserId};

/// A named group of pins owned by one user
///
/// Membership lives on the folder: filing a pin means saving the folder with
/// the pin's id added to `pin_ids`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: FolderId,
    pub user_id: UserId,
    pub name: String,
    pub pin_ids: Vec<PinId>,
}

impl Folder {
    #[must_use]
    pub fn contains(&self, pin_id: PinId) -> bool {
        self.pin_ids.contains(&pin_id)
    }

    /// Add `pin_id` unless already filed. Returns whether the folder changed.
    pub fn file_pin(&mut self, pin_id: PinId) -> bool {
        if self.contains(pin_id) {
            return false;
        }
        self.pin_ids.push(pin_id);
        true
    }

    /// Remove `pin_id`. Returns whether the folder changed.
    pub fn unfile_pin(&mut self, pin_id: PinId) -> bool {
        let before = self.pin_ids.len();
        self.pin_ids.retain(|id| *id != pin_id);
        self.pin_ids.len() != before
    }
}

/// Fields for creating a folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderPayload {
    pub user_id: UserId,
    pub name: String,
    pub pin_ids: Vec<PinId>,
}

impl FolderPayload {
    pub fn new(user_id: UserId, name: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
            pin_ids: Vec::new(),
        }
    }
}
