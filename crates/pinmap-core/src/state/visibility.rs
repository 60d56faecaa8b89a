//! Overlay visibility flags

/// Which overlay opened the pin detail view, and therefore which one
/// regains visibility when the detail view closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailOrigin {
    FolderBrowser,
    PinList,
    /// Opened from the map or anywhere without a list overlay to restore
    #[default]
    Other,
}

/// Every overlay that can occlude the map.
///
/// The pin editor and pin detail share one layer and are never both shown.
/// `pin_detail_origin` is `Other` whenever the detail view is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct VisibilitySet {
    pub show_pin_editor: bool,
    /// Place search panel used to pick a pin location
    pub show_location_picker: bool,
    pub show_folder_browser: bool,
    pub show_pin_list_overlay: bool,
    pub show_pin_detail: bool,
    pub show_friend_overlay: bool,
    pub pin_detail_origin: DetailOrigin,
}

impl VisibilitySet {
    /// True when nothing covers the map.
    #[must_use]
    pub const fn all_closed(&self) -> bool {
        !self.show_pin_editor
            && !self.show_location_picker
            && !self.show_folder_browser
            && !self.show_pin_list_overlay
            && !self.show_pin_detail
            && !self.show_friend_overlay
    }

    /// Reports the first broken layering rule, if any.
    pub const fn check(&self) -> Result<(), &'static str> {
        if self.show_pin_editor && self.show_pin_detail {
            return Err("pin editor and pin detail are both visible");
        }
        if !self.show_pin_detail && !matches!(self.pin_detail_origin, DetailOrigin::Other) {
            return Err("pin detail origin is set while detail is closed");
        }
        Ok(())
    }

    pub(crate) fn set_overlay_for_origin(&mut self, origin: DetailOrigin, visible: bool) {
        match origin {
            DetailOrigin::FolderBrowser => self.show_folder_browser = visible,
            DetailOrigin::PinList => self.show_pin_list_overlay = visible,
            DetailOrigin::Other => {}
        }
    }
}
