use crate::model::{BackendOrigin, RequestId};
use crate::navigator::Navigator;
use crate::page::Page;
use crate::progress::ProgressSettings;
use crate::view_model::AppViewModel;

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    navigator: Navigator,
    next_request_id: RequestId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_settings(BackendOrigin::default(), ProgressSettings::default())
    }

    pub fn with_settings(origin: BackendOrigin, progress_settings: ProgressSettings) -> Self {
        Self {
            navigator: Navigator::new(origin, progress_settings),
            next_request_id: 1,
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel::build(self.navigator.page(), self.dirty)
    }

    pub fn page(&self) -> &Page {
        self.navigator.page()
    }

    pub fn origin(&self) -> &BackendOrigin {
        self.navigator.origin()
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn navigator_mut(&mut self) -> &mut Navigator {
        &mut self.navigator
    }

    pub(crate) fn allocate_request_id(&mut self) -> RequestId {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
