use crate::form::FormState;
use crate::model::{FileSummary, ImageId};
use crate::viewport::Viewport;

/// Load state of one image on a result page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageStatus {
    Pending,
    /// Stored locally under `stored_as`, relative to the output directory.
    Loaded { stored_as: String },
    /// Loading failed; the element is hidden instead of showing a broken image.
    Hidden,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSlot {
    pub id: ImageId,
    pub url: String,
    pub status: ImageStatus,
}

impl ImageSlot {
    pub(crate) fn pending(id: ImageId, url: String) -> Self {
        Self {
            id,
            url,
            status: ImageStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GraphContent {
    pub(crate) image: ImageSlot,
    pub(crate) description: Option<String>,
    pub(crate) viewport: Viewport,
}

/// Single graph or graph plus description; `None` when navigated to without a payload.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphPage {
    pub(crate) content: Option<GraphContent>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryPage {
    pub(crate) diagram: Option<ImageSlot>,
    pub(crate) summaries: Vec<FileSummary>,
}

/// The page currently on screen. Owns all of its state.
#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    Home(FormState),
    Graph(GraphPage),
    GraphDescription(GraphPage),
    RepoSummary(SummaryPage),
}

impl Page {
    pub(crate) fn form_mut(&mut self) -> Option<&mut FormState> {
        match self {
            Page::Home(form) => Some(form),
            _ => None,
        }
    }

    pub(crate) fn viewport_mut(&mut self) -> Option<&mut Viewport> {
        match self {
            Page::Graph(page) | Page::GraphDescription(page) => {
                page.content.as_mut().map(|content| &mut content.viewport)
            }
            _ => None,
        }
    }

    pub(crate) fn image_mut(&mut self, image_id: ImageId) -> Option<&mut ImageSlot> {
        let slot = match self {
            Page::Graph(page) | Page::GraphDescription(page) => {
                page.content.as_mut().map(|content| &mut content.image)
            }
            Page::RepoSummary(page) => page.diagram.as_mut(),
            Page::Home(_) => None,
        }?;
        (slot.id == image_id).then_some(slot)
    }
}
