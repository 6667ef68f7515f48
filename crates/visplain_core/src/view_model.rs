use crate::form::{FormState, UploadMode};
use crate::model::ImageId;
use crate::page::{GraphPage, ImageSlot, ImageStatus, Page, SummaryPage};
use crate::viewport::Viewport;

pub const NOTHING_TO_SHOW: &str = "No graph available. Please go back and generate one.";
pub const NO_SUMMARIES: &str = "No summaries available.";
pub const NO_DIAGRAM: &str = "No block diagram available.";
pub const PROCESSING_FAILED: &str = "Error processing request.";

#[derive(Debug, Clone, PartialEq)]
pub struct AppViewModel {
    pub screen: ScreenView,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScreenView {
    Home(FormView),
    Graph(GraphView),
    GraphDescription(GraphView),
    RepoSummary(SummaryView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub mode: UploadMode,
    pub file_name: Option<String>,
    pub repo_owner: String,
    pub repo_name: String,
    pub loading: bool,
    pub submit_enabled: bool,
    pub progress_percent: u8,
    pub progress_running: bool,
    pub alert: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageView {
    pub id: ImageId,
    pub url: String,
    pub status: ImageStatus,
}

impl ImageView {
    pub fn is_visible(&self) -> bool {
        self.status != ImageStatus::Hidden
    }

    pub fn is_pending(&self) -> bool {
        self.status == ImageStatus::Pending
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphContentView {
    pub image: ImageView,
    pub description: Option<String>,
    pub viewport: Viewport,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphView {
    pub content: Option<GraphContentView>,
    /// Shown instead of the content when the page was reached without a payload.
    pub fallback: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryBlock {
    pub heading: String,
    pub markdown: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryView {
    pub diagram: Option<ImageView>,
    pub diagram_placeholder: Option<&'static str>,
    pub blocks: Vec<SummaryBlock>,
    pub summaries_placeholder: Option<&'static str>,
}

impl AppViewModel {
    pub(crate) fn build(page: &Page, dirty: bool) -> Self {
        let screen = match page {
            Page::Home(form) => ScreenView::Home(form_view(form)),
            Page::Graph(page) => ScreenView::Graph(graph_view(page)),
            Page::GraphDescription(page) => ScreenView::GraphDescription(graph_view(page)),
            Page::RepoSummary(page) => ScreenView::RepoSummary(summary_view(page)),
        };
        Self { screen, dirty }
    }

    /// Images the result page is still waiting on.
    pub fn pending_images(&self) -> usize {
        let images: Vec<&ImageView> = match &self.screen {
            ScreenView::Home(_) => Vec::new(),
            ScreenView::Graph(view) | ScreenView::GraphDescription(view) => {
                view.content.iter().map(|content| &content.image).collect()
            }
            ScreenView::RepoSummary(view) => view.diagram.iter().collect(),
        };
        images.into_iter().filter(|image| image.is_pending()).count()
    }
}

fn form_view(form: &FormState) -> FormView {
    FormView {
        mode: form.mode(),
        file_name: form.file().map(|file| file.filename.clone()),
        repo_owner: form.repo_owner().to_string(),
        repo_name: form.repo_name().to_string(),
        loading: form.is_loading(),
        submit_enabled: !form.is_loading(),
        progress_percent: form.progress().percent(),
        progress_running: form.progress().is_running(),
        alert: form.alert().map(|alert| alert.message()),
    }
}

fn image_view(slot: &ImageSlot) -> ImageView {
    ImageView {
        id: slot.id,
        url: slot.url.clone(),
        status: slot.status.clone(),
    }
}

fn graph_view(page: &GraphPage) -> GraphView {
    match &page.content {
        Some(content) => GraphView {
            content: Some(GraphContentView {
                image: image_view(&content.image),
                description: content.description.clone(),
                viewport: content.viewport,
            }),
            fallback: None,
        },
        None => GraphView {
            content: None,
            fallback: Some(NOTHING_TO_SHOW),
        },
    }
}

fn summary_view(page: &SummaryPage) -> SummaryView {
    let blocks: Vec<SummaryBlock> = page
        .summaries
        .iter()
        .map(|summary| SummaryBlock {
            heading: summary.path.clone(),
            markdown: summary.markdown.clone(),
        })
        .collect();
    SummaryView {
        diagram: page.diagram.as_ref().map(image_view),
        diagram_placeholder: page.diagram.is_none().then_some(NO_DIAGRAM),
        summaries_placeholder: blocks.is_empty().then_some(NO_SUMMARIES),
        blocks,
    }
}
