use crate::effect::Effect;
use crate::form::FormState;
use crate::model::{BackendOrigin, GraphResult, ImageId, SummaryResult};
use crate::page::{GraphContent, GraphPage, ImageSlot, Page, SummaryPage};
use crate::progress::ProgressSettings;
use crate::viewport::Viewport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphPayload {
    pub visualization_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribedGraph {
    pub visualization_path: String,
    pub description: String,
}

/// Navigation target together with its in-memory route state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Graph(Option<GraphPayload>),
    GraphDescription(Option<DescribedGraph>),
    RepoSummary(Option<SummaryResult>),
}

impl Route {
    /// Graphs that came with a description get the description view.
    pub fn for_graph(result: GraphResult) -> Self {
        match result.description {
            Some(description) => Route::GraphDescription(Some(DescribedGraph {
                visualization_path: result.visualization_path,
                description,
            })),
            None => Route::Graph(Some(GraphPayload {
                visualization_path: result.visualization_path,
            })),
        }
    }

    pub fn for_summary(result: SummaryResult) -> Self {
        Route::RepoSummary(Some(result))
    }
}

/// Owns the current page and swaps it wholesale on navigation.
#[derive(Debug, Clone, PartialEq)]
pub struct Navigator {
    page: Page,
    origin: BackendOrigin,
    progress_settings: ProgressSettings,
    next_image_id: ImageId,
}

impl Navigator {
    pub fn new(origin: BackendOrigin, progress_settings: ProgressSettings) -> Self {
        Self {
            page: Page::Home(FormState::new(progress_settings)),
            origin,
            progress_settings,
            next_image_id: 1,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn origin(&self) -> &BackendOrigin {
        &self.origin
    }

    pub(crate) fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    /// Tears down the current page and builds the next one from `route` alone.
    ///
    /// Returned effects release resources held by the old page and start
    /// loading images for the new one.
    pub fn navigate(&mut self, route: Route) -> Vec<Effect> {
        let mut effects = self.teardown();
        self.page = match route {
            Route::Home => Page::Home(FormState::new(self.progress_settings)),
            Route::Graph(payload) => Page::Graph(GraphPage {
                content: payload.map(|payload| {
                    self.graph_content(payload.visualization_path, None, &mut effects)
                }),
            }),
            Route::GraphDescription(payload) => Page::GraphDescription(GraphPage {
                content: payload.map(|payload| {
                    self.graph_content(
                        payload.visualization_path,
                        Some(payload.description),
                        &mut effects,
                    )
                }),
            }),
            Route::RepoSummary(payload) => {
                let result = payload.unwrap_or_default();
                let diagram = result
                    .pipeline_diagram_path
                    .filter(|path| !path.trim().is_empty())
                    .map(|path| self.image_slot(&path, &mut effects));
                Page::RepoSummary(SummaryPage {
                    diagram,
                    summaries: result.file_summaries,
                })
            }
        };
        effects
    }

    fn teardown(&self) -> Vec<Effect> {
        match &self.page {
            Page::Home(form) => form
                .in_flight_request()
                .map(|request_id| Effect::StopProgress { request_id })
                .into_iter()
                .collect(),
            _ => Vec::new(),
        }
    }

    fn graph_content(
        &mut self,
        visualization_path: String,
        description: Option<String>,
        effects: &mut Vec<Effect>,
    ) -> GraphContent {
        GraphContent {
            image: self.image_slot(&visualization_path, effects),
            description,
            viewport: Viewport::default(),
        }
    }

    fn image_slot(&mut self, path: &str, effects: &mut Vec<Effect>) -> ImageSlot {
        let image_id = self.next_image_id;
        self.next_image_id += 1;
        let url = self.origin.resolve(path);
        effects.push(Effect::LoadImage {
            image_id,
            url: url.clone(),
        });
        ImageSlot::pending(image_id, url)
    }
}
