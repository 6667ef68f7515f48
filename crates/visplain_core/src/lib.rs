//! Visplain core: pure state machine and view-model helpers.
mod effect;
mod form;
mod model;
mod msg;
mod navigator;
mod page;
mod progress;
mod state;
mod update;
mod view_model;
mod viewport;

pub use effect::Effect;
pub use form::{Alert, FormState, PendingRequest, SubmitAction, UploadMode, ValidationError};
pub use model::{
    BackendOrigin, FileSummary, GraphResult, ImageId, RepoRef, RequestFailure, RequestId,
    SelectedFile, SummaryRequest, SummaryResult, UploadRequest, ALLOWED_EXTENSIONS,
    DEFAULT_BACKEND_ORIGIN,
};
pub use msg::Msg;
pub use navigator::{DescribedGraph, GraphPayload, Navigator, Route};
pub use page::{GraphPage, ImageSlot, ImageStatus, Page, SummaryPage};
pub use progress::{Progress, ProgressSettings};
pub use state::AppState;
pub use update::update;
pub use view_model::{
    AppViewModel, FormView, GraphContentView, GraphView, ImageView, ScreenView, SummaryBlock,
    SummaryView, NOTHING_TO_SHOW, NO_DIAGRAM, NO_SUMMARIES, PROCESSING_FAILED,
};
pub use viewport::{Viewport, MAX_ZOOM, MIN_ZOOM};
