use crate::form::{SubmitAction, UploadMode};
use crate::model::{
    GraphResult, ImageId, RequestFailure, RequestId, SelectedFile, SummaryResult,
};
use crate::navigator::Route;

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User switched between file upload and repository details.
    ModeSelected(UploadMode),
    /// User picked a file to upload.
    FileSelected(SelectedFile),
    FileCleared,
    RepoOwnerChanged(String),
    RepoNameChanged(String),
    /// User pressed one of the generate buttons.
    SubmitClicked(SubmitAction),
    /// User closed the alert.
    AlertDismissed,
    /// Periodic progress timer fired.
    ProgressTick { request_id: RequestId },
    /// Backend answered the artifact request.
    GraphCompleted {
        request_id: RequestId,
        result: Result<GraphResult, RequestFailure>,
    },
    /// Backend answered the summary request.
    SummaryCompleted {
        request_id: RequestId,
        result: Result<SummaryResult, RequestFailure>,
    },
    ImageLoaded { image_id: ImageId, stored_as: String },
    ImageFailed { image_id: ImageId },
    /// Drag on the graph viewport, in screen pixels.
    ViewportDragged { dx: f32, dy: f32 },
    /// Zoom on the graph viewport by a multiplicative factor.
    ViewportZoomed { factor: f32 },
    ViewportReset,
    /// User asked to go back to the form.
    BackClicked,
    /// Explicit navigation with route state.
    Navigate(Route),
    /// Fallback for placeholder wiring.
    NoOp,
}
