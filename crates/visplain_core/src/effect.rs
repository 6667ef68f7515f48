use crate::model::{ImageId, RequestId, SummaryRequest, UploadRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start the periodic progress timer for a request.
    StartProgress { request_id: RequestId },
    /// Release the progress timer of a request.
    StopProgress { request_id: RequestId },
    RequestGraph {
        request_id: RequestId,
        request: UploadRequest,
    },
    RequestSummary {
        request_id: RequestId,
        request: SummaryRequest,
    },
    LoadImage { image_id: ImageId, url: String },
}
