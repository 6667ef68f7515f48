use std::fmt;

use crate::model::{RepoRef, RequestFailure, RequestId, SelectedFile, SummaryRequest, UploadRequest};
use crate::progress::{Progress, ProgressSettings};

/// Which input source the form submits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadMode {
    File,
    #[default]
    Repo,
}

/// What the user asked the backend to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitAction {
    /// Component graph via the upload endpoint.
    Graph,
    /// Per-file summaries and pipeline diagram for a repository.
    Summary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingFile,
    UnsupportedFileType { filename: String },
    MissingRepo,
    SummaryNeedsRepo,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingFile => write!(f, "Please upload a file."),
            ValidationError::UnsupportedFileType { filename } => write!(
                f,
                "Cannot upload {filename}: only .py, .txt and .md files are accepted."
            ),
            ValidationError::MissingRepo => {
                write!(f, "Please enter both repository owner and name.")
            }
            ValidationError::SummaryNeedsRepo => write!(
                f,
                "Repository summaries need repository details, not an uploaded file."
            ),
        }
    }
}

/// Blocking notification shown on the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    Validation(ValidationError),
    /// The backend call failed. The reason is kept for logs only.
    ProcessingFailed(RequestFailure),
}

impl Alert {
    pub fn message(&self) -> String {
        match self {
            Alert::Validation(err) => err.to_string(),
            Alert::ProcessingFailed(_) => crate::view_model::PROCESSING_FAILED.to_string(),
        }
    }
}

/// A validated request, ready for the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingRequest {
    Graph(UploadRequest),
    Summary(SummaryRequest),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InFlight {
    pub(crate) request_id: RequestId,
    pub(crate) action: SubmitAction,
}

/// State of the submission page. Lives only as long as the page does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    mode: UploadMode,
    file: Option<SelectedFile>,
    repo_owner: String,
    repo_name: String,
    in_flight: Option<InFlight>,
    progress: Progress,
    alert: Option<Alert>,
}

impl FormState {
    pub fn new(settings: ProgressSettings) -> Self {
        Self {
            mode: UploadMode::default(),
            file: None,
            repo_owner: String::new(),
            repo_name: String::new(),
            in_flight: None,
            progress: Progress::new(settings),
            alert: None,
        }
    }

    pub fn mode(&self) -> UploadMode {
        self.mode
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn repo_owner(&self) -> &str {
        &self.repo_owner
    }

    pub fn repo_name(&self) -> &str {
        &self.repo_name
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight_request(&self) -> Option<RequestId> {
        self.in_flight.as_ref().map(|flight| flight.request_id)
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub(crate) fn set_mode(&mut self, mode: UploadMode) -> bool {
        let changed = self.mode != mode;
        self.mode = mode;
        changed
    }

    pub(crate) fn set_file(&mut self, file: Option<SelectedFile>) {
        self.file = file;
    }

    pub(crate) fn set_repo_owner(&mut self, owner: String) {
        self.repo_owner = owner;
    }

    pub(crate) fn set_repo_name(&mut self, name: String) {
        self.repo_name = name;
    }

    pub(crate) fn dismiss_alert(&mut self) -> bool {
        self.alert.take().is_some()
    }

    /// Checks the current inputs against `action` without touching state.
    pub fn validate(&self, action: SubmitAction) -> Result<PendingRequest, ValidationError> {
        match (self.mode, action) {
            (UploadMode::File, SubmitAction::Summary) => Err(ValidationError::SummaryNeedsRepo),
            (UploadMode::File, SubmitAction::Graph) => {
                let file = self.file.as_ref().ok_or(ValidationError::MissingFile)?;
                if !file.has_allowed_extension() {
                    return Err(ValidationError::UnsupportedFileType {
                        filename: file.filename.clone(),
                    });
                }
                Ok(PendingRequest::Graph(UploadRequest::File(file.clone())))
            }
            (UploadMode::Repo, action) => {
                let repo = RepoRef::new(&self.repo_owner, &self.repo_name)
                    .ok_or(ValidationError::MissingRepo)?;
                Ok(match action {
                    SubmitAction::Graph => PendingRequest::Graph(UploadRequest::Repo(repo)),
                    SubmitAction::Summary => PendingRequest::Summary(SummaryRequest { repo }),
                })
            }
        }
    }

    pub(crate) fn reject(&mut self, err: ValidationError) {
        self.alert = Some(Alert::Validation(err));
    }

    pub(crate) fn begin(&mut self, request_id: RequestId, action: SubmitAction) {
        self.alert = None;
        self.in_flight = Some(InFlight { request_id, action });
        self.progress.start();
    }

    pub(crate) fn owns(&self, request_id: RequestId, action: SubmitAction) -> bool {
        self.in_flight
            .as_ref()
            .is_some_and(|flight| flight.request_id == request_id && flight.action == action)
    }

    pub(crate) fn tick(&mut self, request_id: RequestId) -> bool {
        if self.in_flight_request() != Some(request_id) {
            return false;
        }
        self.progress.tick()
    }

    pub(crate) fn finish_success(&mut self) {
        self.in_flight = None;
        self.progress.complete();
    }

    pub(crate) fn finish_failure(&mut self, failure: RequestFailure) {
        self.in_flight = None;
        self.progress.fail();
        self.alert = Some(Alert::ProcessingFailed(failure));
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new(ProgressSettings::default())
    }
}
