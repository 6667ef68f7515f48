//! Requests sent to the backend and the results it hands back.

pub type RequestId = u64;
pub type ImageId = u64;

pub const DEFAULT_BACKEND_ORIGIN: &str = "http://127.0.0.1:5000";

/// File extensions the backend accepts for single-file uploads.
pub const ALLOWED_EXTENSIONS: &[&str] = &["py", "txt", "md"];

/// Base URL prefixed onto every server-relative path the backend returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendOrigin(String);

impl BackendOrigin {
    pub fn new(origin: impl Into<String>) -> Self {
        let origin = origin.into();
        Self(origin.trim().trim_end_matches('/').to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Concatenates the origin with a server-relative path.
    pub fn resolve(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.0, path)
        } else {
            format!("{}/{}", self.0, path)
        }
    }
}

impl Default for BackendOrigin {
    fn default() -> Self {
        Self::new(DEFAULT_BACKEND_ORIGIN)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    pub fn extension(&self) -> Option<String> {
        let (_, ext) = self.filename.rsplit_once('.')?;
        Some(ext.to_ascii_lowercase())
    }

    pub fn has_allowed_extension(&self) -> bool {
        self.extension()
            .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
    }
}

/// Repository coordinates. Both parts are non-empty once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    owner: String,
    name: String,
}

impl RepoRef {
    pub fn new(owner: &str, name: &str) -> Option<Self> {
        let owner = owner.trim();
        let name = name.trim();
        if owner.is_empty() || name.is_empty() {
            return None;
        }
        Some(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Payload for the artifact endpoint: exactly one input source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadRequest {
    File(SelectedFile),
    Repo(RepoRef),
}

impl UploadRequest {
    /// Value of the `uploadOption` form field.
    pub fn upload_option(&self) -> &'static str {
        match self {
            UploadRequest::File(_) => "file",
            UploadRequest::Repo(_) => "repo",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRequest {
    pub repo: RepoRef,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphResult {
    pub visualization_path: String,
    /// Free-text description of the graph (`kag_output`), when the backend sends one.
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    pub path: String,
    pub markdown: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SummaryResult {
    /// Summaries in the order the backend listed them.
    pub file_summaries: Vec<FileSummary>,
    pub pipeline_diagram_path: Option<String>,
}

/// Why a backend request did not produce a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFailure {
    pub reason: String,
}

impl RequestFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
