use std::fmt;

use visplain_core::{GraphResult, ImageId, RequestFailure, RequestId, SummaryResult};

use crate::decode::DecodeError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ClientError {
    pub kind: FailureKind,
    pub message: String,
}

impl ClientError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Collapses the error into what the state machine needs to know.
    pub fn to_failure(&self) -> RequestFailure {
        RequestFailure::new(self.to_string())
    }
}

impl From<DecodeError> for ClientError {
    fn from(err: DecodeError) -> Self {
        let kind = match err {
            DecodeError::Backend(_) => FailureKind::Backend,
            _ => FailureKind::Decode,
        };
        Self::new(kind, err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    /// 2xx response whose body did not have the expected shape.
    Decode,
    /// 2xx response carrying an `error` message instead of a result.
    Backend,
    TooLarge { max_bytes: u64, actual: Option<u64> },
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "unexpected response"),
            FailureKind::Backend => write!(f, "backend error"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    ProgressTick {
        request_id: RequestId,
    },
    GraphCompleted {
        request_id: RequestId,
        result: Result<GraphResult, ClientError>,
    },
    SummaryCompleted {
        request_id: RequestId,
        result: Result<SummaryResult, ClientError>,
    },
    /// Image downloaded and stored under `stored_as`, relative to the output directory.
    ImageStored {
        image_id: ImageId,
        stored_as: String,
    },
    ImageFailed {
        image_id: ImageId,
        reason: String,
    },
}
