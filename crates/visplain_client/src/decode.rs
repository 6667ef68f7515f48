use serde::Deserialize;
use serde_json::{Map, Value};
use visplain_core::{FileSummary, GraphResult, SummaryResult};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed response body: {0}")]
    Malformed(String),
    #[error("response is missing `{0}`")]
    MissingField(&'static str),
    #[error("summary for {path} is not a markdown string")]
    SummaryNotText { path: String },
    #[error("backend reported: {0}")]
    Backend(String),
}

#[derive(Debug, Deserialize)]
struct UploadBody {
    visualization: Option<String>,
    kag_output: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SummaryBody {
    file_summaries: Option<Map<String, Value>>,
    pipeline_diagram: Option<String>,
    error: Option<String>,
}

/// Decode the body of a successful `/upload` response.
pub fn decode_graph_response(body: &[u8]) -> Result<GraphResult, DecodeError> {
    let parsed: UploadBody =
        serde_json::from_slice(body).map_err(|err| DecodeError::Malformed(err.to_string()))?;

    let visualization_path = match (non_blank(parsed.visualization), parsed.error) {
        (Some(path), _) => path,
        (None, Some(message)) => return Err(DecodeError::Backend(message)),
        (None, None) => return Err(DecodeError::MissingField("visualization")),
    };

    Ok(GraphResult {
        visualization_path,
        description: non_blank(parsed.kag_output),
    })
}

/// Decode the body of a successful `/generate_repo_summary` response.
///
/// Summaries keep the key order of the JSON object.
pub fn decode_summary_response(body: &[u8]) -> Result<SummaryResult, DecodeError> {
    let parsed: SummaryBody =
        serde_json::from_slice(body).map_err(|err| DecodeError::Malformed(err.to_string()))?;

    let summaries = match (parsed.file_summaries, parsed.error) {
        (Some(summaries), _) => summaries,
        (None, Some(message)) => return Err(DecodeError::Backend(message)),
        (None, None) => return Err(DecodeError::MissingField("file_summaries")),
    };

    let file_summaries = summaries
        .into_iter()
        .map(|(path, value)| match value {
            Value::String(markdown) => Ok(FileSummary { path, markdown }),
            _ => Err(DecodeError::SummaryNotText { path }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SummaryResult {
        file_summaries,
        pipeline_diagram_path: non_blank(parsed.pipeline_diagram),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}
