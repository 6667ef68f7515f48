use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use serde_json::{json, Value};
use visplain_core::{GraphResult, SummaryRequest, SummaryResult, UploadRequest};
use visplain_logging::{visplain_debug, visplain_info};

use crate::config::{ClientConfig, SUMMARY_PATH, UPLOAD_PATH};
use crate::decode::{decode_graph_response, decode_summary_response};
use crate::{ClientError, FailureKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// The two backend operations plus image retrieval for result views.
///
/// Every call is a single attempt: no retry, no cancellation.
#[async_trait::async_trait]
pub trait BackendClient: Send + Sync {
    async fn request_graph(&self, request: &UploadRequest) -> Result<GraphResult, ClientError>;

    async fn request_summary(&self, request: &SummaryRequest)
        -> Result<SummaryResult, ClientError>;

    async fn fetch_image(&self, url: &str) -> Result<FetchedImage, ClientError>;
}

/// Multipart body for `/upload`: `uploadOption` plus exactly one input source.
pub fn upload_form(request: &UploadRequest) -> Form {
    let form = Form::new().text("uploadOption", request.upload_option());
    match request {
        UploadRequest::File(file) => {
            let part = Part::bytes(file.bytes.clone()).file_name(file.filename.clone());
            form.part("code_file", part)
        }
        UploadRequest::Repo(repo) => form
            .text("repo_owner", repo.owner().to_string())
            .text("repo_name", repo.name().to_string()),
    }
}

/// JSON body for `/generate_repo_summary`.
pub fn summary_body(request: &SummaryRequest) -> Value {
    json!({
        "repo_owner": request.repo.owner(),
        "repo_name": request.repo.name(),
    })
}

#[derive(Debug, Clone)]
pub struct ReqwestBackendClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl ReqwestBackendClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder().connect_timeout(config.connect_timeout);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|err| ClientError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends the request and returns the body of a 2xx response.
    /// Bodies of other statuses are not read.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Vec<u8>, ClientError> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        Ok(body.to_vec())
    }
}

#[async_trait::async_trait]
impl BackendClient for ReqwestBackendClient {
    async fn request_graph(&self, request: &UploadRequest) -> Result<GraphResult, ClientError> {
        let url = self.config.endpoint(UPLOAD_PATH);
        visplain_info!("POST {} uploadOption={}", url, request.upload_option());
        let body = self
            .send(self.http.post(&url).multipart(upload_form(request)))
            .await?;
        let result = decode_graph_response(&body)?;
        visplain_debug!("graph ready at {}", result.visualization_path);
        Ok(result)
    }

    async fn request_summary(
        &self,
        request: &SummaryRequest,
    ) -> Result<SummaryResult, ClientError> {
        let url = self.config.endpoint(SUMMARY_PATH);
        visplain_info!(
            "POST {} repo={}/{}",
            url,
            request.repo.owner(),
            request.repo.name()
        );
        let body = self
            .send(self.http.post(&url).json(&summary_body(request)))
            .await?;
        let result = decode_summary_response(&body)?;
        visplain_debug!("{} file summaries received", result.file_summaries.len());
        Ok(result)
    }

    async fn fetch_image(&self, url: &str) -> Result<FetchedImage, ClientError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| ClientError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let response = self.http.get(parsed).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = self.config.max_image_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(ClientError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "image too large",
                ));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(ClientError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "image too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(FetchedImage {
            bytes,
            content_type,
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        return ClientError::new(FailureKind::Timeout, err.to_string());
    }
    ClientError::new(FailureKind::Network, err.to_string())
}
