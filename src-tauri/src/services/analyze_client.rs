use crate::config::DEFAULT_ENDPOINT;
use crate::error::AnalyzeError;
use crate::models::analysis_types::{AnalysisResult, ErrorBody};
use crate::models::selection_types::SelectedFile;
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::multipart::{Form, Part};

/// Multipart field the server reads the upload from.
pub const IMAGE_FIELD: &str = "image";

/// Submits one image for analysis.
pub trait AnalyzeClient: Send + Sync {
    fn analyze<'a>(
        &'a self,
        file: &'a SelectedFile,
    ) -> BoxFuture<'a, Result<AnalysisResult, AnalyzeError>>;
}

#[derive(Clone)]
pub struct HttpAnalyzeClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpAnalyzeClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post(&self, file: &SelectedFile) -> Result<AnalysisResult, AnalyzeError> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime)?;
        let form = Form::new().part(IMAGE_FIELD, part);

        tracing::debug!(
            endpoint = %self.endpoint,
            file = %file.name,
            size = file.bytes.len(),
            "submitting image for analysis"
        );

        let resp = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;

        tracing::debug!(status, "analysis response received");
        interpret_response(status, &body)
    }
}

impl Default for HttpAnalyzeClient {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

impl AnalyzeClient for HttpAnalyzeClient {
    fn analyze<'a>(
        &'a self,
        file: &'a SelectedFile,
    ) -> BoxFuture<'a, Result<AnalysisResult, AnalyzeError>> {
        self.post(file).boxed()
    }
}

/// Maps a status code and raw body onto the analysis outcome.
///
/// Both branches expect JSON; a body that does not parse is a transport
/// failure regardless of status. A success needs at least one usable panel.
pub fn interpret_response(status: u16, body: &str) -> Result<AnalysisResult, AnalyzeError> {
    if (200..300).contains(&status) {
        let result: AnalysisResult = serde_json::from_str(body)?;
        if result.is_empty() {
            return Err(AnalyzeError::Transport(
                "response carried no analysis panels".to_string(),
            ));
        }
        return Ok(result);
    }

    let parsed: ErrorBody = serde_json::from_str(body)?;
    let message = parsed
        .error
        .unwrap_or_else(|| format!("HTTP {}", status));
    Err(AnalyzeError::Server(message))
}
