use std::error::Error;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::api::{AnalysisResult, AskRequest, ASK_ENDPOINT};
use crate::utils::url::construct_api_url;

/// Why a request to the analysis service did not produce a payload.
///
/// The variants are kept distinct for diagnostics only; the controller
/// collapses all of them into a single user-facing failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Connection refused, DNS failure, timeout, or a body that could not be read.
    Network(String),
    /// The service answered with a non-2xx status.
    Status { status: u16, body: String },
    /// The service answered 2xx but the body is not a valid analysis payload.
    Parse(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Network(detail) => write!(f, "network error: {detail}"),
            TransportError::Status { status, body } => {
                if body.trim().is_empty() {
                    write!(f, "HTTP error! status: {status}")
                } else {
                    write!(f, "HTTP error! status: {status}: {}", summarize_body(body))
                }
            }
            TransportError::Parse(detail) => write!(f, "unparsable response body: {detail}"),
        }
    }
}

impl Error for TransportError {}

fn summarize_body(body: &str) -> String {
    const LIMIT: usize = 200;
    let collapsed = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() > LIMIT {
        let truncated: String = collapsed.chars().take(LIMIT).collect();
        format!("{truncated}…")
    } else {
        collapsed
    }
}

/// One call per submission; implementations never retry.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn ask(&self, content: &str) -> Result<AnalysisResult, TransportError>;
}

#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Build a transport against `base_url`. `timeout` of `None` waits for the
    /// service indefinitely.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        construct_api_url(&self.base_url, ASK_ENDPOINT)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn ask(&self, content: &str) -> Result<AnalysisResult, TransportError> {
        let url = self.endpoint();
        debug!(%url, bytes = content.len(), "posting clinical notes");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&AskRequest { content })
            .send()
            .await
            .map_err(|err| TransportError::Network(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| TransportError::Network(err.to_string()))?;

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str::<AnalysisResult>(&body)
            .map_err(|err| TransportError::Parse(err.to_string()))
    }
}
