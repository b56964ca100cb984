//! One request/response exchange with the chat endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Form field carrying the user's message.
pub const QUERY_FIELD: &str = "query";
/// Header marking the request as asynchronous.
pub const REQUESTED_WITH_HEADER: &str = "X-Requested-With";
/// Default value of [`REQUESTED_WITH_HEADER`].
pub const XML_HTTP_REQUEST: &str = "XMLHttpRequest";

/// Reply decoded from the endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Assistant answer.
    #[serde(default)]
    pub answer: Option<String>,
    /// Preformatted display timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// The question as the server understood it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
}

impl ChatReply {
    /// The answer, if present and not blank.
    #[must_use]
    pub fn usable_answer(&self) -> Option<&str> {
        self.answer.as_deref().filter(|a| !a.trim().is_empty())
    }
}

/// Failure of a single exchange.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Endpoint answered with a non-success status.
    #[error("HTTP error! status: {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// Request could not be sent or the body could not be read.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Body was not the expected JSON object.
    #[error("malformed reply: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Performs exactly one exchange per call. No retries, no timeout.
#[async_trait]
pub trait Transport {
    async fn send(&self, message: &str) -> Result<ChatReply, TransportError>;
}

/// Form-encoded POST to the page's own URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    endpoint: Url,
    requested_with: String,
    http: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport posting to `endpoint`.
    pub fn new(endpoint: impl AsRef<str>) -> Result<Self, url::ParseError> {
        Ok(Self::with_client(
            Url::parse(endpoint.as_ref())?,
            reqwest::Client::new(),
        ))
    }

    /// Create a transport with a custom reqwest client.
    pub fn with_client(endpoint: Url, http: reqwest::Client) -> Self {
        Self {
            endpoint,
            requested_with: XML_HTTP_REQUEST.to_string(),
            http,
        }
    }

    /// Override the value sent in the `X-Requested-With` header.
    #[must_use]
    pub fn requested_with(mut self, value: impl Into<String>) -> Self {
        self.requested_with = value.into();
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, message: &str) -> Result<ChatReply, TransportError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            message_length = message.len(),
            "Sending chat message"
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .header(REQUESTED_WITH_HEADER, &self.requested_with)
            .form(&[(QUERY_FIELD, message)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
