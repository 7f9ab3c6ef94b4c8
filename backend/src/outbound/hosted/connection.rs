//! Shared HTTP plumbing for the hosted backend adapters.
//!
//! Every request carries the operator's secret twice, as the `apikey`
//! header and as a bearer token; the hosted gateway checks both.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde_json::Value;
use zeroize::Zeroizing;

/// Failure talking to the hosted backend, before it is classified by a port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HttpFailure {
    /// Connection, TLS or timeout failure; no usable response.
    Transport(String),
    /// The gateway answered with a non-success status.
    Status { status: StatusCode, message: String },
    /// The gateway answered 2xx with an unreadable body.
    Decode(String),
}

impl HttpFailure {
    /// Whether a retry by the operator could plausibly succeed.
    pub(crate) fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status, .. } => {
                status.is_server_error()
                    || matches!(
                        *status,
                        StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS
                    )
            }
            Self::Decode(_) => false,
        }
    }

    /// Message to surface verbatim.
    pub(crate) fn into_message(self) -> String {
        match self {
            Self::Transport(message) | Self::Decode(message) => message,
            Self::Status { message, .. } => message,
        }
    }
}

/// Authenticated client for one hosted backend project.
pub struct HostedConnection {
    client: Client,
    base: Url,
    service_key: Zeroizing<String>,
}

impl HostedConnection {
    /// Build a connection rooted at `base` with a request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base: Url,
        service_key: Zeroizing<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base: with_trailing_slash(base),
            service_key,
        })
    }

    /// Project root URL.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// URL for `prefix` followed by escaped `segments`.
    pub(crate) fn endpoint<'s>(
        &self,
        prefix: &str,
        segments: impl IntoIterator<Item = &'s str>,
    ) -> Result<Url, HttpFailure> {
        let mut url = self
            .base
            .join(prefix)
            .map_err(|err| HttpFailure::Transport(format!("invalid endpoint {prefix}: {err}")))?;
        url.path_segments_mut()
            .map_err(|()| HttpFailure::Transport("backend URL cannot be a base".to_owned()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Start a request with both credentials attached.
    pub(crate) fn request(&self, method: reqwest::Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", self.service_key.as_str())
            .bearer_auth(self.service_key.as_str())
    }

    /// Send `request` and return the body of a successful response.
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, HttpFailure> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(HttpFailure::Status {
                status,
                message: status_message(status, body.as_ref()),
            });
        }
        Ok(body.to_vec())
    }
}

impl std::fmt::Debug for HostedConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostedConnection")
            .field("base", &self.base.as_str())
            .finish_non_exhaustive()
    }
}

fn with_trailing_slash(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

fn map_transport_error(error: reqwest::Error) -> HttpFailure {
    if error.is_timeout() {
        HttpFailure::Transport(format!("request timed out: {error}"))
    } else {
        HttpFailure::Transport(error.to_string())
    }
}

/// Operator-facing message for a failed response.
///
/// The hosted APIs report errors as JSON with the human-readable text under
/// one of a few keys; that text is surfaced verbatim. Anything else falls
/// back to a compact preview of the body.
pub(crate) fn status_message(status: StatusCode, body: &[u8]) -> String {
    let reported = serde_json::from_slice::<Value>(body).ok().and_then(|json| {
        ["msg", "message", "error_description", "error"]
            .into_iter()
            .find_map(|key| json.get(key).and_then(Value::as_str).map(str::to_owned))
    });
    match reported.filter(|message| !message.trim().is_empty()) {
        Some(message) => message,
        None => {
            let preview = body_preview(body);
            if preview.is_empty() {
                format!("status {}", status.as_u16())
            } else {
                format!("status {}: {}", status.as_u16(), preview)
            }
        }
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
