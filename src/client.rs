use std::env;
use std::path::Path;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Client as ReqwestClient, RequestBuilder, Response, header};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::error::{Error, Result};
use crate::observability::{CLIENT_REQUESTS, CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS};
use crate::types::{ApiStatus, ChatRequest, ChatResponse, HealthStatus, UploadResponse};

/// Base URL used when neither an argument nor `CHATROOM_BASE_URL` is given.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the AI Room backend.
///
/// One method per endpoint.  Every method returns the decoded success body or
/// an [`Error`]; no method retries.
#[derive(Debug, Clone)]
pub struct RoomClient {
    client: ReqwestClient,
    base_url: Url,
    timeout: Duration,
}

impl RoomClient {
    /// Create a new client.
    ///
    /// The base URL can be provided directly or read from the
    /// CHATROOM_BASE_URL environment variable, falling back to
    /// [`DEFAULT_BASE_URL`].
    pub fn new(base_url: Option<String>) -> Result<Self> {
        Self::with_options(base_url, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let base_url = match base_url {
            Some(url) => url,
            None => env::var("CHATROOM_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        };
        let base_url = parse_base_url(&base_url)?;

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        // The server keeps the conversation in its session cookie.
        let client = ReqwestClient::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// The URL every endpoint is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    /// Send a request, recording metrics and mapping transport failures.
    async fn execute(&self, endpoint: &str, request: RequestBuilder) -> Result<Response> {
        self.execute_with(endpoint, request, false).await
    }

    /// Like [`RoomClient::execute`], optionally treating an `{error}` body on
    /// a non-2xx status as an application error.
    async fn execute_with(
        &self,
        endpoint: &str,
        request: RequestBuilder,
        error_body_is_application: bool,
    ) -> Result<Response> {
        CLIENT_REQUESTS.click();
        tracing::debug!(endpoint, "dispatching request");
        let start = Instant::now();
        let result = request.headers(self.default_headers()).send().await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());

        let response = result.map_err(|e| {
            CLIENT_REQUEST_ERRORS.click();
            tracing::warn!(endpoint, error = %e, "request failed");
            if e.is_timeout() {
                Error::timeout(
                    format!("Request timed out: {}", e),
                    Some(self.timeout.as_secs_f64()),
                )
            } else if e.is_connect() {
                Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
            } else {
                Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
            }
        })?;

        if !response.status().is_success() {
            CLIENT_REQUEST_ERRORS.click();
            let err = Self::process_error_response(response, error_body_is_application).await;
            tracing::warn!(endpoint, error = %err, "server rejected request");
            return Err(err);
        }
        tracing::debug!(endpoint, status = response.status().as_u16(), "request succeeded");
        Ok(response)
    }

    /// Process API response errors and convert to our Error type
    async fn process_error_response(
        response: Response,
        error_body_is_application: bool,
    ) -> Error {
        let status_code = response.status().as_u16();

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };

        // The backend reports failures as `{"error": "..."}`.
        let reported = serde_json::from_str::<Value>(&error_body)
            .ok()
            .and_then(|body| error_field(&body));
        if let (true, Some(message)) = (error_body_is_application, &reported) {
            return Error::application(message.clone());
        }
        let error_message = reported.unwrap_or_else(|| {
            if error_body.trim().is_empty() {
                status_reason(status_code)
            } else {
                error_body.clone()
            }
        });

        match status_code {
            400 => Error::bad_request(error_message),
            404 => Error::not_found(error_message),
            408 => Error::timeout(error_message, None),
            500 => Error::internal_server(error_message),
            502..=504 => Error::service_unavailable(status_code, error_message),
            _ => Error::api(status_code, error_message),
        }
    }

    /// Decode a 2xx body, surfacing an embedded `error` field as an application error.
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let body = response.text().await.map_err(|e| {
            Error::http_client(format!("Failed to read response: {}", e), Some(Box::new(e)))
        })?;
        let value: Value = serde_json::from_str(&body).map_err(|e| {
            Error::serialization(
                format!("Failed to parse response: {}", e),
                Some(Box::new(e)),
            )
        })?;
        if let Some(message) = error_field(&value) {
            return Err(Error::application(message));
        }
        serde_json::from_value(value).map_err(|e| {
            Error::serialization(
                format!("Unexpected response shape: {}", e),
                Some(Box::new(e)),
            )
        })
    }

    /// Send a chat message and wait for the provider's reply.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let url = self.endpoint("chat")?;
        let response = self
            .execute("/chat", self.client.post(url).json(request))
            .await?;
        Self::decode(response).await
    }

    /// Upload in-memory file contents under the given file name.
    ///
    /// The server answers rejected uploads with `{error}` on 400 and 500
    /// alike; either way that is returned as [`Error::Application`].
    pub async fn upload(&self, filename: &str, contents: Vec<u8>) -> Result<UploadResponse> {
        if filename.is_empty() {
            return Err(Error::validation(
                "upload requires a file name",
                Some("file".to_string()),
            ));
        }
        let url = self.endpoint("upload")?;
        let part = Part::bytes(contents).file_name(filename.to_string());
        let form = Form::new().part("file", part);
        let response = self
            .execute_with("/upload", self.client.post(url).multipart(form), true)
            .await?;
        Self::decode(response).await
    }

    /// Read a file from disk and upload it.
    pub async fn upload_file(&self, path: &Path) -> Result<UploadResponse> {
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                Error::validation(
                    format!("{} does not name a file", path.display()),
                    Some("file".to_string()),
                )
            })?
            .to_string();
        let contents = tokio::fs::read(path)
            .await
            .map_err(|err| Error::io(format!("failed to read {}", path.display()), err))?;
        self.upload(&filename, contents).await
    }

    /// Reset the server-side conversation.
    pub async fn clear_conversation(&self) -> Result<Value> {
        let url = self.endpoint("clear_conversation")?;
        let response = self
            .execute("/clear_conversation", self.client.post(url))
            .await?;
        Self::decode(response).await
    }

    /// Ask which providers have credentials configured.
    pub async fn api_status(&self) -> Result<ApiStatus> {
        let url = self.endpoint("api/status")?;
        let response = self.execute("/api/status", self.client.get(url)).await?;
        Self::decode(response).await
    }

    /// Check server health.
    pub async fn health(&self) -> Result<HealthStatus> {
        let url = self.endpoint("health")?;
        let response = self.execute("/health", self.client.get(url)).await?;
        Self::decode(response).await
    }
}

/// Parse a base URL, making sure relative endpoints resolve beneath it.
fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())?;
    if url.cannot_be_a_base() {
        return Err(Error::url(format!("{raw} cannot be a base URL"), None));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn error_field(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::Null => None,
        Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}

fn status_reason(status_code: u16) -> String {
    reqwest::StatusCode::from_u16(status_code)
        .ok()
        .and_then(|status| status.canonical_reason())
        .unwrap_or("no response body")
        .to_string()
}
