//! Error types for the chatroom client.
//!
//! Every failure the backend or the network can produce is mapped onto one
//! [`Error`] variant.  The chat controller later folds these into
//! user-visible notifications, so the variants are grouped by how they are
//! presented: application errors reported inside a successful response,
//! HTTP status failures, and transport failures.

use std::error;
use std::fmt;
use std::io;
use std::sync::Arc;

/// The main error type for the chatroom client.
#[derive(Clone, Debug)]
pub enum Error {
    /// The server answered 2xx but the body carried an `error` field.
    Application {
        /// The server-supplied error text.
        message: String,
    },

    /// A non-2xx response that does not map to a more specific variant.
    Api {
        /// HTTP status code.
        status_code: u16,
        /// Human-readable error message.
        message: String,
    },

    /// The request was rejected as malformed (HTTP 400).
    BadRequest {
        /// Human-readable error message.
        message: String,
    },

    /// The endpoint does not exist (HTTP 404).
    NotFound {
        /// Human-readable error message.
        message: String,
    },

    /// The request timed out, either locally or with HTTP 408.
    Timeout {
        /// Human-readable error message.
        message: String,
        /// Duration of the timeout in seconds.
        duration: Option<f64>,
    },

    /// The connection to the server could not be established.
    Connection {
        /// Human-readable error message.
        message: String,
        /// Underlying cause.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// Server returned a 500 internal error.
    InternalServer {
        /// Human-readable error message.
        message: String,
    },

    /// Server is overloaded or a gateway failed (HTTP 502-504).
    ServiceUnavailable {
        /// HTTP status code.
        status_code: u16,
        /// Human-readable error message.
        message: String,
    },

    /// Error during JSON serialization or deserialization.
    Serialization {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// I/O error, e.g. reading a file selected for upload.
    Io {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Arc<io::Error>,
    },

    /// HTTP client error.
    HttpClient {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// A URL parsing or joining error.
    Url {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<url::ParseError>,
    },

    /// Invalid caller-supplied input.
    Validation {
        /// Human-readable error message.
        message: String,
        /// Parameter that failed validation.
        param: Option<String>,
    },
}

impl Error {
    /// Creates a new application error.
    pub fn application(message: impl Into<String>) -> Self {
        Error::Application {
            message: message.into(),
        }
    }

    /// Creates a new generic API error.
    pub fn api(status_code: u16, message: impl Into<String>) -> Self {
        Error::Api {
            status_code,
            message: message.into(),
        }
    }

    /// Creates a new bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Error::BadRequest {
            message: message.into(),
        }
    }

    /// Creates a new not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Error::NotFound {
            message: message.into(),
        }
    }

    /// Creates a new timeout error.
    pub fn timeout(message: impl Into<String>, duration: Option<f64>) -> Self {
        Error::Timeout {
            message: message.into(),
            duration,
        }
    }

    /// Creates a new connection error.
    pub fn connection(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Connection {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new internal server error.
    pub fn internal_server(message: impl Into<String>) -> Self {
        Error::InternalServer {
            message: message.into(),
        }
    }

    /// Creates a new service unavailable error.
    pub fn service_unavailable(status_code: u16, message: impl Into<String>) -> Self {
        Error::ServiceUnavailable {
            status_code,
            message: message.into(),
        }
    }

    /// Creates a new serialization error.
    pub fn serialization(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Serialization {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new I/O error.
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Error::Io {
            message: message.into(),
            source: Arc::new(source),
        }
    }

    /// Creates a new HTTP client error.
    pub fn http_client(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::HttpClient {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new URL error.
    pub fn url(message: impl Into<String>, source: Option<url::ParseError>) -> Self {
        Error::Url {
            message: message.into(),
            source,
        }
    }

    /// Creates a new validation error.
    pub fn validation(message: impl Into<String>, param: Option<String>) -> Self {
        Error::Validation {
            message: message.into(),
            param,
        }
    }

    /// Returns true if the server reported the error inside a 2xx body.
    pub fn is_application(&self) -> bool {
        matches!(self, Error::Application { .. })
    }

    /// Returns true if this error is a server-side fault (HTTP 5xx).
    pub fn is_server_error(&self) -> bool {
        match self {
            Error::InternalServer { .. } | Error::ServiceUnavailable { .. } => true,
            Error::Api { status_code, .. } => (500..=599).contains(status_code),
            _ => false,
        }
    }

    /// Returns true if the server answered with a non-2xx status.
    pub fn is_http_status(&self) -> bool {
        self.status_code().is_some()
    }

    /// Returns true if the request never produced a usable response.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            Error::Connection { .. }
                | Error::HttpClient { .. }
                | Error::Serialization { .. }
                | Error::Timeout { duration: Some(_), .. }
        )
    }

    /// Returns true if this error is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }

    /// Returns true if this error is a connection error.
    pub fn is_connection(&self) -> bool {
        matches!(self, Error::Connection { .. })
    }

    /// Returns true if this error is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }

    /// Returns the HTTP status code associated with this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api { status_code, .. } => Some(*status_code),
            Error::ServiceUnavailable { status_code, .. } => Some(*status_code),
            Error::BadRequest { .. } => Some(400),
            Error::NotFound { .. } => Some(404),
            Error::Timeout { duration: None, .. } => Some(408),
            Error::InternalServer { .. } => Some(500),
            _ => None,
        }
    }

    /// Returns the bare message without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            Error::Application { message }
            | Error::Api { message, .. }
            | Error::BadRequest { message }
            | Error::NotFound { message }
            | Error::Timeout { message, .. }
            | Error::Connection { message, .. }
            | Error::InternalServer { message }
            | Error::ServiceUnavailable { message, .. }
            | Error::Serialization { message, .. }
            | Error::Io { message, .. }
            | Error::HttpClient { message, .. }
            | Error::Url { message, .. }
            | Error::Validation { message, .. } => message.as_str(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Application { message } => {
                write!(f, "Application error: {message}")
            }
            Error::Api {
                status_code,
                message,
            } => {
                write!(f, "API error (HTTP {status_code}): {message}")
            }
            Error::BadRequest { message } => {
                write!(f, "Bad request: {message}")
            }
            Error::NotFound { message } => {
                write!(f, "Resource not found: {message}")
            }
            Error::Timeout { message, duration } => {
                if let Some(duration) = duration {
                    write!(f, "Timeout error: {message} ({duration} seconds)")
                } else {
                    write!(f, "Timeout error: {message}")
                }
            }
            Error::Connection { message, .. } => {
                write!(f, "Connection error: {message}")
            }
            Error::InternalServer { message } => {
                write!(f, "Internal server error: {message}")
            }
            Error::ServiceUnavailable {
                status_code,
                message,
            } => {
                write!(f, "Service unavailable (HTTP {status_code}): {message}")
            }
            Error::Serialization { message, .. } => {
                write!(f, "Serialization error: {message}")
            }
            Error::Io { message, .. } => {
                write!(f, "I/O error: {message}")
            }
            Error::HttpClient { message, .. } => {
                write!(f, "HTTP client error: {message}")
            }
            Error::Url { message, .. } => {
                write!(f, "URL error: {message}")
            }
            Error::Validation { message, param } => {
                if let Some(param) = param {
                    write!(f, "Validation error: {message} (parameter: {param})")
                } else {
                    write!(f, "Validation error: {message}")
                }
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Connection { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::Serialization { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::Io { source, .. } => Some(source),
            Error::HttpClient { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::Url { source, .. } => {
                source.as_ref().map(|e| e as &(dyn error::Error + 'static))
            }
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::io(err.to_string(), err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::serialization(format!("JSON error: {err}"), Some(Box::new(err)))
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::url(format!("URL parse error: {err}"), Some(err))
    }
}

/// A specialized Result type for chatroom operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_faults_are_classified() {
        assert!(Error::internal_server("boom").is_server_error());
        assert!(Error::service_unavailable(503, "busy").is_server_error());
        assert!(Error::api(507, "full").is_server_error());
        assert!(!Error::api(418, "teapot").is_server_error());
        assert!(!Error::bad_request("no message").is_server_error());
    }

    #[test]
    fn network_errors_have_no_status() {
        let err = Error::connection("refused", None);
        assert!(err.is_network());
        assert!(!err.is_http_status());
        assert_eq!(err.status_code(), None);

        let err = Error::timeout("slow", Some(60.0));
        assert!(err.is_network());
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn http_timeout_is_a_status_error() {
        let err = Error::timeout("gateway gave up", None);
        assert!(!err.is_network());
        assert_eq!(err.status_code(), Some(408));
    }

    #[test]
    fn application_error_display() {
        let err = Error::application("Invalid AI provider");
        assert!(err.is_application());
        assert_eq!(err.message(), "Invalid AI provider");
        assert_eq!(err.to_string(), "Application error: Invalid AI provider");
    }

    #[test]
    fn io_error_keeps_source() {
        let err = Error::from(io::Error::new(io::ErrorKind::NotFound, "missing.txt"));
        assert!(error::Error::source(&err).is_some());
        assert!(!err.is_network());
    }
}
