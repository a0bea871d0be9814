use std::error::Error;
use std::fmt::{Display, Formatter};

/// Error kind that represents failures reported by the [`crate::Client`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Initialization of the internal [`reqwest::Client`] failed.
    HttpClientInitFailure = 1,
    /// The [`crate::ClientBuilder`] was not given a backend base URL.
    MissingBaseUrl = 2,
    /// The API key passed to the [`crate::ClientBuilder`] is empty.
    InvalidApiKey = 3,
    /// Invalid HTTP response was received (unexpected HTTP status code).
    UnexpectedHttpResponse = 1101,
    /// The HTTP request timed out.
    HttpRequestTimeout = 1102,
    /// The HTTP request failed (most likely, due to a local network issue).
    HttpRequestFailure = 1103,
    /// An invalid HTTP response was received (200 OK with an invalid content).
    InvalidHttpResponseContent = 1105,
    /// The backend reported no change when no config was fetched before.
    InvalidHttpResponseWhenLocalCacheIsEmpty = 1106,
    /// The backend rejected the fetch because the client sent requests too frequently.
    Throttled = 1200,
    /// The in-flight fetch this call was waiting on was dropped before it completed.
    FetchAbandoned = 1201,
    /// The requested bundled defaults resource doesn't exist.
    ResourceNotFound = 2100,
    /// The bundled defaults resource exists but its content is not a map of primitives.
    InvalidResourceContent = 2101,
}

impl ErrorKind {
    pub(crate) fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Returns `true` when the kind describes a transport or backend failure of a fetch.
    ///
    /// Throttling is reported separately with [`ErrorKind::Throttled`].
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            ErrorKind::UnexpectedHttpResponse
                | ErrorKind::HttpRequestTimeout
                | ErrorKind::HttpRequestFailure
                | ErrorKind::InvalidHttpResponseContent
                | ErrorKind::InvalidHttpResponseWhenLocalCacheIsEmpty
                | ErrorKind::FetchAbandoned
        )
    }
}

/// Error struct that holds the [`ErrorKind`] and message of the reported failure.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientError {
    /// Error kind that represents failures reported by the [`crate::Client`].
    pub kind: ErrorKind,
    /// The text representation of the failure.
    pub message: String,
}

impl ClientError {
    pub(crate) fn new(kind: ErrorKind, message: String) -> Self {
        Self { message, kind }
    }
}

impl Display for ClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message.as_str())
    }
}

impl Error for ClientError {}
