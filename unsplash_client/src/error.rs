//! Error types

use std::fmt;

#[derive(Debug)]
pub enum Error {
    /// HTTP transport error
    Http(reqwest::Error),
    /// JSON decode error
    Json(serde_json::Error),
    /// Hourly request quota exhausted (HTTP 403)
    QuotaExceeded(String),
    /// Any other non-success response
    Api { message: String, status: u16 },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Http(e) => write!(f, "HTTP error: {}", e),
            Error::Json(e) => write!(f, "JSON parse error: {}", e),
            Error::QuotaExceeded(msg) => write!(f, "Rate limit exceeded: {}", msg),
            Error::Api { message, status } => {
                write!(f, "API error ({}): {}", status, message)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http(e) => Some(e),
            Error::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Http(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
