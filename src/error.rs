use std::{fmt, io};

use reqwest::StatusCode;

#[derive(Debug)]
pub enum SpotifyError {
    Http(reqwest::Error),
    Unauthorized,
    Forbidden(String),
    RateLimited(u64),
    Status(StatusCode, String),
    UnexpectedResponse(String),
    SerdeError(serde_json::Error),
    Config(String),
}

impl SpotifyError {
    /// True when retrying with the same credentials is pointless.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, SpotifyError::Unauthorized)
    }
}

impl fmt::Display for SpotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpotifyError::Http(e) => write!(f, "request failed: {}", e),
            SpotifyError::Unauthorized => write!(
                f,
                "Bearer token expired or invalid. Please get a fresh token or run spotools auth."
            ),
            SpotifyError::Forbidden(action) => {
                write!(f, "Insufficient permissions to {}.", action)
            }
            SpotifyError::RateLimited(secs) => write!(
                f,
                "Rate limited for {} seconds. Try again later.",
                secs
            ),
            SpotifyError::Status(status, body) => {
                if body.is_empty() {
                    write!(f, "unexpected status {}", status)
                } else {
                    write!(f, "unexpected status {}: {}", status, body)
                }
            }
            SpotifyError::UnexpectedResponse(msg) => {
                write!(f, "unexpected response format: {}", msg)
            }
            SpotifyError::SerdeError(e) => write!(f, "cannot parse response: {}", e),
            SpotifyError::Config(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for SpotifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SpotifyError::Http(e) => Some(e),
            SpotifyError::SerdeError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SpotifyError {
    fn from(err: reqwest::Error) -> Self {
        SpotifyError::Http(err)
    }
}

impl From<serde_json::Error> for SpotifyError {
    fn from(err: serde_json::Error) -> Self {
        SpotifyError::SerdeError(err)
    }
}

#[derive(Debug)]
pub enum TokenError {
    IoError(io::Error),
    SerdeError(serde_json::Error),
    Refresh(String),
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::IoError(e) => write!(f, "token cache: {}", e),
            TokenError::SerdeError(e) => write!(f, "token cache is corrupt: {}", e),
            TokenError::Refresh(msg) => write!(f, "token refresh failed: {}", msg),
        }
    }
}

impl std::error::Error for TokenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TokenError::IoError(e) => Some(e),
            TokenError::SerdeError(e) => Some(e),
            TokenError::Refresh(_) => None,
        }
    }
}

impl From<io::Error> for TokenError {
    fn from(err: io::Error) -> Self {
        TokenError::IoError(err)
    }
}

impl From<serde_json::Error> for TokenError {
    fn from(err: serde_json::Error) -> Self {
        TokenError::SerdeError(err)
    }
}

#[derive(Debug)]
pub enum ExportError {
    IoError(io::Error),
    CsvError(csv::Error),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::IoError(e) => write!(f, "export failed: {}", e),
            ExportError::CsvError(e) => write!(f, "csv export failed: {}", e),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::IoError(e) => Some(e),
            ExportError::CsvError(e) => Some(e),
        }
    }
}

impl From<io::Error> for ExportError {
    fn from(err: io::Error) -> Self {
        ExportError::IoError(err)
    }
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::CsvError(err)
    }
}
