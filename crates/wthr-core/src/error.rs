use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by the HTTP clients.
///
/// A geocoding query that simply finds nothing is not an error, see
/// [`crate::apis::Lookup::NotFound`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// Provider could not be reached at all (DNS, refused connection, timeout).
    #[error("an error occurred, please check your network connection and try again")]
    NetworkUnavailable(#[source] reqwest::Error),

    /// Provider answered, but rejected the request.
    #[error("Code {code}: {message}")]
    BadRequest { code: u16, message: String },

    #[error("failed to decode {what} response")]
    Decode {
        what: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

/// Errors returned by a [`crate::config::ConfigStore`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("settings file not found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to access settings file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings file {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("failed to serialize settings: {0}")]
    Serialize(String),
}

/// Token does not look like an OpenWeather API key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("incorrect API key format, expected 32 lowercase letters or digits")]
pub struct TokenFormatError;
