use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, KufarError>;

/// Why a landing URL was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidUrlReason {
    /// Not an http(s) URL with a host
    Malformed,
    /// Not a Kufar address
    ForeignHost,
    /// Connection to the host failed
    Unreachable,
}

#[derive(Debug, Error)]
pub enum KufarError {
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: InvalidUrlReason },

    #[error("landing page {url} is missing its application state: {detail}")]
    MalformedUpstreamPage { url: String, detail: String },

    #[error("invalid quantity {0:?}: expected a positive integer")]
    InvalidQuantity(String),

    #[error("{url} returned status {status}")]
    UpstreamStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to decode response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write export: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("terminal input failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl fmt::Display for InvalidUrlReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InvalidUrlReason::Malformed => "not an http(s) link",
            InvalidUrlReason::ForeignHost => "not a kufar.by link",
            InvalidUrlReason::Unreachable => "host unreachable, check the internet connection",
        })
    }
}

impl KufarError {
    /// True for errors caused by user input rather than the upstream site
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            KufarError::InvalidUrl { .. } | KufarError::InvalidQuantity(_)
        )
    }
}
