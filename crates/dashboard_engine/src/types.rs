use std::fmt;

use dashboard_core::{DashboardData, FetchSeq, JobId};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    FetchCompleted {
        seq: FetchSeq,
        result: Result<DashboardData, ApiError>,
    },
    Scrape(ScrapeEvent),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeEvent {
    Started {
        job_id: JobId,
    },
    TriggerFailed {
        job_id: JobId,
        error: ApiError,
    },
    Status {
        job_id: JobId,
        running: bool,
        run_error: Option<String>,
    },
    PollFailed {
        job_id: JobId,
        error: ApiError,
    },
}

/// Body of `GET /api/scrape/status`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScrapeStatus {
    pub running: bool,
    #[serde(default)]
    pub last_result: Option<serde_json::Value>,
}

impl ScrapeStatus {
    /// Error recorded by the backend for the last run, if it crashed.
    pub fn run_error(&self) -> Option<String> {
        self.last_result
            .as_ref()?
            .get("error")?
            .as_str()
            .map(ToOwned::to_owned)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    /// Body was not the JSON shape we expected.
    Decode,
    /// Another scrape job still holds the slot.
    JobActive,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::JobActive => write!(f, "scrape already active"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("http client setup failed: {0}")]
    Client(#[from] ApiError),
    #[error("engine runtime failed to start: {0}")]
    Runtime(#[from] std::io::Error),
}
