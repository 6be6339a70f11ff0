//! Error taxonomy shared by every searcher.
//!
//! Internal failures of the collaborators (model files, syntax stores,
//! remote services) are folded into exactly three kinds. The transport layer
//! only ever looks at [`AppError::kind`] to pick its response code.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of failure kinds exposed by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    NotFound,
    InvalidArguments,
    InternalError,
}

impl ErrorKind {
    /// Stable wire tag, also used in JSON error bodies.
    pub fn tag(self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::InvalidArguments => "INVALID_ARGUMENTS",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "NOT_FOUND" => Some(Self::NotFound),
            "INVALID_ARGUMENTS" => Some(Self::InvalidArguments),
            "INTERNAL_ERROR" => Some(Self::InternalError),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A classified failure with a human readable message and the original cause.
#[derive(Debug, thiserror::Error)]
#[error("{message}{}", cause_suffix(.cause))]
pub struct AppError {
    kind: ErrorKind,
    message: String,
    #[source]
    cause: Option<anyhow::Error>,
}

fn cause_suffix(cause: &Option<anyhow::Error>) -> String {
    cause.as_ref().map(|c| format!(": {}", c)).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArguments, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InternalError, message)
    }

    /// Attach the underlying cause, kept for diagnostics only.
    pub fn with_cause(mut self, cause: impl Into<anyhow::Error>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&anyhow::Error> {
        self.cause.as_ref()
    }

    pub fn status(&self) -> StatusCategory {
        classify(self.kind)
    }
}

/// Transport-neutral response category picked for a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCategory {
    /// The requested thing does not exist.
    Absent,
    /// The request contradicts itself or the model capabilities.
    MalformedRequest,
    /// Anything that went wrong on our side.
    ServerFault,
}

impl StatusCategory {
    pub fn http_status(self) -> u16 {
        match self {
            Self::Absent => 404,
            Self::MalformedRequest => 400,
            Self::ServerFault => 500,
        }
    }

    /// Category of a failed HTTP response that carried no error kind
    pub fn from_http_status(status: u16) -> Self {
        match status {
            404 => Self::Absent,
            400 | 422 => Self::MalformedRequest,
            _ => Self::ServerFault,
        }
    }

    /// The error kind a remote failure of this category is reported as
    pub fn error_kind(self) -> ErrorKind {
        match self {
            Self::Absent => ErrorKind::NotFound,
            Self::MalformedRequest => ErrorKind::InvalidArguments,
            Self::ServerFault => ErrorKind::InternalError,
        }
    }
}

pub fn classify(kind: ErrorKind) -> StatusCategory {
    match kind {
        ErrorKind::NotFound => StatusCategory::Absent,
        ErrorKind::InvalidArguments => StatusCategory::MalformedRequest,
        ErrorKind::InternalError => StatusCategory::ServerFault,
    }
}

/// Classify a raw wire tag, e.g. one received from a remote searcher.
///
/// Unknown tags are reported and treated as a server fault.
pub fn classify_tag(tag: &str) -> StatusCategory {
    match ErrorKind::from_tag(tag) {
        Some(kind) => classify(kind),
        None => {
            tracing::warn!(err_type = tag, "encountered an unknown error type");
            StatusCategory::ServerFault
        }
    }
}
