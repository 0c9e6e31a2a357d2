use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body the backend returns alongside a non-success status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Server-supplied message, if it is present and non-blank.
    pub fn message(&self) -> Option<&str> {
        self.error
            .as_deref()
            .map(str::trim)
            .filter(|message| !message.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    Server,
    Malformed,
}

/// Why a round-trip did not succeed. `Display` is exactly the text shown to
/// the user; the variant only matters for logging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureReason {
    #[error("{message}")]
    Network { message: String },
    #[error("{message}")]
    Server { status: u16, message: String },
    #[error("{message}")]
    Malformed { message: String },
}

impl FailureReason {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Network { message } | Self::Server { message, .. } | Self::Malformed { message } => {
                message
            }
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Network { .. } => FailureKind::Network,
            Self::Server { .. } => FailureKind::Server,
            Self::Malformed { .. } => FailureKind::Malformed,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}
