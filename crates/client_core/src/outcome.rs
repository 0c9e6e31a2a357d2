use shared::error::FailureReason;

/// Result/Error slot of a workflow. At most one side is populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Empty,
    Ready(T),
    Failed(String),
}

impl<T> Default for Outcome<T> {
    fn default() -> Self {
        Self::Empty
    }
}

impl<T> Outcome<T> {
    /// Settles a round-trip; `fallback` covers a failure with a blank message.
    pub fn settle(result: Result<T, FailureReason>, fallback: &str) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(failure) if failure.message().trim().is_empty() => Self::Failed(fallback.to_string()),
            Err(failure) => Self::Failed(failure.message().to_string()),
        }
    }

    pub fn result(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn clear(&mut self) {
        *self = Self::Empty;
    }

    /// Clears a failure; a ready result is left alone.
    pub fn dismiss_error(&mut self) {
        if matches!(self, Self::Failed(_)) {
            *self = Self::Empty;
        }
    }
}
