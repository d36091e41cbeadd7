use std::time::Duration;

/// Terminal outcome of a failed suggestion fetch.
///
/// [`FetchError::Cancelled`] is not a failure from the user's point of view: it
/// means a newer request superseded this one, and the controller ignores it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("Request was cancelled")]
    Cancelled,

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Parsing error: {0}")]
    Parsing(String),
}

impl FetchError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }
}

/// Why a single raw record could not be turned into a suggestion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("record has no cell collection")]
    MissingCells,

    #[error("hit has no resource")]
    MissingResource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_cancelled_is_cancelled() {
        assert!(FetchError::Cancelled.is_cancelled());
        assert!(!FetchError::Timeout(Duration::from_secs(1)).is_cancelled());
        assert!(!FetchError::Transport("boom".into()).is_cancelled());
    }

    #[test]
    fn messages_are_descriptive() {
        assert_eq!(
            FetchError::Transport("connection reset".into()).to_string(),
            "Transport error: connection reset"
        );
        assert_eq!(
            FetchError::Timeout(Duration::from_millis(1500)).to_string(),
            "Request timed out after 1.5s"
        );
    }
}
