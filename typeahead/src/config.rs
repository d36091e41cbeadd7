use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tuning for a [`TypeaheadController`](crate::TypeaheadController).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeaheadConfig {
    /// Quiet period after the last keystroke before a request is fired.
    pub debounce_ms: u64,
    /// Maximum number of suggestions requested per fetch.
    pub limit: usize,
    /// Per-request timeout. `0` disables it.
    pub request_timeout_ms: u64,
    /// Comma-separated suggestions matched against the typed text.
    pub static_suggestions: String,
    /// Comma-separated suggestions shown while the box is empty.
    pub zero_term_suggestions: String,
}

impl Default for TypeaheadConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 250,
            limit: 10,
            request_timeout_ms: 10_000,
            static_suggestions: String::new(),
            zero_term_suggestions: String::new(),
        }
    }
}

impl TypeaheadConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_ms > 0).then(|| Duration::from_millis(self.request_timeout_ms))
    }

    /// Limit actually sent upstream; a zero limit falls back to the default.
    pub fn effective_limit(&self) -> usize {
        if self.limit == 0 {
            Self::default().limit
        } else {
            self.limit
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = TypeaheadConfig::default();
        assert_eq!(config.debounce(), Duration::from_millis(250));
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.effective_limit(), 10);
    }

    #[test]
    fn zero_timeout_disables_it_and_zero_limit_is_defaulted() {
        let config = TypeaheadConfig {
            request_timeout_ms: 0,
            limit: 0,
            ..TypeaheadConfig::default()
        };
        assert_eq!(config.request_timeout(), None);
        assert_eq!(config.effective_limit(), 10);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: TypeaheadConfig =
            serde_json::from_str(r#"{ "debounce_ms": 100, "zero_term_suggestions": "a,b" }"#)
                .unwrap();
        assert_eq!(config.debounce_ms, 100);
        assert_eq!(config.limit, 10);
        assert_eq!(config.zero_term_suggestions, "a,b");
    }
}
