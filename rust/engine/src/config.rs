//! Engine settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Engine settings, loadable from JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// HTTP/1 keep-alive, in seconds. `None` closes every connection after one response;
    /// `Some(secs)` keeps it open and drops it when the next request's headers take longer
    /// than `secs` to arrive.
    pub keep_alive: Option<u64>,
}

impl EngineConfig {
    /// Enable keep-alive with a `secs` header read timeout.
    pub fn with_keep_alive(mut self, secs: u64) -> Self {
        self.keep_alive = Some(secs);
        self
    }

    /// Header read timeout for kept-alive connections. Never shorter than one second.
    pub fn keep_alive_timeout(&self) -> Option<Duration> {
        self.keep_alive.map(|secs| Duration::from_secs(secs.max(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_json() {
        assert_eq!(EngineConfig::default().keep_alive_timeout(), None);
        assert_eq!(
            EngineConfig::default().with_keep_alive(0).keep_alive_timeout(),
            Some(Duration::from_secs(1))
        );

        let config: EngineConfig = serde_json::from_str(r#"{"keep_alive": 5}"#).unwrap();
        assert_eq!(config, EngineConfig::default().with_keep_alive(5));

        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.keep_alive, None);
    }
}
