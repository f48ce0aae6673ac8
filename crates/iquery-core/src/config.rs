//! Pipeline configuration that downstream crates can serialize/deserialize.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::interval::Interval;

/// What `build()` does to the filter and sort registries once it has
/// composed them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatePolicy {
    /// Registries survive every build until explicitly cleared.
    #[default]
    Persistent,
    /// Filters and sort keys are spent by the build that composed them.
    /// The interval and projector are kept.
    Consuming,
}

impl StatePolicy {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "persistent" => Some(StatePolicy::Persistent),
            "consuming" => Some(StatePolicy::Consuming),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Registry lifecycle across builds.
    pub state: StatePolicy,

    /// Initial offset/limit window.
    pub interval: Interval,
}

impl PipelineConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `IQUERY_STATE_POLICY`: `persistent` or `consuming`
    /// - `IQUERY_OFFSET`: initial offset (`>= 0`)
    /// - `IQUERY_LIMIT`: initial limit (`>= -1`)
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("IQUERY_STATE_POLICY") {
            if let Some(policy) = StatePolicy::parse(&s) {
                cfg.state = policy;
            }
        }

        if let Ok(s) = std::env::var("IQUERY_OFFSET") {
            if let Some(v) = s.parse::<i64>().ok().and_then(|v| Interval::checked_offset(v).ok()) {
                cfg.interval = cfg.interval.with_offset(v);
            }
        }

        if let Ok(s) = std::env::var("IQUERY_LIMIT") {
            if let Some(v) = s.parse::<i64>().ok().and_then(|v| Interval::checked_limit(v).ok()) {
                cfg.interval = cfg.interval.with_limit(v);
            }
        }

        cfg
    }

    /// Parse a JSON configuration document. Missing fields take defaults.
    pub fn from_json(doc: &str) -> Result<Self> {
        Ok(serde_json::from_str(doc)?)
    }

    pub fn with_state(mut self, state: StatePolicy) -> Self {
        self.state = state;
        self
    }
}
