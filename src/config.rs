//! Client configuration shared by both execution strategies.

use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Upper bound on a call when no per-call timeout is given.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(45);

/// Configuration applied to every call a client issues.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Per-call timeout used when a verb method is passed `None`.
    #[serde(with = "duration_secs", default = "default_timeout")]
    pub default_timeout: Duration,
    /// Connection timeout for the backend client, if the backend supports one.
    #[serde(with = "duration_option_secs", default)]
    pub connect_timeout: Option<Duration>,
    /// Overrides the built-in `User-Agent` default header.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Extra default headers merged into every request (caller values win).
    #[serde(default)]
    pub default_headers: IndexMap<String, String>,
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            default_timeout: DEFAULT_TIMEOUT,
            connect_timeout: None,
            user_agent: None,
            default_headers: IndexMap::new(),
        }
    }
}

impl ClientConfig {
    /// The effective timeout for one call.
    pub fn resolve_timeout(&self, per_call: Option<Duration>) -> Duration {
        per_call.unwrap_or(self.default_timeout)
    }
}

// Durations serialize as integer seconds.
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

mod duration_option_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => d.as_secs().serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs: Option<u64> = Option::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}
