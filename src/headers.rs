//! Header merge and wire-format helpers shared by both clients.
//!
//! Keys are compared exactly as supplied, with no case-folding. An
//! [`IndexMap`] keeps wire-line output in insertion order while later
//! duplicate inserts overwrite earlier values.

use indexmap::IndexMap;

use crate::config::ClientConfig;

const DEFAULT_ACCEPT: &str = "application/json";
const DEFAULT_USER_AGENT: &str = concat!("apiwire/", env!("CARGO_PKG_VERSION"));
const DEFAULT_KEEP_ALIVE: &str = "300";

/// The default headers attached to every request, in order: `Accept`,
/// `User-Agent` (overridable via config), `Keep-Alive`, then any extra
/// defaults from the config.
pub fn default_headers(config: &ClientConfig) -> IndexMap<String, String> {
    let mut defaults = IndexMap::new();
    defaults.insert("Accept".to_string(), DEFAULT_ACCEPT.to_string());
    defaults.insert(
        "User-Agent".to_string(),
        config
            .user_agent
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
    );
    defaults.insert("Keep-Alive".to_string(), DEFAULT_KEEP_ALIVE.to_string());
    for (key, value) in &config.default_headers {
        defaults.insert(key.clone(), value.clone());
    }
    defaults
}

/// Merge `defaults` into `headers` without overwriting caller values.
pub fn merge_defaults(headers: &mut IndexMap<String, String>, defaults: IndexMap<String, String>) {
    for (key, value) in defaults {
        headers.entry(key).or_insert(value);
    }
}

/// Convert a header mapping into wire-line form, one `"Name: value"` entry
/// per header. Values are passed through verbatim; escaping colons or
/// newlines is the caller's responsibility.
pub fn wire_lines(headers: &IndexMap<String, String>) -> Vec<String> {
    headers
        .iter()
        .map(|(key, value)| format!("{key}: {value}"))
        .collect()
}
