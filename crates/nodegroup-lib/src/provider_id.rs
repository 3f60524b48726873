//! Provider ID normalization

use serde::Serialize;
use std::fmt;

/// Trailing opaque segment of a provider-assigned ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NormalizedProviderId(String);

impl NormalizedProviderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NormalizedProviderId {
    fn from(s: &str) -> Self {
        normalize(s)
    }
}

/// Everything after the last `/` in `s`, or `s` itself when there is none
pub fn normalize(s: &str) -> NormalizedProviderId {
    let id = s.rsplit_once('/').map_or(s, |(_, id)| id);
    NormalizedProviderId(id.to_string())
}
