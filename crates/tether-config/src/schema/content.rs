use serde::{Deserialize, Serialize};

/// Initial page content. `url` and `html` are mutually exclusive; with
/// neither set an empty document is loaded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub url: Option<String>,
    pub html: Option<String>,
}
