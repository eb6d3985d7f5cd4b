//! Window configuration types.

use serde::{Deserialize, Serialize};

/// How the requested width and height constrain user resizing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SizeHint {
    /// Width and height are the initial size; the window stays resizable.
    #[default]
    None,
    /// The window can not be resized by the user.
    Fixed,
    /// Width and height are minimum bounds.
    Min,
    /// Width and height are maximum bounds.
    Max,
}

/// Host window settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Logical width in pixels (valid range: 100-16384).
    pub width: u32,
    /// Logical height in pixels (valid range: 100-16384).
    pub height: u32,
    pub hint: SizeHint,
    /// Enable the engine's developer tools (always on in debug builds).
    pub devtools: bool,
    /// Build the webview as a child of the window with explicit bounds
    /// instead of letting it fill the content view.
    pub embed: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Tether".to_string(),
            width: 800,
            height: 600,
            hint: SizeHint::None,
            devtools: cfg!(debug_assertions),
            embed: false,
        }
    }
}
