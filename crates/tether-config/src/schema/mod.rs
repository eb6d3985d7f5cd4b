//! Configuration schema types for Tether.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod content;
mod logging;
mod window;

pub use content::*;
pub use logging::*;
pub use window::*;

use serde::{Deserialize, Serialize};

/// Root configuration for a Tether host window.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TetherConfig {
    pub window: WindowConfig,
    pub content: ContentConfig,
    pub logging: LoggingConfig,
}
