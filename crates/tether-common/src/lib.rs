pub mod errors;

pub use errors::{BindError, CallError, ConfigError, PlatformError, TetherError};

pub type Result<T> = std::result::Result<T, TetherError>;
