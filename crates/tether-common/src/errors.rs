use std::path::PathBuf;

/// Errors returned synchronously when a host function is bound.
#[derive(Debug, thiserror::Error)]
pub enum BindError {
    #[error("only functions can be bound (got {0})")]
    NotAFunction(String),

    #[error("unsupported function signature: {0}")]
    UnsupportedSignature(String),
}

/// Errors raised while servicing a page-initiated call.
///
/// None of these escape to host code; the binder turns every one of them
/// into a failure envelope whose payload is the `Display` text.
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    #[error("function arguments mismatch: expected {}, got {got}", arity(.expected, .variadic))]
    ArgumentCount {
        expected: usize,
        variadic: bool,
        got: usize,
    },

    #[error("argument {index} could not be decoded as {expected}: {source}")]
    ArgumentType {
        index: usize,
        expected: &'static str,
        source: serde_json::Error,
    },

    #[error("arguments are not a JSON array: {0}")]
    InvalidRequest(serde_json::Error),

    #[error("{0}")]
    Encoding(serde_json::Error),

    #[error("{0}")]
    Host(String),

    #[error("no binding registered for token {0}")]
    UnknownBinding(u64),

    #[error("host function panicked: {0}")]
    Panicked(String),
}

fn arity(expected: &usize, variadic: &bool) -> String {
    if *variadic {
        format!("at least {}", expected.saturating_sub(1))
    } else {
        expected.to_string()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("window error: {0}")]
    WindowError(String),

    #[error("icon error: {0}")]
    IconError(String),

    #[error("not supported: {0}")]
    NotSupported(String),
}

#[derive(Debug, thiserror::Error)]
pub enum TetherError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Bind(#[from] BindError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("webview error: {0}")]
    WebView(String),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_error() -> serde_json::Error {
        serde_json::from_str::<i64>("\"nope\"").unwrap_err()
    }

    #[test]
    fn bind_error_display() {
        let err = BindError::NotAFunction("i32".into());
        assert_eq!(err.to_string(), "only functions can be bound (got i32)");

        let err = BindError::UnsupportedSignature("3 return values".into());
        assert_eq!(
            err.to_string(),
            "unsupported function signature: 3 return values"
        );
    }

    #[test]
    fn argument_count_display_fixed_arity() {
        let err = CallError::ArgumentCount {
            expected: 2,
            variadic: false,
            got: 3,
        };
        assert_eq!(
            err.to_string(),
            "function arguments mismatch: expected 2, got 3"
        );
    }

    #[test]
    fn argument_count_display_variadic_arity() {
        let err = CallError::ArgumentCount {
            expected: 3,
            variadic: true,
            got: 1,
        };
        assert_eq!(
            err.to_string(),
            "function arguments mismatch: expected at least 2, got 1"
        );
    }

    #[test]
    fn argument_type_names_index_and_type() {
        let err = CallError::ArgumentType {
            index: 1,
            expected: "i64",
            source: json_error(),
        };
        let text = err.to_string();
        assert!(text.starts_with("argument 1 could not be decoded as i64: "));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn host_and_encoding_errors_are_bare_text() {
        let err = CallError::Host("disk full".into());
        assert_eq!(err.to_string(), "disk full");

        let source = json_error();
        let expected = source.to_string();
        assert_eq!(CallError::Encoding(source).to_string(), expected);
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ValidationError("window.width = 5 is out of range".into());
        assert_eq!(
            err.to_string(),
            "config validation error: window.width = 5 is out of range"
        );
    }

    #[test]
    fn tether_error_from_bind() {
        let err: TetherError = BindError::NotAFunction("String".into()).into();
        assert!(matches!(err, TetherError::Bind(_)));
        assert!(err.to_string().contains("only functions"));
    }

    #[test]
    fn tether_error_from_platform() {
        let err: TetherError = PlatformError::NotSupported("tray on linux".into()).into();
        assert!(matches!(err, TetherError::Platform(_)));
        assert_eq!(err.to_string(), "not supported: tray on linux");
    }

    #[test]
    fn tether_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: TetherError = io_err.into();
        assert!(matches!(err, TetherError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }
}
