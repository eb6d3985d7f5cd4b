use clap::Parser;

/// Tether: a native window hosting a web page with host-bound functions.
#[derive(Parser, Debug)]
#[command(name = "tether", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Load this URL instead of the configured content.
    #[arg(long)]
    pub url: Option<String>,

    /// Enable the webview developer tools.
    #[arg(long)]
    pub devtools: bool,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_overrides() {
        let args = Args::parse_from([
            "tether",
            "--config",
            "/tmp/c.toml",
            "--log-level",
            "debug",
            "--url",
            "https://example.com",
            "--devtools",
        ]);
        assert_eq!(args.config.as_deref(), Some("/tmp/c.toml"));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.url.as_deref(), Some("https://example.com"));
        assert!(args.devtools);
    }

    #[test]
    fn defaults_are_empty() {
        let args = Args::parse_from(["tether"]);
        assert!(args.config.is_none());
        assert!(!args.devtools);
    }
}
