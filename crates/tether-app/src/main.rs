mod cli;
mod demo;

use std::path::Path;

use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_LEVEL: &str = "tether=info";

fn init_logging(directive: &str) {
    let filter = match directive.parse::<Directive>() {
        Ok(directive) => EnvFilter::from_default_env().add_directive(directive),
        Err(_) => EnvFilter::new(DEFAULT_LOG_LEVEL),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() {
    let args = cli::parse();

    let loaded = tether_config::load_config(args.config.as_deref().map(Path::new));
    let mut config = loaded.as_ref().cloned().unwrap_or_default();

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    init_logging(&level);

    tracing::info!("Tether v{} starting...", env!("CARGO_PKG_VERSION"));
    match &loaded {
        Ok(_) => tracing::info!("Config loaded (title: {})", config.window.title),
        Err(e) => tracing::warn!("Config load failed, using defaults: {e}"),
    }

    if let Some(url) = args.url {
        config.content.url = Some(url);
        config.content.html = None;
    }
    if args.devtools {
        config.window.devtools = true;
    }
    if config.content.url.is_none() && config.content.html.is_none() {
        config.content.html = Some(demo::DEMO_PAGE.to_string());
    }

    tracing::info!("Entering event loop");
    if let Err(e) = tether_webview::run(config, demo::install) {
        tracing::error!("Tether exited with an error: {e}");
        std::process::exit(1);
    }
    tracing::info!("Shutdown complete");
}
