//! Window and webview creation.

use tether_common::{PlatformError, TetherError};
use tether_config::{SizeHint, TetherConfig, WindowConfig};
use tracing::{debug, info, warn};
use winit::dpi::LogicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};
use wry::{WebView, WebViewBuilder};

use crate::proxy::EngineProxy;
use crate::rpc::RPC_INIT_SCRIPT;

use super::{handlers, WebViewHost};

const BLANK_PAGE: &str = "<html><body></body></html>";

/// Window attributes for the configured title, size and size hint.
pub fn window_attributes(config: &WindowConfig) -> WindowAttributes {
    let size = LogicalSize::new(config.width as f64, config.height as f64);
    let attrs = WindowAttributes::default().with_title(config.title.clone());
    match config.hint {
        SizeHint::None => attrs.with_inner_size(size),
        SizeHint::Fixed => attrs.with_inner_size(size).with_resizable(false),
        SizeHint::Min => attrs.with_min_inner_size(size),
        SizeHint::Max => attrs.with_max_inner_size(size),
    }
}

impl WebViewHost {
    pub(super) fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<(), TetherError> {
        let window = event_loop
            .create_window(window_attributes(&self.config.window))
            .map_err(|e| PlatformError::WindowError(e.to_string()))?;

        // Everything registered from here on is evaluated after the build.
        let (init_scripts, start_url) = {
            let mut page = self.proxy.state().page();
            (page.begin_build(), page.take_deferred_navigation())
        };

        let webview = build_webview(
            &self.config,
            &init_scripts,
            start_url.as_deref(),
            &self.proxy,
            &window,
        )
        .map_err(|e| TetherError::WebView(e.to_string()))?;

        self.window = Some(window);
        self.webview = Some(webview);
        self.flush_deferred_evals();

        info!(
            init_scripts = init_scripts.len(),
            embed = self.config.window.embed,
            "Window and webview created"
        );
        Ok(())
    }

    /// Keep an embedded webview covering the window's content area.
    pub(super) fn sync_webview_bounds(&self) {
        if !self.config.window.embed {
            return;
        }
        let (Some(window), Some(webview)) = (&self.window, &self.webview) else {
            return;
        };
        if let Err(e) = webview.set_bounds(content_bounds(window)) {
            warn!(error = %e, "failed to resize webview");
        }
    }
}

fn build_webview(
    config: &TetherConfig,
    init_scripts: &[String],
    start_url: Option<&str>,
    proxy: &EngineProxy,
    window: &Window,
) -> Result<WebView, wry::Error> {
    let mut builder = WebViewBuilder::new()
        .with_devtools(config.window.devtools)
        .with_initialization_script(RPC_INIT_SCRIPT);

    for script in init_scripts {
        builder = builder.with_initialization_script(script.as_str());
    }

    builder = handlers::attach_ipc_handler(builder, proxy.clone());
    builder = handlers::attach_page_load_handler(builder, proxy.clone());

    let content = &config.content;
    let url = start_url.or(content.url.as_deref());
    if let Some(url) = url {
        builder = builder.with_url(url);
    } else if let Some(html) = &content.html {
        builder = builder.with_html(html);
    } else {
        builder = builder.with_html(BLANK_PAGE);
    }

    let webview = if config.window.embed {
        builder
            .with_bounds(content_bounds(window))
            .build_as_child(window)?
    } else {
        builder.build(window)?
    };
    debug!(url = ?url, "webview built");
    Ok(webview)
}

fn content_bounds(window: &Window) -> wry::Rect {
    let size = window.inner_size();
    wry::Rect {
        position: wry::dpi::LogicalPosition::new(0, 0).into(),
        size: wry::dpi::PhysicalSize::new(size.width, size.height).into(),
    }
}
