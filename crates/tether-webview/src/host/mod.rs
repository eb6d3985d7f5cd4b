//! The event loop side of the engine.
//!
//! [`WebViewHost`] owns the window and the webview. It is driven by winit
//! and only ever touched on the event loop thread.

mod event_handler;
mod handlers;
mod icon;
mod lifecycle;
mod window_ops;

pub use icon::{decode_png, load_icon};
pub use lifecycle::window_attributes;

use std::sync::Arc;

use tether_bridge::Bridge;
use tether_config::TetherConfig;
use tracing::{debug, warn};
use winit::window::Window;
use wry::WebView;

use crate::events::PageLoadState;
use crate::proxy::EngineProxy;

pub struct WebViewHost {
    config: TetherConfig,
    bridge: Arc<Bridge>,
    proxy: EngineProxy,
    window: Option<Window>,
    webview: Option<WebView>,
}

impl WebViewHost {
    pub fn new(config: TetherConfig, bridge: Arc<Bridge>, proxy: EngineProxy) -> Self {
        Self {
            config,
            bridge,
            proxy,
            window: None,
            webview: None,
        }
    }

    pub fn bridge(&self) -> &Arc<Bridge> {
        &self.bridge
    }

    /// The native window, once created.
    pub fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }

    pub fn webview(&self) -> Option<&WebView> {
        self.webview.as_ref()
    }

    fn eval(&self, js: &str) {
        match &self.webview {
            Some(webview) => {
                if let Err(e) = webview.evaluate_script(js) {
                    warn!(error = %e, "failed to evaluate script");
                }
            }
            None => self.proxy.state().page().defer_eval(js.to_string()),
        }
    }

    fn navigate(&self, url: &str) {
        let Some(webview) = &self.webview else {
            debug!(url, "navigation deferred until the webview exists");
            self.proxy.state().page().defer_navigation(url.to_string());
            return;
        };
        if let Err(e) = webview.load_url(url) {
            warn!(url, error = %e, "navigation failed");
        }
    }

    /// Late init scripts are not part of the webview's initialization
    /// set, so replay them whenever a new document starts.
    fn on_page_load(&self, state: PageLoadState, url: &str) {
        debug!(?state, url, "page load");
        if state != PageLoadState::Started {
            return;
        }
        let Some(webview) = &self.webview else {
            return;
        };
        let scripts = self.proxy.state().page().late_init_scripts();
        for script in &scripts {
            if let Err(e) = webview.evaluate_script(script) {
                warn!(error = %e, "failed to replay init script");
            }
        }
    }

    fn flush_deferred_evals(&self) {
        let Some(webview) = &self.webview else {
            return;
        };
        let evals = self.proxy.state().page().take_deferred_evals();
        for js in &evals {
            if let Err(e) = webview.evaluate_script(js) {
                warn!(error = %e, "failed to evaluate deferred script");
            }
        }
    }

    /// Drop the webview before the window it is attached to.
    fn destroy(&mut self) {
        self.webview = None;
        self.window = None;
        debug!("webview destroyed");
    }
}
