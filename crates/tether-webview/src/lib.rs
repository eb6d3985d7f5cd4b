//! Native engine for the Tether bridge.
//!
//! Implements `tether_bridge::Engine` on top of `winit` + `wry`:
//! - The winit event loop thread is the engine's owning thread
//! - Requests from any thread travel as [`UserEvent`]s via [`EngineProxy`]
//! - Page calls arrive through `window.ipc.postMessage` and are settled by
//!   evaluating script against the page-side RPC table
//! - Window chrome operations are forwarded as [`WindowCommand`]s

pub mod events;
pub mod host;
mod page;
pub mod proxy;
pub mod rpc;

pub use events::{PageLoadState, UserEvent, WindowCommand};
pub use host::WebViewHost;
pub use proxy::EngineProxy;

use std::sync::Arc;

use tether_bridge::{Bridge, Engine};
use tether_common::TetherError;
use tether_config::TetherConfig;
use winit::event_loop::EventLoop;

/// Create the event loop, let `setup` bind functions and handlers, then
/// run the window until it closes or is terminated.
///
/// Must be called on the main thread.
pub fn run<F>(config: TetherConfig, setup: F) -> Result<(), TetherError>
where
    F: FnOnce(&Arc<Bridge>, &EngineProxy) -> Result<(), TetherError>,
{
    let event_loop = EventLoop::<UserEvent>::with_user_event()
        .build()
        .map_err(|e| TetherError::WebView(format!("failed to create event loop: {e}")))?;

    let proxy = EngineProxy::new(event_loop.create_proxy());
    let engine: Arc<dyn Engine> = Arc::new(proxy.clone());
    let bridge = Arc::new(Bridge::new(engine));

    setup(&bridge, &proxy)?;

    let mut host = WebViewHost::new(config, bridge, proxy);
    event_loop
        .run_app(&mut host)
        .map_err(|e| TetherError::WebView(format!("event loop error: {e}")))
}
