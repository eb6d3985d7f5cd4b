//! `ApplicationHandler` implementation for the winit event loop.

use tracing::{error, info};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::WindowId;

use crate::events::UserEvent;

use super::WebViewHost;

impl ApplicationHandler<UserEvent> for WebViewHost {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.initialize(event_loop) {
            error!("Failed to create webview window: {e}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Window close requested");
                self.destroy();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    self.sync_webview_bounds();
                }
            }
            _ => {}
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: UserEvent) {
        match event {
            UserEvent::Dispatch(token) => {
                self.bridge.run_dispatched(token);
            }
            UserEvent::Call {
                token,
                call_id,
                args,
            } => self.bridge.deliver_call(token, &call_id, &args),
            UserEvent::Eval(js) => self.eval(&js),
            UserEvent::Navigate(url) => self.navigate(&url),
            UserEvent::PageLoad { state, url } => self.on_page_load(state, &url),
            UserEvent::Window(command) => self.apply_window_command(command),
            UserEvent::Terminate => {
                info!("Terminate requested");
                self.destroy();
                event_loop.exit();
            }
        }
    }
}
