use std::path::Path;

use tether_common::PlatformError;
use tether_config::SizeHint;
use tracing::{debug, warn};
use winit::dpi::LogicalSize;
use winit::window::Window;

use crate::events::WindowCommand;

use super::{icon, WebViewHost};

impl WebViewHost {
    pub(super) fn apply_window_command(&self, command: WindowCommand) {
        let Some(window) = &self.window else {
            warn!(?command, "window command before window exists, ignoring");
            return;
        };
        debug!(?command, "window command");
        match command {
            WindowCommand::SetTitle(title) => window.set_title(&title),
            WindowCommand::SetSize {
                width,
                height,
                hint,
            } => apply_size(window, width, height, hint),
            WindowCommand::SetIcon(bytes) => set_icon(window, icon::load_icon(&bytes)),
            WindowCommand::SetIconFromFile(path) => set_icon(window, load_icon_file(&path)),
            WindowCommand::Show => window.set_visible(true),
            WindowCommand::Hide => window.set_visible(false),
            WindowCommand::Minimize => window.set_minimized(true),
            WindowCommand::Maximize => window.set_maximized(true),
            WindowCommand::HideToSystemTray => {
                let e = PlatformError::NotSupported("system tray icon".into());
                warn!(error = %e, "hiding window instead");
                window.set_visible(false);
            }
        }
    }
}

fn apply_size(window: &Window, width: u32, height: u32, hint: SizeHint) {
    let size = LogicalSize::new(width as f64, height as f64);
    match hint {
        SizeHint::None => {
            window.set_resizable(true);
            let _ = window.request_inner_size(size);
        }
        SizeHint::Fixed => {
            window.set_resizable(false);
            let _ = window.request_inner_size(size);
        }
        SizeHint::Min => window.set_min_inner_size(Some(size)),
        SizeHint::Max => window.set_max_inner_size(Some(size)),
    }
}

fn set_icon(window: &Window, icon: Result<winit::window::Icon, PlatformError>) {
    match icon {
        Ok(icon) => window.set_window_icon(Some(icon)),
        Err(e) => warn!(error = %e, "failed to set window icon"),
    }
}

fn load_icon_file(path: &Path) -> Result<winit::window::Icon, PlatformError> {
    let bytes = std::fs::read(path)
        .map_err(|e| PlatformError::IconError(format!("{}: {e}", path.display())))?;
    icon::load_icon(&bytes)
}
