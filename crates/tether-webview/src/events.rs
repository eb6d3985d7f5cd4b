//! Events delivered to the engine thread.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tether_bridge::Token;
use tether_config::SizeHint;

/// State of a page load lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageLoadState {
    /// Navigation has started.
    Started,
    /// Page has fully loaded.
    Finished,
}

impl From<wry::PageLoadEvent> for PageLoadState {
    fn from(e: wry::PageLoadEvent) -> Self {
        match e {
            wry::PageLoadEvent::Started => Self::Started,
            wry::PageLoadEvent::Finished => Self::Finished,
        }
    }
}

/// One-shot window chrome operations.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowCommand {
    SetTitle(String),
    SetSize {
        width: u32,
        height: u32,
        hint: SizeHint,
    },
    /// PNG-encoded icon.
    SetIcon(Vec<u8>),
    SetIconFromFile(PathBuf),
    Show,
    Hide,
    Minimize,
    Maximize,
    HideToSystemTray,
}

/// Work for the event loop thread, sent through `EventLoopProxy`.
#[derive(Debug)]
pub enum UserEvent {
    /// Run posted work for this token.
    Dispatch(Token),
    /// Page script called a bound function.
    Call {
        token: Token,
        call_id: String,
        args: String,
    },
    /// Evaluate script in the current page.
    Eval(String),
    Navigate(String),
    PageLoad {
        state: PageLoadState,
        url: String,
    },
    Window(WindowCommand),
    /// Close the window and leave the event loop.
    Terminate,
}
