//! Named events between host handlers and page listeners.
//!
//! - **Page -> host**: `window.SendEvent(name, data)` is a bound function
//!   that looks up the host handler for `name` and resolves with its
//!   returned string (empty when no handler is registered).
//! - **Host -> page**: [`Bridge::send_message`] evaluates script that calls
//!   every listener the page registered for the `webview_message` event.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tether_common::BindError;
use tracing::{debug, warn};

use crate::envelope::quote_json;

use super::Bridge;

/// Name the event entry point is bound under before the init script moves
/// it to `window.SendEvent`.
pub const SEND_EVENT_BINDING: &str = "_SendEvent";

/// Event type whose `addEventListener` registrations are captured for
/// host-pushed messages.
pub const MESSAGE_EVENT: &str = "webview_message";

type MessageHandler = Arc<dyn Fn(&str, &str) -> String + Send + Sync>;

#[derive(Default)]
pub(crate) struct MessageHandlers {
    handlers: Mutex<HashMap<String, MessageHandler>>,
    initialized: AtomicBool,
}

impl MessageHandlers {
    fn lock(&self) -> MutexGuard<'_, HashMap<String, MessageHandler>> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert(&self, event: String, handler: MessageHandler) -> bool {
        self.lock().insert(event, handler).is_some()
    }

    fn handle(&self, event: &str, data: &str) -> String {
        let handler = self.lock().get(event).cloned();
        match handler {
            Some(handler) => handler(event, data),
            None => {
                debug!(event, "no message handler registered");
                String::new()
            }
        }
    }
}

impl Bridge {
    /// Bind the page's `SendEvent` entry point and install the listener
    /// hooks. Calling it again is a no-op.
    pub fn init_message_handler(&self) -> Result<(), BindError> {
        if self.messages.initialized.swap(true, Ordering::SeqCst) {
            debug!("message handler already initialized");
            return Ok(());
        }

        let handlers = Arc::clone(&self.messages);
        let bound = self.bind(SEND_EVENT_BINDING, move |event: String, data: String| {
            handlers.handle(&event, &data)
        });
        if let Err(e) = bound {
            self.messages.initialized.store(false, Ordering::SeqCst);
            return Err(e);
        }

        self.engine.init(&message_init_script());
        debug!("message handler initialized");
        Ok(())
    }

    /// Register the host handler for `event`, replacing any previous one.
    ///
    /// Must follow [`Bridge::init_message_handler`]; without it the page
    /// has no `SendEvent` entry point to reach the handler through.
    pub fn add_message_handler<F>(&self, event: impl Into<String>, handler: F)
    where
        F: Fn(&str, &str) -> String + Send + Sync + 'static,
    {
        let event = event.into();
        if !self.messages.initialized.load(Ordering::SeqCst) {
            warn!(event = %event, "message handler added before init_message_handler");
        }
        if self.messages.insert(event.clone(), Arc::new(handler)) {
            debug!(event = %event, "message handler replaced");
        } else {
            debug!(event = %event, "message handler added");
        }
    }

    /// Push `event` with `data` to every page listener. Fire-and-forget.
    pub fn send_message(&self, event: &str, data: &str) {
        debug!(event, data_len = data.len(), "message sent to page");
        self.engine.eval(&message_script(event, data));
    }
}

/// Script that calls each captured page listener with `(event, data)`.
///
/// Both strings are embedded as JSON string literals, so quotes and
/// backslashes in either can not break out of the call.
pub fn message_script(event: &str, data: &str) -> String {
    format!(
        "(window.webViewEventListeners || []).forEach(function(listener) {{ listener({}, {}); }});",
        quote_json(event),
        quote_json(data),
    )
}

/// Init script that publishes `window.SendEvent` and captures listeners
/// for the message event, passing every other registration through.
pub fn message_init_script() -> String {
    format!(
        r#"
(function() {{
    if (window.{binding}) {{
        window.SendEvent = window.{binding};
        delete window.{binding};
    }}
    if (window.webViewEventListeners) {{
        return;
    }}
    window.webViewEventListeners = [];
    var addEventListener = window.addEventListener;
    var removeEventListener = window.removeEventListener;
    window.addEventListener = function(event, listener) {{
        if (event === {event}) {{
            window.webViewEventListeners.push(listener);
            return;
        }}
        return addEventListener.apply(window, arguments);
    }};
    window.removeEventListener = function(event, listener) {{
        if (event === {event}) {{
            window.webViewEventListeners = window.webViewEventListeners.filter(function(l) {{
                return l !== listener;
            }});
            return;
        }}
        return removeEventListener.apply(window, arguments);
    }};
}})();
"#,
        binding = SEND_EVENT_BINDING,
        event = quote_json(MESSAGE_EVENT),
    )
}
